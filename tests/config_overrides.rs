use std::collections::HashMap;

use carsync::config::{
    ClientConfig, ConfigError, ENV_BASE_URL, ENV_COLLECTION, ENV_TIMEOUT_MS,
};

fn env(pairs: &[(&'static str, &str)]) -> HashMap<&'static str, String> {
    pairs.iter().map(|(k, v)| (*k, v.to_string())).collect()
}

#[test]
fn defaults_point_at_local_cars_collection() {
    let config = ClientConfig::default();
    assert_eq!(config.base_url, "http://localhost:3333");
    assert_eq!(config.collection, "cars");
    assert_eq!(config.request_timeout_ms, 10_000);
    assert!(config.load_on_start);

    let chrome = config.default_chrome();
    assert_eq!(chrome.title, "Add a car");
    assert_eq!(chrome.submit_label, "Add");
}

#[test]
fn overrides_replace_only_the_variables_that_are_set() {
    let vars = env(&[
        (ENV_BASE_URL, "http://cars.internal:8080"),
        (ENV_TIMEOUT_MS, " 2500 "),
    ]);
    let config = ClientConfig::default()
        .with_overrides(|var| vars.get(var).cloned())
        .expect("valid overrides");

    assert_eq!(config.base_url, "http://cars.internal:8080");
    assert_eq!(config.collection, "cars");
    assert_eq!(config.request_timeout_ms, 2500);

    let vars = env(&[(ENV_COLLECTION, "vehicles")]);
    let config = ClientConfig::default()
        .with_overrides(|var| vars.get(var).cloned())
        .expect("valid overrides");
    assert_eq!(config.collection, "vehicles");
    assert_eq!(config.base_url, "http://localhost:3333");
}

#[test]
fn non_numeric_timeout_is_rejected() {
    let vars = env(&[(ENV_TIMEOUT_MS, "soon")]);
    let err = ClientConfig::default()
        .with_overrides(|var| vars.get(var).cloned())
        .unwrap_err();

    assert_eq!(
        err,
        ConfigError::InvalidEnv {
            var: ENV_TIMEOUT_MS,
            value: "soon".to_string(),
        }
    );
    assert_eq!(
        err.to_string(),
        "invalid value \"soon\" for CARSYNC_TIMEOUT_MS"
    );
}
