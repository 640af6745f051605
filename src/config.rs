//! Client configuration.

use crate::core::form::FormChrome;

/// Environment variable overriding [`ClientConfig::base_url`].
pub const ENV_BASE_URL: &str = "CARSYNC_BASE_URL";
/// Environment variable overriding [`ClientConfig::collection`].
pub const ENV_COLLECTION: &str = "CARSYNC_COLLECTION";
/// Environment variable overriding [`ClientConfig::request_timeout_ms`].
pub const ENV_TIMEOUT_MS: &str = "CARSYNC_TIMEOUT_MS";

/// Invalid configuration value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// An environment override could not be parsed.
    #[error("invalid value {value:?} for {var}")]
    InvalidEnv {
        /// Variable name.
        var: &'static str,
        /// Raw value found.
        value: String,
    },
}

/// Settings for the transport, the runtime loop, and the form text.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Scheme, host and port of the collection server.
    pub base_url: String,
    /// Collection path segment under `base_url`.
    pub collection: String,
    /// Per-request timeout for the HTTP transport.
    pub request_timeout_ms: u64,
    /// Capacity of the runtime command channel.
    pub command_queue_bound: usize,
    /// Capacity of the broadcast event channel.
    pub event_capacity: usize,
    /// Fetch the full collection as soon as the runtime starts.
    pub load_on_start: bool,
    /// Form title shown while creating.
    pub form_title: String,
    /// Submit label shown while creating.
    pub submit_label: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3333".to_string(),
            collection: "cars".to_string(),
            request_timeout_ms: 10_000,
            command_queue_bound: 256,
            event_capacity: 1024,
            load_on_start: true,
            form_title: "Add a car".to_string(),
            submit_label: "Add".to_string(),
        }
    }
}

impl ClientConfig {
    /// Defaults with any `CARSYNC_*` environment overrides applied.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().with_overrides(|var| std::env::var(var).ok())
    }

    /// Applies overrides looked up through `lookup`.
    pub fn with_overrides(
        mut self,
        lookup: impl Fn(&'static str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        if let Some(v) = lookup(ENV_BASE_URL) {
            self.base_url = v;
        }
        if let Some(v) = lookup(ENV_COLLECTION) {
            self.collection = v;
        }
        if let Some(v) = lookup(ENV_TIMEOUT_MS) {
            self.request_timeout_ms = v.trim().parse().map_err(|_| ConfigError::InvalidEnv {
                var: ENV_TIMEOUT_MS,
                value: v.clone(),
            })?;
        }
        Ok(self)
    }

    /// Chrome the form shows while creating.
    pub fn default_chrome(&self) -> FormChrome {
        FormChrome {
            title: self.form_title.clone(),
            submit_label: self.submit_label.clone(),
        }
    }
}
