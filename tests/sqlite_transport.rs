use std::sync::Arc;

use tempfile::TempDir;

use carsync::{
    car::{CarDraft, CarRecord},
    config::ClientConfig,
    core::{edit::EditMode, form::FormFields},
    render::TextRenderer,
    runtime::handle::spawn_client,
    transport::{Transport, TransportError, sqlite::SqliteTransport},
};

fn draft(make: &str, bhp: i64) -> CarDraft {
    CarDraft {
        make: make.to_string(),
        bhp,
    }
}

#[tokio::test]
async fn crud_round_trips_through_the_database_file() {
    let tmp = TempDir::new().expect("tmp");
    let db_path = tmp.path().join("cars.db");

    {
        let transport = SqliteTransport::open(&db_path).expect("open");
        transport
            .seed(vec![CarRecord::new("1", "Ford", 120)])
            .await
            .expect("seed");

        let audi = transport.create(&draft("Audi", 200)).await.expect("create");
        assert_eq!(audi, CarRecord::new("2", "Audi", 200));

        let updated = transport
            .update("1", &draft("Ford", 150))
            .await
            .expect("update");
        assert_eq!(updated, Some(CarRecord::new("1", "Ford", 150)));
    }

    let reopened = SqliteTransport::open(&db_path).expect("reopen");
    assert_eq!(
        reopened.fetch_all().await.expect("fetch"),
        vec![
            CarRecord::new("1", "Ford", 150),
            CarRecord::new("2", "Audi", 200),
        ]
    );

    reopened.delete("1").await.expect("delete");
    assert_eq!(
        reopened.fetch_all().await.expect("fetch"),
        vec![CarRecord::new("2", "Audi", 200)]
    );
}

#[tokio::test]
async fn unknown_ids_are_rejected_with_404() {
    let transport = SqliteTransport::open_in_memory().expect("open");

    let err = transport.update("9", &draft("Ghost", 1)).await.unwrap_err();
    assert!(matches!(err, TransportError::Status { status: 404, .. }));

    let err = transport.delete("9").await.unwrap_err();
    assert!(matches!(err, TransportError::Status { status: 404, .. }));
}

#[tokio::test]
async fn seeded_server_fields_survive_fetch() {
    let transport = SqliteTransport::open_in_memory().expect("open");
    let mut ford = CarRecord::new("a1", "Ford", 120);
    ford.extra.insert("__v".to_string(), serde_json::json!(0));
    transport.seed(vec![ford.clone()]).await.expect("seed");

    assert_eq!(transport.fetch_all().await.expect("fetch"), vec![ford]);
}

#[tokio::test]
async fn runtime_drives_a_full_session_against_sqlite() {
    let transport = SqliteTransport::open_in_memory().expect("open");
    transport
        .seed(vec![CarRecord::new("1", "Ford", 120)])
        .await
        .expect("seed");

    let config = ClientConfig {
        load_on_start: false,
        ..ClientConfig::default()
    };
    let handle = spawn_client(
        Arc::new(transport.clone()),
        TextRenderer::new(std::io::sink()),
        &config,
    );

    handle.load().await.expect("load");
    handle
        .submit(FormFields::new("Audi", "200"))
        .await
        .expect("create");
    handle.toggle_edit("1").await.expect("edit");
    handle
        .submit(FormFields::new("Ford", "150"))
        .await
        .expect("update");
    handle.delete("2").await.expect("delete");

    let snap = handle.snapshot().await.expect("snapshot");
    assert_eq!(snap, vec![CarRecord::new("1", "Ford", 150)]);
    assert_eq!(handle.edit_mode().await.expect("mode"), EditMode::Idle);
    assert_eq!(transport.fetch_all().await.expect("server"), snap);

    handle.shutdown().await.expect("shutdown");
}
