//! HTTP transport integration tests.
//!
//! Starts an axum fake of the car collection and exercises it with
//! `HttpTransport`.

use std::sync::{Arc, Mutex};

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, put},
};
use serde_json::{Value, json};

use carsync::{
    car::CarDraft,
    config::ClientConfig,
    core::{client::ClientError, form::FormFields},
    render::TextRenderer,
    runtime::handle::{RuntimeError, spawn_client},
    transport::{Transport, TransportError, http::HttpTransport},
};

#[derive(Default)]
struct Collection {
    docs: Vec<Value>,
    next: u32,
}

type Shared = Arc<Mutex<Collection>>;

async fn list(State(db): State<Shared>) -> impl IntoResponse {
    Json(Value::Array(db.lock().unwrap().docs.clone()))
}

async fn create(State(db): State<Shared>, Json(body): Json<Value>) -> impl IntoResponse {
    let mut db = db.lock().unwrap();
    db.next += 1;
    let doc = json!({
        "_id": format!("oid{}", db.next),
        "make": body["make"],
        "bhp": body["bhp"],
        "__v": 0,
    });
    db.docs.push(doc.clone());
    (StatusCode::CREATED, Json(doc))
}

async fn update(
    State(db): State<Shared>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    let mut db = db.lock().unwrap();
    match db.docs.iter_mut().find(|d| d["_id"] == id.as_str()) {
        Some(doc) => {
            doc["make"] = body["make"].clone();
            doc["bhp"] = body["bhp"].clone();
            // Mongo-style acknowledgement instead of the document.
            (StatusCode::OK, Json(json!({"ok": 1, "nModified": 1}))).into_response()
        }
        None => (StatusCode::NOT_FOUND, "no such car").into_response(),
    }
}

async fn remove(State(db): State<Shared>, Path(id): Path<String>) -> impl IntoResponse {
    let mut db = db.lock().unwrap();
    let before = db.docs.len();
    db.docs.retain(|d| d["_id"] != id.as_str());
    if db.docs.len() == before {
        StatusCode::NOT_FOUND
    } else {
        StatusCode::NO_CONTENT
    }
}

/// Bind to port 0 and return the base URL plus the shared collection.
async fn start_server() -> (String, Shared) {
    let db: Shared = Arc::new(Mutex::new(Collection::default()));
    db.lock().unwrap().docs.push(json!({"_id": "oid0", "make": "Ford", "bhp": 120, "__v": 0}));

    let app = Router::new()
        .route("/cars", get(list).post(create))
        .route("/cars/:id", put(update).delete(remove))
        .with_state(Arc::clone(&db));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{addr}"), db)
}

fn config_for(base: &str) -> ClientConfig {
    ClientConfig {
        base_url: base.to_string(),
        load_on_start: false,
        ..ClientConfig::default()
    }
}

#[tokio::test]
async fn collection_url_joins_base_and_collection() {
    let transport = HttpTransport::new(&config_for("http://localhost:3333/")).unwrap();
    assert_eq!(transport.collection_url().as_str(), "http://localhost:3333/cars");
}

#[tokio::test]
async fn crud_against_rest_collection() {
    let (base, db) = start_server().await;
    let transport = HttpTransport::new(&config_for(&base)).unwrap();

    let all = transport.fetch_all().await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].id, "oid0");
    assert_eq!(all[0].extra.get("__v"), Some(&json!(0)));

    let created = transport
        .create(&CarDraft {
            make: "Audi".to_string(),
            bhp: 200,
        })
        .await
        .unwrap();
    assert_eq!(created.id, "oid1");
    assert_eq!((created.make.as_str(), created.bhp), ("Audi", 200));

    let echoed = transport
        .update(
            "oid0",
            &CarDraft {
                make: "Ford".to_string(),
                bhp: 150,
            },
        )
        .await
        .unwrap();
    assert_eq!(echoed, None, "acknowledgement body is not a car");

    transport.delete("oid1").await.unwrap();
    let docs = db.lock().unwrap().docs.clone();
    assert_eq!(docs, vec![json!({"_id": "oid0", "make": "Ford", "bhp": 150, "__v": 0})]);
}

#[tokio::test]
async fn error_status_carries_body() {
    let (base, _db) = start_server().await;
    let transport = HttpTransport::new(&config_for(&base)).unwrap();

    let err = transport
        .update(
            "missing",
            &CarDraft {
                make: "Ghost".to_string(),
                bhp: 1,
            },
        )
        .await
        .unwrap_err();
    match err {
        TransportError::Status { status, message } => {
            assert_eq!(status, 404);
            assert_eq!(message, "no such car");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn runtime_session_over_http() {
    let (base, _db) = start_server().await;
    let config = config_for(&base);
    let transport = HttpTransport::new(&config).unwrap();
    let handle = spawn_client(Arc::new(transport), TextRenderer::new(std::io::sink()), &config);

    handle.load().await.unwrap();
    handle.toggle_edit("oid0").await.unwrap();
    handle.submit(FormFields::new("Ford", "150")).await.unwrap();

    let snap = handle.snapshot().await.unwrap();
    assert_eq!(snap.len(), 1);
    assert_eq!(snap[0].bhp, 150);
    assert_eq!(snap[0].extra.get("__v"), Some(&json!(0)));

    handle.delete("oid9").await.unwrap_err();
    assert_eq!(handle.snapshot().await.unwrap(), snap);

    handle.shutdown().await.unwrap();
}

#[tokio::test]
async fn unreachable_server_surfaces_transport_error() {
    let config = config_for("http://127.0.0.1:9");
    let transport = HttpTransport::new(&config).unwrap();
    let handle = spawn_client(Arc::new(transport), TextRenderer::new(std::io::sink()), &config);

    let err = handle.load().await.unwrap_err();
    assert!(matches!(
        err,
        RuntimeError::Client(ClientError::Transport(TransportError::Http(_)))
    ));
    assert!(handle.snapshot().await.unwrap().is_empty());

    handle.shutdown().await.unwrap();
}
