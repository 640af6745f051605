//! Transport collaborator: the calls the client makes and their results.

/// REST transport over `reqwest`.
pub mod http;
/// Local SQLite-backed transport.
pub mod sqlite;

use async_trait::async_trait;

use crate::{
    car::{CarDraft, CarRecord},
    types::CarId,
};

/// Failed transport call.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Connection, timeout or body read failure.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    /// Non-success status from the endpoint.
    #[error("server responded {status}: {message}")]
    Status {
        /// Status code.
        status: u16,
        /// Response body text.
        message: String,
    },
    /// A body could not be decoded or encoded.
    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),
    /// Local database failure.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    /// Any other failure.
    #[error("{0}")]
    Message(String),
}

/// Result alias for transport calls.
pub type TransportResult<T> = Result<T, TransportError>;

/// Network operations against the remote car collection.
#[async_trait]
pub trait Transport: Send + Sync + 'static {
    /// Whole collection in server order.
    async fn fetch_all(&self) -> TransportResult<Vec<CarRecord>>;
    /// Creates a car and returns it with its assigned id.
    async fn create(&self, payload: &CarDraft) -> TransportResult<CarRecord>;
    /// Returns the updated record when the endpoint sends one back.
    async fn update(&self, id: &str, payload: &CarDraft) -> TransportResult<Option<CarRecord>>;
    /// Deletes the car with `id`.
    async fn delete(&self, id: &str) -> TransportResult<()>;
}

/// A single transport call the client core has decided to make.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    /// GET the collection.
    FetchAll,
    /// POST a new car.
    Create(CarDraft),
    /// PUT over an existing car.
    Update {
        /// Car being replaced.
        id: CarId,
        /// New make and bhp.
        payload: CarDraft,
    },
    /// DELETE a car.
    Delete(CarId),
}

/// Successful result of a [`Call`], carrying what the store needs to apply it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Ack {
    /// The collection as the server returned it.
    Fetched(Vec<CarRecord>),
    /// The created car, id included.
    Created(CarRecord),
    /// The update was accepted.
    Updated {
        /// Car that was updated.
        id: CarId,
        /// Payload that was sent.
        payload: CarDraft,
        /// Response body, when it decoded as a car.
        record: Option<CarRecord>,
    },
    /// The car was deleted.
    Deleted(CarId),
}

impl Call {
    /// Performs the call against `transport`.
    pub async fn execute(self, transport: &dyn Transport) -> TransportResult<Ack> {
        match self {
            Call::FetchAll => transport.fetch_all().await.map(Ack::Fetched),
            Call::Create(payload) => transport.create(&payload).await.map(Ack::Created),
            Call::Update { id, payload } => {
                let record = transport.update(&id, &payload).await?;
                Ok(Ack::Updated {
                    id,
                    payload,
                    record,
                })
            }
            Call::Delete(id) => {
                transport.delete(&id).await?;
                Ok(Ack::Deleted(id))
            }
        }
    }
}
