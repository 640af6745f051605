//! JSON-over-HTTP transport for a REST-style car collection.
//!
//! Routes, relative to the configured collection URL:
//!
//! - `GET /`: full collection
//! - `POST /`: create, body is the payload, response is the created record
//! - `PUT /:id`: update, response may or may not be the updated record
//! - `DELETE /:id`: delete

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, Url};

use crate::{
    car::{CarDraft, CarRecord},
    config::ClientConfig,
};

use super::{Transport, TransportError, TransportResult};

/// [`Transport`] backed by a `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    collection_url: Url,
}

impl HttpTransport {
    /// Builds a transport for `{base_url}/{collection}` with the configured timeout.
    pub fn new(config: &ClientConfig) -> TransportResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()?;
        let collection_url = collection_url(&config.base_url, &config.collection)?;
        Ok(Self {
            client,
            collection_url,
        })
    }

    /// URL of the collection resource.
    pub fn collection_url(&self) -> &Url {
        &self.collection_url
    }

    fn record_url(&self, id: &str) -> TransportResult<Url> {
        let mut url = self.collection_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                TransportError::Message(format!("cannot-be-a-base url: {}", self.collection_url))
            })?
            .push(id);
        Ok(url)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn fetch_all(&self) -> TransportResult<Vec<CarRecord>> {
        let resp = self.client.get(self.collection_url.clone()).send().await?;
        let body = checked(resp).await?.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }

    async fn create(&self, payload: &CarDraft) -> TransportResult<CarRecord> {
        tracing::debug!(make = %payload.make, bhp = payload.bhp, "POST car");
        let resp = self
            .client
            .post(self.collection_url.clone())
            .json(payload)
            .send()
            .await?;
        let body = checked(resp).await?.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }

    async fn update(&self, id: &str, payload: &CarDraft) -> TransportResult<Option<CarRecord>> {
        tracing::debug!(id, make = %payload.make, bhp = payload.bhp, "PUT car");
        let resp = self
            .client
            .put(self.record_url(id)?)
            .json(payload)
            .send()
            .await?;
        let body = checked(resp).await?.bytes().await?;
        if body.is_empty() {
            return Ok(None);
        }
        match serde_json::from_slice::<CarRecord>(&body) {
            Ok(rec) => Ok(Some(rec)),
            Err(err) => {
                tracing::debug!(id, %err, "PUT response is not a car record; merging payload");
                Ok(None)
            }
        }
    }

    async fn delete(&self, id: &str) -> TransportResult<()> {
        tracing::debug!(id, "DELETE car");
        let resp = self.client.delete(self.record_url(id)?).send().await?;
        checked(resp).await?;
        Ok(())
    }
}

fn collection_url(base_url: &str, collection: &str) -> TransportResult<Url> {
    let mut url = Url::parse(base_url)
        .map_err(|err| TransportError::Message(format!("invalid base url {base_url:?}: {err}")))?;
    url.path_segments_mut()
        .map_err(|_| TransportError::Message(format!("cannot-be-a-base url: {base_url}")))?
        .pop_if_empty()
        .push(collection);
    Ok(url)
}

async fn checked(resp: Response) -> TransportResult<Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let message = resp.text().await.unwrap_or_default();
    Err(TransportError::Status {
        status: status.as_u16(),
        message,
    })
}
