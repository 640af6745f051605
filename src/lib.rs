//! Server-acknowledged car list client with a shared create/edit form.
//!
//! # Examples
//!
//! Driving the synchronous core with [`core::client::CarClient`]:
//! ```
//! use carsync::{
//!     car::CarRecord,
//!     config::ClientConfig,
//!     core::{client::CarClient, form::FormFields},
//!     render::TextRenderer,
//!     transport::{Ack, Call},
//! };
//!
//! let config = ClientConfig::default();
//! let mut client = CarClient::new(TextRenderer::new(Vec::new()), config.default_chrome());
//! client
//!     .apply(Ack::Fetched(vec![CarRecord::new("1", "Ford", 120)]))
//!     .expect("load");
//!
//! let call = client.prepare_submit(FormFields::new("Audi", "200")).expect("valid");
//! assert!(matches!(call, Call::Create(_)));
//! client
//!     .apply(Ack::Created(CarRecord::new("2", "Audi", 200)))
//!     .expect("create");
//! assert_eq!(client.store().len(), 2);
//! ```
//!
//! Runtime usage against an HTTP collection:
//! ```no_run
//! use std::sync::Arc;
//!
//! use carsync::{
//!     config::ClientConfig,
//!     core::form::FormFields,
//!     render::TextRenderer,
//!     runtime::handle::spawn_client,
//!     transport::http::HttpTransport,
//! };
//!
//! # #[tokio::main]
//! # async fn main() {
//! let config = ClientConfig::from_env().expect("config");
//! let transport = HttpTransport::new(&config).expect("transport");
//! let handle = spawn_client(Arc::new(transport), TextRenderer::new(std::io::stdout()), &config);
//! handle.submit(FormFields::new("Audi", "200")).await.expect("submit");
//! handle.shutdown().await.expect("shutdown");
//! # }
//! ```
#![deny(missing_docs)]

/// Car domain records, payloads, and patches.
pub mod car;
/// Client configuration and environment overrides.
pub mod config;
/// Record store, edit mode, form, and client orchestration.
pub mod core;
/// Renderer abstraction and plain-text renderer.
pub mod render;
/// Single-writer runtime handle and events.
pub mod runtime;
/// Transport abstraction with HTTP and SQLite implementations.
pub mod transport;
/// Shared primitive types.
pub mod types;
