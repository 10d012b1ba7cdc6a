//! Typed Rust client for the Redlink marketing-communications REST API.
//!
//! Three layers: a `domain` layer of pure request-building and validation
//! logic (URI templates, payload schemas, the response envelope), a `client`
//! layer holding credentials and the pluggable HTTP transport, and an `api`
//! layer exposing one module per resource family (contacts, groups,
//! campaigns, emails, SMS, push, blacklists).
//!
//! Every argument and payload is validated locally before a request is
//! built; a validation failure never reaches the network.
//!
//! ```rust,no_run
//! use redlink::{Auth, RedlinkClient};
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), redlink::RedlinkError> {
//!     let client = RedlinkClient::new(Auth::api_key("...")?)?;
//!     let response = client
//!         .sms()
//!         .send(json!({
//!             "sender": "INFO",
//!             "message": "hello",
//!             "phoneNumbers": ["+48123123123"]
//!         }))
//!         .await?;
//!     let envelope = response.envelope()?;
//!     println!("uniqId: {}", envelope.meta.uniq_id);
//!     Ok(())
//! }
//! ```
#![forbid(unsafe_code)]

pub mod api;
pub mod client;
pub mod domain;

pub use api::{Page, Sorting};
pub use client::{
    ApiResponse, Auth, ExternalIdGenerator, HistoryEntry, HttpTransport,
    RandomExternalIdGenerator, RedlinkClient, RedlinkClientBuilder, RedlinkError, RequestHistory,
};
pub use domain::{
    DeserializationError, DeserializationErrorKind, Envelope, ErrorRecord, Meta, ValidationError,
};
