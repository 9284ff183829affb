//! JSON-over-HTTP for the feed client: GET with a timeout, an opt-in retry
//! budget, and `tracing` events that never carry secrets.
//!
//! ```no_run
//! # async fn demo() -> Result<(), plains_http::HttpError> {
//! let client = plains_http::HttpClient::new("https://api.example.com/v1/")?;
//! let got: serde_json::Value = client
//!     .get_json("items", plains_http::RequestOpts::default())
//!     .await?;
//! # Ok(()) }
//! ```
//!
//! Events: `http.request.start`, `http.response`, `http.retrying`,
//! `http.error`, `http.decode_error`. Setting `PLAINS_HTTP_RAW=1` adds a curl
//! line per request and the full (capped) response body under target
//! `http.raw`.

mod client;
mod error;
mod redact;
mod retry;

pub use client::{HttpClient, RequestOpts};
pub use error::HttpError;
