//! Helpers shared by every Plains crate: the tracing bootstrap in
//! [`observability`].
//!
//! # Examples
//!
//! ```rust
//! use plains_common::observability::{LogConfig, LogFormat};
//!
//! let cfg = LogConfig {
//!     format: LogFormat::Json,
//!     ..LogConfig::default()
//! };
//! assert_eq!(cfg.app_name, "plains");
//! ```
pub mod observability;

pub use observability::{init_logging, LogConfig, LogFormat};
