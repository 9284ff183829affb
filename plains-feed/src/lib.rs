//! Agronomy article feed: fetch, normalize, filter.
//!
//! The pipeline is one fetch producing a [`Feed`] of raw records, a pure
//! [`normalize`] pass producing [`Article`]s, and a pure [`filter`] over them
//! driven by an immutable [`FilterState`].
//!
//! ```
//! use plains_feed::{filter, normalize_all, FilterState, RawArticle};
//! use serde_json::json;
//!
//! let articles = normalize_all(vec![
//!     RawArticle::from_value(json!({ "title": "Soil pH basics", "tags": "Soil" })),
//!     RawArticle::from_value(json!({ "title": "Corn yield", "tags": "Corn" })),
//! ]);
//! let state = FilterState::default().select_tag("Soil");
//! let shown = filter(&articles, &state);
//! assert_eq!(shown.len(), 1);
//! assert_eq!(shown[0].view.title, "Soil pH basics");
//! ```

pub mod client;
pub mod extract;
pub mod filter;
pub mod normalize;
pub mod source;
pub mod text;
pub mod types;

pub use client::{FeedApi, FetchError};
pub use filter::{FilterAction, FilterState, FilterSummary, SearchQuery, filter};
pub use normalize::{Article, NormalizedArticle, normalize, normalize_all};
pub use source::{FeedSource, LoadOutcome, load_feed};
pub use types::{Feed, RawArticle, TagRef};
