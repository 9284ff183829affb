use crate::client::{FeedApi, FetchError};
use crate::types::Feed;
use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

/// Anything that can produce the raw feed once.
#[async_trait]
pub trait FeedSource: Send + Sync {
    async fn fetch_feed(&self) -> Result<Feed, FetchError>;
}

#[async_trait]
impl FeedSource for FeedApi {
    async fn fetch_feed(&self) -> Result<Feed, FetchError> {
        FeedApi::fetch_feed(self).await
    }
}

/// Result of a startup load raced against shutdown.
#[derive(Debug)]
pub enum LoadOutcome {
    Loaded(Feed),
    Failed(FetchError),
    /// The consumer went away first; the response, if any, was dropped.
    Cancelled,
}

/// Fetch once, unless `cancel` fires first.
pub async fn load_feed(source: &dyn FeedSource, cancel: &CancellationToken) -> LoadOutcome {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => {
            tracing::debug!("feed.load.cancelled");
            LoadOutcome::Cancelled
        }
        result = source.fetch_feed() => match result {
            Ok(feed) => LoadOutcome::Loaded(feed),
            Err(err) => LoadOutcome::Failed(err),
        },
    }
}
