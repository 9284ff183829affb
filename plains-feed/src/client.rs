use crate::types::{Feed, FeedResponse, RawArticle};
use plains_http::{HttpClient, HttpError, RequestOpts};
use reqwest::StatusCode;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

/// Why a feed could not be loaded. The `Display` form is what the reader sees.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// Non-2xx response, e.g. "HTTP 404 Not Found", or "HTTP 599" when the
    /// status has no reason phrase.
    #[error("HTTP {status}{}", reason_suffix(.status_text))]
    Http { status: u16, status_text: String },
    #[error("network error: {0}")]
    Network(String),
    #[error("invalid feed response: {0}")]
    Parse(String),
    #[error("invalid endpoint: {0}")]
    Endpoint(String),
}

fn reason_suffix(status_text: &str) -> String {
    if status_text.is_empty() {
        String::new()
    } else {
        format!(" {status_text}")
    }
}

impl FetchError {
    pub fn http(status: StatusCode) -> Self {
        FetchError::Http {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or_default().to_string(),
        }
    }
}

impl From<HttpError> for FetchError {
    fn from(err: HttpError) -> Self {
        match err {
            HttpError::Api { status, .. } => FetchError::http(status),
            HttpError::Network(msg) => FetchError::Network(msg),
            HttpError::Decode(msg, _) => FetchError::Parse(msg),
            HttpError::Url(msg) | HttpError::Build(msg) => FetchError::Endpoint(msg),
        }
    }
}

/// Client for the agronomy content endpoint.
#[derive(Clone)]
pub struct FeedApi {
    http: HttpClient,
    retries: usize,
}

impl FeedApi {
    /// `endpoint` is the full feed URL; the request goes to it unchanged.
    pub fn new(endpoint: &str) -> Result<Self, FetchError> {
        let http = HttpClient::new(endpoint)?;
        Ok(Self { http, retries: 0 })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.http = self.http.with_timeout(timeout);
        self
    }

    /// Retries apply to 429/5xx and transport failures only. Zero by default.
    pub fn with_retries(mut self, retries: usize) -> Self {
        self.retries = retries;
        self
    }

    pub fn endpoint(&self) -> &str {
        self.http.base().as_str()
    }

    /// Fetch the article and tag maps, flattened in document order.
    pub async fn fetch_feed(&self) -> Result<Feed, FetchError> {
        tracing::info!(endpoint = %self.endpoint(), retries = self.retries, "feed.fetch.start");
        let t0 = std::time::Instant::now();

        let opts = RequestOpts {
            retries: Some(self.retries),
            ..Default::default()
        };
        let result = self
            .http
            .get_json::<Value>("", opts)
            .await
            .map_err(FetchError::from)
            .and_then(decode_feed);

        match &result {
            Ok(feed) => tracing::info!(
                articles = feed.articles.len(),
                tags = feed.tags.len(),
                elapsed_ms = t0.elapsed().as_millis() as u64,
                "feed.fetch.done"
            ),
            Err(err) => tracing::warn!(
                error = %err,
                elapsed_ms = t0.elapsed().as_millis() as u64,
                "feed.fetch.failed"
            ),
        }
        result
    }

    pub async fn fetch_articles(&self) -> Result<Vec<RawArticle>, FetchError> {
        self.fetch_feed().await.map(|feed| feed.articles)
    }
}

/// The body must be a JSON object; its maps may be missing or `null`.
pub fn decode_feed(body: Value) -> Result<Feed, FetchError> {
    if !body.is_object() {
        return Err(FetchError::Parse(format!(
            "expected a JSON object, got {}",
            json_kind(&body)
        )));
    }
    let resp: FeedResponse =
        serde_json::from_value(body).map_err(|e| FetchError::Parse(e.to_string()))?;
    Ok(resp.into_feed())
}

fn json_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
