use crate::error::{HttpError, error_message, snippet};
use crate::redact;
use crate::retry::{backoff, is_retryable, status_delay};
use reqwest::header::{ACCEPT, HeaderMap};
use reqwest::{Client, Method, Url};
use serde::de::DeserializeOwned;
use std::borrow::Cow;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};
use tokio::time::sleep;

const RAW_ENV: &str = "PLAINS_HTTP_RAW";
const RAW_MAX_BODY: usize = 64 * 1024;
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

fn raw_enabled() -> bool {
    matches!(
        std::env::var(RAW_ENV).as_deref(),
        Ok("1" | "true" | "yes")
    )
}

/// Per-request overrides of the client defaults.
///
/// ```
/// use plains_http::RequestOpts;
/// use std::time::Duration;
///
/// let opts = RequestOpts {
///     timeout: Some(Duration::from_secs(30)),
///     query: Some(vec![("lang", "en".into())]),
///     ..Default::default()
/// };
/// assert_eq!(opts.retries, None);
/// ```
#[derive(Clone, Debug, Default)]
pub struct RequestOpts<'a> {
    pub timeout: Option<Duration>,
    pub retries: Option<usize>,
    pub headers: Option<HeaderMap>,
    pub query: Option<Vec<(&'a str, Cow<'a, str>)>>,
}

#[derive(Clone)]
pub struct HttpClient {
    base: Url,
    inner: Client,
    pub default_timeout: Duration,
    /// Retries for 429/5xx and transport failures. Zero unless raised.
    pub max_retries: usize,
}

/// What one attempt produced.
enum Attempt<T> {
    Done(Result<T, HttpError>),
    Retry { delay: Duration, reason: String },
}

impl HttpClient {
    /// Client rooted at `base`. Relative paths are joined onto it; an empty
    /// path requests `base` itself.
    ///
    /// ```
    /// use plains_http::{HttpClient, HttpError};
    /// use std::time::Duration;
    ///
    /// let client = HttpClient::new("https://api.example.com/v1/agronomy/en")?;
    /// assert_eq!(client.default_timeout, Duration::from_secs(15));
    /// assert_eq!(client.max_retries, 0);
    /// # Ok::<(), HttpError>(())
    /// ```
    pub fn new(base: &str) -> Result<Self, HttpError> {
        let base = Url::parse(base).map_err(|e| HttpError::Url(e.to_string()))?;
        let inner = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .map_err(|e| HttpError::Build(e.to_string()))?;
        Ok(Self {
            base,
            inner,
            default_timeout: Duration::from_secs(15),
            max_retries: 0,
        })
    }

    pub fn with_timeout(mut self, dur: Duration) -> Self {
        self.default_timeout = dur;
        self
    }

    pub fn with_retries(mut self, n: usize) -> Self {
        self.max_retries = n;
        self
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    fn resolve(&self, path: &str) -> Result<Url, HttpError> {
        if path.is_empty() {
            return Ok(self.base.clone());
        }
        self.base
            .join(path)
            .map_err(|e| HttpError::Url(e.to_string()))
    }

    /// GET `path` and decode the 2xx body as `T`.
    pub async fn get_json<T>(&self, path: &str, opts: RequestOpts<'_>) -> Result<T, HttpError>
    where
        T: DeserializeOwned,
    {
        let url = self.resolve(path)?;
        let budget = opts.retries.unwrap_or(self.max_retries);
        let req_id = request_id();

        let mut attempt = 0usize;
        loop {
            match self.attempt_once(&url, &opts, &req_id, attempt, budget).await {
                Attempt::Done(result) => return result,
                Attempt::Retry { delay, reason } => {
                    attempt += 1;
                    tracing::warn!(
                        %req_id,
                        attempt,
                        budget,
                        backoff_ms = delay.as_millis() as u64,
                        %reason,
                        "http.retrying"
                    );
                    sleep(delay).await;
                }
            }
        }
    }

    async fn attempt_once<T>(
        &self,
        url: &Url,
        opts: &RequestOpts<'_>,
        req_id: &str,
        attempt: usize,
        budget: usize,
    ) -> Attempt<T>
    where
        T: DeserializeOwned,
    {
        let can_retry = attempt < budget;
        let timeout = opts.timeout.unwrap_or(self.default_timeout);
        let query: Vec<(&str, &str)> = opts
            .query
            .iter()
            .flatten()
            .map(|(k, v)| (*k, v.as_ref()))
            .collect();

        let mut rb = self
            .inner
            .request(Method::GET, url.clone())
            .timeout(timeout)
            .header(ACCEPT, "application/json");
        if !query.is_empty() {
            rb = rb.query(&query);
        }
        if let Some(headers) = &opts.headers {
            rb = rb.headers(headers.clone());
        }

        tracing::debug!(
            %req_id,
            attempt = attempt + 1,
            host_path = %redact::host_path(url),
            query = ?redact::pairs(query.iter().copied()),
            timeout_ms = timeout.as_millis() as u64,
            "http.request.start"
        );
        if raw_enabled() {
            let curl = redact::curl(&Method::GET, url, &opts.headers.clone().unwrap_or_default());
            tracing::debug!(target: "http.raw", %req_id, %curl, "request");
        }

        let started = Instant::now();
        let transport = |err: reqwest::Error, stage: &str| {
            let message = err.to_string();
            if can_retry {
                return Attempt::Retry {
                    delay: backoff(attempt + 1),
                    reason: format!("{stage}: {message}"),
                };
            }
            tracing::warn!(%req_id, stage, %message, "http.error");
            Attempt::Done(Err(HttpError::Network(message)))
        };

        let resp = match rb.send().await {
            Ok(resp) => resp,
            Err(err) => return transport(err, "send"),
        };
        let status = resp.status();
        let headers = resp.headers().clone();
        let body = match resp.bytes().await {
            Ok(body) => body,
            Err(err) => return transport(err, "body"),
        };

        let server_req_id = headers
            .get("x-request-id")
            .or_else(|| headers.get("x-correlation-id"))
            .and_then(|v| v.to_str().ok())
            .unwrap_or("-")
            .to_string();
        tracing::debug!(
            %req_id,
            %status,
            duration_ms = started.elapsed().as_millis() as u64,
            body_len = body.len(),
            x_request_id = %server_req_id,
            "http.response"
        );
        if raw_enabled() {
            let end = body.len().min(RAW_MAX_BODY);
            tracing::info!(
                target: "http.raw",
                %req_id,
                %status,
                headers = ?redact::headers(&headers),
                body = %String::from_utf8_lossy(&body[..end]),
                truncated = body.len() > RAW_MAX_BODY,
                "response"
            );
        }

        if status.is_success() {
            return Attempt::Done(serde_json::from_slice::<T>(&body).map_err(|e| {
                let snip = snippet(&body);
                tracing::warn!(
                    %req_id,
                    line = e.line(),
                    column = e.column(),
                    error = %e,
                    body_snippet = %snip,
                    "http.decode_error"
                );
                HttpError::Decode(e.to_string(), snip)
            }));
        }

        let message = error_message(&body);
        if can_retry && is_retryable(status) {
            return Attempt::Retry {
                delay: status_delay(status, &headers, attempt + 1),
                reason: format!("{status}: {message}"),
            };
        }
        tracing::warn!(
            %req_id,
            %status,
            %message,
            x_request_id = %server_req_id,
            "http.error"
        );
        Attempt::Done(Err(HttpError::Api {
            status,
            message,
            request_id: server_req_id,
        }))
    }
}

/// Local correlation id for log lines; not sent to the server.
fn request_id() -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    format!("r{nanos:x}")
}
