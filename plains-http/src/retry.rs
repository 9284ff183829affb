use reqwest::StatusCode;
use reqwest::header::{HeaderMap, RETRY_AFTER};
use std::time::Duration;

const BASE_DELAY_MS: u64 = 200;
const MAX_SHIFT: u32 = 16;
/// Floor for 429 responses that carry no `Retry-After`.
const RATE_LIMIT_FLOOR: Duration = Duration::from_millis(1100);

/// Exponential delay before retry number `attempt` (1-based).
pub(crate) fn backoff(attempt: usize) -> Duration {
    let shift = (attempt.saturating_sub(1) as u32).min(MAX_SHIFT);
    Duration::from_millis(BASE_DELAY_MS.saturating_mul(1 << shift))
}

/// Whether a response with `status` may be retried at all.
pub(crate) fn is_retryable(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}

/// Delay before retrying a retryable status: `Retry-After` seconds when the
/// server sent them, else backoff (floored for 429).
pub(crate) fn status_delay(status: StatusCode, headers: &HeaderMap, attempt: usize) -> Duration {
    let retry_after = headers
        .get(RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok());
    match retry_after {
        Some(secs) => Duration::from_secs(secs),
        None if status == StatusCode::TOO_MANY_REQUESTS => backoff(attempt).max(RATE_LIMIT_FLOOR),
        None => backoff(attempt),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    #[test]
    fn backoff_doubles() {
        assert_eq!(backoff(1), Duration::from_millis(200));
        assert_eq!(backoff(2), Duration::from_millis(400));
        assert_eq!(backoff(4), Duration::from_millis(1600));
    }

    #[test]
    fn only_rate_limits_and_server_errors_retry() {
        assert!(is_retryable(StatusCode::TOO_MANY_REQUESTS));
        assert!(is_retryable(StatusCode::BAD_GATEWAY));
        assert!(!is_retryable(StatusCode::NOT_FOUND));
    }

    #[test]
    fn retry_after_is_honoured() {
        let mut h = HeaderMap::new();
        h.insert(RETRY_AFTER, HeaderValue::from_static("3"));
        assert_eq!(
            status_delay(StatusCode::SERVICE_UNAVAILABLE, &h, 1),
            Duration::from_secs(3)
        );
    }

    #[test]
    fn rate_limit_without_header_is_floored() {
        let h = HeaderMap::new();
        assert_eq!(
            status_delay(StatusCode::TOO_MANY_REQUESTS, &h, 1),
            RATE_LIMIT_FLOOR
        );
        assert_eq!(
            status_delay(StatusCode::INTERNAL_SERVER_ERROR, &h, 1),
            Duration::from_millis(200)
        );
    }
}
