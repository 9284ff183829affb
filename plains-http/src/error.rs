use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

const SNIPPET_MAX: usize = 500;

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("invalid URL: {0}")]
    Url(String),
    #[error("client setup failed: {0}")]
    Build(String),
    #[error("network error: {0}")]
    Network(String),
    /// Message from serde, then a snippet of the offending body.
    #[error("decode error: {0} (body: {1})")]
    Decode(String, String),
    #[error("server returned {status}: {message} (request id {request_id})")]
    Api {
        status: StatusCode,
        message: String,
        request_id: String,
    },
}

/// Best human-readable message in an error body: `error.message`, then
/// `message`, `detail`, or a string `error`, else a body snippet.
pub(crate) fn error_message(body: &[u8]) -> String {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum ErrorBody {
        Nested { error: Detail },
        Flat {
            #[serde(default)]
            message: Option<String>,
            #[serde(default)]
            detail: Option<String>,
            #[serde(default)]
            error: Option<String>,
        },
    }
    #[derive(Deserialize)]
    struct Detail {
        message: String,
    }

    let found = match serde_json::from_slice::<ErrorBody>(body) {
        Ok(ErrorBody::Nested { error }) => Some(error.message),
        Ok(ErrorBody::Flat {
            message,
            detail,
            error,
        }) => [message, detail, error]
            .into_iter()
            .flatten()
            .find(|m| !m.is_empty()),
        Err(_) => None,
    };
    found.unwrap_or_else(|| snippet(body))
}

/// Lossy UTF-8 of `body`, cut on a char boundary with a trailing `...`.
pub(crate) fn snippet(body: &[u8]) -> String {
    let text = String::from_utf8_lossy(body);
    if text.len() <= SNIPPET_MAX {
        return text.into_owned();
    }
    let cut = (0..=SNIPPET_MAX)
        .rev()
        .find(|&i| text.is_char_boundary(i))
        .unwrap_or(0);
    format!("{}...", &text[..cut])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_message_wins() {
        let body = br#"{"error":{"message":"feed offline"}}"#;
        assert_eq!(error_message(body), "feed offline");
    }

    #[test]
    fn flat_fields_in_order() {
        assert_eq!(error_message(br#"{"message":"m","detail":"d"}"#), "m");
        assert_eq!(error_message(br#"{"message":"","detail":"d"}"#), "d");
        assert_eq!(error_message(br#"{"error":"nope"}"#), "nope");
    }

    #[test]
    fn non_json_body_becomes_snippet() {
        assert_eq!(error_message(b"<h1>502</h1>"), "<h1>502</h1>");
        assert_eq!(error_message(b""), "");
    }

    #[test]
    fn long_body_is_cut_on_char_boundary() {
        let body = "ü".repeat(400);
        let snip = snippet(body.as_bytes());
        assert!(snip.ends_with("..."));
        assert!(snip.len() <= SNIPPET_MAX + 3);
    }

    #[test]
    fn api_error_display() {
        let err = HttpError::Api {
            status: StatusCode::NOT_FOUND,
            message: "no such feed".into(),
            request_id: "-".into(),
        };
        assert_eq!(
            err.to_string(),
            "server returned 404 Not Found: no such feed (request id -)"
        );
    }
}
