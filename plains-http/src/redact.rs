//! Secret-free renderings of requests for logs.
use reqwest::header::HeaderMap;
use reqwest::{Method, Url};

pub(crate) const REDACTED: &str = "<redacted>";

const SECRET_KEYS: &[&str] = &[
    "access_token",
    "api_key",
    "auth",
    "authorization",
    "bearer",
    "client_secret",
    "cookie",
    "key",
    "secret",
    "token",
];

pub(crate) fn is_secret(name: &str) -> bool {
    SECRET_KEYS
        .iter()
        .any(|secret| name.eq_ignore_ascii_case(secret))
}

fn shown(name: &str, value: &str) -> String {
    if is_secret(name) {
        REDACTED.to_string()
    } else {
        value.to_string()
    }
}

pub(crate) fn pairs<'a, I>(pairs: I) -> Vec<(String, String)>
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.to_string(), shown(k, v)))
        .collect()
}

pub(crate) fn headers(h: &HeaderMap) -> Vec<(String, String)> {
    h.iter()
        .map(|(k, v)| (k.as_str().to_string(), shown(k.as_str(), v.to_str().unwrap_or(""))))
        .collect()
}

/// `host/path` without scheme or query.
pub(crate) fn host_path(url: &Url) -> String {
    format!("{}{}", url.host_str().unwrap_or("-"), url.path())
}

/// A curl line reproducing the request, secrets replaced.
pub(crate) fn curl(method: &Method, url: &Url, hdrs: &HeaderMap) -> String {
    let mut line = format!("curl -X{method}");
    for (name, value) in headers(hdrs) {
        line.push_str(&format!(" -H '{name}: {}'", value.replace('\'', r"'\''")));
    }
    let query: Vec<String> = url
        .query_pairs()
        .map(|(k, v)| format!("{k}={}", shown(&k, &v)))
        .collect();
    let mut target = format!("{}://{}", url.scheme(), host_path(url));
    if !query.is_empty() {
        target.push('?');
        target.push_str(&query.join("&"));
    }
    line.push_str(&format!(" '{target}'"));
    line
}
