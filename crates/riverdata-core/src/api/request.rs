//! Minimal JSON-over-HTTP request layer.
//!
//! The actual network call sits behind the [`Fetch`] trait so callers (and
//! tests) can supply their own transport.

use serde_json::Value;
use tracing::debug;

#[derive(Debug, thiserror::Error)]
pub enum RequestError {
    /// No response was received at all.
    #[error("error fetching resource {url}: {reason}")]
    Network { url: String, reason: String },

    #[error("response not OK: HTTP {status} from {url}")]
    Status { status: u16, url: String },

    #[error("invalid response body from {url}: {reason}")]
    Body { url: String, reason: String },

    #[error("invalid query parameter '{0}'")]
    InvalidQuery(String),
}

impl RequestError {
    /// `RequestNetworkError` when no response was received, otherwise `RequestError`.
    pub fn name(&self) -> &'static str {
        match self {
            RequestError::Network { .. } => "RequestNetworkError",
            _ => "RequestError",
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            RequestError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// What came back from a fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub url: String,
    pub status: u16,
    pub body: String,
}

impl Response {
    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// A decoded JSON body together with the response it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonResponse {
    pub data: Value,
    pub response: Response,
}

/// Transport backend.
pub trait Fetch: Send + Sync {
    /// GET `url` with the given headers. Only failures to obtain any response
    /// at all are errors here; HTTP status is checked by [`request`].
    fn fetch(&self, url: &str, headers: &[(String, String)]) -> Result<Response, RequestError>;
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestOptions {
    pub base_url: String,
    /// Query parameters. Nulls are dropped, `true` becomes a bare key.
    pub params: Vec<(String, Value)>,
    pub headers: Vec<(String, String)>,
}

impl RequestOptions {
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    pub fn param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.push((key.into(), value.into()));
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

fn encode(s: &str) -> String {
    url::form_urlencoded::byte_serialize(s.as_bytes()).collect()
}

/// Build `?a=1&b` from query parameters, or an empty string when none apply.
///
/// Strings and numbers are percent-encoded, `true` adds the bare key, `false`
/// and null are skipped. Arrays and objects are rejected.
pub fn build_query_string(params: &[(String, Value)]) -> Result<String, RequestError> {
    let mut parts = Vec::with_capacity(params.len());
    for (key, value) in params {
        let key_enc = encode(key);
        match value {
            Value::Null | Value::Bool(false) => {}
            Value::Bool(true) => parts.push(key_enc),
            Value::String(s) => parts.push(format!("{key_enc}={}", encode(s))),
            Value::Number(n) => parts.push(format!("{key_enc}={}", encode(&n.to_string()))),
            Value::Array(_) | Value::Object(_) => {
                return Err(RequestError::InvalidQuery(key.clone()));
            }
        }
    }

    if parts.is_empty() {
        Ok(String::new())
    } else {
        Ok(format!("?{}", parts.join("&")))
    }
}

/// Fetch `path` relative to the base URL, failing on a non-2xx status.
pub fn request(
    fetch: &dyn Fetch,
    path: &str,
    options: &RequestOptions,
) -> Result<Response, RequestError> {
    let url = format!(
        "{}{}{}",
        options.base_url,
        path,
        build_query_string(&options.params)?
    );
    debug!(%url, "GET");

    let response = fetch.fetch(&url, &options.headers)?;
    if !response.ok() {
        return Err(RequestError::Status {
            status: response.status,
            url: response.url,
        });
    }
    Ok(response)
}

/// Like [`request`], adding `accept: application/json` unless an accept
/// header is already set, and decoding the body.
pub fn json_request(
    fetch: &dyn Fetch,
    path: &str,
    options: &RequestOptions,
) -> Result<JsonResponse, RequestError> {
    let mut options = options.clone();
    if !options
        .headers
        .iter()
        .any(|(name, _)| name.eq_ignore_ascii_case("accept"))
    {
        options
            .headers
            .insert(0, ("accept".into(), "application/json".into()));
    }

    let response = request(fetch, path, &options)?;
    let data = serde_json::from_str(&response.body).map_err(|e| RequestError::Body {
        url: response.url.clone(),
        reason: e.to_string(),
    })?;
    Ok(JsonResponse { data, response })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Mutex;

    /// Records every request and answers with a fixed response.
    struct StubFetch {
        status: u16,
        body: String,
        seen: Mutex<Vec<(String, Vec<(String, String)>)>>,
    }

    impl StubFetch {
        fn new(status: u16, body: &str) -> Self {
            Self {
                status,
                body: body.into(),
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    impl Fetch for StubFetch {
        fn fetch(&self, url: &str, headers: &[(String, String)]) -> Result<Response, RequestError> {
            self.seen
                .lock()
                .unwrap()
                .push((url.to_string(), headers.to_vec()));
            Ok(Response {
                url: url.to_string(),
                status: self.status,
                body: self.body.clone(),
            })
        }
    }

    struct OfflineFetch;

    impl Fetch for OfflineFetch {
        fn fetch(&self, url: &str, _: &[(String, String)]) -> Result<Response, RequestError> {
            Err(RequestError::Network {
                url: url.to_string(),
                reason: "connection refused".into(),
            })
        }
    }

    fn params(pairs: &[(&str, Value)]) -> Vec<(String, Value)> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.clone())).collect()
    }

    #[test]
    fn test_query_string_skips_null_and_false() {
        let qs = build_query_string(&params(&[
            ("since", Value::Null),
            ("_limit", json!(10)),
            ("_sorted", json!(true)),
            ("today", json!(false)),
        ]))
        .unwrap();
        assert_eq!(qs, "?_limit=10&_sorted");
    }

    #[test]
    fn test_query_string_encodes_values() {
        let qs = build_query_string(&params(&[("since", json!("2023-01-13T20:00:00+01:00"))])).unwrap();
        assert_eq!(qs, "?since=2023-01-13T20%3A00%3A00%2B01%3A00");
    }

    #[test]
    fn test_empty_query_string() {
        assert_eq!(build_query_string(&[]).unwrap(), "");
        assert_eq!(build_query_string(&params(&[("a", Value::Null)])).unwrap(), "");
    }

    #[test]
    fn test_query_string_rejects_objects() {
        let err = build_query_string(&params(&[("bad", json!({ "x": 1 }))])).unwrap_err();
        assert_eq!(err.name(), "RequestError");
    }

    #[test]
    fn test_json_request_adds_accept_header() {
        let fetch = StubFetch::new(200, r#"{"items": []}"#);
        let options = RequestOptions::with_base_url("https://api.test").param("_limit", 2);
        let res = json_request(&fetch, "/id/stations", &options).unwrap();
        assert_eq!(res.data, json!({ "items": [] }));

        let seen = fetch.seen.lock().unwrap();
        assert_eq!(seen[0].0, "https://api.test/id/stations?_limit=2");
        assert_eq!(seen[0].1, vec![("accept".to_string(), "application/json".to_string())]);
    }

    #[test]
    fn test_json_request_keeps_caller_accept_header() {
        let fetch = StubFetch::new(200, "{}");
        let options = RequestOptions::default().header("Accept", "application/ld+json");
        json_request(&fetch, "/x", &options).unwrap();
        let seen = fetch.seen.lock().unwrap();
        assert_eq!(seen[0].1.len(), 1);
        assert_eq!(seen[0].1[0].1, "application/ld+json");
    }

    #[test]
    fn test_non_ok_status_is_request_error() {
        let fetch = StubFetch::new(404, "not found");
        let err = request(&fetch, "/missing", &RequestOptions::default()).unwrap_err();
        assert_eq!(err.name(), "RequestError");
        assert_eq!(err.status(), Some(404));
    }

    #[test]
    fn test_bad_json_is_request_error() {
        let fetch = StubFetch::new(200, "<html>");
        let err = json_request(&fetch, "/x", &RequestOptions::default()).unwrap_err();
        assert!(matches!(err, RequestError::Body { .. }));
        assert_eq!(err.name(), "RequestError");
    }

    #[test]
    fn test_network_failure_is_network_error() {
        let err = request(&OfflineFetch, "/x", &RequestOptions::default()).unwrap_err();
        assert_eq!(err.name(), "RequestNetworkError");
        assert_eq!(err.status(), None);
    }
}
