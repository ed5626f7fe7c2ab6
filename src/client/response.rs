//! Captured HTTP response data and envelope classification.
//!
//! Every response is read fully into an [`HttpResponseData`] before
//! classification, so errors can carry the raw transport result without
//! re-reading a consumed stream.

use std::collections::HashMap;

use crate::client::errors::{CaptureError, ContentTypeError, JsonDecodeError, RemoteError};

/// The envelope status value that marks a successful call.
const STAT_OK: &str = "ok";

/// The raw result of an HTTP exchange: status code, headers, and body
/// bytes, captured once.
#[derive(Debug, Clone)]
pub struct HttpResponseData {
    /// The HTTP status code.
    pub code: u16,
    /// Response headers, keys lowercased (headers may have multiple
    /// values).
    pub headers: HashMap<String, Vec<String>>,
    /// The raw response body.
    pub body: Vec<u8>,
}

impl HttpResponseData {
    /// Captures a response from its parts.
    #[must_use]
    pub fn new(code: u16, headers: HashMap<String, Vec<String>>, body: Vec<u8>) -> Self {
        Self {
            code,
            headers,
            body,
        }
    }

    /// Returns the first value of a header, looked up case-insensitively.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_lowercase())
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// Returns the response media type with any parameters (such as
    /// `; charset=utf-8`) and surrounding whitespace stripped.
    #[must_use]
    pub fn content_type(&self) -> String {
        self.header("content-type")
            .unwrap_or_default()
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_string()
    }

    /// Returns `true` if the media type is one of the accepted JSON types.
    #[must_use]
    pub fn is_json(&self) -> bool {
        matches!(self.content_type().as_str(), "application/json" | "text/json")
    }
}

/// Converts reqwest headers into the captured multimap form, lowercasing
/// keys.
pub(crate) fn parse_headers(headers: &reqwest::header::HeaderMap) -> HashMap<String, Vec<String>> {
    let mut result: HashMap<String, Vec<String>> = HashMap::new();
    for (name, value) in headers {
        let key = name.as_str().to_lowercase();
        let value = value.to_str().unwrap_or_default().to_string();
        result.entry(key).or_default().push(value);
    }
    result
}

/// Classifies a captured response into a payload or a typed error.
///
/// A non-JSON media type is a content-type error, an unparsable body is a
/// decode error, and a parsed envelope whose `stat` field is not `"ok"` is
/// a remote error. Each error keeps the captured response data.
pub(crate) fn classify(data: HttpResponseData) -> Result<serde_json::Value, CaptureError> {
    if !data.is_json() {
        return Err(ContentTypeError { response: data }.into());
    }

    let payload: serde_json::Value = match serde_json::from_slice(&data.body) {
        Ok(payload) => payload,
        Err(source) => {
            return Err(JsonDecodeError {
                response: data,
                source,
            }
            .into())
        }
    };

    if payload.get("stat").and_then(serde_json::Value::as_str) == Some(STAT_OK) {
        Ok(payload)
    } else {
        Err(RemoteError::from_envelope(payload, data).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn json_response(content_type: &str, body: &str) -> HttpResponseData {
        let mut headers = HashMap::new();
        headers.insert(
            "content-type".to_string(),
            vec![content_type.to_string()],
        );
        HttpResponseData::new(200, headers, body.as_bytes().to_vec())
    }

    #[test]
    fn test_content_type_strips_parameters_and_whitespace() {
        let data = json_response(" application/json ; charset=UTF-8", "{}");
        assert_eq!(data.content_type(), "application/json");
        assert!(data.is_json());
    }

    #[test]
    fn test_text_json_is_accepted() {
        assert!(json_response("text/json", "{}").is_json());
    }

    #[test]
    fn test_html_is_not_json() {
        assert!(!json_response("text/html", "<html></html>").is_json());
    }

    #[test]
    fn test_classify_success_envelope() {
        let data = json_response("application/json", r#"{"stat":"ok","total_count":3}"#);
        let payload = classify(data).unwrap();
        assert_eq!(payload["total_count"], 3);
    }

    #[test]
    fn test_classify_error_envelope() {
        let body = r#"{"stat":"error","code":400,"error":"invalid_request","error_description":"bad filter","request_id":"abc123"}"#;
        let err = classify(json_response("application/json", body)).unwrap_err();

        match err {
            CaptureError::Remote(remote) => {
                assert_eq!(remote.code, 400);
                assert_eq!(remote.kind, "invalid_request");
                assert_eq!(remote.description, "bad filter");
                assert_eq!(remote.request_id.as_deref(), Some("abc123"));
                assert_eq!(remote.response.code, 200);
            }
            other => panic!("expected Remote, got {other:?}"),
        }
    }

    #[test]
    fn test_classify_missing_stat_is_remote_error() {
        let err = classify(json_response("application/json", "{}")).unwrap_err();
        assert!(matches!(err, CaptureError::Remote(_)));
    }

    #[test]
    fn test_classify_decode_failure_keeps_raw_body() {
        let err = classify(json_response("application/json", "not json")).unwrap_err();
        match err {
            CaptureError::Decode(decode) => {
                assert_eq!(decode.response.body, b"not json");
            }
            other => panic!("expected Decode, got {other:?}"),
        }
    }

    #[test]
    fn test_classify_unexpected_content_type_keeps_raw_body() {
        let err = classify(json_response("text/html", "<html></html>")).unwrap_err();
        match err {
            CaptureError::ContentType(content) => {
                assert_eq!(content.response.body, b"<html></html>");
            }
            other => panic!("expected ContentType, got {other:?}"),
        }
    }
}
