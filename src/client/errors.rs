//! Error taxonomy for the request pipeline.
//!
//! Response handling ends in exactly one of five terminal states: success,
//! transport failure, decode failure, unexpected content type, or a failure
//! reported by the server's envelope. The failure states map onto
//! [`CaptureError`] variants; each carries enough captured context (status
//! code, headers, raw body) for a caller to log or retry at a higher layer.
//! This layer never retries or swallows.

use thiserror::Error;

use crate::auth::AuthError;
use crate::client::response::HttpResponseData;

/// An error reported by the API in its JSON envelope.
///
/// Constructed only when the body parsed as JSON but the `stat` field was
/// not the success marker.
#[derive(Debug, Error)]
#[error("[{kind}] {description}")]
pub struct RemoteError {
    /// The server-assigned request id, when present.
    pub request_id: Option<String>,
    /// The numeric error code from the envelope.
    pub code: i64,
    /// The symbolic error kind (e.g. `invalid_request`).
    pub kind: String,
    /// The human-readable error description.
    pub description: String,
    /// The full decoded envelope.
    pub payload: serde_json::Value,
    /// The captured HTTP response.
    pub response: HttpResponseData,
}

impl RemoteError {
    /// Builds a remote error from a decoded failure envelope. Missing
    /// envelope fields default to zero values.
    #[must_use]
    pub fn from_envelope(payload: serde_json::Value, response: HttpResponseData) -> Self {
        let request_id = payload
            .get("request_id")
            .and_then(serde_json::Value::as_str)
            .map(String::from);
        let code = payload
            .get("code")
            .and_then(serde_json::Value::as_i64)
            .unwrap_or(0);
        let kind = payload
            .get("error")
            .and_then(serde_json::Value::as_str)
            .unwrap_or_default()
            .to_string();
        let description = payload
            .get("error_description")
            .and_then(serde_json::Value::as_str)
            .unwrap_or_default()
            .to_string();

        Self {
            request_id,
            code,
            kind,
            description,
            payload,
            response,
        }
    }
}

/// The response body claimed to be JSON but failed to parse.
#[derive(Debug, Error)]
#[error("{source}")]
pub struct JsonDecodeError {
    /// The captured HTTP response, including the unparsable body.
    pub response: HttpResponseData,
    /// The underlying JSON parse error.
    #[source]
    pub source: serde_json::Error,
}

/// The response carried a media type other than the accepted JSON types.
#[derive(Debug, Error)]
#[error("unexpected content-type {:?}", self.response.content_type())]
pub struct ContentTypeError {
    /// The captured HTTP response.
    pub response: HttpResponseData,
}

/// Unified error type for API calls.
///
/// The variants are exhaustive and mutually exclusive at the point of
/// response handling; parameter-encoding and signing failures are reported
/// before any network I/O.
#[derive(Debug, Error)]
pub enum CaptureError {
    /// The transport layer could not complete the exchange.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The body claimed to be JSON but failed to parse.
    #[error(transparent)]
    Decode(#[from] JsonDecodeError),

    /// The body was not JSON at all.
    #[error(transparent)]
    ContentType(#[from] ContentTypeError),

    /// The envelope's status field signaled failure.
    #[error(transparent)]
    Remote(#[from] RemoteError),

    /// Credential injection failed before the request was sent.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// A parameter value could not be serialized to JSON text.
    #[error("parameter encoding failed: {0}")]
    Encode(#[from] serde_json::Error),

    /// The base URL and method path did not form a valid endpoint URL.
    #[error("invalid endpoint URL {url:?}: {reason}")]
    InvalidEndpoint {
        /// The URL text that failed to parse.
        url: String,
        /// The parse failure description.
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn response_with_content_type(mime: &str) -> HttpResponseData {
        let mut headers = HashMap::new();
        headers.insert("content-type".to_string(), vec![mime.to_string()]);
        HttpResponseData::new(200, headers, Vec::new())
    }

    #[test]
    fn test_remote_error_message_has_kind_and_description() {
        let err = RemoteError {
            request_id: None,
            code: 400,
            kind: "invalid_kittens".to_string(),
            description: "nyan nyan".to_string(),
            payload: serde_json::json!({}),
            response: response_with_content_type("application/json"),
        };
        assert_eq!(err.to_string(), "[invalid_kittens] nyan nyan");
    }

    #[test]
    fn test_content_type_error_message_quotes_mime() {
        let err = ContentTypeError {
            response: response_with_content_type("application/goboom"),
        };
        assert_eq!(
            err.to_string(),
            r#"unexpected content-type "application/goboom""#
        );
    }

    #[test]
    fn test_capture_error_is_std_error() {
        let err: Box<dyn std::error::Error> = Box::new(CaptureError::InvalidEndpoint {
            url: "::".to_string(),
            reason: "relative URL without a base".to_string(),
        });
        assert!(err.to_string().contains("invalid endpoint URL"));
    }
}
