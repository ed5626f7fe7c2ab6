//! The Capture API request client.
//!
//! [`CaptureClient`] orchestrates each call: it merges client-level default
//! headers and parameters with call-level overrides, applies the resolved
//! authorization strategy, form-encodes the parameter set, performs exactly
//! one POST round trip, and classifies the response into a JSON payload or
//! a typed [`CaptureError`].
//!
//! # Concurrency
//!
//! The client performs no locking. Each call snapshots the default
//! header/parameter maps before merging, so concurrent read-only calls are
//! safe; mutating defaults via [`CaptureClient::params_mut`] or
//! [`CaptureClient::headers_mut`] while other calls are in flight requires
//! external synchronization. No retries, timeouts, or background tasks live
//! at this layer; timeouts belong to the transport.

mod errors;
mod params;
mod request;
mod response;

pub use errors::{CaptureError, ContentTypeError, JsonDecodeError, RemoteError};
pub use params::{ParamValue, Params};
pub use request::{ApiRequest, ApiRequestBuilder};
pub use response::HttpResponseData;

use std::collections::HashMap;

use reqwest::Url;

use crate::auth::Authorization;

/// A client for one Capture API deployment.
///
/// Holds the base URL, the default authorization strategy, and default
/// headers and parameters sent with every call.
///
/// # Example
///
/// ```rust,ignore
/// use capture_api::{CaptureClient, ClientCredentials, ApiRequest};
///
/// let creds = ClientCredentials::new("myclientid", "myclientsecret");
/// let mut client = CaptureClient::new("https://myapp.example.com", Some(Box::new(creds)));
/// client.params_mut().set("type_name", "user");
///
/// let payload = client
///     .execute(ApiRequest::builder("entity.count").build())
///     .await?;
/// println!("total: {}", payload["total_count"]);
/// ```
#[derive(Debug)]
pub struct CaptureClient {
    /// Base URL of the deployment, without a trailing method path.
    base_url: String,
    /// Default authorization strategy; used when a request carries no
    /// override.
    auth: Option<Box<dyn Authorization>>,
    /// Default headers sent with every call.
    headers: HashMap<String, String>,
    /// Default parameters sent with every call.
    params: Params,
    /// The internal reqwest HTTP client.
    http: reqwest::Client,
}

impl CaptureClient {
    /// Creates a client for the deployment at `base_url`.
    ///
    /// `auth` may be `None`, but most API methods require authorization, so
    /// a strategy is generally recommended.
    ///
    /// # Panics
    ///
    /// Panics if the underlying reqwest client cannot be created, which
    /// only happens in unusual circumstances such as TLS initialization
    /// failure.
    #[must_use]
    pub fn new(base_url: impl Into<String>, auth: Option<Box<dyn Authorization>>) -> Self {
        let http = reqwest::Client::builder()
            .use_rustls_tls()
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: base_url.into(),
            auth,
            headers: HashMap::new(),
            params: Params::new(),
            http,
        }
    }

    /// Returns the base URL for this client.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the parameters sent with every call.
    #[must_use]
    pub const fn params(&self) -> &Params {
        &self.params
    }

    /// Mutable access to the parameters sent with every call.
    ///
    /// Defaults should be set before the client is shared across tasks;
    /// see the module documentation on concurrency.
    pub fn params_mut(&mut self) -> &mut Params {
        &mut self.params
    }

    /// Returns the headers sent with every call.
    #[must_use]
    pub const fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    /// Mutable access to the headers sent with every call.
    pub fn headers_mut(&mut self) -> &mut HashMap<String, String> {
        &mut self.headers
    }

    /// Executes an API call and returns the decoded payload.
    ///
    /// Exactly one network round trip is performed; the response body is
    /// always fully consumed. Merge, authorization, and encoding failures
    /// are reported before any I/O occurs.
    ///
    /// # Errors
    ///
    /// Returns [`CaptureError`] for endpoint construction failures,
    /// parameter-encoding failures, authorization failures, transport
    /// failures, and every non-success response classification.
    pub async fn execute(&self, request: ApiRequest) -> Result<serde_json::Value, CaptureError> {
        let url = self.endpoint(&request.method)?;

        // Snapshot defaults, overlay call-level entries.
        let mut headers = self.headers.clone();
        for (key, value) in &request.headers {
            headers.insert(key.clone(), value.clone());
        }
        let merged = self.params.merged(&request.params);
        let mut values = merged.form_values()?;

        let auth = request.auth.as_deref().or(self.auth.as_deref());
        if let Some(auth) = auth {
            auth.authorize(&url, &mut headers, &mut values)?;
        }

        tracing::debug!(endpoint = %url, params = values.len(), "dispatching capture request");

        let mut builder = self.http.post(url).form(&values);
        for (key, value) in &headers {
            builder = builder.header(key, value);
        }

        let res = builder.send().await?;
        let code = res.status().as_u16();
        let res_headers = response::parse_headers(res.headers());
        let body = res.bytes().await?.to_vec();

        response::classify(HttpResponseData::new(code, res_headers, body))
    }

    /// Convenience wrapper: executes `method` with call-level `params` and
    /// no header or authorization overrides.
    ///
    /// # Errors
    ///
    /// See [`CaptureClient::execute`].
    pub async fn call(
        &self,
        method: &str,
        params: Params,
    ) -> Result<serde_json::Value, CaptureError> {
        self.execute(ApiRequest::builder(method).params(params).build())
            .await
    }

    /// Resolves the absolute endpoint, inserting a separating slash only
    /// when the method path does not already begin with one.
    fn endpoint(&self, method: &str) -> Result<Url, CaptureError> {
        let mut endpoint = self.base_url.clone();
        if !method.starts_with('/') {
            endpoint.push('/');
        }
        endpoint.push_str(method);
        Url::parse(&endpoint).map_err(|err| CaptureError::InvalidEndpoint {
            url: endpoint,
            reason: err.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_inserts_separating_slash() {
        let client = CaptureClient::new("https://x", None);
        let url = client.endpoint("entity.count").unwrap();
        assert_eq!(url.as_str(), "https://x/entity.count");
    }

    #[test]
    fn test_endpoint_keeps_existing_slash() {
        let client = CaptureClient::new("https://x", None);
        let url = client.endpoint("/entity.count").unwrap();
        assert_eq!(url.as_str(), "https://x/entity.count");
    }

    #[test]
    fn test_endpoint_rejects_invalid_base() {
        let client = CaptureClient::new("not a url", None);
        let err = client.endpoint("entity.count").unwrap_err();
        assert!(matches!(err, CaptureError::InvalidEndpoint { .. }));
    }

    #[test]
    fn test_default_mutation_between_calls() {
        let mut client = CaptureClient::new("https://x", None);
        client.params_mut().set("type_name", "user");
        client
            .headers_mut()
            .insert("X-Tag".to_string(), "sync".to_string());

        assert_eq!(client.params().len(), 1);
        assert_eq!(client.headers().get("X-Tag"), Some(&"sync".to_string()));
    }

    #[test]
    fn test_client_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<CaptureClient>();
    }
}
