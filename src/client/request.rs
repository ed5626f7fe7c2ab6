//! Per-call request descriptions.
//!
//! An [`ApiRequest`] names the method path to call plus any call-level
//! header and parameter overrides and an optional authorization override.
//! Use [`ApiRequest::builder`] for fluent construction.

use std::collections::HashMap;

use crate::auth::Authorization;
use crate::client::params::{ParamValue, Params};

/// A single API call: a relative method path with call-level overrides.
///
/// # Example
///
/// ```rust
/// use capture_api::{ApiRequest, Params};
/// use serde_json::json;
///
/// let request = ApiRequest::builder("entity.find")
///     .param("type_name", "user")
///     .param("attributes", json!(["displayName"]))
///     .header("X-Request-Tag", "nightly-sync")
///     .build();
/// ```
#[derive(Debug)]
pub struct ApiRequest {
    /// The method path, relative to the client's base URL (with or without
    /// a leading slash).
    pub method: String,
    /// Call-level headers, overriding client defaults on key collision.
    pub headers: HashMap<String, String>,
    /// Call-level parameters, overriding client defaults on key collision.
    pub params: Params,
    /// Authorization override for this call; when `None`, the client's
    /// configured strategy applies.
    pub auth: Option<Box<dyn Authorization>>,
}

impl ApiRequest {
    /// Creates a request for `method` with no overrides.
    pub fn new(method: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            headers: HashMap::new(),
            params: Params::new(),
            auth: None,
        }
    }

    /// Creates a builder for a request to `method`.
    pub fn builder(method: impl Into<String>) -> ApiRequestBuilder {
        ApiRequestBuilder {
            request: Self::new(method),
        }
    }
}

/// Builder for [`ApiRequest`] instances.
#[derive(Debug)]
pub struct ApiRequestBuilder {
    request: ApiRequest,
}

impl ApiRequestBuilder {
    /// Sets a single call-level parameter.
    #[must_use]
    pub fn param(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.request.params.set(key, value);
        self
    }

    /// Replaces all call-level parameters at once.
    #[must_use]
    pub fn params(mut self, params: Params) -> Self {
        self.request.params = params;
        self
    }

    /// Sets a single call-level header.
    #[must_use]
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.request.headers.insert(key.into(), value.into());
        self
    }

    /// Replaces all call-level headers at once.
    #[must_use]
    pub fn headers(mut self, headers: HashMap<String, String>) -> Self {
        self.request.headers = headers;
        self
    }

    /// Overrides the authorization strategy for this call.
    #[must_use]
    pub fn auth(mut self, auth: impl Authorization + 'static) -> Self {
        self.request.auth = Some(Box::new(auth));
        self
    }

    /// Finishes the builder.
    #[must_use]
    pub fn build(self) -> ApiRequest {
        self.request
    }
}
