//! Authorization strategies for Capture API requests.
//!
//! Every request is authorized by a value implementing [`Authorization`],
//! which injects credential evidence into the outgoing URL, headers, and
//! form values. Three strategies are provided:
//!
//! - [`AccessToken`]: a bearer token tied to a single user, injected as an
//!   `Authorization: OAuth <token>` header.
//! - [`ClientCredentials`]: an id/secret pair used to sign the request with
//!   HMAC-SHA1, injected as `Date` and `Authorization: Signature <id>:<sig>`
//!   headers.
//! - [`SimpleCredentials`]: the same id/secret pair sent as plain
//!   `client_id`/`client_secret` form parameters, without signing.
//!
//! New strategies are added by implementing [`Authorization`] on a new type;
//! the request client dispatches through the trait and never inspects the
//! concrete strategy.
//!
//! # Example
//!
//! ```rust
//! use capture_api::{AccessToken, CaptureClient};
//!
//! let token = AccessToken::new("user-access-token");
//! let client = CaptureClient::new("https://myapp.example.com", Some(Box::new(token)));
//! ```

mod credentials;

pub use credentials::{ClientCredentials, RequestSignature};

use std::collections::HashMap;
use std::fmt;

use thiserror::Error;

pub use reqwest::Url;

/// Errors raised while injecting credentials into a request.
///
/// Authorization failures are reported before any network I/O, so an error
/// here guarantees no partial or unauthenticated request was sent.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AuthError {
    /// The signing key was rejected by the HMAC implementation.
    #[error("signing key rejected: {0}")]
    InvalidKey(#[from] hmac::digest::InvalidLength),
}

/// A pluggable strategy for authorizing an outgoing API request.
///
/// Implementations mutate the header and form-value collections that will be
/// sent; the client invokes the strategy exactly once per request, after
/// parameter merging and before the request is dispatched.
pub trait Authorization: fmt::Debug + Send + Sync {
    /// Adds credentials to the headers and form values for a request to
    /// `url`.
    ///
    /// # Errors
    ///
    /// Returns an [`AuthError`] if credential material cannot be applied;
    /// the request is not sent in that case.
    fn authorize(
        &self,
        url: &Url,
        headers: &mut HashMap<String, String>,
        values: &mut HashMap<String, String>,
    ) -> Result<(), AuthError>;
}

/// An opaque bearer token authorizing requests on behalf of a single user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    /// Wraps a raw access token string.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }
}

impl From<&str> for AccessToken {
    fn from(token: &str) -> Self {
        Self::new(token)
    }
}

impl Authorization for AccessToken {
    fn authorize(
        &self,
        _url: &Url,
        headers: &mut HashMap<String, String>,
        _values: &mut HashMap<String, String>,
    ) -> Result<(), AuthError> {
        headers.insert("Authorization".to_string(), format!("OAuth {}", self.0));
        Ok(())
    }
}

/// Client credentials sent as plain form parameters, without signing.
///
/// Some endpoints accept the id and secret directly as `client_id` and
/// `client_secret` values instead of a signed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimpleCredentials(ClientCredentials);

impl SimpleCredentials {
    /// Creates simple credentials from an id/secret pair.
    pub fn new(id: impl Into<String>, secret: impl Into<String>) -> Self {
        Self(ClientCredentials::new(id, secret))
    }
}

impl From<ClientCredentials> for SimpleCredentials {
    fn from(creds: ClientCredentials) -> Self {
        Self(creds)
    }
}

impl Authorization for SimpleCredentials {
    fn authorize(
        &self,
        _url: &Url,
        _headers: &mut HashMap<String, String>,
        values: &mut HashMap<String, String>,
    ) -> Result<(), AuthError> {
        values.insert("client_id".to_string(), self.0.id.clone());
        values.insert("client_secret".to_string(), self.0.secret.clone());
        Ok(())
    }
}
