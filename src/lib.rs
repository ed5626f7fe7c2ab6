//! # Capture API Rust SDK
//!
//! A lightly wrapped HTTP client for the Capture entity-management API:
//! form-encoded POST requests in, JSON envelopes out.
//!
//! ## Overview
//!
//! This SDK provides:
//! - A request client merging client-level defaults with per-call
//!   overrides via [`CaptureClient`] and [`ApiRequest`]
//! - Pluggable authorization strategies via [`auth::Authorization`]:
//!   bearer tokens, HMAC-SHA1 signed credentials, and plain form
//!   credentials
//! - A typed error taxonomy via [`CaptureError`], each failure carrying
//!   the captured HTTP response for diagnostics
//! - A filter expression builder via [`filter`] for `entity.find` and
//!   `entity.count` queries
//! - Shared date/timestamp formats via [`datetime`]
//! - A JSON configuration file format housing many client ids via
//!   [`config`]
//!
//! ## Client credentials
//!
//! API requests are usually authorized with client credentials, which add
//! an HMAC-SHA1 signature to each request:
//!
//! ```rust,ignore
//! use capture_api::{ApiRequest, CaptureClient, ClientCredentials, Filter};
//!
//! let creds = ClientCredentials::new("myclientid", "myclientsecret");
//! let mut client = CaptureClient::new("https://myapp.example.com", Some(Box::new(creds)));
//! client.params_mut().set("type_name", "user");
//!
//! let payload = client
//!     .execute(
//!         ApiRequest::builder("entity.find")
//!             .param("filter", Filter::new("displayName =", "chareth"))
//!             .build(),
//!     )
//!     .await?;
//!
//! for entity in payload["results"].as_array().into_iter().flatten() {
//!     println!("{entity}");
//! }
//! ```
//!
//! ## Access tokens
//!
//! Requests targeting a single user can be authorized with an access token
//! tied to that user, either as the client default or as a per-call
//! override:
//!
//! ```rust,ignore
//! use capture_api::{AccessToken, ApiRequest, CaptureClient};
//!
//! let token = AccessToken::new("user-access-token");
//! let payload = client
//!     .execute(ApiRequest::builder("entity").auth(token).build())
//!     .await?;
//! let entity = &payload["result"];
//! ```
//!
//! ## Filters
//!
//! Query predicates are built compositionally:
//!
//! ```rust
//! use capture_api::Filter;
//!
//! let filter = Filter::new("gender =", "male").and("age >=", 18);
//! assert_eq!(filter.as_str(), "(gender = 'male') AND (age >= 18)");
//! ```
//!
//! ## Design Principles
//!
//! - **No global state**: clients are instance-based and own their
//!   defaults
//! - **Errors before I/O**: encoding and signing failures are reported
//!   before any network traffic, so no partial request is ever sent
//! - **One round trip per call**: no retries, pooling policy, or rate
//!   limiting at this layer
//! - **Async-first**: designed for use with the Tokio runtime

pub mod auth;
pub mod client;
pub mod config;
pub mod datetime;
pub mod filter;

// Re-export public types at crate root for convenience
pub use auth::{AccessToken, AuthError, Authorization, ClientCredentials, SimpleCredentials};
pub use client::{
    ApiRequest, ApiRequestBuilder, CaptureClient, CaptureError, ContentTypeError,
    HttpResponseData, JsonDecodeError, ParamValue, Params, RemoteError,
};
pub use config::{AppConfig, Config, ConfigError};
pub use filter::{Filter, FilterValue};
