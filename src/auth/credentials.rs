//! HMAC-SHA1 request signing with client credentials.
//!
//! Signed requests carry a `Date` header with the signing timestamp and an
//! `Authorization: Signature <client_id>:<signature>` header. The signature
//! is an HMAC-SHA1 digest, base64-encoded, over a canonical string built
//! from the request path, the timestamp, and the final merged form values.
//!
//! # Canonical string
//!
//! The canonical string is the exact byte sequence
//!
//! ```text
//! <url path>\n
//! <timestamp>\n
//! <key>=<value>\n   (one line per form value, sorted)
//! ```
//!
//! where the `key=value` lines are sorted lexicographically by the full
//! `key=value` text and values are deliberately *not* URL-encoded. The
//! server-side verifier depends on this exact construction; the sort step
//! makes signing independent of value-collection iteration order.

use std::collections::HashMap;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha1::Sha1;

use crate::auth::{AuthError, Authorization, Url};

type HmacSha1 = Hmac<Sha1>;

/// Timestamp format embedded in the canonical string and `Date` header:
/// UTC, second precision.
const SIGNING_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// An API client id and secret used to sign requests with HMAC-SHA1.
///
/// The pair deserializes from the same JSON shape the configuration file
/// format uses (`{"id": ..., "secret": ...}`).
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientCredentials {
    /// The client id, sent in the clear in the `Authorization` header.
    pub id: String,
    /// The client secret, used as the HMAC key and never sent.
    pub secret: String,
}

/// The output of signing a request at a fixed instant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestSignature {
    /// The timestamp string embedded in the canonical string; also the value
    /// of the `Date` header.
    pub timestamp: String,
    /// The base64-encoded HMAC-SHA1 digest.
    pub signature: String,
}

impl ClientCredentials {
    /// Creates credentials from an id/secret pair.
    pub fn new(id: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            secret: secret.into(),
        }
    }

    /// Signs a request path and final form-value set at the instant `at`.
    ///
    /// Signing is deterministic: the same path, instant, and value set
    /// always produce a byte-identical signature, regardless of the map's
    /// iteration order.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidKey`] if the HMAC implementation rejects
    /// the secret as a key.
    pub fn sign_at(
        &self,
        path: &str,
        at: DateTime<Utc>,
        values: &HashMap<String, String>,
    ) -> Result<RequestSignature, AuthError> {
        let timestamp = at.format(SIGNING_TIME_FORMAT).to_string();
        let tosign = canonical_string(path, &timestamp, values);
        let signature = hmac_sha1_base64(self.secret.as_bytes(), tosign.as_bytes())?;
        Ok(RequestSignature {
            timestamp,
            signature,
        })
    }
}

impl Authorization for ClientCredentials {
    fn authorize(
        &self,
        url: &Url,
        headers: &mut HashMap<String, String>,
        values: &mut HashMap<String, String>,
    ) -> Result<(), AuthError> {
        let signed = self.sign_at(url.path(), Utc::now(), values)?;
        headers.insert("Date".to_string(), signed.timestamp);
        headers.insert(
            "Authorization".to_string(),
            format!("Signature {}:{}", self.id, signed.signature),
        );
        Ok(())
    }
}

// The secret is an HMAC key; keep it out of debug output.
impl std::fmt::Debug for ClientCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientCredentials")
            .field("id", &self.id)
            .field("secret", &"***")
            .finish()
    }
}

/// Builds the canonical signing string: path, timestamp, then sorted
/// unencoded `key=value` lines, each terminated by a newline.
fn canonical_string(path: &str, timestamp: &str, values: &HashMap<String, String>) -> String {
    let mut pairs: Vec<String> = values.iter().map(|(k, v)| format!("{k}={v}")).collect();
    pairs.sort_unstable();

    let mut tosign = String::with_capacity(path.len() + timestamp.len() + 2);
    tosign.push_str(path);
    tosign.push('\n');
    tosign.push_str(timestamp);
    tosign.push('\n');
    for pair in &pairs {
        tosign.push_str(pair);
        tosign.push('\n');
    }
    tosign
}

/// Computes a base64-encoded HMAC-SHA1 digest of `message` keyed by
/// `secret`.
fn hmac_sha1_base64(secret: &[u8], message: &[u8]) -> Result<String, AuthError> {
    let mut mac = HmacSha1::new_from_slice(secret)?;
    mac.update(message);
    Ok(BASE64.encode(mac.finalize().into_bytes()))
}
