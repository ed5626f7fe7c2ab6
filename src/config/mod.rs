//! Configuration file format housing many client ids.
//!
//! A configuration names one or more API deployments (apps) and the client
//! credentials usable against each. The on-disk format is JSON:
//!
//! ```json
//! {
//!     "apps": {
//!         "production": {
//!             "domain": "myapp.example.com",
//!             "app_id": "abc123",
//!             "default_client": "backend",
//!             "clients": {
//!                 "backend": {"id": "myclientid", "secret": "myclientsecret"}
//!             }
//!         }
//!     }
//! }
//! ```

use std::collections::HashMap;
use std::fs::File;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::auth::ClientCredentials;

/// Errors raised reading or writing a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read or written.
    #[error("config I/O error: {0}")]
    Io(#[from] io::Error),

    /// The configuration was not valid JSON for the expected shape.
    #[error("config parse error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A configuration file: named apps plus app-independent credentials.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Deployments by name.
    #[serde(default)]
    pub apps: HashMap<String, AppConfig>,
    /// Credentials not tied to a specific app.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub clients: HashMap<String, ClientCredentials>,
}

/// One API deployment: its domain and the credentials usable against it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// The deployment domain, with or without a scheme.
    pub domain: String,
    /// The application id, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_id: Option<String>,
    /// Name of the credentials in `clients` to use by default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_client: Option<String>,
    /// Credentials by name.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub clients: HashMap<String, ClientCredentials>,
}

impl Config {
    /// Reads a configuration from a JSON stream.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] on read or parse failure.
    pub fn read_json(reader: impl io::Read) -> Result<Self, ConfigError> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Reads a configuration from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] on open, read, or parse failure.
    pub fn read_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::read_json(File::open(path)?)
    }

    /// Writes the configuration as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] on serialization or write failure.
    pub fn write_json(&self, writer: impl io::Write) -> Result<(), ConfigError> {
        Ok(serde_json::to_writer_pretty(writer, self)?)
    }

    /// Writes the configuration as pretty-printed JSON to a file,
    /// truncating any existing content.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] on create, serialization, or write failure.
    pub fn write_json_file(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        self.write_json(File::create(path)?)
    }

    /// Returns the app configuration named `name`, if present.
    #[must_use]
    pub fn app(&self, name: &str) -> Option<&AppConfig> {
        self.apps.get(name)
    }

    /// Returns the app-independent credentials named `name`, if present.
    #[must_use]
    pub fn credentials(&self, name: &str) -> Option<&ClientCredentials> {
        self.clients.get(name)
    }
}

impl AppConfig {
    /// Resolves the API base URL for this app, prepending `https://` when
    /// the domain carries no scheme.
    #[must_use]
    pub fn base_url(&self) -> String {
        if self.domain.contains("://") {
            self.domain.clone()
        } else {
            format!("https://{}", self.domain)
        }
    }

    /// Returns the credentials named by `default_client`, if both are set.
    #[must_use]
    pub fn default_credentials(&self) -> Option<&ClientCredentials> {
        self.default_client
            .as_ref()
            .and_then(|name| self.clients.get(name))
    }
}
