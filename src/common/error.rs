//! Error types for the scenario suite
//!
//! Error messages name the file, step or placeholder involved so a failed
//! run can be fixed without reading the source.

use std::io;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the scenario suite
#[derive(Error, Debug)]
pub enum Error {
    // === Configuration Errors ===
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid configuration file: {0}")]
    ConfigParse(String),

    #[error("Failed to read file '{path}': {error}")]
    FileRead { path: String, error: String },

    // === Scenario Errors ===
    #[error("Failed to parse scenario '{source_name}': {message}")]
    ScenarioParse {
        source_name: String,
        message: String,
    },

    #[error("Unknown placeholder '{{{0}}}'. Known: username, firstName, lastName, email, password, phone")]
    UnknownPlaceholder(String),

    // === HTTP Errors ===
    #[error("Invalid base URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("HTTP request {method} {path} failed: {source}")]
    Http {
        method: String,
        path: String,
        #[source]
        source: reqwest::Error,
    },

    // === Schema Errors ===
    #[error("Schema '{0}' not found in schema directory or bundled resources")]
    SchemaNotFound(String),

    #[error("Schema '{name}' is not a valid JSON schema: {reason}")]
    SchemaInvalid { name: String, reason: String },

    // === IO Errors ===
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    // === Serialization Errors ===
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // === Test Errors ===
    #[error("Test assertion failed: {0}")]
    TestAssertion(String),
}

impl Error {
    /// Create a scenario parse error
    pub fn scenario_parse(source_name: &str, message: impl ToString) -> Self {
        Self::ScenarioParse {
            source_name: source_name.to_string(),
            message: message.to_string(),
        }
    }

    /// Create an HTTP transport error for a request
    pub fn http(method: &str, path: &str, source: reqwest::Error) -> Self {
        Self::Http {
            method: method.to_string(),
            path: path.to_string(),
            source,
        }
    }

    /// Create an invalid URL error
    pub fn invalid_url(url: &str, reason: impl ToString) -> Self {
        Self::InvalidUrl {
            url: url.to_string(),
            reason: reason.to_string(),
        }
    }
}
