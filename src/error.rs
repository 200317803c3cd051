//! Error types for the fetch pipeline and configuration layer.
//!
//! Only two things can go wrong in a way the caller needs to know about:
//! the remote index did not give us a usable response ([`RetrievalError`]),
//! or the user handed us settings we refuse to run with ([`ConfigError`]).
//! Individual malformed articles are not errors; the pipeline drops them.

use reqwest::StatusCode;
use std::time::Duration;
use thiserror::Error;

/// Failure to obtain a usable response from a remote article source.
///
/// The dashboard converts these into inline notices and carries on with
/// zero records from the failing source.
#[derive(Error, Debug)]
pub enum RetrievalError {
    /// The request did not complete within the configured timeout.
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// The server answered with a non-success status.
    #[error("unexpected HTTP status {0}")]
    Status(StatusCode),

    /// Connection, TLS or protocol failure.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The body was received but is not a JSON document.
    #[error("response body is not valid JSON: {0}")]
    Body(#[from] serde_json::Error),

    /// The endpoint could not be turned into a request URL.
    #[error("invalid endpoint URL: {0}")]
    Endpoint(#[from] url::ParseError),
}

/// Settings that cannot be used to run the dashboard.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("window must be between 1 and 365 days, got {0}")]
    WindowOutOfRange(u32),

    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },
}
