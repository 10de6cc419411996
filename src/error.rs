//! Library error types.
//!
//! Neither kind ever escapes the binding pass: fetch failures leave the
//! page's fallback markup in place and preference failures only cost the
//! persisted choice. Both are logged where they are absorbed.

use thiserror::Error;

/// Failure loading a JSON document from the site source.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request for {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} returned status {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{location} is not valid JSON: {source}")]
    Parse {
        location: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Failure reading or writing the persisted language preference.
#[derive(Debug, Error)]
pub enum PreferenceError {
    #[error("preference file {path} could not be accessed: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("preference file {path} is corrupt: {source}")]
    Corrupt {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}
