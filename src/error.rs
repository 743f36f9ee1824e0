//! Error types for ds-relay
//!
//! Every failure the integration layer can produce is one variant of [`Error`].
//! None of them escape the [`DownloadStation`](crate::DownloadStation) boundary
//! except the authentication failure of [`DownloadStation::connect`](crate::DownloadStation::connect),
//! which the host process treats as fatal.

use std::time::Duration;
use thiserror::Error;

/// Result type alias for ds-relay operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for ds-relay
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed or empty input link (no network call was made)
    #[error("invalid link {link:?}: {reason}")]
    InvalidLink {
        /// The link as submitted
        link: String,
        /// Why it was rejected
        reason: String,
    },

    /// A resolution strategy needs credentials that are not configured
    #[error("missing credentials for {host}")]
    MissingCredentials {
        /// Host whose strategy lacks credentials
        host: String,
    },

    /// The file-hosting API explicitly rejected the link
    #[error("{host} rejected the link: {reason}")]
    UpstreamResolution {
        /// Host whose API rejected the link
        host: String,
        /// Reason reported by the remote
        reason: String,
    },

    /// Login or session renewal failed
    #[error("authentication failed: {reason}")]
    Auth {
        /// Human-readable cause
        reason: String,
    },

    /// Vendor-reported failure of a task API call
    #[error("{message}")]
    RemoteTask {
        /// Vendor error code
        code: i64,
        /// Message from the error catalog
        message: String,
    },

    /// Connectivity failure or HTTP-level error
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Response body could not be decoded into the expected structure
    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// A caller-supplied deadline elapsed before the operation finished
    #[error("operation timed out after {0:?}")]
    Timeout(Duration),

    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "nas.host")
        key: Option<String>,
    },
}

impl Error {
    /// Shorthand for a configuration error on a given key
    pub(crate) fn config(key: &str, message: impl Into<String>) -> Self {
        Error::Config {
            message: message.into(),
            key: Some(key.to_string()),
        }
    }

    /// Whether the error was caused by connectivity rather than content
    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Transport(_) | Error::Timeout(_))
    }
}
