//! Unified error types for the crib workspace.
//!
//! Every failure a widget can hit is contained to that widget: the scheduler
//! logs these errors and keeps going, so none of them is fatal to the
//! dashboard as a whole.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type shared across the workspace.
#[derive(Debug, Error)]
pub enum CribError {
    /// Fetching widget data from the metrics service failed.
    ///
    /// Covers transport errors, non-success HTTP statuses and payloads that
    /// could not be decoded.
    #[error("fetch failed for {url}: {message}")]
    Fetch {
        /// Endpoint that was requested.
        url: String,
        /// Description of the failure.
        message: String,
    },

    /// A series that needs at least one value was empty.
    #[error("no data available for {target}")]
    MissingData {
        /// Render target that received the empty series.
        target: String,
    },

    /// A sample carried a value that is not a number.
    #[error("malformed sample at row {row}: {raw:?} is not numeric")]
    MalformedSample {
        /// Zero-based row of the sample in its dataset.
        row: usize,
        /// Raw value as received.
        raw: String,
    },

    /// An I/O operation failed.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// Path where the I/O error occurred.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// A configuration value is invalid.
    #[error("invalid configuration: {message}")]
    Config {
        /// Description of the invalid configuration.
        message: String,
    },

    /// A required resource was not found.
    #[error("{kind} not found: {id}")]
    NotFound {
        /// Type of the missing resource.
        kind: &'static str,
        /// Identifier of the missing resource.
        id: String,
    },

    /// JSON serialization or deserialization failed.
    #[error("serialization error: {source}")]
    Serialization {
        /// Underlying serialization error.
        #[from]
        source: serde_json::Error,
    },

    /// YAML deserialization failed.
    #[error("YAML error: {source}")]
    Yaml {
        /// Underlying YAML error.
        #[from]
        source: serde_yaml::Error,
    },
}

impl CribError {
    /// Returns `true` for errors caused by the data source rather than
    /// by the data itself.
    #[must_use]
    pub const fn is_fetch(&self) -> bool {
        matches!(self, Self::Fetch { .. })
    }
}

/// Convenience alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, CribError>;
