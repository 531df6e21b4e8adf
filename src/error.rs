//! Error types for bracket loading.
//!
//! Only failures on the match-results table surface here. Auxiliary
//! resources degrade to empty data and are logged instead, and unresolved
//! parent lookups are handled by the layout fallbacks.

use thiserror::Error;

/// Fatal errors that abort a bracket render.
#[derive(Error, Debug)]
pub enum BracketError {
    /// A resource could not be read from disk.
    #[error("read {location}: {source}")]
    Io {
        location: String,
        #[source]
        source: std::io::Error,
    },

    /// A resource could not be fetched over HTTP.
    #[error("fetch {location}: {source}")]
    Fetch {
        location: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a non-success status.
    #[error("fetch {location}: HTTP {status}")]
    Status { location: String, status: u16 },

    /// No location was configured for a required resource.
    #[error("no location configured for {0}")]
    MissingSource(&'static str),

    /// The results table has no header row.
    #[error("results table is empty or has no header row")]
    MissingHeader,

    /// The results table is not valid comma-delimited data.
    #[error("malformed results table: {0}")]
    Csv(#[from] csv::Error),

    /// A JSON config or data file could not be decoded.
    #[error("malformed JSON in {location}: {source}")]
    Json {
        location: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Result type for bracket loading.
pub type BracketResult<T> = Result<T, BracketError>;
