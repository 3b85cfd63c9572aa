//! Error types for loading record sets and table configuration.
//!
//! The table component itself never fails; these cover the collaborators
//! around it (file/URL loading, schema files, CLI filter specs).

use std::io;
use std::path::PathBuf;

/// Failure while loading rows from a data source.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// Reading a local file failed.
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// An HTTP request failed or returned an unreadable body.
    #[error("request to {url} failed: {message}")]
    Http { url: String, message: String },

    /// The input was not valid JSON.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The input was not valid CSV.
    #[error("invalid CSV: {0}")]
    Csv(#[from] csv::Error),

    /// JSON parsed, but is not a list of records.
    #[error("unexpected JSON shape: {0}")]
    Shape(&'static str),

    /// The loader thread went away without reporting a result.
    #[error("background load stopped before returning rows")]
    Interrupted,

    /// The loader thread could not be started.
    #[error("failed to start loader thread: {0}")]
    Spawn(#[source] io::Error),
}

/// Failure while reading table configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Reading the schema file failed.
    #[error("failed to read schema {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The schema file is not valid JSON or has unknown keys.
    #[error("invalid schema: {0}")]
    Json(#[from] serde_json::Error),

    /// A `--filter` argument could not be parsed.
    #[error("invalid filter spec {0:?}: expected NAME[=OPTION,...]")]
    FilterSpec(String),
}
