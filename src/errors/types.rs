//! Error type definitions for the playlist combiner
//!
//! Source-level failures are recoverable: a source that cannot be fetched or
//! read contributes zero entries and the run continues. Only configuration
//! problems and output-write failures abort the run.

use thiserror::Error;

/// Top-level application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// Source handling errors. Fatal only when every source fails and the
    /// caller chooses to treat that as such; individually these are caught
    /// and logged per source.
    #[error("Source error: {0}")]
    Source(#[from] SourceError),

    /// The output destination could not be written. Always fatal, and
    /// reported distinctly from per-source warnings.
    #[error("Failed to write output '{path}': {source}")]
    OutputWrite {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Configuration errors (unreadable or invalid config file).
    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

/// Per-source fetch/read errors.
#[derive(Error, Debug)]
pub enum SourceError {
    /// The remote returned a non-success status.
    #[error("HTTP status {status} from {url}")]
    HttpStatus { status: u16, url: String },

    /// The HTTP request itself failed (connect, timeout, TLS, ...).
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// A local source path does not exist.
    #[error("Local file not found: {path}")]
    NotFound { path: String },

    /// A local source path exists but could not be read.
    #[error("Read failed: {0}")]
    Io(#[from] std::io::Error),

    /// The link list itself is unreadable.
    #[error("Input links file not found: {path}")]
    LinkListNotFound { path: String },
}
