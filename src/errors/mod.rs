//! Centralized error handling
//!
//! The taxonomy is deliberately small: per-source failures are recovered
//! locally (the run is best-effort across unreliable third-party sources),
//! malformed directives degrade to defaults inside the parser and never
//! surface here, and only output/configuration failures are fatal.

pub mod types;

pub use types::*;

/// Convenience type alias for Results using AppError
pub type AppResult<T> = Result<T, AppError>;

/// Convenience type alias for per-source Results
pub type SourceResult<T> = Result<T, SourceError>;
