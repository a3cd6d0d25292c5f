//! Reusable utilities shared across the combiner.

pub mod url;

pub use url::UrlUtils;
