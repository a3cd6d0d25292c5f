//! Combine multiple M3U/M3U8 playlists into one document.
//!
//! The core is a line parser that reconstructs channel entries from loosely
//! specified playlist text, a merge engine that combines entries from many
//! sources under configurable dedupe/grouping/pinning rules, and a serializer
//! that renders the result with exactly one header line. Fetching and output
//! writing live at the edges in [`sources`] and [`services`].

pub mod config;
pub mod errors;
pub mod generator;
pub mod mapping;
pub mod merge;
pub mod models;
pub mod parser;
pub mod services;
pub mod sources;
pub mod utils;
