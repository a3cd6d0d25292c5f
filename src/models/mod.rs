//! Core data model for playlist combination
//!
//! An [`Entry`] is one playable stream reconstructed from a source document:
//! its `#EXTINF` metadata line (if any), any auxiliary directives that arrived
//! between the metadata and the URL, and the stream URL itself.

use crate::parser::attributes;

/// Document header tag. Exactly one header line survives into output.
pub const HEADER_TAG: &str = "#EXTM3U";

/// Metadata line tag (matched case-insensitively when parsing).
pub const EXTINF_TAG: &str = "#EXTINF";

/// One channel/stream record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Raw `#EXTINF` line, verbatim from the source document.
    pub extinf: Option<String>,
    /// Auxiliary directive lines (`#EXTVLCOPT`, `#EXTHTTP`, ...) in source
    /// order. Always emitted immediately before `stream_url`.
    pub extra_directives: Vec<String>,
    /// The non-directive line locating the stream. Never rewritten unless an
    /// annotation step is explicitly enabled.
    pub stream_url: String,
    /// Monotonic fetch-order index, assigned by the merge engine. Stable
    /// tie-break for ordering.
    pub source_order: usize,
}

impl Entry {
    /// The free-text display name: everything after the last comma of the
    /// metadata line. Empty when there is no metadata line or no comma.
    pub fn display_name(&self) -> &str {
        self.extinf
            .as_deref()
            .map(attributes::display_name)
            .unwrap_or("")
    }

    /// The `group-title` attribute of the metadata line, if present and
    /// non-empty.
    pub fn group_title(&self) -> Option<String> {
        let extinf = self.extinf.as_deref()?;
        attributes::attribute(extinf, "group-title").filter(|v| !v.is_empty())
    }
}

/// The outcome of parsing one source document.
#[derive(Debug, Clone, Default)]
pub struct ParsedPlaylist {
    /// The document's own `#EXTM3U` line, when it carried one.
    pub header: Option<String>,
    /// Entries in document order.
    pub entries: Vec<Entry>,
    /// Directives that could not be associated with any entry (counted for
    /// diagnostics, never re-emitted).
    pub skipped_directives: usize,
}
