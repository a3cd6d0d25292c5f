//! Line parser for M3U documents
//!
//! Reconstructs an ordered entry sequence from loosely specified,
//! line-oriented input. The parser is an explicit two-state machine over one
//! piece of state, the pending metadata line: `#EXTINF` opens (or reopens) it,
//! further directives attach to it, and the next URL line closes it out into
//! an [`Entry`]. It never fails on malformed input; anything it cannot place
//! is counted and skipped.

pub mod attributes;

use tracing::debug;

use crate::models::{EXTINF_TAG, Entry, HEADER_TAG, ParsedPlaylist};

/// Parser policy knobs.
#[derive(Debug, Clone, Copy)]
pub struct ParserOptions {
    /// Emit an [`Entry`] for a URL line with no preceding `#EXTINF`.
    /// Deployed playlists disagree on whether these are meaningful; default
    /// is to accept them.
    pub accept_bare_urls: bool,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            accept_bare_urls: true,
        }
    }
}

enum ParserState {
    Idle,
    AwaitingUrl {
        extinf: String,
        directives: Vec<String>,
    },
}

fn is_extinf(line: &str) -> bool {
    line.len() >= EXTINF_TAG.len() && line[..EXTINF_TAG.len()].eq_ignore_ascii_case(EXTINF_TAG)
}

fn is_header(line: &str) -> bool {
    line.strip_prefix(HEADER_TAG)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with(' '))
}

/// Parse one decoded document into its header and entries.
///
/// Blank and whitespace-only lines are dropped. A header-only or empty
/// document parses to zero entries; that is not an error.
pub fn parse_playlist(content: &str, options: ParserOptions) -> ParsedPlaylist {
    let mut playlist = ParsedPlaylist::default();
    let mut state = ParserState::Idle;

    for raw in content.lines() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }

        if is_extinf(line) {
            // A metadata line with no URL described no stream; tolerate the
            // malformed input by dropping it in favour of the new one.
            if let ParserState::AwaitingUrl { extinf, .. } = &state {
                debug!("dropping unterminated metadata line: {extinf}");
            }
            state = ParserState::AwaitingUrl {
                extinf: line.to_string(),
                directives: Vec::new(),
            };
        } else if line.starts_with('#') {
            match &mut state {
                ParserState::AwaitingUrl { directives, .. } => {
                    // A stray header between metadata and URL is not an entry
                    // directive; re-emitting it would yield a second header
                    // line in the output.
                    if is_header(line) {
                        playlist.skipped_directives += 1;
                    } else {
                        directives.push(line.to_string());
                    }
                }
                ParserState::Idle => {
                    if is_header(line) {
                        if playlist.header.is_none() {
                            playlist.header = Some(line.to_string());
                        }
                    } else {
                        playlist.skipped_directives += 1;
                    }
                }
            }
        } else {
            match std::mem::replace(&mut state, ParserState::Idle) {
                ParserState::AwaitingUrl { extinf, directives } => {
                    playlist.entries.push(Entry {
                        extinf: Some(extinf),
                        extra_directives: directives,
                        stream_url: line.to_string(),
                        source_order: playlist.entries.len(),
                    });
                }
                ParserState::Idle => {
                    if options.accept_bare_urls {
                        playlist.entries.push(Entry {
                            extinf: None,
                            extra_directives: Vec::new(),
                            stream_url: line.to_string(),
                            source_order: playlist.entries.len(),
                        });
                    } else {
                        debug!("discarding bare URL without metadata: {line}");
                    }
                }
            }
        }
    }

    if let ParserState::AwaitingUrl { extinf, .. } = state {
        debug!("dropping trailing metadata line without URL: {extinf}");
    }

    playlist
}
