//! Playlist serializer
//!
//! Renders a finalized merge result back to M3U text: the header line first,
//! then per entry its metadata line, its directive lines, and its URL, with
//! no blank lines and a trailing line break. Grouped output gets one inert
//! section-marker comment per group; the marker deliberately does not use the
//! `#EXT` extension prefix so no player mistakes it for a directive.

use crate::merge::{MergedBody, MergedPlaylist};
use crate::models::Entry;

fn push_entry(out: &mut String, entry: &Entry) {
    if let Some(extinf) = &entry.extinf {
        out.push_str(extinf);
        out.push('\n');
    }
    for directive in &entry.extra_directives {
        out.push_str(directive);
        out.push('\n');
    }
    out.push_str(&entry.stream_url);
    out.push('\n');
}

fn push_group_marker(out: &mut String, label: &str) {
    out.push_str(&format!("# ===== {label} =====\n"));
}

/// Render the merged playlist to output text.
pub fn render(playlist: &MergedPlaylist) -> String {
    let mut out = String::new();
    out.push_str(&playlist.header);
    out.push('\n');

    if let Some(pinned) = &playlist.pinned {
        push_entry(&mut out, pinned);
    }

    match &playlist.body {
        MergedBody::Flat(entries) => {
            for entry in entries {
                push_entry(&mut out, entry);
            }
        }
        MergedBody::Grouped(groups) => {
            for (label, entries) in groups {
                push_group_marker(&mut out, label);
                for entry in entries {
                    push_entry(&mut out, entry);
                }
            }
        }
    }

    out
}
