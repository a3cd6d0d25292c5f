//! Merge engine
//!
//! Accumulates entries from successive parsed documents and produces one
//! final ordered sequence. All mutable accumulation state (seen-URL set,
//! group map, pin slot, order counter) is owned by one [`MergeEngine`]
//! instance per run; nothing is process-wide, so repeated runs in the same
//! process never leak state into each other.

use std::collections::{BTreeMap, HashSet};

use tracing::debug;

use crate::mapping;
use crate::models::{Entry, HEADER_TAG, ParsedPlaylist};

/// Merge policy for one run.
#[derive(Debug, Clone)]
pub struct MergeOptions {
    /// Drop entries whose final stream URL was already accepted. Global and
    /// cross-source; first occurrence wins.
    pub dedupe: bool,
    /// Emit grouped output (lexicographic group order, display-name order
    /// within each group) instead of strict arrival order.
    pub group: bool,
    /// Display name of the entry to emit first, if any.
    pub pin_name: Option<String>,
    /// Keep the pinned entry in its group bucket as well as first position.
    pub pin_in_groups: bool,
    /// Bucket label for entries without a discoverable group.
    pub default_group: String,
}

impl Default for MergeOptions {
    fn default() -> Self {
        Self {
            dedupe: true,
            group: false,
            pin_name: None,
            pin_in_groups: false,
            default_group: "Other".to_string(),
        }
    }
}

/// Final entry ordering, flat or grouped.
#[derive(Debug)]
pub enum MergedBody {
    Flat(Vec<Entry>),
    Grouped(BTreeMap<String, Vec<Entry>>),
}

/// The finalized merge result handed to the serializer. Entries are
/// immutable from here on.
#[derive(Debug)]
pub struct MergedPlaylist {
    /// The resolved header line, always present.
    pub header: String,
    /// The pinned entry, emitted before everything else.
    pub pinned: Option<Entry>,
    pub body: MergedBody,
}

impl MergedPlaylist {
    pub fn entry_count(&self) -> usize {
        let body = match &self.body {
            MergedBody::Flat(entries) => entries.len(),
            MergedBody::Grouped(groups) => groups.values().map(Vec::len).sum(),
        };
        body + usize::from(self.pinned.is_some())
    }

    pub fn is_empty(&self) -> bool {
        self.entry_count() == 0
    }
}

/// Accumulates entries across documents; construct fresh per run.
pub struct MergeEngine {
    options: MergeOptions,
    header: Option<String>,
    header_resolved: bool,
    seen: HashSet<String>,
    entries: Vec<Entry>,
    pinned: Option<Entry>,
    next_order: usize,
}

impl MergeEngine {
    pub fn new(options: MergeOptions) -> Self {
        Self {
            options,
            header: None,
            header_resolved: false,
            seen: HashSet::new(),
            entries: Vec::new(),
            pinned: None,
            next_order: 0,
        }
    }

    /// Accept one parsed (and annotated) document, in source-list order.
    pub fn add_document(&mut self, document: ParsedPlaylist) {
        // The first parsed document resolves the header; every later
        // document's header is discarded regardless of content.
        if !self.header_resolved {
            self.header = document.header.clone();
            self.header_resolved = true;
        }

        for mut entry in document.entries {
            if self.options.dedupe && !self.seen.insert(entry.stream_url.clone()) {
                debug!("dropping duplicate stream URL: {}", entry.stream_url);
                continue;
            }

            entry.source_order = self.next_order;
            self.next_order += 1;

            if self.pinned.is_none()
                && let Some(pin) = &self.options.pin_name
                && entry.display_name() == pin
            {
                if self.options.group && self.options.pin_in_groups {
                    self.pinned = Some(entry.clone());
                } else {
                    self.pinned = Some(entry);
                    continue;
                }
            }

            self.entries.push(entry);
        }
    }

    /// Number of entries accepted so far, the pinned entry included.
    pub fn accepted(&self) -> usize {
        self.entries.len()
            + usize::from(
                self.pinned.is_some() && !(self.options.group && self.options.pin_in_groups),
            )
    }

    /// Resolve final ordering and hand the result to the serializer.
    pub fn finalize(self) -> MergedPlaylist {
        let header = self.header.unwrap_or_else(|| HEADER_TAG.to_string());

        let body = if self.options.group {
            let mut groups: BTreeMap<String, Vec<Entry>> = BTreeMap::new();
            for entry in self.entries {
                let label = mapping::group_label(&entry, &self.options.default_group);
                groups.entry(label).or_default().push(entry);
            }
            for entries in groups.values_mut() {
                entries.sort_by(|a, b| {
                    a.display_name()
                        .cmp(b.display_name())
                        .then(a.source_order.cmp(&b.source_order))
                });
            }
            MergedBody::Grouped(groups)
        } else {
            MergedBody::Flat(self.entries)
        };

        MergedPlaylist {
            header,
            pinned: self.pinned,
            body,
        }
    }
}
