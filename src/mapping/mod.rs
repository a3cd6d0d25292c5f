//! Per-entry annotation steps
//!
//! Optional transforms applied to each parsed document before it reaches the
//! merge engine: forced group assignment from a source→label override table,
//! catch-up query augmentation, and folding of per-entry HTTP request
//! directives into the stream URL. Every step is total over an entry; when
//! its precondition does not hold it is a no-op.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::{Entry, ParsedPlaylist};
use crate::parser::attributes;
use crate::utils::UrlUtils;

/// Query parameter appended by catch-up augmentation.
pub const CATCHUP_PARAM: &str = "catchup-days=7";

/// One source→group override: the first override whose `pattern` is a
/// substring of the source identifier supplies the group label.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupOverride {
    /// Substring matched against the source URL or path.
    pub pattern: String,
    /// Group label written into matching sources' entries.
    pub label: String,
}

/// Annotation configuration, one instance per run.
#[derive(Debug, Clone, Default)]
pub struct MappingOptions {
    /// Source→group overrides, first match wins. Applied only when grouping
    /// is enabled.
    pub group_overrides: Vec<GroupOverride>,
    /// Label for entries with no discoverable group.
    pub default_group: String,
    /// Append [`CATCHUP_PARAM`] to HTTP(S) stream URLs.
    pub catchup: bool,
    /// Fold request-header directives into a pipe-delimited URL suffix.
    pub fold_headers: bool,
}

/// The group label an entry files under: its `group-title` attribute, else
/// the default label.
pub fn group_label(entry: &Entry, default_group: &str) -> String {
    entry
        .group_title()
        .unwrap_or_else(|| default_group.to_string())
}

/// The override label for a source identifier, if any pattern matches.
pub fn override_label<'a>(source_id: &str, overrides: &'a [GroupOverride]) -> Option<&'a str> {
    overrides
        .iter()
        .find(|o| source_id.contains(&o.pattern))
        .map(|o| o.label.as_str())
}

/// Apply the configured steps to every entry of one parsed document.
///
/// `grouping` gates the override table: forced group assignment only makes
/// sense when the output is grouped, and leaves metadata untouched otherwise.
pub fn annotate_document(
    playlist: &mut ParsedPlaylist,
    source_id: &str,
    options: &MappingOptions,
    grouping: bool,
) {
    let forced_label = if grouping {
        override_label(source_id, &options.group_overrides)
    } else {
        None
    };

    for entry in &mut playlist.entries {
        if let Some(label) = forced_label {
            assign_group(entry, label);
        }
        if options.catchup {
            apply_catchup(entry);
        }
        if options.fold_headers {
            fold_headers(entry);
        }
    }
}

/// Force-write a group label into the entry's metadata line. Bare entries
/// have no metadata line to carry the attribute and are left alone.
pub fn assign_group(entry: &mut Entry, label: &str) {
    if let Some(extinf) = &entry.extinf {
        entry.extinf = Some(attributes::set_attribute(extinf, "group-title", label));
    }
}

/// Append the catch-up query parameter to HTTP(S) URLs. Local paths and
/// other schemes are never touched.
pub fn apply_catchup(entry: &mut Entry) {
    if UrlUtils::is_http(&entry.stream_url) {
        entry.stream_url = UrlUtils::append_query_param(&entry.stream_url, CATCHUP_PARAM);
    }
}

#[derive(Default)]
struct RequestHeaders {
    user_agent: Option<String>,
    referrer: Option<String>,
    origin: Option<String>,
    cookie: Option<String>,
}

impl RequestHeaders {
    fn is_empty(&self) -> bool {
        self.user_agent.is_none()
            && self.referrer.is_none()
            && self.origin.is_none()
            && self.cookie.is_none()
    }

    /// Render as a pipe-delimited URL suffix in fixed key order.
    fn suffix(&self) -> String {
        let mut suffix = String::new();
        for (key, value) in [
            ("User-Agent", &self.user_agent),
            ("Referer", &self.referrer),
            ("Origin", &self.origin),
            ("Cookie", &self.cookie),
        ] {
            if let Some(value) = value {
                suffix.push_str(&format!("|{key}={value}"));
            }
        }
        suffix
    }
}

/// Collapse `#EXTVLCOPT`/`#EXTHTTP` request directives into a single
/// pipe-delimited suffix on the stream URL, consuming the matched directive
/// lines. Unrelated directives are re-emitted untouched.
pub fn fold_headers(entry: &mut Entry) {
    let mut headers = RequestHeaders::default();
    let mut retained = Vec::new();

    for directive in entry.extra_directives.drain(..) {
        if let Some(option) = directive.strip_prefix("#EXTVLCOPT:") {
            match option.split_once('=') {
                Some(("http-user-agent", v)) => headers.user_agent = Some(v.to_string()),
                Some(("http-referrer" | "http-referer", v)) => {
                    headers.referrer = Some(v.to_string())
                }
                Some(("http-origin", v)) => headers.origin = Some(v.to_string()),
                _ => retained.push(directive),
            }
        } else if let Some(payload) = directive.strip_prefix("#EXTHTTP:") {
            // Structured payload; best-effort decode, malformed JSON is
            // dropped rather than re-emitted as a stale directive.
            match serde_json::from_str::<serde_json::Value>(payload) {
                Ok(serde_json::Value::Object(map)) => {
                    for (key, field) in [
                        ("cookie", &mut headers.cookie),
                        ("user-agent", &mut headers.user_agent),
                        ("referrer", &mut headers.referrer),
                        ("origin", &mut headers.origin),
                    ] {
                        if let Some(value) = lookup_ignore_case(&map, key) {
                            *field = Some(value);
                        }
                    }
                }
                _ => debug!("ignoring malformed #EXTHTTP payload: {payload}"),
            }
        } else {
            retained.push(directive);
        }
    }

    entry.extra_directives = retained;
    if !headers.is_empty() {
        entry.stream_url.push_str(&headers.suffix());
    }
}

fn lookup_ignore_case(
    map: &serde_json::Map<String, serde_json::Value>,
    key: &str,
) -> Option<String> {
    map.iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(key))
        .and_then(|(_, v)| v.as_str().map(str::to_string))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(extinf: Option<&str>, directives: &[&str], url: &str) -> Entry {
        Entry {
            extinf: extinf.map(str::to_string),
            extra_directives: directives.iter().map(|d| d.to_string()).collect(),
            stream_url: url.to_string(),
            source_order: 0,
        }
    }

    #[test]
    fn test_override_label_first_match_wins() {
        let overrides = vec![
            GroupOverride {
                pattern: "provider-a".into(),
                label: "Sports".into(),
            },
            GroupOverride {
                pattern: "provider".into(),
                label: "News".into(),
            },
        ];
        assert_eq!(
            override_label("http://provider-a.example/list.m3u", &overrides),
            Some("Sports")
        );
        assert_eq!(override_label("http://other.example/x.m3u", &overrides), None);
    }

    #[test]
    fn test_assign_group_preserves_existing_attributes() {
        let mut e = entry(Some("#EXTINF:-1 tvg-id=\"a\",One"), &[], "http://x/1");
        assign_group(&mut e, "Sports");
        assert_eq!(
            e.extinf.as_deref(),
            Some("#EXTINF:-1 tvg-id=\"a\" group-title=\"Sports\",One")
        );
    }

    #[test]
    fn test_assign_group_skips_bare_entries() {
        let mut e = entry(None, &[], "http://x/1");
        assign_group(&mut e, "Sports");
        assert_eq!(e.extinf, None);
    }

    #[test]
    fn test_catchup_separator_selection() {
        let mut plain = entry(None, &[], "http://x/1");
        apply_catchup(&mut plain);
        assert_eq!(plain.stream_url, "http://x/1?catchup-days=7");

        let mut with_query = entry(None, &[], "https://x/1?token=t");
        apply_catchup(&mut with_query);
        assert_eq!(with_query.stream_url, "https://x/1?token=t&catchup-days=7");
    }

    #[test]
    fn test_catchup_skips_non_http() {
        let mut rtsp = entry(None, &[], "rtsp://x/1");
        apply_catchup(&mut rtsp);
        assert_eq!(rtsp.stream_url, "rtsp://x/1");

        let mut local = entry(None, &[], "/data/local.ts");
        apply_catchup(&mut local);
        assert_eq!(local.stream_url, "/data/local.ts");
    }

    #[test]
    fn test_fold_headers_fixed_order() {
        let mut e = entry(
            None,
            &[
                "#EXTVLCOPT:http-referrer=http://r/",
                "#EXTHTTP:{\"cookie\":\"sid=1\"}",
                "#EXTVLCOPT:http-user-agent=Agent/1.0",
            ],
            "http://x/1",
        );
        fold_headers(&mut e);
        assert_eq!(
            e.stream_url,
            "http://x/1|User-Agent=Agent/1.0|Referer=http://r/|Cookie=sid=1"
        );
        assert!(e.extra_directives.is_empty());
    }

    #[test]
    fn test_fold_headers_retains_unrelated_directives() {
        let mut e = entry(
            None,
            &["#EXTGRP:News", "#EXTVLCOPT:http-user-agent=A"],
            "http://x/1",
        );
        fold_headers(&mut e);
        assert_eq!(e.extra_directives, vec!["#EXTGRP:News".to_string()]);
        assert_eq!(e.stream_url, "http://x/1|User-Agent=A");
    }

    #[test]
    fn test_fold_headers_ignores_malformed_json() {
        let mut e = entry(None, &["#EXTHTTP:{not json"], "http://x/1");
        fold_headers(&mut e);
        assert_eq!(e.stream_url, "http://x/1");
        assert!(e.extra_directives.is_empty());
    }

    #[test]
    fn test_annotate_document_applies_override_only_when_grouping() {
        let mut playlist = ParsedPlaylist {
            header: None,
            entries: vec![entry(Some("#EXTINF:-1,One"), &[], "http://x/1")],
            skipped_directives: 0,
        };
        let options = MappingOptions {
            group_overrides: vec![GroupOverride {
                pattern: "x".into(),
                label: "Forced".into(),
            }],
            default_group: "Other".into(),
            ..Default::default()
        };

        let mut flat = playlist.clone();
        annotate_document(&mut flat, "http://x/list.m3u", &options, false);
        assert_eq!(flat.entries[0].extinf.as_deref(), Some("#EXTINF:-1,One"));

        annotate_document(&mut playlist, "http://x/list.m3u", &options, true);
        assert_eq!(
            playlist.entries[0].extinf.as_deref(),
            Some("#EXTINF:-1 group-title=\"Forced\",One")
        );
    }
}
