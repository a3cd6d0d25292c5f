//! Unified `key="value"` attribute handling for directive lines
//!
//! Both the `#EXTM3U` header and `#EXTINF` metadata lines carry
//! space-separated `key="value"` attribute sets. Every read or rewrite of
//! those attributes goes through this module so that insertion and extraction
//! behave identically everywhere.

/// Parse a space-separated `key="value"` attribute set.
///
/// Tolerant by design: quotes may be escaped with `\`, unquoted values are
/// accepted, and tokens without `=` (the tag itself, the duration) are
/// ignored. Malformed input degrades to fewer attributes, never an error.
pub fn parse_attributes(attributes: &str) -> Vec<(String, String)> {
    let mut attrs = Vec::new();
    let mut current_key = String::new();
    let mut current_value = String::new();
    let mut in_quotes = false;
    let mut in_value = false;
    let mut escape_next = false;

    for ch in attributes.chars() {
        if escape_next {
            if in_value {
                current_value.push(ch);
            } else {
                current_key.push(ch);
            }
            escape_next = false;
            continue;
        }

        match ch {
            '\\' => escape_next = true,
            '"' => {
                if in_value {
                    in_quotes = !in_quotes;
                }
            }
            '=' if !in_quotes && !in_value => {
                in_value = true;
            }
            ' ' | '\t' if !in_quotes => {
                if in_value && !current_value.is_empty() {
                    attrs.push((
                        current_key.trim().to_string(),
                        current_value.trim_matches('"').to_string(),
                    ));
                    current_value.clear();
                }
                current_key.clear();
                in_value = false;
            }
            _ => {
                if in_value {
                    current_value.push(ch);
                } else {
                    current_key.push(ch);
                }
            }
        }
    }

    if in_value && !current_value.is_empty() {
        attrs.push((
            current_key.trim().to_string(),
            current_value.trim_matches('"').to_string(),
        ));
    }

    attrs
}

/// The attribute region of a directive line: for `#EXTINF` lines everything
/// between the tag colon and the display-name comma, for other lines the
/// whole line (the tag token itself carries no `=` and parses to nothing).
fn attribute_region(line: &str) -> &str {
    if line.len() >= 8 && line[..8].eq_ignore_ascii_case("#EXTINF:") {
        let payload = &line[8..];
        match payload.rfind(',') {
            Some(comma) => &payload[..comma],
            None => payload,
        }
    } else {
        line
    }
}

/// Look up one attribute on a directive line.
pub fn attribute(line: &str, name: &str) -> Option<String> {
    parse_attributes(attribute_region(line))
        .into_iter()
        .find(|(k, _)| k == name)
        .map(|(_, v)| v)
}

/// The free-text display name of an `#EXTINF` line: the text after the last
/// comma. Empty when the line has no comma.
pub fn display_name(line: &str) -> &str {
    match line.rfind(',') {
        Some(comma) => line[comma + 1..].trim(),
        None => "",
    }
}

/// Find `needle` as a whole attribute key: at the start of the string or
/// preceded by whitespace or the tag colon. A raw substring search would
/// also match inside longer keys like `not-group-title="..."`.
fn find_key(line: &str, needle: &str) -> Option<usize> {
    let mut from = 0;
    while let Some(found) = line[from..].find(needle) {
        let start = from + found;
        if start == 0 || matches!(line.as_bytes()[start - 1], b' ' | b'\t' | b':') {
            return Some(start);
        }
        from = start + needle.len();
    }
    None
}

/// Write `name="value"` into an `#EXTINF` line without disturbing any
/// attribute already present.
///
/// Canonical insertion rule: an existing attribute is replaced in place;
/// otherwise the new attribute is inserted directly after the `tvg-name`
/// anchor, else after `tvg-id`, else immediately after the duration token of
/// the payload.
pub fn set_attribute(line: &str, name: &str, value: &str) -> String {
    let needle = format!("{name}=\"");
    if let Some(start) = find_key(line, &needle) {
        let value_start = start + needle.len();
        if let Some(end) = line[value_start..].find('"') {
            return format!(
                "{}{}{}",
                &line[..value_start],
                value,
                &line[value_start + end..]
            );
        }
    }

    let rendered = format!(" {name}=\"{value}\"");
    for anchor in ["tvg-name=\"", "tvg-id=\""] {
        if let Some(start) = find_key(line, anchor) {
            let value_start = start + anchor.len();
            if let Some(end) = line[value_start..].find('"') {
                let insert_at = value_start + end + 1;
                return format!("{}{}{}", &line[..insert_at], rendered, &line[insert_at..]);
            }
        }
    }

    // No anchor attribute: attach right after the duration token.
    if line.len() >= 8 && line[..8].eq_ignore_ascii_case("#EXTINF:") {
        let payload = &line[8..];
        let duration_end = payload
            .find([' ', ','])
            .map(|i| 8 + i)
            .unwrap_or(line.len());
        return format!(
            "{}{}{}",
            &line[..duration_end],
            rendered,
            &line[duration_end..]
        );
    }

    format!("{line}{rendered}")
}
