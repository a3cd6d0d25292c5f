//! Configuration for the playlist combiner
//!
//! A TOML file with sectioned tables; every value has a default so an absent
//! file (or an empty one) yields a fully working configuration. CLI flags
//! override individual values after loading.

use serde::{Deserialize, Serialize};
use std::time::Duration;

pub mod defaults;
pub mod duration_serde;

use defaults::*;

use crate::errors::{AppError, AppResult};
use crate::mapping::GroupOverride;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub sources: SourcesConfig,
    #[serde(default)]
    pub merge: MergeSettings,
    #[serde(default)]
    pub annotate: AnnotateSettings,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Where the link list comes from and how sources are fetched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourcesConfig {
    /// Input file with one source URL or path per line.
    #[serde(default = "default_input_file")]
    pub input_file: String,
    /// Per-fetch HTTP timeout.
    #[serde(default = "default_fetch_timeout", with = "duration_serde::duration")]
    pub fetch_timeout: Duration,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MergeSettings {
    /// Drop later entries sharing an already-accepted stream URL.
    #[serde(default = "default_dedupe")]
    pub dedupe: bool,
    /// Emit grouped output instead of source-order output.
    #[serde(default = "default_grouping")]
    pub group: bool,
    /// Display name of the entry to force to the front, if any.
    #[serde(default)]
    pub pin: Option<String>,
    /// Also keep the pinned entry in its group bucket.
    #[serde(default = "default_pin_in_groups")]
    pub pin_in_groups: bool,
    /// Accept URL lines with no preceding `#EXTINF`.
    #[serde(default = "default_accept_bare_urls")]
    pub accept_bare_urls: bool,
    /// Bucket label for entries without a discoverable group.
    #[serde(default = "default_group_label")]
    pub default_group: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnnotateSettings {
    /// Append `catchup-days=7` to HTTP(S) stream URLs.
    #[serde(default = "default_catchup")]
    pub catchup: bool,
    /// Fold request-header directives into the stream URL.
    #[serde(default = "default_fold_headers")]
    pub fold_headers: bool,
    /// Source-substring → group-label overrides, first match wins.
    #[serde(default)]
    pub group_overrides: Vec<GroupOverride>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Output playlist path.
    #[serde(default = "default_output_file")]
    pub file: String,
}

fn default_input_file() -> String {
    DEFAULT_INPUT_FILE.to_string()
}
fn default_fetch_timeout() -> Duration {
    Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS)
}
fn default_dedupe() -> bool {
    DEFAULT_DEDUPE
}
fn default_grouping() -> bool {
    DEFAULT_GROUPING
}
fn default_pin_in_groups() -> bool {
    DEFAULT_PIN_IN_GROUPS
}
fn default_accept_bare_urls() -> bool {
    DEFAULT_ACCEPT_BARE_URLS
}
fn default_group_label() -> String {
    DEFAULT_GROUP_LABEL.to_string()
}
fn default_catchup() -> bool {
    DEFAULT_CATCHUP
}
fn default_fold_headers() -> bool {
    DEFAULT_FOLD_HEADERS
}
fn default_output_file() -> String {
    DEFAULT_OUTPUT_FILE.to_string()
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            input_file: default_input_file(),
            fetch_timeout: default_fetch_timeout(),
        }
    }
}

impl Default for MergeSettings {
    fn default() -> Self {
        Self {
            dedupe: default_dedupe(),
            group: default_grouping(),
            pin: None,
            pin_in_groups: default_pin_in_groups(),
            accept_bare_urls: default_accept_bare_urls(),
            default_group: default_group_label(),
        }
    }
}

impl Default for AnnotateSettings {
    fn default() -> Self {
        Self {
            catchup: default_catchup(),
            fold_headers: default_fold_headers(),
            group_overrides: Vec::new(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            file: default_output_file(),
        }
    }
}

impl Config {
    /// Load from `config_file` when it exists, otherwise fall back to
    /// defaults.
    pub fn load_from_file(config_file: &str) -> AppResult<Self> {
        if std::path::Path::new(config_file).exists() {
            let contents =
                std::fs::read_to_string(config_file).map_err(|e| AppError::Configuration {
                    message: format!("cannot read '{config_file}': {e}"),
                })?;
            toml::from_str(&contents).map_err(|e| AppError::Configuration {
                message: format!("invalid config '{config_file}': {e}"),
            })
        } else {
            Ok(Self::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert!(config.merge.dedupe);
        assert!(!config.merge.group);
        assert!(config.merge.accept_bare_urls);
        assert_eq!(config.merge.default_group, "Other");
        assert_eq!(config.sources.fetch_timeout, Duration::from_secs(10));
        assert_eq!(config.output.file, "combined.m3u");
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
            [merge]
            group = true

            [annotate]
            catchup = true

            [[annotate.group_overrides]]
            pattern = "provider-a"
            label = "Sports"
            "#,
        )
        .unwrap();
        assert!(config.merge.group);
        assert!(config.merge.dedupe);
        assert!(config.annotate.catchup);
        assert_eq!(config.annotate.group_overrides.len(), 1);
        assert_eq!(config.annotate.group_overrides[0].label, "Sports");
        assert_eq!(config.sources.input_file, "input_links.txt");
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let config = Config::load_from_file("/nonexistent/config.toml").unwrap();
        assert!(config.merge.dedupe);
    }
}
