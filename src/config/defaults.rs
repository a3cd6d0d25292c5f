/// Configuration default values
///
/// Central location for every configuration default, so that the config
/// structs, the serde default functions and the CLI help all agree.

// Source defaults
pub const DEFAULT_INPUT_FILE: &str = "input_links.txt";
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 10;

/// Newline-separated link list taken from the environment when no links are
/// given on the command line.
pub const LINKS_ENV_VAR: &str = "M3U_COMBINE_LINKS";

// Output defaults
pub const DEFAULT_OUTPUT_FILE: &str = "combined.m3u";

// Merge defaults
pub const DEFAULT_DEDUPE: bool = true;
pub const DEFAULT_GROUPING: bool = false;
pub const DEFAULT_PIN_IN_GROUPS: bool = false;
pub const DEFAULT_ACCEPT_BARE_URLS: bool = true;
pub const DEFAULT_GROUP_LABEL: &str = "Other";

// Annotation defaults
pub const DEFAULT_CATCHUP: bool = false;
pub const DEFAULT_FOLD_HEADERS: bool = false;
