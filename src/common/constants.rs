/// Prefix written in place of a tagged URL when that row failed
pub const ERROR_MARKER: &str = "ERROR: ";

/// Raw field value meaning "not applicable"; skipped during campaign assembly
pub const NOT_APPLICABLE: &str = "n/a";

/// Settings file looked up when no explicit path is given
pub const DEFAULT_SETTINGS_PATH: &str = "settings.json";

/// Progress bar template
pub const PROGRESS_BAR_TEMPLATE: &str =
    "{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} ({eta}) {msg}";

/// Progress bar characters
pub const PROGRESS_BAR_CHARS: &str = "#>-";
