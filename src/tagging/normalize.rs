use regex::Regex;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::common::constants::NOT_APPLICABLE;
use crate::common::Separator;
use crate::errors::{TaggingError, TaggingResult};

thread_local! {
    static NON_SLUG_RE: Regex = Regex::new(r"[^a-z0-9]+").unwrap();
    static UNDERSCORE_RUN_RE: Regex = Regex::new(r"_{2,}").unwrap();
    static HYPHEN_RUN_RE: Regex = Regex::new(r"-{2,}").unwrap();
    static CODE_RE: Regex = Regex::new(r"^[a-z0-9]+(-[a-z0-9]+)*$").unwrap();
}

/// Turns free text into a lowercase ASCII slug joined by `sep`.
///
/// Accents are stripped through NFKD decomposition, every run of characters
/// outside `[a-z0-9]` becomes a single separator and separators never lead,
/// trail or repeat. Input without any alphanumeric character yields `""`.
pub fn normalize(raw: &str, sep: Separator) -> String {
    let sep_char = sep.as_char();
    let sep_str = sep_char.to_string();
    let stripped: String = raw
        .trim()
        .nfkd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase();

    let replaced =
        NON_SLUG_RE.with(|re| re.replace_all(&stripped, sep_str.as_str()).into_owned());
    let trimmed = replaced.trim_matches(sep_char);

    let run_re = match sep {
        Separator::Underscore => &UNDERSCORE_RUN_RE,
        Separator::Hyphen => &HYPHEN_RUN_RE,
    };
    run_re.with(|re| re.replace_all(trimmed, sep_str.as_str()).into_owned())
}

/// Rejects `value` when it is longer than `max` characters. A `max` of 0 disables the check.
pub fn enforce_max_len(label: &str, value: &str, max: usize) -> TaggingResult<String> {
    let actual = value.chars().count();
    if max > 0 && actual > max {
        return Err(TaggingError::Validation {
            label: label.to_string(),
            actual,
            max,
        });
    }
    Ok(value.to_string())
}

/// True for a lowercase, hyphen-joined code such as `mcpura-cielo`
pub fn is_code(value: &str) -> bool {
    CODE_RE.with(|re| re.is_match(value))
}

/// True for the literal "not applicable" marker a field may carry
pub fn is_placeholder(raw: &str) -> bool {
    raw.trim().eq_ignore_ascii_case(NOT_APPLICABLE)
}
