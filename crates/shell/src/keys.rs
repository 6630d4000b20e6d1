use once_cell::sync::Lazy;
use regex::Regex;

static SHELL_IDENTIFIER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[_A-Za-z][A-Za-z0-9_]*$").unwrap());

/// Whether `key` can be exported by a POSIX shell
#[must_use]
pub fn is_valid_key(key: &str) -> bool {
    SHELL_IDENTIFIER.is_match(key)
}
