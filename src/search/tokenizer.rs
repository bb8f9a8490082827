use regex::Regex;
use std::collections::BTreeSet;
use std::path::Path;
use std::sync::LazyLock;

static SEPARATORS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[-_\s./\\]+").expect("separator pattern is a valid regex"));

/// Splits a filename or path into lowercase search tokens.
///
/// Separators are `-`, `_`, whitespace, `.` and both path separators. The
/// whole lowercased value is kept as a token too, so a pattern spanning a
/// separator still matches.
pub fn tokenize_path(text: &str) -> BTreeSet<String> {
    let lowered = text.trim().to_lowercase();
    if lowered.is_empty() {
        return BTreeSet::new();
    }

    let mut tokens: BTreeSet<String> = SEPARATORS
        .split(&lowered)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect();
    tokens.insert(lowered);
    tokens
}

/// Lowercased extension with its leading dot (`.jpg`), or `""`.
pub fn file_type(filename: &str) -> String {
    Path::new(filename)
        .extension()
        .map(|ext| format!(".{}", ext.to_string_lossy().to_lowercase()))
        .unwrap_or_default()
}

/// Normalizes a user supplied extension pattern to the `file_type` form:
/// `JPG`, `.jpg` and ` .Jpg ` all become `.jpg`.
pub fn normalize_extension(pattern: &str) -> String {
    let lowered = pattern.trim().to_lowercase();
    if lowered.is_empty() || lowered.starts_with('.') {
        lowered
    } else {
        format!(".{}", lowered)
    }
}
