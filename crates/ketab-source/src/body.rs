//! Unit body cleanup.

use regex::Regex;
use std::sync::LazyLock;

/// Matches the run of section headings such as `# Scene 3: The Fall` at the
/// start of a trimmed body, with the whitespace that follows each one.
static SECTION_HEADER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:#\s*Scene\s*\d+[^\n]*(?:\n\s*|$))+")
        .expect("section header pattern is valid")
});

/// Remove leading section headings and trim surrounding whitespace.
///
/// The body is trimmed before matching and every stacked heading goes in one
/// pass, so `strip_header(strip_header(x)) == strip_header(x)`.
pub fn strip_header(body: &str) -> String {
    SECTION_HEADER_RE.replace(body.trim(), "").trim().to_string()
}
