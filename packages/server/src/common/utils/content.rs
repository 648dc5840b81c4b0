//! Pure helpers for deriving blog fields from user input.
//!
//! No I/O here; everything takes a string and returns a string.
use lazy_static::lazy_static;
use regex::Regex;

/// Excerpt length used when the author does not supply one.
pub const DEFAULT_EXCERPT_CHARS: usize = 150;

lazy_static! {
    static ref NON_SLUG_CHARS: Regex = Regex::new(r"[^a-z0-9]+").unwrap();
}

/// Build a URL-safe slug from a title.
///
/// Lowercases, collapses every run of characters outside `[a-z0-9]` into a
/// single `-`, and trims separators from both ends. Slugs are not unique.
pub fn slugify(title: &str) -> String {
    let lowered = title.to_lowercase();
    NON_SLUG_CHARS
        .replace_all(&lowered, "-")
        .trim_matches('-')
        .to_string()
}

/// Default excerpt: the first `DEFAULT_EXCERPT_CHARS` characters of the title.
pub fn default_excerpt(title: &str) -> String {
    title.chars().take(DEFAULT_EXCERPT_CHARS).collect()
}

/// Treat `None`, `""` and whitespace-only input the same way.
pub fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
