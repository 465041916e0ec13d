//! Slug codec
//!
//! `encode` is the only function used for catalog identity. `decode` produces
//! an approximate display name for breadcrumbs and free-text context fields;
//! it cannot recover original casing or punctuation.

use std::sync::LazyLock;

use regex::Regex;

static WHITESPACE_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));
static HYPHEN_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"-{2,}").expect("valid regex"));

/// Convert a display name to a URL path token
pub fn encode(name: &str) -> String {
    let lowered = name.trim().to_lowercase();
    let hyphenated = WHITESPACE_RUN.replace_all(&lowered, "-");
    let safe: String = hyphenated
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '-')
        .collect();

    HYPHEN_RUN.replace_all(&safe, "-").trim_matches('-').to_string()
}

/// Approximate a display name from a slug by title-casing each token
pub fn decode(slug: &str) -> String {
    slug.split('-')
        .filter(|token| !token.is_empty())
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(token: &str) -> String {
    let mut chars = token.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
