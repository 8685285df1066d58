//! Pattern matching utilities for prompt detection.

use regex::bytes::Regex;

/// Combine several prompt patterns into a single alternation.
///
/// Each pattern keeps its own inline flags because it is wrapped in a
/// non-capturing group.
pub fn combine_prompt_patterns<'a>(
    patterns: impl IntoIterator<Item = &'a str>,
) -> Result<Regex, regex::Error> {
    let combined = patterns
        .into_iter()
        .map(|p| format!("(?:{})", p))
        .collect::<Vec<_>>()
        .join("|");

    if combined.is_empty() {
        return Regex::new(r"[$#>]\s*$");
    }
    Regex::new(&combined)
}

/// Return the last non-empty line of `data`, trimmed.
///
/// After a prompt is detected this is the prompt itself.
pub fn last_line(data: &[u8]) -> String {
    let text = String::from_utf8_lossy(data);
    text.lines()
        .rev()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or_default()
        .to_string()
}
