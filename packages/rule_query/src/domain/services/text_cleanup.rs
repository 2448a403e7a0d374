//! Clean-up of model output before it reaches the engine.

const FENCE: &str = "```";

/// Drops every line whose first non-blank characters open or close a markdown
/// code fence, then trims the rejoined text.
///
/// Only fence lines are removed; the code between them is kept as is.
pub fn strip_code_fences(raw: &str) -> String {
    raw.lines()
        .filter(|line| !line.trim().starts_with(FENCE))
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}
