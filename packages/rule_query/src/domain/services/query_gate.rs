//! Local syntax gate applied to translated queries before they reach the engine.
//!
//! This is not a Prolog parser. It rejects the mistakes a model typically makes
//! when asked for a bare goal (a `?-` prefix, truncated output, unbalanced
//! brackets or quotes) and lists the variables the goal can bind.

use crate::domain::errors::{OrchestratorError, OrchestratorResult};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref VARIABLE: Regex = Regex::new(r"\b[A-Z_][A-Za-z0-9_]*").unwrap();
}

/// A query that passed the gate
#[derive(Debug, Clone, PartialEq)]
pub struct CheckedQuery {
    /// Goal text without a trailing terminator
    pub text: String,
    /// Named variables in order of first appearance; `_`-prefixed ones are skipped
    pub variables: Vec<String>,
}

pub fn validate_query(raw: &str) -> OrchestratorResult<CheckedQuery> {
    let reject = |reason: &str| OrchestratorError::InvalidQuery {
        query: raw.to_string(),
        reason: reason.to_string(),
    };

    let mut text = raw.trim();
    if text.is_empty() {
        return Err(reject("query is empty"));
    }
    if text.starts_with("?-") {
        return Err(reject("query must not start with ?-"));
    }
    if let Some(stripped) = text.strip_suffix('.') {
        text = stripped.trim_end();
    }
    if text.is_empty() {
        return Err(reject("query is empty"));
    }

    let unquoted = mask_quoted(text).map_err(|reason| reject(&reason))?;

    let mut variables: Vec<String> = Vec::new();
    for m in VARIABLE.find_iter(&unquoted) {
        let name = m.as_str();
        if name.starts_with('_') || variables.iter().any(|v| v == name) {
            continue;
        }
        variables.push(name.to_string());
    }

    Ok(CheckedQuery {
        text: text.to_string(),
        variables,
    })
}

/// Replaces quoted text and line comments with blanks and checks bracket/quote balance.
fn mask_quoted(text: &str) -> Result<String, String> {
    let mut masked = String::with_capacity(text.len());
    let mut stack: Vec<char> = Vec::new();
    let mut quote: Option<char> = None;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if let Some(q) = quote {
            masked.push(' ');
            if c == '\\' {
                if chars.next().is_some() {
                    masked.push(' ');
                }
            } else if c == q {
                // doubled quote is an escaped quote
                if chars.peek() == Some(&q) {
                    chars.next();
                    masked.push(' ');
                } else {
                    quote = None;
                }
            }
            continue;
        }

        match c {
            '%' => {
                // line comment
                masked.push(' ');
                while let Some(&next) = chars.peek() {
                    if next == '\n' {
                        break;
                    }
                    chars.next();
                    masked.push(' ');
                }
            }
            '\'' if number_prefix(&masked).is_some() => {
                // 0'c is a character code, 16'FF and friends are based integers
                let is_char_code = number_prefix(&masked) == Some("0");
                masked.push(' ');
                if is_char_code {
                    if chars.next().is_some() {
                        masked.push(' ');
                    }
                } else {
                    while chars.peek().is_some_and(|d| d.is_ascii_alphanumeric()) {
                        chars.next();
                        masked.push(' ');
                    }
                }
            }
            '\'' | '"' | '`' => {
                quote = Some(c);
                masked.push(' ');
            }
            '(' | '[' | '{' => {
                stack.push(c);
                masked.push(c);
            }
            ')' | ']' | '}' => {
                let expected = match c {
                    ')' => '(',
                    ']' => '[',
                    _ => '{',
                };
                if stack.pop() != Some(expected) {
                    return Err(format!("unbalanced '{}'", c));
                }
                masked.push(c);
            }
            _ => masked.push(c),
        }
    }

    if let Some(q) = quote {
        return Err(format!("unterminated {} quote", q));
    }
    if let Some(open) = stack.pop() {
        return Err(format!("unclosed '{}'", open));
    }
    Ok(masked)
}

/// Trailing run of digits that is a number token on its own, not the tail of
/// an identifier such as `p2`.
fn number_prefix(text: &str) -> Option<&str> {
    let start = text.trim_end_matches(|c: char| c.is_ascii_digit()).len();
    let digits = &text[start..];
    if digits.is_empty() || ends_with_identifier_char(&text[..start]) {
        None
    } else {
        Some(digits)
    }
}

fn ends_with_identifier_char(text: &str) -> bool {
    text.chars()
        .last()
        .map(|c| c.is_alphanumeric() || c == '_')
        .unwrap_or(false)
}
