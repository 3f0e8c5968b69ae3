// src/core/tokenizer.rs

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// A token is a run of characters other than ASCII whitespace in which
    /// `"..."` segments may contain whitespace. An unterminated quote runs to
    /// the end of input.
    static ref TOKEN_RE: Regex =
        Regex::new(r#"(?:[^\t\n\x0C\r "]+|"[^"]*"?)+"#).expect("static regex");
}

/// Splits an invocation string into tokens.
///
/// Tokens are separated by ASCII whitespace. A token that is entirely wrapped
/// in double quotes has those quotes removed; quotes in the middle of a token
/// (as in `--image-path="my dumps"`) are kept for the value decoder.
pub fn tokenize(input: &str) -> Vec<String> {
    TOKEN_RE
        .find_iter(input)
        .map(|m| strip_outer_quotes(m.as_str()).to_string())
        .collect()
}

fn strip_outer_quotes(token: &str) -> &str {
    if token.len() >= 2 && token.starts_with('"') && token.ends_with('"') {
        token.get(1..token.len() - 1).unwrap_or(token)
    } else {
        token
    }
}

/// Renders a value so that [`tokenize`] reads it back as a single piece.
pub fn quote_if_needed(value: &str) -> String {
    if value.chars().any(|c| c.is_ascii_whitespace()) {
        format!("\"{}\"", value)
    } else {
        value.to_string()
    }
}
