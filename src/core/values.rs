// src/core/values.rs

//! Value decoding for flag arguments: unit-suffixed integers, booleans and
//! quoted strings.

use crate::core::flags::{Bounds, Value, ValueKind};
use lazy_static::lazy_static;
use regex::Regex;
use std::str::FromStr;

lazy_static! {
    static ref DRIVE_LETTER_RE: Regex = Regex::new(r"^[A-Z]:?\\?$").expect("static regex");
}

/// Unit suffixes, checked in this order against the last character.
pub const UNIT_SUFFIXES: [(char, i64); 7] = [
    ('c', 1),                  // characters
    ('w', 2),                  // words
    ('d', 4),                  // double words
    ('q', 8),                  // quad words
    ('k', 1024),               // kilobytes
    ('M', 1024 * 1024),        // megabytes
    ('G', 1024 * 1024 * 1024), // gigabytes
];

/// Strips surrounding whitespace and one layer of double quotes.
fn unquote(raw: &str) -> &str {
    let trimmed = raw.trim();
    let trimmed = trimmed.strip_prefix('"').unwrap_or(trimmed);
    trimmed.strip_suffix('"').unwrap_or(trimmed)
}

/// Splits a numeric literal into its magnitude and unit multiplier.
/// At most one suffix character is removed; no suffix means a factor of 1.
pub fn extract_factor(raw: &str) -> (&str, i64) {
    let value = unquote(raw);
    for (suffix, factor) in UNIT_SUFFIXES {
        if let Some(magnitude) = value.strip_suffix(suffix) {
            return (magnitude, factor);
        }
    }
    (value, 1)
}

/// The magnitude must fit `T` and the bounds; so must the truncated product.
fn decode_int<T>(raw: &str, bounds: Bounds<T>, narrow: fn(i64) -> T) -> Option<T>
where
    T: FromStr + PartialOrd + Copy + Into<i64>,
{
    let (magnitude, factor) = extract_factor(raw);
    let parsed: T = magnitude.parse().ok()?;
    if !bounds.contains(parsed) {
        return None;
    }
    let value = narrow(parsed.into().wrapping_mul(factor));
    bounds.contains(value).then_some(value)
}

/// Decodes a raw token for a value-carrying flag. `None` means the token is
/// not a valid value of that kind, which the parser treats as a missing value.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn decode(kind: ValueKind, raw: &str) -> Option<Value> {
    match kind {
        ValueKind::Int8(bounds) => decode_int(raw, bounds, |v| v as i8).map(Value::Int8),
        ValueKind::Int16(bounds) => decode_int(raw, bounds, |v| v as i16).map(Value::Int16),
        ValueKind::Int32(bounds) => decode_int(raw, bounds, |v| v as i32).map(Value::Int32),
        ValueKind::Int64(bounds) => decode_int(raw, bounds, |v| v).map(Value::Int64),
        ValueKind::UInt8(bounds) => decode_int(raw, bounds, |v| v as u8).map(Value::UInt8),
        ValueKind::Text => decode_text(raw).map(Value::Text),
        ValueKind::Switch | ValueKind::Bool => None,
    }
}

/// Accepts `true`/`false` in any case.
pub fn decode_bool(raw: &str) -> Option<bool> {
    let value = unquote(raw);
    if value.eq_ignore_ascii_case("true") {
        Some(true)
    } else if value.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

/// Removes one layer of surrounding quotes. Blank values count as missing,
/// and so do values with a quote left inside.
pub fn decode_text(raw: &str) -> Option<String> {
    let value = raw.strip_prefix('"').unwrap_or(raw);
    let value = value.strip_suffix('"').unwrap_or(value);
    if value.trim().is_empty() || value.contains('"') {
        return None;
    }
    Some(value.to_string())
}

/// Whether a string looks like a Windows drive letter (`E`, `E:` or `E:\`).
pub fn is_valid_drive_letter(value: &str) -> bool {
    DRIVE_LETTER_RE.is_match(value)
}
