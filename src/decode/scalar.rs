//! # Scalar Text Decoders
//!
//! Stateless converters for the simple value kinds: boolean, integer,
//! float, and the string passthrough that doubles as the fallback element
//! decoder of every composite.
//!
//! ## Integer Fast Path
//!
//! The integer decoder parses digit-by-digit into an `i64` accumulator
//! whenever the input is short enough that overflow is impossible. The
//! bound is derived from the accumulator width at compile time: any number
//! with at most `i64::MAX.ilog10()` (= 18) decimal digits fits. Longer or
//! non-decimal input falls through to a wide `i128` parse. The split is a
//! deliberate throughput design for the overwhelmingly common small-integer
//! case, not an error path.
//!
//! ## Float Semantics
//!
//! The float decoder mirrors `strtod`: it converts the longest numeric
//! prefix it can and never fails. PostgreSQL's `NaN`, `Infinity` and
//! `-Infinity` spellings are covered by `f64::from_str`.

use std::borrow::Cow;

use eyre::{bail, Result, WrapErr};

use super::RawField;
use crate::types::Value;

/// Widest decimal digit count that can never overflow the i64 fast-path
/// accumulator.
pub const MAX_FAST_DIGITS: usize = i64::MAX.ilog10() as usize;

/// Decodes `t` as true and any other non-empty input as false, matching
/// the server's text output convention. Empty input is the one hard
/// failure in this crate's scalar decoders.
pub fn decode_boolean(field: &RawField<'_>) -> Result<Value<'static>> {
    let Some(&first) = field.bytes.first() else {
        bail!(
            "wrong data for text boolean converter in row {} column {}",
            field.row,
            field.column
        );
    };
    Ok(Value::Bool(first == b't'))
}

/// Decodes a decimal integer. Inputs within the fast-path width are
/// accumulated by hand; everything else goes through the wide fallback.
pub fn decode_integer(field: &RawField<'_>) -> Result<Value<'static>> {
    if field.bytes.len() <= MAX_FAST_DIGITS {
        if let Some(n) = parse_fast_i64(field.bytes) {
            return Ok(Value::Int(n));
        }
    }

    // Number too big or unrecognized: wide conversion.
    let text = std::str::from_utf8(field.bytes).wrap_err_with(|| {
        format!(
            "invalid UTF-8 for text integer converter in row {} column {}",
            field.row, field.column
        )
    })?;
    let wide: i128 = text.parse().wrap_err_with(|| {
        format!(
            "invalid integer '{}' in row {} column {}",
            text, field.row, field.column
        )
    })?;
    match i64::try_from(wide) {
        Ok(narrow) => Ok(Value::Int(narrow)),
        Err(_) => Ok(Value::BigInt(wide)),
    }
}

/// Manual digit accumulation: optional single leading `-`, then decimal
/// digits only. Returns None on any other byte so the caller falls through
/// to the wide conversion.
fn parse_fast_i64(bytes: &[u8]) -> Option<i64> {
    let mut iter = bytes.iter();
    let (neg, mut acc) = match *iter.next()? {
        b'-' => (true, 0i64),
        d if d.is_ascii_digit() => (false, (d - b'0') as i64),
        _ => return None,
    };
    for &d in iter {
        if !d.is_ascii_digit() {
            return None;
        }
        acc = acc * 10 + (d - b'0') as i64;
    }
    Some(if neg { -acc } else { acc })
}

/// Best-effort float conversion; never fails. Malformed input decodes to
/// whatever its longest numeric prefix says, or 0.0 with no prefix at all,
/// as `strtod` would.
pub fn decode_float(field: &RawField<'_>) -> Value<'static> {
    let text = String::from_utf8_lossy(field.bytes);
    if let Ok(f) = text.parse::<f64>() {
        return Value::Float(f);
    }
    Value::Float(numeric_prefix(&text).parse().unwrap_or(0.0))
}

/// Longest leading chunk that still looks like a decimal/exponential
/// number. Keeps `strtod`'s prefix behavior without its locale baggage.
fn numeric_prefix(text: &str) -> &str {
    let bytes = text.as_bytes();
    let mut end = 0;
    let mut seen_digit = false;
    let mut seen_dot = false;
    let mut seen_exp = false;

    while end < bytes.len() {
        match bytes[end] {
            b'0'..=b'9' => seen_digit = true,
            b'+' | b'-' if end == 0 => {}
            b'+' | b'-' if matches!(bytes[end - 1], b'e' | b'E') => {}
            b'.' if !seen_dot && !seen_exp => seen_dot = true,
            b'e' | b'E' if seen_digit && !seen_exp => seen_exp = true,
            _ => break,
        }
        end += 1;
    }
    &text[..end]
}

/// Zero-copy passthrough: the exact input bytes tagged with the caller's
/// encoding. Also the fallback element decoder for every composite.
pub fn decode_string<'a>(field: &RawField<'a>) -> Value<'a> {
    Value::Text {
        bytes: Cow::Borrowed(field.bytes),
        encoding: field.encoding,
    }
}
