//! # Bytea Text Unescape
//!
//! PostgreSQL emits `bytea` columns in one of two textual forms:
//!
//! | Form | Example | Output |
//! |------|---------|--------|
//! | Hex | `\x48454c4c4f` | `HELLO` |
//! | Escape | `a\\b\000` | `a`, `\`, `b`, NUL |
//!
//! The hex form (server default since 9.0) is a `\x` prefix followed by an
//! even number of hex digits. The legacy escape form passes printable
//! bytes through literally, doubles backslashes, and writes everything
//! else as `\` plus three octal digits.

use eyre::{bail, Result};

use super::RawField;
use crate::types::Value;

/// Unescapes bytea text output into raw bytes.
pub fn decode_bytea(field: &RawField<'_>) -> Result<Value<'static>> {
    let out = if let Some(hex) = field.bytes.strip_prefix(b"\\x") {
        unescape_hex(hex, field)?
    } else {
        unescape_octal(field.bytes, field)?
    };
    Ok(Value::Bytes(out.into()))
}

fn unescape_hex(hex: &[u8], field: &RawField<'_>) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(hex.len() / 2);
    let mut pair = [0u8; 2];
    let mut have = 0;

    for &b in hex {
        // The server may wrap long output; whitespace between pairs is legal.
        if b.is_ascii_whitespace() {
            continue;
        }
        pair[have] = hex_nibble(b, field)?;
        have += 1;
        if have == 2 {
            out.push(pair[0] << 4 | pair[1]);
            have = 0;
        }
    }
    if have != 0 {
        bail!(
            "odd number of hex digits in bytea value in row {} column {}",
            field.row,
            field.column
        );
    }
    Ok(out)
}

fn hex_nibble(b: u8, field: &RawField<'_>) -> Result<u8> {
    match b {
        b'0'..=b'9' => Ok(b - b'0'),
        b'a'..=b'f' => Ok(b - b'a' + 10),
        b'A'..=b'F' => Ok(b - b'A' + 10),
        _ => bail!(
            "invalid hex digit {:?} in bytea value in row {} column {}",
            b as char,
            field.row,
            field.column
        ),
    }
}

fn unescape_octal(bytes: &[u8], field: &RawField<'_>) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] != b'\\' {
            out.push(bytes[i]);
            i += 1;
            continue;
        }
        match bytes.get(i + 1) {
            Some(b'\\') => {
                out.push(b'\\');
                i += 2;
            }
            Some(b'0'..=b'3') if is_octal_escape(&bytes[i + 1..]) => {
                let b = (bytes[i + 1] - b'0') << 6
                    | (bytes[i + 2] - b'0') << 3
                    | (bytes[i + 3] - b'0');
                out.push(b);
                i += 4;
            }
            _ => bail!(
                "invalid backslash escape at offset {} in bytea value in row {} column {}",
                i,
                field.row,
                field.column
            ),
        }
    }
    Ok(out)
}

fn is_octal_escape(tail: &[u8]) -> bool {
    tail.len() >= 3 && tail[..3].iter().all(|b| (b'0'..=b'7').contains(b))
}
