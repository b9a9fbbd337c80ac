//! # FromBase64 Composite Decoder
//!
//! Decodes a base64 envelope, then hands the decoded bytes to the
//! configured element decoder as if they were its own native input. Two
//! shapes short-circuit without redelegating:
//!
//! - text format with the identity string element (or none configured):
//!   the decoded buffer itself, tagged with the caller's encoding
//! - binary format with the raw-byte element: the decoded buffer as bytes
//!
//! The server's `encode(..., 'base64')` wraps its output at 76 columns, so
//! whitespace inside the envelope is skipped before decoding.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use eyre::{Result, WrapErr};

use super::{Composite, Decoder, ElemDecoder, Format, RawField};
use crate::types::Value;

/// Decodes a base64 envelope, optionally redelegating the decoded bytes
/// to the composite's element decoder.
pub fn decode_from_base64<'a>(composite: &Composite, field: &RawField<'a>) -> Result<Value<'a>> {
    let decoded = decode_envelope(field)?;

    match (composite.format, composite.elem.as_deref()) {
        (Format::Text, None) | (Format::Text, Some(Decoder::String)) => {
            Ok(Value::text(decoded, field.encoding))
        }
        (Format::Binary, Some(Decoder::Bytea)) => Ok(Value::Bytes(decoded.into())),
        _ => match composite.resolve_elem() {
            ElemDecoder::String => Ok(Value::text(decoded, field.encoding)),
            elem => elem.decode_word(&decoded, field),
        },
    }
}

fn decode_envelope(field: &RawField<'_>) -> Result<Vec<u8>> {
    let compact: Vec<u8> = field
        .bytes
        .iter()
        .copied()
        .filter(|b| !b.is_ascii_whitespace())
        .collect();
    BASE64.decode(&compact).wrap_err_with(|| {
        format!(
            "invalid base64 value in row {} column {}",
            field.row, field.column
        )
    })
}
