//! # Decoder Tree and Dispatch
//!
//! This module provides the decoder configuration tree and the dispatch
//! logic that routes a raw field to the right parser.
//!
//! ## Module Structure
//!
//! - `scalar`: boolean / integer / float / string decoders
//! - `bytea`: bytea text unescape (hex and octal-escape forms)
//! - `array`: recursive array-literal parser
//! - `identifier`: dotted/quoted identifier splitter
//! - `from_base64`: base64 envelope with element redelegation
//! - `timestamp`: fixed-skeleton timestamp parsers
//!
//! ## Decoder Tree
//!
//! A [`Decoder`] is either a simple converter, a composite holding a
//! [`Composite`] configuration (delimiter, wire format, optional element
//! decoder), or an external hook for value kinds this crate has no native
//! parser for. Composites own their element decoder exclusively, so the
//! tree is acyclic by construction and safe to share across threads once
//! built.
//!
//! ```text
//! Decoder::Array ── Composite ── elem: Decoder::Integer
//! Decoder::Array ── Composite ── elem: Decoder::Array ── Composite ── ...
//! Decoder::FromBase64 ── Composite ── elem: None  (string fallback)
//! ```
//!
//! ## Element Resolution
//!
//! Composite decoders resolve their element decoder once per call:
//!
//! 1. element present with a native parser -> invoke it on each word
//! 2. element is an external hook -> decode the word to a string, then
//!    call `DecodeHook::decode(text, row, column)`
//! 3. no element configured -> plain string decoder
//!
//! ## Error Handling
//!
//! Decode failures are `eyre` reports that carry row/column coordinates in
//! the message, e.g.:
//!
//! ```text
//! "wrong data for text boolean converter in row 3 column 1"
//! ```

mod array;
mod bytea;
mod from_base64;
mod identifier;
mod scalar;
mod timestamp;

pub use scalar::MAX_FAST_DIGITS;

use std::borrow::Cow;
use std::sync::Arc;

use eyre::{Result, WrapErr};

use crate::types::{Encoding, Value};

/// One raw column value as handed over by the result layer: the value
/// bytes plus the coordinates used in error messages and the output
/// encoding tag for string results.
#[derive(Debug, Clone, Copy)]
pub struct RawField<'a> {
    pub bytes: &'a [u8],
    pub row: usize,
    pub column: usize,
    pub encoding: Encoding,
}

impl<'a> RawField<'a> {
    pub fn new(bytes: &'a [u8], row: usize, column: usize, encoding: Encoding) -> Self {
        RawField {
            bytes,
            row,
            column,
            encoding,
        }
    }

    /// Same coordinates and encoding, different bytes. Used by composite
    /// decoders to hand carved-out sub-spans to their element decoder.
    pub(crate) fn with_bytes<'b>(&self, bytes: &'b [u8]) -> RawField<'b> {
        RawField {
            bytes,
            row: self.row,
            column: self.column,
            encoding: self.encoding,
        }
    }
}

/// Wire format a composite decoder expects its elements in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Text,
    Binary,
}

/// Externally-supplied decode routine for element types this crate has no
/// native parser for. The composite decoder converts the element word to a
/// string first, then hands it over together with the field coordinates.
pub trait DecodeHook: Send + Sync {
    fn decode(&self, text: &str, row: usize, column: usize) -> Result<Value<'static>>;
}

/// Configuration shared by composite decoders.
#[derive(Clone)]
pub struct Composite {
    pub delimiter: u8,
    pub format: Format,
    pub elem: Option<Box<Decoder>>,
}

impl Composite {
    /// Text-format composite with the default `,` delimiter.
    pub fn new(elem: Option<Decoder>) -> Self {
        Composite {
            delimiter: b',',
            format: Format::Text,
            elem: elem.map(Box::new),
        }
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn with_format(mut self, format: Format) -> Self {
        self.format = format;
        self
    }

    /// Resolves the element decoder once per composite decode call.
    pub(crate) fn resolve_elem(&self) -> ElemDecoder<'_> {
        match self.elem.as_deref() {
            Some(Decoder::External(hook)) => ElemDecoder::Hook(hook.as_ref()),
            Some(decoder) => ElemDecoder::Native(decoder),
            None => ElemDecoder::String,
        }
    }
}

impl std::fmt::Debug for Composite {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Composite")
            .field("delimiter", &(self.delimiter as char))
            .field("format", &self.format)
            .field("elem", &self.elem)
            .finish()
    }
}

/// A configured decoder: simple converters, composites that delegate their
/// elements, or an external hook.
#[derive(Debug, Clone)]
pub enum Decoder {
    Boolean,
    Integer,
    Float,
    String,
    Bytea,
    /// Timestamp without time zone.
    Timestamp,
    /// Timestamp with time zone (optional UTC-offset suffix).
    TimestampTz,
    Array(Composite),
    Identifier(Composite),
    FromBase64(Composite),
    External(Arc<dyn DecodeHook>),
}

impl std::fmt::Debug for dyn DecodeHook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("DecodeHook")
    }
}

impl Decoder {
    /// Decodes one raw field into a structured value.
    pub fn decode<'a>(&self, field: &RawField<'a>) -> Result<Value<'a>> {
        match self {
            Decoder::Boolean => scalar::decode_boolean(field),
            Decoder::Integer => scalar::decode_integer(field),
            Decoder::Float => Ok(scalar::decode_float(field)),
            Decoder::String => Ok(scalar::decode_string(field)),
            Decoder::Bytea => bytea::decode_bytea(field),
            Decoder::Timestamp => Ok(timestamp::decode_timestamp(field)),
            Decoder::TimestampTz => Ok(timestamp::decode_timestamp_tz(field)),
            Decoder::Array(composite) => array::decode_array(composite, field),
            Decoder::Identifier(composite) => identifier::decode_identifier(composite, field),
            Decoder::FromBase64(composite) => from_base64::decode_from_base64(composite, field),
            Decoder::External(hook) => decode_via_hook(hook.as_ref(), field),
        }
    }
}

/// Resolved element decoder for one composite decode call. Borrowed view
/// of a configuration decision made when the tree was built.
pub(crate) enum ElemDecoder<'d> {
    Native(&'d Decoder),
    Hook(&'d dyn DecodeHook),
    String,
}

impl ElemDecoder<'_> {
    /// Decodes one carved-out word. The word lives in per-call scratch
    /// space, so the result is detached from it before returning.
    pub(crate) fn decode_word(&self, word: &[u8], field: &RawField<'_>) -> Result<Value<'static>> {
        match self {
            ElemDecoder::Native(decoder) => {
                let sub = field.with_bytes(word);
                Ok(decoder.decode(&sub)?.into_owned())
            }
            ElemDecoder::Hook(hook) => {
                let sub = field.with_bytes(word);
                decode_via_hook(*hook, &sub)
            }
            ElemDecoder::String => Ok(Value::Text {
                bytes: Cow::Owned(word.to_vec()),
                encoding: field.encoding,
            }),
        }
    }
}

fn decode_via_hook(hook: &dyn DecodeHook, field: &RawField<'_>) -> Result<Value<'static>> {
    let text = std::str::from_utf8(field.bytes).wrap_err_with(|| {
        format!(
            "invalid UTF-8 for external decoder in row {} column {}",
            field.row, field.column
        )
    })?;
    hook.decode(text, field.row, field.column)
}
