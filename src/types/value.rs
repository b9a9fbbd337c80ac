//! # Decoded Value Representation
//!
//! This module provides `Value<'a>`, the output of every text decoder.
//! Values use `Cow` for text/byte payloads so the string decoder can borrow
//! directly from the caller's buffer while composite decoders, which carve
//! words out of per-call scratch space, hand back owned data.
//!
//! ## Value Variants
//!
//! | Variant | Rust Type | Produced by |
//! |---------|-----------|-------------|
//! | Null | - | Array decoder (bare `NULL` word) |
//! | Bool | bool | Boolean decoder |
//! | Int | i64 | Integer decoder (fast path, narrow fallback) |
//! | BigInt | i128 | Integer decoder (wide fallback) |
//! | Float | f64 | Float decoder |
//! | Text | Cow<[u8]> + Encoding | String decoder, timestamp fallback |
//! | Bytes | Cow<[u8]> | Bytea decoder, binary base64 |
//! | Array | Vec<Value> | Array decoder (nests arbitrarily) |
//! | Identifier | Vec<Value> | Identifier decoder |
//! | Timestamp | {micros} | Timestamp-without-zone decoder |
//! | TimestampTz | {micros, offset_secs} | Timestamp-with-zone decoder |
//!
//! ## Encoding Tag
//!
//! `Encoding` is an opaque identifier supplied by the caller and propagated
//! verbatim into `Text` results; this crate never interprets it. The only
//! ids it mints itself are `Encoding::BINARY` for raw byte results out of
//! the base64 path and `Encoding::UTF8` as a convenient default.
//!
//! ## Ownership
//!
//! `Value<'a>` borrows from the decode input where it can. `into_owned`
//! detaches a value (and, recursively, its elements) from whatever buffer
//! it borrowed, which composite decoders need because their words live in
//! scratch space that dies with the call.

use std::borrow::Cow;

/// Opaque caller-supplied encoding identifier.
///
/// Propagated verbatim into [`Value::Text`] results; never interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Encoding(u16);

impl Encoding {
    /// Binary-safe tag used for raw byte results.
    pub const BINARY: Encoding = Encoding(0);
    /// Conventional id for UTF-8 text.
    pub const UTF8: Encoding = Encoding(6);

    pub const fn new(id: u16) -> Self {
        Encoding(id)
    }

    pub const fn id(self) -> u16 {
        self.0
    }
}

/// Decoded value produced by a text decoder.
#[derive(Debug, Clone, PartialEq)]
pub enum Value<'a> {
    Null,
    Bool(bool),
    Int(i64),
    /// Integers too wide for i64, from the integer decoder's wide fallback.
    BigInt(i128),
    Float(f64),
    /// Exact input bytes tagged with the caller's encoding.
    Text {
        bytes: Cow<'a, [u8]>,
        encoding: Encoding,
    },
    /// Raw bytes (bytea unescape, binary base64 results).
    Bytes(Cow<'a, [u8]>),
    /// Ordered array elements; may contain `Null`, nests arbitrarily.
    Array(Vec<Value<'a>>),
    /// Components of a dotted identifier path.
    Identifier(Vec<Value<'a>>),
    /// Timestamp without time zone: microseconds since the Unix epoch,
    /// obtained by resolving the wall-clock fields in the host's local
    /// time zone.
    Timestamp { micros: i64 },
    /// Timestamp with time zone: absolute microseconds since the Unix epoch
    /// plus the signed UTC offset the value was written with, kept so the
    /// original wall clock can be reconstructed for display.
    TimestampTz { micros: i64, offset_secs: i32 },
}

impl<'a> Value<'a> {
    /// Builds a `Text` value over borrowed or owned bytes.
    pub fn text(bytes: impl Into<Cow<'a, [u8]>>, encoding: Encoding) -> Self {
        Value::Text {
            bytes: bytes.into(),
            encoding,
        }
    }

    /// Returns true if this value is an SQL NULL.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns the text payload as `&str` if this is a `Text` value holding
    /// valid UTF-8.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text { bytes, .. } => std::str::from_utf8(bytes).ok(),
            _ => None,
        }
    }

    /// Detaches this value from the buffer it borrows from.
    pub fn into_owned(self) -> Value<'static> {
        match self {
            Value::Null => Value::Null,
            Value::Bool(b) => Value::Bool(b),
            Value::Int(i) => Value::Int(i),
            Value::BigInt(i) => Value::BigInt(i),
            Value::Float(f) => Value::Float(f),
            Value::Text { bytes, encoding } => Value::Text {
                bytes: Cow::Owned(bytes.into_owned()),
                encoding,
            },
            Value::Bytes(b) => Value::Bytes(Cow::Owned(b.into_owned())),
            Value::Array(elems) => {
                Value::Array(elems.into_iter().map(Value::into_owned).collect())
            }
            Value::Identifier(parts) => {
                Value::Identifier(parts.into_iter().map(Value::into_owned).collect())
            }
            Value::Timestamp { micros } => Value::Timestamp { micros },
            Value::TimestampTz {
                micros,
                offset_secs,
            } => Value::TimestampTz {
                micros,
                offset_secs,
            },
        }
    }
}
