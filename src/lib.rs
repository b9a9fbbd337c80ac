//! # pgtext - PostgreSQL Text-Format Value Decoding
//!
//! pgtext converts the textual wire representation of PostgreSQL result
//! values into structured, strongly-typed Rust values. It implements the
//! micro-parsers that make text-format results usable:
//!
//! - **Scalar decoders**: boolean, integer (with a bounded fast path),
//!   float, bytea unescape, string passthrough
//! - **Array decoder**: recursive descent over nested `{...}` literals
//!   with quoting and escaping
//! - **Identifier decoder**: dotted, optionally double-quoted paths
//! - **FromBase64 decoder**: base64 envelope with element redelegation
//! - **Timestamp decoders**: fixed-skeleton date/time with fractional
//!   seconds and an optional UTC offset
//!
//! ## Quick Start
//!
//! ```
//! use pgtext::{Composite, Decoder, Encoding, RawField, Value};
//!
//! let ints = Decoder::Array(Composite::new(Some(Decoder::Integer)));
//! let field = RawField::new(b"{1,2,NULL,4}", 0, 0, Encoding::UTF8);
//!
//! let value = ints.decode(&field).unwrap();
//! assert_eq!(
//!     value,
//!     Value::Array(vec![
//!         Value::Int(1),
//!         Value::Int(2),
//!         Value::Null,
//!         Value::Int(4),
//!     ])
//! );
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────┐
//! │   Caller (client / result layer)     │
//! │   raw bytes + row/column + encoding  │
//! └──────────────────┬───────────────────┘
//!                    v
//! ┌──────────────────────────────────────┐
//! │   Decoder tree (read-only config)    │
//! │   simple │ composite │ external hook │
//! └──────────────────┬───────────────────┘
//!                    v
//! ┌──────────────────────────────────────┐
//! │   Value<'a> (zero-copy where input   │
//! │   bytes can be borrowed directly)    │
//! └──────────────────────────────────────┘
//! ```
//!
//! Composite decoders (Array, FromBase64) carve sub-spans out of the input
//! and recursively hand them to an element decoder resolved once per call;
//! with no element decoder configured, elements come back as plain strings.
//!
//! ## Error Model
//!
//! - Hard failures (empty boolean input, unparseable integers, malformed
//!   bytea/base64) are `eyre` reports carrying row/column coordinates.
//! - Timestamp decoders never fail: input that does not match the grammar
//!   is returned unchanged as text, so the caller decides whether "not a
//!   timestamp" is an error.
//! - The float decoder is best-effort by design, mirroring `strtod`.
//!
//! ## Concurrency
//!
//! Decoding is pure and synchronous. A `Decoder` tree is `Send + Sync` and
//! never mutated during decoding, so one tree can serve any number of
//! threads concurrently. Scratch buffers are per-call locals.
//!
//! ## Module Overview
//!
//! - [`types`]: `Value<'a>` and the opaque `Encoding` tag
//! - [`decode`]: decoder tree, dispatch, and all format parsers

pub mod decode;
pub mod types;

pub use decode::{Composite, DecodeHook, Decoder, Format, RawField};
pub use types::{Encoding, Value};
