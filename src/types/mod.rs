//! # Decoded Value Types
//!
//! This module provides the output side of text decoding:
//!
//! - `value`: the `Value<'a>` enum every decoder produces, plus the opaque
//!   `Encoding` tag callers attach to string results
//!
//! ## Key Types
//!
//! | Type | Purpose |
//! |------|---------|
//! | `Value<'a>` | Decoded value (zero-copy from the input where possible) |
//! | `Encoding` | Opaque caller-supplied encoding identifier |
//!
//! ## Usage
//!
//! ```
//! use pgtext::types::{Encoding, Value};
//!
//! let v = Value::text(b"hello".as_slice(), Encoding::UTF8);
//! assert_eq!(v.as_text(), Some("hello"));
//! ```

mod value;

pub use value::{Encoding, Value};
