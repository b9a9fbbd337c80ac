//! # Array Literal Parser
//!
//! Recursive-descent parser for PostgreSQL's one-dimensional array syntax,
//! e.g. `{1,2,{3,4},NULL,"quoted word"}`.
//!
//! ## State Machine
//!
//! Per nesting level the parser tracks a word length into the shared
//! scratch buffer, a quote state and a skip flag:
//!
//! ```text
//! quote state:
//!   Never   outside quotes, current word never quoted
//!   Inside  between quotes; backslash escapes the next byte
//!   Closed  outside quotes, current word was previously quoted
//!
//! skip flag:
//!   set right after a nested sub-array was pushed, so the delimiter
//!   that follows does not also emit an empty trailing word
//! ```
//!
//! A completed unquoted word of exactly the four bytes `NULL` becomes
//! `Value::Null`; a quoted `"NULL"` stays a word (only bare NULL is null,
//! at any depth). `{` recurses one level; the parent loop advances past
//! the child's closing brace. `{}` short-circuits to an empty array.
//!
//! ## Buffers
//!
//! One scratch buffer sized to the full input is allocated per top-level
//! call and shared down the recursion: no single word can exceed the
//! remaining input, and each level only touches `word[..word_len]` before
//! its element is decoded, so reuse across levels is safe.
//!
//! ## Malformed Input
//!
//! Unterminated quotes or braces read to the end of the buffer and return
//! what was accumulated. The result layer hands us server-generated
//! output, which is always well formed.

use eyre::Result;

use super::{Composite, ElemDecoder, RawField};
use crate::types::Value;

/// Decodes a nested array literal, delegating each leaf word to the
/// composite's element decoder.
pub fn decode_array<'a>(composite: &Composite, field: &RawField<'a>) -> Result<Value<'a>> {
    let elem = composite.resolve_elem();
    let mut word = vec![0u8; field.bytes.len()];
    let mut index = 1; // skip the opening brace
    read_array(composite, &elem, field, &mut index, &mut word)
}

#[derive(PartialEq, Clone, Copy)]
enum Quote {
    Never,
    Inside,
    Closed,
}

fn read_array<'a>(
    composite: &Composite,
    elem: &ElemDecoder<'_>,
    field: &RawField<'a>,
    index: &mut usize,
    word: &mut Vec<u8>,
) -> Result<Value<'a>> {
    let bytes = field.bytes;
    let mut out: Vec<Value<'a>> = Vec::new();
    let mut word_len = 0;
    let mut quote = Quote::Never;
    let mut skip_word = false;
    let mut escape_next = false;

    // Empty array: nothing to scan.
    if *index < bytes.len() && bytes[*index] == b'}' {
        return Ok(Value::Array(out));
    }

    while *index < bytes.len() {
        let c = bytes[*index];
        if quote != Quote::Inside {
            if c == composite.delimiter || c == b'}' {
                if !skip_word {
                    if quote == Quote::Never && word_len == 4 && &word[..4] == b"NULL" {
                        out.push(Value::Null);
                    } else {
                        out.push(elem.decode_word(&word[..word_len], field)?);
                    }
                }
                if c == b'}' {
                    return Ok(Value::Array(out));
                }
                skip_word = false;
                quote = Quote::Never;
                word_len = 0;
            } else if c == b'"' {
                quote = Quote::Inside;
            } else if c == b'{' {
                *index += 1;
                out.push(read_array(composite, elem, field, index, word)?);
                // The sub-array is already pushed; the delimiter that
                // follows must not emit an empty word on top of it.
                skip_word = true;
            } else {
                word[word_len] = c;
                word_len += 1;
            }
        } else if escape_next {
            word[word_len] = c;
            word_len += 1;
            escape_next = false;
        } else if c == b'\\' {
            escape_next = true;
        } else if c == b'"' {
            quote = Quote::Closed;
        } else {
            word[word_len] = c;
            word_len += 1;
        }
        *index += 1;
    }

    Ok(Value::Array(out))
}
