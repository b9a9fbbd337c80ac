//! # Identifier Path Splitter
//!
//! Splits a dotted path of possibly double-quoted segments into its
//! components: `schema."ta.ble"."col"` -> `schema`, `ta.ble`, `col`.
//! A `.` only splits outside quotes, a doubled `""` inside a quoted
//! segment unescapes to one literal quote, and the final segment is
//! emitted when the scan ends, so the result always has at least one
//! component.

use eyre::Result;

use super::{Composite, RawField};
use crate::types::Value;

#[derive(PartialEq, Clone, Copy)]
enum Quote {
    Outside,
    /// Inside a quoted segment, directly after a quote character. The next
    /// byte decides whether that quote closed the segment or starts a
    /// doubled-quote escape.
    AfterQuote,
    Inside,
}

/// Decodes a dotted identifier path into its components.
pub fn decode_identifier<'a>(composite: &Composite, field: &RawField<'a>) -> Result<Value<'a>> {
    let elem = composite.resolve_elem();
    let bytes = field.bytes;
    let mut word = vec![0u8; bytes.len()];
    let mut word_len = 0;
    let mut out = Vec::new();
    let mut quote = Quote::Outside;

    for &c in bytes {
        if c == b'.' && quote != Quote::Inside {
            out.push(elem.decode_word(&word[..word_len], field)?);
            quote = Quote::Outside;
            word_len = 0;
        } else if c == b'"' {
            match quote {
                Quote::AfterQuote => {
                    word[word_len] = c;
                    word_len += 1;
                    quote = Quote::Inside;
                }
                Quote::Inside => quote = Quote::AfterQuote,
                Quote::Outside => quote = Quote::Inside,
            }
        } else {
            word[word_len] = c;
            word_len += 1;
        }
    }

    out.push(elem.decode_word(&word[..word_len], field)?);
    Ok(Value::Identifier(out))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::Decoder;
    use crate::types::Encoding;

    fn decode(input: &[u8]) -> Value<'static> {
        let decoder = Decoder::Identifier(Composite::new(None));
        let field = RawField::new(input, 0, 0, Encoding::UTF8);
        decoder.decode(&field).unwrap().into_owned()
    }

    fn text(s: &str) -> Value<'static> {
        Value::text(s.as_bytes().to_vec(), Encoding::UTF8)
    }

    #[test]
    fn plain_dotted_path() {
        assert_eq!(
            decode(b"schema.table.col"),
            Value::Identifier(vec![text("schema"), text("table"), text("col")])
        );
    }

    #[test]
    fn quoted_segment_keeps_embedded_dot() {
        assert_eq!(
            decode(b"schema.\"ta.ble\".\"col\""),
            Value::Identifier(vec![text("schema"), text("ta.ble"), text("col")])
        );
    }

    #[test]
    fn doubled_quote_unescapes() {
        assert_eq!(decode(b"\"a\"\"b\""), Value::Identifier(vec![text("a\"b")]));
    }

    #[test]
    fn single_segment() {
        assert_eq!(decode(b"users"), Value::Identifier(vec![text("users")]));
    }

    #[test]
    fn empty_input_yields_one_empty_segment() {
        assert_eq!(decode(b""), Value::Identifier(vec![text("")]));
    }
}
