//! Fuzz testing for the text-format decoders.
//!
//! This fuzz target feeds arbitrary byte sequences through every decoder
//! configuration to ensure malformed input is handled gracefully without
//! panicking, out-of-bounds access, or unbounded recursion trouble.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use pgtext::{Composite, Decoder, Encoding, Format, RawField};

#[derive(Debug, Arbitrary)]
struct DecodeInput {
    decoder: FuzzDecoder,
    data: Vec<u8>,
}

#[derive(Debug, Arbitrary, Clone, Copy)]
enum FuzzDecoder {
    Boolean,
    Integer,
    Float,
    String,
    Bytea,
    Timestamp,
    TimestampTz,
    ArrayOfStrings,
    ArrayOfIntegers,
    NestedArray,
    Identifier,
    FromBase64Text,
    FromBase64Binary,
}

impl From<FuzzDecoder> for Decoder {
    fn from(fd: FuzzDecoder) -> Self {
        match fd {
            FuzzDecoder::Boolean => Decoder::Boolean,
            FuzzDecoder::Integer => Decoder::Integer,
            FuzzDecoder::Float => Decoder::Float,
            FuzzDecoder::String => Decoder::String,
            FuzzDecoder::Bytea => Decoder::Bytea,
            FuzzDecoder::Timestamp => Decoder::Timestamp,
            FuzzDecoder::TimestampTz => Decoder::TimestampTz,
            FuzzDecoder::ArrayOfStrings => Decoder::Array(Composite::new(None)),
            FuzzDecoder::ArrayOfIntegers => {
                Decoder::Array(Composite::new(Some(Decoder::Integer)))
            }
            FuzzDecoder::NestedArray => Decoder::Array(Composite::new(Some(Decoder::Array(
                Composite::new(Some(Decoder::Float)),
            )))),
            FuzzDecoder::Identifier => Decoder::Identifier(Composite::new(None)),
            FuzzDecoder::FromBase64Text => Decoder::FromBase64(Composite::new(None)),
            FuzzDecoder::FromBase64Binary => Decoder::FromBase64(
                Composite::new(Some(Decoder::Bytea)).with_format(Format::Binary),
            ),
        }
    }
}

fuzz_target!(|input: DecodeInput| {
    // Deeply nested `{` recursion is bounded by input length; keep the
    // input small enough that the recursion fits the default stack.
    if input.data.len() > 1 << 12 {
        return;
    }

    let decoder: Decoder = input.decoder.into();
    let field = RawField::new(&input.data, 0, 0, Encoding::UTF8);
    let _ = decoder.decode(&field);
});
