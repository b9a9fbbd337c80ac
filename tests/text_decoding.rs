//! # Text Decoding Integration Tests
//!
//! End-to-end coverage of the decoder surface over realistic server
//! output:
//!
//! - Boolean: hard failure on empty input, `t`-prefix truthiness
//! - Integer: fast-path boundary and wide fallback, 1 to 25 digits
//! - Array: flat, nested, NULL entries, quoted words
//! - Identifier: quoted segments and escaped quotes
//! - FromBase64: identity text, binary bytes, element redelegation
//! - Timestamps: fractional seconds, UTC offsets, fallback-to-text
//! - Idempotence: decode -> re-encode canonical text -> decode again
//!
//! A small canonical re-encoder lives at the bottom of this file; the
//! library itself only decodes.

use std::sync::Arc;

use pgtext::{Composite, DecodeHook, Decoder, Encoding, Format, RawField, Value};

fn decode(decoder: &Decoder, input: &[u8]) -> Value<'static> {
    let field = RawField::new(input, 0, 0, Encoding::UTF8);
    decoder.decode(&field).unwrap().into_owned()
}

fn text(s: &str) -> Value<'static> {
    Value::text(s.as_bytes().to_vec(), Encoding::UTF8)
}

mod boolean {
    use super::*;

    #[test]
    fn empty_input_always_fails() {
        let field = RawField::new(b"", 5, 1, Encoding::UTF8);
        let err = Decoder::Boolean.decode(&field).unwrap_err();
        assert!(err.to_string().contains("row 5 column 1"));
    }

    #[test]
    fn first_byte_t_is_true_everything_else_false() {
        assert_eq!(decode(&Decoder::Boolean, b"t"), Value::Bool(true));
        assert_eq!(decode(&Decoder::Boolean, b"tr"), Value::Bool(true));
        assert_eq!(decode(&Decoder::Boolean, b"f"), Value::Bool(false));
        assert_eq!(decode(&Decoder::Boolean, b"false"), Value::Bool(false));
        assert_eq!(decode(&Decoder::Boolean, b"1"), Value::Bool(false));
    }
}

mod integer {
    use super::*;

    #[test]
    fn round_trips_across_the_fast_path_boundary() {
        // 1, 11, 111, ... up to 25 digits, both signs.
        let mut text = String::new();
        for digit in 1..=25 {
            text.push(char::from_digit(digit % 10, 10).unwrap());
            let expected: i128 = text.parse().unwrap();
            for (input, want) in [
                (text.clone(), expected),
                (format!("-{text}"), -expected),
            ] {
                let got = decode(&Decoder::Integer, input.as_bytes());
                let got_wide = match got {
                    Value::Int(n) => n as i128,
                    Value::BigInt(n) => n,
                    other => panic!("unexpected value {other:?} for {input}"),
                };
                assert_eq!(got_wide, want, "input {input}");
            }
        }
    }

    #[test]
    fn narrow_results_use_the_native_width() {
        assert!(matches!(decode(&Decoder::Integer, b"7"), Value::Int(7)));
        assert!(matches!(
            decode(&Decoder::Integer, b"9223372036854775807"),
            Value::Int(i64::MAX)
        ));
        assert!(matches!(
            decode(&Decoder::Integer, b"9223372036854775808"),
            Value::BigInt(_)
        ));
    }
}

mod array {
    use super::*;

    fn int_array() -> Decoder {
        Decoder::Array(Composite::new(Some(Decoder::Integer)))
    }

    #[test]
    fn empty_array() {
        assert_eq!(decode(&int_array(), b"{}"), Value::Array(vec![]));
    }

    #[test]
    fn flat_and_null() {
        assert_eq!(
            decode(&int_array(), b"{1,2,3}"),
            Value::Array(vec![Value::Int(1), Value::Int(2), Value::Int(3)])
        );
        assert_eq!(
            decode(&int_array(), b"{1,NULL,3}"),
            Value::Array(vec![Value::Int(1), Value::Null, Value::Int(3)])
        );
    }

    #[test]
    fn nested() {
        assert_eq!(
            decode(&int_array(), b"{{1,2},{3,4}}"),
            Value::Array(vec![
                Value::Array(vec![Value::Int(1), Value::Int(2)]),
                Value::Array(vec![Value::Int(3), Value::Int(4)]),
            ])
        );
    }

    #[test]
    fn quoted_null_is_a_word_not_null() {
        let strings = Decoder::Array(Composite::new(None));
        assert_eq!(
            decode(&strings, b"{\"NULL\"}"),
            Value::Array(vec![text("NULL")])
        );
    }

    #[test]
    fn array_of_timestamps() {
        let decoder = Decoder::Array(Composite::new(Some(Decoder::Timestamp)));
        let got = decode(&decoder, b"{\"2021-03-04 10:20:30\",NULL}");
        let Value::Array(elems) = got else {
            panic!("expected array");
        };
        assert!(matches!(elems[0], Value::Timestamp { .. }));
        assert_eq!(elems[1], Value::Null);
    }
}

mod identifier {
    use super::*;

    fn ident() -> Decoder {
        Decoder::Identifier(Composite::new(None))
    }

    #[test]
    fn dotted_and_quoted_segments() {
        assert_eq!(
            decode(&ident(), b"schema.\"ta.ble\".\"col\""),
            Value::Identifier(vec![text("schema"), text("ta.ble"), text("col")])
        );
    }

    #[test]
    fn escaped_quote_in_segment() {
        assert_eq!(
            decode(&ident(), b"\"a\"\"b\""),
            Value::Identifier(vec![text("a\"b")])
        );
    }
}

mod from_base64 {
    use super::*;

    #[test]
    fn text_element_returns_caller_tagged_text() {
        let decoder = Decoder::FromBase64(Composite::new(Some(Decoder::String)));
        let field = RawField::new(b"aGVsbG8=", 0, 0, Encoding::new(12));
        let v = decoder.decode(&field).unwrap();
        assert_eq!(v, Value::text(b"hello".to_vec(), Encoding::new(12)));
    }

    #[test]
    fn binary_element_returns_binary_safe_bytes() {
        let decoder = Decoder::FromBase64(
            Composite::new(Some(Decoder::Bytea)).with_format(Format::Binary),
        );
        let v = decode(&decoder, b"aGVsbG8=");
        assert_eq!(v, Value::Bytes(b"hello".to_vec().into()));
    }

    #[test]
    fn wrapped_envelope_with_inner_integer() {
        let decoder = Decoder::FromBase64(Composite::new(Some(Decoder::Integer)));
        assert_eq!(decode(&decoder, b"MTIz\r\nNDU="), Value::Int(12345));
    }
}

mod timestamps {
    use super::*;
    use chrono::{Local, TimeZone};

    /// Epoch micros for a civil time resolved in the host zone, matching
    /// the conversion the zoneless decoder performs.
    fn local_micros(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> i64 {
        Local
            .with_ymd_and_hms(y, mo, d, h, mi, s)
            .earliest()
            .unwrap()
            .timestamp()
            * 1_000_000
    }

    #[test]
    fn zoneless_uses_the_host_local_calendar() {
        let v = decode(&Decoder::Timestamp, b"2021-03-04 10:20:30");
        assert_eq!(
            v,
            Value::Timestamp {
                micros: local_micros(2021, 3, 4, 10, 20, 30)
            }
        );
        // Resolving the instant back through the host zone recovers the
        // written calendar fields exactly.
        let Value::Timestamp { micros } = v else {
            panic!("expected a timestamp");
        };
        let resolved = Local.timestamp_opt(micros / 1_000_000, 0).unwrap();
        assert_eq!(
            resolved.format("%Y-%m-%d %H:%M:%S").to_string(),
            "2021-03-04 10:20:30"
        );
    }

    #[test]
    fn fractional_half_second() {
        let v = decode(&Decoder::Timestamp, b"2021-03-04 10:20:30.5");
        assert_eq!(
            v,
            Value::Timestamp {
                micros: local_micros(2021, 3, 4, 10, 20, 30) + 500_000
            }
        );
    }

    #[test]
    fn not_a_date_is_identity_not_error() {
        assert_eq!(
            decode(&Decoder::Timestamp, b"not-a-date"),
            text("not-a-date")
        );
        assert_eq!(
            decode(&Decoder::TimestampTz, b"not-a-date"),
            text("not-a-date")
        );
    }

    #[test]
    fn offset_preserves_wall_clock_and_instant() {
        let plus_two = decode(&Decoder::TimestampTz, b"2021-03-04 10:20:30+02");
        let Value::TimestampTz {
            micros,
            offset_secs,
        } = plus_two
        else {
            panic!("expected zoned timestamp");
        };
        assert_eq!(offset_secs, 7200);

        // Same instant as its UTC-normalized spelling.
        let utc = decode(&Decoder::TimestampTz, b"2021-03-04 08:20:30+00");
        assert_eq!(
            utc,
            Value::TimestampTz {
                micros,
                offset_secs: 0
            }
        );

        // Shifting the instant by the captured offset reproduces the
        // original wall clock.
        let wall_secs = micros / 1_000_000 + offset_secs as i64;
        let wall = chrono::DateTime::from_timestamp(wall_secs, 0).unwrap();
        assert_eq!(
            wall.format("%Y-%m-%d %H:%M:%S").to_string(),
            "2021-03-04 10:20:30"
        );
    }
}

mod external_hooks {
    use super::*;
    use eyre::Result;

    struct Celsius;

    impl DecodeHook for Celsius {
        fn decode(&self, text: &str, _row: usize, _column: usize) -> Result<Value<'static>> {
            let degrees: f64 = text
                .strip_suffix("C")
                .ok_or_else(|| eyre::eyre!("missing unit in '{text}'"))?
                .parse()?;
            Ok(Value::Float(degrees))
        }
    }

    #[test]
    fn array_elements_through_external_hook() {
        let decoder = Decoder::Array(Composite::new(Some(Decoder::External(Arc::new(Celsius)))));
        assert_eq!(
            decode(&decoder, b"{21.5C,-4C}"),
            Value::Array(vec![Value::Float(21.5), Value::Float(-4.0)])
        );
    }

    #[test]
    fn hook_failure_propagates_out_of_the_composite() {
        let decoder = Decoder::Array(Composite::new(Some(Decoder::External(Arc::new(Celsius)))));
        let field = RawField::new(b"{21.5C,oops}", 0, 0, Encoding::UTF8);
        assert!(decoder.decode(&field).is_err());
    }
}

mod idempotence {
    use super::*;

    /// Canonical text form of a decoded value, standing in for the
    /// server-side encoder this library deliberately does not contain.
    fn reencode(value: &Value<'_>) -> String {
        match value {
            Value::Null => "NULL".to_string(),
            Value::Bool(true) => "t".to_string(),
            Value::Bool(false) => "f".to_string(),
            Value::Int(n) => n.to_string(),
            Value::BigInt(n) => n.to_string(),
            Value::Array(elems) => {
                let inner: Vec<String> = elems.iter().map(reencode).collect();
                format!("{{{}}}", inner.join(","))
            }
            other => panic!("no canonical form in this test for {other:?}"),
        }
    }

    #[test]
    fn decode_reencode_decode_is_stable() {
        let cases: [(Decoder, &[u8]); 4] = [
            (Decoder::Boolean, b"t"),
            (Decoder::Integer, b"-31337"),
            (Decoder::Integer, b"79228162514264337593543950336"),
            (
                Decoder::Array(Composite::new(Some(Decoder::Integer))),
                b"{1,NULL,{2,3}}",
            ),
        ];
        for (decoder, input) in cases {
            let first = decode(&decoder, input);
            let canonical = reencode(&first);
            let second = decode(&decoder, canonical.as_bytes());
            assert_eq!(first, second, "input {:?}", String::from_utf8_lossy(input));
        }
    }
}
