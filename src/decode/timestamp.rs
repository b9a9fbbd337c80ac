//! # Timestamp Text Parsers
//!
//! Hand-rolled parsers for the server's timestamp output format:
//!
//! ```text
//! YYYY-MM-DD HH:MM:SS[.d...][ {+|-}HH[:MM[:SS]] ]
//! └────── fixed 19-byte skeleton ──────┘
//! ```
//!
//! The 19-byte skeleton is validated in full before any field extraction
//! begins. The fractional part is variable width: its digit count decides
//! the scale (`.5` is 500000 microseconds), digits past microsecond
//! precision are consumed and discarded. For the zoned variant each offset
//! sub-segment is independently optional and parsed greedily left to
//! right. After all optional segments the input must be fully consumed.
//!
//! ## Leniency
//!
//! These decoders never fail. A skeleton mismatch, trailing bytes, an
//! out-of-range calendar field, or a civil time the host zone cannot map
//! all return the original input unchanged as text, so the caller decides
//! whether "not actually a timestamp" is an error. A misparse is never
//! partially applied.
//!
//! ## Epoch Conversion
//!
//! The two variants resolve the civil fields differently. The zoned
//! variant converts with UTC-based calendar math (days since the Unix
//! epoch accumulated from year/month/day), then subtracts the signed
//! offset to get the true instant; the offset is kept in the value so the
//! original wall clock can be reconstructed for display. The zoneless
//! variant has no offset to anchor it, so it resolves the fields through
//! the host's local time zone. The same text therefore maps to different
//! instants on hosts in different zones.

use chrono::{Local, LocalResult, NaiveDate, TimeZone};

use super::RawField;
use crate::types::Value;

use super::scalar::decode_string;

/// Decodes `timestamp without time zone` output by resolving the civil
/// fields in the host's local time zone. Falls back to the unchanged
/// input text when the value does not match the grammar or names a local
/// time skipped by a zone transition.
pub fn decode_timestamp<'a>(field: &RawField<'a>) -> Value<'a> {
    match parse_timestamp(field.bytes, false).and_then(local_instant_micros) {
        Some(micros) => Value::Timestamp { micros },
        None => decode_string(field),
    }
}

/// Decodes `timestamp with time zone` output, capturing the UTC offset
/// the value was written with. Falls back to the unchanged input text
/// when the value does not match the grammar.
pub fn decode_timestamp_tz<'a>(field: &RawField<'a>) -> Value<'a> {
    match parse_timestamp(field.bytes, true).and_then(|p| {
        let micros = utc_instant_micros(&p)?;
        Some((micros, p.offset_secs))
    }) {
        Some((micros, offset_secs)) => Value::TimestampTz {
            micros,
            offset_secs,
        },
        None => decode_string(field),
    }
}

/// Civil fields as written, before any epoch conversion.
struct ParsedTimestamp {
    year: i32,
    month: u32,
    day: u32,
    hour: u32,
    minute: u32,
    second: u32,
    frac_micros: i64,
    offset_secs: i32,
}

/// Parses the full grammar. Returns None on any deviation so the callers
/// can fall back to the original text.
fn parse_timestamp(bytes: &[u8], with_offset: bool) -> Option<ParsedTimestamp> {
    if !skeleton_matches(bytes) {
        return None;
    }

    let year = read_digits(&bytes[0..4]) as i32;
    let month = read_digits(&bytes[5..7]);
    let day = read_digits(&bytes[8..10]);
    let hour = read_digits(&bytes[11..13]);
    let minute = read_digits(&bytes[14..16]);
    let second = read_digits(&bytes[17..19]);

    let mut pos = 19;
    let mut frac_micros: i64 = 0;

    if bytes.get(pos) == Some(&b'.') {
        pos += 1;
        let mut count = 0;
        while let Some(d) = bytes.get(pos).filter(|b| b.is_ascii_digit()) {
            // Scale by digit count; precision past microseconds is dropped.
            if count < 6 {
                frac_micros = frac_micros * 10 + (d - b'0') as i64;
                count += 1;
            }
            pos += 1;
        }
        if count == 0 {
            return None;
        }
        frac_micros *= 10i64.pow(6 - count);
    }

    let mut offset_secs: i32 = 0;
    if with_offset {
        if let Some(&sign) = bytes.get(pos).filter(|b| matches!(**b, b'+' | b'-')) {
            pos += 1;
            let hours = read_two_digits(bytes, &mut pos)?;
            let mut offset = hours as i32 * 3600;
            if bytes.get(pos) == Some(&b':') {
                pos += 1;
                let minutes = read_two_digits(bytes, &mut pos)?;
                offset += minutes as i32 * 60;
                if bytes.get(pos) == Some(&b':') {
                    pos += 1;
                    let seconds = read_two_digits(bytes, &mut pos)?;
                    offset += seconds as i32;
                }
            }
            // The sign flips the whole offset, sub-minutes included.
            offset_secs = if sign == b'-' { -offset } else { offset };
        }
    }

    // Trailing bytes mean this was not a timestamp after all.
    if pos != bytes.len() {
        return None;
    }

    if hour > 23 || minute > 59 || second > 60 {
        return None;
    }

    Some(ParsedTimestamp {
        year,
        month,
        day,
        hour,
        minute,
        second,
        frac_micros,
        offset_secs,
    })
}

/// UTC-based conversion for the zoned variant: wall-clock epoch from
/// calendar math, then the offset subtracted to reach the true instant.
fn utc_instant_micros(p: &ParsedTimestamp) -> Option<i64> {
    let epoch_days = civil_days_from_epoch(p.year, p.month, p.day)?;
    let wall_secs =
        epoch_days * 86_400 + p.hour as i64 * 3_600 + p.minute as i64 * 60 + p.second as i64;
    let utc_secs = wall_secs - p.offset_secs as i64;
    Some(utc_secs * 1_000_000 + p.frac_micros)
}

/// Host-local conversion for the zoneless variant. A `:60` leap second is
/// resolved as the following second since civil construction rejects it.
/// An ambiguous local time (clocks rolled back) takes the earlier
/// instant; a nonexistent one (clocks rolled forward) is None.
fn local_instant_micros(p: ParsedTimestamp) -> Option<i64> {
    let leap = p.second == 60;
    let second = if leap { 59 } else { p.second };
    let civil = NaiveDate::from_ymd_opt(p.year, p.month, p.day)?
        .and_hms_opt(p.hour, p.minute, second)?;
    let resolved = match Local.from_local_datetime(&civil) {
        LocalResult::Single(dt) => dt,
        LocalResult::Ambiguous(earlier, _) => earlier,
        LocalResult::None => return None,
    };
    let secs = resolved.timestamp() + leap as i64;
    Some(secs * 1_000_000 + p.frac_micros)
}

/// Validates the fixed `YYYY-MM-DD HH:MM:SS` skeleton before any parsing.
fn skeleton_matches(bytes: &[u8]) -> bool {
    if bytes.len() < 19 {
        return false;
    }
    const DIGITS: [usize; 14] = [0, 1, 2, 3, 5, 6, 8, 9, 11, 12, 14, 15, 17, 18];
    DIGITS.iter().all(|&i| bytes[i].is_ascii_digit())
        && bytes[4] == b'-'
        && bytes[7] == b'-'
        && bytes[10] == b' '
        && bytes[13] == b':'
        && bytes[16] == b':'
}

/// Little accumulation helper for pre-validated digit runs.
fn read_digits(bytes: &[u8]) -> u32 {
    bytes.iter().fold(0, |acc, b| acc * 10 + (b - b'0') as u32)
}

fn read_two_digits(bytes: &[u8], pos: &mut usize) -> Option<u32> {
    let pair = bytes.get(*pos..*pos + 2)?;
    if !pair[0].is_ascii_digit() || !pair[1].is_ascii_digit() {
        return None;
    }
    *pos += 2;
    Some(read_digits(pair))
}

/// Days from the Unix epoch to the given civil date, validating month and
/// day ranges. Returns None for dates that do not exist; the callers turn
/// that into the fall-back-to-text path.
fn civil_days_from_epoch(year: i32, month: u32, day: u32) -> Option<i64> {
    if !(1..=12).contains(&month) {
        return None;
    }
    if day < 1 || day > days_in_month(year, month) {
        return None;
    }

    let mut days: i64 = 0;
    if year >= 1970 {
        for y in 1970..year {
            days += if is_leap_year(y) { 366 } else { 365 };
        }
    } else {
        for y in year..1970 {
            days -= if is_leap_year(y) { 366 } else { 365 };
        }
    }
    for m in 1..month {
        days += days_in_month(year, m) as i64;
    }
    Some(days + day as i64 - 1)
}

fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || (year % 400 == 0)
}

fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
        _ => 0,
    }
}
