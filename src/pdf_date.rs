//! PDF date strings.
//!
//! The format is `D:YYYYMMDDHHmmSSOHH'mm'` where everything after the year is
//! optional and `O` is `Z`, `+` or `-`. Producers disagree on how much of it
//! to emit, so parsing is lenient: consumption stops at the first malformed
//! segment and the remaining segments take their defaults.

use time::{Date, Month, OffsetDateTime, PrimitiveDateTime, Time, UtcOffset};

struct Segments<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Segments<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            bytes: text.as_bytes(),
            pos: 0,
        }
    }

    /// Consume exactly `n` ASCII digits, or consume nothing.
    fn take_digits(&mut self, n: usize) -> Option<u32> {
        let end = self.pos + n;
        let slice = self.bytes.get(self.pos..end)?;
        if !slice.iter().all(u8::is_ascii_digit) {
            return None;
        }
        let mut value = 0u32;
        for byte in slice {
            value = value * 10 + u32::from(byte - b'0');
        }
        self.pos = end;
        Some(value)
    }

    fn take_byte(&mut self, byte: u8) -> bool {
        if self.bytes.get(self.pos) == Some(&byte) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }
}

/// A segment value, or its default when absent or out of range.
fn segment(value: Option<u32>, min: u32, max: u32, default: u32) -> u32 {
    match value {
        Some(v) if (min..=max).contains(&v) => v,
        _ => default,
    }
}

/// Parse a PDF date string into a timestamp.
///
/// The `D:` prefix itself is optional since some producers omit it. Returns
/// `None` without a four-digit year, and for dates that do not exist on the
/// calendar (a February 30th is rejected, not rolled over).
pub fn parse(raw: &str) -> Option<OffsetDateTime> {
    let trimmed = raw.trim();
    let rest = trimmed.strip_prefix("D:").unwrap_or(trimmed);
    let mut segments = Segments::new(rest);

    let year = i32::try_from(segments.take_digits(4)?).ok()?;
    let month = segment(segments.take_digits(2), 1, 12, 1);
    let day = segment(segments.take_digits(2), 1, 31, 1);
    let hour = segment(segments.take_digits(2), 0, 23, 0);
    let minute = segment(segments.take_digits(2), 0, 59, 0);
    let second = segment(segments.take_digits(2), 0, 59, 0);

    let offset = match segments.peek() {
        Some(b'+') | Some(b'-') => {
            let sign: i8 = if segments.take_byte(b'-') { -1 } else { 1 };
            if sign == 1 {
                segments.take_byte(b'+');
            }
            let offset_hour = segment(segments.take_digits(2), 0, 23, 0) as i8;
            segments.take_byte(b'\'');
            let offset_minute = segment(segments.take_digits(2), 0, 59, 0) as i8;
            UtcOffset::from_hms(sign * offset_hour, sign * offset_minute, 0).ok()?
        }
        // 'Z' and a missing designator both mean UTC
        _ => UtcOffset::UTC,
    };

    let month = Month::try_from(month as u8).ok()?;
    let date = Date::from_calendar_date(year, month, day as u8).ok()?;
    let time = Time::from_hms(hour as u8, minute as u8, second as u8).ok()?;
    Some(PrimitiveDateTime::new(date, time).assume_offset(offset))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_complete_date_with_offset() {
        let stamp = parse("D:20240615142312+02'00'").unwrap();
        assert_eq!(stamp.year(), 2024);
        assert_eq!(stamp.month(), Month::June);
        assert_eq!(stamp.day(), 15);
        assert_eq!(stamp.hour(), 14);
        assert_eq!(stamp.minute(), 23);
        assert_eq!(stamp.second(), 12);
        assert_eq!(stamp.offset(), UtcOffset::from_hms(2, 0, 0).unwrap());
    }

    #[test]
    fn negative_offsets_shift_the_instant() {
        let stamp = parse("D:20240615100000-05'00'").unwrap();
        let utc = stamp.to_offset(UtcOffset::UTC);
        assert_eq!(utc.hour(), 15);
        assert_eq!(utc.day(), 15);
    }

    #[test]
    fn a_bare_year_defaults_the_rest() {
        let stamp = parse("D:2024").unwrap();
        assert_eq!(stamp.year(), 2024);
        assert_eq!(stamp.month(), Month::January);
        assert_eq!(stamp.day(), 1);
        assert_eq!(stamp.hour(), 0);
        assert_eq!(stamp.offset(), UtcOffset::UTC);
    }

    #[test]
    fn the_prefix_is_optional() {
        let stamp = parse("20240102030405").unwrap();
        assert_eq!(stamp.month(), Month::January);
        assert_eq!(stamp.day(), 2);
        assert_eq!(stamp.hour(), 3);
        assert_eq!(stamp.minute(), 4);
        assert_eq!(stamp.second(), 5);
    }

    #[test]
    fn a_malformed_segment_stops_consumption() {
        // "AB" is not a month; day digits after it must not be reinterpreted.
        let stamp = parse("D:2024AB15").unwrap();
        assert_eq!(stamp.year(), 2024);
        assert_eq!(stamp.month(), Month::January);
        assert_eq!(stamp.day(), 1);
    }

    #[test]
    fn out_of_range_segments_fall_back_to_defaults() {
        let stamp = parse("D:20241301").unwrap();
        assert_eq!(stamp.month(), Month::January);
        assert_eq!(stamp.day(), 1);

        let stamp = parse("D:20240615250000").unwrap();
        assert_eq!(stamp.hour(), 0);
    }

    #[test]
    fn zulu_means_utc() {
        let stamp = parse("D:20240615120000Z").unwrap();
        assert_eq!(stamp.offset(), UtcOffset::UTC);
    }

    #[test]
    fn leap_days_parse_and_impossible_days_fail() {
        assert!(parse("D:20240229").is_some());
        assert!(parse("D:20230229").is_none());
        assert!(parse("D:20230230").is_none());
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(parse("").is_none());
        assert!(parse("hello").is_none());
        assert!(parse("D:").is_none());
        assert!(parse("D:202").is_none());
    }
}
