//! Field-level helpers for NMEA decoding
//!
//! Every helper distinguishes an empty field (`Ok(None)`) from a field that is
//! present but malformed (`Err`), so a reported zero never gets confused with
//! a value the receiver did not send.

use crate::conversion::nmea_to_decimal_degrees;
use crate::error::{LoggerError, Result};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use std::str::FromStr;

/// XOR of every byte between `$` and `*`
pub fn nmea_checksum(body: &str) -> u8 {
    body.bytes().fold(0u8, |acc, b| acc ^ b)
}

/// Strip the `$` sentinel and the optional `*hh` suffix, verifying the checksum
///
/// Returns the sentence body (address and fields). A line without a checksum
/// suffix is accepted as-is.
pub fn strip_and_verify(line: &str) -> Result<&str> {
    let line = line.trim();
    let rest = line
        .strip_prefix('$')
        .ok_or_else(|| LoggerError::Decode("missing '$' sentinel".to_string()))?;

    match rest.split_once('*') {
        Some((body, suffix)) => {
            let expected = suffix
                .get(..2)
                .and_then(|hex| u8::from_str_radix(hex, 16).ok())
                .ok_or_else(|| {
                    LoggerError::Decode(format!("malformed checksum suffix '{}'", suffix))
                })?;
            let actual = nmea_checksum(body);
            if actual != expected {
                return Err(LoggerError::Decode(format!(
                    "checksum mismatch: expected {:02X}, computed {:02X}",
                    expected, actual
                )));
            }
            Ok(body)
        }
        None => Ok(rest),
    }
}

/// Parse an optional numeric field
///
/// Only plain decimal notation is accepted, so `nan`, `inf` and exponents
/// are rejected even though `str::parse` would take them.
pub fn parse_optional<T: FromStr>(field: &str, name: &str) -> Result<Option<T>> {
    let field = field.trim();
    if field.is_empty() {
        return Ok(None);
    }
    if !field
        .bytes()
        .all(|b| b.is_ascii_digit() || matches!(b, b'.' | b'-' | b'+'))
    {
        return Err(LoggerError::Decode(format!(
            "non-numeric {} field '{}'",
            name, field
        )));
    }
    field
        .parse::<T>()
        .map(Some)
        .map_err(|_| LoggerError::Decode(format!("non-numeric {} field '{}'", name, field)))
}

/// Parse a coordinate and its hemisphere letter into signed decimal degrees
///
/// Either part being empty means the coordinate was not reported.
pub fn parse_coordinate(value: &str, hemisphere: &str) -> Result<Option<f64>> {
    let raw = match parse_optional::<f64>(value, "coordinate")? {
        Some(raw) => raw,
        None => return Ok(None),
    };

    let sign = match hemisphere.trim() {
        "" => return Ok(None),
        "N" | "E" => 1.0,
        "S" | "W" => -1.0,
        other => {
            return Err(LoggerError::Decode(format!(
                "invalid hemisphere '{}'",
                other
            )))
        }
    };

    Ok(Some(sign * nmea_to_decimal_degrees(raw)))
}

/// Parse an `hhmmss[.sss]` time field
pub fn parse_time(field: &str) -> Option<NaiveTime> {
    let field = field.trim();
    if field.len() < 6 || !field.is_char_boundary(6) {
        return None;
    }
    let (whole, fraction) = field.split_at(6);
    let hour = whole.get(0..2)?.parse::<u32>().ok()?;
    let minute = whole.get(2..4)?.parse::<u32>().ok()?;
    let second = whole.get(4..6)?.parse::<u32>().ok()?;

    let micros = match fraction.strip_prefix('.') {
        Some(digits) if !digits.is_empty() => {
            let seconds = format!("0.{}", digits).parse::<f64>().ok()?;
            (seconds * 1_000_000.0).round() as u32
        }
        Some(_) => 0,
        None if fraction.is_empty() => 0,
        None => return None,
    };

    NaiveTime::from_hms_micro_opt(hour, minute, second, micros.min(999_999))
}

/// Parse a `ddmmyy` date field; two-digit years 69-99 are 19xx, 00-68 are 20xx
pub fn parse_date(field: &str) -> Option<NaiveDate> {
    let field = field.trim();
    if field.len() != 6 {
        return None;
    }
    let day = field.get(0..2)?.parse::<u32>().ok()?;
    let month = field.get(2..4)?.parse::<u32>().ok()?;
    let short_year = field.get(4..6)?.parse::<i32>().ok()?;
    let year = if short_year >= 69 {
        1900 + short_year
    } else {
        2000 + short_year
    };
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Combine RMC date and time fields into a UTC timestamp
pub fn parse_fix_time(date: &str, time: &str) -> Option<DateTime<Utc>> {
    let date = parse_date(date)?;
    let time = parse_time(time)?;
    Some(date.and_time(time).and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_checksum_verification() {
        let line = "$GPRMC,123519,A,4807.038,N,01131.000,E,022.4,084.4,230394,003.1,W*6A";
        let body = strip_and_verify(line).unwrap();
        assert!(body.starts_with("GPRMC,123519"));
        assert!(!body.contains('*'));

        // Corrupted payload, same checksum
        let bad = "$GPRMC,123519,A,4807.038,N,01131.000,E,022.4,084.4,230394,003.1,E*6A";
        assert!(strip_and_verify(bad).unwrap_err().is_decode());

        // Lowercase hex and trailing CRLF are fine
        let crlf = "$GPRMC,123519,A,4807.038,N,01131.000,E,022.4,084.4,230394,003.1,W*6a\r\n";
        assert!(strip_and_verify(crlf).is_ok());
    }

    #[test]
    fn test_missing_checksum_accepted() {
        assert_eq!(strip_and_verify("$GPGGA,1,2,3").unwrap(), "GPGGA,1,2,3");
    }

    #[test]
    fn test_bad_sentinel_and_suffix_rejected() {
        assert!(strip_and_verify("GPGGA,1,2,3").is_err());
        assert!(strip_and_verify("!AIVDM,1,1").is_err());
        assert!(strip_and_verify("$GPGGA,1,2,3*Z").is_err());
        assert!(strip_and_verify("").is_err());
    }

    #[test]
    fn test_parse_optional_distinguishes_empty_from_zero() {
        assert_eq!(parse_optional::<f64>("", "speed").unwrap(), None);
        assert_eq!(parse_optional::<f64>("0.0", "speed").unwrap(), Some(0.0));
        assert_eq!(parse_optional::<u32>("08", "sats").unwrap(), Some(8));
        assert!(parse_optional::<f64>("abc", "speed").is_err());
    }

    #[test]
    fn test_parse_optional_rejects_non_finite() {
        for field in ["nan", "NaN", "inf", "-inf", "infinity", "1e400", "2.5E1"] {
            assert!(
                parse_optional::<f64>(field, "speed").is_err(),
                "field {:?}",
                field
            );
        }
        assert!(parse_coordinate("inf", "E").is_err());
        assert_eq!(parse_optional::<f64>("-12.5", "alt").unwrap(), Some(-12.5));
    }

    #[test]
    fn test_parse_coordinate() {
        let lat = parse_coordinate("4807.038", "N").unwrap().unwrap();
        assert!((lat - 48.1173).abs() < 1e-6);

        let lon = parse_coordinate("01131.000", "W").unwrap().unwrap();
        assert!((lon + 11.516_666_6).abs() < 1e-6);

        assert_eq!(parse_coordinate("", "N").unwrap(), None);
        assert_eq!(parse_coordinate("4807.038", "").unwrap(), None);
        assert!(parse_coordinate("4807.038", "Q").is_err());
        assert!(parse_coordinate("48o7.038", "N").is_err());
    }

    #[test]
    fn test_parse_time_and_date() {
        let time = parse_time("123519.25").unwrap();
        assert_eq!((time.hour(), time.minute(), time.second()), (12, 35, 19));
        assert_eq!(time.nanosecond(), 250_000_000);

        assert!(parse_time("1235").is_none());
        assert!(parse_time("126019").is_none());
        assert!(parse_time("123519x").is_none());

        let date = parse_date("230394").unwrap();
        assert_eq!((date.year(), date.month(), date.day()), (1994, 3, 23));
        assert_eq!(parse_date("050324").unwrap().year(), 2024);
        assert!(parse_date("320324").is_none());
        assert!(parse_date("").is_none());
    }

    #[test]
    fn test_parse_fix_time_requires_both_fields() {
        assert!(parse_fix_time("230394", "123519").is_some());
        assert!(parse_fix_time("", "123519").is_none());
        assert!(parse_fix_time("230394", "").is_none());
    }
}
