//! Unit and format conversions for GPS data
//!
//! Speed and course are rounded to one decimal as soon as they are decoded;
//! the log document later truncates those rounded values to whole numbers.

use chrono::{DateTime, Utc};

/// Knots to meters per second
pub const KNOTS_TO_METERS_PER_SECOND: f64 = 0.514444;

/// Round to one decimal place (half away from zero)
pub fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Convert speed over ground from knots to m/s, rounded to one decimal
pub fn knots_to_meters_per_second(knots: f64) -> f64 {
    round_to_tenth(knots * KNOTS_TO_METERS_PER_SECOND)
}

/// Truncate toward zero, as used for the integer `cog` and `spd` fields
pub fn truncate_to_whole(value: f64) -> i64 {
    value.trunc() as i64
}

/// Convert an NMEA `ddmm.mmmm` / `dddmm.mmmm` value to decimal degrees
pub fn nmea_to_decimal_degrees(raw: f64) -> f64 {
    let degrees = (raw / 100.0).trunc();
    let minutes = raw - degrees * 100.0;
    degrees + minutes / 60.0
}

/// Fix time as written to `posTime`, whole seconds
pub fn format_fix_time(time: &DateTime<Utc>) -> String {
    time.format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

/// Wall-clock time as written to `dataCtrTime` and `rptTime`, microseconds
pub fn format_capture_time(time: &DateTime<Utc>) -> String {
    time.format("%Y-%m-%dT%H:%M:%S%.6fZ").to_string()
}

/// File stem for the per-run log document, e.g. `20240305T123519Z`
pub fn format_log_stem(time: &DateTime<Utc>) -> String {
    time.format("%Y%m%dT%H%M%SZ").to_string()
}
