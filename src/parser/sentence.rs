//! NMEA sentence decoding
//!
//! Classifies a line by the sentence-type part of its address field (the
//! talker id is ignored, so `GPRMC` and `GNRMC` decode the same way) and
//! extracts the fields the logger tracks. Unknown sentence types are
//! `Sentence::Unrecognized`; malformed ones are decode errors, which
//! [`decode_sentence`] swallows.

use crate::conversion::{knots_to_meters_per_second, round_to_tenth};
use crate::error::{LoggerError, Result};
use crate::parser::helpers::{parse_coordinate, parse_fix_time, parse_optional, strip_and_verify};
use crate::types::{DilutionOfPrecision, FixQuality, FixType, PositionVelocity, Sentence};
use log::debug;

/// Minimum field count (address included) for an RMC sentence through the date field
pub const RMC_MIN_FIELDS: usize = 10;
/// Minimum field count for a GGA sentence through the altitude field
pub const GGA_MIN_FIELDS: usize = 10;
/// Minimum field count for a GSA sentence through the PDOP field
pub const GSA_MIN_FIELDS: usize = 16;

/// Sentence type from an address field such as `GPRMC`
fn sentence_type(address: &str) -> Option<&str> {
    if address.len() == 5 && address.bytes().all(|b| b.is_ascii_uppercase()) {
        Some(&address[2..])
    } else {
        None
    }
}

fn require_fields(fields: &[&str], min: usize, kind: &str) -> Result<()> {
    if fields.len() < min {
        return Err(LoggerError::Decode(format!(
            "{} sentence has {} fields, need at least {}",
            kind,
            fields.len(),
            min
        )));
    }
    Ok(())
}

/// Decode an RMC sentence: validity, position, fix time, course and speed
fn parse_rmc(fields: &[&str]) -> Result<PositionVelocity> {
    require_fields(fields, RMC_MIN_FIELDS, "RMC")?;

    let valid = fields[2].trim() == "A";
    let latitude = parse_coordinate(fields[3], fields[4])?;
    let longitude = parse_coordinate(fields[5], fields[6])?;
    let speed_m_s = parse_optional::<f64>(fields[7], "speed")?.map(knots_to_meters_per_second);
    let course = parse_optional::<f64>(fields[8], "course")?.map(round_to_tenth);
    let fix_time = parse_fix_time(fields[9], fields[1]);

    Ok(PositionVelocity {
        valid,
        latitude,
        longitude,
        fix_time,
        course,
        speed_m_s,
    })
}

/// Decode a GGA sentence: satellite count and altitude
fn parse_gga(fields: &[&str]) -> Result<FixQuality> {
    require_fields(fields, GGA_MIN_FIELDS, "GGA")?;

    Ok(FixQuality {
        num_sats: parse_optional::<u32>(fields[7], "satellite count")?,
        altitude: parse_optional::<f64>(fields[9], "altitude")?,
    })
}

/// Decode a GSA sentence: fix mode (field 2) and PDOP (field 15)
fn parse_gsa(fields: &[&str]) -> Result<DilutionOfPrecision> {
    require_fields(fields, GSA_MIN_FIELDS, "GSA")?;

    Ok(DilutionOfPrecision {
        fix_type: FixType::from_gsa_mode(fields[2].trim()),
        pdop: parse_optional::<f64>(fields[15], "PDOP")?,
    })
}

/// Parse one line, reporting why it could not be decoded
pub fn parse_sentence(line: &str) -> Result<Sentence> {
    let body = strip_and_verify(line)?;
    let fields: Vec<&str> = body.split(',').collect();

    match sentence_type(fields[0]) {
        Some("RMC") => parse_rmc(&fields).map(Sentence::PositionVelocity),
        Some("GGA") => parse_gga(&fields).map(Sentence::FixQuality),
        Some("GSA") => parse_gsa(&fields).map(Sentence::DilutionOfPrecision),
        _ => Ok(Sentence::Unrecognized),
    }
}

/// Decode one line, treating any failure as "no data"
pub fn decode_sentence(line: &str) -> Sentence {
    match parse_sentence(line) {
        Ok(sentence) => sentence,
        Err(err) => {
            if err.is_decode() {
                debug!("Skipping line {:?}: {}", line, err);
            }
            Sentence::Unrecognized
        }
    }
}
