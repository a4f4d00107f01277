use chrono::{DateTime, Utc};

use crate::types::fix::FixType;

/// Fields decoded from an RMC (recommended minimum) sentence
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PositionVelocity {
    /// Status field was `A`
    pub valid: bool,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// UTC date and time of the fix, if both fields were present
    pub fix_time: Option<DateTime<Utc>>,
    /// Course over ground in degrees, one decimal
    pub course: Option<f64>,
    /// Speed over ground in m/s, one decimal
    pub speed_m_s: Option<f64>,
}

/// Fields decoded from a GGA (fix data) sentence
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FixQuality {
    /// Antenna altitude above mean sea level in meters
    pub altitude: Option<f64>,
    pub num_sats: Option<u32>,
}

/// Fields decoded from a GSA (DOP and active satellites) sentence
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DilutionOfPrecision {
    /// `None` when the receiver reported anything other than a 2D/3D fix
    pub fix_type: Option<FixType>,
    pub pdop: Option<f64>,
}

/// One decoded NMEA sentence
#[derive(Debug, Clone, PartialEq)]
pub enum Sentence {
    PositionVelocity(PositionVelocity),
    FixQuality(FixQuality),
    DilutionOfPrecision(DilutionOfPrecision),
    /// Not a sentence we track, or one that failed to decode
    Unrecognized,
}

impl Sentence {
    pub fn is_recognized(&self) -> bool {
        !matches!(self, Sentence::Unrecognized)
    }
}
