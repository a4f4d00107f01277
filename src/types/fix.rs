use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Fix dimensionality as reported by GSA
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FixType {
    #[default]
    Invalid,
    #[serde(rename = "2D")]
    TwoD,
    #[serde(rename = "3D")]
    ThreeD,
}

impl FixType {
    /// Map the GSA fix mode field; `1` (no fix) and anything else yields `None`
    pub fn from_gsa_mode(mode: &str) -> Option<Self> {
        match mode {
            "2" => Some(FixType::TwoD),
            "3" => Some(FixType::ThreeD),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FixType::Invalid => "Invalid",
            FixType::TwoD => "2D",
            FixType::ThreeD => "3D",
        }
    }
}

impl fmt::Display for FixType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything learned about the receiver during one sampling window
///
/// Speed, course and altitude are already defaulted to zero when no sentence
/// reported them. Coordinates, fix time, satellite count and PDOP stay `None`
/// so "never reported" is distinguishable from a reported zero.
#[derive(Debug, Clone, PartialEq)]
pub struct ConsolidatedFix {
    /// Wall-clock time the window was opened
    pub captured_at: DateTime<Utc>,
    pub valid: bool,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub fix_time: Option<DateTime<Utc>>,
    pub course: f64,
    pub speed_m_s: f64,
    pub altitude: f64,
    pub num_sats: Option<u32>,
    pub pdop: Option<f64>,
    pub fix_type: FixType,
}

impl ConsolidatedFix {
    /// An empty fix for a window opened at `captured_at`
    pub fn empty(captured_at: DateTime<Utc>) -> Self {
        Self {
            captured_at,
            valid: false,
            latitude: None,
            longitude: None,
            fix_time: None,
            course: 0.0,
            speed_m_s: 0.0,
            altitude: 0.0,
            num_sats: None,
            pdop: None,
            fix_type: FixType::Invalid,
        }
    }

    /// Latitude and longitude, when both were reported
    pub fn position(&self) -> Option<(f64, f64)> {
        Some((self.latitude?, self.longitude?))
    }

    /// Valid and geolocated; only such fixes may produce events
    pub fn is_locatable(&self) -> bool {
        self.valid && self.position().is_some()
    }
}
