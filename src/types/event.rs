use crate::types::fix::ConsolidatedFix;
use std::fmt;

/// Event classification written with every record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    PositionReport,
    PowerOn,
    /// Reserved code; the motion state machine never emits it
    PowerOff,
    Moving,
    Stopped,
}

impl EventKind {
    pub const ALL: [EventKind; 5] = [
        EventKind::PositionReport,
        EventKind::PowerOn,
        EventKind::PowerOff,
        EventKind::Moving,
        EventKind::Stopped,
    ];

    /// Numeric event code
    pub fn code(&self) -> u8 {
        match self {
            EventKind::PositionReport => 0,
            EventKind::PowerOn => 1,
            EventKind::PowerOff => 2,
            EventKind::Moving => 3,
            EventKind::Stopped => 4,
        }
    }

    /// Classification name as it appears in the log document
    pub fn name(&self) -> &'static str {
        match self {
            EventKind::PositionReport => "Position Report",
            EventKind::PowerOn => "POWER ON",
            EventKind::PowerOff => "POWER OFF",
            EventKind::Moving => "MOVING",
            EventKind::Stopped => "STOPPED",
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.code() == code)
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One classified, geolocated fix ready for the record writer
#[derive(Debug, Clone, PartialEq)]
pub struct EventRecord {
    pub fix: ConsolidatedFix,
    pub kind: EventKind,
    pub device_id: String,
    pub extra_data: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl EventRecord {
    /// Build a record; `None` if the fix lacks either coordinate
    pub fn from_fix(
        fix: ConsolidatedFix,
        kind: EventKind,
        device_id: &str,
        extra_data: &str,
    ) -> Option<Self> {
        let (latitude, longitude) = fix.position()?;
        Some(Self {
            fix,
            kind,
            device_id: device_id.to_string(),
            extra_data: extra_data.to_string(),
            latitude,
            longitude,
        })
    }

    pub fn code(&self) -> u8 {
        self.kind.code()
    }

    /// GeoJSON ordering: longitude, latitude, altitude
    pub fn coordinates(&self) -> [f64; 3] {
        [self.longitude, self.latitude, self.fix.altitude]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_event_code_table() {
        assert_eq!(EventKind::PositionReport.code(), 0);
        assert_eq!(EventKind::PowerOn.code(), 1);
        assert_eq!(EventKind::PowerOff.code(), 2);
        assert_eq!(EventKind::Moving.code(), 3);
        assert_eq!(EventKind::Stopped.code(), 4);

        for kind in EventKind::ALL {
            assert_eq!(EventKind::from_code(kind.code()), Some(kind));
        }
        assert_eq!(EventKind::from_code(9), None);
    }

    #[test]
    fn test_record_requires_position() {
        let mut fix = ConsolidatedFix::empty(Utc::now());
        fix.valid = true;
        fix.latitude = Some(-33.9);
        assert!(EventRecord::from_fix(fix.clone(), EventKind::PowerOn, "IMEI", "").is_none());

        fix.longitude = Some(151.2);
        fix.altitude = 42.0;
        let record = EventRecord::from_fix(fix, EventKind::PowerOn, "IMEI", "").unwrap();
        assert_eq!(record.coordinates(), [151.2, -33.9, 42.0]);
        assert_eq!(record.code(), 1);
        assert_eq!(record.kind.to_string(), "POWER ON");
    }
}
