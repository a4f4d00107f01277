//! Sampling-window aggregation
//!
//! Sentences read during one window are merged into a single
//! [`ConsolidatedFix`]. Each sentence type owns a disjoint group of fields:
//! a later sentence of the same type replaces that group, other groups are
//! left untouched. The window closes on elapsed wall-clock time only, since
//! receivers do not emit every sentence type every second.

use crate::error::Result;
use crate::parser::sentence::decode_sentence;
use crate::parser::stream::{LineSource, ReadOutcome};
use crate::types::{
    ConsolidatedFix, DilutionOfPrecision, FixQuality, FixType, PositionVelocity, Sentence,
};
use chrono::{DateTime, Utc};
use log::debug;
use std::time::{Duration, Instant};

/// Timing of the polling loop
#[derive(Debug, Clone)]
pub struct PollOptions {
    /// How long sentences are collected into one fix
    pub window: Duration,
    /// Sleep between windows
    pub interval: Duration,
}

impl Default for PollOptions {
    fn default() -> Self {
        Self {
            window: Duration::from_secs(5),
            interval: Duration::from_secs(10),
        }
    }
}

/// In-progress fix for the current window
#[derive(Debug, Clone)]
pub struct FixAccumulator {
    captured_at: DateTime<Utc>,
    position: Option<PositionVelocity>,
    quality: Option<FixQuality>,
    fix_type: FixType,
    pdop: Option<f64>,
    lines_seen: usize,
    sentences_decoded: usize,
}

impl FixAccumulator {
    pub fn new(captured_at: DateTime<Utc>) -> Self {
        Self {
            captured_at,
            position: None,
            quality: None,
            fix_type: FixType::Invalid,
            pdop: None,
            lines_seen: 0,
            sentences_decoded: 0,
        }
    }

    /// Merge one decoded sentence into the window
    pub fn merge(&mut self, sentence: Sentence) {
        match sentence {
            Sentence::PositionVelocity(rmc) => self.position = Some(rmc),
            Sentence::FixQuality(gga) => self.quality = Some(gga),
            Sentence::DilutionOfPrecision(DilutionOfPrecision { fix_type, pdop }) => {
                // a GSA without a 2D/3D mode keeps whatever was reported earlier
                if let Some(fix_type) = fix_type {
                    self.fix_type = fix_type;
                }
                self.pdop = pdop;
            }
            Sentence::Unrecognized => return,
        }
        self.sentences_decoded += 1;
    }

    /// Decode and merge a raw line; returns whether it carried tracked data
    pub fn feed_line(&mut self, line: &str) -> bool {
        self.lines_seen += 1;
        let sentence = decode_sentence(line);
        let recognized = sentence.is_recognized();
        self.merge(sentence);
        recognized
    }

    pub fn lines_seen(&self) -> usize {
        self.lines_seen
    }

    pub fn sentences_decoded(&self) -> usize {
        self.sentences_decoded
    }

    /// Close the window, applying the defaults for fields never reported
    pub fn finish(self) -> ConsolidatedFix {
        let mut fix = ConsolidatedFix::empty(self.captured_at);

        if let Some(rmc) = self.position {
            fix.valid = rmc.valid;
            fix.latitude = rmc.latitude;
            fix.longitude = rmc.longitude;
            fix.fix_time = rmc.fix_time;
            fix.course = rmc.course.unwrap_or(0.0);
            fix.speed_m_s = rmc.speed_m_s.unwrap_or(0.0);
        }

        if let Some(gga) = self.quality {
            fix.altitude = gga.altitude.unwrap_or(0.0);
            fix.num_sats = gga.num_sats;
        }

        fix.fix_type = self.fix_type;
        fix.pdop = self.pdop;
        fix
    }
}

/// What one sampling window produced
#[derive(Debug, Clone)]
pub struct WindowResult {
    pub fix: ConsolidatedFix,
    /// The source ran dry before the window elapsed
    pub end_of_stream: bool,
}

/// Read and merge sentences until `window` has elapsed
///
/// The capture timestamp is taken when the window opens. Undecodable lines
/// are skipped. I/O errors other than timeouts are returned to the caller.
pub fn collect_fix<S: LineSource + ?Sized>(source: &mut S, window: Duration) -> Result<WindowResult> {
    let started = Instant::now();
    let mut accumulator = FixAccumulator::new(Utc::now());
    let mut end_of_stream = false;

    while started.elapsed() < window {
        match source.read_line()? {
            ReadOutcome::Line(line) => {
                accumulator.feed_line(&line);
            }
            ReadOutcome::Timeout => continue,
            ReadOutcome::EndOfStream => {
                end_of_stream = true;
                break;
            }
        }
    }

    debug!(
        "Window closed after {:?}: {} lines, {} sentences decoded",
        started.elapsed(),
        accumulator.lines_seen(),
        accumulator.sentences_decoded()
    );

    Ok(WindowResult {
        fix: accumulator.finish(),
        end_of_stream,
    })
}
