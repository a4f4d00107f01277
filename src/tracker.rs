//! Polling loop
//!
//! Ties the pipeline together: one sampling window per cycle, classification
//! through the motion state machine, and hand-off of the resulting record to
//! a [`RecordSink`]. A cycle without a valid, geolocated fix logs "No fix"
//! and writes nothing.

use crate::conversion::format_capture_time;
use crate::error::Result;
use crate::export::RecordSink;
use crate::motion::MotionState;
use crate::parser::aggregator::{collect_fix, PollOptions};
use crate::parser::stream::LineSource;
use crate::types::{ConsolidatedFix, EventKind, EventRecord};
use log::{error, info};

/// What a single polling cycle produced
#[derive(Debug, Clone, PartialEq)]
pub enum CycleOutcome {
    /// A record was produced and handed to the sink
    Recorded(EventKind),
    /// The window closed without a valid, geolocated fix
    NoFix,
}

/// Owns the motion state and device identity for one run
#[derive(Debug, Clone)]
pub struct Tracker {
    device_id: String,
    extra_data: String,
    state: MotionState,
}

impl Tracker {
    pub fn new(device_id: impl Into<String>) -> Self {
        Self {
            device_id: device_id.into(),
            extra_data: String::new(),
            state: MotionState::default(),
        }
    }

    /// Attach a free-form payload to every record
    pub fn with_extra_data(mut self, extra_data: impl Into<String>) -> Self {
        self.extra_data = extra_data.into();
        self
    }

    pub fn state(&self) -> MotionState {
        self.state
    }

    pub fn device_id(&self) -> &str {
        &self.device_id
    }

    /// Classify one consolidated fix, advancing the motion state
    ///
    /// Returns `None` and leaves the state alone when the fix is not valid or
    /// lacks a coordinate.
    pub fn process_fix(&mut self, fix: ConsolidatedFix) -> Option<EventRecord> {
        let (kind, next) = self.state.transition(&fix)?;
        let record = EventRecord::from_fix(fix, kind, &self.device_id, &self.extra_data)?;
        self.state = next;
        Some(record)
    }

    /// Run one sampling window and persist its event, if any
    ///
    /// Sink failures are logged and the cycle still counts as recorded; the
    /// state machine has already advanced and the writer retries on the next
    /// record. Source I/O errors are returned.
    pub fn poll_once<S, W>(
        &mut self,
        source: &mut S,
        sink: &mut W,
        options: &PollOptions,
    ) -> Result<(CycleOutcome, bool)>
    where
        S: LineSource + ?Sized,
        W: RecordSink + ?Sized,
    {
        let window = collect_fix(source, options.window)?;
        let captured_at = format_capture_time(&window.fix.captured_at);

        let outcome = match self.process_fix(window.fix) {
            Some(record) => {
                if let Err(err) = sink.write_record(&record) {
                    error!("Failed to persist {} record: {}", record.kind, err);
                }
                info!(
                    "[{}] {} - {}, {} ({} m/s)",
                    captured_at,
                    record.kind,
                    record.latitude,
                    record.longitude,
                    record.fix.speed_m_s
                );
                CycleOutcome::Recorded(record.kind)
            }
            None => {
                info!("[{}] No fix", captured_at);
                CycleOutcome::NoFix
            }
        };

        Ok((outcome, window.end_of_stream))
    }

    /// Poll until the source is exhausted, sleeping between windows
    ///
    /// A serial port never reports end-of-stream, so for a live receiver
    /// this only returns on an I/O error.
    pub fn run<S, W>(&mut self, source: &mut S, sink: &mut W, options: &PollOptions) -> Result<()>
    where
        S: LineSource + ?Sized,
        W: RecordSink + ?Sized,
    {
        loop {
            let (_, end_of_stream) = self.poll_once(source, sink, options)?;
            if end_of_stream {
                info!("Input exhausted, stopping");
                return Ok(());
            }
            std::thread::sleep(options.interval);
        }
    }
}
