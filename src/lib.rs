//! GPS Event Logger Library
//!
//! Polls a serial NMEA-0183 GPS receiver, consolidates the sentences seen in
//! each sampling window into one fix, classifies fixes into power/motion
//! events and keeps a running GeoJSON log of geotagged event records.
//!
//! # Features
//!
//! - **`cli`** (default): Build the `gps_event_logger` binary
//! - **`csv`** (default): Allow a CSV track alongside the GeoJSON log
//!
//! # Quick Start
//!
//! Decode sentences from any reader and classify the resulting fix:
//! ```rust
//! use gps_event_logger::{collect_fix, EventKind, ReaderLineSource, Tracker};
//! use std::io::Cursor;
//! use std::time::Duration;
//!
//! let nmea = "$GPRMC,123519,A,4807.038,N,01131.000,E,022.4,084.4,230394,003.1,W*6A\n";
//! let mut source = ReaderLineSource::new(Cursor::new(nmea.as_bytes().to_vec()));
//! let window = collect_fix(&mut source, Duration::from_secs(5)).unwrap();
//!
//! let mut tracker = Tracker::new("UNKNOWN");
//! let record = tracker.process_fix(window.fix).unwrap();
//! assert_eq!(record.kind, EventKind::PowerOn);
//! ```
//!
//! Log a live receiver:
//! ```rust,no_run
//! use gps_event_logger::{
//!     lookup_device_id, open_serial, EventLogWriter, ExportOptions, PollOptions, Tracker,
//!     DEFAULT_READ_TIMEOUT,
//! };
//!
//! let mut source = open_serial("/dev/ttyUSB1", 9600, DEFAULT_READ_TIMEOUT).unwrap();
//! let mut writer = EventLogWriter::create(ExportOptions::default(), chrono::Utc::now()).unwrap();
//! let mut tracker = Tracker::new(lookup_device_id());
//! tracker.run(&mut source, &mut writer, &PollOptions::default()).unwrap();
//! ```
//!
//! # Public API
//!
//! ## Decoding
//! - [`decode_sentence`] - Decode one NMEA line, "no data" on any failure
//! - [`parse_sentence`] - Same, but reports why a line was rejected
//! - [`FixAccumulator`] - Merge sentences of one window into a fix
//! - [`collect_fix`] - Read one wall-clock sampling window from a source
//!
//! ## Classification
//! - [`MotionState`] - Pure power-on/moving/stopped state machine
//! - [`Tracker`] - Owns the state and drives the polling loop
//!
//! ## Output
//! - [`EventLogWriter`] - Running GeoJSON document for one run
//! - [`RecordSink`] - Seam between the tracker and the writer
//! - [`lookup_device_id`] - Modem IMEI via `mmcli`

pub mod conversion;
pub mod device;
pub mod error;
pub mod export;
pub mod motion;
pub mod parser;
pub mod tracker;
pub mod types;

pub use conversion::*;
pub use device::*;
pub use error::*;
pub use export::*;
pub use motion::*;
pub use parser::*;
pub use tracker::*;
pub use types::*;
