//! Event log persistence
//!
//! Each run writes one GeoJSON `FeatureCollection` named after the UTC start
//! time. The whole document is rewritten after every appended record, via a
//! temporary sibling file and a rename, so readers never see a half-written
//! document. With the `csv` feature the same records can also be appended to
//! a flat CSV track next to it.

use crate::conversion::{format_capture_time, format_fix_time, format_log_stem, truncate_to_whole};
use crate::error::{LoggerError, Result};
use crate::types::{EventKind, EventRecord, FixType};
use chrono::{DateTime, Utc};
use log::debug;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

pub const DEFAULT_LOG_DIR: &str = "/home/skytrac/AFF/PiTrac/data";
pub const DEFAULT_PROVIDER: &str = "SKYTRAC";
pub const DEFAULT_SYS_ID: &str = "skytrac-pi";
pub const DEFAULT_UNIT_ID: &str = "SKYTRAC_UNIT";
pub const DOCUMENT_FORMAT_VERSION: &str = "json 1.0";

/// Export options for the event log
#[derive(Debug, Clone)]
pub struct ExportOptions {
    /// Directory the per-run document is written to
    pub log_dir: PathBuf,
    pub provider: String,
    /// Written as `sysId` in the header and `ctrId` in every feature
    pub sys_id: String,
    pub unit_id: String,
    /// Also append records to a CSV track
    pub csv: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            log_dir: PathBuf::from(DEFAULT_LOG_DIR),
            provider: DEFAULT_PROVIDER.to_string(),
            sys_id: DEFAULT_SYS_ID.to_string(),
            unit_id: DEFAULT_UNIT_ID.to_string(),
            csv: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureProperties {
    pub rpt: String,
    pub esn: String,
    #[serde(rename = "unitId")]
    pub unit_id: String,
    pub cog: i64,
    pub spd: i64,
    pub src: String,
    pub fix: FixType,
    pub pdop: Option<f64>,
    #[serde(rename = "posTime")]
    pub pos_time: Option<String>,
    #[serde(rename = "dataCtrTime")]
    pub data_ctr_time: String,
    #[serde(rename = "ctrId")]
    pub ctr_id: String,
    pub event_code: u8,
    pub event_type: String,
    pub extra_data: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    #[serde(rename = "type")]
    pub kind: String,
    /// Longitude, latitude, altitude
    pub coordinates: [f64; 3],
}

/// One event record as a GeoJSON feature
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    #[serde(rename = "type")]
    pub kind: String,
    pub properties: FeatureProperties,
    pub geometry: Geometry,
}

impl Feature {
    pub fn from_record(record: &EventRecord, options: &ExportOptions) -> Self {
        let fix = &record.fix;
        Self {
            kind: "Feature".to_string(),
            properties: FeatureProperties {
                rpt: "pos".to_string(),
                esn: record.device_id.clone(),
                unit_id: options.unit_id.clone(),
                cog: truncate_to_whole(fix.course),
                spd: truncate_to_whole(fix.speed_m_s),
                src: "GPS".to_string(),
                fix: fix.fix_type,
                pdop: fix.pdop,
                pos_time: fix.fix_time.as_ref().map(format_fix_time),
                data_ctr_time: format_capture_time(&fix.captured_at),
                ctr_id: options.sys_id.clone(),
                event_code: record.code(),
                event_type: record.kind.name().to_string(),
                extra_data: record.extra_data.clone(),
            },
            geometry: Geometry {
                kind: "Point".to_string(),
                coordinates: record.coordinates(),
            },
        }
    }

    pub fn event_kind(&self) -> Option<EventKind> {
        EventKind::from_code(self.properties.event_code)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataInfo {
    #[serde(rename = "affVer")]
    pub aff_ver: String,
    pub provider: String,
    #[serde(rename = "rptTime")]
    pub rpt_time: String,
    #[serde(rename = "sysId")]
    pub sys_id: String,
}

/// The per-run log document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventLogDocument {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(rename = "dataInfo")]
    pub data_info: Vec<DataInfo>,
    pub features: Vec<Feature>,
}

impl EventLogDocument {
    pub fn new(options: &ExportOptions, started_at: &DateTime<Utc>) -> Self {
        Self {
            kind: "FeatureCollection".to_string(),
            data_info: vec![DataInfo {
                aff_ver: DOCUMENT_FORMAT_VERSION.to_string(),
                provider: options.provider.clone(),
                rpt_time: format_capture_time(started_at),
                sys_id: options.sys_id.clone(),
            }],
            features: Vec::new(),
        }
    }
}

/// Consumer of event records
pub trait RecordSink {
    fn write_record(&mut self, record: &EventRecord) -> Result<()>;
}

impl RecordSink for Vec<EventRecord> {
    fn write_record(&mut self, record: &EventRecord) -> Result<()> {
        self.push(record.clone());
        Ok(())
    }
}

/// Path of the document for a run started at `started_at`
pub fn compute_log_path(log_dir: &Path, started_at: &DateTime<Utc>) -> PathBuf {
    log_dir.join(format!("{}.json", format_log_stem(started_at)))
}

/// Read a previously written document back
pub fn load_event_log(path: &Path) -> Result<EventLogDocument> {
    let data = fs::read(path)?;
    Ok(serde_json::from_slice(&data)?)
}

/// Writes the running GeoJSON document for one run
pub struct EventLogWriter {
    path: PathBuf,
    options: ExportOptions,
    document: EventLogDocument,
}

impl EventLogWriter {
    /// Prepare a writer, creating the log directory if needed
    ///
    /// Nothing is written until the first record arrives.
    pub fn create(options: ExportOptions, started_at: DateTime<Utc>) -> Result<Self> {
        fs::create_dir_all(&options.log_dir)?;
        let path = compute_log_path(&options.log_dir, &started_at);
        let document = EventLogDocument::new(&options, &started_at);
        debug!("Event log will be written to {}", path.display());

        Ok(Self {
            path,
            options,
            document,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn document(&self) -> &EventLogDocument {
        &self.document
    }

    /// Path of the CSV track, when enabled
    pub fn csv_path(&self) -> Option<PathBuf> {
        if cfg!(feature = "csv") && self.options.csv {
            Some(self.path.with_extension("csv"))
        } else {
            None
        }
    }

    /// Append a record and rewrite the document
    ///
    /// The feature stays in memory even if the rewrite fails, so the next
    /// successful append persists it. The CSV row is written regardless of
    /// the rewrite outcome since the track is append-only.
    pub fn append(&mut self, record: &EventRecord) -> Result<()> {
        self.document
            .features
            .push(Feature::from_record(record, &self.options));
        let flushed = self.flush();

        #[cfg(feature = "csv")]
        {
            if let Some(csv_path) = self.csv_path() {
                append_csv_row(&csv_path, record)?;
            }
        }

        flushed
    }

    fn flush(&self) -> Result<()> {
        let tmp_path = self.path.with_extension("json.tmp");
        {
            let file = fs::File::create(&tmp_path)?;
            let mut writer = BufWriter::new(file);
            serde_json::to_writer_pretty(&mut writer, &self.document)?;
            writeln!(writer)?;
            writer.flush()?;
        }
        fs::rename(&tmp_path, &self.path).map_err(|err| {
            LoggerError::Export(format!(
                "failed to replace {}: {}",
                self.path.display(),
                err
            ))
        })
    }
}

impl RecordSink for EventLogWriter {
    fn write_record(&mut self, record: &EventRecord) -> Result<()> {
        self.append(record)
    }
}

/// Flat row of the optional CSV track
#[cfg(feature = "csv")]
#[derive(Debug, Serialize)]
struct CsvTrackRow<'a> {
    event_type: &'a str,
    event_code: u8,
    #[serde(rename = "posTime")]
    pos_time: Option<String>,
    #[serde(rename = "dataCtrTime")]
    data_ctr_time: String,
    latitude: f64,
    longitude: f64,
    altitude: f64,
    cog: i64,
    spd: i64,
    fix: FixType,
    pdop: Option<f64>,
    sats: Option<u32>,
}

#[cfg(feature = "csv")]
impl<'a> From<&'a EventRecord> for CsvTrackRow<'a> {
    fn from(record: &'a EventRecord) -> Self {
        let fix = &record.fix;
        Self {
            event_type: record.kind.name(),
            event_code: record.code(),
            pos_time: fix.fix_time.as_ref().map(format_fix_time),
            data_ctr_time: format_capture_time(&fix.captured_at),
            latitude: record.latitude,
            longitude: record.longitude,
            altitude: fix.altitude,
            cog: truncate_to_whole(fix.course),
            spd: truncate_to_whole(fix.speed_m_s),
            fix: fix.fix_type,
            pdop: fix.pdop,
            sats: fix.num_sats,
        }
    }
}

/// Append one row, writing the header only when the file is new
#[cfg(feature = "csv")]
fn append_csv_row(path: &Path, record: &EventRecord) -> Result<()> {
    let is_new = fs::metadata(path).map(|m| m.len() == 0).unwrap_or(true);
    let file = fs::OpenOptions::new().create(true).append(true).open(path)?;
    let mut writer = csv::WriterBuilder::new()
        .has_headers(is_new)
        .from_writer(file);
    writer.serialize(CsvTrackRow::from(record))?;
    writer.flush()?;
    Ok(())
}
