//! Integration tests for the event log writer
//!
//! Covers the persisted document across these scenarios:
//! - Log directory creation and file naming
//! - Document rewrite keeping the header and earlier features
//! - Numeric round trip of persisted records
//! - CSV track alongside the JSON log

use chrono::{TimeZone, Utc};
use gps_event_logger::{
    load_event_log, ConsolidatedFix, EventKind, EventLogWriter, EventRecord, ExportOptions,
    FixType, RecordSink,
};
use std::fs;
use tempfile::TempDir;

fn record(kind: EventKind, speed_m_s: f64, course: f64) -> EventRecord {
    let mut fix = ConsolidatedFix::empty(Utc.with_ymd_and_hms(2024, 3, 5, 12, 35, 20).unwrap());
    fix.valid = true;
    fix.latitude = Some(48.117_3);
    fix.longitude = Some(-11.516_666_666_666_667);
    fix.altitude = 545.4;
    fix.speed_m_s = speed_m_s;
    fix.course = course;
    fix.num_sats = Some(8);
    fix.pdop = Some(1.8);
    fix.fix_type = FixType::ThreeD;
    fix.fix_time = Some(Utc.with_ymd_and_hms(2024, 3, 5, 12, 35, 19).unwrap());
    EventRecord::from_fix(fix, kind, "867962040000000", "").unwrap()
}

fn options_for(temp_dir: &TempDir, csv: bool) -> ExportOptions {
    ExportOptions {
        log_dir: temp_dir.path().join("nested").join("logs"),
        csv,
        ..ExportOptions::default()
    }
}

#[test]
fn test_writer_creates_log_directory() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let options = options_for(&temp_dir, false);
    let started_at = Utc.with_ymd_and_hms(2024, 3, 5, 12, 0, 0).unwrap();

    let writer = EventLogWriter::create(options.clone(), started_at).unwrap();
    assert!(options.log_dir.is_dir(), "Log directory should be created");
    assert_eq!(
        writer.path(),
        options.log_dir.join("20240305T120000Z.json").as_path()
    );
    assert!(
        !writer.path().exists(),
        "Nothing is written before the first record"
    );
}

#[test]
fn test_document_rewritten_after_each_record() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let options = options_for(&temp_dir, false);
    let mut writer = EventLogWriter::create(options, Utc::now()).unwrap();

    writer.write_record(&record(EventKind::PowerOn, 0.0, 0.0)).unwrap();
    let first = load_event_log(writer.path()).unwrap();
    assert_eq!(first.features.len(), 1);

    writer.write_record(&record(EventKind::Moving, 3.2, 271.6)).unwrap();
    writer.write_record(&record(EventKind::Stopped, 0.0, 271.6)).unwrap();

    let doc = load_event_log(writer.path()).unwrap();
    assert_eq!(doc.kind, "FeatureCollection");
    assert_eq!(doc.data_info.len(), 1);
    assert_eq!(doc.data_info[0].provider, "SKYTRAC");
    assert_eq!(doc.data_info[0].aff_ver, "json 1.0");
    assert_eq!(&doc, writer.document());

    let kinds: Vec<_> = doc.features.iter().map(|f| f.event_kind().unwrap()).collect();
    assert_eq!(
        kinds,
        vec![EventKind::PowerOn, EventKind::Moving, EventKind::Stopped]
    );

    // no temporary file left behind
    let leftovers: Vec<_> = fs::read_dir(writer.path().parent().unwrap())
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.path().extension().map(|x| x == "tmp").unwrap_or(false))
        .collect();
    assert!(leftovers.is_empty());
}

#[test]
fn test_persisted_numbers_round_trip() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let mut writer = EventLogWriter::create(options_for(&temp_dir, false), Utc::now()).unwrap();

    let original = record(EventKind::Moving, 5.1, 84.4);
    writer.append(&original).unwrap();

    let doc = load_event_log(writer.path()).unwrap();
    let feature = &doc.features[0];
    let props = &feature.properties;

    assert_eq!(props.cog, 84);
    assert_eq!(props.spd, 5);
    assert_eq!(props.pdop, Some(1.8));
    assert_eq!(props.fix, FixType::ThreeD);
    assert_eq!(props.event_code, 3);
    assert_eq!(props.event_type, "MOVING");
    assert_eq!(props.esn, "867962040000000");
    assert_eq!(props.pos_time.as_deref(), Some("2024-03-05T12:35:19Z"));
    assert_eq!(props.data_ctr_time, "2024-03-05T12:35:20.000000Z");

    // longitude first
    assert_eq!(feature.geometry.coordinates, original.coordinates());
    assert_eq!(feature.geometry.coordinates[0], -11.516_666_666_666_667);
    assert_eq!(feature.geometry.coordinates[1], 48.117_3);
    assert_eq!(feature.geometry.coordinates[2], 545.4);
}

#[test]
fn test_document_is_pretty_printed() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let mut writer = EventLogWriter::create(options_for(&temp_dir, false), Utc::now()).unwrap();
    writer.append(&record(EventKind::PowerOn, 0.0, 0.0)).unwrap();

    let text = fs::read_to_string(writer.path()).unwrap();
    assert!(text.starts_with("{\n  \"type\": \"FeatureCollection\""));
    assert!(text.contains("\"dataInfo\""));
}

#[cfg(feature = "csv")]
#[test]
fn test_csv_track_written_alongside() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let mut writer = EventLogWriter::create(options_for(&temp_dir, true), Utc::now()).unwrap();

    writer.append(&record(EventKind::PowerOn, 0.0, 0.0)).unwrap();
    writer.append(&record(EventKind::Moving, 3.2, 90.0)).unwrap();

    let csv_path = writer.csv_path().expect("CSV track should be enabled");
    let content = fs::read_to_string(&csv_path).unwrap();
    let lines: Vec<&str> = content.lines().collect();

    assert_eq!(lines.len(), 3, "header plus one row per record");
    assert!(lines[0].starts_with("event_type,event_code,posTime,dataCtrTime,"));
    assert!(lines[1].starts_with("POWER ON,1,"));
    assert!(lines[2].starts_with("MOVING,3,"));
    let header_fields = lines[0].split(',').count();
    for line in &lines[1..] {
        assert_eq!(line.split(',').count(), header_fields);
    }
}

#[cfg(feature = "csv")]
#[test]
fn test_csv_row_kept_when_rewrite_fails() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let mut writer = EventLogWriter::create(options_for(&temp_dir, true), Utc::now()).unwrap();

    // a directory in place of the document makes the rename fail
    fs::create_dir(writer.path()).unwrap();
    assert!(writer.append(&record(EventKind::PowerOn, 0.0, 0.0)).is_err());
    assert_eq!(writer.document().features.len(), 1);

    let csv_path = writer.csv_path().expect("CSV track should be enabled");
    let content = fs::read_to_string(&csv_path).unwrap();
    assert_eq!(content.lines().count(), 2, "header plus the record");
    assert!(content.lines().nth(1).unwrap().starts_with("POWER ON,1,"));
}

#[test]
fn test_csv_track_disabled_by_default() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let mut writer = EventLogWriter::create(options_for(&temp_dir, false), Utc::now()).unwrap();
    writer.append(&record(EventKind::PowerOn, 0.0, 0.0)).unwrap();

    assert!(writer.csv_path().is_none());
    assert!(!writer.path().with_extension("csv").exists());
}
