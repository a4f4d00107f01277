//! CLI binary for the GPS event logger
//!
//! Opens the receiver (or a replay file), resolves the device identity and
//! polls until terminated.

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{value_parser, Arg, ArgAction, Command};
use gps_event_logger::{
    lookup_device_id, open_serial, EventLogWriter, ExportOptions, PollOptions, ReaderLineSource,
    Tracker, DEFAULT_LOG_DIR, DEFAULT_PROVIDER, DEFAULT_READ_TIMEOUT, DEFAULT_SYS_ID,
    DEFAULT_UNIT_ID,
};
use log::{info, LevelFilter};
use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;
use std::time::Duration;

fn long_version() -> String {
    match option_env!("VERGEN_GIT_SHA") {
        Some(sha) => format!("{} ({})", env!("CARGO_PKG_VERSION"), sha),
        None => env!("CARGO_PKG_VERSION").to_string(),
    }
}

fn main() -> Result<()> {
    let matches = Command::new("GPS Event Logger")
        .version(env!("CARGO_PKG_VERSION"))
        .long_version(long_version())
        .about("Poll a serial NMEA GPS receiver and log motion/power events as GeoJSON.")
        .arg(
            Arg::new("port")
                .long("port")
                .help("Serial device of the GPS receiver")
                .value_name("PATH")
                .default_value("/dev/ttyUSB1"),
        )
        .arg(
            Arg::new("baud")
                .long("baud")
                .help("Serial baud rate")
                .value_name("N")
                .value_parser(value_parser!(u32))
                .default_value("9600"),
        )
        .arg(
            Arg::new("log-dir")
                .long("log-dir")
                .help("Directory for the per-run GeoJSON event log (created if missing)")
                .value_name("DIR")
                .default_value(DEFAULT_LOG_DIR),
        )
        .arg(
            Arg::new("interval")
                .long("interval")
                .help("Seconds to sleep between sampling windows")
                .value_name("SECS")
                .value_parser(value_parser!(u64))
                .default_value("10"),
        )
        .arg(
            Arg::new("window")
                .long("window")
                .help("Seconds of sentences merged into one fix")
                .value_name("SECS")
                .value_parser(value_parser!(u64).range(1..))
                .default_value("5"),
        )
        .arg(
            Arg::new("provider")
                .long("provider")
                .help("Provider name written to the document header")
                .value_name("NAME")
                .default_value(DEFAULT_PROVIDER),
        )
        .arg(
            Arg::new("sys-id")
                .long("sys-id")
                .help("System id written as sysId and ctrId")
                .value_name("ID")
                .default_value(DEFAULT_SYS_ID),
        )
        .arg(
            Arg::new("unit-id")
                .long("unit-id")
                .help("Unit id written to every record")
                .value_name("ID")
                .default_value(DEFAULT_UNIT_ID),
        )
        .arg(
            Arg::new("device-id")
                .long("device-id")
                .help("Device identifier for records (default: modem IMEI from mmcli)")
                .value_name("ID"),
        )
        .arg(
            Arg::new("csv")
                .long("csv")
                .help("Also append every record to a .csv track next to the JSON log")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("replay")
                .long("replay")
                .help("Read NMEA from a file ('-' for stdin) instead of the serial port; stops at end of input")
                .value_name("FILE"),
        )
        .arg(
            Arg::new("debug")
                .long("debug")
                .help("Enable debug output, including rejected sentences")
                .action(ArgAction::SetTrue),
        )
        .get_matches();

    let debug = matches.get_flag("debug");
    env_logger::Builder::new()
        .filter_level(if debug {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        })
        .parse_default_env()
        .init();

    let poll_options = PollOptions {
        window: Duration::from_secs(*matches.get_one::<u64>("window").unwrap_or(&5)),
        interval: Duration::from_secs(*matches.get_one::<u64>("interval").unwrap_or(&10)),
    };

    let export_options = ExportOptions {
        log_dir: matches
            .get_one::<String>("log-dir")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_DIR)),
        provider: arg_or(&matches, "provider", DEFAULT_PROVIDER),
        sys_id: arg_or(&matches, "sys-id", DEFAULT_SYS_ID),
        unit_id: arg_or(&matches, "unit-id", DEFAULT_UNIT_ID),
        csv: matches.get_flag("csv"),
    };

    let device_id = match matches.get_one::<String>("device-id") {
        Some(id) => id.clone(),
        None => lookup_device_id(),
    };
    info!("IMEI: {}", device_id);

    let mut writer = EventLogWriter::create(export_options.clone(), Utc::now()).with_context(|| {
        format!(
            "Failed to prepare log directory {}",
            export_options.log_dir.display()
        )
    })?;
    info!("Logging events to {}", writer.path().display());

    let mut tracker = Tracker::new(device_id);

    match matches.get_one::<String>("replay") {
        Some(replay) => {
            if replay == "-" {
                let mut source = ReaderLineSource::new(io::stdin().lock());
                tracker.run(&mut source, &mut writer, &poll_options)?;
            } else {
                let file = File::open(replay)
                    .with_context(|| format!("Failed to open replay file: {}", replay))?;
                let mut source = ReaderLineSource::new(BufReader::new(file));
                tracker.run(&mut source, &mut writer, &poll_options)?;
            }
        }
        None => {
            let port = arg_or(&matches, "port", "/dev/ttyUSB1");
            let baud = *matches.get_one::<u32>("baud").unwrap_or(&9600);
            let mut source = open_serial(&port, baud, DEFAULT_READ_TIMEOUT)
                .with_context(|| format!("Failed to open GPS serial port {}", port))?;
            tracker
                .run(&mut source, &mut writer, &poll_options)
                .with_context(|| format!("Serial port {} failed", port))?;
        }
    }

    Ok(())
}

fn arg_or(matches: &clap::ArgMatches, id: &str, default: &str) -> String {
    matches
        .get_one::<String>(id)
        .cloned()
        .unwrap_or_else(|| default.to_string())
}
