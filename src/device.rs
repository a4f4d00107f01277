//! Modem identity lookup
//!
//! The device identifier written into every record is the modem IMEI as
//! reported by ModemManager (`mmcli -m 0`, the `equipment id` line).

use anyhow::{anyhow, Context};
use log::{debug, warn};
use regex::Regex;
use std::process::Command;

/// Identifier used when the modem cannot be queried
pub const UNKNOWN_DEVICE_ID: &str = "UNKNOWN";

/// Extract the value of the `equipment id` line from `mmcli` output
///
/// Takes everything after the last `:` on that line. Returns `None` when the
/// line is missing or carries no value.
pub fn parse_equipment_id(mmcli_output: &str) -> Option<String> {
    let pattern = Regex::new(r"(?m)equipment id.*:(.*)$").ok()?;
    let value = pattern.captures(mmcli_output)?.get(1)?.as_str().trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

fn query_mmcli(modem_index: u32) -> anyhow::Result<String> {
    let output = Command::new("mmcli")
        .args(["-m", &modem_index.to_string()])
        .output()
        .context("failed to run mmcli")?;

    let stdout = String::from_utf8_lossy(&output.stdout);
    parse_equipment_id(&stdout).ok_or_else(|| {
        anyhow!(
            "no equipment id in mmcli output (exit status {})",
            output.status
        )
    })
}

/// Look up the modem IMEI, falling back to [`UNKNOWN_DEVICE_ID`]
pub fn lookup_device_id() -> String {
    match query_mmcli(0) {
        Ok(id) => {
            debug!("Modem equipment id: {}", id);
            id
        }
        Err(err) => {
            warn!("Failed to get IMEI: {:#}", err);
            UNKNOWN_DEVICE_ID.to_string()
        }
    }
}
