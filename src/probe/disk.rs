//! Disk capacity probe.

use std::path::PathBuf;

use async_trait::async_trait;

use super::{Probe, ProbeFault, ProbeName, ProbeResult, ProbeStatus};
use crate::config::{DiskConfig, HealthConfig};

const UNITS: [&str; 6] = ["B", "KB", "MB", "GB", "TB", "PB"];

/// Measures the volume holding `disk.path`.
///
/// Crossing the threshold is a deliberate DOWN, not a fault, so no error is
/// attached.
pub struct DiskSpaceProbe;

impl DiskSpaceProbe {
    /// Classify measured capacity against the configured threshold.
    pub fn assess(total: u64, free: u64, config: &DiskConfig) -> Result<ProbeResult, ProbeFault> {
        if total == 0 {
            return Err(ProbeFault::new(format!(
                "filesystem at '{}' reported zero total capacity",
                config.path
            )));
        }

        let used = round_to((1.0 - free as f64 / total as f64) * 100.0, 2);
        let status = ProbeStatus::from_bool(used <= config.threshold_percent);

        Ok(ProbeResult::new(status)
            .with("total_space", format_bytes(total, config.precision))
            .with("free_space", format_bytes(free, config.precision))
            .with("used_percentage", format!("{}%", trim_number(used, 2)))
            .with("threshold", format!("{}%", trim_number(config.threshold_percent, 2))))
    }
}

#[async_trait]
impl Probe for DiskSpaceProbe {
    fn name(&self) -> ProbeName {
        ProbeName::DiskSpace
    }

    async fn check(&self, config: &HealthConfig) -> Result<ProbeResult, ProbeFault> {
        let path = PathBuf::from(&config.disk.path);
        let (total, free) = tokio::task::spawn_blocking(move || {
            Ok::<_, std::io::Error>((fs2::total_space(&path)?, fs2::available_space(&path)?))
        })
        .await
        .map_err(|e| ProbeFault::new(format!("disk measurement task failed: {}", e)))?
        .map_err(|e| ProbeFault::new(format!("cannot stat '{}': {}", config.disk.path, e)))?;

        Self::assess(total, free, &config.disk)
    }
}

/// Format a byte count in binary units, e.g. `1048576` → `"1 MB"`.
///
/// Rounds to `precision` decimals and drops trailing zeros.
pub fn format_bytes(bytes: u64, precision: usize) -> String {
    let mut power = 0;
    let mut next_unit = 1024u64;
    while power < UNITS.len() - 1 && bytes >= next_unit {
        power += 1;
        next_unit = next_unit.saturating_mul(1024);
    }
    let scaled = bytes as f64 / 1024f64.powi(power as i32);
    format!("{} {}", trim_number(scaled, precision), UNITS[power])
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

fn trim_number(value: f64, precision: usize) -> String {
    let text = format!("{:.*}", precision, value);
    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        text
    }
}
