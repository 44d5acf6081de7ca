//! Machine- and human-readable renderings of a [`HealthReport`].

use serde_json::{Map, Value};

use crate::orchestrator::{HealthReport, OverallStatus};
use crate::probe::{ProbeResult, ProbeStatus};

const NAME_WIDTH: usize = 22;

fn check_object(result: &ProbeResult) -> Value {
    let mut object = Map::new();
    object.insert("status".into(), Value::from(result.status.as_str()));
    for (key, value) in &result.detail {
        if key == "status" || key == "error" {
            continue;
        }
        object.insert(key.clone(), value.clone());
    }
    if let Some(error) = &result.error {
        object.insert("error".into(), Value::from(error.as_str()));
    }
    Value::Object(object)
}

/// `{"status", "timestamp", "checks": {name: {"status", ..detail, "error"?}}}`.
pub fn to_machine_readable(report: &HealthReport) -> Value {
    let checks: Map<String, Value> = report
        .checks
        .iter()
        .map(|(name, result)| (name.as_str().to_string(), check_object(result)))
        .collect();

    let mut root = Map::new();
    root.insert("status".into(), Value::from(report.status.as_str()));
    root.insert("timestamp".into(), Value::from(report.timestamp_string()));
    root.insert("checks".into(), Value::Object(checks));
    Value::Object(root)
}

/// Status line, timestamp line, then one line per probe.
pub fn to_human_readable(report: &HealthReport) -> Vec<String> {
    let headline = match report.status {
        OverallStatus::Healthy => "✅ HEALTHY",
        OverallStatus::Unhealthy => "❌ UNHEALTHY",
    };

    let mut lines = Vec::with_capacity(report.checks.len() + 2);
    lines.push(format!("System Status: {headline}"));
    lines.push(format!("Timestamp: {}", report.timestamp_string()));

    for (name, result) in report.checks.iter() {
        let glyph = match result.status {
            ProbeStatus::Up => "🟢",
            ProbeStatus::Down => "🔴",
        };
        let mut line = format!(
            "{glyph} {:<width$} {}",
            name.as_str(),
            result.status,
            width = NAME_WIDTH
        );
        if let Some(error) = &result.error {
            line.push_str(&format!("  ↳ Error: {error}"));
        }
        lines.push(line);
    }
    lines
}
