//! Aggregated outcome of one orchestrator run.

use chrono::{DateTime, SecondsFormat, Utc};

use crate::probe::{ProbeName, ProbeResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverallStatus {
    Healthy,
    Unhealthy,
}

impl OverallStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            OverallStatus::Healthy => "healthy",
            OverallStatus::Unhealthy => "unhealthy",
        }
    }
}

impl std::fmt::Display for OverallStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Probe results keyed by name, in selection order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Checks(Vec<(ProbeName, ProbeResult)>);

impl Checks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces an existing entry for `name` in place.
    pub fn push(&mut self, name: ProbeName, result: ProbeResult) {
        match self.0.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = result,
            None => self.0.push((name, result)),
        }
    }

    pub fn get(&self, name: ProbeName) -> Option<&ProbeResult> {
        self.0.iter().find(|(n, _)| *n == name).map(|(_, r)| r)
    }

    pub fn iter(&self) -> impl Iterator<Item = (ProbeName, &ProbeResult)> {
        self.0.iter().map(|(n, r)| (*n, r))
    }

    pub fn names(&self) -> Vec<ProbeName> {
        self.0.iter().map(|(n, _)| *n).collect()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn all_up(&self) -> bool {
        !self.0.is_empty() && self.0.iter().all(|(_, r)| r.is_up())
    }
}

impl FromIterator<(ProbeName, ProbeResult)> for Checks {
    fn from_iter<I: IntoIterator<Item = (ProbeName, ProbeResult)>>(iter: I) -> Self {
        let mut checks = Checks::new();
        for (name, result) in iter {
            checks.push(name, result);
        }
        checks
    }
}

/// Healthy iff at least one probe ran and every probe is UP.
#[derive(Debug, Clone, PartialEq)]
pub struct HealthReport {
    pub status: OverallStatus,
    pub timestamp: DateTime<Utc>,
    pub checks: Checks,
}

impl HealthReport {
    /// Derives the status from `checks` and stamps the current time.
    pub fn new(checks: Checks) -> Self {
        Self::at(checks, Utc::now())
    }

    pub fn at(checks: Checks, timestamp: DateTime<Utc>) -> Self {
        let status = if checks.all_up() {
            OverallStatus::Healthy
        } else {
            OverallStatus::Unhealthy
        };
        Self {
            status,
            timestamp,
            checks,
        }
    }

    pub fn is_healthy(&self) -> bool {
        self.status == OverallStatus::Healthy
    }

    /// ISO-8601 with offset, e.g. `2024-05-01T12:00:00+00:00`.
    pub fn timestamp_string(&self) -> String {
        self.timestamp.to_rfc3339_opts(SecondsFormat::Secs, false)
    }
}
