//! Append-only log of check outcomes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Outcome of a single check assertion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckResult {
    /// Human-readable check name.
    pub name: String,

    /// Whether the assertion held.
    pub passed: bool,

    /// What was observed.
    pub details: String,

    /// HTTP status of the response, absent when no response arrived.
    pub status_code: Option<u16>,

    /// When the result was recorded.
    pub timestamp: DateTime<Utc>,

    /// Passed only because a tolerated downstream dependency failed.
    #[serde(default)]
    pub soft_pass: bool,
}

/// Ordered, append-only sequence of [`CheckResult`]s.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResultLog {
    entries: Vec<CheckResult>,
}

impl ResultLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a result stamped with the current time.
    pub fn record(
        &mut self,
        name: impl Into<String>,
        passed: bool,
        details: impl Into<String>,
        status_code: Option<u16>,
    ) -> &CheckResult {
        self.push(name.into(), passed, details.into(), status_code, false)
    }

    /// Append a passed result attributed to a tolerated dependency failure.
    pub fn record_soft_pass(
        &mut self,
        name: impl Into<String>,
        details: impl Into<String>,
        status_code: Option<u16>,
    ) -> &CheckResult {
        self.push(name.into(), true, details.into(), status_code, true)
    }

    fn push(
        &mut self,
        name: String,
        passed: bool,
        details: String,
        status_code: Option<u16>,
        soft_pass: bool,
    ) -> &CheckResult {
        self.entries.push(CheckResult {
            name,
            passed,
            details,
            status_code,
            timestamp: Utc::now(),
            soft_pass,
        });
        &self.entries[self.entries.len() - 1]
    }

    /// All results in recording order.
    pub fn entries(&self) -> &[CheckResult] {
        &self.entries
    }

    /// Results recorded at or after position `from`.
    pub fn since(&self, from: usize) -> &[CheckResult] {
        &self.entries[from.min(self.entries.len())..]
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Aggregate the whole log.
    pub fn summarize(&self) -> RunSummary {
        let mut summary = RunSummary {
            total: self.entries.len(),
            ..RunSummary::default()
        };
        for entry in &self.entries {
            if entry.passed {
                summary.passed += 1;
                if entry.soft_pass {
                    summary.soft_passed += 1;
                }
            } else {
                summary.failures.push(entry.clone());
            }
        }
        summary
    }

    pub fn into_entries(self) -> Vec<CheckResult> {
        self.entries
    }
}

/// Pass/fail aggregate of a [`ResultLog`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub passed: usize,
    pub total: usize,
    /// Subset of `passed` that were soft passes.
    pub soft_passed: usize,
    /// Failed results in recording order.
    pub failures: Vec<CheckResult>,
}

impl RunSummary {
    pub fn failed(&self) -> usize {
        self.total - self.passed
    }

    /// Percentage of passed results, 0.0 for an empty run.
    pub fn success_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.passed as f64 / self.total as f64 * 100.0
        }
    }

    pub fn all_passed(&self) -> bool {
        self.failures.is_empty()
    }
}
