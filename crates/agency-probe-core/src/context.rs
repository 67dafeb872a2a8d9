//! Per-run context shared by the checks.

use crate::config::ProbeConfig;
use crate::error::ProbeError;
use crate::result_log::ResultLog;
use crate::tolerance::TolerancePolicy;
use crate::transport::{ApiRequest, ApiResponse, ApiTransport};
use crate::Result;
use serde::Serialize;
use tracing::{info, warn};

/// Details recorded when a check needs an agency id and none was discovered.
pub const NO_AGENCY_IDS: &str = "skipped: no agency identifiers available from earlier checks";

/// How many ids the basic listing contributes.
pub const SEED_LIMIT: usize = 3;

/// Identifiers discovered while the run progresses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunState {
    discovered_agency_ids: Vec<String>,
}

/// Which discovered id a check should target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdPick {
    /// First seeded id: a pre-existing record.
    First,
    /// Most recently appended id: the record this run created, if any.
    Last,
}

impl RunState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn agency_ids(&self) -> &[String] {
        &self.discovered_agency_ids
    }

    /// Seed from a listing. Only the first listing to report ids counts.
    /// Returns whether the state was seeded.
    pub fn seed<I>(&mut self, ids: I) -> bool
    where
        I: IntoIterator<Item = String>,
    {
        if !self.discovered_agency_ids.is_empty() {
            return false;
        }
        self.discovered_agency_ids
            .extend(ids.into_iter().take(SEED_LIMIT));
        !self.discovered_agency_ids.is_empty()
    }

    pub fn push(&mut self, id: String) {
        self.discovered_agency_ids.push(id);
    }

    pub fn pick(&self, pick: IdPick) -> Option<&str> {
        match pick {
            IdPick::First => self.discovered_agency_ids.first(),
            IdPick::Last => self.discovered_agency_ids.last(),
        }
        .map(String::as_str)
    }
}

/// What a check concluded about one assertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    pub passed: bool,
    pub soft_pass: bool,
    pub details: String,
    pub status_code: Option<u16>,
}

impl Verdict {
    pub fn pass(details: impl Into<String>, status_code: u16) -> Self {
        Self {
            passed: true,
            soft_pass: false,
            details: details.into(),
            status_code: Some(status_code),
        }
    }

    pub fn fail(details: impl Into<String>, status_code: u16) -> Self {
        Self {
            passed: false,
            soft_pass: false,
            details: details.into(),
            status_code: Some(status_code),
        }
    }

    pub fn soft_pass(details: impl Into<String>, status_code: u16) -> Self {
        Self {
            passed: true,
            soft_pass: true,
            details: details.into(),
            status_code: Some(status_code),
        }
    }
}

/// Everything a check may read or write during a run.
pub struct RunContext<'a> {
    transport: &'a dyn ApiTransport,
    config: &'a ProbeConfig,
    tolerance: TolerancePolicy,
    pub state: RunState,
    pub log: ResultLog,
}

impl<'a> RunContext<'a> {
    pub fn new(transport: &'a dyn ApiTransport, config: &'a ProbeConfig) -> Self {
        Self {
            transport,
            config,
            tolerance: TolerancePolicy::default(),
            state: RunState::new(),
            log: ResultLog::new(),
        }
    }

    pub fn with_tolerance(mut self, tolerance: TolerancePolicy) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn config(&self) -> &ProbeConfig {
        self.config
    }

    pub fn tolerance(&self) -> &TolerancePolicy {
        &self.tolerance
    }

    pub async fn send(&self, request: &ApiRequest) -> Result<ApiResponse> {
        self.transport.send(request).await
    }

    /// Record the outcome of a check body. Errors become failed results
    /// without a status code.
    pub fn conclude(&mut self, name: &str, outcome: Result<Verdict>) {
        match outcome {
            Ok(verdict) => self.record(name, verdict),
            Err(err) => self.record_error(name, &err),
        }
    }

    pub fn record(&mut self, name: &str, verdict: Verdict) {
        if verdict.passed {
            info!(check = name, soft = verdict.soft_pass, "check passed");
        } else {
            warn!(check = name, details = %verdict.details, "check failed");
        }

        if verdict.soft_pass {
            self.log
                .record_soft_pass(name, verdict.details, verdict.status_code);
        } else {
            self.log
                .record(name, verdict.passed, verdict.details, verdict.status_code);
        }
    }

    fn record_error(&mut self, name: &str, err: &ProbeError) {
        warn!(check = name, error = %err, "request failed");
        self.log
            .record(name, false, format!("Request failed: {}", err), None);
    }

    /// Discovered id for `pick`, or a recorded skip failure when none exists.
    pub fn require_agency_id(&mut self, name: &str, pick: IdPick) -> Option<String> {
        match self.state.pick(pick) {
            Some(id) => Some(id.to_string()),
            None => {
                warn!(check = name, "no agency ids discovered, skipping");
                self.log.record(name, false, NO_AGENCY_IDS, None);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fakes::ScriptedTransport;

    fn ids(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_seed_takes_first_three() {
        let mut state = RunState::new();
        assert!(state.seed(ids(&["a", "b", "c", "d", "e"])));
        assert_eq!(state.agency_ids(), ids(&["a", "b", "c"]).as_slice());
    }

    #[test]
    fn test_seed_only_once() {
        let mut state = RunState::new();
        state.seed(ids(&["a"]));
        assert!(!state.seed(ids(&["x", "y"])));
        assert_eq!(state.agency_ids(), ids(&["a"]).as_slice());
    }

    #[test]
    fn test_empty_seed_leaves_state_open() {
        let mut state = RunState::new();
        assert!(!state.seed(Vec::new()));
        assert!(state.seed(ids(&["late"])));
    }

    #[test]
    fn test_pick_first_and_last() {
        let mut state = RunState::new();
        state.seed(ids(&["a", "b"]));
        state.push("created".to_string());
        assert_eq!(state.pick(IdPick::First), Some("a"));
        assert_eq!(state.pick(IdPick::Last), Some("created"));
    }

    #[test]
    fn test_require_agency_id_records_skip() {
        let transport = ScriptedTransport::new();
        let config = ProbeConfig::default();
        let mut ctx = RunContext::new(&transport, &config);

        assert!(ctx.require_agency_id("Update agency", IdPick::Last).is_none());
        let entry = &ctx.log.entries()[0];
        assert_eq!(entry.name, "Update agency");
        assert!(!entry.passed);
        assert_eq!(entry.details, NO_AGENCY_IDS);
        assert!(transport.sent_requests().is_empty());
    }

    #[test]
    fn test_conclude_error_has_no_status() {
        let transport = ScriptedTransport::new();
        let config = ProbeConfig::default();
        let mut ctx = RunContext::new(&transport, &config);

        ctx.conclude(
            "Root API endpoint",
            Err(ProbeError::Transport("connection refused".to_string())),
        );
        let entry = &ctx.log.entries()[0];
        assert!(!entry.passed);
        assert!(entry.status_code.is_none());
        assert!(entry.details.starts_with("Request failed:"));
        assert!(entry.details.contains("connection refused"));
    }

    #[test]
    fn test_conclude_soft_pass() {
        let transport = ScriptedTransport::new();
        let config = ProbeConfig::default();
        let mut ctx = RunContext::new(&transport, &config);

        ctx.conclude("General contact", Ok(Verdict::soft_pass("mail down", 500)));
        let entry = &ctx.log.entries()[0];
        assert!(entry.passed);
        assert!(entry.soft_pass);
        assert_eq!(entry.status_code, Some(500));
    }
}
