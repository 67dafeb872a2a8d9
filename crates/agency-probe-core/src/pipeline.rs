//! Probe pipeline orchestration.

use crate::config::ProbeConfig;
use crate::context::RunContext;
use crate::error::ProbeError;
use crate::report::ProgressReporter;
use crate::result_log::{CheckResult, RunSummary};
use crate::stage::CheckStage;
use crate::tolerance::TolerancePolicy;
use crate::transport::ApiTransport;
use crate::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::time::Instant;
use tracing::info;
use uuid::Uuid;

/// Result of a complete probe run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    /// Unique id of this run.
    pub run_id: String,

    /// API root the run targeted.
    pub api_base: String,

    /// When the first stage started.
    pub started_at: DateTime<Utc>,

    /// Total duration in milliseconds.
    pub duration_ms: u64,

    /// Stages executed, in order.
    pub stages: Vec<CheckStage>,

    /// Every recorded result, in order.
    pub results: Vec<CheckResult>,

    /// Aggregate of `results`.
    pub summary: RunSummary,

    /// Agency ids known at the end of the run.
    pub agency_ids: Vec<String>,
}

impl RunReport {
    /// Whether every recorded result passed.
    pub fn success(&self) -> bool {
        self.summary.all_passed()
    }

    /// Process exit code: 0 iff every recorded result passed.
    pub fn exit_code(&self) -> i32 {
        if self.success() {
            0
        } else {
            1
        }
    }
}

/// Reject plans that are empty, out of order, repeat a stage, or consume
/// agency ids no earlier stage can produce.
pub fn validate_plan(plan: &[CheckStage]) -> Result<()> {
    if plan.is_empty() {
        return Err(ProbeError::InvalidPlan("plan has no stages".to_string()));
    }

    let mut producer_seen = false;
    for (index, stage) in plan.iter().enumerate() {
        if let Some(previous) = index.checked_sub(1).map(|i| plan[i]) {
            if previous == *stage {
                return Err(ProbeError::InvalidPlan(format!(
                    "stage '{}' appears more than once",
                    stage
                )));
            }
            if previous.position() > stage.position() {
                return Err(ProbeError::InvalidPlan(format!(
                    "stage '{}' must run before '{}'",
                    stage, previous
                )));
            }
        }
        if stage.requires_agency_ids() && !producer_seen {
            return Err(ProbeError::InvalidPlan(format!(
                "stage '{}' needs agency ids but no earlier stage discovers them",
                stage
            )));
        }
        producer_seen |= stage.produces_agency_ids();
    }
    Ok(())
}

/// Probe pipeline orchestrator.
pub struct ProbePipeline;

impl ProbePipeline {
    /// Every stage in the fixed order.
    pub fn default_plan() -> Vec<CheckStage> {
        CheckStage::ORDER.to_vec()
    }

    /// The default plan minus `skip`.
    pub fn plan_without(skip: &[CheckStage]) -> Vec<CheckStage> {
        CheckStage::ORDER
            .into_iter()
            .filter(|stage| !skip.contains(stage))
            .collect()
    }

    /// Execute `plan` with the default tolerance policy.
    pub async fn run(
        transport: &dyn ApiTransport,
        config: &ProbeConfig,
        plan: &[CheckStage],
        reporter: &mut dyn ProgressReporter,
    ) -> Result<RunReport> {
        Self::run_with_policy(transport, config, plan, TolerancePolicy::default(), reporter)
            .await
    }

    /// Execute `plan` stage by stage.
    ///
    /// Only an invalid configuration or plan is returned as an error. Every
    /// failure inside a check becomes a recorded result and the remaining
    /// stages still run.
    pub async fn run_with_policy(
        transport: &dyn ApiTransport,
        config: &ProbeConfig,
        plan: &[CheckStage],
        tolerance: TolerancePolicy,
        reporter: &mut dyn ProgressReporter,
    ) -> Result<RunReport> {
        config.validate()?;
        validate_plan(plan)?;

        let run_id = Uuid::new_v4().to_string();
        let api_base = config.api_base();
        let started_at = Utc::now();
        let start = Instant::now();

        info!(run_id = %run_id, api_base = %api_base, "Starting probe run");
        reporter.run_started(&api_base);

        let mut ctx = RunContext::new(transport, config).with_tolerance(tolerance);
        for stage in plan {
            info!(stage = %stage, "Executing stage");
            let mark = ctx.log.len();
            stage.execute(&mut ctx).await;
            reporter.stage_finished(*stage, ctx.log.since(mark));
        }

        let duration_ms = start.elapsed().as_millis() as u64;
        let summary = ctx.log.summarize();

        if summary.all_passed() {
            info!(run_id = %run_id, passed = summary.passed, "Probe run passed");
        } else {
            info!(
                run_id = %run_id,
                failed = summary.failed(),
                total = summary.total,
                "Probe run failed"
            );
        }

        let report = RunReport {
            run_id,
            api_base,
            started_at,
            duration_ms,
            stages: plan.to_vec(),
            agency_ids: ctx.state.agency_ids().to_vec(),
            results: ctx.log.into_entries(),
            summary,
        };
        reporter.run_finished(&report);
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_plan_is_valid() {
        assert!(validate_plan(&ProbePipeline::default_plan()).is_ok());
    }

    #[test]
    fn test_empty_plan_rejected() {
        assert!(matches!(
            validate_plan(&[]),
            Err(ProbeError::InvalidPlan(_))
        ));
    }

    #[test]
    fn test_reordered_plan_rejected() {
        let plan = [CheckStage::Listing, CheckStage::Update, CheckStage::Create];
        let err = validate_plan(&plan).unwrap_err();
        assert!(err.to_string().contains("'create' must run before 'update'"));
    }

    #[test]
    fn test_duplicate_stage_rejected() {
        let plan = [CheckStage::Root, CheckStage::Root];
        let err = validate_plan(&plan).unwrap_err();
        assert!(err.to_string().contains("more than once"));
    }

    #[test]
    fn test_consumer_without_producer_rejected() {
        let plan = [CheckStage::Root, CheckStage::Review];
        let err = validate_plan(&plan).unwrap_err();
        assert!(err.to_string().contains("'review' needs agency ids"));
    }

    #[test]
    fn test_create_alone_feeds_update() {
        let plan = [CheckStage::Create, CheckStage::Update];
        assert!(validate_plan(&plan).is_ok());
    }

    #[test]
    fn test_plan_without_contact_stages() {
        let plan =
            ProbePipeline::plan_without(&[CheckStage::ContactAgency, CheckStage::ContactGeneral]);
        assert_eq!(plan.len(), 6);
        assert_eq!(plan.last(), Some(&CheckStage::Review));
        assert!(validate_plan(&plan).is_ok());
    }

    #[test]
    fn test_skipping_every_producer_is_rejected() {
        let plan = ProbePipeline::plan_without(&[CheckStage::Listing, CheckStage::Create]);
        assert!(validate_plan(&plan).is_err());
    }

    #[test]
    fn test_exit_code() {
        let mut report = RunReport {
            run_id: "run123".to_string(),
            api_base: "http://localhost:3000/api".to_string(),
            started_at: Utc::now(),
            duration_ms: 10,
            stages: vec![CheckStage::Root],
            results: Vec::new(),
            summary: RunSummary {
                passed: 1,
                total: 1,
                ..RunSummary::default()
            },
            agency_ids: Vec::new(),
        };
        assert_eq!(report.exit_code(), 0);

        let mut log = crate::result_log::ResultLog::new();
        log.record("Root API endpoint", false, "Unexpected status code", Some(500));
        report.summary = log.summarize();
        assert_eq!(report.exit_code(), 1);
    }
}
