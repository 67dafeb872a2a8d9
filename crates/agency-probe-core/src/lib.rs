//! agency-probe core - contract checks for the Foster Care Directory UK API
//!
//! Provides a probe pipeline that:
//! - Exercises the root, agency CRUD, review and contact endpoints
//! - Records one result per assertion in an append-only log
//! - Threads discovered agency ids from earlier checks into later ones
//! - Summarises the run into a pass/fail report and exit code

pub mod checks;
pub mod config;
pub mod context;
pub mod error;
pub mod fakes;
pub mod pipeline;
pub mod report;
pub mod result_log;
pub mod stage;
pub mod telemetry;
pub mod tolerance;
pub mod transport;

// Re-export key types
pub use config::ProbeConfig;
pub use context::{IdPick, RunContext, RunState, Verdict};
pub use error::{ProbeError, Result};
pub use pipeline::{validate_plan, ProbePipeline, RunReport};
pub use report::{ConsoleReporter, ProgressReporter, SilentReporter};
pub use result_log::{CheckResult, ResultLog, RunSummary};
pub use stage::CheckStage;
pub use telemetry::init_tracing;
pub use tolerance::{Tolerance, TolerancePolicy, ToleranceRule};
pub use transport::{ApiRequest, ApiResponse, ApiTransport, HttpTransport, Method};
