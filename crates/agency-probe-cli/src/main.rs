//! agency-probe - contract checks for the Foster Care Directory UK API
//!
//! Runs every check against the backend named by `NEXT_PUBLIC_BASE_URL`
//! (default `http://localhost:3000`), prints progress and a summary, and
//! exits 0 only when every check passed.

use agency_probe_core::config::DEFAULT_BASE_URL;
use agency_probe_core::{
    init_tracing, CheckStage, ConsoleReporter, HttpTransport, ProbeConfig, ProbePipeline,
    ProgressReporter, RunReport, SilentReporter,
};
use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::process::ExitCode;
use std::time::Duration;
use tracing::{debug, Level};

#[derive(Parser, Debug)]
#[command(name = "agency-probe")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Contract checks for the Foster Care Directory UK API", long_about = None)]
struct Cli {
    /// Backend base URL; `/api` is appended
    #[arg(long, env = "NEXT_PUBLIC_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Timeout for reads and CRUD writes, in seconds
    #[arg(long, env = "PROBE_READ_TIMEOUT_SECS", default_value_t = 10)]
    read_timeout_secs: u64,

    /// Timeout for contact endpoints that send email, in seconds
    #[arg(long, env = "PROBE_EMAIL_TIMEOUT_SECS", default_value_t = 15)]
    email_timeout_secs: u64,

    /// Stage to leave out (repeatable), e.g. `--skip contact-agency`
    #[arg(long = "skip", value_name = "STAGE")]
    skip: Vec<CheckStage>,

    /// Report format on stdout
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    output: OutputFormat,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Progress lines and a summary
    Text,
    /// The full run report as JSON
    Json,
}

impl Cli {
    fn probe_config(&self) -> ProbeConfig {
        ProbeConfig::new(&self.base_url)
            .with_read_timeout(Duration::from_secs(self.read_timeout_secs))
            .with_email_timeout(Duration::from_secs(self.email_timeout_secs))
    }

    fn plan(&self) -> Vec<CheckStage> {
        ProbePipeline::plan_without(&self.skip)
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::WARN
    };
    init_tracing(cli.json, level);

    let report = run(&cli).await?;
    debug!(run_id = %report.run_id, exit_code = report.exit_code(), "run complete");

    if cli.output == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    }

    Ok(if report.success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

async fn run(cli: &Cli) -> Result<RunReport> {
    let config = cli.probe_config();
    let plan = cli.plan();
    let transport = HttpTransport::new(&config).context("Failed to create HTTP client")?;

    let mut reporter: Box<dyn ProgressReporter> = match cli.output {
        OutputFormat::Text => Box::new(ConsoleReporter::stdout()),
        OutputFormat::Json => Box::new(SilentReporter),
    };

    ProbePipeline::run(&transport, &config, &plan, reporter.as_mut())
        .await
        .context("Probe run could not start")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::try_parse_from(["agency-probe"]).unwrap();
        assert_eq!(cli.read_timeout_secs, 10);
        assert_eq!(cli.email_timeout_secs, 15);
        assert_eq!(cli.output, OutputFormat::Text);
        assert_eq!(cli.plan(), CheckStage::ORDER.to_vec());
    }

    #[test]
    fn test_cli_overrides() {
        let cli = Cli::try_parse_from([
            "agency-probe",
            "--base-url",
            "https://staging.example.org/",
            "--email-timeout-secs",
            "30",
            "--skip",
            "contact-agency",
            "--skip",
            "contact-general",
            "--output",
            "json",
        ])
        .unwrap();

        let config = cli.probe_config();
        assert_eq!(config.base_url, "https://staging.example.org");
        assert_eq!(config.email_timeout, Duration::from_secs(30));
        assert_eq!(cli.plan().len(), 6);
        assert_eq!(cli.output, OutputFormat::Json);
    }

    #[test]
    fn test_cli_rejects_unknown_stage() {
        assert!(Cli::try_parse_from(["agency-probe", "--skip", "delete"]).is_err());
    }

    #[tokio::test]
    async fn test_run_rejects_invalid_plan() {
        let cli = Cli::try_parse_from([
            "agency-probe",
            "--skip",
            "listing",
            "--skip",
            "create",
            "--output",
            "json",
        ])
        .unwrap();
        let err = run(&cli).await.unwrap_err();
        assert!(format!("{:#}", err).contains("invalid check plan"));
    }
}
