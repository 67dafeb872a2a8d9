//! Human-readable progress and summary output.

use crate::pipeline::RunReport;
use crate::result_log::{CheckResult, RunSummary};
use crate::stage::CheckStage;
use std::io::Write;

const RULE_WIDTH: usize = 60;

/// Receives progress notifications from the pipeline.
pub trait ProgressReporter {
    fn run_started(&mut self, _api_base: &str) {}

    /// Called after each stage with the results it recorded.
    fn stage_finished(&mut self, _stage: CheckStage, _results: &[CheckResult]) {}

    fn run_finished(&mut self, _report: &RunReport) {}
}

/// Reporter that prints nothing.
#[derive(Debug, Default)]
pub struct SilentReporter;

impl ProgressReporter for SilentReporter {}

/// Writes progress lines and the final summary to a writer (stdout by default).
pub struct ConsoleReporter<W: Write> {
    out: W,
}

impl ConsoleReporter<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self {
            out: std::io::stdout(),
        }
    }
}

impl<W: Write> ConsoleReporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    // Progress output is best effort; a closed stdout must not abort a run.
    fn emit(&mut self, text: &str) {
        let _ = self.out.write_all(text.as_bytes());
        let _ = self.out.flush();
    }
}

impl<W: Write> ProgressReporter for ConsoleReporter<W> {
    fn run_started(&mut self, api_base: &str) {
        let text = format!(
            "Starting Foster Care Directory UK API checks\nTesting against: {}\n{}\n",
            api_base,
            "=".repeat(RULE_WIDTH)
        );
        self.emit(&text);
    }

    fn stage_finished(&mut self, _stage: CheckStage, results: &[CheckResult]) {
        let text: String = results.iter().map(render_result).collect();
        self.emit(&text);
    }

    fn run_finished(&mut self, report: &RunReport) {
        let text = format!("\n{}", render_summary(&report.summary));
        self.emit(&text);
    }
}

/// One progress entry, newline-terminated.
pub fn render_result(result: &CheckResult) -> String {
    let status = if result.passed { "✓ PASS" } else { "✗ FAIL" };
    let mut line = format!("{} {}: {}\n", status, result.name, result.details);
    if let Some(code) = result.status_code {
        line.push_str(&format!("    Response Code: {}\n", code));
    }
    line
}

/// Summary block: counts, success rate and the ordered failure list.
pub fn render_summary(summary: &RunSummary) -> String {
    let rule = "=".repeat(RULE_WIDTH);
    let mut text = format!("{}\nTEST SUMMARY\n{}\n", rule, rule);
    text.push_str(&format!("✓ Passed: {}\n", summary.passed));
    text.push_str(&format!("✗ Failed: {}\n", summary.failed()));
    if summary.soft_passed > 0 {
        text.push_str(&format!(
            "~ Soft passes: {} (tolerated downstream failures)\n",
            summary.soft_passed
        ));
    }
    text.push_str(&format!("Success Rate: {:.1}%\n", summary.success_rate()));

    if !summary.failures.is_empty() {
        text.push_str("\n✗ FAILED TESTS:\n");
        for failure in &summary.failures {
            text.push_str(&format!("   • {}: {}\n", failure.name, failure.details));
        }
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::result_log::ResultLog;

    #[test]
    fn test_render_result_with_status() {
        let mut log = ResultLog::new();
        let result = log.record("Root API endpoint", true, "API info returned", Some(200));
        assert_eq!(
            render_result(result),
            "✓ PASS Root API endpoint: API info returned\n    Response Code: 200\n"
        );
    }

    #[test]
    fn test_render_result_without_status() {
        let mut log = ResultLog::new();
        let result = log.record("Create agency", false, "Request failed: refused", None);
        let line = render_result(result);
        assert!(line.starts_with("✗ FAIL Create agency"));
        assert!(!line.contains("Response Code"));
    }

    #[test]
    fn test_render_summary_lists_failures_in_order() {
        let mut log = ResultLog::new();
        log.record("Root API endpoint", true, "ok", Some(200));
        log.record("Update agency", false, "no ids", None);
        log.record("Add agency review", false, "mismatch", Some(201));
        log.record("General contact", true, "ok", Some(200));

        let text = render_summary(&log.summarize());
        assert!(text.contains("✓ Passed: 2"));
        assert!(text.contains("✗ Failed: 2"));
        assert!(text.contains("Success Rate: 50.0%"));
        let update = text.find("• Update agency: no ids").unwrap();
        let review = text.find("• Add agency review: mismatch").unwrap();
        assert!(update < review);
        assert!(!text.contains("Soft passes"));
    }

    #[test]
    fn test_render_summary_soft_passes() {
        let mut log = ResultLog::new();
        log.record_soft_pass("Contact agency", "email down", Some(500));
        let text = render_summary(&log.summarize());
        assert!(text.contains("Soft passes: 1"));
        assert!(!text.contains("FAILED TESTS"));
    }

    #[test]
    fn test_console_reporter_writes_stage_results() {
        let mut log = ResultLog::new();
        log.record("Root API endpoint", true, "ok", Some(200));

        let mut reporter = ConsoleReporter::new(Vec::new());
        reporter.run_started("http://localhost:3000/api");
        reporter.stage_finished(CheckStage::Root, log.entries());

        let out = String::from_utf8(reporter.into_inner()).unwrap();
        assert!(out.contains("Testing against: http://localhost:3000/api"));
        assert!(out.contains("✓ PASS Root API endpoint: ok"));
    }
}
