//! Tolerated downstream failures.
//!
//! The contact endpoints relay messages through an external mail provider.
//! A response with a listed status whose `error` text mentions the listed
//! substring is blamed on that provider, not on the endpoint, and counts as
//! a soft pass.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One tolerated (status, error substring) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToleranceRule {
    pub status: u16,
    /// Matched case-insensitively against the body's `error` field.
    pub error_substring: String,
}

impl ToleranceRule {
    pub fn new(status: u16, error_substring: &str) -> Self {
        Self {
            status,
            error_substring: error_substring.to_lowercase(),
        }
    }
}

/// How a response relates to the tolerance table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tolerance {
    /// No rule covers this status.
    NotApplicable,
    /// A rule covers the status and the error text matched.
    Tolerated { reason: String },
    /// A rule covers the status but the error text did not match.
    Rejected { error: String },
}

/// Table of tolerated failures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TolerancePolicy {
    pub rules: Vec<ToleranceRule>,
}

impl Default for TolerancePolicy {
    /// 500 responses blaming email delivery.
    fn default() -> Self {
        Self {
            rules: vec![ToleranceRule::new(500, "email")],
        }
    }
}

impl TolerancePolicy {
    /// A policy that tolerates nothing.
    pub fn strict() -> Self {
        Self { rules: Vec::new() }
    }

    pub fn with_rule(mut self, rule: ToleranceRule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn covers(&self, status: u16) -> bool {
        self.rules.iter().any(|r| r.status == status)
    }

    /// Classify a response. `body` is the decoded JSON, if any.
    pub fn classify(&self, status: u16, body: Option<&Value>) -> Tolerance {
        if !self.covers(status) {
            return Tolerance::NotApplicable;
        }

        let error = body
            .and_then(|b| b.get("error"))
            .and_then(Value::as_str)
            .unwrap_or("")
            .to_string();
        let lowered = error.to_lowercase();

        match self
            .rules
            .iter()
            .filter(|r| r.status == status)
            .find(|r| lowered.contains(&r.error_substring))
        {
            Some(rule) => Tolerance::Tolerated {
                reason: format!(
                    "status {} with error mentioning '{}'",
                    rule.status, rule.error_substring
                ),
            },
            None => Tolerance::Rejected { error },
        }
    }
}
