//! Error types for agency-probe

use thiserror::Error;

/// Errors raised while talking to the directory API or preparing a run.
#[derive(Error, Debug)]
pub enum ProbeError {
    /// Connection refused, DNS failure, TLS error, ...
    #[error("transport error: {0}")]
    Transport(String),

    /// Request exceeded its per-call timeout
    #[error("request timed out after {secs}s: {url}")]
    Timeout { url: String, secs: u64 },

    /// Response body could not be decoded as JSON
    #[error("malformed response body (status {status}): {reason}")]
    MalformedBody { status: u16, reason: String },

    /// Configuration rejected by validation
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Stage plan violates ordering or dependency rules
    #[error("invalid check plan: {0}")]
    InvalidPlan(String),

    /// Stage name not recognised
    #[error("unknown check stage: {0}")]
    UnknownStage(String),
}

impl From<reqwest::Error> for ProbeError {
    fn from(err: reqwest::Error) -> Self {
        ProbeError::Transport(err.to_string())
    }
}

/// Result type for agency-probe operations.
pub type Result<T> = std::result::Result<T, ProbeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_display() {
        let err = ProbeError::Timeout {
            url: "http://localhost:3000/api/".to_string(),
            secs: 10,
        };
        let msg = err.to_string();
        assert!(msg.contains("timed out after 10s"));
        assert!(msg.contains("/api/"));
    }

    #[test]
    fn test_malformed_body_display() {
        let err = ProbeError::MalformedBody {
            status: 200,
            reason: "expected value at line 1 column 1".to_string(),
        };
        assert!(err.to_string().contains("status 200"));
    }

    #[test]
    fn test_plan_error_display() {
        let err = ProbeError::InvalidPlan("update requires agency ids".to_string());
        assert!(err.to_string().contains("invalid check plan"));
    }
}
