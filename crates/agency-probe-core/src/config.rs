//! Probe configuration
//!
//! The base URL is read from `NEXT_PUBLIC_BASE_URL`, the same variable the
//! directory frontend uses, so a probe run points at whatever instance the
//! site itself is configured for.

use crate::error::ProbeError;
use crate::Result;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Environment variable holding the backend base URL.
pub const BASE_URL_ENV: &str = "NEXT_PUBLIC_BASE_URL";

/// Base URL used when the environment does not provide one.
pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";

/// Product name the root endpoint must announce.
pub const DEFAULT_PRODUCT_NAME: &str = "Foster Care Directory UK API";

/// Timeout for reads and CRUD writes.
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(10);

/// Timeout for endpoints that may send email.
pub const DEFAULT_EMAIL_TIMEOUT: Duration = Duration::from_secs(15);

/// Probe configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeConfig {
    /// Backend base URL, without trailing slash
    pub base_url: String,
    /// Path prefix of every API route
    pub api_prefix: String,
    /// Expected substring of the root endpoint's `message`
    pub product_name: String,
    /// Timeout for reads and CRUD writes
    pub read_timeout: Duration,
    /// Timeout for contact endpoints
    pub email_timeout: Duration,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        ProbeConfig {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_prefix: "/api".to_string(),
            product_name: DEFAULT_PRODUCT_NAME.to_string(),
            read_timeout: DEFAULT_READ_TIMEOUT,
            email_timeout: DEFAULT_EMAIL_TIMEOUT,
        }
    }
}

impl ProbeConfig {
    /// Create a config from environment variables
    pub fn from_env() -> Self {
        let base_url = std::env::var(BASE_URL_ENV).unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        Self::new(&base_url)
    }

    /// Create a config for a specific backend
    pub fn new(base_url: &str) -> Self {
        ProbeConfig {
            base_url: base_url.trim_end_matches('/').to_string(),
            ..Self::default()
        }
    }

    /// Override the read timeout
    pub fn with_read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = timeout;
        self
    }

    /// Override the email timeout
    pub fn with_email_timeout(mut self, timeout: Duration) -> Self {
        self.email_timeout = timeout;
        self
    }

    /// Override the expected product name
    pub fn with_product_name(mut self, name: &str) -> Self {
        self.product_name = name.to_string();
        self
    }

    /// Root of every API route, e.g. `http://localhost:3000/api`
    pub fn api_base(&self) -> String {
        format!("{}{}", self.base_url, self.api_prefix)
    }

    /// Absolute URL of an API path (`path` starts with `/`)
    pub fn api_url(&self, path: &str) -> String {
        format!("{}{}", self.api_base(), path)
    }

    /// Reject configurations that cannot produce a meaningful run.
    pub fn validate(&self) -> Result<()> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(ProbeError::InvalidConfig(format!(
                "base URL must start with http:// or https://, got '{}'",
                self.base_url
            )));
        }
        if self.read_timeout.is_zero() || self.email_timeout.is_zero() {
            return Err(ProbeError::InvalidConfig(
                "timeouts must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
