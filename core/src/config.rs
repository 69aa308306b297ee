//! Service configuration.
//!
//! Environment variables are read in exactly one place, [`ServiceConfig::from_env`].
//! Everything else receives a `ServiceConfig` value, and tests drive
//! [`ServiceConfig::from_lookup`] with an in-memory map instead of mutating
//! the process environment.
//!
//! | Variable | Required | Meaning |
//! |----------|----------|---------|
//! | `<NAME>_URL` | yes | Base URL of the service |
//! | `<NAME>_TIMEOUT_SECS` | no | Whole-request timeout (default 60) |
//! | `<NAME>_USER_AGENT` | no | Overrides the default user agent |
//!
//! `<NAME>` is the service name upper-cased with `-` replaced by `_`.

use std::time::Duration;

use crate::error::ApiError;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Connection settings shared by a service and its transport.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Base URL, stored without a trailing slash.
    pub service_url: String,
    pub timeout: Duration,
    pub user_agent: String,
    /// Headers appended to every request, e.g. a caller-managed `authorization`.
    pub default_headers: Vec<(String, String)>,
}

impl ServiceConfig {
    pub fn new(service_url: &str) -> Self {
        Self {
            service_url: service_url.trim_end_matches('/').to_string(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: format!("toolchain-core/{}", env!("CARGO_PKG_VERSION")),
            default_headers: Vec::new(),
        }
    }

    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = agent.into();
        self
    }

    #[must_use]
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_headers.push((key.into(), value.into()));
        self
    }

    /// Load the configuration for `service_name` from the process environment.
    pub fn from_env(service_name: &str) -> Result<Self, ApiError> {
        Self::from_lookup(service_name, |key| std::env::var(key).ok())
    }

    /// Load the configuration for `service_name` from an arbitrary key lookup.
    pub fn from_lookup<F>(service_name: &str, lookup: F) -> Result<Self, ApiError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let prefix = service_name.to_ascii_uppercase().replace('-', "_");

        let url_key = format!("{prefix}_URL");
        let url = lookup(&url_key)
            .filter(|v| !v.trim().is_empty())
            .ok_or(ApiError::MissingConfig { key: url_key })?;
        let mut config = Self::new(url.trim());

        let timeout_key = format!("{prefix}_TIMEOUT_SECS");
        if let Some(raw) = lookup(&timeout_key) {
            let secs: u64 = raw.trim().parse().map_err(|_| ApiError::InvalidConfig {
                key: timeout_key.clone(),
                message: format!("expected a whole number of seconds, got '{raw}'"),
            })?;
            if secs == 0 {
                return Err(ApiError::InvalidConfig {
                    key: timeout_key,
                    message: "timeout must be greater than zero".to_string(),
                });
            }
            config.timeout = Duration::from_secs(secs);
        }

        if let Some(agent) = lookup(&format!("{prefix}_USER_AGENT")) {
            config.user_agent = agent;
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn new_strips_trailing_slash() {
        let config = ServiceConfig::new("http://localhost:3000/");
        assert_eq!(config.service_url, "http://localhost:3000");
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
    }

    #[test]
    fn from_lookup_reads_prefixed_keys() {
        let config = ServiceConfig::from_lookup(
            "cd-toolchain",
            lookup(&[
                ("CD_TOOLCHAIN_URL", "https://api.example.com/toolchain/v2/"),
                ("CD_TOOLCHAIN_TIMEOUT_SECS", "15"),
                ("CD_TOOLCHAIN_USER_AGENT", "my-app/1.0"),
            ]),
        )
        .unwrap();
        assert_eq!(config.service_url, "https://api.example.com/toolchain/v2");
        assert_eq!(config.timeout, Duration::from_secs(15));
        assert_eq!(config.user_agent, "my-app/1.0");
    }

    #[test]
    fn from_lookup_requires_url() {
        let err = ServiceConfig::from_lookup("example_service", lookup(&[])).unwrap_err();
        assert!(matches!(err, ApiError::MissingConfig { ref key } if key == "EXAMPLE_SERVICE_URL"));
    }

    #[test]
    fn from_lookup_rejects_bad_timeout() {
        let err = ServiceConfig::from_lookup(
            "example_service",
            lookup(&[
                ("EXAMPLE_SERVICE_URL", "http://localhost"),
                ("EXAMPLE_SERVICE_TIMEOUT_SECS", "soon"),
            ]),
        )
        .unwrap_err();
        assert!(matches!(err, ApiError::InvalidConfig { .. }));

        let err = ServiceConfig::from_lookup(
            "example_service",
            lookup(&[
                ("EXAMPLE_SERVICE_URL", "http://localhost"),
                ("EXAMPLE_SERVICE_TIMEOUT_SECS", "0"),
            ]),
        )
        .unwrap_err();
        assert!(matches!(err, ApiError::InvalidConfig { .. }));
    }

    #[test]
    fn builder_appends_default_headers() {
        let config = ServiceConfig::new("http://localhost")
            .header("authorization", "Bearer abc")
            .timeout(Duration::from_secs(5));
        assert_eq!(
            config.default_headers,
            vec![("authorization".to_string(), "Bearer abc".to_string())]
        );
        assert_eq!(config.timeout, Duration::from_secs(5));
    }
}
