//! Configuration loading for the harness.
//!
//! Configuration is loaded from a TOML file; every field has a default so
//! an empty file (or no file at all) describes the standard local
//! deployment.

use serde::Deserialize;
use std::path::PathBuf;

/// Root configuration for a verification run.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HarnessConfig {
    /// Where the deployment lives.
    #[serde(default)]
    pub stack: StackConfig,
    /// Deadlines, timeouts, and settle delays.
    #[serde(default)]
    pub timings: TimingsConfig,
    /// Concurrency scenario shape.
    #[serde(default)]
    pub workload: WorkloadConfig,
}

/// Deployment addressing.
#[derive(Debug, Clone, Deserialize)]
pub struct StackConfig {
    /// Base host of the deployed services (default: localhost).
    #[serde(default = "default_host")]
    pub host: String,
    /// Docker Compose project name; containers are `<project>-<service>-1`.
    #[serde(default = "default_compose_project")]
    pub compose_project: String,
    /// Logical name of the compute dependency targeted by fault injection.
    #[serde(default = "default_compute_service")]
    pub compute_service: String,
}

/// Deadlines, timeouts, and settle delays, all in seconds.
#[derive(Debug, Clone, Deserialize)]
pub struct TimingsConfig {
    /// Overall deadline for the preflight readiness wait (default: 60).
    #[serde(default = "default_readiness_deadline")]
    pub readiness_deadline_secs: u64,
    /// Sleep between readiness polling passes (default: 5).
    #[serde(default = "default_probe_interval")]
    pub probe_interval_secs: u64,
    /// Per-request timeout inside a readiness pass (default: 5).
    #[serde(default = "default_probe_timeout")]
    pub probe_timeout_secs: u64,
    /// Timeout for direct health checks in the health scenario (default: 10).
    #[serde(default = "default_health_timeout")]
    pub health_timeout_secs: u64,
    /// Timeout for a normal processing request (default: 15).
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
    /// Timeout for a request against a degraded stack, long enough for
    /// server-side retry exhaustion to complete first (default: 30).
    #[serde(default = "default_degraded_timeout")]
    pub degraded_timeout_secs: u64,
    /// Timeout for requests in the concurrency scenario (default: 20).
    #[serde(default = "default_concurrent_timeout")]
    pub concurrent_timeout_secs: u64,
    /// Timeout for one lifecycle stop/start command (default: 30).
    #[serde(default = "default_control_timeout")]
    pub control_timeout_secs: u64,
    /// Settle delay after stopping a service (default: 5).
    #[serde(default = "default_settle")]
    pub settle_secs: u64,
    /// Deadline for the stack to recover after a restart (default: 60).
    #[serde(default = "default_recovery_deadline")]
    pub recovery_deadline_secs: u64,
}

/// Concurrency scenario shape.
#[derive(Debug, Clone, Deserialize)]
pub struct WorkloadConfig {
    /// Number of concurrent requests to fan out (default: 10).
    #[serde(default = "default_fan_out")]
    pub fan_out: usize,
    /// Worker pool width (default: 10).
    #[serde(default = "default_pool_width")]
    pub pool_width: usize,
    /// Minimum successful requests for the scenario to pass (default: 8).
    #[serde(default = "default_min_success")]
    pub min_success: usize,
}

// Default value functions
fn default_host() -> String {
    "localhost".to_string()
}

fn default_compose_project() -> String {
    "stack".to_string()
}

fn default_compute_service() -> String {
    "compute".to_string()
}

fn default_readiness_deadline() -> u64 {
    60
}

fn default_probe_interval() -> u64 {
    5
}

fn default_probe_timeout() -> u64 {
    5
}

fn default_health_timeout() -> u64 {
    10
}

fn default_request_timeout() -> u64 {
    15
}

fn default_degraded_timeout() -> u64 {
    30
}

fn default_concurrent_timeout() -> u64 {
    20
}

fn default_control_timeout() -> u64 {
    30
}

fn default_settle() -> u64 {
    5
}

fn default_recovery_deadline() -> u64 {
    60
}

fn default_fan_out() -> usize {
    10
}

fn default_pool_width() -> usize {
    10
}

fn default_min_success() -> usize {
    8
}

impl Default for StackConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            compose_project: default_compose_project(),
            compute_service: default_compute_service(),
        }
    }
}

impl Default for TimingsConfig {
    fn default() -> Self {
        Self {
            readiness_deadline_secs: default_readiness_deadline(),
            probe_interval_secs: default_probe_interval(),
            probe_timeout_secs: default_probe_timeout(),
            health_timeout_secs: default_health_timeout(),
            request_timeout_secs: default_request_timeout(),
            degraded_timeout_secs: default_degraded_timeout(),
            concurrent_timeout_secs: default_concurrent_timeout(),
            control_timeout_secs: default_control_timeout(),
            settle_secs: default_settle(),
            recovery_deadline_secs: default_recovery_deadline(),
        }
    }
}

impl Default for WorkloadConfig {
    fn default() -> Self {
        Self {
            fan_out: default_fan_out(),
            pool_width: default_pool_width(),
            min_success: default_min_success(),
        }
    }
}

impl HarnessConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[error("failed to read config file {path}: {source}")]
    ReadError {
        /// Path to the configuration file.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// Failed to parse configuration file.
    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        /// Path to the configuration file.
        path: PathBuf,
        /// Underlying TOML parse error.
        source: toml::de::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_config_matches_local_deployment() {
        let config = HarnessConfig::default();
        assert_eq!(config.stack.host, "localhost");
        assert_eq!(config.stack.compose_project, "stack");
        assert_eq!(config.timings.readiness_deadline_secs, 60);
        assert_eq!(config.timings.probe_interval_secs, 5);
        assert_eq!(config.workload.fan_out, 10);
        assert_eq!(config.workload.min_success, 8);
    }

    #[test]
    fn config_from_toml_string() {
        let toml = r#"
[stack]
host = "stack.internal"
compose_project = "ci-stack"

[timings]
readiness_deadline_secs = 120
degraded_timeout_secs = 45

[workload]
fan_out = 20
min_success = 16
"#;

        let config: HarnessConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.stack.host, "stack.internal");
        assert_eq!(config.stack.compose_project, "ci-stack");
        assert_eq!(config.timings.readiness_deadline_secs, 120);
        assert_eq!(config.timings.degraded_timeout_secs, 45);
        assert_eq!(config.workload.fan_out, 20);
        assert_eq!(config.workload.min_success, 16);
    }

    #[test]
    fn empty_toml_uses_all_defaults() {
        let config: HarnessConfig = toml::from_str("").unwrap();
        assert_eq!(config.stack.compute_service, "compute");
        assert_eq!(config.timings.control_timeout_secs, 30);
        assert_eq!(config.workload.pool_width, 10);
    }

    #[test]
    fn config_missing_fields_use_defaults() {
        let toml = r#"
[stack]
host = "10.0.0.7"
"#;
        let config: HarnessConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.stack.host, "10.0.0.7");
        assert_eq!(config.stack.compose_project, "stack");
        assert_eq!(config.timings.settle_secs, 5);
    }

    #[test]
    fn from_file_round_trips() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[timings]\nrequest_timeout_secs = 25").unwrap();

        let config = HarnessConfig::from_file(file.path()).unwrap();
        assert_eq!(config.timings.request_timeout_secs, 25);
    }

    #[test]
    fn from_file_reports_missing_file() {
        let err = HarnessConfig::from_file(std::path::Path::new("/nonexistent/stackcheck.toml"))
            .unwrap_err();
        assert!(err.to_string().contains("failed to read config file"));
    }
}
