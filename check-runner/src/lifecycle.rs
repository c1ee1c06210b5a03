//! Lifecycle control of services in the deployment.
//!
//! Fault injection stops a named service and later restarts it. The control
//! surface is a trait so scenarios can be exercised against a scripted
//! in-memory backend in unit tests; the production backend drives the
//! Docker API.
//!
//! Neither operation verifies the resulting health state; that is the
//! caller's job, typically via the readiness prober after a settle delay.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use bollard::container::{StartContainerOptions, StopContainerOptions};
use bollard::Docker;
use thiserror::Error;

/// Grace period passed to the container runtime when stopping.
const STOP_GRACE_SECS: i64 = 10;

/// Errors raised while setting up lifecycle control.
#[derive(Debug, Error)]
pub enum LifecycleError {
    /// Docker API error.
    #[error("docker error: {0}")]
    Docker(#[from] bollard::errors::Error),
}

/// Stop/start control over named services in the deployment.
///
/// Both operations are synchronous from the caller's view, bounded by a
/// timeout, and report only success or failure, never a partial state.
#[async_trait]
pub trait DeploymentControl: Send + Sync {
    /// Stop a service; returns whether the command reported success.
    async fn stop(&self, service: &str) -> bool;

    /// Start a service; returns whether the command reported success.
    async fn start(&self, service: &str) -> bool;
}

/// Docker-backed deployment control.
pub struct DockerControl {
    docker: Docker,
    project: String,
    timeout: Duration,
}

impl DockerControl {
    /// Connect to the local Docker daemon.
    pub fn connect(project: impl Into<String>, timeout: Duration) -> Result<Self, LifecycleError> {
        Ok(Self {
            docker: Docker::connect_with_local_defaults()?,
            project: project.into(),
            timeout,
        })
    }

    /// Build the full container name from project name and service.
    ///
    /// Docker Compose naming: `<project>-<service>-1`
    fn container_name(&self, service: &str) -> String {
        format!("{}-{}-1", self.project, service)
    }
}

#[async_trait]
impl DeploymentControl for DockerControl {
    async fn stop(&self, service: &str) -> bool {
        let name = self.container_name(service);
        let command = self
            .docker
            .stop_container(&name, Some(StopContainerOptions { t: STOP_GRACE_SECS }));

        match tokio::time::timeout(self.timeout, command).await {
            Ok(Ok(())) => {
                tracing::info!(container = %name, "service stopped");
                true
            }
            Ok(Err(err)) => {
                tracing::error!(container = %name, %err, "stop command failed");
                false
            }
            Err(_) => {
                tracing::error!(container = %name, "stop command timed out");
                false
            }
        }
    }

    async fn start(&self, service: &str) -> bool {
        let name = self.container_name(service);
        let command = self
            .docker
            .start_container(&name, None::<StartContainerOptions<String>>);

        match tokio::time::timeout(self.timeout, command).await {
            Ok(Ok(())) => {
                tracing::info!(container = %name, "service started");
                true
            }
            Ok(Err(err)) => {
                tracing::error!(container = %name, %err, "start command failed");
                false
            }
            Err(_) => {
                tracing::error!(container = %name, "start command timed out");
                false
            }
        }
    }
}

/// Scripted deployment control for tests.
///
/// Records every call and can be told to report failure for stops or
/// starts, so resource-safety paths can be exercised without a deployment.
#[derive(Debug, Default)]
pub struct ScriptedControl {
    inner: Arc<Mutex<ScriptedInner>>,
}

#[derive(Debug, Default)]
struct ScriptedInner {
    calls: Vec<String>,
    fail_stop: bool,
    fail_start: bool,
}

impl ScriptedControl {
    /// Create a control backend where every command succeeds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent stop report failure.
    pub fn fail_stops(&self) {
        self.inner.lock().unwrap().fail_stop = true;
    }

    /// Make every subsequent start report failure.
    pub fn fail_starts(&self) {
        self.inner.lock().unwrap().fail_start = true;
    }

    /// All commands issued so far, e.g. `["stop compute", "start compute"]`.
    pub fn calls(&self) -> Vec<String> {
        self.inner.lock().unwrap().calls.clone()
    }
}

impl Clone for ScriptedControl {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

#[async_trait]
impl DeploymentControl for ScriptedControl {
    async fn stop(&self, service: &str) -> bool {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(format!("stop {service}"));
        !inner.fail_stop
    }

    async fn start(&self, service: &str) -> bool {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(format!("start {service}"));
        !inner.fail_start
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn container_name_follows_compose_convention() {
        let control = DockerControl::connect("stack", Duration::from_secs(30)).unwrap();
        assert_eq!(control.container_name("compute"), "stack-compute-1");
    }

    #[tokio::test]
    async fn scripted_control_records_calls() {
        let control = ScriptedControl::new();

        assert!(control.stop("compute").await);
        assert!(control.start("compute").await);
        assert_eq!(control.calls(), vec!["stop compute", "start compute"]);
    }

    #[tokio::test]
    async fn scripted_control_reports_forced_failures() {
        let control = ScriptedControl::new();
        control.fail_stops();

        assert!(!control.stop("compute").await);
        assert!(control.start("compute").await);
    }
}
