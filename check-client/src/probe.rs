//! Readiness probing with a bounded wait.
//!
//! An endpoint is healthy only on a 200 response; all endpoints must be
//! healthy within the same polling pass before the deployment counts as
//! ready. One unhealthy endpoint fails the whole pass; there is no partial
//! credit.

use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::endpoints::{EndpointRegistry, ServiceEndpoint};

/// Fixed sleep between polling passes.
const DEFAULT_INTERVAL: Duration = Duration::from_secs(5);
/// Per-request timeout, so a hung service cannot block a pass indefinitely.
const DEFAULT_CHECK_TIMEOUT: Duration = Duration::from_secs(5);

/// Polls every registered endpoint until all are healthy or a deadline
/// elapses.
#[derive(Debug, Clone)]
pub struct ReadinessProber {
    registry: Arc<EndpointRegistry>,
    http: reqwest::Client,
    interval: Duration,
    check_timeout: Duration,
}

impl ReadinessProber {
    /// Create a prober over the given registry with default timing.
    pub fn new(registry: Arc<EndpointRegistry>) -> Self {
        Self {
            registry,
            http: reqwest::Client::new(),
            interval: DEFAULT_INTERVAL,
            check_timeout: DEFAULT_CHECK_TIMEOUT,
        }
    }

    /// Override the polling interval and per-check timeout.
    pub fn with_timing(mut self, interval: Duration, check_timeout: Duration) -> Self {
        self.interval = interval;
        self.check_timeout = check_timeout;
        self
    }

    /// Wait until every endpoint is healthy, up to `deadline`.
    ///
    /// Returns `false` when the deadline elapses first. Not being ready is a
    /// reportable condition, not a fault.
    pub async fn wait_until_ready(&self, deadline: Duration) -> bool {
        let started = Instant::now();
        loop {
            if self.all_healthy().await {
                tracing::info!(
                    waited_secs = started.elapsed().as_secs(),
                    "all services ready"
                );
                return true;
            }
            if started.elapsed() + self.interval >= deadline {
                tracing::warn!(
                    deadline_secs = deadline.as_secs(),
                    "services did not become ready before the deadline"
                );
                return false;
            }
            tracing::info!(
                waited_secs = started.elapsed().as_secs(),
                "services not ready yet"
            );
            tokio::time::sleep(self.interval).await;
        }
    }

    /// One polling pass over every endpoint.
    async fn all_healthy(&self) -> bool {
        for endpoint in self.registry.all() {
            if !self.check(endpoint).await {
                tracing::debug!(service = %endpoint.name, "health check failed");
                return false;
            }
        }
        true
    }

    /// Probe one endpoint; healthy only on status 200.
    pub async fn check(&self, endpoint: &ServiceEndpoint) -> bool {
        match self
            .http
            .get(endpoint.health_url())
            .timeout(self.check_timeout)
            .send()
            .await
        {
            Ok(response) => response.status() == reqwest::StatusCode::OK,
            Err(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    async fn spawn_responder(status_line: &'static str) -> std::net::SocketAddr {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            if let Ok((mut socket, _)) = listener.accept().await {
                let mut buf = [0u8; 1024];
                let _ = socket.read(&mut buf).await;
                let response =
                    format!("{status_line}\r\ncontent-length: 2\r\nconnection: close\r\n\r\nok");
                let _ = socket.write_all(response.as_bytes()).await;
            }
        });
        addr
    }

    fn prober_for(host: &str) -> ReadinessProber {
        ReadinessProber::new(Arc::new(EndpointRegistry::new(host)))
            .with_timing(Duration::from_millis(50), Duration::from_secs(1))
    }

    #[tokio::test]
    async fn check_accepts_200() {
        let addr = spawn_responder("HTTP/1.1 200 OK").await;
        let ep = ServiceEndpoint::new("probe", format!("http://{addr}"), "/healthz");

        let prober = prober_for("localhost");
        assert!(prober.check(&ep).await);
    }

    #[tokio::test]
    async fn check_rejects_non_200() {
        let addr = spawn_responder("HTTP/1.1 503 Service Unavailable").await;
        let ep = ServiceEndpoint::new("probe", format!("http://{addr}"), "/healthz");

        let prober = prober_for("localhost");
        assert!(!prober.check(&ep).await);
    }

    #[tokio::test]
    async fn check_treats_unreachable_as_unhealthy() {
        let ep = ServiceEndpoint::new("probe", "http://stack.invalid:8080", "/healthz");
        let prober = prober_for("localhost");
        assert!(!prober.check(&ep).await);
    }

    #[tokio::test]
    async fn wait_until_ready_times_out_when_stack_is_down() {
        let prober = prober_for("stack.invalid");
        assert!(!prober.wait_until_ready(Duration::from_millis(100)).await);
    }
}
