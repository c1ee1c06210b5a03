//! Workload client for issuing requests against the stack under test.
//!
//! Every method returns a [`RequestOutcome`]; network-level failures
//! (connection refused, timeout) are captured in the outcome, never raised.
//! Each call is single-attempt with a bounded timeout, since the retry
//! behavior belongs to the stack under test.

use std::time::{Duration, Instant};

use futures_util::{stream, StreamExt};
use serde_json::json;

use crate::endpoints::{service, EndpointRegistry, ServiceEndpoint, UnknownServiceError};
use crate::outcome::{RequestOutcome, RequestSpec, ResponseBody};

/// Timeout for DLQ inspection and replay calls.
const DLQ_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP client for the processing endpoint and its inspection surfaces.
#[derive(Debug, Clone)]
pub struct WorkloadClient {
    http: reqwest::Client,
    process_url: String,
    dlq_url: String,
    dlq_replay_url: String,
}

impl WorkloadClient {
    /// Create a client bound to the registry's processor endpoint.
    pub fn new(registry: &EndpointRegistry) -> Result<Self, UnknownServiceError> {
        let processor = registry.resolve(service::PROCESSOR)?;
        Ok(Self {
            http: reqwest::Client::new(),
            process_url: processor.url("/function/process"),
            dlq_url: processor.url("/function/dlq"),
            dlq_replay_url: processor.url("/function/dlq/replay"),
        })
    }

    /// Post one processing request and capture its outcome.
    pub async fn send(&self, spec: &RequestSpec) -> RequestOutcome {
        let started = Instant::now();
        let result = self
            .http
            .post(&self.process_url)
            .timeout(spec.timeout)
            .json(&spec.payload)
            .send()
            .await;

        match result {
            Ok(response) => capture(response, started).await,
            Err(err) => {
                tracing::debug!(%err, "process request failed");
                RequestOutcome::failed(describe(&err), started.elapsed())
            }
        }
    }

    /// Dispatch many requests onto a bounded worker pool.
    ///
    /// Outcomes are collected as requests complete; their order carries no
    /// meaning and assertions must not rely on it.
    pub async fn send_concurrent(
        &self,
        specs: &[RequestSpec],
        max_parallelism: usize,
    ) -> Vec<RequestOutcome> {
        let width = max_parallelism.max(1);
        stream::iter(specs)
            .map(|spec| self.send(spec))
            .buffer_unordered(width)
            .collect()
            .await
    }

    /// Bounded GET against a path on a service.
    pub async fn get(
        &self,
        endpoint: &ServiceEndpoint,
        path: &str,
        timeout: Duration,
    ) -> RequestOutcome {
        let started = Instant::now();
        let result = self
            .http
            .get(endpoint.url(path))
            .timeout(timeout)
            .send()
            .await;

        match result {
            Ok(response) => capture(response, started).await,
            Err(err) => {
                tracing::debug!(service = %endpoint.name, path, %err, "probe failed");
                RequestOutcome::failed(describe(&err), started.elapsed())
            }
        }
    }

    /// Probe a service's health endpoint.
    pub async fn health(&self, endpoint: &ServiceEndpoint, timeout: Duration) -> RequestOutcome {
        self.get(endpoint, &endpoint.health_path, timeout).await
    }

    /// Inspect the dead-letter queue without mutating it.
    pub async fn dlq(&self) -> RequestOutcome {
        let started = Instant::now();
        let result = self
            .http
            .get(&self.dlq_url)
            .timeout(DLQ_TIMEOUT)
            .send()
            .await;

        match result {
            Ok(response) => capture(response, started).await,
            Err(err) => RequestOutcome::failed(describe(&err), started.elapsed()),
        }
    }

    /// Ask the processor to re-forward a dead-lettered request.
    pub async fn replay_dlq(&self, message_id: &str) -> RequestOutcome {
        let started = Instant::now();
        let result = self
            .http
            .post(&self.dlq_replay_url)
            .timeout(DLQ_TIMEOUT)
            .json(&json!({ "message_id": message_id }))
            .send()
            .await;

        match result {
            Ok(response) => capture(response, started).await,
            Err(err) => RequestOutcome::failed(describe(&err), started.elapsed()),
        }
    }
}

/// Read a completed response into an outcome, parsing JSON where possible.
async fn capture(response: reqwest::Response, started: Instant) -> RequestOutcome {
    let status = response.status().as_u16();
    match response.text().await {
        Ok(text) => {
            let body = match serde_json::from_str(&text) {
                Ok(value) => ResponseBody::Json(value),
                Err(_) => ResponseBody::Text(text),
            };
            RequestOutcome::completed(status, body, started.elapsed())
        }
        // The status line arrived but the body did not; the exchange never
        // completed, so this is still a network-level failure.
        Err(err) => RequestOutcome::failed(describe(&err), started.elapsed()),
    }
}

fn describe(err: &reqwest::Error) -> String {
    if err.is_timeout() {
        format!("request timed out: {err}")
    } else if err.is_connect() {
        format!("connection failed: {err}")
    } else {
        err.to_string()
    }
}
