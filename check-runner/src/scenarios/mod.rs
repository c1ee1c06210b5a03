//! Verification scenarios, in their fixed execution order:
//!
//! - `health`: each endpoint's specific health contract
//! - `normal`: deterministic transformation plus validation rejection
//! - `idempotency`: repeated key returns the memoized result
//! - `failure`: dependency outage, retry exhaustion, DLQ, recovery
//! - `concurrency`: fan-out under a bounded worker pool
//!
//! Each scenario is linear: it runs to completion or stops at its first
//! failed assertion. Failures never abort the run; the runner records them
//! and moves on.

use std::future::Future;
use std::sync::Arc;

use check_client::{
    EndpointRegistry, ReadinessProber, RequestOutcome, UnknownServiceError, WorkloadClient,
};
use thiserror::Error;

use crate::config::HarnessConfig;
use crate::lifecycle::DeploymentControl;

pub mod concurrency;
pub mod failure;
pub mod health;
pub mod idempotency;
pub mod normal;

/// Everything a scenario needs to talk to the deployment.
pub struct ScenarioContext {
    /// Run configuration.
    pub config: HarnessConfig,
    /// The named service endpoints.
    pub registry: Arc<EndpointRegistry>,
    /// Workload client for the processing endpoint.
    pub client: WorkloadClient,
    /// Readiness prober, reused for post-restart recovery checks.
    pub prober: ReadinessProber,
    /// Lifecycle control over the deployment.
    pub control: Arc<dyn DeploymentControl>,
}

/// Why a scenario failed.
#[derive(Debug, Error)]
pub enum ScenarioError {
    /// An observed outcome did not match the expected contract.
    #[error("{0}")]
    Assertion(String),

    /// A lifecycle command reported non-success.
    #[error("control command failed: {0}")]
    Control(String),

    /// A scenario referenced a service the registry does not know.
    #[error(transparent)]
    UnknownService(#[from] UnknownServiceError),
}

/// Fail the scenario with `message` unless `condition` holds.
pub fn ensure(condition: bool, message: impl Into<String>) -> Result<(), ScenarioError> {
    if condition {
        Ok(())
    } else {
        Err(ScenarioError::Assertion(message.into()))
    }
}

/// Assert an outcome completed with the expected status code.
pub fn expect_status(outcome: &RequestOutcome, want: u16) -> Result<(), ScenarioError> {
    match outcome.status() {
        Some(got) if got == want => Ok(()),
        Some(got) => Err(ScenarioError::Assertion(format!(
            "expected status {want}, got {got}"
        ))),
        None => Err(ScenarioError::Assertion(format!(
            "expected status {want}, but the request failed: {}",
            outcome.error().unwrap_or("no response")
        ))),
    }
}

/// Extract a required string field from a JSON response body.
pub fn json_str<'a>(outcome: &'a RequestOutcome, field: &str) -> Result<&'a str, ScenarioError> {
    outcome
        .json_field(field)
        .and_then(|value| value.as_str())
        .ok_or_else(|| {
            ScenarioError::Assertion(format!("response body missing string field {field:?}"))
        })
}

/// Extract a required numeric field from a JSON response body.
pub fn json_u64(outcome: &RequestOutcome, field: &str) -> Result<u64, ScenarioError> {
    outcome
        .json_field(field)
        .and_then(|value| value.as_u64())
        .ok_or_else(|| {
            ScenarioError::Assertion(format!("response body missing numeric field {field:?}"))
        })
}

/// Assert a field is present in a JSON response body, whatever its value.
pub fn json_present(outcome: &RequestOutcome, field: &str) -> Result<(), ScenarioError> {
    if outcome.json_field(field).is_some() {
        Ok(())
    } else {
        Err(ScenarioError::Assertion(format!(
            "response body missing field {field:?}"
        )))
    }
}

/// Run `body` with `service` stopped, restarting it on every exit path.
///
/// This is the harness's most important resource-safety contract: no
/// scenario may leave the deployment degraded for the scenarios after it.
/// The restart is attempted whether the body succeeds, fails an assertion,
/// or errors, and even when the stop itself reported failure, since the
/// resulting state is then unknown. A failed restart surfaces as a control
/// error, superseding the body's own result.
pub async fn with_stopped<T, Fut>(
    control: &dyn DeploymentControl,
    service: &str,
    body: Fut,
) -> Result<T, ScenarioError>
where
    Fut: Future<Output = Result<T, ScenarioError>>,
{
    if !control.stop(service).await {
        let _ = control.start(service).await;
        return Err(ScenarioError::Control(format!(
            "stop of {service} reported failure"
        )));
    }

    let result = body.await;
    let restarted = control.start(service).await;

    match (result, restarted) {
        (Ok(value), true) => Ok(value),
        (Err(err), true) => Err(err),
        (Ok(_), false) => Err(ScenarioError::Control(format!(
            "restart of {service} reported failure"
        ))),
        (Err(err), false) => Err(ScenarioError::Control(format!(
            "restart of {service} reported failure while handling: {err}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifecycle::ScriptedControl;
    use check_client::ResponseBody;
    use serde_json::json;
    use std::time::Duration;

    fn json_outcome(status: u16, body: serde_json::Value) -> RequestOutcome {
        RequestOutcome::completed(status, ResponseBody::Json(body), Duration::from_millis(10))
    }

    #[test]
    fn ensure_passes_and_fails() {
        assert!(ensure(true, "unused").is_ok());
        let err = ensure(false, "broken").unwrap_err();
        assert_eq!(err.to_string(), "broken");
    }

    #[test]
    fn expect_status_on_matching_code() {
        let outcome = json_outcome(200, json!({}));
        assert!(expect_status(&outcome, 200).is_ok());
    }

    #[test]
    fn expect_status_on_wrong_code() {
        let outcome = json_outcome(503, json!({}));
        let err = expect_status(&outcome, 200).unwrap_err();
        assert!(err.to_string().contains("expected status 200, got 503"));
    }

    #[test]
    fn expect_status_on_failed_request() {
        let outcome = RequestOutcome::failed("connection refused", Duration::from_millis(2));
        let err = expect_status(&outcome, 200).unwrap_err();
        assert!(err.to_string().contains("connection refused"));
    }

    #[test]
    fn json_helpers_extract_fields() {
        let outcome = json_outcome(200, json!({"result": "ok", "count": 3}));
        assert_eq!(json_str(&outcome, "result").unwrap(), "ok");
        assert_eq!(json_u64(&outcome, "count").unwrap(), 3);
        assert!(json_present(&outcome, "result").is_ok());
    }

    #[test]
    fn json_helpers_report_missing_fields() {
        let outcome = json_outcome(200, json!({}));
        assert!(json_str(&outcome, "result").is_err());
        assert!(json_u64(&outcome, "count").is_err());
        assert!(json_present(&outcome, "processed_at").is_err());
    }

    #[tokio::test]
    async fn with_stopped_restarts_on_success() {
        let control = ScriptedControl::new();
        let value = with_stopped(&control, "compute", async { Ok::<_, ScenarioError>(7) })
            .await
            .unwrap();

        assert_eq!(value, 7);
        assert_eq!(control.calls(), vec!["stop compute", "start compute"]);
    }

    #[tokio::test]
    async fn with_stopped_restarts_on_assertion_failure() {
        let control = ScriptedControl::new();
        let err = with_stopped(&control, "compute", async {
            Err::<(), _>(ScenarioError::Assertion("expected 503".into()))
        })
        .await
        .unwrap_err();

        assert!(err.to_string().contains("expected 503"));
        assert_eq!(control.calls(), vec!["stop compute", "start compute"]);
    }

    #[tokio::test]
    async fn with_stopped_surfaces_failed_restart() {
        let control = ScriptedControl::new();
        control.fail_starts();

        let err = with_stopped(&control, "compute", async { Ok::<_, ScenarioError>(()) })
            .await
            .unwrap_err();

        assert!(err.to_string().contains("restart of compute"));
    }

    #[tokio::test]
    async fn with_stopped_still_tries_restart_after_failed_stop() {
        let control = ScriptedControl::new();
        control.fail_stops();

        let err = with_stopped(&control, "compute", async { Ok::<_, ScenarioError>(()) })
            .await
            .unwrap_err();

        assert!(err.to_string().contains("stop of compute"));
        // The body never ran, but a restart was still attempted.
        assert_eq!(control.calls(), vec!["stop compute", "start compute"]);
    }

    #[tokio::test]
    async fn with_stopped_combines_body_error_and_failed_restart() {
        let control = ScriptedControl::new();
        control.fail_starts();

        let err = with_stopped(&control, "compute", async {
            Err::<(), _>(ScenarioError::Assertion("DLQ did not grow".into()))
        })
        .await
        .unwrap_err();

        let message = err.to_string();
        assert!(message.contains("restart of compute"));
        assert!(message.contains("DLQ did not grow"));
    }
}
