//! Failure-injection scenario — dependency outage, retry exhaustion, DLQ,
//! recovery, and replay.
//!
//! The compute dependency is stopped inside [`with_stopped`], which
//! guarantees the restart on every exit path. While it is down, a request
//! must exhaust the processor's retries and land in the dead-letter queue;
//! once it is back and the stack has recovered, replaying the dead-lettered
//! message must succeed and shrink the queue again.

use std::time::Duration;

use check_client::{RequestOutcome, RequestSpec};

use super::{
    ensure, expect_status, json_present, json_u64, with_stopped, ScenarioContext, ScenarioError,
};

/// Drive the stack through an outage of its compute dependency.
pub async fn run(ctx: &ScenarioContext) -> Result<String, ScenarioError> {
    let timings = &ctx.config.timings;
    let service = ctx.config.stack.compute_service.clone();

    let before = dlq_count(ctx).await?;

    let (replay_id, during) = with_stopped(ctx.control.as_ref(), &service, async {
        // Let the stop take effect before issuing the doomed request.
        tokio::time::sleep(Duration::from_secs(timings.settle_secs)).await;

        // The long timeout gives server-side retry exhaustion room to
        // finish; the harness itself never retries.
        let spec = RequestSpec::process("Failure Test")
            .with_timeout(Duration::from_secs(timings.degraded_timeout_secs));
        let outcome = ctx.client.send(&spec).await;
        expect_status(&outcome, 503)?;
        json_present(&outcome, "error")?;
        json_present(&outcome, "retry_after")?;

        let dlq = ctx.client.dlq().await;
        expect_status(&dlq, 200)?;
        let during = json_u64(&dlq, "count")?;
        ensure(
            during > before,
            format!("DLQ count did not grow while the dependency was down ({before} -> {during})"),
        )?;

        Ok((newest_dlq_id(&dlq)?, during))
    })
    .await?;

    // The guard restarted the dependency; the whole stack must recover.
    let recovered = ctx
        .prober
        .wait_until_ready(Duration::from_secs(timings.recovery_deadline_secs))
        .await;
    ensure(
        recovered,
        "stack did not become ready again after the dependency restart",
    )?;

    // The dead-lettered request should now replay cleanly and leave the
    // queue.
    let outcome = ctx.client.replay_dlq(&replay_id).await;
    expect_status(&outcome, 200)?;
    ensure(
        outcome.json_field("success").and_then(|v| v.as_bool()) == Some(true),
        "DLQ replay did not report success",
    )?;

    let dlq = ctx.client.dlq().await;
    expect_status(&dlq, 200)?;
    let after = json_u64(&dlq, "count")?;
    ensure(
        after < during,
        format!("DLQ count did not shrink after replay ({during} -> {after})"),
    )?;
    ensure(
        !dlq_contains(&dlq, &replay_id),
        format!("replayed message {replay_id} is still in the DLQ"),
    )?;

    Ok(format!(
        "retry exhaustion surfaced as 503, message {replay_id} dead-lettered and replayed"
    ))
}

async fn dlq_count(ctx: &ScenarioContext) -> Result<u64, ScenarioError> {
    let outcome = ctx.client.dlq().await;
    expect_status(&outcome, 200)?;
    json_u64(&outcome, "count")
}

/// Id of the most recently dead-lettered message.
///
/// The processor pushes onto the head of the queue, so the newest entry is
/// first.
fn newest_dlq_id(outcome: &RequestOutcome) -> Result<String, ScenarioError> {
    outcome
        .json_field("dlq_messages")
        .and_then(|value| value.as_array())
        .and_then(|messages| messages.first())
        .and_then(|message| message.get("id"))
        .and_then(|id| id.as_str())
        .map(str::to_owned)
        .ok_or_else(|| {
            ScenarioError::Assertion("DLQ response carried no readable message id".into())
        })
}

fn dlq_contains(outcome: &RequestOutcome, id: &str) -> bool {
    outcome
        .json_field("dlq_messages")
        .and_then(|value| value.as_array())
        .map(|messages| {
            messages
                .iter()
                .any(|message| message.get("id").and_then(|v| v.as_str()) == Some(id))
        })
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use check_client::ResponseBody;
    use serde_json::json;

    fn dlq_outcome(messages: serde_json::Value) -> RequestOutcome {
        let count = messages.as_array().map(|m| m.len()).unwrap_or(0);
        RequestOutcome::completed(
            200,
            ResponseBody::Json(json!({"dlq_messages": messages, "count": count})),
            Duration::from_millis(8),
        )
    }

    #[test]
    fn newest_dlq_id_takes_queue_head() {
        let outcome = dlq_outcome(json!([
            {"id": "msg-newest", "attempts": 4},
            {"id": "msg-older", "attempts": 4},
        ]));

        assert_eq!(newest_dlq_id(&outcome).unwrap(), "msg-newest");
    }

    #[test]
    fn newest_dlq_id_fails_on_empty_queue() {
        let outcome = dlq_outcome(json!([]));
        assert!(newest_dlq_id(&outcome).is_err());
    }

    #[test]
    fn dlq_contains_finds_message() {
        let outcome = dlq_outcome(json!([{"id": "msg-1"}, {"id": "msg-2"}]));
        assert!(dlq_contains(&outcome, "msg-2"));
        assert!(!dlq_contains(&outcome, "msg-3"));
    }
}
