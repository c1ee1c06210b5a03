//! Idempotency scenario — a repeated key returns the memoized result.

use std::time::Duration;

use check_client::RequestSpec;

use super::{ensure, expect_status, json_str, ScenarioContext, ScenarioError};

/// Send the same request twice and require byte-identical answers.
pub async fn run(ctx: &ScenarioContext) -> Result<String, ScenarioError> {
    let timeout = Duration::from_secs(ctx.config.timings.request_timeout_secs);
    let spec = RequestSpec::process("Idempotency Test").with_timeout(timeout);

    let first = ctx.client.send(&spec).await;
    expect_status(&first, 200)?;

    // Same spec, same idempotency key.
    let second = ctx.client.send(&spec).await;
    expect_status(&second, 200)?;

    ensure(
        json_str(&first, "result")? == json_str(&second, "result")?,
        "results differ across a repeated idempotency key",
    )?;
    ensure(
        json_str(&first, "processed_at")? == json_str(&second, "processed_at")?,
        "timestamps differ across a repeated idempotency key: the request was recomputed, not memoized",
    )?;

    Ok("repeated key returned an identical result and timestamp".into())
}
