//! Normal-operation scenario — deterministic transformation and validation.

use std::time::Duration;

use check_client::RequestSpec;

use super::{ensure, expect_status, json_present, json_str, ScenarioContext, ScenarioError};

const TEST_DATA: &str = "Hello, World!";

/// One well-formed request, then one deliberately invalid request.
pub async fn run(ctx: &ScenarioContext) -> Result<String, ScenarioError> {
    let timeout = Duration::from_secs(ctx.config.timings.request_timeout_secs);

    // The documented transformation contract: result is the input reversed.
    let spec = RequestSpec::process(TEST_DATA).with_timeout(timeout);
    let outcome = ctx.client.send(&spec).await;
    expect_status(&outcome, 200)?;
    let result = json_str(&outcome, "result")?;
    let expected: String = TEST_DATA.chars().rev().collect();
    ensure(
        result == expected,
        format!("expected result {expected:?}, got {result:?}"),
    )?;
    json_present(&outcome, "processed_at")?;

    // A payload with no data field must be rejected with a 400 and a reason.
    let outcome = ctx
        .client
        .send(&RequestSpec::empty().with_timeout(timeout))
        .await;
    expect_status(&outcome, 400)?;
    let error = json_str(&outcome, "error")?;
    ensure(!error.is_empty(), "validation error message is empty")?;

    Ok("transformation, timestamp, and validation rejection verified".into())
}
