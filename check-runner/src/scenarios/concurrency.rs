//! Concurrency scenario — fan-out under a bounded worker pool.
//!
//! Partial degradation is tolerated: the scenario passes when at least the
//! configured floor of requests succeed, not only on a perfect score.
//! Completion order is meaningless and never asserted on.

use std::time::Duration;

use check_client::RequestSpec;

use super::{ensure, ScenarioContext, ScenarioError};

/// Fan out distinct-keyed requests and count the successes.
pub async fn run(ctx: &ScenarioContext) -> Result<String, ScenarioError> {
    let workload = &ctx.config.workload;
    let timeout = Duration::from_secs(ctx.config.timings.concurrent_timeout_secs);

    let specs: Vec<RequestSpec> = (0..workload.fan_out)
        .map(|i| RequestSpec::process(format!("Concurrent test {i}")).with_timeout(timeout))
        .collect();

    let outcomes = ctx
        .client
        .send_concurrent(&specs, workload.pool_width)
        .await;
    let succeeded = outcomes.iter().filter(|o| o.status() == Some(200)).count();

    ensure(
        succeeded >= workload.min_success,
        format!(
            "only {succeeded}/{} concurrent requests succeeded (floor is {})",
            workload.fan_out, workload.min_success
        ),
    )?;

    Ok(format!(
        "{succeeded}/{} concurrent requests succeeded",
        workload.fan_out
    ))
}
