//! Health scenario — each endpoint's specific health contract.

use std::time::Duration;

use check_client::endpoints::service;

use super::{ensure, expect_status, json_present, json_str, ScenarioContext, ScenarioError};

/// Marker string the frontend page must contain.
const FRONTEND_MARKER: &str = "Fault-Tolerant";

/// Check the health contract of all three services.
pub async fn run(ctx: &ScenarioContext) -> Result<String, ScenarioError> {
    let timeout = Duration::from_secs(ctx.config.timings.health_timeout_secs);

    // Compute: 200 with {status: "ok", timestamp}
    let compute = ctx.registry.resolve(service::COMPUTE)?;
    let outcome = ctx.client.health(compute, timeout).await;
    expect_status(&outcome, 200)?;
    let status = json_str(&outcome, "status")?;
    ensure(
        status == "ok",
        format!("compute reported status {status:?}, expected \"ok\""),
    )?;
    json_present(&outcome, "timestamp")?;

    // Processor: 200 when fully healthy, 503 when degraded but alive;
    // either way the body must name its status and dependent services.
    let processor = ctx.registry.resolve(service::PROCESSOR)?;
    let outcome = ctx.client.health(processor, timeout).await;
    ensure(
        matches!(outcome.status(), Some(200) | Some(503)),
        format!(
            "processor health answered {}, expected 200 or 503",
            outcome
                .status()
                .map(|s| s.to_string())
                .unwrap_or_else(|| outcome.error().unwrap_or("no response").to_string())
        ),
    )?;
    json_present(&outcome, "status")?;
    json_present(&outcome, "services")?;

    // Frontend: 200 with the application page.
    let frontend = ctx.registry.resolve(service::FRONTEND)?;
    let outcome = ctx.client.health(frontend, timeout).await;
    expect_status(&outcome, 200)?;
    let page = outcome.text().ok_or_else(|| {
        ScenarioError::Assertion("frontend returned an empty or non-HTML body".into())
    })?;
    ensure(
        page.contains(FRONTEND_MARKER),
        format!("frontend page does not contain the {FRONTEND_MARKER:?} marker"),
    )?;

    Ok("all three services answered their health contracts".into())
}
