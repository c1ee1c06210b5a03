//! Scenario sequencing and pass/fail accounting.

use std::future::Future;
use std::time::{Duration, Instant};

use crate::report::{RunSummary, ScenarioResult};
use crate::scenarios::{self, ScenarioContext, ScenarioError};

/// Runs the verification scenarios in their fixed order.
pub struct ScenarioRunner {
    ctx: ScenarioContext,
}

impl ScenarioRunner {
    /// Create a runner over a prepared context.
    pub fn new(ctx: ScenarioContext) -> Self {
        Self { ctx }
    }

    /// Preflight readiness wait.
    ///
    /// Returns `false` when the deployment never became ready; no scenario
    /// should run in that case.
    pub async fn preflight(&self) -> bool {
        println!("waiting for services to become ready...");
        let deadline = Duration::from_secs(self.ctx.config.timings.readiness_deadline_secs);
        let ready = self.ctx.prober.wait_until_ready(deadline).await;
        if ready {
            println!("all services are ready");
        }
        ready
    }

    /// Execute every scenario and collect the summary.
    ///
    /// Scenarios run strictly sequentially; a failure is recorded and the
    /// run moves on to the next scenario.
    pub async fn run_all(&self) -> RunSummary {
        let mut summary = RunSummary::new();
        summary.record(observe("health checks", scenarios::health::run(&self.ctx)).await);
        summary.record(observe("normal operation", scenarios::normal::run(&self.ctx)).await);
        summary.record(observe("idempotency", scenarios::idempotency::run(&self.ctx)).await);
        summary.record(observe("failure injection", scenarios::failure::run(&self.ctx)).await);
        summary.record(observe("concurrency", scenarios::concurrency::run(&self.ctx)).await);
        summary
    }
}

/// Run one scenario body, timing it and converting any error into a failed
/// result. This is the boundary that keeps one scenario's failure from
/// touching the rest of the run.
pub async fn observe<Fut>(name: &str, body: Fut) -> ScenarioResult
where
    Fut: Future<Output = Result<String, ScenarioError>>,
{
    println!("RUN   {name}");
    let started = Instant::now();
    let result = match body.await {
        Ok(message) => ScenarioResult::pass(name, message, started.elapsed()),
        Err(err) => ScenarioResult::fail(name, err.to_string(), started.elapsed()),
    };

    let status = if result.passed { "PASS" } else { "FAIL" };
    println!(
        "{status}  {name} ({:.1}s): {}",
        result.duration.as_secs_f64(),
        result.message
    );
    result
}
