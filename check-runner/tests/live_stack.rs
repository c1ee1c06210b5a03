//! End-to-end runs against a live deployment.
//!
//! These need the stack's Docker Compose project up and the Docker daemon
//! reachable, so they are ignored by default:
//!
//! ```bash
//! cargo test -p stackcheck-runner -- --ignored
//! ```

use std::sync::Arc;
use std::time::Duration;

use check_client::{EndpointRegistry, ReadinessProber, WorkloadClient};
use serial_test::serial;
use stackcheck_runner::lifecycle::DockerControl;
use stackcheck_runner::scenarios::ScenarioContext;
use stackcheck_runner::{HarnessConfig, ScenarioRunner};

fn runner() -> ScenarioRunner {
    let config = HarnessConfig::default();
    let registry = Arc::new(EndpointRegistry::new(&config.stack.host));
    let client = WorkloadClient::new(&registry).expect("processor endpoint registered");
    let prober = ReadinessProber::new(Arc::clone(&registry)).with_timing(
        Duration::from_secs(config.timings.probe_interval_secs),
        Duration::from_secs(config.timings.probe_timeout_secs),
    );
    let control = Arc::new(
        DockerControl::connect(
            config.stack.compose_project.clone(),
            Duration::from_secs(config.timings.control_timeout_secs),
        )
        .expect("docker daemon reachable"),
    );

    ScenarioRunner::new(ScenarioContext {
        config,
        registry,
        client,
        prober,
        control,
    })
}

#[tokio::test]
#[serial]
#[ignore = "requires a running stack deployment"]
async fn preflight_sees_running_stack() {
    assert!(runner().preflight().await, "stack never became ready");
}

#[tokio::test]
#[serial]
#[ignore = "requires a running stack deployment"]
async fn full_run_passes_every_scenario() {
    let runner = runner();
    assert!(runner.preflight().await, "stack never became ready");

    let summary = runner.run_all().await;
    assert_eq!(summary.total(), 5);
    assert!(
        summary.all_passed(),
        "failed scenarios:\n{}",
        summary.render()
    );
}
