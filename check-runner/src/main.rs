//! # stackcheck
//!
//! End-to-end verification harness for the fault-tolerant
//! request-processing stack.
//!
//! ## Example
//!
//! ```bash
//! # Verify a local deployment
//! stackcheck
//!
//! # Verify a remote deployment under a different compose project
//! stackcheck --host stack.internal --project ci-stack
//!
//! # With a configuration file
//! stackcheck --config stackcheck.toml
//! ```
//!
//! Exits 0 when every scenario passed, 1 otherwise (including a failed
//! preflight readiness wait).

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use check_client::{EndpointRegistry, ReadinessProber, WorkloadClient};
use stackcheck_runner::lifecycle::DockerControl;
use stackcheck_runner::scenarios::ScenarioContext;
use stackcheck_runner::{HarnessConfig, ScenarioRunner};

/// End-to-end verification harness for the fault-tolerant stack.
#[derive(Parser, Debug)]
#[command(name = "stackcheck")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Base host of the deployed stack (overrides the config file)
    #[arg(long)]
    host: Option<String>,

    /// Docker Compose project name (overrides the config file)
    #[arg(long)]
    project: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => HarnessConfig::from_file(path)?,
        None => HarnessConfig::default(),
    };
    if let Some(host) = cli.host {
        config.stack.host = host;
    }
    if let Some(project) = cli.project {
        config.stack.compose_project = project;
    }

    let registry = Arc::new(EndpointRegistry::new(&config.stack.host));
    let client = WorkloadClient::new(&registry)?;
    let prober = ReadinessProber::new(Arc::clone(&registry)).with_timing(
        Duration::from_secs(config.timings.probe_interval_secs),
        Duration::from_secs(config.timings.probe_timeout_secs),
    );
    let control = Arc::new(DockerControl::connect(
        config.stack.compose_project.clone(),
        Duration::from_secs(config.timings.control_timeout_secs),
    )?);

    let runner = ScenarioRunner::new(ScenarioContext {
        config,
        registry,
        client,
        prober,
        control,
    });

    if !runner.preflight().await {
        eprintln!("services failed to become ready; is the stack deployment running?");
        std::process::exit(1);
    }

    let summary = runner.run_all().await;
    print!("{}", summary.render());
    std::process::exit(summary.exit_code());
}
