//! # stackcheck-runner
//!
//! Scenario runner for the stackcheck verification harness.
//!
//! Sequences the discrete verification scenarios (health, normal
//! operation, idempotency, failure injection, concurrency) against a live
//! deployment, collects pass/fail per scenario, and renders a summary
//! suitable for automated pipelines (exit code 0 iff everything passed).
//!
//! Scenarios run strictly one at a time: the deployment itself is the one
//! shared mutable resource, and stopping a service is a scenario-level
//! critical section enforced by sequencing rather than locks.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod lifecycle;
pub mod report;
pub mod runner;
pub mod scenarios;

pub use config::HarnessConfig;
pub use lifecycle::{DeploymentControl, DockerControl, ScriptedControl};
pub use report::{RunSummary, ScenarioResult};
pub use runner::ScenarioRunner;
pub use scenarios::{ScenarioContext, ScenarioError};
