//! # stackcheck-client
//!
//! HTTP access layer for the stackcheck verification harness.
//!
//! The stack under test is a black box reached over HTTP: an edge compute
//! service, a function-style processor in front of it, and a browser
//! frontend. This crate provides everything the harness needs to talk to
//! it from outside:
//! - A registry of the named service endpoints
//! - Readiness probing with a bounded wait
//! - Workload generation (single, validation, and concurrent requests)
//!   with per-request outcome capture
//!
//! No call in this crate retries anything. The retry behavior lives in the
//! stack under test; the harness observes it.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod endpoints;
pub mod outcome;
pub mod probe;
pub mod workload;

pub use endpoints::{EndpointRegistry, ServiceEndpoint, UnknownServiceError};
pub use outcome::{ProcessPayload, RequestOutcome, RequestSpec, ResponseBody};
pub use probe::ReadinessProber;
pub use workload::WorkloadClient;
