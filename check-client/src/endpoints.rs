//! Named service endpoints of the stack under test.
//!
//! The deployment exposes three services on fixed ports; only the base host
//! varies between environments. The registry is built once at startup and
//! never mutated; the prober and the workload client share it read-only.

use thiserror::Error;

/// Logical service names used throughout the harness.
pub mod service {
    /// The edge compute service (the processor's dependency).
    pub const COMPUTE: &str = "compute";
    /// The function-style processor that fronts the compute service.
    pub const PROCESSOR: &str = "processor";
    /// The browser frontend.
    pub const FRONTEND: &str = "frontend";
}

const COMPUTE_PORT: u16 = 8080;
const PROCESSOR_PORT: u16 = 7071;
const FRONTEND_PORT: u16 = 3000;

/// Raised when a service name is not in the registry.
#[derive(Debug, Error)]
#[error("unknown service: {0}")]
pub struct UnknownServiceError(pub String);

/// One named service endpoint: where it lives and how to ask if it is alive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceEndpoint {
    /// Logical service name (see [`service`]).
    pub name: String,
    /// Base URL including scheme, host, and port.
    pub base_url: String,
    /// Path of the health endpoint, relative to `base_url`.
    pub health_path: String,
}

impl ServiceEndpoint {
    /// Create an endpoint description.
    pub fn new(
        name: impl Into<String>,
        base_url: impl Into<String>,
        health_path: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            base_url: base_url.into(),
            health_path: health_path.into(),
        }
    }

    /// Full URL of the health endpoint.
    pub fn health_url(&self) -> String {
        self.url(&self.health_path)
    }

    /// Full URL for a path on this service.
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// The fixed set of service endpoints for one deployment.
#[derive(Debug, Clone)]
pub struct EndpointRegistry {
    endpoints: Vec<ServiceEndpoint>,
}

impl EndpointRegistry {
    /// Build the registry for a deployment reachable at `host`.
    ///
    /// Ports are fixed per service role; only the host varies.
    pub fn new(host: &str) -> Self {
        Self {
            endpoints: vec![
                ServiceEndpoint::new(
                    service::COMPUTE,
                    format!("http://{host}:{COMPUTE_PORT}"),
                    "/healthz",
                ),
                ServiceEndpoint::new(
                    service::PROCESSOR,
                    format!("http://{host}:{PROCESSOR_PORT}"),
                    "/function/health",
                ),
                ServiceEndpoint::new(
                    service::FRONTEND,
                    format!("http://{host}:{FRONTEND_PORT}"),
                    "/",
                ),
            ],
        }
    }

    /// Look up an endpoint by its logical name.
    pub fn resolve(&self, name: &str) -> Result<&ServiceEndpoint, UnknownServiceError> {
        self.endpoints
            .iter()
            .find(|ep| ep.name == name)
            .ok_or_else(|| UnknownServiceError(name.to_string()))
    }

    /// All registered endpoints, in registration order.
    pub fn all(&self) -> &[ServiceEndpoint] {
        &self.endpoints
    }
}

impl Default for EndpointRegistry {
    fn default() -> Self {
        Self::new("localhost")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_resolves_all_three_services() {
        let registry = EndpointRegistry::default();

        let compute = registry.resolve(service::COMPUTE).unwrap();
        assert_eq!(compute.base_url, "http://localhost:8080");
        assert_eq!(compute.health_url(), "http://localhost:8080/healthz");

        let processor = registry.resolve(service::PROCESSOR).unwrap();
        assert_eq!(
            processor.health_url(),
            "http://localhost:7071/function/health"
        );

        let frontend = registry.resolve(service::FRONTEND).unwrap();
        assert_eq!(frontend.health_url(), "http://localhost:3000/");
    }

    #[test]
    fn registry_rejects_unknown_service() {
        let registry = EndpointRegistry::default();
        let err = registry.resolve("database").unwrap_err();
        assert_eq!(err.to_string(), "unknown service: database");
    }

    #[test]
    fn registry_uses_configured_host() {
        let registry = EndpointRegistry::new("stack.internal");
        let processor = registry.resolve(service::PROCESSOR).unwrap();
        assert_eq!(processor.base_url, "http://stack.internal:7071");
    }

    #[test]
    fn endpoint_url_joins_path() {
        let ep = ServiceEndpoint::new("processor", "http://localhost:7071", "/function/health");
        assert_eq!(
            ep.url("/function/process"),
            "http://localhost:7071/function/process"
        );
    }

    #[test]
    fn registry_lists_endpoints_in_order() {
        let registry = EndpointRegistry::default();
        let names: Vec<&str> = registry.all().iter().map(|ep| ep.name.as_str()).collect();
        assert_eq!(
            names,
            vec![service::COMPUTE, service::PROCESSOR, service::FRONTEND]
        );
    }
}
