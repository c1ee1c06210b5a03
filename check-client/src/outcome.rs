//! Request and outcome types for workload generation.
//!
//! A [`RequestSpec`] describes one call to the processor; a
//! [`RequestOutcome`] records what came back. Outcomes are plain data:
//! network failures are captured in the outcome rather than raised, so
//! scenarios can assert on the failure path as easily as on the success
//! path.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

/// Default timeout for a single processing request.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// JSON body of a processing request.
///
/// Both fields are optional so a spec can deliberately omit them; an empty
/// payload (`{}`) exercises the server's validation path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessPayload {
    /// Data to process.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
    /// Client-supplied token identifying the logical request.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub idempotency_key: Option<String>,
}

/// One call against the processing endpoint.
#[derive(Debug, Clone)]
pub struct RequestSpec {
    /// JSON payload to post.
    pub payload: ProcessPayload,
    /// Timeout for this request.
    pub timeout: Duration,
}

impl RequestSpec {
    /// A processing request with a freshly generated idempotency key.
    pub fn process(data: impl Into<String>) -> Self {
        Self::process_with_key(data, uuid::Uuid::new_v4().to_string())
    }

    /// A processing request reusing a specific idempotency key.
    pub fn process_with_key(data: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            payload: ProcessPayload {
                data: Some(data.into()),
                idempotency_key: Some(key.into()),
            },
            timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    /// An intentionally empty payload, for probing server-side validation.
    pub fn empty() -> Self {
        Self {
            payload: ProcessPayload {
                data: None,
                idempotency_key: None,
            },
            timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    /// Override the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// The idempotency key carried by this spec, if any.
    pub fn idempotency_key(&self) -> Option<&str> {
        self.payload.idempotency_key.as_deref()
    }
}

/// Body of a completed response.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    /// Body parsed as JSON.
    Json(Value),
    /// Body kept as raw text (HTML, plain text, unparseable JSON).
    Text(String),
}

/// What one request produced.
///
/// Invariant: exactly one of body and error is set. A completed HTTP
/// exchange carries a status and a body; a network-level failure carries an
/// error and no status. The two constructors are the only way to build one.
#[derive(Debug, Clone)]
pub struct RequestOutcome {
    status_code: Option<u16>,
    body: Option<ResponseBody>,
    elapsed: Duration,
    error: Option<String>,
}

impl RequestOutcome {
    /// An outcome for a completed HTTP exchange.
    pub fn completed(status_code: u16, body: ResponseBody, elapsed: Duration) -> Self {
        Self {
            status_code: Some(status_code),
            body: Some(body),
            elapsed,
            error: None,
        }
    }

    /// An outcome for a request that never produced a response.
    pub fn failed(error: impl Into<String>, elapsed: Duration) -> Self {
        Self {
            status_code: None,
            body: None,
            elapsed,
            error: Some(error.into()),
        }
    }

    /// HTTP status code, if the exchange completed.
    pub fn status(&self) -> Option<u16> {
        self.status_code
    }

    /// Whether the exchange completed with a 2xx status.
    pub fn is_success(&self) -> bool {
        matches!(self.status_code, Some(code) if (200..300).contains(&code))
    }

    /// How long the request took, including failures.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// The network-level error, if the request never completed.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// The response body, if the exchange completed.
    pub fn body(&self) -> Option<&ResponseBody> {
        self.body.as_ref()
    }

    /// The response body as JSON, if it parsed as such.
    pub fn json(&self) -> Option<&Value> {
        match &self.body {
            Some(ResponseBody::Json(value)) => Some(value),
            _ => None,
        }
    }

    /// A top-level field of the JSON response body.
    pub fn json_field(&self, name: &str) -> Option<&Value> {
        self.json().and_then(|value| value.get(name))
    }

    /// The response body as raw text, if it did not parse as JSON.
    pub fn text(&self) -> Option<&str> {
        match &self.body {
            Some(ResponseBody::Text(text)) => Some(text),
            _ => None,
        }
    }
}
