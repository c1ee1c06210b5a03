//! Run results and the human-readable summary report.

use std::time::Duration;

/// Outcome of one scenario.
#[derive(Debug, Clone)]
pub struct ScenarioResult {
    /// Scenario name as shown in the report.
    pub name: String,
    /// Whether every assertion held.
    pub passed: bool,
    /// What passed, or what failed and why.
    pub message: String,
    /// Wall-clock duration of the scenario.
    pub duration: Duration,
}

impl ScenarioResult {
    /// Create a passing result.
    pub fn pass(name: &str, message: impl Into<String>, duration: Duration) -> Self {
        Self {
            name: name.to_string(),
            passed: true,
            message: message.into(),
            duration,
        }
    }

    /// Create a failing result.
    pub fn fail(name: &str, message: impl Into<String>, duration: Duration) -> Self {
        Self {
            name: name.to_string(),
            passed: false,
            message: message.into(),
            duration,
        }
    }
}

/// Ordered results of one verification run.
///
/// Every executed scenario is recorded here, pass or fail; a scenario that
/// errors out is recorded as failed, never dropped.
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    results: Vec<ScenarioResult>,
}

impl RunSummary {
    /// An empty summary.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one scenario result.
    pub fn record(&mut self, result: ScenarioResult) {
        self.results.push(result);
    }

    /// Number of scenarios executed.
    pub fn total(&self) -> usize {
        self.results.len()
    }

    /// Number of scenarios that passed.
    pub fn passed(&self) -> usize {
        self.results.iter().filter(|r| r.passed).count()
    }

    /// Number of scenarios that failed.
    pub fn failed(&self) -> usize {
        self.total() - self.passed()
    }

    /// Whether every recorded scenario passed.
    pub fn all_passed(&self) -> bool {
        self.results.iter().all(|r| r.passed)
    }

    /// Process exit code for this run: 0 iff every scenario passed.
    pub fn exit_code(&self) -> i32 {
        if self.all_passed() {
            0
        } else {
            1
        }
    }

    /// The recorded results, in execution order.
    pub fn results(&self) -> &[ScenarioResult] {
        &self.results
    }

    /// Render the summary block printed at the end of a run.
    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str(&"=".repeat(60));
        out.push('\n');
        out.push_str(&format!(
            "summary: {}/{} scenarios passed\n",
            self.passed(),
            self.total()
        ));
        for result in &self.results {
            let status = if result.passed { "PASS" } else { "FAIL" };
            out.push_str(&format!(
                "  {status}  {} ({:.1}s): {}\n",
                result.name,
                result.duration.as_secs_f64(),
                result.message
            ));
        }
        out
    }
}
