//! Scenario runner and suite report.

use crate::result::SuiteResult;
use crate::scenarios::Scenario;
use crate::session::Session;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// Result of running a single scenario
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioResult {
    /// Scenario name
    pub name: String,
    /// Whether the scenario passed
    pub passed: bool,
    /// Error message if failed
    pub error: Option<String>,
    /// Browser URL when the scenario failed
    pub url: Option<String>,
    /// Screenshot captured on failure
    pub screenshot: Option<PathBuf>,
    /// Scenario duration
    pub duration: Duration,
}

impl ScenarioResult {
    /// Create a passing result
    #[must_use]
    pub fn pass(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            passed: true,
            error: None,
            url: None,
            screenshot: None,
            duration: Duration::ZERO,
        }
    }

    /// Create a failing result
    #[must_use]
    pub fn fail(name: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            passed: false,
            error: Some(error.into()),
            url: None,
            screenshot: None,
            duration: Duration::ZERO,
        }
    }

    /// Set duration
    #[must_use]
    pub const fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    #[must_use]
    fn with_failure_context(mut self, url: Option<String>, screenshot: Option<PathBuf>) -> Self {
        self.url = url;
        self.screenshot = screenshot;
        self
    }
}

/// Results from running a list of scenarios
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuiteReport {
    /// Seed the identities were generated from
    pub seed: u64,
    /// Individual results in run order
    pub results: Vec<ScenarioResult>,
    /// Scenarios skipped after a fail-fast stop
    pub skipped: Vec<String>,
    /// Total duration
    pub duration: Duration,
}

impl SuiteReport {
    /// Check if every scenario that ran passed and none was skipped
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.skipped.is_empty() && self.results.iter().all(|r| r.passed)
    }

    /// Count passed scenarios
    #[must_use]
    pub fn passed_count(&self) -> usize {
        self.results.iter().filter(|r| r.passed).count()
    }

    /// Count failed scenarios
    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.results.iter().filter(|r| !r.passed).count()
    }

    /// Number of scenarios that ran
    #[must_use]
    pub fn total(&self) -> usize {
        self.results.len()
    }

    /// Failed results
    #[must_use]
    pub fn failures(&self) -> Vec<&ScenarioResult> {
        self.results.iter().filter(|r| !r.passed).collect()
    }

    /// Render as pretty JSON
    pub fn to_json(&self) -> SuiteResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Runs scenarios one after another on a single session
#[derive(Debug, Clone, Default)]
pub struct ScenarioRunner {
    /// Whether to stop on first failure
    pub fail_fast: bool,
    /// Whether to capture a screenshot when a scenario fails
    pub screenshots: bool,
    /// Fixed seed; random when absent
    pub seed: Option<u64>,
}

impl ScenarioRunner {
    /// Runner with screenshots on failure
    #[must_use]
    pub const fn new() -> Self {
        Self {
            fail_fast: false,
            screenshots: true,
            seed: None,
        }
    }

    /// Enable fail-fast mode
    #[must_use]
    pub const fn with_fail_fast(mut self) -> Self {
        self.fail_fast = true;
        self
    }

    /// Toggle failure screenshots
    #[must_use]
    pub const fn with_screenshots(mut self, enabled: bool) -> Self {
        self.screenshots = enabled;
        self
    }

    /// Fix the identity seed
    #[must_use]
    pub const fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    /// Run `scenarios` in order on `session`
    pub async fn run(&self, session: &Session, scenarios: &[Scenario]) -> SuiteReport {
        let seed = self.seed.unwrap_or_else(rand::random);
        info!(seed, count = scenarios.len(), "running scenarios");
        let mut rng = StdRng::seed_from_u64(seed);
        let start = Instant::now();
        let mut results = Vec::with_capacity(scenarios.len());
        let mut skipped = Vec::new();

        for (position, scenario) in scenarios.iter().enumerate() {
            let result = self.run_one(session, scenario, &mut rng).await;
            let failed = !result.passed;
            results.push(result);
            if failed && self.fail_fast {
                skipped = scenarios[position + 1..].iter().map(Scenario::name).collect();
                break;
            }
        }

        SuiteReport {
            seed,
            results,
            skipped,
            duration: start.elapsed(),
        }
    }

    async fn run_one(
        &self,
        session: &Session,
        scenario: &Scenario,
        rng: &mut StdRng,
    ) -> ScenarioResult {
        let name = scenario.name();
        let start = Instant::now();
        match scenario.run(session, rng).await {
            Ok(()) => {
                info!(scenario = %name, elapsed = ?start.elapsed(), "scenario passed");
                ScenarioResult::pass(name).with_duration(start.elapsed())
            }
            Err(err) => {
                let url = session.current_url().await.ok();
                let screenshot = if self.screenshots {
                    match session.save_screenshot(&name).await {
                        Ok(path) => Some(path),
                        Err(shot_err) => {
                            warn!(scenario = %name, error = %shot_err, "screenshot failed");
                            None
                        }
                    }
                } else {
                    None
                };
                warn!(
                    scenario = %name,
                    error = %err,
                    url = url.as_deref().unwrap_or("<unknown>"),
                    screenshot = ?screenshot,
                    "scenario failed"
                );
                ScenarioResult::fail(name, err.to_string())
                    .with_failure_context(url, screenshot)
                    .with_duration(start.elapsed())
            }
        }
    }
}
