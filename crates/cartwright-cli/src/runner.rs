//! Scenario selection and suite execution

use crate::config::CliConfig;
use crate::error::{CliError, CliResult};
use crate::output::Reporter;
use cartwright::{Scenario, ScenarioRunner, SuiteConfig, SuiteReport};

/// Resolve scenario names or families, keeping first-mention order
///
/// No names selects the whole catalog.
pub fn select_scenarios(names: &[String]) -> CliResult<Vec<Scenario>> {
    if names.is_empty() {
        return Ok(Scenario::catalog());
    }
    let mut selected: Vec<Scenario> = Vec::new();
    for name in names {
        let matches = Scenario::matching(name);
        if matches.is_empty() {
            return Err(CliError::config(format!(
                "no scenario matches '{name}' (see `cartwright list`)"
            )));
        }
        for scenario in matches {
            if !selected.contains(&scenario) {
                selected.push(scenario);
            }
        }
    }
    Ok(selected)
}

/// Runs the selected scenarios in one browser session
#[derive(Debug)]
pub struct SuiteRunner {
    config: CliConfig,
    runner: ScenarioRunner,
    reporter: Reporter,
}

impl SuiteRunner {
    /// Create a runner that reports through `config`'s output settings
    #[must_use]
    pub fn new(config: CliConfig, runner: ScenarioRunner) -> Self {
        let quiet = config.verbosity.is_quiet() || config.json;
        let reporter = Reporter::new(config.color.should_color(), quiet);
        Self {
            config,
            runner,
            reporter,
        }
    }

    /// Launch the browser, run `scenarios`, close the browser, print results
    pub async fn run(&self, suite: &SuiteConfig, scenarios: &[Scenario]) -> CliResult<SuiteReport> {
        self.reporter.header("Running Scenarios");
        let report = execute(suite, &self.runner, scenarios).await?;

        for result in &report.results {
            self.reporter.scenario(result);
        }
        self.reporter.summary(&report);
        if self.config.json {
            println!("{}", report.to_json()?);
        }
        Ok(report)
    }
}

#[cfg(feature = "browser")]
async fn execute(
    suite: &SuiteConfig,
    runner: &ScenarioRunner,
    scenarios: &[Scenario],
) -> CliResult<SuiteReport> {
    let session = cartwright::Session::launch(suite).await?;
    let report = runner.run(&session, scenarios).await;
    if let Err(err) = session.close().await {
        tracing::warn!(error = %err, "browser did not close cleanly");
    }
    Ok(report)
}

#[cfg(not(feature = "browser"))]
#[allow(clippy::unused_async)]
async fn execute(
    _suite: &SuiteConfig,
    _runner: &ScenarioRunner,
    _scenarios: &[Scenario],
) -> CliResult<SuiteReport> {
    Err(CliError::BrowserUnavailable)
}

/// Turn a finished report into the process outcome
pub fn outcome(report: &SuiteReport) -> CliResult<()> {
    if report.all_passed() {
        Ok(())
    } else {
        Err(CliError::ScenariosFailed {
            failed: report.failed_count() + report.skipped.len(),
            total: report.total() + report.skipped.len(),
        })
    }
}
