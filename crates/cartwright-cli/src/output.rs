//! Terminal output for scenario runs and listings

use cartwright::{LocatorRegistry, Scenario, ScenarioResult, SuiteReport};
use console::{style, Style, Term};
use serde::Serialize;

/// Scenario catalog entry as rendered by `list --json`
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioEntry {
    pub name: String,
    pub family: &'static str,
    pub description: &'static str,
}

impl From<&Scenario> for ScenarioEntry {
    fn from(scenario: &Scenario) -> Self {
        Self {
            name: scenario.name(),
            family: scenario.family(),
            description: scenario.description(),
        }
    }
}

/// Locator row as rendered by `locators --json`
#[derive(Debug, Clone, Serialize)]
pub struct LocatorEntry {
    pub page: &'static str,
    pub name: &'static str,
    pub strategy: &'static str,
    pub value: &'static str,
}

/// Flatten registries into rows
#[must_use]
pub fn locator_entries(registries: &[&'static LocatorRegistry]) -> Vec<LocatorEntry> {
    registries
        .iter()
        .flat_map(|registry| {
            registry.iter().map(move |(name, locator)| LocatorEntry {
                page: registry.page(),
                name,
                strategy: locator.strategy.as_str(),
                value: locator.value,
            })
        })
        .collect()
}

/// Writes human-readable progress to stderr and listings to stdout
#[derive(Debug)]
pub struct Reporter {
    err: Term,
    out: Term,
    /// Whether to use colors
    pub use_color: bool,
    /// Quiet mode
    pub quiet: bool,
}

impl Default for Reporter {
    fn default() -> Self {
        Self::new(true, false)
    }
}

impl Reporter {
    #[must_use]
    pub fn new(use_color: bool, quiet: bool) -> Self {
        Self {
            err: Term::stderr(),
            out: Term::stdout(),
            use_color,
            quiet,
        }
    }

    fn tag(&self, symbol: &str, plain: &str, paint: fn(&str) -> String) -> String {
        if self.use_color {
            paint(symbol)
        } else {
            plain.to_string()
        }
    }

    /// Print a section header
    pub fn header(&self, title: &str) {
        if self.quiet {
            return;
        }
        let styled = if self.use_color {
            style(title).bold().underlined().to_string()
        } else {
            format!("=== {title} ===")
        };
        let _ = self.err.write_line("");
        let _ = self.err.write_line(&styled);
    }

    /// Print one scenario outcome; failures print even when quiet
    pub fn scenario(&self, result: &ScenarioResult) {
        if result.passed {
            if self.quiet {
                return;
            }
            let prefix = self.tag("✓", "PASS", |s| style(s).green().bold().to_string());
            let _ = self.err.write_line(&format!(
                "{prefix} {} ({:.2}s)",
                result.name,
                result.duration.as_secs_f64()
            ));
            return;
        }

        let prefix = self.tag("✗", "FAIL", |s| style(s).red().bold().to_string());
        let _ = self.err.write_line(&format!(
            "{prefix} {}: {}",
            result.name,
            result.error.as_deref().unwrap_or("unknown error")
        ));
        if let Some(url) = &result.url {
            let _ = self.err.write_line(&format!("    at {url}"));
        }
        if let Some(path) = &result.screenshot {
            let _ = self.err.write_line(&format!("    screenshot {}", path.display()));
        }
    }

    /// Print a warning message
    pub fn warning(&self, message: &str) {
        if self.quiet {
            return;
        }
        let prefix = self.tag("⚠", "WARN", |s| style(s).yellow().bold().to_string());
        let _ = self.err.write_line(&format!("{prefix} {message}"));
    }

    /// Print the run summary
    pub fn summary(&self, report: &SuiteReport) {
        for name in &report.skipped {
            self.warning(&format!("skipped {name}"));
        }
        if self.quiet && report.all_passed() {
            return;
        }

        let passed = report.passed_count();
        let failed = report.failed_count();
        let skipped = report.skipped.len();
        let total = passed + failed + skipped;
        let secs = report.duration.as_secs_f64();
        let _ = self.err.write_line("");

        if self.use_color {
            let passed_style = Style::new().green().bold();
            let failed_style = Style::new().red().bold();
            let status = if report.all_passed() {
                passed_style.apply_to("PASSED")
            } else {
                failed_style.apply_to("FAILED")
            };
            let _ = self.err.write_line(&format!(
                "{status} {total} scenarios in {secs:.2}s ({} passed, {} failed, {} skipped, seed {})",
                passed_style.apply_to(passed),
                if failed > 0 {
                    failed_style.apply_to(failed).to_string()
                } else {
                    failed.to_string()
                },
                style(skipped).yellow(),
                report.seed
            ));
        } else {
            let status = if report.all_passed() { "PASSED" } else { "FAILED" };
            let _ = self.err.write_line(&format!(
                "{status} {total} scenarios in {secs:.2}s ({passed} passed, {failed} failed, {skipped} skipped, seed {})",
                report.seed
            ));
        }
    }

    /// Print the scenario catalog
    pub fn scenarios(&self, scenarios: &[Scenario]) {
        let width = scenarios
            .iter()
            .map(|s| s.name().len())
            .max()
            .unwrap_or_default();
        for scenario in scenarios {
            let name = format!("{:width$}", scenario.name());
            let name = if self.use_color {
                style(name).cyan().to_string()
            } else {
                name
            };
            let _ = self
                .out
                .write_line(&format!("{name}  {}", scenario.description()));
        }
    }

    /// Print locator registries grouped by page
    pub fn locators(&self, registries: &[&'static LocatorRegistry]) {
        for registry in registries {
            let page = if self.use_color {
                style(registry.page()).bold().to_string()
            } else {
                format!("[{}]", registry.page())
            };
            let _ = self.out.write_line(&page);
            for (name, locator) in registry.iter() {
                let _ = self.out.write_line(&format!("  {name:<24} {locator}"));
            }
        }
    }
}
