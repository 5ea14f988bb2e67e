//! Suite configuration
//!
//! Loaded from YAML, then overridden from the environment, then validated.
//! Every field has a default, so an empty document is a valid config.

use crate::result::{SuiteError, SuiteResult};
use crate::wait::WaitPolicy;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Storefront the suite targets unless configured otherwise
pub const DEFAULT_BASE_URL: &str = "https://demo.nopcommerce.com/";

/// Directory failure screenshots land in
pub const DEFAULT_SCREENSHOT_DIR: &str = "target/cartwright/screenshots";

/// Browser launch configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BrowserConfig {
    /// Run without a visible window
    pub headless: bool,
    /// Keep the Chromium sandbox enabled
    pub sandbox: bool,
    /// Explicit Chromium executable
    pub chromium_path: Option<PathBuf>,
    /// Viewport width
    pub viewport_width: u32,
    /// Viewport height
    pub viewport_height: u32,
    /// Extra command line switches
    pub args: Vec<String>,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: true,
            sandbox: false,
            chromium_path: None,
            viewport_width: 1920,
            viewport_height: 1080,
            args: Vec::new(),
        }
    }
}

/// Configuration for one suite run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SuiteConfig {
    /// Storefront root URL
    pub base_url: String,
    /// Default wait policy for every action
    pub wait: WaitPolicy,
    /// Browser launch options
    pub browser: BrowserConfig,
    /// Where failure screenshots are written
    pub screenshot_dir: PathBuf,
    /// Seed for generated identities; random when absent
    pub seed: Option<u64>,
}

impl Default for SuiteConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            wait: WaitPolicy::default(),
            browser: BrowserConfig::default(),
            screenshot_dir: PathBuf::from(DEFAULT_SCREENSHOT_DIR),
            seed: None,
        }
    }
}

impl SuiteConfig {
    /// Create default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a YAML document
    pub fn from_yaml_str(yaml: &str) -> SuiteResult<Self> {
        let config: Self = serde_yaml_ng::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> SuiteResult<Self> {
        let yaml = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&yaml)
    }

    /// Apply `CARTWRIGHT_*` and `CHROMIUM_PATH` environment overrides
    pub fn with_env_overrides(self) -> SuiteResult<Self> {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary variable lookup
    pub fn with_overrides_from(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> SuiteResult<Self> {
        if let Some(url) = lookup("CARTWRIGHT_BASE_URL") {
            self.base_url = url;
        }
        if let Some(headless) = lookup("CARTWRIGHT_HEADLESS") {
            self.browser.headless = parse_flag("CARTWRIGHT_HEADLESS", &headless)?;
        }
        let timeout = lookup("CARTWRIGHT_TIMEOUT_MS")
            .map(|v| parse_number("CARTWRIGHT_TIMEOUT_MS", &v))
            .transpose()?;
        let poll = lookup("CARTWRIGHT_POLL_MS")
            .map(|v| parse_number("CARTWRIGHT_POLL_MS", &v))
            .transpose()?;
        if timeout.is_some() || poll.is_some() {
            self.wait = WaitPolicy::new(
                timeout.unwrap_or(self.wait.timeout_ms()),
                poll.unwrap_or(self.wait.poll_interval_ms()),
            )?;
        }
        if let Some(seed) = lookup("CARTWRIGHT_SEED") {
            self.seed = Some(parse_number("CARTWRIGHT_SEED", &seed)?);
        }
        if let Some(dir) = lookup("CARTWRIGHT_SCREENSHOT_DIR") {
            self.screenshot_dir = PathBuf::from(dir);
        }
        if let Some(path) = lookup("CHROMIUM_PATH") {
            self.browser.chromium_path = Some(PathBuf::from(path));
        }
        self.validate()?;
        Ok(self)
    }

    /// Check cross-field constraints
    pub fn validate(&self) -> SuiteResult<()> {
        let url = self.base_url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(SuiteError::configuration(format!(
                "base_url must be an http(s) URL, got '{}'",
                self.base_url
            )));
        }
        if self.browser.viewport_width == 0 || self.browser.viewport_height == 0 {
            return Err(SuiteError::configuration("viewport must be non-empty"));
        }
        Ok(())
    }

    /// Set base URL
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set wait policy
    #[must_use]
    pub const fn with_wait(mut self, wait: WaitPolicy) -> Self {
        self.wait = wait;
        self
    }

    /// Set headless mode
    #[must_use]
    pub const fn with_headless(mut self, headless: bool) -> Self {
        self.browser.headless = headless;
        self
    }

    /// Set identity seed
    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set screenshot directory
    #[must_use]
    pub fn with_screenshot_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.screenshot_dir = dir.into();
        self
    }

    /// Set Chromium executable
    #[must_use]
    pub fn with_chromium_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.browser.chromium_path = Some(path.into());
        self
    }
}

fn parse_flag(key: &str, value: &str) -> SuiteResult<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(SuiteError::configuration(format!(
            "{key} must be a boolean, got '{other}'"
        ))),
    }
}

fn parse_number(key: &str, value: &str) -> SuiteResult<u64> {
    value
        .trim()
        .parse()
        .map_err(|_| SuiteError::configuration(format!("{key} must be a number, got '{value}'")))
}
