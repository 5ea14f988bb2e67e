//! CLI configuration

use crate::error::CliResult;
use cartwright::SuiteConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// CLI verbosity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Verbosity {
    /// Quiet - failures only
    Quiet,
    /// Normal - default output
    #[default]
    Normal,
    /// Verbose - workflow step logs
    Verbose,
    /// Debug - action layer polling
    Debug,
}

impl Verbosity {
    /// From the `-v` count and `--quiet`
    #[must_use]
    pub const fn from_flags(verbose: u8, quiet: bool) -> Self {
        if quiet {
            return Self::Quiet;
        }
        match verbose {
            0 => Self::Normal,
            1 => Self::Verbose,
            _ => Self::Debug,
        }
    }

    /// Check if quiet mode
    #[must_use]
    pub const fn is_quiet(self) -> bool {
        matches!(self, Self::Quiet)
    }

    /// Check if verbose or higher
    #[must_use]
    pub const fn is_verbose(self) -> bool {
        matches!(self, Self::Verbose | Self::Debug)
    }

    /// Level handed to `cartwright::logging::init`
    #[must_use]
    pub const fn log_level(self) -> u8 {
        match self {
            Self::Quiet | Self::Normal => 0,
            Self::Verbose => 1,
            Self::Debug => 2,
        }
    }
}

/// Color output choice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ColorChoice {
    /// Always use colors
    Always,
    /// Use colors when output is a terminal
    #[default]
    Auto,
    /// Never use colors
    Never,
}

impl ColorChoice {
    /// Should use colors based on output detection
    #[must_use]
    pub fn should_color(self) -> bool {
        match self {
            Self::Always => true,
            Self::Never => false,
            Self::Auto => std::io::IsTerminal::is_terminal(&std::io::stdout()),
        }
    }
}

/// Flags that override the suite configuration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SuiteOverrides {
    /// YAML configuration file
    pub config_file: Option<PathBuf>,
    /// Storefront root URL
    pub base_url: Option<String>,
    /// Show the browser window
    pub headed: bool,
    /// Wait timeout; the poll interval is kept
    pub timeout_ms: Option<u64>,
    /// Identity seed
    pub seed: Option<u64>,
    /// Failure screenshot directory
    pub screenshot_dir: Option<PathBuf>,
}

impl SuiteOverrides {
    /// Build the suite configuration: file (or defaults), then environment,
    /// then flags
    pub fn resolve(&self) -> CliResult<SuiteConfig> {
        let base = match &self.config_file {
            Some(path) => load_file(path)?,
            None => SuiteConfig::default(),
        };
        self.apply(base.with_env_overrides()?)
    }

    /// Apply only the flags to `config`
    pub fn apply(&self, mut config: SuiteConfig) -> CliResult<SuiteConfig> {
        if let Some(url) = &self.base_url {
            config = config.with_base_url(url.clone());
        }
        if self.headed {
            config = config.with_headless(false);
        }
        if let Some(timeout_ms) = self.timeout_ms {
            let wait = config.wait.with_timeout(timeout_ms)?;
            config = config.with_wait(wait);
        }
        if let Some(seed) = self.seed {
            config = config.with_seed(seed);
        }
        if let Some(dir) = &self.screenshot_dir {
            config = config.with_screenshot_dir(dir.clone());
        }
        config.validate()?;
        Ok(config)
    }
}

fn load_file(path: &Path) -> CliResult<SuiteConfig> {
    Ok(SuiteConfig::from_file(path)?)
}

/// CLI configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CliConfig {
    /// Verbosity level
    pub verbosity: Verbosity,
    /// Color output choice
    pub color: ColorChoice,
    /// Emit JSON instead of text
    pub json: bool,
}

impl CliConfig {
    /// Create new default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set verbosity
    #[must_use]
    pub const fn with_verbosity(mut self, verbosity: Verbosity) -> Self {
        self.verbosity = verbosity;
        self
    }

    /// Set color choice
    #[must_use]
    pub const fn with_color(mut self, color: ColorChoice) -> Self {
        self.color = color;
        self
    }

    /// Set JSON output
    #[must_use]
    pub const fn with_json(mut self, json: bool) -> Self {
        self.json = json;
        self
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    mod verbosity_tests {
        use super::*;

        #[test]
        fn test_from_flags() {
            assert_eq!(Verbosity::from_flags(0, false), Verbosity::Normal);
            assert_eq!(Verbosity::from_flags(1, false), Verbosity::Verbose);
            assert_eq!(Verbosity::from_flags(5, false), Verbosity::Debug);
            assert_eq!(Verbosity::from_flags(3, true), Verbosity::Quiet);
        }

        #[test]
        fn test_log_level() {
            assert_eq!(Verbosity::Quiet.log_level(), 0);
            assert_eq!(Verbosity::Normal.log_level(), 0);
            assert_eq!(Verbosity::Verbose.log_level(), 1);
            assert_eq!(Verbosity::Debug.log_level(), 2);
        }

        #[test]
        fn test_predicates() {
            assert!(Verbosity::Quiet.is_quiet());
            assert!(!Verbosity::Normal.is_verbose());
            assert!(Verbosity::Debug.is_verbose());
        }
    }

    mod color_tests {
        use super::*;

        #[test]
        fn test_fixed_choices() {
            assert!(ColorChoice::Always.should_color());
            assert!(!ColorChoice::Never.should_color());
        }
    }

    mod overrides_tests {
        use super::*;
        use std::io::Write;

        #[test]
        fn test_flags_win() {
            let overrides = SuiteOverrides {
                base_url: Some("https://staging.shop.test/".to_string()),
                headed: true,
                timeout_ms: Some(5000),
                seed: Some(12),
                ..SuiteOverrides::default()
            };
            let config = overrides.apply(SuiteConfig::default()).unwrap();
            assert_eq!(config.base_url, "https://staging.shop.test/");
            assert!(!config.browser.headless);
            assert_eq!(config.wait.timeout_ms(), 5000);
            assert_eq!(config.seed, Some(12));
        }

        #[test]
        fn test_timeout_below_poll_is_rejected() {
            let overrides = SuiteOverrides {
                timeout_ms: Some(1),
                ..SuiteOverrides::default()
            };
            assert!(overrides.apply(SuiteConfig::default()).is_err());
        }

        #[test]
        fn test_bad_base_url_is_rejected() {
            let overrides = SuiteOverrides {
                base_url: Some("ftp://shop".to_string()),
                ..SuiteOverrides::default()
            };
            assert!(overrides.apply(SuiteConfig::default()).is_err());
        }

        #[test]
        fn test_config_file_is_loaded() {
            let mut file = tempfile::NamedTempFile::new().unwrap();
            writeln!(file, "base_url: https://file.shop.test/\nseed: 4").unwrap();
            let overrides = SuiteOverrides {
                config_file: Some(file.path().to_path_buf()),
                seed: Some(9),
                ..SuiteOverrides::default()
            };
            let config = overrides.apply(load_file(file.path()).unwrap()).unwrap();
            assert_eq!(config.base_url, "https://file.shop.test/");
            assert_eq!(config.seed, Some(9));
        }
    }
}
