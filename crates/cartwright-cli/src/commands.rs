//! CLI command definitions using clap

use crate::config::{ColorChoice, SuiteOverrides};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Cartwright: end-to-end scenarios for the nopCommerce storefront
#[derive(Parser, Debug)]
#[command(name = "cartwright")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (failures only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Color output (auto, always, never)
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorArg,

    /// Emit JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run scenarios against the storefront
    Run(RunArgs),

    /// List the scenario catalog
    List(ListArgs),

    /// Show the locator registries
    Locators(LocatorsArgs),

    /// Show the effective suite configuration
    Config(SuiteArgs),
}

/// Options shared by commands that build a suite configuration
#[derive(Args, Debug, Clone, Default)]
pub struct SuiteArgs {
    /// YAML configuration file
    #[arg(long, env = "CARTWRIGHT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Storefront root URL
    #[arg(long)]
    pub base_url: Option<String>,

    /// Show the browser window
    #[arg(long)]
    pub headed: bool,

    /// Wait timeout for every action, in milliseconds
    #[arg(long)]
    pub timeout_ms: Option<u64>,

    /// Seed for generated identities
    #[arg(long)]
    pub seed: Option<u64>,

    /// Directory for failure screenshots
    #[arg(long)]
    pub screenshot_dir: Option<PathBuf>,
}

impl SuiteArgs {
    /// Flags as configuration overrides
    #[must_use]
    pub fn overrides(&self) -> SuiteOverrides {
        SuiteOverrides {
            config_file: self.config.clone(),
            base_url: self.base_url.clone(),
            headed: self.headed,
            timeout_ms: self.timeout_ms,
            seed: self.seed,
            screenshot_dir: self.screenshot_dir.clone(),
        }
    }
}

/// Arguments for the run command
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Scenario names or families to run (default: all)
    pub scenarios: Vec<String>,

    /// Stop at the first failing scenario
    #[arg(long)]
    pub fail_fast: bool,

    /// Do not capture screenshots on failure
    #[arg(long)]
    pub no_screenshots: bool,

    #[command(flatten)]
    pub suite: SuiteArgs,
}

/// Arguments for the list command
#[derive(Args, Debug)]
pub struct ListArgs {
    /// Only scenarios whose name or family matches
    pub filter: Option<String>,
}

/// Arguments for the locators command
#[derive(Args, Debug)]
pub struct LocatorsArgs {
    /// Only this page's registry
    #[arg(short, long)]
    pub page: Option<String>,
}

/// Color argument for CLI
#[derive(ValueEnum, Clone, Debug, Default)]
pub enum ColorArg {
    /// Automatic color detection
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

impl From<ColorArg> for ColorChoice {
    fn from(arg: ColorArg) -> Self {
        match arg {
            ColorArg::Auto => Self::Auto,
            ColorArg::Always => Self::Always,
            ColorArg::Never => Self::Never,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;

    mod cli_parsing_tests {
        use super::*;

        #[test]
        fn test_run_with_flags() {
            let cli = Cli::try_parse_from([
                "cartwright",
                "-vv",
                "run",
                "signup_and_login",
                "invalid_signup",
                "--fail-fast",
                "--seed",
                "7",
                "--timeout-ms",
                "5000",
                "--headed",
            ])
            .unwrap();
            assert_eq!(cli.verbose, 2);
            match cli.command {
                Commands::Run(args) => {
                    assert_eq!(args.scenarios, ["signup_and_login", "invalid_signup"]);
                    assert!(args.fail_fast);
                    assert!(!args.no_screenshots);
                    let overrides = args.suite.overrides();
                    assert_eq!(overrides.seed, Some(7));
                    assert_eq!(overrides.timeout_ms, Some(5000));
                    assert!(overrides.headed);
                }
                other => panic!("unexpected command {other:?}"),
            }
        }

        #[test]
        fn test_global_json_after_subcommand() {
            let cli = Cli::try_parse_from(["cartwright", "list", "--json"]).unwrap();
            assert!(cli.json);
            assert!(matches!(cli.command, Commands::List(ListArgs { filter: None })));
        }

        #[test]
        fn test_locators_page() {
            let cli = Cli::try_parse_from(["cartwright", "locators", "-p", "login"]).unwrap();
            match cli.command {
                Commands::Locators(args) => assert_eq!(args.page.as_deref(), Some("login")),
                other => panic!("unexpected command {other:?}"),
            }
        }

        #[test]
        fn test_subcommand_required() {
            assert!(Cli::try_parse_from(["cartwright"]).is_err());
        }

        #[test]
        fn test_color_arg() {
            let cli = Cli::try_parse_from(["cartwright", "--color", "never", "list"]).unwrap();
            assert_eq!(ColorChoice::from(cli.color), ColorChoice::Never);
        }
    }
}
