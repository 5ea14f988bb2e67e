//! Cartwright CLI Library
//!
//! Command-line interface for the Cartwright storefront scenarios.

#![warn(missing_docs)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)] // Error types are self-documenting

mod commands;
mod config;
mod error;
#[allow(missing_docs)]
mod output;
mod runner;

pub use commands::{Cli, ColorArg, Commands, ListArgs, LocatorsArgs, RunArgs, SuiteArgs};
pub use config::{CliConfig, ColorChoice, SuiteOverrides, Verbosity};
pub use error::{CliError, CliResult};
pub use output::{locator_entries, LocatorEntry, Reporter, ScenarioEntry};
pub use runner::{outcome, select_scenarios, SuiteRunner};
