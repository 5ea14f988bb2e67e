//! Cartwright CLI: run the storefront scenarios
//!
//! ## Usage
//!
//! ```bash
//! cartwright list                          # Show the scenario catalog
//! cartwright run                           # Run every scenario
//! cartwright run invalid_signup --seed 7   # Run one family, reproducibly
//! cartwright locators --page login         # Show a page's locators
//! cartwright config --base-url https://...  # Show the effective config
//! ```

use cartwright::{Scenario, ScenarioRunner};
use cartwright_cli::{
    locator_entries, outcome, select_scenarios, Cli, CliConfig, CliError, CliResult, ColorChoice,
    Commands, ListArgs, LocatorsArgs, Reporter, RunArgs, ScenarioEntry, SuiteArgs, SuiteRunner,
    Verbosity,
};
use clap::Parser;
use std::process::ExitCode;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> CliResult<()> {
    let cli = Cli::parse();
    let config = build_config(&cli);
    cartwright::logging::init(config.verbosity.log_level(), config.json);

    match cli.command {
        Commands::Run(args) => run_scenarios(config, &args),
        Commands::List(args) => run_list(&config, &args),
        Commands::Locators(args) => run_locators(&config, &args),
        Commands::Config(args) => run_config(&config, &args),
    }
}

fn build_config(cli: &Cli) -> CliConfig {
    let verbosity = Verbosity::from_flags(cli.verbose, cli.quiet);
    let color: ColorChoice = cli.color.clone().into();
    CliConfig::new()
        .with_verbosity(verbosity)
        .with_color(color)
        .with_json(cli.json)
}

fn run_scenarios(config: CliConfig, args: &RunArgs) -> CliResult<()> {
    let scenarios = select_scenarios(&args.scenarios)?;
    let suite = args.suite.overrides().resolve()?;

    let mut runner = ScenarioRunner::new()
        .with_screenshots(!args.no_screenshots)
        .with_seed(suite.seed);
    if args.fail_fast {
        runner = runner.with_fail_fast();
    }

    let tokio_runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    let report =
        tokio_runtime.block_on(SuiteRunner::new(config, runner).run(&suite, &scenarios))?;
    outcome(&report)
}

fn run_list(config: &CliConfig, args: &ListArgs) -> CliResult<()> {
    let scenarios = match args.filter.as_deref() {
        Some(filter) => Scenario::matching(filter),
        None => Scenario::catalog(),
    };
    if scenarios.is_empty() {
        return Err(CliError::config(format!(
            "no scenario matches '{}'",
            args.filter.as_deref().unwrap_or_default()
        )));
    }

    if config.json {
        let entries: Vec<ScenarioEntry> = scenarios.iter().map(ScenarioEntry::from).collect();
        println!("{}", serde_json::to_string_pretty(&entries)?);
    } else {
        Reporter::new(config.color.should_color(), false).scenarios(&scenarios);
    }
    Ok(())
}

fn run_locators(config: &CliConfig, args: &LocatorsArgs) -> CliResult<()> {
    let registries: Vec<_> = cartwright::registries()
        .into_iter()
        .filter(|r| args.page.as_deref().map_or(true, |page| r.page() == page))
        .collect();
    if registries.is_empty() {
        let pages: Vec<_> = cartwright::registries().iter().map(|r| r.page()).collect();
        return Err(CliError::config(format!(
            "unknown page '{}' (expected one of {})",
            args.page.as_deref().unwrap_or_default(),
            pages.join(", ")
        )));
    }

    if config.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&locator_entries(&registries))?
        );
    } else {
        Reporter::new(config.color.should_color(), false).locators(&registries);
    }
    Ok(())
}

fn run_config(config: &CliConfig, args: &SuiteArgs) -> CliResult<()> {
    let suite = args.overrides().resolve()?;
    if config.json {
        println!("{}", serde_json::to_string_pretty(&suite)?);
    } else {
        print!("{}", serde_yaml_ng::to_string(&suite)?);
    }
    Ok(())
}
