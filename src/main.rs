//! xctest-parallel - run iOS unit tests in parallel through xctool
//!
//! Lists the tests of a workspace, runs each matching test in its own
//! xctool invocation with a bounded number in flight, and prints a
//! one-line pass/fail summary.
//!
//! ## Usage
//!
//! ```bash
//! # Run every test starting with testCcPassing (the default prefix)
//! xctest-parallel
//!
//! # Run a different group with the full tool output
//! xctest-parallel --verbose testCcFailing
//!
//! # List matching tests only
//! xctest-parallel --list test
//! ```

use anyhow::{anyhow, Result};
use chrono::Utc;
use clap::Parser;
use tracing::info;

mod cli;
mod config;
mod error;
mod executor;
mod models;
mod output;
mod results;
mod tool;
mod utils;

use cli::Args;
use config::{ConfigFile, EnvConfig};
use executor::{EchoStream, TestRunner};
use output::{OutputFormat, ResultFormatter};
use results::RunReport;
use utils::{init_logger, LogLevel};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let env = EnvConfig::load();

    let level_name = args
        .log_level
        .clone()
        .or_else(|| env.log_level.clone())
        .unwrap_or_else(|| "warn".to_string());
    let level = LogLevel::from_str(&level_name)
        .ok_or_else(|| anyhow!("Unknown log level: {level_name}"))?;
    init_logger(level);

    let mut config_file = ConfigFile::resolve(args.config.as_deref())?;
    config_file.runner.apply_env(&env);
    args.apply(&mut config_file.runner);

    if let Some(path) = &args.write_config {
        config_file.validate()?;
        config_file.save(path)?;
        println!("Wrote configuration to {}", path.display());
        return Ok(());
    }

    let format_name = args
        .format
        .clone()
        .or_else(|| env.format.clone())
        .unwrap_or_else(|| "text".to_string());
    let format = OutputFormat::from_str(&format_name)
        .ok_or_else(|| anyhow!("Unknown output format: {format_name}"))?;
    let formatter = ResultFormatter::new(format);

    let verbose = args.verbose || env.verbose.unwrap_or(false);
    // JSON documents own stdout; per-test echo moves to stderr
    let echo = if format.is_machine_readable() {
        EchoStream::Stderr
    } else {
        EchoStream::Stdout
    };
    let runner = TestRunner::new(config_file.runner)?
        .with_verbose(verbose)
        .with_echo_stream(echo);

    if args.list {
        let tests = runner.discover(&args.prefix).await?;
        println!("{}", formatter.format_test_list(&tests));
        return Ok(());
    }

    run_tests(&runner, &args, &formatter).await
}

async fn run_tests(runner: &TestRunner, args: &Args, formatter: &ResultFormatter) -> Result<()> {
    info!(
        "Running tests matching '{}' in {} ({} concurrent)",
        args.prefix,
        runner.config().workspace,
        runner.config().max_concurrent
    );

    let started_at = Utc::now();
    let outcome = runner.run(&args.prefix).await?;

    println!("{}", formatter.format_summary(&outcome.summary));

    if !outcome.summary.is_all_passed() {
        let failed: Vec<_> = outcome
            .summary
            .failed_tests
            .iter()
            .map(|t| t.as_str())
            .collect();
        info!("Failed tests: {}", failed.join(", "));
    }

    if let Some(path) = &args.output {
        RunReport::new(runner.config(), &outcome, started_at).save(path)?;
    }

    Ok(())
}
