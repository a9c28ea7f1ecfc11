//! Test run orchestration
//!
//! Discovers tests, fans them out to the executor, and tallies the results.

use std::sync::Arc;
use tracing::info;

use super::{EchoStream, ParallelExecutor};
use crate::config::RunnerConfig;
use crate::error::RunnerError;
use crate::models::{RunSummary, TestName, TestResult};
use crate::tool::XcTool;
use crate::utils::Stopwatch;

/// Everything a completed run produced
#[derive(Clone, Debug)]
pub struct RunOutcome {
    pub summary: RunSummary,
    pub results: Vec<TestResult>,
}

/// Test runner for one discovery-and-execute cycle
pub struct TestRunner {
    tool: Arc<XcTool>,
    executor: ParallelExecutor,
}

impl TestRunner {
    /// Create a new test runner
    pub fn new(config: RunnerConfig) -> Result<Self, RunnerError> {
        config.validate()?;
        let executor = ParallelExecutor::new(config.max_concurrent);
        Ok(Self {
            tool: Arc::new(XcTool::new(config)),
            executor,
        })
    }

    /// Echo full tool output instead of one status line per test
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.executor = self.executor.with_verbose(verbose);
        self
    }

    pub fn with_echo_stream(mut self, echo: EchoStream) -> Self {
        self.executor = self.executor.with_echo_stream(echo);
        self
    }

    pub fn config(&self) -> &RunnerConfig {
        self.tool.config()
    }

    /// List tests matching `prefix` without running them
    pub async fn discover(&self, prefix: &str) -> Result<Vec<TestName>, RunnerError> {
        let tests = self.tool.list_tests(prefix).await?;
        info!("Discovered {} tests matching '{}'", tests.len(), prefix);
        Ok(tests)
    }

    /// Discover and run every test matching `prefix`
    pub async fn run(&self, prefix: &str) -> Result<RunOutcome, RunnerError> {
        let mut stopwatch = Stopwatch::new();

        let tests = self.discover(prefix).await?;
        stopwatch.lap("discovery");

        if tests.is_empty() {
            return Err(RunnerError::NoTestsMatched {
                prefix: prefix.to_string(),
            });
        }

        let results = self.executor.run_all(self.tool.clone(), tests).await;
        stopwatch.lap("execution");

        let summary = RunSummary::new(prefix, &results, stopwatch.total_ms());

        info!(
            "Run completed in {} - Pass: {}/{} ({}%)",
            stopwatch.format(),
            summary.passed,
            summary.total,
            summary.percent
        );

        Ok(RunOutcome { summary, results })
    }
}
