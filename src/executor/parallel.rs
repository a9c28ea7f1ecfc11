//! Parallel test execution
//!
//! Runs one tool invocation per test with a bounded number in flight.

use futures::future::join_all;
use std::future::Future;
use std::io::{self, Write};
use std::sync::Arc;
use tokio::sync::{mpsc, Semaphore};
use tracing::{debug, error, info, warn};

use crate::config::DEFAULT_MAX_CONCURRENT;
use crate::models::{TestName, TestResult};
use crate::tool::{find_summary_line, XcTool};
use crate::utils::Timer;

/// Stream that receives per-test output
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EchoStream {
    Stdout,
    Stderr,
}

/// Parallel test executor
pub struct ParallelExecutor {
    max_concurrent: usize,
    verbose: bool,
    echo: EchoStream,
}

impl ParallelExecutor {
    pub fn new(max_concurrent: usize) -> Self {
        Self {
            max_concurrent: max_concurrent.max(1),
            verbose: false,
            echo: EchoStream::Stdout,
        }
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn with_echo_stream(mut self, echo: EchoStream) -> Self {
        self.echo = echo;
        self
    }

    /// Run every test through `run`, at most `max_concurrent` at a time.
    ///
    /// Tests are submitted in the given order. Results come back in completion
    /// order, one per submitted test, once all of them have finished.
    pub async fn run_with<F, Fut>(&self, tests: Vec<TestName>, run: F) -> Vec<TestResult>
    where
        F: Fn(TestName) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = TestResult> + Send + 'static,
    {
        let semaphore = Arc::new(Semaphore::new(self.max_concurrent));
        let (tx, mut rx) = mpsc::unbounded_channel();
        let run = Arc::new(run);

        let mut handles = Vec::with_capacity(tests.len());

        for test in tests {
            let semaphore = semaphore.clone();
            let tx = tx.clone();
            let run = run.clone();

            let handle = tokio::spawn(async move {
                let Ok(_permit) = semaphore.acquire_owned().await else {
                    error!("Worker pool closed before {} could run", test);
                    return;
                };

                debug!("Starting {}", test);
                let result = (*run)(test).await;
                let _ = tx.send(result);
            });

            handles.push(handle);
        }
        drop(tx);

        for joined in join_all(handles).await {
            if let Err(e) = joined {
                error!("Test task aborted: {}", e);
            }
        }

        let mut results = Vec::new();
        while let Some(result) = rx.recv().await {
            results.push(result);
        }
        results
    }

    /// Run the given tests with the external tool
    pub async fn run_all(&self, tool: Arc<XcTool>, tests: Vec<TestName>) -> Vec<TestResult> {
        info!(
            "Running {} tests (max {} concurrent)",
            tests.len(),
            self.max_concurrent
        );

        let verbose = self.verbose;
        let echo = self.echo;
        self.run_with(tests, move |test| {
            let tool = tool.clone();
            async move { execute(&tool, test, verbose, echo).await }
        })
        .await
    }
}

impl Default for ParallelExecutor {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_CONCURRENT)
    }
}

/// Run one test, classify it by exit status, and echo its output
async fn execute(tool: &XcTool, test: TestName, verbose: bool, echo: EchoStream) -> TestResult {
    let timer = Timer::start(test.as_str());

    let output = match tool.run_test(&test).await {
        Ok(output) => output,
        Err(e) => {
            error!("{} could not run: {}", test, e);
            return TestResult::fail(test, timer.stop(), e.to_string());
        }
    };
    let duration_ms = timer.stop();
    if !output.success {
        debug!("{} exited with code {:?}", test, output.exit_code);
    }

    // Writes block on the terminal or pipe, so keep them off the runtime workers
    let marker = test.marker(&tool.config().test_scheme);
    let text = output.output;
    let echoed = tokio::task::spawn_blocking(move || {
        let written = print_output(echo, &text, &marker, verbose);
        (text, written)
    })
    .await;

    let text = match echoed {
        Ok((text, Ok(()))) => text,
        Ok((text, Err(e))) => {
            warn!("Failed to write output for {}: {}", test, e);
            text
        }
        Err(e) => {
            warn!("Output echo for {} aborted: {}", test, e);
            String::new()
        }
    };

    let result = if output.success {
        TestResult::pass(test, duration_ms, text)
    } else {
        TestResult::fail(test, duration_ms, text)
    };

    debug!("{}", result);
    result
}

/// Echo under one lock so concurrent tests never split a line
fn print_output(echo: EchoStream, output: &str, marker: &str, verbose: bool) -> io::Result<()> {
    match echo {
        EchoStream::Stdout => echo_output(&mut io::stdout().lock(), output, marker, verbose),
        EchoStream::Stderr => echo_output(&mut io::stderr().lock(), output, marker, verbose),
    }
}

/// Write a test's output: everything when verbose, else its status line if any
pub fn echo_output<W: Write>(
    out: &mut W,
    output: &str,
    marker: &str,
    verbose: bool,
) -> io::Result<()> {
    if verbose {
        out.write_all(output.as_bytes())?;
    } else if let Some(line) = find_summary_line(output, marker) {
        writeln!(out, "{line}")?;
    }
    out.flush()
}

#[cfg(test)]
mod unit_tests {
    use super::*;
    use crate::tool::testing::{fake_config, FakeTool};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn names(count: usize) -> Vec<TestName> {
        (0..count)
            .map(|i| TestName::new(format!("testCase{i}")))
            .collect()
    }

    async fn bounded_run(max_concurrent: usize, count: usize) -> (usize, usize) {
        let in_flight = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));

        let executor = ParallelExecutor::new(max_concurrent);
        let results = {
            let in_flight = in_flight.clone();
            let peak = peak.clone();
            executor
                .run_with(names(count), move |test| {
                    let in_flight = in_flight.clone();
                    let peak = peak.clone();
                    async move {
                        let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                        peak.fetch_max(now, Ordering::SeqCst);
                        tokio::time::sleep(Duration::from_millis(20)).await;
                        in_flight.fetch_sub(1, Ordering::SeqCst);
                        TestResult::pass(test, 20, "")
                    }
                })
                .await
        };

        (results.len(), peak.load(Ordering::SeqCst))
    }

    #[test]
    fn test_executor_creation() {
        let executor = ParallelExecutor::new(4).with_verbose(true);
        assert_eq!(executor.max_concurrent, 4);
        assert!(executor.verbose);
        assert_eq!(ParallelExecutor::default().max_concurrent, 8);
        assert_eq!(ParallelExecutor::new(0).max_concurrent, 1);
        assert_eq!(executor.echo, EchoStream::Stdout);

        let executor = executor.with_echo_stream(EchoStream::Stderr);
        assert_eq!(executor.echo, EchoStream::Stderr);
    }

    #[tokio::test]
    async fn test_run_all_verbose_keeps_output_and_tool_duration() {
        let fake = FakeTool::new("sleep 1\necho '  PASS [Tests testSlow] (1000 ms)'\n");
        let tool = Arc::new(XcTool::new(fake_config(&fake)));

        let results = ParallelExecutor::new(1)
            .with_verbose(true)
            .with_echo_stream(EchoStream::Stderr)
            .run_all(tool, vec![TestName::new("testSlow")])
            .await;

        assert_eq!(results.len(), 1);
        assert!(results[0].status.is_success());
        assert_eq!(results[0].output, "  PASS [Tests testSlow] (1000 ms)\n");
        assert!(results[0].duration_ms >= 1000);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrency_bound_default() {
        let (total, peak) = bounded_run(8, 30).await;
        assert_eq!(total, 30);
        assert!(peak <= 8, "peak {peak} exceeded 8");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrency_bound_small_pool() {
        let (total, peak) = bounded_run(3, 10).await;
        assert_eq!(total, 10);
        assert!(peak <= 3, "peak {peak} exceeded 3");
    }

    #[tokio::test]
    async fn test_run_with_keeps_duplicates() {
        let tests = vec![
            TestName::new("testA"),
            TestName::new("testA"),
            TestName::new("testB"),
        ];
        let results = ParallelExecutor::new(2)
            .run_with(tests, |test| async move { TestResult::pass(test, 0, "") })
            .await;

        assert_eq!(results.len(), 3);
        let count_a = results.iter().filter(|r| r.test.as_str() == "testA").count();
        assert_eq!(count_a, 2);
    }

    #[tokio::test]
    async fn test_run_with_empty() {
        let results = ParallelExecutor::default()
            .run_with(Vec::new(), |test| async move { TestResult::pass(test, 0, "") })
            .await;
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_run_all_with_tool() {
        let fake = FakeTool::standard();
        let tool = Arc::new(XcTool::new(fake_config(&fake)));
        let tests = vec![
            TestName::new("testCcPassingOne"),
            TestName::new("testCcFailingOne"),
            TestName::new("testCcPassingTwo"),
        ];

        let results = ParallelExecutor::new(2).run_all(tool, tests).await;
        assert_eq!(results.len(), 3);

        let failed: Vec<_> = results
            .iter()
            .filter(|r| !r.status.is_success())
            .map(|r| r.test.as_str())
            .collect();
        assert_eq!(failed, vec!["testCcFailingOne"]);
    }

    #[tokio::test]
    async fn test_run_all_tool_missing_counts_as_failure() {
        let mut config = crate::config::RunnerConfig::default();
        config.tool = "/nonexistent/xctool-missing".to_string();
        let tool = Arc::new(XcTool::new(config));

        let results = ParallelExecutor::new(2)
            .run_all(tool, vec![TestName::new("testX")])
            .await;
        assert_eq!(results.len(), 1);
        assert!(!results[0].status.is_success());
        assert!(results[0].output.contains("Failed to launch"));
    }

    #[test]
    fn test_echo_verbose_writes_everything_once() {
        let output = "line one\n  - [Tests testA] detail\nline three\n";
        let mut buf = Vec::new();
        echo_output(&mut buf, output, "[Tests testA]", true).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), output);
    }

    #[test]
    fn test_echo_summary_writes_first_status_line() {
        let output = "  - [Tests testA] starting\n  PASS [Tests testA] (5 ms)\n  PASS [Tests testA] again\n";
        let mut buf = Vec::new();
        echo_output(&mut buf, output, "[Tests testA]", false).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "  PASS [Tests testA] (5 ms)\n");
    }

    #[test]
    fn test_echo_summary_without_match_writes_nothing() {
        let mut buf = Vec::new();
        echo_output(&mut buf, "nothing useful\n", "[Tests testA]", false).unwrap();
        assert!(buf.is_empty());
    }
}
