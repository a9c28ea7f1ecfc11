//! Test result models
//!
//! Defines test names, per-test results, and the run summary.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A test method name discovered from the listing output
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TestName(String);

impl TestName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Fully qualified selector passed to `-only`
    pub fn selector(&self, test_scheme: &str) -> String {
        format!("{test_scheme}:{test_scheme}/{}", self.0)
    }

    /// Bracketed marker the tool prints on the per-test status line
    pub fn marker(&self, test_scheme: &str) -> String {
        format!("[{test_scheme} {}]", self.0)
    }
}

impl fmt::Display for TestName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Test execution status
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestStatus {
    Pass,
    Fail,
}

impl TestStatus {
    pub fn symbol(&self) -> &'static str {
        match self {
            TestStatus::Pass => "✓",
            TestStatus::Fail => "✗",
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, TestStatus::Pass)
    }
}

impl fmt::Display for TestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TestStatus::Pass => write!(f, "PASS"),
            TestStatus::Fail => write!(f, "FAIL"),
        }
    }
}

/// Result of a single test invocation
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TestResult {
    pub test: TestName,
    pub status: TestStatus,
    pub duration_ms: u64,
    #[serde(skip)]
    pub output: String,
}

impl TestResult {
    pub fn pass(test: TestName, duration_ms: u64, output: impl Into<String>) -> Self {
        Self {
            test,
            status: TestStatus::Pass,
            duration_ms,
            output: output.into(),
        }
    }

    pub fn fail(test: TestName, duration_ms: u64, output: impl Into<String>) -> Self {
        Self {
            test,
            status: TestStatus::Fail,
            duration_ms,
            output: output.into(),
        }
    }
}

impl fmt::Display for TestResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} [{}ms]",
            self.status.symbol(),
            self.test,
            self.duration_ms
        )
    }
}

/// Totals for one run
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RunSummary {
    pub prefix: String,
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub percent: usize,
    pub duration_ms: u64,
    pub failed_tests: Vec<TestName>,
}

impl RunSummary {
    /// Build a summary from the drained results
    pub fn new(prefix: impl Into<String>, results: &[TestResult], duration_ms: u64) -> Self {
        let total = results.len();
        let passed = results.iter().filter(|r| r.status.is_success()).count();
        let failed = total - passed;
        let failed_tests = results
            .iter()
            .filter(|r| !r.status.is_success())
            .map(|r| r.test.clone())
            .collect();

        Self {
            prefix: prefix.into(),
            total,
            passed,
            failed,
            percent: percent(passed, total),
            duration_ms,
            failed_tests,
        }
    }

    pub fn is_all_passed(&self) -> bool {
        self.failed == 0
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "DONE: {} of {} passed ({}%), {} failed.",
            self.passed, self.total, self.percent, self.failed
        )
    }
}

/// Truncating integer percentage; zero when there is nothing to divide by
fn percent(passed: usize, total: usize) -> usize {
    (100 * passed).checked_div(total).unwrap_or(0)
}
