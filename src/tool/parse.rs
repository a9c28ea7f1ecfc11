//! Parsing of test tool output
//!
//! Extracts test names from listing output and picks the per-test status line.

use regex::Regex;

use crate::error::RunnerError;
use crate::models::TestName;

/// Matcher for test names beginning with a literal prefix
#[derive(Clone, Debug)]
pub struct TestNamePattern {
    regex: Regex,
}

impl TestNamePattern {
    pub fn new(prefix: &str) -> Result<Self, RunnerError> {
        let pattern = format!("{}[A-Za-z0-9_]*", regex::escape(prefix));
        let regex = Regex::new(&pattern)
            .map_err(|e| RunnerError::InvalidConfig(format!("invalid test prefix: {e}")))?;
        Ok(Self { regex })
    }

    /// Every match in order of appearance, duplicates kept
    pub fn extract(&self, raw: &str) -> Vec<TestName> {
        self.regex
            .find_iter(raw)
            .map(|m| m.as_str())
            .filter(|s| !s.is_empty())
            .map(TestName::new)
            .collect()
    }
}

/// First line carrying the test's bracketed marker that is not a `-` detail line
pub fn find_summary_line<'a>(output: &'a str, marker: &str) -> Option<&'a str> {
    output
        .lines()
        .find(|line| line.contains(marker) && !line.trim().starts_with('-'))
}
