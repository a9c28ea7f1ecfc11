//! JSON run report
//!
//! Records when a run happened, how it was configured, and how each test fared.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::Path;
use tracing::info;

use crate::config::RunnerConfig;
use crate::executor::RunOutcome;
use crate::models::{RunSummary, TestResult};

/// Stored record of one run
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RunReport {
    /// Timestamp when the run started
    pub started_at: DateTime<Utc>,

    /// Timestamp when the run completed
    pub completed_at: DateTime<Utc>,

    /// Tool configuration used
    pub config: RunnerConfig,

    /// Totals
    pub summary: RunSummary,

    /// Per-test status and duration
    pub results: Vec<TestResult>,
}

impl RunReport {
    pub fn new(config: &RunnerConfig, outcome: &RunOutcome, started_at: DateTime<Utc>) -> Self {
        let mut results = outcome.results.clone();
        results.sort_by(|a, b| a.test.as_str().cmp(b.test.as_str()));

        Self {
            started_at,
            completed_at: Utc::now(),
            config: config.clone(),
            summary: outcome.summary.clone(),
            results,
        }
    }

    /// Write the report as pretty JSON, creating parent directories
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        let file = File::create(path)
            .with_context(|| format!("Failed to create report file: {}", path.display()))?;
        serde_json::to_writer_pretty(BufWriter::new(file), self)
            .context("Failed to write report")?;

        info!("Saved run report to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{TestName, TestStatus};
    use std::io::BufReader;
    use tempfile::tempdir;

    fn load(path: &Path) -> RunReport {
        let file = File::open(path).unwrap();
        serde_json::from_reader(BufReader::new(file)).unwrap()
    }

    fn outcome() -> RunOutcome {
        let results = vec![
            TestResult::fail(TestName::new("testB"), 30, "raw output"),
            TestResult::pass(TestName::new("testA"), 10, "raw output"),
        ];
        RunOutcome {
            summary: RunSummary::new("test", &results, 40),
            results,
        }
    }

    #[test]
    fn test_report_sorts_results() {
        let report = RunReport::new(&RunnerConfig::default(), &outcome(), Utc::now());
        assert_eq!(report.results[0].test.as_str(), "testA");
        assert!(report.completed_at >= report.started_at);
    }

    #[test]
    fn test_report_save_and_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("reports").join("run.json");

        let report = RunReport::new(&RunnerConfig::default(), &outcome(), Utc::now());
        report.save(&path).unwrap();

        let loaded = load(&path);
        assert_eq!(loaded.summary.total, 2);
        assert_eq!(loaded.summary.failed, 1);
        assert_eq!(loaded.results[1].status, TestStatus::Fail);
        // raw tool output is not persisted
        assert!(loaded.results[0].output.is_empty());
    }
}
