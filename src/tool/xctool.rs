//! xctool invocation
//!
//! Builds command lines for the external test tool and captures its output.

use std::process::Output;
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, warn};

use super::TestNamePattern;
use crate::config::RunnerConfig;
use crate::error::RunnerError;
use crate::models::TestName;

/// Captured result of one tool invocation
#[derive(Clone, Debug)]
pub struct ToolOutput {
    pub success: bool,
    pub exit_code: Option<i32>,
    pub output: String,
}

impl ToolOutput {
    fn from_process(output: Output) -> Self {
        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let success = output.status.success();

        // A failed run reports through both streams
        let text = if success || output.stderr.is_empty() {
            stdout
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let separator = if stdout.is_empty() || stdout.ends_with('\n') {
                ""
            } else {
                "\n"
            };
            format!("{stdout}{separator}{stderr}")
        };

        Self {
            success,
            exit_code: output.status.code(),
            output: text,
        }
    }

    fn timed_out(secs: u64) -> Self {
        Self {
            success: false,
            exit_code: None,
            output: format!("Timed out after {secs}s\n"),
        }
    }
}

/// Wrapper around the external test tool
#[derive(Clone, Debug)]
pub struct XcTool {
    config: RunnerConfig,
}

impl XcTool {
    pub fn new(config: RunnerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    /// Arguments shared by every invocation
    fn base_args(&self) -> Vec<String> {
        vec![
            "-workspace".to_string(),
            self.config.workspace.clone(),
            "-scheme".to_string(),
            self.config.scheme.clone(),
            "-sdk".to_string(),
            self.config.sdk.clone(),
            "run-tests".to_string(),
        ]
    }

    pub fn list_args(&self) -> Vec<String> {
        let mut args = self.base_args();
        args.push("-listTestsOnly".to_string());
        args
    }

    pub fn run_args(&self, test: &TestName) -> Vec<String> {
        let mut args = self.base_args();
        args.push("-only".to_string());
        args.push(test.selector(&self.config.test_scheme));
        args
    }

    async fn invoke(&self, args: &[String]) -> Result<Output, RunnerError> {
        debug!("Running {} {}", self.config.tool, args.join(" "));

        Command::new(&self.config.tool)
            .args(args)
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|source| RunnerError::ToolLaunch {
                tool: self.config.tool.clone(),
                source,
            })
    }

    /// List tests whose names start with `prefix`
    pub async fn list_tests(&self, prefix: &str) -> Result<Vec<TestName>, RunnerError> {
        let pattern = TestNamePattern::new(prefix)?;
        let output = self.invoke(&self.list_args()).await?;

        if !output.status.success() {
            return Err(RunnerError::ListingFailed {
                code: output.status.code(),
                output: ToolOutput::from_process(output).output,
            });
        }

        let raw = String::from_utf8_lossy(&output.stdout);
        Ok(pattern.extract(&raw))
    }

    /// Run a single test in its own tool invocation
    pub async fn run_test(&self, test: &TestName) -> Result<ToolOutput, RunnerError> {
        let args = self.run_args(test);

        let Some(secs) = self.config.timeout_secs else {
            return Ok(ToolOutput::from_process(self.invoke(&args).await?));
        };

        match tokio::time::timeout(Duration::from_secs(secs), self.invoke(&args)).await {
            Ok(output) => Ok(ToolOutput::from_process(output?)),
            Err(_) => {
                warn!("{} timed out after {}s", test, secs);
                Ok(ToolOutput::timed_out(secs))
            }
        }
    }
}
