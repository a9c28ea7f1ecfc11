//! Runner error types

use thiserror::Error;

/// Failures that abort a test run
#[derive(Error, Debug)]
pub enum RunnerError {
    #[error("Failed to launch test tool '{tool}': {source}")]
    ToolLaunch {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Test listing failed with exit code {code:?}:\n{output}")]
    ListingFailed { code: Option<i32>, output: String },

    #[error("No tests matched prefix '{prefix}'")]
    NoTestsMatched { prefix: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
