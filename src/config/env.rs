//! Environment variable configuration
//!
//! Provides environment variable overrides for configuration.

use std::env;

/// Environment variable prefix
const ENV_PREFIX: &str = "XCTEST_PARALLEL";

/// Environment configuration from environment variables
#[derive(Clone, Debug, Default)]
pub struct EnvConfig {
    /// Test tool from XCTEST_PARALLEL_TOOL
    pub tool: Option<String>,
    /// Workspace from XCTEST_PARALLEL_WORKSPACE
    pub workspace: Option<String>,
    /// Scheme from XCTEST_PARALLEL_SCHEME
    pub scheme: Option<String>,
    /// Test scheme from XCTEST_PARALLEL_TEST_SCHEME
    pub test_scheme: Option<String>,
    /// SDK from XCTEST_PARALLEL_SDK
    pub sdk: Option<String>,
    /// Concurrency from XCTEST_PARALLEL_JOBS
    pub jobs: Option<usize>,
    /// Timeout from XCTEST_PARALLEL_TIMEOUT
    pub timeout: Option<u64>,
    /// Verbose from XCTEST_PARALLEL_VERBOSE
    pub verbose: Option<bool>,
    /// Output format from XCTEST_PARALLEL_FORMAT
    pub format: Option<String>,
    /// Log level from XCTEST_PARALLEL_LOG_LEVEL
    pub log_level: Option<String>,
}

impl EnvConfig {
    /// Load configuration from environment variables
    pub fn load() -> Self {
        Self {
            tool: get_env("TOOL"),
            workspace: get_env("WORKSPACE"),
            scheme: get_env("SCHEME"),
            test_scheme: get_env("TEST_SCHEME"),
            sdk: get_env("SDK"),
            jobs: get_env_parse("JOBS"),
            timeout: get_env_parse("TIMEOUT"),
            verbose: get_env_bool("VERBOSE"),
            format: get_env("FORMAT"),
            log_level: get_env("LOG_LEVEL"),
        }
    }
}

/// Get environment variable with prefix
fn get_env(name: &str) -> Option<String> {
    env::var(format!("{ENV_PREFIX}_{name}")).ok()
}

/// Get environment variable and parse to type
fn get_env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    get_env(name).and_then(|v| v.parse().ok())
}

/// Get environment variable as boolean
fn get_env_bool(name: &str) -> Option<bool> {
    get_env(name).map(|v| parse_bool(&v))
}

fn parse_bool(value: &str) -> bool {
    matches!(
        value.to_lowercase().as_str(),
        "1" | "true" | "yes" | "on" | "enabled"
    )
}
