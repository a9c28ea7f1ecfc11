//! CLI argument parsing
//!
//! Defines command-line interface using clap.

use clap::Parser;
use std::path::PathBuf;

use crate::config::RunnerConfig;

/// Prefix used when none is given
pub const DEFAULT_PREFIX: &str = "testCcPassing";

/// Discover iOS unit tests with xctool and run each one in parallel
#[derive(Parser, Debug)]
#[command(name = "xctest-parallel")]
#[command(version)]
#[command(about = "Discover iOS unit tests with xctool and run them in parallel")]
#[command(long_about = None)]
pub struct Args {
    /// Only run tests whose names start with this prefix
    #[arg(default_value = DEFAULT_PREFIX)]
    pub prefix: String,

    /// Print the full tool output of every test
    #[arg(short, long)]
    pub verbose: bool,

    /// Test tool executable
    #[arg(long)]
    pub tool: Option<String>,

    /// Xcode workspace path
    #[arg(long)]
    pub workspace: Option<String>,

    /// Build scheme
    #[arg(long)]
    pub scheme: Option<String>,

    /// Test bundle scheme
    #[arg(long)]
    pub test_scheme: Option<String>,

    /// Target SDK
    #[arg(long)]
    pub sdk: Option<String>,

    /// Number of tests to run concurrently
    #[arg(short, long)]
    pub jobs: Option<usize>,

    /// Per-test timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Output format (text, json, json-pretty)
    #[arg(short, long)]
    pub format: Option<String>,

    /// Write a JSON run report to this file
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Configuration file (YAML or JSON)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    pub log_level: Option<String>,

    /// List matching tests without running them
    #[arg(long)]
    pub list: bool,

    /// Write the effective configuration to this file and exit
    #[arg(long, value_name = "PATH")]
    pub write_config: Option<PathBuf>,
}

impl Args {
    /// Apply flag overrides on top of file and environment settings
    pub fn apply(&self, config: &mut RunnerConfig) {
        if let Some(tool) = &self.tool {
            config.tool = tool.clone();
        }
        if let Some(workspace) = &self.workspace {
            config.workspace = workspace.clone();
        }
        if let Some(scheme) = &self.scheme {
            config.scheme = scheme.clone();
        }
        if let Some(test_scheme) = &self.test_scheme {
            config.test_scheme = test_scheme.clone();
        }
        if let Some(sdk) = &self.sdk {
            config.sdk = sdk.clone();
        }
        if let Some(jobs) = self.jobs {
            config.max_concurrent = jobs;
        }
        if self.timeout.is_some() {
            config.timeout_secs = self.timeout;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_prefix() {
        let args = Args::try_parse_from(["xctest-parallel"]).unwrap();
        assert_eq!(args.prefix, "testCcPassing");
        assert!(!args.verbose);
    }

    #[test]
    fn test_verbose_before_prefix() {
        let args = Args::try_parse_from(["xctest-parallel", "--verbose", "testCcFoo"]).unwrap();
        assert!(args.verbose);
        assert_eq!(args.prefix, "testCcFoo");
    }

    #[test]
    fn test_flags_after_prefix() {
        let args =
            Args::try_parse_from(["xctest-parallel", "testCc", "-j", "2", "-f", "json"]).unwrap();
        assert_eq!(args.prefix, "testCc");
        assert_eq!(args.jobs, Some(2));
        assert_eq!(args.format.as_deref(), Some("json"));
    }

    #[test]
    fn test_unknown_flag_rejected() {
        assert!(Args::try_parse_from(["xctest-parallel", "--bogus", "testCc"]).is_err());
    }

    #[test]
    fn test_apply_overrides() {
        let args = Args::try_parse_from([
            "xctest-parallel",
            "--tool",
            "/usr/local/bin/xctool",
            "--sdk",
            "iphoneos",
            "--timeout",
            "90",
        ])
        .unwrap();

        let mut config = RunnerConfig::default();
        args.apply(&mut config);
        assert_eq!(config.tool, "/usr/local/bin/xctool");
        assert_eq!(config.sdk, "iphoneos");
        assert_eq!(config.timeout_secs, Some(90));
        assert_eq!(config.max_concurrent, 8);
    }
}
