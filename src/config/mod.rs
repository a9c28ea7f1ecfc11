//! Configuration module
//!
//! Handles loading and layering runner configuration.

mod env;
mod file;

pub use env::EnvConfig;
pub use file::ConfigFile;

use serde::{Deserialize, Serialize};

use crate::error::RunnerError;

/// Default number of concurrent test invocations
pub const DEFAULT_MAX_CONCURRENT: usize = 8;

/// Test tool configuration
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    /// Test tool executable
    pub tool: String,

    /// Xcode workspace path
    pub workspace: String,

    /// Build scheme
    pub scheme: String,

    /// Test bundle scheme used in selectors and status markers
    pub test_scheme: String,

    /// Target SDK
    pub sdk: String,

    /// Maximum concurrent test invocations
    pub max_concurrent: usize,

    /// Per-test timeout in seconds (none waits forever)
    pub timeout_secs: Option<u64>,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            tool: "xctool".to_string(),
            workspace: "LiquidCoreiOS.xcodeproj/project.xcworkspace".to_string(),
            scheme: "LiquidCoreiOS".to_string(),
            test_scheme: "LiquidCoreiOSTests".to_string(),
            sdk: "iphonesimulator".to_string(),
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            timeout_secs: None,
        }
    }
}

impl RunnerConfig {
    /// Apply environment overrides
    pub fn apply_env(&mut self, env: &EnvConfig) {
        if let Some(tool) = &env.tool {
            self.tool = tool.clone();
        }
        if let Some(workspace) = &env.workspace {
            self.workspace = workspace.clone();
        }
        if let Some(scheme) = &env.scheme {
            self.scheme = scheme.clone();
        }
        if let Some(test_scheme) = &env.test_scheme {
            self.test_scheme = test_scheme.clone();
        }
        if let Some(sdk) = &env.sdk {
            self.sdk = sdk.clone();
        }
        if let Some(jobs) = env.jobs {
            self.max_concurrent = jobs;
        }
        if env.timeout.is_some() {
            self.timeout_secs = env.timeout;
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), RunnerError> {
        if self.max_concurrent == 0 {
            return Err(RunnerError::InvalidConfig(
                "max_concurrent must be at least 1".to_string(),
            ));
        }

        let required = [
            ("tool", &self.tool),
            ("workspace", &self.workspace),
            ("scheme", &self.scheme),
            ("test_scheme", &self.test_scheme),
            ("sdk", &self.sdk),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(RunnerError::InvalidConfig(format!("{field} must not be empty")));
            }
        }

        if self.timeout_secs == Some(0) {
            return Err(RunnerError::InvalidConfig(
                "timeout_secs must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RunnerConfig::default();
        assert_eq!(config.tool, "xctool");
        assert_eq!(config.sdk, "iphonesimulator");
        assert_eq!(config.max_concurrent, 8);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_apply_env() {
        let mut config = RunnerConfig::default();
        let env = EnvConfig {
            scheme: Some("MyApp".to_string()),
            jobs: Some(2),
            timeout: Some(60),
            ..Default::default()
        };
        config.apply_env(&env);

        assert_eq!(config.scheme, "MyApp");
        assert_eq!(config.max_concurrent, 2);
        assert_eq!(config.timeout_secs, Some(60));
        assert_eq!(config.tool, "xctool");
    }

    #[test]
    fn test_validate_rejects_zero_jobs() {
        let config = RunnerConfig {
            max_concurrent: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(RunnerError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_validate_rejects_empty_scheme() {
        let config = RunnerConfig {
            test_scheme: "  ".to_string(),
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("test_scheme"));
    }
}
