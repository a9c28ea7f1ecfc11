//! Output formatters for run results
//!
//! Provides the plain `DONE:` line and JSON renderings.

use crate::models::{RunSummary, TestName};

/// Output format options
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
    JsonPretty,
}

impl OutputFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "text" => Some(OutputFormat::Text),
            "json" => Some(OutputFormat::Json),
            "json-pretty" | "jsonpretty" => Some(OutputFormat::JsonPretty),
            _ => None,
        }
    }

    /// Whether stdout must carry nothing but the rendered document
    pub fn is_machine_readable(&self) -> bool {
        !matches!(self, OutputFormat::Text)
    }
}

/// Result formatter
pub struct ResultFormatter {
    format: OutputFormat,
}

impl ResultFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Format the run summary
    pub fn format_summary(&self, summary: &RunSummary) -> String {
        match self.format {
            OutputFormat::Text => summary.to_string(),
            OutputFormat::Json => serde_json::to_string(summary).unwrap_or_default(),
            OutputFormat::JsonPretty => serde_json::to_string_pretty(summary).unwrap_or_default(),
        }
    }

    /// Format discovered test names
    pub fn format_test_list(&self, tests: &[TestName]) -> String {
        match self.format {
            OutputFormat::Text => tests
                .iter()
                .map(TestName::as_str)
                .collect::<Vec<_>>()
                .join("\n"),
            OutputFormat::Json => serde_json::to_string(tests).unwrap_or_default(),
            OutputFormat::JsonPretty => serde_json::to_string_pretty(tests).unwrap_or_default(),
        }
    }
}
