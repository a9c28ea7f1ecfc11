//! Data models for test runs
//!
//! This module contains the data structures shared by discovery, execution and output.

mod test_result;

pub use test_result::{RunSummary, TestName, TestResult, TestStatus};
