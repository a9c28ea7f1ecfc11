//! External test tool integration
//!
//! Invokes xctool and parses what it prints.

mod parse;
mod xctool;

pub use parse::{find_summary_line, TestNamePattern};
pub use xctool::XcTool;
