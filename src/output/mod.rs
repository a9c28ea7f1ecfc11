//! Output formatting module
//!
//! Renders run summaries and test listings.

mod formatter;

pub use formatter::{OutputFormat, ResultFormatter};
