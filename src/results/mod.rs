//! Run reports
//!
//! Persists the outcome of a run as a JSON document.

mod report;

pub use report::RunReport;
