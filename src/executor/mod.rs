//! Test execution engine
//!
//! Provides the bounded parallel executor and the run orchestrator.

mod parallel;
mod runner;

pub use parallel::{EchoStream, ParallelExecutor};
pub use runner::{RunOutcome, TestRunner};
