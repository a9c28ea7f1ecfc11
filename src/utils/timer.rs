//! Timer utilities
//!
//! Measures per-test and per-phase durations.

use std::time::{Duration, Instant};

/// Simple timer for measuring elapsed time
#[derive(Debug)]
pub struct Timer {
    start: Instant,
    label: String,
}

impl Timer {
    /// Create and start a new timer
    pub fn start(label: impl Into<String>) -> Self {
        Self {
            start: Instant::now(),
            label: label.into(),
        }
    }

    /// Get elapsed time in milliseconds
    pub fn elapsed_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }

    /// Stop timer and return elapsed milliseconds
    pub fn stop(self) -> u64 {
        let elapsed = self.elapsed_ms();
        tracing::debug!("{}: {}ms", self.label, elapsed);
        elapsed
    }
}

/// Stopwatch with lap timing for run phases
#[derive(Debug)]
pub struct Stopwatch {
    start: Instant,
    laps: Vec<(String, Duration)>,
}

impl Stopwatch {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
            laps: Vec::new(),
        }
    }

    /// Record a lap
    pub fn lap(&mut self, label: impl Into<String>) {
        let elapsed = self.start.elapsed();
        self.laps.push((label.into(), elapsed));
    }

    /// Total elapsed milliseconds
    pub fn total_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }

    /// Lap durations (each lap on its own, not cumulative)
    pub fn lap_times(&self) -> Vec<(String, Duration)> {
        let mut result = Vec::new();
        let mut prev = Duration::ZERO;

        for (label, cumulative) in &self.laps {
            result.push((label.clone(), *cumulative - prev));
            prev = *cumulative;
        }

        result
    }

    /// Format laps as a single line
    pub fn format(&self) -> String {
        let laps: Vec<String> = self
            .lap_times()
            .into_iter()
            .map(|(label, duration)| format!("{label}: {}ms", duration.as_millis()))
            .collect();
        format!("{} (total {}ms)", laps.join(", "), self.total_ms())
    }
}

impl Default for Stopwatch {
    fn default() -> Self {
        Self::new()
    }
}
