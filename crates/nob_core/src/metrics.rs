//! Run metrics and logging setup.
//!
//! Provides structured logging and counters for monitoring a simulation run.

use nob_data::{Label, StructuralEvents, ALPHABET};
use std::collections::BTreeMap;
use std::time::{Duration, Instant};

/// Per-run statistics collector.
#[derive(Debug, Clone)]
pub struct RunMetrics {
    step_count: u64,
    log_interval: u64,
    label_counts: [u64; ALPHABET.len()],
    counters: BTreeMap<String, u64>,
    start_time: Instant,
    busy: Duration,
}

impl Default for RunMetrics {
    fn default() -> Self {
        Self::new(0)
    }
}

impl RunMetrics {
    /// Creates a collector that logs progress every `log_interval` steps
    /// (never if 0).
    #[must_use]
    pub fn new(log_interval: usize) -> Self {
        Self {
            step_count: 0,
            log_interval: log_interval as u64,
            label_counts: [0; ALPHABET.len()],
            counters: BTreeMap::new(),
            start_time: Instant::now(),
            busy: Duration::ZERO,
        }
    }

    /// Records a completed step with its duration.
    pub fn record_step(&mut self, duration: Duration, label: Label, events: StructuralEvents) {
        self.step_count += 1;
        self.busy += duration;
        self.label_counts[label.index()] += 1;
        self.add_to_counter("branch", events.branches as u64);
        self.add_to_counter("fuse", events.fusions as u64);
        self.add_to_counter("rewire", events.rewires as u64);

        if self.log_interval > 0 && self.step_count % self.log_interval == 0 {
            tracing::info!(
                step = self.step_count,
                label = %label,
                branches = self.counter("branch"),
                fusions = self.counter("fuse"),
                rewires = self.counter("rewire"),
                duration_us = duration.as_micros() as u64,
                "Simulation progress"
            );
        }
    }

    /// Increments a named counter.
    pub fn increment_counter(&mut self, name: &str) {
        self.add_to_counter(name, 1);
    }

    fn add_to_counter(&mut self, name: &str, amount: u64) {
        *self.counters.entry(name.to_string()).or_insert(0) += amount;
    }

    #[must_use]
    pub fn counter(&self, name: &str) -> u64 {
        self.counters.get(name).copied().unwrap_or(0)
    }

    #[must_use]
    pub fn step_count(&self) -> u64 {
        self.step_count
    }

    #[must_use]
    pub fn label_count(&self, label: Label) -> u64 {
        self.label_counts[label.index()]
    }

    /// Gets elapsed time since metrics creation.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Mean time spent inside a step.
    #[must_use]
    pub fn mean_step_time(&self) -> Duration {
        if self.step_count == 0 {
            Duration::ZERO
        } else {
            self.busy / self.step_count as u32
        }
    }

    /// Logs the end-of-run summary.
    pub fn log_summary(&self) {
        let labels = ALPHABET
            .iter()
            .map(|l| format!("{l}={}", self.label_count(*l)))
            .collect::<Vec<_>>()
            .join(" ");
        tracing::info!(
            steps = self.step_count,
            branches = self.counter("branch"),
            fusions = self.counter("fuse"),
            rewires = self.counter("rewire"),
            mean_step_us = self.mean_step_time().as_micros() as u64,
            elapsed_ms = self.elapsed().as_millis() as u64,
            labels = %labels,
            "Simulation finished"
        );
    }
}

/// Initialize tracing subscriber for logging.
///
/// `RUST_LOG` takes precedence over `default_level`. Calling this more than
/// once is harmless.
pub fn init_logging(default_level: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));
    tracing::subscriber::set_global_default(
        tracing_subscriber::FmtSubscriber::builder()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .finish(),
    )
    .ok();
}
