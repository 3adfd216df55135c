use super::feature::FeaturePoint;
use super::label::Label;
use super::structural::StructuralMetrics;
use serde::{Deserialize, Serialize};

/// One record of the trajectory log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub step: u64,
    pub lambda: f64,
    pub delta: f64,
    pub psi: f64,
    pub label: Label,
    pub stability: f64,
    pub synchrony: f64,
    pub structural_metrics: StructuralMetrics,
}

impl LogEntry {
    #[must_use]
    pub fn feature_point(&self) -> FeaturePoint {
        FeaturePoint::new(self.lambda, self.delta, self.psi)
    }

    /// Field-wise equality with an absolute tolerance on the reals.
    #[must_use]
    pub fn approx_eq(&self, other: &LogEntry, tol: f64) -> bool {
        let close = |a: f64, b: f64| (a - b).abs() <= tol;
        self.step == other.step
            && self.label == other.label
            && close(self.lambda, other.lambda)
            && close(self.delta, other.delta)
            && close(self.psi, other.psi)
            && close(self.stability, other.stability)
            && close(self.synchrony, other.synchrony)
            && close(
                self.structural_metrics.avg_degree,
                other.structural_metrics.avg_degree,
            )
            && close(
                self.structural_metrics.clustering,
                other.structural_metrics.clustering,
            )
            && self.structural_metrics.edge_count == other.structural_metrics.edge_count
            && self.structural_metrics.node_count == other.structural_metrics.node_count
    }
}

/// Append-only sequence of log entries; the serialized run document.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TrajectoryLog {
    trajectory: Vec<LogEntry>,
}

impl TrajectoryLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            trajectory: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, entry: LogEntry) {
        self.trajectory.push(entry);
    }

    #[must_use]
    pub fn entries(&self) -> &[LogEntry] {
        &self.trajectory
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.trajectory.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.trajectory.is_empty()
    }

    #[must_use]
    pub fn last(&self) -> Option<&LogEntry> {
        self.trajectory.last()
    }

    #[must_use]
    pub fn approx_eq(&self, other: &TrajectoryLog, tol: f64) -> bool {
        self.len() == other.len()
            && self
                .trajectory
                .iter()
                .zip(other.trajectory.iter())
                .all(|(a, b)| a.approx_eq(b, tol))
    }
}

impl From<Vec<LogEntry>> for TrajectoryLog {
    fn from(trajectory: Vec<LogEntry>) -> Self {
        Self { trajectory }
    }
}
