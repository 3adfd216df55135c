use serde::{Deserialize, Serialize};

/// Output of one attractor run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttractorSummary {
    /// Initial state followed by one state per timestep.
    pub trajectory: Vec<Vec<f64>>,
    pub final_state: Vec<f64>,
    pub stability: f64,
    pub synchrony: f64,
}
