//! Error types for the simulation core.

use thiserror::Error;

/// Errors raised while building or stepping a simulation.
///
/// None of these are retried: any error aborts the current run.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimError {
    /// Invalid or missing configuration, raised before any step runs.
    #[error("Config error: {0}")]
    Config(String),

    /// Drive vector length does not match the network size.
    #[error("Dimension error: expected {expected} values, got {actual}")]
    Dimension { expected: usize, actual: usize },

    /// Attractor state went non-finite.
    #[error("Divergence: unit {unit} became non-finite after timestep {timestep}")]
    Divergence { unit: usize, timestep: usize },

    /// A step was requested after the configured step count was reached.
    #[error("Run complete: all {steps} steps already taken")]
    RunComplete { steps: usize },
}

/// Result type alias for simulation operations.
pub type Result<T> = std::result::Result<T, SimError>;

impl SimError {
    /// Creates a new configuration error.
    #[must_use]
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }

    /// Creates a new dimension error.
    #[must_use]
    pub fn dimension(expected: usize, actual: usize) -> Self {
        Self::Dimension { expected, actual }
    }
}

/// Returns a [`SimError::Config`] unless `cond` holds.
pub(crate) fn ensure_config(cond: bool, msg: &str) -> Result<()> {
    if cond {
        Ok(())
    } else {
        Err(SimError::config(msg))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SimError::dimension(4, 3);
        assert_eq!(
            err.to_string(),
            "Dimension error: expected 4 values, got 3"
        );
        let err = SimError::config("neural.size is required");
        assert!(err.to_string().contains("neural.size"));
    }

    #[test]
    fn test_ensure_config() {
        assert!(ensure_config(true, "unused").is_ok());
        assert_eq!(
            ensure_config(false, "bad"),
            Err(SimError::Config("bad".to_string()))
        );
    }
}
