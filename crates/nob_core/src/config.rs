//! Configuration management for simulation runs.
//!
//! The configuration document is read once at startup, validated, and then
//! handed to each component's constructor. It maps to `config.toml` (or a
//! JSON document with the same shape).
//!
//! ## Configuration Hierarchy
//!
//! 1. Component defaults (the `Default` impls below)
//! 2. The config file (overrides defaults field by field)
//! 3. Command-line overrides applied by the runner
//!
//! ## Example `config.toml`
//!
//! ```toml
//! seed = 42
//!
//! [neural]
//! size = 48
//! leak = 0.9
//! timesteps = 20
//!
//! [structural]
//! moisture = 0.5
//! rewire_prob = 0.05
//!
//! [simulation]
//! steps = 100
//! ```
//!
//! `neural.size` has no file-level default: leaving it out is a config error.

use crate::error::{ensure_config, Result, SimError};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Attractor network parameters.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct NeuralConfig {
    #[serde(default)]
    pub size: Option<usize>,
    pub leak: f64,
    pub noise: f64,
    pub recurrent_scale: f64,
    pub timesteps: usize,
}

impl Default for NeuralConfig {
    fn default() -> Self {
        Self {
            size: Some(48),
            leak: 0.9,
            noise: 0.01,
            recurrent_scale: 1.0,
            timesteps: 20,
        }
    }
}

/// Environmental parameters of the structural adaptation graph.
///
/// `moisture`, `nutrients` and `light` double as event probabilities, so all
/// of them live in [0, 1].
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct StructuralConfig {
    pub moisture: f64,
    pub nutrients: f64,
    pub light: f64,
    pub micro_shock: f64,
    pub rewire_prob: f64,
    /// Std of the Gaussian jitter on a new node's resource attribute.
    pub resource_jitter: f64,
    /// Branching only happens while stability is below this.
    pub branch_stability_gate: f64,
    /// Fusion only happens while synchrony is above this.
    pub fuse_synchrony_gate: f64,
}

impl Default for StructuralConfig {
    fn default() -> Self {
        Self {
            moisture: 0.5,
            nutrients: 0.5,
            light: 0.5,
            micro_shock: 0.1,
            rewire_prob: 0.05,
            resource_jitter: 0.05,
            branch_stability_gate: 0.8,
            fuse_synchrony_gate: 0.3,
        }
    }
}

/// Outer loop parameters.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct SimulationConfig {
    pub steps: usize,
    pub input_scale: f64,
    pub input_drift: f64,
    /// Progress is logged every this many steps; 0 disables it.
    pub log_interval: usize,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            steps: 100,
            input_scale: 0.5,
            input_drift: 0.05,
            log_interval: 25,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Bandwidth used while fewer than two clusters exist.
    pub default_bandwidth: f64,
    /// Floor applied to the mean inter-center distance.
    pub min_bandwidth: f64,
    /// Cluster count above which a scalability warning is logged.
    pub cluster_warning: usize,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            default_bandwidth: 0.4,
            min_bandwidth: 0.2,
            cluster_warning: 256,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct OutputConfig {
    pub path: String,
    pub pretty: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: "data/run_logs.json".to_string(),
            pretty: true,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct AppConfig {
    #[serde(default = "default_seed")]
    pub seed: u64,
    pub neural: NeuralConfig,
    #[serde(default)]
    pub structural: StructuralConfig,
    #[serde(default)]
    pub simulation: SimulationConfig,
    #[serde(default)]
    pub classifier: ClassifierConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

fn default_seed() -> u64 {
    42
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            seed: default_seed(),
            neural: NeuralConfig::default(),
            structural: StructuralConfig::default(),
            simulation: SimulationConfig::default(),
            classifier: ClassifierConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

fn unit_interval(value: f64) -> bool {
    value.is_finite() && (0.0..=1.0).contains(&value)
}

fn non_negative(value: f64) -> bool {
    value.is_finite() && value >= 0.0
}

fn positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

impl AppConfig {
    /// Network size, or a config error if it was never set.
    pub fn network_size(&self) -> Result<usize> {
        match self.neural.size {
            Some(size) if size >= 1 => Ok(size),
            Some(size) => Err(SimError::config(format!(
                "neural.size must be at least 1 (got {size})"
            ))),
            None => Err(SimError::config("neural.size is required")),
        }
    }

    /// Validates all configuration parameters.
    ///
    /// # Validation Rules
    /// - `neural.size` present and at least 1
    /// - leak and noise non-negative, recurrent scale positive
    /// - environmental probabilities in [0.0, 1.0]
    /// - input scale and drift non-negative
    /// - classifier bandwidths positive
    /// - every real finite
    pub fn validate(&self) -> Result<()> {
        self.network_size()?;

        // Neural validation
        ensure_config(non_negative(self.neural.leak), "neural.leak must be non-negative")?;
        ensure_config(
            non_negative(self.neural.noise),
            "neural.noise must be non-negative",
        )?;
        ensure_config(
            positive(self.neural.recurrent_scale),
            "neural.recurrent_scale must be positive",
        )?;

        // Structural validation
        let s = &self.structural;
        ensure_config(unit_interval(s.moisture), "structural.moisture must be in [0.0, 1.0]")?;
        ensure_config(
            unit_interval(s.nutrients),
            "structural.nutrients must be in [0.0, 1.0]",
        )?;
        ensure_config(unit_interval(s.light), "structural.light must be in [0.0, 1.0]")?;
        ensure_config(
            unit_interval(s.micro_shock),
            "structural.micro_shock must be in [0.0, 1.0]",
        )?;
        ensure_config(
            unit_interval(s.rewire_prob),
            "structural.rewire_prob must be in [0.0, 1.0]",
        )?;
        ensure_config(
            non_negative(s.resource_jitter),
            "structural.resource_jitter must be non-negative",
        )?;
        ensure_config(
            s.branch_stability_gate.is_finite() && s.fuse_synchrony_gate.is_finite(),
            "structural gates must be finite",
        )?;

        // Simulation validation
        ensure_config(
            non_negative(self.simulation.input_scale),
            "simulation.input_scale must be non-negative",
        )?;
        ensure_config(
            non_negative(self.simulation.input_drift),
            "simulation.input_drift must be non-negative",
        )?;

        // Classifier validation
        ensure_config(
            positive(self.classifier.default_bandwidth),
            "classifier.default_bandwidth must be positive",
        )?;
        ensure_config(
            positive(self.classifier.min_bandwidth),
            "classifier.min_bandwidth must be positive",
        )?;

        ensure_config(!self.output.path.is_empty(), "output.path must not be empty")?;

        Ok(())
    }

    /// Parses and validates a TOML document.
    pub fn from_toml(content: &str) -> Result<Self> {
        let config = toml::from_str::<Self>(content)
            .map_err(|e| SimError::config(format!("invalid TOML: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Parses and validates a JSON document.
    pub fn from_json(content: &str) -> Result<Self> {
        let config = serde_json::from_str::<Self>(content)
            .map_err(|e| SimError::config(format!("invalid JSON: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads a config file, picking the format from the extension.
    ///
    /// `.json` files are parsed as JSON, everything else as TOML.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            SimError::config(format!("cannot read {}: {e}", path.display()))
        })?;
        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json {
            Self::from_json(&content)
        } else {
            Self::from_toml(&content)
        }
    }

    /// SHA-256 over every section that influences the trajectory.
    #[must_use]
    pub fn fingerprint(&self) -> String {
        use sha2::{Digest, Sha256};
        let mut hasher = Sha256::new();
        hasher.update(self.seed.to_le_bytes());
        hasher.update(format!("{:?}", self.neural).as_bytes());
        hasher.update(format!("{:?}", self.structural).as_bytes());
        hasher.update(format!("{:?}", self.simulation).as_bytes());
        hasher.update(format!("{:?}", self.classifier).as_bytes());
        hex::encode(hasher.finalize())
    }
}
