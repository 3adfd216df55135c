//! # Nob Core
//!
//! The closed-loop simulation engine: a recurrent attractor network, a slowly
//! adapting structural graph and an online geometric classifier, stepped
//! together by [`simulation::Simulation`].
//!
//! This crate contains:
//! - The attractor network and its stability/synchrony measures
//! - The structural graph (branch, fuse, rewire) behind a graph trait
//! - The symbolic classifier over (lambda, delta, psi) feature points
//! - Configuration, error types, metrics and structured logging
//!
//! Every random draw comes from a seeded ChaCha generator owned by the
//! component that uses it, so a run is reproducible from its configuration.
//!
//! ## Example
//!
//! ```
//! use nob_core::config::{AppConfig, NeuralConfig, SimulationConfig};
//! use nob_core::simulation::Simulation;
//!
//! let config = AppConfig {
//!     neural: NeuralConfig {
//!         size: Some(4),
//!         timesteps: 10,
//!         ..Default::default()
//!     },
//!     simulation: SimulationConfig {
//!         steps: 3,
//!         ..Default::default()
//!     },
//!     ..Default::default()
//! };
//! let mut sim = Simulation::new(config).unwrap();
//! let log = sim.run().unwrap();
//! assert_eq!(log.len(), 3);
//! ```

/// Recurrent attractor network and trajectory measures
pub mod attractor;
/// Online geometric classifier emitting NZ labels
pub mod classifier;
/// Configuration management for simulation parameters
pub mod config;
pub mod error;
/// Run metrics and logging setup
pub mod metrics;
pub mod noise;
/// Closed-loop orchestration
pub mod simulation;
/// Structural adaptation graph
pub mod structural;

pub use attractor::AttractorNetwork;
pub use classifier::GeometryClassifier;
pub use config::AppConfig;
pub use error::{Result, SimError};
pub use metrics::{init_logging, RunMetrics};
pub use simulation::Simulation;
pub use structural::{PetGraph, StructuralGraph, WeightedGraph};
