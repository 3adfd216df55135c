pub mod macros;

use nob_core::config::AppConfig;
use nob_core::simulation::Simulation;
use std::path::PathBuf;

#[allow(dead_code)]
pub struct SimulationBuilder {
    config: AppConfig,
}

#[allow(dead_code)]
impl SimulationBuilder {
    /// Small network, short runs, no progress logging.
    pub fn new() -> Self {
        let mut config = AppConfig::default();
        config.neural.size = Some(8);
        config.neural.timesteps = 10;
        config.simulation.steps = 20;
        config.simulation.log_interval = 0;
        Self { config }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.config.seed = seed;
        self
    }

    pub fn with_size(mut self, size: usize) -> Self {
        self.config.neural.size = Some(size);
        self
    }

    pub fn with_steps(mut self, steps: usize) -> Self {
        self.config.simulation.steps = steps;
        self
    }

    pub fn with_timesteps(mut self, timesteps: usize) -> Self {
        self.config.neural.timesteps = timesteps;
        self
    }

    pub fn with_environment(mut self, moisture: f64, nutrients: f64, light: f64) -> Self {
        self.config.structural.moisture = moisture;
        self.config.structural.nutrients = nutrients;
        self.config.structural.light = light;
        self
    }

    pub fn with_shock(mut self, micro_shock: f64, rewire_prob: f64) -> Self {
        self.config.structural.micro_shock = micro_shock;
        self.config.structural.rewire_prob = rewire_prob;
        self
    }

    pub fn with_config<F>(mut self, modifier: F) -> Self
    where
        F: FnOnce(&mut AppConfig),
    {
        modifier(&mut self.config);
        self
    }

    pub fn config(self) -> AppConfig {
        self.config
    }

    pub fn build(self) -> Simulation {
        Simulation::new(self.config).expect("Failed to create simulation in test builder")
    }
}

/// Per-process scratch path under the system temp dir.
#[allow(dead_code)]
pub fn scratch_path(name: &str) -> PathBuf {
    std::env::temp_dir()
        .join(format!("nob_universe_tests_{}", std::process::id()))
        .join(name)
}
