//! Headless run driver: load a config, apply overrides, run, persist.

use anyhow::{Context, Result};
use nob_core::config::AppConfig;
use nob_core::simulation::Simulation;
use nob_data::TrajectoryLog;
use std::path::{Path, PathBuf};

/// Command-line values that take precedence over the config file.
#[derive(Debug, Clone, Default)]
pub struct RunOverrides {
    pub output: Option<PathBuf>,
    pub seed: Option<u64>,
    pub steps: Option<usize>,
}

impl RunOverrides {
    pub fn apply(&self, config: &mut AppConfig) {
        if let Some(output) = &self.output {
            config.output.path = output.to_string_lossy().into_owned();
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if let Some(steps) = self.steps {
            config.simulation.steps = steps;
        }
    }
}

/// What a finished run produced.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub log: TrajectoryLog,
    pub output: PathBuf,
    pub fingerprint: String,
}

pub fn load_config(path: &Path) -> Result<AppConfig> {
    AppConfig::load(path).with_context(|| format!("loading config from {}", path.display()))
}

/// Runs `config` to completion and writes the trajectory log.
pub fn execute(config: AppConfig) -> Result<RunReport> {
    let output = PathBuf::from(&config.output.path);
    let pretty = config.output.pretty;
    let fingerprint = config.fingerprint();

    let mut sim = Simulation::new(config).context("building simulation")?;
    sim.run().context("running simulation")?;
    let log = sim.into_log();

    nob_io::write_trajectory(&log, &output, pretty)
        .with_context(|| format!("writing trajectory to {}", output.display()))?;
    tracing::info!(
        entries = log.len(),
        output = %output.display(),
        fingerprint = %fingerprint,
        "Trajectory saved"
    );

    Ok(RunReport {
        log,
        output,
        fingerprint,
    })
}

/// [`load_config`], [`RunOverrides::apply`], then [`execute`].
pub fn run_from_file(path: &Path, overrides: &RunOverrides) -> Result<RunReport> {
    let mut config = load_config(path)?;
    overrides.apply(&mut config);
    config.validate().context("validating overridden config")?;
    execute(config)
}
