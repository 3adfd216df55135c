//! Closed-loop orchestration of attractor, structure and classifier.
//!
//! Each step runs strictly in order:
//!
//! 1. run the attractor under the current drive
//! 2. feed stability/synchrony to the structural graph
//! 3. rescale the attractor's recurrence by the connectivity scale
//! 4. build the feature point and classify it
//! 5. append a log entry
//! 6. derive the next drive from the final attractor state
//!
//! Step N+1 depends on step N's feedback and final state, so nothing here
//! runs in parallel.

use crate::attractor::AttractorNetwork;
use crate::classifier::GeometryClassifier;
use crate::config::AppConfig;
use crate::error::{Result, SimError};
use crate::metrics::RunMetrics;
use crate::noise::gaussian;
use crate::structural::StructuralGraph;
use nob_data::{
    AttractorSummary, FeaturePoint, LogEntry, StructuralState, StructuralSummary, TrajectoryLog,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::time::Instant;

/// Offsets mixed into the run seed so every component gets its own stream.
const STRUCTURAL_SEED_OFFSET: u64 = 0x5EED_0001;
const DRIVE_SEED_OFFSET: u64 = 0x5EED_0002;
/// How much of the final attractor state carries into the next drive.
pub const DRIVE_CARRY: f64 = 0.8;

/// Maps one step's outputs onto the classifier's feature space.
///
/// lambda is synchrony, delta is the structural delta, psi is stability.
#[must_use]
pub fn derive_feature_point(
    attractor: &AttractorSummary,
    structural: &StructuralState,
) -> FeaturePoint {
    FeaturePoint::new(
        attractor.synchrony,
        structural.structural_delta as f64,
        attractor.stability,
    )
}

pub struct Simulation {
    config: AppConfig,
    network: AttractorNetwork,
    structure: StructuralGraph,
    classifier: GeometryClassifier,
    rng: ChaCha8Rng,
    drive: Vec<f64>,
    step: u64,
    log: TrajectoryLog,
    metrics: RunMetrics,
}

impl Simulation {
    /// Validates `config` and builds every component from it.
    pub fn new(config: AppConfig) -> Result<Self> {
        config.validate()?;
        let size = config.network_size()?;
        let seed = config.seed;

        let network = AttractorNetwork::from_config(&config.neural, seed)?;
        let structure = StructuralGraph::new(
            &config.structural,
            seed.wrapping_add(STRUCTURAL_SEED_OFFSET),
        )?;
        let classifier = GeometryClassifier::new(&config.classifier)?;
        let mut rng = ChaCha8Rng::seed_from_u64(seed.wrapping_add(DRIVE_SEED_OFFSET));
        let drive = (0..size)
            .map(|_| gaussian(&mut rng, 0.0, config.simulation.input_scale))
            .collect();

        tracing::info!(
            seed,
            size,
            steps = config.simulation.steps,
            timesteps = config.neural.timesteps,
            fingerprint = %config.fingerprint(),
            "Simulation initialized"
        );

        Ok(Self {
            log: TrajectoryLog::with_capacity(config.simulation.steps),
            metrics: RunMetrics::new(config.simulation.log_interval),
            config,
            network,
            structure,
            classifier,
            rng,
            drive,
            step: 0,
        })
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.step as usize >= self.config.simulation.steps
    }

    /// Runs one step with the internally derived drive.
    pub fn step(&mut self) -> Result<LogEntry> {
        let drive = self.drive.clone();
        self.advance(&drive)
    }

    /// Runs one step with an externally supplied drive of length `size`.
    pub fn step_with_drive(&mut self, drive: &[f64]) -> Result<LogEntry> {
        self.metrics.increment_counter("external_drive");
        self.advance(drive)
    }

    /// Pushes `payload` as the drive for the next step, then lets the loop
    /// feed itself for the remaining `steps - 1`. Returns the new entries.
    pub fn run_payload(&mut self, payload: &[f64], steps: usize) -> Result<Vec<LogEntry>> {
        let mut entries = Vec::with_capacity(steps);
        if steps == 0 {
            return Ok(entries);
        }
        entries.push(self.step_with_drive(payload)?);
        for _ in 1..steps {
            entries.push(self.step()?);
        }
        Ok(entries)
    }

    /// Steps until the configured step count is reached.
    pub fn run(&mut self) -> Result<&TrajectoryLog> {
        while !self.is_finished() {
            self.step()?;
        }
        self.metrics.log_summary();
        Ok(&self.log)
    }

    fn advance(&mut self, drive: &[f64]) -> Result<LogEntry> {
        if self.is_finished() {
            return Err(SimError::RunComplete {
                steps: self.config.simulation.steps,
            });
        }
        let started = Instant::now();

        let attractor = self.network.run(drive, self.config.neural.timesteps)?;
        let structural = self.structure.update_structure(StructuralSummary {
            stability: attractor.stability,
            synchrony: attractor.synchrony,
        });
        self.network.adjust_recurrence(structural.connectivity_scale);

        let point = derive_feature_point(&attractor, &structural);
        let label = self.classifier.classify(point);

        let entry = LogEntry {
            step: self.step,
            lambda: point.lambda,
            delta: point.delta,
            psi: point.psi,
            label,
            stability: attractor.stability,
            synchrony: attractor.synchrony,
            structural_metrics: structural.metrics,
        };
        self.log.push(entry.clone());

        self.drive = self.next_drive(&attractor.final_state);
        self.step += 1;

        self.metrics
            .record_step(started.elapsed(), label, structural.events);
        tracing::debug!(
            step = entry.step,
            label = %label,
            stability = entry.stability,
            synchrony = entry.synchrony,
            structural_delta = structural.structural_delta,
            connectivity_scale = structural.connectivity_scale,
            "Step complete"
        );

        Ok(entry)
    }

    /// `0.8 * final + Gaussian(0, input_scale) + Gaussian(0, input_drift)`.
    fn next_drive(&mut self, final_state: &[f64]) -> Vec<f64> {
        let scale = self.config.simulation.input_scale;
        let drift = self.config.simulation.input_drift;
        final_state
            .iter()
            .map(|x| {
                let jitter = gaussian(&mut self.rng, 0.0, scale);
                let wander = gaussian(&mut self.rng, 0.0, drift);
                DRIVE_CARRY * x + jitter + wander
            })
            .collect()
    }

    #[must_use]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    #[must_use]
    pub fn log(&self) -> &TrajectoryLog {
        &self.log
    }

    /// Consumes the simulation, keeping only its log.
    #[must_use]
    pub fn into_log(self) -> TrajectoryLog {
        self.log
    }

    #[must_use]
    pub fn metrics(&self) -> &RunMetrics {
        &self.metrics
    }

    #[must_use]
    pub fn network(&self) -> &AttractorNetwork {
        &self.network
    }

    #[must_use]
    pub fn structure(&self) -> &StructuralGraph {
        &self.structure
    }

    #[must_use]
    pub fn classifier(&self) -> &GeometryClassifier {
        &self.classifier
    }

    /// Copy of the drive the next [`step`](Self::step) will use.
    #[must_use]
    pub fn pending_drive(&self) -> Vec<f64> {
        self.drive.clone()
    }

    #[must_use]
    pub fn steps_taken(&self) -> u64 {
        self.step
    }
}
