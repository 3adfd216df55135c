//! Recurrent attractor network.
//!
//! A fixed-size state vector evolves under
//!
//! ```text
//! x' = (1 - leak) * x + drive + W · tanh(x) + bias + noise
//! ```
//!
//! where `W` is an approximately symmetric random matrix and the noise is
//! drawn fresh per unit per step. The network owns its state between runs:
//! each [`AttractorNetwork::run`] continues from where the previous one ended.

use crate::config::NeuralConfig;
use crate::error::{ensure_config, Result, SimError};
use crate::noise::{gaussian, gaussian_vec};
use nob_data::AttractorSummary;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Std of the raw Gaussian weight samples before scaling.
pub const WEIGHT_STD: f64 = 0.4;
/// Std of the per-unit bias.
pub const BIAS_STD: f64 = 0.1;
/// Variance below which a unit counts as constant for correlation.
const VARIANCE_EPS: f64 = 1e-12;

pub struct AttractorNetwork {
    size: usize,
    leak: f64,
    noise_level: f64,
    recurrent_scale: f64,
    /// Row-major `size × size`.
    weights: Vec<f64>,
    bias: Vec<f64>,
    state: Vec<f64>,
    rng: ChaCha8Rng,
}

impl AttractorNetwork {
    /// Builds the weight matrix and bias from `seed`.
    ///
    /// Weights are Gaussian(0, 0.4) scaled by `recurrent_scale / sqrt(size)`,
    /// then each off-diagonal pair is replaced by its mean. The state starts
    /// at zero.
    pub fn initialize(
        size: usize,
        leak: f64,
        noise_level: f64,
        recurrent_scale: f64,
        seed: u64,
    ) -> Result<Self> {
        ensure_config(size >= 1, "network size must be at least 1")?;
        ensure_config(leak.is_finite() && leak >= 0.0, "leak must be non-negative")?;
        ensure_config(
            noise_level.is_finite() && noise_level >= 0.0,
            "noise level must be non-negative",
        )?;
        ensure_config(
            recurrent_scale.is_finite() && recurrent_scale > 0.0,
            "recurrent scale must be positive",
        )?;

        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let scale = recurrent_scale / (size as f64).sqrt();
        let mut weights: Vec<f64> = (0..size * size)
            .map(|_| gaussian(&mut rng, 0.0, WEIGHT_STD) * scale)
            .collect();
        for i in 0..size {
            for j in (i + 1)..size {
                let mean = (weights[i * size + j] + weights[j * size + i]) / 2.0;
                weights[i * size + j] = mean;
                weights[j * size + i] = mean;
            }
        }
        let bias = gaussian_vec(&mut rng, size, BIAS_STD);

        Ok(Self {
            size,
            leak,
            noise_level,
            recurrent_scale,
            weights,
            bias,
            state: vec![0.0; size],
            rng,
        })
    }

    pub fn from_config(config: &NeuralConfig, seed: u64) -> Result<Self> {
        let size = config
            .size
            .ok_or_else(|| SimError::config("neural.size is required"))?;
        Self::initialize(
            size,
            config.leak,
            config.noise,
            config.recurrent_scale,
            seed,
        )
    }

    #[must_use]
    pub fn size(&self) -> usize {
        self.size
    }

    #[must_use]
    pub fn recurrent_scale(&self) -> f64 {
        self.recurrent_scale
    }

    /// Copy of the current network state.
    #[must_use]
    pub fn state(&self) -> Vec<f64> {
        self.state.clone()
    }

    #[must_use]
    pub fn weight(&self, i: usize, j: usize) -> f64 {
        self.weights[i * self.size + j]
    }

    #[must_use]
    pub fn bias(&self) -> &[f64] {
        &self.bias
    }

    fn check_len(&self, v: &[f64]) -> Result<()> {
        if v.len() == self.size {
            Ok(())
        } else {
            Err(SimError::dimension(self.size, v.len()))
        }
    }

    /// One update of `state` under `drive`. Advances the noise generator by
    /// one draw per unit.
    pub fn step(&mut self, state: &[f64], drive: &[f64]) -> Result<Vec<f64>> {
        self.check_len(state)?;
        self.check_len(drive)?;

        let activated: Vec<f64> = state.iter().map(|x| x.tanh()).collect();
        let mut next = Vec::with_capacity(self.size);
        for i in 0..self.size {
            let row = &self.weights[i * self.size..(i + 1) * self.size];
            let recurrent: f64 = row.iter().zip(&activated).map(|(w, a)| w * a).sum();
            let noise = gaussian(&mut self.rng, 0.0, self.noise_level);
            next.push((1.0 - self.leak) * state[i] + drive[i] + recurrent + self.bias[i] + noise);
        }
        Ok(next)
    }

    /// Applies [`step`](Self::step) `timesteps` times under a constant drive.
    ///
    /// The returned trajectory holds the starting state followed by one
    /// entry per timestep. A non-finite value anywhere in the final state is
    /// reported as [`SimError::Divergence`] and the network state is left
    /// untouched.
    pub fn run(&mut self, input_vector: &[f64], timesteps: usize) -> Result<AttractorSummary> {
        self.check_len(input_vector)?;

        let mut trajectory = Vec::with_capacity(timesteps + 1);
        trajectory.push(self.state.clone());
        let mut current = self.state.clone();
        for t in 0..timesteps {
            current = self.step(&current, input_vector)?;
            if let Some(unit) = current.iter().position(|x| !x.is_finite()) {
                return Err(SimError::Divergence { unit, timestep: t });
            }
            trajectory.push(current.clone());
        }

        let stability = stability(&trajectory);
        let synchrony = synchrony(&trajectory);
        self.state = current.clone();

        Ok(AttractorSummary {
            trajectory,
            final_state: current,
            stability,
            synchrony,
        })
    }

    /// Rescales the whole weight matrix so its effective scale becomes
    /// `scale`. Non-positive scales are ignored.
    pub fn adjust_recurrence(&mut self, scale: f64) {
        if !scale.is_finite() || scale <= 0.0 {
            return;
        }
        let factor = scale / self.recurrent_scale;
        for w in &mut self.weights {
            *w *= factor;
        }
        self.recurrent_scale = scale;
    }
}

/// `exp(-‖x_T − x_{T-1}‖)`; 0 with fewer than two samples.
#[must_use]
pub fn stability(trajectory: &[Vec<f64>]) -> f64 {
    match trajectory {
        [.., prev, last] => {
            let dist = last
                .iter()
                .zip(prev)
                .map(|(a, b)| (a - b).powi(2))
                .sum::<f64>()
                .sqrt();
            (-dist).exp()
        }
        _ => 0.0,
    }
}

/// Mean absolute Pearson correlation over all unit pairs.
///
/// 0 with fewer than three samples. Pairs involving a constant unit are
/// skipped; if every pair is skipped the result is 0.
#[must_use]
pub fn synchrony(trajectory: &[Vec<f64>]) -> f64 {
    if trajectory.len() < 3 {
        return 0.0;
    }
    let units = trajectory[0].len();
    let samples = trajectory.len() as f64;

    let means: Vec<f64> = (0..units)
        .map(|u| trajectory.iter().map(|s| s[u]).sum::<f64>() / samples)
        .collect();
    let variances: Vec<f64> = (0..units)
        .map(|u| {
            trajectory
                .iter()
                .map(|s| (s[u] - means[u]).powi(2))
                .sum::<f64>()
                / samples
        })
        .collect();

    let mut total = 0.0;
    let mut pairs = 0usize;
    for i in 0..units {
        if variances[i] < VARIANCE_EPS {
            continue;
        }
        for j in (i + 1)..units {
            if variances[j] < VARIANCE_EPS {
                continue;
            }
            let cov = trajectory
                .iter()
                .map(|s| (s[i] - means[i]) * (s[j] - means[j]))
                .sum::<f64>()
                / samples;
            let r = cov / (variances[i].sqrt() * variances[j].sqrt());
            total += r.abs().min(1.0);
            pairs += 1;
        }
    }
    if pairs == 0 {
        0.0
    } else {
        total / pairs as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn network(size: usize) -> AttractorNetwork {
        AttractorNetwork::initialize(size, 0.1, 0.01, 1.0, 42).unwrap()
    }

    #[test]
    fn test_size_zero_is_config_error() {
        assert!(matches!(
            AttractorNetwork::initialize(0, 0.1, 0.01, 1.0, 1),
            Err(SimError::Config(_))
        ));
    }

    #[test]
    fn test_negative_leak_is_config_error() {
        assert!(AttractorNetwork::initialize(4, -0.5, 0.01, 1.0, 1).is_err());
        assert!(AttractorNetwork::initialize(4, 0.1, -0.01, 1.0, 1).is_err());
    }

    #[test]
    fn test_weights_symmetric() {
        let net = network(6);
        for i in 0..6 {
            for j in 0..6 {
                assert_eq!(net.weight(i, j), net.weight(j, i));
            }
        }
        assert_eq!(net.bias().len(), 6);
    }

    #[test]
    fn test_run_zero_timesteps() {
        let mut net = network(5);
        let summary = net.run(&[0.3; 5], 0).unwrap();
        assert_eq!(summary.trajectory.len(), 1);
        assert_eq!(summary.trajectory[0], vec![0.0; 5]);
        assert_eq!(summary.stability, 0.0);
        assert_eq!(summary.synchrony, 0.0);
        assert_eq!(summary.final_state, vec![0.0; 5]);
    }

    #[test]
    fn test_run_one_timestep_has_stability_but_no_synchrony() {
        let mut net = network(3);
        let summary = net.run(&[0.1; 3], 1).unwrap();
        assert_eq!(summary.trajectory.len(), 2);
        assert!(summary.stability > 0.0 && summary.stability <= 1.0);
        assert_eq!(summary.synchrony, 0.0);
    }

    #[test]
    fn test_dimension_mismatch() {
        let mut net = network(4);
        assert_eq!(
            net.run(&[0.0; 3], 5).unwrap_err(),
            SimError::Dimension {
                expected: 4,
                actual: 3
            }
        );
        assert!(net.step(&[0.0; 4], &[0.0; 5]).is_err());
    }

    #[test]
    fn test_state_persists_between_runs() {
        let mut net = network(4);
        let first = net.run(&[0.2; 4], 5).unwrap();
        assert_eq!(net.state(), first.final_state);
        let second = net.run(&[0.2; 4], 3).unwrap();
        assert_eq!(second.trajectory[0], first.final_state);
    }

    #[test]
    fn test_step_matches_update_rule_without_noise() {
        let mut net = AttractorNetwork::initialize(3, 0.25, 0.0, 1.0, 9).unwrap();
        let state = vec![0.5, -0.2, 0.1];
        let drive = vec![0.1, 0.0, -0.3];
        let next = net.step(&state, &drive).unwrap();
        for i in 0..3 {
            let recurrent: f64 = (0..3).map(|j| net.weight(i, j) * state[j].tanh()).sum();
            let expected = 0.75 * state[i] + drive[i] + recurrent + net.bias()[i];
            assert!((next[i] - expected).abs() < 1e-12);
        }
    }

    #[test]
    fn test_adjust_recurrence_rescales_matrix() {
        let mut net = network(4);
        let before = net.weight(0, 1);
        net.adjust_recurrence(2.0);
        assert!((net.weight(0, 1) - 2.0 * before).abs() < 1e-12);
        assert_eq!(net.recurrent_scale(), 2.0);
        net.adjust_recurrence(1.0);
        assert!((net.weight(0, 1) - before).abs() < 1e-12);

        net.adjust_recurrence(0.0);
        net.adjust_recurrence(-3.0);
        assert_eq!(net.recurrent_scale(), 1.0);
    }

    #[test]
    fn test_same_seed_same_run() {
        let mut a = network(8);
        let mut b = network(8);
        assert_eq!(a.run(&[0.4; 8], 10).unwrap(), b.run(&[0.4; 8], 10).unwrap());
    }

    #[test]
    fn test_stability_of_still_trajectory_is_one() {
        let traj = vec![vec![1.0, 2.0], vec![1.0, 2.0]];
        assert_eq!(stability(&traj), 1.0);
        assert_eq!(stability(&traj[..1]), 0.0);
    }

    #[test]
    fn test_synchrony_of_locked_units() {
        let traj = vec![vec![0.0, 0.0, 5.0], vec![1.0, -2.0, 5.0], vec![2.0, -4.0, 5.0]];
        // Units 0 and 1 are perfectly anti-correlated; unit 2 is constant.
        assert!((synchrony(&traj) - 1.0).abs() < 1e-12);
        let flat = vec![vec![1.0, 1.0]; 4];
        assert_eq!(synchrony(&flat), 0.0);
    }

    #[test]
    fn test_divergence_is_reported() {
        let mut net = AttractorNetwork::initialize(2, 0.0, 0.0, 1.0, 3).unwrap();
        let err = net.run(&[f64::MAX, f64::MAX], 4).unwrap_err();
        assert!(matches!(err, SimError::Divergence { .. }));
        assert_eq!(net.state(), vec![0.0, 0.0]);
    }
}
