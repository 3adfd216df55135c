//! Gaussian sampling on top of any `rand::Rng`.

use rand::Rng;

/// Standard normal sample via the Box-Muller transform.
///
/// Consumes exactly two uniform draws per call, so the number of draws a
/// component makes is a pure function of how many samples it asks for.
pub fn standard_normal<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    let u1: f64 = rng.gen::<f64>().max(f64::MIN_POSITIVE);
    let u2: f64 = rng.gen();
    (-2.0 * u1.ln()).sqrt() * (std::f64::consts::TAU * u2).cos()
}

/// Sample from Gaussian(mean, std).
pub fn gaussian<R: Rng + ?Sized>(rng: &mut R, mean: f64, std: f64) -> f64 {
    mean + std * standard_normal(rng)
}

/// `n` independent Gaussian(0, std) samples.
pub fn gaussian_vec<R: Rng + ?Sized>(rng: &mut R, n: usize, std: f64) -> Vec<f64> {
    (0..n).map(|_| gaussian(rng, 0.0, std)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_sample_moments() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let samples = gaussian_vec(&mut rng, 20_000, 2.0);
        let mean = samples.iter().sum::<f64>() / samples.len() as f64;
        let var = samples.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / samples.len() as f64;
        assert!(mean.abs() < 0.1, "mean {mean}");
        assert!((var.sqrt() - 2.0).abs() < 0.1, "std {}", var.sqrt());
    }

    #[test]
    fn test_zero_std_returns_mean() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        for _ in 0..10 {
            assert_eq!(gaussian(&mut rng, 0.5, 0.0), 0.5);
        }
    }

    #[test]
    fn test_same_seed_same_stream() {
        let mut a = ChaCha8Rng::seed_from_u64(99);
        let mut b = ChaCha8Rng::seed_from_u64(99);
        assert_eq!(gaussian_vec(&mut a, 16, 1.0), gaussian_vec(&mut b, 16, 1.0));
    }
}
