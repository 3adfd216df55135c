use serde::{Deserialize, Serialize};

/// A point in the (lambda, delta, psi) feature space fed to the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeaturePoint {
    pub lambda: f64,
    pub delta: f64,
    pub psi: f64,
}

impl FeaturePoint {
    #[must_use]
    pub fn new(lambda: f64, delta: f64, psi: f64) -> Self {
        Self { lambda, delta, psi }
    }

    #[must_use]
    pub fn origin() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    /// Euclidean distance from the origin.
    #[must_use]
    pub fn norm(&self) -> f64 {
        self.distance(&Self::origin())
    }

    #[must_use]
    pub fn distance(&self, other: &FeaturePoint) -> f64 {
        let dl = self.lambda - other.lambda;
        let dd = self.delta - other.delta;
        let dp = self.psi - other.psi;
        (dl * dl + dd * dd + dp * dp).sqrt()
    }

    /// Running mean update: `(self * count + point) / (count + 1)`.
    #[must_use]
    pub fn blend(&self, point: &FeaturePoint, count: usize) -> Self {
        let n = count as f64;
        let denom = n + 1.0;
        Self {
            lambda: (self.lambda * n + point.lambda) / denom,
            delta: (self.delta * n + point.delta) / denom,
            psi: (self.psi * n + point.psi) / denom,
        }
    }
}
