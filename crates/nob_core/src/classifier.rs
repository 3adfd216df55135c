//! Online geometric classifier over (lambda, delta, psi) feature points.
//!
//! Single pass and insertion-order dependent: each point either joins the
//! nearest cluster (if within the current bandwidth) or starts a new one.
//! Labels come from ranking every cluster by its distance from the origin,
//! so the label a cluster maps to can change as other clusters appear. Only
//! the label computed for the arriving point is returned; history is never
//! relabeled.
//!
//! Each call scans every cluster twice (nearest search and ranking), so the
//! cost grows with the cluster count. Neither history nor clusters are
//! bounded.

use crate::config::ClassifierConfig;
use crate::error::{ensure_config, Result};
use nob_data::{FeaturePoint, Label};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Running centroid plus member count.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SymbolicCluster {
    pub center: FeaturePoint,
    pub count: usize,
}

/// A classified point as it was labeled at arrival.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedPoint {
    pub point: FeaturePoint,
    pub label: Label,
    pub cluster: usize,
}

#[derive(Debug, Clone)]
pub struct GeometryClassifier {
    clusters: Vec<SymbolicCluster>,
    history: Vec<ClassifiedPoint>,
    default_bandwidth: f64,
    min_bandwidth: f64,
    cluster_warning: usize,
    warned: bool,
}

impl Default for GeometryClassifier {
    fn default() -> Self {
        let config = ClassifierConfig::default();
        Self {
            clusters: Vec::new(),
            history: Vec::new(),
            default_bandwidth: config.default_bandwidth,
            min_bandwidth: config.min_bandwidth,
            cluster_warning: config.cluster_warning,
            warned: false,
        }
    }
}

impl GeometryClassifier {
    pub fn new(config: &ClassifierConfig) -> Result<Self> {
        ensure_config(
            config.default_bandwidth.is_finite() && config.default_bandwidth > 0.0,
            "classifier.default_bandwidth must be positive",
        )?;
        ensure_config(
            config.min_bandwidth.is_finite() && config.min_bandwidth > 0.0,
            "classifier.min_bandwidth must be positive",
        )?;
        Ok(Self {
            default_bandwidth: config.default_bandwidth,
            min_bandwidth: config.min_bandwidth,
            cluster_warning: config.cluster_warning,
            ..Self::default()
        })
    }

    /// Attach radius: the default below two clusters, otherwise the mean
    /// pairwise center distance floored at `min_bandwidth`.
    #[must_use]
    pub fn bandwidth(&self) -> f64 {
        if self.clusters.len() < 2 {
            return self.default_bandwidth;
        }
        let mut total = 0.0;
        let mut pairs = 0usize;
        for (i, a) in self.clusters.iter().enumerate() {
            for b in &self.clusters[i + 1..] {
                total += a.center.distance(&b.center);
                pairs += 1;
            }
        }
        (total / pairs as f64).max(self.min_bandwidth)
    }

    pub fn classify_state(&mut self, lambda: f64, delta: f64, psi: f64) -> Label {
        self.classify(FeaturePoint::new(lambda, delta, psi))
    }

    pub fn classify(&mut self, point: FeaturePoint) -> Label {
        let bandwidth = self.bandwidth();

        let nearest = self
            .clusters
            .iter()
            .enumerate()
            .map(|(i, c)| (i, c.center.distance(&point)))
            .min_by(|a, b| a.1.total_cmp(&b.1));

        let cluster = match nearest {
            Some((i, dist)) if dist <= bandwidth => {
                let c = &mut self.clusters[i];
                c.center = c.center.blend(&point, c.count);
                c.count += 1;
                i
            }
            _ => {
                self.clusters.push(SymbolicCluster {
                    center: point,
                    count: 1,
                });
                self.clusters.len() - 1
            }
        };

        if !self.warned && self.clusters.len() > self.cluster_warning {
            self.warned = true;
            tracing::warn!(
                clusters = self.clusters.len(),
                history = self.history.len(),
                "Classifier cluster count is growing without bound"
            );
        }

        let label = Label::from_rank(self.rank_of(cluster));
        self.history.push(ClassifiedPoint {
            point,
            label,
            cluster,
        });
        label
    }

    /// The label cluster `index` would receive if ranked right now, or
    /// `None` when no such cluster exists.
    ///
    /// Ranking is by distance from the origin; ties keep insertion order.
    #[must_use]
    pub fn implied_label(&self, index: usize) -> Option<Label> {
        (index < self.clusters.len()).then(|| Label::from_rank(self.rank_of(index)))
    }

    /// Number of clusters ranked ahead of `index`. `index` must be in range.
    fn rank_of(&self, index: usize) -> usize {
        let radius = self.clusters[index].center.norm();
        self.clusters
            .iter()
            .enumerate()
            .filter(|&(i, c)| match c.center.norm().total_cmp(&radius) {
                Ordering::Less => true,
                Ordering::Equal => i < index,
                Ordering::Greater => false,
            })
            .count()
    }

    #[must_use]
    pub fn clusters(&self) -> &[SymbolicCluster] {
        &self.clusters
    }

    #[must_use]
    pub fn history(&self) -> &[ClassifiedPoint] {
        &self.history
    }
}
