//! Slow structural adaptation layer.
//!
//! A small weighted graph grows and rewires in response to the attractor's
//! stability and synchrony, and reports a connectivity scale that is fed back
//! into the attractor's recurrence.
//!
//! Every update runs, in order: branch, fuse, rewire, jitter, then metrics.
//! The random draws happen in that same order, which is what makes a seeded
//! run reproducible.

pub mod graph;

pub use graph::{triple_scan_clustering, NodeId, PetGraph, WeightedGraph};

use crate::config::StructuralConfig;
use crate::error::{ensure_config, Result};
use crate::noise::gaussian;
use nob_data::{
    GraphSnapshot, StructuralEvents, StructuralMetrics, StructuralState, StructuralSummary,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Number of nodes in the seed cycle.
pub const SEED_CYCLE_LEN: usize = 4;
/// Edge weights never drop below this after jitter.
pub const MIN_EDGE_WEIGHT: f64 = 0.05;
const JITTER_STD: f64 = 0.02;
const JITTER_DRIFT: f64 = 0.05;

/// Owns the structural graph, its environment and its random generator.
pub struct StructuralGraph<G: WeightedGraph = PetGraph> {
    graph: G,
    config: StructuralConfig,
    rng: ChaCha8Rng,
}

impl StructuralGraph<PetGraph> {
    pub fn new(config: &StructuralConfig, seed: u64) -> Result<Self> {
        Self::with_graph(PetGraph::new(), config, seed)
    }
}

impl<G: WeightedGraph> StructuralGraph<G> {
    /// Seeds a 4-node cycle into `graph`, which must start empty.
    pub fn with_graph(graph: G, config: &StructuralConfig, seed: u64) -> Result<Self> {
        ensure_config(
            graph.node_count() == 0,
            "structural graph must start empty",
        )?;
        let mut this = Self {
            graph,
            config: config.clone(),
            rng: ChaCha8Rng::seed_from_u64(seed),
        };
        let ids: Vec<NodeId> = (0..SEED_CYCLE_LEN)
            .map(|_| {
                let resource = this.draw_resource();
                this.graph.add_node(resource)
            })
            .collect();
        for i in 0..ids.len() {
            this.graph.add_edge(ids[i], ids[(i + 1) % ids.len()], 1.0);
        }
        tracing::debug!(
            nodes = this.graph.node_count(),
            edges = this.graph.edge_count(),
            "Seeded structural graph"
        );
        Ok(this)
    }

    /// Mean of the environmental fields plus Gaussian jitter.
    fn draw_resource(&mut self) -> f64 {
        let base = (self.config.moisture + self.config.nutrients + self.config.light) / 3.0;
        gaussian(&mut self.rng, base, self.config.resource_jitter)
    }

    /// Runs one adaptation step and returns an independent snapshot.
    pub fn update_structure(&mut self, summary: StructuralSummary) -> StructuralState {
        let nodes_before = self.graph.node_count();
        let edges_before = self.graph.edge_count();
        let pre_existing: Vec<(NodeId, NodeId)> = self
            .graph
            .edges()
            .into_iter()
            .map(|(a, b, _)| (a, b))
            .collect();

        let mut events = StructuralEvents::default();

        if summary.stability < self.config.branch_stability_gate
            && self.rng.gen::<f64>() < self.config.moisture
            && self.branch().is_some()
        {
            events.branches += 1;
        }

        if summary.synchrony > self.config.fuse_synchrony_gate
            && self.graph.node_count() >= 3
            && self.rng.gen::<f64>() < self.config.nutrients
            && self.fuse()
        {
            events.fusions += 1;
        }

        events.rewires = self.rewire(&pre_existing);

        self.jitter(summary.synchrony);

        let nodes_after = self.graph.node_count();
        let edges_after = self.graph.edge_count();
        let structural_delta =
            edges_after.abs_diff(edges_before) + nodes_after.abs_diff(nodes_before);

        let metrics = self.metrics();
        let connectivity_scale = 1.0 + 0.1 * (metrics.avg_degree + metrics.clustering);

        tracing::trace!(
            branches = events.branches,
            fusions = events.fusions,
            rewires = events.rewires,
            structural_delta,
            connectivity_scale,
            "Structural update"
        );

        StructuralState {
            graph: self.graph.snapshot(),
            connectivity_scale,
            structural_delta,
            metrics,
            events,
        }
    }

    /// Adds a node joined by one edge to a random existing node.
    fn branch(&mut self) -> Option<NodeId> {
        let ids = self.graph.node_ids();
        if ids.is_empty() {
            return None;
        }
        let target = ids[self.rng.gen_range(0..ids.len())];
        let weight = self.rng.gen_range(0.2..=1.0);
        let resource = self.draw_resource();
        let node = self.graph.add_node(resource);
        self.graph.add_edge(node, target, weight);
        tracing::trace!(node, target, weight, "Branch");
        Some(node)
    }

    /// Links two distinct, currently non-adjacent nodes.
    fn fuse(&mut self) -> bool {
        let ids = self.graph.node_ids();
        let mut candidates = Vec::new();
        for (i, &a) in ids.iter().enumerate() {
            for &b in &ids[i + 1..] {
                if !self.graph.contains_edge(a, b) {
                    candidates.push((a, b));
                }
            }
        }
        if candidates.is_empty() {
            return false;
        }
        let (a, b) = candidates[self.rng.gen_range(0..candidates.len())];
        let weight = self.rng.gen_range(0.3..=1.2);
        tracing::trace!(a, b, weight, "Fuse");
        self.graph.add_edge(a, b, weight)
    }

    /// Replaces each pre-existing edge, with probability
    /// `rewire_prob + micro_shock`, by a fresh branch.
    fn rewire(&mut self, pre_existing: &[(NodeId, NodeId)]) -> usize {
        let p = self.config.rewire_prob + self.config.micro_shock;
        let mut rewired = 0;
        for &(a, b) in pre_existing {
            if self.rng.gen::<f64>() < p && self.graph.remove_edge(a, b).is_some() {
                tracing::trace!(a, b, "Rewire");
                if self.branch().is_some() {
                    rewired += 1;
                }
            }
        }
        rewired
    }

    fn jitter(&mut self, synchrony: f64) {
        let drift = JITTER_DRIFT * (self.config.light + synchrony) / 2.0;
        for (a, b, w) in self.graph.edges() {
            let next = (w + gaussian(&mut self.rng, 0.0, JITTER_STD) + drift).max(MIN_EDGE_WEIGHT);
            self.graph.set_edge_weight(a, b, next);
        }
    }

    #[must_use]
    pub fn metrics(&self) -> StructuralMetrics {
        StructuralMetrics {
            avg_degree: self.graph.average_degree(),
            clustering: self.graph.clustering_coefficient(),
            edge_count: self.graph.edge_count(),
            node_count: self.graph.node_count(),
        }
    }

    #[must_use]
    pub fn snapshot(&self) -> GraphSnapshot {
        self.graph.snapshot()
    }

    #[must_use]
    pub fn config(&self) -> &StructuralConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn calm() -> StructuralSummary {
        StructuralSummary {
            stability: 0.95,
            synchrony: 0.1,
        }
    }

    fn frozen_config() -> StructuralConfig {
        StructuralConfig {
            micro_shock: 0.0,
            rewire_prob: 0.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_seeded_as_cycle() {
        let g = StructuralGraph::new(&StructuralConfig::default(), 1).unwrap();
        let snap = g.snapshot();
        assert_eq!(snap.node_count(), 4);
        assert_eq!(snap.edge_count(), 4);
        for i in 0..4u64 {
            assert!(snap.contains_edge(i, (i + 1) % 4));
        }
        for node in &snap.nodes {
            assert!((node.resource - 0.5).abs() < 0.5);
        }
    }

    #[test]
    fn test_gates_closed_means_no_topology_change() {
        let mut g = StructuralGraph::new(&frozen_config(), 3).unwrap();
        for _ in 0..20 {
            let state = g.update_structure(calm());
            assert_eq!(state.structural_delta, 0);
            assert_eq!(state.metrics.edge_count, 4);
            assert_eq!(state.metrics.node_count, 4);
        }
    }

    #[test]
    fn test_branch_always_fires_when_moisture_is_one() {
        let config = StructuralConfig {
            moisture: 1.0,
            ..frozen_config()
        };
        let mut g = StructuralGraph::new(&config, 5).unwrap();
        let state = g.update_structure(StructuralSummary {
            stability: 0.1,
            synchrony: 0.0,
        });
        assert_eq!(state.events.branches, 1);
        assert_eq!(state.metrics.node_count, 5);
        assert_eq!(state.metrics.edge_count, 5);
        assert_eq!(state.structural_delta, 2);
    }

    #[test]
    fn test_fuse_adds_edge_between_non_adjacent_nodes() {
        let config = StructuralConfig {
            nutrients: 1.0,
            ..frozen_config()
        };
        let mut g = StructuralGraph::new(&config, 9).unwrap();
        let state = g.update_structure(StructuralSummary {
            stability: 0.99,
            synchrony: 0.9,
        });
        assert_eq!(state.events.fusions, 1);
        assert_eq!(state.metrics.edge_count, 5);
        assert_eq!(state.structural_delta, 1);
        // A chord across the 4-cycle closes two triangles.
        assert!(state.metrics.clustering > 0.0);
    }

    #[test]
    fn test_rewire_preserves_edge_count() {
        let config = StructuralConfig {
            rewire_prob: 1.0,
            micro_shock: 0.0,
            ..Default::default()
        };
        let mut g = StructuralGraph::new(&config, 11).unwrap();
        let state = g.update_structure(calm());
        assert_eq!(state.events.rewires, 4);
        assert_eq!(state.metrics.edge_count, 4);
        assert_eq!(state.metrics.node_count, 8);
        assert_eq!(state.structural_delta, 4);
        assert!(state.graph.nodes.iter().all(|n| n.id < 8));
    }

    #[test]
    fn test_non_empty_graph_rejected() {
        let mut graph = PetGraph::new();
        graph.add_node(0.5);
        assert!(StructuralGraph::with_graph(graph, &StructuralConfig::default(), 0).is_err());
    }

    #[test]
    fn test_weights_floored() {
        let config = StructuralConfig {
            light: 0.0,
            ..frozen_config()
        };
        let mut g = StructuralGraph::new(&config, 2).unwrap();
        for _ in 0..200 {
            let state = g.update_structure(StructuralSummary {
                stability: 0.95,
                synchrony: -1.0,
            });
            assert!(state.graph.edges.iter().all(|e| e.weight >= MIN_EDGE_WEIGHT));
        }
    }

    #[test]
    fn test_connectivity_scale_formula() {
        let mut g = StructuralGraph::new(&frozen_config(), 4).unwrap();
        let state = g.update_structure(calm());
        let expected = 1.0 + 0.1 * (state.metrics.avg_degree + state.metrics.clustering);
        assert!((state.connectivity_scale - expected).abs() < 1e-12);
        assert!((state.connectivity_scale - 1.2).abs() < 1e-12);
    }

    #[test]
    fn test_same_seed_same_structure() {
        let config = StructuralConfig::default();
        let mut a = StructuralGraph::new(&config, 77).unwrap();
        let mut b = StructuralGraph::new(&config, 77).unwrap();
        let summary = StructuralSummary {
            stability: 0.3,
            synchrony: 0.6,
        };
        for _ in 0..10 {
            assert_eq!(a.update_structure(summary), b.update_structure(summary));
        }
    }
}
