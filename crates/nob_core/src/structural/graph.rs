//! Weighted undirected graph storage behind a narrow interface.
//!
//! The adaptation policy in [`super::StructuralGraph`] only talks to
//! [`WeightedGraph`], so the storage (and the O(n³) clustering computation)
//! can be swapped without touching branch/fuse/rewire.

use nob_data::{EdgeSnapshot, GraphSnapshot, NodeSnapshot};
use petgraph::stable_graph::{NodeIndex, StableUnGraph};
use std::collections::BTreeMap;

/// Stable node identifier. Assigned monotonically, never reused.
pub type NodeId = u64;

/// Minimal weighted-graph interface used by the structural layer.
///
/// Enumeration methods return ids in ascending order so that random choices
/// made over them are reproducible.
pub trait WeightedGraph {
    /// Adds a node carrying `resource` and returns its fresh id.
    fn add_node(&mut self, resource: f64) -> NodeId;

    /// Removes a node and all its edges. Returns false if it did not exist.
    fn remove_node(&mut self, id: NodeId) -> bool;

    /// Adds an undirected edge. Returns false for self-loops, unknown
    /// endpoints, or an edge that already exists.
    fn add_edge(&mut self, a: NodeId, b: NodeId, weight: f64) -> bool;

    /// Removes an edge, returning its weight.
    fn remove_edge(&mut self, a: NodeId, b: NodeId) -> Option<f64>;

    fn edge_weight(&self, a: NodeId, b: NodeId) -> Option<f64>;

    /// Overwrites an existing edge's weight. Returns false if absent.
    fn set_edge_weight(&mut self, a: NodeId, b: NodeId, weight: f64) -> bool;

    fn neighbors(&self, id: NodeId) -> Vec<NodeId>;

    fn node_ids(&self) -> Vec<NodeId>;

    /// All edges as `(a, b, weight)` with `a < b`, sorted.
    fn edges(&self) -> Vec<(NodeId, NodeId, f64)>;

    fn resource(&self, id: NodeId) -> Option<f64>;

    fn node_count(&self) -> usize;

    fn edge_count(&self) -> usize;

    fn contains_edge(&self, a: NodeId, b: NodeId) -> bool {
        self.edge_weight(a, b).is_some()
    }

    fn average_degree(&self) -> f64 {
        let n = self.node_count();
        if n == 0 {
            0.0
        } else {
            2.0 * self.edge_count() as f64 / n as f64
        }
    }

    /// Exact triangle/triple ratio; 0 below three nodes.
    ///
    /// The default scans every node triple, see [`triple_scan_clustering`].
    fn clustering_coefficient(&self) -> f64 {
        triple_scan_clustering(self)
    }

    /// Independent copy of nodes and edges.
    fn snapshot(&self) -> GraphSnapshot {
        GraphSnapshot {
            nodes: self
                .node_ids()
                .into_iter()
                .map(|id| NodeSnapshot {
                    id,
                    resource: self.resource(id).unwrap_or(0.0),
                })
                .collect(),
            edges: self
                .edges()
                .into_iter()
                .map(|(a, b, weight)| EdgeSnapshot { a, b, weight })
                .collect(),
        }
    }
}

/// Closed triples (three per triangle) over connected triples, found by
/// testing every node triple.
///
/// O(n³) in node count, which caps how large the graph can usefully grow.
/// Implementations with cheap neighbor access should count wedges instead.
pub fn triple_scan_clustering<G: WeightedGraph + ?Sized>(graph: &G) -> f64 {
    let ids = graph.node_ids();
    if ids.len() < 3 {
        return 0.0;
    }
    let mut closed = 0usize;
    let mut connected = 0usize;
    for (i, &a) in ids.iter().enumerate() {
        for (j, &b) in ids.iter().enumerate().skip(i + 1) {
            let ab = graph.contains_edge(a, b);
            for &c in ids.iter().skip(j + 1) {
                let links = usize::from(ab)
                    + usize::from(graph.contains_edge(b, c))
                    + usize::from(graph.contains_edge(a, c));
                match links {
                    3 => {
                        closed += 3;
                        connected += 3;
                    }
                    2 => connected += 1,
                    _ => {}
                }
            }
        }
    }
    ratio(closed, connected)
}

fn ratio(closed: usize, connected: usize) -> f64 {
    if connected == 0 {
        0.0
    } else {
        closed as f64 / connected as f64
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct NodeAttr {
    id: NodeId,
    resource: f64,
}

/// [`WeightedGraph`] backed by a petgraph `StableUnGraph`.
///
/// `StableGraph` keeps indices valid across removals; the id map is a
/// `BTreeMap` so enumeration is ordered without sorting.
#[derive(Debug, Clone, Default)]
pub struct PetGraph {
    graph: StableUnGraph<NodeAttr, f64>,
    index: BTreeMap<NodeId, NodeIndex>,
    next_id: NodeId,
}

impl PetGraph {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn find(&self, a: NodeId, b: NodeId) -> Option<petgraph::stable_graph::EdgeIndex> {
        let ia = *self.index.get(&a)?;
        let ib = *self.index.get(&b)?;
        self.graph.find_edge(ia, ib)
    }

    fn id_of(&self, idx: NodeIndex) -> Option<NodeId> {
        self.graph.node_weight(idx).map(|attr| attr.id)
    }
}

impl WeightedGraph for PetGraph {
    fn add_node(&mut self, resource: f64) -> NodeId {
        let id = self.next_id;
        self.next_id += 1;
        let idx = self.graph.add_node(NodeAttr { id, resource });
        self.index.insert(id, idx);
        id
    }

    fn remove_node(&mut self, id: NodeId) -> bool {
        match self.index.remove(&id) {
            Some(idx) => self.graph.remove_node(idx).is_some(),
            None => false,
        }
    }

    fn add_edge(&mut self, a: NodeId, b: NodeId, weight: f64) -> bool {
        if a == b || self.contains_edge(a, b) {
            return false;
        }
        match (self.index.get(&a), self.index.get(&b)) {
            (Some(&ia), Some(&ib)) => {
                self.graph.add_edge(ia, ib, weight);
                true
            }
            _ => false,
        }
    }

    fn remove_edge(&mut self, a: NodeId, b: NodeId) -> Option<f64> {
        let edge = self.find(a, b)?;
        self.graph.remove_edge(edge)
    }

    fn edge_weight(&self, a: NodeId, b: NodeId) -> Option<f64> {
        let edge = self.find(a, b)?;
        self.graph.edge_weight(edge).copied()
    }

    fn set_edge_weight(&mut self, a: NodeId, b: NodeId, weight: f64) -> bool {
        match self.find(a, b).and_then(|e| self.graph.edge_weight_mut(e)) {
            Some(w) => {
                *w = weight;
                true
            }
            None => false,
        }
    }

    fn neighbors(&self, id: NodeId) -> Vec<NodeId> {
        let Some(&idx) = self.index.get(&id) else {
            return Vec::new();
        };
        let mut out: Vec<NodeId> = self
            .graph
            .neighbors(idx)
            .filter_map(|n| self.id_of(n))
            .collect();
        out.sort_unstable();
        out.dedup();
        out
    }

    fn node_ids(&self) -> Vec<NodeId> {
        self.index.keys().copied().collect()
    }

    fn edges(&self) -> Vec<(NodeId, NodeId, f64)> {
        let mut out: Vec<(NodeId, NodeId, f64)> = self
            .graph
            .edge_indices()
            .filter_map(|e| {
                let (ia, ib) = self.graph.edge_endpoints(e)?;
                let a = self.id_of(ia)?;
                let b = self.id_of(ib)?;
                let w = *self.graph.edge_weight(e)?;
                Some(if a < b { (a, b, w) } else { (b, a, w) })
            })
            .collect();
        out.sort_by(|x, y| (x.0, x.1).cmp(&(y.0, y.1)));
        out
    }

    fn resource(&self, id: NodeId) -> Option<f64> {
        let idx = *self.index.get(&id)?;
        self.graph.node_weight(idx).map(|attr| attr.resource)
    }

    fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Same ratio as [`triple_scan_clustering`], counted per center node:
    /// every neighbor pair is a connected triple, and an adjacent pair closes
    /// it. O(Σ deg²).
    fn clustering_coefficient(&self) -> f64 {
        if self.graph.node_count() < 3 {
            return 0.0;
        }
        let mut closed = 0usize;
        let mut connected = 0usize;
        for &center in self.index.values() {
            let around: Vec<NodeIndex> = self.graph.neighbors(center).collect();
            let degree = around.len();
            connected += degree * degree.saturating_sub(1) / 2;
            for (i, &a) in around.iter().enumerate() {
                for &b in &around[i + 1..] {
                    if self.graph.find_edge(a, b).is_some() {
                        closed += 1;
                    }
                }
            }
        }
        ratio(closed, connected)
    }
}
