use serde::{Deserialize, Serialize};

/// The two attractor scalars the structural layer reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StructuralSummary {
    pub stability: f64,
    pub synchrony: f64,
}

/// Topology metrics recorded with every log entry.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct StructuralMetrics {
    pub avg_degree: f64,
    pub clustering: f64,
    pub edge_count: usize,
    pub node_count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NodeSnapshot {
    pub id: u64,
    pub resource: f64,
}

/// Undirected edge; `a < b` always.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EdgeSnapshot {
    pub a: u64,
    pub b: u64,
    pub weight: f64,
}

/// Independent copy of the structural graph at one point in time.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GraphSnapshot {
    pub nodes: Vec<NodeSnapshot>,
    pub edges: Vec<EdgeSnapshot>,
}

impl GraphSnapshot {
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    #[must_use]
    pub fn contains_edge(&self, a: u64, b: u64) -> bool {
        let (a, b) = if a < b { (a, b) } else { (b, a) };
        self.edges.iter().any(|e| e.a == a && e.b == b)
    }
}

/// How many adaptation events fired during one structural update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StructuralEvents {
    pub branches: usize,
    pub fusions: usize,
    pub rewires: usize,
}

/// Result of one structural update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuralState {
    pub graph: GraphSnapshot,
    pub connectivity_scale: f64,
    pub structural_delta: usize,
    pub metrics: StructuralMetrics,
    pub events: StructuralEvents,
}
