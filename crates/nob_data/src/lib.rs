//! Value types shared between the simulation components.
//!
//! Everything here is a plain, owned, serializable value. Components hand
//! these across their boundaries as copies; nothing in this crate borrows
//! into a component's internal state.

pub mod data;

pub use data::feature::FeaturePoint;
pub use data::label::{Label, ALPHABET};
pub use data::log::{LogEntry, TrajectoryLog};
pub use data::structural::{
    EdgeSnapshot, GraphSnapshot, NodeSnapshot, StructuralEvents, StructuralMetrics,
    StructuralState, StructuralSummary,
};
pub use data::summary::AttractorSummary;
