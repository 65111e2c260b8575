//! Pipeline orchestration.

pub mod service;
pub mod stages;

pub use service::{construct_graph, GraphConstructionOutcome};
