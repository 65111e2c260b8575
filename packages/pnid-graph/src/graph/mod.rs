//! The connectivity graph and its traversals.

pub mod id_builder;
pub mod node;
pub mod service;
pub mod traversal;

pub use node::{GraphNode, NodePayload};
pub use service::GraphService;
pub use traversal::{ScratchSources, TraversalOptions};
