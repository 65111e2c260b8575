//! P&ID graph construction.
//!
//! Fuses three noisy detection streams from a piping and instrumentation
//! diagram (symbol boxes, recognized text, line segments) into a typed,
//! undirected connectivity graph with flow-direction annotations, and
//! publishes per-asset connection records.
//!
//! # Pipeline
//!
//! 1. Extend detected lines along their slope.
//! 2. Filter text to the inclusive region.
//! 3. Seed the graph with one node per symbol and per line.
//! 4. Match every line's endpoints to candidate symbols, texts and lines.
//! 5. Materialize the matches as edges (synthesizing text-bridge lines).
//! 6. Connect close, aligned symbols.
//! 7. Infer arrow directions and mark source lines.
//! 8. Classify assets / valves / flow-direction assets.
//! 9. Propagate flow hints into per-node `sources` sets.
//! 10. Walk asset-to-asset connectivity honoring sources.
//! 11. Assemble the external connection records.

pub mod config;
pub mod error;
pub mod graph;
pub mod pipeline;
pub mod shared;

pub use config::{Config, NormalizedThresholds};
pub use error::{ErrorKind, GraphError, Result};
pub use graph::{GraphNode, GraphService};
pub use pipeline::{construct_graph, GraphConstructionOutcome};
pub use shared::models::{
    ArrowDirection, ArrowRecord, BoundingBox, ConnectedSymbolsConnectionItem, ConnectedSymbolsItem,
    FlowDirection, GraphConstructionRequest, GraphConstructionResponse, GraphNodeType, ImageDetails,
    LineDetectionResponse, LineSegment, SymbolAndTextAssociated, TextRecognized,
};
