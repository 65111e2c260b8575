//! Data model shared across the pipeline stages.

mod bounding_box;
mod connectivity;
mod enums;
mod line_segment;
mod request;
mod symbol;
mod text;

pub use bounding_box::BoundingBox;
pub use connectivity::{
    ArrowRecord, CandidatePair, ConnectedSymbolsConnectionItem, ConnectedSymbolsItem, ConnectionCandidate,
    TraversalConnection,
};
pub use enums::{ArrowDirection, FlowDirection, GraphNodeType};
pub use line_segment::{ExtendedLineSegment, LineSegment};
pub use request::{
    GraphConstructionRequest, GraphConstructionResponse, ImageDetails, LineDetectionResponse,
};
pub use symbol::SymbolAndTextAssociated;
pub use text::TextRecognized;
