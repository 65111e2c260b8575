use serde::{Deserialize, Serialize};

use super::{ArrowDirection, BoundingBox, FlowDirection, GraphNodeType};

/// Best attachment found so far for one endpoint of a line segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectionCandidate {
    pub node: Option<String>,
    pub node_type: GraphNodeType,
    pub distance: Option<f64>,
    pub intersection: bool,
}

impl Default for ConnectionCandidate {
    fn default() -> Self {
        Self {
            node: None,
            node_type: GraphNodeType::Unknown,
            distance: None,
            intersection: false,
        }
    }
}

impl ConnectionCandidate {
    pub fn new(node: impl Into<String>, node_type: GraphNodeType, distance: f64, intersection: bool) -> Self {
        Self {
            node: Some(node.into()),
            node_type,
            distance: Some(distance),
            intersection,
        }
    }
}

/// The start and end candidates of one line segment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CandidatePair {
    pub start: ConnectionCandidate,
    pub end: ConnectionCandidate,
}

/// One element of the BFS queue / one traversal result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraversalConnection {
    pub node_id: String,
    pub flow_direction: FlowDirection,
    #[serde(default)]
    pub visited_ids: Vec<String>,
}

impl TraversalConnection {
    pub fn new(node_id: impl Into<String>, flow_direction: FlowDirection) -> Self {
        Self {
            node_id: node_id.into(),
            flow_direction,
            visited_ids: Vec::new(),
        }
    }
}

/// A connection from one asset to another, with the path that realized it.
///
/// `segments` re-emits the visited nodes as bounding boxes: symbol boxes
/// verbatim, line segments as the box spanned by their endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectedSymbolsConnectionItem {
    pub id: u32,
    pub label: String,
    pub text_associated: String,
    pub flow_direction: FlowDirection,
    pub segments: Vec<BoundingBox>,
    pub bounding_box: BoundingBox,
}

/// An asset together with every asset it connects to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectedSymbolsItem {
    pub id: u32,
    pub label: String,
    pub text_associated: String,
    pub bounding_box: BoundingBox,
    pub connections: Vec<ConnectedSymbolsConnectionItem>,
}

/// The published record of one arrow symbol after direction inference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArrowRecord {
    pub id: u32,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    pub bounding_box: BoundingBox,
    #[serde(default)]
    pub text_associated: Option<String>,
    pub arrow_direction: ArrowDirection,
    pub sources: Vec<String>,
}
