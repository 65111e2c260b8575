use std::collections::BTreeSet;

use crate::shared::models::{
    ArrowDirection, BoundingBox, GraphNodeType, LineSegment, SymbolAndTextAssociated,
};

/// Payload carried by a graph node.
#[derive(Debug, Clone, PartialEq)]
pub enum NodePayload {
    Symbol(SymbolAndTextAssociated),
    Line {
        segment: LineSegment,
        text_associated: Option<String>,
    },
}

/// One node of the connectivity graph.
///
/// Direction is not stored on edges; `sources` holds the ids of neighbors
/// considered immediately upstream of this node.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphNode {
    pub node_type: GraphNodeType,
    pub payload: NodePayload,
    pub arrow_direction: Option<ArrowDirection>,
    pub sources: BTreeSet<String>,
}

impl GraphNode {
    pub fn symbol(symbol: SymbolAndTextAssociated) -> Self {
        Self {
            node_type: GraphNodeType::Symbol,
            payload: NodePayload::Symbol(symbol),
            arrow_direction: None,
            sources: BTreeSet::new(),
        }
    }

    pub fn line(segment: LineSegment) -> Self {
        Self {
            node_type: GraphNodeType::Line,
            payload: NodePayload::Line {
                segment,
                text_associated: None,
            },
            arrow_direction: None,
            sources: BTreeSet::new(),
        }
    }

    pub fn is_symbol(&self) -> bool {
        self.node_type == GraphNodeType::Symbol
    }

    pub fn is_line(&self) -> bool {
        self.node_type == GraphNodeType::Line
    }

    pub fn symbol_data(&self) -> Option<&SymbolAndTextAssociated> {
        match &self.payload {
            NodePayload::Symbol(symbol) => Some(symbol),
            NodePayload::Line { .. } => None,
        }
    }

    pub fn segment(&self) -> Option<&LineSegment> {
        match &self.payload {
            NodePayload::Line { segment, .. } => Some(segment),
            NodePayload::Symbol(_) => None,
        }
    }

    pub fn label(&self) -> Option<&str> {
        self.symbol_data().map(|symbol| symbol.label.as_str())
    }

    pub fn text_associated(&self) -> Option<&str> {
        match &self.payload {
            NodePayload::Symbol(symbol) => symbol.text_associated.as_deref(),
            NodePayload::Line { text_associated, .. } => text_associated.as_deref(),
        }
    }

    pub fn set_text_associated(&mut self, text: impl Into<String>) {
        match &mut self.payload {
            NodePayload::Symbol(symbol) => symbol.text_associated = Some(text.into()),
            NodePayload::Line { text_associated, .. } => *text_associated = Some(text.into()),
        }
    }

    /// Box form used when re-emitting visited nodes as path segments.
    pub fn to_bounding_box(&self) -> BoundingBox {
        match &self.payload {
            NodePayload::Symbol(symbol) => symbol.bounds,
            NodePayload::Line { segment, .. } => segment.to_bounding_box(),
        }
    }
}
