use serde::{Deserialize, Serialize};

/// Direction an arrow symbol points, inferred from its incident line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArrowDirection {
    Unknown,
    Up,
    Left,
    Down,
    Right,
}

impl ArrowDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            ArrowDirection::Unknown => "unknown",
            ArrowDirection::Up => "up",
            ArrowDirection::Left => "left",
            ArrowDirection::Down => "down",
            ArrowDirection::Right => "right",
        }
    }
}

/// Process-flow direction of a traversal relative to its starting asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlowDirection {
    Unknown,
    Upstream,
    Downstream,
}

impl FlowDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            FlowDirection::Unknown => "unknown",
            FlowDirection::Upstream => "upstream",
            FlowDirection::Downstream => "downstream",
        }
    }
}

/// Kind of a graph node.
///
/// `Text` never becomes a node; it only marks candidates during matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GraphNodeType {
    Unknown,
    Line,
    Symbol,
    Text,
}
