//! Node id scheme.
//!
//! `l-<n>` for detected lines, `s-<n>` for symbols, `l-t-<n>` for lines
//! synthesized from text boxes, `l-s-<i>-s-<j>` for lines synthesized between
//! close symbols.

use crate::error::{GraphError, Result};
use crate::shared::models::GraphNodeType;

pub fn line_node_id(index: usize) -> String {
    format!("l-{}", index)
}

pub fn symbol_node_id(id: u32) -> String {
    format!("s-{}", id)
}

pub fn text_line_node_id(text_index: usize) -> String {
    format!("l-t-{}", text_index)
}

pub fn symbol_pair_line_node_id(symbol_node_id_1: &str, symbol_node_id_2: &str) -> String {
    format!("l-{}-{}", symbol_node_id_1, symbol_node_id_2)
}

/// The trailing integer of a node id.
pub fn int_id_from_node_id(node_id: &str) -> Result<u32> {
    node_id
        .rsplit('-')
        .next()
        .and_then(|last| last.parse().ok())
        .ok_or_else(|| GraphError::internal(format!("node id '{}' has no integer suffix", node_id)))
}

pub fn node_type_from_node_id(node_id: &str) -> GraphNodeType {
    match node_id.split('-').next() {
        Some("s") => GraphNodeType::Symbol,
        Some("t") => GraphNodeType::Text,
        Some("l") => GraphNodeType::Line,
        _ => GraphNodeType::Unknown,
    }
}
