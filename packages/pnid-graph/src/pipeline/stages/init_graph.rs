//! Seeds the graph: one node per detected line, one per detected symbol.

use crate::graph::id_builder::{line_node_id, symbol_node_id};
use crate::graph::{GraphNode, GraphService};
use crate::shared::models::{LineSegment, SymbolAndTextAssociated};

pub fn initialize_graph(
    text_and_symbols_associated_list: &[SymbolAndTextAssociated],
    line_segments: &[LineSegment],
) -> GraphService {
    let mut graph = GraphService::new();

    for (index, segment) in line_segments.iter().enumerate() {
        graph.add_node(line_node_id(index), GraphNode::line(*segment));
    }

    for symbol in text_and_symbols_associated_list {
        graph.add_node(symbol_node_id(symbol.id), GraphNode::symbol(symbol.clone()));
    }

    graph
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::models::BoundingBox;

    #[test]
    fn test_creates_one_node_per_input() {
        let symbols = vec![SymbolAndTextAssociated {
            id: 4,
            label: "Equipment/Vessels/Drum".to_string(),
            score: None,
            bounds: BoundingBox::new(0.0, 0.0, 0.1, 0.1),
            text_associated: Some("V-101".to_string()),
        }];
        let lines = vec![
            LineSegment::new(0.1, 0.5, 0.9, 0.5),
            LineSegment::new(0.5, 0.1, 0.5, 0.9),
        ];

        let graph = initialize_graph(&symbols, &lines);

        assert_eq!(graph.node_count(), 3);
        assert!(graph.node("l-0").unwrap().is_line());
        assert!(graph.node("l-1").unwrap().is_line());
        assert_eq!(graph.node("s-4").unwrap().label(), Some("Equipment/Vessels/Drum"));
        // No edges yet.
        assert_eq!(graph.degree("l-0"), 0);
        assert_eq!(graph.degree("s-4"), 0);
    }
}
