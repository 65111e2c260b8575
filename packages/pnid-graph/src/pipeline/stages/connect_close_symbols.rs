//! Inserts connections between symbols that detection left unattached but
//! that visibly sit next to each other, such as stacked equipment.

use tracing::{debug, info};

use crate::config::Config;
use crate::error::Result;
use crate::graph::id_builder::{symbol_node_id, symbol_pair_line_node_id};
use crate::graph::{GraphNode, GraphService};
use crate::pipeline::stages::create_lines::create_line_between_boxes;
use crate::shared::geometry;
use crate::shared::models::SymbolAndTextAssociated;

pub fn connect_symbols_that_are_close(
    graph: &mut GraphService,
    text_and_symbols_associated_list: &[SymbolAndTextAssociated],
    symbol_to_symbol_distance_threshold: f64,
    config: &Config,
) -> Result<()> {
    // In terms of process flow every symbol should touch at least two others;
    // equipment is considered regardless of its current degree.
    let mut symbols_with_low_degree: Vec<&SymbolAndTextAssociated> = Vec::new();
    for symbol in text_and_symbols_associated_list {
        if graph.degree(&symbol_node_id(symbol.id)) < 2 || symbol.label.starts_with("Equipment/") {
            symbols_with_low_degree.push(symbol);
        }
    }

    info!("Number of symbols with low degree: {}", symbols_with_low_degree.len());

    for (i, symbol1) in symbols_with_low_degree.iter().enumerate() {
        for symbol2 in &symbols_with_low_degree[i..] {
            if symbol1.id == symbol2.id {
                continue;
            }

            if symbol1.label_starts_with_any(&config.symbol_label_prefixes_to_connect_if_close)
                && symbol2.label_starts_with_any(&config.symbol_label_prefixes_to_connect_if_close)
            {
                connect(
                    graph,
                    symbol1,
                    symbol2,
                    symbol_to_symbol_distance_threshold,
                    config.graph_symbol_to_symbol_overlap_region_threshold,
                )?;
            }
        }
    }

    Ok(())
}

fn connect(
    graph: &mut GraphService,
    symbol1: &SymbolAndTextAssociated,
    symbol2: &SymbolAndTextAssociated,
    distance_threshold: f64,
    overlap_region_threshold: f64,
) -> Result<()> {
    let symbol1_polygon = geometry::bounding_box_to_polygon(&symbol1.bounds);
    let symbol2_polygon = geometry::bounding_box_to_polygon(&symbol2.bounds);

    if geometry::polygons_distance(&symbol1_polygon, &symbol2_polygon) > distance_threshold {
        return Ok(());
    }

    // Horizontal adjacency: x-padded boxes touch and the boxes share most of
    // their vertical extent. Vertical adjacency is the mirror image.
    let symbol1_horizontal = geometry::padded_horizontal(&symbol1.bounds, distance_threshold);
    let symbol2_horizontal = geometry::padded_horizontal(&symbol2.bounds, distance_threshold);
    let mut horizontal_criteria_met = false;
    if geometry::polygons_intersect(
        &geometry::bounding_box_to_polygon(&symbol1_horizontal),
        &geometry::bounding_box_to_polygon(&symbol2_horizontal),
    ) {
        horizontal_criteria_met = geometry::high_overlap_in_vertical_region(
            &symbol1_horizontal,
            &symbol2_horizontal,
            overlap_region_threshold,
        );
    }

    let symbol1_vertical = geometry::padded_vertical(&symbol1.bounds, distance_threshold);
    let symbol2_vertical = geometry::padded_vertical(&symbol2.bounds, distance_threshold);
    let mut vertical_criteria_met = false;
    if geometry::polygons_intersect(
        &geometry::bounding_box_to_polygon(&symbol1_vertical),
        &geometry::bounding_box_to_polygon(&symbol2_vertical),
    ) {
        vertical_criteria_met = geometry::high_overlap_in_horizontal_region(
            &symbol1_vertical,
            &symbol2_vertical,
            overlap_region_threshold,
        );
    }

    if !horizontal_criteria_met && !vertical_criteria_met {
        return Ok(());
    }

    let symbol1_id = symbol_node_id(symbol1.id);
    let symbol2_id = symbol_node_id(symbol2.id);

    debug!("Connecting symbol {} with symbol {} because they are close", symbol1_id, symbol2_id);

    let new_line = create_line_between_boxes(&symbol1.bounds, &symbol2.bounds);
    graph.add_node(
        symbol_pair_line_node_id(&symbol1_id, &symbol2_id),
        GraphNode::line(new_line),
    );
    graph.add_edge(&symbol1_id, &symbol2_id)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::stages::init_graph::initialize_graph;
    use crate::shared::models::BoundingBox;

    fn equipment(id: u32, bounds: BoundingBox) -> SymbolAndTextAssociated {
        SymbolAndTextAssociated {
            id,
            label: "Equipment/Vessels/Drum".to_string(),
            score: None,
            bounds,
            text_associated: Some(format!("V-{}", id)),
        }
    }

    #[test]
    fn test_connects_horizontally_adjacent_equipment() {
        let symbols = vec![
            equipment(0, BoundingBox::new(0.10, 0.40, 0.20, 0.50)),
            equipment(1, BoundingBox::new(0.205, 0.40, 0.30, 0.50)),
        ];
        let mut graph = initialize_graph(&symbols, &[]);

        connect_symbols_that_are_close(&mut graph, &symbols, 0.01, &Config::default()).unwrap();

        assert_eq!(graph.neighbors("s-0"), vec!["s-1".to_string()]);
        let bridge = graph.node("l-s-0-s-1").expect("synthetic line node");
        // The synthetic line joins the two centroids.
        assert_eq!(
            bridge.segment().copied().unwrap(),
            crate::shared::models::LineSegment::new(0.15, 0.45, 0.2525, 0.45)
        );
    }

    #[test]
    fn test_distance_gate() {
        let symbols = vec![
            equipment(0, BoundingBox::new(0.10, 0.40, 0.20, 0.50)),
            equipment(1, BoundingBox::new(0.40, 0.40, 0.50, 0.50)),
        ];
        let mut graph = initialize_graph(&symbols, &[]);

        connect_symbols_that_are_close(&mut graph, &symbols, 0.01, &Config::default()).unwrap();

        assert!(graph.neighbors("s-0").is_empty());
        assert!(!graph.contains("l-s-0-s-1"));
    }

    #[test]
    fn test_diagonal_neighbors_do_not_connect() {
        // Close corner-to-corner, but aligned on neither axis.
        let symbols = vec![
            equipment(0, BoundingBox::new(0.10, 0.40, 0.20, 0.50)),
            equipment(1, BoundingBox::new(0.205, 0.505, 0.30, 0.60)),
        ];
        let mut graph = initialize_graph(&symbols, &[]);

        connect_symbols_that_are_close(&mut graph, &symbols, 0.01, &Config::default()).unwrap();

        assert!(graph.neighbors("s-0").is_empty());
    }

    #[test]
    fn test_unlisted_labels_do_not_connect() {
        let mut symbols = vec![
            equipment(0, BoundingBox::new(0.10, 0.40, 0.20, 0.50)),
            equipment(1, BoundingBox::new(0.205, 0.40, 0.30, 0.50)),
        ];
        symbols[0].label = "Piping/Junction/Tee".to_string();
        let mut graph = initialize_graph(&symbols, &[]);

        connect_symbols_that_are_close(&mut graph, &symbols, 0.01, &Config::default()).unwrap();

        assert!(graph.neighbors("s-0").is_empty());
    }

    #[test]
    fn test_connects_vertically_adjacent_equipment() {
        let symbols = vec![
            equipment(0, BoundingBox::new(0.40, 0.10, 0.50, 0.20)),
            equipment(1, BoundingBox::new(0.40, 0.205, 0.50, 0.30)),
        ];
        let mut graph = initialize_graph(&symbols, &[]);

        connect_symbols_that_are_close(&mut graph, &symbols, 0.01, &Config::default()).unwrap();

        assert_eq!(graph.neighbors("s-0"), vec!["s-1".to_string()]);
    }
}
