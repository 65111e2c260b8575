//! End-to-end scenarios over the public pipeline API.

use std::collections::BTreeSet;

use pretty_assertions::assert_eq;

use pnid_graph::graph::id_builder::{line_node_id, symbol_node_id};
use pnid_graph::graph::GraphNode;
use pnid_graph::pipeline::stages;
use pnid_graph::shared::models::GraphNodeType;
use pnid_graph::{
    construct_graph, BoundingBox, Config, FlowDirection, GraphConstructionRequest, GraphService,
    ImageDetails, LineDetectionResponse, LineSegment, NormalizedThresholds, SymbolAndTextAssociated,
    TextRecognized,
};

const ARROW_LABEL: &str = "Piping/Fittings/Mid arrow flow direction";

fn image_details() -> ImageDetails {
    ImageDetails {
        format: "png".to_string(),
        width: 1000,
        height: 1000,
    }
}

fn symbol(id: u32, label: &str, bounds: BoundingBox, text: Option<&str>) -> SymbolAndTextAssociated {
    SymbolAndTextAssociated {
        id,
        label: label.to_string(),
        score: Some(0.9),
        bounds,
        text_associated: text.map(|t| t.to_string()),
    }
}

fn request(
    symbols: Vec<SymbolAndTextAssociated>,
    texts: Vec<TextRecognized>,
) -> GraphConstructionRequest {
    GraphConstructionRequest {
        image_details: image_details(),
        bounding_box_inclusive: None,
        all_text_list: texts,
        text_and_symbols_associated_list: symbols,
        propagation_pass_exhaustive_search: false,
    }
}

fn lines(line_segments: Vec<LineSegment>) -> LineDetectionResponse {
    LineDetectionResponse {
        image_details: image_details(),
        line_segments,
    }
}

/// One line between a text box at its start and a symbol at its end: the
/// start claims the text (synthesizing a bridge line node), the end claims
/// the symbol.
#[test]
fn test_line_between_text_and_symbol() {
    let config = Config::default();
    let line_segments = vec![LineSegment::new(0.1, 0.5, 0.9, 0.5)];
    let symbols = vec![
        symbol(0, "Equipment/Vessels/Drum", BoundingBox::new(0.0, 0.0, 0.05, 0.05), None),
        symbol(1, "Equipment/Vessels/Tank", BoundingBox::new(0.9, 0.45, 1.0, 0.55), None),
    ];
    let texts = vec![TextRecognized::new(BoundingBox::new(0.1, 0.5, 0.2, 0.51), "TAG")];

    let thresholds = NormalizedThresholds::from_config(&config, 1000, 1000);
    let extended = stages::extend_lines(&line_segments, thresholds.line_segment_padding);
    let candidates = stages::create_line_connection_candidates(
        &line_segments,
        &extended,
        &symbols,
        &texts,
        &thresholds,
        config.workers_count_for_data_batch,
    );

    assert_eq!(candidates[0].start.node.as_deref(), Some("0"));
    assert_eq!(candidates[0].start.node_type, GraphNodeType::Text);
    assert_eq!(candidates[0].end.node.as_deref(), Some("1"));
    assert_eq!(candidates[0].end.node_type, GraphNodeType::Symbol);

    let mut graph = stages::initialize_graph(&symbols, &line_segments);
    stages::connect_lines_with_closest_elements(&mut graph, &candidates, &texts, &line_segments).unwrap();

    // One synthesized bridge node, attached to the line.
    assert!(graph.node("l-t-0").is_some());
    let mut neighbors = graph.neighbors("l-0");
    neighbors.sort();
    assert_eq!(neighbors, vec!["l-t-0".to_string(), "s-1".to_string()]);
    assert_eq!(graph.node("l-0").unwrap().text_associated(), Some("TAG"));
}

/// Two equipment items joined by one line: both directions are reported with
/// unknown flow and the path re-emitted as the line's box.
#[test]
fn test_two_assets_joined_by_a_line() {
    let symbols = vec![
        symbol(0, "Equipment/Vessels/Drum", BoundingBox::new(0.0, 0.4, 0.1, 0.6), Some("E-1")),
        symbol(1, "Equipment/Vessels/Tank", BoundingBox::new(0.9, 0.4, 1.0, 0.6), Some("E-2")),
    ];
    let outcome = construct_graph(
        "pid-basic",
        &request(symbols, vec![]),
        &lines(vec![LineSegment::new(0.1, 0.5, 0.9, 0.5)]),
        &Config::default(),
    )
    .unwrap();

    assert_eq!(outcome.connected_symbols.len(), 2);

    let first = &outcome.connected_symbols[0];
    assert_eq!(first.id, 0);
    assert_eq!(first.text_associated, "E-1");
    assert_eq!(first.connections.len(), 1);
    assert_eq!(first.connections[0].id, 1);
    assert_eq!(first.connections[0].flow_direction, FlowDirection::Unknown);
    assert_eq!(
        first.connections[0].segments,
        vec![BoundingBox::new(0.1, 0.5, 0.9, 0.5)]
    );

    let second = &outcome.connected_symbols[1];
    assert_eq!(second.connections.len(), 1);
    assert_eq!(second.connections[0].id, 0);
}

/// An arrow on the line between two equipment items orients the whole chain:
/// the upstream asset reaches the downstream one, never the reverse.
#[test]
fn test_arrow_orients_asset_connection() {
    let symbols = vec![
        symbol(0, "Equipment/Vessels/Drum", BoundingBox::new(0.0, 0.4, 0.1, 0.6), Some("E-1")),
        symbol(1, "Equipment/Vessels/Tank", BoundingBox::new(0.9, 0.4, 1.0, 0.6), Some("E-2")),
        // Arrow fed squarely through its left side by l-0; the outgoing line
        // leaves slightly off-center, so only l-0 claims the arrow.
        symbol(2, ARROW_LABEL, BoundingBox::new(0.45, 0.45, 0.55, 0.55), None),
    ];
    let line_segments = vec![
        LineSegment::new(0.1, 0.5, 0.45, 0.5),
        LineSegment::new(0.55, 0.53, 0.9, 0.53),
    ];
    let outcome = construct_graph(
        "pid-arrow",
        &request(symbols, vec![]),
        &lines(line_segments),
        &Config::default(),
    )
    .unwrap();

    let arrows = &outcome.arrow_nodes;
    assert_eq!(arrows.len(), 1);
    assert_eq!(arrows[0].sources, vec![line_node_id(0)]);
    assert_eq!(arrows[0].arrow_direction, pnid_graph::ArrowDirection::Right);

    let drum = outcome
        .connected_symbols
        .iter()
        .find(|item| item.id == 0)
        .unwrap();
    assert_eq!(drum.connections.len(), 1);
    assert_eq!(drum.connections[0].id, 1);
    assert_eq!(drum.connections[0].flow_direction, FlowDirection::Downstream);

    let tank = outcome
        .connected_symbols
        .iter()
        .find(|item| item.id == 1)
        .unwrap();
    assert!(tank.connections.is_empty());
}

/// Branching topology: an oriented arrow sits between asset A and asset B,
/// and a third asset C joins the run between A and the arrow. Both A and C
/// must reach B downstream; B reaches nobody.
#[test]
fn test_branch_inherits_downstream_direction() {
    let mut graph = GraphService::new();
    let equipment = |id: u32, tag: &str| {
        GraphNode::symbol(symbol(
            id,
            "Equipment/Vessels/Drum",
            BoundingBox::new(0.0, 0.0, 0.1, 0.1),
            Some(tag),
        ))
    };
    graph.add_node("s-0", equipment(0, "A-1"));
    graph.add_node("s-1", equipment(1, "B-1"));
    graph.add_node("s-2", equipment(2, "C-1"));
    graph.add_node("s-9", GraphNode::symbol(symbol(9, ARROW_LABEL, BoundingBox::new(0.4, 0.4, 0.6, 0.6), None)));
    for i in [0, 1, 4] {
        graph.add_node(line_node_id(i), GraphNode::line(LineSegment::new(0.1, 0.5, 0.9, 0.5)));
    }
    graph.add_edge("s-0", "l-0").unwrap();
    graph.add_edge("l-0", "s-9").unwrap();
    graph.add_edge("s-9", "l-1").unwrap();
    graph.add_edge("l-1", "s-1").unwrap();
    graph.add_edge("s-2", "l-4").unwrap();
    graph.add_edge("l-4", "l-0").unwrap();
    // The arrow points away from l-0.
    graph.node_mut("s-9").unwrap().sources.insert("l-0".to_string());

    let all: BTreeSet<String> = ["s-0", "s-1", "s-2"].iter().map(|s| s.to_string()).collect();
    let classification = stages::AssetClassification {
        asset_symbol_ids: all.clone(),
        asset_valve_symbol_ids: BTreeSet::new(),
        flow_direction_asset_ids: all,
    };

    let connections = stages::find_symbol_connectivities(&mut graph, &classification, false, ARROW_LABEL);
    let output = stages::build_connected_symbols(
        &graph,
        &connections,
        &classification.flow_direction_asset_ids,
        &classification.asset_valve_symbol_ids,
    )
    .unwrap();

    let by_id = |id: u32| output.iter().find(|item| item.id == id).unwrap();

    // A reaches B downstream through the arrow.
    let a_to_b = by_id(0)
        .connections
        .iter()
        .find(|connection| connection.id == 1)
        .unwrap();
    assert_eq!(a_to_b.flow_direction, FlowDirection::Downstream);
    assert_eq!(
        connections["s-0"]
            .iter()
            .find(|c| c.node_id == "s-1")
            .unwrap()
            .visited_ids,
        vec!["l-0", "s-9", "l-1"]
    );

    // The branch asset inherits downstream through the same arrow.
    let c_to_b = by_id(2)
        .connections
        .iter()
        .find(|connection| connection.id == 1)
        .unwrap();
    assert_eq!(c_to_b.flow_direction, FlowDirection::Downstream);

    // B is a sink.
    assert!(by_id(1).connections.is_empty());
}

/// Text outside the inclusive region never reaches candidate matching.
#[test]
fn test_inclusive_region_filters_text() {
    let mut req = request(
        vec![symbol(0, "Equipment/Vessels/Drum", BoundingBox::new(0.0, 0.4, 0.1, 0.6), Some("E-1"))],
        vec![
            TextRecognized::new(BoundingBox::new(0.1, 0.5, 0.2, 0.51), "KEEP"),
            TextRecognized::new(BoundingBox::new(0.91, 0.5, 0.99, 0.51), "DROP"),
        ],
    );
    req.bounding_box_inclusive = Some(BoundingBox::new(0.0, 0.0, 0.9, 1.0));

    let outcome = construct_graph(
        "pid-filter",
        &req,
        &lines(vec![LineSegment::new(0.2, 0.5, 0.9, 0.5)]),
        &Config::default(),
    )
    .unwrap();

    // The line took the in-region text; the out-of-region one was dropped
    // before matching, so the asset ends up with no connection at all.
    assert_eq!(outcome.connected_symbols.len(), 1);
    assert!(outcome.connected_symbols[0].connections.is_empty());
}

/// Identical inputs twice produce byte-identical output.
#[test]
fn test_determinism() {
    let build = || {
        let symbols = vec![
            symbol(0, "Equipment/Vessels/Drum", BoundingBox::new(0.0, 0.4, 0.1, 0.6), Some("E-1")),
            symbol(1, "Equipment/Vessels/Tank", BoundingBox::new(0.9, 0.4, 1.0, 0.6), Some("E-2")),
            symbol(2, "Instrument/Valve/Gate valve", BoundingBox::new(0.45, 0.45, 0.55, 0.55), Some("GV-3")),
            symbol(3, "Instrument/Indicators/Level", BoundingBox::new(0.45, 0.1, 0.55, 0.2), Some("LI-4")),
        ];
        let line_segments = vec![
            LineSegment::new(0.1, 0.5, 0.45, 0.5),
            LineSegment::new(0.55, 0.5, 0.9, 0.5),
            LineSegment::new(0.5, 0.2, 0.5, 0.45),
        ];
        construct_graph(
            "pid-determinism",
            &request(symbols, vec![]),
            &lines(line_segments),
            &Config::default(),
        )
        .unwrap()
    };

    let first = build();
    let second = build();

    let first_json = serde_json::to_string(&first.connected_symbols).unwrap();
    let second_json = serde_json::to_string(&second.connected_symbols).unwrap();
    assert_eq!(first_json, second_json);
    assert_eq!(first.arrow_nodes, second.arrow_nodes);
}

/// Symbol node ids round-trip through the id scheme.
#[test]
fn test_node_id_scheme_roundtrip() {
    assert_eq!(symbol_node_id(12), "s-12");
    assert_eq!(
        pnid_graph::graph::id_builder::int_id_from_node_id("s-12").unwrap(),
        12
    );
}
