//! The two traversal passes: flow-direction propagation, then asset-to-asset
//! connectivity.

use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use crate::graph::{GraphService, ScratchSources, TraversalOptions};
use crate::pipeline::stages::classify_assets::AssetClassification;
use crate::shared::models::TraversalConnection;

/// Propagates arrow-derived flow hints through the graph, then walks from
/// every asset to the assets it connects to.
pub fn find_symbol_connectivities(
    graph: &mut GraphService,
    classification: &AssetClassification,
    propagation_exhaustive_search: bool,
    arrow_symbol_label: &str,
) -> BTreeMap<String, Vec<TraversalConnection>> {
    debug!("Beginning propagation...");

    // Arrows placed on a branch point: their claims must survive the walk,
    // so the propagation traversal treats them as terminals.
    let junction_arrow_ids: BTreeSet<String> = graph
        .arrow_symbols_at_junction(arrow_symbol_label)
        .into_iter()
        .collect();

    // Stop propagation at equipment, page connectors and sensors; valves sit
    // on the process flow and are walked through.
    let non_valve_assets: BTreeSet<String> = classification
        .asset_symbol_ids
        .difference(&classification.asset_valve_symbol_ids)
        .cloned()
        .collect();

    debug!("Getting connections for each flow-direction asset...");
    let mut traversal_connections_map: Vec<(String, Vec<TraversalConnection>)> = Vec::new();
    for symbol_node_id in &classification.flow_direction_asset_ids {
        let connections = graph.connected_nodes(
            symbol_node_id,
            &non_valve_assets,
            TraversalOptions::propagation(arrow_symbol_label, &junction_arrow_ids, propagation_exhaustive_search),
        );
        let retained: Vec<TraversalConnection> = connections
            .into_iter()
            .filter(|connection| {
                classification.flow_direction_asset_ids.contains(&connection.node_id)
                    || junction_arrow_ids.contains(&connection.node_id)
            })
            .collect();
        traversal_connections_map.push((symbol_node_id.clone(), retained));
    }

    debug!("Propagating the flow direction...");
    let mut scratch = ScratchSources::default();
    for (symbol_node_id, connections) in &traversal_connections_map {
        graph.propagate_flow_direction(symbol_node_id, connections, &mut scratch);
    }
    graph.publish_sources(scratch);

    debug!("Propagation finished. Finding symbol connections...");
    let mut symbol_connections = BTreeMap::new();
    for asset_symbol_id in &classification.asset_symbol_ids {
        let connected_nodes = graph.connected_nodes(
            asset_symbol_id,
            &classification.asset_symbol_ids,
            TraversalOptions::connectivity(arrow_symbol_label),
        );
        symbol_connections.insert(asset_symbol_id.clone(), connected_nodes);
    }

    symbol_connections
}
