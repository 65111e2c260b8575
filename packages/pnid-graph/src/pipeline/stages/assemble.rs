//! Transforms traversal results into the external asset-connection records.

use std::collections::{BTreeMap, BTreeSet};

use crate::error::{GraphError, Result};
use crate::graph::id_builder::int_id_from_node_id;
use crate::graph::GraphService;
use crate::shared::models::{
    BoundingBox, ConnectedSymbolsConnectionItem, ConnectedSymbolsItem, FlowDirection,
    TraversalConnection,
};

/// Builds one record per asset, with its connections and their path
/// segments. Flow direction is only meaningful between process-flow assets
/// (flow-direction assets and valves); other pairs publish `unknown`.
pub fn build_connected_symbols(
    graph: &GraphService,
    symbol_connections: &BTreeMap<String, Vec<TraversalConnection>>,
    flow_direction_asset_ids: &BTreeSet<String>,
    asset_valve_symbol_ids: &BTreeSet<String>,
) -> Result<Vec<ConnectedSymbolsItem>> {
    let process_flow_assets: BTreeSet<&String> = flow_direction_asset_ids
        .iter()
        .chain(asset_valve_symbol_ids.iter())
        .collect();

    let mut output = Vec::with_capacity(symbol_connections.len());

    for (asset_symbol_id, connected_nodes) in symbol_connections {
        let container = asset_symbol(graph, asset_symbol_id)?;

        let mut connections = Vec::with_capacity(connected_nodes.len());
        for traversal_connection in connected_nodes {
            let connected_node_id = &traversal_connection.node_id;

            let should_have_flow_direction = process_flow_assets.contains(asset_symbol_id)
                && process_flow_assets.contains(connected_node_id);
            let flow_direction = if should_have_flow_direction {
                traversal_connection.flow_direction
            } else {
                FlowDirection::Unknown
            };

            let segments: Vec<BoundingBox> = traversal_connection
                .visited_ids
                .iter()
                .filter_map(|node_id| graph.node(node_id).map(|node| node.to_bounding_box()))
                .collect();

            let target = asset_symbol(graph, connected_node_id)?;
            connections.push(ConnectedSymbolsConnectionItem {
                id: int_id_from_node_id(connected_node_id)?,
                label: target.label.clone(),
                text_associated: target.text_associated.clone().unwrap_or_default(),
                flow_direction,
                segments,
                bounding_box: target.bounds,
            });
        }

        output.push(ConnectedSymbolsItem {
            id: int_id_from_node_id(asset_symbol_id)?,
            label: container.label.clone(),
            text_associated: container.text_associated.clone().unwrap_or_default(),
            bounding_box: container.bounds,
            connections,
        });
    }

    Ok(output)
}

fn asset_symbol<'a>(
    graph: &'a GraphService,
    node_id: &str,
) -> Result<&'a crate::shared::models::SymbolAndTextAssociated> {
    graph
        .node(node_id)
        .and_then(|node| node.symbol_data())
        .ok_or_else(|| GraphError::internal(format!("asset '{}' is not a symbol node", node_id)))
}
