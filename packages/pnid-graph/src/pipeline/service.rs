//! The graph construction pipeline, stage by stage.

use std::time::Instant;

use tracing::{debug, info};

use crate::config::{Config, NormalizedThresholds};
use crate::error::Result;
use crate::shared::models::{
    ArrowRecord, ConnectedSymbolsItem, GraphConstructionRequest, LineDetectionResponse,
};

use super::stages;

/// Everything the pipeline publishes for one diagram.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphConstructionOutcome {
    /// The asset connectivity, the primary deliverable.
    pub connected_symbols: Vec<ConnectedSymbolsItem>,
    /// Each arrow's inferred direction and source line.
    pub arrow_nodes: Vec<ArrowRecord>,
}

/// Runs the full pipeline for one diagram.
///
/// The graph is owned by this invocation; nothing is shared across calls, and
/// identical inputs produce identical outputs.
pub fn construct_graph(
    pid_id: &str,
    text_detection_results: &GraphConstructionRequest,
    line_detection_results: &LineDetectionResponse,
    config: &Config,
) -> Result<GraphConstructionOutcome> {
    text_detection_results.validate()?;
    line_detection_results.validate()?;

    let total_started = Instant::now();
    info!("Constructing graph for pid {}", pid_id);

    // Pixel-valued thresholds become normalized units for this image.
    let image_details = &line_detection_results.image_details;
    let thresholds = NormalizedThresholds::from_config(config, image_details.width, image_details.height);

    let line_segments = line_detection_results.canonicalized_segments();

    debug!("Step 1: Extending the lines...");
    let step_started = Instant::now();
    let extended_lines = stages::extend_lines(&line_segments, thresholds.line_segment_padding);
    debug!("Step 1 finished in {:?}", step_started.elapsed());

    debug!("Step 2: Removing all text outside of the main inclusive box...");
    let step_started = Instant::now();
    let text_results = stages::remove_text_outside_inclusive_box(
        text_detection_results.bounding_box_inclusive.as_ref(),
        &text_detection_results.all_text_list,
    );
    debug!("Step 2 finished in {:?}", step_started.elapsed());

    debug!("Step 3: Creating the nodes on the graph...");
    let step_started = Instant::now();
    let mut graph = stages::initialize_graph(
        &text_detection_results.text_and_symbols_associated_list,
        &line_segments,
    );
    debug!("Step 3 finished in {:?}", step_started.elapsed());

    info!("Step 4: Creating line start and end connection candidates...");
    let step_started = Instant::now();
    let line_connection_candidates = stages::create_line_connection_candidates(
        &line_segments,
        &extended_lines,
        &text_detection_results.text_and_symbols_associated_list,
        &text_results,
        &thresholds,
        config.workers_count_for_data_batch,
    );
    info!("Step 4 finished in {:?}", step_started.elapsed());

    debug!("Step 5: Connecting lines with the closest elements...");
    let step_started = Instant::now();
    stages::connect_lines_with_closest_elements(
        &mut graph,
        &line_connection_candidates,
        &text_results,
        &line_segments,
    )?;
    debug!("Step 5 finished in {:?}", step_started.elapsed());

    debug!("Step 6: Connecting the symbols that are close...");
    let step_started = Instant::now();
    stages::connect_symbols_that_are_close(
        &mut graph,
        &text_detection_results.text_and_symbols_associated_list,
        thresholds.symbol_to_symbol_distance,
        config,
    )?;
    debug!("Step 6 finished in {:?}", step_started.elapsed());

    debug!("Step 7: Connecting the lines with arrows...");
    let step_started = Instant::now();
    let arrow_nodes = stages::connect_lines_with_arrows(&mut graph, &line_segments, &extended_lines, config)?;
    debug!("Step 7 finished in {:?}", step_started.elapsed());

    info!("Step 8: Graph traversal for finding asset connectivities...");
    let step_started = Instant::now();
    let classification = stages::classify_asset_symbols(&graph, config);
    let symbol_connections = stages::find_symbol_connectivities(
        &mut graph,
        &classification,
        text_detection_results.propagation_pass_exhaustive_search,
        &config.arrow_symbol_label,
    );
    let connected_symbols = stages::build_connected_symbols(
        &graph,
        &symbol_connections,
        &classification.flow_direction_asset_ids,
        &classification.asset_valve_symbol_ids,
    )?;
    info!("Step 8 finished in {:?}", step_started.elapsed());

    info!(
        "Constructed graph for pid {} in {:?}",
        pid_id,
        total_started.elapsed()
    );

    Ok(GraphConstructionOutcome {
        connected_symbols,
        arrow_nodes,
    })
}
