//! Materializes the matched candidates as graph edges. Text claims first
//! synthesize a bridge line node; a second line claiming the same text reuses
//! the bridge already created.

use rustc_hash::FxHashSet;

use crate::error::{GraphError, Result};
use crate::graph::id_builder::{line_node_id, text_line_node_id};
use crate::graph::{GraphNode, GraphService};
use crate::pipeline::stages::create_lines::create_line_from_bounding_box;
use crate::shared::models::{CandidatePair, GraphNodeType, LineSegment, TextRecognized};

pub fn connect_lines_with_closest_elements(
    graph: &mut GraphService,
    line_connection_candidates: &[CandidatePair],
    text_results: &[TextRecognized],
    line_segments: &[LineSegment],
) -> Result<()> {
    let mut seen_text_ids: FxHashSet<usize> = FxHashSet::default();

    for (line_index, candidates) in line_connection_candidates.iter().enumerate() {
        let node_line_id = line_node_id(line_index);
        let line = &line_segments[line_index];

        for candidate in [&candidates.start, &candidates.end] {
            let Some(candidate_node) = &candidate.node else {
                continue;
            };

            let connected_node_id = match candidate.node_type {
                GraphNodeType::Unknown => continue,
                GraphNodeType::Text => {
                    let text_index: usize = candidate_node.parse().map_err(|_| {
                        GraphError::internal(format!("text candidate id '{}' is not an index", candidate_node))
                    })?;
                    let connected_node_id = text_line_node_id(text_index);

                    if !seen_text_ids.contains(&text_index) {
                        let text_info = text_results.get(text_index).ok_or_else(|| {
                            GraphError::internal(format!("text candidate index {} out of range", text_index))
                        })?;
                        let connected_line = create_line_from_bounding_box(&text_info.bounds, line);
                        graph.add_node(&connected_node_id, GraphNode::line(connected_line));

                        // The claiming line inherits the text as its tag.
                        if let Some(line_node) = graph.node_mut(&node_line_id) {
                            line_node.set_text_associated(&text_info.text);
                        }

                        seen_text_ids.insert(text_index);
                    }
                    connected_node_id
                }
                GraphNodeType::Line => format!("l-{}", candidate_node),
                GraphNodeType::Symbol => format!("s-{}", candidate_node),
            };

            graph.add_edge(&node_line_id, &connected_node_id)?;
        }
    }

    Ok(())
}
