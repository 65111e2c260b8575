//! Arrow direction inference: each arrow symbol is matched against its
//! incident lines to find the line it points away from. That line becomes
//! the arrow's source, turning the arrow into a directional hint for the
//! propagation pass.

use geo::Line;
use rustc_hash::FxHashMap;

use crate::config::Config;
use crate::error::Result;
use crate::graph::id_builder::node_type_from_node_id;
use crate::graph::GraphService;
use crate::shared::geometry;
use crate::shared::models::{
    ArrowDirection, ArrowRecord, BoundingBox, ExtendedLineSegment, GraphNodeType, LineSegment,
};

/// Per-arrow resolution state: the claiming line (if any) and the direction.
type ArrowCandidates = FxHashMap<String, (Option<String>, ArrowDirection)>;

pub fn connect_lines_with_arrows(
    graph: &mut GraphService,
    line_segments: &[LineSegment],
    extended_lines: &[ExtendedLineSegment],
    config: &Config,
) -> Result<Vec<ArrowRecord>> {
    let mut arrow_line_candidates = ArrowCandidates::default();

    let arrow_node_ids = graph.symbol_node_ids_by_label(&config.arrow_symbol_label);

    for arrow_node_id in &arrow_node_ids {
        let Some(arrow_bounds) = graph
            .node(arrow_node_id)
            .and_then(|node| node.symbol_data())
            .map(|symbol| symbol.bounds)
        else {
            continue;
        };

        for neighbor_id in graph.neighbors(arrow_node_id) {
            if node_type_from_node_id(&neighbor_id) != GraphNodeType::Line {
                continue;
            }
            // Only detected lines carry an extended counterpart; synthesized
            // bridge lines ("l-t-*", "l-s-*") cannot claim an arrow.
            let Some(line_index) = detected_line_index(&neighbor_id) else {
                continue;
            };
            let (Some(line_segment), Some(extended_line)) =
                (line_segments.get(line_index), extended_lines.get(line_index))
            else {
                continue;
            };

            // Once two lines disagree the arrow stays unknown.
            if arrow_line_candidates
                .get(arrow_node_id)
                .is_some_and(|(_, direction)| *direction == ArrowDirection::Unknown)
            {
                break;
            }

            candidate_matching_for_source_line_to_arrow(
                arrow_node_id,
                &arrow_bounds,
                &neighbor_id,
                line_segment,
                extended_line,
                config.centroid_distance_threshold,
                &mut arrow_line_candidates,
            );
        }
    }

    let mut arrow_records = Vec::with_capacity(arrow_node_ids.len());
    for arrow_node_id in &arrow_node_ids {
        // Arrows that never saw a centered line default to unknown.
        let (source_line_id, arrow_direction) = arrow_line_candidates
            .get(arrow_node_id)
            .cloned()
            .unwrap_or((None, ArrowDirection::Unknown));

        if let Some(node) = graph.node_mut(arrow_node_id) {
            node.sources = source_line_id.iter().cloned().collect();
            node.arrow_direction = Some(arrow_direction);
        }

        if let Some(symbol) = graph.node(arrow_node_id).and_then(|node| node.symbol_data()) {
            arrow_records.push(ArrowRecord {
                id: symbol.id,
                label: symbol.label.clone(),
                score: symbol.score,
                bounding_box: symbol.bounds,
                text_associated: symbol.text_associated.clone(),
                arrow_direction,
                sources: source_line_id.into_iter().collect(),
            });
        }
    }

    Ok(arrow_records)
}

fn detected_line_index(node_id: &str) -> Option<usize> {
    node_id.strip_prefix("l-").and_then(|rest| rest.parse().ok())
}

#[allow(clippy::too_many_arguments)]
fn candidate_matching_for_source_line_to_arrow(
    arrow_node_id: &str,
    arrow_bounds: &BoundingBox,
    line_node_id: &str,
    line: &LineSegment,
    extended_line: &ExtendedLineSegment,
    centroid_distance_threshold: f64,
    arrow_line_candidates: &mut ArrowCandidates,
) {
    // Association without an actual crossing happens when the edge came from
    // an endpoint match; nothing to orient then.
    let Some((point1, point2)) = geometry::clip_segment_to_box(&extended_line.segment, arrow_bounds) else {
        return;
    };

    // Of the two crossing points, keep the one nearer to the raw line.
    let start_point = geometry::point(line.start_x, line.start_y);
    let end_point = geometry::point(line.end_x, line.end_y);

    let distance_point1 = geometry::points_distance(point1, start_point)
        .min(geometry::points_distance(point1, end_point));
    let distance_point2 = geometry::points_distance(point2, start_point)
        .min(geometry::points_distance(point2, end_point));

    let closest_point = if distance_point1 < distance_point2 { point1 } else { point2 };

    for (side, arrow_direction) in sides_with_arrow_orientation(arrow_bounds) {
        if !geometry::point_on_side(&closest_point, &side) {
            continue;
        }

        let center_point = geometry::side_midpoint(&side);
        let distance = geometry::points_distance(center_point, closest_point) / (geometry::side_length(&side) / 2.0);

        // Entry close to the side's midpoint means the line feeds the arrow
        // squarely through that side.
        if distance < centroid_distance_threshold {
            if !arrow_line_candidates.contains_key(arrow_node_id) {
                arrow_line_candidates.insert(
                    arrow_node_id.to_string(),
                    (Some(line_node_id.to_string()), arrow_direction),
                );
            } else {
                arrow_line_candidates.insert(arrow_node_id.to_string(), (None, ArrowDirection::Unknown));
            }
        }
    }
}

/// Box sides paired with the direction an arrow entered through that side
/// points to: top feeds a downward arrow, right feeds a leftward one, and so
/// on.
fn sides_with_arrow_orientation(bounds: &BoundingBox) -> [(Line<f64>, ArrowDirection); 4] {
    let [top, right, bottom, left] = geometry::box_sides(bounds);
    [
        (top, ArrowDirection::Down),
        (right, ArrowDirection::Left),
        (bottom, ArrowDirection::Up),
        (left, ArrowDirection::Right),
    ]
}
