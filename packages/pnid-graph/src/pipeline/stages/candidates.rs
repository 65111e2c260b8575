//! Candidate matching: for every line segment, pick the best attachment for
//! its start and end points among symbols, texts, and other lines.
//!
//! Candidate sources are evaluated in a fixed order (symbols, then texts,
//! then lines) with per-category distance thresholds. Line-to-line matches
//! distinguish endpoint joins from T-junctions; endpoint joins win over
//! junctions on the same endpoint, and a plain 4-way crossing matches
//! neither case and produces no connection.

use geo::{LineString, Point};
use rayon::prelude::*;
use tracing::{debug, info};

use crate::config::NormalizedThresholds;
use crate::shared::geometry;
use crate::shared::models::{
    BoundingBox, CandidatePair, ConnectionCandidate, ExtendedLineSegment, GraphNodeType,
    LineSegment, SymbolAndTextAssociated, TextRecognized,
};

/// Scores every line segment against all candidate entities.
///
/// Lines are partitioned into batches and scored in parallel; batches share
/// no mutable state and results are reassembled in input order.
pub fn create_line_connection_candidates(
    line_segments: &[LineSegment],
    extended_lines: &[ExtendedLineSegment],
    text_and_symbols_associated_list: &[SymbolAndTextAssociated],
    text_results: &[TextRecognized],
    thresholds: &NormalizedThresholds,
    workers_count: usize,
) -> Vec<CandidatePair> {
    if line_segments.is_empty() {
        return Vec::new();
    }

    debug!("Starting candidate matching on line segments...");
    info!("Number of line segments: {}", line_segments.len());

    // Leave headroom below the core count so the calling process is not
    // starved while the batches run.
    let workers_count = workers_count.clamp(1, num_cpus::get());
    let batch_size = (line_segments.len() / workers_count).max(1);
    debug!("Batch size for each worker: {}", batch_size);

    let indices: Vec<usize> = (0..line_segments.len()).collect();
    indices
        .par_chunks(batch_size)
        .flat_map_iter(|batch| {
            batch.iter().map(|&source_line_index| {
                process_line_segment(
                    source_line_index,
                    line_segments,
                    extended_lines,
                    text_and_symbols_associated_list,
                    text_results,
                    thresholds,
                )
            })
        })
        .collect()
}

fn process_line_segment(
    source_line_index: usize,
    line_segments: &[LineSegment],
    extended_lines: &[ExtendedLineSegment],
    text_and_symbols_associated_list: &[SymbolAndTextAssociated],
    text_results: &[TextRecognized],
    thresholds: &NormalizedThresholds,
) -> CandidatePair {
    let source_line = &line_segments[source_line_index];
    let source_extended = geometry::extended_to_line_string(&extended_lines[source_line_index]);

    let source_start = geometry::point(source_line.start_x, source_line.start_y);
    let source_end = geometry::point(source_line.end_x, source_line.end_y);

    let mut candidates = CandidatePair::default();

    for symbol in text_and_symbols_associated_list {
        update_box_entity_candidates(
            &symbol.bounds,
            &symbol.id.to_string(),
            GraphNodeType::Symbol,
            thresholds.distance_for_symbols,
            &source_extended,
            thresholds.line_buffer,
            &source_start,
            &source_end,
            &mut candidates,
        );
    }

    for (text_index, text) in text_results.iter().enumerate() {
        update_box_entity_candidates(
            &text.bounds,
            &text_index.to_string(),
            GraphNodeType::Text,
            thresholds.distance_for_text,
            &source_extended,
            thresholds.line_buffer,
            &source_start,
            &source_end,
            &mut candidates,
        );
    }

    for (target_line_index, (target_line, target_extended)) in
        line_segments.iter().zip(extended_lines.iter()).enumerate()
    {
        if target_line_index == source_line_index {
            continue;
        }
        update_line_to_line_candidates(
            target_line,
            target_extended,
            &target_line_index.to_string(),
            &source_extended,
            thresholds.line_buffer,
            thresholds.distance_for_lines,
            &source_start,
            &source_end,
            &mut candidates,
        );
    }

    candidates
}

/// Shared logic for line-to-symbol and line-to-text matching: claim the
/// closer endpoint when within the category threshold and closer than the
/// endpoint's current candidate.
#[allow(clippy::too_many_arguments)]
fn update_box_entity_candidates(
    bounds: &BoundingBox,
    id: &str,
    node_type: GraphNodeType,
    category_distance_threshold: f64,
    source_extended: &LineString<f64>,
    line_buffer: f64,
    start_point: &Point<f64>,
    end_point: &Point<f64>,
    candidates: &mut CandidatePair,
) {
    let item_polygon = geometry::bounding_box_to_polygon(bounds);

    if !geometry::buffered_line_intersects_polygon(source_extended, line_buffer, &item_polygon) {
        return;
    }

    let start_distance = geometry::polygon_to_point_distance(&item_polygon, start_point);
    let end_distance = geometry::polygon_to_point_distance(&item_polygon, end_point);

    if start_distance <= end_distance {
        if start_distance <= category_distance_threshold
            && candidates.start.distance.map_or(true, |current| start_distance < current)
        {
            candidates.start = ConnectionCandidate::new(id, node_type, start_distance, false);
        }
    } else if end_distance <= category_distance_threshold
        && candidates.end.distance.map_or(true, |current| end_distance < current)
    {
        candidates.end = ConnectionCandidate::new(id, node_type, end_distance, false);
    }
}

#[allow(clippy::too_many_arguments)]
fn update_line_to_line_candidates(
    target_line: &LineSegment,
    target_extended: &ExtendedLineSegment,
    target_line_id: &str,
    source_extended: &LineString<f64>,
    line_buffer: f64,
    line_distance_threshold: f64,
    source_start: &Point<f64>,
    source_end: &Point<f64>,
    candidates: &mut CandidatePair,
) {
    let target_extended_string = geometry::extended_to_line_string(target_extended);

    if !geometry::buffered_lines_intersect(source_extended, line_buffer, &target_extended_string, line_buffer) {
        return;
    }

    let target_raw = geometry::segment_to_line_string(target_line);
    let target_start = geometry::point(target_line.start_x, target_line.start_y);
    let target_end = geometry::point(target_line.end_x, target_line.end_y);

    let start_point_distance = geometry::points_distance(target_start, *source_start)
        .min(geometry::points_distance(target_end, *source_start));
    let end_point_distance = geometry::points_distance(target_start, *source_end)
        .min(geometry::points_distance(target_end, *source_end));
    let start_line_distance = geometry::line_string_to_point_distance(&target_raw, source_start);
    let end_line_distance = geometry::line_string_to_point_distance(&target_raw, source_end);

    // Case 1: endpoint-to-endpoint join on the start side.
    if start_point_distance <= end_point_distance
        && start_point_distance < line_distance_threshold
        && accepts_point_update(&candidates.start, start_point_distance)
    {
        candidates.start = ConnectionCandidate::new(target_line_id, GraphNodeType::Line, start_point_distance, false);
    }
    // Case 2: endpoint-to-endpoint join on the end side.
    else if end_point_distance < start_point_distance
        && end_point_distance < line_distance_threshold
        && accepts_point_update(&candidates.end, end_point_distance)
    {
        candidates.end = ConnectionCandidate::new(target_line_id, GraphNodeType::Line, end_point_distance, false);
    }
    // Case 3: the start point hits the middle of the target (T-junction).
    else if start_line_distance <= end_line_distance
        && start_line_distance < line_distance_threshold
        && accepts_line_update(&candidates.start, start_line_distance)
    {
        candidates.start = ConnectionCandidate::new(target_line_id, GraphNodeType::Line, start_line_distance, true);
    }
    // Case 4: the end point hits the middle of the target (T-junction).
    else if end_line_distance < start_line_distance
        && end_line_distance < line_distance_threshold
        && accepts_line_update(&candidates.end, end_line_distance)
    {
        candidates.end = ConnectionCandidate::new(target_line_id, GraphNodeType::Line, end_line_distance, true);
    }
    // Otherwise (a 4-way crossing) the perpendicular lines are taken to be
    // unconnected and the candidates stay as they were.
}

/// Endpoint joins replace T-junction candidates outright, otherwise the
/// closer candidate wins.
fn accepts_point_update(current: &ConnectionCandidate, point_distance: f64) -> bool {
    current.intersection || current.distance.map_or(true, |distance| point_distance < distance)
}

/// T-junctions only replace other T-junctions or symbol/text claims, and only
/// when closer; a standing endpoint join is never displaced.
fn accepts_line_update(current: &ConnectionCandidate, line_distance: f64) -> bool {
    match current.distance {
        None => true,
        Some(distance) => {
            let symbol_or_text = matches!(current.node_type, GraphNodeType::Symbol | GraphNodeType::Text);
            (current.intersection && line_distance < distance) || (symbol_or_text && line_distance < distance)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, NormalizedThresholds};
    use crate::pipeline::stages::extend_lines::extend_lines;
    use crate::shared::models::BoundingBox;

    fn thresholds() -> NormalizedThresholds {
        NormalizedThresholds::from_config(&Config::default(), 1000, 1000)
    }

    fn symbol(id: u32, bounds: BoundingBox) -> SymbolAndTextAssociated {
        SymbolAndTextAssociated {
            id,
            label: "Equipment/Vessels/Drum".to_string(),
            score: None,
            bounds,
            text_associated: None,
        }
    }

    fn run(
        lines: &[LineSegment],
        symbols: &[SymbolAndTextAssociated],
        texts: &[TextRecognized],
    ) -> Vec<CandidatePair> {
        let extended = extend_lines(lines, 0.02);
        create_line_connection_candidates(lines, &extended, symbols, texts, &thresholds(), 3)
    }

    #[test]
    fn test_empty_input_yields_no_candidates() {
        assert!(run(&[], &[], &[]).is_empty());
    }

    #[test]
    fn test_line_claims_touching_symbol() {
        let lines = vec![LineSegment::new(0.1, 0.5, 0.9, 0.5)];
        let symbols = vec![symbol(1, BoundingBox::new(0.9, 0.45, 1.0, 0.55))];

        let candidates = run(&lines, &symbols, &[]);
        assert_eq!(candidates[0].end.node.as_deref(), Some("1"));
        assert_eq!(candidates[0].end.node_type, GraphNodeType::Symbol);
        assert!(!candidates[0].end.intersection);
        assert!(candidates[0].start.node.is_none());
    }

    #[test]
    fn test_distant_symbol_is_ignored() {
        let lines = vec![LineSegment::new(0.1, 0.5, 0.4, 0.5)];
        let symbols = vec![symbol(1, BoundingBox::new(0.8, 0.45, 0.9, 0.55))];

        let candidates = run(&lines, &symbols, &[]);
        assert!(candidates[0].start.node.is_none());
        assert!(candidates[0].end.node.is_none());
    }

    #[test]
    fn test_text_claims_start_point() {
        let lines = vec![LineSegment::new(0.1, 0.5, 0.9, 0.5)];
        let texts = vec![TextRecognized::new(BoundingBox::new(0.1, 0.5, 0.2, 0.51), "TAG")];

        let candidates = run(&lines, &[], &texts);
        assert_eq!(candidates[0].start.node.as_deref(), Some("0"));
        assert_eq!(candidates[0].start.node_type, GraphNodeType::Text);
    }

    #[test]
    fn test_closer_symbol_replaces_earlier_candidate() {
        let lines = vec![LineSegment::new(0.1, 0.5, 0.9, 0.5)];
        let symbols = vec![
            symbol(1, BoundingBox::new(0.902, 0.45, 1.0, 0.55)),
            symbol(2, BoundingBox::new(0.9, 0.45, 1.0, 0.55)),
        ];

        let candidates = run(&lines, &symbols, &[]);
        assert_eq!(candidates[0].end.node.as_deref(), Some("2"));
    }

    #[test]
    fn test_end_to_start_join_is_an_endpoint_match() {
        let lines = vec![
            LineSegment::new(0.1, 0.5, 0.5, 0.5),
            LineSegment::new(0.5, 0.5, 0.9, 0.5),
        ];

        let candidates = run(&lines, &[], &[]);
        assert_eq!(candidates[0].end.node.as_deref(), Some("1"));
        assert!(!candidates[0].end.intersection);
        assert_eq!(candidates[1].start.node.as_deref(), Some("0"));
        assert!(!candidates[1].start.intersection);
    }

    #[test]
    fn test_four_way_cross_does_not_connect() {
        let lines = vec![
            LineSegment::new(0.1, 0.5, 0.9, 0.5),
            LineSegment::new(0.5, 0.1, 0.5, 0.9),
        ];

        let candidates = run(&lines, &[], &[]);
        for pair in &candidates {
            assert!(pair.start.node.is_none());
            assert!(pair.end.node.is_none());
        }
    }

    #[test]
    fn test_t_junction_marks_intersection() {
        let lines = vec![
            LineSegment::new(0.1, 0.2, 0.9, 0.2),
            LineSegment::new(0.31, 0.2, 0.31, 0.8),
        ];

        let candidates = run(&lines, &[], &[]);
        // The vertical line's start sits on the middle of the horizontal one.
        assert_eq!(candidates[1].start.node.as_deref(), Some("0"));
        assert!(candidates[1].start.intersection);
    }

    #[test]
    fn test_endpoint_join_beats_t_junction() {
        // Line 1's start touches both line 0's end (endpoint join, scanned
        // via case 1) and crosses line 2 mid-segment.
        let lines = vec![
            LineSegment::new(0.1, 0.5, 0.5, 0.5),
            LineSegment::new(0.5, 0.5, 0.9, 0.5),
            LineSegment::new(0.52, 0.1, 0.52, 0.9),
        ];

        let candidates = run(&lines, &[], &[]);
        assert_eq!(candidates[1].start.node.as_deref(), Some("0"));
        assert!(!candidates[1].start.intersection);
    }

    #[test]
    fn test_results_follow_input_order() {
        let lines: Vec<LineSegment> = (0..8)
            .map(|i| {
                let y = 0.1 + i as f64 * 0.1;
                LineSegment::new(0.1, y, 0.4, y)
            })
            .collect();
        let symbols: Vec<SymbolAndTextAssociated> = (0..8)
            .map(|i| {
                let y = 0.1 + i as f64 * 0.1;
                symbol(i, BoundingBox::new(0.4, y - 0.01, 0.45, y + 0.01))
            })
            .collect();

        let candidates = run(&lines, &symbols, &[]);
        for (i, pair) in candidates.iter().enumerate() {
            assert_eq!(pair.end.node.as_deref(), Some(i.to_string().as_str()));
        }
    }
}
