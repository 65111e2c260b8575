//! Projects detected segments outward along their own slope, so that
//! near-miss intersections caused by imperfect detection still register.

use crate::shared::models::{ExtendedLineSegment, LineSegment};

/// Slope between two points; vertical lines report `f64::INFINITY`.
pub fn slope_between_points(x1: f64, y1: f64, x2: f64, y2: f64) -> f64 {
    let x_delta = x2 - x1;
    if x_delta == 0.0 {
        return f64::INFINITY;
    }
    (y2 - y1) / x_delta
}

/// Pads every segment outward by `padding`, clamped to [0, 1] and rounded to
/// five decimal places to keep downstream intersection tests stable.
pub fn extend_lines(line_segments: &[LineSegment], padding: f64) -> Vec<ExtendedLineSegment> {
    line_segments
        .iter()
        .map(|line| extend_line(line, padding))
        .collect()
}

fn extend_line(line: &LineSegment, padding: f64) -> ExtendedLineSegment {
    let slope = slope_between_points(line.start_x, line.start_y, line.end_x, line.end_y);

    let (start_x, start_y, end_x, end_y);
    if slope.is_infinite() {
        // Vertical: only the y coordinates move.
        start_x = line.start_x;
        start_y = (line.start_y - padding).max(0.0);
        end_x = line.end_x;
        end_y = (line.end_y + padding).min(1.0);
    } else {
        // Pad x on both ends and recompute y from the slope-intercept form.
        let intercept = line.start_y - slope * line.start_x;
        start_x = (line.start_x - padding).max(0.0);
        start_y = (slope * start_x + intercept).clamp(0.0, 1.0);
        end_x = (line.end_x + padding).min(1.0);
        end_y = (slope * end_x + intercept).clamp(0.0, 1.0);
    }

    ExtendedLineSegment {
        segment: LineSegment::new(round5(start_x), round5(start_y), round5(end_x), round5(end_y)),
        slope: if slope.is_infinite() { slope } else { round5(slope) },
    }
}

fn round5(value: f64) -> f64 {
    (value * 100_000.0).round() / 100_000.0
}
