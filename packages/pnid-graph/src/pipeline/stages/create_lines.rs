//! Synthesis of short helper lines that stitch non-line entities into the
//! graph.

use crate::shared::models::{BoundingBox, LineSegment};

/// A short segment along the side of `bounds` that `line` approaches from,
/// bridging a text box into the line network.
pub fn create_line_from_bounding_box(bounds: &BoundingBox, line: &LineSegment) -> LineSegment {
    if line.start_x < bounds.top_x {
        // Approached from the left.
        LineSegment::new(line.end_x, line.end_y, line.end_x + bounds.width(), line.end_y)
    } else if line.end_x > bounds.bottom_x {
        // Approached from the right.
        LineSegment::new(line.start_x - bounds.width(), line.start_y, line.start_x, line.start_y)
    } else if line.start_y < bounds.top_y {
        // Approached from the top.
        LineSegment::new(line.end_x, line.end_y, line.end_x, line.end_y + bounds.height())
    } else {
        // Approached from the bottom.
        LineSegment::new(line.start_x, line.start_y - bounds.height(), line.start_x, line.start_y)
    }
}

/// A segment joining the centroids of two boxes.
pub fn create_line_between_boxes(box1: &BoundingBox, box2: &BoundingBox) -> LineSegment {
    LineSegment::new(
        (box1.top_x + box1.bottom_x) / 2.0,
        (box1.top_y + box1.bottom_y) / 2.0,
        (box2.top_x + box2.bottom_x) / 2.0,
        (box2.top_y + box2.bottom_y) / 2.0,
    )
}
