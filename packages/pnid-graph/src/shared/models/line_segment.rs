use serde::{Deserialize, Serialize};

use super::BoundingBox;

/// A line segment detected on a diagram, in [0, 1] normalized image space.
///
/// Canonical orientation: endpoints are ordered by (x, then y) ascending, so a
/// horizontal line's start is its leftmost point and a vertical line's start is
/// its topmost point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineSegment {
    pub start_x: f64,
    pub start_y: f64,
    pub end_x: f64,
    pub end_y: f64,
}

impl LineSegment {
    pub fn new(start_x: f64, start_y: f64, end_x: f64, end_y: f64) -> Self {
        Self {
            start_x,
            start_y,
            end_x,
            end_y,
        }
    }

    pub fn is_canonical(&self) -> bool {
        self.start_x < self.end_x || (self.start_x == self.end_x && self.start_y <= self.end_y)
    }

    /// Reorders the endpoints into canonical (x, then y) ascending order.
    pub fn canonicalized(&self) -> LineSegment {
        if self.is_canonical() {
            *self
        } else {
            LineSegment::new(self.end_x, self.end_y, self.start_x, self.start_y)
        }
    }

    pub fn is_within_unit_square(&self) -> bool {
        let in_range = |v: f64| (0.0..=1.0).contains(&v);
        in_range(self.start_x) && in_range(self.start_y) && in_range(self.end_x) && in_range(self.end_y)
    }

    /// Axis-aligned box form: start maps to the top corner, end to the bottom.
    pub fn to_bounding_box(&self) -> BoundingBox {
        BoundingBox::new(self.start_x, self.start_y, self.end_x, self.end_y)
    }
}

/// A line segment padded outward along its own slope.
///
/// `slope` is `f64::INFINITY` for vertical lines.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExtendedLineSegment {
    pub segment: LineSegment,
    pub slope: f64,
}
