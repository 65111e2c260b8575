use serde::{Deserialize, Serialize};

/// Axis-aligned box of a detected element, in [0, 1] normalized image space.
///
/// `(top_x, top_y)` is the upper-left corner and `(bottom_x, bottom_y)` the
/// lower-right corner; y grows downward as in image coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundingBox {
    pub top_x: f64,
    pub top_y: f64,
    pub bottom_x: f64,
    pub bottom_y: f64,
}

impl BoundingBox {
    pub fn new(top_x: f64, top_y: f64, bottom_x: f64, bottom_y: f64) -> Self {
        Self {
            top_x,
            top_y,
            bottom_x,
            bottom_y,
        }
    }

    pub fn width(&self) -> f64 {
        self.bottom_x - self.top_x
    }

    pub fn height(&self) -> f64 {
        self.bottom_y - self.top_y
    }

    /// Corner ordering invariant: top before bottom on both axes.
    pub fn is_well_formed(&self) -> bool {
        self.top_x <= self.bottom_x && self.top_y <= self.bottom_y
    }

    pub fn is_within_unit_square(&self) -> bool {
        let in_range = |v: f64| (0.0..=1.0).contains(&v);
        in_range(self.top_x) && in_range(self.top_y) && in_range(self.bottom_x) && in_range(self.bottom_y)
    }

    /// Whether the given element coordinates fall entirely inside this box.
    pub fn contains_element(&self, top_x: f64, top_y: f64, bottom_x: f64, bottom_y: f64) -> bool {
        top_x >= self.top_x && bottom_x <= self.bottom_x && top_y >= self.top_y && bottom_y <= self.bottom_y
    }
}
