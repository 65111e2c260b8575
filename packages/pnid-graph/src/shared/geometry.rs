//! Geometric primitives over the `geo` crate.
//!
//! Thick ("buffered") polyline tests are expressed as distance-versus-buffer
//! comparisons: a disk-buffered shape intersects another shape exactly when
//! the unbuffered distance is within the buffer radius.

use geo::{coord, Line, LineString, Point, Polygon};
use geo::{Distance, Euclidean, Intersects};

use crate::shared::models::{BoundingBox, ExtendedLineSegment, LineSegment};

/// Tolerance for deciding that a clipped point lies on a box side.
const SIDE_EPS: f64 = 1e-9;

pub fn point(x: f64, y: f64) -> Point<f64> {
    Point::new(x, y)
}

/// Converts a bounding box into its axis-aligned polygon, corners ordered
/// top-left, top-right, bottom-right, bottom-left.
pub fn bounding_box_to_polygon(bounds: &BoundingBox) -> Polygon<f64> {
    Polygon::new(
        LineString::from(vec![
            (bounds.top_x, bounds.top_y),
            (bounds.bottom_x, bounds.top_y),
            (bounds.bottom_x, bounds.bottom_y),
            (bounds.top_x, bounds.bottom_y),
        ]),
        vec![],
    )
}

pub fn segment_to_line_string(segment: &LineSegment) -> LineString<f64> {
    LineString::from(vec![
        (segment.start_x, segment.start_y),
        (segment.end_x, segment.end_y),
    ])
}

pub fn extended_to_line_string(extended: &ExtendedLineSegment) -> LineString<f64> {
    segment_to_line_string(&extended.segment)
}

pub fn points_distance(a: Point<f64>, b: Point<f64>) -> f64 {
    Euclidean.distance(a, b)
}

pub fn polygon_to_point_distance(polygon: &Polygon<f64>, point: &Point<f64>) -> f64 {
    Euclidean.distance(polygon, point)
}

pub fn line_string_to_point_distance(line: &LineString<f64>, point: &Point<f64>) -> f64 {
    Euclidean.distance(line, point)
}

pub fn polygons_distance(a: &Polygon<f64>, b: &Polygon<f64>) -> f64 {
    Euclidean.distance(a, b)
}

/// Whether a polyline buffered by `buffer` would intersect the polygon.
pub fn buffered_line_intersects_polygon(line: &LineString<f64>, buffer: f64, polygon: &Polygon<f64>) -> bool {
    line.intersects(polygon) || Euclidean.distance(line, polygon) <= buffer
}

/// Whether two polylines, each buffered by its own radius, would intersect.
pub fn buffered_lines_intersect(a: &LineString<f64>, buffer_a: f64, b: &LineString<f64>, buffer_b: f64) -> bool {
    a.intersects(b) || Euclidean.distance(a, b) <= buffer_a + buffer_b
}

pub fn polygons_intersect(a: &Polygon<f64>, b: &Polygon<f64>) -> bool {
    a.intersects(b)
}

/// The four sides of a box, in the order top, right, bottom, left.
pub fn box_sides(bounds: &BoundingBox) -> [Line<f64>; 4] {
    let top_left = coord! { x: bounds.top_x, y: bounds.top_y };
    let top_right = coord! { x: bounds.bottom_x, y: bounds.top_y };
    let bottom_right = coord! { x: bounds.bottom_x, y: bounds.bottom_y };
    let bottom_left = coord! { x: bounds.top_x, y: bounds.bottom_y };
    [
        Line::new(top_left, top_right),
        Line::new(top_right, bottom_right),
        Line::new(bottom_right, bottom_left),
        Line::new(bottom_left, top_left),
    ]
}

pub fn side_length(side: &Line<f64>) -> f64 {
    (side.end.x - side.start.x).hypot(side.end.y - side.start.y)
}

pub fn side_midpoint(side: &Line<f64>) -> Point<f64> {
    point(
        (side.start.x + side.end.x) / 2.0,
        (side.start.y + side.end.y) / 2.0,
    )
}

/// Whether `p` lies on the side, within a small tolerance.
///
/// Clipped intersection points are interpolated in floating point, so an
/// exact on-segment predicate would reject them.
pub fn point_on_side(p: &Point<f64>, side: &Line<f64>) -> bool {
    let (sx, sy) = (side.start.x, side.start.y);
    let (ex, ey) = (side.end.x, side.end.y);
    let cross = (ex - sx) * (p.y() - sy) - (ey - sy) * (p.x() - sx);
    if cross.abs() > SIDE_EPS {
        return false;
    }
    let within = |v: f64, a: f64, b: f64| v >= a.min(b) - SIDE_EPS && v <= a.max(b) + SIDE_EPS;
    within(p.x(), sx, ex) && within(p.y(), sy, ey)
}

/// Clips a segment against an axis-aligned box (Liang-Barsky) and returns the
/// entry and exit points, or `None` when the segment misses the box.
pub fn clip_segment_to_box(segment: &LineSegment, bounds: &BoundingBox) -> Option<(Point<f64>, Point<f64>)> {
    let x0 = segment.start_x;
    let y0 = segment.start_y;
    let dx = segment.end_x - x0;
    let dy = segment.end_y - y0;

    let mut t0 = 0.0_f64;
    let mut t1 = 1.0_f64;

    let clips = [
        (-dx, x0 - bounds.top_x),
        (dx, bounds.bottom_x - x0),
        (-dy, y0 - bounds.top_y),
        (dy, bounds.bottom_y - y0),
    ];

    for (p, q) in clips {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
        } else {
            let r = q / p;
            if p < 0.0 {
                if r > t1 {
                    return None;
                }
                if r > t0 {
                    t0 = r;
                }
            } else {
                if r < t0 {
                    return None;
                }
                if r < t1 {
                    t1 = r;
                }
            }
        }
    }

    Some((
        point(x0 + t0 * dx, y0 + t0 * dy),
        point(x0 + t1 * dx, y0 + t1 * dy),
    ))
}

/// Box widened on the x axis by half the padding on each side.
pub fn padded_horizontal(bounds: &BoundingBox, padding: f64) -> BoundingBox {
    let half = padding / 2.0;
    BoundingBox::new(
        bounds.top_x - half,
        bounds.top_y,
        bounds.bottom_x + half,
        bounds.bottom_y,
    )
}

/// Box widened on the y axis by half the padding on each side.
pub fn padded_vertical(bounds: &BoundingBox, padding: f64) -> BoundingBox {
    let half = padding / 2.0;
    BoundingBox::new(
        bounds.top_x,
        bounds.top_y - half,
        bounds.bottom_x,
        bounds.bottom_y + half,
    )
}

/// Whether the x-extents of two boxes overlap by at least `threshold` of
/// either box's width.
pub fn high_overlap_in_horizontal_region(a: &BoundingBox, b: &BoundingBox, threshold: f64) -> bool {
    let overlap = a.bottom_x.min(b.bottom_x) - a.top_x.max(b.top_x);
    overlap / a.width() >= threshold || overlap / b.width() >= threshold
}

/// Whether the y-extents of two boxes overlap by at least `threshold` of
/// either box's height.
pub fn high_overlap_in_vertical_region(a: &BoundingBox, b: &BoundingBox, threshold: f64) -> bool {
    let overlap = a.bottom_y.min(b.bottom_y) - a.top_y.max(b.top_y);
    overlap / a.height() >= threshold || overlap / b.height() >= threshold
}
