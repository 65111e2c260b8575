//! Drops text detections outside the user-provided inclusive region, so
//! legend and title-block text does not leak into the graph.

use crate::shared::models::{BoundingBox, TextRecognized};

pub fn remove_text_outside_inclusive_box(
    bounding_box_inclusive: Option<&BoundingBox>,
    text_list: &[TextRecognized],
) -> Vec<TextRecognized> {
    text_list
        .iter()
        .filter(|item| match bounding_box_inclusive {
            None => true,
            Some(inclusive) => inclusive.contains_element(
                item.bounds.top_x,
                item.bounds.top_y,
                item.bounds.bottom_x,
                item.bounds.bottom_y,
            ),
        })
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(top_x: f64, top_y: f64, bottom_x: f64, bottom_y: f64, value: &str) -> TextRecognized {
        TextRecognized::new(BoundingBox::new(top_x, top_y, bottom_x, bottom_y), value)
    }

    #[test]
    fn test_no_box_keeps_everything() {
        let texts = vec![text(0.0, 0.0, 0.1, 0.1, "A"), text(0.9, 0.9, 1.0, 1.0, "B")];
        assert_eq!(remove_text_outside_inclusive_box(None, &texts).len(), 2);
    }

    #[test]
    fn test_filters_text_outside_region() {
        let inclusive = BoundingBox::new(0.1, 0.1, 0.8, 0.8);
        let texts = vec![
            text(0.2, 0.2, 0.3, 0.25, "inside"),
            text(0.85, 0.2, 0.95, 0.25, "outside"),
            text(0.05, 0.2, 0.3, 0.25, "straddling"),
        ];
        let kept = remove_text_outside_inclusive_box(Some(&inclusive), &texts);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].text, "inside");
    }

    #[test]
    fn test_region_bounds_are_inclusive() {
        let inclusive = BoundingBox::new(0.1, 0.1, 0.8, 0.8);
        let texts = vec![text(0.1, 0.1, 0.8, 0.8, "edge")];
        assert_eq!(remove_text_outside_inclusive_box(Some(&inclusive), &texts).len(), 1);
    }
}
