//! Pipeline configuration.
//!
//! All `*_pixels` options are absolute pixel values; they are converted to
//! [0, 1] normalized units per image via [`NormalizedThresholds`] before the
//! pipeline uses them.

use std::collections::BTreeSet;
use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::Result;

/// Recognized configuration options with their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub arrow_symbol_label: String,
    pub centroid_distance_threshold: f64,
    pub detect_dotted_lines: bool,
    #[serde(deserialize_with = "prefix_set")]
    pub flow_direction_asset_prefixes: BTreeSet<String>,
    pub graph_distance_threshold_for_lines_pixels: u32,
    pub graph_distance_threshold_for_symbols_pixels: u32,
    pub graph_distance_threshold_for_text_pixels: u32,
    pub graph_line_buffer_pixels: u32,
    pub graph_symbol_to_symbol_distance_threshold_pixels: u32,
    pub graph_symbol_to_symbol_overlap_region_threshold: f64,
    pub line_detection_hough_max_line_gap: Option<u32>,
    pub line_detection_hough_min_line_length: Option<u32>,
    pub line_detection_hough_rho: f64,
    pub line_detection_hough_theta: u32,
    pub line_detection_hough_threshold: u32,
    pub line_detection_job_timeout_seconds: u64,
    pub line_segment_padding_default: f64,
    #[serde(deserialize_with = "prefix_set")]
    pub symbol_label_for_connectors: BTreeSet<String>,
    #[serde(deserialize_with = "prefix_set")]
    pub symbol_label_prefixes_to_connect_if_close: BTreeSet<String>,
    #[serde(deserialize_with = "prefix_set")]
    pub symbol_label_prefixes_to_include_in_graph_image_output: BTreeSet<String>,
    #[serde(deserialize_with = "prefix_set")]
    pub symbol_label_prefixes_with_text: BTreeSet<String>,
    pub symbol_overlap_threshold: f64,
    pub valve_symbol_prefix: String,
    pub workers_count_for_data_batch: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            arrow_symbol_label: "Piping/Fittings/Mid arrow flow direction".to_string(),
            centroid_distance_threshold: 0.5,
            detect_dotted_lines: false,
            flow_direction_asset_prefixes: to_set(&["Equipment/", "Piping/Endpoint/Pagination"]),
            graph_distance_threshold_for_lines_pixels: 50,
            graph_distance_threshold_for_symbols_pixels: 5,
            graph_distance_threshold_for_text_pixels: 5,
            graph_line_buffer_pixels: 5,
            graph_symbol_to_symbol_distance_threshold_pixels: 10,
            graph_symbol_to_symbol_overlap_region_threshold: 0.7,
            line_detection_hough_max_line_gap: None,
            line_detection_hough_min_line_length: Some(10),
            line_detection_hough_rho: 0.1,
            line_detection_hough_theta: 1080,
            line_detection_hough_threshold: 5,
            line_detection_job_timeout_seconds: 300,
            line_segment_padding_default: 0.2,
            symbol_label_for_connectors: to_set(&["Piping/Endpoint/Pagination"]),
            symbol_label_prefixes_to_connect_if_close: to_set(&[
                "Equipment",
                "Instrument/Valve/",
                "Piping/Fittings/Mid arrow flow direction",
                "Piping/Fittings/Flanged connection",
            ]),
            symbol_label_prefixes_to_include_in_graph_image_output: to_set(&[
                "Equipment/",
                "Instrument/Valve/",
                "Piping/Endpoint/Pagination",
            ]),
            symbol_label_prefixes_with_text: to_set(&[
                "Equipment/",
                "Instrument/",
                "Piping/Endpoint/Pagination",
            ]),
            symbol_overlap_threshold: 0.6,
            valve_symbol_prefix: "Instrument/Valve/".to_string(),
            workers_count_for_data_batch: 3,
        }
    }
}

impl Config {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let mut config: Config = serde_json::from_str(json)?;
        config.apply_dotted_line_rules();
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Dotted-line detection trades the minimum-line-length validation for a
    /// maximum-line-gap one; the two options are coupled.
    pub fn apply_dotted_line_rules(&mut self) {
        if self.detect_dotted_lines {
            self.line_detection_hough_min_line_length = None;
            if self.line_detection_hough_max_line_gap.is_none() {
                self.line_detection_hough_max_line_gap = Some(10);
            }
        } else {
            if self
                .line_detection_hough_min_line_length
                .map_or(true, |length| length < 10)
            {
                self.line_detection_hough_min_line_length = Some(10);
            }
            self.line_detection_hough_max_line_gap = None;
        }
    }
}

/// Pixel thresholds converted to normalized units for one image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizedThresholds {
    pub line_segment_padding: f64,
    pub line_buffer: f64,
    pub distance_for_symbols: f64,
    pub distance_for_text: f64,
    pub distance_for_lines: f64,
    pub symbol_to_symbol_distance: f64,
}

impl NormalizedThresholds {
    pub fn from_config(config: &Config, image_width: u32, image_height: u32) -> Self {
        Self {
            line_segment_padding: config.line_segment_padding_default,
            line_buffer: normalize_pixel_value(config.graph_line_buffer_pixels, image_width, image_height),
            distance_for_symbols: normalize_pixel_value(
                config.graph_distance_threshold_for_symbols_pixels,
                image_width,
                image_height,
            ),
            distance_for_text: normalize_pixel_value(
                config.graph_distance_threshold_for_text_pixels,
                image_width,
                image_height,
            ),
            distance_for_lines: normalize_pixel_value(
                config.graph_distance_threshold_for_lines_pixels,
                image_width,
                image_height,
            ),
            symbol_to_symbol_distance: normalize_pixel_value(
                config.graph_symbol_to_symbol_distance_threshold_pixels,
                image_width,
                image_height,
            ),
        }
    }
}

pub fn normalize_pixel_value(pixels: u32, image_width: u32, image_height: u32) -> f64 {
    f64::from(pixels) / f64::from(image_width.max(image_height))
}

fn to_set(values: &[&str]) -> BTreeSet<String> {
    values.iter().map(|v| v.to_string()).collect()
}

/// Prefix options accept either a JSON array or a comma-separated string.
fn prefix_set<'de, D>(deserializer: D) -> std::result::Result<BTreeSet<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StringOrSeq {
        Text(String),
        Seq(BTreeSet<String>),
    }

    match StringOrSeq::deserialize(deserializer)? {
        StringOrSeq::Text(text) => Ok(text.split(',').map(|part| part.trim().to_string()).collect()),
        StringOrSeq::Seq(set) => Ok(set),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.graph_distance_threshold_for_lines_pixels, 50);
        assert_eq!(config.workers_count_for_data_batch, 3);
        assert!(config.flow_direction_asset_prefixes.contains("Equipment/"));
    }

    #[test]
    fn test_prefix_set_from_comma_string() {
        let config =
            Config::from_json_str(r#"{"flow_direction_asset_prefixes": "Equipment/, Piping/Endpoint/Pagination"}"#)
                .unwrap();
        assert_eq!(config.flow_direction_asset_prefixes.len(), 2);
        assert!(config.flow_direction_asset_prefixes.contains("Piping/Endpoint/Pagination"));
    }

    #[test]
    fn test_prefix_set_from_array() {
        let config = Config::from_json_str(r#"{"symbol_label_for_connectors": ["A/", "B/"]}"#).unwrap();
        assert_eq!(config.symbol_label_for_connectors.len(), 2);
    }

    #[test]
    fn test_dotted_line_rules_enabled() {
        let mut config = Config {
            detect_dotted_lines: true,
            ..Config::default()
        };
        config.apply_dotted_line_rules();
        assert_eq!(config.line_detection_hough_min_line_length, None);
        assert_eq!(config.line_detection_hough_max_line_gap, Some(10));
    }

    #[test]
    fn test_dotted_line_rules_disabled_restores_min_length() {
        let mut config = Config {
            detect_dotted_lines: false,
            line_detection_hough_min_line_length: Some(3),
            line_detection_hough_max_line_gap: Some(12),
            ..Config::default()
        };
        config.apply_dotted_line_rules();
        assert_eq!(config.line_detection_hough_min_line_length, Some(10));
        assert_eq!(config.line_detection_hough_max_line_gap, None);
    }

    #[test]
    fn test_dotted_line_rules_idempotent() {
        let mut config = Config {
            detect_dotted_lines: true,
            ..Config::default()
        };
        config.apply_dotted_line_rules();
        let once = config.clone();
        config.apply_dotted_line_rules();
        assert_eq!(config, once);
    }

    #[test]
    fn test_normalize_pixel_value_uses_long_side() {
        assert_eq!(normalize_pixel_value(50, 1000, 500), 0.05);
        assert_eq!(normalize_pixel_value(50, 500, 1000), 0.05);
    }

    #[test]
    fn test_normalized_thresholds() {
        let thresholds = NormalizedThresholds::from_config(&Config::default(), 1000, 800);
        assert_eq!(thresholds.line_buffer, 0.005);
        assert_eq!(thresholds.distance_for_lines, 0.05);
        assert_eq!(thresholds.line_segment_padding, 0.2);
    }
}
