use serde::{Deserialize, Serialize};

use crate::error::{GraphError, Result};

use super::{BoundingBox, ConnectedSymbolsItem, LineSegment, SymbolAndTextAssociated, TextRecognized};

/// Pixel dimensions and encoding of the diagram image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageDetails {
    pub format: String,
    pub width: u32,
    pub height: u32,
}

/// Everything the graph construction stage consumes from text detection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphConstructionRequest {
    pub image_details: ImageDetails,
    #[serde(default)]
    pub bounding_box_inclusive: Option<BoundingBox>,
    pub all_text_list: Vec<TextRecognized>,
    pub text_and_symbols_associated_list: Vec<SymbolAndTextAssociated>,
    #[serde(default)]
    pub propagation_pass_exhaustive_search: bool,
}

impl GraphConstructionRequest {
    /// Rejects malformed boxes before the pipeline mutates any state.
    pub fn validate(&self) -> Result<()> {
        if let Some(inclusive) = &self.bounding_box_inclusive {
            validate_box("bounding_box_inclusive", inclusive)?;
        }
        for (i, text) in self.all_text_list.iter().enumerate() {
            validate_box(&format!("all_text_list[{}]", i), &text.bounds)?;
        }
        for symbol in &self.text_and_symbols_associated_list {
            validate_box(&format!("symbol {}", symbol.id), &symbol.bounds)?;
        }
        Ok(())
    }
}

/// Line detection output handed to graph construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineDetectionResponse {
    pub image_details: ImageDetails,
    pub line_segments: Vec<LineSegment>,
}

impl LineDetectionResponse {
    pub fn validate(&self) -> Result<()> {
        for (i, segment) in self.line_segments.iter().enumerate() {
            if !segment.is_within_unit_square() {
                return Err(GraphError::invalid_input(format!(
                    "line_segments[{}] has coordinates outside [0, 1]",
                    i
                )));
            }
        }
        Ok(())
    }

    /// Endpoint order as produced by detection can be arbitrary; the pipeline
    /// relies on (x, then y) ascending order.
    pub fn canonicalized_segments(&self) -> Vec<LineSegment> {
        self.line_segments.iter().map(|s| s.canonicalized()).collect()
    }
}

/// The primary deliverable of the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphConstructionResponse {
    pub connected_symbols: Vec<ConnectedSymbolsItem>,
}

fn validate_box(what: &str, bounds: &BoundingBox) -> Result<()> {
    if !bounds.is_well_formed() {
        return Err(GraphError::invalid_input(format!(
            "{} has top corner after bottom corner",
            what
        )));
    }
    if !bounds.is_within_unit_square() {
        return Err(GraphError::invalid_input(format!(
            "{} has coordinates outside [0, 1]",
            what
        )));
    }
    Ok(())
}
