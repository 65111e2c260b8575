use serde::{Deserialize, Serialize};

use super::BoundingBox;

/// A piece of recognized text with its location on the diagram.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextRecognized {
    #[serde(flatten)]
    pub bounds: BoundingBox,
    pub text: String,
}

impl TextRecognized {
    pub fn new(bounds: BoundingBox, text: impl Into<String>) -> Self {
        Self {
            bounds,
            text: text.into(),
        }
    }
}
