use serde::{Deserialize, Serialize};

use super::BoundingBox;

/// A detected symbol, already correlated with the text that sits inside or
/// next to it.
///
/// `label` is the hierarchical class string "Category/Subcategory/Display".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolAndTextAssociated {
    pub id: u32,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    #[serde(flatten)]
    pub bounds: BoundingBox,
    #[serde(default)]
    pub text_associated: Option<String>,
}

impl SymbolAndTextAssociated {
    pub fn label_starts_with_any<'a, I>(&self, prefixes: I) -> bool
    where
        I: IntoIterator<Item = &'a String>,
    {
        prefixes.into_iter().any(|p| self.label.starts_with(p.as_str()))
    }
}
