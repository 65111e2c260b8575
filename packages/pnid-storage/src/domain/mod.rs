//! Domain models for the relational graph schema.
//!
//! # Node tables
//!
//! - `PnId`: one row per digitized diagram
//! - `Sheet`: one row per sheet (one per diagram today)
//! - `Asset`: a physical plant item with its tag text
//! - `AssetType`: the label taxonomy, one row per distinct label
//! - `Connector`: a cross-sheet continuation marker
//!
//! # Edge tables
//!
//! - `Belongs`: sheet to diagram
//! - `IsPartOf`: asset to sheet
//! - `Resides`: connector to sheet
//! - `Labeled`: asset to asset type
//! - `Connected`: asset to asset, with the path segments as JSON
//! - `Inputs`: asset to connector
//! - `Outputs`: connector to asset
//! - `Refers`: connector to connector

use serde::{Deserialize, Serialize};

use pnid_graph::BoundingBox;

use crate::error::{Result, StorageError};

/// The diagram node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PnId {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub attributes: serde_json::Value,
}

impl PnId {
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            attributes: serde_json::Value::Null,
        }
    }
}

/// The sheet node. Sheet information is not collected yet, so every diagram
/// gets one sheet carrying the diagram id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sheet {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub attributes: serde_json::Value,
}

impl Sheet {
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            attributes: serde_json::Value::Null,
        }
    }
}

/// An asset node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    pub id: String,
    pub text_associated: String,
    #[serde(default)]
    pub attributes: serde_json::Value,
}

/// A connector node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Connector {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub text_associated: Option<String>,
}

/// One row of the label taxonomy. The label must have exactly the
/// "category/subcategory/displayname" shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetType {
    pub uniquestring: String,
}

impl AssetType {
    pub fn new(uniquestring: impl Into<String>) -> Result<Self> {
        let uniquestring = uniquestring.into();
        if uniquestring.split('/').count() != 3 {
            return Err(StorageError::invalid_label(format!(
                "asset type label must be \"category/subcategory/displayname\", got \"{}\"",
                uniquestring
            )));
        }
        Ok(Self { uniquestring })
    }

    pub fn category(&self) -> &str {
        self.part(0)
    }

    pub fn subcategory(&self) -> &str {
        self.part(1)
    }

    pub fn displayname(&self) -> &str {
        self.part(2)
    }

    fn part(&self, index: usize) -> &str {
        self.uniquestring.split('/').nth(index).unwrap_or_default()
    }
}

/// A plain directed edge between two node ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub from_id: String,
    pub to_id: String,
}

impl Edge {
    pub fn new(from_id: impl Into<String>, to_id: impl Into<String>) -> Self {
        Self {
            from_id: from_id.into(),
            to_id: to_id.into(),
        }
    }
}

/// An asset-to-asset connection edge carrying the traversal path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Connected {
    pub from_id: String,
    pub to_id: String,
    #[serde(default)]
    pub segments: Vec<BoundingBox>,
}

/// Node id for an asset inside a given diagram and sheet.
pub fn asset_node_id(pnid: &PnId, sheet: &Sheet, symbol_id: u32) -> String {
    format!("{}/{}/{}", pnid.id, sheet.id, symbol_id)
}

/// Connector ids share the asset id scheme.
pub fn connector_node_id(pnid: &PnId, sheet: &Sheet, symbol_id: u32) -> String {
    asset_node_id(pnid, sheet, symbol_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asset_type_parts() {
        let asset_type = AssetType::new("Equipment/Vessels/Drum").unwrap();
        assert_eq!(asset_type.category(), "Equipment");
        assert_eq!(asset_type.subcategory(), "Vessels");
        assert_eq!(asset_type.displayname(), "Drum");
    }

    #[test]
    fn test_asset_type_rejects_malformed_label() {
        assert!(AssetType::new("Equipment/Vessels").is_err());
        assert!(AssetType::new("Equipment/Vessels/Drum/Extra").is_err());
    }

    #[test]
    fn test_node_ids() {
        let pnid = PnId::new("pid-1");
        let sheet = Sheet::new("pid-1");
        assert_eq!(asset_node_id(&pnid, &sheet, 7), "pid-1/pid-1/7");
        assert_eq!(connector_node_id(&pnid, &sheet, 7), "pid-1/pid-1/7");
    }
}
