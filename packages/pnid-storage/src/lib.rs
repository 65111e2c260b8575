//! Relational persistence for digitized diagram graphs.
//!
//! Takes the asset-connectivity records produced by `pnid-graph` and writes
//! them into a relational graph schema: node tables (PNID, Sheet, Asset,
//! AssetType, Connector) and edge tables (Belongs, IsPartOf, Resides,
//! Labeled, Connected, Inputs, Outputs, Refers).
//!
//! Connector-typed labels (per the configured label set) become `Connector`
//! rows; everything else becomes an `Asset` row with a `Labeled` edge into
//! the taxonomy. Flow direction gates the flow edges: downstream and unknown
//! connections are written, upstream ones are skipped as redundant.

pub mod domain;
pub mod error;

#[cfg(feature = "sqlite")]
pub mod infrastructure;

pub use domain::{
    asset_node_id, connector_node_id, Asset, AssetType, Connected, Connector, Edge, PnId, Sheet,
};
pub use error::{ErrorKind, Result, StorageError};

#[cfg(feature = "sqlite")]
pub use infrastructure::sqlite::SqliteGraphDb;
