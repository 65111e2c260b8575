//! SQLite adapter for the diagram graph schema.
//!
//! Replace-by-diagram writes: persisting a diagram deletes its previous
//! graph and recreates it inside one transaction.

use std::collections::{BTreeSet, HashSet};
use std::path::Path;
use std::sync::{Arc, Mutex};

use rusqlite::{params, Connection, OptionalExtension};
use tracing::debug;

use pnid_graph::{ConnectedSymbolsItem, FlowDirection};

use crate::domain::{asset_node_id, connector_node_id, Asset, AssetType, Connected, Connector, Edge, PnId, Sheet};
use crate::error::Result;

/// SQLite-backed graph database.
#[derive(Clone)]
pub struct SqliteGraphDb {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteGraphDb {
    /// Opens (or creates) a database file.
    pub fn new(db_path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(db_path)?;
        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        db.init_schema()?;
        Ok(db)
    }

    /// In-memory database, for testing.
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        db.init_schema()?;
        Ok(db)
    }

    fn init_schema(&self) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute_batch(
            "PRAGMA foreign_keys = ON;

            CREATE TABLE IF NOT EXISTS pnid (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                attributes TEXT
            );

            CREATE TABLE IF NOT EXISTS sheet (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                attributes TEXT
            );

            CREATE TABLE IF NOT EXISTS asset (
                id TEXT PRIMARY KEY,
                text_associated TEXT NOT NULL,
                attributes TEXT
            );

            CREATE TABLE IF NOT EXISTS asset_type (
                uniquestring TEXT PRIMARY KEY,
                category TEXT NOT NULL,
                subcategory TEXT NOT NULL,
                displayname TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS connector (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                text_associated TEXT
            );

            CREATE TABLE IF NOT EXISTS belongs (
                from_id TEXT NOT NULL REFERENCES sheet(id) ON DELETE CASCADE,
                to_id TEXT NOT NULL REFERENCES pnid(id) ON DELETE CASCADE
            );

            CREATE TABLE IF NOT EXISTS is_part_of (
                from_id TEXT NOT NULL REFERENCES asset(id) ON DELETE CASCADE,
                to_id TEXT NOT NULL REFERENCES sheet(id) ON DELETE CASCADE
            );

            CREATE TABLE IF NOT EXISTS resides (
                from_id TEXT NOT NULL REFERENCES connector(id) ON DELETE CASCADE,
                to_id TEXT NOT NULL REFERENCES sheet(id) ON DELETE CASCADE
            );

            CREATE TABLE IF NOT EXISTS labeled (
                from_id TEXT NOT NULL REFERENCES asset(id) ON DELETE CASCADE,
                to_id TEXT NOT NULL REFERENCES asset_type(uniquestring)
            );

            CREATE TABLE IF NOT EXISTS connected (
                from_id TEXT NOT NULL REFERENCES asset(id) ON DELETE CASCADE,
                to_id TEXT NOT NULL REFERENCES asset(id) ON DELETE CASCADE,
                segments TEXT
            );

            CREATE TABLE IF NOT EXISTS inputs (
                from_id TEXT NOT NULL REFERENCES asset(id) ON DELETE CASCADE,
                to_id TEXT NOT NULL REFERENCES connector(id) ON DELETE CASCADE
            );

            CREATE TABLE IF NOT EXISTS outputs (
                from_id TEXT NOT NULL REFERENCES connector(id) ON DELETE CASCADE,
                to_id TEXT NOT NULL REFERENCES asset(id) ON DELETE CASCADE
            );

            CREATE TABLE IF NOT EXISTS refers (
                from_id TEXT NOT NULL REFERENCES connector(id) ON DELETE CASCADE,
                to_id TEXT NOT NULL REFERENCES connector(id) ON DELETE CASCADE
            );",
        )?;
        Ok(())
    }

    /// Deletes a diagram's previous graph and writes the new one, in one
    /// transaction.
    pub fn persist(
        &self,
        pid_id: &str,
        asset_connected: &[ConnectedSymbolsItem],
        connector_labels: &BTreeSet<String>,
    ) -> Result<()> {
        let mut conn = self.conn.lock().unwrap();
        let tx = conn.transaction()?;

        debug!("Deleting existing graph of pnid {}", pid_id);
        delete_pnid(&tx, pid_id)?;

        debug!("Creating graph of pnid {}", pid_id);
        create_graph(&tx, pid_id, asset_connected, connector_labels)?;

        tx.commit()?;
        Ok(())
    }

    pub fn delete_existing_graph(&self, pid_id: &str) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        delete_pnid(&conn, pid_id)
    }

    pub fn count_rows(&self, table: &str) -> Result<i64> {
        let conn = self.conn.lock().unwrap();
        let count = conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| row.get(0))?;
        Ok(count)
    }

    pub fn asset_text(&self, asset_id: &str) -> Result<Option<String>> {
        let conn = self.conn.lock().unwrap();
        let text = conn
            .query_row("SELECT text_associated FROM asset WHERE id = ?1", params![asset_id], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(text)
    }
}

/// Creates the diagram, sheet, asset-type, asset/connector nodes and every
/// edge for one diagram.
fn create_graph(
    conn: &Connection,
    pid_id: &str,
    asset_connected: &[ConnectedSymbolsItem],
    connector_labels: &BTreeSet<String>,
) -> Result<()> {
    let pnid_node = PnId::new(pid_id);
    // Sheet information is not collected, so one sheet per diagram, sharing
    // its id.
    let sheet_node = Sheet::new(pid_id);

    create_pnid_node(conn, &pnid_node)?;
    create_sheet_node(conn, &sheet_node)?;
    create_belongs_edge(conn, &Edge::new(&sheet_node.id, &pnid_node.id))?;

    create_all_asset_types(conn, asset_connected, connector_labels)?;
    create_all_assets_and_connectors(conn, &pnid_node, &sheet_node, asset_connected, connector_labels)?;
    create_all_connection_edges(conn, &pnid_node, &sheet_node, asset_connected, connector_labels)?;

    Ok(())
}

fn is_connector(label: &str, connector_labels: &BTreeSet<String>) -> bool {
    connector_labels.contains(label)
}

fn create_all_asset_types(
    conn: &Connection,
    asset_connected: &[ConnectedSymbolsItem],
    connector_labels: &BTreeSet<String>,
) -> Result<()> {
    let mut created: HashSet<&str> = HashSet::new();

    for asset in asset_connected {
        if !created.contains(asset.label.as_str()) && !is_connector(&asset.label, connector_labels) {
            create_asset_type_node(conn, &AssetType::new(&asset.label)?)?;
            created.insert(&asset.label);
        }
        for connection in &asset.connections {
            if !created.contains(connection.label.as_str()) && !is_connector(&connection.label, connector_labels) {
                create_asset_type_node(conn, &AssetType::new(&connection.label)?)?;
                created.insert(&connection.label);
            }
        }
    }

    Ok(())
}

fn create_all_assets_and_connectors(
    conn: &Connection,
    pnid_node: &PnId,
    sheet_node: &Sheet,
    asset_connected: &[ConnectedSymbolsItem],
    connector_labels: &BTreeSet<String>,
) -> Result<()> {
    let mut created: HashSet<String> = HashSet::new();

    let mut create_one = |conn: &Connection,
                          created: &mut HashSet<String>,
                          symbol_id: u32,
                          label: &str,
                          text_associated: &str|
     -> Result<()> {
        if is_connector(label, connector_labels) {
            let node_id = connector_node_id(pnid_node, sheet_node, symbol_id);
            if !created.contains(&node_id) {
                create_connector_node(
                    conn,
                    &Connector {
                        id: node_id.clone(),
                        name: label.to_string(),
                        text_associated: Some(text_associated.to_string()),
                    },
                )?;
                create_resides_edge(conn, &Edge::new(&node_id, &sheet_node.id))?;
                created.insert(node_id);
            }
        } else {
            let node_id = asset_node_id(pnid_node, sheet_node, symbol_id);
            if !created.contains(&node_id) {
                create_asset_node(
                    conn,
                    &Asset {
                        id: node_id.clone(),
                        text_associated: text_associated.to_string(),
                        attributes: serde_json::Value::Null,
                    },
                )?;
                create_is_part_of_edge(conn, &Edge::new(&node_id, &sheet_node.id))?;
                create_labeled_edge(conn, &Edge::new(&node_id, label))?;
                created.insert(node_id);
            }
        }
        Ok(())
    };

    for asset in asset_connected {
        create_one(conn, &mut created, asset.id, &asset.label, &asset.text_associated)?;
        for connection in &asset.connections {
            create_one(conn, &mut created, connection.id, &connection.label, &connection.text_associated)?;
        }
    }

    Ok(())
}

/// Flow edges follow the published direction: downstream and unknown
/// connections are written, upstream ones are the redundant mirror image and
/// skipped.
fn create_all_connection_edges(
    conn: &Connection,
    pnid_node: &PnId,
    sheet_node: &Sheet,
    asset_connected: &[ConnectedSymbolsItem],
    connector_labels: &BTreeSet<String>,
) -> Result<()> {
    for asset in asset_connected {
        if is_connector(&asset.label, connector_labels) {
            let connector_id = connector_node_id(pnid_node, sheet_node, asset.id);
            for connection in &asset.connections {
                if !matches!(
                    connection.flow_direction,
                    FlowDirection::Downstream | FlowDirection::Unknown
                ) {
                    continue;
                }
                if is_connector(&connection.label, connector_labels) {
                    let other_id = connector_node_id(pnid_node, sheet_node, connection.id);
                    create_refers_edge(conn, &Edge::new(&connector_id, &other_id))?;
                } else {
                    let asset_id = asset_node_id(pnid_node, sheet_node, connection.id);
                    create_outputs_edge(conn, &Edge::new(&connector_id, &asset_id))?;
                }
            }
        } else {
            let asset_id = asset_node_id(pnid_node, sheet_node, asset.id);
            for connection in &asset.connections {
                if !matches!(
                    connection.flow_direction,
                    FlowDirection::Downstream | FlowDirection::Unknown
                ) {
                    continue;
                }
                if is_connector(&connection.label, connector_labels) {
                    let connector_id = connector_node_id(pnid_node, sheet_node, connection.id);
                    create_inputs_edge(conn, &Edge::new(&asset_id, &connector_id))?;
                } else {
                    let other_asset_id = asset_node_id(pnid_node, sheet_node, connection.id);
                    create_connected_edge(
                        conn,
                        &Connected {
                            from_id: asset_id.clone(),
                            to_id: other_asset_id,
                            segments: connection.segments.clone(),
                        },
                    )?;
                }
            }
        }
    }

    Ok(())
}

fn create_pnid_node(conn: &Connection, pnid: &PnId) -> Result<()> {
    conn.execute(
        "INSERT INTO pnid (id, name, attributes) VALUES (?1, ?2, ?3)",
        params![pnid.id, pnid.name, serde_json::to_string(&pnid.attributes)?],
    )?;
    Ok(())
}

fn create_sheet_node(conn: &Connection, sheet: &Sheet) -> Result<()> {
    conn.execute(
        "INSERT INTO sheet (id, name, attributes) VALUES (?1, ?2, ?3)",
        params![sheet.id, sheet.name, serde_json::to_string(&sheet.attributes)?],
    )?;
    Ok(())
}

fn create_asset_node(conn: &Connection, asset: &Asset) -> Result<()> {
    conn.execute(
        "INSERT INTO asset (id, text_associated, attributes) VALUES (?1, ?2, ?3)",
        params![asset.id, asset.text_associated, serde_json::to_string(&asset.attributes)?],
    )?;
    Ok(())
}

fn create_asset_type_node(conn: &Connection, asset_type: &AssetType) -> Result<()> {
    conn.execute(
        "INSERT OR IGNORE INTO asset_type (uniquestring, category, subcategory, displayname)
         VALUES (?1, ?2, ?3, ?4)",
        params![
            asset_type.uniquestring,
            asset_type.category(),
            asset_type.subcategory(),
            asset_type.displayname()
        ],
    )?;
    Ok(())
}

fn create_connector_node(conn: &Connection, connector: &Connector) -> Result<()> {
    conn.execute(
        "INSERT INTO connector (id, name, text_associated) VALUES (?1, ?2, ?3)",
        params![connector.id, connector.name, connector.text_associated],
    )?;
    Ok(())
}

fn create_belongs_edge(conn: &Connection, edge: &Edge) -> Result<()> {
    create_plain_edge(conn, "belongs", edge)
}

fn create_is_part_of_edge(conn: &Connection, edge: &Edge) -> Result<()> {
    create_plain_edge(conn, "is_part_of", edge)
}

fn create_resides_edge(conn: &Connection, edge: &Edge) -> Result<()> {
    create_plain_edge(conn, "resides", edge)
}

fn create_labeled_edge(conn: &Connection, edge: &Edge) -> Result<()> {
    create_plain_edge(conn, "labeled", edge)
}

fn create_inputs_edge(conn: &Connection, edge: &Edge) -> Result<()> {
    create_plain_edge(conn, "inputs", edge)
}

fn create_outputs_edge(conn: &Connection, edge: &Edge) -> Result<()> {
    create_plain_edge(conn, "outputs", edge)
}

fn create_refers_edge(conn: &Connection, edge: &Edge) -> Result<()> {
    create_plain_edge(conn, "refers", edge)
}

fn create_plain_edge(conn: &Connection, table: &str, edge: &Edge) -> Result<()> {
    conn.execute(
        &format!("INSERT INTO {} (from_id, to_id) VALUES (?1, ?2)", table),
        params![edge.from_id, edge.to_id],
    )?;
    Ok(())
}

fn create_connected_edge(conn: &Connection, connected: &Connected) -> Result<()> {
    conn.execute(
        "INSERT INTO connected (from_id, to_id, segments) VALUES (?1, ?2, ?3)",
        params![
            connected.from_id,
            connected.to_id,
            serde_json::to_string(&connected.segments)?
        ],
    )?;
    Ok(())
}

/// Removes a diagram and everything hanging off it. Edge rows cascade when
/// their nodes go.
fn delete_pnid(conn: &Connection, pid_id: &str) -> Result<()> {
    conn.execute(
        "DELETE FROM asset WHERE id IN (
            SELECT is_part_of.from_id FROM is_part_of
            JOIN belongs ON is_part_of.to_id = belongs.from_id
            WHERE belongs.to_id = ?1
        )",
        params![pid_id],
    )?;
    conn.execute(
        "DELETE FROM connector WHERE id IN (
            SELECT resides.from_id FROM resides
            JOIN belongs ON resides.to_id = belongs.from_id
            WHERE belongs.to_id = ?1
        )",
        params![pid_id],
    )?;
    conn.execute(
        "DELETE FROM sheet WHERE id IN (SELECT from_id FROM belongs WHERE to_id = ?1)",
        params![pid_id],
    )?;
    conn.execute("DELETE FROM pnid WHERE id = ?1", params![pid_id])?;
    Ok(())
}
