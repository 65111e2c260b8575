use petgraph::graph::{NodeIndex, UnGraph};
use rustc_hash::FxHashMap;

use crate::error::{GraphError, Result};
use crate::graph::node::GraphNode;

/// The connectivity graph: undirected edges over string-keyed nodes.
///
/// Node and edge insertion order is preserved, which makes neighbor iteration
/// (and therefore every traversal) deterministic for identical inputs.
pub struct GraphService {
    graph: UnGraph<GraphNode, ()>,
    index: FxHashMap<String, NodeIndex>,
    ids: Vec<String>,
}

impl Default for GraphService {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphService {
    pub fn new() -> Self {
        Self {
            graph: UnGraph::default(),
            index: FxHashMap::default(),
            ids: Vec::new(),
        }
    }

    pub fn add_node(&mut self, node_id: impl Into<String>, node: GraphNode) {
        let node_id = node_id.into();
        if let Some(&existing) = self.index.get(&node_id) {
            self.graph[existing] = node;
            return;
        }
        let idx = self.graph.add_node(node);
        self.index.insert(node_id.clone(), idx);
        self.ids.push(node_id);
    }

    /// Adds an edge between two existing nodes; parallel edges collapse.
    pub fn add_edge(&mut self, node_id_1: &str, node_id_2: &str) -> Result<()> {
        let a = self.require(node_id_1)?;
        let b = self.require(node_id_2)?;
        self.graph.update_edge(a, b, ());
        Ok(())
    }

    pub fn contains(&self, node_id: &str) -> bool {
        self.index.contains_key(node_id)
    }

    pub fn node(&self, node_id: &str) -> Option<&GraphNode> {
        self.index.get(node_id).map(|&idx| &self.graph[idx])
    }

    pub fn node_mut(&mut self, node_id: &str) -> Option<&mut GraphNode> {
        match self.index.get(node_id) {
            Some(&idx) => Some(&mut self.graph[idx]),
            None => None,
        }
    }

    pub fn degree(&self, node_id: &str) -> usize {
        match self.index.get(node_id) {
            Some(&idx) => self.graph.neighbors(idx).count(),
            None => 0,
        }
    }

    pub fn neighbors(&self, node_id: &str) -> Vec<String> {
        match self.index.get(node_id) {
            Some(&idx) => self
                .graph
                .neighbors(idx)
                .map(|n| self.ids[n.index()].clone())
                .collect(),
            None => Vec::new(),
        }
    }

    /// Node ids in insertion order.
    pub fn node_ids(&self) -> impl Iterator<Item = &String> {
        self.ids.iter()
    }

    pub fn node_count(&self) -> usize {
        self.ids.len()
    }

    /// Symbol nodes in insertion order.
    pub fn symbol_nodes(&self) -> Vec<(&String, &GraphNode)> {
        self.ids
            .iter()
            .filter_map(|id| self.node(id).map(|node| (id, node)))
            .filter(|(_, node)| node.is_symbol())
            .collect()
    }

    pub fn symbol_node_ids_by_label(&self, label: &str) -> Vec<String> {
        self.symbol_nodes()
            .into_iter()
            .filter(|(_, node)| node.label() == Some(label))
            .map(|(id, _)| id.clone())
            .collect()
    }

    /// Arrows sitting where a stream branches: more than two incident edges,
    /// more than two of which lead to lines.
    pub fn arrow_symbols_at_junction(&self, arrow_symbol_label: &str) -> Vec<String> {
        let degree_criteria = 2;

        let arrow_ids: Vec<String> = self
            .symbol_nodes()
            .into_iter()
            .filter(|(id, node)| {
                node.label() == Some(arrow_symbol_label) && self.degree(id) > degree_criteria
            })
            .map(|(id, _)| id.clone())
            .collect();

        arrow_ids
            .into_iter()
            .filter(|arrow_id| {
                let line_count = self
                    .neighbors(arrow_id)
                    .iter()
                    .filter(|neighbor| self.node(neighbor).is_some_and(|n| n.is_line()))
                    .count();
                line_count > degree_criteria
            })
            .collect()
    }

    fn require(&self, node_id: &str) -> Result<NodeIndex> {
        self.index
            .get(node_id)
            .copied()
            .ok_or_else(|| GraphError::internal(format!("node '{}' is not in the graph", node_id)))
    }
}
