//! Breadth-first traversal and flow-direction propagation.

use std::collections::{BTreeSet, VecDeque};

use rustc_hash::{FxHashMap, FxHashSet};

use crate::graph::service::GraphService;
use crate::shared::models::{FlowDirection, TraversalConnection};

/// Per-node upstream claims accumulated during the propagation pass, kept
/// apart from the published `sources` until the final publish step.
pub type ScratchSources = FxHashMap<String, BTreeSet<String>>;

/// Options for [`GraphService::connected_nodes`].
#[derive(Debug, Clone, Copy)]
pub struct TraversalOptions<'a> {
    /// Enumerate every simple path instead of at most one per target. Slower,
    /// but correct in the presence of cycles.
    pub exhaust_paths: bool,
    /// Propagation mode: junction arrows reached downstream terminate the
    /// walk and are emitted as results.
    pub propagation_pass: bool,
    pub junction_arrow_ids: Option<&'a BTreeSet<String>>,
    pub arrow_symbol_label: &'a str,
}

impl<'a> TraversalOptions<'a> {
    /// Asset-to-asset connectivity walk.
    pub fn connectivity(arrow_symbol_label: &'a str) -> Self {
        Self {
            exhaust_paths: false,
            propagation_pass: false,
            junction_arrow_ids: None,
            arrow_symbol_label,
        }
    }

    /// Flow-direction propagation walk.
    pub fn propagation(
        arrow_symbol_label: &'a str,
        junction_arrow_ids: &'a BTreeSet<String>,
        exhaust_paths: bool,
    ) -> Self {
        Self {
            exhaust_paths,
            propagation_pass: true,
            junction_arrow_ids: Some(junction_arrow_ids),
            arrow_symbol_label,
        }
    }
}

impl GraphService {
    /// BFS from `starting_node`, stopping at (and emitting) asset symbols.
    ///
    /// Direction bookkeeping along the way:
    /// - stepping onto a neighbor listed in the current node's `sources`
    ///   would move against flow; the neighbor is skipped;
    /// - stepping onto a neighbor whose `sources` contain the current node
    ///   moves with flow; the walk direction becomes downstream.
    ///
    /// With `exhaust_paths` unset, a global visited set bounds the walk to at
    /// most one path per target; cycles can then yield a spurious extra
    /// result. With it set, only the current path blocks revisits.
    pub fn connected_nodes(
        &self,
        starting_node: &str,
        asset_symbol_ids: &BTreeSet<String>,
        options: TraversalOptions<'_>,
    ) -> Vec<TraversalConnection> {
        let mut queue: VecDeque<TraversalConnection> = VecDeque::new();
        queue.push_back(TraversalConnection::new(starting_node, FlowDirection::Unknown));

        let mut visited: FxHashSet<String> = FxHashSet::default();
        visited.insert(starting_node.to_string());

        let mut connected_objects = Vec::new();

        while let Some(current) = queue.pop_front() {
            for neighbor in self.neighbors(&current.node_id) {
                if (options.exhaust_paths && current.visited_ids.contains(&neighbor))
                    || (!options.exhaust_paths && visited.contains(&neighbor))
                    || neighbor == starting_node
                {
                    continue;
                }

                visited.insert(neighbor.clone());

                let (Some(last_node), Some(node)) = (self.node(&current.node_id), self.node(&neighbor)) else {
                    continue;
                };

                // Moving onto a declared upstream neighbor goes against flow.
                if last_node.sources.contains(&neighbor) {
                    continue;
                }

                let mut flow_direction = current.flow_direction;
                if node.sources.contains(&current.node_id) {
                    flow_direction = FlowDirection::Downstream;
                    if options.propagation_pass
                        && node.label() == Some(options.arrow_symbol_label)
                        && options
                            .junction_arrow_ids
                            .is_some_and(|junctions| junctions.contains(&neighbor))
                    {
                        connected_objects.push(TraversalConnection {
                            node_id: neighbor,
                            flow_direction,
                            visited_ids: current.visited_ids.clone(),
                        });
                        continue;
                    }
                }

                if node.is_symbol() && asset_symbol_ids.contains(&neighbor) {
                    connected_objects.push(TraversalConnection {
                        node_id: neighbor,
                        flow_direction,
                        visited_ids: current.visited_ids.clone(),
                    });
                    continue;
                }

                let mut visited_ids = current.visited_ids.clone();
                visited_ids.push(neighbor.clone());
                queue.push_back(TraversalConnection {
                    node_id: neighbor,
                    flow_direction,
                    visited_ids,
                });
            }
        }

        connected_objects
    }

    /// Records, for each traversal result, every step's predecessor into the
    /// scratch source map. Nodes first seen here start from a copy of their
    /// published `sources`, so arrow-derived claims are merged rather than
    /// overwritten.
    pub fn propagate_flow_direction(
        &self,
        symbol_node_id: &str,
        traversal_connections: &[TraversalConnection],
        scratch: &mut ScratchSources,
    ) {
        for connection in traversal_connections {
            for visited in &connection.visited_ids {
                self.init_scratch_entry(visited, scratch);
            }
            self.init_scratch_entry(&connection.node_id, scratch);

            if connection.flow_direction == FlowDirection::Unknown {
                continue;
            }

            let mut last = symbol_node_id;
            for visited in &connection.visited_ids {
                if let Some(sources) = scratch.get_mut(visited) {
                    sources.insert(last.to_string());
                }
                last = visited;
            }
            if let Some(sources) = scratch.get_mut(&connection.node_id) {
                sources.insert(last.to_string());
            }
        }
    }

    /// Drops the scratch entries of untraceable nodes, then replaces every
    /// remaining node's published `sources` with its scratch set.
    pub fn publish_sources(&mut self, mut scratch: ScratchSources) {
        for untraceable in self.untraceable_node_ids(&scratch) {
            scratch.remove(&untraceable);
        }

        let ids: Vec<String> = self.node_ids().cloned().collect();
        for node_id in ids {
            if let Some(sources) = scratch.remove(&node_id) {
                if let Some(node) = self.node_mut(&node_id) {
                    node.sources = sources;
                }
            }
        }
    }

    /// A node is untraceable when every one of its claimed upstream nodes
    /// claims it right back, leaving no consistent direction; a node with no
    /// claims at all is vacuously untraceable.
    ///
    /// Even empty and singleton source sets go through the check: a degree-1
    /// node can carry a single wrong claim.
    fn untraceable_node_ids(&self, scratch: &ScratchSources) -> Vec<String> {
        let mut node_ids = Vec::new();

        for node_id in self.node_ids() {
            let mut blocking = true;
            if let Some(sources) = scratch.get(node_id) {
                for source in sources {
                    match scratch.get(source) {
                        None => {
                            blocking = false;
                            break;
                        }
                        Some(source_set) if !source_set.contains(node_id) => {
                            blocking = false;
                            break;
                        }
                        _ => {}
                    }
                }
            }
            if blocking {
                node_ids.push(node_id.clone());
            }
        }

        node_ids
    }

    fn init_scratch_entry(&self, node_id: &str, scratch: &mut ScratchSources) {
        if !scratch.contains_key(node_id) {
            let sources = self
                .node(node_id)
                .map(|node| node.sources.clone())
                .unwrap_or_default();
            scratch.insert(node_id.to_string(), sources);
        }
    }
}
