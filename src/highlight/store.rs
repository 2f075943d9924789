//! Seams to the graph-rendering backend, and an in-memory backend.

use std::collections::{BTreeMap, BTreeSet};

use log::debug;

use super::types::{EdgeId, EdgeRecord, NodeId, NodeRecord};

/// Nodes keyed by id.
pub type NodeMap = BTreeMap<NodeId, NodeRecord>;
/// Edges keyed by id.
pub type EdgeMap = BTreeMap<EdgeId, EdgeRecord>;

/// Read-all / write-batch access to node records.
pub trait NodeStore {
	/// Snapshot of every node, keyed by id.
	fn all_nodes(&self) -> NodeMap;

	/// Apply many records in one call. Records whose id is no longer in the
	/// store are dropped.
	fn update_batch(&mut self, batch: Vec<NodeRecord>);
}

/// Read-all access to edge records.
pub trait EdgeStore {
	/// Snapshot of every edge, keyed by id.
	fn all_edges(&self) -> EdgeMap;
}

/// Direct connectivity, in either edge direction.
pub trait Topology {
	/// Nodes sharing an edge with `id`; empty for isolated or unknown nodes.
	fn connected_nodes(&self, id: &NodeId) -> Vec<NodeId>;
}

/// Renderer-side selection marker.
pub trait SelectionSink {
	/// Replace the selection with `ids`; empty clears it.
	fn select_nodes(&mut self, ids: &[NodeId]);
}

/// Node and edge collections with vis-style connectivity lookups.
#[derive(Clone, Debug, Default)]
pub struct GraphStore {
	nodes: NodeMap,
	edges: EdgeMap,
	selected: BTreeSet<NodeId>,
}

impl GraphStore {
	/// Empty store.
	pub fn new() -> Self {
		Self::default()
	}

	/// Insert or replace a node.
	pub fn insert_node(&mut self, node: NodeRecord) {
		self.nodes.insert(node.id.clone(), node);
	}

	/// Insert or replace an edge.
	pub fn insert_edge(&mut self, edge: EdgeRecord) {
		self.edges.insert(edge.id.clone(), edge);
	}

	/// Remove an edge, returning it if it existed.
	pub fn remove_edge(&mut self, id: &EdgeId) -> Option<EdgeRecord> {
		self.edges.remove(id)
	}

	/// Look up a node by id.
	pub fn node(&self, id: &NodeId) -> Option<&NodeRecord> {
		self.nodes.get(id)
	}

	/// Nodes in id order.
	pub fn nodes(&self) -> impl Iterator<Item = &NodeRecord> {
		self.nodes.values()
	}

	/// Edges in id order.
	pub fn edges(&self) -> impl Iterator<Item = &EdgeRecord> {
		self.edges.values()
	}

	/// Whether a node with this id exists.
	pub fn contains_node(&self, id: &NodeId) -> bool {
		self.nodes.contains_key(id)
	}

	/// Whether the node is in the current selection.
	pub fn is_selected(&self, id: &NodeId) -> bool {
		self.selected.contains(id)
	}

	/// Current selection.
	pub fn selected(&self) -> &BTreeSet<NodeId> {
		&self.selected
	}

	/// Number of nodes.
	pub fn node_count(&self) -> usize {
		self.nodes.len()
	}
}

impl NodeStore for GraphStore {
	fn all_nodes(&self) -> NodeMap {
		self.nodes.clone()
	}

	fn update_batch(&mut self, batch: Vec<NodeRecord>) {
		let total = batch.len();
		let mut applied = 0;
		for record in batch {
			if let Some(slot) = self.nodes.get_mut(&record.id) {
				*slot = record;
				applied += 1;
			}
		}
		if applied < total {
			debug!("update batch dropped {} stale node(s)", total - applied);
		}
	}
}

impl EdgeStore for GraphStore {
	fn all_edges(&self) -> EdgeMap {
		self.edges.clone()
	}
}

impl Topology for GraphStore {
	fn connected_nodes(&self, id: &NodeId) -> Vec<NodeId> {
		let mut connected: Vec<NodeId> = Vec::new();
		for edge in self.edges.values() {
			let other = if edge.from == *id && edge.to != *id {
				&edge.to
			} else if edge.to == *id && edge.from != *id {
				&edge.from
			} else {
				continue;
			};
			if !connected.contains(other) {
				connected.push(other.clone());
			}
		}
		connected
	}
}

impl SelectionSink for GraphStore {
	fn select_nodes(&mut self, ids: &[NodeId]) {
		self.selected = ids
			.iter()
			.filter(|id| self.nodes.contains_key(*id))
			.cloned()
			.collect();
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn store() -> GraphStore {
		let mut store = GraphStore::new();
		for id in ["a", "b", "c"] {
			store.insert_node(NodeRecord::new(id, "red"));
		}
		store.insert_edge(EdgeRecord::new("e1", "a", "b"));
		store.insert_edge(EdgeRecord::new("e2", "c", "a"));
		store.insert_edge(EdgeRecord::new("e3", "b", "a"));
		store.insert_edge(EdgeRecord::new("loop", "c", "c"));
		store
	}

	#[test]
	fn connected_nodes_follow_both_directions_once() {
		let store = store();
		assert_eq!(
			store.connected_nodes(&"a".into()),
			vec![NodeId::from("b"), NodeId::from("c")]
		);
		assert_eq!(store.connected_nodes(&"c".into()), vec![NodeId::from("a")]);
		assert!(store.connected_nodes(&"missing".into()).is_empty());
	}

	#[test]
	fn removing_an_edge_changes_connectivity() {
		let mut store = store();
		store.remove_edge(&"e2".into());
		assert!(store.connected_nodes(&"c".into()).is_empty());
	}

	#[test]
	fn update_batch_skips_unknown_nodes() {
		let mut store = store();
		let mut a = store.node(&"a".into()).cloned().unwrap();
		a.hidden = true;
		store.update_batch(vec![a, NodeRecord::new("ghost", "blue")]);

		assert!(store.node(&"a".into()).unwrap().hidden);
		assert!(!store.contains_node(&"ghost".into()));
		assert_eq!(store.node_count(), 3);
	}

	#[test]
	fn selection_ignores_unknown_ids() {
		let mut store = store();
		store.select_nodes(&["a".into(), "ghost".into()]);
		assert!(store.is_selected(&"a".into()));
		assert_eq!(store.selected().len(), 1);

		store.select_nodes(&[]);
		assert!(store.selected().is_empty());
	}
}
