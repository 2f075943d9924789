//! Recording backend shared by the unit tests.

use std::cell::Cell;

use super::store::{EdgeMap, EdgeStore, GraphStore, NodeMap, NodeStore, SelectionSink, Topology};
use super::types::{EdgeRecord, NodeId, NodeRecord};

/// Wraps a [`GraphStore`] and counts the calls the highlight makes into it.
#[derive(Debug, Default)]
pub struct RecordingGraph {
	pub inner: GraphStore,
	pub batches: Vec<Vec<NodeRecord>>,
	pub selections: Vec<Vec<NodeId>>,
	lookups: Cell<usize>,
}

impl RecordingGraph {
	pub fn new(inner: GraphStore) -> Self {
		Self {
			inner,
			..Self::default()
		}
	}

	/// Path graph `ids[0] - ids[1] - ...`, every node labelled with its id
	/// and colored `color-<id>`.
	pub fn chain(ids: &[&str]) -> Self {
		let mut store = GraphStore::new();
		for id in ids {
			store.insert_node(NodeRecord::new(*id, format!("color-{id}")).with_label(*id));
		}
		for pair in ids.windows(2) {
			store.insert_edge(EdgeRecord::new(
				format!("{}-{}", pair[0], pair[1]),
				pair[0],
				pair[1],
			));
		}
		Self::new(store)
	}

	pub fn lookups(&self) -> usize {
		self.lookups.get()
	}

	pub fn node(&self, id: &str) -> &NodeRecord {
		self.inner
			.node(&id.into())
			.unwrap_or_else(|| panic!("node {id} missing"))
	}
}

impl NodeStore for RecordingGraph {
	fn all_nodes(&self) -> NodeMap {
		self.inner.all_nodes()
	}

	fn update_batch(&mut self, batch: Vec<NodeRecord>) {
		self.batches.push(batch.clone());
		self.inner.update_batch(batch);
	}
}

impl EdgeStore for RecordingGraph {
	fn all_edges(&self) -> EdgeMap {
		self.inner.all_edges()
	}
}

impl Topology for RecordingGraph {
	fn connected_nodes(&self, id: &NodeId) -> Vec<NodeId> {
		self.lookups.set(self.lookups.get() + 1);
		self.inner.connected_nodes(id)
	}
}

impl SelectionSink for RecordingGraph {
	fn select_nodes(&mut self, ids: &[NodeId]) {
		self.selections.push(ids.to_vec());
		self.inner.select_nodes(ids);
	}
}
