use std::collections::HashMap;
use std::f64::consts::PI;

use force_graph::{DefaultNodeIdx, EdgeData, ForceGraph, NodeData, SimulationParameters};

use super::types::SelectionMode;
use crate::highlight::{FilterCriteria, GraphStore, HighlightSession, NodeId, SelectionEvent};

pub const NODE_RADIUS: f64 = 5.0;
pub const HIT_RADIUS: f64 = 12.0;

/// Offset of the graph origin on screen, in CSS pixels.
#[derive(Clone, Debug, Default)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
}

/// Physics positions from `force_graph`, appearance from the [`GraphStore`].
pub struct ForceGraphState {
	pub graph: ForceGraph<NodeId, ()>,
	pub store: GraphStore,
	pub transform: ViewTransform,
	pub width: f64,
	pub height: f64,
	pub pixel_ratio: f64,
	/// Physics on/off; drawing continues either way.
	pub animation_running: bool,
	pub flow_time: f64,
}

impl ForceGraphState {
	pub fn new(store: GraphStore, width: f64, height: f64, pixel_ratio: f64, physics: bool) -> Self {
		let mut graph = ForceGraph::new(SimulationParameters {
			force_charge: 150.0,
			force_spring: 0.05,
			force_max: 100.0,
			node_speed: 3000.0,
			damping_factor: 0.9,
		});
		let mut id_to_idx: HashMap<NodeId, DefaultNodeIdx> = HashMap::new();
		let count = store.node_count().max(1) as f64;

		for (i, node) in store.nodes().enumerate() {
			let angle = (i as f64) * 2.0 * PI / count;
			let idx = graph.add_node(NodeData {
				x: (100.0 * angle.cos()) as f32,
				y: (100.0 * angle.sin()) as f32,
				mass: 10.0,
				is_anchor: false,
				user_data: node.id.clone(),
			});
			id_to_idx.insert(node.id.clone(), idx);
		}

		for edge in store.edges() {
			if let (Some(&src), Some(&tgt)) = (id_to_idx.get(&edge.from), id_to_idx.get(&edge.to)) {
				graph.add_edge(src, tgt, EdgeData::default());
			}
		}

		Self {
			graph,
			store,
			transform: ViewTransform {
				x: width / 2.0,
				y: height / 2.0,
			},
			width,
			height,
			pixel_ratio,
			animation_running: physics,
			flow_time: 0.0,
		}
	}

	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		(sx - self.transform.x, sy - self.transform.y)
	}

	/// Visible node under a screen position, if any.
	pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<NodeId> {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		let mut found = None;
		self.graph.visit_nodes(|node| {
			let id = &node.data.user_data;
			if self.store.node(id).is_none_or(|record| record.hidden) {
				return;
			}
			let (dx, dy) = (node.x() as f64 - gx, node.y() as f64 - gy);
			if (dx * dx + dy * dy).sqrt() < HIT_RADIUS {
				found = Some(id.clone());
			}
		});
		found
	}

	/// Route a canvas click to the session: the node under the pointer, or
	/// an empty selection when nothing is there.
	pub fn click(
		&mut self,
		session: &mut HighlightSession,
		mode: SelectionMode,
		sx: f64,
		sy: f64,
	) -> Vec<NodeId> {
		let ids: Vec<NodeId> = self.node_at_position(sx, sy).into_iter().collect();
		match mode {
			SelectionMode::Neighbourhood => session.select_node(&mut self.store, ids),
			SelectionMode::Filter => session.select_nodes(&mut self.store, ids),
		}
	}

	/// Apply attribute criteria, or lift the filter when there are none.
	/// Lifting leaves the renderer selection and any highlight in place.
	pub fn apply_filter(
		&mut self,
		session: &mut HighlightSession,
		criteria: Option<&FilterCriteria>,
	) -> Vec<NodeId> {
		match criteria {
			Some(criteria) => session.highlight_filter(&mut self.store, criteria),
			None => {
				session.filter_highlight(&mut self.store, &SelectionEvent::cleared());
				Vec::new()
			}
		}
	}

	/// Bind a session to this freshly loaded graph: drop state from the
	/// previous graph, then re-apply the filter still requested by the page.
	pub fn adopt_session(
		&mut self,
		session: &mut HighlightSession,
		criteria: Option<&FilterCriteria>,
	) {
		session.reset();
		if criteria.is_some() {
			self.apply_filter(session, criteria);
		}
	}

	pub fn tick(&mut self, dt: f32) {
		if self.animation_running {
			self.graph.update(dt);
		}
		self.flow_time += dt as f64;
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
		self.transform.x = width / 2.0;
		self.transform.y = height / 2.0;
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::highlight::{EdgeRecord, HighlightConfig, NodeRecord, NodeStore, ToggleState};

	fn store() -> GraphStore {
		let mut store = GraphStore::new();
		for (id, role) in [("a", "server"), ("b", "client"), ("c", "server")] {
			store.insert_node(NodeRecord::new(id, "red").with_property("type", role));
		}
		store.insert_edge(EdgeRecord::new("ab", "a", "b"));
		store.insert_edge(EdgeRecord::new("bc", "b", "c"));
		store
	}

	fn state() -> ForceGraphState {
		ForceGraphState::new(store(), 800.0, 600.0, 1.0, false)
	}

	#[test]
	fn lifting_the_filter_keeps_highlight_selection() {
		let mut state = state();
		let mut session = HighlightSession::new(HighlightConfig::default());

		session.select_node(&mut state.store, vec!["a".into()]);
		state.apply_filter(&mut session, Some(&FilterCriteria::nodes("type", ["server"])));
		state.apply_filter(&mut session, None);

		assert!(state.store.is_selected(&"a".into()));
		assert_eq!(session.highlight_state(), ToggleState::Active);
		assert_eq!(session.filter_state(), ToggleState::Inactive);
		assert!(state.store.nodes().all(|node| !node.hidden));
	}

	#[test]
	fn lifting_an_inactive_filter_leaves_store_alone() {
		let mut state = state();
		let mut session = HighlightSession::new(HighlightConfig::default());
		session.select_node(&mut state.store, vec!["b".into()]);
		let before = state.store.all_nodes();

		assert!(state.apply_filter(&mut session, None).is_empty());
		assert_eq!(state.store.all_nodes(), before);
	}

	#[test]
	fn reloaded_graph_keeps_requested_filter() {
		let criteria = FilterCriteria::nodes("type", ["server"]);
		let mut session = HighlightSession::new(HighlightConfig::default());
		let mut old = state();
		old.apply_filter(&mut session, Some(&criteria));
		session.select_node(&mut old.store, vec!["a".into()]);

		let mut reloaded = state();
		reloaded.adopt_session(&mut session, Some(&criteria));

		assert_eq!(session.filter_state(), ToggleState::Active);
		assert_eq!(session.highlight_state(), ToggleState::Inactive);
		assert_eq!(session.original_color(&"a".into()), None);
		assert!(!reloaded.store.node(&"a".into()).unwrap().hidden);
		assert!(reloaded.store.node(&"b".into()).unwrap().hidden);
		assert!(!reloaded.store.node(&"c".into()).unwrap().hidden);
	}

	#[test]
	fn reloaded_graph_without_filter_is_untouched() {
		let mut session = HighlightSession::new(HighlightConfig::default());
		let mut reloaded = state();
		reloaded.adopt_session(&mut session, None);
		assert_eq!(session.filter_state(), ToggleState::Inactive);
		assert!(reloaded.store.nodes().all(|node| !node.hidden));
	}

	#[test]
	fn clicking_empty_canvas_clears_the_highlight() {
		let mut state = state();
		let mut session = HighlightSession::new(HighlightConfig::default());
		session.select_node(&mut state.store, vec!["a".into()]);

		let ids = state.click(&mut session, SelectionMode::Neighbourhood, -10_000.0, -10_000.0);
		assert!(ids.is_empty());
		assert_eq!(session.highlight_state(), ToggleState::Inactive);
		assert!(state.store.selected().is_empty());
	}
}
