use std::collections::HashMap;

use log::debug;

use super::config::HighlightConfig;
use super::filter::{FilterCriteria, ItemKind};
use super::resolver::NeighbourhoodResolver;
use super::store::{EdgeStore, NodeStore, SelectionSink, Topology};
use super::types::{NodeColor, NodeId, NodeRecord, SelectionEvent};

/// State of one toggle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ToggleState {
	/// Store shows the original appearance.
	#[default]
	Inactive,
	/// Store carries this toggle's writes.
	Active,
}

/// What a toggle call did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Transition {
	/// Entered or refreshed the active state; one batch was written.
	Activated,
	/// Returned to the inactive state; one batch was written.
	Deactivated,
	/// Nothing to do; the store was not touched.
	Unchanged,
}

/// Per-graph highlight state: the two toggles, the original colors seen so
/// far and the neighbourhood resolver.
///
/// Every entry point reads the store once and writes it back at most once.
#[derive(Debug)]
pub struct HighlightSession {
	config: HighlightConfig,
	resolver: NeighbourhoodResolver,
	original_colors: HashMap<NodeId, NodeColor>,
	highlight: ToggleState,
	filter: ToggleState,
}

impl HighlightSession {
	/// Fresh session with both toggles inactive.
	pub fn new(config: HighlightConfig) -> Self {
		let resolver = NeighbourhoodResolver::new(config.profile.depth(), config.caching());
		Self {
			config,
			resolver,
			original_colors: HashMap::new(),
			highlight: ToggleState::Inactive,
			filter: ToggleState::Inactive,
		}
	}

	/// Configuration the session was built from.
	pub fn config(&self) -> &HighlightConfig {
		&self.config
	}

	/// Neighbourhood highlight toggle.
	pub fn highlight_state(&self) -> ToggleState {
		self.highlight
	}

	/// Selection filter toggle.
	pub fn filter_state(&self) -> ToggleState {
		self.filter
	}

	/// Color `id` reverts to, once it has been dimmed at least once.
	pub fn original_color(&self, id: &NodeId) -> Option<&NodeColor> {
		self.original_colors.get(id)
	}

	/// The session's neighbourhood resolver.
	pub fn resolver(&self) -> &NeighbourhoodResolver {
		&self.resolver
	}

	/// Drop cached neighbourhoods after edges were added or removed.
	pub fn topology_changed(&mut self) {
		self.resolver.invalidate();
	}

	/// Forget everything, for when the store is replaced by a new graph.
	pub fn reset(&mut self) {
		self.resolver.invalidate();
		self.original_colors.clear();
		self.highlight = ToggleState::Inactive;
		self.filter = ToggleState::Inactive;
	}

	/// Dim the graph around the first selected node, or undo the dimming when
	/// the selection is empty.
	pub fn neighbourhood_highlight<G>(&mut self, graph: &mut G, event: &SelectionEvent) -> Transition
	where
		G: NodeStore + Topology + ?Sized,
	{
		match (event.nodes.first(), self.highlight) {
			(Some(seed), _) => {
				self.activate_highlight(graph, seed);
				Transition::Activated
			}
			(None, ToggleState::Active) => {
				self.deactivate_highlight(graph);
				Transition::Deactivated
			}
			(None, ToggleState::Inactive) => Transition::Unchanged,
		}
	}

	fn activate_highlight<G>(&mut self, graph: &mut G, seed: &NodeId)
	where
		G: NodeStore + Topology + ?Sized,
	{
		let mut nodes = graph.all_nodes();
		let palette = &self.config.palette;

		for (id, node) in nodes.iter_mut() {
			self.original_colors
				.entry(id.clone())
				.or_insert_with(|| node.color.clone());
			node.color = palette.dimmed.clone();
			node.stash_hidden_label();
		}

		let hood = self.resolver.resolve(&*graph, seed);
		for id in &hood.reachable {
			if let Some(node) = nodes.get_mut(id) {
				node.color = palette.dim_visible.clone();
				node.restore_hidden_label();
			}
		}
		for id in &hood.direct {
			if let Some(node) = nodes.get_mut(id) {
				restore_original(&self.original_colors, node);
			}
		}
		if let Some(node) = nodes.get_mut(seed) {
			if self.config.profile.resource_constrained {
				node.color = palette.selected.clone();
				node.restore_hidden_label();
			} else {
				restore_original(&self.original_colors, node);
			}
		}

		debug!(
			"highlight on {seed}: {} of {} node(s) in neighbourhood",
			hood.reachable.len(),
			nodes.len()
		);
		self.highlight = ToggleState::Active;
		graph.update_batch(nodes.into_values().collect());
	}

	fn deactivate_highlight<G>(&mut self, graph: &mut G)
	where
		G: NodeStore + ?Sized,
	{
		let mut nodes = graph.all_nodes();
		for node in nodes.values_mut() {
			restore_original(&self.original_colors, node);
		}
		debug!("highlight cleared on {} node(s)", nodes.len());
		self.highlight = ToggleState::Inactive;
		graph.update_batch(nodes.into_values().collect());
	}

	/// Show only the selected nodes, or show everything again when the
	/// selection is empty.
	pub fn filter_highlight<G>(&mut self, graph: &mut G, event: &SelectionEvent) -> Transition
	where
		G: NodeStore + ?Sized,
	{
		if event.is_empty() && self.filter == ToggleState::Inactive {
			return Transition::Unchanged;
		}

		let mut nodes = graph.all_nodes();
		let transition = if event.is_empty() {
			for node in nodes.values_mut() {
				node.hidden = false;
				node.restore_saved_label();
			}
			self.filter = ToggleState::Inactive;
			Transition::Deactivated
		} else {
			for node in nodes.values_mut() {
				node.hidden = true;
				node.stash_saved_label();
			}
			for id in &event.nodes {
				if let Some(node) = nodes.get_mut(id) {
					node.hidden = false;
					node.restore_saved_label();
				}
			}
			self.filter = ToggleState::Active;
			Transition::Activated
		};

		debug!(
			"filter {transition:?}: {} selected of {} node(s)",
			event.nodes.len(),
			nodes.len()
		);
		graph.update_batch(nodes.into_values().collect());
		transition
	}

	/// Mark `ids` selected in the renderer and highlight their neighbourhood.
	pub fn select_node<G>(&mut self, graph: &mut G, ids: Vec<NodeId>) -> Vec<NodeId>
	where
		G: NodeStore + Topology + SelectionSink + ?Sized,
	{
		graph.select_nodes(&ids);
		let event = SelectionEvent::new(ids);
		self.neighbourhood_highlight(graph, &event);
		event.nodes
	}

	/// Mark `ids` selected in the renderer and filter the graph down to them.
	pub fn select_nodes<G>(&mut self, graph: &mut G, ids: Vec<NodeId>) -> Vec<NodeId>
	where
		G: NodeStore + SelectionSink + ?Sized,
	{
		graph.select_nodes(&ids);
		let event = SelectionEvent::new(ids);
		self.filter_highlight(graph, &event);
		event.nodes
	}

	/// Select nodes by attribute and filter the graph down to them.
	pub fn highlight_filter<G>(&mut self, graph: &mut G, criteria: &FilterCriteria) -> Vec<NodeId>
	where
		G: NodeStore + EdgeStore + SelectionSink + ?Sized,
	{
		let ids = match criteria.item {
			ItemKind::Node => criteria.matching_nodes(&graph.all_nodes()),
			ItemKind::Edge => criteria.matching_endpoints(&graph.all_edges()),
		};
		debug!(
			"{:?} filter on {:?} matched {} node(s)",
			criteria.item,
			criteria.property,
			ids.len()
		);
		self.select_nodes(graph, ids)
	}
}

fn restore_original(original_colors: &HashMap<NodeId, NodeColor>, node: &mut NodeRecord) {
	if let Some(color) = original_colors.get(&node.id) {
		node.color = color.clone();
	}
	node.restore_hidden_label();
}
