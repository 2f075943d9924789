use std::collections::HashSet;

use log::warn;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::highlight::{EdgeId, EdgeRecord, GraphStore, NodeColor, NodeId, NodeRecord, Properties};

const COLORS: &[&str] = &[
	"#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
	"#bcbd22", "#17becf",
];

/// Why a graph document could not become a store.
#[derive(Debug, Error)]
pub enum GraphDataError {
	/// Malformed JSON or wrong shape.
	#[error("graph document is not valid JSON: {0}")]
	Parse(#[from] serde_json::Error),
	/// Two nodes share an id.
	#[error("node id {0} appears more than once")]
	DuplicateNode(NodeId),
}

/// A node as written in a graph document.
#[derive(Clone, Debug, Deserialize)]
pub struct GraphNode {
	/// String or numeric id.
	pub id: NodeId,
	/// Optional display text.
	#[serde(default)]
	pub label: Option<String>,
	/// Explicit color; falls back to the group color.
	#[serde(default)]
	pub color: Option<NodeColor>,
	/// Index into the group palette.
	#[serde(default)]
	pub group: Option<u32>,
	/// Every other key of the node object.
	#[serde(flatten)]
	pub properties: Properties,
}

/// A link as written in a graph document; `from`/`to` are accepted too.
#[derive(Clone, Debug, Deserialize)]
pub struct GraphLink {
	/// Generated from the position in the list when absent.
	#[serde(default)]
	pub id: Option<EdgeId>,
	/// Source node.
	#[serde(alias = "from")]
	pub source: NodeId,
	/// Target node.
	#[serde(alias = "to")]
	pub target: NodeId,
	/// Every other key of the link object.
	#[serde(flatten)]
	pub properties: Properties,
}

/// Graph document fed to [`ForceGraphCanvas`](super::ForceGraphCanvas).
#[derive(Clone, Debug, Default, Deserialize)]
pub struct GraphData {
	/// Node list.
	#[serde(default)]
	pub nodes: Vec<GraphNode>,
	/// Link list.
	#[serde(default, alias = "edges")]
	pub links: Vec<GraphLink>,
}

/// How clicks on the canvas are turned into highlight calls.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SelectionMode {
	/// Dim everything outside the clicked node's neighbourhood.
	#[default]
	Neighbourhood,
	/// Hide everything except the clicked node.
	Filter,
}

impl GraphData {
	/// Parse a `{ "nodes": [...], "links"|"edges": [...] }` document.
	pub fn from_json(text: &str) -> Result<Self, GraphDataError> {
		Ok(serde_json::from_str(text)?)
	}

	/// Build the node/edge store the canvas renders from. Nodes without a
	/// color get one from their group; links to unknown nodes are dropped.
	pub fn to_store(&self) -> Result<GraphStore, GraphDataError> {
		let mut store = GraphStore::new();
		let mut seen = HashSet::new();

		for node in &self.nodes {
			if !seen.insert(&node.id) {
				return Err(GraphDataError::DuplicateNode(node.id.clone()));
			}
			let color = node.color.clone().unwrap_or_else(|| {
				let slot = node.group.map_or(0, |g| g as usize % COLORS.len());
				NodeColor::from(COLORS[slot])
			});
			let mut record = NodeRecord::new(node.id.clone(), color);
			record.label = node.label.clone();
			record.properties = node.properties.clone();
			if let Some(group) = node.group {
				record.properties.insert("group".into(), Value::from(group));
			}
			store.insert_node(record);
		}

		for (i, link) in self.links.iter().enumerate() {
			if !seen.contains(&link.source) || !seen.contains(&link.target) {
				warn!(
					"dropping link {} -> {}: endpoint not in graph",
					link.source, link.target
				);
				continue;
			}
			let id = link
				.id
				.clone()
				.unwrap_or_else(|| EdgeId::from(format!("link-{i}")));
			let mut edge = EdgeRecord::new(id, link.source.clone(), link.target.clone());
			edge.properties = link.properties.clone();
			store.insert_edge(edge);
		}

		Ok(store)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::highlight::Topology;

	#[test]
	fn vis_style_document_builds_a_store() {
		let data = GraphData::from_json(
			r#"{
				"nodes": [
					{ "id": 1, "label": "web", "type": "server", "group": 3 },
					{ "id": "2", "color": "red" }
				],
				"edges": [
					{ "from": 1, "to": "2", "kind": "http" },
					{ "from": 1, "to": 99 }
				]
			}"#,
		)
		.unwrap();
		let store = data.to_store().unwrap();

		let web = store.node(&"1".into()).unwrap();
		assert_eq!(web.color, NodeColor::from(COLORS[3]));
		assert_eq!(web.property_text("type").as_deref(), Some("server"));
		assert_eq!(web.property_text("group").as_deref(), Some("3"));
		assert_eq!(store.node(&"2".into()).unwrap().color, NodeColor::from("red"));

		assert_eq!(store.edges().count(), 1);
		let edge = store.edges().next().unwrap();
		assert_eq!(edge.property_text("kind").as_deref(), Some("http"));
		assert_eq!(store.connected_nodes(&"2".into()), vec![NodeId::from("1")]);
	}

	#[test]
	fn duplicate_nodes_are_rejected() {
		let data = GraphData::from_json(r#"{ "nodes": [{ "id": "a" }, { "id": "a" }] }"#).unwrap();
		assert!(matches!(
			data.to_store(),
			Err(GraphDataError::DuplicateNode(id)) if id == NodeId::from("a")
		));
	}

	#[test]
	fn malformed_json_is_a_parse_error() {
		assert!(matches!(
			GraphData::from_json("{ nodes"),
			Err(GraphDataError::Parse(_))
		));
	}
}
