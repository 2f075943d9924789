use std::collections::HashSet;

use serde::Deserialize;

use super::store::{EdgeMap, NodeMap};
use super::types::NodeId;

/// Which collection a [`FilterCriteria`] scans.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
	/// Match node attributes.
	Node,
	/// Match edge attributes and keep both endpoints.
	Edge,
}

/// Attribute selector: keep items whose `property` renders as one of `value`.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct FilterCriteria {
	/// Collection to scan.
	pub item: ItemKind,
	/// Attribute name.
	pub property: String,
	/// Allowed textual values.
	pub value: Vec<String>,
}

impl FilterCriteria {
	/// Node criteria.
	pub fn nodes<I, S>(property: impl Into<String>, values: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		Self {
			item: ItemKind::Node,
			property: property.into(),
			value: values.into_iter().map(Into::into).collect(),
		}
	}

	/// Edge criteria.
	pub fn edges<I, S>(property: impl Into<String>, values: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		Self {
			item: ItemKind::Edge,
			..Self::nodes(property, values)
		}
	}

	fn allows(&self, text: Option<&str>) -> bool {
		text.is_some_and(|text| self.value.iter().any(|allowed| allowed == text))
	}

	/// Matching node ids, in store order.
	pub fn matching_nodes(&self, nodes: &NodeMap) -> Vec<NodeId> {
		nodes
			.values()
			.filter(|node| self.allows(node.property_text(&self.property).as_deref()))
			.map(|node| node.id.clone())
			.collect()
	}

	/// Endpoints of matching edges, each id once, in first-seen order.
	pub fn matching_endpoints(&self, edges: &EdgeMap) -> Vec<NodeId> {
		let mut seen = HashSet::new();
		let mut ids = Vec::new();
		for edge in edges.values() {
			if !self.allows(edge.property_text(&self.property).as_deref()) {
				continue;
			}
			for id in [&edge.from, &edge.to] {
				if seen.insert(id) {
					ids.push(id.clone());
				}
			}
		}
		ids
	}
}

#[cfg(test)]
mod tests {
	use serde_json::json;

	use super::*;
	use crate::highlight::types::{EdgeRecord, NodeRecord};

	fn nodes() -> NodeMap {
		[
			NodeRecord::new("n1", "red").with_property("type", "server"),
			NodeRecord::new("n2", "red").with_property("type", "client"),
			NodeRecord::new("n3", "red").with_property("weight", 3),
			NodeRecord::new("n4", "red").with_property("weight", "3"),
		]
		.into_iter()
		.map(|node| (node.id.clone(), node))
		.collect()
	}

	#[test]
	fn node_values_compare_as_text() {
		let criteria = FilterCriteria::nodes("type", ["server"]);
		assert_eq!(criteria.matching_nodes(&nodes()), vec![NodeId::from("n1")]);

		let numeric = FilterCriteria::nodes("weight", ["3"]);
		assert_eq!(
			numeric.matching_nodes(&nodes()),
			vec![NodeId::from("n3"), NodeId::from("n4")]
		);
	}

	#[test]
	fn unknown_property_matches_nothing() {
		let criteria = FilterCriteria::nodes("colour", ["red"]);
		assert!(criteria.matching_nodes(&nodes()).is_empty());
	}

	#[test]
	fn edge_matches_contribute_both_endpoints_once() {
		let edges: EdgeMap = [
			EdgeRecord::new("e1", "a", "b").with_property("kind", "uses"),
			EdgeRecord::new("e2", "b", "c").with_property("kind", "uses"),
			EdgeRecord::new("e3", "c", "d").with_property("kind", "owns"),
		]
		.into_iter()
		.map(|edge| (edge.id.clone(), edge))
		.collect();

		let criteria = FilterCriteria::edges("kind", ["uses"]);
		assert_eq!(
			criteria.matching_endpoints(&edges),
			vec![NodeId::from("a"), NodeId::from("b"), NodeId::from("c")]
		);
	}

	#[test]
	fn criteria_deserialize_from_json() {
		let criteria: FilterCriteria = serde_json::from_value(json!({
			"item": "edge",
			"property": "kind",
			"value": ["uses"]
		}))
		.unwrap();
		assert_eq!(criteria, FilterCriteria::edges("kind", ["uses"]));
	}
}
