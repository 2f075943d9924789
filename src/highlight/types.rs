use std::borrow::{Borrow, Cow};
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Free-form attributes carried by nodes and edges.
pub type Properties = Map<String, Value>;

/// Ids arrive as JSON strings or numbers; both are kept as text.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
	Text(String),
	Number(serde_json::Number),
}

impl RawId {
	fn into_text(self) -> String {
		match self {
			Self::Text(text) => text,
			Self::Number(n) => n.to_string(),
		}
	}
}

macro_rules! string_id {
	($(#[$meta:meta])* $name:ident) => {
		$(#[$meta])*
		#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
		#[serde(transparent)]
		pub struct $name(String);

		impl $name {
			/// Borrow the id as text.
			pub fn as_str(&self) -> &str {
				&self.0
			}
		}

		impl<'de> Deserialize<'de> for $name {
			fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
				RawId::deserialize(deserializer).map(|raw| Self(raw.into_text()))
			}
		}

		impl From<$name> for String {
			fn from(id: $name) -> Self {
				id.0
			}
		}

		impl From<String> for $name {
			fn from(id: String) -> Self {
				Self(id)
			}
		}

		impl From<&str> for $name {
			fn from(id: &str) -> Self {
				Self(id.to_owned())
			}
		}

		impl Borrow<str> for $name {
			fn borrow(&self) -> &str {
				&self.0
			}
		}

		impl fmt::Display for $name {
			fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
				f.write_str(&self.0)
			}
		}
	};
}

string_id!(
	/// Stable key of a node in the store.
	NodeId
);
string_id!(
	/// Stable key of an edge in the store.
	EdgeId
);

/// Border/background pair used when a node is under the pointer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighlightColor {
	/// Fill color.
	pub background: String,
	/// Outline color.
	pub border: String,
}

/// Node color, either a single CSS token or a full background/border record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NodeColor {
	/// A single CSS color token.
	Simple(String),
	/// Separate fill, outline and hover colors.
	Structured {
		/// Fill color.
		background: String,
		/// Outline color.
		border: String,
		/// Colors shown under the pointer.
		highlight: HighlightColor,
	},
}

impl NodeColor {
	/// Color used to fill the node body.
	pub fn fill(&self) -> &str {
		match self {
			Self::Simple(color) => color,
			Self::Structured { background, .. } => background,
		}
	}

	/// Outline color, when the record carries one.
	pub fn border(&self) -> Option<&str> {
		match self {
			Self::Simple(_) => None,
			Self::Structured { border, .. } => Some(border),
		}
	}
}

impl From<&str> for NodeColor {
	fn from(color: &str) -> Self {
		Self::Simple(color.to_owned())
	}
}

impl From<String> for NodeColor {
	fn from(color: String) -> Self {
		Self::Simple(color)
	}
}

/// A node as held by the node store.
///
/// `hidden_label` and `saved_label` are shadow slots: the neighbourhood
/// highlight parks the label in the first while a node is dimmed, the
/// selection filter parks it in the second while a node is filtered out.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeRecord {
	/// Store key.
	pub id: NodeId,
	/// Current display color.
	pub color: NodeColor,
	/// Text drawn next to the node.
	pub label: Option<String>,
	/// Hidden nodes are neither drawn nor hit-tested.
	pub hidden: bool,
	/// Label parked while the node is dimmed by a highlight.
	pub hidden_label: Option<String>,
	/// Label parked while the node is filtered out.
	pub saved_label: Option<String>,
	/// Free-form attributes.
	pub properties: Properties,
}

impl NodeRecord {
	/// Visible, unlabelled node with no properties.
	pub fn new(id: impl Into<NodeId>, color: impl Into<NodeColor>) -> Self {
		Self {
			id: id.into(),
			color: color.into(),
			label: None,
			hidden: false,
			hidden_label: None,
			saved_label: None,
			properties: Properties::new(),
		}
	}

	/// Set the label.
	pub fn with_label(mut self, label: impl Into<String>) -> Self {
		self.label = Some(label.into());
		self
	}

	/// Add or replace an attribute.
	pub fn with_property(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
		self.properties.insert(key.into(), value.into());
		self
	}

	/// Textual form of a named attribute. `id` and `label` resolve to the
	/// record fields; anything else is looked up in the property bag.
	pub fn property_text(&self, name: &str) -> Option<Cow<'_, str>> {
		match name {
			"id" => Some(Cow::Borrowed(self.id.as_str())),
			"label" => self.label.as_deref().map(Cow::Borrowed),
			_ => self.properties.get(name).and_then(value_text),
		}
	}

	/// Move the label into `hidden_label` unless one is already parked there.
	pub fn stash_hidden_label(&mut self) {
		if self.hidden_label.is_none() {
			self.hidden_label = self.label.take();
		}
	}

	/// Put a label parked by [`Self::stash_hidden_label`] back.
	pub fn restore_hidden_label(&mut self) {
		if let Some(label) = self.hidden_label.take() {
			self.label = Some(label);
		}
	}

	/// Move the label into `saved_label` unless one is already parked there.
	pub fn stash_saved_label(&mut self) {
		if self.saved_label.is_none() {
			self.saved_label = self.label.take();
		}
	}

	/// Put a label parked by [`Self::stash_saved_label`] back.
	pub fn restore_saved_label(&mut self) {
		if let Some(label) = self.saved_label.take() {
			self.label = Some(label);
		}
	}
}

/// An edge as held by the edge store.
#[derive(Clone, Debug, PartialEq)]
pub struct EdgeRecord {
	/// Store key.
	pub id: EdgeId,
	/// Source endpoint.
	pub from: NodeId,
	/// Target endpoint.
	pub to: NodeId,
	/// Free-form attributes.
	pub properties: Properties,
}

impl EdgeRecord {
	/// Edge between two nodes, with no properties.
	pub fn new(id: impl Into<EdgeId>, from: impl Into<NodeId>, to: impl Into<NodeId>) -> Self {
		Self {
			id: id.into(),
			from: from.into(),
			to: to.into(),
			properties: Properties::new(),
		}
	}

	/// Add or replace an attribute.
	pub fn with_property(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
		self.properties.insert(key.into(), value.into());
		self
	}

	/// Like [`NodeRecord::property_text`], with `id`, `from` and `to` as
	/// record fields.
	pub fn property_text(&self, name: &str) -> Option<Cow<'_, str>> {
		match name {
			"id" => Some(Cow::Borrowed(self.id.as_str())),
			"from" => Some(Cow::Borrowed(self.from.as_str())),
			"to" => Some(Cow::Borrowed(self.to.as_str())),
			_ => self.properties.get(name).and_then(value_text),
		}
	}
}

/// Text a scalar property compares as. Numbers use their JSON rendering so
/// `3` and `"3"` compare equal; null and composite values have no text.
pub fn value_text(value: &Value) -> Option<Cow<'_, str>> {
	match value {
		Value::String(text) => Some(Cow::Borrowed(text)),
		Value::Number(n) => Some(Cow::Owned(n.to_string())),
		Value::Bool(b) => Some(Cow::Owned(b.to_string())),
		Value::Null | Value::Array(_) | Value::Object(_) => None,
	}
}

/// Payload of a selection callback: the ids under the pointer, or nothing
/// when the user clicked empty canvas.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SelectionEvent {
	/// Selected ids, in pointer order.
	pub nodes: Vec<NodeId>,
}

impl SelectionEvent {
	/// Event carrying `nodes`.
	pub fn new(nodes: Vec<NodeId>) -> Self {
		Self { nodes }
	}

	/// Event for a click on empty canvas.
	pub fn cleared() -> Self {
		Self::default()
	}

	/// True when nothing was selected.
	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}
}
