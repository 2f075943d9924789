//! Neighbourhood highlighting and selection filtering over a node store.
//!
//! A [`HighlightSession`] owns the toggle state, the first-seen node colors
//! and the neighbourhood cache for one graph. The graph itself is reached
//! through the [`NodeStore`], [`EdgeStore`], [`Topology`] and
//! [`SelectionSink`] traits; [`GraphStore`] implements all four in memory.

mod config;
mod filter;
mod resolver;
mod session;
mod store;
#[cfg(test)]
mod testing;
mod types;

pub use config::{HighlightConfig, Palette, SessionProfile};
pub use filter::{FilterCriteria, ItemKind};
pub use resolver::{Neighbourhood, NeighbourhoodResolver};
pub use session::{HighlightSession, ToggleState, Transition};
pub use store::{EdgeMap, EdgeStore, GraphStore, NodeMap, NodeStore, SelectionSink, Topology};
pub use types::{
	EdgeId, EdgeRecord, HighlightColor, NodeColor, NodeId, NodeRecord, Properties, SelectionEvent,
	value_text,
};
