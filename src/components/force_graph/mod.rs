mod component;
mod listeners;
mod render;
mod state;
mod types;

pub use component::ForceGraphCanvas;
pub use types::{GraphData, GraphDataError, GraphLink, GraphNode, SelectionMode};
