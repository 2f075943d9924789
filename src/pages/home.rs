use leptos::prelude::*;

use crate::components::force_graph::{ForceGraphCanvas, GraphData, GraphLink, GraphNode};
use crate::highlight::{FilterCriteria, Properties};

const ROLES: &[&str] = &["server", "client", "router"];

/// Generate sample graph data (random tree) with a `type` attribute per node.
fn generate_sample_data(n: usize) -> GraphData {
	let nodes: Vec<GraphNode> = (0..n)
		.map(|i| {
			let mut properties = Properties::new();
			properties.insert("type".into(), ROLES[i % ROLES.len()].into());
			GraphNode {
				id: i.to_string().into(),
				label: if i < 10 {
					Some(format!("Node {}", i))
				} else {
					None
				},
				color: None,
				group: Some((i % 10) as u32),
				properties,
			}
		})
		.collect();

	let links: Vec<GraphLink> = (1..n)
		.map(|i| {
			let target = (rand_simple(i) * (i as f64)) as usize;
			GraphLink {
				id: None,
				source: i.to_string().into(),
				target: target.to_string().into(),
				properties: Properties::new(),
			}
		})
		.collect();

	GraphData { nodes, links }
}

/// Simple pseudo-random number generator (deterministic for consistency).
fn rand_simple(seed: usize) -> f64 {
	let x = ((seed + 1) * 9301 + 49297) % 233280;
	(x as f64) / 233280.0
}

/// Default Home Page
#[component]
pub fn Home() -> impl IntoView {
	let graph_data = Signal::derive(move || generate_sample_data(100));
	let filter = RwSignal::new(None::<FilterCriteria>);

	let role_button = move |role: &'static str| {
		view! {
			<button on:click=move |_| filter.set(Some(FilterCriteria::nodes("type", [role])))>
				{role}
			</button>
		}
	};

	view! {
		<ErrorBoundary fallback=|errors| {
			view! {
				<h1>"Uh oh! Something went wrong!"</h1>

				<p>"Errors: "</p>
				<ul>
					{move || {
						errors
							.get()
							.into_iter()
							.map(|(_, e)| view! { <li>{e.to_string()}</li> })
							.collect_view()
					}}
				</ul>
			}
		}>

			<div class="fullscreen-graph">
				<ForceGraphCanvas data=graph_data fullscreen=true filter=filter />
				<div class="graph-overlay">
					<h1>"Graph Neighbourhoods"</h1>
					<p class="subtitle">"Click a node to highlight its neighbourhood. Click empty space to clear."</p>
					<div class="graph-filters">
						{ROLES.iter().map(|role| role_button(*role)).collect_view()}
						<button on:click=move |_| filter.set(None)>"all"</button>
					</div>
				</div>
			</div>
		</ErrorBoundary>
	}
}
