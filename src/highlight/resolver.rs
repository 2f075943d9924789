use std::collections::{BTreeSet, HashMap, HashSet};

use log::debug;

use super::store::Topology;
use super::types::NodeId;

/// Nodes within `max_depth` hops of a seed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Neighbourhood {
	/// Node the expansion started from.
	pub seed: NodeId,
	/// One hop away.
	pub direct: BTreeSet<NodeId>,
	/// Everything reached in 1..=max_depth hops. May contain the seed.
	pub reachable: BTreeSet<NodeId>,
}

/// Bounded breadth expansion over [`Topology::connected_nodes`], with an
/// optional per-seed memo.
///
/// The memo is only valid for the topology it was filled from; call
/// [`invalidate`](Self::invalidate) when edges change.
#[derive(Debug)]
pub struct NeighbourhoodResolver {
	max_depth: usize,
	cache: Option<HashMap<NodeId, Neighbourhood>>,
}

impl NeighbourhoodResolver {
	/// Resolver expanding up to `max_depth` hops (at least one).
	pub fn new(max_depth: usize, caching: bool) -> Self {
		Self {
			max_depth: max_depth.max(1),
			cache: caching.then(HashMap::new),
		}
	}

	/// Hop limit.
	pub fn max_depth(&self) -> usize {
		self.max_depth
	}

	/// Whether results are memoized.
	pub fn is_caching(&self) -> bool {
		self.cache.is_some()
	}

	/// Number of memoized seeds.
	pub fn cached_seeds(&self) -> usize {
		self.cache.as_ref().map_or(0, HashMap::len)
	}

	/// Forget every memoized neighbourhood.
	pub fn invalidate(&mut self) {
		if let Some(cache) = &mut self.cache {
			cache.clear();
		}
	}

	/// Neighbourhood of `seed`, from the memo when caching.
	pub fn resolve<T>(&mut self, topology: &T, seed: &NodeId) -> Neighbourhood
	where
		T: Topology + ?Sized,
	{
		let Some(cache) = &mut self.cache else {
			return expand(topology, seed, self.max_depth);
		};
		if let Some(hit) = cache.get(seed) {
			debug!("neighbourhood of {seed} served from cache");
			return hit.clone();
		}
		let resolved = expand(topology, seed, self.max_depth);
		cache.insert(seed.clone(), resolved.clone());
		resolved
	}
}

fn expand<T>(topology: &T, seed: &NodeId, max_depth: usize) -> Neighbourhood
where
	T: Topology + ?Sized,
{
	let direct = topology.connected_nodes(seed);
	let mut raw = direct.clone();
	let mut frontier = direct.clone();

	// No visited set across levels: revisits are bounded by max_depth and
	// collapse when `raw` becomes a set.
	for _ in 1..max_depth {
		let next = {
			let mut expanded = HashSet::new();
			let mut next = Vec::new();
			for id in &frontier {
				if expanded.insert(id) {
					next.extend(topology.connected_nodes(id));
				}
			}
			next
		};
		raw.extend(next.iter().cloned());
		frontier = next;
	}

	debug!(
		"neighbourhood of {seed}: {} raw entries over {max_depth} hop(s)",
		raw.len()
	);

	Neighbourhood {
		seed: seed.clone(),
		direct: direct.into_iter().collect(),
		reachable: raw.into_iter().collect(),
	}
}
