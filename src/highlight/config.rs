use serde::Deserialize;

use super::types::NodeColor;

/// Device/session profile, fixed for the lifetime of a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SessionProfile {
	/// Low-power device: shallower neighbourhoods, cached traversals,
	/// no physics unless explicitly resumed.
	pub resource_constrained: bool,
	/// Number of hops included in a neighbourhood.
	pub max_depth: usize,
}

impl SessionProfile {
	/// Resize coalescing window on constrained devices.
	pub const RESIZE_DEBOUNCE_MS: i32 = 250;

	/// Desktop defaults: two hops, physics on.
	pub const fn standard() -> Self {
		Self {
			resource_constrained: false,
			max_depth: 2,
		}
	}

	/// Low-power defaults: one hop, physics off.
	pub const fn constrained() -> Self {
		Self {
			resource_constrained: true,
			max_depth: 1,
		}
	}

	/// Traversal depth, never below one hop.
	pub fn depth(&self) -> usize {
		self.max_depth.max(1)
	}

	/// Whether the simulation runs as soon as the graph loads.
	pub fn physics_at_start(&self) -> bool {
		!self.resource_constrained
	}

	/// New physics flag after the document changes visibility, or `None`
	/// when the flag should be left alone.
	pub fn physics_on_visibility(&self, document_hidden: bool) -> Option<bool> {
		if document_hidden {
			Some(false)
		} else if self.resource_constrained {
			None
		} else {
			Some(true)
		}
	}

	/// Backing-store scale for the canvas.
	pub fn pixel_ratio(&self, device_ratio: f64) -> f64 {
		if self.resource_constrained || !device_ratio.is_finite() || device_ratio <= 0.0 {
			1.0
		} else {
			device_ratio
		}
	}

	/// Delay applied to window resizes, if they should be coalesced.
	pub fn resize_debounce_ms(&self) -> Option<i32> {
		self.resource_constrained.then_some(Self::RESIZE_DEBOUNCE_MS)
	}
}

impl Default for SessionProfile {
	fn default() -> Self {
		Self::standard()
	}
}

/// Colors written by the neighbourhood highlight.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Palette {
	/// Nodes outside the neighbourhood.
	pub dimmed: NodeColor,
	/// Nodes inside the neighbourhood but not adjacent to the seed.
	pub dim_visible: NodeColor,
	/// Seed emphasis under the constrained profile.
	pub selected: NodeColor,
}

impl Default for Palette {
	fn default() -> Self {
		Self {
			dimmed: NodeColor::from("rgba(200,200,200,0.5)"),
			dim_visible: NodeColor::from("rgba(150,150,150,0.75)"),
			selected: NodeColor::from("#ffd166"),
		}
	}
}

/// Everything a [`HighlightSession`](super::HighlightSession) is built from.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct HighlightConfig {
	/// Device profile.
	pub profile: SessionProfile,
	/// Highlight colors.
	pub palette: Palette,
	/// Memoize neighbourhoods per seed. Follows the profile when unset.
	pub cache_neighbourhoods: Option<bool>,
}

impl HighlightConfig {
	/// Default palette with the given profile.
	pub fn for_profile(profile: SessionProfile) -> Self {
		Self {
			profile,
			..Self::default()
		}
	}

	/// Whether the resolver keeps a per-seed cache.
	pub fn caching(&self) -> bool {
		self.cache_neighbourhoods
			.unwrap_or(self.profile.resource_constrained)
	}
}

#[cfg(test)]
mod tests {
	use serde_json::json;

	use super::*;

	#[test]
	fn profiles_pick_depth_and_cache() {
		let standard = HighlightConfig::for_profile(SessionProfile::standard());
		assert_eq!(standard.profile.depth(), 2);
		assert!(!standard.caching());

		let constrained = HighlightConfig::for_profile(SessionProfile::constrained());
		assert_eq!(constrained.profile.depth(), 1);
		assert!(constrained.caching());
	}

	#[test]
	fn zero_depth_is_clamped() {
		let profile = SessionProfile {
			resource_constrained: false,
			max_depth: 0,
		};
		assert_eq!(profile.depth(), 1);
	}

	#[test]
	fn visibility_only_resumes_physics_on_standard_profile() {
		let standard = SessionProfile::standard();
		assert!(standard.physics_at_start());
		assert_eq!(standard.physics_on_visibility(true), Some(false));
		assert_eq!(standard.physics_on_visibility(false), Some(true));

		let constrained = SessionProfile::constrained();
		assert!(!constrained.physics_at_start());
		assert_eq!(constrained.physics_on_visibility(true), Some(false));
		assert_eq!(constrained.physics_on_visibility(false), None);
	}

	#[test]
	fn pixel_ratio_and_debounce_follow_profile() {
		assert_eq!(SessionProfile::standard().pixel_ratio(2.0), 2.0);
		assert_eq!(SessionProfile::standard().pixel_ratio(f64::NAN), 1.0);
		assert_eq!(SessionProfile::constrained().pixel_ratio(3.0), 1.0);
		assert_eq!(SessionProfile::standard().resize_debounce_ms(), None);
		assert_eq!(SessionProfile::constrained().resize_debounce_ms(), Some(250));
	}

	#[test]
	fn config_deserializes_with_defaults() {
		let config: HighlightConfig = serde_json::from_value(json!({
			"profile": { "resource_constrained": true },
			"palette": { "selected": "orange" }
		}))
		.unwrap();
		assert!(config.profile.resource_constrained);
		assert_eq!(config.profile.max_depth, 2);
		assert_eq!(config.palette.selected, NodeColor::from("orange"));
		assert_eq!(config.palette.dimmed, Palette::default().dimmed);
		assert!(config.caching());
	}
}
