use serde::{Deserialize, Serialize};
use serde_json::Value;
use verdant_rtid::Rtid;

use super::Resolver;

/// Tier clamp for payloads that reference an elite target.
///
/// Elite targets have a fixed difficulty, so the referencing payload's tier
/// field is pinned to `sentinel`. The resolver only reports eliteness; this
/// rule is what callers apply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EliteTierRule {
	pub tier_field: String,
	pub sentinel: i64,
}

impl Default for EliteTierRule {
	fn default() -> Self {
		Self {
			tier_field: "Level".to_owned(),
			sentinel: 0,
		}
	}
}

impl EliteTierRule {
	/// Tier a payload referencing `target` must carry, if forced.
	pub fn forced_tier(&self, resolver: &Resolver<'_>, target: &Rtid) -> Option<i64> {
		resolver.is_elite(target).then_some(self.sentinel)
	}

	/// Pins the tier field of `payload` when `target` is elite.
	///
	/// Only an existing tier field is rewritten. Returns true if `payload`
	/// changed.
	pub fn normalize(&self, resolver: &Resolver<'_>, target: &Rtid, payload: &mut Value) -> bool {
		let Some(tier) = self.forced_tier(resolver, target) else {
			return false;
		};
		let Some(field) = payload.get_mut(&self.tier_field) else {
			return false;
		};
		if field.as_i64() == Some(tier) {
			return false;
		}
		tracing::debug!(reference = %target, field = %self.tier_field, tier, "elite tier forced");
		*field = Value::from(tier);
		true
	}
}
