//! Canonical save order.
//!
//! # Invariants
//!
//! - Order depends only on each object's kind and first alias.
//!   - Enforced in: [`PriorityTable::compare`], [`PriorityTable::save_order`] (stable sort).
//!   - Failure symptom: re-saving an unchanged level produces a diff.
//! - Unranked kinds sort after every ranked kind, then by kind name.
//!   - Enforced in: [`PriorityTable::compare`].
//!   - Failure symptom: an unknown module jumps ahead of the level definition.

use std::cmp::Ordering;

use rustc_hash::FxHashMap as HashMap;

use crate::document::{LevelDocument, ObjectId};
use crate::object::LevelObject;


/// Kinds written first, in this order, by [`PriorityTable::standard`].
pub const STANDARD_PRIORITY: &[&str] = &[
	"LevelDefinition",
	"SeedBankProperties",
	"ConveyorSeedBankProperties",
	"SunDropperProperties",
	"StarChallengeModuleProperties",
	"ZombiesDeadWinConProperties",
	"WaveManagerModuleProperties",
	"WaveManagerProperties",
	"SpawnZombiesJitteredWaveActionProps",
	"StormZombieSpawnerProps",
	"ZombieType",
	"ZombiePropertySheet",
	"GridItemType",
];

/// `kind → rank`. Lower ranks are written first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PriorityTable {
	ranks: HashMap<Box<str>, u32>,
}

impl PriorityTable {
	/// Ranks kinds by position. A repeated kind keeps its first rank.
	pub fn from_kinds<I, S>(kinds: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		let mut ranks = HashMap::default();
		let mut next = 0u32;
		for kind in kinds {
			ranks.entry(Box::from(kind.as_ref())).or_insert_with(|| {
				let rank = next;
				next += 1;
				rank
			});
		}
		Self { ranks }
	}

	pub fn standard() -> Self {
		Self::from_kinds(STANDARD_PRIORITY)
	}

	pub fn rank(&self, kind: &str) -> Option<u32> {
		self.ranks.get(kind).copied()
	}

	pub fn contains(&self, kind: &str) -> bool {
		self.ranks.contains_key(kind)
	}

	pub fn len(&self) -> usize {
		self.ranks.len()
	}

	pub fn is_empty(&self) -> bool {
		self.ranks.is_empty()
	}

	/// Rank, then kind name, then first alias.
	pub fn compare(&self, a: &LevelObject, b: &LevelObject) -> Ordering {
		let ra = self.rank(a.kind()).unwrap_or(u32::MAX);
		let rb = self.rank(b.kind()).unwrap_or(u32::MAX);
		ra.cmp(&rb)
			.then_with(|| a.kind().cmp(b.kind()))
			.then_with(|| a.first_alias().cmp(b.first_alias()))
	}

	/// Ids of `doc` in canonical save order. Ties keep document order.
	pub fn save_order(&self, doc: &LevelDocument) -> Vec<ObjectId> {
		let mut entries: Vec<(ObjectId, &LevelObject)> = doc.iter_with_ids().collect();
		entries.sort_by(|(_, a), (_, b)| self.compare(a, b));
		entries.into_iter().map(|(id, _)| id).collect()
	}
}

impl LevelDocument {
	/// Reorders the document into canonical save order.
	pub fn canonicalize(&mut self, table: &PriorityTable) {
		let order = table.save_order(self);
		if order.as_slice() == self.ids() {
			return;
		}
		// save_order is a permutation of ids() by construction.
		if let Err(err) = self.reorder(order) {
			tracing::warn!(%err, "canonical order rejected");
		}
	}
}
