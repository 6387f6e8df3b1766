//! Collision types and precedence rules.
//!
//! # Role
//!
//! This module defines the vocabulary for conflicts between catalog entries
//! and the policy used to settle them.

use std::fmt;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DuplicatePolicy {
	/// Keep the first definition seen for a key.
	#[default]
	FirstWins,
	/// Overwrite with the last definition seen.
	LastWins,
	/// Fail the build.
	Reject,
}

/// One side of a conflict.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Party {
	/// Canonical id of the entry (NOT the conflicting key).
	pub id: Box<str>,
	/// Stable ingest ordinal.
	pub ordinal: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyKind {
	/// Stage A: the entry's own id.
	Canonical,
	/// Stage B: a secondary lookup key.
	Alias,
}

impl fmt::Display for KeyKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Canonical => write!(f, "canonical"),
			Self::Alias => write!(f, "alias"),
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
	/// Existing binding kept; incoming dropped.
	KeptExisting,
	/// Existing binding replaced by incoming.
	ReplacedExisting,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collision {
	pub namespace: Box<str>,
	/// The lookup key that conflicted: a canonical id or an alias.
	pub key: Box<str>,
	pub kind: CollisionKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CollisionKind {
	/// Two entries had the same canonical id; the loser is dropped entirely.
	DuplicateId { winner: Party, loser: Party, policy: DuplicatePolicy },
	/// A binding attempt for `key` conflicted with an existing binding.
	KeyConflict {
		existing_kind: KeyKind,
		incoming_kind: KeyKind,
		existing: Party,
		incoming: Party,
		resolution: Resolution,
	},
}

impl fmt::Display for Collision {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match &self.kind {
			CollisionKind::DuplicateId { winner, loser, .. } => write!(
				f,
				"{}: duplicate id {:?} (kept #{}, dropped #{})",
				self.namespace, self.key, winner.ordinal, loser.ordinal
			),
			CollisionKind::KeyConflict {
				existing_kind,
				incoming_kind,
				existing,
				incoming,
				resolution,
			} => {
				let verdict = match resolution {
					Resolution::KeptExisting => "kept",
					Resolution::ReplacedExisting => "replaced by",
				};
				write!(
					f,
					"{}: {incoming_kind} {:?} of {} collides with {existing_kind} of {} ({} {})",
					self.namespace,
					self.key,
					incoming.id,
					existing.id,
					verdict,
					if *resolution == Resolution::KeptExisting { &existing.id } else { &incoming.id },
				)
			}
		}
	}
}
