use rustc_hash::FxHashMap as HashMap;

use crate::collision::{Collision, CollisionKind, DuplicatePolicy, KeyKind, Party, Resolution};
use crate::entry::CatalogEntry;
use crate::error::CatalogError;
use crate::lookup::CatalogLookup;

/// Builder for constructing a [`Catalog`].
#[derive(Debug, Default)]
pub struct CatalogBuilder {
	pending: Vec<(Box<str>, CatalogEntry)>,
	policy: DuplicatePolicy,
}

impl CatalogBuilder {
	pub fn new() -> Self {
		Self::default()
	}

	/// Sets the duplicate key handling policy.
	pub fn duplicate_policy(mut self, policy: DuplicatePolicy) -> Self {
		self.policy = policy;
		self
	}

	/// Returns the number of entries ingested so far.
	pub fn len(&self) -> usize {
		self.pending.len()
	}

	pub fn is_empty(&self) -> bool {
		self.pending.is_empty()
	}

	/// Adds a single entry under `namespace`.
	pub fn push(&mut self, namespace: &str, entry: CatalogEntry) {
		self.pending.push((Box::from(namespace), entry));
	}

	/// Adds multiple entries under `namespace`.
	pub fn extend<I: IntoIterator<Item = CatalogEntry>>(&mut self, namespace: &str, entries: I) {
		self.pending
			.extend(entries.into_iter().map(|e| (Box::from(namespace), e)));
	}

	/// Binds ids, then aliases, per namespace and freezes the result.
	pub fn build(self) -> Result<Catalog, CatalogError> {
		let policy = self.policy;

		// Group by namespace, preserving first-seen namespace order and ingest ordinals.
		let mut order: Vec<Box<str>> = Vec::new();
		let mut grouped: HashMap<Box<str>, Vec<(u32, CatalogEntry)>> = HashMap::default();
		for (ordinal, (namespace, entry)) in self.pending.into_iter().enumerate() {
			if namespace.is_empty() {
				return Err(CatalogError::InvalidEntry {
					namespace: namespace.into(),
					reason: format!("entry {:?} has an empty namespace", entry.id),
				});
			}
			if entry.id.is_empty() {
				return Err(CatalogError::InvalidEntry {
					namespace: namespace.into(),
					reason: format!("entry #{ordinal} has an empty id"),
				});
			}
			if !grouped.contains_key(&namespace) {
				order.push(namespace.clone());
			}
			grouped.entry(namespace).or_default().push((ordinal as u32, entry));
		}

		let mut sections = HashMap::with_capacity_and_hasher(order.len(), Default::default());
		let mut collisions = Vec::new();
		for namespace in order {
			let Some(entries) = grouped.remove(&namespace) else {
				continue;
			};
			let section = build_section(&namespace, entries, policy, &mut collisions)?;
			sections.insert(namespace, section);
		}

		if !collisions.is_empty() {
			let samples: Vec<String> = collisions.iter().take(5).map(ToString::to_string).collect();
			tracing::debug!(count = collisions.len(), ?samples, "catalog collisions detected");
		}

		let catalog = Catalog { sections, collisions };
		tracing::debug!(namespaces = catalog.sections.len(), entries = catalog.len(), "catalog built");
		Ok(catalog)
	}
}

fn build_section(
	namespace: &str,
	entries: Vec<(u32, CatalogEntry)>,
	policy: DuplicatePolicy,
	collisions: &mut Vec<Collision>,
) -> Result<Section, CatalogError> {
	let mut kept: Vec<(u32, CatalogEntry)> = Vec::with_capacity(entries.len());
	let mut by_key: HashMap<Box<str>, u32> = HashMap::with_capacity_and_hasher(entries.len() * 2, Default::default());
	let mut key_kinds: HashMap<Box<str>, KeyKind> = HashMap::default();

	// Stage A: canonical ids
	for (ordinal, entry) in entries {
		match by_key.get(entry.id.as_str()).copied() {
			None => {
				let slot = kept.len() as u32;
				by_key.insert(Box::from(entry.id.as_str()), slot);
				key_kinds.insert(Box::from(entry.id.as_str()), KeyKind::Canonical);
				kept.push((ordinal, entry));
			}
			Some(slot) => {
				let (existing_ordinal, _) = &kept[slot as usize];
				let existing = Party {
					id: Box::from(entry.id.as_str()),
					ordinal: *existing_ordinal,
				};
				let incoming = Party {
					id: Box::from(entry.id.as_str()),
					ordinal,
				};
				let (winner, loser) = match policy {
					DuplicatePolicy::Reject => {
						return Err(CatalogError::DuplicateId {
							namespace: namespace.into(),
							id: entry.id,
						});
					}
					DuplicatePolicy::FirstWins => (existing, incoming),
					DuplicatePolicy::LastWins => {
						let key = entry.id.clone().into_boxed_str();
						kept[slot as usize] = (ordinal, entry);
						collisions.push(Collision {
							namespace: namespace.into(),
							key,
							kind: CollisionKind::DuplicateId {
								winner: incoming,
								loser: existing,
								policy,
							},
						});
						continue;
					}
				};
				collisions.push(Collision {
					namespace: namespace.into(),
					key: entry.id.into_boxed_str(),
					kind: CollisionKind::DuplicateId { winner, loser, policy },
				});
			}
		}
	}

	// Stage B: aliases
	for (slot, (ordinal, entry)) in kept.iter().enumerate() {
		let slot = slot as u32;
		let incoming = || Party {
			id: Box::from(entry.id.as_str()),
			ordinal: *ordinal,
		};

		for alias in &entry.aliases {
			if alias.is_empty() || alias == &entry.id {
				continue;
			}
			let Some(&owner) = by_key.get(alias.as_str()) else {
				by_key.insert(Box::from(alias.as_str()), slot);
				key_kinds.insert(Box::from(alias.as_str()), KeyKind::Alias);
				continue;
			};
			if owner == slot {
				continue;
			}

			let (owner_ordinal, owner_entry) = &kept[owner as usize];
			let existing = Party {
				id: Box::from(owner_entry.id.as_str()),
				ordinal: *owner_ordinal,
			};
			let existing_kind = key_kinds.get(alias.as_str()).copied().unwrap_or(KeyKind::Alias);

			let resolution = match (existing_kind, policy) {
				// Canonical ids are displacement-immune.
				(KeyKind::Canonical, _) => Resolution::KeptExisting,
				(KeyKind::Alias, DuplicatePolicy::FirstWins) => Resolution::KeptExisting,
				(KeyKind::Alias, DuplicatePolicy::LastWins) => Resolution::ReplacedExisting,
				(KeyKind::Alias, DuplicatePolicy::Reject) => {
					return Err(CatalogError::KeyConflict {
						namespace: namespace.into(),
						key: alias.clone(),
						existing: owner_entry.id.clone(),
						incoming: entry.id.clone(),
					});
				}
			};
			if resolution == Resolution::ReplacedExisting {
				by_key.insert(Box::from(alias.as_str()), slot);
			}
			collisions.push(Collision {
				namespace: namespace.into(),
				key: Box::from(alias.as_str()),
				kind: CollisionKind::KeyConflict {
					existing_kind,
					incoming_kind: KeyKind::Alias,
					existing,
					incoming: incoming(),
					resolution,
				},
			});
		}
	}

	Ok(Section {
		name: namespace.into(),
		entries: kept.into_iter().map(|(_, e)| e).collect(),
		by_key,
	})
}

/// Entries of one namespace with O(1) lookup by id or alias.
#[derive(Debug, Clone)]
pub struct Section {
	name: Box<str>,
	entries: Vec<CatalogEntry>,
	by_key: HashMap<Box<str>, u32>,
}

impl Section {
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Looks up an entry by id or alias.
	#[inline]
	pub fn get(&self, key: &str) -> Option<&CatalogEntry> {
		let slot = *self.by_key.get(key)?;
		self.entries.get(slot as usize)
	}

	/// Effective entries in ingest order.
	pub fn iter(&self) -> impl Iterator<Item = &CatalogEntry> + '_ {
		self.entries.iter()
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}
}

/// Immutable set of catalog sections keyed by namespace.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
	sections: HashMap<Box<str>, Section>,
	collisions: Vec<Collision>,
}

impl Catalog {
	pub fn builder() -> CatalogBuilder {
		CatalogBuilder::new()
	}

	pub fn section(&self, namespace: &str) -> Option<&Section> {
		self.sections.get(namespace)
	}

	/// Namespace names, sorted.
	pub fn namespaces(&self) -> Vec<&str> {
		let mut names: Vec<&str> = self.sections.keys().map(|k| &**k).collect();
		names.sort_unstable();
		names
	}

	/// Total number of effective entries across all namespaces.
	pub fn len(&self) -> usize {
		self.sections.values().map(Section::len).sum()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Returns recorded collisions for diagnostics.
	pub fn collisions(&self) -> &[Collision] {
		&self.collisions
	}
}

impl CatalogLookup for Catalog {
	fn entry(&self, namespace: &str, key: &str) -> Option<&CatalogEntry> {
		self.sections.get(namespace)?.get(key)
	}
}
