//! Reference resolution.
//!
//! # Purpose
//!
//! Answers "what does this RTID reach?" for one document and one catalog.
//!
//! # Mental Model
//!
//! Two lanes, chosen by namespace:
//!
//! - **Current level:** alias lookup in the document; first object in
//!   document order wins.
//! - **Builtin namespace:** a document object of the namespace's override
//!   kind whose identity field names the same catalog entry shadows the
//!   catalog. Identities and reference aliases are both canonicalised to the
//!   entry id first, so `garg` and `gargantuar` meet. Without an override, the
//!   catalog decides.
//!
//! # Invariants
//!
//! - Local definitions always shadow catalog definitions.
//!   - Enforced in: [`Resolver::resolve`] (override lookup before catalog lookup).
//!   - Failure symptom: a customised zombie type shows builtin stats.
//! - Resolution never mutates and never fails.
//!   - Enforced in: [`Resolver`] (holds `&LevelDocument`; returns [`Resolution::Unresolved`]).
//!   - Failure symptom: an editor screen crashes on a typo.

mod elite;
#[cfg(test)]
mod tests;

pub use elite::EliteTierRule;
use rustc_hash::FxHashMap as HashMap;
use serde::{Deserialize, Serialize};
use verdant_catalog::{CatalogEntry, CatalogLookup};
use verdant_rtid::{DecodeError, Rtid, namespace};

use crate::document::{LevelDocument, ObjectId};
use crate::object::LevelObject;

/// Declares that objects of `kind` may override catalog entries of
/// `namespace`; the overridden id is read from the payload field
/// `identity_field`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OverrideRule {
	pub namespace: String,
	pub kind: String,
	pub identity_field: String,
}

impl OverrideRule {
	pub fn new(namespace: impl Into<String>, kind: impl Into<String>, identity_field: impl Into<String>) -> Self {
		Self {
			namespace: namespace.into(),
			kind: kind.into(),
			identity_field: identity_field.into(),
		}
	}

	/// Identity `object` declares under this rule, if it is of the rule's kind.
	pub fn identity_of<'o>(&self, object: &'o LevelObject) -> Option<&'o str> {
		if object.kind() != self.kind {
			return None;
		}
		object.field_str(&self.identity_field).filter(|s| !s.is_empty())
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolveRules {
	/// Namespace whose references are looked up in the document.
	pub current_namespace: String,
	pub overrides: Vec<OverrideRule>,
}

impl Default for ResolveRules {
	fn default() -> Self {
		Self {
			current_namespace: namespace::CURRENT_LEVEL.to_owned(),
			overrides: vec![
				OverrideRule::new(namespace::ZOMBIE_TYPES, "ZombieType", "TypeName"),
				OverrideRule::new(namespace::GRID_ITEM_TYPES, "GridItemType", "TypeName"),
			],
		}
	}
}

/// How a local hit was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocalVia {
	/// Current-level reference matched an alias.
	Alias,
	/// Builtin reference shadowed by an override object.
	Override,
}

#[derive(Debug, Clone, Copy)]
pub struct LocalHit<'a> {
	pub id: ObjectId,
	pub object: &'a LevelObject,
	pub via: LocalVia,
}

/// Outcome of resolving one reference.
#[derive(Debug, Clone, Copy)]
pub enum Resolution<'a> {
	Local(LocalHit<'a>),
	Catalog(&'a CatalogEntry),
	Unresolved,
}

impl<'a> Resolution<'a> {
	pub fn is_resolved(&self) -> bool {
		!matches!(self, Self::Unresolved)
	}

	pub fn local(&self) -> Option<&LocalHit<'a>> {
		match self {
			Self::Local(hit) => Some(hit),
			_ => None,
		}
	}

	pub fn catalog(&self) -> Option<&'a CatalogEntry> {
		match self {
			Self::Catalog(entry) => Some(entry),
			_ => None,
		}
	}

	/// Short tag for logs and CLI output.
	pub fn label(&self) -> &'static str {
		match self {
			Self::Local(LocalHit { via: LocalVia::Alias, .. }) => "local",
			Self::Local(LocalHit { via: LocalVia::Override, .. }) => "override",
			Self::Catalog(_) => "catalog",
			Self::Unresolved => "unresolved",
		}
	}
}

/// A string field interpreted as a possible reference.
#[derive(Debug, Clone)]
pub enum FieldResolution<'a> {
	/// Not a decodable reference; the text is kept as-is.
	Literal(DecodeError),
	Reference { rtid: Rtid, resolution: Resolution<'a> },
}

/// Read-only resolver over one document and one catalog.
///
/// Override declarations are indexed at construction. Build a new resolver
/// after mutating the document.
pub struct Resolver<'a> {
	document: &'a LevelDocument,
	catalog: &'a dyn CatalogLookup,
	rules: ResolveRules,
	/// namespace → canonical identity → first declaring object.
	overrides: HashMap<Box<str>, HashMap<Box<str>, ObjectId>>,
}

impl<'a> Resolver<'a> {
	pub fn new(document: &'a LevelDocument, catalog: &'a dyn CatalogLookup, rules: ResolveRules) -> Self {
		let mut overrides: HashMap<Box<str>, HashMap<Box<str>, ObjectId>> = HashMap::default();
		for (id, object) in document.iter_with_ids() {
			for rule in &rules.overrides {
				if let Some(identity) = rule.identity_of(object) {
					let identity = canonical_identity(catalog, &rule.namespace, identity);
					overrides
						.entry(Box::from(rule.namespace.as_str()))
						.or_default()
						.entry(Box::from(identity))
						.or_insert(id);
				}
			}
		}
		tracing::trace!(namespaces = overrides.len(), "resolver indexed overrides");
		Self {
			document,
			catalog,
			rules,
			overrides,
		}
	}

	pub fn document(&self) -> &'a LevelDocument {
		self.document
	}

	pub fn catalog(&self) -> &'a dyn CatalogLookup {
		self.catalog
	}

	pub fn rules(&self) -> &ResolveRules {
		&self.rules
	}

	pub fn resolve(&self, rtid: &Rtid) -> Resolution<'a> {
		let resolution = self.resolve_inner(rtid);
		if !resolution.is_resolved() {
			tracing::debug!(alias = rtid.alias(), namespace = rtid.namespace(), "unresolved reference");
		}
		resolution
	}

	fn resolve_inner(&self, rtid: &Rtid) -> Resolution<'a> {
		let document = self.document;
		if rtid.is_in(&self.rules.current_namespace) {
			return match document.find_id_by_alias(rtid.alias()) {
				Some(id) => local(document, id, LocalVia::Alias),
				None => Resolution::Unresolved,
			};
		}
		if let Some(id) = self.override_for(rtid.namespace(), rtid.alias()) {
			return local(document, id, LocalVia::Override);
		}
		let catalog = self.catalog;
		match catalog.entry(rtid.namespace(), rtid.alias()) {
			Some(entry) => Resolution::Catalog(entry),
			None => Resolution::Unresolved,
		}
	}

	/// Decodes `text` and resolves it. Undecodable text is a literal.
	pub fn resolve_literal(&self, text: &str) -> FieldResolution<'a> {
		match Rtid::parse(text) {
			Ok(rtid) => {
				let resolution = self.resolve(&rtid);
				FieldResolution::Reference { rtid, resolution }
			}
			Err(err) => FieldResolution::Literal(err),
		}
	}

	/// Object overriding catalog entry `identity` of `ns`, if any. `identity`
	/// may be the entry id or any of its catalog aliases.
	pub fn override_for(&self, ns: &str, identity: &str) -> Option<ObjectId> {
		let declared = self.overrides.get(ns)?;
		declared.get(canonical_identity(self.catalog, ns, identity)).copied()
	}

	/// Name to show for `rtid`: the local object's first alias, the catalog
	/// entry's display name, or the raw alias when unresolved.
	pub fn display_name<'r>(&self, rtid: &'r Rtid) -> &'r str
	where
		'a: 'r,
	{
		match self.resolve(rtid) {
			Resolution::Local(hit) => match hit.object.first_alias() {
				"" => rtid.alias(),
				alias => alias,
			},
			Resolution::Catalog(entry) => entry.display_name(),
			Resolution::Unresolved => rtid.alias(),
		}
	}

	/// Whether `rtid` reaches something the catalog classifies as elite.
	///
	/// A local override is elite when the catalog entry it shadows is.
	pub fn is_elite(&self, rtid: &Rtid) -> bool {
		match self.resolve(rtid) {
			Resolution::Catalog(entry) => entry.elite,
			Resolution::Local(hit) => self
				.rules
				.overrides
				.iter()
				.filter_map(|rule| rule.identity_of(hit.object).map(|identity| (rule, identity)))
				.any(|(rule, identity)| self.catalog.is_elite(&rule.namespace, identity)),
			Resolution::Unresolved => false,
		}
	}
}

/// Catalog id `key` stands for in `ns`, or `key` itself when the catalog does
/// not know it.
fn canonical_identity<'k>(catalog: &'k dyn CatalogLookup, ns: &str, key: &'k str) -> &'k str {
	catalog.entry(ns, key).map_or(key, |entry| entry.id.as_str())
}

fn local<'a>(document: &'a LevelDocument, id: ObjectId, via: LocalVia) -> Resolution<'a> {
	match document.get(id) {
		Some(object) => Resolution::Local(LocalHit { id, object, via }),
		None => Resolution::Unresolved,
	}
}
