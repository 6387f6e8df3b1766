//! Kind → schema descriptor registry.
//!
//! Payload handling dispatches on the object's `kind` string through this
//! table. The crate ships no descriptors of its own; they come from
//! [`crate::LevelConfig`] or from the embedding application.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use rustc_hash::FxHashMap as HashMap;

use crate::error::DocumentError;
use crate::object::{LevelObject, empty_payload};

/// Broad role of a kind in a level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KindCategory {
	/// Level-wide definition (one per level).
	Definition,
	/// Pluggable level module.
	Module,
	/// Wave event.
	Event,
	/// Property sheet or type override.
	Properties,
	#[default]
	Other,
}

#[derive(Debug, Clone, PartialEq)]
pub struct KindSchema {
	pub kind: String,
	pub category: KindCategory,
	/// Payload given to freshly created objects of this kind.
	pub default_payload: Value,
	pub description: Option<String>,
}

impl KindSchema {
	pub fn new(kind: impl Into<String>, category: KindCategory) -> Self {
		Self {
			kind: kind.into(),
			category,
			default_payload: empty_payload(),
			description: None,
		}
	}

	pub fn default_payload(mut self, payload: Value) -> Self {
		self.default_payload = payload;
		self
	}

	pub fn description(mut self, description: impl Into<String>) -> Self {
		self.description = Some(description.into());
		self
	}
}

#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
	by_kind: HashMap<Box<str>, KindSchema>,
}

impl SchemaRegistry {
	pub fn new() -> Self {
		Self::default()
	}

	/// Registers `schema`, returning the descriptor it replaced.
	pub fn register(&mut self, schema: KindSchema) -> Option<KindSchema> {
		let previous = self.by_kind.insert(Box::from(schema.kind.as_str()), schema);
		if let Some(previous) = &previous {
			tracing::debug!(kind = %previous.kind, "schema replaced");
		}
		previous
	}

	pub fn get(&self, kind: &str) -> Option<&KindSchema> {
		self.by_kind.get(kind)
	}

	pub fn contains(&self, kind: &str) -> bool {
		self.by_kind.contains_key(kind)
	}

	/// Category of `kind`, [`KindCategory::Other`] when unregistered.
	pub fn category_of(&self, kind: &str) -> KindCategory {
		self.get(kind).map_or(KindCategory::Other, |s| s.category)
	}

	/// Registered kinds, sorted.
	pub fn kinds(&self) -> Vec<&str> {
		let mut kinds: Vec<&str> = self.by_kind.keys().map(|k| &**k).collect();
		kinds.sort_unstable();
		kinds
	}

	pub fn len(&self) -> usize {
		self.by_kind.len()
	}

	pub fn is_empty(&self) -> bool {
		self.by_kind.is_empty()
	}

	/// New object of `kind` carrying `alias` and the kind's default payload.
	pub fn instantiate(&self, kind: &str, alias: &str) -> Result<LevelObject, DocumentError> {
		let schema = self.get(kind).ok_or_else(|| DocumentError::UnknownKind(kind.to_owned()))?;
		let object = LevelObject::new(kind, schema.default_payload.clone());
		Ok(if alias.is_empty() { object } else { object.with_alias(alias) })
	}
}
