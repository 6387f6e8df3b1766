use serde::{Deserialize, Serialize};

/// One builtin definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
	/// Canonical id, the alias a reference normally uses.
	pub id: String,
	/// Human-readable name. Falls back to `id` when absent.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub name: Option<String>,
	/// Secondary lookup keys.
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub aliases: Vec<String>,
	/// Icon asset name, resolved by the presentation layer.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub icon: Option<String>,
	/// Elite variants carry no configurable tier.
	#[serde(default)]
	pub elite: bool,
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub tags: Vec<String>,
}

impl CatalogEntry {
	pub fn new(id: impl Into<String>) -> Self {
		Self {
			id: id.into(),
			name: None,
			aliases: Vec::new(),
			icon: None,
			elite: false,
			tags: Vec::new(),
		}
	}

	pub fn named(mut self, name: impl Into<String>) -> Self {
		self.name = Some(name.into());
		self
	}

	pub fn alias(mut self, alias: impl Into<String>) -> Self {
		self.aliases.push(alias.into());
		self
	}

	pub fn icon(mut self, icon: impl Into<String>) -> Self {
		self.icon = Some(icon.into());
		self
	}

	pub fn elite(mut self, elite: bool) -> Self {
		self.elite = elite;
		self
	}

	pub fn tag(mut self, tag: impl Into<String>) -> Self {
		self.tags.push(tag.into());
		self
	}

	/// Name to show in the editor.
	pub fn display_name(&self) -> &str {
		self.name.as_deref().unwrap_or(&self.id)
	}

	pub fn has_tag(&self, tag: &str) -> bool {
		self.tags.iter().any(|t| t == tag)
	}
}
