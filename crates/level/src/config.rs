//! TOML configuration for ordering, override rules, elite tiers, and kinds.
//!
//! Every section is optional. An empty file yields the built-in defaults:
//! the standard priority table, the `ZombieTypes`/`GridItemTypes` override
//! rules, and an elite rule pinning `Level` to `0`.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ConfigError;
use crate::object::empty_payload;
use crate::order::{PriorityTable, STANDARD_PRIORITY};
use crate::resolve::{EliteTierRule, OverrideRule, ResolveRules};
use crate::schema::{KindCategory, KindSchema, SchemaRegistry};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LevelConfig {
	pub current_namespace: String,
	pub ordering: OrderingConfig,
	pub overrides: Vec<OverrideRule>,
	pub elite: EliteTierRule,
	pub kinds: BTreeMap<String, KindConfig>,
}

impl Default for LevelConfig {
	fn default() -> Self {
		let rules = ResolveRules::default();
		Self {
			current_namespace: rules.current_namespace,
			ordering: OrderingConfig::default(),
			overrides: rules.overrides,
			elite: EliteTierRule::default(),
			kinds: BTreeMap::new(),
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OrderingConfig {
	/// Kinds written first, highest priority first.
	pub priority: Vec<String>,
}

impl Default for OrderingConfig {
	fn default() -> Self {
		Self {
			priority: STANDARD_PRIORITY.iter().map(|k| (*k).to_owned()).collect(),
		}
	}
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct KindConfig {
	#[serde(default)]
	pub category: KindCategory,
	#[serde(default = "empty_payload")]
	pub default: Value,
	#[serde(default)]
	pub description: Option<String>,
}

impl LevelConfig {
	pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
		let config: Self = toml::from_str(text)?;
		config.validate()?;
		Ok(config)
	}

	pub fn load(path: &Path) -> Result<Self, ConfigError> {
		let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
			path: path.to_path_buf(),
			source,
		})?;
		let config = Self::from_toml_str(&text)?;
		tracing::debug!(path = %path.display(), kinds = config.kinds.len(), overrides = config.overrides.len(), "level config loaded");
		Ok(config)
	}

	pub fn validate(&self) -> Result<(), ConfigError> {
		if self.current_namespace.is_empty() {
			return Err(ConfigError::Invalid("current_namespace must be non-empty".into()));
		}
		if self.current_namespace.contains(['@', ')']) {
			return Err(ConfigError::Invalid(format!(
				"current_namespace {:?} contains a reference delimiter",
				self.current_namespace
			)));
		}

		let mut seen = std::collections::BTreeSet::new();
		for kind in &self.ordering.priority {
			if kind.is_empty() {
				return Err(ConfigError::Invalid("ordering.priority contains an empty kind".into()));
			}
			if !seen.insert(kind.as_str()) {
				return Err(ConfigError::Invalid(format!("ordering.priority lists {kind:?} twice")));
			}
		}

		for (i, rule) in self.overrides.iter().enumerate() {
			if rule.namespace.is_empty() || rule.kind.is_empty() || rule.identity_field.is_empty() {
				return Err(ConfigError::Invalid(format!("overrides[{i}] has an empty field")));
			}
		}

		if self.elite.tier_field.is_empty() {
			return Err(ConfigError::Invalid("elite.tier_field must be non-empty".into()));
		}
		Ok(())
	}

	pub fn priority_table(&self) -> PriorityTable {
		PriorityTable::from_kinds(&self.ordering.priority)
	}

	pub fn resolve_rules(&self) -> ResolveRules {
		ResolveRules {
			current_namespace: self.current_namespace.clone(),
			overrides: self.overrides.clone(),
		}
	}

	pub fn elite_rule(&self) -> EliteTierRule {
		self.elite.clone()
	}

	pub fn schema_registry(&self) -> SchemaRegistry {
		let mut registry = SchemaRegistry::new();
		for (kind, cfg) in &self.kinds {
			let mut schema = KindSchema::new(kind.as_str(), cfg.category).default_payload(cfg.default.clone());
			schema.description = cfg.description.clone();
			registry.register(schema);
		}
		registry
	}
}

#[cfg(test)]
mod tests {
	use std::io::Write;

	use pretty_assertions::assert_eq;
	use rstest::rstest;
	use serde_json::json;

	use super::*;

	#[test]
	fn empty_config_uses_defaults() {
		let config = LevelConfig::from_toml_str("").unwrap();
		assert_eq!(config, LevelConfig::default());
		assert_eq!(config.priority_table(), PriorityTable::standard());
		assert_eq!(config.resolve_rules(), ResolveRules::default());
		assert_eq!(config.elite_rule(), EliteTierRule::default());
		assert!(config.schema_registry().is_empty());
	}

	#[test]
	fn full_config_round_trips_into_components() {
		let config = LevelConfig::from_toml_str(
			r#"
			current_namespace = "CurrentLevel"

			[ordering]
			priority = ["LevelDefinition", "SeedBankProperties"]

			[[overrides]]
			namespace = "PlantTypes"
			kind = "PlantType"
			identity_field = "TypeName"

			[elite]
			tier_field = "Tier"
			sentinel = -1

			[kinds.SeedBankProperties]
			category = "module"
			default = { SelectionMethod = "chooser" }
			description = "Seed selection"
			"#,
		)
		.unwrap();

		let table = config.priority_table();
		assert_eq!(table.rank("SeedBankProperties"), Some(1));
		assert!(!table.contains("WaveManagerProperties"));

		let rules = config.resolve_rules();
		assert_eq!(rules.overrides, vec![OverrideRule::new("PlantTypes", "PlantType", "TypeName")]);

		assert_eq!(config.elite_rule().sentinel, -1);

		let registry = config.schema_registry();
		let schema = registry.get("SeedBankProperties").unwrap();
		assert_eq!(schema.category, KindCategory::Module);
		assert_eq!(schema.default_payload, json!({ "SelectionMethod": "chooser" }));
		assert_eq!(schema.description.as_deref(), Some("Seed selection"));
	}

	#[rstest]
	#[case("current_namespace = \"\"")]
	#[case("current_namespace = \"a@b\"")]
	#[case("[ordering]\npriority = [\"A\", \"A\"]")]
	#[case("[ordering]\npriority = [\"\"]")]
	#[case("[[overrides]]\nnamespace = \"ZombieTypes\"\nkind = \"\"\nidentity_field = \"TypeName\"")]
	#[case("[elite]\ntier_field = \"\"")]
	fn invalid_configs_are_rejected(#[case] text: &str) {
		assert!(matches!(LevelConfig::from_toml_str(text), Err(ConfigError::Invalid(_))), "accepted: {text}");
	}

	#[test]
	fn unknown_keys_are_parse_errors() {
		assert!(matches!(LevelConfig::from_toml_str("colour = 1"), Err(ConfigError::Parse(_))));
		assert!(matches!(LevelConfig::from_toml_str("[ordering]\nranks = []"), Err(ConfigError::Parse(_))));
	}

	#[test]
	fn load_reads_files() {
		let err = LevelConfig::load(Path::new("/nonexistent/verdant.toml")).unwrap_err();
		assert!(matches!(err, ConfigError::Io { .. }));

		let mut file = tempfile::NamedTempFile::new().unwrap();
		writeln!(file, "[ordering]\npriority = [\"GridItemType\"]").unwrap();
		let config = LevelConfig::load(file.path()).unwrap();
		assert_eq!(config.priority_table().rank("GridItemType"), Some(0));
	}
}
