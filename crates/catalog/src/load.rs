//! TOML catalog data files.
//!
//! Each top-level table is a namespace; each sub-table is one entry keyed by
//! its canonical id:
//!
//! ```toml
//! [ZombieTypes.tutorial]
//! name = "Basic Zombie"
//! icon = "zombie_tutorial"
//!
//! [ZombieTypes.gargantuar]
//! name = "Gargantuar"
//! aliases = ["garg"]
//! elite = true
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use crate::builder::CatalogBuilder;
use crate::entry::CatalogEntry;
use crate::error::CatalogError;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct EntryDef {
	#[serde(default)]
	name: Option<String>,
	#[serde(default)]
	aliases: Vec<String>,
	#[serde(default)]
	icon: Option<String>,
	#[serde(default)]
	elite: bool,
	#[serde(default)]
	tags: Vec<String>,
}

type CatalogFile = BTreeMap<String, BTreeMap<String, EntryDef>>;

impl CatalogBuilder {
	/// Ingests every entry of a TOML catalog document.
	///
	/// Namespaces and ids are ingested in sorted order so ordinals do not
	/// depend on table layout.
	pub fn merge_toml(&mut self, text: &str) -> Result<usize, CatalogError> {
		let file: CatalogFile = toml::from_str(text)?;
		let mut count = 0;
		for (namespace, entries) in file {
			for (id, def) in entries {
				self.push(
					&namespace,
					CatalogEntry {
						id,
						name: def.name,
						aliases: def.aliases,
						icon: def.icon,
						elite: def.elite,
						tags: def.tags,
					},
				);
				count += 1;
			}
		}
		Ok(count)
	}

	/// Reads and ingests a TOML catalog file.
	pub fn merge_file(&mut self, path: &Path) -> Result<usize, CatalogError> {
		let text = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
			path: path.to_path_buf(),
			source,
		})?;
		let count = self.merge_toml(&text)?;
		tracing::debug!(path = %path.display(), count, "catalog file merged");
		Ok(count)
	}
}
