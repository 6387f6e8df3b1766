//! JSON level files.
//!
//! Loading keeps file order as document order. Saving writes objects in
//! canonical order without touching the live document.

use std::io::{Read, Write};

use serde::{Deserialize, Serialize};
use serde_json::ser::PrettyFormatter;
use serde_json::{Map, Value};

use crate::document::{DEFAULT_VERSION, LevelDocument};
use crate::error::PersistError;
use crate::object::LevelObject;
use crate::order::PriorityTable;

#[derive(Deserialize)]
struct LevelFile {
	#[serde(rename = "#comment", default)]
	comment: Option<String>,
	#[serde(default)]
	objects: Vec<LevelObject>,
	#[serde(default = "default_version")]
	version: u32,
	#[serde(flatten)]
	extra: Map<String, Value>,
}

#[derive(Serialize)]
struct LevelFileRef<'a> {
	#[serde(rename = "#comment", skip_serializing_if = "Option::is_none")]
	comment: Option<&'a str>,
	objects: Vec<&'a LevelObject>,
	version: u32,
	#[serde(flatten)]
	extra: &'a Map<String, Value>,
}

fn default_version() -> u32 {
	DEFAULT_VERSION
}

impl LevelDocument {
	pub fn from_json_str(text: &str) -> Result<Self, PersistError> {
		let file: LevelFile = serde_json::from_str(text)?;
		Ok(Self::from_file(file))
	}

	pub fn from_reader<R: Read>(reader: R) -> Result<Self, PersistError> {
		let file: LevelFile = serde_json::from_reader(reader)?;
		Ok(Self::from_file(file))
	}

	fn from_file(file: LevelFile) -> Self {
		let mut doc = Self::from_objects(file.objects);
		doc.set_version(file.version);
		doc.set_comment(file.comment);
		*doc.header_extra_mut() = file.extra;
		tracing::debug!(objects = doc.len(), version = doc.version(), "level loaded");
		doc
	}

	/// Tab-indented JSON in canonical order, with a trailing newline.
	pub fn to_json_string(&self, table: &PriorityTable) -> Result<String, PersistError> {
		let mut buf = Vec::new();
		self.write_json(&mut buf, table)?;
		// serde_json only emits UTF-8.
		Ok(String::from_utf8_lossy(&buf).into_owned())
	}

	pub fn write_json<W: Write>(&self, mut writer: W, table: &PriorityTable) -> Result<(), PersistError> {
		let file = LevelFileRef {
			comment: self.comment(),
			objects: table.save_order(self).into_iter().filter_map(|id| self.get(id)).collect(),
			version: self.version(),
			extra: self.header_extra(),
		};
		let mut ser = serde_json::Serializer::with_formatter(&mut writer, PrettyFormatter::with_indent(b"\t"));
		file.serialize(&mut ser)?;
		writer.write_all(b"\n")?;
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;
	use serde_json::json;

	use super::*;

	const LEVEL: &str = r##"{
	"#comment": "Pyramid of Doom, day 3",
	"objects": [
		{
			"aliases": ["Waves"],
			"objclass": "WaveManagerProperties",
			"objdata": { "WaveCount": 2, "Waves": [["RTID(Wave1@CurrentLevel)"]] }
		},
		{
			"objclass": "LevelDefinition",
			"objdata": { "Modules": ["RTID(Waves@CurrentLevel)"] }
		},
		{
			"aliases": ["Wave1"],
			"objclass": "SpawnZombiesJitteredWaveActionProps"
		}
	],
	"version": 1
}"##;

	#[test]
	fn load_keeps_file_order_and_header() {
		let doc = LevelDocument::from_json_str(LEVEL).unwrap();
		let kinds: Vec<&str> = doc.iter().map(LevelObject::kind).collect();
		assert_eq!(kinds, vec!["WaveManagerProperties", "LevelDefinition", "SpawnZombiesJitteredWaveActionProps"]);
		assert_eq!(doc.comment(), Some("Pyramid of Doom, day 3"));
		assert_eq!(doc.version(), 1);
		assert_eq!(doc.find_by_alias("Wave1").map(LevelObject::payload), Some(&json!({})));
	}

	#[test]
	fn save_is_canonical_and_tab_indented() {
		let doc = LevelDocument::from_json_str(LEVEL).unwrap();
		let text = doc.to_json_string(&PriorityTable::standard()).unwrap();

		assert!(text.starts_with("{\n\t\"#comment\""));
		assert!(text.ends_with("}\n"));
		let saved: serde_json::Value = serde_json::from_str(&text).unwrap();
		let kinds: Vec<&str> = saved["objects"].as_array().unwrap().iter().filter_map(|o| o["objclass"].as_str()).collect();
		assert_eq!(kinds, vec!["LevelDefinition", "WaveManagerProperties", "SpawnZombiesJitteredWaveActionProps"]);
		assert!(saved["objects"][0].get("aliases").is_none(), "empty alias lists are omitted");

		let live: Vec<&str> = doc.iter().map(LevelObject::kind).collect();
		assert_eq!(live[0], "WaveManagerProperties", "saving does not reorder the document");
	}

	#[test]
	fn save_then_load_is_stable() {
		let table = PriorityTable::standard();
		let first = LevelDocument::from_json_str(LEVEL).unwrap().to_json_string(&table).unwrap();
		let second = LevelDocument::from_json_str(&first).unwrap().to_json_string(&table).unwrap();
		assert_eq!(first, second);
	}

	#[test]
	fn unknown_fields_survive_a_rewrite() {
		let text = r##"{
			"#comment": "c",
			"objects": [{ "#comment": "keep me", "aliases": ["A"], "objclass": "K", "objdata": {} }],
			"version": 1,
			"loadorder": 7
		}"##;
		let doc = LevelDocument::from_json_str(text).unwrap();
		assert_eq!(doc.header_extra().get("loadorder"), Some(&json!(7)));
		assert_eq!(doc.find_by_alias("A").unwrap().extra().get("#comment"), Some(&json!("keep me")));

		let saved: serde_json::Value = serde_json::from_str(&doc.to_json_string(&PriorityTable::default()).unwrap()).unwrap();
		assert_eq!(
			saved,
			json!({
				"#comment": "c",
				"objects": [{ "#comment": "keep me", "aliases": ["A"], "objclass": "K", "objdata": {} }],
				"version": 1,
				"loadorder": 7
			})
		);
	}

	#[test]
	fn header_defaults_apply() {
		let doc = LevelDocument::from_json_str("{}").unwrap();
		assert!(doc.is_empty());
		assert_eq!((doc.version(), doc.comment()), (1, None));
		let text = doc.to_json_string(&PriorityTable::default()).unwrap();
		assert!(!text.contains("#comment"));
	}

	#[test]
	fn syntax_errors_are_values() {
		assert!(matches!(LevelDocument::from_json_str("{"), Err(PersistError::Json(_))));
		assert!(matches!(LevelDocument::from_reader(&b"42"[..]), Err(PersistError::Json(_))));
	}
}
