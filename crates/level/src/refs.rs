//! Reference discovery inside opaque payloads, and the prune action.

use serde_json::Value;
use verdant_rtid::{DecodeError, Rtid, looks_like_reference};

use crate::document::{LevelDocument, ObjectId};
use crate::error::DocumentError;

/// One string field that carries the RTID wrapper.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldRef<'a> {
	/// RFC 6901 pointer into the payload.
	pub pointer: String,
	pub literal: &'a str,
	pub decoded: Result<Rtid, DecodeError>,
}

/// Every reference-looking string in `payload`, depth first in field order.
pub fn scan_references(payload: &Value) -> Vec<FieldRef<'_>> {
	let mut out = Vec::new();
	let mut path = String::new();
	walk(payload, &mut path, &mut out);
	out
}

fn walk<'a>(value: &'a Value, path: &mut String, out: &mut Vec<FieldRef<'a>>) {
	match value {
		Value::String(text) if looks_like_reference(text) => out.push(FieldRef {
			pointer: path.clone(),
			literal: text,
			decoded: Rtid::parse(text),
		}),
		Value::Array(items) => {
			for (i, item) in items.iter().enumerate() {
				let len = path.len();
				path.push('/');
				path.push_str(&i.to_string());
				walk(item, path, out);
				path.truncate(len);
			}
		}
		Value::Object(map) => {
			for (key, item) in map {
				let len = path.len();
				path.push('/');
				push_escaped(path, key);
				walk(item, path, out);
				path.truncate(len);
			}
		}
		_ => {}
	}
}

fn push_escaped(path: &mut String, key: &str) {
	for ch in key.chars() {
		match ch {
			'~' => path.push_str("~0"),
			'/' => path.push_str("~1"),
			c => path.push(c),
		}
	}
}

fn unescape(token: &str) -> String {
	token.replace("~1", "/").replace("~0", "~")
}

impl LevelDocument {
	/// Deletes the field at `pointer` in `holder`'s payload and returns it.
	///
	/// Array elements are removed (later elements shift down); object members
	/// are removed keeping the order of the rest.
	pub fn prune_reference(&mut self, holder: ObjectId, pointer: &str) -> Result<Value, DocumentError> {
		let Some((parent_ptr, last)) = pointer.rsplit_once('/') else {
			return Err(DocumentError::InvalidPointer(pointer.to_owned()));
		};
		if !parent_ptr.is_empty() && !parent_ptr.starts_with('/') {
			return Err(DocumentError::InvalidPointer(pointer.to_owned()));
		}
		let payload = self.payload_mut(holder).ok_or(DocumentError::UnknownObject(holder))?;
		let missing = || DocumentError::NoSuchField {
			id: holder,
			pointer: pointer.to_owned(),
		};
		let parent = payload.pointer_mut(parent_ptr).ok_or_else(missing)?;
		let removed = match parent {
			Value::Object(map) => map.shift_remove(&unescape(last)),
			Value::Array(items) => match last.parse::<usize>() {
				Ok(i) if i < items.len() => Some(items.remove(i)),
				_ => None,
			},
			_ => None,
		};
		let removed = removed.ok_or_else(missing)?;
		tracing::debug!(%holder, pointer, "reference pruned");
		Ok(removed)
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;
	use serde_json::json;

	use super::*;
	use crate::object::LevelObject;

	#[test]
	fn finds_nested_references_with_pointers() {
		let payload = json!({
			"Modules": ["RTID(DefaultSunDropper@LevelModules)", "RTID(Waves@CurrentLevel)"],
			"Waves": [[{ "Type": "RTID(tutorial@ZombieTypes)", "Note": "plain" }]],
			"a/b": "RTID(slash@CurrentLevel)",
			"m~n": "RTID(broken",
			"Count": 4
		});

		let found: Vec<(String, &str, bool)> = scan_references(&payload).into_iter().map(|r| (r.pointer, r.literal, r.decoded.is_ok())).collect();
		assert_eq!(
			found,
			vec![
				("/Modules/0".to_owned(), "RTID(DefaultSunDropper@LevelModules)", true),
				("/Modules/1".to_owned(), "RTID(Waves@CurrentLevel)", true),
				("/Waves/0/0/Type".to_owned(), "RTID(tutorial@ZombieTypes)", true),
				("/a~1b".to_owned(), "RTID(slash@CurrentLevel)", true),
				("/m~0n".to_owned(), "RTID(broken", false),
			]
		);
	}

	#[test]
	fn top_level_string_payload_uses_root_pointer() {
		let payload = Value::from("RTID(a@b)");
		let refs = scan_references(&payload);
		assert_eq!(refs.len(), 1);
		assert_eq!(refs[0].pointer, "");
	}

	#[test]
	fn prune_removes_array_elements_and_members() {
		let mut doc = LevelDocument::new();
		let id = doc.insert(
			LevelObject::new(
				"LevelDefinition",
				json!({ "Modules": ["RTID(a@CurrentLevel)", "RTID(b@CurrentLevel)"], "a/b": "RTID(c@CurrentLevel)", "Keep": 1 }),
			)
			.with_alias("Def"),
		);

		assert_eq!(doc.prune_reference(id, "/Modules/0").unwrap(), json!("RTID(a@CurrentLevel)"));
		assert_eq!(doc.prune_reference(id, "/a~1b").unwrap(), json!("RTID(c@CurrentLevel)"));
		assert_eq!(
			doc.get(id).map(|o| o.payload().clone()),
			Some(json!({ "Modules": ["RTID(b@CurrentLevel)"], "Keep": 1 }))
		);
	}

	#[test]
	fn prune_reports_bad_targets() {
		let mut doc = LevelDocument::new();
		let id = doc.insert(LevelObject::new("K", json!({ "List": [] })));

		assert!(matches!(doc.prune_reference(id, ""), Err(DocumentError::InvalidPointer(_))));
		assert!(matches!(doc.prune_reference(id, "List"), Err(DocumentError::InvalidPointer(_))));
		assert!(matches!(doc.prune_reference(id, "/List/0"), Err(DocumentError::NoSuchField { .. })));
		assert!(matches!(doc.prune_reference(id, "/Missing/x"), Err(DocumentError::NoSuchField { .. })));

		doc.remove(id);
		assert!(matches!(doc.prune_reference(id, "/List"), Err(DocumentError::UnknownObject(_))));
	}
}
