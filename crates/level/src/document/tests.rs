use pretty_assertions::assert_eq;
use serde_json::json;

use super::*;

fn obj(kind: &str, aliases: &[&str]) -> LevelObject {
	aliases.iter().fold(LevelObject::new(kind, json!({})), |o, a| o.with_alias(*a))
}

fn kinds(doc: &LevelDocument) -> Vec<&str> {
	doc.iter().map(LevelObject::kind).collect()
}

#[test]
fn find_by_alias_returns_first_in_document_order() {
	let mut doc = LevelDocument::new();
	let first = doc.insert(obj("A", &["dup"]));
	let second = doc.insert(obj("B", &["dup", "other"]));

	assert_eq!(doc.find_id_by_alias("dup"), Some(first));
	assert_eq!(doc.find_by_alias("dup").map(LevelObject::kind), Some("A"));
	assert_eq!(doc.find_all_by_alias("dup"), &[first, second]);
	assert_eq!(doc.find_id_by_alias("other"), Some(second));
	assert!(doc.find_by_alias("missing").is_none());
	assert!(doc.find_all_by_alias("missing").is_empty());
}

#[test]
fn insert_at_keeps_alias_lists_in_document_order() {
	let mut doc = LevelDocument::new();
	let late = doc.insert(obj("Late", &["dup"]));
	let early = doc.insert_at(0, obj("Early", &["dup"]));

	assert_eq!(kinds(&doc), vec!["Early", "Late"]);
	assert_eq!(doc.find_all_by_alias("dup"), &[early, late]);
	assert_eq!(doc.find_by_alias("dup").map(LevelObject::kind), Some("Early"));

	let tail = doc.insert_at(99, obj("Tail", &[]));
	assert_eq!(doc.position(tail), Some(2));
}

#[test]
fn anonymous_objects_are_not_indexed() {
	let mut doc = LevelDocument::new();
	doc.insert(obj("Anon", &[]));
	assert!(doc.find_by_alias("").is_none());
	assert_eq!(doc.len(), 1);
}

#[test]
fn remove_promotes_next_duplicate() {
	let mut doc = LevelDocument::new();
	let first = doc.insert(obj("A", &["dup"]));
	let second = doc.insert(obj("B", &["dup"]));

	let removed = doc.remove(first).expect("first object present");
	assert_eq!(removed.kind(), "A");
	assert_eq!(doc.find_id_by_alias("dup"), Some(second));
	assert!(doc.get(first).is_none());
	assert!(doc.remove(first).is_none(), "second removal is a no-op");
}

#[test]
fn stale_ids_do_not_alias_recycled_slots() {
	let mut doc = LevelDocument::new();
	let gone = doc.insert(obj("Gone", &["x"]));
	doc.remove(gone);
	let fresh = doc.insert(obj("Fresh", &["y"]));

	assert_ne!(gone, fresh);
	assert!(doc.get(gone).is_none());
	assert_eq!(doc.get(fresh).map(LevelObject::kind), Some("Fresh"));
	assert!(matches!(doc.add_alias(gone, "z"), Err(DocumentError::UnknownObject(_))));
}

#[test]
fn remove_by_alias_and_predicate() {
	let mut doc = LevelDocument::from_objects([obj("Wave", &["w1"]), obj("Wave", &["w2"]), obj("Module", &["m"])]);

	assert_eq!(doc.remove_by_alias("m").map(|o| o.kind().to_owned()), Some("Module".to_owned()));
	assert!(doc.remove_by_alias("m").is_none());

	let waves = doc.remove_where(|o| o.kind() == "Wave");
	let aliases: Vec<&str> = waves.iter().map(LevelObject::first_alias).collect();
	assert_eq!(aliases, vec!["w1", "w2"]);
	assert!(doc.is_empty());
	assert!(doc.find_by_alias("w1").is_none());
}

#[test]
fn alias_mutators_update_index() {
	let mut doc = LevelDocument::new();
	let a = doc.insert(obj("A", &["old"]));

	assert!(doc.add_alias(a, "extra").unwrap());
	assert!(!doc.add_alias(a, "extra").unwrap());
	assert!(matches!(doc.add_alias(a, ""), Err(DocumentError::EmptyAlias)));
	assert_eq!(doc.find_id_by_alias("extra"), Some(a));

	doc.rename_alias(a, "old", "new").unwrap();
	assert!(doc.find_by_alias("old").is_none());
	assert_eq!(doc.find_id_by_alias("new"), Some(a));
	assert_eq!(doc.get(a).map(LevelObject::first_alias), Some("new"), "rename keeps alias position");

	assert!(matches!(doc.rename_alias(a, "old", "x"), Err(DocumentError::NotAnAlias { .. })));

	assert!(doc.remove_alias(a, "extra").unwrap());
	assert!(!doc.remove_alias(a, "extra").unwrap());
	assert!(doc.find_by_alias("extra").is_none());
}

#[test]
fn rename_onto_later_duplicate_respects_order() {
	let mut doc = LevelDocument::new();
	let first = doc.insert(obj("A", &["a"]));
	let second = doc.insert(obj("B", &["target"]));

	doc.rename_alias(first, "a", "target").unwrap();
	assert_eq!(doc.find_all_by_alias("target"), &[first, second]);
}

#[test]
fn unindexed_mutation_requires_reindex() {
	let mut doc = LevelDocument::from_objects([obj("A", &["a"]), obj("B", &["b"])]);
	for object in doc.objects_mut_unindexed() {
		let renamed = format!("{}_2", object.first_alias());
		let old = object.first_alias().to_owned();
		object.aliases_mut().replace(&old, renamed);
	}

	assert!(doc.find_by_alias("a_2").is_none(), "index is stale before reindex");
	doc.reindex();
	assert_eq!(doc.find_by_alias("a_2").map(LevelObject::kind), Some("A"));
	assert_eq!(doc.find_by_alias("b_2").map(LevelObject::kind), Some("B"));
	assert!(doc.find_by_alias("a").is_none());
}

#[test]
fn unindexed_iteration_follows_document_order() {
	let mut doc = LevelDocument::new();
	let a = doc.insert(obj("A", &[]));
	doc.insert(obj("B", &[]));
	doc.remove(a);
	doc.insert(obj("C", &[]));
	doc.insert_at(0, obj("D", &[]));

	let seen: Vec<String> = doc.objects_mut_unindexed().map(|o| o.kind().to_owned()).collect();
	assert_eq!(seen, vec!["D", "B", "C"]);
}

#[test]
fn reorder_requires_permutation() {
	let mut doc = LevelDocument::new();
	let a = doc.insert(obj("A", &["dup"]));
	let b = doc.insert(obj("B", &["dup"]));

	assert!(matches!(doc.reorder(vec![a]), Err(DocumentError::NotAPermutation)));
	assert!(matches!(doc.reorder(vec![a, a]), Err(DocumentError::NotAPermutation)));

	doc.reorder(vec![b, a]).unwrap();
	assert_eq!(kinds(&doc), vec!["B", "A"]);
	assert_eq!(doc.find_id_by_alias("dup"), Some(b), "index follows new order");
}

#[test]
fn payload_and_header_accessors() {
	let mut doc = LevelDocument::new();
	let id = doc.insert(obj("A", &["a"]));
	*doc.payload_mut(id).unwrap() = json!({ "Count": 3 });
	assert_eq!(doc.get(id).and_then(|o| o.field("Count")), Some(&json!(3)));

	doc.set_kind(id, "B").unwrap();
	assert_eq!(doc.get(id).map(LevelObject::kind), Some("B"));

	assert_eq!(doc.version(), 1);
	assert_eq!(doc.comment(), None);
	doc.set_comment(Some("hand edited".into()));
	doc.set_version(2);
	assert_eq!((doc.version(), doc.comment()), (2, Some("hand edited")));
}
