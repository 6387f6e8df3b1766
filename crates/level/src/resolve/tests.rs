use pretty_assertions::assert_eq;
use serde_json::json;
use verdant_catalog::{Catalog, CatalogEntry, EmptyCatalog};

use super::*;

fn catalog() -> Catalog {
	let mut builder = Catalog::builder();
	builder.extend(
		namespace::ZOMBIE_TYPES,
		[
			CatalogEntry::new("tutorial").named("Basic Zombie"),
			CatalogEntry::new("gargantuar").named("Gargantuar").elite(true),
		],
	);
	builder.push(namespace::LEVEL_MODULES, CatalogEntry::new("DefaultSunDropper").named("Sun Dropper"));
	builder.build().expect("test catalog builds")
}

fn rtid(text: &str) -> Rtid {
	Rtid::parse(text).expect("test literal is well-formed")
}

fn zombie_type(alias: &str, type_name: &str) -> LevelObject {
	LevelObject::new("ZombieType", json!({ "TypeName": type_name })).with_alias(alias)
}

#[test]
fn current_level_references_hit_aliases() {
	let catalog = catalog();
	let mut doc = LevelDocument::new();
	let wave = doc.insert(LevelObject::new("SpawnZombiesJitteredWaveActionProps", json!({})).with_alias("Wave1"));
	let resolver = Resolver::new(&doc, &catalog, ResolveRules::default());

	let hit = resolver.resolve(&rtid("RTID(Wave1@CurrentLevel)"));
	assert_eq!(hit.local().map(|h| (h.id, h.via)), Some((wave, LocalVia::Alias)));
	assert_eq!(hit.label(), "local");
	assert!(!resolver.resolve(&rtid("RTID(Wave2@CurrentLevel)")).is_resolved());
}

#[test]
fn current_level_never_consults_catalog() {
	let catalog = catalog();
	let doc = LevelDocument::new();
	let rules = ResolveRules {
		current_namespace: namespace::LEVEL_MODULES.to_owned(),
		..ResolveRules::default()
	};
	let resolver = Resolver::new(&doc, &catalog, rules);
	assert!(!resolver.resolve(&rtid("RTID(DefaultSunDropper@LevelModules)")).is_resolved());
}

#[test]
fn builtin_references_hit_catalog() {
	let catalog = catalog();
	let doc = LevelDocument::new();
	let resolver = Resolver::new(&doc, &catalog, ResolveRules::default());

	let reference = rtid("RTID(DefaultSunDropper@LevelModules)");
	assert_eq!(resolver.resolve(&reference).catalog().map(|e| e.id.as_str()), Some("DefaultSunDropper"));
	assert_eq!(resolver.display_name(&reference), "Sun Dropper");

	let missing = rtid("RTID(imp_dragon@ZombieTypes)");
	assert_eq!(resolver.resolve(&missing).label(), "unresolved");
	assert_eq!(resolver.display_name(&missing), "imp_dragon");
}

#[test]
fn local_override_shadows_catalog() {
	let catalog = catalog();
	let mut doc = LevelDocument::new();
	let custom = doc.insert(zombie_type("tutorial_armored", "tutorial"));
	doc.insert(zombie_type("tutorial_second", "tutorial"));
	let resolver = Resolver::new(&doc, &catalog, ResolveRules::default());

	let reference = rtid("RTID(tutorial@ZombieTypes)");
	let hit = resolver.resolve(&reference);
	assert_eq!(hit.local().map(|h| (h.id, h.via)), Some((custom, LocalVia::Override)));
	assert_eq!(resolver.display_name(&reference), "tutorial_armored");
	assert_eq!(resolver.override_for(namespace::ZOMBIE_TYPES, "tutorial"), Some(custom));
	assert_eq!(resolver.override_for(namespace::GRID_ITEM_TYPES, "tutorial"), None);
}

#[test]
fn override_matches_catalog_aliases_of_the_same_entry() {
	let mut builder = Catalog::builder();
	builder.push(namespace::ZOMBIE_TYPES, CatalogEntry::new("gargantuar").alias("garg").elite(true));
	let catalog = builder.build().expect("test catalog builds");

	let mut doc = LevelDocument::new();
	let by_id = doc.insert(zombie_type("garg_custom", "gargantuar"));
	let resolver = Resolver::new(&doc, &catalog, ResolveRules::default());
	for text in ["RTID(gargantuar@ZombieTypes)", "RTID(garg@ZombieTypes)"] {
		let hit = resolver.resolve(&rtid(text));
		assert_eq!(hit.local().map(|h| (h.id, h.via)), Some((by_id, LocalVia::Override)), "{text}");
	}

	let doc = LevelDocument::from_objects([zombie_type("first", "garg"), zombie_type("second", "gargantuar")]);
	let resolver = Resolver::new(&doc, &catalog, ResolveRules::default());
	let first = doc.find_id_by_alias("first");
	assert_eq!(resolver.override_for(namespace::ZOMBIE_TYPES, "gargantuar"), first);
	assert_eq!(resolver.override_for(namespace::ZOMBIE_TYPES, "garg"), first);
}

#[test]
fn override_kind_must_match_rule() {
	let catalog = catalog();
	let mut doc = LevelDocument::new();
	doc.insert(LevelObject::new("GridItemType", json!({ "TypeName": "tutorial" })).with_alias("g"));
	let resolver = Resolver::new(&doc, &catalog, ResolveRules::default());

	assert!(resolver.resolve(&rtid("RTID(tutorial@ZombieTypes)")).catalog().is_some());
}

#[test]
fn override_without_catalog_entry_still_resolves() {
	let doc = LevelDocument::from_objects([zombie_type("mine", "custom_zombie")]);
	let resolver = Resolver::new(&doc, &EmptyCatalog, ResolveRules::default());
	assert_eq!(resolver.resolve(&rtid("RTID(custom_zombie@ZombieTypes)")).label(), "override");
}

#[test]
fn unresolved_is_stable_under_unrelated_inserts() {
	let catalog = catalog();
	let reference = rtid("RTID(Ghost@CurrentLevel)");
	let mut doc = LevelDocument::new();
	for n in 0..8 {
		doc.insert(LevelObject::new("Filler", json!({})).with_alias(format!("filler{n}")));
		let resolver = Resolver::new(&doc, &catalog, ResolveRules::default());
		assert!(!resolver.resolve(&reference).is_resolved());
	}
}

#[test]
fn resolve_literal_keeps_bad_text_inert() {
	let doc = LevelDocument::new();
	let resolver = Resolver::new(&doc, &EmptyCatalog, ResolveRules::default());

	assert!(matches!(resolver.resolve_literal("RTID(broken"), FieldResolution::Literal(DecodeError::Unterminated)));
	match resolver.resolve_literal("RTID(x@CurrentLevel)") {
		FieldResolution::Reference { rtid, resolution } => {
			assert_eq!(rtid.alias(), "x");
			assert!(!resolution.is_resolved());
		}
		other => panic!("expected a reference, got {other:?}"),
	}
}

#[test]
fn elite_comes_from_catalog_and_shadowed_entries() {
	let catalog = catalog();
	let doc = LevelDocument::from_objects([zombie_type("big_custom", "gargantuar")]);
	let resolver = Resolver::new(&doc, &catalog, ResolveRules::default());

	assert!(resolver.is_elite(&rtid("RTID(gargantuar@ZombieTypes)")), "override of an elite entry");
	assert!(!resolver.is_elite(&rtid("RTID(tutorial@ZombieTypes)")));
	assert!(resolver.is_elite(&rtid("RTID(big_custom@CurrentLevel)")), "local object declaring an elite identity");
	assert!(!resolver.is_elite(&rtid("RTID(nobody@ZombieTypes)")));
}

#[test]
fn elite_rule_pins_existing_tier_field() {
	let catalog = catalog();
	let doc = LevelDocument::new();
	let resolver = Resolver::new(&doc, &catalog, ResolveRules::default());
	let rule = EliteTierRule::default();

	let elite = rtid("RTID(gargantuar@ZombieTypes)");
	let mut payload = json!({ "Type": "RTID(gargantuar@ZombieTypes)", "Level": 3 });
	assert_eq!(rule.forced_tier(&resolver, &elite), Some(0));
	assert!(rule.normalize(&resolver, &elite, &mut payload));
	assert_eq!(payload["Level"], json!(0));
	assert!(!rule.normalize(&resolver, &elite, &mut payload), "already pinned");

	let mut untiered = json!({ "Type": "RTID(gargantuar@ZombieTypes)" });
	assert!(!rule.normalize(&resolver, &elite, &mut untiered));
	assert!(untiered.get("Level").is_none());

	let plain = rtid("RTID(tutorial@ZombieTypes)");
	let mut payload = json!({ "Level": 3 });
	assert_eq!(rule.forced_tier(&resolver, &plain), None);
	assert!(!rule.normalize(&resolver, &plain, &mut payload));
	assert_eq!(payload["Level"], json!(3));
}
