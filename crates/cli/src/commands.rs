//! Subcommand implementations. Output goes to a caller-supplied writer.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result, bail};
use verdant_catalog::{Catalog, CatalogBuilder, CatalogLookup};
use verdant_level::{Issue, LevelConfig, LevelDocument, Resolution, Resolver, Rtid, validate};


pub fn load_catalog(path: Option<&Path>) -> Result<Catalog> {
	let Some(path) = path else {
		return Ok(Catalog::default());
	};
	let mut builder = CatalogBuilder::new();
	builder.merge_file(path)?;
	let catalog = builder.build()?;
	tracing::info!(path = %path.display(), entries = catalog.len(), collisions = catalog.collisions().len(), "catalog loaded");
	Ok(catalog)
}

pub fn load_config(path: Option<&Path>) -> Result<LevelConfig> {
	match path {
		Some(path) => Ok(LevelConfig::load(path)?),
		None => Ok(LevelConfig::default()),
	}
}

fn load_level(path: &Path) -> Result<LevelDocument> {
	let file = std::fs::File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
	let doc = LevelDocument::from_reader(std::io::BufReader::new(file)).with_context(|| format!("failed to load {}", path.display()))?;
	tracing::info!(path = %path.display(), objects = doc.len(), "level loaded");
	Ok(doc)
}

fn save_level(path: &Path, doc: &LevelDocument, config: &LevelConfig) -> Result<()> {
	let text = doc.to_json_string(&config.priority_table())?;
	std::fs::write(path, text).with_context(|| format!("failed to write {}", path.display()))?;
	tracing::info!(path = %path.display(), objects = doc.len(), "level saved");
	Ok(())
}

/// Prints the validation report. Returns true if any issue is an error.
pub fn check(level: &Path, json: bool, catalog: &dyn CatalogLookup, config: &LevelConfig, out: &mut dyn Write) -> Result<bool> {
	let doc = load_level(level)?;
	let resolver = Resolver::new(&doc, catalog, config.resolve_rules());
	let report = validate(&resolver);

	if json {
		serde_json::to_writer_pretty(&mut *out, &report)?;
		writeln!(out)?;
	} else {
		for issue in &report {
			writeln!(out, "{}: [{}] {issue}", issue.severity(), position_of(issue))?;
		}
		writeln!(out, "{} error(s), {} warning(s)", report.errors().count(), report.warnings().count())?;
	}
	Ok(report.has_errors())
}

fn position_of(issue: &Issue) -> String {
	match issue {
		Issue::DuplicateAlias { positions, .. } => positions.first().map_or_else(String::new, usize::to_string),
		Issue::RepeatedAlias { position, .. } | Issue::BrokenReference { position, .. } | Issue::MalformedReference { position, .. } => {
			position.to_string()
		}
	}
}

pub fn fmt(level: &Path, write: bool, config: &LevelConfig, out: &mut dyn Write) -> Result<()> {
	let doc = load_level(level)?;
	if write {
		return save_level(level, &doc, config);
	}
	out.write_all(doc.to_json_string(&config.priority_table())?.as_bytes())?;
	Ok(())
}

pub fn resolve(level: &Path, reference: &str, catalog: &dyn CatalogLookup, config: &LevelConfig, out: &mut dyn Write) -> Result<()> {
	let rtid = Rtid::parse(reference).with_context(|| format!("{reference:?} is not a reference"))?;
	let doc = load_level(level)?;
	let resolver = Resolver::new(&doc, catalog, config.resolve_rules());

	let resolution = resolver.resolve(&rtid);
	let detail = match &resolution {
		Resolution::Local(hit) => format!("{} at position {}", hit.object.kind(), doc.position(hit.id).unwrap_or_default()),
		Resolution::Catalog(entry) => format!("{}:{}", rtid.namespace(), entry.id),
		Resolution::Unresolved => String::from("-"),
	};
	writeln!(out, "{}\t{}\t{detail}", resolution.label(), resolver.display_name(&rtid))?;
	if resolver.is_elite(&rtid) {
		writeln!(out, "elite\t{}={}", config.elite.tier_field, config.elite.sentinel)?;
	}
	Ok(())
}

pub fn prune(level: &Path, holder: &str, pointer: &str, config: &LevelConfig, out: &mut dyn Write) -> Result<()> {
	let mut doc = load_level(level)?;
	let Some(id) = doc.find_id_by_alias(holder) else {
		bail!("no object has alias {holder:?}");
	};
	let removed = doc.prune_reference(id, pointer)?;
	save_level(level, &doc, config)?;
	writeln!(out, "removed {removed}")?;
	Ok(())
}
