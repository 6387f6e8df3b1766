//! In-memory model of a level file.
//!
//! # Purpose
//!
//! A level is a flat list of typed objects. Objects point at each other, and
//! at builtin catalog entries, through RTID references instead of nesting.
//! This crate owns that list and answers the questions an editor asks about
//! it: which object does this reference reach, which references are broken,
//! and in what order should the objects be written back out.
//!
//! # Mental Model
//!
//! 1. **Store:** [`LevelDocument`] keeps objects in load/insertion order with
//!    an alias index. Payloads are opaque [`serde_json::Value`]s; screens edit
//!    them through typed [`PayloadView`]s and write back with
//!    [`LevelDocument::sync`].
//! 2. **Resolve:** [`Resolver`] maps an [`Rtid`] to a local object, a catalog
//!    entry, or nothing. Local override objects shadow catalog entries.
//! 3. **Validate:** [`validate`] scans every payload for references and
//!    reports duplicates, broken references, and malformed literals. Nothing
//!    is repaired automatically; [`LevelDocument::prune_reference`] is the
//!    explicit recovery action.
//! 4. **Save:** [`PriorityTable`] orders objects by kind rank, kind, then
//!    first alias, and [`LevelDocument::to_json_string`] writes the result.
//!
//! # Invariants
//!
//! - Alias lookup returns the first object in document order.
//!   - Enforced in: [`LevelDocument::find_by_alias`] (per-alias id lists kept in document order).
//!   - Failure symptom: a duplicate alias resolves to a later object.
//! - Removing an object never rewrites references to it.
//!   - Enforced in: [`LevelDocument::remove`].
//!   - Failure symptom: silent data loss in unrelated payloads.
//! - Save order depends on kind and first alias only.
//!   - Enforced in: [`PriorityTable::compare`] (stable sort, no hash order).
//!   - Failure symptom: diffs between saves of an unchanged level.

mod config;
mod document;
mod error;
mod object;
mod order;
mod persist;
mod refs;
mod resolve;
mod schema;
mod validate;
mod view;

pub use config::{KindConfig, LevelConfig, OrderingConfig};
pub use document::{LevelDocument, ObjectId};
pub use error::{ConfigError, DocumentError, PersistError};
pub use object::{Aliases, LevelObject};
pub use order::{PriorityTable, STANDARD_PRIORITY};
pub use refs::{FieldRef, scan_references};
pub use resolve::{
	EliteTierRule, FieldResolution, LocalHit, LocalVia, OverrideRule, Resolution, ResolveRules, Resolver,
};
pub use schema::{KindCategory, KindSchema, SchemaRegistry};
pub use validate::{Issue, Severity, ValidationReport, validate};
pub use verdant_catalog::{CatalogEntry, CatalogLookup};
pub use verdant_rtid::{self as rtid, Rtid};
pub use view::PayloadView;
