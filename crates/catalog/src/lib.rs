//! Builtin definition catalogs.
//!
//! # Purpose
//!
//! A level refers to stock zombies, obstacles and modules by name rather than
//! defining them. This crate answers "is this name known in that namespace,
//! and how should it be displayed?" for the rest of the editor.
//!
//! # Mental Model
//!
//! 1. **Build:** [`CatalogBuilder`] ingests entries per namespace (in code or
//!    from TOML data files), binds canonical ids, then aliases, and records
//!    every conflict as a [`Collision`].
//! 2. **Publish:** [`install`] stores the finished [`Catalog`] for the whole
//!    process. It is never mutated afterwards.
//! 3. **Query:** consumers see the dataset only through [`CatalogLookup`],
//!    so tests and embedders can substitute their own source.
//!
//! # Precedence Contract
//!
//! - Canonical ids cannot be displaced by an alias of another entry.
//! - Duplicate ids and alias-vs-alias conflicts follow the builder's
//!   [`DuplicatePolicy`].
//! - Lookups never fail: unknown names report absence, and
//!   [`CatalogLookup::display_name`] falls back to the raw key.

mod builder;
mod collision;
mod entry;
mod error;
mod global;
mod load;
mod lookup;


pub use builder::{Catalog, CatalogBuilder, Section};
pub use collision::{Collision, CollisionKind, DuplicatePolicy, KeyKind, Party, Resolution};
pub use entry::CatalogEntry;
pub use error::CatalogError;
pub use global::{global, install};
pub use lookup::{CatalogLookup, EmptyCatalog};
