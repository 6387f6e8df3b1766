use std::path::PathBuf;

/// Catalog construction and loading errors.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
	#[error("failed to read catalog {path}: {source}")]
	Io {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("catalog data parse error: {0}")]
	Parse(#[from] toml::de::Error),

	#[error("invalid catalog entry in {namespace:?}: {reason}")]
	InvalidEntry { namespace: String, reason: String },

	#[error("duplicate id {id:?} in namespace {namespace:?}")]
	DuplicateId { namespace: String, id: String },

	#[error("key {key:?} in namespace {namespace:?} claimed by both {existing:?} and {incoming:?}")]
	KeyConflict {
		namespace: String,
		key: String,
		existing: String,
		incoming: String,
	},

	#[error("a process-wide catalog is already installed")]
	AlreadyInstalled,
}
