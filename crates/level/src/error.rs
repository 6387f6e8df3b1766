use std::path::PathBuf;

use crate::document::ObjectId;

/// Errors from document mutation, typed views, and reference pruning.
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
	#[error("no object has alias {0:?}")]
	AliasNotFound(String),

	#[error("object {0} is not in this document")]
	UnknownObject(ObjectId),

	#[error("object {id} has no alias {alias:?}")]
	NotAnAlias { id: ObjectId, alias: String },

	#[error("aliases must be non-empty")]
	EmptyAlias,

	#[error("view of {id} ({kind}) is stale: object was removed or changed kind")]
	StaleView { id: ObjectId, kind: String },

	#[error("payload of {kind} does not fit the requested view: {source}")]
	Payload {
		kind: String,
		#[source]
		source: serde_json::Error,
	},

	#[error("unknown object kind {0:?}")]
	UnknownKind(String),

	#[error("no field at {pointer:?} in {id}")]
	NoSuchField { id: ObjectId, pointer: String },

	#[error("invalid JSON pointer {0:?}")]
	InvalidPointer(String),

	#[error("new order is not a permutation of the document's objects")]
	NotAPermutation,
}

/// Level file load/save errors.
#[derive(Debug, thiserror::Error)]
pub enum PersistError {
	#[error("level JSON error: {0}")]
	Json(#[from] serde_json::Error),

	#[error("level I/O error: {0}")]
	Io(#[from] std::io::Error),
}

/// Configuration load errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
	#[error("failed to read config {path}: {source}")]
	Io {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("config parse error: {0}")]
	Parse(#[from] toml::de::Error),

	#[error("invalid config: {0}")]
	Invalid(String),
}
