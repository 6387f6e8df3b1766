use std::fmt;

/// Which half of a reference an [`EncodeError`] refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Part {
	Alias,
	Namespace,
}

impl fmt::Display for Part {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Alias => write!(f, "alias"),
			Self::Namespace => write!(f, "namespace"),
		}
	}
}

/// Why a string is not a reference literal.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
	#[error("missing `RTID(` prefix")]
	MissingWrapper,
	#[error("missing closing `)`")]
	Unterminated,
	#[error("missing `@` between alias and namespace")]
	MissingSeparator,
	#[error("empty alias")]
	EmptyAlias,
	#[error("empty namespace")]
	EmptyNamespace,
	#[error("unexpected `{ch}` at byte {offset}")]
	StrayDelimiter { ch: char, offset: usize },
}

/// Why a reference cannot be built from the given parts.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EncodeError {
	#[error("{0} must not be empty")]
	Empty(Part),
	#[error("{part} must not contain `{ch}`")]
	Delimiter { part: Part, ch: char },
}
