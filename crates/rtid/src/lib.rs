//! Symbolic references between level objects.
//!
//! Level files never embed one object inside another. A field that points
//! somewhere else holds an RTID literal naming the target by alias and by the
//! namespace the alias is drawn from:
//!
//! ```text
//! RTID(DefaultSunDropper@LevelModules)
//!      ^^^^^^^^^^^^^^^^^ ^^^^^^^^^^^^
//!      alias             namespace
//! ```
//!
//! Namespaces are open strings. The constants in [`namespace`] cover the
//! common ones, but the codec itself never enumerates them, so a new builtin
//! catalog needs no change here.
//!
//! Decoding is total: any input yields either an [`Rtid`] or a
//! [`DecodeError`] value. Callers treat an undecodable string as an inert
//! literal.

mod error;
pub mod namespace;

#[cfg(feature = "serde")]
mod serde_impl;


use std::fmt;
use std::str::FromStr;

pub use error::{DecodeError, EncodeError, Part};

/// Fixed tag that wraps every reference literal.
pub const WRAPPER: &str = "RTID";

const OPEN: &str = "RTID(";
const SEPARATOR: char = '@';
const CLOSE: char = ')';

/// A decoded reference: target alias plus source namespace.
///
/// The literal form is not stored; [`fmt::Display`] rebuilds it and the
/// codec guarantees `Rtid::parse(&r.to_string()) == Ok(r)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Rtid {
	alias: String,
	namespace: String,
}

impl Rtid {
	/// Builds a reference, rejecting parts that would not survive a round trip.
	pub fn new(alias: impl Into<String>, namespace: impl Into<String>) -> Result<Self, EncodeError> {
		let alias = alias.into();
		let namespace = namespace.into();
		check_part(Part::Alias, &alias)?;
		check_part(Part::Namespace, &namespace)?;
		Ok(Self { alias, namespace })
	}

	/// Builds a reference into the current document.
	pub fn local(alias: impl Into<String>) -> Result<Self, EncodeError> {
		Self::new(alias, namespace::DEFAULT)
	}

	/// Decodes a literal of the form `RTID(<alias>@<namespace>)`.
	pub fn parse(text: &str) -> Result<Self, DecodeError> {
		let body = text.strip_prefix(OPEN).ok_or(DecodeError::MissingWrapper)?;
		let body = body.strip_suffix(CLOSE).ok_or(DecodeError::Unterminated)?;
		let (alias, namespace) = body.split_once(SEPARATOR).ok_or(DecodeError::MissingSeparator)?;

		if alias.is_empty() {
			return Err(DecodeError::EmptyAlias);
		}
		if namespace.is_empty() {
			return Err(DecodeError::EmptyNamespace);
		}
		if let Some(offset) = alias.find(CLOSE) {
			return Err(DecodeError::StrayDelimiter { ch: CLOSE, offset: OPEN.len() + offset });
		}
		if let Some(offset) = namespace.find([SEPARATOR, CLOSE]) {
			let ch = namespace[offset..].chars().next().unwrap_or(CLOSE);
			return Err(DecodeError::StrayDelimiter {
				ch,
				offset: OPEN.len() + alias.len() + 1 + offset,
			});
		}

		Ok(Self {
			alias: alias.to_owned(),
			namespace: namespace.to_owned(),
		})
	}

	/// Target alias.
	pub fn alias(&self) -> &str {
		&self.alias
	}

	/// Source namespace.
	pub fn namespace(&self) -> &str {
		&self.namespace
	}

	/// Returns true when the reference draws from `namespace`.
	pub fn is_in(&self, namespace: &str) -> bool {
		self.namespace == namespace
	}

	/// Literal form, identical to the text this reference was decoded from.
	pub fn literal(&self) -> String {
		self.to_string()
	}

	/// Returns a copy pointing at `alias` in the same namespace.
	pub fn with_alias(&self, alias: impl Into<String>) -> Result<Self, EncodeError> {
		Self::new(alias, self.namespace.clone())
	}

	pub fn into_parts(self) -> (String, String) {
		(self.alias, self.namespace)
	}
}

impl fmt::Display for Rtid {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{OPEN}{}{SEPARATOR}{}{CLOSE}", self.alias, self.namespace)
	}
}

impl FromStr for Rtid {
	type Err = DecodeError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::parse(s)
	}
}

impl TryFrom<&str> for Rtid {
	type Error = DecodeError;

	fn try_from(value: &str) -> Result<Self, Self::Error> {
		Self::parse(value)
	}
}

/// Decodes a reference literal. See [`Rtid::parse`].
pub fn decode(text: &str) -> Result<Rtid, DecodeError> {
	Rtid::parse(text)
}

/// Encodes `alias` and `namespace` into a reference literal.
pub fn encode(alias: &str, namespace: &str) -> Result<String, EncodeError> {
	check_part(Part::Alias, alias)?;
	check_part(Part::Namespace, namespace)?;
	Ok(format!("{OPEN}{alias}{SEPARATOR}{namespace}{CLOSE}"))
}

/// Encodes a reference into the current document.
pub fn encode_local(alias: &str) -> Result<String, EncodeError> {
	encode(alias, namespace::DEFAULT)
}

/// Returns true when `text` carries the reference wrapper, whether or not
/// the rest of it decodes.
///
/// Scanners use this to tell a malformed reference from an ordinary string.
pub fn looks_like_reference(text: &str) -> bool {
	text.starts_with(OPEN)
}

fn check_part(part: Part, value: &str) -> Result<(), EncodeError> {
	if value.is_empty() {
		return Err(EncodeError::Empty(part));
	}
	match value.find([SEPARATOR, CLOSE]) {
		Some(offset) => Err(EncodeError::Delimiter {
			part,
			ch: value[offset..].chars().next().unwrap_or(SEPARATOR),
		}),
		None => Ok(()),
	}
}
