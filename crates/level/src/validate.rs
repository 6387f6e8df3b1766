//! Document-wide validation report.
//!
//! Nothing here repairs the document. Duplicates keep their first-wins
//! behaviour and broken references stay until the user prunes them.

use std::fmt;

use serde::Serialize;
use verdant_rtid::DecodeError;

use crate::document::ObjectId;
use crate::refs::scan_references;
use crate::resolve::Resolver;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
	Warning,
	Error,
}

impl fmt::Display for Severity {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			Self::Warning => "warning",
			Self::Error => "error",
		})
	}
}

/// One finding. Object handles are in-memory only; the serialized form
/// carries document positions instead.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "issue", rename_all = "snake_case")]
pub enum Issue {
	/// One object lists `alias` more than once; saving keeps a single copy.
	RepeatedAlias {
		#[serde(skip)]
		holder: ObjectId,
		position: usize,
		holder_alias: String,
		alias: String,
	},
	/// More than one object carries `alias`; the first one wins lookups.
	DuplicateAlias {
		alias: String,
		#[serde(skip)]
		objects: Vec<ObjectId>,
		positions: Vec<usize>,
	},
	/// A well-formed reference that reaches nothing.
	BrokenReference {
		#[serde(skip)]
		holder: ObjectId,
		position: usize,
		holder_alias: String,
		pointer: String,
		reference: String,
	},
	/// A string carrying the reference wrapper that does not decode.
	MalformedReference {
		#[serde(skip)]
		holder: ObjectId,
		position: usize,
		holder_alias: String,
		pointer: String,
		literal: String,
		#[serde(skip)]
		error: DecodeError,
	},
}

impl Issue {
	pub fn severity(&self) -> Severity {
		match self {
			Self::BrokenReference { .. } => Severity::Error,
			Self::RepeatedAlias { .. } | Self::DuplicateAlias { .. } | Self::MalformedReference { .. } => Severity::Warning,
		}
	}

	/// Object the issue is reported against.
	pub fn object(&self) -> Option<ObjectId> {
		match self {
			Self::DuplicateAlias { objects, .. } => objects.first().copied(),
			Self::RepeatedAlias { holder, .. } | Self::BrokenReference { holder, .. } | Self::MalformedReference { holder, .. } => {
				Some(*holder)
			}
		}
	}
}

impl fmt::Display for Issue {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::RepeatedAlias { holder_alias, alias, .. } => {
				write!(f, "{}: alias {alias:?} is listed more than once; one copy is kept", Holder(holder_alias))
			}
			Self::DuplicateAlias { alias, positions, .. } => {
				write!(f, "alias {alias:?} is carried by {} objects (positions {positions:?}); the first wins", positions.len())
			}
			Self::BrokenReference {
				holder_alias,
				pointer,
				reference,
				..
			} => write!(f, "{}{pointer}: {reference} does not resolve", Holder(holder_alias)),
			Self::MalformedReference {
				holder_alias,
				pointer,
				literal,
				error,
				..
			} => write!(f, "{}{pointer}: {literal:?} is not a valid reference ({error})", Holder(holder_alias)),
		}
	}
}

struct Holder<'a>(&'a str);

impl fmt::Display for Holder<'_> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		if self.0.is_empty() { f.write_str("<anonymous>") } else { f.write_str(self.0) }
	}
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ValidationReport {
	issues: Vec<Issue>,
}

impl ValidationReport {
	pub fn issues(&self) -> &[Issue] {
		&self.issues
	}

	pub fn iter(&self) -> std::slice::Iter<'_, Issue> {
		self.issues.iter()
	}

	pub fn len(&self) -> usize {
		self.issues.len()
	}

	pub fn is_empty(&self) -> bool {
		self.issues.is_empty()
	}

	pub fn is_clean(&self) -> bool {
		self.issues.is_empty()
	}

	pub fn has_errors(&self) -> bool {
		self.issues.iter().any(|i| i.severity() == Severity::Error)
	}

	pub fn errors(&self) -> impl Iterator<Item = &Issue> + '_ {
		self.issues.iter().filter(|i| i.severity() == Severity::Error)
	}

	pub fn warnings(&self) -> impl Iterator<Item = &Issue> + '_ {
		self.issues.iter().filter(|i| i.severity() == Severity::Warning)
	}
}

impl<'a> IntoIterator for &'a ValidationReport {
	type Item = &'a Issue;
	type IntoIter = std::slice::Iter<'a, Issue>;

	fn into_iter(self) -> Self::IntoIter {
		self.issues.iter()
	}
}

/// Checks every object of the resolver's document.
///
/// Issues follow document order. For each object, aliases it repeats come
/// first, then duplicate aliases it is the first carrier of, then its
/// references in pointer order.
pub fn validate(resolver: &Resolver<'_>) -> ValidationReport {
	let document = resolver.document();
	let mut issues = Vec::new();

	for (position, (id, object)) in document.iter_with_ids().enumerate() {
		for alias in object.repeated_aliases() {
			tracing::warn!(alias = alias.as_str(), position, "alias repeated within one object");
			issues.push(Issue::RepeatedAlias {
				holder: id,
				position,
				holder_alias: object.first_alias().to_owned(),
				alias: alias.clone(),
			});
		}

		for alias in object.aliases().iter() {
			let carriers = document.find_all_by_alias(alias);
			if carriers.len() < 2 || carriers.first() != Some(&id) {
				continue;
			}
			let positions: Vec<usize> = carriers.iter().filter_map(|&c| document.position(c)).collect();
			tracing::warn!(alias, count = carriers.len(), "duplicate alias");
			issues.push(Issue::DuplicateAlias {
				alias: alias.to_owned(),
				objects: carriers.to_vec(),
				positions,
			});
		}

		for field in scan_references(object.payload()) {
			let holder_alias = object.first_alias().to_owned();
			match field.decoded {
				Ok(rtid) => {
					if resolver.resolve(&rtid).is_resolved() {
						continue;
					}
					issues.push(Issue::BrokenReference {
						holder: id,
						position,
						holder_alias,
						pointer: field.pointer,
						reference: rtid.literal(),
					});
				}
				Err(error) => issues.push(Issue::MalformedReference {
					holder: id,
					position,
					holder_alias,
					pointer: field.pointer,
					literal: field.literal.to_owned(),
					error,
				}),
			}
		}
	}

	let report = ValidationReport { issues };
	tracing::debug!(issues = report.len(), errors = report.errors().count(), "validation finished");
	report
}
