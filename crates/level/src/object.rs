use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use smallvec::SmallVec;

/// Ordered set of alias strings. The first alias is the display name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct Aliases(SmallVec<[String; 1]>);

impl Aliases {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn first(&self) -> Option<&str> {
		self.0.first().map(String::as_str)
	}

	pub fn contains(&self, alias: &str) -> bool {
		self.0.iter().any(|a| a == alias)
	}

	pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
		self.0.iter().map(String::as_str)
	}

	pub fn len(&self) -> usize {
		self.0.len()
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Appends `alias` unless already present. Returns true if added.
	pub fn insert(&mut self, alias: impl Into<String>) -> bool {
		let alias = alias.into();
		if self.contains(&alias) {
			return false;
		}
		self.0.push(alias);
		true
	}

	/// Removes `alias`, keeping the order of the rest. Returns true if removed.
	pub fn remove(&mut self, alias: &str) -> bool {
		match self.0.iter().position(|a| a == alias) {
			Some(pos) => {
				self.0.remove(pos);
				true
			}
			None => false,
		}
	}

	/// Replaces `old` with `new` in place. If `new` is already present the
	/// old alias is simply dropped.
	pub fn replace(&mut self, old: &str, new: impl Into<String>) -> bool {
		let new = new.into();
		let Some(pos) = self.0.iter().position(|a| a == old) else {
			return false;
		};
		if self.contains(&new) {
			self.0.remove(pos);
		} else {
			self.0[pos] = new;
		}
		true
	}
}

impl From<Vec<String>> for Aliases {
	fn from(list: Vec<String>) -> Self {
		let mut aliases = Self::new();
		for alias in list {
			aliases.insert(alias);
		}
		aliases
	}
}

impl From<Aliases> for Vec<String> {
	fn from(aliases: Aliases) -> Self {
		aliases.0.into_vec()
	}
}

impl<S: Into<String>> FromIterator<S> for Aliases {
	fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
		let mut aliases = Self::new();
		for alias in iter {
			aliases.insert(alias);
		}
		aliases
	}
}

/// One addressable entity in a level.
///
/// `kind` is the schema tag (`objclass` on disk). The payload (`objdata`) is
/// opaque to the model; some of its string fields are RTID references.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "StoredObject")]
pub struct LevelObject {
	/// Fields other than `aliases`, `objclass` and `objdata`, kept verbatim.
	#[serde(flatten)]
	extra: Map<String, Value>,
	#[serde(default, skip_serializing_if = "Aliases::is_empty")]
	aliases: Aliases,
	#[serde(rename = "objclass")]
	kind: String,
	#[serde(rename = "objdata")]
	payload: Value,
	/// Aliases the loaded file listed more than once on this object.
	#[serde(skip)]
	repeated_aliases: Vec<String>,
}

/// On-disk shape of an object, before repeated aliases are collapsed.
#[derive(Deserialize)]
struct StoredObject {
	#[serde(flatten)]
	extra: Map<String, Value>,
	#[serde(default)]
	aliases: Vec<String>,
	#[serde(rename = "objclass")]
	kind: String,
	#[serde(rename = "objdata", default = "empty_payload")]
	payload: Value,
}

impl From<StoredObject> for LevelObject {
	fn from(stored: StoredObject) -> Self {
		let mut aliases = Aliases::new();
		let mut repeated_aliases = Vec::new();
		for alias in stored.aliases {
			if !aliases.contains(&alias) {
				aliases.insert(alias);
			} else if !repeated_aliases.contains(&alias) {
				repeated_aliases.push(alias);
			}
		}
		Self {
			extra: stored.extra,
			aliases,
			kind: stored.kind,
			payload: stored.payload,
			repeated_aliases,
		}
	}
}

pub(crate) fn empty_payload() -> Value {
	Value::Object(Map::new())
}

impl LevelObject {
	pub fn new(kind: impl Into<String>, payload: Value) -> Self {
		Self {
			extra: Map::new(),
			aliases: Aliases::new(),
			kind: kind.into(),
			payload,
			repeated_aliases: Vec::new(),
		}
	}

	/// Adds an alias while building an object that is not yet in a document.
	pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
		self.aliases.insert(alias);
		self
	}

	pub fn aliases(&self) -> &Aliases {
		&self.aliases
	}

	/// Direct alias access.
	///
	/// If the object already lives in a [`crate::LevelDocument`], the caller
	/// must call [`crate::LevelDocument::reindex`] after changing aliases
	/// this way.
	pub fn aliases_mut(&mut self) -> &mut Aliases {
		&mut self.aliases
	}

	/// Aliases the source file listed more than once here. Only one copy of
	/// each is kept, so saving rewrites the list.
	pub fn repeated_aliases(&self) -> &[String] {
		&self.repeated_aliases
	}

	/// First alias, or `""` for anonymous objects.
	pub fn first_alias(&self) -> &str {
		self.aliases.first().unwrap_or("")
	}

	pub fn has_alias(&self, alias: &str) -> bool {
		self.aliases.contains(alias)
	}

	pub fn kind(&self) -> &str {
		&self.kind
	}

	pub fn set_kind(&mut self, kind: impl Into<String>) {
		self.kind = kind.into();
	}

	pub fn payload(&self) -> &Value {
		&self.payload
	}

	pub fn payload_mut(&mut self) -> &mut Value {
		&mut self.payload
	}

	pub fn set_payload(&mut self, payload: Value) -> Value {
		std::mem::replace(&mut self.payload, payload)
	}

	/// Top-level payload field.
	pub fn field(&self, name: &str) -> Option<&Value> {
		self.payload.get(name)
	}

	/// Top-level payload field, if it is a string.
	pub fn field_str(&self, name: &str) -> Option<&str> {
		self.field(name).and_then(Value::as_str)
	}

	/// Uninterpreted object fields such as a per-object `#comment`.
	pub fn extra(&self) -> &Map<String, Value> {
		&self.extra
	}

	pub fn extra_mut(&mut self) -> &mut Map<String, Value> {
		&mut self.extra
	}

	/// Name to show in lists: the first alias, else the kind.
	pub fn display_name(&self) -> &str {
		self.aliases.first().unwrap_or(&self.kind)
	}
}
