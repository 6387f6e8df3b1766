//! The object store.
//!
//! # Role
//!
//! [`LevelDocument`] owns every object of one level. Objects live in a slab so
//! their [`ObjectId`]s stay valid across removals of other objects; a separate
//! order vector records document order, and an alias index answers
//! [`LevelDocument::find_by_alias`] in O(1).
//!
//! # Invariants
//!
//! - Each alias maps to the ids carrying it, sorted by document order.
//! - The index reflects every change made through the store's own mutators.
//!   Alias edits made through [`LevelDocument::objects_mut_unindexed`] are not
//!   detected; call [`LevelDocument::reindex`] afterwards.

use std::fmt;

use rustc_hash::FxHashMap as HashMap;
use serde_json::{Map, Value};
use slab::Slab;
use smallvec::SmallVec;

use crate::error::DocumentError;
use crate::object::LevelObject;

#[cfg(test)]
mod tests;

/// Handle to one object in one document.
///
/// Ids are never reused within a document, so a handle to a removed object
/// stays invalid even if its storage slot is recycled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId {
	slot: u32,
	serial: u32,
}

impl fmt::Display for ObjectId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "obj#{}", self.serial)
	}
}

#[derive(Debug, Clone)]
struct Slot {
	serial: u32,
	object: LevelObject,
}

type IdList = SmallVec<[ObjectId; 1]>;

pub(crate) const DEFAULT_VERSION: u32 = 1;

/// A level: objects in document order plus the file header.
#[derive(Debug, Clone)]
pub struct LevelDocument {
	slots: Slab<Slot>,
	order: Vec<ObjectId>,
	index: HashMap<Box<str>, IdList>,
	next_serial: u32,
	version: u32,
	comment: Option<String>,
	/// Top-level file fields the model does not interpret.
	header_extra: Map<String, Value>,
}

impl Default for LevelDocument {
	fn default() -> Self {
		Self::new()
	}
}

impl LevelDocument {
	pub fn new() -> Self {
		Self {
			slots: Slab::new(),
			order: Vec::new(),
			index: HashMap::default(),
			next_serial: 0,
			version: DEFAULT_VERSION,
			comment: None,
			header_extra: Map::new(),
		}
	}

	/// Builds a document holding `objects` in the given order.
	pub fn from_objects<I: IntoIterator<Item = LevelObject>>(objects: I) -> Self {
		let mut doc = Self::new();
		for object in objects {
			doc.insert(object);
		}
		doc
	}

	pub fn version(&self) -> u32 {
		self.version
	}

	pub fn set_version(&mut self, version: u32) {
		self.version = version;
	}

	pub fn comment(&self) -> Option<&str> {
		self.comment.as_deref()
	}

	pub fn set_comment(&mut self, comment: Option<String>) {
		self.comment = comment;
	}

	/// Top-level file fields other than `#comment`, `objects` and `version`.
	/// They are written back unchanged on save.
	pub fn header_extra(&self) -> &Map<String, Value> {
		&self.header_extra
	}

	pub fn header_extra_mut(&mut self) -> &mut Map<String, Value> {
		&mut self.header_extra
	}

	pub fn len(&self) -> usize {
		self.order.len()
	}

	pub fn is_empty(&self) -> bool {
		self.order.is_empty()
	}

	/// Appends `object` and returns its id.
	pub fn insert(&mut self, object: LevelObject) -> ObjectId {
		let id = self.alloc(object);
		self.order.push(id);
		// Appended last, so pushing keeps every alias list in document order.
		if let Some(object) = self.get(id) {
			let aliases: Vec<Box<str>> = object.aliases().iter().filter(|a| !a.is_empty()).map(Box::from).collect();
			for alias in aliases {
				self.index.entry(alias).or_default().push(id);
			}
		}
		id
	}

	/// Inserts `object` at `position` (clamped to the end) and returns its id.
	pub fn insert_at(&mut self, position: usize, object: LevelObject) -> ObjectId {
		if position >= self.order.len() {
			return self.insert(object);
		}
		let id = self.alloc(object);
		self.order.insert(position, id);
		let aliases: Vec<String> = self.get(id).map(alias_list).unwrap_or_default();
		for alias in aliases {
			self.bind(&alias, id);
		}
		id
	}

	fn alloc(&mut self, object: LevelObject) -> ObjectId {
		let serial = self.next_serial;
		self.next_serial = self.next_serial.wrapping_add(1);
		let slot = self.slots.insert(Slot { serial, object });
		ObjectId { slot: slot as u32, serial }
	}

	pub fn contains(&self, id: ObjectId) -> bool {
		self.get(id).is_some()
	}

	pub fn get(&self, id: ObjectId) -> Option<&LevelObject> {
		self.slots
			.get(id.slot as usize)
			.filter(|s| s.serial == id.serial)
			.map(|s| &s.object)
	}

	fn get_mut(&mut self, id: ObjectId) -> Option<&mut LevelObject> {
		self.slots
			.get_mut(id.slot as usize)
			.filter(|s| s.serial == id.serial)
			.map(|s| &mut s.object)
	}

	/// Mutable access to an object's payload. Aliases stay index-managed.
	pub fn payload_mut(&mut self, id: ObjectId) -> Option<&mut serde_json::Value> {
		self.get_mut(id).map(LevelObject::payload_mut)
	}

	/// Changes an object's kind.
	pub fn set_kind(&mut self, id: ObjectId, kind: impl Into<String>) -> Result<(), DocumentError> {
		self.get_mut(id).ok_or(DocumentError::UnknownObject(id))?.set_kind(kind);
		Ok(())
	}

	/// First object, in document order, carrying `alias`.
	#[inline]
	pub fn find_by_alias(&self, alias: &str) -> Option<&LevelObject> {
		self.find_id_by_alias(alias).and_then(|id| self.get(id))
	}

	#[inline]
	pub fn find_id_by_alias(&self, alias: &str) -> Option<ObjectId> {
		self.index.get(alias)?.first().copied()
	}

	/// Every object carrying `alias`, in document order.
	pub fn find_all_by_alias(&self, alias: &str) -> &[ObjectId] {
		self.index.get(alias).map(|ids| ids.as_slice()).unwrap_or(&[])
	}

	/// Position of `id` in document order.
	pub fn position(&self, id: ObjectId) -> Option<usize> {
		self.order.iter().position(|&x| x == id)
	}

	/// Ids in document order.
	pub fn ids(&self) -> &[ObjectId] {
		&self.order
	}

	/// Objects in document order.
	pub fn iter(&self) -> impl Iterator<Item = &LevelObject> + '_ {
		self.order.iter().filter_map(|&id| self.get(id))
	}

	/// `(id, object)` pairs in document order.
	pub fn iter_with_ids(&self) -> impl Iterator<Item = (ObjectId, &LevelObject)> + '_ {
		self.order.iter().filter_map(|&id| self.get(id).map(|o| (id, o)))
	}

	/// Bulk mutable access in document order, bypassing the alias index.
	///
	/// Call [`Self::reindex`] afterwards if any alias was changed.
	pub fn objects_mut_unindexed(&mut self) -> impl Iterator<Item = &mut LevelObject> + '_ {
		let mut by_slot: Vec<Option<&mut LevelObject>> = Vec::new();
		by_slot.resize_with(self.slots.capacity(), || None);
		for (slot, entry) in self.slots.iter_mut() {
			if let Some(cell) = by_slot.get_mut(slot) {
				*cell = Some(&mut entry.object);
			}
		}
		let order: Vec<usize> = self.order.iter().map(|id| id.slot as usize).collect();
		let mut out = Vec::with_capacity(order.len());
		for slot in order {
			if let Some(object) = by_slot.get_mut(slot).and_then(Option::take) {
				out.push(object);
			}
		}
		out.into_iter()
	}

	/// Rebuilds the alias index from scratch.
	pub fn reindex(&mut self) {
		let mut index: HashMap<Box<str>, IdList> = HashMap::default();
		for (id, object) in self.iter_with_ids() {
			for alias in object.aliases().iter().filter(|a| !a.is_empty()) {
				let ids = index.entry(Box::from(alias)).or_default();
				if !ids.contains(&id) {
					ids.push(id);
				}
			}
		}
		tracing::trace!(objects = self.order.len(), aliases = index.len(), "alias index rebuilt");
		self.index = index;
	}

	/// Removes an object. References to it elsewhere are left dangling.
	pub fn remove(&mut self, id: ObjectId) -> Option<LevelObject> {
		if !self.contains(id) {
			return None;
		}
		let pos = self.position(id)?;
		self.order.remove(pos);
		let slot = self.slots.remove(id.slot as usize);
		for alias in slot.object.aliases().iter() {
			self.unbind(alias, id);
		}
		Some(slot.object)
	}

	/// Removes the first object carrying `alias`.
	pub fn remove_by_alias(&mut self, alias: &str) -> Option<LevelObject> {
		let id = self.find_id_by_alias(alias)?;
		self.remove(id)
	}

	/// Removes every object matching `pred`, returned in document order.
	pub fn remove_where<F: FnMut(&LevelObject) -> bool>(&mut self, mut pred: F) -> Vec<LevelObject> {
		let doomed: Vec<ObjectId> = self.iter_with_ids().filter(|(_, o)| pred(o)).map(|(id, _)| id).collect();
		doomed.into_iter().filter_map(|id| self.remove(id)).collect()
	}

	/// Adds `alias` to an object. Returns false if it already had it.
	pub fn add_alias(&mut self, id: ObjectId, alias: &str) -> Result<bool, DocumentError> {
		if alias.is_empty() {
			return Err(DocumentError::EmptyAlias);
		}
		let object = self.get_mut(id).ok_or(DocumentError::UnknownObject(id))?;
		if !object.aliases_mut().insert(alias) {
			return Ok(false);
		}
		self.bind(alias, id);
		Ok(true)
	}

	/// Removes `alias` from an object. Returns false if it did not have it.
	pub fn remove_alias(&mut self, id: ObjectId, alias: &str) -> Result<bool, DocumentError> {
		let object = self.get_mut(id).ok_or(DocumentError::UnknownObject(id))?;
		if !object.aliases_mut().remove(alias) {
			return Ok(false);
		}
		self.unbind(alias, id);
		Ok(true)
	}

	/// Renames one alias of an object, keeping its position in the alias list.
	///
	/// References using the old alias are not rewritten.
	pub fn rename_alias(&mut self, id: ObjectId, old: &str, new: &str) -> Result<(), DocumentError> {
		if new.is_empty() {
			return Err(DocumentError::EmptyAlias);
		}
		let object = self.get_mut(id).ok_or(DocumentError::UnknownObject(id))?;
		if !object.aliases_mut().replace(old, new) {
			return Err(DocumentError::NotAnAlias {
				id,
				alias: old.to_owned(),
			});
		}
		if old != new {
			self.unbind(old, id);
			self.bind(new, id);
		}
		Ok(())
	}

	/// Replaces document order with `order`, which must be a permutation of
	/// the current ids.
	pub fn reorder(&mut self, order: Vec<ObjectId>) -> Result<(), DocumentError> {
		if order.len() != self.order.len() {
			return Err(DocumentError::NotAPermutation);
		}
		let mut sorted_new = order.clone();
		sorted_new.sort_unstable();
		let mut sorted_old = self.order.clone();
		sorted_old.sort_unstable();
		if sorted_new != sorted_old {
			return Err(DocumentError::NotAPermutation);
		}
		self.order = order;
		self.reindex();
		Ok(())
	}

	/// Inserts `id` into the list for `alias` at its document-order position.
	fn bind(&mut self, alias: &str, id: ObjectId) {
		if alias.is_empty() {
			return;
		}
		let Some(pos) = self.position(id) else {
			return;
		};
		let order = &self.order;
		let ids = self.index.entry(Box::from(alias)).or_default();
		if ids.contains(&id) {
			return;
		}
		let at = ids
			.iter()
			.position(|other| order.iter().position(|x| x == other).is_some_and(|p| p > pos))
			.unwrap_or(ids.len());
		ids.insert(at, id);
	}

	fn unbind(&mut self, alias: &str, id: ObjectId) {
		if let Some(ids) = self.index.get_mut(alias) {
			ids.retain(|x| *x != id);
			if ids.is_empty() {
				self.index.remove(alias);
			}
		}
	}
}

fn alias_list(object: &LevelObject) -> Vec<String> {
	object.aliases().iter().filter(|a| !a.is_empty()).map(str::to_owned).collect()
}
