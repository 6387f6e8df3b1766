//! Typed read/mutate/sync access to opaque payloads.

use std::ops::{Deref, DerefMut};

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::document::{LevelDocument, ObjectId};
use crate::error::DocumentError;

/// A detached, strongly typed copy of one object's payload.
///
/// Edits stay local until [`LevelDocument::sync`] writes the view back. View
/// types that must preserve fields they do not model should collect them with
/// `#[serde(flatten)] extra: serde_json::Map<String, Value>`.
#[derive(Debug, Clone)]
pub struct PayloadView<T> {
	id: ObjectId,
	kind: String,
	value: T,
}

impl<T> PayloadView<T> {
	pub fn id(&self) -> ObjectId {
		self.id
	}

	/// Kind of the object when the view was taken.
	pub fn kind(&self) -> &str {
		&self.kind
	}

	pub fn into_inner(self) -> T {
		self.value
	}
}

impl<T> Deref for PayloadView<T> {
	type Target = T;

	fn deref(&self) -> &T {
		&self.value
	}
}

impl<T> DerefMut for PayloadView<T> {
	fn deref_mut(&mut self) -> &mut T {
		&mut self.value
	}
}

impl LevelDocument {
	/// Typed view of the first object carrying `alias`.
	pub fn view<T: DeserializeOwned>(&self, alias: &str) -> Result<PayloadView<T>, DocumentError> {
		let id = self
			.find_id_by_alias(alias)
			.ok_or_else(|| DocumentError::AliasNotFound(alias.to_owned()))?;
		self.view_of(id)
	}

	/// Typed view of the object `id`.
	pub fn view_of<T: DeserializeOwned>(&self, id: ObjectId) -> Result<PayloadView<T>, DocumentError> {
		let object = self.get(id).ok_or(DocumentError::UnknownObject(id))?;
		let value = T::deserialize(object.payload()).map_err(|source| DocumentError::Payload {
			kind: object.kind().to_owned(),
			source,
		})?;
		Ok(PayloadView {
			id,
			kind: object.kind().to_owned(),
			value,
		})
	}

	/// Writes `view` back, replacing the whole payload.
	///
	/// Fails with [`DocumentError::StaleView`] if the object was removed or its
	/// kind changed since the view was taken; the document is left untouched.
	pub fn sync<T: Serialize>(&mut self, view: &PayloadView<T>) -> Result<(), DocumentError> {
		let stale = || DocumentError::StaleView {
			id: view.id,
			kind: view.kind.clone(),
		};
		match self.get(view.id) {
			Some(object) if object.kind() == view.kind => {}
			_ => return Err(stale()),
		}
		let payload = serde_json::to_value(&view.value).map_err(|source| DocumentError::Payload {
			kind: view.kind.clone(),
			source,
		})?;
		let slot = self.payload_mut(view.id).ok_or_else(stale)?;
		*slot = payload;
		tracing::trace!(id = %view.id, kind = %view.kind, "payload view synced");
		Ok(())
	}
}
