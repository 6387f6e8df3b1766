use crate::entry::CatalogEntry;

/// Read-only query surface over builtin definitions.
///
/// Implementors provide [`CatalogLookup::entry`]; the remaining queries are
/// derived from it and never fail.
pub trait CatalogLookup: Send + Sync {
	/// Returns the entry bound to `key` (id or alias) in `namespace`.
	fn entry(&self, namespace: &str, key: &str) -> Option<&CatalogEntry>;

	/// Returns true if `key` names a known entry in `namespace`.
	fn exists(&self, namespace: &str, key: &str) -> bool {
		self.entry(namespace, key).is_some()
	}

	/// Display name for `key`, or `key` itself when unknown.
	fn display_name<'a>(&'a self, namespace: &str, key: &'a str) -> &'a str {
		self.entry(namespace, key).map_or(key, CatalogEntry::display_name)
	}

	/// Returns true if `key` is an elite variant.
	fn is_elite(&self, namespace: &str, key: &str) -> bool {
		self.entry(namespace, key).is_some_and(|e| e.elite)
	}
}

/// A catalog with no entries.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyCatalog;

impl CatalogLookup for EmptyCatalog {
	fn entry(&self, _namespace: &str, _key: &str) -> Option<&CatalogEntry> {
		None
	}
}

impl<T: CatalogLookup + ?Sized> CatalogLookup for &T {
	fn entry(&self, namespace: &str, key: &str) -> Option<&CatalogEntry> {
		(**self).entry(namespace, key)
	}
}
