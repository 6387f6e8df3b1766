use std::sync::OnceLock;

use crate::builder::Catalog;
use crate::error::CatalogError;

static GLOBAL: OnceLock<Catalog> = OnceLock::new();

/// Publishes `catalog` as the process-wide dataset.
///
/// Succeeds once; later calls return [`CatalogError::AlreadyInstalled`] and
/// leave the installed catalog untouched.
pub fn install(catalog: Catalog) -> Result<&'static Catalog, CatalogError> {
	let mut installed = false;
	let current = GLOBAL.get_or_init(|| {
		installed = true;
		catalog
	});
	if installed {
		tracing::debug!(entries = current.len(), "catalog installed");
		Ok(current)
	} else {
		Err(CatalogError::AlreadyInstalled)
	}
}

/// Returns the process-wide catalog, if one was installed.
pub fn global() -> Option<&'static Catalog> {
	GLOBAL.get()
}
