use std::path::Path;
use std::sync::Arc;

use crate::models::{Catalog, CatalogError};

/// Loads the session catalog: the file at `path` if configured, otherwise
/// the built-in demo catalog
pub fn load_catalog(path: Option<&Path>) -> Result<Arc<Catalog>, CatalogError> {
    let catalog = match path {
        Some(path) => {
            let catalog = Catalog::from_json_file(path)?;
            tracing::info!(path = %path.display(), items = catalog.len(), "Loaded catalog from file");
            catalog
        }
        None => {
            let catalog = Catalog::builtin();
            tracing::info!(items = catalog.len(), "Using built-in catalog");
            catalog
        }
    };

    Ok(Arc::new(catalog))
}
