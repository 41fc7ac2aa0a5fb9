//! Catalog loading.
//!
//! The store ships with a built-in catalog; `PULSEPACK_CATALOG_PATH` points at
//! a replacement JSON file in the same format.

use std::path::{Path, PathBuf};

use thiserror::Error;

use pulsepack_core::{Catalog, CatalogError};

/// Catalog compiled into the binary.
const BUILTIN_CATALOG: &str = include_str!("../content/catalog.json");

/// Errors that can occur when loading the catalog.
#[derive(Debug, Error)]
pub enum CatalogLoadError {
    #[error("failed to read catalog {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid catalog {origin}: {source}")]
    Invalid {
        origin: String,
        source: CatalogError,
    },
}

/// Load the catalog from `path`, or the built-in one when `path` is `None`.
///
/// # Errors
///
/// Returns `CatalogLoadError::Read` if the file cannot be read and
/// `CatalogLoadError::Invalid` if it fails validation.
pub fn load_catalog(path: Option<&Path>) -> Result<Catalog, CatalogLoadError> {
    let Some(path) = path else {
        return builtin_catalog();
    };

    let json = std::fs::read_to_string(path).map_err(|source| CatalogLoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let catalog = Catalog::from_json(&json).map_err(|source| CatalogLoadError::Invalid {
        origin: path.display().to_string(),
        source,
    })?;

    tracing::info!(path = %path.display(), products = catalog.len(), "catalog loaded");
    Ok(catalog)
}

/// The catalog compiled into the binary.
///
/// # Errors
///
/// Returns `CatalogLoadError::Invalid` if the bundled file is broken.
pub fn builtin_catalog() -> Result<Catalog, CatalogLoadError> {
    Catalog::from_json(BUILTIN_CATALOG).map_err(|source| CatalogLoadError::Invalid {
        origin: "(built-in)".to_string(),
        source,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::io::Write;

    use pulsepack_core::ProductId;

    use super::*;

    #[test]
    fn test_builtin_catalog_is_valid() {
        let catalog = builtin_catalog().unwrap();
        assert!(catalog.len() >= 3);
        assert!(!catalog.featured().is_empty());
        assert!(catalog.get(ProductId::new(1)).is_some());
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join(format!("pp-catalog-{}.json", std::process::id()));
        let mut file = std::fs::File::create(&path).unwrap();
        write!(
            file,
            r#"{{"products": [{{"id": 9, "title": "Solo", "category": "House", "price": "5"}}]}}"#
        )
        .unwrap();

        let catalog = load_catalog(Some(&path)).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn test_missing_file() {
        let err = load_catalog(Some(Path::new("/nonexistent/catalog.json"))).unwrap_err();
        assert!(matches!(err, CatalogLoadError::Read { .. }));
    }
}
