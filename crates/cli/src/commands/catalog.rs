//! Catalog file commands.
//!
//! The storefront refuses to start on a catalog that fails validation, so
//! `validate` is meant to run before a new `CATALOG_PATH` file is deployed.

use std::path::{Path, PathBuf};

use pulsepack_core::{Catalog, CatalogError};

/// Errors from reading a catalog file.
#[derive(Debug, thiserror::Error)]
pub enum CatalogFileError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("{path}: {source}")]
    Invalid { path: PathBuf, source: CatalogError },
}

/// Read and validate a catalog file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or fails catalog validation.
pub async fn load(path: &Path) -> Result<Catalog, CatalogFileError> {
    let json = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| CatalogFileError::Read {
            path: path.to_path_buf(),
            source,
        })?;

    Catalog::from_json(&json).map_err(|source| CatalogFileError::Invalid {
        path: path.to_path_buf(),
        source,
    })
}

/// Validate a catalog file and report what it contains.
///
/// # Errors
///
/// Returns an error if the catalog is unreadable or invalid.
pub async fn validate(path: &Path) -> Result<(), CatalogFileError> {
    let catalog = load(path).await?;

    let without_previews = catalog
        .products()
        .iter()
        .filter(|product| product.previews.is_empty())
        .count();
    if without_previews > 0 {
        tracing::warn!("{without_previews} product(s) have no preview clips");
    }

    tracing::info!(
        "{} is valid: {} products in {} categories, priced in {}",
        path.display(),
        catalog.len(),
        catalog.by_category().len(),
        catalog.currency().code()
    );
    Ok(())
}

/// List products grouped by category.
///
/// # Errors
///
/// Returns an error if the catalog is unreadable or invalid.
pub async fn list(path: &Path) -> Result<(), CatalogFileError> {
    let catalog = load(path).await?;

    for group in catalog.by_category() {
        tracing::info!("{} ({})", group.name, group.products.len());
        for product in group.products {
            tracing::info!(
                "  #{} {} {}{}",
                product.id,
                product.title,
                product.price,
                if product.featured { " [featured]" } else { "" }
            );
        }
    }
    Ok(())
}
