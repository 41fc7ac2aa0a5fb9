//! Product catalog: read-only reference data for the storefront.
//!
//! A catalog is parsed from a JSON document of the form
//!
//! ```json
//! {
//!   "currency": "USD",
//!   "products": [
//!     { "id": 1, "title": "Trap Essentials", "category": "Trap", "price": "29.99", ... }
//!   ]
//! }
//! ```
//!
//! and validated once. Nothing in the application mutates it afterwards.

use std::collections::HashSet;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{CurrencyCode, Price, ProductId};

/// Errors produced while loading a catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The document is not valid catalog JSON.
    #[error("invalid catalog JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// The catalog has no products.
    #[error("catalog contains no products")]
    Empty,

    /// Two products share an id.
    #[error("duplicate product id {0}")]
    DuplicateId(ProductId),

    /// A product has a negative price.
    #[error("product {0} has a negative price")]
    NegativePrice(ProductId),

    /// A product is priced above [`MAX_PRICE_UNITS`].
    #[error("product {0} is priced above {MAX_PRICE_UNITS}")]
    PriceTooHigh(ProductId),

    /// A product has an empty title.
    #[error("product {0} has an empty title")]
    MissingTitle(ProductId),
}

/// Highest accepted product price, in the currency's standard unit.
pub const MAX_PRICE_UNITS: u32 = 1_000_000;

/// A short audio preview attached to a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreviewClip {
    /// Display name, e.g. "Dark Trap Loop".
    pub name: String,
    /// Human-readable duration, e.g. "0:30".
    pub duration: String,
    /// Playable media URL.
    pub url: String,
}

/// A sample pack offered in the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    pub category: String,
    pub price: Price,
    pub description: String,
    pub long_description: String,
    pub sample_count: u32,
    pub previews: Vec<PreviewClip>,
    pub features: Vec<String>,
    /// BPM range, e.g. "120-140".
    pub bpm: String,
    /// Musical key, e.g. "C minor" or "Various".
    pub key: String,
    /// Download size, e.g. "1.2 GB".
    pub file_size: String,
    pub featured: bool,
}

impl Product {
    /// Whether `url` is one of this product's preview clips.
    #[must_use]
    pub fn has_preview(&self, url: &str) -> bool {
        self.previews.iter().any(|clip| clip.url == url)
    }
}

// =============================================================================
// Wire Format
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CatalogDocument {
    #[serde(default)]
    currency: CurrencyCode,
    products: Vec<ProductRecord>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProductRecord {
    id: ProductId,
    title: String,
    category: String,
    price: Decimal,
    #[serde(default)]
    description: String,
    #[serde(default)]
    long_description: Option<String>,
    #[serde(default)]
    sample_count: u32,
    #[serde(default)]
    previews: Vec<PreviewClip>,
    #[serde(default)]
    features: Vec<String>,
    #[serde(default)]
    bpm: String,
    #[serde(default)]
    key: String,
    #[serde(default)]
    file_size: String,
    #[serde(default)]
    featured: bool,
}

impl ProductRecord {
    fn into_product(self, currency: CurrencyCode) -> Product {
        let long_description = self
            .long_description
            .filter(|text| !text.trim().is_empty())
            .unwrap_or_else(|| self.description.clone());

        Product {
            id: self.id,
            title: self.title,
            category: self.category,
            price: Price::new(self.price, currency),
            description: self.description,
            long_description,
            sample_count: self.sample_count,
            previews: self.previews,
            features: self.features,
            bpm: self.bpm,
            key: self.key,
            file_size: self.file_size,
            featured: self.featured,
        }
    }
}

// =============================================================================
// Catalog
// =============================================================================

/// Products grouped under one category name.
#[derive(Debug)]
pub struct CategoryGroup<'a> {
    pub name: &'a str,
    pub products: Vec<&'a Product>,
}

/// A validated, immutable product catalog.
#[derive(Debug, Clone)]
pub struct Catalog {
    currency: CurrencyCode,
    products: Vec<Product>,
}

impl Catalog {
    /// Parse and validate a catalog JSON document.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Parse` for malformed JSON and the validation
    /// variants for an empty catalog, duplicate ids, negative prices or
    /// blank titles.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let document: CatalogDocument = serde_json::from_str(json)?;
        let currency = document.currency;
        let products = document
            .products
            .into_iter()
            .map(|record| record.into_product(currency))
            .collect();
        Self::new(currency, products)
    }

    /// Build a catalog from already-constructed products.
    ///
    /// Every product is re-priced in `currency` so the store never mixes
    /// currencies in one cart.
    ///
    /// # Errors
    ///
    /// Same validation errors as [`Catalog::from_json`].
    pub fn new(currency: CurrencyCode, mut products: Vec<Product>) -> Result<Self, CatalogError> {
        if products.is_empty() {
            return Err(CatalogError::Empty);
        }

        let mut seen = HashSet::with_capacity(products.len());
        for product in &mut products {
            if !seen.insert(product.id) {
                return Err(CatalogError::DuplicateId(product.id));
            }
            let amount = product.price.amount;
            if amount < Decimal::ZERO {
                return Err(CatalogError::NegativePrice(product.id));
            }
            if amount > Decimal::from(MAX_PRICE_UNITS) {
                return Err(CatalogError::PriceTooHigh(product.id));
            }
            // "-0" parses with its sign kept.
            if amount.is_zero() {
                product.price.amount = Decimal::ZERO;
            }
            if product.title.trim().is_empty() {
                return Err(CatalogError::MissingTitle(product.id));
            }
            product.price.currency_code = currency;
        }

        Ok(Self { currency, products })
    }

    /// Store currency.
    #[must_use]
    pub const fn currency(&self) -> CurrencyCode {
        self.currency
    }

    /// All products in catalog order.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Number of products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Always false for a validated catalog; present for API symmetry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Look up a product by id.
    #[must_use]
    pub fn get(&self, id: ProductId) -> Option<&Product> {
        self.products.iter().find(|product| product.id == id)
    }

    /// Products shown on the home grid.
    ///
    /// Falls back to the whole catalog when nothing is flagged as featured.
    #[must_use]
    pub fn featured(&self) -> Vec<&Product> {
        let featured: Vec<&Product> = self.products.iter().filter(|p| p.featured).collect();
        if featured.is_empty() {
            self.products.iter().collect()
        } else {
            featured
        }
    }

    /// Products grouped by category, categories in first-seen order.
    #[must_use]
    pub fn by_category(&self) -> Vec<CategoryGroup<'_>> {
        let mut groups: Vec<CategoryGroup<'_>> = Vec::new();
        for product in &self.products {
            match groups.iter_mut().find(|g| g.name == product.category) {
                Some(group) => group.products.push(product),
                None => groups.push(CategoryGroup {
                    name: &product.category,
                    products: vec![product],
                }),
            }
        }
        groups
    }
}
