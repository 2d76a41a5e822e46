//! Product catalog
//!
//! Products are read-only collaborators for the cart and order flows: the
//! [`ProductLookup`] seam is all those flows see. [`ProductCatalog`] is the
//! in-memory implementation.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use slotmap::{SlotMap, new_key_type};
use thiserror::Error;

use crate::slug;

new_key_type! {
    /// Product Key
    pub struct ProductKey;
}

/// Errors from catalog operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    /// The referenced product does not exist.
    #[error("product not found")]
    NotFound,

    /// An explicitly supplied slug is malformed.
    #[error("invalid slug format: {0:?}")]
    InvalidSlug(String),
}

/// A product image; the first image on a product is its primary image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductImage {
    /// Image URL
    pub url: String,

    /// Alt text
    pub alt: Option<String>,
}

/// Product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Product name
    pub name: String,

    /// URL-safe identifier, unique within the catalog
    pub slug: String,

    /// Current price
    pub price: Decimal,

    /// Previous price, for strike-through display
    pub old_price: Option<Decimal>,

    /// Display currency label
    pub currency: String,

    /// Units in stock
    pub stock: u32,

    /// Product images; the first is primary
    pub images: Vec<ProductImage>,

    /// Whether the product is visible on the storefront
    pub is_active: bool,

    /// Storefront view counter
    pub views: u64,
}

impl Product {
    /// URL of the primary (first) image, if any.
    pub fn primary_image(&self) -> Option<&str> {
        self.images.first().map(|image| image.url.as_str())
    }
}

/// Input for [`ProductCatalog::create`].
#[derive(Debug, Clone)]
pub struct NewProduct {
    /// Product name
    pub name: String,

    /// Explicit slug; generated from the name when absent
    pub slug: Option<String>,

    /// Current price
    pub price: Decimal,

    /// Previous price
    pub old_price: Option<Decimal>,

    /// Display currency label
    pub currency: String,

    /// Units in stock
    pub stock: u32,

    /// Product images
    pub images: Vec<ProductImage>,
}

/// Batch product resolution, the seam between the catalog and the
/// cart/order flows.
pub trait ProductLookup {
    /// Resolve a single product key.
    fn find(&self, key: ProductKey) -> Option<&Product>;

    /// Resolve a batch of keys; missing keys are simply absent from the
    /// result, callers compare counts when that matters.
    fn find_by_keys(&self, keys: &[ProductKey]) -> Vec<(ProductKey, &Product)> {
        keys.iter()
            .filter_map(|&key| self.find(key).map(|product| (key, product)))
            .collect()
    }
}

/// In-memory product store.
#[derive(Debug, Default)]
pub struct ProductCatalog {
    products: SlotMap<ProductKey, Product>,
}

impl ProductCatalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a product, deriving and disambiguating its slug.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::InvalidSlug`] if an explicitly supplied slug
    /// is malformed.
    pub fn create(&mut self, new: NewProduct) -> Result<ProductKey, CatalogError> {
        let base = match new.slug {
            Some(explicit) => {
                if !slug::is_valid(&explicit) {
                    return Err(CatalogError::InvalidSlug(explicit));
                }
                explicit
            }
            None => slug::generate(&new.name),
        };

        let slug = slug::disambiguate(&base, |candidate| {
            self.products.values().any(|p| p.slug == candidate)
        });

        Ok(self.products.insert(Product {
            name: new.name,
            slug,
            price: new.price,
            old_price: new.old_price,
            currency: new.currency,
            stock: new.stock,
            images: new.images,
            is_active: true,
            views: 0,
        }))
    }

    /// Fetch a product by key.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::NotFound`] if the key does not resolve.
    pub fn get(&self, key: ProductKey) -> Result<&Product, CatalogError> {
        self.products.get(key).ok_or(CatalogError::NotFound)
    }

    /// Mutable access to a product, for admin edits.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::NotFound`] if the key does not resolve.
    pub fn get_mut(&mut self, key: ProductKey) -> Result<&mut Product, CatalogError> {
        self.products.get_mut(key).ok_or(CatalogError::NotFound)
    }

    /// Fetch a product by slug, counting the access as a storefront view.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::NotFound`] if no product carries the slug.
    pub fn find_by_slug(&mut self, slug: &str) -> Result<&Product, CatalogError> {
        let product = self
            .products
            .values_mut()
            .find(|p| p.slug == slug)
            .ok_or(CatalogError::NotFound)?;
        product.views += 1;
        Ok(product)
    }

    /// Remove a product.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::NotFound`] if the key does not resolve.
    pub fn remove(&mut self, key: ProductKey) -> Result<Product, CatalogError> {
        self.products.remove(key).ok_or(CatalogError::NotFound)
    }

    /// Number of products in the catalog.
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Check whether the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

impl ProductLookup for ProductCatalog {
    fn find(&self, key: ProductKey) -> Option<&Product> {
        self.products.get(key)
    }
}
