//! Catalog store: products and their current prices.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use clementine_core::ProductId;

use super::StoreError;
use crate::models::Product;

/// Store for catalog products.
///
/// The pricing engine only ever reads from this store; mutations come from
/// the admin product endpoints. A price read during order creation is a
/// snapshot - later catalog changes never affect existing orders.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Get a product by ID.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Backend` if the store fails.
    async fn get(&self, id: ProductId) -> Result<Option<Product>, StoreError>;

    /// List all products, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Backend` if the store fails.
    async fn list(&self) -> Result<Vec<Product>, StoreError>;

    /// Insert a new product.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Conflict` if the ID already exists.
    async fn insert(&self, product: Product) -> Result<(), StoreError>;

    /// Replace an existing product.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the product doesn't exist.
    async fn update(&self, product: Product) -> Result<(), StoreError>;

    /// Delete a product.
    ///
    /// # Returns
    ///
    /// Returns `true` if the product was deleted, `false` if it didn't exist.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Backend` if the store fails.
    async fn delete(&self, id: ProductId) -> Result<bool, StoreError>;
}

/// In-memory reference implementation of [`CatalogStore`].
#[derive(Debug, Default)]
pub struct InMemoryCatalog {
    products: RwLock<HashMap<ProductId, Product>>,
}

impl InMemoryCatalog {
    /// Create an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CatalogStore for InMemoryCatalog {
    async fn get(&self, id: ProductId) -> Result<Option<Product>, StoreError> {
        Ok(self.products.read().await.get(&id).cloned())
    }

    async fn list(&self) -> Result<Vec<Product>, StoreError> {
        let mut products: Vec<Product> = self.products.read().await.values().cloned().collect();
        products.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(products)
    }

    async fn insert(&self, product: Product) -> Result<(), StoreError> {
        let mut products = self.products.write().await;
        if products.contains_key(&product.id) {
            return Err(StoreError::Conflict(format!(
                "product {} already exists",
                product.id
            )));
        }
        products.insert(product.id, product);
        Ok(())
    }

    async fn update(&self, product: Product) -> Result<(), StoreError> {
        let mut products = self.products.write().await;
        let Some(slot) = products.get_mut(&product.id) else {
            return Err(StoreError::NotFound);
        };
        *slot = product;
        Ok(())
    }

    async fn delete(&self, id: ProductId) -> Result<bool, StoreError> {
        Ok(self.products.write().await.remove(&id).is_some())
    }
}
