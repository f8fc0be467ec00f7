//! Catalog product domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use clementine_core::{Price, ProductId};

/// A catalog product.
///
/// The catalog is mutable: prices can change at any time. Orders are
/// insulated from that by snapshotting the price at creation time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Unique product ID.
    pub id: ProductId,
    /// Product name.
    pub name: String,
    /// Longer description, if any.
    pub description: Option<String>,
    /// Current price.
    pub price: Price,
    /// When the product was created.
    pub created_at: DateTime<Utc>,
    /// When the product was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Create a new product with fresh timestamps.
    #[must_use]
    pub fn new(new: NewProduct) -> Self {
        let now = Utc::now();
        Self {
            id: ProductId::new(),
            name: new.name,
            description: new.description,
            price: new.price,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply a partial update, refreshing `updated_at`.
    pub fn apply(&mut self, patch: ProductPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(description) = patch.description {
            self.description = Some(description);
        }
        if let Some(price) = patch.price {
            self.price = price;
        }
        self.updated_at = Utc::now();
    }
}

/// Request body for creating a product.
#[derive(Debug, Clone, Deserialize)]
pub struct NewProduct {
    /// Product name.
    pub name: String,
    /// Longer description, if any.
    pub description: Option<String>,
    /// Initial price.
    pub price: Price,
}

/// Request body for updating a product. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductPatch {
    /// New name.
    pub name: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// New price.
    pub price: Option<Price>,
}
