//! # Product Types
//!
//! Product catalog types for tier-cart.
//! Products are loaded from `config/products.toml` and are read-only to
//! every cart: line items share them through `Arc<Product>`.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// A quantity-tier discount: `rate` applies once a line reaches `quantity`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DiscountTier {
    /// Minimum line quantity that unlocks this tier
    pub quantity: u32,

    /// Discount rate in `[0, 1)` (0.1 = 10% off)
    pub rate: f64,
}

impl DiscountTier {
    pub fn new(quantity: u32, rate: f64) -> Self {
        Self { quantity, rate }
    }

    /// Check if a line of `quantity` units qualifies for this tier
    pub fn applies_to(&self, quantity: u32) -> bool {
        quantity >= self.quantity
    }
}

/// A product in the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Unique product identifier (e.g., "p1")
    pub id: String,

    /// Display name
    #[serde(default)]
    pub name: String,

    /// Unit price
    pub price: f64,

    /// Total available units
    pub stock: u32,

    /// Quantity tiers, in no particular order
    #[serde(default)]
    pub discounts: Vec<DiscountTier>,
}

impl Product {
    /// Create a product without discount tiers
    pub fn new(id: impl Into<String>, name: impl Into<String>, price: f64, stock: u32) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price,
            stock,
            discounts: Vec::new(),
        }
    }

    /// Builder: add a discount tier
    pub fn with_discount(mut self, quantity: u32, rate: f64) -> Self {
        self.discounts.push(DiscountTier::new(quantity, rate));
        self
    }

    /// Builder: wrap in an `Arc` for sharing across carts
    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// Check if any units are available at all
    pub fn in_stock(&self) -> bool {
        self.stock > 0
    }
}

/// Product catalog (loaded from config)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductCatalog {
    #[serde(default)]
    pub products: Vec<Arc<Product>>,
}

impl ProductCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self {
            products: Vec::new(),
        }
    }

    /// Add a product to the catalog
    pub fn add(&mut self, product: Product) {
        self.products.push(Arc::new(product));
    }

    /// Find a product by ID
    pub fn get(&self, id: &str) -> Option<&Arc<Product>> {
        self.products.iter().find(|p| p.id == id)
    }

    /// Iterate products in catalog order
    pub fn iter(&self) -> impl Iterator<Item = &Arc<Product>> {
        self.products.iter()
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Load catalog from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(toml_str)
    }
}
