//! # Cart Manager
//!
//! Owns one shopper's line items and coupon selection.
//!
//! ## Invariants
//! - Line items are unique by product id (adding again bumps the quantity)
//! - Quantities set through `update_quantity` never exceed `product.stock`
//! - At most one coupon is selected; applying another replaces it
//!
//! Nothing in here returns an error. Unknown ids are ignored, quantities at
//! or below zero remove the line, and quantities above stock are clamped.

use crate::coupon::Coupon;
use crate::error::CartResult;
use crate::pricing::{self, CartTotals};
use crate::product::Product;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};

/// A product and how many units of it are in the cart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    /// Shared catalog product (read-only)
    pub product: Arc<Product>,

    pub quantity: u32,
}

impl CartItem {
    pub fn new(product: Arc<Product>, quantity: u32) -> Self {
        Self { product, quantity }
    }

    pub fn product_id(&self) -> &str {
        &self.product.id
    }
}

/// Apply the quantity-update rule to a line item list.
///
/// `new_quantity <= 0` removes the line; anything else is clamped to the
/// product's stock. Unknown ids leave the list untouched.
pub fn update_item_quantity(items: &mut Vec<CartItem>, product_id: &str, new_quantity: i64) {
    if new_quantity <= 0 {
        items.retain(|item| item.product_id() != product_id);
        return;
    }

    if let Some(item) = items.iter_mut().find(|i| i.product_id() == product_id) {
        let requested = u32::try_from(new_quantity).unwrap_or(u32::MAX);
        item.quantity = requested.min(item.product.stock);
    }
}

/// A shopping cart: ordered line items plus an optional coupon
#[derive(Debug, Clone, Default)]
pub struct Cart {
    items: Vec<CartItem>,
    selected_coupon: Option<Coupon>,
}

impl Cart {
    /// Create an empty cart with no coupon
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one unit of `product`.
    ///
    /// An existing line is incremented and clamped to stock. A new line
    /// always starts at quantity 1, even when the product has no stock.
    pub fn add_to_cart(&mut self, product: &Arc<Product>) {
        let remaining = self.remaining_stock(product);

        if let Some(item) = self.items.iter_mut().find(|i| i.product_id() == product.id) {
            item.quantity = item.quantity.saturating_add(1).min(product.stock);
            debug!(
                product_id = %product.id,
                quantity = item.quantity,
                remaining,
                "Incremented cart line"
            );
            return;
        }

        if !product.in_stock() {
            warn!(product_id = %product.id, "Adding product with no stock");
        }
        self.items.push(CartItem::new(Arc::clone(product), 1));
        debug!(product_id = %product.id, remaining, "Added cart line");
    }

    /// Remove the line for `product_id`, if any
    pub fn remove_from_cart(&mut self, product_id: &str) {
        let before = self.items.len();
        self.items.retain(|i| i.product_id() != product_id);
        if self.items.len() != before {
            debug!(product_id, "Removed cart line");
        }
    }

    /// Set a line's quantity (see [`update_item_quantity`])
    pub fn update_quantity(&mut self, product_id: &str, new_quantity: i64) {
        update_item_quantity(&mut self.items, product_id, new_quantity);
        debug!(product_id, new_quantity, "Updated cart quantity");
    }

    /// Select a coupon, replacing any previous selection
    pub fn apply_coupon(&mut self, coupon: Coupon) {
        debug!(code = %coupon.code, discount_type = %coupon.discount_type, "Applied coupon");
        self.selected_coupon = Some(coupon);
    }

    /// Deselect the current coupon
    pub fn clear_coupon(&mut self) {
        self.selected_coupon = None;
    }

    /// Units of `product` still available beyond what is in the cart.
    ///
    /// Can go negative if the product's stock shrank after it was added.
    pub fn remaining_stock(&self, product: &Product) -> i64 {
        i64::from(product.stock) - i64::from(self.quantity_of(&product.id))
    }

    /// Quantity of `product_id` in the cart (0 if absent)
    pub fn quantity_of(&self, product_id: &str) -> u32 {
        self.items
            .iter()
            .find(|i| i.product_id() == product_id)
            .map(|i| i.quantity)
            .unwrap_or(0)
    }

    /// Totals for the current items and coupon
    pub fn calculate_total(&self) -> CartTotals {
        pricing::calculate_totals(&self.items, self.selected_coupon.as_ref())
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn selected_coupon(&self) -> Option<&Coupon> {
        self.selected_coupon.as_ref()
    }

    /// Number of distinct lines
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Sum of quantities across lines
    pub fn total_quantity(&self) -> u64 {
        self.items.iter().map(|i| u64::from(i.quantity)).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Serialize the line items as a `[{product, quantity}]` JSON array.
    /// The coupon selection is not part of the snapshot.
    pub fn snapshot_json(&self) -> CartResult<String> {
        Ok(serde_json::to_string(&self.items)?)
    }

    /// Rebuild a cart from a snapshot produced by [`Cart::snapshot_json`].
    ///
    /// Snapshots may have been edited outside the cart, so lines are
    /// normalized: duplicates of a product id merge into the first line,
    /// each quantity is clamped to that line's stock, and empty lines drop.
    pub fn restore_json(json: &str) -> CartResult<Self> {
        let raw: Vec<CartItem> = serde_json::from_str(json)?;
        let raw_lines = raw.len();

        let mut items: Vec<CartItem> = Vec::with_capacity(raw_lines);
        for line in raw {
            match items.iter_mut().find(|i| i.product_id() == line.product_id()) {
                Some(existing) => {
                    existing.quantity = existing.quantity.saturating_add(line.quantity)
                }
                None => items.push(line),
            }
        }
        for item in &mut items {
            item.quantity = item.quantity.min(item.product.stock);
        }
        items.retain(|i| i.quantity > 0);

        if items.len() != raw_lines {
            warn!(raw_lines, lines = items.len(), "Normalized cart snapshot");
        }
        debug!(lines = items.len(), "Restored cart snapshot");
        Ok(Self {
            items,
            selected_coupon: None,
        })
    }
}
