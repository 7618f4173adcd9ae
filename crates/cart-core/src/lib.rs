//! # cart-core
//!
//! Core types and pricing rules for the tier-cart shopping cart.
//!
//! This crate provides:
//! - `Cart` and `CartItem` for cart state (add, remove, update, coupon)
//! - `calculate_totals` and friends for tiered and coupon pricing
//! - `Product` and `ProductCatalog` for the product catalog
//! - `Coupon` and `CouponBook` for coupon selection
//! - `CartError` for typed error handling at the edges
//!
//! ## Example
//!
//! ```rust
//! use cart_core::{Cart, Coupon, Product};
//!
//! let a = Product::new("a", "Product A", 100.0, 10)
//!     .with_discount(3, 0.1)
//!     .shared();
//!
//! let mut cart = Cart::new();
//! for _ in 0..3 {
//!     cart.add_to_cart(&a);
//! }
//! cart.apply_coupon(Coupon::amount("50 off", "AMOUNT50", 50.0));
//!
//! let totals = cart.calculate_total();
//! assert_eq!(totals.total_before_discount, 300);
//! assert_eq!(totals.total_after_discount, 220);
//! assert_eq!(totals.total_discount, 80);
//! ```

pub mod cart;
pub mod coupon;
pub mod error;
pub mod pricing;
pub mod product;

// Re-exports for convenience
pub use cart::{update_item_quantity, Cart, CartItem};
pub use coupon::{Coupon, CouponBook, DiscountType};
pub use error::{CartError, CartResult};
pub use pricing::{
    calculate_totals, format_amount, line_discount_rate, line_total, round_total, CartTotals,
};
pub use product::{DiscountTier, Product, ProductCatalog};
