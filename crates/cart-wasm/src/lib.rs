//! # cart-wasm
//!
//! WebAssembly bindings for tier-cart-rs.
//!
//! Exposes a `WasmCart` that a browser UI drives directly:
//! - Adding, removing and re-quantifying products
//! - Selecting a coupon
//! - Reading totals, line amounts and remaining stock
//! - Snapshotting to / restoring from JSON (e.g. sessionStorage)
//!
//! ## Usage (JavaScript)
//!
//! ```javascript
//! import init, { WasmCart } from 'tier-cart-wasm';
//!
//! await init();
//!
//! const cart = new WasmCart();
//! cart.addToCart({ id: 'p1', name: 'Product 1', price: 10000, stock: 20,
//!                  discounts: [{ quantity: 10, rate: 0.1 }] });
//! cart.applyCoupon({ discountType: 'percentage', discountValue: 10 });
//!
//! const totals = cart.calculateTotal();
//! console.log(totals.totalAfterDiscount);
//!
//! sessionStorage.setItem('cart', cart.toJson());
//! ```
//!
//! ## Building
//!
//! ```bash
//! wasm-pack build --target web
//! ```

use cart_core::{pricing, Cart, CartTotals, Coupon, Product};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use wasm_bindgen::prelude::*;

/// Initialize the WASM module (called automatically)
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

fn from_js<T: DeserializeOwned>(value: JsValue, what: &str) -> Result<T, JsValue> {
    serde_wasm_bindgen::from_value(value)
        .map_err(|e| JsValue::from_str(&format!("Invalid {}: {}", what, e)))
}

fn to_js<T: serde::Serialize + ?Sized>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Cart totals for the JS side (plain numbers rather than BigInt)
#[wasm_bindgen]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WasmTotals {
    #[wasm_bindgen(js_name = totalBeforeDiscount)]
    pub total_before_discount: f64,
    #[wasm_bindgen(js_name = totalAfterDiscount)]
    pub total_after_discount: f64,
    #[wasm_bindgen(js_name = totalDiscount)]
    pub total_discount: f64,
}

impl From<CartTotals> for WasmTotals {
    fn from(totals: CartTotals) -> Self {
        Self {
            total_before_discount: totals.total_before_discount as f64,
            total_after_discount: totals.total_after_discount as f64,
            total_discount: totals.total_discount as f64,
        }
    }
}

/// A cart owned by the page
#[wasm_bindgen]
#[derive(Debug, Default)]
pub struct WasmCart {
    cart: Cart,
}

#[wasm_bindgen]
impl WasmCart {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self { cart: Cart::new() }
    }

    /// Restore from a `toJson` snapshot
    #[wasm_bindgen(js_name = fromJson)]
    pub fn from_json(json: &str) -> Result<WasmCart, JsValue> {
        Cart::restore_json(json)
            .map(|cart| Self { cart })
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Snapshot the line items as JSON
    #[wasm_bindgen(js_name = toJson)]
    pub fn to_json(&self) -> Result<String, JsValue> {
        self.cart
            .snapshot_json()
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    #[wasm_bindgen(js_name = addToCart)]
    pub fn add_to_cart(&mut self, product: JsValue) -> Result<(), JsValue> {
        let product: Product = from_js(product, "product")?;
        self.cart.add_to_cart(&Arc::new(product));
        Ok(())
    }

    #[wasm_bindgen(js_name = removeFromCart)]
    pub fn remove_from_cart(&mut self, product_id: &str) {
        self.cart.remove_from_cart(product_id);
    }

    /// JS numbers arrive as `f64`. NaN and values `<= 0` remove the line;
    /// positive fractions round up so `0.5` keeps a single unit, and huge
    /// values saturate before the stock clamp.
    #[wasm_bindgen(js_name = updateQuantity)]
    pub fn update_quantity(&mut self, product_id: &str, new_quantity: f64) {
        if new_quantity.is_nan() || new_quantity <= 0.0 {
            self.cart.remove_from_cart(product_id);
            return;
        }
        self.cart.update_quantity(product_id, new_quantity.ceil() as i64);
    }

    #[wasm_bindgen(js_name = applyCoupon)]
    pub fn apply_coupon(&mut self, coupon: JsValue) -> Result<(), JsValue> {
        let coupon: Coupon = from_js(coupon, "coupon")?;
        self.cart.apply_coupon(coupon);
        Ok(())
    }

    #[wasm_bindgen(js_name = clearCoupon)]
    pub fn clear_coupon(&mut self) {
        self.cart.clear_coupon();
    }

    #[wasm_bindgen(js_name = calculateTotal)]
    pub fn calculate_total(&self) -> WasmTotals {
        self.cart.calculate_total().into()
    }

    #[wasm_bindgen(js_name = remainingStock)]
    pub fn remaining_stock(&self, product: JsValue) -> Result<f64, JsValue> {
        let product: Product = from_js(product, "product")?;
        Ok(self.cart.remaining_stock(&product) as f64)
    }

    /// Discounted, unrounded amount for one line, if present
    #[wasm_bindgen(js_name = lineTotal)]
    pub fn line_total(&self, product_id: &str) -> Option<f64> {
        self.cart
            .items()
            .iter()
            .find(|item| item.product_id() == product_id)
            .map(pricing::line_total)
    }

    /// Tier rate currently unlocked for one line (0 if absent)
    #[wasm_bindgen(js_name = lineDiscountRate)]
    pub fn line_discount_rate(&self, product_id: &str) -> f64 {
        self.cart
            .items()
            .iter()
            .find(|item| item.product_id() == product_id)
            .map(pricing::line_discount_rate)
            .unwrap_or(0.0)
    }

    pub fn items(&self) -> Result<JsValue, JsValue> {
        to_js(self.cart.items())
    }

    #[wasm_bindgen(js_name = selectedCoupon)]
    pub fn selected_coupon(&self) -> Result<JsValue, JsValue> {
        to_js(&self.cart.selected_coupon())
    }

    #[wasm_bindgen(js_name = itemCount)]
    pub fn item_count(&self) -> usize {
        self.cart.item_count()
    }
}

/// Format a rounded total with thousands separators (e.g. 10000 -> "10,000")
#[wasm_bindgen]
pub fn format_price(amount: f64) -> String {
    pricing::format_amount(pricing::round_total(amount))
}

/// Log to browser console
#[wasm_bindgen]
pub fn log(message: &str) {
    web_sys::console::log_1(&JsValue::from_str(message));
}

/// Get library version
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SNAPSHOT: &str = r#"[
        {"product":{"id":"a","name":"A","price":100,"stock":10,
                    "discounts":[{"quantity":3,"rate":0.1}]},"quantity":3},
        {"product":{"id":"b","name":"B","price":50,"stock":2},"quantity":1}
    ]"#;

    #[test]
    fn test_empty_cart_totals() {
        let cart = WasmCart::new();
        assert_eq!(cart.item_count(), 0);
        assert_eq!(
            cart.calculate_total(),
            WasmTotals {
                total_before_discount: 0.0,
                total_after_discount: 0.0,
                total_discount: 0.0,
            }
        );
    }

    #[test]
    fn test_restored_cart_totals_and_lines() {
        let cart = WasmCart::from_json(SNAPSHOT).unwrap();

        let totals = cart.calculate_total();
        assert_eq!(totals.total_before_discount, 350.0);
        assert_eq!(totals.total_after_discount, 320.0);
        assert_eq!(cart.line_discount_rate("a"), 0.1);
        assert_eq!(cart.line_discount_rate("missing"), 0.0);
        assert_eq!(cart.line_total("b"), Some(50.0));
        assert_eq!(cart.line_total("missing"), None);
    }

    #[test]
    fn test_quantity_updates() {
        let mut cart = WasmCart::from_json(SNAPSHOT).unwrap();

        cart.update_quantity("b", 9.0);
        assert_eq!(cart.line_total("b"), Some(100.0));

        cart.update_quantity("b", 0.0);
        cart.remove_from_cart("nonexistent");
        assert_eq!(cart.item_count(), 1);
    }

    #[test]
    fn test_update_quantity_from_js_numbers() {
        let mut cart = WasmCart::from_json(SNAPSHOT).unwrap();

        cart.update_quantity("a", f64::MAX);
        assert_eq!(cart.cart.quantity_of("a"), 10);

        cart.update_quantity("a", 4.0);
        cart.update_quantity("a", 3e9);
        assert_eq!(cart.cart.quantity_of("a"), 10);

        cart.update_quantity("a", f64::INFINITY);
        assert_eq!(cart.cart.quantity_of("a"), 10);

        cart.update_quantity("a", 2.2);
        assert_eq!(cart.cart.quantity_of("a"), 3);

        cart.update_quantity("a", 0.5);
        assert_eq!(cart.cart.quantity_of("a"), 1);

        cart.update_quantity("a", -1.0);
        assert_eq!(cart.cart.quantity_of("a"), 0);

        cart.update_quantity("b", f64::NAN);
        assert_eq!(cart.item_count(), 0);
    }

    #[test]
    fn test_snapshot_survives_round_trip() {
        let cart = WasmCart::from_json(SNAPSHOT).unwrap();
        let again = WasmCart::from_json(&cart.to_json().unwrap()).unwrap();
        assert_eq!(again.calculate_total(), cart.calculate_total());
    }

    #[test]
    fn test_format_price() {
        assert_eq!(format_price(0.0), "0");
        assert_eq!(format_price(270.0), "270");
        assert_eq!(format_price(10000.0), "10,000");
        assert_eq!(format_price(1234567.4), "1,234,567");
        assert_eq!(format_price(-5000.0), "-5,000");
    }
}
