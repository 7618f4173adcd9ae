//! # Pricing Engine
//!
//! Pure functions deriving cart totals from line items and an optional
//! coupon. Nothing here validates stock or ids; input is trusted.
//!
//! ## Composition order
//!
//! ```text
//!  Σ price × qty ─────────────────────────────► total_before_discount
//!        │
//!        └─► × (1 − best tier rate) per line ─► after tiers
//!                                                  │
//!                              coupon (optional) ◄─┘
//!                                   │
//!                                   └──────────► total_after_discount
//!
//!  total_discount = before − after
//!  each aggregate rounded on its own, half away from zero
//! ```

use crate::cart::CartItem;
use crate::coupon::{Coupon, DiscountType};
use serde::{Deserialize, Serialize};

/// Rounded cart totals
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartTotals {
    pub total_before_discount: i64,
    pub total_after_discount: i64,
    pub total_discount: i64,
}

/// Best tier rate unlocked by the line's quantity, or 0.
///
/// Tiers are scanned in any order; a tier only wins with a strictly
/// greater rate, so input order never changes the result. Rates are
/// clamped to `[0, 1]` so a line total never goes negative.
pub fn line_discount_rate(item: &CartItem) -> f64 {
    item.product
        .discounts
        .iter()
        .filter(|tier| tier.applies_to(item.quantity))
        .map(|tier| tier.rate.clamp(0.0, 1.0))
        .fold(0.0, |best, rate| if rate > best { rate } else { best })
}

/// Unrounded line amount after its tier discount
pub fn line_total(item: &CartItem) -> f64 {
    line_subtotal(item) * (1.0 - line_discount_rate(item))
}

fn line_subtotal(item: &CartItem) -> f64 {
    item.product.price * f64::from(item.quantity)
}

/// Apply a coupon to an already tier-discounted total.
///
/// Percentages are clamped to `[0, 100]` and amounts to `>= 0`, so the
/// result stays within `[0, total]`.
pub fn apply_coupon(total: f64, coupon: &Coupon) -> f64 {
    match coupon.discount_type {
        DiscountType::Amount => (total - coupon.discount_value.max(0.0)).max(0.0),
        DiscountType::Percentage => {
            total * (1.0 - coupon.discount_value.clamp(0.0, 100.0) / 100.0)
        }
    }
}

/// Compute rounded totals for a set of line items
pub fn calculate_totals(items: &[CartItem], coupon: Option<&Coupon>) -> CartTotals {
    let before: f64 = items.iter().map(line_subtotal).sum();
    let mut after: f64 = items.iter().map(line_total).sum();

    if let Some(coupon) = coupon {
        after = apply_coupon(after, coupon);
    }

    CartTotals {
        total_before_discount: round_total(before),
        total_after_discount: round_total(after),
        total_discount: round_total(before - after),
    }
}

/// Round to the nearest integer, halves away from zero
pub fn round_total(value: f64) -> i64 {
    value.round() as i64
}

/// Group digits in threes for display (e.g. 10000 -> "10,000")
pub fn format_amount(amount: i64) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if amount < 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::product::Product;
    use std::sync::Arc;

    fn item(product: Product, quantity: u32) -> CartItem {
        CartItem::new(Arc::new(product), quantity)
    }

    #[test]
    fn test_rate_picks_best_qualifying_tier() {
        let product = Product::new("p1", "Product 1", 10000.0, 50)
            .with_discount(20, 0.2)
            .with_discount(5, 0.05)
            .with_discount(10, 0.1);

        assert_eq!(line_discount_rate(&item(product.clone(), 4)), 0.0);
        assert_eq!(line_discount_rate(&item(product.clone(), 5)), 0.05);
        assert_eq!(line_discount_rate(&item(product.clone(), 12)), 0.1);
        assert_eq!(line_discount_rate(&item(product, 20)), 0.2);
    }

    #[test]
    fn test_rate_ignores_lower_rate_at_higher_threshold() {
        let product = Product::new("p1", "Product 1", 100.0, 50)
            .with_discount(2, 0.3)
            .with_discount(10, 0.1);

        assert_eq!(line_discount_rate(&item(product, 10)), 0.3);
    }

    #[test]
    fn test_out_of_range_tier_rates_are_clamped() {
        let over = Product::new("a", "A", 100.0, 10).with_discount(1, 1.5);
        let line = item(over, 2);
        assert_eq!(line_discount_rate(&line), 1.0);
        assert_eq!(line_total(&line), 0.0);

        let under = Product::new("b", "B", 100.0, 10).with_discount(1, -0.5);
        let line = item(under, 2);
        assert_eq!(line_discount_rate(&line), 0.0);
        assert_eq!(line_total(&line), 200.0);

        let lines = [item(Product::new("c", "C", 100.0, 10).with_discount(1, 2.0), 3)];
        let totals = calculate_totals(&lines, None);
        assert_eq!(totals.total_after_discount, 0);
        assert!(totals.total_after_discount <= totals.total_before_discount);
    }

    #[test]
    fn test_totals_without_coupon() {
        let items = vec![
            item(Product::new("a", "A", 100.0, 10).with_discount(3, 0.1), 3),
            item(Product::new("b", "B", 50.0, 10), 2),
        ];

        let totals = calculate_totals(&items, None);
        assert_eq!(totals.total_before_discount, 400);
        assert_eq!(totals.total_after_discount, 370);
        assert_eq!(totals.total_discount, 30);
    }

    #[test]
    fn test_amount_coupon_floors_at_zero() {
        let items = vec![item(Product::new("a", "A", 100.0, 10), 1)];
        let coupon = Coupon::amount("big", "BIG", 5000.0);

        let totals = calculate_totals(&items, Some(&coupon));
        assert_eq!(totals.total_after_discount, 0);
        assert_eq!(totals.total_discount, 100);
    }

    #[test]
    fn test_percentage_coupon_after_tiers() {
        let items = vec![item(
            Product::new("a", "A", 10000.0, 20).with_discount(10, 0.1),
            10,
        )];
        let coupon = Coupon::percentage("10% off", "PERCENT10", 10.0);

        let totals = calculate_totals(&items, Some(&coupon));
        assert_eq!(totals.total_before_discount, 100000);
        assert_eq!(totals.total_after_discount, 81000);
        assert_eq!(totals.total_discount, 19000);
    }

    #[test]
    fn test_out_of_range_coupons_are_clamped() {
        let items = vec![item(Product::new("a", "A", 100.0, 10), 2)];

        let over = Coupon::percentage("too much", "OVER", 150.0);
        let totals = calculate_totals(&items, Some(&over));
        assert_eq!(totals.total_after_discount, 0);
        assert_eq!(totals.total_discount, 200);

        let negative = Coupon::amount("negative", "NEG", -50.0);
        let totals = calculate_totals(&items, Some(&negative));
        assert_eq!(totals.total_after_discount, 200);
        assert_eq!(totals.total_discount, 0);
    }

    #[test]
    fn test_rounding_happens_on_aggregates() {
        // 3 lines of 0.4 each: per-line rounding would give 0, aggregate gives 1
        let items: Vec<_> = ["a", "b", "c"]
            .iter()
            .map(|id| item(Product::new(*id, *id, 0.4, 10), 1))
            .collect();

        let totals = calculate_totals(&items, None);
        assert_eq!(totals.total_before_discount, 1);
        assert_eq!(totals.total_after_discount, 1);
    }

    #[test]
    fn test_round_half_away_from_zero() {
        assert_eq!(round_total(2.5), 3);
        assert_eq!(round_total(2.4999), 2);
        assert_eq!(round_total(-2.5), -3);
        assert_eq!(round_total(0.0), 0);
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(0), "0");
        assert_eq!(format_amount(999), "999");
        assert_eq!(format_amount(10000), "10,000");
        assert_eq!(format_amount(1234567), "1,234,567");
        assert_eq!(format_amount(-5000), "-5,000");
    }

    #[test]
    fn test_empty_cart_totals() {
        assert_eq!(calculate_totals(&[], None), CartTotals::default());
        let coupon = Coupon::amount("a", "A", 1000.0);
        assert_eq!(calculate_totals(&[], Some(&coupon)), CartTotals::default());
    }

    #[test]
    fn test_totals_serialize_camel_case() {
        let totals = CartTotals {
            total_before_discount: 300,
            total_after_discount: 270,
            total_discount: 30,
        };
        let json = serde_json::to_value(totals).unwrap();
        assert_eq!(json["totalBeforeDiscount"], 300);
        assert_eq!(json["totalAfterDiscount"], 270);
        assert_eq!(json["totalDiscount"], 30);
    }
}
