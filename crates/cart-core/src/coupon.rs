//! # Coupons
//!
//! Cart-wide coupons and the coupon book they are picked from.
//! A cart holds at most one selected coupon; the book only supplies choices.

use serde::{Deserialize, Serialize};

/// How a coupon's `discount_value` is interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiscountType {
    /// Fixed currency amount off the discounted total
    Amount,
    /// Percent (0-100) off the discounted total
    Percentage,
}

impl DiscountType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiscountType::Amount => "amount",
            DiscountType::Percentage => "percentage",
        }
    }
}

impl std::fmt::Display for DiscountType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A cart-wide coupon, applied once after per-item tier discounts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coupon {
    /// Display name (e.g., "10,000 off")
    #[serde(default)]
    pub name: String,

    /// Redemption code (e.g., "AMOUNT10000")
    #[serde(default)]
    pub code: String,

    pub discount_type: DiscountType,

    /// Currency amount for `Amount`, percent for `Percentage`
    pub discount_value: f64,
}

impl Coupon {
    /// Create a fixed-amount coupon
    pub fn amount(name: impl Into<String>, code: impl Into<String>, value: f64) -> Self {
        Self {
            name: name.into(),
            code: code.into(),
            discount_type: DiscountType::Amount,
            discount_value: value,
        }
    }

    /// Create a percentage coupon
    pub fn percentage(name: impl Into<String>, code: impl Into<String>, percent: f64) -> Self {
        Self {
            name: name.into(),
            code: code.into(),
            discount_type: DiscountType::Percentage,
            discount_value: percent,
        }
    }

    /// Human-readable value, e.g. "5000 off" or "10% off"
    pub fn describe(&self) -> String {
        match self.discount_type {
            DiscountType::Amount => format!("{} off", self.discount_value),
            DiscountType::Percentage => format!("{}% off", self.discount_value),
        }
    }
}

/// Coupons available for selection (loaded from config)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CouponBook {
    #[serde(default)]
    pub coupons: Vec<Coupon>,
}

impl CouponBook {
    /// Create a book seeded with an initial list
    pub fn new(initial: Vec<Coupon>) -> Self {
        Self { coupons: initial }
    }

    /// Append a coupon. Duplicate codes are kept; lookups return the first.
    pub fn add(&mut self, coupon: Coupon) {
        self.coupons.push(coupon);
    }

    /// Builder: append a coupon
    pub fn with_coupon(mut self, coupon: Coupon) -> Self {
        self.add(coupon);
        self
    }

    /// Find a coupon by code
    pub fn get(&self, code: &str) -> Option<&Coupon> {
        self.coupons.iter().find(|c| c.code == code)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Coupon> {
        self.coupons.iter()
    }

    pub fn len(&self) -> usize {
        self.coupons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coupons.is_empty()
    }

    /// Load coupon book from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(toml_str)
    }
}
