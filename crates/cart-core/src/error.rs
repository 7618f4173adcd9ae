//! # Cart Error Types
//!
//! Typed errors for the edges of tier-cart: loading catalogs and coupon
//! books, restoring snapshots, and resolving ids handed in by a caller.
//!
//! The cart operations themselves never fail. Unknown ids are no-ops and
//! out-of-range quantities are clamped.

use thiserror::Error;

/// Error type for catalog, coupon and snapshot handling
#[derive(Debug, Error)]
pub enum CartError {
    /// Configuration errors (missing files, bad values)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Malformed request from a caller (bad command, bad argument)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Product not found in catalog
    #[error("Product not found: {product_id}")]
    ProductNotFound { product_id: String },

    /// Coupon code not found in the coupon book
    #[error("Coupon not found: {code}")]
    CouponNotFound { code: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl CartError {
    /// Returns true if the caller can fix this by changing its input
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            CartError::InvalidRequest(_)
                | CartError::ProductNotFound { .. }
                | CartError::CouponNotFound { .. }
        )
    }
}

impl From<serde_json::Error> for CartError {
    fn from(err: serde_json::Error) -> Self {
        CartError::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for CartError {
    fn from(err: toml::de::Error) -> Self {
        CartError::Serialization(err.to_string())
    }
}

/// Result type alias for cart edge operations
pub type CartResult<T> = Result<T, CartError>;
