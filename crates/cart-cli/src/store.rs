//! # Snapshot Store
//!
//! File-backed persistence for the cart's line items. Best effort only:
//! the shell works the same with no store configured.

use cart_core::{Cart, CartError, CartResult};
use std::path::PathBuf;
use tracing::{debug, info};

#[derive(Debug, Clone, Default)]
pub struct SnapshotStore {
    path: Option<PathBuf>,
}

impl SnapshotStore {
    pub fn new(path: Option<PathBuf>) -> Self {
        Self { path }
    }

    pub fn is_configured(&self) -> bool {
        self.path.is_some()
    }

    /// Restore the saved cart, or start empty if there is nothing to restore
    pub fn load(&self) -> CartResult<Cart> {
        let Some(path) = &self.path else {
            return Ok(Cart::new());
        };
        if !path.exists() {
            debug!("No snapshot at {}, starting empty", path.display());
            return Ok(Cart::new());
        }

        let json = std::fs::read_to_string(path).map_err(|e| {
            CartError::Configuration(format!("Cannot read {}: {}", path.display(), e))
        })?;
        let cart = Cart::restore_json(&json)?;
        info!("Restored {} cart lines from {}", cart.item_count(), path.display());
        Ok(cart)
    }

    /// Write the cart's line items. Returns false when no path is configured.
    pub fn save(&self, cart: &Cart) -> CartResult<bool> {
        let Some(path) = &self.path else {
            return Ok(false);
        };

        std::fs::write(path, cart.snapshot_json()?).map_err(|e| {
            CartError::Configuration(format!("Cannot write {}: {}", path.display(), e))
        })?;
        debug!("Saved {} cart lines to {}", cart.item_count(), path.display());
        Ok(true)
    }
}
