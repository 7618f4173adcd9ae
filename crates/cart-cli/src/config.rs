//! # Shell Configuration
//!
//! Where the shell finds its catalog, coupons and snapshot, and how it logs.
//! Values come from the environment (a `.env` file is loaded first).
//!
//! | Variable | Default |
//! |----------|---------|
//! | `CART_CATALOG_PATH` | first `config/products.toml` found |
//! | `CART_COUPONS_PATH` | first `config/coupons.toml` found |
//! | `CART_SNAPSHOT_PATH` | unset (no persistence) |
//! | `CART_LOG_FORMAT` | `pretty` (`json` also accepted) |

use cart_core::{CartError, CartResult, CouponBook, ProductCatalog};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{info, warn};

/// Directories searched when no explicit path is configured
const DEFAULT_CONFIG_DIRS: [&str; 3] = ["config", "../config", "../../config"];

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = CartError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => Err(CartError::Configuration(format!(
                "CART_LOG_FORMAT must be pretty or json, got {}",
                other
            ))),
        }
    }
}

/// Shell configuration
#[derive(Debug, Clone, Default)]
pub struct ShellConfig {
    /// Explicit product catalog file
    pub catalog_path: Option<PathBuf>,
    /// Explicit coupon book file
    pub coupons_path: Option<PathBuf>,
    /// Cart snapshot file (read on start, written on save/quit)
    pub snapshot_path: Option<PathBuf>,
    pub log_format: LogFormat,
}

impl ShellConfig {
    /// Load from environment variables
    pub fn from_env() -> CartResult<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup (the environment, or a map in tests)
    pub fn from_lookup<F>(lookup: F) -> CartResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let path = |key: &str| lookup(key).filter(|v| !v.is_empty()).map(PathBuf::from);

        Ok(Self {
            catalog_path: path("CART_CATALOG_PATH"),
            coupons_path: path("CART_COUPONS_PATH"),
            snapshot_path: path("CART_SNAPSHOT_PATH"),
            log_format: lookup("CART_LOG_FORMAT")
                .map(|v| v.parse::<LogFormat>())
                .transpose()?
                .unwrap_or_default(),
        })
    }

    /// Load the product catalog, or an empty one if none is found
    pub fn load_catalog(&self) -> CartResult<ProductCatalog> {
        match read_config_file(self.catalog_path.as_deref(), "products.toml")? {
            Some((path, content)) => {
                let catalog = ProductCatalog::from_toml(&content).map_err(|e| {
                    CartError::Configuration(format!("Failed to parse {}: {}", path.display(), e))
                })?;
                info!("Loaded {} products from {}", catalog.len(), path.display());
                Ok(catalog)
            }
            None => {
                warn!("No product catalog found, using empty catalog");
                Ok(ProductCatalog::new())
            }
        }
    }

    /// Load the coupon book, or an empty one if none is found
    pub fn load_coupons(&self) -> CartResult<CouponBook> {
        match read_config_file(self.coupons_path.as_deref(), "coupons.toml")? {
            Some((path, content)) => {
                let book = CouponBook::from_toml(&content).map_err(|e| {
                    CartError::Configuration(format!("Failed to parse {}: {}", path.display(), e))
                })?;
                info!("Loaded {} coupons from {}", book.len(), path.display());
                Ok(book)
            }
            None => {
                warn!("No coupon book found, using empty coupon book");
                Ok(CouponBook::default())
            }
        }
    }
}

/// Read an explicitly configured file (must exist) or search the defaults
fn read_config_file(
    explicit: Option<&Path>,
    file_name: &str,
) -> CartResult<Option<(PathBuf, String)>> {
    if let Some(path) = explicit {
        let content = std::fs::read_to_string(path).map_err(|e| {
            CartError::Configuration(format!("Cannot read {}: {}", path.display(), e))
        })?;
        return Ok(Some((path.to_path_buf(), content)));
    }

    for dir in DEFAULT_CONFIG_DIRS {
        let path = Path::new(dir).join(file_name);
        if let Ok(content) = std::fs::read_to_string(&path) {
            return Ok(Some((path, content)));
        }
    }

    Ok(None)
}
