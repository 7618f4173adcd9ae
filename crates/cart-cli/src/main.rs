//! # Tier-Cart RS
//!
//! Shopping cart shell with tiered discounts and coupons.
//!
//! ## Usage
//!
//! ```bash
//! # Optional environment variables
//! export CART_CATALOG_PATH=config/products.toml
//! export CART_COUPONS_PATH=config/coupons.toml
//! export CART_SNAPSHOT_PATH=.cart.json
//! export RUST_LOG=cart_core=debug
//!
//! # Run the shell
//! tier-cart
//! ```

use cart_cli::{LogFormat, Shell, ShellConfig, SnapshotStore};
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() -> anyhow::Result<()> {
    let config = ShellConfig::from_env()?;

    init_tracing(config.log_format);

    print_banner();

    let catalog = config.load_catalog()?;
    let coupons = config.load_coupons()?;
    let store = SnapshotStore::new(config.snapshot_path.clone());
    let cart = store.load()?;

    info!(
        products = catalog.len(),
        coupons = coupons.len(),
        lines = cart.item_count(),
        persistent = store.is_configured(),
        "Cart shell ready"
    );

    let mut shell = Shell::new(catalog, coupons, cart, store);
    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();
    shell.run(stdin.lock(), &mut stdout)?;

    let totals = shell.cart().calculate_total();
    info!(
        total = totals.total_after_discount,
        discount = totals.total_discount,
        "Session ended"
    );

    Ok(())
}

/// Logs go to stderr so they never interleave with shell output
fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::builder()
        .with_default_directive(Level::INFO.into())
        .from_env_lossy();

    match format {
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(fmt::layer().with_writer(std::io::stderr))
            .with(filter)
            .init(),
        LogFormat::Json => tracing_subscriber::registry()
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .with(filter)
            .init(),
    }
}

fn print_banner() {
    println!(
        r#"
  🛒 Tier-Cart RS 🛒
  ━━━━━━━━━━━━━━━━━━━━━━━
  Tiered discounts, one coupon
  Version: {}
  Type `help` for commands
"#,
        env!("CARGO_PKG_VERSION")
    );
}
