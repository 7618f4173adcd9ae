//! # cart-cli
//!
//! Interactive shell over a single tier-cart cart.
//!
//! The shell loads a product catalog and a coupon book from TOML, restores
//! an optional cart snapshot, and reads one command per line:
//!
//! ```text
//! > add p1
//! p1 x1 (19 left)
//! > coupon PERCENT10
//! applied PERCENT10 (10% off)
//! > total
//! before discount      10,000
//! discount              1,000
//! total                 9,000
//! ```

pub mod command;
pub mod config;
pub mod shell;
pub mod store;

pub use command::Command;
pub use config::{LogFormat, ShellConfig};
pub use shell::{Flow, Shell};
pub use store::SnapshotStore;
