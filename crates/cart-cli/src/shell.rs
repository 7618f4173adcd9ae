//! # Cart Shell
//!
//! Runs parsed commands against a single cart and writes a plain-text view
//! of the result. Caller mistakes (unknown ids, bad syntax) are printed and
//! the session continues; I/O and snapshot failures end it.

use crate::command::{Command, HELP};
use crate::store::SnapshotStore;
use cart_core::{
    format_amount, line_discount_rate, line_total, round_total, Cart, CartError, CartTotals,
    CouponBook, Product, ProductCatalog,
};
use std::io::{BufRead, Write};
use std::sync::Arc;
use tracing::{info, instrument};

/// Whether the session should keep reading input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct Shell {
    catalog: ProductCatalog,
    coupons: CouponBook,
    cart: Cart,
    store: SnapshotStore,
}

impl Shell {
    pub fn new(catalog: ProductCatalog, coupons: CouponBook, cart: Cart, store: SnapshotStore) -> Self {
        Self {
            catalog,
            coupons,
            cart,
            store,
        }
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Read commands until `quit` or end of input
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, out: &mut W) -> anyhow::Result<()> {
        write!(out, "> ")?;
        out.flush()?;

        for line in input.lines() {
            let line = line?;
            if line.trim().is_empty() {
                write!(out, "> ")?;
                out.flush()?;
                continue;
            }

            let result = match line.parse::<Command>() {
                Ok(command) => self.execute(command, out),
                Err(err) => Err(err.into()),
            };

            match result {
                Ok(Flow::Quit) => return Ok(()),
                Ok(Flow::Continue) => {}
                Err(err) => match err.downcast_ref::<CartError>() {
                    Some(cart_err) if cart_err.is_user_error() => {
                        writeln!(out, "error: {}", cart_err)?;
                    }
                    _ => return Err(err),
                },
            }

            write!(out, "> ")?;
            out.flush()?;
        }

        // end of input behaves like quit
        self.execute(Command::Quit, out)?;
        Ok(())
    }

    /// Execute one command
    #[instrument(skip(self, out))]
    pub fn execute<W: Write>(&mut self, command: Command, out: &mut W) -> anyhow::Result<Flow> {
        match command {
            Command::Products => self.print_products(out)?,
            Command::Coupons => self.print_coupons(out)?,
            Command::Cart => {
                self.print_lines(out)?;
                print_totals(out, &self.cart.calculate_total())?;
            }
            Command::Total => print_totals(out, &self.cart.calculate_total())?,
            Command::Add(id) => {
                let product = Arc::clone(self.product(&id)?);
                self.cart.add_to_cart(&product);
                writeln!(
                    out,
                    "{} x{} ({} left)",
                    product.id,
                    self.cart.quantity_of(&product.id),
                    self.cart.remaining_stock(&product)
                )?;
            }
            Command::Remove(id) => {
                let before = self.cart.item_count();
                self.cart.remove_from_cart(&id);
                if self.cart.item_count() < before {
                    writeln!(out, "removed {}", id)?;
                } else {
                    writeln!(out, "{} is not in the cart", id)?;
                }
            }
            Command::Quantity(id, quantity) => {
                self.cart.update_quantity(&id, quantity);
                writeln!(out, "{} x{}", id, self.cart.quantity_of(&id))?;
            }
            Command::Coupon(code) => {
                let coupon = self
                    .coupons
                    .get(&code)
                    .cloned()
                    .ok_or(CartError::CouponNotFound { code })?;
                writeln!(out, "applied {} ({})", coupon.code, coupon.describe())?;
                self.cart.apply_coupon(coupon);
            }
            Command::ClearCoupon => {
                self.cart.clear_coupon();
                writeln!(out, "coupon cleared")?;
            }
            Command::Stock(id) => {
                let product = self.product(&id)?;
                writeln!(out, "{}: {} left", id, self.cart.remaining_stock(product))?;
            }
            Command::Save => {
                if self.store.save(&self.cart)? {
                    writeln!(out, "saved {} lines", self.cart.item_count())?;
                } else {
                    writeln!(out, "no snapshot path configured (set CART_SNAPSHOT_PATH)")?;
                }
            }
            Command::Help => writeln!(out, "{}", HELP)?,
            Command::Quit => {
                if self.store.save(&self.cart)? {
                    info!("Saved cart snapshot on exit");
                }
                return Ok(Flow::Quit);
            }
        }

        Ok(Flow::Continue)
    }

    fn product(&self, id: &str) -> Result<&Arc<Product>, CartError> {
        self.catalog.get(id).ok_or_else(|| CartError::ProductNotFound {
            product_id: id.to_string(),
        })
    }

    fn print_products<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        if self.catalog.is_empty() {
            return writeln!(out, "(no products)");
        }
        for product in self.catalog.iter() {
            let tiers: Vec<String> = product
                .discounts
                .iter()
                .map(|t| format!("{}+ {}%", t.quantity, round_total(t.rate * 100.0)))
                .collect();
            writeln!(
                out,
                "{:<8} {:<20} {:>10}  {} left  {}",
                product.id,
                product.name,
                format_amount(round_total(product.price)),
                self.cart.remaining_stock(product),
                tiers.join(", ")
            )?;
        }
        Ok(())
    }

    fn print_coupons<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        if self.coupons.is_empty() {
            return writeln!(out, "(no coupons)");
        }
        for coupon in self.coupons.iter() {
            let marker = match self.cart.selected_coupon() {
                Some(selected) if selected.code == coupon.code => "*",
                _ => " ",
            };
            writeln!(
                out,
                "{} {:<14} {:<20} {}",
                marker,
                coupon.code,
                coupon.name,
                coupon.describe()
            )?;
        }
        Ok(())
    }

    fn print_lines<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        if self.cart.is_empty() {
            return writeln!(out, "(cart is empty)");
        }
        for item in self.cart.items() {
            let rate = line_discount_rate(item);
            let discount = if rate > 0.0 {
                format!("  (-{}%)", round_total(rate * 100.0))
            } else {
                String::new()
            };
            writeln!(
                out,
                "{:<8} x{:<4} {:>10}{}",
                item.product_id(),
                item.quantity,
                format_amount(round_total(line_total(item))),
                discount
            )?;
        }
        if let Some(coupon) = self.cart.selected_coupon() {
            writeln!(out, "coupon   {} ({})", coupon.code, coupon.describe())?;
        }
        Ok(())
    }
}

fn print_totals<W: Write>(out: &mut W, totals: &CartTotals) -> std::io::Result<()> {
    writeln!(out, "before discount  {:>10}", format_amount(totals.total_before_discount))?;
    writeln!(out, "discount         {:>10}", format_amount(totals.total_discount))?;
    writeln!(out, "total            {:>10}", format_amount(totals.total_after_discount))
}

#[cfg(test)]
mod tests {
    use super::*;
    use cart_core::Coupon;

    fn shell() -> Shell {
        let mut catalog = ProductCatalog::new();
        catalog.add(Product::new("a", "Product A", 100.0, 10).with_discount(3, 0.1));
        catalog.add(Product::new("b", "Product B", 2000.0, 2));

        let coupons = CouponBook::default()
            .with_coupon(Coupon::amount("50 off", "AMOUNT50", 50.0))
            .with_coupon(Coupon::percentage("10% off", "PERCENT10", 10.0));

        Shell::new(catalog, coupons, Cart::new(), SnapshotStore::default())
    }

    fn run(shell: &mut Shell, script: &str) -> String {
        let mut out = Vec::new();
        shell.run(script.as_bytes(), &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_scripted_session() {
        let mut shell = shell();
        let output = run(&mut shell, "add a\nadd a\nadd a\ncoupon AMOUNT50\ntotal\n");

        assert!(output.contains("a x3 (7 left)"));
        assert!(output.contains("applied AMOUNT50 (50 off)"));
        assert!(output.contains("before discount         300"));
        assert!(output.contains("discount                 80"));
        assert!(output.contains("total                   220"));
    }

    #[test]
    fn test_user_errors_do_not_end_session() {
        let mut shell = shell();
        let output = run(&mut shell, "add nope\ncoupon NOPE\nqty a many\nadd b\n");

        assert!(output.contains("error: Product not found: nope"));
        assert!(output.contains("error: Coupon not found: NOPE"));
        assert!(output.contains("error: Invalid request"));
        assert_eq!(shell.cart().quantity_of("b"), 1);
    }

    #[test]
    fn test_quantity_clamp_and_removal() {
        let mut shell = shell();
        run(&mut shell, "add b\nqty b 100\n");
        assert_eq!(shell.cart().quantity_of("b"), 2);

        let output = run(&mut shell, "stock b\nqty b 0\ncart\n");
        assert!(output.contains("b: 0 left"));
        assert!(output.contains("(cart is empty)"));
        assert!(shell.cart().is_empty());
    }

    #[test]
    fn test_remove_reports_missing_lines() {
        let mut shell = shell();
        let output = run(&mut shell, "add a\nremove a\nremove a\nremove nope\n");

        assert_eq!(output.matches("removed a").count(), 1);
        assert!(output.contains("a is not in the cart"));
        assert!(output.contains("nope is not in the cart"));
        assert!(shell.cart().is_empty());
    }

    #[test]
    fn test_quit_stops_reading() {
        let mut shell = shell();
        run(&mut shell, "add a\nquit\nadd a\n");
        assert_eq!(shell.cart().quantity_of("a"), 1);
    }

    #[test]
    fn test_coupon_listing_marks_selection() {
        let mut shell = shell();
        let output = run(&mut shell, "coupon PERCENT10\ncoupons\ncoupon none\n");

        assert!(output.contains("* PERCENT10"));
        assert!(output.contains("  AMOUNT50"));
        assert!(output.contains("coupon cleared"));
        assert!(shell.cart().selected_coupon().is_none());
    }

    #[test]
    fn test_save_without_store() {
        let mut shell = shell();
        let output = run(&mut shell, "save\n");
        assert!(output.contains("no snapshot path configured"));
    }
}
