//! # Shell Commands
//!
//! One command per input line, whitespace separated.

use cart_core::CartError;
use std::str::FromStr;

pub const HELP: &str = "\
commands:
  products            list the catalog with remaining stock
  coupons             list available coupons
  cart                show cart lines and totals
  add <id>            add one unit of a product
  remove <id>         remove a product's line
  qty <id> <n>        set a line's quantity (0 or less removes it)
  coupon <code>       select a coupon (`coupon none` deselects)
  total               show totals
  stock <id>          show remaining stock for a product
  save                write the cart snapshot
  help                show this text
  quit                save and exit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Products,
    Coupons,
    Cart,
    Add(String),
    Remove(String),
    Quantity(String, i64),
    Coupon(String),
    ClearCoupon,
    Total,
    Stock(String),
    Save,
    Help,
    Quit,
}

fn invalid(message: impl Into<String>) -> CartError {
    CartError::InvalidRequest(message.into())
}

impl FromStr for Command {
    type Err = CartError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let Some(name) = words.next() else {
            return Err(invalid("empty command"));
        };
        let args: Vec<&str> = words.collect();

        let one_arg = |usage: &str| match args.as_slice() {
            [arg] => Ok(arg.to_string()),
            _ => Err(invalid(format!("usage: {}", usage))),
        };

        let command = match name.to_ascii_lowercase().as_str() {
            "products" | "ls" => Command::Products,
            "coupons" => Command::Coupons,
            "cart" => Command::Cart,
            "total" => Command::Total,
            "save" => Command::Save,
            "help" | "?" => Command::Help,
            "quit" | "exit" => Command::Quit,
            "add" => Command::Add(one_arg("add <id>")?),
            "remove" | "rm" => Command::Remove(one_arg("remove <id>")?),
            "stock" => Command::Stock(one_arg("stock <id>")?),
            "coupon" => match one_arg("coupon <code>|none")?.as_str() {
                "none" => Command::ClearCoupon,
                code => Command::Coupon(code.to_string()),
            },
            "qty" => match args.as_slice() {
                [id, n] => {
                    let quantity = n
                        .parse::<i64>()
                        .map_err(|_| invalid(format!("quantity must be a whole number, got {}", n)))?;
                    Command::Quantity(id.to_string(), quantity)
                }
                _ => return Err(invalid("usage: qty <id> <n>")),
            },
            other => return Err(invalid(format!("unknown command: {}", other))),
        };

        Ok(command)
    }
}
