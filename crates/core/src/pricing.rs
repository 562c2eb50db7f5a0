use serde::{Deserialize, Serialize};

use crate::domain::cart::CartLine;

pub const DEFAULT_CURRENCY_SYMBOL: &str = "₦";

pub fn total_quantity(lines: &[CartLine]) -> u64 {
    lines.iter().map(|line| u64::from(line.quantity)).sum()
}

pub fn total_price(lines: &[CartLine]) -> u64 {
    lines.iter().fold(0u64, |total, line| total.saturating_add(line.line_total()))
}

/// Renders whole-unit amounts the way the storefront displays them: a
/// currency symbol followed by comma-grouped digits.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceFormat {
    pub symbol: String,
}

impl Default for PriceFormat {
    fn default() -> Self {
        Self { symbol: DEFAULT_CURRENCY_SYMBOL.to_string() }
    }
}

impl PriceFormat {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self { symbol: symbol.into() }
    }

    pub fn format(&self, amount: u64) -> String {
        format!("{}{}", self.symbol, group_thousands(amount))
    }
}

fn group_thousands(amount: u64) -> String {
    let digits = amount.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use crate::domain::cart::CartLine;
    use crate::domain::product::ProductId;

    use super::{total_price, total_quantity, PriceFormat};

    fn line(id: u32, price: u64, quantity: u32) -> CartLine {
        CartLine {
            product_id: ProductId(id),
            name: format!("item-{id}"),
            price,
            image: String::new(),
            quantity,
        }
    }

    #[test]
    fn totals_cover_every_line() {
        let lines = vec![line(1, 8500, 2), line(3, 2200, 1)];

        assert_eq!(total_price(&lines), 19200);
        assert_eq!(total_quantity(&lines), 3);
    }

    #[test]
    fn totals_of_nothing_are_zero() {
        assert_eq!(total_price(&[]), 0);
        assert_eq!(total_quantity(&[]), 0);
    }

    #[test]
    fn formats_with_grouping() {
        let naira = PriceFormat::default();

        assert_eq!(naira.format(0), "₦0");
        assert_eq!(naira.format(999), "₦999");
        assert_eq!(naira.format(19200), "₦19,200");
        assert_eq!(naira.format(1_234_567), "₦1,234,567");
        assert_eq!(PriceFormat::new("NGN ").format(11500), "NGN 11,500");
    }
}
