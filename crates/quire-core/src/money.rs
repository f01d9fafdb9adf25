//! Money and totals calculation.
//!
//! All arithmetic is done on [`Decimal`], so summing many line items never
//! drifts the way binary floats do. Rounding to cents only happens at
//! display time.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::models::document::LineItem;

/// Derived totals of a line-item sequence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Totals {
    /// Sum of `quantity * unit_price`.
    pub subtotal: Decimal,
    /// Sum of `quantity * unit_price * tax_percent / 100`.
    pub tax_total: Decimal,
    /// `subtotal + tax_total`.
    pub grand_total: Decimal,
}

/// Net amount of one line (`quantity * unit_price`).
pub fn line_net(item: &LineItem) -> Decimal {
    item.quantity * item.unit_price
}

/// Tax amount of one line.
pub fn line_tax(item: &LineItem) -> Decimal {
    line_net(item) * item.tax_percent / Decimal::ONE_HUNDRED
}

/// Gross amount of one line: `quantity * unit_price * (1 + tax/100)`.
pub fn line_total(item: &LineItem) -> Decimal {
    line_net(item) + line_tax(item)
}

/// Compute subtotal, tax and grand total for an ordered sequence of items.
///
/// Negative quantities or prices are not rejected here; they propagate
/// arithmetically. The editor rejects them at input time.
pub fn compute_totals<'a, I>(items: I) -> Totals
where
    I: IntoIterator<Item = &'a LineItem>,
{
    let (subtotal, tax_total) = items
        .into_iter()
        .fold((Decimal::ZERO, Decimal::ZERO), |(net, tax), item| {
            (net + line_net(item), tax + line_tax(item))
        });

    Totals {
        subtotal,
        tax_total,
        grand_total: subtotal + tax_total,
    }
}

/// Round half away from zero to two decimal places.
pub fn round_cents(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Format an amount as `$1,234.56` (the single supported locale).
pub fn format_currency(amount: Decimal) -> String {
    format_currency_with(amount, "$")
}

/// Format an amount with a custom currency symbol.
pub fn format_currency_with(amount: Decimal, symbol: &str) -> String {
    let rounded = round_cents(amount);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    format!("{}{}{}", sign, symbol, format_amount(rounded.abs()))
}

/// Format a non-negative amount with thousands separators and two decimals.
pub fn format_amount(amount: Decimal) -> String {
    let s = format!("{:.2}", round_cents(amount));
    let (integer_part, decimal_part) = s.split_once('.').unwrap_or((s.as_str(), "00"));

    let chars: Vec<char> = integer_part.chars().collect();
    let mut grouped = String::with_capacity(chars.len() + chars.len() / 3);
    for (i, c) in chars.iter().enumerate() {
        if i > 0 && (chars.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(*c);
    }

    format!("{}.{}", grouped, decimal_part)
}

/// Format a quantity or percentage without trailing zeros (`2`, `1.5`).
pub fn format_number(value: Decimal) -> String {
    value.normalize().to_string()
}

/// Parse user-entered numeric text (`"1,234.50"`, `" 12 "`, `"$3"`).
///
/// Returns `None` for anything that is not a finite decimal number.
pub fn parse_amount(s: &str) -> Option<Decimal> {
    let cleaned: String = s
        .trim()
        .trim_start_matches('$')
        .chars()
        .filter(|c| *c != ',' && !c.is_whitespace())
        .collect();

    if cleaned.is_empty() {
        return None;
    }

    Decimal::from_str(&cleaned).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(qty: i64, price: &str, tax: i64) -> LineItem {
        LineItem {
            description: "x".to_string(),
            quantity: Decimal::from(qty),
            unit_price: Decimal::from_str(price).unwrap(),
            tax_percent: Decimal::from(tax),
        }
    }

    #[test]
    fn test_totals_reference_case() {
        let items = vec![item(2, "10", 0), item(1, "5", 10)];
        let totals = compute_totals(&items);

        assert_eq!(totals.subtotal, Decimal::new(2500, 2));
        assert_eq!(totals.tax_total, Decimal::new(50, 2));
        assert_eq!(totals.grand_total, Decimal::new(2550, 2));
    }

    #[test]
    fn test_grand_total_is_exact_sum() {
        let items: Vec<LineItem> = (1..=200).map(|i| item(i, "0.10", 7)).collect();
        let totals = compute_totals(&items);
        assert_eq!(totals.grand_total, totals.subtotal + totals.tax_total);
        // 0.1 * (1 + ... + 200) = 2010 exactly
        assert_eq!(totals.subtotal, Decimal::from(2010));
    }

    #[test]
    fn test_empty_sequence() {
        let totals = compute_totals(&Vec::<LineItem>::new());
        assert_eq!(totals, Totals::default());
    }

    #[test]
    fn test_line_total() {
        let li = item(3, "19.99", 20);
        assert_eq!(line_total(&li), Decimal::from_str("71.964").unwrap());
    }

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(Decimal::from_str("1234.5").unwrap()), "$1,234.50");
        assert_eq!(format_currency(Decimal::from_str("0.005").unwrap()), "$0.01");
        assert_eq!(format_currency(Decimal::from_str("-5").unwrap()), "-$5.00");
        assert_eq!(format_currency(Decimal::from(1_000_000)), "$1,000,000.00");
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("1,234.50"), Decimal::from_str("1234.50").ok());
        assert_eq!(parse_amount(" 12 "), Some(Decimal::from(12)));
        assert_eq!(parse_amount("$3"), Some(Decimal::from(3)));
        assert_eq!(parse_amount("abc"), None);
        assert_eq!(parse_amount(""), None);
        assert_eq!(parse_amount("NaN"), None);
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(Decimal::from_str("2.000").unwrap()), "2");
        assert_eq!(format_number(Decimal::from_str("1.50").unwrap()), "1.5");
    }
}
