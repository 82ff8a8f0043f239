//! Display formatting for amounts, quantities and dates.

use chrono::format::{Item, StrftimeItems};
use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::calc::round2;

const FALLBACK_DATE_FORMAT: &str = "%Y-%m-%d";

/// Format an amount as `symbol` + two fixed decimals (e.g. `$1234.50`).
///
/// With `group_thousands` the integer part gets comma separators.
pub fn format_money(symbol: &str, value: Decimal, group_thousands: bool) -> String {
    let rounded = round2(value);
    let digits = format!("{:.2}", rounded.abs());
    let digits = if group_thousands { group_digits(&digits) } else { digits };

    if rounded.is_sign_negative() && !rounded.is_zero() {
        format!("-{}{}", symbol, digits)
    } else {
        format!("{}{}", symbol, digits)
    }
}

/// Format a quantity or percentage without trailing zeros.
pub fn format_number(value: Decimal) -> String {
    round2(value).normalize().to_string()
}

/// Format a date, falling back to ISO format when `format` is not a valid
/// strftime string.
pub fn format_date(date: NaiveDate, format: &str) -> String {
    let valid = !StrftimeItems::new(format).any(|item| matches!(item, Item::Error));
    let format = if valid { format } else { FALLBACK_DATE_FORMAT };
    date.format(format).to_string()
}

fn group_digits(fixed: &str) -> String {
    let (integer_part, decimal_part) = fixed.split_once('.').unwrap_or((fixed, ""));

    let chars: Vec<char> = integer_part.chars().collect();
    let mut grouped = String::new();
    for (i, c) in chars.iter().enumerate() {
        if i > 0 && (chars.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(*c);
    }

    if decimal_part.is_empty() {
        grouped
    } else {
        format!("{}.{}", grouped, decimal_part)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_format_money() {
        assert_eq!(format_money("$", dec("205"), false), "$205.00");
        assert_eq!(format_money("₹", dec("1234567.455"), false), "₹1234567.46");
        assert_eq!(format_money("₹", dec("1234567.455"), true), "₹1,234,567.46");
        assert_eq!(format_money("€", dec("999.999"), true), "€1,000.00");
        assert_eq!(format_money("$", dec("-5"), false), "-$5.00");
        assert_eq!(format_money("", Decimal::ZERO, false), "0.00");
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(dec("2.000")), "2");
        assert_eq!(format_number(dec("12.50")), "12.5");
        assert_eq!(format_number(dec("11.889278")), "11.89");
    }

    #[test]
    fn test_format_date_with_invalid_pattern() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
        assert_eq!(format_date(date, "%d %b %Y"), "10 Jan 2024");
        assert_eq!(format_date(date, "%Q"), "2024-01-10");
    }
}
