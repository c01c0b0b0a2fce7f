//! Display formatting for prices, market caps and percentages

use crate::types::Currency;

/// Groups the integer part of a decimal string with commas
fn group_thousands(digits: &str) -> String {
    let (int_part, frac_part) = match digits.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (digits, None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    match frac_part {
        Some(f) => format!("{}.{}", grouped, f),
        None => grouped,
    }
}

/// Fraction digits for a price: more for sub-unit coins
fn price_decimals(value: f64) -> usize {
    let abs = value.abs();
    if abs == 0.0 || abs >= 1.0 {
        2
    } else if abs >= 0.01 {
        4
    } else {
        8
    }
}

/// `$64,123.45`, `-€0.0421`, `¥1,234.00`
pub fn format_price(value: f64, currency: Currency) -> String {
    if !value.is_finite() {
        return "N/A".to_string();
    }
    let body = group_thousands(&format!("{:.*}", price_decimals(value), value.abs()));
    let sign = if value < 0.0 { "-" } else { "" };
    format!("{}{}{}", sign, currency.symbol(), body)
}

/// Compact notation with one fraction digit: `$1.3T`, `$45.2B`, `€980.0K`
pub fn format_compact(value: f64, currency: Currency) -> String {
    if !value.is_finite() {
        return "N/A".to_string();
    }
    let sign = if value < 0.0 { "-" } else { "" };
    format!("{}{}{}", sign, currency.symbol(), compact_number(value.abs()))
}

/// Compact notation without a currency: `19.7M`, `1.2B`
pub fn compact_number(value: f64) -> String {
    const UNITS: [(f64, &str); 4] = [(1e12, "T"), (1e9, "B"), (1e6, "M"), (1e3, "K")];
    for (scale, suffix) in UNITS {
        if value.abs() >= scale {
            return format!("{:.1}{}", value / scale, suffix);
        }
    }
    format!("{:.1}", value)
}

/// Signed percentage with two decimals: `+2.35%`, `-0.10%`
pub fn format_percent(value: f64) -> String {
    if !value.is_finite() {
        return "0.00%".to_string();
    }
    if value >= 0.0 {
        format!("+{:.2}%", value)
    } else {
        format!("{:.2}%", value)
    }
}

/// Circulating supply in millions: `19.7M`
pub fn format_supply(value: f64) -> String {
    format!("{:.1}M", value / 1e6)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prices_are_grouped_with_symbol() {
        assert_eq!(format_price(64123.456, Currency::Usd), "$64,123.46");
        assert_eq!(format_price(1_234_567.0, Currency::Eur), "€1,234,567.00");
        assert_eq!(format_price(999.0, Currency::Gbp), "£999.00");
        assert_eq!(format_price(0.0421, Currency::Usd), "$0.0421");
        assert_eq!(format_price(0.00001234, Currency::Usd), "$0.00001234");
        assert_eq!(format_price(-12.5, Currency::Cad), "-CA$12.50");
        assert_eq!(format_price(f64::NAN, Currency::Usd), "N/A");
    }

    #[test]
    fn compact_values() {
        assert_eq!(format_compact(1.26e12, Currency::Usd), "$1.3T");
        assert_eq!(format_compact(45_200_000_000.0, Currency::Inr), "₹45.2B");
        assert_eq!(format_compact(980_000.0, Currency::Eur), "€980.0K");
        assert_eq!(format_compact(12.0, Currency::Usd), "$12.0");
        assert_eq!(compact_number(19_700_000.0), "19.7M");
    }

    #[test]
    fn percentages_carry_sign() {
        assert_eq!(format_percent(2.346), "+2.35%");
        assert_eq!(format_percent(-0.1), "-0.10%");
        assert_eq!(format_percent(0.0), "+0.00%");
    }

    #[test]
    fn supply_in_millions() {
        assert_eq!(format_supply(19_700_000.0), "19.7M");
        assert_eq!(format_supply(120_000_000_000.0), "120000.0M");
    }
}
