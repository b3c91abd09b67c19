//! Display formatting for prices, amounts and market caps.

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

/// Round half away from zero and pad to exactly `dp` decimals
fn fixed(value: Decimal, dp: u32) -> String {
    let mut rounded = value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(dp);
    rounded.to_string()
}

/// Thousands separators, between `min_dp` and `max_dp` decimals
fn grouped(value: Decimal, min_dp: u32, max_dp: u32) -> String {
    let mut rounded = value
        .abs()
        .round_dp_with_strategy(max_dp, RoundingStrategy::MidpointAwayFromZero)
        .normalize();
    if rounded.scale() < min_dp {
        rounded.rescale(min_dp);
    }

    let text = rounded.to_string();
    let (int_part, frac_part) = match text.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (text.as_str(), None),
    };

    let mut out = String::with_capacity(text.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if let Some(frac) = frac_part {
        out.push('.');
        out.push_str(frac);
    }

    if value.is_sign_negative() && !rounded.is_zero() {
        format!("-{}", out)
    } else {
        out
    }
}

fn dollars(value: Decimal, body: String) -> String {
    match body.strip_prefix('-') {
        Some(rest) if value.is_sign_negative() => format!("-${}", rest),
        _ => format!("${}", body),
    }
}

/// `$0.485000`, `$98.23`, `$42,350.45`
pub fn format_price(price: Decimal) -> String {
    let magnitude = price.abs();
    let body = if magnitude < Decimal::ONE {
        fixed(price, 6)
    } else if magnitude < Decimal::ONE_HUNDRED {
        fixed(price, 2)
    } else {
        grouped(price, 2, 2)
    };
    dollars(price, body)
}

/// Coin quantities: six decimals below one, otherwise 2 to 6 with separators
pub fn format_amount(amount: Decimal) -> String {
    if amount.abs() < Decimal::ONE {
        fixed(amount, 6)
    } else {
        grouped(amount, 2, 6)
    }
}

/// `$828.00B`, `$1.20T`, `$650.00M`
pub fn format_market_cap(market_cap: Decimal) -> String {
    const TRILLION: Decimal = dec!(1000000000000);
    const BILLION: Decimal = dec!(1000000000);
    const MILLION: Decimal = dec!(1000000);

    if market_cap >= TRILLION {
        format!("${}T", fixed(market_cap / TRILLION, 2))
    } else if market_cap >= BILLION {
        format!("${}B", fixed(market_cap / BILLION, 2))
    } else if market_cap >= MILLION {
        format!("${}M", fixed(market_cap / MILLION, 2))
    } else {
        dollars(market_cap, grouped(market_cap, 0, 3))
    }
}

/// Signed percentage with two decimals, e.g. `+3.04%`
pub fn format_percent(percent: Decimal) -> String {
    if percent.is_sign_negative() {
        format!("{}%", fixed(percent, 2))
    } else {
        format!("+{}%", fixed(percent, 2))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_price_tiers() {
        assert_eq!(format_price(dec!(0.485)), "$0.485000");
        assert_eq!(format_price(dec!(98.235)), "$98.24");
        assert_eq!(format_price(dec!(42350.45)), "$42,350.45");
        assert_eq!(format_price(dec!(1234567.891)), "$1,234,567.89");
        assert_eq!(format_price(dec!(100)), "$100.00");
        assert_eq!(format_price(dec!(-1250.3)), "-$1,250.30");
    }

    #[test]
    fn test_amounts() {
        assert_eq!(format_amount(dec!(0.1)), "0.100000");
        assert_eq!(format_amount(dec!(1.5)), "1.50");
        assert_eq!(format_amount(dec!(12345.1234567)), "12,345.123457");
    }

    #[test]
    fn test_market_cap_suffixes() {
        assert_eq!(format_market_cap(dec!(1200000000000)), "$1.20T");
        assert_eq!(format_market_cap(dec!(828000000000)), "$828.00B");
        assert_eq!(format_market_cap(dec!(650000000)), "$650.00M");
        assert_eq!(format_market_cap(dec!(950000)), "$950,000");
    }

    #[test]
    fn test_percent_sign() {
        assert_eq!(format_percent(dec!(3.04)), "+3.04%");
        assert_eq!(format_percent(dec!(-1.72)), "-1.72%");
        assert_eq!(format_percent(Decimal::ZERO), "+0.00%");
    }
}
