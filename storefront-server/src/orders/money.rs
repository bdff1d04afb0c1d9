//! Money calculation utilities using rust_decimal for precision
//!
//! Amounts are stored as `f64`; every sum is computed in `Decimal` and
//! rounded to cents on the way back.

use rust_decimal::prelude::*;

/// Rounding strategy for monetary values (2 decimal places, half away from zero)
const DECIMAL_PLACES: u32 = 2;

/// Tolerance for monetary comparisons (0.01)
pub const MONEY_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Maximum allowed quantity per line
pub const MAX_QUANTITY: i32 = 9999;

/// Maximum allowed price per line or ingredient
pub const MAX_PRICE: f64 = 1_000_000.0;

#[inline]
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_default()
}

/// Convert Decimal back to f64 for storage, rounded to 2 decimal places
#[inline]
pub fn to_f64(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or_default()
}

/// Price of one line: `unit × quantity` plus the flat price of each added ingredient
pub fn line_total(unit_price: f64, quantity: i32, ingredient_prices: &[f64]) -> Decimal {
    let base = to_decimal(unit_price) * Decimal::from(quantity);
    ingredient_prices
        .iter()
        .fold(base, |acc, price| acc + to_decimal(*price))
}

/// Two amounts are equal when they differ by at most one cent
pub fn money_eq(a: f64, b: f64) -> bool {
    let diff = (to_decimal(a) - to_decimal(b)).abs();
    diff <= MONEY_TOLERANCE
}

/// A price must be finite, non-negative and below [`MAX_PRICE`]
pub fn is_valid_price(value: f64) -> bool {
    value.is_finite() && (0.0..=MAX_PRICE).contains(&value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_total_avoids_float_drift() {
        // 0.1 * 3 + 0.2 is 0.5 exactly, not 0.5000000000000001
        let total = line_total(0.1, 3, &[0.2]);
        assert_eq!(to_f64(total), 0.5);
    }

    #[test]
    fn test_ingredients_not_multiplied_by_quantity() {
        let total = line_total(10.0, 2, &[1.5, 2.0]);
        assert_eq!(to_f64(total), 23.5);
    }

    #[test]
    fn test_rounding() {
        assert_eq!(to_f64(Decimal::new(1005, 3)), 1.01);
        assert_eq!(to_f64(Decimal::new(2344, 3)), 2.34);
    }

    #[test]
    fn test_money_eq() {
        assert!(money_eq(10.0, 10.01));
        assert!(money_eq(10.0, 9.99));
        assert!(!money_eq(10.0, 10.02));
    }

    #[test]
    fn test_valid_price() {
        assert!(is_valid_price(0.0));
        assert!(is_valid_price(12.5));
        assert!(!is_valid_price(-0.01));
        assert!(!is_valid_price(f64::NAN));
        assert!(!is_valid_price(f64::INFINITY));
    }
}
