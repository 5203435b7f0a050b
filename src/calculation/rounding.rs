//! Decimal rounding helpers.
//!
//! Every computed money or hour value is rounded to two decimal places,
//! half away from zero.

use rust_decimal::{Decimal, RoundingStrategy};

/// Decimal places kept on computed money and hour values.
pub const DECIMAL_PLACES: u32 = 2;

/// Rounds to two decimal places, half away from zero.
///
/// # Examples
///
/// ```
/// use hrm_payroll::calculation::round2;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// assert_eq!(round2(Decimal::from_str("2.345").unwrap()), Decimal::from_str("2.35").unwrap());
/// assert_eq!(round2(Decimal::from_str("-2.345").unwrap()), Decimal::from_str("-2.35").unwrap());
/// ```
pub fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// Converts whole minutes to hours rounded to two decimal places.
pub fn minutes_to_hours(minutes: i64) -> Decimal {
    round2(Decimal::from(minutes) / Decimal::from(60))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_midpoint_rounds_away_from_zero() {
        assert_eq!(round2(dec("0.125")), dec("0.13"));
        assert_eq!(round2(dec("0.135")), dec("0.14"));
    }

    #[test]
    fn test_minutes_to_hours() {
        assert_eq!(minutes_to_hours(90), dec("1.5"));
        assert_eq!(minutes_to_hours(20), dec("0.33"));
        assert_eq!(minutes_to_hours(0), Decimal::ZERO);
    }
}
