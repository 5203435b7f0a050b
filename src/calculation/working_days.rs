//! Working-day counting for a pay period.

use crate::models::{PayPeriod, is_working_weekday};

/// Counts the days in `period` (inclusive) whose weekday index is in `working_days`.
///
/// Holidays are not subtracted; only the weekday pattern is considered.
///
/// # Examples
///
/// ```
/// use hrm_payroll::calculation::count_working_days;
/// use hrm_payroll::models::PayPeriod;
/// use chrono::NaiveDate;
///
/// // January 2026 has 22 weekdays (Monday to Friday)
/// let january = PayPeriod::new(
///     NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
///     NaiveDate::from_ymd_opt(2026, 1, 31).unwrap(),
/// );
/// assert_eq!(count_working_days(&[1, 2, 3, 4, 5], &january), 22);
/// ```
pub fn count_working_days(working_days: &[u8], period: &PayPeriod) -> u32 {
    period
        .days()
        .filter(|day| is_working_weekday(working_days, *day))
        .count() as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn make_date(date_str: &str) -> NaiveDate {
        NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_full_week_monday_to_friday() {
        // 2026-01-12 (Mon) to 2026-01-18 (Sun)
        let week = PayPeriod::new(make_date("2026-01-12"), make_date("2026-01-18"));
        assert_eq!(count_working_days(&[1, 2, 3, 4, 5], &week), 5);
    }

    #[test]
    fn test_six_day_week_includes_saturday() {
        let week = PayPeriod::new(make_date("2026-01-12"), make_date("2026-01-18"));
        assert_eq!(count_working_days(&[1, 2, 3, 4, 5, 6], &week), 6);
    }

    #[test]
    fn test_weekend_only_period_has_no_working_days() {
        let weekend = PayPeriod::new(make_date("2026-01-17"), make_date("2026-01-18"));
        assert_eq!(count_working_days(&[1, 2, 3, 4, 5], &weekend), 0);
    }

    #[test]
    fn test_empty_working_day_set() {
        let week = PayPeriod::new(make_date("2026-01-12"), make_date("2026-01-18"));
        assert_eq!(count_working_days(&[], &week), 0);
    }

    #[test]
    fn test_period_spanning_month_boundary() {
        // Fri 2026-01-30 to Tue 2026-02-03
        let period = PayPeriod::new(make_date("2026-01-30"), make_date("2026-02-03"));
        assert_eq!(count_working_days(&[1, 2, 3, 4, 5], &period), 3);
    }
}
