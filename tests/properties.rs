//! Property-based tests for the time accounting and payroll calculations.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use proptest::prelude::*;
use rust_decimal::Decimal;

use hrm_payroll::calculation::{
    DEFAULT_STANDARD_HOURS, attendance_status, compute_attendance_outcome, compute_worked_time,
    count_working_days, minutes_to_hours, round2,
};
use hrm_payroll::models::{AmountType, AttendanceStatus, PayPeriod, Shift};

fn base_datetime() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 2, 3)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

fn day_shift() -> Shift {
    Shift {
        id: 1,
        employer_id: 1,
        name: "Day".to_string(),
        start_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
        end_time: NaiveTime::from_hms_opt(17, 0, 0).unwrap(),
        break_start_time: Some(NaiveTime::from_hms_opt(12, 0, 0).unwrap()),
        break_end_time: Some(NaiveTime::from_hms_opt(13, 0, 0).unwrap()),
        is_night_shift: false,
    }
}

proptest! {
    #[test]
    fn worked_plus_break_never_exceeds_span(start in 0i64..1440, length in 1i64..1440) {
        let clock_in = base_datetime() + Duration::minutes(start);
        let clock_out = clock_in + Duration::minutes(length);
        let shift = day_shift();

        let worked = compute_worked_time(Some(clock_in), Some(clock_out), Some(&shift));

        prop_assert!(worked.worked_hours >= Decimal::ZERO);
        prop_assert!(worked.break_hours >= Decimal::ZERO);
        prop_assert!(worked.break_hours <= Decimal::ONE);
        prop_assert!(worked.worked_hours + worked.break_hours <= minutes_to_hours(length) + Decimal::new(1, 2));
    }

    #[test]
    fn without_shift_worked_equals_span(start in 0i64..1440, length in 1i64..1440) {
        let clock_in = base_datetime() + Duration::minutes(start);
        let clock_out = clock_in + Duration::minutes(length);

        let worked = compute_worked_time(Some(clock_in), Some(clock_out), None);

        prop_assert_eq!(worked.worked_hours, minutes_to_hours(length));
        prop_assert_eq!(worked.break_hours, Decimal::ZERO);
    }

    #[test]
    fn overtime_is_worked_beyond_standard(length in 1i64..1440, rate in 0i64..10_000) {
        let clock_in = base_datetime() + Duration::hours(8);
        let clock_out = clock_in + Duration::minutes(length);
        let rate = Decimal::new(rate, 2);

        let outcome = compute_attendance_outcome(Some(clock_in), Some(clock_out), None, Some(rate));

        let expected = (outcome.worked_hours - DEFAULT_STANDARD_HOURS).max(Decimal::ZERO);
        prop_assert_eq!(outcome.overtime_hours, expected);
        prop_assert_eq!(outcome.overtime_amount, round2(outcome.overtime_hours * rate));
        if outcome.overtime_hours > Decimal::ZERO {
            prop_assert_eq!(outcome.status, AttendanceStatus::Present);
        }
    }

    #[test]
    fn status_is_monotonic_in_worked_hours(a in 0i64..2000, b in 0i64..2000) {
        let rank = |status: AttendanceStatus| match status {
            AttendanceStatus::Absent => 0,
            AttendanceStatus::HalfDay => 1,
            AttendanceStatus::Present => 2,
        };
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        let standard = DEFAULT_STANDARD_HOURS;

        let low_status = attendance_status(Decimal::new(low, 2), standard);
        let high_status = attendance_status(Decimal::new(high, 2), standard);
        prop_assert!(rank(low_status) <= rank(high_status));
    }

    #[test]
    fn every_weekday_counts_every_day(offset in 0i64..365, length in 0i64..90) {
        let start = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap() + Duration::days(offset);
        let end = start + Duration::days(length);
        let period = PayPeriod::new(start, end);

        let all_days = count_working_days(&[0, 1, 2, 3, 4, 5, 6], &period);
        let no_days = count_working_days(&[], &period);

        prop_assert_eq!(all_days as i64, length + 1);
        prop_assert_eq!(no_days, 0);
    }

    #[test]
    fn weekday_counts_partition_the_period(offset in 0i64..365, length in 0i64..90) {
        let start = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap() + Duration::days(offset);
        let period = PayPeriod::new(start, start + Duration::days(length));

        let weekdays = count_working_days(&[1, 2, 3, 4, 5], &period);
        let weekend = count_working_days(&[0, 6], &period);

        prop_assert_eq!((weekdays + weekend) as i64, length + 1);
    }

    #[test]
    fn full_percentage_resolves_to_basic_salary(cents in 0i64..10_000_000) {
        let basic = Decimal::new(cents, 2);

        prop_assert_eq!(AmountType::Percentage.resolve(Decimal::ONE_HUNDRED, basic), basic);
        prop_assert_eq!(AmountType::Fixed.resolve(Decimal::ONE, basic), Decimal::ONE);
    }

    #[test]
    fn round2_is_idempotent(mantissa in -1_000_000_000i64..1_000_000_000, scale in 0u32..8) {
        let value = Decimal::new(mantissa, scale);
        let rounded = round2(value);

        prop_assert!(rounded.scale() <= 2);
        prop_assert_eq!(round2(rounded), rounded);
    }
}
