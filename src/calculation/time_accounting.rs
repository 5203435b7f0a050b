//! Attendance time accounting.
//!
//! This module converts a clock-in/clock-out pair and the employee's shift
//! into worked hours, deducted break hours, overtime and an attendance
//! status. It runs at clock-out (and on manual edits); payroll later sums
//! the persisted results.

use chrono::{Duration, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{AttendanceStatus, Shift};

use super::rounding::{minutes_to_hours, round2};

/// Standard working hours used when no shift is assigned or the shift's
/// net length is not positive.
pub const DEFAULT_STANDARD_HOURS: Decimal = Decimal::from_parts(8, 0, 0, false, 0);

/// Worked and break hours for one clock interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkedTime {
    /// Hours worked after break deduction.
    pub worked_hours: Decimal,
    /// Break hours deducted.
    pub break_hours: Decimal,
}

impl WorkedTime {
    /// No time worked and no break deducted.
    pub const ZERO: WorkedTime = WorkedTime {
        worked_hours: Decimal::ZERO,
        break_hours: Decimal::ZERO,
    };
}

/// The full time-accounting result for one attendance record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceOutcome {
    /// Hours worked after break deduction.
    pub worked_hours: Decimal,
    /// Break hours deducted.
    pub break_hours: Decimal,
    /// Hours beyond the standard shift hours.
    pub overtime_hours: Decimal,
    /// Overtime hours priced at the hourly rate.
    pub overtime_amount: Decimal,
    /// Attendance classification.
    pub status: AttendanceStatus,
}

/// How a clock interval relates to the shift's break window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BreakPolicy {
    /// Worked through the whole break: deduct all of it.
    Straddles,
    /// Left during the break: deduct break start to clock-out.
    LeftDuringBreak,
    /// Arrived during the break: deduct clock-in to break end.
    ArrivedDuringBreak,
    /// Clocked in and out inside the break: nothing deducted.
    InsideBreak,
    /// No break configured or no intersection.
    NoOverlap,
}

fn classify_break(
    clock_in: NaiveDateTime,
    clock_out: NaiveDateTime,
    break_start: NaiveDateTime,
    break_end: NaiveDateTime,
) -> BreakPolicy {
    if clock_in <= break_start && clock_out >= break_end {
        BreakPolicy::Straddles
    } else if clock_in <= break_start && clock_out > break_start && clock_out <= break_end {
        BreakPolicy::LeftDuringBreak
    } else if clock_in > break_start && clock_in < break_end && clock_out >= break_end {
        BreakPolicy::ArrivedDuringBreak
    } else if clock_in > break_start && clock_out < break_end {
        BreakPolicy::InsideBreak
    } else {
        BreakPolicy::NoOverlap
    }
}

/// Computes worked and break hours for a clock interval.
///
/// A clock-out earlier than the clock-in is treated as falling on the next
/// day. The shift's break window is deducted according to how the interval
/// meets it:
///
/// 1. Interval covers the whole break: the full break is deducted.
/// 2. Clock-out inside the break: break start to clock-out is deducted.
/// 3. Clock-in inside the break: clock-in to break end is deducted.
/// 4. Interval entirely inside the break: nothing is deducted.
///
/// Both results are rounded to two decimal places; worked hours are never
/// negative. Missing clock-in or clock-out yields zero for both.
///
/// # Examples
///
/// ```
/// use hrm_payroll::calculation::compute_worked_time;
/// use chrono::NaiveDateTime;
/// use rust_decimal::Decimal;
///
/// let clock_in = NaiveDateTime::parse_from_str("2026-01-15 22:00", "%Y-%m-%d %H:%M").unwrap();
/// let clock_out = NaiveDateTime::parse_from_str("2026-01-15 06:00", "%Y-%m-%d %H:%M").unwrap();
///
/// // Night shift with no break: the clock-out rolls to the next morning
/// let worked = compute_worked_time(Some(clock_in), Some(clock_out), None);
/// assert_eq!(worked.worked_hours, Decimal::new(8, 0));
/// assert_eq!(worked.break_hours, Decimal::ZERO);
/// ```
pub fn compute_worked_time(
    clock_in: Option<NaiveDateTime>,
    clock_out: Option<NaiveDateTime>,
    shift: Option<&Shift>,
) -> WorkedTime {
    let (Some(clock_in), Some(mut clock_out)) = (clock_in, clock_out) else {
        return WorkedTime::ZERO;
    };

    if clock_out < clock_in {
        clock_out += Duration::days(1);
    }

    let span_minutes = (clock_out - clock_in).num_minutes().abs();

    let break_minutes = match shift.and_then(|s| s.break_window_for(clock_in, clock_out)) {
        Some((break_start, break_end)) => {
            match classify_break(clock_in, clock_out, break_start, break_end) {
                BreakPolicy::Straddles => (break_end - break_start).num_minutes(),
                BreakPolicy::LeftDuringBreak => (clock_out - break_start).num_minutes(),
                BreakPolicy::ArrivedDuringBreak => (break_end - clock_in).num_minutes(),
                BreakPolicy::InsideBreak | BreakPolicy::NoOverlap => 0,
            }
        }
        None => 0,
    };

    let worked_minutes = (span_minutes - break_minutes).max(0);

    WorkedTime {
        worked_hours: minutes_to_hours(worked_minutes),
        break_hours: minutes_to_hours(break_minutes),
    }
}

/// Returns the standard working hours of a shift.
///
/// Shift length (rolled over midnight when the end precedes the start)
/// minus its break, rounded to two decimal places. Falls back to
/// [`DEFAULT_STANDARD_HOURS`] when there is no shift or the result is not
/// positive.
///
/// # Examples
///
/// ```
/// use hrm_payroll::calculation::{standard_shift_hours, DEFAULT_STANDARD_HOURS};
///
/// assert_eq!(standard_shift_hours(None), DEFAULT_STANDARD_HOURS);
/// ```
pub fn standard_shift_hours(shift: Option<&Shift>) -> Decimal {
    let Some(shift) = shift else {
        return DEFAULT_STANDARD_HOURS;
    };

    let net_minutes = (shift.span_minutes() - shift.break_minutes()).max(0);
    let hours = minutes_to_hours(net_minutes);

    if hours <= Decimal::ZERO {
        DEFAULT_STANDARD_HOURS
    } else {
        hours
    }
}

/// Classifies worked hours against the standard hours.
///
/// Zero hours is absent; at least the standard hours is present; at least
/// half of them is a half day; anything less is absent.
pub fn attendance_status(worked_hours: Decimal, standard_hours: Decimal) -> AttendanceStatus {
    if worked_hours <= Decimal::ZERO {
        AttendanceStatus::Absent
    } else if worked_hours >= standard_hours {
        AttendanceStatus::Present
    } else if worked_hours >= standard_hours / Decimal::TWO {
        AttendanceStatus::HalfDay
    } else {
        AttendanceStatus::Absent
    }
}

/// Derives overtime and status from already-computed worked time.
///
/// Shared by [`compute_attendance_outcome`] and manual entries that supply
/// their own break hours.
pub fn outcome_from_worked_time(
    worked: WorkedTime,
    standard_hours: Decimal,
    hourly_rate: Option<Decimal>,
) -> AttendanceOutcome {
    let overtime_hours = round2(worked.worked_hours - standard_hours).max(Decimal::ZERO);

    let overtime_amount = match hourly_rate {
        Some(rate) if overtime_hours > Decimal::ZERO => round2(overtime_hours * rate),
        _ => Decimal::ZERO,
    };

    AttendanceOutcome {
        worked_hours: worked.worked_hours,
        break_hours: worked.break_hours,
        overtime_hours,
        overtime_amount,
        status: attendance_status(worked.worked_hours, standard_hours),
    }
}

/// Computes the full attendance outcome for a clock interval.
///
/// # Examples
///
/// ```
/// use hrm_payroll::calculation::compute_attendance_outcome;
/// use hrm_payroll::models::AttendanceStatus;
/// use chrono::NaiveDateTime;
/// use rust_decimal::Decimal;
///
/// let clock_in = NaiveDateTime::parse_from_str("2026-01-15 08:00", "%Y-%m-%d %H:%M").unwrap();
/// let clock_out = NaiveDateTime::parse_from_str("2026-01-15 18:00", "%Y-%m-%d %H:%M").unwrap();
///
/// let outcome = compute_attendance_outcome(
///     Some(clock_in),
///     Some(clock_out),
///     None,
///     Some(Decimal::new(15, 0)),
/// );
/// assert_eq!(outcome.overtime_hours, Decimal::new(2, 0));
/// assert_eq!(outcome.overtime_amount, Decimal::new(30, 0));
/// assert_eq!(outcome.status, AttendanceStatus::Present);
/// ```
pub fn compute_attendance_outcome(
    clock_in: Option<NaiveDateTime>,
    clock_out: Option<NaiveDateTime>,
    shift: Option<&Shift>,
    hourly_rate: Option<Decimal>,
) -> AttendanceOutcome {
    let worked = compute_worked_time(clock_in, clock_out, shift);
    outcome_from_worked_time(worked, standard_shift_hours(shift), hourly_rate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn time(s: &str) -> NaiveTime {
        NaiveTime::parse_from_str(s, "%H:%M").unwrap()
    }

    fn at(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(&format!("2026-01-15 {}", s), "%Y-%m-%d %H:%M").unwrap()
    }

    fn shift_with_break(start: &str, end: &str, break_start: &str, break_end: &str) -> Shift {
        Shift {
            id: 1,
            employer_id: 1,
            name: "Test".to_string(),
            start_time: time(start),
            end_time: time(end),
            break_start_time: Some(time(break_start)),
            break_end_time: Some(time(break_end)),
            is_night_shift: false,
        }
    }

    fn office_shift() -> Shift {
        shift_with_break("09:00", "17:00", "12:00", "13:00")
    }

    fn worked(clock_in: &str, clock_out: &str, shift: Option<&Shift>) -> WorkedTime {
        compute_worked_time(Some(at(clock_in)), Some(at(clock_out)), shift)
    }

    // ==========================================================================
    // TA-001: no shift means no break deduction
    // ==========================================================================
    #[test]
    fn test_ta_001_no_shift_full_span() {
        let result = worked("09:00", "17:30", None);
        assert_eq!(result.worked_hours, dec("8.5"));
        assert_eq!(result.break_hours, Decimal::ZERO);
    }

    // ==========================================================================
    // TA-002: missing clock-out yields zero
    // ==========================================================================
    #[test]
    fn test_ta_002_missing_clock_out() {
        let result = compute_worked_time(Some(at("09:00")), None, Some(&office_shift()));
        assert_eq!(result, WorkedTime::ZERO);

        let result = compute_worked_time(None, Some(at("17:00")), None);
        assert_eq!(result, WorkedTime::ZERO);
    }

    // ==========================================================================
    // TA-003: straddling the break deducts the whole break
    // ==========================================================================
    #[test]
    fn test_ta_003_straddles_break() {
        let result = worked("09:00", "17:00", Some(&office_shift()));
        assert_eq!(result.break_hours, dec("1.0"));
        assert_eq!(result.worked_hours, dec("7.0"));
    }

    // ==========================================================================
    // TA-004: leaving during the break deducts break start to clock-out
    // ==========================================================================
    #[test]
    fn test_ta_004_left_during_break() {
        let result = worked("09:00", "12:30", Some(&office_shift()));
        assert_eq!(result.break_hours, dec("0.5"));
        assert_eq!(result.worked_hours, dec("3.0"));
    }

    #[test]
    fn test_ta_004b_left_exactly_at_break_end_is_full_break() {
        let result = worked("09:00", "13:00", Some(&office_shift()));
        assert_eq!(result.break_hours, dec("1.0"));
        assert_eq!(result.worked_hours, dec("3.0"));
    }

    // ==========================================================================
    // TA-005: arriving during the break deducts clock-in to break end
    // ==========================================================================
    #[test]
    fn test_ta_005_arrived_during_break() {
        let result = worked("12:15", "17:00", Some(&office_shift()));
        assert_eq!(result.break_hours, dec("0.75"));
        assert_eq!(result.worked_hours, dec("4.0"));
    }

    // ==========================================================================
    // TA-006: interval inside the break deducts nothing
    // ==========================================================================
    #[test]
    fn test_ta_006_inside_break() {
        let result = worked("12:10", "12:40", Some(&office_shift()));
        assert_eq!(result.break_hours, Decimal::ZERO);
        assert_eq!(result.worked_hours, dec("0.5"));
    }

    // ==========================================================================
    // TA-007: interval entirely before or after the break
    // ==========================================================================
    #[test]
    fn test_ta_007_no_intersection() {
        let morning = worked("08:00", "11:00", Some(&office_shift()));
        assert_eq!(morning.break_hours, Decimal::ZERO);
        assert_eq!(morning.worked_hours, dec("3.0"));

        let afternoon = worked("13:30", "17:00", Some(&office_shift()));
        assert_eq!(afternoon.break_hours, Decimal::ZERO);
        assert_eq!(afternoon.worked_hours, dec("3.5"));
    }

    // ==========================================================================
    // TA-008: night shift rolls the clock-out to the next day
    // ==========================================================================
    #[test]
    fn test_ta_008_night_rollover_no_break() {
        let result = worked("22:00", "06:00", None);
        assert_eq!(result.worked_hours, dec("8.0"));
    }

    #[test]
    fn test_ta_008b_night_shift_break_after_midnight() {
        let mut shift = shift_with_break("22:00", "06:00", "02:00", "02:30");
        shift.is_night_shift = true;

        let result = worked("22:00", "06:00", Some(&shift));
        assert_eq!(result.break_hours, dec("0.5"));
        assert_eq!(result.worked_hours, dec("7.5"));
    }

    #[test]
    fn test_ta_008b_late_arrival_during_break_before_midnight() {
        let mut shift = shift_with_break("22:00", "06:00", "23:00", "23:30");
        shift.is_night_shift = true;

        let result = worked("23:10", "06:00", Some(&shift));
        assert_eq!(result.break_hours, dec("0.33"));
        assert_eq!(result.worked_hours, dec("6.5"));
    }

    #[test]
    fn test_ta_008c_break_crossing_midnight() {
        let mut shift = shift_with_break("20:00", "04:00", "23:30", "00:30");
        shift.is_night_shift = true;

        let result = worked("20:00", "04:00", Some(&shift));
        assert_eq!(result.break_hours, dec("1.0"));
        assert_eq!(result.worked_hours, dec("7.0"));
    }

    #[test]
    fn test_fractional_minutes_round_to_two_places() {
        let result = worked("09:00", "09:20", None);
        assert_eq!(result.worked_hours, dec("0.33"));
    }

    // ==========================================================================
    // SSH: standard shift hours
    // ==========================================================================
    #[test]
    fn test_standard_hours_subtracts_break() {
        assert_eq!(standard_shift_hours(Some(&office_shift())), dec("7.0"));
    }

    #[test]
    fn test_standard_hours_night_shift() {
        let mut shift = shift_with_break("22:00", "06:00", "02:00", "02:30");
        shift.is_night_shift = true;
        assert_eq!(standard_shift_hours(Some(&shift)), dec("7.5"));
    }

    #[test]
    fn test_standard_hours_default_without_shift() {
        assert_eq!(standard_shift_hours(None), dec("8"));
    }

    #[test]
    fn test_standard_hours_default_when_not_positive() {
        let shift = shift_with_break("09:00", "10:00", "09:00", "10:00");
        assert_eq!(standard_shift_hours(Some(&shift)), dec("8"));

        let zero_length = Shift {
            break_start_time: None,
            break_end_time: None,
            ..shift_with_break("09:00", "09:00", "09:00", "09:00")
        };
        assert_eq!(standard_shift_hours(Some(&zero_length)), dec("8"));
    }

    // ==========================================================================
    // STATUS: classification against standard hours of 8
    // ==========================================================================
    #[test]
    fn test_status_classification() {
        let standard = dec("8");
        assert_eq!(attendance_status(dec("8"), standard), AttendanceStatus::Present);
        assert_eq!(attendance_status(dec("9.5"), standard), AttendanceStatus::Present);
        assert_eq!(attendance_status(dec("4"), standard), AttendanceStatus::HalfDay);
        assert_eq!(attendance_status(dec("7.99"), standard), AttendanceStatus::HalfDay);
        assert_eq!(attendance_status(dec("3.9"), standard), AttendanceStatus::Absent);
        assert_eq!(attendance_status(Decimal::ZERO, standard), AttendanceStatus::Absent);
    }

    // ==========================================================================
    // OT: overtime derivation
    // ==========================================================================
    #[test]
    fn test_overtime_with_rate() {
        let outcome = compute_attendance_outcome(
            Some(at("08:00")),
            Some(at("18:00")),
            None,
            Some(dec("15")),
        );
        assert_eq!(outcome.worked_hours, dec("10"));
        assert_eq!(outcome.overtime_hours, dec("2.0"));
        assert_eq!(outcome.overtime_amount, dec("30.0"));
        assert_eq!(outcome.status, AttendanceStatus::Present);
    }

    #[test]
    fn test_overtime_without_rate_has_no_amount() {
        let outcome =
            compute_attendance_outcome(Some(at("08:00")), Some(at("18:00")), None, None);
        assert_eq!(outcome.overtime_hours, dec("2"));
        assert_eq!(outcome.overtime_amount, Decimal::ZERO);
    }

    #[test]
    fn test_short_day_has_no_overtime() {
        let outcome = compute_attendance_outcome(
            Some(at("09:00")),
            Some(at("13:00")),
            None,
            Some(dec("15")),
        );
        assert_eq!(outcome.overtime_hours, Decimal::ZERO);
        assert_eq!(outcome.overtime_amount, Decimal::ZERO);
        assert_eq!(outcome.status, AttendanceStatus::HalfDay);
    }

    #[test]
    fn test_outcome_uses_shift_standard_hours() {
        // 7 standard hours; 08:00-18:00 with a 1h break is 9h worked
        let outcome = compute_attendance_outcome(
            Some(at("08:00")),
            Some(at("18:00")),
            Some(&office_shift()),
            Some(dec("20")),
        );
        assert_eq!(outcome.worked_hours, dec("9"));
        assert_eq!(outcome.break_hours, dec("1"));
        assert_eq!(outcome.overtime_hours, dec("2"));
        assert_eq!(outcome.overtime_amount, dec("40"));
    }

    #[test]
    fn test_outcome_for_missing_times_is_absent() {
        let outcome = compute_attendance_outcome(Some(at("08:00")), None, None, Some(dec("15")));
        assert_eq!(outcome.worked_hours, Decimal::ZERO);
        assert_eq!(outcome.status, AttendanceStatus::Absent);
    }
}
