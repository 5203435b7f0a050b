//! Calculation logic for the HRM payroll engine.
//!
//! This module contains the pure computations: attendance time accounting
//! (worked and break hours, standard shift hours, overtime and status),
//! working-day counting, per-employee payroll entry computation, and
//! payroll totals aggregation. None of it touches storage.

mod payroll_entry;
mod payroll_totals;
mod rounding;
mod time_accounting;
mod working_days;

pub use payroll_entry::{
    AttendanceSummary, ComponentTotal, EmployeePayInputs, HALF_DAY_FACTOR, LeaveSummary,
    ManualOvertimeTotal, compute_payroll_entry, sum_allowances, sum_deductions, sum_loans,
    sum_manual_overtime, summarize_attendance, summarize_leave,
};
pub use payroll_totals::{payroll_payment_status, sum_payroll_totals};
pub use rounding::{DECIMAL_PLACES, minutes_to_hours, round2};
pub use time_accounting::{
    AttendanceOutcome, DEFAULT_STANDARD_HOURS, WorkedTime, attendance_status,
    compute_attendance_outcome, compute_worked_time, outcome_from_worked_time,
    standard_shift_hours,
};
pub use working_days::count_working_days;
