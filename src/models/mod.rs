//! Core data models for the HRM payroll engine.
//!
//! These are the records the engines consume from, and emit back to, the
//! surrounding HRM application.

mod attendance;
mod compensation;
mod employee;
mod leave;
mod pay_period;
mod payroll;
mod settings;
mod shift;

pub use attendance::{AttendanceRecord, AttendanceStatus};
pub use compensation::{Allowance, AmountType, Deduction, Loan, Overtime, OvertimeStatus};
pub use employee::Employee;
pub use leave::{LeaveApplication, LeaveStatus, LeaveType, leave_days};
pub use pay_period::PayPeriod;
pub use payroll::{
    BreakdownItem, PaymentStatus, Payroll, PayrollEntry, PayrollFrequency, PayrollStatus,
    PayrollTotals,
};
pub use settings::{EmployerSettings, Holiday, is_working_weekday, weekday_index};
pub use shift::Shift;
