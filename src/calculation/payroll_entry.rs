//! Per-employee payroll entry computation.
//!
//! This module folds an employee's allowances, deductions, loans, manual
//! overtime, attendance and approved leave for one pay period into a
//! single [`PayrollEntry`]:
//!
//! ```text
//! per_day_salary   = basic_salary / working_days
//! total_earnings   = basic_salary + allowances + manual_overtime_amount
//! leave_deductions = per_day * (unpaid_leave_days + 0.5 * half_days + absent_days)
//! gross_pay        = total_earnings - leave_deductions + attendance_overtime_amount
//! net_pay          = gross_pay - (deductions + loans)
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{
    Allowance, AmountType, AttendanceRecord, AttendanceStatus, BreakdownItem, Deduction, Employee,
    LeaveApplication, LeaveType, Loan, Overtime, PayPeriod, PaymentStatus, PayrollEntry,
};

use super::rounding::round2;

/// Fraction of a day's salary withheld for a half day.
pub const HALF_DAY_FACTOR: Decimal = Decimal::from_parts(5, 0, 0, false, 1);

/// Everything the engine needs to know about one employee for one period.
///
/// Collections may contain records outside the period or in inactive
/// states; the engine applies its own filters.
#[derive(Debug, Clone, Copy)]
pub struct EmployeePayInputs<'a> {
    /// The employee being paid.
    pub employee: &'a Employee,
    /// The employee's allowances.
    pub allowances: &'a [Allowance],
    /// The employee's deductions.
    pub deductions: &'a [Deduction],
    /// The employee's loans.
    pub loans: &'a [Loan],
    /// The employee's manual overtime grants.
    pub overtimes: &'a [Overtime],
    /// The employee's attendance records.
    pub attendance: &'a [AttendanceRecord],
    /// The employee's leave applications.
    pub leave_applications: &'a [LeaveApplication],
    /// Leave types referenced by the applications.
    pub leave_types: &'a [LeaveType],
}

/// A total with its itemised breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ComponentTotal {
    /// Sum of all items.
    pub total: Decimal,
    /// Items in insertion order; repeated names are merged.
    pub breakdown: Vec<BreakdownItem>,
}

impl ComponentTotal {
    fn add(&mut self, name: &str, amount: Decimal) {
        self.total += amount;
        match self.breakdown.iter_mut().find(|item| item.name == name) {
            Some(item) => item.amount += amount,
            None => self.breakdown.push(BreakdownItem::new(name, amount)),
        }
    }
}

/// Manual overtime folded for a period.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ManualOvertimeTotal {
    /// Sum of hours.
    pub hours: Decimal,
    /// Amounts and their breakdown.
    pub amount: ComponentTotal,
}

/// Attendance counts and overtime for a period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AttendanceSummary {
    /// Records with status present.
    pub present_days: u32,
    /// Records with status half day.
    pub half_days: u32,
    /// Records with status absent.
    pub absent_days: u32,
    /// Sum of attendance overtime hours.
    pub overtime_hours: Decimal,
    /// Overtime hours priced at the employee's hourly rate.
    pub overtime_amount: Decimal,
}

/// Approved leave days for a period, split by paid/unpaid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LeaveSummary {
    /// Days of paid leave.
    pub paid_days: i64,
    /// Days of unpaid leave.
    pub unpaid_days: i64,
}

fn resolve_components<'a>(
    items: impl Iterator<Item = (&'a str, AmountType, Decimal)>,
    basic_salary: Decimal,
) -> ComponentTotal {
    let mut result = ComponentTotal::default();
    for (name, amount_type, amount) in items {
        result.add(name, round2(amount_type.resolve(amount, basic_salary)));
    }
    result
}

/// Resolves every allowance against the basic salary.
///
/// # Examples
///
/// ```
/// use hrm_payroll::calculation::sum_allowances;
/// use hrm_payroll::models::{Allowance, AmountType};
/// use rust_decimal::Decimal;
///
/// let housing = Allowance {
///     id: 1,
///     employer_id: 1,
///     employee_id: 1,
///     type_name: "Housing".to_string(),
///     amount_type: AmountType::Percentage,
///     amount: Decimal::new(10, 0),
/// };
/// let result = sum_allowances(&[housing], Decimal::new(3000, 0));
/// assert_eq!(result.total, Decimal::new(300, 0));
/// ```
pub fn sum_allowances(allowances: &[Allowance], basic_salary: Decimal) -> ComponentTotal {
    resolve_components(
        allowances
            .iter()
            .map(|a| (a.type_name.as_str(), a.amount_type, a.amount)),
        basic_salary,
    )
}

/// Resolves every deduction against the basic salary.
pub fn sum_deductions(deductions: &[Deduction], basic_salary: Decimal) -> ComponentTotal {
    resolve_components(
        deductions
            .iter()
            .map(|d| (d.type_name.as_str(), d.amount_type, d.amount)),
        basic_salary,
    )
}

/// Resolves loans whose range overlaps the period against the basic salary.
pub fn sum_loans(loans: &[Loan], period: &PayPeriod, basic_salary: Decimal) -> ComponentTotal {
    resolve_components(
        loans
            .iter()
            .filter(|loan| loan.applies_to(period))
            .map(|loan| (loan.type_name.as_str(), loan.amount_type, loan.amount)),
        basic_salary,
    )
}

/// Sums active manual overtime overlapping the period.
pub fn sum_manual_overtime(overtimes: &[Overtime], period: &PayPeriod) -> ManualOvertimeTotal {
    let mut result = ManualOvertimeTotal::default();
    for overtime in overtimes.iter().filter(|o| o.applies_to(period)) {
        result.hours += overtime.hours;
        result.amount.add(&overtime.title, round2(overtime.amount()));
    }
    result
}

/// Counts attendance statuses and sums overtime for records dated in the period.
pub fn summarize_attendance(
    records: &[AttendanceRecord],
    period: &PayPeriod,
    rate_per_hour: Option<Decimal>,
) -> AttendanceSummary {
    let mut summary = AttendanceSummary::default();
    for record in records.iter().filter(|r| period.contains_date(r.date)) {
        match record.status {
            AttendanceStatus::Present => summary.present_days += 1,
            AttendanceStatus::HalfDay => summary.half_days += 1,
            AttendanceStatus::Absent => summary.absent_days += 1,
        }
        summary.overtime_hours += record.overtime_hours;
    }
    summary.overtime_amount = rate_per_hour
        .map(|rate| round2(summary.overtime_hours * rate))
        .unwrap_or(Decimal::ZERO);
    summary
}

/// Sums approved leave days touching the period, split by whether the type is paid.
///
/// An application counts when its start or end date lies in the period; its
/// full inclusive length is counted. An application whose leave type is
/// unknown counts as unpaid.
pub fn summarize_leave(
    applications: &[LeaveApplication],
    leave_types: &[LeaveType],
    period: &PayPeriod,
) -> LeaveSummary {
    let mut summary = LeaveSummary::default();
    for application in applications
        .iter()
        .filter(|a| a.is_approved())
        .filter(|a| period.has_endpoint_within(a.start_date, a.end_date))
    {
        let is_paid = leave_types
            .iter()
            .find(|t| t.id == application.leave_type_id)
            .is_some_and(|t| t.is_paid);
        if is_paid {
            summary.paid_days += application.leave_days();
        } else {
            summary.unpaid_days += application.leave_days();
        }
    }
    summary
}

/// Computes one employee's payroll entry for a pay period.
///
/// The returned entry has `id` 0; the store assigns the real identifier.
/// Every money field is rounded to two decimal places.
pub fn compute_payroll_entry(
    payroll_id: u64,
    inputs: &EmployeePayInputs<'_>,
    working_days: u32,
    period: &PayPeriod,
) -> PayrollEntry {
    let employee = inputs.employee;
    let basic_salary = employee.basic_salary_or_zero();
    let per_day_salary = if working_days > 0 {
        basic_salary / Decimal::from(working_days)
    } else {
        Decimal::ZERO
    };

    let allowances = sum_allowances(inputs.allowances, basic_salary);
    let deductions = sum_deductions(inputs.deductions, basic_salary);
    let loans = sum_loans(inputs.loans, period, basic_salary);
    let manual_overtime = sum_manual_overtime(inputs.overtimes, period);
    let attendance = summarize_attendance(inputs.attendance, period, employee.rate_per_hour);
    let leave = summarize_leave(inputs.leave_applications, inputs.leave_types, period);

    let total_earnings = basic_salary + allowances.total + manual_overtime.amount.total;

    let half_day_deduction =
        round2(per_day_salary * Decimal::from(attendance.half_days) * HALF_DAY_FACTOR);
    let absent_day_deduction = round2(per_day_salary * Decimal::from(attendance.absent_days));
    let unpaid_leave_deduction = round2(per_day_salary * Decimal::from(leave.unpaid_days));
    let leave_salary_deductions = unpaid_leave_deduction + half_day_deduction + absent_day_deduction;

    let total_all_deductions = deductions.total + loans.total;
    let gross_pay = total_earnings - leave_salary_deductions + attendance.overtime_amount;
    let net_pay = gross_pay - total_all_deductions;

    PayrollEntry {
        id: 0,
        payroll_id,
        employer_id: employee.employer_id,
        employee_id: employee.id,
        basic_salary: round2(basic_salary),
        per_day_salary: round2(per_day_salary),
        working_days,
        present_days: attendance.present_days,
        half_days: attendance.half_days,
        absent_days: attendance.absent_days,
        paid_leave_days: leave.paid_days,
        unpaid_leave_days: leave.unpaid_days,
        total_allowances: allowances.total,
        allowance_breakdown: allowances.breakdown,
        total_deductions: deductions.total,
        deduction_breakdown: deductions.breakdown,
        total_loans: loans.total,
        loan_breakdown: loans.breakdown,
        manual_overtime_hours: manual_overtime.hours,
        manual_overtime_amount: manual_overtime.amount.total,
        overtime_breakdown: manual_overtime.amount.breakdown,
        attendance_overtime_hours: attendance.overtime_hours,
        attendance_overtime_amount: attendance.overtime_amount,
        overtime_hours: manual_overtime.hours + attendance.overtime_hours,
        total_earnings: round2(total_earnings),
        half_day_deduction,
        absent_day_deduction,
        unpaid_leave_deduction,
        leave_salary_deductions,
        total_all_deductions,
        gross_pay: round2(gross_pay),
        net_pay: round2(net_pay),
        payment_status: PaymentStatus::Unpaid,
    }
}
