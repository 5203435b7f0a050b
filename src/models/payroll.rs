//! Payroll and payroll entry models.
//!
//! This module contains the [`Payroll`] batch, the per-employee
//! [`PayrollEntry`] payslip it produces, and the named-amount
//! [`BreakdownItem`] lines that itemise allowances, deductions, loans and
//! manual overtime on an entry.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::PayPeriod;

/// Processing state of a payroll run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayrollStatus {
    /// Created but not yet (successfully) run.
    Draft,
    /// A run is in progress.
    Processing,
    /// The last run finished.
    Completed,
}

/// Payment state of a payroll or a single entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    /// Not yet paid out.
    #[default]
    Unpaid,
    /// Paid out.
    Paid,
}

/// How often a payroll is issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayrollFrequency {
    /// Every week.
    Weekly,
    /// Every two weeks.
    BiWeekly,
    /// Every month.
    Monthly,
}

/// One pay-period batch producing an entry for each employee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payroll {
    /// Unique identifier.
    pub id: u64,
    /// The employer context.
    pub employer_id: u64,
    /// Display title (e.g., "January 2026").
    pub title: String,
    /// Issue frequency.
    pub frequency: PayrollFrequency,
    /// First day of the pay period (inclusive).
    pub pay_period_start: NaiveDate,
    /// Last day of the pay period (inclusive).
    pub pay_period_end: NaiveDate,
    /// The date employees are paid.
    pub pay_date: NaiveDate,
    /// Processing state.
    pub status: PayrollStatus,
    /// `Paid` once every entry is paid.
    pub is_payroll_paid: PaymentStatus,
    /// Sum of entry gross pay.
    pub total_gross_pay: Decimal,
    /// Sum of each entry's `total_all_deductions` (deductions plus loans).
    ///
    /// Not the sum of the entries' `total_deductions`, which excludes loans.
    pub total_deductions: Decimal,
    /// Sum of entry net pay.
    pub total_net_pay: Decimal,
    /// Number of entries.
    pub employee_count: u32,
}

impl Payroll {
    /// Returns the pay period covered by this payroll.
    pub fn period(&self) -> PayPeriod {
        PayPeriod::new(self.pay_period_start, self.pay_period_end)
    }

    /// Replaces the aggregate totals.
    pub fn apply_totals(&mut self, totals: &PayrollTotals) {
        self.total_gross_pay = totals.gross_pay;
        self.total_deductions = totals.deductions;
        self.total_net_pay = totals.net_pay;
        self.employee_count = totals.employee_count;
    }
}

/// Aggregate totals over a set of payroll entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PayrollTotals {
    /// Sum of gross pay.
    pub gross_pay: Decimal,
    /// Sum of deductions including loans.
    pub deductions: Decimal,
    /// Sum of net pay.
    pub net_pay: Decimal,
    /// Number of entries summed.
    pub employee_count: u32,
}

/// A named amount on a payslip breakdown.
///
/// # Example
///
/// ```
/// use hrm_payroll::models::BreakdownItem;
/// use rust_decimal::Decimal;
///
/// let item = BreakdownItem::new("Housing", Decimal::new(200, 0));
/// assert_eq!(item.name, "Housing");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakdownItem {
    /// Type name or title.
    pub name: String,
    /// Resolved amount.
    pub amount: Decimal,
}

impl BreakdownItem {
    /// Creates a breakdown line.
    pub fn new(name: impl Into<String>, amount: Decimal) -> Self {
        Self {
            name: name.into(),
            amount,
        }
    }
}

/// One employee's computed payslip for one payroll.
///
/// Immutable once created apart from `payment_status`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollEntry {
    /// Unique identifier.
    pub id: u64,
    /// The parent payroll.
    pub payroll_id: u64,
    /// The employer context.
    pub employer_id: u64,
    /// The employee paid.
    pub employee_id: u64,
    /// Basic salary for the period.
    pub basic_salary: Decimal,
    /// Basic salary divided by working days.
    pub per_day_salary: Decimal,
    /// Working days in the period.
    pub working_days: u32,
    /// Attendance records with status present.
    pub present_days: u32,
    /// Attendance records with status half day.
    pub half_days: u32,
    /// Attendance records with status absent.
    pub absent_days: u32,
    /// Approved paid leave days.
    pub paid_leave_days: i64,
    /// Approved unpaid leave days.
    pub unpaid_leave_days: i64,
    /// Sum of allowances.
    pub total_allowances: Decimal,
    /// Itemised allowances.
    pub allowance_breakdown: Vec<BreakdownItem>,
    /// Sum of deductions (excluding loans).
    pub total_deductions: Decimal,
    /// Itemised deductions.
    pub deduction_breakdown: Vec<BreakdownItem>,
    /// Sum of loan repayments.
    pub total_loans: Decimal,
    /// Itemised loan repayments.
    pub loan_breakdown: Vec<BreakdownItem>,
    /// Manual overtime hours.
    pub manual_overtime_hours: Decimal,
    /// Sum of manual overtime amounts.
    pub manual_overtime_amount: Decimal,
    /// Itemised manual overtime.
    pub overtime_breakdown: Vec<BreakdownItem>,
    /// Overtime hours derived from attendance.
    pub attendance_overtime_hours: Decimal,
    /// Attendance overtime hours priced at the hourly rate.
    pub attendance_overtime_amount: Decimal,
    /// Manual plus attendance overtime hours.
    pub overtime_hours: Decimal,
    /// Basic salary plus allowances plus manual overtime.
    pub total_earnings: Decimal,
    /// Salary withheld for half days.
    pub half_day_deduction: Decimal,
    /// Salary withheld for absent days.
    pub absent_day_deduction: Decimal,
    /// Salary withheld for unpaid leave.
    pub unpaid_leave_deduction: Decimal,
    /// Sum of the three salary withholdings above.
    pub leave_salary_deductions: Decimal,
    /// Deductions plus loans.
    pub total_all_deductions: Decimal,
    /// Earnings less salary withholdings plus attendance overtime.
    pub gross_pay: Decimal,
    /// Gross pay less deductions and loans.
    pub net_pay: Decimal,
    /// Payment state.
    pub payment_status: PaymentStatus,
}

impl PayrollEntry {
    /// Returns true if the entry has been paid.
    pub fn is_paid(&self) -> bool {
        self.payment_status == PaymentStatus::Paid
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_serialization() {
        assert_eq!(
            serde_json::to_string(&PayrollStatus::Processing).unwrap(),
            "\"processing\""
        );
        assert_eq!(
            serde_json::to_string(&PaymentStatus::Unpaid).unwrap(),
            "\"unpaid\""
        );
        assert_eq!(
            serde_json::to_string(&PayrollFrequency::BiWeekly).unwrap(),
            "\"bi_weekly\""
        );
    }

    #[test]
    fn test_payment_status_defaults_to_unpaid() {
        assert_eq!(PaymentStatus::default(), PaymentStatus::Unpaid);
    }

    #[test]
    fn test_breakdown_item_serialization_keeps_order() {
        let items = vec![
            BreakdownItem::new("Transport", Decimal::new(50, 0)),
            BreakdownItem::new("Housing", Decimal::new(200, 0)),
        ];
        let json = serde_json::to_string(&items).unwrap();
        let transport = json.find("Transport").unwrap();
        let housing = json.find("Housing").unwrap();
        assert!(transport < housing);
    }

    #[test]
    fn test_apply_totals() {
        let mut payroll = Payroll {
            id: 1,
            employer_id: 1,
            title: "January".to_string(),
            frequency: PayrollFrequency::Monthly,
            pay_period_start: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            pay_period_end: NaiveDate::from_ymd_opt(2026, 1, 31).unwrap(),
            pay_date: NaiveDate::from_ymd_opt(2026, 2, 1).unwrap(),
            status: PayrollStatus::Draft,
            is_payroll_paid: PaymentStatus::Unpaid,
            total_gross_pay: Decimal::ZERO,
            total_deductions: Decimal::ZERO,
            total_net_pay: Decimal::ZERO,
            employee_count: 0,
        };
        payroll.apply_totals(&PayrollTotals {
            gross_pay: Decimal::new(3200, 0),
            deductions: Decimal::new(50, 0),
            net_pay: Decimal::new(3150, 0),
            employee_count: 1,
        });
        assert_eq!(payroll.total_net_pay, Decimal::new(3150, 0));
        assert_eq!(payroll.employee_count, 1);
        assert_eq!(payroll.period().days().count(), 31);
    }
}
