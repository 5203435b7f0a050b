//! Allowance, deduction, loan and manual overtime models.
//!
//! These are the per-employee pay adjustments a payroll run folds into
//! each payroll entry.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::PayPeriod;

/// How an adjustment's `amount` is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AmountType {
    /// `amount` is a currency value.
    Fixed,
    /// `amount` is a percentage of basic salary.
    Percentage,
}

impl AmountType {
    /// Resolves `amount` against `basic_salary`.
    ///
    /// # Examples
    ///
    /// ```
    /// use hrm_payroll::models::AmountType;
    /// use rust_decimal::Decimal;
    ///
    /// let basic = Decimal::new(3000, 0);
    /// let ten = Decimal::new(10, 0);
    /// assert_eq!(AmountType::Percentage.resolve(ten, basic), Decimal::new(300, 0));
    /// assert_eq!(AmountType::Fixed.resolve(ten, basic), ten);
    /// ```
    pub fn resolve(self, amount: Decimal, basic_salary: Decimal) -> Decimal {
        match self {
            AmountType::Fixed => amount,
            AmountType::Percentage => basic_salary * amount / Decimal::ONE_HUNDRED,
        }
    }
}

/// A recurring allowance paid on top of basic salary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Allowance {
    /// Unique identifier.
    pub id: u64,
    /// The employer context.
    pub employer_id: u64,
    /// The employee receiving the allowance.
    pub employee_id: u64,
    /// Name of the allowance type (e.g., "Housing"). Unique per employee.
    pub type_name: String,
    /// How `amount` is interpreted.
    pub amount_type: AmountType,
    /// Currency value or percentage.
    pub amount: Decimal,
}

/// A recurring deduction taken from pay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deduction {
    /// Unique identifier.
    pub id: u64,
    /// The employer context.
    pub employer_id: u64,
    /// The employee the deduction applies to.
    pub employee_id: u64,
    /// Name of the deduction type (e.g., "Pension"). Unique per employee.
    pub type_name: String,
    /// How `amount` is interpreted.
    pub amount_type: AmountType,
    /// Currency value or percentage.
    pub amount: Decimal,
}

/// A loan repayment deducted while its date range overlaps a pay period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Loan {
    /// Unique identifier.
    pub id: u64,
    /// The employer context.
    pub employer_id: u64,
    /// The borrowing employee.
    pub employee_id: u64,
    /// Name of the loan type.
    pub type_name: String,
    /// How `amount` is interpreted.
    pub amount_type: AmountType,
    /// Repayment per period, as currency value or percentage.
    pub amount: Decimal,
    /// First day repayments apply.
    pub start_date: NaiveDate,
    /// Last day repayments apply.
    pub end_date: NaiveDate,
}

impl Loan {
    /// Returns true if the loan's range overlaps the pay period.
    pub fn applies_to(&self, period: &PayPeriod) -> bool {
        period.overlaps(self.start_date, self.end_date)
    }
}

/// Whether a manual overtime grant is in effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OvertimeStatus {
    /// Included in payroll.
    Active,
    /// Ignored by payroll.
    Inactive,
}

/// Manually granted overtime, separate from attendance-derived overtime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Overtime {
    /// Unique identifier.
    pub id: u64,
    /// The employer context.
    pub employer_id: u64,
    /// The employee credited.
    pub employee_id: u64,
    /// Title shown on the payslip breakdown.
    pub title: String,
    /// Hours granted.
    pub hours: Decimal,
    /// Rate per hour.
    pub rate: Decimal,
    /// First day of the grant.
    pub start_date: NaiveDate,
    /// Last day of the grant.
    pub end_date: NaiveDate,
    /// Whether the grant is in effect.
    pub status: OvertimeStatus,
    /// Free-form notes.
    #[serde(default)]
    pub notes: Option<String>,
}

impl Overtime {
    /// Returns true if the grant is active and overlaps the pay period.
    pub fn applies_to(&self, period: &PayPeriod) -> bool {
        self.status == OvertimeStatus::Active && period.overlaps(self.start_date, self.end_date)
    }

    /// Hours multiplied by rate.
    pub fn amount(&self) -> Decimal {
        self.hours * self.rate
    }
}
