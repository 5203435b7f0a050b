//! Payroll totals aggregation.

use crate::models::{PaymentStatus, PayrollEntry, PayrollTotals};

/// Sums gross pay, deductions (including loans) and net pay over `entries`.
///
/// Always computed from the complete entry set of a payroll so the stored
/// totals never drift from the entries.
pub fn sum_payroll_totals(entries: &[PayrollEntry]) -> PayrollTotals {
    entries.iter().fold(PayrollTotals::default(), |mut totals, entry| {
        totals.gross_pay += entry.gross_pay;
        totals.deductions += entry.total_all_deductions;
        totals.net_pay += entry.net_pay;
        totals.employee_count += 1;
        totals
    })
}

/// Returns `Paid` if there is at least one entry and every entry is paid.
pub fn payroll_payment_status(entries: &[PayrollEntry]) -> PaymentStatus {
    if !entries.is_empty() && entries.iter().all(PayrollEntry::is_paid) {
        PaymentStatus::Paid
    } else {
        PaymentStatus::Unpaid
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn entry(employee_id: u64, gross: &str, deductions: &str, status: PaymentStatus) -> PayrollEntry {
        let gross = dec(gross);
        let deductions = dec(deductions);
        PayrollEntry {
            id: employee_id,
            payroll_id: 1,
            employer_id: 1,
            employee_id,
            basic_salary: gross,
            per_day_salary: Decimal::ZERO,
            working_days: 20,
            present_days: 20,
            half_days: 0,
            absent_days: 0,
            paid_leave_days: 0,
            unpaid_leave_days: 0,
            total_allowances: Decimal::ZERO,
            allowance_breakdown: vec![],
            total_deductions: deductions,
            deduction_breakdown: vec![],
            total_loans: Decimal::ZERO,
            loan_breakdown: vec![],
            manual_overtime_hours: Decimal::ZERO,
            manual_overtime_amount: Decimal::ZERO,
            overtime_breakdown: vec![],
            attendance_overtime_hours: Decimal::ZERO,
            attendance_overtime_amount: Decimal::ZERO,
            overtime_hours: Decimal::ZERO,
            total_earnings: gross,
            half_day_deduction: Decimal::ZERO,
            absent_day_deduction: Decimal::ZERO,
            unpaid_leave_deduction: Decimal::ZERO,
            leave_salary_deductions: Decimal::ZERO,
            total_all_deductions: deductions,
            gross_pay: gross,
            net_pay: gross - deductions,
            payment_status: status,
        }
    }

    #[test]
    fn test_totals_over_entries() {
        let entries = [
            entry(1, "3200", "50", PaymentStatus::Unpaid),
            entry(2, "1800.50", "120.25", PaymentStatus::Unpaid),
        ];
        let totals = sum_payroll_totals(&entries);
        assert_eq!(totals.gross_pay, dec("5000.50"));
        assert_eq!(totals.deductions, dec("170.25"));
        assert_eq!(totals.net_pay, dec("4830.25"));
        assert_eq!(totals.employee_count, 2);
        assert_eq!(totals.gross_pay - totals.deductions, totals.net_pay);
    }

    #[test]
    fn test_total_deductions_include_loans() {
        let mut with_loan = entry(1, "3000", "100", PaymentStatus::Unpaid);
        with_loan.total_loans = dec("250");
        with_loan.total_all_deductions = dec("350");
        with_loan.net_pay = dec("2650");

        let totals = sum_payroll_totals(&[with_loan]);
        assert_eq!(totals.deductions, dec("350"));
        assert_eq!(totals.net_pay, dec("2650"));
    }

    #[test]
    fn test_totals_of_no_entries_are_zero() {
        let totals = sum_payroll_totals(&[]);
        assert_eq!(totals, PayrollTotals::default());
    }

    #[test]
    fn test_payment_status_requires_all_paid() {
        let mixed = [
            entry(1, "100", "0", PaymentStatus::Paid),
            entry(2, "100", "0", PaymentStatus::Unpaid),
        ];
        assert_eq!(payroll_payment_status(&mixed), PaymentStatus::Unpaid);

        let paid = [
            entry(1, "100", "0", PaymentStatus::Paid),
            entry(2, "100", "0", PaymentStatus::Paid),
        ];
        assert_eq!(payroll_payment_status(&paid), PaymentStatus::Paid);
        assert_eq!(payroll_payment_status(&[]), PaymentStatus::Unpaid);
    }
}
