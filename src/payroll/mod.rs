//! Payroll operations: creating and running payrolls, and maintaining
//! their entries afterwards.
//!
//! A run produces one [`PayrollEntry`] per employee that the payroll does
//! not cover yet, then recomputes the payroll's totals from its complete
//! entry set. Deleting an entry or marking it paid refreshes the parent
//! payroll the same way, so stored totals never drift from the entries.
//!
//! Runs are resumable rather than transactional: entries written before a
//! failure are kept, the payroll returns to `Draft`, and the next run
//! skips employees that already have an entry.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::calculation::{
    EmployeePayInputs, compute_payroll_entry, count_working_days, payroll_payment_status,
    sum_payroll_totals,
};
use crate::error::{EngineError, EngineResult};
use crate::models::{
    Employee, LeaveType, PayPeriod, PaymentStatus, Payroll, PayrollEntry, PayrollFrequency,
    PayrollStatus,
};
use crate::store::HrmStore;

/// Fields for a new payroll.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPayroll {
    /// Display title.
    pub title: String,
    /// Issue frequency.
    pub frequency: PayrollFrequency,
    /// First day of the pay period (inclusive).
    pub pay_period_start: NaiveDate,
    /// Last day of the pay period (inclusive).
    pub pay_period_end: NaiveDate,
    /// The date employees are paid.
    pub pay_date: NaiveDate,
}

/// Result of a payroll run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunOutcome {
    /// The payroll after the run.
    pub payroll: Payroll,
    /// Entries created by this run.
    pub new_entries: u32,
    /// Entries the payroll has after the run.
    pub total_entries: u32,
}

impl RunOutcome {
    /// True when the run found every employee already covered.
    pub fn already_processed(&self) -> bool {
        self.new_entries == 0
    }
}

/// An entry marked paid, with its refreshed payroll.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaidEntry {
    /// The updated entry.
    pub entry: PayrollEntry,
    /// The parent payroll.
    pub payroll: Payroll,
}

/// Creates a draft payroll with zero totals.
pub fn create_payroll<S: HrmStore + ?Sized>(
    store: &mut S,
    employer_id: u64,
    input: NewPayroll,
) -> EngineResult<Payroll> {
    if input.pay_period_start > input.pay_period_end {
        return Err(EngineError::InvalidDateRange {
            start_date: input.pay_period_start,
            end_date: input.pay_period_end,
        });
    }

    let payroll = store.insert_payroll(Payroll {
        id: 0,
        employer_id,
        title: input.title,
        frequency: input.frequency,
        pay_period_start: input.pay_period_start,
        pay_period_end: input.pay_period_end,
        pay_date: input.pay_date,
        status: PayrollStatus::Draft,
        is_payroll_paid: PaymentStatus::Unpaid,
        total_gross_pay: Decimal::ZERO,
        total_deductions: Decimal::ZERO,
        total_net_pay: Decimal::ZERO,
        employee_count: 0,
    })?;

    info!(
        employer_id,
        payroll_id = payroll.id,
        start = %payroll.pay_period_start,
        end = %payroll.pay_period_end,
        "Payroll created"
    );
    Ok(payroll)
}

/// Runs a payroll, creating entries for employees it does not cover yet.
///
/// Rejected while another run of the same payroll is in progress. Any
/// failure after the payroll enters `Processing` returns it to `Draft`;
/// entries created before the failure remain.
pub fn run_payroll<S: HrmStore + ?Sized>(
    store: &mut S,
    employer_id: u64,
    payroll_id: u64,
) -> EngineResult<RunOutcome> {
    let mut payroll = store.require_payroll(employer_id, payroll_id)?;
    if payroll.status == PayrollStatus::Processing {
        return Err(EngineError::PayrollAlreadyProcessing { payroll_id });
    }

    payroll.status = PayrollStatus::Processing;
    store.update_payroll(&payroll)?;
    info!(employer_id, payroll_id, "Payroll run started");

    match process_payroll(store, &mut payroll) {
        Ok((new_entries, total_entries)) => {
            info!(
                employer_id,
                payroll_id,
                new_entries,
                total_entries,
                gross_pay = %payroll.total_gross_pay,
                net_pay = %payroll.total_net_pay,
                "Payroll run completed"
            );
            Ok(RunOutcome {
                payroll,
                new_entries,
                total_entries,
            })
        }
        Err(err) => {
            warn!(employer_id, payroll_id, error = %err, "Payroll run failed, reverting to draft");
            payroll.status = PayrollStatus::Draft;
            if let Err(revert_err) = store.update_payroll(&payroll) {
                warn!(payroll_id, error = %revert_err, "Failed to revert payroll status");
            }
            Err(err)
        }
    }
}

/// Deletes a payroll entry and refreshes its payroll's totals.
pub fn delete_payroll_entry<S: HrmStore + ?Sized>(
    store: &mut S,
    employer_id: u64,
    entry_id: u64,
) -> EngineResult<Payroll> {
    let entry = require_entry(store, employer_id, entry_id)?;
    let mut payroll = store.require_payroll(employer_id, entry.payroll_id)?;

    store.delete_payroll_entry(entry_id)?;
    refresh_payroll(store, &mut payroll)?;

    info!(
        employer_id,
        payroll_id = payroll.id,
        entry_id,
        employee_id = entry.employee_id,
        remaining_entries = payroll.employee_count,
        "Payroll entry deleted"
    );
    Ok(payroll)
}

/// Marks an entry paid; the payroll becomes paid once all its entries are.
pub fn mark_entry_paid<S: HrmStore + ?Sized>(
    store: &mut S,
    employer_id: u64,
    entry_id: u64,
) -> EngineResult<PaidEntry> {
    let mut entry = require_entry(store, employer_id, entry_id)?;
    let mut payroll = store.require_payroll(employer_id, entry.payroll_id)?;

    entry.payment_status = PaymentStatus::Paid;
    store.update_payroll_entry(&entry)?;

    let entries = store.payroll_entries(payroll.id)?;
    payroll.is_payroll_paid = payroll_payment_status(&entries);
    store.update_payroll(&payroll)?;

    info!(
        employer_id,
        payroll_id = payroll.id,
        entry_id,
        payroll_paid = payroll.is_payroll_paid == PaymentStatus::Paid,
        "Payroll entry marked paid"
    );
    Ok(PaidEntry { entry, payroll })
}

/// Creates the missing entries and completes the payroll.
///
/// Returns `(new_entries, total_entries)`.
fn process_payroll<S: HrmStore + ?Sized>(
    store: &mut S,
    payroll: &mut Payroll,
) -> EngineResult<(u32, u32)> {
    let employer_id = payroll.employer_id;
    let settings = store.working_settings(employer_id)?;
    let period = payroll.period();
    let working_days = count_working_days(&settings.working_days, &period);

    let covered: BTreeSet<u64> = store
        .payroll_entries(payroll.id)?
        .iter()
        .map(|entry| entry.employee_id)
        .collect();
    let leave_types = store.leave_types(employer_id)?;

    let mut new_entries = 0;
    for employee in store.employees(employer_id)? {
        if covered.contains(&employee.id) {
            debug!(
                payroll_id = payroll.id,
                employee_id = employee.id,
                "Entry already exists, skipping employee"
            );
            continue;
        }
        let entry = compute_entry(store, payroll.id, &employee, &leave_types, working_days, &period)?;
        store.insert_payroll_entry(entry)?;
        new_entries += 1;
    }

    let total_entries = refresh_payroll(store, payroll)?;
    payroll.status = PayrollStatus::Completed;
    store.update_payroll(payroll)?;
    Ok((new_entries, total_entries))
}

fn compute_entry<S: HrmStore + ?Sized>(
    store: &S,
    payroll_id: u64,
    employee: &Employee,
    leave_types: &[LeaveType],
    working_days: u32,
    period: &PayPeriod,
) -> EngineResult<PayrollEntry> {
    let employer_id = employee.employer_id;
    let allowances = store.allowances(employer_id, employee.id)?;
    let deductions = store.deductions(employer_id, employee.id)?;
    let loans = store.loans(employer_id, employee.id)?;
    let overtimes = store.overtimes(employer_id, employee.id)?;
    let attendance =
        store.attendance_between(employer_id, employee.id, period.start_date, period.end_date)?;
    let leave_applications = store.leave_applications(employer_id, employee.id)?;

    let inputs = EmployeePayInputs {
        employee,
        allowances: &allowances,
        deductions: &deductions,
        loans: &loans,
        overtimes: &overtimes,
        attendance: &attendance,
        leave_applications: &leave_applications,
        leave_types,
    };
    Ok(compute_payroll_entry(payroll_id, &inputs, working_days, period))
}

/// Recomputes totals and payment status from the payroll's entries and
/// persists them. Returns the entry count.
fn refresh_payroll<S: HrmStore + ?Sized>(store: &mut S, payroll: &mut Payroll) -> EngineResult<u32> {
    let entries = store.payroll_entries(payroll.id)?;
    let totals = sum_payroll_totals(&entries);
    payroll.apply_totals(&totals);
    payroll.is_payroll_paid = payroll_payment_status(&entries);
    store.update_payroll(payroll)?;
    Ok(totals.employee_count)
}

fn require_entry<S: HrmStore + ?Sized>(
    store: &S,
    employer_id: u64,
    entry_id: u64,
) -> EngineResult<PayrollEntry> {
    store
        .payroll_entry(employer_id, entry_id)?
        .ok_or(EngineError::NotFound {
            entity: "payroll entry",
            id: entry_id,
        })
}
