//! Storage seam for the HRM payroll engine.
//!
//! The engines never talk to a database directly. Everything they read or
//! write goes through [`HrmStore`], which the surrounding application
//! implements on top of its persistence layer. [`InMemoryStore`] is the
//! implementation used by the HTTP binary and by tests.
//!
//! Every read is scoped to one employer. Collections are returned in
//! ascending primary-key order.

mod memory;

use chrono::NaiveDate;

use crate::error::{EngineError, EngineResult};
use crate::models::{
    Allowance, AttendanceRecord, Deduction, Employee, EmployerSettings, LeaveApplication,
    LeaveType, Loan, Overtime, Payroll, PayrollEntry, Shift,
};

pub use memory::InMemoryStore;

/// Filtered reads and writes the attendance and payroll operations rely on.
pub trait HrmStore {
    // --- settings -----------------------------------------------------------

    /// Returns the employer's settings, or `None` if it has none configured.
    fn employer_settings(&self, employer_id: u64) -> EngineResult<Option<EmployerSettings>>;

    // --- employees and shifts ----------------------------------------------

    /// Looks up one employee of the employer.
    fn employee(&self, employer_id: u64, employee_id: u64) -> EngineResult<Option<Employee>>;

    /// Lists every employee of the employer.
    fn employees(&self, employer_id: u64) -> EngineResult<Vec<Employee>>;

    /// Looks up one shift of the employer.
    fn shift(&self, employer_id: u64, shift_id: u64) -> EngineResult<Option<Shift>>;

    // --- attendance ---------------------------------------------------------

    /// Looks up an attendance record by id.
    fn attendance(&self, employer_id: u64, record_id: u64)
    -> EngineResult<Option<AttendanceRecord>>;

    /// Returns the employee's record for `date`, if any.
    fn attendance_on(
        &self,
        employer_id: u64,
        employee_id: u64,
        date: NaiveDate,
    ) -> EngineResult<Option<AttendanceRecord>>;

    /// Returns the employee's records dated within `[start, end]`.
    fn attendance_between(
        &self,
        employer_id: u64,
        employee_id: u64,
        start: NaiveDate,
        end: NaiveDate,
    ) -> EngineResult<Vec<AttendanceRecord>>;

    /// Returns the employee's records that are clocked in but not out, oldest first.
    fn open_attendance(
        &self,
        employer_id: u64,
        employee_id: u64,
    ) -> EngineResult<Vec<AttendanceRecord>>;

    /// Inserts a record and returns it with its assigned id.
    ///
    /// Fails with `DuplicateAttendance` if the employee already has a record for the date.
    fn insert_attendance(&mut self, record: AttendanceRecord) -> EngineResult<AttendanceRecord>;

    /// Replaces an existing record.
    ///
    /// Fails with `DuplicateAttendance` if the new date collides with another record.
    fn update_attendance(&mut self, record: &AttendanceRecord) -> EngineResult<()>;

    // --- leave --------------------------------------------------------------

    /// Looks up a leave type of the employer.
    fn leave_type(&self, employer_id: u64, leave_type_id: u64) -> EngineResult<Option<LeaveType>>;

    /// Lists the employer's leave types.
    fn leave_types(&self, employer_id: u64) -> EngineResult<Vec<LeaveType>>;

    /// Looks up one leave application.
    fn leave_application(
        &self,
        employer_id: u64,
        application_id: u64,
    ) -> EngineResult<Option<LeaveApplication>>;

    /// Lists all of the employee's leave applications.
    fn leave_applications(
        &self,
        employer_id: u64,
        employee_id: u64,
    ) -> EngineResult<Vec<LeaveApplication>>;

    /// Inserts a leave application and returns it with its assigned id.
    fn insert_leave_application(
        &mut self,
        application: LeaveApplication,
    ) -> EngineResult<LeaveApplication>;

    /// Replaces an existing leave application.
    fn update_leave_application(&mut self, application: &LeaveApplication) -> EngineResult<()>;

    // --- allowances, deductions, loans, overtime ---------------------------

    /// Looks up one allowance.
    fn allowance(&self, employer_id: u64, allowance_id: u64) -> EngineResult<Option<Allowance>>;

    /// Lists the employee's allowances.
    fn allowances(&self, employer_id: u64, employee_id: u64) -> EngineResult<Vec<Allowance>>;

    /// Inserts an allowance and returns it with its assigned id.
    fn insert_allowance(&mut self, allowance: Allowance) -> EngineResult<Allowance>;

    /// Replaces an existing allowance.
    fn update_allowance(&mut self, allowance: &Allowance) -> EngineResult<()>;

    /// Looks up one deduction.
    fn deduction(&self, employer_id: u64, deduction_id: u64) -> EngineResult<Option<Deduction>>;

    /// Lists the employee's deductions.
    fn deductions(&self, employer_id: u64, employee_id: u64) -> EngineResult<Vec<Deduction>>;

    /// Inserts a deduction and returns it with its assigned id.
    fn insert_deduction(&mut self, deduction: Deduction) -> EngineResult<Deduction>;

    /// Replaces an existing deduction.
    fn update_deduction(&mut self, deduction: &Deduction) -> EngineResult<()>;

    /// Lists the employee's loans.
    fn loans(&self, employer_id: u64, employee_id: u64) -> EngineResult<Vec<Loan>>;

    /// Lists the employee's manual overtime grants.
    fn overtimes(&self, employer_id: u64, employee_id: u64) -> EngineResult<Vec<Overtime>>;

    // --- payroll ------------------------------------------------------------

    /// Looks up one payroll.
    fn payroll(&self, employer_id: u64, payroll_id: u64) -> EngineResult<Option<Payroll>>;

    /// Inserts a payroll and returns it with its assigned id.
    fn insert_payroll(&mut self, payroll: Payroll) -> EngineResult<Payroll>;

    /// Replaces an existing payroll.
    fn update_payroll(&mut self, payroll: &Payroll) -> EngineResult<()>;

    /// Looks up one payroll entry.
    fn payroll_entry(&self, employer_id: u64, entry_id: u64) -> EngineResult<Option<PayrollEntry>>;

    /// Lists every entry of a payroll.
    fn payroll_entries(&self, payroll_id: u64) -> EngineResult<Vec<PayrollEntry>>;

    /// Inserts an entry and returns it with its assigned id.
    fn insert_payroll_entry(&mut self, entry: PayrollEntry) -> EngineResult<PayrollEntry>;

    /// Replaces an existing entry.
    fn update_payroll_entry(&mut self, entry: &PayrollEntry) -> EngineResult<()>;

    /// Removes an entry.
    fn delete_payroll_entry(&mut self, entry_id: u64) -> EngineResult<()>;

    // --- required lookups ---------------------------------------------------

    /// Like [`HrmStore::employee`], but a missing employee is `NotFound`.
    fn require_employee(&self, employer_id: u64, employee_id: u64) -> EngineResult<Employee> {
        self.employee(employer_id, employee_id)?
            .ok_or(EngineError::NotFound {
                entity: "employee",
                id: employee_id,
            })
    }

    /// Resolves the employee's assigned shift. A dangling shift id is `NotFound`.
    fn employee_shift(&self, employee: &Employee) -> EngineResult<Option<Shift>> {
        match employee.shift_id {
            Some(shift_id) => self
                .shift(employee.employer_id, shift_id)?
                .map(Some)
                .ok_or(EngineError::NotFound {
                    entity: "shift",
                    id: shift_id,
                }),
            None => Ok(None),
        }
    }

    /// Returns the employer's settings, requiring a non-empty working-day set.
    fn working_settings(&self, employer_id: u64) -> EngineResult<EmployerSettings> {
        match self.employer_settings(employer_id)? {
            Some(settings) if !settings.working_days.is_empty() => Ok(settings),
            _ => Err(EngineError::WorkingDaysNotConfigured { employer_id }),
        }
    }

    /// Like [`HrmStore::payroll`], but a missing payroll is `NotFound`.
    fn require_payroll(&self, employer_id: u64, payroll_id: u64) -> EngineResult<Payroll> {
        self.payroll(employer_id, payroll_id)?
            .ok_or(EngineError::NotFound {
                entity: "payroll",
                id: payroll_id,
            })
    }
}
