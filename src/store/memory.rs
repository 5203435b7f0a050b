//! In-memory [`HrmStore`] backed by ordered maps.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use super::HrmStore;
use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult};
use crate::models::{
    Allowance, AttendanceRecord, Deduction, Employee, EmployerSettings, LeaveApplication,
    LeaveType, Loan, Overtime, Payroll, PayrollEntry, Shift,
};

/// Ordered map keyed by primary id with a monotonically increasing counter.
#[derive(Debug, Clone)]
struct Table<T> {
    rows: BTreeMap<u64, T>,
    next_id: u64,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
            next_id: 1,
        }
    }
}

impl<T: Clone> Table<T> {
    fn allocate(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn get(&self, id: u64) -> Option<&T> {
        self.rows.get(&id)
    }

    fn filter(&self, predicate: impl Fn(&T) -> bool) -> Vec<T> {
        self.rows.values().filter(|row| predicate(row)).cloned().collect()
    }

    fn replace(&mut self, entity: &'static str, id: u64, row: T) -> EngineResult<()> {
        match self.rows.get_mut(&id) {
            Some(slot) => {
                *slot = row;
                Ok(())
            }
            None => Err(EngineError::NotFound { entity, id }),
        }
    }

    fn insert_with(&mut self, build: impl FnOnce(u64) -> T) -> T {
        let id = self.allocate();
        let row = build(id);
        self.rows.insert(id, row.clone());
        row
    }

    /// Inserts under `requested` when non-zero, otherwise under the next id.
    fn seed_with(&mut self, requested: u64, build: impl FnOnce(u64) -> T) -> T {
        if requested == 0 {
            return self.insert_with(build);
        }
        self.next_id = self.next_id.max(requested + 1);
        let row = build(requested);
        self.rows.insert(requested, row.clone());
        row
    }
}

/// Process-local store used by the HTTP service and tests.
///
/// Reference data (employees, shifts, leave types, loans, overtime grants,
/// settings) is seeded through the `add_*` methods; everything else is
/// written by the engines through [`HrmStore`].
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    settings: BTreeMap<u64, EmployerSettings>,
    employees: Table<Employee>,
    shifts: Table<Shift>,
    attendance: Table<AttendanceRecord>,
    leave_types: Table<LeaveType>,
    leave_applications: Table<LeaveApplication>,
    allowances: Table<Allowance>,
    deductions: Table<Deduction>,
    loans: Table<Loan>,
    overtimes: Table<Overtime>,
    payrolls: Table<Payroll>,
    payroll_entries: Table<PayrollEntry>,
    #[cfg(test)]
    pub(crate) fail_entry_insert_after: Option<usize>,
}

impl InMemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store seeded with the given employer settings.
    pub fn with_settings(settings: impl IntoIterator<Item = EmployerSettings>) -> Self {
        let mut store = Self::new();
        for entry in settings {
            store.set_settings(entry);
        }
        store
    }

    /// Sets or replaces an employer's settings.
    pub fn set_settings(&mut self, settings: EmployerSettings) {
        self.settings.insert(settings.employer_id, settings);
    }

    /// Creates a store seeded from loaded configuration.
    pub fn from_config(config: &EngineConfig) -> Self {
        let mut store = Self::with_settings(config.employers().iter().cloned());
        let reference = config.reference();
        for shift in &reference.shifts {
            store.add_shift(shift.clone());
        }
        for employee in &reference.employees {
            store.add_employee(employee.clone());
        }
        for leave_type in &reference.leave_types {
            store.add_leave_type(leave_type.clone());
        }
        for loan in &reference.loans {
            store.add_loan(loan.clone());
        }
        for overtime in &reference.overtimes {
            store.add_overtime(overtime.clone());
        }
        store
    }

    /// Adds an employee. A zero id is replaced by the next free one.
    pub fn add_employee(&mut self, employee: Employee) -> Employee {
        self.employees
            .seed_with(employee.id, |id| Employee { id, ..employee })
    }

    /// Adds a shift. A zero id is replaced by the next free one.
    pub fn add_shift(&mut self, shift: Shift) -> Shift {
        self.shifts.seed_with(shift.id, |id| Shift { id, ..shift })
    }

    /// Adds a leave type. A zero id is replaced by the next free one.
    pub fn add_leave_type(&mut self, leave_type: LeaveType) -> LeaveType {
        self.leave_types
            .seed_with(leave_type.id, |id| LeaveType { id, ..leave_type })
    }

    /// Adds a loan. A zero id is replaced by the next free one.
    pub fn add_loan(&mut self, loan: Loan) -> Loan {
        self.loans.seed_with(loan.id, |id| Loan { id, ..loan })
    }

    /// Adds a manual overtime grant. A zero id is replaced by the next free one.
    pub fn add_overtime(&mut self, overtime: Overtime) -> Overtime {
        self.overtimes
            .seed_with(overtime.id, |id| Overtime { id, ..overtime })
    }

    #[cfg(test)]
    fn injected_entry_failure(&mut self) -> EngineResult<()> {
        match self.fail_entry_insert_after.as_mut() {
            Some(0) => Err(EngineError::Storage {
                message: "injected entry insert failure".to_string(),
            }),
            Some(remaining) => {
                *remaining -= 1;
                Ok(())
            }
            None => Ok(()),
        }
    }

    #[cfg(not(test))]
    fn injected_entry_failure(&mut self) -> EngineResult<()> {
        Ok(())
    }

    fn has_date_conflict(&self, record: &AttendanceRecord) -> bool {
        self.attendance.rows.values().any(|existing| {
            existing.id != record.id
                && existing.employer_id == record.employer_id
                && existing.employee_id == record.employee_id
                && existing.date == record.date
        })
    }
}

impl HrmStore for InMemoryStore {
    fn employer_settings(&self, employer_id: u64) -> EngineResult<Option<EmployerSettings>> {
        Ok(self.settings.get(&employer_id).cloned())
    }

    fn employee(&self, employer_id: u64, employee_id: u64) -> EngineResult<Option<Employee>> {
        Ok(self
            .employees
            .get(employee_id)
            .filter(|e| e.employer_id == employer_id)
            .cloned())
    }

    fn employees(&self, employer_id: u64) -> EngineResult<Vec<Employee>> {
        Ok(self.employees.filter(|e| e.employer_id == employer_id))
    }

    fn shift(&self, employer_id: u64, shift_id: u64) -> EngineResult<Option<Shift>> {
        Ok(self
            .shifts
            .get(shift_id)
            .filter(|s| s.employer_id == employer_id)
            .cloned())
    }

    fn attendance(
        &self,
        employer_id: u64,
        record_id: u64,
    ) -> EngineResult<Option<AttendanceRecord>> {
        Ok(self
            .attendance
            .get(record_id)
            .filter(|r| r.employer_id == employer_id)
            .cloned())
    }

    fn attendance_on(
        &self,
        employer_id: u64,
        employee_id: u64,
        date: NaiveDate,
    ) -> EngineResult<Option<AttendanceRecord>> {
        Ok(self
            .attendance
            .rows
            .values()
            .find(|r| r.employer_id == employer_id && r.employee_id == employee_id && r.date == date)
            .cloned())
    }

    fn attendance_between(
        &self,
        employer_id: u64,
        employee_id: u64,
        start: NaiveDate,
        end: NaiveDate,
    ) -> EngineResult<Vec<AttendanceRecord>> {
        Ok(self.attendance.filter(|r| {
            r.employer_id == employer_id
                && r.employee_id == employee_id
                && r.date >= start
                && r.date <= end
        }))
    }

    fn open_attendance(
        &self,
        employer_id: u64,
        employee_id: u64,
    ) -> EngineResult<Vec<AttendanceRecord>> {
        let mut open = self.attendance.filter(|r| {
            r.employer_id == employer_id && r.employee_id == employee_id && r.is_open()
        });
        open.sort_by_key(|r| (r.date, r.id));
        Ok(open)
    }

    fn insert_attendance(&mut self, record: AttendanceRecord) -> EngineResult<AttendanceRecord> {
        if self.has_date_conflict(&record) {
            return Err(EngineError::DuplicateAttendance {
                employee_id: record.employee_id,
                date: record.date,
            });
        }
        Ok(self.attendance.insert_with(|id| AttendanceRecord { id, ..record }))
    }

    fn update_attendance(&mut self, record: &AttendanceRecord) -> EngineResult<()> {
        if self.has_date_conflict(record) {
            return Err(EngineError::DuplicateAttendance {
                employee_id: record.employee_id,
                date: record.date,
            });
        }
        self.attendance
            .replace("attendance record", record.id, record.clone())
    }

    fn leave_type(&self, employer_id: u64, leave_type_id: u64) -> EngineResult<Option<LeaveType>> {
        Ok(self
            .leave_types
            .get(leave_type_id)
            .filter(|t| t.employer_id == employer_id)
            .cloned())
    }

    fn leave_types(&self, employer_id: u64) -> EngineResult<Vec<LeaveType>> {
        Ok(self.leave_types.filter(|t| t.employer_id == employer_id))
    }

    fn leave_application(
        &self,
        employer_id: u64,
        application_id: u64,
    ) -> EngineResult<Option<LeaveApplication>> {
        Ok(self
            .leave_applications
            .get(application_id)
            .filter(|a| a.employer_id == employer_id)
            .cloned())
    }

    fn leave_applications(
        &self,
        employer_id: u64,
        employee_id: u64,
    ) -> EngineResult<Vec<LeaveApplication>> {
        Ok(self
            .leave_applications
            .filter(|a| a.employer_id == employer_id && a.employee_id == employee_id))
    }

    fn insert_leave_application(
        &mut self,
        application: LeaveApplication,
    ) -> EngineResult<LeaveApplication> {
        Ok(self
            .leave_applications
            .insert_with(|id| LeaveApplication { id, ..application }))
    }

    fn update_leave_application(&mut self, application: &LeaveApplication) -> EngineResult<()> {
        self.leave_applications
            .replace("leave application", application.id, application.clone())
    }

    fn allowance(&self, employer_id: u64, allowance_id: u64) -> EngineResult<Option<Allowance>> {
        Ok(self
            .allowances
            .get(allowance_id)
            .filter(|a| a.employer_id == employer_id)
            .cloned())
    }

    fn allowances(&self, employer_id: u64, employee_id: u64) -> EngineResult<Vec<Allowance>> {
        Ok(self
            .allowances
            .filter(|a| a.employer_id == employer_id && a.employee_id == employee_id))
    }

    fn insert_allowance(&mut self, allowance: Allowance) -> EngineResult<Allowance> {
        Ok(self.allowances.insert_with(|id| Allowance { id, ..allowance }))
    }

    fn update_allowance(&mut self, allowance: &Allowance) -> EngineResult<()> {
        self.allowances
            .replace("allowance", allowance.id, allowance.clone())
    }

    fn deduction(&self, employer_id: u64, deduction_id: u64) -> EngineResult<Option<Deduction>> {
        Ok(self
            .deductions
            .get(deduction_id)
            .filter(|d| d.employer_id == employer_id)
            .cloned())
    }

    fn deductions(&self, employer_id: u64, employee_id: u64) -> EngineResult<Vec<Deduction>> {
        Ok(self
            .deductions
            .filter(|d| d.employer_id == employer_id && d.employee_id == employee_id))
    }

    fn insert_deduction(&mut self, deduction: Deduction) -> EngineResult<Deduction> {
        Ok(self.deductions.insert_with(|id| Deduction { id, ..deduction }))
    }

    fn update_deduction(&mut self, deduction: &Deduction) -> EngineResult<()> {
        self.deductions
            .replace("deduction", deduction.id, deduction.clone())
    }

    fn loans(&self, employer_id: u64, employee_id: u64) -> EngineResult<Vec<Loan>> {
        Ok(self
            .loans
            .filter(|l| l.employer_id == employer_id && l.employee_id == employee_id))
    }

    fn overtimes(&self, employer_id: u64, employee_id: u64) -> EngineResult<Vec<Overtime>> {
        Ok(self
            .overtimes
            .filter(|o| o.employer_id == employer_id && o.employee_id == employee_id))
    }

    fn payroll(&self, employer_id: u64, payroll_id: u64) -> EngineResult<Option<Payroll>> {
        Ok(self
            .payrolls
            .get(payroll_id)
            .filter(|p| p.employer_id == employer_id)
            .cloned())
    }

    fn insert_payroll(&mut self, payroll: Payroll) -> EngineResult<Payroll> {
        Ok(self.payrolls.insert_with(|id| Payroll { id, ..payroll }))
    }

    fn update_payroll(&mut self, payroll: &Payroll) -> EngineResult<()> {
        self.payrolls.replace("payroll", payroll.id, payroll.clone())
    }

    fn payroll_entry(&self, employer_id: u64, entry_id: u64) -> EngineResult<Option<PayrollEntry>> {
        Ok(self
            .payroll_entries
            .get(entry_id)
            .filter(|e| e.employer_id == employer_id)
            .cloned())
    }

    fn payroll_entries(&self, payroll_id: u64) -> EngineResult<Vec<PayrollEntry>> {
        Ok(self.payroll_entries.filter(|e| e.payroll_id == payroll_id))
    }

    fn insert_payroll_entry(&mut self, entry: PayrollEntry) -> EngineResult<PayrollEntry> {
        self.injected_entry_failure()?;
        Ok(self
            .payroll_entries
            .insert_with(|id| PayrollEntry { id, ..entry }))
    }

    fn update_payroll_entry(&mut self, entry: &PayrollEntry) -> EngineResult<()> {
        self.payroll_entries
            .replace("payroll entry", entry.id, entry.clone())
    }

    fn delete_payroll_entry(&mut self, entry_id: u64) -> EngineResult<()> {
        match self.payroll_entries.rows.remove(&entry_id) {
            Some(_) => Ok(()),
            None => Err(EngineError::NotFound {
                entity: "payroll entry",
                id: entry_id,
            }),
        }
    }
}
