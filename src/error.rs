//! Error types for the HRM payroll engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for every rejection an attendance, leave, compensation or payroll
//! operation can produce.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;

/// Broad category of an [`EngineError`].
///
/// The category decides how callers surface the error: validation and
/// state errors are user-correctable, system errors are not.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Input failed a business rule; nothing was mutated.
    Validation,
    /// The operation is not allowed in the record's current state.
    State,
    /// A referenced record does not exist in the employer context.
    NotFound,
    /// Unexpected failure (storage, configuration).
    System,
}

/// The main error type for the HRM payroll engine.
///
/// # Example
///
/// ```
/// use hrm_payroll::error::{EngineError, ErrorKind};
///
/// let error = EngineError::NotFound {
///     entity: "employee",
///     id: 42,
/// };
/// assert_eq!(error.to_string(), "employee 42 not found");
/// assert_eq!(error.kind(), ErrorKind::NotFound);
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// A referenced record does not exist for the employer.
    #[error("{entity} {id} not found")]
    NotFound {
        /// The kind of record (e.g. "employee", "payroll").
        entity: &'static str,
        /// The identifier that was looked up.
        id: u64,
    },

    /// An attendance record already exists for the employee on that date.
    #[error("Attendance already recorded for employee {employee_id} on {date}")]
    DuplicateAttendance {
        /// The employee.
        employee_id: u64,
        /// The conflicting date.
        date: NaiveDate,
    },

    /// The employee already has an allowance or deduction of this type.
    #[error("Employee {employee_id} already has a {kind} of type '{type_name}'")]
    DuplicateCompensationType {
        /// The employee.
        employee_id: u64,
        /// "allowance" or "deduction".
        kind: &'static str,
        /// The conflicting type name.
        type_name: String,
    },

    /// The date is not one of the employer's working days.
    #[error("{date} is not a working day")]
    NonWorkingDay {
        /// The rejected date.
        date: NaiveDate,
    },

    /// The date falls inside a configured holiday.
    #[error("{date} falls on the holiday '{name}'")]
    Holiday {
        /// The rejected date.
        date: NaiveDate,
        /// The holiday name.
        name: String,
    },

    /// The employee is on approved leave on the date.
    #[error("Employee {employee_id} is on approved leave on {date}")]
    OnApprovedLeave {
        /// The employee.
        employee_id: u64,
        /// The rejected date.
        date: NaiveDate,
    },

    /// The requested leave exceeds what remains of the yearly allowance.
    #[error("Leave request of {requested} day(s) exceeds remaining balance of {remaining} day(s)")]
    InsufficientLeaveBalance {
        /// Days requested.
        requested: i64,
        /// Days still available this year.
        remaining: i64,
    },

    /// The requested leave overlaps another pending or approved application.
    #[error("Leave from {start_date} to {end_date} overlaps an existing application")]
    OverlappingLeave {
        /// Requested start.
        start_date: NaiveDate,
        /// Requested end.
        end_date: NaiveDate,
    },

    /// A date range ends before it starts.
    #[error("Invalid date range: {start_date} is after {end_date}")]
    InvalidDateRange {
        /// Range start.
        start_date: NaiveDate,
        /// Range end.
        end_date: NaiveDate,
    },

    /// A monetary or hour amount was out of range.
    #[error("Invalid amount for '{field}': {value}")]
    InvalidAmount {
        /// The field that was rejected.
        field: &'static str,
        /// The rejected value.
        value: Decimal,
    },

    /// The caller's IP is not on the employer's allow-list.
    #[error("Clock in/out is not permitted from IP address {ip}")]
    IpNotAllowed {
        /// The rejected address, or "unknown" if none was supplied.
        ip: String,
    },

    /// The employee already clocked in for the date.
    #[error("Employee {employee_id} has already clocked in on {date}")]
    AlreadyClockedIn {
        /// The employee.
        employee_id: u64,
        /// The attendance date.
        date: NaiveDate,
    },

    /// Clock-out without an open clock-in.
    #[error("Employee {employee_id} must clock in first")]
    NotClockedIn {
        /// The employee.
        employee_id: u64,
    },

    /// The attendance record is already closed.
    #[error("Employee {employee_id} has already clocked out on {date}")]
    AlreadyClockedOut {
        /// The employee.
        employee_id: u64,
        /// The attendance date.
        date: NaiveDate,
    },

    /// The leave application is no longer pending.
    #[error("Leave application {application_id} is already {status}")]
    LeaveNotPending {
        /// The application.
        application_id: u64,
        /// Its current status.
        status: String,
    },

    /// The employer has no working days configured.
    #[error("Working days are not configured for employer {employer_id}")]
    WorkingDaysNotConfigured {
        /// The employer.
        employer_id: u64,
    },

    /// Another run of the same payroll is in progress.
    #[error("Payroll {payroll_id} is already being processed")]
    PayrollAlreadyProcessing {
        /// The payroll.
        payroll_id: u64,
    },

    /// The backing store failed.
    #[error("Storage error: {message}")]
    Storage {
        /// A description of the failure.
        message: String,
    },
}

impl EngineError {
    /// Returns the category this error belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            EngineError::DuplicateAttendance { .. }
            | EngineError::DuplicateCompensationType { .. }
            | EngineError::NonWorkingDay { .. }
            | EngineError::Holiday { .. }
            | EngineError::OnApprovedLeave { .. }
            | EngineError::InsufficientLeaveBalance { .. }
            | EngineError::OverlappingLeave { .. }
            | EngineError::InvalidDateRange { .. }
            | EngineError::InvalidAmount { .. }
            | EngineError::IpNotAllowed { .. }
            | EngineError::WorkingDaysNotConfigured { .. } => ErrorKind::Validation,
            EngineError::AlreadyClockedIn { .. }
            | EngineError::NotClockedIn { .. }
            | EngineError::AlreadyClockedOut { .. }
            | EngineError::LeaveNotPending { .. }
            | EngineError::PayrollAlreadyProcessing { .. } => ErrorKind::State,
            EngineError::NotFound { .. } => ErrorKind::NotFound,
            EngineError::ConfigNotFound { .. }
            | EngineError::ConfigParseError { .. }
            | EngineError::Storage { .. } => ErrorKind::System,
        }
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
