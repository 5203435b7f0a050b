//! Leave applications: applying, approving and rejecting.
//!
//! Only approved applications affect attendance validation and payroll.
//! The yearly balance of a leave type is its `max_days_per_year` minus the
//! days of approved applications of that type starting in the same
//! calendar year.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{EngineError, EngineResult};
use crate::models::{LeaveApplication, LeaveStatus, LeaveType, leave_days};
use crate::store::HrmStore;

/// A request for leave.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveRequest {
    /// The employee requesting leave.
    pub employee_id: u64,
    /// The leave type requested.
    pub leave_type_id: u64,
    /// First day of leave (inclusive).
    pub start_date: NaiveDate,
    /// Last day of leave (inclusive).
    pub end_date: NaiveDate,
    /// Reason given by the employee.
    #[serde(default)]
    pub reason: Option<String>,
}

/// Files a pending leave application.
///
/// The start date must be a working day and not a holiday, the range must
/// not overlap another pending or approved application of the employee,
/// and the requested days must fit in the remaining yearly balance.
pub fn apply_leave<S: HrmStore + ?Sized>(
    store: &mut S,
    employer_id: u64,
    request: LeaveRequest,
) -> EngineResult<LeaveApplication> {
    let employee = store.require_employee(employer_id, request.employee_id)?;
    let leave_type = require_leave_type(store, employer_id, request.leave_type_id)?;

    if request.start_date > request.end_date {
        return Err(EngineError::InvalidDateRange {
            start_date: request.start_date,
            end_date: request.end_date,
        });
    }
    store
        .working_settings(employer_id)?
        .check_workable(request.start_date)?;

    let existing = store.leave_applications(employer_id, employee.id)?;
    let overlaps = existing.iter().any(|application| {
        application.status != LeaveStatus::Rejected
            && application.overlaps(request.start_date, request.end_date)
    });
    if overlaps {
        return Err(EngineError::OverlappingLeave {
            start_date: request.start_date,
            end_date: request.end_date,
        });
    }

    let total_days = leave_days(request.start_date, request.end_date);
    check_balance(&leave_type, &existing, request.start_date, total_days)?;

    let application = store.insert_leave_application(LeaveApplication {
        id: 0,
        employer_id,
        employee_id: employee.id,
        leave_type_id: leave_type.id,
        start_date: request.start_date,
        end_date: request.end_date,
        total_days,
        reason: request.reason,
        status: LeaveStatus::Pending,
    })?;

    info!(
        employer_id,
        employee_id = employee.id,
        application_id = application.id,
        leave_type = %leave_type.name,
        total_days,
        "Leave application filed"
    );
    Ok(application)
}

/// Approves a pending application, re-checking the balance first.
pub fn approve_leave<S: HrmStore + ?Sized>(
    store: &mut S,
    employer_id: u64,
    application_id: u64,
) -> EngineResult<LeaveApplication> {
    let mut application = require_pending(store, employer_id, application_id)?;
    let leave_type = require_leave_type(store, employer_id, application.leave_type_id)?;
    let existing = store.leave_applications(employer_id, application.employee_id)?;
    check_balance(
        &leave_type,
        &existing,
        application.start_date,
        application.total_days,
    )?;

    application.status = LeaveStatus::Approved;
    store.update_leave_application(&application)?;

    info!(
        employer_id,
        employee_id = application.employee_id,
        application_id,
        "Leave application approved"
    );
    Ok(application)
}

/// Rejects a pending application.
pub fn reject_leave<S: HrmStore + ?Sized>(
    store: &mut S,
    employer_id: u64,
    application_id: u64,
) -> EngineResult<LeaveApplication> {
    let mut application = require_pending(store, employer_id, application_id)?;
    application.status = LeaveStatus::Rejected;
    store.update_leave_application(&application)?;

    info!(
        employer_id,
        employee_id = application.employee_id,
        application_id,
        "Leave application rejected"
    );
    Ok(application)
}

/// Days of `leave_type` still available in the calendar year of `on`.
pub fn remaining_balance(
    leave_type: &LeaveType,
    applications: &[LeaveApplication],
    on: NaiveDate,
) -> i64 {
    let taken: i64 = applications
        .iter()
        .filter(|a| a.is_approved())
        .filter(|a| a.leave_type_id == leave_type.id)
        .filter(|a| a.start_date.year() == on.year())
        .map(|a| a.total_days)
        .sum();
    leave_type.max_days_per_year - taken
}

fn check_balance(
    leave_type: &LeaveType,
    applications: &[LeaveApplication],
    start_date: NaiveDate,
    requested: i64,
) -> EngineResult<()> {
    let remaining = remaining_balance(leave_type, applications, start_date);
    if requested > remaining {
        return Err(EngineError::InsufficientLeaveBalance {
            requested,
            remaining: remaining.max(0),
        });
    }
    Ok(())
}

fn require_leave_type<S: HrmStore + ?Sized>(
    store: &S,
    employer_id: u64,
    leave_type_id: u64,
) -> EngineResult<LeaveType> {
    store
        .leave_type(employer_id, leave_type_id)?
        .ok_or(EngineError::NotFound {
            entity: "leave type",
            id: leave_type_id,
        })
}

fn require_pending<S: HrmStore + ?Sized>(
    store: &S,
    employer_id: u64,
    application_id: u64,
) -> EngineResult<LeaveApplication> {
    let application = store
        .leave_application(employer_id, application_id)?
        .ok_or(EngineError::NotFound {
            entity: "leave application",
            id: application_id,
        })?;
    if application.status != LeaveStatus::Pending {
        return Err(EngineError::LeaveNotPending {
            application_id,
            status: application.status.to_string(),
        });
    }
    Ok(application)
}
