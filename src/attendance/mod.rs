//! Attendance operations: clock-in, clock-out and manual records.
//!
//! Each operation validates everything it needs before writing, then runs
//! the time-accounting engine from [`crate::calculation`] and persists the
//! outcome on the attendance record.
//!
//! # Example
//!
//! ```
//! use hrm_payroll::attendance::{clock_in, clock_out};
//! use hrm_payroll::models::{AttendanceStatus, Employee, EmployerSettings};
//! use hrm_payroll::store::InMemoryStore;
//! use chrono::NaiveDateTime;
//!
//! let mut store = InMemoryStore::with_settings([EmployerSettings::new(1, vec![1, 2, 3, 4, 5])]);
//! let employee = store.add_employee(Employee {
//!     id: 0,
//!     employer_id: 1,
//!     name: "Ada".to_string(),
//!     shift_id: None,
//!     basic_salary: None,
//!     rate_per_hour: None,
//! });
//!
//! let at = |s: &str| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M").unwrap();
//! clock_in(&mut store, 1, employee.id, at("2026-01-12 09:00"), None).unwrap();
//! let record = clock_out(&mut store, 1, employee.id, at("2026-01-12 17:00"), None).unwrap();
//!
//! assert_eq!(record.status, AttendanceStatus::Present);
//! ```

use std::net::IpAddr;

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::calculation::{
    AttendanceOutcome, DEFAULT_STANDARD_HOURS, WorkedTime, compute_attendance_outcome,
    compute_worked_time, outcome_from_worked_time, round2, standard_shift_hours,
};
use crate::error::{EngineError, EngineResult};
use crate::models::{AttendanceRecord, Employee, Shift};
use crate::store::HrmStore;

/// Fields of a manually entered or edited attendance record.
///
/// Clock times are times of day on `date`; a clock-out earlier than the
/// clock-in belongs to the next day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendanceInput {
    /// The employee the record belongs to.
    pub employee_id: u64,
    /// The attendance date.
    pub date: NaiveDate,
    /// Clock-in time of day.
    #[serde(default)]
    pub clock_in: Option<NaiveTime>,
    /// Clock-out time of day.
    #[serde(default)]
    pub clock_out: Option<NaiveTime>,
    /// Break hours to deduct instead of the shift's break window.
    #[serde(default)]
    pub break_hours: Option<Decimal>,
    /// Free-form notes.
    #[serde(default)]
    pub notes: Option<String>,
}

/// Clocks the employee in at `now`.
///
/// Open records from earlier days are closed first at their shift end
/// (or after the default standard hours when no shift is assigned). Fails
/// if the caller's IP is not allowed or the employee already clocked in
/// today.
pub fn clock_in<S: HrmStore + ?Sized>(
    store: &mut S,
    employer_id: u64,
    employee_id: u64,
    now: NaiveDateTime,
    caller_ip: Option<IpAddr>,
) -> EngineResult<AttendanceRecord> {
    let employee = store.require_employee(employer_id, employee_id)?;
    check_caller_ip(store, employer_id, caller_ip)?;
    let shift = store.employee_shift(&employee)?;
    let today = now.date();

    let existing = store.attendance_on(employer_id, employee_id, today)?;
    if existing.as_ref().is_some_and(|r| r.clock_in.is_some()) {
        return Err(EngineError::AlreadyClockedIn {
            employee_id,
            date: today,
        });
    }

    for stale in store.open_attendance(employer_id, employee_id)? {
        if stale.date < today {
            auto_close(store, stale, &employee, shift.as_ref())?;
        }
    }

    let record = match existing {
        Some(mut record) => {
            record.clock_in = Some(now);
            store.update_attendance(&record)?;
            record
        }
        None => {
            let mut record = AttendanceRecord::new(employer_id, employee_id, today);
            record.clock_in = Some(now);
            store.insert_attendance(record)?
        }
    };

    info!(
        employer_id,
        employee_id,
        record_id = record.id,
        clock_in = %now,
        "Employee clocked in"
    );
    Ok(record)
}

/// Clocks the employee out at `now` and computes the day's outcome.
///
/// Closes today's record, or the most recent open record when there is
/// none for today (a night shift that started yesterday).
pub fn clock_out<S: HrmStore + ?Sized>(
    store: &mut S,
    employer_id: u64,
    employee_id: u64,
    now: NaiveDateTime,
    caller_ip: Option<IpAddr>,
) -> EngineResult<AttendanceRecord> {
    let employee = store.require_employee(employer_id, employee_id)?;
    check_caller_ip(store, employer_id, caller_ip)?;
    let shift = store.employee_shift(&employee)?;

    let record = match store.attendance_on(employer_id, employee_id, now.date())? {
        Some(record) => Some(record),
        None => store.open_attendance(employer_id, employee_id)?.pop(),
    };
    let Some(mut record) = record.filter(|r| r.clock_in.is_some()) else {
        return Err(EngineError::NotClockedIn { employee_id });
    };
    if record.clock_out.is_some() {
        return Err(EngineError::AlreadyClockedOut {
            employee_id,
            date: record.date,
        });
    }

    record.clock_out = Some(now);
    let outcome = compute_attendance_outcome(
        record.clock_in,
        record.clock_out,
        shift.as_ref(),
        employee.rate_per_hour,
    );
    apply_outcome(&mut record, &outcome);
    store.update_attendance(&record)?;

    info!(
        employer_id,
        employee_id,
        record_id = record.id,
        worked_hours = %record.total_hours,
        overtime_hours = %record.overtime_hours,
        status = %record.status,
        "Employee clocked out"
    );
    Ok(record)
}

/// Creates a manual attendance record.
///
/// Rejected on non-working days, holidays, days the employee is on
/// approved leave, and dates that already have a record.
pub fn create_attendance<S: HrmStore + ?Sized>(
    store: &mut S,
    employer_id: u64,
    input: AttendanceInput,
) -> EngineResult<AttendanceRecord> {
    let employee = store.require_employee(employer_id, input.employee_id)?;
    validate_attendance_date(store, employer_id, &input)?;

    if store
        .attendance_on(employer_id, input.employee_id, input.date)?
        .is_some()
    {
        return Err(EngineError::DuplicateAttendance {
            employee_id: input.employee_id,
            date: input.date,
        });
    }

    let shift = store.employee_shift(&employee)?;
    let mut record = AttendanceRecord::new(employer_id, input.employee_id, input.date);
    fill_manual_record(&mut record, &input, &employee, shift.as_ref());
    let record = store.insert_attendance(record)?;

    info!(
        employer_id,
        employee_id = record.employee_id,
        record_id = record.id,
        date = %record.date,
        "Attendance record created"
    );
    Ok(record)
}

/// Replaces the fields of an existing attendance record and recomputes it.
///
/// Applies the same date validation as [`create_attendance`]; moving the
/// record onto a date that already has another record is rejected.
pub fn update_attendance<S: HrmStore + ?Sized>(
    store: &mut S,
    employer_id: u64,
    record_id: u64,
    input: AttendanceInput,
) -> EngineResult<AttendanceRecord> {
    let mut record = store
        .attendance(employer_id, record_id)?
        .ok_or(EngineError::NotFound {
            entity: "attendance record",
            id: record_id,
        })?;
    let employee = store.require_employee(employer_id, input.employee_id)?;
    validate_attendance_date(store, employer_id, &input)?;

    let collides = store
        .attendance_on(employer_id, input.employee_id, input.date)?
        .is_some_and(|other| other.id != record_id);
    if collides {
        return Err(EngineError::DuplicateAttendance {
            employee_id: input.employee_id,
            date: input.date,
        });
    }

    let shift = store.employee_shift(&employee)?;
    record.employee_id = input.employee_id;
    record.date = input.date;
    fill_manual_record(&mut record, &input, &employee, shift.as_ref());
    store.update_attendance(&record)?;

    info!(
        employer_id,
        employee_id = record.employee_id,
        record_id,
        date = %record.date,
        "Attendance record updated"
    );
    Ok(record)
}

/// Computes the outcome of a clock pair with an explicit break duration.
///
/// The span between clock-in and clock-out (rolled to the next day when
/// needed) minus `break_hours`, floored at zero. Overtime and status are
/// derived against the shift's standard hours as usual.
pub fn outcome_with_break(
    clock_in: Option<NaiveDateTime>,
    clock_out: Option<NaiveDateTime>,
    break_hours: Decimal,
    shift: Option<&Shift>,
    hourly_rate: Option<Decimal>,
) -> AttendanceOutcome {
    let span = compute_worked_time(clock_in, clock_out, None);
    let worked = if clock_in.is_some() && clock_out.is_some() {
        WorkedTime {
            worked_hours: round2(span.worked_hours - break_hours).max(Decimal::ZERO),
            break_hours: round2(break_hours),
        }
    } else {
        WorkedTime::ZERO
    };
    outcome_from_worked_time(worked, standard_shift_hours(shift), hourly_rate)
}

fn check_caller_ip<S: HrmStore + ?Sized>(
    store: &S,
    employer_id: u64,
    caller_ip: Option<IpAddr>,
) -> EngineResult<()> {
    let Some(settings) = store.employer_settings(employer_id)? else {
        return Ok(());
    };
    if settings.permits_ip(caller_ip) {
        Ok(())
    } else {
        Err(EngineError::IpNotAllowed {
            ip: caller_ip.map_or_else(|| "unknown".to_string(), |ip| ip.to_string()),
        })
    }
}

fn validate_attendance_date<S: HrmStore + ?Sized>(
    store: &S,
    employer_id: u64,
    input: &AttendanceInput,
) -> EngineResult<()> {
    if let Some(break_hours) = input.break_hours.filter(|hours| *hours < Decimal::ZERO) {
        return Err(EngineError::InvalidAmount {
            field: "break_hours",
            value: break_hours,
        });
    }

    store
        .working_settings(employer_id)?
        .check_workable(input.date)?;

    let on_leave = store
        .leave_applications(employer_id, input.employee_id)?
        .iter()
        .any(|leave| leave.is_approved() && leave.covers(input.date));
    if on_leave {
        return Err(EngineError::OnApprovedLeave {
            employee_id: input.employee_id,
            date: input.date,
        });
    }
    Ok(())
}

fn fill_manual_record(
    record: &mut AttendanceRecord,
    input: &AttendanceInput,
    employee: &Employee,
    shift: Option<&Shift>,
) {
    let clock_in = input.clock_in.map(|t| input.date.and_time(t));
    let clock_out = input.clock_out.map(|t| {
        let out = input.date.and_time(t);
        match clock_in {
            Some(start) if out < start => out + Duration::days(1),
            _ => out,
        }
    });

    let outcome = match input.break_hours {
        Some(break_hours) => {
            outcome_with_break(clock_in, clock_out, break_hours, shift, employee.rate_per_hour)
        }
        None => compute_attendance_outcome(clock_in, clock_out, shift, employee.rate_per_hour),
    };

    record.clock_in = clock_in;
    record.clock_out = clock_out;
    record.notes = input.notes.clone();
    apply_outcome(record, &outcome);
}

fn auto_close<S: HrmStore + ?Sized>(
    store: &mut S,
    mut record: AttendanceRecord,
    employee: &Employee,
    shift: Option<&Shift>,
) -> EngineResult<()> {
    let Some(started) = record.clock_in else {
        return Ok(());
    };
    let closed_at = match shift {
        Some(shift) => shift.end_after(started),
        None => started + hours_duration(DEFAULT_STANDARD_HOURS),
    };

    record.clock_out = Some(closed_at);
    let outcome =
        compute_attendance_outcome(record.clock_in, record.clock_out, shift, employee.rate_per_hour);
    apply_outcome(&mut record, &outcome);
    store.update_attendance(&record)?;

    debug!(
        employer_id = record.employer_id,
        employee_id = record.employee_id,
        record_id = record.id,
        closed_at = %closed_at,
        "Auto-closed stale open attendance"
    );
    Ok(())
}

fn apply_outcome(record: &mut AttendanceRecord, outcome: &AttendanceOutcome) {
    record.total_hours = outcome.worked_hours;
    record.break_hours = outcome.break_hours;
    record.overtime_hours = outcome.overtime_hours;
    record.overtime_amount = outcome.overtime_amount;
    record.status = outcome.status;
}

fn hours_duration(hours: Decimal) -> Duration {
    let minutes = (hours * Decimal::from(60)).trunc();
    Duration::minutes(i64::try_from(minutes).unwrap_or(0))
}
