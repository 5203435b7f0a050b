//! Request types for the HRM payroll API.
//!
//! This module defines the JSON request bodies accepted by the endpoints
//! and their conversions into the engine's input types.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::attendance::AttendanceInput;
use crate::compensation::CompensationInput;
use crate::leave::LeaveRequest;
use crate::models::{AmountType, PayrollFrequency, Shift};
use crate::payroll::NewPayroll;

/// Request body for the clock-in and clock-out endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClockRequest {
    /// The employee clocking in or out.
    pub employee_id: u64,
    /// Clock time to record instead of the server's local time.
    #[serde(default)]
    pub timestamp: Option<NaiveDateTime>,
}

/// Request body for the `/attendance/outcome` preview endpoint.
///
/// Nothing is stored; the body carries everything the computation needs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutcomeRequest {
    /// Clock-in date and time.
    #[serde(default)]
    pub clock_in: Option<NaiveDateTime>,
    /// Clock-out date and time.
    #[serde(default)]
    pub clock_out: Option<NaiveDateTime>,
    /// The shift to compare against.
    #[serde(default)]
    pub shift: Option<ShiftWindowRequest>,
    /// Hourly rate used to price overtime.
    #[serde(default)]
    pub hourly_rate: Option<Decimal>,
}

/// An inline shift definition in an outcome preview.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShiftWindowRequest {
    /// Time of day the shift starts.
    pub start_time: NaiveTime,
    /// Time of day the shift ends.
    pub end_time: NaiveTime,
    /// Time of day the break starts.
    #[serde(default)]
    pub break_start_time: Option<NaiveTime>,
    /// Time of day the break ends.
    #[serde(default)]
    pub break_end_time: Option<NaiveTime>,
    /// Whether this is a night shift.
    #[serde(default)]
    pub is_night_shift: bool,
}

impl From<ShiftWindowRequest> for Shift {
    fn from(req: ShiftWindowRequest) -> Self {
        Shift {
            id: 0,
            employer_id: 0,
            name: "preview".to_string(),
            start_time: req.start_time,
            end_time: req.end_time,
            break_start_time: req.break_start_time,
            break_end_time: req.break_end_time,
            is_night_shift: req.is_night_shift,
        }
    }
}

/// Request body for creating or updating an attendance record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttendanceRequest {
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
    /// Break hours to deduct.
    #[serde(default)]
    pub break_hours: Option<Decimal>,
    /// Free-form notes.
    #[serde(default)]
    pub notes: Option<String>,
}

impl From<AttendanceRequest> for AttendanceInput {
    fn from(req: AttendanceRequest) -> Self {
        AttendanceInput {
            employee_id: req.employee_id,
            date: req.date,
            clock_in: req.clock_in,
            clock_out: req.clock_out,
            break_hours: req.break_hours,
            notes: req.notes,
        }
    }
}

/// Request body for creating a payroll.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayrollRequest {
    /// Display title.
    pub title: String,
    /// Issue frequency.
    pub frequency: PayrollFrequency,
    /// First day of the pay period.
    pub pay_period_start: NaiveDate,
    /// Last day of the pay period.
    pub pay_period_end: NaiveDate,
    /// The date employees are paid.
    pub pay_date: NaiveDate,
}

impl From<PayrollRequest> for NewPayroll {
    fn from(req: PayrollRequest) -> Self {
        NewPayroll {
            title: req.title,
            frequency: req.frequency,
            pay_period_start: req.pay_period_start,
            pay_period_end: req.pay_period_end,
            pay_date: req.pay_date,
        }
    }
}

/// Request body for a leave application.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaveApplicationRequest {
    /// The employee requesting leave.
    pub employee_id: u64,
    /// The leave type requested.
    pub leave_type_id: u64,
    /// First day of leave.
    pub start_date: NaiveDate,
    /// Last day of leave.
    pub end_date: NaiveDate,
    /// Reason given by the employee.
    #[serde(default)]
    pub reason: Option<String>,
}

impl From<LeaveApplicationRequest> for LeaveRequest {
    fn from(req: LeaveApplicationRequest) -> Self {
        LeaveRequest {
            employee_id: req.employee_id,
            leave_type_id: req.leave_type_id,
            start_date: req.start_date,
            end_date: req.end_date,
            reason: req.reason,
        }
    }
}

/// Request body for creating or updating an allowance or deduction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompensationRequest {
    /// The employee the row belongs to.
    pub employee_id: u64,
    /// Type name, unique per employee.
    pub type_name: String,
    /// How `amount` is interpreted.
    pub amount_type: AmountType,
    /// Currency value or percentage.
    pub amount: Decimal,
}

impl From<CompensationRequest> for CompensationInput {
    fn from(req: CompensationRequest) -> Self {
        CompensationInput {
            employee_id: req.employee_id,
            type_name: req.type_name,
            amount_type: req.amount_type,
            amount: req.amount,
        }
    }
}
