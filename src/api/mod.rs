//! HTTP API module for the HRM payroll engine.
//!
//! This module exposes clock in/out, attendance entry, leave, allowance,
//! deduction and payroll operations as JSON endpoints scoped by employer.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{
    AttendanceRequest, ClockRequest, CompensationRequest, LeaveApplicationRequest,
    OutcomeRequest, PayrollRequest, ShiftWindowRequest,
};
pub use response::{ApiError, ApiErrorResponse, RunPayrollResponse};
pub use state::AppState;
