//! Response types for the HRM payroll API.
//!
//! This module defines the error response structures, the mapping from
//! [`EngineError`] to HTTP status codes, and response bodies that add
//! context to an engine result.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, ErrorKind};
use crate::models::Payroll;
use crate::payroll::RunOutcome;

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details.into()),
        }
    }

    /// Creates a validation error response.
    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", message)
    }

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }
}

/// API error with HTTP status code.
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

impl From<EngineError> for ApiErrorResponse {
    fn from(error: EngineError) -> Self {
        let status = match error.kind() {
            ErrorKind::Validation => StatusCode::BAD_REQUEST,
            ErrorKind::State => StatusCode::CONFLICT,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::System => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let code = error_code(&error);
        let api_error = match error.kind() {
            ErrorKind::System => {
                ApiError::with_details(code, "Internal error", error.to_string())
            }
            _ => ApiError::new(code, error.to_string()),
        };
        ApiErrorResponse {
            status,
            error: api_error,
        }
    }
}

/// Stable machine-readable code for each error variant.
fn error_code(error: &EngineError) -> &'static str {
    match error {
        EngineError::ConfigNotFound { .. } | EngineError::ConfigParseError { .. } => {
            "CONFIG_ERROR"
        }
        EngineError::NotFound { .. } => "NOT_FOUND",
        EngineError::DuplicateAttendance { .. } => "DUPLICATE_ATTENDANCE",
        EngineError::DuplicateCompensationType { .. } => "DUPLICATE_TYPE",
        EngineError::NonWorkingDay { .. } => "NON_WORKING_DAY",
        EngineError::Holiday { .. } => "HOLIDAY",
        EngineError::OnApprovedLeave { .. } => "ON_APPROVED_LEAVE",
        EngineError::InsufficientLeaveBalance { .. } => "INSUFFICIENT_LEAVE_BALANCE",
        EngineError::OverlappingLeave { .. } => "OVERLAPPING_LEAVE",
        EngineError::InvalidDateRange { .. } => "INVALID_DATE_RANGE",
        EngineError::InvalidAmount { .. } => "INVALID_AMOUNT",
        EngineError::IpNotAllowed { .. } => "IP_NOT_ALLOWED",
        EngineError::AlreadyClockedIn { .. } => "ALREADY_CLOCKED_IN",
        EngineError::NotClockedIn { .. } => "NOT_CLOCKED_IN",
        EngineError::AlreadyClockedOut { .. } => "ALREADY_CLOCKED_OUT",
        EngineError::LeaveNotPending { .. } => "LEAVE_NOT_PENDING",
        EngineError::WorkingDaysNotConfigured { .. } => "WORKING_DAYS_NOT_CONFIGURED",
        EngineError::PayrollAlreadyProcessing { .. } => "PAYROLL_PROCESSING",
        EngineError::Storage { .. } => "STORAGE_ERROR",
    }
}

/// Response body of a payroll run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunPayrollResponse {
    /// Summary of what the run did.
    pub message: String,
    /// Entries created by this run.
    pub new_entries: u32,
    /// Entries the payroll has after the run.
    pub total_entries: u32,
    /// True when every employee already had an entry.
    pub already_processed: bool,
    /// The payroll after the run.
    pub payroll: Payroll,
}

impl From<RunOutcome> for RunPayrollResponse {
    fn from(outcome: RunOutcome) -> Self {
        let already_processed = outcome.already_processed();
        let message = if already_processed {
            format!(
                "Payroll already processed; all {} employees have entries",
                outcome.total_entries
            )
        } else {
            format!(
                "Payroll processed: {} new entries, {} total",
                outcome.new_entries, outcome.total_entries
            )
        };
        Self {
            message,
            new_entries: outcome.new_entries,
            total_entries: outcome.total_entries,
            already_processed,
            payroll: outcome.payroll,
        }
    }
}
