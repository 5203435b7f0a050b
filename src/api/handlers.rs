//! HTTP request handlers for the HRM payroll API.
//!
//! This module contains the handler functions for all API endpoints. Each
//! handler parses its body, runs one engine operation with the store
//! locked, and maps the result to a JSON response.

use std::net::IpAddr;
use std::time::Instant;

use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{delete, post, put},
};
use chrono::{Local, NaiveDateTime};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::attendance;
use crate::calculation::compute_attendance_outcome;
use crate::compensation;
use crate::error::EngineResult;
use crate::leave;
use crate::models::Shift;
use crate::payroll;

use super::request::{
    AttendanceRequest, ClockRequest, CompensationRequest, LeaveApplicationRequest,
    OutcomeRequest, PayrollRequest,
};
use super::response::{ApiError, ApiErrorResponse, RunPayrollResponse};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/attendance/outcome", post(outcome_handler))
        .route(
            "/employers/:employer_id/attendance",
            post(create_attendance_handler),
        )
        .route(
            "/employers/:employer_id/attendance/clock-in",
            post(clock_in_handler),
        )
        .route(
            "/employers/:employer_id/attendance/clock-out",
            post(clock_out_handler),
        )
        .route(
            "/employers/:employer_id/attendance/:record_id",
            put(update_attendance_handler),
        )
        .route(
            "/employers/:employer_id/payrolls",
            post(create_payroll_handler),
        )
        .route(
            "/employers/:employer_id/payrolls/:payroll_id/run",
            post(run_payroll_handler),
        )
        .route(
            "/employers/:employer_id/payroll-entries/:entry_id",
            delete(delete_entry_handler),
        )
        .route(
            "/employers/:employer_id/payroll-entries/:entry_id/pay",
            post(pay_entry_handler),
        )
        .route(
            "/employers/:employer_id/leave-applications",
            post(apply_leave_handler),
        )
        .route(
            "/employers/:employer_id/leave-applications/:application_id/approve",
            post(approve_leave_handler),
        )
        .route(
            "/employers/:employer_id/leave-applications/:application_id/reject",
            post(reject_leave_handler),
        )
        .route(
            "/employers/:employer_id/allowances",
            post(create_allowance_handler),
        )
        .route(
            "/employers/:employer_id/allowances/:allowance_id",
            put(update_allowance_handler),
        )
        .route(
            "/employers/:employer_id/deductions",
            post(create_deduction_handler),
        )
        .route(
            "/employers/:employer_id/deductions/:deduction_id",
            put(update_deduction_handler),
        )
        .with_state(state)
}

/// Handler for POST /attendance/outcome.
///
/// Previews the time-accounting outcome of a clock pair without storing
/// anything.
async fn outcome_handler(payload: Result<Json<OutcomeRequest>, JsonRejection>) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing outcome preview");

    let request = match parse_body(payload, correlation_id) {
        Ok(request) => request,
        Err(response) => return response,
    };

    let shift: Option<Shift> = request.shift.map(Into::into);
    let outcome = compute_attendance_outcome(
        request.clock_in,
        request.clock_out,
        shift.as_ref(),
        request.hourly_rate,
    );
    respond(correlation_id, "outcome preview", StatusCode::OK, Ok(outcome))
}

/// Handler for POST /employers/:employer_id/attendance/clock-in.
async fn clock_in_handler(
    State(state): State<AppState>,
    Path(employer_id): Path<u64>,
    headers: HeaderMap,
    payload: Result<Json<ClockRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, employer_id, "Processing clock-in");

    let request = match parse_body(payload, correlation_id) {
        Ok(request) => request,
        Err(response) => return response,
    };
    let caller_ip = caller_ip(&headers);
    let now = request.timestamp.unwrap_or_else(local_now);

    let result = state.with_store_mut(|store| {
        attendance::clock_in(store, employer_id, request.employee_id, now, caller_ip)
    });
    respond(correlation_id, "clock-in", StatusCode::OK, result)
}

/// Handler for POST /employers/:employer_id/attendance/clock-out.
async fn clock_out_handler(
    State(state): State<AppState>,
    Path(employer_id): Path<u64>,
    headers: HeaderMap,
    payload: Result<Json<ClockRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, employer_id, "Processing clock-out");

    let request = match parse_body(payload, correlation_id) {
        Ok(request) => request,
        Err(response) => return response,
    };
    let caller_ip = caller_ip(&headers);
    let now = request.timestamp.unwrap_or_else(local_now);

    let result = state.with_store_mut(|store| {
        attendance::clock_out(store, employer_id, request.employee_id, now, caller_ip)
    });
    respond(correlation_id, "clock-out", StatusCode::OK, result)
}

/// Handler for POST /employers/:employer_id/attendance.
async fn create_attendance_handler(
    State(state): State<AppState>,
    Path(employer_id): Path<u64>,
    payload: Result<Json<AttendanceRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, employer_id, "Processing attendance entry");

    let request = match parse_body(payload, correlation_id) {
        Ok(request) => request,
        Err(response) => return response,
    };
    let result = state.with_store_mut(|store| {
        attendance::create_attendance(store, employer_id, request.into())
    });
    respond(correlation_id, "create attendance", StatusCode::CREATED, result)
}

/// Handler for PUT /employers/:employer_id/attendance/:record_id.
async fn update_attendance_handler(
    State(state): State<AppState>,
    Path((employer_id, record_id)): Path<(u64, u64)>,
    payload: Result<Json<AttendanceRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, employer_id, record_id, "Processing attendance update");

    let request = match parse_body(payload, correlation_id) {
        Ok(request) => request,
        Err(response) => return response,
    };
    let result = state.with_store_mut(|store| {
        attendance::update_attendance(store, employer_id, record_id, request.into())
    });
    respond(correlation_id, "update attendance", StatusCode::OK, result)
}

/// Handler for POST /employers/:employer_id/payrolls.
async fn create_payroll_handler(
    State(state): State<AppState>,
    Path(employer_id): Path<u64>,
    payload: Result<Json<PayrollRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, employer_id, "Processing payroll creation");

    let request = match parse_body(payload, correlation_id) {
        Ok(request) => request,
        Err(response) => return response,
    };
    let result =
        state.with_store_mut(|store| payroll::create_payroll(store, employer_id, request.into()));
    respond(correlation_id, "create payroll", StatusCode::CREATED, result)
}

/// Handler for POST /employers/:employer_id/payrolls/:payroll_id/run.
async fn run_payroll_handler(
    State(state): State<AppState>,
    Path((employer_id, payroll_id)): Path<(u64, u64)>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, employer_id, payroll_id, "Processing payroll run");

    let start_time = Instant::now();
    let result = state
        .with_store_mut(|store| payroll::run_payroll(store, employer_id, payroll_id))
        .map(RunPayrollResponse::from);
    if let Ok(run) = &result {
        info!(
            correlation_id = %correlation_id,
            payroll_id,
            new_entries = run.new_entries,
            total_entries = run.total_entries,
            net_pay = %run.payroll.total_net_pay,
            duration_us = start_time.elapsed().as_micros(),
            "Payroll run finished"
        );
    }
    respond(correlation_id, "run payroll", StatusCode::OK, result)
}

/// Handler for DELETE /employers/:employer_id/payroll-entries/:entry_id.
async fn delete_entry_handler(
    State(state): State<AppState>,
    Path((employer_id, entry_id)): Path<(u64, u64)>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, employer_id, entry_id, "Processing entry deletion");

    let result = state
        .with_store_mut(|store| payroll::delete_payroll_entry(store, employer_id, entry_id));
    respond(correlation_id, "delete payroll entry", StatusCode::OK, result)
}

/// Handler for POST /employers/:employer_id/payroll-entries/:entry_id/pay.
async fn pay_entry_handler(
    State(state): State<AppState>,
    Path((employer_id, entry_id)): Path<(u64, u64)>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, employer_id, entry_id, "Processing entry payment");

    let result =
        state.with_store_mut(|store| payroll::mark_entry_paid(store, employer_id, entry_id));
    respond(correlation_id, "mark entry paid", StatusCode::OK, result)
}

/// Handler for POST /employers/:employer_id/leave-applications.
async fn apply_leave_handler(
    State(state): State<AppState>,
    Path(employer_id): Path<u64>,
    payload: Result<Json<LeaveApplicationRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, employer_id, "Processing leave application");

    let request = match parse_body(payload, correlation_id) {
        Ok(request) => request,
        Err(response) => return response,
    };
    let result =
        state.with_store_mut(|store| leave::apply_leave(store, employer_id, request.into()));
    respond(correlation_id, "apply leave", StatusCode::CREATED, result)
}

/// Handler for POST /employers/:employer_id/leave-applications/:application_id/approve.
async fn approve_leave_handler(
    State(state): State<AppState>,
    Path((employer_id, application_id)): Path<(u64, u64)>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, employer_id, application_id, "Processing leave approval");

    let result =
        state.with_store_mut(|store| leave::approve_leave(store, employer_id, application_id));
    respond(correlation_id, "approve leave", StatusCode::OK, result)
}

/// Handler for POST /employers/:employer_id/leave-applications/:application_id/reject.
async fn reject_leave_handler(
    State(state): State<AppState>,
    Path((employer_id, application_id)): Path<(u64, u64)>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, employer_id, application_id, "Processing leave rejection");

    let result =
        state.with_store_mut(|store| leave::reject_leave(store, employer_id, application_id));
    respond(correlation_id, "reject leave", StatusCode::OK, result)
}

/// Handler for POST /employers/:employer_id/allowances.
async fn create_allowance_handler(
    State(state): State<AppState>,
    Path(employer_id): Path<u64>,
    payload: Result<Json<CompensationRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, employer_id, "Processing allowance creation");

    let request = match parse_body(payload, correlation_id) {
        Ok(request) => request,
        Err(response) => return response,
    };
    let result = state.with_store_mut(|store| {
        compensation::create_allowance(store, employer_id, request.into())
    });
    respond(correlation_id, "create allowance", StatusCode::CREATED, result)
}

/// Handler for PUT /employers/:employer_id/allowances/:allowance_id.
async fn update_allowance_handler(
    State(state): State<AppState>,
    Path((employer_id, allowance_id)): Path<(u64, u64)>,
    payload: Result<Json<CompensationRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, employer_id, allowance_id, "Processing allowance update");

    let request = match parse_body(payload, correlation_id) {
        Ok(request) => request,
        Err(response) => return response,
    };
    let result = state.with_store_mut(|store| {
        compensation::update_allowance(store, employer_id, allowance_id, request.into())
    });
    respond(correlation_id, "update allowance", StatusCode::OK, result)
}

/// Handler for POST /employers/:employer_id/deductions.
async fn create_deduction_handler(
    State(state): State<AppState>,
    Path(employer_id): Path<u64>,
    payload: Result<Json<CompensationRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, employer_id, "Processing deduction creation");

    let request = match parse_body(payload, correlation_id) {
        Ok(request) => request,
        Err(response) => return response,
    };
    let result = state.with_store_mut(|store| {
        compensation::create_deduction(store, employer_id, request.into())
    });
    respond(correlation_id, "create deduction", StatusCode::CREATED, result)
}

/// Handler for PUT /employers/:employer_id/deductions/:deduction_id.
async fn update_deduction_handler(
    State(state): State<AppState>,
    Path((employer_id, deduction_id)): Path<(u64, u64)>,
    payload: Result<Json<CompensationRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, employer_id, deduction_id, "Processing deduction update");

    let request = match parse_body(payload, correlation_id) {
        Ok(request) => request,
        Err(response) => return response,
    };
    let result = state.with_store_mut(|store| {
        compensation::update_deduction(store, employer_id, deduction_id, request.into())
    });
    respond(correlation_id, "update deduction", StatusCode::OK, result)
}

/// Unwraps a JSON body or builds the 400 response for the rejection.
fn parse_body<T>(
    payload: Result<Json<T>, JsonRejection>,
    correlation_id: Uuid,
) -> Result<T, Response> {
    let rejection = match payload {
        Ok(Json(body)) => return Ok(body),
        Err(rejection) => rejection,
    };

    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            // The body text carries serde's detailed message
            let body_text = err.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "JSON data error"
            );
            if body_text.contains("missing field") {
                ApiError::validation_error(body_text)
            } else {
                ApiError::malformed_json(body_text)
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "JSON syntax error"
            );
            ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
        }
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
        }
        _ => ApiError::malformed_json("Failed to parse request body"),
    };
    Err((
        StatusCode::BAD_REQUEST,
        [(header::CONTENT_TYPE, "application/json")],
        Json(error),
    )
        .into_response())
}

/// Builds the JSON response for an engine result, logging the outcome.
fn respond<T: Serialize>(
    correlation_id: Uuid,
    operation: &'static str,
    status: StatusCode,
    result: EngineResult<T>,
) -> Response {
    match result {
        Ok(body) => {
            info!(correlation_id = %correlation_id, operation, "Request completed");
            (status, [(header::CONTENT_TYPE, "application/json")], Json(body)).into_response()
        }
        Err(err) => {
            warn!(
                correlation_id = %correlation_id,
                operation,
                error = %err,
                "Request failed"
            );
            let api_error: ApiErrorResponse = err.into();
            (
                api_error.status,
                [(header::CONTENT_TYPE, "application/json")],
                Json(api_error.error),
            )
                .into_response()
        }
    }
}

/// Reads the caller's address from `X-Forwarded-For` (first hop) or
/// `X-Real-IP`.
fn caller_ip(headers: &HeaderMap) -> Option<IpAddr> {
    let forwarded = headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .and_then(|first| first.trim().parse().ok());
    forwarded.or_else(|| {
        headers
            .get("x-real-ip")
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.trim().parse().ok())
    })
}

fn local_now() -> NaiveDateTime {
    Local::now().naive_local()
}
