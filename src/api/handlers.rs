//! HTTP request handlers for the center payroll API.
//!
//! This module contains the handler functions for all API endpoints.

use std::time::Instant;

use axum::{
    Json, Router,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::{
    aggregate_attendance, apply_wage_rules, calculate_class_wage, calculate_teacher_salary,
    monthly_rollup, teacher_ledger, vault_balance,
};
use crate::generative::{ContentKind, StudyContext};
use crate::models::{OtherExpense, PayMonth, StudentPayment};
use crate::services::{fetch_finance_inputs, load_teacher_ledger, record_expense, record_payment};

use super::request::{
    AttendanceSummaryRequest, ClassWageRequest, GenerateSalaryRequest, LedgerRequest,
    RollupRequest, SummaryQuery, TeacherSalaryRequest, WageRulesRequest,
};
use super::response::{ApiError, ApiErrorResponse, FinanceTotals, GeneratedContent};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/attendance/summary", post(attendance_summary_handler))
        .route("/payroll/wages", post(wage_rules_handler))
        .route("/payroll/class-wage", post(class_wage_handler))
        .route("/payroll/teacher-salary", post(teacher_salary_handler))
        .route("/finance/rollup", post(rollup_handler))
        .route("/finance/ledger", post(ledger_handler).get(stored_ledger_handler))
        .route("/finance/summary", get(finance_summary_handler))
        .route("/finance/payments", post(record_payment_handler))
        .route("/finance/expenses", post(record_expense_handler))
        .route("/salaries/generate", post(generate_salary_handler))
        .route("/salaries/:id/toggle", post(toggle_salary_handler))
        .route("/content/:kind", post(content_handler))
        .with_state(state)
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        Json(body),
    )
        .into_response()
}

fn error_response(correlation_id: Uuid, error: impl Into<ApiErrorResponse>) -> Response {
    let api_error: ApiErrorResponse = error.into();
    warn!(
        correlation_id = %correlation_id,
        status = %api_error.status,
        code = %api_error.error.code,
        message = %api_error.error.message,
        "Request failed"
    );
    json_response(api_error.status, api_error.error)
}

/// Maps a JSON body rejection to a 400 response.
///
/// Missing fields are reported as validation errors; every other data or
/// syntax problem is malformed JSON.
fn rejection_response(correlation_id: Uuid, rejection: JsonRejection) -> Response {
    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
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
    json_response(StatusCode::BAD_REQUEST, error)
}

/// Handler for POST /attendance/summary.
async fn attendance_summary_handler(
    State(state): State<AppState>,
    payload: Result<Json<AttendanceSummaryRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };
    let period = match request.period.period() {
        Ok(period) => period,
        Err(err) => return error_response(correlation_id, err),
    };

    let config = state.config().config();
    let mut summary = aggregate_attendance(
        &request.records,
        &request.teacher_id,
        period,
        &request.schedule,
        config.wage_rules(),
        config.weekdays(),
    );
    if let Some(multiplier) = request.unperm_multiplier {
        summary = summary.with_unpermitted_multiplier(multiplier);
    }

    info!(
        correlation_id = %correlation_id,
        teacher_id = %request.teacher_id,
        period = %period,
        records = request.records.len(),
        "Attendance summarised"
    );
    json_response(StatusCode::OK, summary)
}

/// Handler for POST /payroll/wages.
async fn wage_rules_handler(
    State(state): State<AppState>,
    payload: Result<Json<WageRulesRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    let adjustment = apply_wage_rules(
        request.base_salary,
        &request.summary,
        state.config().config().wage_rules(),
        1,
    );
    info!(
        correlation_id = %correlation_id,
        bonuses = %adjustment.total_bonuses,
        deductions = %adjustment.total_deductions,
        "Wage rules applied"
    );
    json_response(StatusCode::OK, adjustment)
}

/// Handler for POST /payroll/class-wage.
async fn class_wage_handler(
    State(state): State<AppState>,
    payload: Result<Json<ClassWageRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    let result = calculate_class_wage(
        &request.classes,
        &request.teacher_id,
        state.config().config().class_rates(),
    );
    info!(
        correlation_id = %correlation_id,
        teacher_id = %request.teacher_id,
        classes = result.lines.len(),
        base_salary = %result.base_salary,
        "Class wage calculated"
    );
    json_response(StatusCode::OK, result)
}

/// Handler for POST /payroll/teacher-salary.
///
/// Computes the salary from the rows in the body without touching the store.
async fn teacher_salary_handler(
    State(state): State<AppState>,
    payload: Result<Json<TeacherSalaryRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };
    let period = match request.period.period() {
        Ok(period) => period,
        Err(err) => return error_response(correlation_id, err),
    };

    let start_time = Instant::now();
    let salary = calculate_teacher_salary(
        &request.teacher,
        &request.classes,
        &request.attendance,
        period,
        state.config().config(),
    );
    info!(
        correlation_id = %correlation_id,
        teacher_id = %request.teacher.id,
        period = %period,
        final_amount = %salary.record.final_amount(),
        duration_us = start_time.elapsed().as_micros(),
        "Teacher salary calculated"
    );
    json_response(StatusCode::OK, salary)
}

/// Handler for POST /finance/rollup.
async fn rollup_handler(payload: Result<Json<RollupRequest>, JsonRejection>) -> Response {
    let correlation_id = Uuid::new_v4();
    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };
    let period = match request.period.period() {
        Ok(period) => period,
        Err(err) => return error_response(correlation_id, err),
    };

    let totals = FinanceTotals {
        rollup: monthly_rollup(
            &request.payments,
            &request.salaries,
            &request.expenses,
            period,
            request.branch.as_deref(),
        ),
        vault_balance: vault_balance(&request.payments, &request.salaries, &request.expenses),
    };
    info!(
        correlation_id = %correlation_id,
        period = %period,
        net = %totals.rollup.net,
        "Finance roll-up calculated"
    );
    json_response(StatusCode::OK, totals)
}

/// Handler for POST /finance/ledger.
async fn ledger_handler(payload: Result<Json<LedgerRequest>, JsonRejection>) -> Response {
    let correlation_id = Uuid::new_v4();
    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    let ledger = teacher_ledger(
        &request.payments,
        &request.students,
        &request.salaries,
        &request.teachers,
    );
    info!(
        correlation_id = %correlation_id,
        teachers = ledger.entries.len(),
        unresolved = ledger.unresolved_payments,
        "Teacher ledger calculated"
    );
    json_response(StatusCode::OK, ledger)
}

/// Handler for GET /finance/ledger, computed over the store.
async fn stored_ledger_handler(State(state): State<AppState>) -> Response {
    let correlation_id = Uuid::new_v4();
    match load_teacher_ledger(state.store()).await {
        Ok(ledger) => json_response(StatusCode::OK, ledger),
        Err(err) => error_response(correlation_id, err),
    }
}

/// Handler for GET /finance/summary.
async fn finance_summary_handler(
    State(state): State<AppState>,
    query: Result<Query<SummaryQuery>, QueryRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let query = match query {
        Ok(Query(query)) => query,
        Err(rejection) => {
            return error_response(
                correlation_id,
                ApiErrorResponse::bad_request(ApiError::validation_error(rejection.body_text())),
            );
        }
    };
    let period = match PayMonth::new(query.month, query.year) {
        Ok(period) => period,
        Err(err) => return error_response(correlation_id, err),
    };

    let inputs = match fetch_finance_inputs(state.store()).await {
        Ok(inputs) => inputs,
        Err(err) => return error_response(correlation_id, err),
    };
    let totals = FinanceTotals {
        rollup: inputs.rollup(period, query.branch.as_deref()),
        vault_balance: inputs.vault(),
    };
    info!(
        correlation_id = %correlation_id,
        period = %period,
        branch = query.branch.as_deref().unwrap_or("*"),
        net = %totals.rollup.net,
        "Finance summary served"
    );
    json_response(StatusCode::OK, totals)
}

/// Handler for POST /finance/payments.
async fn record_payment_handler(
    State(state): State<AppState>,
    payload: Result<Json<StudentPayment>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let payment = match payload {
        Ok(Json(payment)) => payment,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };
    match record_payment(state.store(), payment).await {
        Ok(row) => json_response(StatusCode::CREATED, row),
        Err(err) => error_response(correlation_id, err),
    }
}

/// Handler for POST /finance/expenses.
async fn record_expense_handler(
    State(state): State<AppState>,
    payload: Result<Json<OtherExpense>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let expense = match payload {
        Ok(Json(expense)) => expense,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };
    match record_expense(state.store(), expense).await {
        Ok(row) => json_response(StatusCode::CREATED, row),
        Err(err) => error_response(correlation_id, err),
    }
}

/// Handler for POST /salaries/generate.
///
/// Reads the teacher, classes and attendance from the store and persists the
/// resulting salary.
async fn generate_salary_handler(
    State(state): State<AppState>,
    payload: Result<Json<GenerateSalaryRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };
    let period = match request.period.period() {
        Ok(period) => period,
        Err(err) => return error_response(correlation_id, err),
    };

    info!(
        correlation_id = %correlation_id,
        teacher_id = %request.teacher_id,
        period = %period,
        "Generating teacher salary"
    );
    match state
        .payroll()
        .generate_teacher_salary(&request.teacher_id, period)
        .await
    {
        Ok(salary) => json_response(StatusCode::OK, salary),
        Err(err) => error_response(correlation_id, err),
    }
}

/// Handler for POST /salaries/{id}/toggle.
async fn toggle_salary_handler(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let correlation_id = Uuid::new_v4();
    match state.payroll().toggle_status(&id).await {
        Ok(record) => {
            info!(correlation_id = %correlation_id, id = %id, status = ?record.status, "Salary status toggled");
            json_response(StatusCode::OK, record)
        }
        Err(err) => error_response(correlation_id, err),
    }
}

/// Handler for POST /content/{kind}.
async fn content_handler(
    State(state): State<AppState>,
    kind: Result<Path<ContentKind>, PathRejection>,
    payload: Result<Json<StudyContext>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let kind = match kind {
        Ok(Path(kind)) => kind,
        Err(rejection) => {
            return error_response(
                correlation_id,
                ApiErrorResponse::bad_request(ApiError::validation_error(rejection.body_text())),
            );
        }
    };
    let context = match payload {
        Ok(Json(context)) => context,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };
    let Some(assistant) = state.assistant() else {
        return error_response(
            correlation_id,
            ApiErrorResponse::unavailable("No text generator is configured"),
        );
    };

    match assistant.generate(kind, &context).await {
        Ok(text) => json_response(StatusCode::OK, GeneratedContent { kind, text }),
        Err(err) => error_response(correlation_id, err),
    }
}
