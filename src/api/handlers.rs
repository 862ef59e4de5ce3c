//! HTTP request handlers for the gateway API.
//!
//! This module contains the handler functions for all API endpoints.
//! Rules-engine endpoints answer locally; the remaining endpoints go
//! through the shared gateway.

use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::{classify_work_duration_at, compute_period, compute_period_from_date};
use crate::catalog::CodeClass;
use crate::error::{GatewayError, ValidationError, ValidationRule};
use crate::gateway::{GatewayState, RateUsage};
use crate::models::{DocumentKind, EmployerCategory, Environment};
use crate::validation::check_national_id;

use super::request::{
    HireSubmission, NationalIdRequest, PenaltyRequest, PeriodRequest, TerminationSubmission,
    WorkDurationRequest,
};
use super::response::{ApiError, ApiErrorResponse};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/status", get(status_handler))
        .route("/validation/national-id", post(national_id_handler))
        .route("/periods", post(period_handler))
        .route("/work-duration", post(work_duration_handler))
        .route("/penalties", post(penalty_handler))
        .route("/error-codes/:code", get(error_code_handler))
        .route("/hires", post(register_hires_handler))
        .route("/hires/:national_id", get(query_hires_handler))
        .route("/terminations", post(register_terminations_handler))
        .route("/terminations/:national_id", get(query_terminations_handler))
        .route(
            "/period-summaries/:category/:year/:month",
            get(period_summary_handler),
        )
        .route("/documents/:kind/:reference_code", get(document_handler))
        .with_state(state)
}

/// Body of `GET /status`.
#[derive(Debug, Clone, Serialize)]
pub struct GatewayStatus {
    /// Lifecycle state of the gateway.
    pub state: GatewayState,
    /// Active environment; omitted without credentials or while a call
    /// holds the gateway.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub environment: Option<Environment>,
    /// Rate limiter usage; omitted while a call holds the gateway.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rate_usage: Option<RateUsage>,
}

/// Body of `POST /validation/national-id`.
#[derive(Debug, Clone, Serialize)]
pub struct NationalIdResponse {
    /// The checked id.
    pub national_id: String,
    /// Whether the id passed format and checksum checks.
    pub valid: bool,
    /// The failing rule when invalid.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ValidationError>,
}

fn json_response<T: Serialize>(status: StatusCode, body: &T) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        Json(body),
    )
        .into_response()
}

fn error_response(correlation_id: Uuid, error: GatewayError) -> Response {
    warn!(
        correlation_id = %correlation_id,
        error = %error,
        "Request failed"
    );
    let api_error: ApiErrorResponse = error.into();
    json_response(api_error.status, &api_error.error)
}

/// Turns a JSON extraction failure into a 400 response.
fn rejection_response(correlation_id: Uuid, rejection: JsonRejection) -> Response {
    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            let body_text = err.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "JSON data error"
            );
            if body_text.contains("missing field") || body_text.contains("unknown variant") {
                ApiError::new("VALIDATION_ERROR", body_text)
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
    json_response(StatusCode::BAD_REQUEST, &error)
}

async fn status_handler(State(state): State<AppState>) -> Response {
    let status = match state.gateway().try_lock() {
        Ok(gateway) => GatewayStatus {
            state: gateway.state(),
            environment: gateway.environment(),
            rate_usage: Some(gateway.rate_usage()),
        },
        Err(_) => GatewayStatus {
            state: state.gateway_state(),
            environment: None,
            rate_usage: None,
        },
    };
    json_response(StatusCode::OK, &status)
}

async fn national_id_handler(payload: Result<Json<NationalIdRequest>, JsonRejection>) -> Response {
    let correlation_id = Uuid::new_v4();
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };
    let error = check_national_id(request.national_id.trim()).err();
    let response = NationalIdResponse {
        national_id: request.national_id,
        valid: error.is_none(),
        error,
    };
    json_response(StatusCode::OK, &response)
}

async fn period_handler(payload: Result<Json<PeriodRequest>, JsonRejection>) -> Response {
    let correlation_id = Uuid::new_v4();
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };
    let period = match (request.date, request.year, request.month) {
        (Some(date), _, _) => compute_period_from_date(request.employer_category, date),
        (None, Some(year), Some(month)) => compute_period(request.employer_category, year, month),
        _ => Err(ValidationError::new(
            "date",
            ValidationRule::Calendar,
            "either date, or both year and month, are required",
        )
        .into()),
    };
    match period {
        Ok(period) => json_response(StatusCode::OK, &period),
        Err(error) => error_response(correlation_id, error),
    }
}

async fn work_duration_handler(
    State(state): State<AppState>,
    payload: Result<Json<WorkDurationRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };
    match classify_work_duration_at(request.start_date, request.end_date, state.today()) {
        Ok(duration) => json_response(StatusCode::OK, &duration),
        Err(error) => error_response(correlation_id, error),
    }
}

async fn penalty_handler(
    State(state): State<AppState>,
    payload: Result<Json<PenaltyRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };
    let reference_date = request.reference_date.unwrap_or_else(|| state.today());
    let assessment = state.penalties().estimate(request.hire_date, reference_date);
    json_response(StatusCode::OK, &assessment)
}

async fn error_code_handler(State(state): State<AppState>, Path(code): Path<i32>) -> Response {
    match state.catalog().classify(code) {
        CodeClass::Known(entry) => json_response(StatusCode::OK, entry),
        CodeClass::Unrecognized(code) => json_response(
            StatusCode::NOT_FOUND,
            &ApiError::with_details(
                "UNRECOGNIZED_CODE",
                format!("Result code {} is not in the catalog", code),
                "Escalate for investigation; the service returned a code with no known meaning",
            ),
        ),
    }
}

async fn register_hires_handler(
    State(state): State<AppState>,
    payload: Result<Json<HireSubmission>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let submission = match payload {
        Ok(Json(submission)) => submission,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };
    info!(
        correlation_id = %correlation_id,
        record_count = submission.records.len(),
        "Processing hire submission"
    );
    let mut gateway = state.gateway().lock().await;
    match gateway.register_hire(&submission.records).await {
        Ok(result) => json_response(StatusCode::OK, &result),
        Err(error) => error_response(correlation_id, error),
    }
}

async fn register_terminations_handler(
    State(state): State<AppState>,
    payload: Result<Json<TerminationSubmission>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let submission = match payload {
        Ok(Json(submission)) => submission,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };
    info!(
        correlation_id = %correlation_id,
        record_count = submission.records.len(),
        "Processing termination submission"
    );
    let mut gateway = state.gateway().lock().await;
    match gateway.register_termination(&submission.records).await {
        Ok(result) => json_response(StatusCode::OK, &result),
        Err(error) => error_response(correlation_id, error),
    }
}

async fn query_hires_handler(
    State(state): State<AppState>,
    Path(national_id): Path<String>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let mut gateway = state.gateway().lock().await;
    match gateway.query_hire(&national_id).await {
        Ok(result) => json_response(StatusCode::OK, &result),
        Err(error) => error_response(correlation_id, error),
    }
}

async fn query_terminations_handler(
    State(state): State<AppState>,
    Path(national_id): Path<String>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let mut gateway = state.gateway().lock().await;
    match gateway.query_termination(&national_id).await {
        Ok(result) => json_response(StatusCode::OK, &result),
        Err(error) => error_response(correlation_id, error),
    }
}

async fn period_summary_handler(
    State(state): State<AppState>,
    Path((category, year, month)): Path<(EmployerCategory, i32, u32)>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let mut gateway = state.gateway().lock().await;
    match gateway.fetch_period_summary(category, year, month).await {
        Ok(summary) => json_response(StatusCode::OK, &summary),
        Err(error) => error_response(correlation_id, error),
    }
}

async fn document_handler(
    State(state): State<AppState>,
    Path((kind, reference_code)): Path<(DocumentKind, String)>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let mut gateway = state.gateway().lock().await;
    let document = match gateway
        .fetch_confirmation_document(kind, &reference_code)
        .await
    {
        Ok(document) => document,
        Err(error) => return error_response(correlation_id, error),
    };
    drop(gateway);

    let Some(bytes) = document.bytes() else {
        let message = document
            .top_level_message
            .clone()
            .unwrap_or_else(|| "The service returned no document".to_string());
        return json_response(
            StatusCode::NOT_FOUND,
            &ApiError::with_details(
                "DOCUMENT_NOT_AVAILABLE",
                message,
                format!(
                    "Top-level code: {}",
                    document
                        .top_level_code
                        .map_or_else(|| "none".to_string(), |code| code.to_string())
                ),
            ),
        );
    };

    let disposition = format!(
        "attachment; filename=\"{}.pdf\"",
        document.reference_code.replace('"', "")
    );
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes.to_vec(),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_serializes_state() {
        let status = GatewayStatus {
            state: GatewayState::Unconfigured,
            environment: None,
            rate_usage: Some(RateUsage {
                used: 0,
                limit: 30,
                window_secs: 60,
            }),
        };
        let json = serde_json::to_value(&status).unwrap();
        assert_eq!(json["state"], "unconfigured");
        assert!(json.get("environment").is_none());
        assert_eq!(json["rate_usage"]["limit"], 30);
    }
}
