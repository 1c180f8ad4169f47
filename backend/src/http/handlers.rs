//! HTTP handlers for the REST API.
//!
//! Each handler corresponds to an API endpoint and delegates to the
//! service layer for business logic.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use tracing::info;

use super::dto::{
    AssignmentRequest, ConflictCheckResponse, ConflictDetailDto, ConflictDetailsResponse,
    DriverDto, HealthResponse, ScheduleListQuery, ScheduleListResponse,
};
use super::error::AppError;
use super::state::AppState;
use crate::db::repository::{FleetRepository, ScheduleRepository};
use crate::models::{parse_date, Schedule, ScheduleId, Shuttle};
use crate::services::{self, ConflictError, SuggestionReport};

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

// =============================================================================
// Health Check
// =============================================================================

/// GET /health
///
/// Health check endpoint to verify the service is running and the store is
/// reachable.
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    let db_status = match state.repository.health_check().await {
        Ok(true) => "connected".to_string(),
        Ok(false) => "disconnected".to_string(),
        Err(e) => format!("error: {}", e),
    };

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: "v1".to_string(),
        database: db_status,
    }))
}

// =============================================================================
// Conflict Engine
// =============================================================================

/// POST /v1/conflicts/check
pub async fn check_conflict(
    State(state): State<AppState>,
    Json(request): Json<AssignmentRequest>,
) -> HandlerResult<ConflictCheckResponse> {
    let candidate = request.to_candidate()?;
    let has_conflict =
        services::has_conflict(state.repository.as_ref(), &state.policy, &candidate).await?;

    Ok(Json(ConflictCheckResponse { has_conflict }))
}

/// POST /v1/conflicts/details
pub async fn conflict_details(
    State(state): State<AppState>,
    Json(request): Json<AssignmentRequest>,
) -> HandlerResult<ConflictDetailsResponse> {
    let candidate = request.to_candidate()?;
    let details =
        services::describe_conflicts(state.repository.as_ref(), &state.policy, &candidate).await?;

    Ok(Json(ConflictDetailsResponse {
        has_conflict: !details.is_empty(),
        conflicts: details.into_iter().map(ConflictDetailDto::from).collect(),
    }))
}

/// POST /v1/conflicts/suggestions
pub async fn conflict_suggestions(
    State(state): State<AppState>,
    Json(request): Json<AssignmentRequest>,
) -> HandlerResult<SuggestionReport> {
    let candidate = request.to_candidate()?;
    let report =
        services::suggest_alternatives(state.repository.as_ref(), &state.policy, &candidate)
            .await?;

    Ok(Json(report))
}

// =============================================================================
// Schedule CRUD
// =============================================================================

/// GET /v1/schedules?date=YYYY-MM-DD
pub async fn list_schedules(
    State(state): State<AppState>,
    Query(query): Query<ScheduleListQuery>,
) -> HandlerResult<ScheduleListResponse> {
    let date = parse_date(&query.date).map_err(ConflictError::from)?;
    let schedules = state.repository.list_schedules_for_date(date).await?;
    let total = schedules.len();

    Ok(Json(ScheduleListResponse {
        date,
        schedules,
        total,
    }))
}

/// POST /v1/schedules
///
/// Create a schedule if it does not conflict; 409 with details and
/// suggestions otherwise.
pub async fn create_schedule(
    State(state): State<AppState>,
    Json(request): Json<AssignmentRequest>,
) -> Result<(StatusCode, Json<Schedule>), AppError> {
    let candidate = request.to_candidate()?;

    let _gate = state.assignment_gate.lock().await;
    let schedule =
        services::create_checked(state.repository.as_ref(), &state.policy, &candidate).await?;

    Ok((StatusCode::CREATED, Json(schedule)))
}

/// GET /v1/schedules/{schedule_id}
pub async fn get_schedule(
    State(state): State<AppState>,
    Path(schedule_id): Path<i64>,
) -> HandlerResult<Schedule> {
    let schedule = state
        .repository
        .get_schedule(ScheduleId::new(schedule_id))
        .await?;
    Ok(Json(schedule))
}

/// PUT /v1/schedules/{schedule_id}
pub async fn update_schedule(
    State(state): State<AppState>,
    Path(schedule_id): Path<i64>,
    Json(request): Json<AssignmentRequest>,
) -> HandlerResult<Schedule> {
    let candidate = request.to_candidate()?;

    let _gate = state.assignment_gate.lock().await;
    let schedule = services::update_checked(
        state.repository.as_ref(),
        &state.policy,
        ScheduleId::new(schedule_id),
        &candidate,
    )
    .await?;

    Ok(Json(schedule))
}

/// DELETE /v1/schedules/{schedule_id}
pub async fn delete_schedule(
    State(state): State<AppState>,
    Path(schedule_id): Path<i64>,
) -> Result<StatusCode, AppError> {
    let id = ScheduleId::new(schedule_id);
    state.repository.soft_delete_schedule(id).await?;
    info!("Deleted schedule {}", id);
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// Directories
// =============================================================================

/// GET /v1/shuttles
pub async fn list_shuttles(State(state): State<AppState>) -> HandlerResult<Vec<Shuttle>> {
    Ok(Json(state.repository.list_shuttles().await?))
}

/// GET /v1/drivers
pub async fn list_drivers(State(state): State<AppState>) -> HandlerResult<Vec<DriverDto>> {
    let drivers = state.repository.list_drivers().await?;
    Ok(Json(drivers.into_iter().map(DriverDto::from).collect()))
}
