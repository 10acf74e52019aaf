//! HTTP handlers for the REST API.
//!
//! Each handler corresponds to an API endpoint and delegates to the service
//! layer for scheduling logic. Handlers that write invalidate the
//! availability cache: a cached index is only valid while the underlying
//! timetable set is unchanged.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::NaiveTime;
use uuid::Uuid;

use super::dto::{
    AvailabilityQuery, AvailableTeachersResponse, HealthResponse, PlanNextPeriodRequest,
    PlanNextPeriodResponse, SaveOutcome, StatusUpdateRequest, TeacherAvailabilityResponse,
    TimetableListResponse, TimetableQuery, ValidateTimetableRequest, ValidateTimetableResponse,
};
use super::error::AppError;
use super::state::AppState;
use crate::api::{BranchId, TeacherId, TimetableId};
use crate::db::services as db_services;
use crate::models::timetable::{Timetable, TimetableFilter};
use crate::scheduler::availability::SlotQuery;
use crate::scheduler::conflict::ConflictError;
use crate::services;
use crate::services::error::ServiceError;

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
    let store_status = match db_services::health_check(state.repository.as_ref()).await {
        Ok(true) => "connected".to_string(),
        Ok(false) => "disconnected".to_string(),
        Err(e) => format!("error: {}", e),
    };

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: "v1".to_string(),
        store: store_status,
    }))
}

// =============================================================================
// Timetable CRUD
// =============================================================================

/// GET /v1/timetables
///
/// List timetables, optionally filtered by branch, class, section, academic
/// year, and status.
pub async fn list_timetables(
    State(state): State<AppState>,
    Query(query): Query<TimetableQuery>,
) -> HandlerResult<TimetableListResponse> {
    let filter: TimetableFilter = query.into();
    let timetables = db_services::list_timetables(state.repository.as_ref(), &filter).await?;
    let total = timetables.len();

    Ok(Json(TimetableListResponse { timetables, total }))
}

/// GET /v1/timetables/{id}
pub async fn get_timetable(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> HandlerResult<Timetable> {
    let timetable =
        db_services::get_timetable(state.repository.as_ref(), TimetableId::new(id)).await?;
    Ok(Json(timetable))
}

/// POST /v1/timetables
///
/// Create a timetable: verify references, validate conflicts, persist.
/// Advisory teacher warnings ride along in the response.
pub async fn create_timetable(
    State(state): State<AppState>,
    Json(timetable): Json<Timetable>,
) -> Result<(StatusCode, Json<SaveOutcome>), AppError> {
    let outcome = services::create_timetable(state.repository.as_ref(), timetable).await?;
    state.availability_cache.invalidate_all();
    Ok((StatusCode::CREATED, Json(outcome)))
}

/// PUT /v1/timetables/{id}
///
/// Update a timetable, validating against every timetable of its section
/// except its own superseded state.
pub async fn update_timetable(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(timetable): Json<Timetable>,
) -> HandlerResult<SaveOutcome> {
    let outcome =
        services::update_timetable(state.repository.as_ref(), TimetableId::new(id), timetable)
            .await?;
    state.availability_cache.invalidate_all();
    Ok(Json(outcome))
}

/// POST /v1/timetables/{id}/status
///
/// Lifecycle transition: draft → active → inactive, any non-draft →
/// archived.
pub async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<StatusUpdateRequest>,
) -> HandlerResult<Timetable> {
    let timetable =
        services::transition_status(state.repository.as_ref(), TimetableId::new(id), request.status)
            .await?;
    state.availability_cache.invalidate_all();
    Ok(Json(timetable))
}

/// DELETE /v1/timetables/{id}
///
/// Audited hard purge. Refused unless the timetable is already archived.
pub async fn delete_timetable(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    db_services::purge_timetable(state.repository.as_ref(), TimetableId::new(id)).await?;
    state.availability_cache.invalidate_all();
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// Planner & Validation
// =============================================================================

/// POST /v1/timetables/plan-next-period
///
/// Compute the next period for a timetable being edited. The placement is
/// checked against the section's persisted timetables before it is returned.
pub async fn plan_next_period(
    State(state): State<AppState>,
    Json(request): Json<PlanNextPeriodRequest>,
) -> HandlerResult<PlanNextPeriodResponse> {
    let period = services::plan_next_period(
        state.repository.as_ref(),
        request.branch_id,
        request.class_id,
        &request.section,
        &request.existing_periods,
        &request.time_settings,
        &request.days,
        request.exclude_timetable_id,
    )
    .await?;

    Ok(Json(PlanNextPeriodResponse { period }))
}

/// POST /v1/timetables/validate
///
/// Run full validation without persisting. Conflicts come back in the body
/// so interactive editors can keep the session alive.
pub async fn validate_timetable(
    State(state): State<AppState>,
    Json(request): Json<ValidateTimetableRequest>,
) -> HandlerResult<ValidateTimetableResponse> {
    let result = services::validate_timetable(
        state.repository.as_ref(),
        &request.timetable,
        request.exclude_timetable_id,
    )
    .await;

    match result {
        Ok(()) => Ok(Json(ValidateTimetableResponse {
            valid: true,
            kind: None,
            conflict: None,
        })),
        Err(ServiceError::Conflict(conflict)) => {
            let kind = match conflict {
                ConflictError::DuplicatePeriod(_) => "duplicate_period",
                ConflictError::Overlap(_) => "overlap",
            };
            Ok(Json(ValidateTimetableResponse {
                valid: false,
                kind: Some(kind.to_string()),
                conflict: Some(conflict.detail().clone()),
            }))
        }
        Err(other) => Err(other.into()),
    }
}

// =============================================================================
// Teacher Availability
// =============================================================================

fn parse_time(raw: &str) -> Result<NaiveTime, AppError> {
    NaiveTime::parse_from_str(raw, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
        .map_err(|_| AppError::BadRequest(format!("invalid time: {}", raw)))
}

/// A slot is usable only when day, start, and end are all present. Partial
/// slots yield `None`; malformed values are a client error.
fn parse_slot(query: &AvailabilityQuery) -> Result<Option<SlotQuery>, AppError> {
    let (Some(day), Some(start), Some(end)) = (&query.day, &query.start, &query.end) else {
        return Ok(None);
    };
    let day = day
        .parse()
        .map_err(|_| AppError::BadRequest(format!("invalid day: {}", day)))?;
    let slot = SlotQuery {
        day,
        start: parse_time(start)?,
        end: parse_time(end)?,
    };
    if !slot.is_well_formed() {
        return Err(AppError::BadRequest(
            "slot start must precede end".to_string(),
        ));
    }
    Ok(Some(slot))
}

/// GET /v1/branches/{branch_id}/available-teachers
///
/// The branch roster filtered down to teachers free at the queried slot.
/// With an incomplete slot the full roster comes back unfiltered — an
/// incomplete slot cannot yet conflict.
pub async fn available_teachers(
    State(state): State<AppState>,
    Path(branch_id): Path<Uuid>,
    Query(query): Query<AvailabilityQuery>,
) -> HandlerResult<AvailableTeachersResponse> {
    let branch_id = BranchId::new(branch_id);
    let slot = parse_slot(&query)?;
    let exclude = query.exclude_timetable_id.map(TimetableId::new);

    state
        .repository
        .get_branch(branch_id)
        .await
        .map_err(|e| ServiceError::from_lookup("branch", branch_id, e))?;

    let index = state
        .availability_cache
        .get_or_build(state.repository.as_ref(), branch_id, &query.academic_year)
        .await?;

    let teachers = services::available_teachers(
        state.repository.as_ref(),
        &index,
        branch_id,
        slot,
        exclude,
    )
    .await?;
    let total = teachers.len();

    Ok(Json(AvailableTeachersResponse {
        teachers,
        total,
        filtered: slot.is_some(),
    }))
}

/// GET /v1/branches/{branch_id}/teachers/{teacher_id}/availability
///
/// Is one teacher free at a fully specified slot? Advisory: the caller may
/// still force-assign an unavailable teacher.
pub async fn teacher_availability(
    State(state): State<AppState>,
    Path((branch_id, teacher_id)): Path<(Uuid, Uuid)>,
    Query(query): Query<AvailabilityQuery>,
) -> HandlerResult<TeacherAvailabilityResponse> {
    let branch_id = BranchId::new(branch_id);
    let teacher_id = TeacherId::new(teacher_id);
    let Some(slot) = parse_slot(&query)? else {
        return Err(AppError::BadRequest(
            "day, start, and end are required".to_string(),
        ));
    };
    let exclude = query.exclude_timetable_id.map(TimetableId::new);

    state
        .repository
        .get_teacher(teacher_id)
        .await
        .map_err(|e| ServiceError::from_lookup("teacher", teacher_id, e))?;

    let index = state
        .availability_cache
        .get_or_build(state.repository.as_ref(), branch_id, &query.academic_year)
        .await?;

    let conflict = index
        .conflicting_occupancy(teacher_id, slot, exclude)
        .cloned();

    Ok(Json(TeacherAvailabilityResponse {
        available: conflict.is_none(),
        conflict,
    }))
}
