//! Data Transfer Objects for the HTTP API.
//!
//! Domain types (Timetable, Period, SaveOutcome, …) already derive
//! Serialize/Deserialize and cross the wire as-is; this module adds the
//! request/response wrappers and query-parameter shapes.

use chrono::Weekday;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::{BranchId, ClassId, TimetableId};
use crate::db::models::Teacher;
use crate::models::timetable::{Period, TimeSettings, Timetable, TimetableFilter, TimetableStatus};
use crate::scheduler::availability::Occupancy;
use crate::scheduler::conflict::ConflictDetail;

// Re-export the payload types handlers return directly.
pub use crate::services::lifecycle::{SaveOutcome, TeacherWarning};

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Status of the service
    pub status: String,
    /// Version of the API
    pub version: String,
    /// Store connection status
    pub store: String,
}

/// Timetable list response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimetableListResponse {
    pub timetables: Vec<Timetable>,
    pub total: usize,
}

/// Query parameters for listing timetables.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TimetableQuery {
    #[serde(default)]
    pub branch_id: Option<Uuid>,
    #[serde(default)]
    pub class_id: Option<Uuid>,
    #[serde(default)]
    pub section: Option<String>,
    #[serde(default)]
    pub academic_year: Option<String>,
    #[serde(default)]
    pub status: Option<TimetableStatus>,
}

impl From<TimetableQuery> for TimetableFilter {
    fn from(query: TimetableQuery) -> Self {
        TimetableFilter {
            branch_id: query.branch_id.map(BranchId::new),
            class_id: query.class_id.map(ClassId::new),
            section: query.section,
            academic_year: query.academic_year,
            status: query.status,
        }
    }
}

/// Request body for a lifecycle status transition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusUpdateRequest {
    pub status: TimetableStatus,
}

/// Request body for planner assistance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanNextPeriodRequest {
    pub branch_id: BranchId,
    pub class_id: ClassId,
    pub section: String,
    #[serde(default)]
    pub existing_periods: Vec<Period>,
    pub time_settings: TimeSettings,
    /// Ordered school days, e.g. ["Mon", "Tue", "Wed", "Thu", "Fri"]
    pub days: Vec<Weekday>,
    #[serde(default)]
    pub exclude_timetable_id: Option<TimetableId>,
}

/// Planner assistance response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanNextPeriodResponse {
    pub period: Period,
}

/// Request body for validation without persisting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidateTimetableRequest {
    pub timetable: Timetable,
    #[serde(default)]
    pub exclude_timetable_id: Option<TimetableId>,
}

/// Validation result for interactive editing. Conflicts are reported in the
/// body rather than as an error status so the editor can keep the session
/// alive.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidateTimetableResponse {
    pub valid: bool,
    /// "duplicate_period" or "overlap" when invalid
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conflict: Option<ConflictDetail>,
}

/// Query parameters for availability endpoints. A partially specified slot
/// is permitted on the roster endpoint: it disables filtering.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AvailabilityQuery {
    pub academic_year: String,
    #[serde(default)]
    pub day: Option<String>,
    #[serde(default)]
    pub start: Option<String>,
    #[serde(default)]
    pub end: Option<String>,
    #[serde(default)]
    pub exclude_timetable_id: Option<Uuid>,
}

/// Roster endpoint response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailableTeachersResponse {
    pub teachers: Vec<Teacher>,
    pub total: usize,
    /// False when the slot was incomplete and the full roster was returned
    pub filtered: bool,
}

/// Single-teacher availability response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeacherAvailabilityResponse {
    pub available: bool,
    /// The colliding commitment when unavailable
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conflict: Option<Occupancy>,
}
