//! Planner assistance wired to the directory and the conflict validator.
//!
//! The pure planner computes a candidate slot; this service resolves the
//! section's configured room and then checks the placement against every
//! persisted timetable of the section. A placement that collides is surfaced
//! as a conflict, never silently skipped.

use chrono::Weekday;

use crate::api::{BranchId, ClassId, TimetableId};
use crate::db::repository::FullRepository;
use crate::models::timetable::{Period, TimeSettings, TimetableFilter};
use crate::scheduler::conflict::find_section_conflict;
use crate::scheduler::planner;
use crate::services::error::ServiceError;

/// Compute the next period for a timetable being edited and verify it
/// against the section's persisted timetables.
#[allow(clippy::too_many_arguments)]
pub async fn plan_next_period(
    repo: &dyn FullRepository,
    branch_id: BranchId,
    class_id: ClassId,
    section: &str,
    existing: &[Period],
    settings: &TimeSettings,
    days: &[Weekday],
    exclude: Option<TimetableId>,
) -> Result<Period, ServiceError> {
    let room_number = repo
        .section_room(class_id, section)
        .await
        .map_err(|e| ServiceError::from_lookup("class", class_id, e))?
        .unwrap_or_default();

    let candidate = planner::plan_next_period(existing, section, settings, days, &room_number)?;

    let others = repo
        .find_timetables(&TimetableFilter::for_section(branch_id, class_id, section))
        .await?;
    find_section_conflict(std::slice::from_ref(&candidate), &others, exclude)?;

    Ok(candidate)
}
