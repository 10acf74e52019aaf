//! Teacher availability orchestration.
//!
//! Fetches the branch/year snapshot the index needs and combines the two
//! checks a slot assignment requires: free across the branch's persisted
//! timetables, and free within the timetable currently being edited.

use crate::api::{BranchId, TeacherId, TimetableId};
use crate::db::models::Teacher;
use crate::db::repository::FullRepository;
use crate::models::timetable::{Period, TimetableFilter};
use crate::scheduler::availability::{slot_free_locally, SlotQuery, TeacherIndex};
use crate::services::error::ServiceError;

/// Build the availability index for one branch and academic year from a
/// fresh store snapshot. The branch reference is verified first.
pub async fn build_index(
    repo: &dyn FullRepository,
    branch_id: BranchId,
    academic_year: &str,
) -> Result<TeacherIndex, ServiceError> {
    repo.get_branch(branch_id)
        .await
        .map_err(|e| ServiceError::from_lookup("branch", branch_id, e))?;

    let snapshot = repo
        .find_timetables(&TimetableFilter::for_branch_year(branch_id, academic_year))
        .await?;
    Ok(TeacherIndex::build(&snapshot))
}

/// Combined availability check: the teacher must be free both in the index
/// and within the in-progress edit (`periods`, ignoring `editing_index`).
pub fn check_availability(
    index: &TeacherIndex,
    periods: &[Period],
    editing_index: Option<usize>,
    teacher_id: TeacherId,
    slot: SlotQuery,
    exclude: Option<TimetableId>,
) -> bool {
    index.is_available(teacher_id, slot, exclude)
        && slot_free_locally(periods, editing_index, teacher_id, slot)
}

/// The branch roster filtered down to teachers free at `slot`.
///
/// An incomplete slot (`None`) returns the full roster — a slot that is not
/// yet fully specified cannot conflict with anything.
pub async fn available_teachers(
    repo: &dyn FullRepository,
    index: &TeacherIndex,
    branch_id: BranchId,
    slot: Option<SlotQuery>,
    exclude: Option<TimetableId>,
) -> Result<Vec<Teacher>, ServiceError> {
    let roster = repo
        .list_teachers(branch_id)
        .await
        .map_err(|e| ServiceError::from_lookup("branch", branch_id, e))?;

    let Some(slot) = slot else {
        return Ok(roster);
    };
    Ok(roster
        .into_iter()
        .filter(|teacher| index.is_available(teacher.id, slot, exclude))
        .collect())
}
