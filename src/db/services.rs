//! High-level store operations.
//!
//! Free functions that work against any repository implementation. The
//! orchestration that validates timetables before persisting them lives in
//! [`crate::services::lifecycle`]; these functions are the thin store-facing
//! layer underneath it.

use crate::api::TimetableId;
use crate::db::repository::{RepositoryError, RepositoryResult, TimetableRepository};
use crate::models::timetable::{Timetable, TimetableFilter};

/// Check that the backing store is reachable.
pub async fn health_check(repo: &dyn TimetableRepository) -> RepositoryResult<bool> {
    repo.health_check().await
}

/// All timetables matching `filter`.
pub async fn list_timetables(
    repo: &dyn TimetableRepository,
    filter: &TimetableFilter,
) -> RepositoryResult<Vec<Timetable>> {
    repo.find_timetables(filter).await
}

pub async fn get_timetable(
    repo: &dyn TimetableRepository,
    id: TimetableId,
) -> RepositoryResult<Timetable> {
    repo.get_timetable(id).await
}

/// Persist a validated timetable. The store's uniqueness constraint is the
/// backstop against racing saves; see
/// [`TimetableRepository::save_timetable`].
pub async fn store_timetable(
    repo: &dyn TimetableRepository,
    timetable: Timetable,
) -> RepositoryResult<Timetable> {
    repo.save_timetable(timetable).await
}

/// Hard-remove an archived timetable.
///
/// Deletion is two-phase: a timetable must be archived before it can be
/// purged, and every purge is audited. Historical records referencing the
/// timetable keep only its id after this point.
pub async fn purge_timetable(
    repo: &dyn TimetableRepository,
    id: TimetableId,
) -> RepositoryResult<()> {
    let timetable = repo.get_timetable(id).await?;
    if !timetable.is_archived() {
        return Err(RepositoryError::validation(format!(
            "Timetable {} is {}; only archived timetables can be purged",
            id, timetable.status
        ))
        .with_operation("purge_timetable"));
    }

    tracing::warn!(
        timetable_id = %id,
        name = %timetable.name,
        branch_id = %timetable.branch_id,
        section = %timetable.section,
        "purging archived timetable"
    );
    repo.delete_timetable(id).await
}
