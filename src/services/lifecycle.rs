//! Timetable lifecycle orchestration.
//!
//! Create and update both run the same gauntlet: resolve every referenced
//! directory entity, validate the submitted period list locally, re-run the
//! section conflict validator against the authoritative store snapshot, and
//! only then persist. Teacher double-booking is advisory: it produces
//! warnings alongside the saved timetable, never a rejection.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::api::{TeacherId, TimetableId};
use crate::db::repository::FullRepository;
use crate::db::services as db_services;
use crate::models::interval::TimeInterval;
use crate::models::timetable::{Timetable, TimetableFilter, TimetableStatus};
use crate::scheduler::availability::{SlotQuery, TeacherIndex};
use crate::scheduler::conflict::{find_internal_conflict, find_section_conflict};
use crate::services::error::ServiceError;

/// Advisory notice: a period's teacher is already committed elsewhere at an
/// overlapping slot. The save went through regardless.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeacherWarning {
    pub teacher_id: TeacherId,
    pub period_number: u32,
    pub slot: TimeInterval,
    /// Name of the timetable holding the conflicting commitment
    pub conflicting_timetable: String,
}

/// Result of a successful create or update.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveOutcome {
    pub timetable: Timetable,
    /// Advisory teacher double-booking notices
    pub warnings: Vec<TeacherWarning>,
}

/// Create a new timetable: verify references, validate, persist.
pub async fn create_timetable(
    repo: &dyn FullRepository,
    mut timetable: Timetable,
) -> Result<SaveOutcome, ServiceError> {
    timetable.id = None;
    save_checked(repo, timetable, None).await
}

/// Update an existing timetable, validating against every timetable of the
/// same section except its own superseded state.
///
/// The persisted status is preserved; status changes go through
/// [`transition_status`].
pub async fn update_timetable(
    repo: &dyn FullRepository,
    id: TimetableId,
    mut timetable: Timetable,
) -> Result<SaveOutcome, ServiceError> {
    let stored = repo
        .get_timetable(id)
        .await
        .map_err(|e| ServiceError::from_lookup("timetable", id, e))?;
    timetable.id = Some(id);
    timetable.status = stored.status;
    save_checked(repo, timetable, Some(id)).await
}

/// Move a timetable along its lifecycle: `draft → active → inactive`, any
/// non-draft state → `archived`.
pub async fn transition_status(
    repo: &dyn FullRepository,
    id: TimetableId,
    next: TimetableStatus,
) -> Result<Timetable, ServiceError> {
    let mut timetable = repo
        .get_timetable(id)
        .await
        .map_err(|e| ServiceError::from_lookup("timetable", id, e))?;

    if !timetable.status.can_transition_to(next) {
        return Err(ServiceError::InvalidTransition {
            from: timetable.status,
            to: next,
        });
    }

    tracing::info!(timetable_id = %id, from = %timetable.status, to = %next, "timetable status transition");
    timetable.status = next;
    let saved = db_services::store_timetable(repo, timetable).await?;
    Ok(saved)
}

/// First phase of deletion: soft-retire the timetable. The hard purge is
/// [`crate::db::services::purge_timetable`].
pub async fn archive_timetable(
    repo: &dyn FullRepository,
    id: TimetableId,
) -> Result<Timetable, ServiceError> {
    transition_status(repo, id, TimetableStatus::Archived).await
}

/// Full validation without persisting: structural checks, directory
/// reference resolution, internal consistency, and the cross-timetable
/// section conflict scan.
pub async fn validate_timetable(
    repo: &dyn FullRepository,
    timetable: &Timetable,
    exclude: Option<TimetableId>,
) -> Result<(), ServiceError> {
    validate_shape(timetable)?;
    verify_references(repo, timetable).await?;

    find_internal_conflict(&timetable.periods, &timetable.name)?;

    // Authoritative cross-timetable check; interactive state can be stale
    // relative to concurrently-saved timetables.
    let section_filter =
        TimetableFilter::for_section(timetable.branch_id, timetable.class_id, &timetable.section);
    let others = repo.find_timetables(&section_filter).await?;
    find_section_conflict(&timetable.periods, &others, exclude)?;

    Ok(())
}

async fn save_checked(
    repo: &dyn FullRepository,
    timetable: Timetable,
    exclude: Option<TimetableId>,
) -> Result<SaveOutcome, ServiceError> {
    validate_timetable(repo, &timetable, exclude).await?;

    let warnings = teacher_warnings(repo, &timetable, exclude).await?;

    let saved = db_services::store_timetable(repo, timetable).await?;
    tracing::info!(
        timetable_id = ?saved.id,
        name = %saved.name,
        periods = saved.periods.len(),
        warnings = warnings.len(),
        "timetable saved"
    );
    Ok(SaveOutcome {
        timetable: saved,
        warnings,
    })
}

fn validate_shape(timetable: &Timetable) -> Result<(), ServiceError> {
    timetable
        .time_settings
        .validate()
        .map_err(ServiceError::Validation)?;

    for period in &timetable.periods {
        if !period.interval.is_well_formed() {
            return Err(ServiceError::Validation(format!(
                "period {} on {} has an inverted time span",
                period.period_number,
                period.day()
            )));
        }
    }

    if let Some(stray) = timetable.section_mismatch() {
        return Err(ServiceError::Validation(format!(
            "period {} belongs to section \"{}\" but the timetable is for section \"{}\"",
            stray.period_number, stray.section, timetable.section
        )));
    }

    Ok(())
}

async fn verify_references(
    repo: &dyn FullRepository,
    timetable: &Timetable,
) -> Result<(), ServiceError> {
    repo.get_branch(timetable.branch_id)
        .await
        .map_err(|e| ServiceError::from_lookup("branch", timetable.branch_id, e))?;

    let class = repo
        .get_class(timetable.class_id)
        .await
        .map_err(|e| ServiceError::from_lookup("class", timetable.class_id, e))?;
    if class.branch_id != timetable.branch_id {
        return Err(ServiceError::Validation(format!(
            "class {} does not belong to branch {}",
            timetable.class_id, timetable.branch_id
        )));
    }

    let subject_ids: BTreeSet<_> = timetable
        .periods
        .iter()
        .filter_map(|p| p.subject_id)
        .collect();
    for subject_id in subject_ids {
        repo.get_subject(subject_id)
            .await
            .map_err(|e| ServiceError::from_lookup("subject", subject_id, e))?;
    }

    let teacher_ids: BTreeSet<_> = timetable
        .periods
        .iter()
        .filter_map(|p| p.teacher_id)
        .collect();
    for teacher_id in teacher_ids {
        repo.get_teacher(teacher_id)
            .await
            .map_err(|e| ServiceError::from_lookup("teacher", teacher_id, e))?;
    }

    Ok(())
}

/// Advisory teacher double-booking scan against the branch/year index,
/// excluding the timetable being saved. Double-booking within the submitted
/// list itself cannot survive to this point: overlapping same-day periods
/// are hard-rejected by the internal conflict check.
async fn teacher_warnings(
    repo: &dyn FullRepository,
    timetable: &Timetable,
    exclude: Option<TimetableId>,
) -> Result<Vec<TeacherWarning>, ServiceError> {
    let snapshot = repo
        .find_timetables(&TimetableFilter::for_branch_year(
            timetable.branch_id,
            &timetable.academic_year,
        ))
        .await?;
    let index = TeacherIndex::build(&snapshot);

    let mut warnings = Vec::new();
    for period in &timetable.periods {
        let Some(teacher_id) = period.teacher_id else {
            continue;
        };
        let slot = SlotQuery {
            day: period.day(),
            start: period.start(),
            end: period.end(),
        };

        if let Some(hit) = index.conflicting_occupancy(teacher_id, slot, exclude) {
            warnings.push(TeacherWarning {
                teacher_id,
                period_number: period.period_number,
                slot: period.interval,
                conflicting_timetable: hit.timetable_name.clone(),
            });
        }
    }

    for warning in &warnings {
        tracing::debug!(
            teacher_id = %warning.teacher_id,
            slot = %warning.slot,
            conflicting = %warning.conflicting_timetable,
            "teacher double-booked (advisory)"
        );
    }

    Ok(warnings)
}
