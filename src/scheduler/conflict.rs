//! Section conflict validation.
//!
//! A candidate period list for a (branch, class, section) is checked against
//! every other non-archived timetable of that same section. Validation is
//! fail-fast: the first violation aborts with enough detail (day, times,
//! timetable name) for the operator to resolve the conflict manually. The
//! same check runs authoritatively again at the point of persistence,
//! because interactive state can be stale relative to concurrently-saved
//! timetables.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::api::TimetableId;
use crate::models::interval::TimeInterval;
use crate::models::timetable::{Period, Timetable};

/// Where and with what a candidate period collides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConflictDetail {
    /// Id of the conflicting timetable; `None` when the collision is within
    /// the submitted list itself
    pub timetable_id: Option<TimetableId>,
    /// Operator-facing name of the conflicting timetable
    pub timetable_name: String,
    /// The colliding slot
    pub interval: TimeInterval,
}

impl std::fmt::Display for ConflictDetail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} in timetable \"{}\"", self.interval, self.timetable_name)
    }
}

/// A candidate period list violates the non-overlap invariant.
///
/// Never auto-resolved: the caller must adjust the candidate period and
/// resubmit.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConflictError {
    /// Same day, same subject, identical `[start, end)` as an existing period
    #[error("duplicate period: {0}")]
    DuplicatePeriod(ConflictDetail),
    /// Same day, overlapping interval with an existing period
    #[error("overlapping period: {0}")]
    Overlap(ConflictDetail),
}

impl ConflictError {
    pub fn detail(&self) -> &ConflictDetail {
        match self {
            ConflictError::DuplicatePeriod(detail) | ConflictError::Overlap(detail) => detail,
        }
    }
}

fn detail_for(timetable: &Timetable, period: &Period) -> ConflictDetail {
    ConflictDetail {
        timetable_id: timetable.id,
        timetable_name: timetable.name.clone(),
        interval: period.interval,
    }
}

fn clash(candidate: &Period, existing: &Period, detail: ConflictDetail) -> Option<ConflictError> {
    if candidate.day() != existing.day() {
        return None;
    }
    if candidate.subject_id == existing.subject_id
        && candidate.interval.coincides_with(&existing.interval)
    {
        return Some(ConflictError::DuplicatePeriod(detail));
    }
    if candidate.interval.overlaps(&existing.interval) {
        return Some(ConflictError::Overlap(detail));
    }
    None
}

/// Check `candidates` against every other timetable of the same section.
///
/// `others` is the store snapshot for the (branch, class, section) being
/// saved. Archived timetables never conflict; `exclude` skips the timetable
/// currently being edited so it can be re-saved against its own superseded
/// state.
pub fn find_section_conflict(
    candidates: &[Period],
    others: &[Timetable],
    exclude: Option<TimetableId>,
) -> Result<(), ConflictError> {
    for candidate in candidates {
        for other in others {
            if other.is_archived() {
                continue;
            }
            if exclude.is_some() && other.id == exclude {
                continue;
            }
            for existing in &other.periods {
                if let Some(err) = clash(candidate, existing, detail_for(other, existing)) {
                    return Err(err);
                }
            }
        }
    }
    Ok(())
}

/// A submitted period list must itself be free of duplicates and overlaps.
///
/// `name` is the operator-facing name of the timetable being edited, used in
/// the conflict detail.
pub fn find_internal_conflict(periods: &[Period], name: &str) -> Result<(), ConflictError> {
    for (i, first) in periods.iter().enumerate() {
        for second in &periods[i + 1..] {
            let detail = ConflictDetail {
                timetable_id: None,
                timetable_name: name.to_string(),
                interval: second.interval,
            };
            if let Some(err) = clash(first, second, detail) {
                return Err(err);
            }
        }
    }
    Ok(())
}
