//! Teacher availability across a branch's timetables.
//!
//! The index is a read-side projection: it is built on demand from an
//! explicitly passed snapshot of the branch's timetables for one academic
//! year, and must be rebuilt whenever that set may have changed. Teacher
//! availability is advisory — it narrows selection choices and produces
//! warnings, it never hard-rejects a save.

use std::collections::HashMap;

use chrono::{NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

use crate::api::{ClassId, TeacherId, TimetableId};
use crate::models::interval::{hhmm, TimeInterval};
use crate::models::timetable::{Period, Timetable};

/// One committed span of a teacher's week, derived from a stored timetable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Occupancy {
    pub interval: TimeInterval,
    pub timetable_id: Option<TimetableId>,
    pub timetable_name: String,
    pub class_id: ClassId,
    pub section: String,
}

/// A fully specified candidate slot for an availability query.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SlotQuery {
    pub day: Weekday,
    #[serde(with = "hhmm")]
    pub start: NaiveTime,
    #[serde(with = "hhmm")]
    pub end: NaiveTime,
}

impl SlotQuery {
    pub fn interval(&self) -> TimeInterval {
        TimeInterval {
            day: self.day,
            start: self.start,
            end: self.end,
        }
    }

    pub fn is_well_formed(&self) -> bool {
        self.start < self.end
    }
}

/// Per-teacher occupancy for one (branch, academic year).
///
/// Pure function of the snapshot passed to [`TeacherIndex::build`]; cache it
/// only for the duration of one edit session and invalidate on any write.
#[derive(Debug, Clone, Default)]
pub struct TeacherIndex {
    occupancies: HashMap<TeacherId, Vec<Occupancy>>,
}

impl TeacherIndex {
    /// Flatten every teacher-assigned period of every non-archived timetable
    /// into per-teacher occupancy lists.
    pub fn build(timetables: &[Timetable]) -> Self {
        let mut occupancies: HashMap<TeacherId, Vec<Occupancy>> = HashMap::new();
        for timetable in timetables.iter().filter(|t| !t.is_archived()) {
            for period in &timetable.periods {
                if let Some(teacher_id) = period.teacher_id {
                    occupancies.entry(teacher_id).or_default().push(Occupancy {
                        interval: period.interval,
                        timetable_id: timetable.id,
                        timetable_name: timetable.name.clone(),
                        class_id: timetable.class_id,
                        section: timetable.section.clone(),
                    });
                }
            }
        }
        Self { occupancies }
    }

    /// All committed spans of one teacher.
    pub fn occupancies(&self, teacher_id: TeacherId) -> &[Occupancy] {
        self.occupancies
            .get(&teacher_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// The occupancy colliding with `slot`, if any. `exclude` skips spans
    /// belonging to the timetable currently being edited.
    pub fn conflicting_occupancy(
        &self,
        teacher_id: TeacherId,
        slot: SlotQuery,
        exclude: Option<TimetableId>,
    ) -> Option<&Occupancy> {
        let probe = slot.interval();
        self.occupancies(teacher_id)
            .iter()
            .filter(|o| exclude.is_none() || o.timetable_id != exclude)
            .find(|o| o.interval.overlaps(&probe))
    }

    /// True iff no committed span of `teacher_id` overlaps `slot`.
    pub fn is_available(
        &self,
        teacher_id: TeacherId,
        slot: SlotQuery,
        exclude: Option<TimetableId>,
    ) -> bool {
        self.conflicting_occupancy(teacher_id, slot, exclude)
            .is_none()
    }

    /// Filter `roster` down to the teachers free at `slot`.
    ///
    /// An incomplete slot (`None`) returns the full roster: a slot that is
    /// not yet fully specified cannot conflict with anything.
    pub fn available_teachers(
        &self,
        roster: &[TeacherId],
        slot: Option<SlotQuery>,
        exclude: Option<TimetableId>,
    ) -> Vec<TeacherId> {
        match slot {
            None => roster.to_vec(),
            Some(slot) => roster
                .iter()
                .copied()
                .filter(|teacher_id| self.is_available(*teacher_id, slot, exclude))
                .collect(),
        }
    }
}

/// Within the timetable currently being edited, is `teacher_id` free for
/// `slot`? The period at `editing_index` (the slot being reassigned) is
/// ignored. Combine with the index check: a teacher must be free both across
/// the branch and within the edit in progress.
pub fn slot_free_locally(
    periods: &[Period],
    editing_index: Option<usize>,
    teacher_id: TeacherId,
    slot: SlotQuery,
) -> bool {
    let probe = slot.interval();
    periods
        .iter()
        .enumerate()
        .filter(|(index, _)| Some(*index) != editing_index)
        .filter(|(_, p)| p.teacher_id == Some(teacher_id))
        .all(|(_, p)| !p.interval.overlaps(&probe))
}
