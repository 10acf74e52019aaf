//! Timetable domain model: periods, the per-timetable time policy, and the
//! timetable entity with its status state machine.
//!
//! Periods always carry plain ids for subject and teacher. Display data
//! (names, codes) is resolved through the directory at the boundary, never
//! inside the engine.

use chrono::{NaiveDate, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

use crate::api::{BranchId, ClassId, SubjectId, TeacherId, TimetableId};
use crate::models::interval::{hhmm, TimeInterval};

/// Kind of entry occupying a timetable slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeriodType {
    Lecture,
    Lab,
    Practical,
    Break,
    Lunch,
    Assembly,
    Sports,
    Library,
}

impl PeriodType {
    /// Lectures drive the automatic-break trigger; other slot kinds do not.
    pub fn is_lecture(self) -> bool {
        matches!(self, PeriodType::Lecture)
    }

    pub fn is_break(self) -> bool {
        matches!(self, PeriodType::Break)
    }
}

/// A single scheduled slot within a timetable.
///
/// Owned exclusively by its parent [`Timetable`]; never shared or referenced
/// independently.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Period {
    /// Day and time span of the slot
    #[serde(flatten)]
    pub interval: TimeInterval,
    /// Ordinal of the slot within its day, starting at 1
    pub period_number: u32,
    /// Subject taught in this slot, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject_id: Option<SubjectId>,
    /// Teacher assigned to this slot, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub teacher_id: Option<TeacherId>,
    pub period_type: PeriodType,
    #[serde(default)]
    pub room_number: String,
    /// Section this slot belongs to; must match the parent timetable's
    pub section: String,
}

impl Period {
    pub fn day(&self) -> Weekday {
        self.interval.day
    }

    pub fn start(&self) -> NaiveTime {
        self.interval.start
    }

    pub fn end(&self) -> NaiveTime {
        self.interval.end
    }
}

/// Per-timetable packing policy: how long periods run and which envelope of
/// the school day they must fit inside.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSettings {
    /// Standard lecture length in minutes
    pub period_duration: i64,
    /// Length of the first period of a day; falls back to `period_duration`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_period_duration: Option<i64>,
    /// Automatic break length in minutes
    pub break_duration: i64,
    /// Lunch length in minutes (operator-placed, never auto-inserted)
    pub lunch_duration: i64,
    #[serde(with = "hhmm")]
    pub school_start_time: NaiveTime,
    #[serde(with = "hhmm")]
    pub school_end_time: NaiveTime,
}

impl TimeSettings {
    pub fn effective_first_period_duration(&self) -> i64 {
        self.first_period_duration.unwrap_or(self.period_duration)
    }

    /// Check the policy is internally coherent before planning against it.
    pub fn validate(&self) -> Result<(), String> {
        if self.period_duration <= 0 {
            return Err("period_duration must be positive".to_string());
        }
        if let Some(first) = self.first_period_duration {
            if first <= 0 {
                return Err("first_period_duration must be positive".to_string());
            }
        }
        if self.break_duration <= 0 {
            return Err("break_duration must be positive".to_string());
        }
        if self.lunch_duration <= 0 {
            return Err("lunch_duration must be positive".to_string());
        }
        if self.school_start_time >= self.school_end_time {
            return Err("school_start_time must precede school_end_time".to_string());
        }
        Ok(())
    }
}

/// Lifecycle state of a timetable.
///
/// `draft → active → inactive`, and any non-draft state may be archived.
/// Archived timetables are excluded from conflict and availability scans.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimetableStatus {
    #[default]
    Draft,
    Active,
    Inactive,
    Archived,
}

impl TimetableStatus {
    pub fn can_transition_to(self, next: TimetableStatus) -> bool {
        use TimetableStatus::*;
        matches!(
            (self, next),
            (Draft, Active) | (Active, Inactive) | (Active, Archived) | (Inactive, Archived)
        )
    }

    pub fn is_archived(self) -> bool {
        matches!(self, TimetableStatus::Archived)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TimetableStatus::Draft => "draft",
            TimetableStatus::Active => "active",
            TimetableStatus::Inactive => "inactive",
            TimetableStatus::Archived => "archived",
        }
    }
}

impl std::fmt::Display for TimetableStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TimetableStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "draft" => Ok(TimetableStatus::Draft),
            "active" => Ok(TimetableStatus::Active),
            "inactive" => Ok(TimetableStatus::Inactive),
            "archived" => Ok(TimetableStatus::Archived),
            other => Err(format!("Unknown timetable status: {}", other)),
        }
    }
}

/// The weekly period schedule for one (branch, class, section, academic year).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Timetable {
    /// Store-assigned id; absent until first save
    #[serde(default)]
    pub id: Option<TimetableId>,
    /// Operator-facing name, e.g. "Term 1 — Grade 5A"
    #[serde(default)]
    pub name: String,
    pub branch_id: BranchId,
    pub class_id: ClassId,
    pub section: String,
    /// Academic year label, e.g. "2025-2026"
    pub academic_year: String,
    #[serde(default)]
    pub status: TimetableStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effective_from: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effective_to: Option<NaiveDate>,
    pub time_settings: TimeSettings,
    #[serde(default)]
    pub periods: Vec<Period>,
}

impl Timetable {
    /// Periods on `day`, ordered by start time.
    pub fn periods_on(&self, day: Weekday) -> Vec<&Period> {
        let mut on_day: Vec<&Period> = self.periods.iter().filter(|p| p.day() == day).collect();
        on_day.sort_by_key(|p| p.start());
        on_day
    }

    /// Invariant: every period's `section` equals the timetable's.
    pub fn section_mismatch(&self) -> Option<&Period> {
        self.periods.iter().find(|p| p.section != self.section)
    }

    pub fn is_archived(&self) -> bool {
        self.status.is_archived()
    }
}

/// Filter for timetable store queries. Unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimetableFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch_id: Option<BranchId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_id: Option<ClassId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub academic_year: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<TimetableStatus>,
}

impl TimetableFilter {
    /// All timetables of one (branch, class, section).
    pub fn for_section(branch_id: BranchId, class_id: ClassId, section: &str) -> Self {
        Self {
            branch_id: Some(branch_id),
            class_id: Some(class_id),
            section: Some(section.to_string()),
            ..Self::default()
        }
    }

    /// All timetables of a branch in one academic year.
    pub fn for_branch_year(branch_id: BranchId, academic_year: &str) -> Self {
        Self {
            branch_id: Some(branch_id),
            academic_year: Some(academic_year.to_string()),
            ..Self::default()
        }
    }

    pub fn matches(&self, timetable: &Timetable) -> bool {
        if let Some(branch_id) = self.branch_id {
            if timetable.branch_id != branch_id {
                return false;
            }
        }
        if let Some(class_id) = self.class_id {
            if timetable.class_id != class_id {
                return false;
            }
        }
        if let Some(ref section) = self.section {
            if &timetable.section != section {
                return false;
            }
        }
        if let Some(ref academic_year) = self.academic_year {
            if &timetable.academic_year != academic_year {
                return false;
            }
        }
        if let Some(status) = self.status {
            if timetable.status != status {
                return false;
            }
        }
        true
    }
}
