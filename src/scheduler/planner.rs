//! Greedy single-pass placement of the next period.
//!
//! Given a timetable's existing periods and its time policy, compute where
//! the next period goes: same day after the last entry, with one automatic
//! break per day once enough lectures have run, a shortened tail period when
//! the standard length no longer fits, and rollover to the next configured
//! day when fewer than [`MIN_TAIL_MINUTES`] remain.

use chrono::Weekday;
use thiserror::Error;

use crate::models::interval::{add_minutes, minutes_between, TimeInterval};
use crate::models::timetable::{Period, PeriodType, TimeSettings};

/// Shortest slot worth keeping. A remainder under this rolls to the next day
/// instead of producing a sliver period.
pub const MIN_TAIL_MINUTES: i64 = 15;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlanError {
    /// Every configured day is packed up to the school end time.
    #[error("no capacity left in the configured school days")]
    NoCapacity,
    /// The computed slot collides with an existing entry of the list being
    /// edited. Surfaced, never silently skipped.
    #[error("planned slot {interval} collides with an existing period")]
    Collision { interval: TimeInterval },
    /// The time policy is incoherent (non-positive durations, inverted
    /// school-day envelope).
    #[error("invalid time settings: {0}")]
    InvalidSettings(String),
}

/// Compute the next period for the timetable being edited.
///
/// `days` is the ordered list of school days (e.g. Mon..Fri). The planned
/// period inherits `section` and `room_number`; subject and teacher stay
/// unassigned for the operator to fill in. The caller must still run the
/// section conflict validator before accepting the placement.
pub fn plan_next_period(
    existing: &[Period],
    section: &str,
    settings: &TimeSettings,
    days: &[Weekday],
    room_number: &str,
) -> Result<Period, PlanError> {
    settings.validate().map_err(PlanError::InvalidSettings)?;
    if days.is_empty() {
        return Err(PlanError::NoCapacity);
    }

    let start_day = match chronological_last(existing, days) {
        None => days[0],
        Some(last) => last.day(),
    };
    let mut day_index = days.iter().position(|d| *d == start_day).unwrap_or(0);

    loop {
        let day = days[day_index];
        if let Some(period) = place_on_day(existing, day, section, settings, room_number) {
            // Out-of-order manual entries can sit past the computed slot.
            if let Some(colliding) = existing.iter().find(|p| p.interval.overlaps(&period.interval))
            {
                return Err(PlanError::Collision {
                    interval: colliding.interval,
                });
            }
            return Ok(period);
        }
        day_index += 1;
        if day_index >= days.len() {
            return Err(PlanError::NoCapacity);
        }
    }
}

/// The chronologically last period, ordering days by their position in the
/// configured day list and then by start time.
fn chronological_last<'a>(existing: &'a [Period], days: &[Weekday]) -> Option<&'a Period> {
    existing
        .iter()
        .max_by_key(|p| (day_rank(p.day(), days), p.start()))
}

fn day_rank(day: Weekday, days: &[Weekday]) -> usize {
    days.iter()
        .position(|d| *d == day)
        // Days outside the configured list sort after it, in calendar order.
        .unwrap_or_else(|| days.len() + day.num_days_from_monday() as usize)
}

/// Try to place a period on `day`; `None` means the day is full and the
/// planner should roll over.
fn place_on_day(
    existing: &[Period],
    day: Weekday,
    section: &str,
    settings: &TimeSettings,
    room_number: &str,
) -> Option<Period> {
    let mut same_day: Vec<&Period> = existing.iter().filter(|p| p.day() == day).collect();
    same_day.sort_by_key(|p| p.start());

    let make = |start, end, period_type| {
        Some(Period {
            interval: TimeInterval { day, start, end },
            period_number: same_day.len() as u32 + 1,
            subject_id: None,
            teacher_id: None,
            period_type,
            room_number: room_number.to_string(),
            section: section.to_string(),
        })
    };

    if same_day.is_empty() {
        let start = settings.school_start_time;
        let available = minutes_between(start, settings.school_end_time);
        let duration = settings.effective_first_period_duration();
        if available >= duration {
            return make(start, add_minutes(start, duration), PeriodType::Lecture);
        }
        if available >= MIN_TAIL_MINUTES {
            return make(start, settings.school_end_time, PeriodType::Lecture);
        }
        return None;
    }

    let next_start = same_day.last().map(|p| p.end())?;
    let remaining = minutes_between(next_start, settings.school_end_time);

    // At most one automatic break per day, only after four lectures, and only
    // when a break plus a standard lecture still fit. Lunch is never
    // auto-inserted.
    let has_break = same_day.iter().any(|p| p.period_type.is_break());
    let lectures = same_day
        .iter()
        .filter(|p| p.period_type.is_lecture())
        .count();
    if !has_break
        && lectures >= 4
        && remaining >= settings.break_duration + settings.period_duration
    {
        return make(
            next_start,
            add_minutes(next_start, settings.break_duration),
            PeriodType::Break,
        );
    }

    if remaining >= settings.period_duration {
        return make(
            next_start,
            add_minutes(next_start, settings.period_duration),
            PeriodType::Lecture,
        );
    }

    // Tail-fitting: consume the remainder instead of wasting it.
    if remaining >= MIN_TAIL_MINUTES {
        return make(next_start, settings.school_end_time, PeriodType::Lecture);
    }

    None
}
