//! Pure scheduling engine.
//!
//! The three components here never touch storage. Callers fetch the relevant
//! timetable snapshot through the repository layer and pass it in, so every
//! result is a pure function of its inputs:
//!
//! - [`planner`]: computes the next period's day, times, and type for a
//!   timetable being edited
//! - [`conflict`]: detects duplicate and overlapping periods for a
//!   (branch, class, section) across its timetables
//! - [`availability`]: aggregates per-teacher occupancy across a branch's
//!   timetables and answers availability queries

pub mod availability;
pub mod conflict;
pub mod planner;

pub use availability::{slot_free_locally, Occupancy, SlotQuery, TeacherIndex};
pub use conflict::{find_internal_conflict, find_section_conflict, ConflictDetail, ConflictError};
pub use planner::{plan_next_period, PlanError, MIN_TAIL_MINUTES};
