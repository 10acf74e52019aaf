//! Service layer for business logic and orchestration.
//!
//! Services sit between the storage boundary and the callers (the embedding
//! CRUD application or the HTTP layer). They fetch the snapshots the pure
//! engine needs, run its validations, and persist the results. No partial
//! writes: validation must fully pass before any persistence call is made.

pub mod availability;
pub mod availability_cache;
pub mod error;
pub mod lifecycle;
pub mod plan;

pub use availability::{available_teachers, build_index, check_availability};
pub use availability_cache::AvailabilityCache;
pub use error::ServiceError;
pub use lifecycle::{
    archive_timetable, create_timetable, transition_status, update_timetable, validate_timetable,
    SaveOutcome, TeacherWarning,
};
pub use plan::plan_next_period;

#[cfg(test)]
#[path = "lifecycle_tests.rs"]
mod lifecycle_tests;
