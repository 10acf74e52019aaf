//! Service-layer error taxonomy.
//!
//! Every error is a synchronous return value resolved at the point of the
//! offending operation. Nothing here is retried automatically: each variant
//! represents invalid input or a genuine scheduling conflict that needs
//! human resolution, not a transient failure.

use thiserror::Error;

use crate::db::repository::RepositoryError;
use crate::models::timetable::TimetableStatus;
use crate::scheduler::conflict::ConflictError;
use crate::scheduler::planner::PlanError;

#[derive(Debug, Error)]
pub enum ServiceError {
    /// A referenced branch/class/subject/teacher id does not resolve.
    /// Surfaced verbatim with the offending id.
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: String },

    /// The submitted period list collides with a persisted timetable (or
    /// with itself). The caller must adjust the candidate period and
    /// resubmit.
    #[error(transparent)]
    Conflict(#[from] ConflictError),

    /// The planner could not place a period.
    #[error(transparent)]
    Plan(#[from] PlanError),

    /// Structural problems with the submitted timetable.
    #[error("invalid timetable: {0}")]
    Validation(String),

    /// Illegal lifecycle transition.
    #[error("cannot transition timetable from {from} to {to}")]
    InvalidTransition {
        from: TimetableStatus,
        to: TimetableStatus,
    },

    /// Storage failure, including the store-level uniqueness backstop.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl ServiceError {
    /// Translate a repository lookup failure for `entity` with `id` into the
    /// service taxonomy, keeping `NotFound` distinct from storage failures.
    pub fn from_lookup(entity: &'static str, id: impl ToString, err: RepositoryError) -> Self {
        if err.is_not_found() {
            ServiceError::NotFound {
                entity,
                id: id.to_string(),
            }
        } else {
            ServiceError::Repository(err)
        }
    }
}
