//! Abstract storage interface for the timetable engine.
//!
//! The engine treats storage purely as a collection abstraction; it assumes
//! no particular storage technology. Implementations live in
//! `db::repositories`.

pub mod error;

pub use error::{ErrorContext, RepositoryError, RepositoryResult};

use async_trait::async_trait;

use crate::api::{BranchId, ClassId, SubjectId, TeacherId, TimetableId};
use crate::db::models::{Branch, SchoolClass, Subject, Teacher};
use crate::models::timetable::{Timetable, TimetableFilter};

/// Collection abstraction over persisted timetables.
#[async_trait]
pub trait TimetableRepository: Send + Sync {
    /// All timetables matching `filter`, in a stable order.
    async fn find_timetables(&self, filter: &TimetableFilter) -> RepositoryResult<Vec<Timetable>>;

    async fn get_timetable(&self, id: TimetableId) -> RepositoryResult<Timetable>;

    /// Persist a timetable, assigning an id on first save.
    ///
    /// Implementations must enforce a uniqueness constraint on
    /// `(branch, class, section, day, start_time)` across non-archived
    /// timetables atomically with the write, rejecting violations with
    /// [`RepositoryError::Conflict`]. Engine validation runs first and
    /// produces richer errors; the constraint is the backstop against two
    /// racing saves that each validated against a pre-update snapshot.
    async fn save_timetable(&self, timetable: Timetable) -> RepositoryResult<Timetable>;

    /// Hard remove. Callers go through the service layer, which only purges
    /// archived timetables.
    async fn delete_timetable(&self, id: TimetableId) -> RepositoryResult<()>;

    async fn health_check(&self) -> RepositoryResult<bool>;
}

/// Read-only view of the school directory (branches, classes, subjects,
/// teachers). Those entities are owned by the surrounding administration
/// system; the engine only resolves references against them.
#[async_trait]
pub trait DirectoryRepository: Send + Sync {
    async fn get_branch(&self, id: BranchId) -> RepositoryResult<Branch>;

    async fn get_class(&self, id: ClassId) -> RepositoryResult<SchoolClass>;

    async fn get_subject(&self, id: SubjectId) -> RepositoryResult<Subject>;

    async fn get_teacher(&self, id: TeacherId) -> RepositoryResult<Teacher>;

    /// The teacher roster of one branch.
    async fn list_teachers(&self, branch_id: BranchId) -> RepositoryResult<Vec<Teacher>>;

    /// Configured room for a class section, if any.
    async fn section_room(
        &self,
        class_id: ClassId,
        section: &str,
    ) -> RepositoryResult<Option<String>>;
}

/// Everything the engine needs from storage, as one trait object.
pub trait FullRepository: TimetableRepository + DirectoryRepository {}

impl<T: TimetableRepository + DirectoryRepository> FullRepository for T {}
