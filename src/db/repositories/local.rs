//! In-memory repository backend.
//!
//! Backs the engine during development and tests. All state lives behind one
//! `parking_lot::RwLock`; `save_timetable` holds the write guard across its
//! read-check-write sequence, which makes the uniqueness constraint atomic
//! in-process.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::api::{BranchId, ClassId, SubjectId, TeacherId, TimetableId};
use crate::db::models::{Branch, DirectorySeed, SchoolClass, Subject, Teacher};
use crate::db::repository::{
    DirectoryRepository, ErrorContext, RepositoryError, RepositoryResult, TimetableRepository,
};
use crate::models::timetable::{Timetable, TimetableFilter};

#[derive(Default)]
struct Store {
    timetables: HashMap<TimetableId, Timetable>,
    branches: HashMap<BranchId, Branch>,
    classes: HashMap<ClassId, SchoolClass>,
    subjects: HashMap<SubjectId, Subject>,
    teachers: HashMap<TeacherId, Teacher>,
}

/// In-memory implementation of the repository traits.
#[derive(Default)]
pub struct LocalRepository {
    store: RwLock<Store>,
}

impl LocalRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load directory entities, e.g. from the seed file configured in
    /// `repository.toml`.
    pub fn load_seed(&self, seed: DirectorySeed) {
        let mut store = self.store.write();
        for branch in seed.branches {
            store.branches.insert(branch.id, branch);
        }
        for class in seed.classes {
            store.classes.insert(class.id, class);
        }
        for subject in seed.subjects {
            store.subjects.insert(subject.id, subject);
        }
        for teacher in seed.teachers {
            store.teachers.insert(teacher.id, teacher);
        }
    }

    pub fn insert_branch(&self, branch: Branch) {
        self.store.write().branches.insert(branch.id, branch);
    }

    pub fn insert_class(&self, class: SchoolClass) {
        self.store.write().classes.insert(class.id, class);
    }

    pub fn insert_subject(&self, subject: Subject) {
        self.store.write().subjects.insert(subject.id, subject);
    }

    pub fn insert_teacher(&self, teacher: Teacher) {
        self.store.write().teachers.insert(teacher.id, teacher);
    }
}

/// The store-level uniqueness constraint: no two non-archived timetables of
/// one (branch, class, section) may hold periods with the same day and start
/// time. Returns the offending start slot, if any.
fn constraint_violation(candidate: &Timetable, others: &Store) -> Option<String> {
    if candidate.is_archived() {
        return None;
    }
    for other in others.timetables.values() {
        if other.id == candidate.id
            || other.is_archived()
            || other.branch_id != candidate.branch_id
            || other.class_id != candidate.class_id
            || other.section != candidate.section
        {
            continue;
        }
        for existing in &other.periods {
            for period in &candidate.periods {
                if period.day() == existing.day() && period.start() == existing.start() {
                    return Some(format!(
                        "{} {} already taken by timetable \"{}\"",
                        period.day(),
                        period.start().format("%H:%M"),
                        other.name
                    ));
                }
            }
        }
    }
    None
}

#[async_trait]
impl TimetableRepository for LocalRepository {
    async fn find_timetables(&self, filter: &TimetableFilter) -> RepositoryResult<Vec<Timetable>> {
        let store = self.store.read();
        let mut matched: Vec<Timetable> = store
            .timetables
            .values()
            .filter(|t| filter.matches(t))
            .cloned()
            .collect();
        matched.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        Ok(matched)
    }

    async fn get_timetable(&self, id: TimetableId) -> RepositoryResult<Timetable> {
        self.store.read().timetables.get(&id).cloned().ok_or_else(|| {
            RepositoryError::not_found_with_context(
                format!("Timetable {} not found", id),
                ErrorContext::new("get_timetable")
                    .with_entity("timetable")
                    .with_entity_id(id),
            )
        })
    }

    async fn save_timetable(&self, timetable: Timetable) -> RepositoryResult<Timetable> {
        let mut store = self.store.write();

        let mut timetable = timetable;
        let id = match timetable.id {
            Some(id) => id,
            None => {
                let id = TimetableId::generate();
                timetable.id = Some(id);
                id
            }
        };

        if let Some(violation) = constraint_violation(&timetable, &store) {
            return Err(RepositoryError::conflict_with_context(
                violation,
                ErrorContext::new("save_timetable")
                    .with_entity("timetable")
                    .with_entity_id(id)
                    .with_details("unique (branch, class, section, day, start_time)"),
            ));
        }

        store.timetables.insert(id, timetable.clone());
        Ok(timetable)
    }

    async fn delete_timetable(&self, id: TimetableId) -> RepositoryResult<()> {
        match self.store.write().timetables.remove(&id) {
            Some(_) => Ok(()),
            None => Err(RepositoryError::not_found_with_context(
                format!("Timetable {} not found", id),
                ErrorContext::new("delete_timetable")
                    .with_entity("timetable")
                    .with_entity_id(id),
            )),
        }
    }

    async fn health_check(&self) -> RepositoryResult<bool> {
        Ok(true)
    }
}

fn directory_not_found(entity: &str, id: impl std::fmt::Display) -> RepositoryError {
    RepositoryError::not_found_with_context(
        format!("{} {} not found", entity, id),
        ErrorContext::new(format!("get_{}", entity))
            .with_entity(entity)
            .with_entity_id(id),
    )
}

#[async_trait]
impl DirectoryRepository for LocalRepository {
    async fn get_branch(&self, id: BranchId) -> RepositoryResult<Branch> {
        self.store
            .read()
            .branches
            .get(&id)
            .cloned()
            .ok_or_else(|| directory_not_found("branch", id))
    }

    async fn get_class(&self, id: ClassId) -> RepositoryResult<SchoolClass> {
        self.store
            .read()
            .classes
            .get(&id)
            .cloned()
            .ok_or_else(|| directory_not_found("class", id))
    }

    async fn get_subject(&self, id: SubjectId) -> RepositoryResult<Subject> {
        self.store
            .read()
            .subjects
            .get(&id)
            .cloned()
            .ok_or_else(|| directory_not_found("subject", id))
    }

    async fn get_teacher(&self, id: TeacherId) -> RepositoryResult<Teacher> {
        self.store
            .read()
            .teachers
            .get(&id)
            .cloned()
            .ok_or_else(|| directory_not_found("teacher", id))
    }

    async fn list_teachers(&self, branch_id: BranchId) -> RepositoryResult<Vec<Teacher>> {
        let store = self.store.read();
        let mut roster: Vec<Teacher> = store
            .teachers
            .values()
            .filter(|t| t.branch_id == branch_id)
            .cloned()
            .collect();
        roster.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        Ok(roster)
    }

    async fn section_room(
        &self,
        class_id: ClassId,
        section: &str,
    ) -> RepositoryResult<Option<String>> {
        let store = self.store.read();
        let class = store
            .classes
            .get(&class_id)
            .ok_or_else(|| directory_not_found("class", class_id))?;
        Ok(class.section(section).map(|s| s.room_number.clone()))
    }
}
