//! Per-(branch, academic year) cache of built availability indexes.
//!
//! Held at the application boundary, never inside the pure engine. An index
//! stays valid only while the underlying timetable set is unchanged, so the
//! cache must be invalidated after every successful write. Entries are keyed
//! by the (branch, academic year) pair; switching either rebuilds.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::api::BranchId;
use crate::db::repository::{FullRepository, RepositoryResult};
use crate::models::timetable::TimetableFilter;
use crate::scheduler::availability::TeacherIndex;

#[derive(Clone, Default)]
pub struct AvailabilityCache {
    indexes: Arc<RwLock<HashMap<(BranchId, String), Arc<TeacherIndex>>>>,
}

impl AvailabilityCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached index for the pair, building it from a fresh store
    /// snapshot on a miss.
    pub async fn get_or_build(
        &self,
        repo: &dyn FullRepository,
        branch_id: BranchId,
        academic_year: &str,
    ) -> RepositoryResult<Arc<TeacherIndex>> {
        let key = (branch_id, academic_year.to_string());
        if let Some(index) = self.indexes.read().get(&key) {
            return Ok(Arc::clone(index));
        }

        let snapshot = repo
            .find_timetables(&TimetableFilter::for_branch_year(branch_id, academic_year))
            .await?;
        let index = Arc::new(TeacherIndex::build(&snapshot));
        self.indexes.write().insert(key, Arc::clone(&index));
        Ok(index)
    }

    /// Drop every cached index. Called after any write that may have changed
    /// the underlying timetable set.
    pub fn invalidate_all(&self) {
        self.indexes.write().clear();
    }

    /// Drop the cached index for one (branch, academic year) pair.
    pub fn invalidate(&self, branch_id: BranchId, academic_year: &str) {
        self.indexes
            .write()
            .remove(&(branch_id, academic_year.to_string()));
    }
}
