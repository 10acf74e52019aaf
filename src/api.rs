//! Public API surface for the timetable engine.
//!
//! This file consolidates the identifier types and re-exports the domain,
//! engine, and directory types callers interact with. All types derive
//! Serialize/Deserialize for JSON serialization.

use crate::define_id_type;

define_id_type!(BranchId);
define_id_type!(ClassId);
define_id_type!(SubjectId);
define_id_type!(TeacherId);
define_id_type!(TimetableId);

pub use crate::models::interval::{add_minutes, minutes_between, TimeInterval};
pub use crate::models::timetable::{
    Period, PeriodType, TimeSettings, Timetable, TimetableFilter, TimetableStatus,
};

pub use crate::scheduler::availability::{Occupancy, SlotQuery, TeacherIndex};
pub use crate::scheduler::conflict::{ConflictDetail, ConflictError};
pub use crate::scheduler::planner::PlanError;

pub use crate::db::models::{Branch, SchoolClass, SectionInfo, Subject, Teacher};

#[cfg(test)]
mod tests {
    use super::{TeacherId, TimetableId};
    use uuid::Uuid;

    #[test]
    fn test_id_new_and_value() {
        let raw = Uuid::new_v4();
        let id = TimetableId::new(raw);
        assert_eq!(id.value(), raw);
    }

    #[test]
    fn test_id_equality() {
        let raw = Uuid::new_v4();
        let id1 = TimetableId::new(raw);
        let id2 = TimetableId::new(raw);
        let id3 = TimetableId::generate();

        assert_eq!(id1, id2);
        assert_ne!(id1, id3);
    }

    #[test]
    fn test_id_generate_is_unique() {
        let id1 = TeacherId::generate();
        let id2 = TeacherId::generate();
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_id_display_roundtrip() {
        let id = TeacherId::generate();
        let parsed: Uuid = id.to_string().parse().unwrap();
        assert_eq!(parsed, id.value());
    }

    #[test]
    fn test_id_hash() {
        use std::collections::HashSet;

        let id = TimetableId::generate();
        let mut set = HashSet::new();
        set.insert(id);
        set.insert(TimetableId::generate());
        set.insert(id); // Duplicate

        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_id_serde_roundtrip() {
        let id = TimetableId::generate();
        let json = serde_json::to_string(&id).unwrap();
        let back: TimetableId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
