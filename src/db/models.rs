//! Directory entities referenced by timetables.
//!
//! These are owned by the surrounding school-administration system; the
//! engine stores only their ids inside periods and timetables and resolves
//! them through [`crate::db::repository::DirectoryRepository`] when it needs
//! to verify a reference or display a name.

use serde::{Deserialize, Serialize};

use crate::api::{BranchId, ClassId, SubjectId, TeacherId};

/// A school branch (campus).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Branch {
    pub id: BranchId,
    pub name: String,
}

/// Per-section configuration of a class: the section label and its room.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionInfo {
    pub name: String,
    #[serde(default)]
    pub room_number: String,
}

/// A class (grade) within a branch, subdivided into sections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchoolClass {
    pub id: ClassId,
    pub branch_id: BranchId,
    pub name: String,
    #[serde(default)]
    pub sections: Vec<SectionInfo>,
}

impl SchoolClass {
    pub fn section(&self, name: &str) -> Option<&SectionInfo> {
        self.sections.iter().find(|s| s.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subject {
    pub id: SubjectId,
    pub name: String,
    #[serde(default)]
    pub code: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Teacher {
    pub id: TeacherId,
    pub branch_id: BranchId,
    pub name: String,
}

/// Directory contents loaded into the local backend at startup, typically
/// from the seed file named in `repository.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DirectorySeed {
    #[serde(default)]
    pub branches: Vec<Branch>,
    #[serde(default)]
    pub classes: Vec<SchoolClass>,
    #[serde(default)]
    pub subjects: Vec<Subject>,
    #[serde(default)]
    pub teachers: Vec<Teacher>,
}
