//! # classtable
//!
//! Class-timetable scheduling and conflict-detection engine.
//!
//! This crate is the scheduling core of a multi-branch school administration
//! system: it places weekly class periods into day-bounded slots, detects
//! duplicate or overlapping periods across a section's timetables, and
//! computes teacher availability across all timetables of a branch so that
//! no teacher is double-booked. The surrounding CRUD application (forms,
//! auth, fee and exam administration) lives elsewhere and calls this engine
//! in-process; the optional HTTP layer here is a thin boundary adapter.
//!
//! ## Architecture
//!
//! The crate is organized into several logical modules:
//!
//! - [`api`]: Public id types and the consolidated type surface
//! - [`models`]: Domain model — intervals, periods, time settings, timetables
//! - [`scheduler`]: Pure engine — period placement, section conflict
//!   validation, teacher availability index
//! - [`db`]: Repository pattern and persistence boundary
//! - [`services`]: High-level orchestration (lifecycle, availability, planning)
//! - [`http`]: Axum-based HTTP server and request handlers
//!
//! The scheduler never touches storage: callers fetch a timetable snapshot
//! through the repository and pass it in, so every engine result is a pure
//! function of its inputs.

pub mod api;

pub mod db;
pub mod models;

pub mod scheduler;

pub mod services;

#[cfg(feature = "http-server")]
pub mod http;
