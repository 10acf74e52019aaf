pub mod interval;
pub mod macros;
pub mod timetable;

pub use interval::*;
pub use timetable::*;
