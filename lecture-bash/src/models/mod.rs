//! Domain types: parsed times, the availability index, API payloads and
//! result rows.

pub mod availability;
pub mod lecture;
pub mod ois;
pub mod time;

#[cfg(test)]
#[path = "time_tests.rs"]
mod time_tests;

pub use availability::{AvailabilityIndex, DayAvailability};
pub use lecture::{
    LectureKey, LectureRecord, LectureTable, LectureTimeHistogram, MergeOutcome, Sighting,
};
pub use time::{parse_academic_weeks, parse_clock_time, parse_free_time_ranges, FreeInterval};
