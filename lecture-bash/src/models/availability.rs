//! Availability index built from the free-times spreadsheet.
//!
//! The sheet is a sequence of blocks. A block starts with a row whose first
//! cell reads `Week N`; the other cells of that row name the people. The five
//! rows below it are Monday to Friday, each cell holding that person's free
//! time for the day (see [`parse_free_time_ranges`]).
//!
//! ```text
//! | Week 5 | Mari        | Jaan        |
//! | 1      | 9:00-11:00  |             |
//! | 2      | 10:00-12:00 | 14:00-15:30 |
//! | ...    |             |             |
//! ```

use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, info};

use super::time::{parse_free_time_ranges, FreeInterval};
use crate::error::{BashError, BashResult, ErrorContext};

/// Number of weekday rows following each `Week N` row.
pub const WEEKDAYS: u32 = 5;

/// Zero-based (row, column) of the cell holding the current week.
pub const CURRENT_WEEK_CELL: (usize, usize) = (1, 0);

const WEEK_MARKER: &str = "Week ";

/// Free intervals per person for one weekday.
pub type DayAvailability = BTreeMap<String, Vec<FreeInterval>>;

/// week -> weekday (1-5) -> person -> free intervals.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AvailabilityIndex {
    current_week: u32,
    weeks: BTreeMap<u32, BTreeMap<u32, DayAvailability>>,
}

impl AvailabilityIndex {
    /// Build the index from a row-major sheet.
    ///
    /// Fails on the first unreadable free-time cell, naming its raw text, and
    /// when the current week cell is missing or not a number.
    pub fn from_table(table: &[Vec<String>]) -> BashResult<Self> {
        let current_week = read_current_week(table)?;
        let mut weeks = BTreeMap::new();

        for (row_idx, row) in table.iter().enumerate() {
            let Some(week) = week_marker(row, row_idx)? else {
                continue;
            };
            info!("Week {}", week);

            let mut days = BTreeMap::new();
            for day in 1..=WEEKDAYS {
                let day_row = table.get(row_idx + day as usize);
                let mut people = DayAvailability::new();

                for (col, person) in row.iter().enumerate().skip(1) {
                    let person = person.trim();
                    if person.is_empty() {
                        continue;
                    }
                    let raw = day_row
                        .and_then(|r| r.get(col))
                        .map(String::as_str)
                        .unwrap_or("");
                    let free = parse_free_time_ranges(raw).map_err(|e| {
                        BashError::malformed_availability(
                            raw,
                            ErrorContext::new("build_availability_index")
                                .with_entity("cell")
                                .with_entity_id(format!(
                                    "week {}, day {}, {}",
                                    week, day, person
                                ))
                                .with_details(e.to_string()),
                        )
                    })?;
                    people.insert(person.to_string(), free);
                }
                days.insert(day, people);
            }
            weeks.insert(week, days);
        }

        debug!(weeks = weeks.len(), current_week, "availability index built");
        Ok(Self {
            current_week,
            weeks,
        })
    }

    /// The single week against which matching is performed.
    pub fn current_week(&self) -> u32 {
        self.current_week
    }

    /// Weeks present in the sheet.
    pub fn weeks(&self) -> impl Iterator<Item = u32> + '_ {
        self.weeks.keys().copied()
    }

    /// Availability of everyone on a given week and weekday.
    pub fn day(&self, week: u32, day: u32) -> Option<&DayAvailability> {
        self.weeks.get(&week).and_then(|days| days.get(&day))
    }

    /// People free for the whole of `[time, time + duration]`.
    ///
    /// Only the current week is ever matched: every other week yields an
    /// empty set even when the sheet has data for it.
    pub fn available_people(&self, week: u32, day: u32, time: f64, duration: f64) -> BTreeSet<String> {
        if week != self.current_week {
            return BTreeSet::new();
        }
        self.day(week, day)
            .map(|people| {
                people
                    .iter()
                    .filter(|(_, free)| free.iter().any(|f| f.covers(time, duration)))
                    .map(|(person, _)| person.clone())
                    .collect()
            })
            .unwrap_or_default()
    }
}

fn read_current_week(table: &[Vec<String>]) -> BashResult<u32> {
    let (row, col) = CURRENT_WEEK_CELL;
    let raw = table
        .get(row)
        .and_then(|r| r.get(col))
        .map(String::as_str)
        .unwrap_or("");
    raw.trim().parse().map_err(|_| {
        BashError::malformed_availability(
            raw,
            ErrorContext::new("read_current_week")
                .with_entity("cell")
                .with_entity_id(format!("row {}, column {}", row + 1, col + 1))
                .with_details("current week must be a number"),
        )
    })
}

fn week_marker(row: &[String], row_idx: usize) -> BashResult<Option<u32>> {
    let Some(number) = row.first().and_then(|c| c.strip_prefix(WEEK_MARKER)) else {
        return Ok(None);
    };
    number.trim().parse().map(Some).map_err(|_| {
        BashError::malformed_availability(
            row[0].as_str(),
            ErrorContext::new("build_availability_index")
                .with_entity("week marker")
                .with_entity_id(format!("row {}", row_idx + 1)),
        )
    })
}
