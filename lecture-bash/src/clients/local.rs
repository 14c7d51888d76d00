//! In-memory implementations for tests and local experiments.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;

use super::sheets::SpreadsheetStore;
use super::timetable::TimetableApi;
use crate::error::{BashError, BashResult, ErrorContext};
use crate::models::ois::{CourseDetails, RegistrationInfo, SearchFilter, TimetableSummary};

/// Canned answer for a registration lookup.
#[derive(Debug, Clone)]
pub enum RegistrationFixture {
    Found(RegistrationInfo),
    /// The body could not be decoded.
    Malformed,
    /// A non-404 failure such as a 502.
    Failure(String),
}

/// Timetable API served from memory.
///
/// Timetables are paged like the real service: `start` is 1-based.
/// Unknown courses and registrations answer with `NotFound`.
#[derive(Default)]
pub struct LocalTimetableApi {
    timetables: Vec<TimetableSummary>,
    courses: HashMap<(String, String), CourseDetails>,
    registrations: HashMap<String, RegistrationFixture>,
    searches: RwLock<Vec<(u32, u32)>>,
}

impl LocalTimetableApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timetable(mut self, timetable: TimetableSummary) -> Self {
        self.timetables.push(timetable);
        self
    }

    pub fn with_course(
        mut self,
        course_uuid: &str,
        version_uuid: &str,
        details: CourseDetails,
    ) -> Self {
        self.courses
            .insert((course_uuid.to_string(), version_uuid.to_string()), details);
        self
    }

    pub fn with_registration(mut self, version_uuid: &str, fixture: RegistrationFixture) -> Self {
        self.registrations.insert(version_uuid.to_string(), fixture);
        self
    }

    /// `(start, take)` of every search served so far.
    pub fn searches(&self) -> Vec<(u32, u32)> {
        self.searches.read().clone()
    }
}

#[async_trait]
impl TimetableApi for LocalTimetableApi {
    async fn search(
        &self,
        _filter: &SearchFilter,
        start: u32,
        take: u32,
    ) -> BashResult<Vec<TimetableSummary>> {
        self.searches.write().push((start, take));
        Ok(self
            .timetables
            .iter()
            .skip(start.saturating_sub(1) as usize)
            .take(take as usize)
            .cloned()
            .collect())
    }

    async fn course_version(
        &self,
        course_uuid: &str,
        version_uuid: &str,
    ) -> BashResult<CourseDetails> {
        self.courses
            .get(&(course_uuid.to_string(), version_uuid.to_string()))
            .cloned()
            .ok_or_else(|| {
                BashError::not_found_with_context(
                    "course version not found",
                    ErrorContext::new("course_version")
                        .with_entity("course")
                        .with_entity_id(format!("{}/{}", course_uuid, version_uuid)),
                )
            })
    }

    async fn registration_info(&self, version_uuid: &str) -> BashResult<RegistrationInfo> {
        let context = ErrorContext::new("registration_info")
            .with_entity("registration")
            .with_entity_id(version_uuid);
        match self.registrations.get(version_uuid) {
            Some(RegistrationFixture::Found(info)) => Ok(info.clone()),
            Some(RegistrationFixture::Malformed) => Err(BashError::MalformedResponse {
                message: "expected value at line 1 column 1".to_string(),
                context,
            }),
            Some(RegistrationFixture::Failure(message)) => {
                Err(BashError::fetch_with_context(message.clone(), context))
            }
            None => Err(BashError::not_found_with_context(
                "registration_info returned 404",
                context,
            )),
        }
    }
}

/// Spreadsheet held in memory, keyed by (spreadsheet id, range).
#[derive(Default)]
pub struct LocalSpreadsheet {
    ranges: RwLock<HashMap<(String, String), Vec<Vec<String>>>>,
}

impl LocalSpreadsheet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_range(self, spreadsheet_id: &str, range: &str, rows: Vec<Vec<String>>) -> Self {
        self.ranges
            .write()
            .insert((spreadsheet_id.to_string(), range.to_string()), rows);
        self
    }

    /// Current contents of a range; empty when never written.
    pub fn rows(&self, spreadsheet_id: &str, range: &str) -> Vec<Vec<String>> {
        self.ranges
            .read()
            .get(&(spreadsheet_id.to_string(), range.to_string()))
            .cloned()
            .unwrap_or_default()
    }
}

#[async_trait]
impl SpreadsheetStore for LocalSpreadsheet {
    async fn read_range(&self, spreadsheet_id: &str, range: &str) -> BashResult<Vec<Vec<String>>> {
        Ok(self.rows(spreadsheet_id, range))
    }

    async fn clear_range(&self, spreadsheet_id: &str, range: &str) -> BashResult<()> {
        self.ranges
            .write()
            .remove(&(spreadsheet_id.to_string(), range.to_string()));
        Ok(())
    }

    async fn write_range(
        &self,
        spreadsheet_id: &str,
        range: &str,
        rows: Vec<Vec<String>>,
    ) -> BashResult<()> {
        let mut ranges = self.ranges.write();
        let existing = ranges
            .entry((spreadsheet_id.to_string(), range.to_string()))
            .or_default();
        // Cells outside the written block keep their values.
        for (r, row) in rows.into_iter().enumerate() {
            if existing.len() <= r {
                existing.push(Vec::new());
            }
            let target = &mut existing[r];
            for (c, cell) in row.into_iter().enumerate() {
                if target.len() <= c {
                    target.resize(c + 1, String::new());
                }
                target[c] = cell;
            }
        }
        Ok(())
    }
}
