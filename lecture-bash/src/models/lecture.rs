//! Result rows and the tables that accumulate them during a run.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// Columns every record fills before its curriculum timetable links.
pub const FIXED_COLUMNS: usize = 13;

/// A lecture occurrence in one academic week.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LectureKey {
    pub lecture_uuid: String,
    pub week: u32,
}

impl LectureKey {
    pub fn new(lecture_uuid: impl Into<String>, week: u32) -> Self {
        Self {
            lecture_uuid: lecture_uuid.into(),
            week,
        }
    }
}

impl fmt::Display for LectureKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.lecture_uuid, self.week)
    }
}

/// One output row: a lecture where enough people are free.
#[derive(Debug, Clone, PartialEq)]
pub struct LectureRecord {
    pub structural_unit: String,
    pub course_code: String,
    pub lecture_type: String,
    pub course_name: String,
    pub available_people: Vec<String>,
    pub registered_count: Option<u64>,
    pub group_count: usize,
    pub week: u32,
    pub weekday: u32,
    pub start_time: String,
    pub address: Option<String>,
    pub course_link: String,
    pub course_timetable_link: String,
    /// Curriculum timetables the lecture was seen in, first sighting first.
    pub timetable_links: Vec<String>,
}

impl LectureRecord {
    /// Number of spreadsheet columns the row occupies.
    pub fn column_count(&self) -> usize {
        FIXED_COLUMNS + self.timetable_links.len()
    }

    /// Row in output column order.
    pub fn to_row(&self) -> Vec<String> {
        let mut row = Vec::with_capacity(self.column_count());
        row.push(self.structural_unit.clone());
        row.push(self.course_code.clone());
        row.push(self.lecture_type.clone());
        row.push(self.course_name.clone());
        row.push(self.available_people.join(", "));
        row.push(
            self.registered_count
                .map_or_else(|| "-".to_string(), |n| n.to_string()),
        );
        row.push(if self.group_count > 0 {
            self.group_count.to_string()
        } else {
            "-".to_string()
        });
        row.push(self.week.to_string());
        row.push(self.weekday.to_string());
        row.push(self.start_time.clone());
        row.push(self.address.clone().unwrap_or_else(|| "-".to_string()));
        row.push(self.course_link.clone());
        row.push(self.course_timetable_link.clone());
        row.extend(self.timetable_links.iter().cloned());
        row
    }
}

/// A lecture week seen by a course task.
///
/// `candidate` is set when enough people are free at an allowed location;
/// it becomes the row if the key has not been recorded yet.
#[derive(Debug, Clone, PartialEq)]
pub struct Sighting {
    pub key: LectureKey,
    pub timetable_link: String,
    pub candidate: Option<LectureRecord>,
}

/// What merging a sighting did to the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    Inserted,
    LinkAppended,
    LinkDropped,
    Ignored,
}

/// Records keyed by lecture week.
#[derive(Debug, Clone)]
pub struct LectureTable {
    records: HashMap<LectureKey, LectureRecord>,
    max_columns: usize,
}

impl LectureTable {
    /// Create an empty table whose rows never exceed `max_columns`.
    pub fn new(max_columns: usize) -> Self {
        Self {
            records: HashMap::new(),
            max_columns,
        }
    }

    /// Insert a new record or extend an existing one with a timetable link.
    pub fn merge(&mut self, sighting: Sighting) -> MergeOutcome {
        if let Some(existing) = self.records.get_mut(&sighting.key) {
            if existing.column_count() < self.max_columns {
                existing.timetable_links.push(sighting.timetable_link);
                return MergeOutcome::LinkAppended;
            }
            return MergeOutcome::LinkDropped;
        }

        match sighting.candidate {
            Some(record) => {
                self.records.insert(sighting.key, record);
                MergeOutcome::Inserted
            }
            None => MergeOutcome::Ignored,
        }
    }

    pub fn get(&self, key: &LectureKey) -> Option<&LectureRecord> {
        self.records.get(key)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Output rows sorted by key.
    pub fn to_rows(&self) -> Vec<Vec<String>> {
        let mut keys: Vec<&LectureKey> = self.records.keys().collect();
        keys.sort();
        keys.into_iter()
            .map(|key| self.records[key].to_row())
            .collect()
    }
}

/// Occurrence count per raw lecture start time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LectureTimeHistogram {
    counts: BTreeMap<String, usize>,
}

impl LectureTimeHistogram {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment(&mut self, time: impl Into<String>) {
        *self.counts.entry(time.into()).or_insert(0) += 1;
    }

    pub fn count(&self, time: &str) -> usize {
        self.counts.get(time).copied().unwrap_or(0)
    }

    /// Start times from most to least common; ties keep time order.
    pub fn ranked(&self) -> Vec<(&str, usize)> {
        let mut ranked: Vec<(&str, usize)> = self
            .counts
            .iter()
            .map(|(time, count)| (time.as_str(), *count))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(week: u32) -> LectureRecord {
        LectureRecord {
            structural_unit: "LTAT".into(),
            course_code: "LTAT.03.001".into(),
            lecture_type: "loeng".into(),
            course_name: "Programmeerimine".into(),
            available_people: vec!["A".into(), "B".into()],
            registered_count: Some(120),
            group_count: 0,
            week,
            weekday: 2,
            start_time: "10:15".into(),
            address: None,
            course_link: "course".into(),
            course_timetable_link: "plan".into(),
            timetable_links: vec!["tt-1".into()],
        }
    }

    fn sighting(week: u32, link: &str, candidate: Option<LectureRecord>) -> Sighting {
        Sighting {
            key: LectureKey::new("lecture-1", week),
            timetable_link: link.into(),
            candidate,
        }
    }

    #[test]
    fn test_row_layout() {
        let row = record(5).to_row();
        assert_eq!(row.len(), 14);
        assert_eq!(row[4], "A, B");
        assert_eq!(row[5], "120");
        assert_eq!(row[6], "-");
        assert_eq!(row[7], "5");
        assert_eq!(row[10], "-");
        assert_eq!(row[13], "tt-1");
    }

    #[test]
    fn test_key_display() {
        assert_eq!(LectureKey::new("abc", 7).to_string(), "abc_7");
    }

    #[test]
    fn test_second_sighting_appends_link() {
        let mut table = LectureTable::new(38);
        assert_eq!(table.merge(sighting(5, "tt-1", Some(record(5)))), MergeOutcome::Inserted);
        assert_eq!(table.merge(sighting(5, "tt-2", Some(record(5)))), MergeOutcome::LinkAppended);
        assert_eq!(table.len(), 1);
        let key = LectureKey::new("lecture-1", 5);
        assert_eq!(table.get(&key).unwrap().timetable_links, vec!["tt-1", "tt-2"]);
    }

    #[test]
    fn test_links_stop_at_column_cap() {
        let mut table = LectureTable::new(16);
        table.merge(sighting(5, "tt-1", Some(record(5))));
        for i in 2..10 {
            table.merge(sighting(5, &format!("tt-{}", i), None));
        }
        let key = LectureKey::new("lecture-1", 5);
        let stored = table.get(&key).unwrap();
        assert_eq!(stored.column_count(), 16);
        assert_eq!(stored.timetable_links, vec!["tt-1", "tt-2", "tt-3"]);
        assert_eq!(table.merge(sighting(5, "tt-99", None)), MergeOutcome::LinkDropped);
    }

    #[test]
    fn test_unseen_key_without_candidate_is_ignored() {
        let mut table = LectureTable::new(38);
        assert_eq!(table.merge(sighting(6, "tt-1", None)), MergeOutcome::Ignored);
        assert!(table.is_empty());
    }

    #[test]
    fn test_rows_sorted_by_key() {
        let mut table = LectureTable::new(38);
        table.merge(sighting(9, "tt", Some(record(9))));
        table.merge(sighting(3, "tt", Some(record(3))));
        let weeks: Vec<String> = table.to_rows().into_iter().map(|r| r[7].clone()).collect();
        assert_eq!(weeks, vec!["3", "9"]);
    }

    #[test]
    fn test_histogram_ranking() {
        let mut histogram = LectureTimeHistogram::new();
        for time in ["10:15:00", "12:15:00", "10:15:00", "08:15:00", "12:15:00", "10:15:00"] {
            histogram.increment(time);
        }
        assert_eq!(
            histogram.ranked(),
            vec![("10:15:00", 3), ("12:15:00", 2), ("08:15:00", 1)]
        );
        assert_eq!(histogram.count("14:15:00"), 0);
    }
}
