//! Response types of the study information system (ÕIS2) API.
//!
//! Only the fields the pipeline reads are modelled; everything else in the
//! payloads is ignored by serde.

use serde::{Deserialize, Deserializer, Serialize};

/// Text localized to Estonian and English.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LocalizedText {
    #[serde(default)]
    pub et: Option<String>,
    #[serde(default)]
    pub en: Option<String>,
}

impl LocalizedText {
    /// Estonian text, falling back to English.
    pub fn label(&self) -> Option<&str> {
        self.et.as_deref().or(self.en.as_deref())
    }
}

/// A classifier value such as a weekday, event type or study level.
///
/// The code is absent on some label-only entries.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Classifier {
    #[serde(default, deserialize_with = "string_or_number")]
    pub code: Option<String>,
    #[serde(default)]
    pub et: Option<String>,
    #[serde(default)]
    pub en: Option<String>,
}

impl Classifier {
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: Some(code.into()),
            ..Default::default()
        }
    }

    /// The code, treating a blank one as missing.
    pub fn code(&self) -> Option<&str> {
        self.code.as_deref().map(str::trim).filter(|c| !c.is_empty())
    }

    pub fn with_label(mut self, et: impl Into<String>) -> Self {
        self.et = Some(et.into());
        self
    }
}

/// Weekday codes arrive as either `"2"` or `2`.
fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::Null => Ok(None),
        serde_json::Value::String(s) => Ok(Some(s)),
        serde_json::Value::Number(n) => Ok(Some(n.to_string())),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number code, got {}",
            other
        ))),
    }
}

/// Timetable search filter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchFilter {
    pub academic_year: String,
    pub semester: String,
    pub timetable_type: String,
}

/// Body of a timetable search request.
#[derive(Debug, Clone, Serialize)]
pub struct SearchRequest<'a> {
    pub filter: &'a SearchFilter,
    pub start: u32,
    pub take: u32,
}

/// One timetable (curriculum schedule) from a search page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimetableSummary {
    pub uuid: String,
    #[serde(default)]
    pub info: TimetableInfo,
    #[serde(default)]
    pub course_events: Option<Vec<CourseEvents>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimetableInfo {
    #[serde(default)]
    pub title: LocalizedText,
}

/// A course within a timetable together with its scheduled events.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CourseEvents {
    pub info: CourseRef,
    #[serde(default)]
    pub events: Vec<LectureEvent>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CourseRef {
    pub course_uuid: String,
    pub course_version_uuid: String,
}

/// A recurring lecture occurrence.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LectureEvent {
    pub uuid: String,
    #[serde(default)]
    pub time: EventTime,
    #[serde(default)]
    pub location: Location,
    #[serde(default)]
    pub study_work_type: Option<Classifier>,
    #[serde(default)]
    pub event_type: Option<Classifier>,
}

impl LectureEvent {
    /// Type code, preferring the study work type over the event type.
    ///
    /// Classifiers without a code are skipped.
    pub fn type_code(&self) -> Option<&str> {
        [&self.study_work_type, &self.event_type]
            .into_iter()
            .flatten()
            .find_map(Classifier::code)
    }

    /// Estonian type label, preferring the study work type.
    pub fn type_label(&self) -> Option<&str> {
        [&self.study_work_type, &self.event_type]
            .into_iter()
            .flatten()
            .find_map(|c| c.et.as_deref())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventTime {
    #[serde(default)]
    pub weekday: Option<Classifier>,
    #[serde(default)]
    pub begin_time: Option<String>,
    #[serde(default)]
    pub academic_weeks: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Location {
    #[serde(default)]
    pub address: Option<String>,
}

/// Extended course version details.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CourseDetails {
    #[serde(default)]
    pub title: LocalizedText,
    #[serde(default)]
    pub target: CourseTarget,
    #[serde(default)]
    pub additional_info: AdditionalInfo,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CourseTarget {
    #[serde(default)]
    pub study_type: Option<Classifier>,
    #[serde(default)]
    pub course_main_structural_unit: Option<Classifier>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AdditionalInfo {
    /// Absent means the course is open to every level.
    #[serde(default)]
    pub study_levels: Option<Vec<Classifier>>,
}

/// Registration statistics of a course version.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegistrationInfo {
    #[serde(default)]
    pub course: RegisteredCourse,
    #[serde(default)]
    pub restrictions: Restrictions,
    #[serde(default)]
    pub groups: Option<Vec<serde_json::Value>>,
}

impl RegistrationInfo {
    pub fn group_count(&self) -> usize {
        self.groups.as_ref().map_or(0, Vec::len)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegisteredCourse {
    #[serde(default)]
    pub code: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Restrictions {
    #[serde(default)]
    pub registered_students: Option<u64>,
}
