#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::Mutex;

use lecture_bash::models::ois::{
    AdditionalInfo, Classifier, CourseDetails, CourseEvents, CourseRef, CourseTarget, EventTime,
    LectureEvent, LocalizedText, Location, RegisteredCourse, RegistrationInfo, Restrictions,
    TimetableInfo, TimetableSummary,
};

static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Runs `f` with environment variables temporarily modified.
///
/// Restores the previous values on unwind and serializes access to the
/// process environment across parallel tests.
///
/// `changes` is a list of `(key, value)` pairs:
/// - `Some(v)` sets the variable to `v`
/// - `None` removes the variable
pub fn with_scoped_env<F, R>(changes: &[(&str, Option<&str>)], f: F) -> R
where
    F: FnOnce() -> R,
{
    let _lock = ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    let _guard = ScopedEnv::new(changes);
    f()
}

struct ScopedEnv {
    snapshot: Vec<(String, Option<String>)>,
}

impl ScopedEnv {
    fn new(changes: &[(&str, Option<&str>)]) -> Self {
        let keys: HashSet<&str> = changes.iter().map(|(k, _)| *k).collect();
        let snapshot = keys
            .into_iter()
            .map(|k| (k.to_string(), std::env::var(k).ok()))
            .collect::<Vec<_>>();

        for (k, v) in changes {
            match v {
                Some(val) => std::env::set_var(k, val),
                None => std::env::remove_var(k),
            }
        }

        Self { snapshot }
    }
}

impl Drop for ScopedEnv {
    fn drop(&mut self) {
        for (k, v) in self.snapshot.drain(..) {
            match v {
                Some(val) => std::env::set_var(&k, val),
                None => std::env::remove_var(&k),
            }
        }
    }
}

/// Row-major sheet from string literals.
pub fn sheet(rows: &[&[&str]]) -> Vec<Vec<String>> {
    rows.iter()
        .map(|r| r.iter().map(|c| c.to_string()).collect())
        .collect()
}

/// Free-times sheet with current week 5: on Tuesday A is free 9:30-11:00,
/// B 10:00-10:30 and C not at all.
pub fn free_times_sheet() -> Vec<Vec<String>> {
    sheet(&[
        &["Week 5", "A", "B", "C"],
        &["5"],
        &["2", "9:30-11:00", "10:00-10:30", ""],
        &["3"],
        &["4"],
        &["5"],
        &["Week 6", "A", "B", "C"],
        &["1"],
        &["2", "9:30-11:00", "10:00-10:30", "10:00-11:00"],
    ])
}

pub fn lecture(uuid: &str, weekday: &str, begin_time: &str, weeks: &str) -> LectureEvent {
    LectureEvent {
        uuid: uuid.to_string(),
        time: EventTime {
            weekday: Some(Classifier::new(weekday)),
            begin_time: Some(begin_time.to_string()),
            academic_weeks: Some(weeks.to_string()),
        },
        location: Location {
            address: Some("J. Liivi 2, Tartu".to_string()),
        },
        study_work_type: Some(Classifier::new("lecture").with_label("loeng")),
        event_type: None,
    }
}

pub fn course(course_uuid: &str, version_uuid: &str, events: Vec<LectureEvent>) -> CourseEvents {
    CourseEvents {
        info: CourseRef {
            course_uuid: course_uuid.to_string(),
            course_version_uuid: version_uuid.to_string(),
        },
        events,
    }
}

pub fn timetable(uuid: &str, title: &str, courses: Option<Vec<CourseEvents>>) -> TimetableSummary {
    TimetableSummary {
        uuid: uuid.to_string(),
        info: TimetableInfo {
            title: LocalizedText {
                et: Some(title.to_string()),
                en: None,
            },
        },
        course_events: courses,
    }
}

pub fn course_details(name: &str) -> CourseDetails {
    CourseDetails {
        title: LocalizedText {
            et: Some(name.to_string()),
            en: None,
        },
        target: CourseTarget {
            study_type: Some(Classifier::new("fulltime")),
            course_main_structural_unit: Some(Classifier::new("LTAT")),
        },
        additional_info: AdditionalInfo {
            study_levels: Some(vec![Classifier::new("bachelor")]),
        },
    }
}

pub fn registration(code: &str, registered: u64, groups: usize) -> RegistrationInfo {
    RegistrationInfo {
        course: RegisteredCourse {
            code: code.to_string(),
        },
        restrictions: Restrictions {
            registered_students: Some(registered),
        },
        groups: Some(vec![serde_json::json!({}); groups]),
    }
}
