//! Per-course processing: filters, registration lookup and availability
//! matching for every lecture occurrence of one course.
//!
//! A course task never touches shared state. It returns a [`CourseOutcome`]
//! that the plan driver merges into the lecture table and histogram.

use tracing::{debug, warn};

use crate::clients::TimetableApi;
use crate::config::AppConfig;
use crate::error::{BashError, BashResult, ErrorContext};
use crate::models::ois::{
    Classifier, CourseDetails, CourseEvents, LectureEvent, RegistrationInfo,
};
use crate::models::{
    parse_academic_weeks, parse_clock_time, AvailabilityIndex, LectureKey, LectureRecord,
    Sighting,
};
use crate::services::filters::EligibilityFilter;
use crate::services::links::LinkBuilder;

/// Matching starts at the lecture's first instant.
const MATCH_DURATION_HOURS: f64 = 0.0;

/// Read-only state shared by every course task of a run.
#[derive(Debug, Clone)]
pub struct ProcessingContext {
    pub index: AvailabilityIndex,
    pub filter: EligibilityFilter,
    pub links: LinkBuilder,
    pub min_available_people: usize,
}

impl ProcessingContext {
    pub fn new(index: AvailabilityIndex, config: &AppConfig) -> Self {
        Self {
            index,
            filter: EligibilityFilter::new(&config.filters),
            links: LinkBuilder::new(&config.api.web_url),
            min_available_people: config.filters.min_available_people,
        }
    }
}

/// Everything one course task observed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CourseOutcome {
    pub sightings: Vec<Sighting>,
    /// Raw begin times of lectures at allowed locations, one per occurrence.
    pub lecture_times: Vec<String>,
}

impl CourseOutcome {
    fn skipped() -> Self {
        Self::default()
    }
}

/// Display fields shared by every record of a course.
struct CourseFields {
    structural_unit: String,
    course_code: String,
    course_name: String,
    registered_count: Option<u64>,
    group_count: usize,
    course_link: String,
    course_timetable_link: String,
}

impl CourseFields {
    fn new(
        course: &CourseEvents,
        details: &CourseDetails,
        registration: &RegistrationInfo,
        links: &LinkBuilder,
    ) -> Self {
        let course_uuid = &course.info.course_uuid;
        let version_uuid = &course.info.course_version_uuid;
        Self {
            structural_unit: details
                .target
                .course_main_structural_unit
                .as_ref()
                .and_then(Classifier::code)
                .unwrap_or("-")
                .to_string(),
            course_code: registration.course.code.clone(),
            course_name: details.title.label().unwrap_or("-").to_string(),
            registered_count: registration.restrictions.registered_students,
            group_count: registration.group_count(),
            course_link: links.course(course_uuid, version_uuid),
            course_timetable_link: links.course_timetable(course_uuid, version_uuid),
        }
    }
}

/// Why the remaining lectures of a course are not looked at.
enum LectureStop {
    /// The lecture type is blacklisted.
    RejectedType,
    /// Schedule data is missing or unreadable.
    Malformed(BashError),
}

/// Process one course entry of a timetable.
///
/// # Errors
/// Registration lookups that fail with anything other than a 404 or an
/// unreadable body are returned, as is any failure to fetch the course
/// details. Malformed lecture data only ends the course early.
pub async fn process_course(
    api: &dyn TimetableApi,
    ctx: &ProcessingContext,
    course: &CourseEvents,
    timetable_link: &str,
) -> BashResult<CourseOutcome> {
    let course_uuid = &course.info.course_uuid;
    let version_uuid = &course.info.course_version_uuid;
    debug!(%course_uuid, %version_uuid, "Course");

    let details = api.course_version(course_uuid, version_uuid).await?;

    if !ctx.filter.allows_study_type(&details) {
        debug!(%course_uuid, "skipping open university course");
        return Ok(CourseOutcome::skipped());
    }
    if !ctx.filter.allows_study_level(&details) {
        debug!(%course_uuid, "skipping course outside the required study level");
        return Ok(CourseOutcome::skipped());
    }

    let registration = match api.registration_info(version_uuid).await {
        Ok(info) => info,
        Err(e) if e.is_course_local() => {
            warn!(%version_uuid, error = %e, "Missing/malformed registration data");
            return Ok(CourseOutcome::skipped());
        }
        Err(e) => return Err(e),
    };

    let fields = CourseFields::new(course, &details, &registration, &ctx.links);
    let mut outcome = CourseOutcome::default();

    for lecture in &course.events {
        debug!(lecture_uuid = %lecture.uuid, "Lecture");
        match process_lecture(ctx, &fields, lecture, timetable_link, &mut outcome) {
            Ok(()) => {}
            Err(LectureStop::RejectedType) => {
                debug!(
                    lecture_uuid = %lecture.uuid,
                    lecture_type = lecture.type_code().unwrap_or("-"),
                    "blacklisted lecture type, skipping rest of course"
                );
                break;
            }
            Err(LectureStop::Malformed(e)) => {
                warn!(%course_uuid, error = %e, "Malformed lecture times");
                break;
            }
        }
    }

    Ok(outcome)
}

fn process_lecture(
    ctx: &ProcessingContext,
    fields: &CourseFields,
    lecture: &LectureEvent,
    timetable_link: &str,
    outcome: &mut CourseOutcome,
) -> Result<(), LectureStop> {
    let context = || {
        ErrorContext::new("process_lecture")
            .with_entity("lecture")
            .with_entity_id(&lecture.uuid)
    };

    let weekday = lecture.time.weekday.as_ref().and_then(Classifier::code);
    let (Some(weekday), Some(begin_time)) = (weekday, &lecture.time.begin_time) else {
        return Err(LectureStop::Malformed(BashError::malformed_schedule(
            "weekday code or begin time missing",
            context(),
        )));
    };

    if !ctx.filter.allows_lecture_type(lecture) {
        return Err(LectureStop::RejectedType);
    }

    let day: u32 = weekday.parse().map_err(|_| {
        LectureStop::Malformed(BashError::malformed_schedule(
            format!("weekday code '{}' is not a number", weekday),
            context(),
        ))
    })?;
    let start = parse_clock_time(begin_time).map_err(|e| {
        LectureStop::Malformed(BashError::malformed_schedule(e.to_string(), context()))
    })?;

    let address = lecture.location.address.as_deref();
    let location_allowed = ctx.filter.allows_location(address.unwrap_or(""));
    if location_allowed {
        outcome.lecture_times.push(begin_time.clone());
    }

    let Some(weeks) = &lecture.time.academic_weeks else {
        warn!(lecture_uuid = %lecture.uuid, "lecture has no academic weeks");
        return Ok(());
    };
    let weeks = parse_academic_weeks(weeks).map_err(|e| {
        LectureStop::Malformed(BashError::malformed_schedule(e.to_string(), context()))
    })?;

    for week in weeks {
        let key = LectureKey::new(lecture.uuid.clone(), week);
        let available = ctx
            .index
            .available_people(week, day, start, MATCH_DURATION_HOURS);

        let candidate = (location_allowed && available.len() >= ctx.min_available_people)
            .then(|| LectureRecord {
                structural_unit: fields.structural_unit.clone(),
                course_code: fields.course_code.clone(),
                lecture_type: lecture.type_label().unwrap_or("-").to_string(),
                course_name: fields.course_name.clone(),
                available_people: available.into_iter().collect(),
                registered_count: fields.registered_count,
                group_count: fields.group_count,
                week,
                weekday: day,
                start_time: hours_and_minutes(begin_time),
                address: address.map(str::to_string),
                course_link: fields.course_link.clone(),
                course_timetable_link: fields.course_timetable_link.clone(),
                timetable_links: vec![timetable_link.to_string()],
            });

        outcome.sightings.push(Sighting {
            key,
            timetable_link: timetable_link.to_string(),
            candidate,
        });
    }

    Ok(())
}

/// `"10:15:00"` -> `"10:15"`; text without seconds is kept as is.
fn hours_and_minutes(begin_time: &str) -> String {
    let mut parts = begin_time.splitn(3, ':');
    match (parts.next(), parts.next()) {
        (Some(hours), Some(minutes)) => format!("{}:{}", hours, minutes),
        _ => begin_time.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hours_and_minutes() {
        assert_eq!(hours_and_minutes("10:15:00"), "10:15");
        assert_eq!(hours_and_minutes("08:00"), "08:00");
        assert_eq!(hours_and_minutes("noon"), "noon");
    }
}
