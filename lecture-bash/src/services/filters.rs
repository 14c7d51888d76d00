//! Eligibility predicates for courses, lectures and locations.

use crate::config::FilterSettings;
use crate::models::ois::{CourseDetails, LectureEvent};

/// Pure predicates configured from [`FilterSettings`].
#[derive(Debug, Clone)]
pub struct EligibilityFilter {
    blacklisted_locations: Vec<String>,
    blacklisted_lecture_types: Vec<String>,
    excluded_study_types: Vec<String>,
    required_study_level: String,
}

impl EligibilityFilter {
    pub fn new(settings: &FilterSettings) -> Self {
        Self {
            blacklisted_locations: settings
                .blacklisted_locations
                .iter()
                .map(|l| l.to_lowercase())
                .collect(),
            blacklisted_lecture_types: settings.blacklisted_lecture_types.clone(),
            excluded_study_types: settings.excluded_study_types.clone(),
            required_study_level: settings.required_study_level.clone(),
        }
    }

    /// False when the address mentions a blacklisted city.
    pub fn allows_location(&self, address: &str) -> bool {
        let address = address.to_lowercase();
        !self
            .blacklisted_locations
            .iter()
            .any(|city| address.contains(city.as_str()))
    }

    /// False for exams, resits, tests, practice sessions and e-learning.
    pub fn allows_lecture_type(&self, lecture: &LectureEvent) -> bool {
        match lecture.type_code() {
            Some(code) => !self.blacklisted_lecture_types.iter().any(|t| t == code),
            None => true,
        }
    }

    /// True when the course sets no level or includes the required one.
    pub fn allows_study_level(&self, course: &CourseDetails) -> bool {
        match &course.additional_info.study_levels {
            None => true,
            Some(levels) => levels
                .iter()
                .any(|l| l.code() == Some(self.required_study_level.as_str())),
        }
    }

    /// False for open university (block mode) courses.
    pub fn allows_study_type(&self, course: &CourseDetails) -> bool {
        match course.target.study_type.as_ref().and_then(|t| t.code()) {
            Some(code) => !self.excluded_study_types.iter().any(|t| t == code),
            None => true,
        }
    }
}

impl Default for EligibilityFilter {
    fn default() -> Self {
        Self::new(&FilterSettings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ois::{AdditionalInfo, Classifier, CourseTarget};

    fn lecture(study_work_type: Option<&str>, event_type: Option<&str>) -> LectureEvent {
        LectureEvent {
            uuid: "e".into(),
            study_work_type: study_work_type.map(Classifier::new),
            event_type: event_type.map(Classifier::new),
            ..Default::default()
        }
    }

    fn course(levels: Option<&[&str]>, study_type: &str) -> CourseDetails {
        CourseDetails {
            target: CourseTarget {
                study_type: Some(Classifier::new(study_type)),
                course_main_structural_unit: None,
            },
            additional_info: AdditionalInfo {
                study_levels: levels.map(|l| l.iter().map(|c| Classifier::new(*c)).collect()),
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_location_blacklist_is_case_insensitive() {
        let filter = EligibilityFilter::default();
        assert!(filter.allows_location("J. Liivi 2, Tartu"));
        assert!(!filter.allows_location("Raekoja plats 1, NARVA"));
        assert!(!filter.allows_location("Ringi 35, Pärnu"));
        assert!(!filter.allows_location("Tallinn, Estonia"));
        assert!(filter.allows_location(""));
    }

    #[test]
    fn test_location_matches_substrings() {
        let filter = EligibilityFilter::default();
        // A Tartu street named after Narva still contains the city name.
        assert!(!filter.allows_location("Narva mnt 18, Tartu"));
    }

    #[test]
    fn test_lecture_type_blacklist() {
        let filter = EligibilityFilter::default();
        assert!(filter.allows_lecture_type(&lecture(Some("lecture"), None)));
        assert!(filter.allows_lecture_type(&lecture(Some("seminar"), None)));
        assert!(!filter.allows_lecture_type(&lecture(Some("exam"), None)));
        assert!(!filter.allows_lecture_type(&lecture(Some("e-learning"), None)));
    }

    #[test]
    fn test_event_type_used_without_study_work_type() {
        let filter = EligibilityFilter::default();
        assert!(!filter.allows_lecture_type(&lecture(None, Some("resit"))));
        assert!(filter.allows_lecture_type(&lecture(None, Some("lecture"))));
        assert!(filter.allows_lecture_type(&lecture(None, None)));
    }

    #[test]
    fn test_type_without_code_is_allowed() {
        let filter = EligibilityFilter::default();
        let mut unlabelled = lecture(None, None);
        unlabelled.study_work_type = Some(Classifier {
            et: Some("eksam".into()),
            ..Default::default()
        });
        assert!(filter.allows_lecture_type(&unlabelled));
    }

    #[test]
    fn test_study_work_type_wins_over_event_type() {
        let filter = EligibilityFilter::default();
        assert!(filter.allows_lecture_type(&lecture(Some("lecture"), Some("exam"))));
    }

    #[test]
    fn test_study_level() {
        let filter = EligibilityFilter::default();
        assert!(filter.allows_study_level(&course(None, "fulltime")));
        assert!(filter.allows_study_level(&course(Some(&["master", "bachelor"]), "fulltime")));
        assert!(!filter.allows_study_level(&course(Some(&["master"]), "fulltime")));
        assert!(!filter.allows_study_level(&course(Some(&[]), "fulltime")));
    }

    #[test]
    fn test_open_university_excluded() {
        let filter = EligibilityFilter::default();
        assert!(!filter.allows_study_type(&course(None, "openuniv")));
        assert!(filter.allows_study_type(&course(None, "fulltime")));
    }

    #[test]
    fn test_custom_blacklist() {
        let filter = EligibilityFilter::new(&FilterSettings {
            blacklisted_locations: vec!["Viljandi".into()],
            ..FilterSettings::default()
        });
        assert!(!filter.allows_location("Posti 1, viljandi"));
        assert!(filter.allows_location("Narva"));
    }
}
