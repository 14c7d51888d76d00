//! Spreadsheet `HYPERLINK` formulas pointing at the study information system.

/// `=HYPERLINK("url","label")`. Quotes in either part are doubled.
pub fn hyperlink(url: &str, label: &str) -> String {
    format!(
        "=HYPERLINK(\"{}\",\"{}\")",
        url.replace('"', "\"\""),
        label.replace('"', "\"\"")
    )
}

/// Builds links into the web front-end.
#[derive(Debug, Clone)]
pub struct LinkBuilder {
    web_url: String,
}

impl LinkBuilder {
    pub fn new(web_url: &str) -> Self {
        Self {
            web_url: web_url.trim_end_matches('/').to_string(),
        }
    }

    /// Link to a course version's detail page.
    pub fn course(&self, course_uuid: &str, version_uuid: &str) -> String {
        hyperlink(
            &format!(
                "{}/#/courses/{}/version/{}/details",
                self.web_url, course_uuid, version_uuid
            ),
            "Course",
        )
    }

    /// Link to a course version's own timetable.
    pub fn course_timetable(&self, course_uuid: &str, version_uuid: &str) -> String {
        hyperlink(
            &format!(
                "{}/#/timetable/course/{}/{}",
                self.web_url, course_uuid, version_uuid
            ),
            "Timetable",
        )
    }

    /// Link to a curriculum timetable, labelled with its title.
    pub fn timetable(&self, timetable_uuid: &str, title: &str) -> String {
        hyperlink(
            &format!("{}/#/timetable/{}", self.web_url, timetable_uuid),
            title,
        )
    }
}
