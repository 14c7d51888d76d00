//! Run configuration file support.
//!
//! Settings are read from a TOML file in which every key is optional, then
//! selected values are overridden from environment variables.
//!
//! # Environment Variables
//! - `LECTURE_BASH_CONFIG`: path of the configuration file
//! - `SHEETS_ACCESS_TOKEN`: OAuth access token for the spreadsheet API
//! - `OIS_API_URL`: base URL of the timetable API
//! - `LECTURE_BASH_ACADEMIC_YEAR`: academic year to search (e.g. `2019`)
//! - `LECTURE_BASH_SEMESTER`: `spring` or `autumn`

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{BashError, BashResult};
use crate::models::lecture::FIXED_COLUMNS;
use crate::models::ois::SearchFilter;

/// Full run configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub search: SearchSettings,
    #[serde(default)]
    pub filters: FilterSettings,
    #[serde(default)]
    pub api: ApiSettings,
    #[serde(default)]
    pub sheets: SheetsSettings,
}

/// Which timetables to page through.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchSettings {
    /// Year the academic year starts in, e.g. "2019" for 2019/2020.
    #[serde(default = "default_academic_year")]
    pub academic_year: String,
    /// "spring" or "autumn".
    #[serde(default = "default_semester")]
    pub semester: String,
    #[serde(default = "default_timetable_type")]
    pub timetable_type: String,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    /// No page is requested at or past this offset.
    #[serde(default = "default_offset_ceiling")]
    pub offset_ceiling: u32,
}

/// Eligibility rules for courses and lectures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterSettings {
    #[serde(default = "default_blacklisted_locations")]
    pub blacklisted_locations: Vec<String>,
    #[serde(default = "default_blacklisted_lecture_types")]
    pub blacklisted_lecture_types: Vec<String>,
    #[serde(default = "default_excluded_study_types")]
    pub excluded_study_types: Vec<String>,
    #[serde(default = "default_required_study_level")]
    pub required_study_level: String,
    #[serde(default = "default_min_available_people")]
    pub min_available_people: usize,
}

/// Timetable API endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiSettings {
    #[serde(default = "default_api_base_url")]
    pub base_url: String,
    /// Public web front-end used for the hyperlinks in the output.
    #[serde(default = "default_web_url")]
    pub web_url: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

/// Spreadsheet locations and credentials.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SheetsSettings {
    #[serde(default = "default_sheets_base_url")]
    pub base_url: String,
    #[serde(default = "default_spreadsheet_id")]
    pub availability_spreadsheet_id: String,
    #[serde(default = "default_availability_range")]
    pub availability_range: String,
    #[serde(default = "default_spreadsheet_id")]
    pub output_spreadsheet_id: String,
    #[serde(default = "default_output_range")]
    pub output_range: String,
    /// Width of the output range (A..AL).
    #[serde(default = "default_max_record_columns")]
    pub max_record_columns: usize,
    #[serde(default)]
    pub access_token: String,
}

fn default_academic_year() -> String {
    "2019".to_string()
}

fn default_semester() -> String {
    "spring".to_string()
}

fn default_timetable_type() -> String {
    "1".to_string()
}

fn default_page_size() -> u32 {
    50
}

fn default_offset_ceiling() -> u32 {
    700
}

fn default_blacklisted_locations() -> Vec<String> {
    ["tallinn", "narva", "pärnu"].map(String::from).to_vec()
}

fn default_blacklisted_lecture_types() -> Vec<String> {
    ["exam", "resit", "test", "practice", "e-learning"]
        .map(String::from)
        .to_vec()
}

fn default_excluded_study_types() -> Vec<String> {
    vec!["openuniv".to_string()]
}

fn default_required_study_level() -> String {
    "bachelor".to_string()
}

fn default_min_available_people() -> usize {
    2
}

fn default_api_base_url() -> String {
    "https://ois2.ut.ee/api/".to_string()
}

fn default_web_url() -> String {
    "https://ois2.ut.ee/".to_string()
}

fn default_request_timeout_secs() -> u64 {
    60
}

fn default_sheets_base_url() -> String {
    "https://sheets.googleapis.com/v4/".to_string()
}

fn default_spreadsheet_id() -> String {
    "1dT6zjPy2Pq8xLGfW8b3jdVgoOQZO-BLNWRd1qdOczCA".to_string()
}

fn default_availability_range() -> String {
    "'Free times'!1:150".to_string()
}

fn default_output_range() -> String {
    "'Found lectures'!A2:AL".to_string()
}

fn default_max_record_columns() -> usize {
    38
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            academic_year: default_academic_year(),
            semester: default_semester(),
            timetable_type: default_timetable_type(),
            page_size: default_page_size(),
            offset_ceiling: default_offset_ceiling(),
        }
    }
}

impl Default for FilterSettings {
    fn default() -> Self {
        Self {
            blacklisted_locations: default_blacklisted_locations(),
            blacklisted_lecture_types: default_blacklisted_lecture_types(),
            excluded_study_types: default_excluded_study_types(),
            required_study_level: default_required_study_level(),
            min_available_people: default_min_available_people(),
        }
    }
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: default_api_base_url(),
            web_url: default_web_url(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl Default for SheetsSettings {
    fn default() -> Self {
        Self {
            base_url: default_sheets_base_url(),
            availability_spreadsheet_id: default_spreadsheet_id(),
            availability_range: default_availability_range(),
            output_spreadsheet_id: default_spreadsheet_id(),
            output_range: default_output_range(),
            max_record_columns: default_max_record_columns(),
            access_token: String::new(),
        }
    }
}

impl SearchSettings {
    pub fn filter(&self) -> SearchFilter {
        SearchFilter {
            academic_year: self.academic_year.clone(),
            semester: self.semester.clone(),
            timetable_type: self.timetable_type.clone(),
        }
    }

    /// Page start offsets: 1, 1 + page_size, ... below the ceiling.
    pub fn page_offsets(&self) -> impl Iterator<Item = u32> {
        (1..self.offset_ceiling).step_by(self.page_size.max(1) as usize)
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Arguments
    /// * `path` - Path to the configuration file
    ///
    /// # Returns
    /// * `Ok(AppConfig)` if successful
    /// * `Err(BashError)` if the file cannot be read or parsed
    pub fn from_file<P: AsRef<Path>>(path: P) -> BashResult<Self> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            BashError::configuration(format!(
                "Failed to read config file {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from TOML text.
    pub fn from_toml_str(content: &str) -> BashResult<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load configuration from the default location.
    ///
    /// Searches for `lecture-bash.toml` in:
    /// 1. Current directory
    /// 2. `config/` directory
    ///
    /// Falls back to built-in defaults when no file exists.
    pub fn from_default_location() -> BashResult<Self> {
        let search_paths = [
            PathBuf::from("lecture-bash.toml"),
            PathBuf::from("config/lecture-bash.toml"),
        ];

        for path in search_paths {
            if path.exists() {
                return Self::from_file(&path);
            }
        }

        Ok(Self::default())
    }

    /// Load from `path` (or `LECTURE_BASH_CONFIG`, or the default location),
    /// apply environment overrides and validate.
    pub fn load(path: Option<&Path>) -> BashResult<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => match env::var("LECTURE_BASH_CONFIG") {
                Ok(path) => Self::from_file(path)?,
                Err(_) => Self::from_default_location()?,
            },
        };
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Override settings from environment variables.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(token) = env::var("SHEETS_ACCESS_TOKEN") {
            self.sheets.access_token = token;
        }
        if let Ok(url) = env::var("OIS_API_URL") {
            self.api.base_url = url;
        }
        if let Ok(year) = env::var("LECTURE_BASH_ACADEMIC_YEAR") {
            self.search.academic_year = year;
        }
        if let Ok(semester) = env::var("LECTURE_BASH_SEMESTER") {
            self.search.semester = semester;
        }
    }

    /// Check value ranges that serde cannot express.
    pub fn validate(&self) -> BashResult<()> {
        if self.search.page_size == 0 {
            return Err(BashError::configuration("search.page_size must be positive"));
        }
        match self.search.semester.as_str() {
            "spring" | "autumn" => {}
            other => {
                return Err(BashError::configuration(format!(
                    "Unsupported semester '{}'. Use spring or autumn.",
                    other
                )))
            }
        }
        if self.sheets.max_record_columns <= FIXED_COLUMNS {
            return Err(BashError::configuration(format!(
                "sheets.max_record_columns must exceed {} to fit a timetable link",
                FIXED_COLUMNS
            )));
        }
        Ok(())
    }

    /// The access token, required before talking to the spreadsheet API.
    pub fn sheets_token(&self) -> BashResult<&str> {
        if self.sheets.access_token.trim().is_empty() {
            return Err(BashError::configuration(
                "SHEETS_ACCESS_TOKEN environment variable not set",
            ));
        }
        Ok(&self.sheets.access_token)
    }
}
