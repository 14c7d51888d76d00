//! Timetable API trait and its HTTP implementation.

use async_trait::async_trait;
use reqwest::{header, StatusCode, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

use crate::config::ApiSettings;
use crate::error::{BashError, BashResult, ErrorContext};
use crate::models::ois::{
    CourseDetails, RegistrationInfo, SearchFilter, SearchRequest, TimetableSummary,
};

/// Read access to published timetables and course data.
///
/// # Errors
/// A 404 is reported as [`BashError::NotFound`], an undecodable body as
/// [`BashError::MalformedResponse`]; any other failure is a
/// [`BashError::Fetch`].
#[async_trait]
pub trait TimetableApi: Send + Sync {
    /// One page of timetables. `start` is 1-based.
    async fn search(
        &self,
        filter: &SearchFilter,
        start: u32,
        take: u32,
    ) -> BashResult<Vec<TimetableSummary>>;

    /// Extended details of a course version.
    async fn course_version(
        &self,
        course_uuid: &str,
        version_uuid: &str,
    ) -> BashResult<CourseDetails>;

    /// Registration statistics of a course version.
    async fn registration_info(&self, version_uuid: &str) -> BashResult<RegistrationInfo>;
}

/// HTTP client for the ÕIS2 API.
#[derive(Debug, Clone)]
pub struct OisClient {
    http: reqwest::Client,
    base_url: Url,
}

impl OisClient {
    /// Create a client for the configured API.
    pub fn new(settings: &ApiSettings) -> BashResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.request_timeout_secs))
            .build()
            .map_err(|e| BashError::configuration(format!("Failed to build HTTP client: {}", e)))?;

        let mut base = settings.base_url.clone();
        if !base.ends_with('/') {
            base.push('/');
        }
        let base_url = Url::parse(&base).map_err(|e| {
            BashError::configuration(format!("Invalid API base URL '{}': {}", base, e))
        })?;

        Ok(Self { http, base_url })
    }

    fn endpoint(&self, path: &str) -> BashResult<Url> {
        self.base_url.join(path).map_err(|e| {
            BashError::configuration(format!("Invalid API path '{}': {}", path, e))
        })
    }

    async fn decode<T: DeserializeOwned>(
        response: reqwest::Response,
        context: ErrorContext,
    ) -> BashResult<T> {
        let status = response.status();
        let body = response.bytes().await?;

        if status == StatusCode::NOT_FOUND {
            return Err(BashError::not_found_with_context(
                format!("{} returned 404", context.operation.as_deref().unwrap_or("request")),
                context,
            ));
        }
        if !status.is_success() {
            let text = String::from_utf8_lossy(&body);
            return Err(BashError::fetch_with_context(
                format!("request failed ({}): {}", status, text.trim()),
                context,
            ));
        }

        serde_json::from_slice(&body).map_err(|e| BashError::MalformedResponse {
            message: e.to_string(),
            context,
        })
    }
}

#[async_trait]
impl TimetableApi for OisClient {
    async fn search(
        &self,
        filter: &SearchFilter,
        start: u32,
        take: u32,
    ) -> BashResult<Vec<TimetableSummary>> {
        let url = self.endpoint("timetable")?;
        debug!(%url, start, take, "searching timetables");
        let response = self
            .http
            .post(url)
            .header(header::CONNECTION, "close")
            .json(&SearchRequest {
                filter,
                start,
                take,
            })
            .send()
            .await?;
        Self::decode(
            response,
            ErrorContext::new("search")
                .with_entity("timetable")
                .with_details(format!("start={}, take={}", start, take)),
        )
        .await
    }

    async fn course_version(
        &self,
        course_uuid: &str,
        version_uuid: &str,
    ) -> BashResult<CourseDetails> {
        let url = self.endpoint(&format!("courses/{}/versions/{}", course_uuid, version_uuid))?;
        let response = self.http.get(url).send().await?;
        Self::decode(
            response,
            ErrorContext::new("course_version")
                .with_entity("course")
                .with_entity_id(format!("{}/{}", course_uuid, version_uuid)),
        )
        .await
    }

    async fn registration_info(&self, version_uuid: &str) -> BashResult<RegistrationInfo> {
        let url = self.endpoint(&format!("registrations/courses/{}", version_uuid))?;
        let response = self.http.get(url).send().await?;
        Self::decode(
            response,
            ErrorContext::new("registration_info")
                .with_entity("registration")
                .with_entity_id(version_uuid),
        )
        .await
    }
}
