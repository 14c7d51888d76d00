//! Spreadsheet store trait and a Google Sheets v4 implementation.

use async_trait::async_trait;
use reqwest::{StatusCode, Url};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use crate::config::SheetsSettings;
use crate::error::{BashError, BashResult, ErrorContext};

/// Row-major access to a named cell range.
#[async_trait]
pub trait SpreadsheetStore: Send + Sync {
    /// Read a range. Trailing empty cells and rows may be missing.
    async fn read_range(&self, spreadsheet_id: &str, range: &str) -> BashResult<Vec<Vec<String>>>;

    /// Remove every value in a range.
    async fn clear_range(&self, spreadsheet_id: &str, range: &str) -> BashResult<()>;

    /// Overwrite a range starting at its top-left cell.
    async fn write_range(
        &self,
        spreadsheet_id: &str,
        range: &str,
        rows: Vec<Vec<String>>,
    ) -> BashResult<()>;
}

#[derive(Debug, Default, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<String>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ValueRangeBody<'a> {
    range: &'a str,
    major_dimension: &'static str,
    values: Vec<Vec<String>>,
}

/// Google Sheets API client authenticated with an OAuth bearer token.
#[derive(Debug, Clone)]
pub struct GoogleSheetsClient {
    http: reqwest::Client,
    base_url: Url,
    access_token: String,
}

impl GoogleSheetsClient {
    /// Create a client. The access token is obtained outside this program.
    pub fn new(
        settings: &SheetsSettings,
        access_token: impl Into<String>,
        timeout: Duration,
    ) -> BashResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| BashError::configuration(format!("Failed to build HTTP client: {}", e)))?;
        let base_url = Url::parse(&settings.base_url).map_err(|e| {
            BashError::configuration(format!(
                "Invalid spreadsheet base URL '{}': {}",
                settings.base_url, e
            ))
        })?;

        Ok(Self {
            http,
            base_url,
            access_token: access_token.into(),
        })
    }

    /// `{base}/spreadsheets/{id}/values/{range}{suffix}` with the range
    /// percent-encoded as a single path segment.
    fn values_url(&self, spreadsheet_id: &str, range: &str, suffix: &str) -> BashResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| BashError::configuration("Spreadsheet base URL cannot hold a path"))?
            .pop_if_empty()
            .push("spreadsheets")
            .push(spreadsheet_id)
            .push("values")
            .push(&format!("{}{}", range, suffix));
        Ok(url)
    }

    async fn check(response: reqwest::Response, context: ErrorContext) -> BashResult<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        let message = format!("spreadsheet request failed ({}): {}", status, body.trim());
        if status == StatusCode::NOT_FOUND {
            return Err(BashError::not_found_with_context(message, context));
        }
        Err(BashError::spreadsheet_with_context(message, context))
    }
}

#[async_trait]
impl SpreadsheetStore for GoogleSheetsClient {
    async fn read_range(&self, spreadsheet_id: &str, range: &str) -> BashResult<Vec<Vec<String>>> {
        let url = self.values_url(spreadsheet_id, range, "")?;
        debug!(%url, "reading spreadsheet range");
        let context = ErrorContext::new("read_range")
            .with_entity("range")
            .with_entity_id(range);
        let response = self
            .http
            .get(url)
            .bearer_auth(&self.access_token)
            .send()
            .await?;
        let response = Self::check(response, context.clone()).await?;
        let body = response.bytes().await?;
        let values: ValueRange =
            serde_json::from_slice(&body).map_err(|e| BashError::MalformedResponse {
                message: e.to_string(),
                context,
            })?;
        Ok(values.values)
    }

    async fn clear_range(&self, spreadsheet_id: &str, range: &str) -> BashResult<()> {
        let url = self.values_url(spreadsheet_id, range, ":clear")?;
        debug!(%url, "clearing spreadsheet range");
        let response = self
            .http
            .post(url)
            .bearer_auth(&self.access_token)
            .json(&serde_json::json!({}))
            .send()
            .await?;
        Self::check(
            response,
            ErrorContext::new("clear_range")
                .with_entity("range")
                .with_entity_id(range),
        )
        .await?;
        Ok(())
    }

    async fn write_range(
        &self,
        spreadsheet_id: &str,
        range: &str,
        rows: Vec<Vec<String>>,
    ) -> BashResult<()> {
        let mut url = self.values_url(spreadsheet_id, range, "")?;
        // Formulas such as =HYPERLINK(...) are evaluated as if typed in.
        url.query_pairs_mut()
            .append_pair("valueInputOption", "USER_ENTERED");
        debug!(%url, rows = rows.len(), "writing spreadsheet range");
        let response = self
            .http
            .put(url)
            .bearer_auth(&self.access_token)
            .json(&ValueRangeBody {
                range,
                major_dimension: "ROWS",
                values: rows,
            })
            .send()
            .await?;
        Self::check(
            response,
            ErrorContext::new("write_range")
                .with_entity("range")
                .with_entity_id(range),
        )
        .await?;
        Ok(())
    }
}
