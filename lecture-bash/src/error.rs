//! Error types for the lecture bash pipeline.
//!
//! Every variant carries an [`ErrorContext`] describing where the failure
//! happened. Callers decide per variant whether a failure is fatal for the run
//! or only for the course being processed.

use std::fmt;

/// Result type for pipeline operations
pub type BashResult<T> = Result<T, BashError>;

/// Structured context for pipeline errors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorContext {
    /// The operation being performed (e.g., "search", "build_index")
    pub operation: Option<String>,
    /// The entity type involved (e.g., "course", "registration", "cell")
    pub entity: Option<String>,
    /// The entity ID if applicable
    pub entity_id: Option<String>,
    /// Additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a new error context with an operation name.
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: Some(operation.into()),
            ..Default::default()
        }
    }

    /// Set the entity type.
    pub fn with_entity(mut self, entity: impl Into<String>) -> Self {
        self.entity = Some(entity.into());
        self
    }

    /// Set the entity ID.
    pub fn with_entity_id(mut self, id: impl ToString) -> Self {
        self.entity_id = Some(id.to_string());
        self
    }

    /// Set additional details.
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    fn is_empty(&self) -> bool {
        self.operation.is_none()
            && self.entity.is_none()
            && self.entity_id.is_none()
            && self.details.is_none()
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return Ok(());
        }
        let mut parts = Vec::new();
        if let Some(ref op) = self.operation {
            parts.push(format!("operation={}", op));
        }
        if let Some(ref entity) = self.entity {
            parts.push(format!("entity={}", entity));
        }
        if let Some(ref id) = self.entity_id {
            parts.push(format!("id={}", id));
        }
        if let Some(ref details) = self.details {
            parts.push(format!("details={}", details));
        }
        write!(f, "[{}]", parts.join(", "))
    }
}

/// Error type for the pipeline.
#[derive(Debug, thiserror::Error)]
pub enum BashError {
    /// Network failure or a non-2xx response. Never retried.
    #[error("Fetch error: {message} {context}")]
    Fetch {
        message: String,
        context: ErrorContext,
    },

    /// The remote API answered 404.
    #[error("Not found: {message} {context}")]
    NotFound {
        message: String,
        context: ErrorContext,
    },

    /// A response body could not be decoded.
    #[error("Malformed response: {message} {context}")]
    MalformedResponse {
        message: String,
        context: ErrorContext,
    },

    /// A clock time or academic week expression could not be parsed.
    #[error("Parse error: {message} {context}")]
    Parse {
        message: String,
        context: ErrorContext,
    },

    /// A free-time cell of the availability sheet is unreadable.
    #[error("Malformed time: {raw} {context}")]
    MalformedAvailability { raw: String, context: ErrorContext },

    /// A lecture occurrence lacks usable schedule data.
    #[error("Malformed lecture times: {message} {context}")]
    MalformedSchedule {
        message: String,
        context: ErrorContext,
    },

    /// Configuration could not be loaded or is invalid.
    #[error("Configuration error: {message} {context}")]
    Configuration {
        message: String,
        context: ErrorContext,
    },

    /// The spreadsheet store rejected a request.
    #[error("Spreadsheet error: {message} {context}")]
    Spreadsheet {
        message: String,
        context: ErrorContext,
    },
}

impl BashError {
    /// Create a fetch error with context.
    pub fn fetch_with_context(message: impl Into<String>, context: ErrorContext) -> Self {
        Self::Fetch {
            message: message.into(),
            context,
        }
    }

    /// Create a not found error with context.
    pub fn not_found_with_context(message: impl Into<String>, context: ErrorContext) -> Self {
        Self::NotFound {
            message: message.into(),
            context,
        }
    }

    /// Create a malformed response error.
    pub fn malformed_response(message: impl Into<String>) -> Self {
        Self::MalformedResponse {
            message: message.into(),
            context: ErrorContext::default(),
        }
    }

    /// Create a parse error.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
            context: ErrorContext::default(),
        }
    }

    /// Create a malformed availability error for the raw cell text.
    pub fn malformed_availability(raw: impl Into<String>, context: ErrorContext) -> Self {
        Self::MalformedAvailability {
            raw: raw.into(),
            context,
        }
    }

    /// Create a malformed schedule error.
    pub fn malformed_schedule(message: impl Into<String>, context: ErrorContext) -> Self {
        Self::MalformedSchedule {
            message: message.into(),
            context,
        }
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
            context: ErrorContext::default(),
        }
    }

    /// Create a spreadsheet error with context.
    pub fn spreadsheet_with_context(message: impl Into<String>, context: ErrorContext) -> Self {
        Self::Spreadsheet {
            message: message.into(),
            context,
        }
    }

    /// Whether the run can continue by skipping the current course.
    ///
    /// Only a missing or unreadable registration and malformed lecture
    /// schedule data are course-local; everything else aborts the run.
    pub fn is_course_local(&self) -> bool {
        matches!(
            self,
            Self::NotFound { .. } | Self::MalformedResponse { .. } | Self::MalformedSchedule { .. }
        )
    }

    /// Get the error context.
    pub fn context(&self) -> &ErrorContext {
        match self {
            Self::Fetch { context, .. }
            | Self::NotFound { context, .. }
            | Self::MalformedResponse { context, .. }
            | Self::Parse { context, .. }
            | Self::MalformedAvailability { context, .. }
            | Self::MalformedSchedule { context, .. }
            | Self::Configuration { context, .. }
            | Self::Spreadsheet { context, .. } => context,
        }
    }
}

impl From<reqwest::Error> for BashError {
    fn from(err: reqwest::Error) -> Self {
        let mut context = ErrorContext::default();
        if let Some(url) = err.url() {
            context = context.with_details(format!("url={}", url));
        }
        if err.is_decode() {
            return BashError::MalformedResponse {
                message: err.to_string(),
                context,
            };
        }
        match err.status() {
            Some(status) if status == reqwest::StatusCode::NOT_FOUND => BashError::NotFound {
                message: err.to_string(),
                context,
            },
            _ => BashError::Fetch {
                message: err.to_string(),
                context,
            },
        }
    }
}

impl From<serde_json::Error> for BashError {
    fn from(err: serde_json::Error) -> Self {
        BashError::malformed_response(err.to_string())
    }
}

impl From<toml::de::Error> for BashError {
    fn from(err: toml::de::Error) -> Self {
        BashError::configuration(format!("Failed to parse config file: {}", err))
    }
}
