//! Error types for dtsynthetic

use thiserror::Error;

/// Result type for dtsynthetic operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for dtsynthetic
#[derive(Debug, Error)]
pub enum Error {
    /// Tenant URL rejected at client construction
    #[error("Invalid tenant URL '{0}': it must begin with \"https://\"")]
    InvalidEndpoint(String),

    /// Browser event with a discriminator outside the known set
    #[error("Unknown browser event type: {0}")]
    UnknownEventType(String),

    /// Monitor document with a `type` other than HTTP or BROWSER
    #[error("Unknown monitor type: {0}")]
    UnknownMonitorType(String),

    /// Monitor document whose `type` disagrees with the requested monitor kind
    #[error("Monitor type mismatch: expected {expected}, found {found}")]
    MonitorTypeMismatch { expected: String, found: String },

    /// A recognized list filter key carries a value of the wrong shape
    #[error("Invalid {key} parameter: {reason}")]
    InvalidFilterParameter { key: String, reason: String },

    /// Bulk import row with a missing or unparsable column
    #[error("Invalid import row, column '{column}': {reason}")]
    InvalidImportRow { column: String, reason: String },

    /// Required document field is missing
    #[error("Missing field: {0}")]
    MissingField(&'static str),

    /// Operation needs state the monitor does not have yet
    #[error("Failed precondition: {0}")]
    FailedPrecondition(String),

    /// A read request returned a non-success status
    #[error("Fetch failed with status {status}: {body}")]
    Fetch { status: u16, body: String },

    /// An execution batch request returned a non-success status
    #[error("Execution request failed with status {status}: {body}")]
    Execution { status: u16, body: String },

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Network error from the HTTP client
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Missing or unusable environment configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Create an invalid filter parameter error
    pub fn invalid_filter(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidFilterParameter {
            key: key.into(),
            reason: reason.into(),
        }
    }

    /// Create an invalid import row error
    pub fn import_row(column: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidImportRow {
            column: column.into(),
            reason: reason.into(),
        }
    }

    /// Create the error raised when a summary monitor is asked to do detailed work
    pub fn needs_details(action: &str) -> Self {
        Self::FailedPrecondition(format!(
            "Call get_details() before attempting to {}",
            action
        ))
    }

    /// Create a type mismatch error
    pub fn type_mismatch(expected: impl Into<String>, found: impl Into<String>) -> Self {
        Self::MonitorTypeMismatch {
            expected: expected.into(),
            found: found.into(),
        }
    }

    /// Check if this is a precondition failure
    pub fn is_precondition(&self) -> bool {
        matches!(self, Error::FailedPrecondition(_))
    }

    /// HTTP status carried by the error, if the remote side produced one
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Fetch { status, .. } | Error::Execution { status, .. } => Some(*status),
            Error::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
