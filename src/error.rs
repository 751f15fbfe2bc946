use thiserror::Error;

use crate::models::{CalculationType, MergePolicy, UpstreamError};

/// PI Web API client error types
#[derive(Error, Debug)]
pub enum PiWebApiError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON serialization/deserialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("URL parsing failed: {0}")]
    Url(#[from] url::ParseError),

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Object not found: {0}")]
    NotFound(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("PI Web API returned errors: {}", format_upstream(.0))]
    Upstream(Vec<UpstreamError>),

    #[error("Cannot map {entity}: {message}")]
    Mapping { entity: &'static str, message: String },

    #[error("Unexpected response shape: expected {expected}, found {found}")]
    UnexpectedShape { expected: &'static str, found: String },

    #[error("Unsupported merge: {policy:?} is not defined for {calculation_type} values")]
    UnsupportedMerge {
        calculation_type: CalculationType,
        policy: MergePolicy,
    },
}

/// Result type for PI Web API operations
pub type PiWebApiResult<T> = Result<T, PiWebApiError>;

impl PiWebApiError {
    /// Create an API error from a status code and message
    pub fn api_error(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Create an authentication error
    pub fn auth_error(message: impl Into<String>) -> Self {
        Self::Auth(message.into())
    }

    /// Create an invalid parameter error
    pub fn invalid_param(message: impl Into<String>) -> Self {
        Self::InvalidParameter(message.into())
    }

    /// Create a mapping error for a record of the named entity
    pub fn mapping(entity: &'static str, message: impl Into<String>) -> Self {
        Self::Mapping {
            entity,
            message: message.into(),
        }
    }

    /// HTTP status code carried by this error, if the upstream answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::PermissionDenied(_) => Some(403),
            Self::NotFound(_) => Some(404),
            Self::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

fn format_upstream(errors: &[UpstreamError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}
