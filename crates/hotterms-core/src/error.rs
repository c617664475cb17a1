use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

pub type Result<T> = std::result::Result<T, HotTermsError>;

#[derive(Debug, Error)]
pub enum HotTermsError {
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("unauthorized: {0}")]
    Unauthorized(String),

    #[error("backend unavailable: {0}")]
    BackendUnavailable(String),

    #[error("invalid config: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorPayload {
    pub code: String,
    pub message: String,
    pub operation: String,
    pub trace_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub term: Option<String>,
}

impl HotTermsError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_FAILED",
            Self::Unauthorized(_) => "UNAUTHORIZED",
            Self::BackendUnavailable(_) => "BACKEND_UNAVAILABLE",
            Self::Config(_) => "CONFIG_ERROR",
            Self::Io(_) => "IO_ERROR",
            Self::Json(_) => "JSON_ERROR",
            Self::Sqlite(_) => "SQLITE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Runtime storage failures that the store contains instead of propagating as fatal.
    #[must_use]
    pub const fn is_backend_failure(&self) -> bool {
        matches!(self, Self::Io(_) | Self::Sqlite(_) | Self::Internal(_))
    }

    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized(_))
    }

    pub(crate) fn mutex_poisoned(resource: &str) -> Self {
        Self::Internal(format!("{resource} mutex poisoned"))
    }

    pub fn to_payload(&self, operation: impl Into<String>, term: Option<String>) -> ErrorPayload {
        ErrorPayload {
            code: self.code().to_string(),
            message: self.to_string(),
            operation: operation.into(),
            trace_id: Uuid::new_v4().to_string(),
            term,
        }
    }
}

impl From<toml::de::Error> for HotTermsError {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unauthorized_has_distinct_code_from_backend_failures() {
        let err = HotTermsError::Unauthorized("incorrect password".to_string());
        assert_eq!(err.code(), "UNAUTHORIZED");
        assert!(err.is_unauthorized());
        assert!(!err.is_backend_failure());

        let backend = HotTermsError::mutex_poisoned("sqlite");
        assert_eq!(backend.code(), "INTERNAL_ERROR");
        assert!(backend.is_backend_failure());
    }

    #[test]
    fn payload_carries_code_operation_and_term() {
        let err = HotTermsError::Validation("term must not be empty".to_string());
        let payload = err.to_payload("record", Some("  ".to_string()));
        assert_eq!(payload.code, "VALIDATION_FAILED");
        assert_eq!(payload.operation, "record");
        assert_eq!(payload.term.as_deref(), Some("  "));
        assert!(!payload.trace_id.is_empty());

        let json = serde_json::to_value(&payload).expect("serialize payload");
        assert_eq!(json["message"], "validation failed: term must not be empty");
    }
}
