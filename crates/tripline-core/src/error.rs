//! Error types module
//!
//! All failures are unified under the [`AppError`] enum; the leaf enums
//! ([`crate::validation::ValidationError`] and [`ParseError`]) convert into
//! it via `From`. Every error is scoped to the single operation that raised
//! it; nothing here is fatal to the running session.

use std::io;

use uuid::Uuid;

use crate::validation::ValidationError;

/// Failure modes of one document-parsing attempt.
///
/// The first three variants are detected locally, before any network
/// activity. `Service` covers transport-level failures (connect, timeout,
/// non-success status, unreadable body); `InvalidResponse` covers a payload
/// that arrived intact but does not satisfy the extraction schema.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("unsupported content type for parsing: {0}")]
    UnsupportedType(String),

    #[error("content size {size} exceeds the parsing limit of {limit} bytes")]
    TooLarge { size: usize, limit: usize },

    #[error("no API credentials configured")]
    MissingCredentials,

    #[error("parsing service error: {0}")]
    Service(String),

    #[error("parsing service returned an invalid payload: {0}")]
    InvalidResponse(String),
}

impl ParseError {
    /// Stable machine-readable code for per-record error reporting.
    pub fn code(&self) -> &'static str {
        match self {
            ParseError::UnsupportedType(_) => "UNSUPPORTED_TYPE",
            ParseError::TooLarge { .. } => "TOO_LARGE",
            ParseError::MissingCredentials => "MISSING_CREDENTIALS",
            ParseError::Service(_) => "SERVICE_ERROR",
            ParseError::InvalidResponse(_) => "INVALID_RESPONSE",
        }
    }

    /// Whether a manual retry could plausibly succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ParseError::Service(_))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("upload rejected: {0}")]
    Validation(#[from] ValidationError),

    #[error("document not found: {0}")]
    NotFound(Uuid),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl From<io::Error> for AppError {
    fn from(err: io::Error) -> Self {
        AppError::Internal(format!("IO error: {}", err))
    }
}

impl AppError {
    /// Get the error type name for logging and reporting
    pub fn error_type(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "Validation",
            AppError::NotFound(_) => "NotFound",
            AppError::Parse(_) => "Parse",
            AppError::InvalidInput(_) => "InvalidInput",
            AppError::Config(_) => "Config",
            AppError::Internal(_) => "Internal",
        }
    }
}
