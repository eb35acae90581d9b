//! Error types for the domain layer.

use serde::Serialize;
use std::collections::HashMap;
use std::error::Error;
use std::fmt;
use thiserror::Error;

/// Errors raised by structural validation of incoming values.
///
/// These never depend on store state and are never retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Field '{field}' is required")]
    MissingField { field: String },

    #[error("Field '{field}' has value '{value}', expected one of: {}", allowed.join(", "))]
    InvalidEnum {
        field: String,
        value: String,
        allowed: &'static [&'static str],
    },

    #[error("Field '{field}' has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

impl ValidationError {
    /// Creates a missing field validation error.
    pub fn missing_field(field: impl Into<String>) -> Self {
        ValidationError::MissingField {
            field: field.into(),
        }
    }

    /// Creates an invalid enum validation error.
    pub fn invalid_enum(
        field: impl Into<String>,
        value: impl Into<String>,
        allowed: &'static [&'static str],
    ) -> Self {
        ValidationError::InvalidEnum {
            field: field.into(),
            value: value.into(),
            allowed,
        }
    }

    /// Creates an invalid format validation error.
    pub fn invalid_format(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ValidationError::InvalidFormat {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Name of the offending field.
    pub fn field(&self) -> &str {
        match self {
            ValidationError::MissingField { field }
            | ValidationError::InvalidEnum { field, .. }
            | ValidationError::InvalidFormat { field, .. } => field,
        }
    }

    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            ValidationError::MissingField { .. } => ErrorCode::MissingField,
            ValidationError::InvalidEnum { .. } => ErrorCode::InvalidEnum,
            ValidationError::InvalidFormat { .. } => ErrorCode::InvalidFormat,
        }
    }
}

/// Error codes organized by category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Validation errors
    MissingField,
    InvalidEnum,
    InvalidFormat,

    // Consistency errors
    DuplicateValue,
    DanglingReference,

    // Infrastructure errors
    StoreAccess,
}

impl ErrorCode {
    /// True for errors caused by the request itself (mapped to 4xx by the HTTP layer).
    pub fn is_client_error(&self) -> bool {
        !matches!(self, ErrorCode::StoreAccess)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorCode::MissingField => "MISSING_FIELD",
            ErrorCode::InvalidEnum => "INVALID_ENUM",
            ErrorCode::InvalidFormat => "INVALID_FORMAT",
            ErrorCode::DuplicateValue => "DUPLICATE_VALUE",
            ErrorCode::DanglingReference => "DANGLING_REFERENCE",
            ErrorCode::StoreAccess => "STORE_ACCESS",
        };
        write!(f, "{}", s)
    }
}

/// Standard domain error with code, message, and optional details.
#[derive(Debug, Clone)]
pub struct DomainError {
    pub code: ErrorCode,
    pub message: String,
    pub details: HashMap<String, String>,
}

impl DomainError {
    /// Creates a new domain error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: HashMap::new(),
        }
    }

    /// Adds a detail to the error.
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.details.insert(key.into(), value.into());
        self
    }
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl Error for DomainError {}

impl From<ValidationError> for DomainError {
    fn from(err: ValidationError) -> Self {
        let field = err.field().to_string();
        DomainError::new(err.code(), err.to_string()).with_detail("field", field)
    }
}
