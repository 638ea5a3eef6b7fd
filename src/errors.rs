//! Error types for kanflow
//!
//! Each error type has a corresponding error code for programmatic handling.

use thiserror::Error;

/// Result type alias for kanflow operations
pub type Result<T> = std::result::Result<T, KanflowError>;

/// Failures reported by a metadata store implementation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The record changed since the caller read it
    #[error("revision mismatch on {id}: expected {expected}, found {actual}")]
    RevisionMismatch {
        id: String,
        expected: String,
        actual: String,
    },

    /// No record with this id
    #[error("record not found: {0}")]
    NotFound(String),

    /// A create collided with an existing record
    #[error("record already exists: {0}")]
    AlreadyExists(String),

    /// Transport or backend failure
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Main error type for all kanflow operations
#[derive(Debug, Error)]
pub enum KanflowError {
    /// A role, transition, assignment or validation gate refused the request
    #[error("{reason}")]
    ValidationDenied { reason: String },

    /// Revision mismatch on a conditional write
    #[error("Concurrency conflict: {0}")]
    ConcurrencyConflict(String),

    /// `between` was asked for a range whose lower end is not below its upper end
    #[error("Invalid rank range: {lower} is not below {upper}")]
    InvalidRange { lower: String, upper: String },

    /// A spread was requested over an empty or inverted range
    #[error("Unsatisfiable rank range: {start} .. {end}")]
    UnsatisfiableRange { start: String, end: String },

    /// No rank exists beyond a sentinel
    #[error("Rank range exhausted: {0}")]
    RangeExhausted(String),

    /// A rank string could not be parsed
    #[error("Invalid rank: {0}")]
    InvalidRank(String),

    /// Store or provider transport failure
    #[error("Upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    /// Persisted metadata breaks a workflow invariant
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    /// A drag-and-drop move was rolled back
    #[error("Failed to move to \"{state_title}\": {cause}")]
    MoveFailed {
        state_title: String,
        #[source]
        cause: StoreError,
    },

    /// Lookup of a state, document, user or record failed
    #[error("Not found: {0}")]
    NotFound(String),

    /// Board directory not found
    #[error("Board not found: {0}")]
    RepoNotFound(String),

    /// Invalid JSON format
    #[error("Invalid JSON: {0}")]
    InvalidJson(String),

    /// File not found
    #[error("File not found: {0}")]
    FileNotFound(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// IO error wrapper
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error with context
    #[error("{context}: {message}")]
    Wrapped { context: String, message: String },
}

impl KanflowError {
    /// Get the error code for this error type
    pub fn code(&self) -> &'static str {
        match self {
            KanflowError::ValidationDenied { .. } => "VALIDATION_DENIED",
            KanflowError::ConcurrencyConflict(_) => "CONCURRENCY_CONFLICT",
            KanflowError::InvalidRange { .. } => "INVALID_RANGE",
            KanflowError::UnsatisfiableRange { .. } => "UNSATISFIABLE_RANGE",
            KanflowError::RangeExhausted(_) => "RANGE_EXHAUSTED",
            KanflowError::InvalidRank(_) => "INVALID_RANK",
            KanflowError::UpstreamUnavailable(_) => "UPSTREAM_UNAVAILABLE",
            KanflowError::InvariantViolation(_) => "INVARIANT_VIOLATION",
            KanflowError::MoveFailed { .. } => "MOVE_FAILED",
            KanflowError::NotFound(_) => "NOT_FOUND",
            KanflowError::RepoNotFound(_) => "REPO_NOT_FOUND",
            KanflowError::InvalidJson(_) => "INVALID_JSON",
            KanflowError::FileNotFound(_) => "FILE_NOT_FOUND",
            KanflowError::ConfigError(_) => "CONFIG_ERROR",
            KanflowError::Io(_) => "IO_ERROR",
            KanflowError::Wrapped { .. } => "WRAPPED_ERROR",
        }
    }

    /// Build a gate denial carrying the user-facing reason
    pub fn denied(reason: impl Into<String>) -> Self {
        KanflowError::ValidationDenied {
            reason: reason.into(),
        }
    }

    /// True when the failure came from a stale revision, directly or inside a failed move
    pub fn is_conflict(&self) -> bool {
        match self {
            KanflowError::ConcurrencyConflict(_) => true,
            KanflowError::MoveFailed { cause, .. } => {
                matches!(cause, StoreError::RevisionMismatch { .. })
            }
            _ => false,
        }
    }

    /// Wrap an error with additional context
    pub fn wrap<E: std::fmt::Display>(error: E, context: impl Into<String>) -> Self {
        KanflowError::Wrapped {
            context: context.into(),
            message: error.to_string(),
        }
    }
}

impl From<StoreError> for KanflowError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::RevisionMismatch { .. } => KanflowError::ConcurrencyConflict(error.to_string()),
            StoreError::NotFound(id) => KanflowError::NotFound(id),
            StoreError::AlreadyExists(id) => {
                KanflowError::InvariantViolation(format!("record already exists: {}", id))
            }
            StoreError::Unavailable(message) => KanflowError::UpstreamUnavailable(message),
        }
    }
}

/// Convert an error to an appropriate exit code
pub fn to_exit_code(error: &KanflowError) -> i32 {
    match error {
        KanflowError::ValidationDenied { .. } => 2,
        e if e.is_conflict() => 3,
        _ => 1,
    }
}
