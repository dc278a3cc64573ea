//! Error types for the Cloud Storage Planner
//!
//! Provides structured error types for the decision matrix, the distribution
//! and pool-update planners, and the provider adapters wrapping them.

use crate::domain::ports::StoragePoolUpdateRequest;
use thiserror::Error;

/// Unified error type for the planner
#[derive(Error, Debug)]
pub enum Error {
    // =========================================================================
    // Request Validation Errors
    // =========================================================================
    #[error("number of zones cannot be zero")]
    NumOfZonesCannotBeZero,

    #[error("current capacity {current} GiB is higher than the desired capacity {desired} GiB")]
    CurrentCapacityHigherThanDesired { current: u64, desired: u64 },

    #[error("current capacity is the same as the desired capacity")]
    CurrentCapacitySameAsDesired,

    #[error("invalid storage pool update request: {reason}")]
    InvalidUpdateRequest {
        request: Box<StoragePoolUpdateRequest>,
        reason: String,
    },

    // =========================================================================
    // Search Errors
    // =========================================================================
    #[error("could not find a suitable storage distribution candidate: {reason}")]
    CandidateNotFound { reason: String },

    #[error("provider returned an invalid response: {0}")]
    InvalidResponse(String),

    // =========================================================================
    // Decision Matrix Errors
    // =========================================================================
    #[error("invalid decision matrix row {index}: {reason}")]
    InvalidMatrixRow { index: usize, reason: String },

    // =========================================================================
    // Configuration Errors
    // =========================================================================
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("storage manager not supported for provider: {provider}")]
    UnsupportedProvider { provider: String },

    // =========================================================================
    // Parse Errors
    // =========================================================================
    #[error("YAML parse error: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    // =========================================================================
    // IO Errors
    // =========================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Broad classification of an error, used by callers to decide how to
/// surface it to an operator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// The request was rejected before any search began
    Validation,
    /// Filtering or the search loops exhausted every candidate
    SearchExhausted,
    /// Matrix, provider or process configuration is wrong
    Configuration,
    /// Reading or writing a file failed
    Io,
}

impl Error {
    /// Shorthand for a candidate-not-found error with a diagnostic reason
    pub fn not_found(reason: impl Into<String>) -> Self {
        Error::CandidateNotFound {
            reason: reason.into(),
        }
    }

    /// Determine which class this error belongs to
    pub fn class(&self) -> ErrorClass {
        match self {
            Error::NumOfZonesCannotBeZero
            | Error::CurrentCapacityHigherThanDesired { .. }
            | Error::CurrentCapacitySameAsDesired
            | Error::InvalidUpdateRequest { .. } => ErrorClass::Validation,

            Error::CandidateNotFound { .. } | Error::InvalidResponse(_) => {
                ErrorClass::SearchExhausted
            }

            Error::InvalidMatrixRow { .. }
            | Error::Configuration(_)
            | Error::UnsupportedProvider { .. }
            | Error::YamlParse(_)
            | Error::JsonParse(_) => ErrorClass::Configuration,

            Error::Io(_) => ErrorClass::Io,
        }
    }

    /// Check if the request was rejected before searching the matrix
    pub fn is_validation(&self) -> bool {
        self.class() == ErrorClass::Validation
    }

    /// Check if no plan exists for an otherwise valid request
    pub fn is_search_exhausted(&self) -> bool {
        self.class() == ErrorClass::SearchExhausted
    }
}

/// Result type alias for the planner
pub type Result<T> = std::result::Result<T, Error>;
