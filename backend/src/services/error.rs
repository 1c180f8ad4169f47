//! Failure modes of the conflict engine.

use log::warn;

use crate::db::repository::RepositoryError;
use crate::models::TimeParseError;

/// Errors returned by the checker, reporter and suggestion engine.
///
/// Store failures are propagated as-is; the engine never retries.
#[derive(Debug, thiserror::Error)]
pub enum ConflictError {
    /// A date, time or id could not be interpreted.
    #[error("invalid {field}: {message}")]
    InvalidInput {
        field: &'static str,
        message: String,
    },

    /// The schedule store could not answer.
    #[error("schedule store unavailable: {0}")]
    StoreUnavailable(#[source] RepositoryError),
}

impl ConflictError {
    pub fn invalid(field: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidInput {
            field,
            message: message.into(),
        }
    }

    /// Whether the caller may retry; forwards the store's classification.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::InvalidInput { .. } => false,
            Self::StoreUnavailable(err) => err.is_retryable(),
        }
    }

    /// Map a store failure raised while running `operation`.
    pub(crate) fn store(operation: &'static str) -> impl FnOnce(RepositoryError) -> Self {
        move |err| {
            warn!("{} failed: {}", operation, err);
            Self::StoreUnavailable(err)
        }
    }
}

impl From<RepositoryError> for ConflictError {
    fn from(err: RepositoryError) -> Self {
        Self::StoreUnavailable(err)
    }
}

impl From<TimeParseError> for ConflictError {
    fn from(err: TimeParseError) -> Self {
        let field = match err {
            TimeParseError::Date(_) => "date",
            TimeParseError::Time(_) => "time",
        };
        Self::invalid(field, err.to_string())
    }
}
