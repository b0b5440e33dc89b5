//! Lookup error types.
//!
//! The scoring functions themselves are total; these errors only arise when
//! a caller asks for a record by id that the dataset does not contain.

use thiserror::Error;

/// Errors raised when resolving ids against a [`Dataset`](crate::model::Dataset).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    /// No student with this id exists.
    #[error("unknown student: {0}")]
    UnknownStudent(String),

    /// No concept with this id exists.
    #[error("unknown concept: {0}")]
    UnknownConcept(String),
}

impl LookupError {
    /// The id that failed to resolve.
    pub fn id(&self) -> &str {
        match self {
            LookupError::UnknownStudent(id) | LookupError::UnknownConcept(id) => id,
        }
    }
}
