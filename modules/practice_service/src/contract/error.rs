//! Contract error types for the practice service
//!
//! These errors are transport-agnostic and used by the native client and the
//! REST layer alike.

use thiserror::Error;

/// Practice service domain errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PracticeError {
    /// Row not found, or owned by somebody else
    #[error("{resource} not found: {id}")]
    NotFound {
        /// Resource type (client, case, document, ...)
        resource: String,
        /// Resource identifier
        id: String,
    },

    /// Form-level validation failed
    #[error("Validation error: {message}")]
    Validation {
        /// Validation error message
        message: String,
    },

    /// No active session
    #[error("Authentication required")]
    Unauthenticated,

    /// Wrong e-mail or password on sign-in
    #[error("Invalid e-mail or password")]
    InvalidCredentials,

    /// Envelope could not be opened (wrong password or corrupted data)
    #[error("Invalid password or corrupted file")]
    InvalidPassword,

    /// Duplicate or otherwise conflicting write
    #[error("Conflict: {reason}")]
    Conflict {
        /// Conflict reason
        reason: String,
    },

    /// Object storage failure
    #[error("Storage error: {message}")]
    Storage {
        /// Error details
        message: String,
    },

    /// Internal error
    #[error("Internal error")]
    Internal,
}

impl PracticeError {
    pub fn not_found(resource: &str, id: impl ToString) -> Self {
        Self::NotFound {
            resource: resource.to_string(),
            id: id.to_string(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }
}
