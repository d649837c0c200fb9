//! # AppError
//!
//! Centralized error handling for UnFiltered.
//! Every store and service operation reports failures through this type;
//! read operations never fail and report "absent" as `None` or an empty list.

use thiserror::Error;

/// The primary error type for all domain operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    /// Write against an unknown target (e.g., Post, Group, Comment)
    #[error("{0} not found with ID {1}")]
    NotFound(String, String),

    /// Input rejected before mutation (e.g., post with no content, group name too short)
    #[error("validation error: {0}")]
    ValidationError(String),

    /// Caller broke an operation contract (e.g., message sent to an unknown chat session)
    #[error("contract violation: {0}")]
    ContractViolation(String),

    /// No user identity where one is required
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Resource already exists (e.g., duplicate group ID)
    #[error("conflict: {0}")]
    Conflict(String),

    /// Moderation refused the content; carries the flag reason
    #[error("content rejected: {0}")]
    Rejected(String),

    /// Collaborator failure (e.g., moderation backend unreachable)
    #[error("internal service error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn not_found(kind: &str, id: &str) -> Self {
        Self::NotFound(kind.to_string(), id.to_string())
    }
}

/// A specialized Result type for UnFiltered logic.
pub type Result<T> = std::result::Result<T, AppError>;
