//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic, business/domain failures (validation,
/// invariants, conflicts). Infrastructure concerns belong elsewhere.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A value failed validation (e.g. malformed input).
    #[error("validation failed: {0}")]
    Validation(String),

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// A requested resource was not found (domain-level).
    ///
    /// Carries a short subject ("no cart", "not in cart", "product not found")
    /// so callers can surface which entity was missing.
    #[error("not found: {0}")]
    NotFound(String),

    /// Requested quantity exceeds the live stock level.
    #[error("insufficient stock: {available} available")]
    Insufficient {
        /// Exact quantity available at the time of the check.
        available: u32,
    },

    /// A conflict occurred (e.g. duplicate active line item).
    #[error("conflict: {0}")]
    Conflict(String),

    /// Ownership violation: the caller may not act on this resource.
    #[error("forbidden")]
    Forbidden,

    /// Authentication failure at the domain boundary.
    #[error("unauthorized")]
    Unauthorized,

    /// Storage-layer failure (e.g. poisoned lock, backend unavailable).
    #[error("storage failure: {0}")]
    Storage(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn not_found(subject: impl Into<String>) -> Self {
        Self::NotFound(subject.into())
    }

    pub fn insufficient(available: u32) -> Self {
        Self::Insufficient { available }
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }
}
