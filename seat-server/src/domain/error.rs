//! Domain error types.
//!
//! These errors represent validation failures in the domain layer.
//! They are distinct from API/IO errors.

use super::InvalidPnr;

/// Domain-level validation errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    /// PNR number failed validation
    #[error(transparent)]
    InvalidPnr(#[from] InvalidPnr),

    /// A stored or submitted enum value is not recognised
    #[error("unknown {kind}: {value}")]
    UnknownVariant { kind: &'static str, value: String },

    /// A required text field is blank
    #[error("{0} must not be empty")]
    Blank(&'static str),
}
