//! Domain-level errors (no external dependencies)

use thiserror::Error;

use crate::domain::entities::DomainRule;

/// Domain errors represent violations of the value model.
/// These are independent of infrastructure concerns.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    /// A node's value lies outside the numeric domain of the active mode.
    /// Recoverable: the caller may ask for a new value and validate again.
    #[error("invalid {} value: node '{name}' has value {value}, {rule}", .rule.mode())]
    DomainViolation {
        name: String,
        value: f64,
        rule: DomainRule,
    },

    /// The structure is not a rooted hierarchy (no topological order exists).
    #[error("structural error: {reason}")]
    Structural { reason: String },
}

impl DomainError {
    /// Name of the offending node, when the error is tied to one.
    pub fn node_name(&self) -> Option<&str> {
        match self {
            DomainError::DomainViolation { name, .. } => Some(name),
            DomainError::Structural { .. } => None,
        }
    }

    pub fn is_structural(&self) -> bool {
        matches!(self, DomainError::Structural { .. })
    }
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
