//! CLI-level errors (wraps application errors)

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::DomainError;

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Application(#[from] ApplicationError),

    #[error("{0}")]
    Usage(String),

    #[error("{0}")]
    InvalidData(String),

    #[error("I/O error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

impl From<DomainError> for CliError {
    fn from(e: DomainError) -> Self {
        CliError::Application(e.into())
    }
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    /// Create an I/O error with context.
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Get the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Usage(_) => crate::exitcode::USAGE,
            CliError::InvalidData(_) => crate::exitcode::DATAERR,
            CliError::Io { .. } => crate::exitcode::IOERR,
            CliError::Application(e) => match e {
                ApplicationError::Domain(_) => crate::exitcode::DATAERR,
                ApplicationError::Parse { .. } => crate::exitcode::DATAERR,
                ApplicationError::UnknownLeaf(_) => crate::exitcode::USAGE,
                ApplicationError::UnsupportedFormat(_) => crate::exitcode::USAGE,
                ApplicationError::Config { .. } => crate::exitcode::CONFIG,
                ApplicationError::OperationFailed { .. } => crate::exitcode::NOINPUT,
            },
        }
    }

    /// Follow-up advice shown below the error message.
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            CliError::Application(ApplicationError::Domain(DomainError::DomainViolation {
                ..
            })) => Some(
                "The selected value mode may not match the data in the file. \
                 Try the other interpretation mode (monetary vs probability).",
            ),
            CliError::Application(ApplicationError::UnsupportedFormat(_)) => {
                Some("Supported formats: .json, .yaml, .yml, .xml")
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DomainRule;

    #[test]
    fn given_domain_violation_when_mapping_then_data_error_with_hint() {
        let err: CliError = DomainError::DomainViolation {
            name: "Leaf".into(),
            value: 1.5,
            rule: DomainRule::UnitInterval,
        }
        .into();
        assert_eq!(err.exit_code(), crate::exitcode::DATAERR);
        assert!(err.hint().is_some());
        assert_eq!(
            err.to_string(),
            "invalid probability value: node 'Leaf' has value 1.5, must be between 0 and 1"
        );
    }

    #[test]
    fn given_structural_error_when_mapping_then_no_mode_hint() {
        let err: CliError = DomainError::Structural {
            reason: "cycle".into(),
        }
        .into();
        assert_eq!(err.exit_code(), crate::exitcode::DATAERR);
        assert!(err.hint().is_none());
    }
}
