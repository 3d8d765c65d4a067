//! CLI-level errors (wraps infrastructure errors)

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::DomainError;
use crate::infrastructure::InfraError;

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Infra(#[from] InfraError),

    #[error("{0}")]
    Usage(String),
}

impl From<ApplicationError> for CliError {
    fn from(e: ApplicationError) -> Self {
        CliError::Infra(InfraError::Application(e))
    }
}

impl From<DomainError> for CliError {
    fn from(e: DomainError) -> Self {
        ApplicationError::Domain(e).into()
    }
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    /// Get the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Usage(_) => crate::exitcode::USAGE,
            CliError::Infra(e) => match e {
                InfraError::Io { .. } => crate::exitcode::IOERR,
                InfraError::Selector { .. } => crate::exitcode::SOFTWARE,
                InfraError::Editor { .. } => crate::exitcode::SOFTWARE,
                InfraError::Application(app) => match app {
                    ApplicationError::Unavailable { .. } => crate::exitcode::UNAVAILABLE,
                    ApplicationError::Domain(DomainError::NodeNotFound(_)) => {
                        crate::exitcode::USAGE
                    }
                    ApplicationError::Domain(_) => crate::exitcode::DATAERR,
                    ApplicationError::Config { .. } => crate::exitcode::CONFIG,
                    ApplicationError::OperationFailed { .. } => crate::exitcode::SOFTWARE,
                },
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(ApplicationError::Unavailable { resource: "tree.json".into(), reason: "file not found".into() }, 69)]
    #[case(ApplicationError::Domain(DomainError::NodeNotFound("Root/X".into())), 64)]
    #[case(ApplicationError::Domain(DomainError::malformed("Root/A", "node name is empty")), 65)]
    #[case(ApplicationError::Config { message: "parse".into() }, 78)]
    fn given_application_error_when_mapping_then_sysexits_code(
        #[case] error: ApplicationError,
        #[case] expected: i32,
    ) {
        assert_eq!(CliError::from(error).exit_code(), expected);
    }

    #[test]
    fn given_io_error_when_mapping_then_ioerr() {
        let err = CliError::from(InfraError::io(
            "write config",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        ));

        assert_eq!(err.exit_code(), crate::exitcode::IOERR);
    }
}
