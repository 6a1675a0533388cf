//! Error types for the CLI

use thiserror::Error;

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;

/// Errors that can occur in the CLI
#[derive(Debug, Error)]
pub enum CliError {
    /// Invalid argument
    #[error("Invalid argument: {message}")]
    InvalidArgument {
        /// Error message
        message: String,
    },

    /// Sampled verification found mismatches
    #[error("Verification failed: {mismatches} of {samples} samples mismatched")]
    VerificationFailed {
        /// Mismatching samples
        mismatches: usize,
        /// Samples drawn
        samples: u32,
    },

    /// IO error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Bitperm library error
    #[error("Bitperm error: {0}")]
    Perm(#[from] bitperm::PermError),

    /// JSON rendering error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Create an invalid argument error
    #[must_use]
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_argument_error() {
        let err = CliError::invalid_argument("bad arg");
        assert!(err.to_string().contains("Invalid argument"));
    }

    #[test]
    fn test_verification_failed_error() {
        let err = CliError::VerificationFailed {
            mismatches: 3,
            samples: 20,
        };
        assert_eq!(
            err.to_string(),
            "Verification failed: 3 of 20 samples mismatched"
        );
    }

    #[test]
    fn test_io_error_from() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let cli_err: CliError = io_err.into();
        assert!(cli_err.to_string().contains("I/O"));
    }

    #[test]
    fn test_perm_error_from() {
        let cli_err: CliError = bitperm::PermError::NotDetectedYet.into();
        assert!(cli_err.to_string().contains("Bitperm error"));
    }
}
