//! Result and error types for Bitperm.

use thiserror::Error;

/// Result type for Bitperm operations
pub type PermResult<T> = Result<T, PermError>;

/// Errors that can occur in Bitperm
///
/// Per-bit probe anomalies (out-of-range output, fan-out, collision) are not
/// errors; they are recorded on the [`Detection`](crate::Detection) and
/// detection always runs to completion.
#[derive(Debug, Error)]
pub enum PermError {
    /// Bit width outside the supported range
    #[error("Invalid configuration: {message}")]
    InvalidConfiguration {
        /// Error message
        message: String,
    },

    /// Query issued before `detect()` ran
    #[error("Bit mapping not detected yet; call detect() first")]
    NotDetectedYet,

    /// Replay table is malformed
    #[error("Invalid replay table: {message}")]
    InvalidTable {
        /// Error message
        message: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl PermError {
    /// Create an invalid configuration error
    #[must_use]
    pub fn invalid_configuration(message: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            message: message.into(),
        }
    }

    /// Create an invalid table error
    #[must_use]
    pub fn invalid_table(message: impl Into<String>) -> Self {
        Self::InvalidTable {
            message: message.into(),
        }
    }

    /// Check if this error means `detect()` has to run first
    #[must_use]
    pub const fn is_not_detected(&self) -> bool {
        matches!(self, Self::NotDetectedYet)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_configuration_message() {
        let err = PermError::invalid_configuration("width 65 exceeds 64");
        assert!(err.to_string().contains("Invalid configuration"));
        assert!(err.to_string().contains("width 65"));
    }

    #[test]
    fn test_not_detected_message() {
        let err = PermError::NotDetectedYet;
        assert!(err.to_string().contains("detect()"));
        assert!(err.is_not_detected());
    }

    #[test]
    fn test_invalid_table_message() {
        let err = PermError::invalid_table("expected 16 outputs");
        assert!(err.to_string().contains("replay table"));
        assert!(!err.is_not_detected());
    }

    #[test]
    fn test_io_error_from() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: PermError = io_err.into();
        assert!(err.to_string().contains("I/O"));
    }

    #[test]
    fn test_json_error_from() {
        let json_err = serde_json::from_str::<u64>("not json").unwrap_err();
        let err: PermError = json_err.into();
        assert!(err.to_string().contains("JSON"));
    }
}
