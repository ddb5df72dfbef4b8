//! Error types for device fingerprinting.
//!
//! Only programming errors are surfaced through this type: an unsupported
//! output version, a malformed custom attribute path, or a version table that
//! breaks the append-only rule. Environmental absence (a probe that fails, a
//! provider with no data) is never an error; it is recovered to a typed
//! fallback at the layer where it happens.
//!
//! Errors carry a stable numeric code and a category so the CLI can map them
//! to exit codes and machine-readable output:
//! ```json
//! { "code": 11, "category": "config", "message": "unsupported fingerprint version: v9" }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for fingerprint operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error categories for grouping related errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Configuration misuse (versions, custom paths, version table).
    Config,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCategory::Config => write!(f, "config"),
        }
    }
}

/// Unified error type for fingerprint operations.
#[derive(Error, Debug)]
pub enum Error {
    // Configuration errors (10-19)
    #[error("unsupported fingerprint version: {0}")]
    UnsupportedVersion(String),

    #[error("invalid attribute path {path:?}: {reason}")]
    InvalidAttributePath { path: Vec<i32>, reason: String },

    #[error("version table for {category} is not append-only between {earlier} and {later}")]
    VersionTable {
        category: String,
        earlier: String,
        later: String,
    },
}

impl Error {
    /// Returns the error code for this error type.
    ///
    /// - 10-19: Configuration errors
    pub fn code(&self) -> u32 {
        match self {
            Error::UnsupportedVersion(_) => 11,
            Error::InvalidAttributePath { .. } => 12,
            Error::VersionTable { .. } => 13,
        }
    }

    /// Returns the error category for grouping and filtering.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::UnsupportedVersion(_)
            | Error::InvalidAttributePath { .. }
            | Error::VersionTable { .. } => ErrorCategory::Config,
        }
    }

    /// Structured form for JSON output.
    pub fn to_structured(&self) -> StructuredError {
        StructuredError {
            code: self.code(),
            category: self.category(),
            message: self.to_string(),
        }
    }
}

/// Machine-readable error payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructuredError {
    pub code: u32,
    pub category: ErrorCategory,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes_are_grouped() {
        assert_eq!(Error::UnsupportedVersion("v9".into()).code(), 11);
        let table = Error::VersionTable {
            category: "hardware".into(),
            earlier: "v1".into(),
            later: "v2".into(),
        };
        assert_eq!(table.code(), 13);
        assert_eq!(table.category(), ErrorCategory::Config);
    }

    #[test]
    fn test_attribute_path_error_is_config() {
        let err = Error::InvalidAttributePath {
            path: vec![],
            reason: "empty path".into(),
        };
        assert_eq!(err.category(), ErrorCategory::Config);
        assert!(err.to_string().contains("empty path"));
    }

    #[test]
    fn test_structured_error_serialization() {
        let err = Error::UnsupportedVersion("v9".into());
        let json = serde_json::to_value(err.to_structured()).unwrap();
        assert_eq!(json["code"], 11);
        assert_eq!(json["category"], "config");
        assert_eq!(json["message"], "unsupported fingerprint version: v9");
    }
}
