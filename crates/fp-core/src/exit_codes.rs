//! Exit codes for the fp-core CLI.
//!
//! Ranges:
//! - 0: success
//! - 10-19: user/environment errors (fixable by the caller)
//! - 20-29: internal errors

/// Process exit status. Stable for scripting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Fingerprint produced / check passed.
    Clean = 0,

    /// Invalid arguments.
    ArgsError = 10,

    /// Configuration could not be loaded or is invalid.
    ConfigError = 11,

    /// Bug: version table inconsistent, output failed to serialize, etc.
    InternalError = 20,
}

impl ExitCode {
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    pub fn is_success(self) -> bool {
        self == ExitCode::Clean
    }

    /// Name used in structured error output.
    pub fn code_name(&self) -> &'static str {
        match self {
            ExitCode::Clean => "OK_CLEAN",
            ExitCode::ArgsError => "ERR_ARGS",
            ExitCode::ConfigError => "ERR_CONFIG",
            ExitCode::InternalError => "ERR_INTERNAL",
        }
    }
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code as i32
    }
}

impl std::fmt::Display for ExitCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.code_name(), self.as_i32())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ranges() {
        assert!(ExitCode::Clean.is_success());
        assert!(!ExitCode::ArgsError.is_success());
        for code in [ExitCode::ArgsError, ExitCode::ConfigError] {
            assert!((10..20).contains(&code.as_i32()));
        }
        assert!(ExitCode::InternalError.as_i32() >= 20);
    }

    #[test]
    fn test_display() {
        assert_eq!(ExitCode::ConfigError.to_string(), "ERR_CONFIG (11)");
        assert_eq!(i32::from(ExitCode::InternalError), 20);
    }
}
