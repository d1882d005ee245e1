//! CLI-specific error types and exit code mapping

use rdpshot_core::error::{RdpshotError, ScanError};

/// CLI-specific error type.
///
/// Each variant carries enough context for a user-friendly message.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Wrapped domain error from rdpshot-core.
    #[error("{0}")]
    Core(#[from] RdpshotError),

    /// Tracing subscriber could not be installed.
    #[error("logging setup failed: {0}")]
    Logging(String),

    /// JSON serialisation failed during output rendering.
    #[error("json output error: {0}")]
    JsonSerialize(#[from] serde_json::Error),

    /// IO error (stdout write, etc.).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Map the error to a process exit code.
    ///
    /// | Code | Meaning                                    |
    /// |------|--------------------------------------------|
    /// | 0    | Success                                    |
    /// | 1    | Any failure (usage, scanner, config, IO)   |
    ///
    /// Argument parse errors are reported by clap itself (exit code 2).
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Core(_) | Self::Logging(_) | Self::JsonSerialize(_) | Self::Io(_) => 1,
        }
    }

    /// Whether the usage text should follow the error message.
    pub fn is_usage(&self) -> bool {
        matches!(self, Self::Core(RdpshotError::Scan(ScanError::NoTargets)))
    }

    /// Primary message line, in the console's `Error: ...` style.
    pub fn headline(&self) -> String {
        match self {
            Self::Core(RdpshotError::Scan(ScanError::ScannerFailed { .. })) => self.to_string(),
            _ => format!("Error: {self}"),
        }
    }

    /// Follow-up lines printed after the headline.
    pub fn hints(&self) -> Vec<String> {
        match self {
            Self::Core(RdpshotError::Scan(ScanError::ScannerNotFound { path })) => {
                vec![format!("Expected path: {path}")]
            }
            Self::Core(RdpshotError::Scan(ScanError::ScannerFailed { .. })) => {
                vec!["Scan failed. Check errors above.".to_owned()]
            }
            _ => Vec::new(),
        }
    }
}
