//! Error types -- domain error definitions

/// Top-level rdpshot error type.
#[derive(Debug, thiserror::Error)]
pub enum RdpshotError {
    /// Configuration error
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// Scan orchestration error
    #[error("{0}")]
    Scan(#[from] ScanError),

    /// I/O error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file does not exist
    #[error("config file not found: {path}")]
    FileNotFound { path: String },

    /// Config file could not be parsed
    #[error("failed to parse config: {reason}")]
    ParseFailed { reason: String },

    /// A config value is out of range or unknown
    #[error("invalid config value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

/// Scan orchestration errors.
///
/// Every variant is terminal for the current run.
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    /// Neither positional targets nor a target file were given
    #[error("No targets specified. Use targets as arguments or -f/--file option.")]
    NoTargets,

    /// The target file passed with `-f` does not exist
    #[error("Target file not found: {path}")]
    TargetFileNotFound { path: String },

    /// The delegated scanner executable is missing
    #[error("ardpscan not found. Make sure aardwolf is installed in the venv.")]
    ScannerNotFound { path: String },

    /// The delegated scanner exited unsuccessfully
    #[error("Error running ardpscan: {detail}")]
    ScannerFailed { detail: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_file_not_found_names_path() {
        let err = ScanError::TargetFileNotFound {
            path: "hosts.txt".to_owned(),
        };
        assert_eq!(err.to_string(), "Target file not found: hosts.txt");
    }

    #[test]
    fn scanner_failed_includes_detail() {
        let err = ScanError::ScannerFailed {
            detail: "exit status: 2".to_owned(),
        };
        assert!(err.to_string().contains("exit status: 2"));
    }

    #[test]
    fn scan_error_converts_transparently() {
        let err: RdpshotError = ScanError::NoTargets.into();
        assert!(err.to_string().starts_with("No targets specified"));
    }

    #[test]
    fn config_error_is_prefixed() {
        let err: RdpshotError = ConfigError::InvalidValue {
            field: "scan.workers".to_owned(),
            reason: "must be at least 1".to_owned(),
        }
        .into();
        let msg = err.to_string();
        assert!(msg.starts_with("config error:"));
        assert!(msg.contains("scan.workers"));
    }
}
