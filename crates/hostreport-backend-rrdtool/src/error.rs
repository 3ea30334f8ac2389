//! Error types for the rrdtool backend.

use hostreport_spec::BackendError;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for rrdtool backend operations.
pub type RrdtoolResult<T> = Result<T, RrdtoolError>;

/// Errors that can occur while running rrdtool.
#[derive(Debug, Error)]
pub enum RrdtoolError {
    /// rrdtool executable not found.
    #[error("rrdtool executable not found. Ensure rrdtool is installed and in PATH, or set RRDTOOL_PATH environment variable")]
    RrdtoolNotFound,

    /// Failed to spawn the rrdtool process.
    #[error("Failed to spawn rrdtool process: {0}")]
    SpawnFailed(#[source] std::io::Error),

    /// rrdtool did not finish in time.
    #[error("rrdtool process timed out after {timeout_secs} seconds")]
    Timeout { timeout_secs: u64 },

    /// rrdtool exited with non-zero status.
    #[error("rrdtool process exited with status {exit_code}: {stderr}")]
    ProcessFailed { exit_code: i32, stderr: String },

    /// `rrdtool last` printed something other than a timestamp.
    #[error("Unexpected output from rrdtool last for {path}: {output:?}")]
    InvalidLastOutput { path: PathBuf, output: String },

    /// rrdtool succeeded but the image is not where it should be.
    #[error("Expected output file not found: {path}")]
    OutputNotFound { path: PathBuf },
}

impl RrdtoolError {
    /// Creates a new process failed error.
    pub fn process_failed(exit_code: i32, stderr: impl Into<String>) -> Self {
        Self::ProcessFailed {
            exit_code,
            stderr: stderr.into(),
        }
    }
}

impl BackendError for RrdtoolError {
    fn code(&self) -> &'static str {
        match self {
            RrdtoolError::RrdtoolNotFound => "RRDTOOL_001",
            RrdtoolError::SpawnFailed(_) => "RRDTOOL_002",
            RrdtoolError::Timeout { .. } => "RRDTOOL_003",
            RrdtoolError::ProcessFailed { .. } => "RRDTOOL_004",
            RrdtoolError::InvalidLastOutput { .. } => "RRDTOOL_005",
            RrdtoolError::OutputNotFound { .. } => "RRDTOOL_006",
        }
    }

    fn category(&self) -> &'static str {
        "rrdtool"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = RrdtoolError::RrdtoolNotFound;
        assert!(err.to_string().contains("RRDTOOL_PATH"));

        let err = RrdtoolError::Timeout { timeout_secs: 60 };
        assert!(err.to_string().contains("60 seconds"));

        let err = RrdtoolError::process_failed(1, "opening 'mem_free.rrd': No such file");
        assert!(err.to_string().contains("No such file"));
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(RrdtoolError::RrdtoolNotFound.code(), "RRDTOOL_001");
        assert_eq!(RrdtoolError::process_failed(2, "").code(), "RRDTOOL_004");
        assert_eq!(RrdtoolError::RrdtoolNotFound.category(), "rrdtool");
    }
}
