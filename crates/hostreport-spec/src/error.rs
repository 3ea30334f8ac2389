//! Error types for report assembly.

use std::path::PathBuf;

use thiserror::Error;

use crate::report::ReportKind;

/// Trait for errors that carry a stable code for operator output.
///
/// All error types that can fail a report implement this so the batch driver
/// can print `[CODE] message` lines without knowing the concrete type.
///
/// # Example
///
/// ```ignore
/// use hostreport_spec::BackendError;
///
/// fn print_failure<E: BackendError>(err: &E) {
///     eprintln!("[{}] {}", err.code(), err.message());
/// }
/// ```
pub trait BackendError: std::error::Error {
    /// Stable error code such as "REPORT_001" or "RRDTOOL_004".
    fn code(&self) -> &'static str;

    /// Human-readable message; defaults to the `Display` output.
    fn message(&self) -> String {
        self.to_string()
    }

    /// Error category such as "report", "graph", or "rrdtool".
    fn category(&self) -> &'static str;
}

/// Lets renderers that cannot fail use `Infallible` as their error type.
impl BackendError for std::convert::Infallible {
    fn code(&self) -> &'static str {
        match *self {}
    }

    fn category(&self) -> &'static str {
        match *self {}
    }
}

/// Construction-time violations of the graph spec invariants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphSpecError {
    /// A derived expression or element references a name not defined before it.
    #[error("'{name}' references undefined name '{reference}'")]
    UndefinedReference { name: String, reference: String },

    /// A data source or derived name is defined twice.
    #[error("name '{name}' is already defined")]
    DuplicateName { name: String },

    /// The name cannot be used as a graph variable name.
    #[error("'{name}' is not a valid variable name (expected [A-Za-z0-9_-], 1-255 chars)")]
    InvalidName { name: String },
}

impl BackendError for GraphSpecError {
    fn code(&self) -> &'static str {
        match self {
            GraphSpecError::UndefinedReference { .. } => "GRAPH_001",
            GraphSpecError::DuplicateName { .. } => "GRAPH_002",
            GraphSpecError::InvalidName { .. } => "GRAPH_003",
        }
    }

    fn category(&self) -> &'static str {
        "graph"
    }
}

/// Result type for report assembly.
pub type ReportResult<T> = Result<T, ReportError>;

/// Errors that abort a single report (or, for `TimeRangeUndefined`, a host).
#[derive(Debug, Error)]
pub enum ReportError {
    /// Pattern-based discovery found zero series.
    #[error("no series in {dir} match /{pattern}/ for the {report} report")]
    NoMatchingSeries {
        report: ReportKind,
        pattern: String,
        dir: PathBuf,
    },

    /// A required series file is missing or unreadable.
    #[error("series {path} is unavailable: {reason}")]
    SeriesUnavailable { path: PathBuf, reason: String },

    /// Neither an explicit range nor a relative policy was selected.
    #[error("no time range given (use --start/--end, --last-day, or --last-hour)")]
    TimeRangeUndefined,

    /// The discovery pattern has no capture group with the requested name.
    #[error("pattern /{pattern}/ has no capture group named '{group}'")]
    MissingKeyGroup { pattern: String, group: String },

    /// The host directory could not be listed.
    #[error("failed to scan {dir}: {source}")]
    ScanFailed {
        dir: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    /// No host name can be derived from the directory path.
    #[error("cannot derive a host name from {path}")]
    InvalidHostDir { path: PathBuf },

    /// The assembled graph violates a reference invariant.
    #[error("invalid graph: {0}")]
    InvalidGraph(#[from] GraphSpecError),
}

impl ReportError {
    /// Creates a new series unavailable error.
    pub fn series_unavailable(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::SeriesUnavailable {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Returns true if this failure should skip every remaining report of the host.
    pub fn aborts_host(&self) -> bool {
        matches!(
            self,
            ReportError::TimeRangeUndefined | ReportError::InvalidHostDir { .. }
        )
    }
}

impl BackendError for ReportError {
    fn code(&self) -> &'static str {
        match self {
            ReportError::NoMatchingSeries { .. } => "REPORT_001",
            ReportError::SeriesUnavailable { .. } => "REPORT_002",
            ReportError::TimeRangeUndefined => "REPORT_003",
            ReportError::MissingKeyGroup { .. } => "REPORT_004",
            ReportError::ScanFailed { .. } => "REPORT_005",
            ReportError::InvalidHostDir { .. } => "REPORT_006",
            ReportError::InvalidGraph(inner) => inner.code(),
        }
    }

    fn category(&self) -> &'static str {
        match self {
            ReportError::InvalidGraph(_) => "graph",
            _ => "report",
        }
    }
}

/// A report failure from any stage, with its code captured for printing.
///
/// This lets the batch driver collect failures from report assembly and from
/// the renderer in one list without depending on the renderer's error type.
#[derive(Debug)]
pub struct ReportFailure {
    /// The error code (e.g., "REPORT_002", "RRDTOOL_004").
    pub code: &'static str,
    /// The human-readable error message.
    pub message: String,
    /// The error category.
    pub category: &'static str,
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl ReportFailure {
    /// Create a `ReportFailure` from any `BackendError` implementor.
    pub fn from_backend<E: BackendError + Send + Sync + 'static>(err: E) -> Self {
        Self {
            code: err.code(),
            message: err.message(),
            category: err.category(),
            source: Some(Box::new(err)),
        }
    }

    /// Returns the wrapped error if it is of type `E`.
    pub fn downcast_ref<E: std::error::Error + 'static>(&self) -> Option<&E> {
        self.source.as_ref().and_then(|e| e.downcast_ref::<E>())
    }
}

impl std::fmt::Display for ReportFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for ReportFailure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}
