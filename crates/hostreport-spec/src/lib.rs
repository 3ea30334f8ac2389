//! hostreport Report Assembly Library
//!
//! This crate turns a directory of per-host Ganglia RRD files into declarative
//! graph specifications, one per report type. It does not read RRD files or
//! draw anything itself; both are delegated to implementations of
//! [`SeriesStore`] and [`Renderer`].
//!
//! # Example
//!
//! ```no_run
//! use hostreport_spec::{DiskPatterns, ReportKind, ReportSpecBuilder, SeriesStore, StoreError, TimeOptions};
//! use std::path::Path;
//!
//! struct Store;
//!
//! impl SeriesStore for Store {
//!     fn last_update(&self, _path: &Path) -> Result<i64, StoreError> {
//!         Ok(1_700_000_000)
//!     }
//! }
//!
//! let patterns = DiskPatterns::default();
//! let mut reports = ReportSpecBuilder::new(
//!     "/var/lib/ganglia/rrds/cluster/web01",
//!     "reports",
//!     &TimeOptions::last_day(),
//!     &patterns,
//!     Store,
//! )
//! .unwrap();
//!
//! let spec = reports.build(ReportKind::Cpu).unwrap();
//! assert_eq!(spec.title(), "web01 CPU last day");
//! ```
//!
//! # Modules
//!
//! - [`color`]: RGB color type and named palette
//! - [`cycle`]: Round-robin color assignment
//! - [`graph`]: Graph spec types and builder
//! - [`locator`]: Pattern-based series discovery
//! - [`time`]: Time-window resolution
//! - [`report`]: Per-host report assembly
//! - [`backend`]: Store and renderer traits
//! - [`error`]: Error types and codes

pub mod backend;
pub mod color;
pub mod cycle;
pub mod error;
pub mod graph;
pub mod locator;
pub mod report;
pub mod time;

// Re-export commonly used types at the crate root
pub use backend::{Renderer, SeriesStore, StoreError};
pub use color::{Color, ParseColorError, STACK_COLORS};
pub use cycle::ColorCycle;
pub use error::{BackendError, GraphSpecError, ReportError, ReportFailure, ReportResult};
pub use graph::{
    is_valid_vname, BinaryOp, Consolidation, DataSource, Derived, Directives, Element,
    ElementKind, Expr, GraphSpec, GraphSpecBuilder, ImageFormat, DEFAULT_DS_NAME, DEFAULT_ZOOM,
};
pub use locator::{
    locate, locate_refs, DiskPatterns, MetricSeriesRef, DEFAULT_DISK_READ_RATE_PATTERN,
    DEFAULT_DISK_UTIL_PATTERN, DEFAULT_DISK_WRITE_RATE_PATTERN, DISK_KEY_GROUP,
};
pub use report::{host_name, ReportKind, ReportSpecBuilder, SUMMARY_HOST};
pub use time::{TimeOptions, TimePolicy, TimeRange, ONE_DAY_SECS, ONE_HOUR_SECS};
