//! hostreport rrdtool Backend
//!
//! This crate renders hostreport graph specs by running `rrdtool graph` as a
//! subprocess, and answers "when was this series last updated" with
//! `rrdtool last`. [`Rrdtool`] implements both [`hostreport_spec::SeriesStore`]
//! and [`hostreport_spec::Renderer`], so one value serves the whole batch.
//!
//! # Example
//!
//! ```ignore
//! use hostreport_backend_rrdtool::{Rrdtool, RrdtoolConfig};
//! use hostreport_spec::{DiskPatterns, ReportKind, ReportSpecBuilder, Renderer, TimeOptions};
//!
//! let rrdtool = Rrdtool::with_config(RrdtoolConfig::default().timeout_secs(30));
//! let patterns = DiskPatterns::default();
//! let mut reports = ReportSpecBuilder::new(
//!     "/var/lib/ganglia/rrds/cluster/web01",
//!     "reports",
//!     &TimeOptions::last_day(),
//!     &patterns,
//!     &rrdtool,
//! )?;
//! rrdtool.render(reports.build(ReportKind::Memory)?)?;
//! ```
//!
//! # rrdtool Requirements
//!
//! The orchestrator searches for rrdtool in:
//!
//! 1. The path set in [`RrdtoolConfig`]
//! 2. `RRDTOOL_PATH` environment variable
//! 3. System PATH
//! 4. Common installation locations

pub mod args;
pub mod error;
pub mod orchestrator;

pub use args::graph_args;
pub use error::{RrdtoolError, RrdtoolResult};
pub use orchestrator::{Rrdtool, RrdtoolConfig, DEFAULT_TIMEOUT_SECS, RRDTOOL_PATH_ENV};
