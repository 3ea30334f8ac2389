//! CLI argument definitions for the hostreport command-line interface.
//!
//! The `#[derive(Parser)]` type is defined here, keeping `main.rs` focused on
//! turning arguments into options and running the batch.

use clap::{ArgGroup, Parser};
use hostreport_backend_rrdtool::DEFAULT_TIMEOUT_SECS;
use hostreport_cli::input::{parse_disk_pattern, parse_timestamp};
use hostreport_spec::{
    DEFAULT_DISK_READ_RATE_PATTERN, DEFAULT_DISK_UTIL_PATTERN, DEFAULT_DISK_WRITE_RATE_PATTERN,
};
use std::path::PathBuf;

/// hostreport - Batch CPU/memory/disk/network reports from Ganglia RRD files
#[derive(Parser)]
#[command(name = "hostreport")]
#[command(author, version, about, long_about = None)]
#[command(group(
    ArgGroup::new("time_range")
        .required(true)
        .args(["start_time", "last_day", "last_hour"])
))]
pub(crate) struct Cli {
    /// Host data directories (one directory of .rrd files per host)
    #[arg(required = true, value_name = "HOST_DIR")]
    pub host_dirs: Vec<PathBuf>,

    /// Result directory to put report files in (created if missing)
    #[arg(long = "result", value_name = "RESULT_DIR", default_value = ".")]
    pub result_dir: PathBuf,

    /// Start time of the report (YYYYMMDDhhmmss, local time)
    #[arg(
        long = "start",
        value_name = "START_TIME",
        value_parser = parse_timestamp,
        requires = "end_time",
        conflicts_with_all = ["last_day", "last_hour"]
    )]
    pub start_time: Option<i64>,

    /// End time of the report (YYYYMMDDhhmmss, local time)
    #[arg(
        long = "end",
        value_name = "END_TIME",
        value_parser = parse_timestamp,
        requires = "start_time"
    )]
    pub end_time: Option<i64>,

    /// Generate reports for the last day of data
    #[arg(long, conflicts_with = "last_hour")]
    pub last_day: bool,

    /// Generate reports for the last hour of data
    #[arg(long)]
    pub last_hour: bool,

    /// Regex to find disk utilization files (needs a `disk` capture group)
    #[arg(long, default_value = DEFAULT_DISK_UTIL_PATTERN, value_parser = parse_disk_pattern)]
    pub disk_util_pattern: String,

    /// Regex to find disk read rate files (needs a `disk` capture group)
    #[arg(long, default_value = DEFAULT_DISK_READ_RATE_PATTERN, value_parser = parse_disk_pattern)]
    pub disk_read_rate_pattern: String,

    /// Regex to find disk write rate files (needs a `disk` capture group)
    #[arg(long, default_value = DEFAULT_DISK_WRITE_RATE_PATTERN, value_parser = parse_disk_pattern)]
    pub disk_write_rate_pattern: String,

    /// Image format of the reports
    #[arg(long, default_value = "png", value_parser = ["png", "svg", "pdf", "eps"])]
    pub format: String,

    /// Path to the rrdtool executable (default: RRDTOOL_PATH, then PATH)
    #[arg(long, value_name = "PATH")]
    pub rrdtool: Option<PathBuf>,

    /// Timeout for each rrdtool invocation, in seconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout_secs: u64,

    /// Print the graph specs as JSON instead of rendering them
    #[arg(long)]
    pub dry_run: bool,

    /// Print each output path
    #[arg(short, long)]
    pub verbose: bool,
}
