//! Per-host report assembly.
//!
//! [`ReportSpecBuilder`] turns a host directory into one [`GraphSpec`] per
//! [`ReportKind`]. Each report checks its inputs, resolves its time window
//! against one of its own series, and lays out data sources, derived values
//! and drawn elements in a fixed order.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::backend::SeriesStore;
use crate::color::Color;
use crate::cycle::ColorCycle;
use crate::error::{ReportError, ReportResult};
use crate::graph::{Expr, GraphSpec, GraphSpecBuilder, ImageFormat};
use crate::locator::{locate, DiskPatterns};
use crate::time::{TimeOptions, TimeRange};

/// Host name of the aggregate pseudo-host summing every host in a cluster.
pub const SUMMARY_HOST: &str = "__SummaryInfo__";

/// Memory values are reported by the collector in KiB.
const KIB: f64 = 1024.0;

const MEM_USED: Color = Color::new(0x55, 0x55, 0xcc);
const MEM_SHARED: Color = Color::new(0x00, 0x00, 0xaa);
const MEM_CACHED: Color = Color::new(0x33, 0xcc, 0x33);
const MEM_BUFFERED: Color = Color::new(0x99, 0xff, 0x33);
const MEM_SWAPPED: Color = Color::new(0x99, 0x00, 0xcc);
const MEM_TOTAL: Color = Color::new(0xff, 0x00, 0x00);

const NET_IN: Color = Color::new(0x33, 0xcc, 0x33);
const NET_OUT: Color = Color::new(0x55, 0x55, 0xcc);

const CPU_USER: Color = Color::new(0x33, 0x33, 0xbb);
const CPU_NICE: Color = Color::new(0xff, 0xea, 0x00);
const CPU_SYSTEM: Color = Color::new(0xdd, 0x00, 0x00);
const CPU_WAIT: Color = Color::new(0xff, 0x8a, 0x60);
const CPU_IDLE: Color = Color::new(0xe2, 0xe2, 0xf2);

/// `(vname, file stem)` of the memory inputs, in definition order.
const MEMORY_INPUTS: [(&str, &str); 7] = [
    ("_total", "mem_total"),
    ("_free", "mem_free"),
    ("_cached", "mem_cached"),
    ("_buffer", "mem_buffers"),
    ("_shared", "mem_shared"),
    ("_swap_total", "swap_total"),
    ("_swap_free", "swap_free"),
];

const NETWORK_INPUTS: [(&str, &str); 2] = [("in", "bytes_in"), ("out", "bytes_out")];

const CPU_INPUTS: [(&str, &str); 5] = [
    ("user", "cpu_user"),
    ("system", "cpu_system"),
    ("wait", "cpu_wio"),
    ("nice", "cpu_nice"),
    ("idle", "cpu_idle"),
];

/// The six report types produced for every host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportKind {
    DiskUtil,
    DiskReadRate,
    DiskWriteRate,
    Cpu,
    Memory,
    Network,
}

impl ReportKind {
    /// Every report kind, in the order a batch renders them.
    pub fn all() -> &'static [ReportKind] {
        &[
            ReportKind::DiskUtil,
            ReportKind::DiskReadRate,
            ReportKind::DiskWriteRate,
            ReportKind::Cpu,
            ReportKind::Memory,
            ReportKind::Network,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ReportKind::DiskUtil => "disk_util",
            ReportKind::DiskReadRate => "disk_read_rate",
            ReportKind::DiskWriteRate => "disk_write_rate",
            ReportKind::Cpu => "cpu",
            ReportKind::Memory => "memory",
            ReportKind::Network => "network",
        }
    }

    /// Label used in titles.
    pub fn label(&self) -> &'static str {
        match self {
            ReportKind::DiskUtil => "Disk Util",
            ReportKind::DiskReadRate => "Disk Read",
            ReportKind::DiskWriteRate => "Disk Write",
            ReportKind::Cpu => "CPU",
            ReportKind::Memory => "Memory",
            ReportKind::Network => "Network",
        }
    }

    /// Suffix of the output file name, after `<host>_`.
    pub fn file_suffix(&self) -> &'static str {
        match self {
            ReportKind::DiskUtil => "disk_util",
            ReportKind::DiskReadRate => "disk_read_rate",
            ReportKind::DiskWriteRate => "disk_write_rate",
            ReportKind::Cpu => "cpu",
            ReportKind::Memory => "mem",
            ReportKind::Network => "net",
        }
    }

    pub fn vertical_label(&self) -> &'static str {
        match self {
            ReportKind::DiskUtil | ReportKind::Cpu => "Percent",
            ReportKind::DiskReadRate | ReportKind::DiskWriteRate => "Bytes/Sec",
            ReportKind::Memory | ReportKind::Network => "Bytes",
        }
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ReportKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ReportKind::all()
            .iter()
            .copied()
            .find(|kind| kind.as_str() == s || kind.file_suffix() == s)
            .ok_or_else(|| format!("unknown report kind: {}", s))
    }
}

/// Derives the host name from a host directory (its final component, minus any extension).
pub fn host_name(host_dir: &Path) -> ReportResult<String> {
    host_dir
        .file_stem()
        .and_then(|stem| stem.to_str())
        .filter(|stem| !stem.is_empty())
        .map(str::to_string)
        .ok_or_else(|| ReportError::InvalidHostDir {
            path: host_dir.to_path_buf(),
        })
}

/// Assembles the graph specs for one host.
///
/// The builder owns the host's [`ColorCycle`]; disk reports reset it before
/// drawing so every disk chart starts at the same palette position.
#[derive(Debug)]
pub struct ReportSpecBuilder<'a, S: SeriesStore> {
    host_dir: PathBuf,
    result_dir: PathBuf,
    host: String,
    time: TimeOptions,
    patterns: &'a DiskPatterns,
    store: S,
    format: ImageFormat,
    cycle: ColorCycle,
}

impl<'a, S: SeriesStore> ReportSpecBuilder<'a, S> {
    /// Creates a builder for the host stored in `host_dir`, writing images to `result_dir`.
    pub fn new(
        host_dir: impl Into<PathBuf>,
        result_dir: impl Into<PathBuf>,
        time: &TimeOptions,
        patterns: &'a DiskPatterns,
        store: S,
    ) -> ReportResult<Self> {
        let host_dir = host_dir.into();
        let host = host_name(&host_dir)?;
        Ok(Self {
            host_dir,
            result_dir: result_dir.into(),
            host,
            time: *time,
            patterns,
            store,
            format: ImageFormat::default(),
            cycle: ColorCycle::default(),
        })
    }

    /// Sets the image format of every spec built from here on.
    pub fn format(mut self, format: ImageFormat) -> Self {
        self.format = format;
        self
    }

    /// Replaces the color cycle used by disk reports.
    pub fn cycle(mut self, cycle: ColorCycle) -> Self {
        self.cycle = cycle;
        self
    }

    /// Path the image of `kind` is written to.
    pub fn output_path(&self, kind: ReportKind) -> PathBuf {
        self.result_dir.join(format!(
            "{}_{}.{}",
            self.host,
            kind.file_suffix(),
            self.format.extension()
        ))
    }

    /// Builds the spec for one report.
    ///
    /// Fails with [`ReportError::TimeRangeUndefined`] before touching the host
    /// directory when no time policy is set.
    pub fn build(&mut self, kind: ReportKind) -> ReportResult<GraphSpec> {
        if self.time.policy().is_none() {
            return Err(ReportError::TimeRangeUndefined);
        }
        match kind {
            ReportKind::DiskUtil | ReportKind::DiskReadRate | ReportKind::DiskWriteRate => {
                self.build_disk(kind)
            }
            ReportKind::Cpu => self.build_cpu(),
            ReportKind::Memory => self.build_memory(),
            ReportKind::Network => self.build_network(),
        }
    }

    fn build_disk(&mut self, kind: ReportKind) -> ReportResult<GraphSpec> {
        self.cycle.reset();

        let patterns = self.patterns;
        let pattern = match kind {
            ReportKind::DiskReadRate => &patterns.read_rate,
            ReportKind::DiskWriteRate => &patterns.write_rate,
            _ => &patterns.util,
        };
        let disks = locate(&self.host_dir, pattern, &patterns.key_group)?;
        let reference = match disks.values().next() {
            Some(path) => path.clone(),
            None => {
                return Err(ReportError::NoMatchingSeries {
                    report: kind,
                    pattern: pattern.as_str().to_string(),
                    dir: self.host_dir.clone(),
                })
            }
        };

        let range = self.time.resolve(&reference, &self.store)?;
        let mut builder = self.start(kind, range);
        if kind == ReportKind::DiskUtil {
            builder = builder.upper_limit(100.0);
        }
        // Disk keys come from file names and are only used as legends.
        for (index, (disk, path)) in disks.iter().enumerate() {
            let name = format!("d{}", index);
            let color = self.cycle.next();
            builder = builder.def(&name, path).stacked_area(&name, color, disk.as_str());
        }
        Ok(builder.build()?)
    }

    fn build_memory(&mut self) -> ReportResult<GraphSpec> {
        let paths = self.fixed_inputs(&MEMORY_INPUTS)?;
        let range = self.time.resolve(&paths[0], &self.store)?;

        let mut builder = self
            .start(ReportKind::Memory, range)
            .lower_limit(0.0)
            .rigid(true);
        for ((name, _), path) in MEMORY_INPUTS.iter().zip(&paths) {
            builder = builder.def(*name, path);
        }

        let scaled = |raw: &str| Expr::var(raw).mul(Expr::constant(KIB));
        let builder = builder
            .cdef("total", scaled("_total"))
            .cdef("free", scaled("_free"))
            .cdef("cached", scaled("_cached"))
            .cdef("buffer", scaled("_buffer"))
            .cdef(
                "used",
                Expr::var("total")
                    .sub(Expr::var("free"))
                    .sub(Expr::var("cached"))
                    .sub(Expr::var("buffer")),
            )
            .cdef("shared", scaled("_shared"))
            .cdef("swap_total", scaled("_swap_total"))
            .cdef("swap_free", scaled("_swap_free"))
            .cdef("swap_used", Expr::var("swap_total").sub(Expr::var("swap_free")))
            .stacked_area("used", MEM_USED, "Memory Used")
            .stacked_area("shared", MEM_SHARED, "Memory Shared")
            .stacked_area("cached", MEM_CACHED, "Memory Cached")
            .stacked_area("buffer", MEM_BUFFERED, "Memory Buffered")
            .stacked_area("swap_used", MEM_SWAPPED, "Memory Swapped")
            .line(1, "total", MEM_TOTAL, "Total In-Core Memory");

        Ok(builder.build()?)
    }

    fn build_network(&mut self) -> ReportResult<GraphSpec> {
        let paths = self.fixed_inputs(&NETWORK_INPUTS)?;
        let range = self.time.resolve(&paths[0], &self.store)?;

        let builder = self
            .start(ReportKind::Network, range)
            .def("in", &paths[0])
            .def("out", &paths[1])
            .line(1, "in", NET_IN, "In")
            .line(1, "out", NET_OUT, "Out");

        Ok(builder.build()?)
    }

    fn build_cpu(&mut self) -> ReportResult<GraphSpec> {
        let paths = self.fixed_inputs(&CPU_INPUTS)?;
        let range = self.time.resolve(&paths[0], &self.store)?;

        let mut builder = self.start(ReportKind::Cpu, range);
        // The aggregate host sums many hosts and can exceed 100%.
        if self.host != SUMMARY_HOST {
            builder = builder.upper_limit(100.0).rigid(true);
        }
        for ((name, _), path) in CPU_INPUTS.iter().zip(&paths) {
            builder = builder.def(*name, path);
        }
        let builder = builder
            .stacked_area("user", CPU_USER, "User CPU")
            .stacked_area("nice", CPU_NICE, "Nice CPU")
            .stacked_area("system", CPU_SYSTEM, "System CPU")
            .stacked_area("wait", CPU_WAIT, "WAIT CPU")
            .stacked_area("idle", CPU_IDLE, "Idle CPU");

        Ok(builder.build()?)
    }

    /// Resolves the fixed input files, failing on the first one the store cannot read.
    fn fixed_inputs(&self, inputs: &[(&str, &str)]) -> ReportResult<Vec<PathBuf>> {
        inputs
            .iter()
            .map(|(_, stem)| {
                let path = self.host_dir.join(format!("{}.rrd", stem));
                if self.store.is_available(&path) {
                    Ok(path)
                } else {
                    Err(ReportError::series_unavailable(
                        path,
                        "file is missing or not readable",
                    ))
                }
            })
            .collect()
    }

    fn start(&self, kind: ReportKind, range: TimeRange) -> GraphSpecBuilder {
        GraphSpec::builder(self.output_path(kind), range)
            .format(self.format)
            .title(format!(
                "{} {}{}",
                self.host,
                kind.label(),
                range.policy.title_suffix()
            ))
            .vertical_label(kind.vertical_label())
    }
}
