//! Test fixture utilities for creating synthetic host directories.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use hostreport_spec::{BackendError, GraphSpec, Renderer, SeriesStore, StoreError};
use tempfile::TempDir;
use thiserror::Error;

/// Files read by the CPU report.
pub const CPU_FILES: &[&str] = &[
    "cpu_user.rrd",
    "cpu_system.rrd",
    "cpu_wio.rrd",
    "cpu_nice.rrd",
    "cpu_idle.rrd",
];

/// Files read by the memory report.
pub const MEMORY_FILES: &[&str] = &[
    "mem_total.rrd",
    "mem_free.rrd",
    "mem_cached.rrd",
    "mem_buffers.rrd",
    "mem_shared.rrd",
    "swap_total.rrd",
    "swap_free.rrd",
];

/// Files read by the network report.
pub const NETWORK_FILES: &[&str] = &["bytes_in.rrd", "bytes_out.rrd"];

/// Disk file names for `disk` under the default patterns, in util/read/write order.
pub fn disk_files(disk: &str) -> [String; 3] {
    [
        format!("diskstat_{}_percent_io_time.rrd", disk),
        format!("diskstat_{}_read_bytes_per_sec.rrd", disk),
        format!("diskstat_{}_write_bytes_per_sec.rrd", disk),
    ]
}

/// A temporary tree of host directories plus a result directory.
pub struct HostFixture {
    pub root: TempDir,
    pub result_dir: PathBuf,
}

impl HostFixture {
    /// Create a new fixture with an empty `rrds/` tree.
    pub fn new() -> Self {
        let root = TempDir::new().expect("Failed to create temp dir");
        let result_dir = root.path().join("reports");
        fs::create_dir_all(root.path().join("rrds")).expect("Failed to create rrds dir");
        Self { root, result_dir }
    }

    /// Get the fixture root path.
    pub fn path(&self) -> &Path {
        self.root.path()
    }

    /// Add a host directory containing empty files with the given names.
    pub fn add_host<S: AsRef<str>>(&self, name: &str, files: &[S]) -> PathBuf {
        let dir = self.path().join("rrds").join(name);
        fs::create_dir_all(&dir).expect("Failed to create host dir");
        for file in files {
            fs::write(dir.join(file.as_ref()), b"").expect("Failed to write rrd file");
        }
        dir
    }

    /// Add a host with every file the six reports need, for the given disks.
    pub fn add_complete_host(&self, name: &str, disks: &[&str]) -> PathBuf {
        let mut files: Vec<String> = CPU_FILES
            .iter()
            .chain(MEMORY_FILES)
            .chain(NETWORK_FILES)
            .map(|f| f.to_string())
            .collect();
        for disk in disks {
            files.extend(disk_files(disk));
        }
        self.add_host(name, &files)
    }

    /// Remove one file from a host directory.
    pub fn remove_file(&self, host_dir: &Path, file: &str) {
        fs::remove_file(host_dir.join(file)).expect("Failed to remove rrd file");
    }
}

impl Default for HostFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// A series store answering `last_update` from memory.
///
/// Every path reports the default timestamp unless overridden; paths marked
/// as broken fail.
#[derive(Debug, Default)]
pub struct FakeStore {
    default_last: i64,
    overrides: HashMap<PathBuf, i64>,
    broken: HashSet<PathBuf>,
    queried: RefCell<Vec<PathBuf>>,
}

impl FakeStore {
    pub fn new(default_last: i64) -> Self {
        Self {
            default_last,
            ..Default::default()
        }
    }

    pub fn with_last(mut self, path: impl Into<PathBuf>, last: i64) -> Self {
        self.overrides.insert(path.into(), last);
        self
    }

    pub fn with_broken(mut self, path: impl Into<PathBuf>) -> Self {
        self.broken.insert(path.into());
        self
    }

    /// Paths passed to `last_update`, in call order.
    pub fn queried(&self) -> Vec<PathBuf> {
        self.queried.borrow().clone()
    }
}

impl SeriesStore for FakeStore {
    fn last_update(&self, path: &Path) -> Result<i64, StoreError> {
        self.queried.borrow_mut().push(path.to_path_buf());
        if self.broken.contains(path) {
            return Err(format!("cannot read {}", path.display()).into());
        }
        Ok(self
            .overrides
            .get(path)
            .copied()
            .unwrap_or(self.default_last))
    }
}

/// Error returned by [`RecordingRenderer`] for outputs it is told to fail.
#[derive(Debug, Error)]
#[error("refusing to render {path}")]
pub struct RecordingError {
    pub path: PathBuf,
}

impl BackendError for RecordingError {
    fn code(&self) -> &'static str {
        "TEST_001"
    }

    fn category(&self) -> &'static str {
        "test"
    }
}

/// A renderer that records specs instead of drawing them.
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    rendered: RefCell<Vec<GraphSpec>>,
    fail_outputs: HashSet<String>,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fails every spec whose output file name equals `file_name`.
    pub fn failing_on(mut self, file_name: impl Into<String>) -> Self {
        self.fail_outputs.insert(file_name.into());
        self
    }

    pub fn rendered(&self) -> Vec<GraphSpec> {
        self.rendered.borrow().clone()
    }

    /// The recorded spec whose output file name equals `file_name`.
    pub fn spec(&self, file_name: &str) -> Option<GraphSpec> {
        self.rendered
            .borrow()
            .iter()
            .find(|s| s.output().file_name().is_some_and(|n| n == file_name))
            .cloned()
    }
}

impl Renderer for RecordingRenderer {
    type Error = RecordingError;

    fn render(&self, spec: GraphSpec) -> Result<(), Self::Error> {
        let name = spec
            .output()
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        if self.fail_outputs.contains(&name) {
            return Err(RecordingError {
                path: spec.output().to_path_buf(),
            });
        }
        self.rendered.borrow_mut().push(spec);
        Ok(())
    }
}
