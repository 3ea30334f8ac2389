//! rrdtool subprocess orchestrator.
//!
//! This module finds the rrdtool binary, runs it with a timeout, and exposes
//! the two operations report assembly needs: `rrdtool last` and `rrdtool graph`.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use hostreport_spec::{GraphSpec, Renderer, SeriesStore, StoreError};

use crate::args::graph_args;
use crate::error::{RrdtoolError, RrdtoolResult};

/// Default timeout for one rrdtool invocation.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Environment variable consulted when no path is configured.
pub const RRDTOOL_PATH_ENV: &str = "RRDTOOL_PATH";

/// Configuration for the rrdtool orchestrator.
#[derive(Debug, Clone)]
pub struct RrdtoolConfig {
    /// Path to the rrdtool executable.
    pub rrdtool_path: Option<PathBuf>,
    /// Timeout for each rrdtool execution.
    pub timeout: Duration,
    /// Whether to capture rrdtool's stderr for error messages.
    pub capture_output: bool,
}

impl Default for RrdtoolConfig {
    fn default() -> Self {
        Self {
            rrdtool_path: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            capture_output: true,
        }
    }
}

impl RrdtoolConfig {
    /// Sets the rrdtool executable path.
    pub fn rrdtool_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.rrdtool_path = Some(path.into());
        self
    }

    /// Sets the timeout duration.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the timeout in seconds.
    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.timeout = Duration::from_secs(secs);
        self
    }

    pub fn capture_output(mut self, capture: bool) -> Self {
        self.capture_output = capture;
        self
    }
}

/// The rrdtool subprocess orchestrator.
#[derive(Debug, Clone, Default)]
pub struct Rrdtool {
    config: RrdtoolConfig,
}

impl Rrdtool {
    /// Creates a new orchestrator with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new orchestrator with the given configuration.
    pub fn with_config(config: RrdtoolConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RrdtoolConfig {
        &self.config
    }

    /// Finds the rrdtool executable path.
    pub fn find_rrdtool(&self) -> RrdtoolResult<PathBuf> {
        // Check config override first
        if let Some(ref path) = self.config.rrdtool_path {
            if path.exists() {
                return Ok(path.clone());
            }
        }

        // Check RRDTOOL_PATH environment variable
        if let Ok(path) = std::env::var(RRDTOOL_PATH_ENV) {
            let path = PathBuf::from(path);
            if path.exists() {
                return Ok(path);
            }
        }

        // Try to find rrdtool in PATH
        let names = if cfg!(windows) {
            vec!["rrdtool.exe", "rrdtool"]
        } else {
            vec!["rrdtool"]
        };

        for name in names {
            if let Ok(path) = which::which(name) {
                return Ok(path);
            }
        }

        // Try common installation paths
        let common_paths = if cfg!(target_os = "macos") {
            vec!["/opt/homebrew/bin/rrdtool", "/usr/local/bin/rrdtool"]
        } else {
            vec![
                "/usr/bin/rrdtool",
                "/usr/local/bin/rrdtool",
                "/opt/rrdtool/bin/rrdtool",
            ]
        };

        for path_str in common_paths {
            let path = PathBuf::from(path_str);
            if path.exists() {
                return Ok(path);
            }
        }

        Err(RrdtoolError::RrdtoolNotFound)
    }

    /// Runs `rrdtool <args>` and returns its standard output.
    pub fn run<I, S>(&self, args: I) -> RrdtoolResult<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<std::ffi::OsStr>,
    {
        let rrdtool_path = self.find_rrdtool()?;

        let mut cmd = Command::new(&rrdtool_path);
        cmd.args(args).stdin(Stdio::null()).stdout(Stdio::piped());
        if self.config.capture_output {
            cmd.stderr(Stdio::piped());
        } else {
            cmd.stderr(Stdio::null());
        }

        let child = cmd.spawn().map_err(RrdtoolError::SpawnFailed)?;
        let (status, stdout, stderr) = wait_with_timeout(child, self.config.timeout)?;

        if !status.success() {
            let exit_code = status.code().unwrap_or(-1);
            return Err(RrdtoolError::process_failed(exit_code, stderr.trim()));
        }

        Ok(stdout)
    }

    /// Returns the timestamp of the last update stored in `path`.
    pub fn last(&self, path: &Path) -> RrdtoolResult<i64> {
        let output = self.run([std::ffi::OsStr::new("last"), path.as_os_str()])?;

        output
            .trim()
            .parse::<i64>()
            .map_err(|_| RrdtoolError::InvalidLastOutput {
                path: path.to_path_buf(),
                output: output.trim().to_string(),
            })
    }

    /// Renders `spec` with `rrdtool graph`.
    pub fn graph(&self, spec: &GraphSpec) -> RrdtoolResult<()> {
        let mut args = vec!["graph".to_string()];
        args.extend(graph_args(spec));
        self.run(&args)?;

        if !spec.output().exists() {
            return Err(RrdtoolError::OutputNotFound {
                path: spec.output().to_path_buf(),
            });
        }
        Ok(())
    }
}

impl SeriesStore for Rrdtool {
    fn last_update(&self, path: &Path) -> Result<i64, StoreError> {
        Ok(self.last(path)?)
    }
}

impl Renderer for Rrdtool {
    type Error = RrdtoolError;

    fn render(&self, spec: GraphSpec) -> Result<(), Self::Error> {
        self.graph(&spec)
    }
}

/// Drains a child pipe on its own thread so a full pipe cannot stall the child.
fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> Option<JoinHandle<String>> {
    pipe.map(|mut pipe| {
        std::thread::spawn(move || {
            let mut buf = String::new();
            let _ = pipe.read_to_string(&mut buf);
            buf
        })
    })
}

fn collect(handle: Option<JoinHandle<String>>) -> String {
    handle
        .and_then(|handle| handle.join().ok())
        .unwrap_or_default()
}

fn wait_with_timeout(
    mut child: Child,
    timeout: Duration,
) -> RrdtoolResult<(ExitStatus, String, String)> {
    let start = Instant::now();
    let stdout = drain(child.stdout.take());
    let stderr = drain(child.stderr.take());

    let status = loop {
        match child.try_wait() {
            Ok(Some(status)) => break status,
            Ok(None) => {
                if start.elapsed() > timeout {
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(RrdtoolError::Timeout {
                        timeout_secs: timeout.as_secs(),
                    });
                }
                std::thread::sleep(Duration::from_millis(20));
            }
            Err(e) => return Err(RrdtoolError::SpawnFailed(e)),
        }
    };

    Ok((status, collect(stdout), collect(stderr)))
}
