//! Pattern-based discovery of series files in a host directory.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use regex::Regex;
use walkdir::WalkDir;

use crate::error::{ReportError, ReportResult};

/// Default capture group name for disk series keys.
pub const DISK_KEY_GROUP: &str = "disk";

/// Default pattern for disk utilization series.
pub const DEFAULT_DISK_UTIL_PATTERN: &str = r"diskstat_(?P<disk>[A-Za-z0-9_]+)_percent_io_time";

/// Default pattern for disk read rate series.
pub const DEFAULT_DISK_READ_RATE_PATTERN: &str = r"diskstat_(?P<disk>[A-Za-z0-9_]+)_read_bytes_per_sec";

/// Default pattern for disk write rate series.
pub const DEFAULT_DISK_WRITE_RATE_PATTERN: &str = r"diskstat_(?P<disk>[A-Za-z0-9_]+)_write_bytes_per_sec";

/// One located series: a logical key and the file backing it.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct MetricSeriesRef {
    pub key: String,
    pub path: PathBuf,
}

/// Finds the regular files directly inside `dir` whose names match `pattern`.
///
/// The pattern is applied as a search, not a full match. Entries are keyed by
/// the capture group `key_group`; file names are scanned in sorted order and a
/// later file overwrites an earlier one with the same key. A directory with no
/// matching files yields an empty map.
pub fn locate(dir: &Path, pattern: &Regex, key_group: &str) -> ReportResult<BTreeMap<String, PathBuf>> {
    if !pattern.capture_names().any(|name| name == Some(key_group)) {
        return Err(ReportError::MissingKeyGroup {
            pattern: pattern.as_str().to_string(),
            group: key_group.to_string(),
        });
    }

    let mut found = BTreeMap::new();
    let walker = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name();

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            // A dangling symlink is not a regular file; skip it like any other.
            Err(e) if e.depth() > 0 => continue,
            Err(e) => {
                return Err(ReportError::ScanFailed {
                    dir: dir.to_path_buf(),
                    source: e,
                })
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }

        let file_name = entry.file_name().to_string_lossy();
        let key = pattern
            .captures(&file_name)
            .and_then(|caps| caps.name(key_group))
            .map(|m| m.as_str().to_string());
        if let Some(key) = key {
            found.insert(key, entry.path().to_path_buf());
        }
    }

    Ok(found)
}

/// Like [`locate`], returning the matches as sorted [`MetricSeriesRef`]s.
pub fn locate_refs(dir: &Path, pattern: &Regex, key_group: &str) -> ReportResult<Vec<MetricSeriesRef>> {
    Ok(locate(dir, pattern, key_group)?
        .into_iter()
        .map(|(key, path)| MetricSeriesRef { key, path })
        .collect())
}

/// The three configurable disk discovery patterns.
#[derive(Debug, Clone)]
pub struct DiskPatterns {
    pub util: Regex,
    pub read_rate: Regex,
    pub write_rate: Regex,
    pub key_group: String,
}

impl DiskPatterns {
    /// Compiles the three patterns, checking each has the `disk` capture group.
    pub fn new(util: &str, read_rate: &str, write_rate: &str) -> Result<Self, String> {
        let compile = |flag: &str, text: &str| -> Result<Regex, String> {
            let re = Regex::new(text).map_err(|e| format!("invalid {} pattern: {}", flag, e))?;
            if !re.capture_names().any(|n| n == Some(DISK_KEY_GROUP)) {
                return Err(format!(
                    "{} pattern /{}/ must have a capture group named '{}'",
                    flag, text, DISK_KEY_GROUP
                ));
            }
            Ok(re)
        };
        Ok(Self {
            util: compile("disk-util", util)?,
            read_rate: compile("disk-read-rate", read_rate)?,
            write_rate: compile("disk-write-rate", write_rate)?,
            key_group: DISK_KEY_GROUP.to_string(),
        })
    }
}

impl Default for DiskPatterns {
    fn default() -> Self {
        Self::new(
            DEFAULT_DISK_UTIL_PATTERN,
            DEFAULT_DISK_READ_RATE_PATTERN,
            DEFAULT_DISK_WRITE_RATE_PATTERN,
        )
        .expect("default disk patterns are valid")
    }
}
