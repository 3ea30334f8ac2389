//! Report time-window resolution.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::backend::SeriesStore;
use crate::error::{ReportError, ReportResult};

/// Seconds in the last-day window.
pub const ONE_DAY_SECS: i64 = 86_400;

/// Seconds in the last-hour window.
pub const ONE_HOUR_SECS: i64 = 3_600;

/// The rule that produced a time range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimePolicy {
    Explicit,
    LastDay,
    LastHour,
}

impl TimePolicy {
    /// Suffix appended to report titles (empty for explicit ranges).
    pub fn title_suffix(&self) -> &'static str {
        match self {
            TimePolicy::Explicit => "",
            TimePolicy::LastDay => " last day",
            TimePolicy::LastHour => " last hour",
        }
    }
}

/// Half-open interval `[start, end)` of Unix epoch seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: i64,
    pub end: i64,
    pub policy: TimePolicy,
}

impl TimeRange {
    pub fn new(start: i64, end: i64, policy: TimePolicy) -> Self {
        Self { start, end, policy }
    }

    /// Window length in seconds.
    pub fn duration_secs(&self) -> i64 {
        self.end - self.start
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

/// Time-window options supplied by the caller.
///
/// When several are set, explicit bounds win over last-day, which wins over
/// last-hour.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimeOptions {
    pub explicit: Option<(i64, i64)>,
    pub last_day: bool,
    pub last_hour: bool,
}

impl TimeOptions {
    pub fn explicit(start: i64, end: i64) -> Self {
        Self {
            explicit: Some((start, end)),
            ..Default::default()
        }
    }

    pub fn last_day() -> Self {
        Self {
            last_day: true,
            ..Default::default()
        }
    }

    pub fn last_hour() -> Self {
        Self {
            last_hour: true,
            ..Default::default()
        }
    }

    /// The policy that will be applied, if any.
    pub fn policy(&self) -> Option<TimePolicy> {
        if self.explicit.is_some() {
            Some(TimePolicy::Explicit)
        } else if self.last_day {
            Some(TimePolicy::LastDay)
        } else if self.last_hour {
            Some(TimePolicy::LastHour)
        } else {
            None
        }
    }

    /// Resolves the window, reading the latest timestamp of `reference` for
    /// relative policies.
    pub fn resolve(&self, reference: &Path, store: &impl SeriesStore) -> ReportResult<TimeRange> {
        if let Some((start, end)) = self.explicit {
            return Ok(TimeRange::new(start, end, TimePolicy::Explicit));
        }

        let (policy, window) = match self.policy() {
            Some(TimePolicy::LastDay) => (TimePolicy::LastDay, ONE_DAY_SECS),
            Some(TimePolicy::LastHour) => (TimePolicy::LastHour, ONE_HOUR_SECS),
            _ => return Err(ReportError::TimeRangeUndefined),
        };

        let end = store
            .last_update(reference)
            .map_err(|e| ReportError::series_unavailable(reference, e.to_string()))?;
        Ok(TimeRange::new(end - window, end, policy))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::StoreError;

    struct FixedStore(i64);

    impl SeriesStore for FixedStore {
        fn last_update(&self, _path: &Path) -> Result<i64, StoreError> {
            Ok(self.0)
        }
    }

    struct BrokenStore;

    impl SeriesStore for BrokenStore {
        fn last_update(&self, path: &Path) -> Result<i64, StoreError> {
            Err(format!("cannot open {}", path.display()).into())
        }
    }

    #[test]
    fn test_explicit_range_used_verbatim() {
        let range = TimeOptions::explicit(1000, 2000)
            .resolve(Path::new("/nonexistent.rrd"), &BrokenStore)
            .unwrap();
        assert_eq!(range, TimeRange::new(1000, 2000, TimePolicy::Explicit));
    }

    #[test]
    fn test_last_day() {
        let t = 1_700_000_000;
        let range = TimeOptions::last_day()
            .resolve(Path::new("cpu_user.rrd"), &FixedStore(t))
            .unwrap();
        assert_eq!((range.start, range.end), (t - 86_400, t));
        assert_eq!(range.policy, TimePolicy::LastDay);
        assert_eq!(range.duration_secs(), ONE_DAY_SECS);
    }

    #[test]
    fn test_last_hour() {
        let range = TimeOptions::last_hour()
            .resolve(Path::new("cpu_user.rrd"), &FixedStore(10_000))
            .unwrap();
        assert_eq!((range.start, range.end), (6_400, 10_000));
    }

    #[test]
    fn test_priority_explicit_then_day_then_hour() {
        let all = TimeOptions {
            explicit: Some((1, 2)),
            last_day: true,
            last_hour: true,
        };
        assert_eq!(all.policy(), Some(TimePolicy::Explicit));

        let relative = TimeOptions {
            explicit: None,
            last_day: true,
            last_hour: true,
        };
        let range = relative
            .resolve(Path::new("x.rrd"), &FixedStore(100_000))
            .unwrap();
        assert_eq!(range.policy, TimePolicy::LastDay);
    }

    #[test]
    fn test_no_policy_is_undefined() {
        let err = TimeOptions::default()
            .resolve(Path::new("x.rrd"), &FixedStore(0))
            .unwrap_err();
        assert!(matches!(err, ReportError::TimeRangeUndefined));
    }

    #[test]
    fn test_store_failure_is_series_unavailable() {
        let err = TimeOptions::last_day()
            .resolve(Path::new("/data/h/cpu_user.rrd"), &BrokenStore)
            .unwrap_err();
        match err {
            ReportError::SeriesUnavailable { path, reason } => {
                assert_eq!(path, Path::new("/data/h/cpu_user.rrd"));
                assert!(reason.contains("cannot open"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_title_suffix() {
        assert_eq!(TimePolicy::Explicit.title_suffix(), "");
        assert_eq!(TimePolicy::LastDay.title_suffix(), " last day");
        assert_eq!(TimePolicy::LastHour.title_suffix(), " last hour");
    }
}
