//! Time sources for position timestamps.
//!
//! Every position is stamped with the server clock at the moment the report
//! is accepted. The clock is injected into the [`PositionStore`] so tests
//! can drive staleness and eviction deterministically with a [`ManualClock`].
//!
//! [`PositionStore`]: crate::position::PositionStore

use std::sync::atomic::{AtomicI64, Ordering};
use std::time::{Duration, Instant};

use chrono::{DateTime, TimeDelta, Utc};

/// Source of "now" for the tracking core.
pub trait Clock: Send + Sync + 'static {
    /// Current wall-clock time in UTC.
    fn now(&self) -> DateTime<Utc>;
}

/// Clock anchored to the wall clock once, then advanced monotonically.
///
/// Wall-clock steps (NTP corrections, VM resumes) after construction do not
/// move it, so timestamps it hands out never go backwards.
#[derive(Debug, Clone)]
pub struct SystemClock {
    origin: DateTime<Utc>,
    started: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Utc::now(),
            started: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        self.origin
            .checked_add_signed(to_time_delta(self.started.elapsed()))
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }
}

/// Manually advanced clock with millisecond resolution.
///
/// Lock-free, so it can be shared across threads in concurrency tests.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use livetrack::time::{Clock, ManualClock};
///
/// let clock = ManualClock::from_unix_secs(100);
/// clock.advance(Duration::from_secs(5));
/// assert_eq!(clock.now().timestamp(), 105);
/// ```
#[derive(Debug)]
pub struct ManualClock {
    millis: AtomicI64,
}

impl ManualClock {
    /// Create a clock frozen at the given instant.
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            millis: AtomicI64::new(start.timestamp_millis()),
        }
    }

    /// Create a clock frozen at `secs` seconds after the Unix epoch.
    pub fn from_unix_secs(secs: i64) -> Self {
        Self {
            millis: AtomicI64::new(secs.saturating_mul(1000)),
        }
    }

    /// Move the clock forward.
    pub fn advance(&self, by: Duration) {
        let delta = i64::try_from(by.as_millis()).unwrap_or(i64::MAX);
        self.millis.fetch_add(delta, Ordering::SeqCst);
    }

    /// Jump to an absolute instant (may move backwards).
    pub fn set(&self, at: DateTime<Utc>) {
        self.millis.store(at.timestamp_millis(), Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(self.millis.load(Ordering::SeqCst))
            .unwrap_or(DateTime::<Utc>::MIN_UTC)
    }
}

/// Convert a std `Duration` into a chrono `TimeDelta`, saturating on overflow.
pub fn to_time_delta(duration: Duration) -> TimeDelta {
    TimeDelta::from_std(duration).unwrap_or(TimeDelta::MAX)
}
