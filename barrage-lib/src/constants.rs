//! Shared defaults for dispatch and traversal timing.

/// Default interval between dispatch ticks (ms).
///
/// Each tick releases at most one pending item; a backlog drains at one item
/// per interval.
pub const DISPATCH_INTERVAL_MS: u64 = 2000;

/// Default wall-clock time for one full traversal (seconds).
pub const TRAVEL_SECS: f64 = 6.0;

/// Maximum redraws for lane selection before the fallback kicks in.
pub const LANE_RETRY_LIMIT: u32 = 8;

/// Granularity of the dispatch worker's control wake-up (ms).
///
/// Bounds how late the worker observes aborts, re-arms, and surface events.
pub const WORKER_POLL_MS: u64 = 20;
