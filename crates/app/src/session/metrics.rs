//! Session counters for cross-task monitoring.

use std::sync::atomic::AtomicU64;

/// Shared counters, updated by the control loop and read by observers.
#[derive(Debug, Default)]
pub struct SessionMetrics {
    /// Turns in which a question started being spoken
    pub turns_started: AtomicU64,
    /// Responses recorded
    pub submissions: AtomicU64,
    /// Submits ignored for a blank transcript
    pub blank_submits: AtomicU64,
    /// Cancelled turns
    pub cancels: AtomicU64,
    /// Surfaced errors
    pub errors: AtomicU64,
    /// Analysis requests issued (including retries)
    pub analysis_requests: AtomicU64,
    /// User-initiated analysis retries
    pub analysis_retries: AtomicU64,
    /// Events dropped for carrying a stale turn epoch
    pub stale_events: AtomicU64,
}
