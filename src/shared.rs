//! Cross-thread displacement sharing.
//!
//! Odometry samples arrive from an independent, higher-rate source than
//! the control tick. The displacement is a multi-field snapshot
//! (moved_x, moved_y, rotated) and the tick path must never observe a
//! torn update, so every access goes through one mutex around the whole
//! tracker rather than per-field atomics.

use parking_lot::{Mutex, MutexGuard};

use crate::core::types::{Displacement, Pose2D};
use crate::tracker::DisplacementTracker;

/// Thread-safe wrapper around the displacement tracker.
///
/// The ingestion path calls [`observe`]; the tick path calls
/// [`displacement`] and, through [`lock`], rebases at goal acceptance.
/// Both sides always see complete snapshots.
///
/// [`observe`]: SharedTracker::observe
/// [`displacement`]: SharedTracker::displacement
/// [`lock`]: SharedTracker::lock
#[derive(Debug, Default)]
pub struct SharedTracker {
    inner: Mutex<DisplacementTracker>,
}

impl SharedTracker {
    /// Create a shared tracker with no origin yet.
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(DisplacementTracker::new()),
        }
    }

    /// Ingest one odometry sample (ingestion path).
    pub fn observe(&self, pose: Pose2D) -> Displacement {
        self.inner.lock().observe(pose)
    }

    /// One consistent displacement snapshot (tick path).
    pub fn displacement(&self) -> Displacement {
        self.inner.lock().displacement()
    }

    /// Whether the first odometry sample has arrived.
    pub fn is_ready(&self) -> bool {
        self.inner.lock().is_ready()
    }

    /// Lock the tracker for a compound operation (goal acceptance rebases
    /// it together with the goal install).
    pub fn lock(&self) -> MutexGuard<'_, DisplacementTracker> {
        self.inner.lock()
    }
}
