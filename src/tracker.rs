//! Odometry-side displacement tracking.
//!
//! Ingests raw pose samples, unwraps the heading, and maintains the
//! displacement accumulated since the active goal was accepted, expressed
//! in the goal-relative frame.

use crate::core::math::{rotate_into_frame, wrap_delta};
use crate::core::types::{Displacement, Pose2D};

/// Tracks displacement relative to the pose at goal acceptance.
///
/// The first observed pose establishes the odometry origin and marks the
/// tracker ready; goals cannot be accepted before that. [`rebase`] is
/// called exactly at goal acceptance and moves the origin to the most
/// recent sample, zeroing the displacement.
///
/// [`rebase`]: DisplacementTracker::rebase
#[derive(Debug, Clone)]
pub struct DisplacementTracker {
    /// Pose captured at the last rebase (goal acceptance)
    origin: Pose2D,
    /// Most recent observed pose
    last: Pose2D,
    /// Heading of the previous sample, for delta unwrapping
    prev_theta: f32,
    /// Accumulated displacement in the origin frame
    displacement: Displacement,
    /// Whether the first sample has arrived
    ready: bool,
}

impl DisplacementTracker {
    /// Create a tracker with no origin yet.
    pub fn new() -> Self {
        Self {
            origin: Pose2D::identity(),
            last: Pose2D::identity(),
            prev_theta: 0.0,
            displacement: Displacement::ZERO,
            ready: false,
        }
    }

    /// Ingest one odometry sample and return the updated displacement.
    ///
    /// The per-step heading delta is wrapped into (−π, π] before it is
    /// accumulated, so a sample crossing ±π never produces a jump of more
    /// than half a turn. The linear displacement is recomputed from the
    /// raw origin deltas with a single frame rotation on every call.
    pub fn observe(&mut self, pose: Pose2D) -> Displacement {
        if !self.ready {
            log::info!("odometry initialized");
            self.origin = pose;
            self.prev_theta = pose.theta;
            self.last = pose;
            self.ready = true;
            return self.displacement;
        }

        let delta = wrap_delta(pose.theta - self.prev_theta);
        self.displacement.rotated += delta;
        self.prev_theta = pose.theta;
        self.last = pose;

        let (moved_x, moved_y) =
            rotate_into_frame(pose.x - self.origin.x, pose.y - self.origin.y, self.origin.theta);
        self.displacement.moved_x = moved_x;
        self.displacement.moved_y = moved_y;

        self.displacement
    }

    /// Move the origin to the most recent sample and zero the displacement.
    ///
    /// Called exactly at goal acceptance. Returns `false` (and changes
    /// nothing) if no sample has been observed yet.
    pub fn rebase(&mut self) -> bool {
        if !self.ready {
            return false;
        }
        self.origin = self.last;
        self.displacement = Displacement::ZERO;
        true
    }

    /// Whether the first odometry sample has arrived.
    #[inline]
    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// The current displacement since the last rebase.
    #[inline]
    pub fn displacement(&self) -> Displacement {
        self.displacement
    }

    /// The most recent observed pose.
    #[inline]
    pub fn last_pose(&self) -> Pose2D {
        self.last
    }
}

impl Default for DisplacementTracker {
    fn default() -> Self {
        Self::new()
    }
}
