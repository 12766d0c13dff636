//! Core data types for motion execution.

use serde::{Deserialize, Serialize};

/// Robot pose in 2D space as reported by odometry.
///
/// Position (x, y) in meters and heading (theta) in radians. The heading is
/// kept as delivered by the odometry source; consecutive samples are
/// unwrapped by the displacement tracker, so no normalization is applied
/// here.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose2D {
    /// X position in meters
    pub x: f32,
    /// Y position in meters
    pub y: f32,
    /// Heading in radians, CCW positive
    pub theta: f32,
}

impl Pose2D {
    /// Create a new pose.
    #[inline]
    pub fn new(x: f32, y: f32, theta: f32) -> Self {
        Self { x, y, theta }
    }

    /// Pose at the origin with zero heading.
    #[inline]
    pub fn identity() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            theta: 0.0,
        }
    }
}

impl Default for Pose2D {
    fn default() -> Self {
        Self::identity()
    }
}

/// Displacement accumulated since the active goal was accepted.
///
/// `moved_x`/`moved_y` are expressed in the goal-relative frame: the robot's
/// body frame at the moment the goal was accepted, independent of the
/// current absolute heading. `rotated` is the cumulative unwrapped rotation
/// since acceptance and is not limited to one turn.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Displacement {
    /// Distance moved along the goal-frame X axis in meters
    pub moved_x: f32,
    /// Distance moved along the goal-frame Y axis in meters
    pub moved_y: f32,
    /// Cumulative rotation since goal acceptance in radians
    pub rotated: f32,
}

impl Displacement {
    /// The zero displacement.
    pub const ZERO: Self = Self {
        moved_x: 0.0,
        moved_y: 0.0,
        rotated: 0.0,
    };

    /// Scalar distance covered in the goal-frame XY plane.
    #[inline]
    pub fn linear_distance(&self) -> f32 {
        (self.moved_x * self.moved_x + self.moved_y * self.moved_y).sqrt()
    }
}

/// Velocity command for a holonomic base.
///
/// Body-frame linear velocities in m/s and angular velocity in rad/s.
/// The all-zero command doubles as the completion signal: the executor
/// treats it as "nothing left to do".
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Twist2D {
    /// Linear velocity along body X (m/s)
    pub vx: f32,
    /// Linear velocity along body Y (m/s)
    pub vy: f32,
    /// Angular velocity about body Z (rad/s)
    pub omega: f32,
}

impl Twist2D {
    /// The zero command.
    pub const ZERO: Self = Self {
        vx: 0.0,
        vy: 0.0,
        omega: 0.0,
    };

    /// Create a new command.
    #[inline]
    pub fn new(vx: f32, vy: f32, omega: f32) -> Self {
        Self { vx, vy, omega }
    }

    /// True if all three axes are exactly zero.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.vx == 0.0 && self.vy == 0.0 && self.omega == 0.0
    }

    /// True if all three axes are finite.
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.vx.is_finite() && self.vy.is_finite() && self.omega.is_finite()
    }
}

impl Default for Twist2D {
    fn default() -> Self {
        Self::ZERO
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_displacement_linear_distance() {
        let d = Displacement {
            moved_x: 3.0,
            moved_y: 4.0,
            rotated: 1.0,
        };
        assert_relative_eq!(d.linear_distance(), 5.0);
        assert_relative_eq!(Displacement::ZERO.linear_distance(), 0.0);
    }

    #[test]
    fn test_twist_zero_detection() {
        assert!(Twist2D::ZERO.is_zero());
        assert!(!Twist2D::new(0.0, 0.0, 1e-9).is_zero());
        assert!(!Twist2D::new(-0.1, 0.0, 0.0).is_zero());
    }

    #[test]
    fn test_twist_finite_detection() {
        assert!(Twist2D::new(0.1, -0.2, 0.3).is_finite());
        assert!(!Twist2D::new(f32::NAN, 0.0, 0.0).is_finite());
        assert!(!Twist2D::new(0.0, f32::INFINITY, 0.0).is_finite());
    }
}
