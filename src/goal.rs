//! Motion goal model and wire-level validation.
//!
//! Goals arrive from the transport as [`GoalRequest`] with integer
//! discriminator codes; [`MotionGoal::from_request`] validates every code
//! before any controller state is touched and names the offending field on
//! rejection.

use serde::{Deserialize, Serialize};

use crate::config::MotionLimits;
use crate::error::{MotionError, Result};

/// Wire-level goal as delivered by the transport.
///
/// Displacements are relative to the robot's pose at acceptance time:
/// meters for the linear axes, radians for the rotation. The discriminator
/// fields carry raw codes and are validated by [`MotionGoal::from_request`].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GoalRequest {
    /// Requested displacement along body X at acceptance (m)
    pub target_x: f32,
    /// Requested displacement along body Y at acceptance (m)
    pub target_y: f32,
    /// Requested rotation (rad)
    pub target_heading: f32,
    /// Motion strategy code, see [`MovementKind`]
    pub movement_type: u8,
    /// Task code, see [`TaskKind`]
    pub task_type: u8,
    /// Interruption-condition code, see [`InterruptKind`]
    pub interruption_condition: u8,
    /// Alignment-device code, see [`AlignmentDevice`]
    pub alignment_device: u8,
}

/// Motion strategy for executing the displacement goal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MovementKind {
    /// Straight-line translation with a trapezoidal speed profile
    Translational,
    /// In-place rotation at constant angular speed
    Rotational,
    /// Coupled translation and rotation with blended ramps on both axes
    TranslationalRotational,
    /// Constant-curvature arc tangential to the current heading
    TangentialArc,
}

impl MovementKind {
    /// Decode a wire code.
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Translational),
            1 => Some(Self::Rotational),
            2 => Some(Self::TranslationalRotational),
            3 => Some(Self::TangentialArc),
            _ => None,
        }
    }
}

/// Task the motion is part of.
///
/// Carried through for the higher-level behavior layer; does not influence
/// the velocity profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskKind {
    /// Align with an external reference
    Align,
    /// Plain move
    Move,
    /// Counted move (e.g. markers passed)
    Count,
    /// Follow an external signal
    Follow,
}

impl TaskKind {
    /// Decode a wire code.
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Align),
            1 => Some(Self::Move),
            2 => Some(Self::Count),
            3 => Some(Self::Follow),
            _ => None,
        }
    }
}

/// Condition that ends or interrupts the motion.
///
/// Carried through for the higher-level behavior layer; does not influence
/// the velocity profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum InterruptKind {
    MovedDistance,
    HighOpticalSignal,
    LowOpticalSignal,
    HighInductiveSignal,
    LowInductiveSignal,
    Camera,
    Obstacle,
    Bumper,
    Time,
    SecuredInfraredSignal,
}

impl InterruptKind {
    /// Decode a wire code.
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::MovedDistance),
            1 => Some(Self::HighOpticalSignal),
            2 => Some(Self::LowOpticalSignal),
            3 => Some(Self::HighInductiveSignal),
            4 => Some(Self::LowInductiveSignal),
            5 => Some(Self::Camera),
            6 => Some(Self::Obstacle),
            7 => Some(Self::Bumper),
            8 => Some(Self::Time),
            9 => Some(Self::SecuredInfraredSignal),
            _ => None,
        }
    }
}

/// Sensor used for alignment tasks.
///
/// Carried through for the higher-level behavior layer; does not influence
/// the velocity profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum AlignmentDevice {
    None,
    Infrared,
    Optical,
    Inductive,
    Camera,
    Ultrasonic,
    Compass,
}

impl AlignmentDevice {
    /// Decode a wire code.
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::None),
            1 => Some(Self::Infrared),
            2 => Some(Self::Optical),
            3 => Some(Self::Inductive),
            4 => Some(Self::Camera),
            5 => Some(Self::Ultrasonic),
            6 => Some(Self::Compass),
            _ => None,
        }
    }
}

/// A validated motion goal, immutable once accepted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionGoal {
    /// Target displacement along goal-frame X (m)
    pub target_x: f32,
    /// Target displacement along goal-frame Y (m)
    pub target_y: f32,
    /// Target rotation (rad)
    pub target_heading: f32,
    /// Motion strategy
    pub movement: MovementKind,
    /// Task carried through to the behavior layer
    pub task: TaskKind,
    /// Interruption condition carried through to the behavior layer
    pub interruption: InterruptKind,
    /// Alignment device carried through to the behavior layer
    pub alignment: AlignmentDevice,
}

impl MotionGoal {
    /// Validate a wire request into a goal.
    ///
    /// Checks every discriminator code before anything else so that a
    /// malformed goal never mutates controller state. The first offending
    /// field is named in the error.
    pub fn from_request(request: &GoalRequest) -> Result<Self> {
        let movement =
            MovementKind::from_code(request.movement_type).ok_or(MotionError::InvalidGoal {
                field: "movement_type",
                value: request.movement_type,
            })?;
        let task = TaskKind::from_code(request.task_type).ok_or(MotionError::InvalidGoal {
            field: "task_type",
            value: request.task_type,
        })?;
        let interruption = InterruptKind::from_code(request.interruption_condition).ok_or(
            MotionError::InvalidGoal {
                field: "interruption_condition",
                value: request.interruption_condition,
            },
        )?;
        let alignment =
            AlignmentDevice::from_code(request.alignment_device).ok_or(MotionError::InvalidGoal {
                field: "alignment_device",
                value: request.alignment_device,
            })?;

        Ok(Self {
            target_x: request.target_x,
            target_y: request.target_y,
            target_heading: request.target_heading,
            movement,
            task,
            interruption,
            alignment,
        })
    }

    /// True if every axis is already inside the acceptance tolerance, so
    /// the goal can finish without a single Moving tick.
    pub fn within_tolerance(&self, limits: &MotionLimits) -> bool {
        self.target_x.abs() <= limits.linear_goal_tolerance
            && self.target_y.abs() <= limits.linear_goal_tolerance
            && self.target_heading.abs() <= limits.angular_goal_tolerance
    }
}
