//! # gati-motion
//!
//! Motion-execution controller for holonomic wheeled robots.
//!
//! The crate turns a single high-level displacement goal (translate by
//! Δx/Δy, rotate by Δφ, under one of four motion strategies) into a
//! continuous stream of velocity commands, tracking progress from odometry
//! and deciding when the goal is satisfied, preempted, or aborted.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                    service/                         │  ← Tick loop, preemption
//! └─────────────────────────────────────────────────────┘
//!                          │
//! ┌─────────────────────────────────────────────────────┐
//! │                   executor/                         │  ← Goal lifecycle
//! └─────────────────────────────────────────────────────┘
//!                          │
//! ┌──────────────────────────┬──────────────────────────┐
//! │        tracker/          │        profile/          │  ← Odometry + velocity
//! │  (displacement in the    │  (pure velocity-profile  │    profiles
//! │   goal-relative frame)   │   evaluation)            │
//! └──────────────────────────┴──────────────────────────┘
//!                          │
//! ┌─────────────────────────────────────────────────────┐
//! │                     core/                           │  ← Types, math
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! The transport that delivers goals and odometry and carries commands,
//! feedback, and results lives outside the crate; it reaches the controller
//! through [`MotionService`] and the sink traits in [`transport`].
//!
//! ## Coordinate System
//!
//! Uses ROS REP-103 convention:
//! - X: Forward (positive ahead of robot)
//! - Y: Left (positive to robot's left)
//! - Theta: Rotation in radians, CCW positive from +X axis
//!
//! Goal displacements and reported progress are expressed in the robot's
//! body frame at the moment the goal was accepted (the goal-relative frame).
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use gati_motion::{GatiConfig, GoalRequest, MotionService, Pose2D};
//!
//! let config = GatiConfig::default();
//! let service = MotionService::new(&config, commands, events);
//!
//! // Odometry thread
//! service.ingest_odometry(Pose2D::new(0.0, 0.0, 0.0));
//!
//! // Transport thread
//! service.submit(GoalRequest {
//!     target_x: 1.0,
//!     ..GoalRequest::default()
//! })?;
//!
//! // Control thread
//! service.run();
//! ```

#![warn(missing_docs)]

// Foundation (no internal deps)
pub mod core;

// Configuration and errors
pub mod config;
pub mod error;

// Goal model and validation
pub mod goal;

// Odometry-side displacement tracking
pub mod tracker;

// Pure velocity-profile evaluation
pub mod profile;

// Transport seams (sinks, outcomes)
pub mod transport;

// Goal lifecycle state machine
pub mod executor;

// Cross-thread displacement sharing
pub mod shared;

// Tick loop and preemption sampling
pub mod service;

pub use crate::core::types::{Displacement, Pose2D, Twist2D};
pub use config::{ControlConfig, GatiConfig, MotionLimits};
pub use error::{MotionError, Result};
pub use executor::{ControllerState, GoalExecutor};
pub use goal::{AlignmentDevice, GoalRequest, InterruptKind, MotionGoal, MovementKind, TaskKind};
pub use service::MotionService;
pub use shared::SharedTracker;
pub use tracker::DisplacementTracker;
pub use transport::{CommandSink, EventSink, Outcome, Progress};
