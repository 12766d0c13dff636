//! Goal lifecycle state machine.
//!
//! [`GoalExecutor`] coordinates goal acceptance, validation, preemption,
//! completion, and abort. It owns the transport sinks; the tick loop in
//! [`crate::service`] drives it with one displacement snapshot per tick.

use crate::config::MotionLimits;
use crate::core::types::{Displacement, Twist2D};
use crate::error::{MotionError, Result};
use crate::goal::{GoalRequest, MotionGoal};
use crate::profile;
use crate::tracker::DisplacementTracker;
use crate::transport::{CommandSink, EventSink, Outcome, Progress};

/// Resting states of the controller.
///
/// `Aborted` is an [`Outcome`] reported to the caller, not a resting
/// state; after any terminal report the machine returns to `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerState {
    /// No active goal
    Idle,
    /// Executing the active goal
    Moving,
    /// Goal satisfied; the final zero command and result go out on the
    /// next tick, then the machine returns to `Idle`
    Finished,
}

/// Goal lifecycle state machine.
pub struct GoalExecutor {
    limits: MotionLimits,
    state: ControllerState,
    goal: Option<MotionGoal>,
    commands: Box<dyn CommandSink>,
    events: Box<dyn EventSink>,
}

impl GoalExecutor {
    /// Create an idle executor emitting into the given sinks.
    pub fn new(
        limits: MotionLimits,
        commands: Box<dyn CommandSink>,
        events: Box<dyn EventSink>,
    ) -> Self {
        Self {
            limits,
            state: ControllerState::Idle,
            goal: None,
            commands,
            events,
        }
    }

    /// Current resting state.
    pub fn state(&self) -> ControllerState {
        self.state
    }

    /// Validate and accept a goal.
    ///
    /// Fails with [`MotionError::InvalidGoal`] on an out-of-range
    /// discriminator code or [`MotionError::OdometryNotReady`] before the
    /// first odometry sample; neither failure mutates any state. On
    /// success the tracker is rebased to the current pose and the machine
    /// transitions to `Moving`, or straight to `Finished` when every axis
    /// is already within tolerance.
    pub fn accept(&mut self, request: &GoalRequest, tracker: &mut DisplacementTracker) -> Result<()> {
        let goal = MotionGoal::from_request(request)?;
        if !tracker.is_ready() {
            log::error!("goal rejected: odometry not initialized");
            return Err(MotionError::OdometryNotReady);
        }
        self.install(goal, tracker);
        Ok(())
    }

    /// Advance one tick with the given displacement snapshot.
    ///
    /// Only meaningful outside `Idle`: `Moving` evaluates the velocity
    /// profile, emitting either the command plus a feedback update or,
    /// on an all-zero command, the terminal success sequence. `Finished`
    /// (the immediate-accept case) emits the terminal sequence directly.
    pub fn tick(&mut self, displacement: Displacement) {
        match self.state {
            ControllerState::Idle => {}
            ControllerState::Finished => self.finish(displacement),
            ControllerState::Moving => {
                let Some(goal) = self.goal else {
                    self.state = ControllerState::Idle;
                    return;
                };
                let cmd = profile::compute_command(&goal, &displacement, &self.limits);
                if cmd.is_zero() {
                    self.state = ControllerState::Finished;
                    self.finish(displacement);
                } else {
                    self.commands.send_velocity(cmd);
                    self.events.feedback(remaining(&goal, &displacement));
                }
            }
        }
    }

    /// Handle a preemption request sampled at the start of a tick.
    ///
    /// With a replacement goal, the replacement is validated and accepted
    /// exactly like [`accept`]; the superseded goal reports `Preempted`
    /// first. If the replacement is rejected, execution aborts and the
    /// validation error propagates. Without a replacement the command is
    /// forced to zero and the active goal reports `Preempted`.
    ///
    /// [`accept`]: GoalExecutor::accept
    pub fn preempt(
        &mut self,
        replacement: Option<&GoalRequest>,
        tracker: &mut DisplacementTracker,
    ) -> Result<()> {
        match replacement {
            Some(request) => {
                let goal = match MotionGoal::from_request(request) {
                    Ok(goal) => goal,
                    Err(e) => {
                        self.abort(&format!("replacement goal rejected: {}", e));
                        return Err(e);
                    }
                };
                if !tracker.is_ready() {
                    self.abort("replacement goal rejected: odometry not initialized");
                    return Err(MotionError::OdometryNotReady);
                }
                self.install(goal, tracker);
                Ok(())
            }
            None => {
                if self.goal.take().is_some() {
                    log::info!("cancel request");
                    self.commands.send_velocity(Twist2D::ZERO);
                    self.events.goal_done(Outcome::Preempted, false);
                }
                self.state = ControllerState::Idle;
                Ok(())
            }
        }
    }

    /// Abort execution: force a zero command, report `Aborted`, return to
    /// `Idle`. Used for shutdown while moving and for rejected
    /// replacements.
    pub fn abort(&mut self, reason: &str) {
        self.commands.send_velocity(Twist2D::ZERO);
        if self.goal.take().is_some() {
            self.events.goal_done(Outcome::Aborted, false);
        }
        log::warn!("motion aborted: {}", reason);
        self.state = ControllerState::Idle;
    }

    /// Rebase the tracker and install a validated goal. A goal still
    /// active reports `Preempted` first, so every goal gets exactly one
    /// outcome.
    fn install(&mut self, goal: MotionGoal, tracker: &mut DisplacementTracker) {
        if self.goal.take().is_some() {
            self.events.goal_done(Outcome::Preempted, false);
        }
        tracker.rebase();
        log::info!(
            "motion execution start: (x[m], y[m], phi[deg]): ({:.3}, {:.3}, {:.1})",
            goal.target_x,
            goal.target_y,
            goal.target_heading.to_degrees()
        );
        self.state = if goal.within_tolerance(&self.limits) {
            ControllerState::Finished
        } else {
            ControllerState::Moving
        };
        self.goal = Some(goal);
    }

    /// Terminal success sequence: one zero command, one result, back to
    /// `Idle`.
    fn finish(&mut self, displacement: Displacement) {
        self.commands.send_velocity(Twist2D::ZERO);
        if self.goal.take().is_some() {
            self.events.goal_done(Outcome::Succeeded, true);
        }
        log::info!(
            "motion execution complete: (x[m], y[m], phi[deg]): ({:.3}, {:.3}, {:.1})",
            displacement.moved_x,
            displacement.moved_y,
            displacement.rotated.to_degrees()
        );
        self.state = ControllerState::Idle;
    }
}

/// Remaining distance per axis, independently and unclamped.
fn remaining(goal: &MotionGoal, displacement: &Displacement) -> Progress {
    Progress {
        remaining_x: goal.target_x.abs() - displacement.moved_x.abs(),
        remaining_y: goal.target_y.abs() - displacement.moved_y.abs(),
        remaining_heading: goal.target_heading.abs() - displacement.rotated.abs(),
    }
}
