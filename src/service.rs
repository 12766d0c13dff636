//! Control-loop service: fixed-rate ticking and preemption sampling.
//!
//! [`MotionService`] glues the pieces together for a host process: the
//! transport feeds odometry through [`ingest_odometry`] and goals through
//! [`submit`]/[`cancel`] from any thread, while one dedicated thread runs
//! [`run`] (or steps [`tick_once`] itself).
//!
//! [`ingest_odometry`]: MotionService::ingest_odometry
//! [`submit`]: MotionService::submit
//! [`cancel`]: MotionService::cancel
//! [`run`]: MotionService::run
//! [`tick_once`]: MotionService::tick_once

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use parking_lot::Mutex;

use crate::config::GatiConfig;
use crate::core::types::{Displacement, Pose2D};
use crate::error::{MotionError, Result};
use crate::executor::{ControllerState, GoalExecutor};
use crate::goal::GoalRequest;
use crate::shared::SharedTracker;
use crate::transport::{CommandSink, EventSink};

/// A preemption request parked until the next tick samples it.
#[derive(Debug, Clone, Copy)]
enum Preemption {
    /// Replace the active goal
    Replace(GoalRequest),
    /// Cancel without replacement
    Cancel,
}

/// Fixed-rate motion-execution service.
///
/// One logical control loop: each tick performs at most one preemption
/// check, one profile evaluation, one command emission, and one feedback
/// emission. Preemption requests arriving mid-tick are honored on the
/// next tick, never mid-computation.
pub struct MotionService {
    tracker: SharedTracker,
    executor: Mutex<GoalExecutor>,
    /// Size-1 preemption mailbox; a newer request replaces an unsampled one
    pending: Mutex<Option<Preemption>>,
    shutdown: AtomicBool,
    tick_period: Duration,
}

impl MotionService {
    /// Create a service emitting into the given sinks.
    pub fn new(
        config: &GatiConfig,
        commands: Box<dyn CommandSink>,
        events: Box<dyn EventSink>,
    ) -> Self {
        Self {
            tracker: SharedTracker::new(),
            executor: Mutex::new(GoalExecutor::new(config.limits.clone(), commands, events)),
            pending: Mutex::new(None),
            shutdown: AtomicBool::new(false),
            tick_period: config.control.tick_period(),
        }
    }

    /// Ingest one odometry sample; callable from any thread at any rate.
    /// The first sample establishes readiness for goal acceptance.
    pub fn ingest_odometry(&self, pose: Pose2D) -> Displacement {
        self.tracker.observe(pose)
    }

    /// Submit a goal.
    ///
    /// When idle the goal is validated and accepted synchronously; a
    /// validation failure leaves all state untouched. While a goal is
    /// executing the request is parked in the preemption mailbox and
    /// picked up at the start of the next tick, exactly like an external
    /// preemption; validation then happens at pickup and a rejected
    /// replacement aborts the active goal.
    pub fn submit(&self, request: GoalRequest) -> Result<()> {
        if self.is_shutdown() {
            return Err(MotionError::Aborted("service is shutting down".into()));
        }
        let mut executor = self.executor.lock();
        if executor.state() == ControllerState::Idle {
            executor.accept(&request, &mut self.tracker.lock())
        } else {
            *self.pending.lock() = Some(Preemption::Replace(request));
            Ok(())
        }
    }

    /// Request cancellation of the active goal; honored at the start of
    /// the next tick.
    pub fn cancel(&self) {
        *self.pending.lock() = Some(Preemption::Cancel);
    }

    /// Signal the control loop to stop. A goal still executing is
    /// aborted with a forced zero command.
    pub fn request_shutdown(&self) {
        self.shutdown.store(true, Ordering::Release);
    }

    /// Whether shutdown has been requested.
    pub fn is_shutdown(&self) -> bool {
        self.shutdown.load(Ordering::Acquire)
    }

    /// Execute one control tick and return the resulting state.
    ///
    /// Order within the tick: shutdown check, one preemption-mailbox
    /// sample, one displacement snapshot, one executor step.
    pub fn tick_once(&self) -> ControllerState {
        let mut executor = self.executor.lock();

        if self.is_shutdown() {
            if executor.state() != ControllerState::Idle {
                executor.abort("shutdown requested");
            }
            return executor.state();
        }

        if let Some(preemption) = self.pending.lock().take() {
            let result = match preemption {
                Preemption::Cancel => executor.preempt(None, &mut self.tracker.lock()),
                Preemption::Replace(request) => {
                    executor.preempt(Some(&request), &mut self.tracker.lock())
                }
            };
            if let Err(e) = result {
                // Already reported through the event sink by the abort path
                log::warn!("preemption failed: {}", e);
            }
        }

        let displacement = self.tracker.displacement();
        executor.tick(displacement);
        executor.state()
    }

    /// Run the control loop until shutdown is requested.
    ///
    /// Ticks at the configured rate; each iteration sleeps out the
    /// remainder of its period.
    pub fn run(&self) {
        log::info!(
            "motion service running at {:.1} Hz",
            1.0 / self.tick_period.as_secs_f32()
        );
        loop {
            let started = Instant::now();
            self.tick_once();
            if self.is_shutdown() {
                break;
            }
            if let Some(rest) = self.tick_period.checked_sub(started.elapsed()) {
                std::thread::sleep(rest);
            }
        }
        log::info!("motion service stopped");
    }
}
