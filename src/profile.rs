//! Pure velocity-profile evaluation.
//!
//! [`compute_command`] maps the current displacement, the active goal, and
//! the kinematic limits to one velocity command. It holds the four motion
//! strategies and every numeric guard, and touches no controller state.
//!
//! Sign convention: each strategy works on goal magnitudes and produces a
//! non-negative speed per axis; the sign of the corresponding *goal*
//! component is applied in a single post-processing step. The all-zero
//! command is the completion signal consumed by the executor.

use std::f32::consts::FRAC_PI_2;

use crate::config::MotionLimits;
use crate::core::types::{Displacement, Twist2D};
use crate::goal::{MotionGoal, MovementKind};

/// Scale applied to the configured maxima to obtain the velocity floors of
/// the coupled translational-rotational profile.
const COUPLED_MIN_SCALE: f32 = 0.05;

/// Evaluate the velocity command for one tick.
///
/// Pure function: same inputs, same command. A zero triple means the goal
/// is complete on every axis the strategy drives.
pub fn compute_command(
    goal: &MotionGoal,
    displacement: &Displacement,
    limits: &MotionLimits,
) -> Twist2D {
    let raw = match goal.movement {
        MovementKind::Translational => translational(goal, displacement, limits),
        MovementKind::Rotational => rotational(goal, displacement, limits),
        MovementKind::TranslationalRotational => coupled(goal, displacement, limits),
        MovementKind::TangentialArc => tangential_arc(goal, displacement, limits),
    };
    sanitize(apply_goal_signs(raw, goal))
}

/// Trapezoidal profile along the straight line to the goal point.
fn translational(goal: &MotionGoal, d: &Displacement, limits: &MotionLimits) -> Twist2D {
    let goal_x = goal.target_x.abs();
    let goal_y = goal.target_y.abs();
    if d.moved_x.abs() >= goal_x && d.moved_y.abs() >= goal_y {
        return Twist2D::ZERO;
    }

    let driven = d.linear_distance();
    let target = (goal_x * goal_x + goal_y * goal_y).sqrt();
    let alpha = direction_angle(goal_x, goal_y);
    let p = limits.blend_fraction;

    let speed = if driven <= p * target {
        // Acceleration phase: v² = v_min² + 2·a·s
        (limits.min_linear_vel * limits.min_linear_vel + 2.0 * limits.linear_accel * driven).sqrt()
    } else if driven <= (1.0 - p) * target {
        limits.max_linear_vel
    } else {
        // Deceleration phase; the radicand goes negative past the stop
        // point and must not reach sqrt
        let into_ramp = driven - (1.0 - p) * target;
        let radicand =
            limits.min_linear_vel * limits.min_linear_vel - 2.0 * limits.linear_accel * into_ramp;
        radicand.max(0.0).sqrt()
    };

    log::debug!("translational: driven {:.3}/{:.3} m, speed {:.3}", driven, target, speed);
    Twist2D::new(speed * alpha.cos(), speed * alpha.sin(), 0.0)
}

/// Constant angular speed until the rotation target is covered.
fn rotational(goal: &MotionGoal, d: &Displacement, limits: &MotionLimits) -> Twist2D {
    if d.rotated.abs() < goal.target_heading.abs() {
        log::debug!("rotational: rotated {:.1}°", d.rotated.to_degrees());
        Twist2D::new(0.0, 0.0, limits.max_angular_vel)
    } else {
        Twist2D::ZERO
    }
}

/// Coupled translation and rotation with parabolic ramp windows.
///
/// Both axes share the motion duration: the per-axis floors and ceilings
/// are paired through the ratio of linear to angular goal magnitude, with
/// the larger floor (and the smaller ceiling) authoritative and its partner
/// recomputed from it. Inside the outer ramp windows each axis follows a
/// parabola that meets its floor at the endpoints and its ceiling at the
/// window boundary; the middle of the motion runs at the ceiling.
fn coupled(goal: &MotionGoal, disp: &Displacement, limits: &MotionLimits) -> Twist2D {
    let goal_x = goal.target_x.abs();
    let goal_y = goal.target_y.abs();
    let phi = goal.target_heading.abs();
    if disp.moved_x.abs() >= goal_x && disp.moved_y.abs() >= goal_y && disp.rotated.abs() >= phi {
        return Twist2D::ZERO;
    }

    let d = (goal_x * goal_x + goal_y * goal_y).sqrt();

    // Paired floors: the scaled minima, the larger one binding
    let v_floor = COUPLED_MIN_SCALE * limits.max_linear_vel;
    let w_floor = COUPLED_MIN_SCALE * limits.max_angular_vel;
    let mut v_min = if phi != 0.0 { w_floor * d / phi } else { v_floor };
    let mut w_min = if d != 0.0 { v_floor * phi / d } else { w_floor };
    if v_min < v_floor {
        v_min = v_floor;
    } else {
        w_min = w_floor;
    }

    // Paired ceilings: the configured maxima, the smaller one binding
    let mut v_max = if phi != 0.0 {
        limits.max_angular_vel * d / phi
    } else {
        limits.max_linear_vel
    };
    let mut w_max = if d != 0.0 {
        limits.max_linear_vel * phi / d
    } else {
        limits.max_angular_vel
    };
    if v_max > limits.max_linear_vel {
        v_max = limits.max_linear_vel;
    } else {
        w_max = limits.max_angular_vel;
    }

    // Parabola gains chosen so each ramp meets the ceiling at the window
    // boundary and the floor at the interval endpoints
    let p = limits.coupled_blend_window;
    let k = if d != 0.0 {
        (v_min - v_max) / (p * (1.0 - p) * d * d)
    } else {
        0.0
    };
    let kappa = if phi != 0.0 {
        (w_min - w_max) / (p * (1.0 - p) * phi * phi)
    } else {
        0.0
    };

    let s = disp.linear_distance();
    let theta_abs = disp.rotated.abs();

    let speed = if d == 0.0 {
        0.0
    } else if s <= d * p || s >= d * (1.0 - p) {
        k * s * (s - d) + v_min
    } else {
        v_max
    };
    let omega = if phi == 0.0 {
        0.0
    } else if theta_abs <= phi * p || theta_abs >= phi * (1.0 - p) {
        kappa * theta_abs * (theta_abs - phi) + w_min
    } else {
        w_max
    };

    log::debug!(
        "coupled: s {:.3}/{:.3} m, theta {:.1}/{:.1}°, speed {:.3}, omega {:.3}",
        s,
        d,
        disp.rotated.to_degrees(),
        goal.target_heading.to_degrees(),
        speed,
        omega
    );

    // Keep the linear command in the body frame as the robot turns; the
    // direction angle uses the signed goal components here
    let alpha = signed_direction_angle(goal.target_x, goal.target_y);
    let heading = alpha - disp.rotated;
    Twist2D::new(speed * heading.cos(), speed * heading.sin(), omega)
}

/// Constant-curvature arc through the goal displacement and rotation.
fn tangential_arc(goal: &MotionGoal, d: &Displacement, limits: &MotionLimits) -> Twist2D {
    let goal_x = goal.target_x.abs();
    let goal_y = goal.target_y.abs();
    let phi = goal.target_heading.abs();
    if d.moved_x.abs() >= goal_x && d.moved_y.abs() >= goal_y && d.rotated.abs() >= phi {
        return Twist2D::ZERO;
    }

    // Zero rotation makes the arc radius undefined; drive the chord
    // straight instead of propagating a non-finite curvature
    if phi == 0.0 {
        log::debug!("tangential arc with zero rotation, driving chord");
        return Twist2D::new(limits.max_linear_vel, 0.0, 0.0);
    }

    let chord = (goal_x * goal_x + goal_y * goal_y).sqrt();
    let radius = 0.5 * chord / (phi / 2.0).sin();
    let omega = if radius != 0.0 {
        limits.max_linear_vel / radius
    } else {
        // Degenerate arc with no chord: the angular axis collapses to zero
        0.0
    };

    log::debug!("tangential arc: radius {:.3} m, omega {:.3}", radius, omega);
    Twist2D::new(limits.max_linear_vel, 0.0, omega)
}

/// Resultant direction angle in magnitude space, [0, π/2].
fn direction_angle(goal_x_abs: f32, goal_y_abs: f32) -> f32 {
    if goal_x_abs == 0.0 {
        FRAC_PI_2
    } else {
        (goal_y_abs / goal_x_abs).atan()
    }
}

/// Resultant direction angle from signed goal components, (−π/2, π/2].
fn signed_direction_angle(goal_x: f32, goal_y: f32) -> f32 {
    if goal_x == 0.0 {
        goal_y.signum() * FRAC_PI_2
    } else {
        (goal_y / goal_x).atan()
    }
}

/// Give each axis magnitude the sign of its goal component.
fn apply_goal_signs(mut cmd: Twist2D, goal: &MotionGoal) -> Twist2D {
    if goal.target_x < 0.0 {
        cmd.vx = -cmd.vx;
    }
    if goal.target_y < 0.0 {
        cmd.vy = -cmd.vy;
    }
    if goal.target_heading < 0.0 {
        cmd.omega = -cmd.omega;
    }
    cmd
}

/// Recover any non-finite axis to zero.
///
/// A non-finite value must never reach the command sink; a recovered axis
/// is logged but not surfaced.
fn sanitize(cmd: Twist2D) -> Twist2D {
    if cmd.is_finite() {
        return cmd;
    }
    log::warn!(
        "non-finite velocity recovered to zero: ({}, {}, {})",
        cmd.vx,
        cmd.vy,
        cmd.omega
    );
    let clean = |v: f32| if v.is_finite() { v } else { 0.0 };
    Twist2D::new(clean(cmd.vx), clean(cmd.vy), clean(cmd.omega))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::goal::GoalRequest;
    use approx::assert_relative_eq;
    use std::f32::consts::PI;

    fn goal(x: f32, y: f32, heading: f32, movement: u8) -> MotionGoal {
        MotionGoal::from_request(&GoalRequest {
            target_x: x,
            target_y: y,
            target_heading: heading,
            movement_type: movement,
            ..GoalRequest::default()
        })
        .unwrap()
    }

    fn disp(x: f32, y: f32, rotated: f32) -> Displacement {
        Displacement {
            moved_x: x,
            moved_y: y,
            rotated,
        }
    }

    fn limits() -> MotionLimits {
        MotionLimits::default()
    }

    #[test]
    fn test_translational_accel_phase_starts_at_min() {
        let g = goal(1.0, 0.0, 0.0, 0);
        let cmd = compute_command(&g, &Displacement::ZERO, &limits());
        assert_relative_eq!(cmd.vx, 0.05, epsilon = 1e-6);
        assert_relative_eq!(cmd.vy, 0.0);
        assert_relative_eq!(cmd.omega, 0.0);
    }

    #[test]
    fn test_translational_cruise_at_max() {
        let g = goal(1.0, 0.0, 0.0, 0);
        let cmd = compute_command(&g, &disp(0.5, 0.0, 0.0), &limits());
        assert_relative_eq!(cmd.vx, 0.1, epsilon = 1e-6);
    }

    #[test]
    fn test_translational_decel_ramps_down() {
        // With the default limits the deceleration ramp runs out of speed
        // v_min²/(2a) = 6.25 mm past its start; sample inside that span
        let g = goal(1.0, 0.0, 0.0, 0);
        let cruise = compute_command(&g, &disp(0.5, 0.0, 0.0), &limits());
        let late = compute_command(&g, &disp(0.903, 0.0, 0.0), &limits());
        assert!(late.vx < cruise.vx);
        assert!(late.vx > 0.0);
    }

    #[test]
    fn test_translational_decel_radicand_clamped() {
        // Far into the ramp the radicand goes negative; the speed must
        // clamp to zero, not NaN
        let g = goal(1.0, 0.0, 0.0, 0);
        let cmd = compute_command(&g, &disp(0.999, 0.0, 0.0), &limits());
        assert!(cmd.is_finite());
        assert!(cmd.vx >= 0.0);
    }

    #[test]
    fn test_translational_complete_when_both_axes_covered() {
        let g = goal(1.0, 0.5, 0.0, 0);
        assert!(!compute_command(&g, &disp(1.1, 0.4, 0.0), &limits()).is_zero());
        assert!(compute_command(&g, &disp(1.1, 0.6, 0.0), &limits()).is_zero());
    }

    #[test]
    fn test_translational_pure_y_direction() {
        let g = goal(0.0, 1.0, 0.0, 0);
        let cmd = compute_command(&g, &Displacement::ZERO, &limits());
        assert_relative_eq!(cmd.vx, 0.0, epsilon = 1e-6);
        assert!(cmd.vy > 0.0);
    }

    #[test]
    fn test_translational_negative_goal_signs() {
        let g = goal(-1.0, -0.5, 0.0, 0);
        let cmd = compute_command(&g, &Displacement::ZERO, &limits());
        assert!(cmd.vx < 0.0);
        assert!(cmd.vy < 0.0);
    }

    #[test]
    fn test_rotational_constant_until_target() {
        let g = goal(0.0, 0.0, 1.0, 1);
        let cmd = compute_command(&g, &disp(0.0, 0.0, 0.5), &limits());
        assert_relative_eq!(cmd.omega, 0.2, epsilon = 1e-6);
        assert_relative_eq!(cmd.vx, 0.0);

        let done = compute_command(&g, &disp(0.0, 0.0, 1.0), &limits());
        assert!(done.is_zero());
    }

    #[test]
    fn test_rotational_negative_target() {
        let g = goal(0.0, 0.0, -1.0, 1);
        let cmd = compute_command(&g, &disp(0.0, 0.0, -0.5), &limits());
        assert_relative_eq!(cmd.omega, -0.2, epsilon = 1e-6);
    }

    #[test]
    fn test_coupled_floors_at_endpoints_and_ceiling_in_middle() {
        // d = 1 m, phi = 1 rad, defaults: v_floor 0.005, w_floor 0.01.
        // Derived v_min = 0.01·1/1 = 0.01 ≥ floor, so the omega floor binds
        // and the pair is (0.01, 0.01).
        let g = goal(1.0, 0.0, 1.0, 2);
        let l = limits();

        let start = compute_command(&g, &Displacement::ZERO, &l);
        // At s = 0 the parabola sits on the floor pair
        assert_relative_eq!(start.vx, 0.01, epsilon = 1e-5);
        assert_relative_eq!(start.omega, 0.01, epsilon = 1e-5);

        let mid = compute_command(&g, &disp(0.5, 0.0, 0.5), &l);
        // Ceilings: derived v_max = 0.2·1/1 exceeds the 0.1 linear limit,
        // so the linear limit binds and its partner w_max = 0.1·1/1 stays
        assert_relative_eq!(mid.vx.hypot(mid.vy), 0.1, epsilon = 1e-5);
        assert_relative_eq!(mid.omega, 0.1, epsilon = 1e-5);
    }

    #[test]
    fn test_coupled_window_boundary_meets_ceiling() {
        let g = goal(1.0, 0.0, 1.0, 2);
        let l = limits();
        // At s = p·d the parabola evaluates exactly to the ceiling
        let at_boundary = compute_command(&g, &disp(0.2, 0.0, 0.2), &l);
        let mid = compute_command(&g, &disp(0.5, 0.0, 0.5), &l);
        assert_relative_eq!(
            at_boundary.vx.hypot(at_boundary.vy),
            mid.vx.hypot(mid.vy),
            epsilon = 1e-4
        );
        assert_relative_eq!(at_boundary.omega, mid.omega, epsilon = 1e-4);
    }

    #[test]
    fn test_coupled_zero_rotation_goal_collapses_omega() {
        let g = goal(1.0, 0.0, 0.0, 2);
        let cmd = compute_command(&g, &disp(0.5, 0.0, 0.0), &limits());
        assert_relative_eq!(cmd.omega, 0.0);
        assert!(cmd.vx > 0.0);
        assert!(cmd.is_finite());
    }

    #[test]
    fn test_coupled_zero_translation_goal_collapses_linear() {
        let g = goal(0.0, 0.0, 1.0, 2);
        let cmd = compute_command(&g, &disp(0.0, 0.0, 0.5), &limits());
        assert_relative_eq!(cmd.vx, 0.0);
        assert_relative_eq!(cmd.vy, 0.0);
        assert!(cmd.omega > 0.0);
        assert!(cmd.is_finite());
    }

    #[test]
    fn test_coupled_linear_command_tracks_body_frame() {
        // Goal along +X with rotation; once the robot has turned, the
        // command rotates with it
        let g = goal(1.0, 0.0, 1.0, 2);
        let cmd = compute_command(&g, &disp(0.5, 0.0, 0.5), &limits());
        let speed = cmd.vx.hypot(cmd.vy);
        assert_relative_eq!(cmd.vx, speed * 0.5f32.cos(), epsilon = 1e-5);
        assert_relative_eq!(cmd.vy, -speed * 0.5f32.sin(), epsilon = 1e-5);
    }

    #[test]
    fn test_coupled_negative_heading_goal_is_finite() {
        let g = goal(1.0, 0.0, -1.0, 2);
        let cmd = compute_command(&g, &disp(0.1, 0.0, -0.1), &limits());
        assert!(cmd.is_finite());
        assert!(cmd.omega < 0.0);
    }

    #[test]
    fn test_tangential_arc_curvature() {
        // Quarter circle: chord √2·r for a 90° arc of radius r
        let r = 1.0f32;
        let chord = r * (2.0f32).sqrt();
        let g = goal(chord, 0.0, PI / 2.0, 3);
        let cmd = compute_command(&g, &Displacement::ZERO, &limits());
        assert_relative_eq!(cmd.vx, 0.1, epsilon = 1e-6);
        assert_relative_eq!(cmd.vy, 0.0);
        assert_relative_eq!(cmd.omega, 0.1 / r, epsilon = 1e-5);
    }

    #[test]
    fn test_tangential_arc_zero_heading_falls_back_to_chord() {
        let g = goal(1.0, 0.0, 0.0, 3);
        let cmd = compute_command(&g, &Displacement::ZERO, &limits());
        assert!(cmd.is_finite());
        assert_relative_eq!(cmd.vx, 0.1, epsilon = 1e-6);
        assert_relative_eq!(cmd.vy, 0.0);
        assert_relative_eq!(cmd.omega, 0.0);
    }

    #[test]
    fn test_tangential_arc_negative_heading_turns_negative() {
        let g = goal(1.0, 0.0, -PI / 2.0, 3);
        let cmd = compute_command(&g, &Displacement::ZERO, &limits());
        assert!(cmd.omega < 0.0);
        assert!(cmd.is_finite());
    }

    #[test]
    fn test_zero_triple_signals_completion_for_every_kind() {
        for movement in 0..4u8 {
            let g = goal(0.5, 0.2, 0.4, movement);
            let cmd = compute_command(&g, &disp(0.6, 0.3, 0.5), &limits());
            assert!(cmd.is_zero(), "movement {} not complete", movement);
        }
    }
}
