//! Angle wrapping and frame-rotation primitives.

use std::f32::consts::{PI, TAU};

/// Wrap an angular delta into (−π, π].
///
/// Used to unwrap consecutive heading samples: the raw difference between
/// two headings can jump by almost 2π when the reported angle crosses ±π,
/// while the physical rotation between samples is small. Wrapping the
/// delta recovers the physical step.
///
/// Note the half-open interval: −π maps to +π, so a step of exactly half a
/// turn is always reported as positive.
///
/// # Example
/// ```
/// use gati_motion::core::math::wrap_delta;
/// use std::f32::consts::PI;
///
/// // Crossing +π: reported delta is almost +2π, physical step is small
/// assert!((wrap_delta(2.0 * PI - 0.2) - (-0.2)).abs() < 1e-6);
/// assert!((wrap_delta(-PI) - PI).abs() < 1e-6);
/// ```
#[inline]
pub fn wrap_delta(delta: f32) -> f32 {
    let mut d = delta;
    while d <= -PI {
        d += TAU;
    }
    while d > PI {
        d -= TAU;
    }
    d
}

/// Express a world-frame displacement in a frame rotated by `frame_theta`.
///
/// Applies a single 2×2 rotation by `-frame_theta`. Always computed from
/// the raw world-frame deltas rather than incrementally, so repeated calls
/// do not compound rounding error.
#[inline]
pub fn rotate_into_frame(dx: f32, dy: f32, frame_theta: f32) -> (f32, f32) {
    let (sin_t, cos_t) = frame_theta.sin_cos();
    (dx * cos_t + dy * sin_t, dy * cos_t - dx * sin_t)
}
