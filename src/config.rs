//! Configuration loading for gati-motion.

use crate::error::{MotionError, Result};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// Main configuration structure
#[derive(Clone, Debug, Deserialize)]
pub struct GatiConfig {
    /// Kinematic limits and profile tuning
    #[serde(default)]
    pub limits: MotionLimits,
    /// Control-loop settings
    #[serde(default)]
    pub control: ControlConfig,
}

/// Kinematic limits and velocity-profile tuning.
///
/// Read once at startup, immutable during execution.
#[derive(Clone, Debug, Deserialize)]
pub struct MotionLimits {
    /// Minimum linear velocity in m/s (default: 0.05)
    #[serde(default = "default_min_linear_vel")]
    pub min_linear_vel: f32,

    /// Maximum linear velocity in m/s (default: 0.1)
    #[serde(default = "default_max_linear_vel")]
    pub max_linear_vel: f32,

    /// Linear acceleration in m/s² (default: 0.2)
    #[serde(default = "default_linear_accel")]
    pub linear_accel: f32,

    /// Minimum angular velocity in rad/s (default: 0.04)
    #[serde(default = "default_min_angular_vel")]
    pub min_angular_vel: f32,

    /// Maximum angular velocity in rad/s (default: 0.2)
    #[serde(default = "default_max_angular_vel")]
    pub max_angular_vel: f32,

    /// Angular acceleration in rad/s² (default: 0.2)
    #[serde(default = "default_angular_accel")]
    pub angular_accel: f32,

    /// Fraction of the total distance spent in each of the acceleration
    /// and deceleration phases of the trapezoidal profile (default: 0.1)
    #[serde(default = "default_blend_fraction")]
    pub blend_fraction: f32,

    /// Linear tolerance below which a goal axis counts as already
    /// satisfied at acceptance, in meters (default: 0.02)
    #[serde(default = "default_linear_goal_tolerance")]
    pub linear_goal_tolerance: f32,

    /// Angular tolerance below which the rotation goal counts as already
    /// satisfied at acceptance, in radians (default: 0.01)
    #[serde(default = "default_angular_goal_tolerance")]
    pub angular_goal_tolerance: f32,

    /// Fraction of each axis allocated to the parabolic ramp windows of
    /// the coupled translational-rotational profile (default: 0.2)
    #[serde(default = "default_coupled_blend_window")]
    pub coupled_blend_window: f32,
}

/// Control-loop settings
#[derive(Clone, Debug, Deserialize)]
pub struct ControlConfig {
    /// Tick rate of the control loop in Hz (default: 10.0)
    #[serde(default = "default_tick_rate")]
    pub tick_rate_hz: f32,
}

// Default value functions
fn default_min_linear_vel() -> f32 {
    0.05
}
fn default_max_linear_vel() -> f32 {
    0.1
}
fn default_linear_accel() -> f32 {
    0.2
}
fn default_min_angular_vel() -> f32 {
    0.04
}
fn default_max_angular_vel() -> f32 {
    0.2
}
fn default_angular_accel() -> f32 {
    0.2
}
fn default_blend_fraction() -> f32 {
    0.1
}
fn default_linear_goal_tolerance() -> f32 {
    0.02
}
fn default_angular_goal_tolerance() -> f32 {
    0.01
}
fn default_coupled_blend_window() -> f32 {
    0.2
}
fn default_tick_rate() -> f32 {
    10.0
}

impl Default for MotionLimits {
    fn default() -> Self {
        Self {
            min_linear_vel: default_min_linear_vel(),
            max_linear_vel: default_max_linear_vel(),
            linear_accel: default_linear_accel(),
            min_angular_vel: default_min_angular_vel(),
            max_angular_vel: default_max_angular_vel(),
            angular_accel: default_angular_accel(),
            blend_fraction: default_blend_fraction(),
            linear_goal_tolerance: default_linear_goal_tolerance(),
            angular_goal_tolerance: default_angular_goal_tolerance(),
            coupled_blend_window: default_coupled_blend_window(),
        }
    }
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            tick_rate_hz: default_tick_rate(),
        }
    }
}

impl Default for GatiConfig {
    fn default() -> Self {
        Self {
            limits: MotionLimits::default(),
            control: ControlConfig::default(),
        }
    }
}

impl ControlConfig {
    /// Duration of one control tick.
    pub fn tick_period(&self) -> Duration {
        Duration::from_secs_f32(1.0 / self.tick_rate_hz)
    }
}

impl GatiConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| MotionError::Config(format!("Failed to read config file: {}", e)))?;
        let config: GatiConfig = toml::from_str(&content)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_defaults_match_reference_parameters() {
        let limits = MotionLimits::default();
        assert_relative_eq!(limits.min_linear_vel, 0.05);
        assert_relative_eq!(limits.max_linear_vel, 0.1);
        assert_relative_eq!(limits.linear_accel, 0.2);
        assert_relative_eq!(limits.min_angular_vel, 0.04);
        assert_relative_eq!(limits.max_angular_vel, 0.2);
        assert_relative_eq!(limits.angular_accel, 0.2);
        assert_relative_eq!(limits.blend_fraction, 0.1);
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: GatiConfig = toml::from_str(
            r#"
            [limits]
            max_linear_vel = 0.3

            [control]
            tick_rate_hz = 20.0
            "#,
        )
        .unwrap();

        assert_relative_eq!(config.limits.max_linear_vel, 0.3);
        assert_relative_eq!(config.limits.min_linear_vel, 0.05);
        assert_relative_eq!(config.control.tick_rate_hz, 20.0);
    }

    #[test]
    fn test_empty_toml_is_all_defaults() {
        let config: GatiConfig = toml::from_str("").unwrap();
        assert_relative_eq!(config.limits.blend_fraction, 0.1);
        assert_relative_eq!(config.control.tick_rate_hz, 10.0);
    }

    #[test]
    fn test_tick_period() {
        let control = ControlConfig { tick_rate_hz: 10.0 };
        assert_eq!(control.tick_period(), Duration::from_millis(100));
    }
}
