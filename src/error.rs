//! Error types for gati-motion.

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, MotionError>;

/// gati-motion error type
#[derive(Error, Debug)]
pub enum MotionError {
    /// A goal field carried a code outside its enumerated range.
    ///
    /// Reported synchronously before any state mutation; the offending
    /// field is named.
    #[error("invalid goal: {field} = {value} is out of range")]
    InvalidGoal {
        /// Wire name of the rejected field
        field: &'static str,
        /// The out-of-range code
        value: u8,
    },

    /// A goal arrived before the first odometry sample established an
    /// origin. Reported synchronously; no state change.
    #[error("odometry not initialized")]
    OdometryNotReady,

    /// Execution was interrupted externally (shutdown, or a malformed
    /// replacement goal during preemption). A zero velocity command is
    /// always forced before this is reported.
    #[error("execution aborted: {0}")]
    Aborted(String),

    /// Configuration read or parse failure.
    #[error("configuration error: {0}")]
    Config(String),
}

impl From<toml::de::Error> for MotionError {
    fn from(e: toml::de::Error) -> Self {
        MotionError::Config(e.to_string())
    }
}
