//! Error types for camera construction and mutation.
//!
//! Geometry that would make the transform matrices degenerate (NaN or
//! infinite entries) is rejected here instead of being propagated silently
//! to projection queries.

use std::fmt;

/// Result type for camera operations.
pub type CameraResult<T> = Result<T, CameraError>;

#[derive(Debug, Clone, PartialEq)]
pub enum CameraError {
    /// Look-at target coincides with the camera position.
    DegenerateDirection,

    /// Look direction parallel to world up, leaving no horizontal heading.
    VerticalDirection,

    /// Horizontal field of view outside the open interval (0, 180) degrees.
    InvalidFov(f64),

    /// Viewport width or height not strictly positive and finite.
    InvalidViewport { width: f64, height: f64 },

    /// Clip-plane or depth-range configuration is inconsistent.
    InvalidConfig(String),

    /// A position or target contains NaN or infinity.
    NonFinite,
}

impl fmt::Display for CameraError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CameraError::DegenerateDirection => {
                write!(f, "Look-at target must differ from camera position")
            }
            CameraError::VerticalDirection => {
                write!(f, "Look direction must not be vertical")
            }
            CameraError::InvalidFov(fov) => {
                write!(f, "Field of view {} is outside (0, 180) degrees", fov)
            }
            CameraError::InvalidViewport { width, height } => {
                write!(f, "Invalid viewport size {}x{}", width, height)
            }
            CameraError::InvalidConfig(msg) => write!(f, "Invalid camera config: {}", msg),
            CameraError::NonFinite => write!(f, "Non-finite coordinate"),
        }
    }
}

impl std::error::Error for CameraError {}
