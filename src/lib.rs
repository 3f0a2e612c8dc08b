//! A 3D perspective camera and world-to-screen transform engine.
//!
//! This crate builds the view, projection and viewport matrices for a
//! look-at camera, combines them, and projects points and near-plane-clipped
//! line segments to pixel coordinates. Drawing is left to the caller.
//!
//! # Quick Start
//!
//! ```
//! use dango_camera::prelude::*;
//!
//! let mut camera = Camera3D::new(Vec3::new(0.0, 0.0, -10.0), Vec3::ZERO, 90.0, 800.0, 600.0)?;
//! camera.yaw(0.1);
//! camera.update();
//!
//! let seg = camera.project_segment(Vec3::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, -30.0));
//! if seg.visible {
//!     // draw a line from (seg.a.x, seg.a.y) to (seg.b.x, seg.b.y)
//! }
//! # Ok::<(), dango_camera::CameraError>(())
//! ```

pub mod camera;
pub mod config;
pub mod error;
pub mod math;
pub mod pipeline;
pub mod projection;
pub mod view;
pub mod viewport;

// Re-export commonly needed types at crate root for convenience
pub use camera::{Camera3D, MatrixState};
pub use config::CameraConfig;
pub use error::{CameraError, CameraResult};
pub use pipeline::{Pipeline, SegmentProjection};
pub use projection::Projection;
pub use viewport::Viewport;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::camera::{Camera3D, MatrixState};
    pub use crate::config::CameraConfig;
    pub use crate::error::{CameraError, CameraResult};
    pub use crate::pipeline::SegmentProjection;

    // Math
    pub use crate::math::mat4::Mat4;
    pub use crate::math::vec3::Vec3;
    pub use crate::math::vec4::Vec4;
}
