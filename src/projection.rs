//! Perspective projection parameters.
//!
//! The [`Projection`] struct holds the horizontal field of view, the aspect
//! ratio and the near/far planes, and derives the perspective matrix from
//! them. Depth is mapped to `[0, 1]` between the near and far planes, and
//! `w` receives the camera-space z.

use crate::config::CameraConfig;
use crate::math::mat4::Mat4;

/// Perspective projection parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    /// Horizontal field of view in radians.
    fov_x: f64,
    /// Aspect ratio (width / height).
    aspect_ratio: f64,
    /// Near clipping plane distance.
    z_near: f64,
    /// Far clipping plane distance.
    z_far: f64,
}

impl Projection {
    /// Creates a new projection.
    ///
    /// # Arguments
    /// * `fov_x` - Horizontal field of view in radians
    /// * `aspect_ratio` - Width divided by height
    /// * `z_near` - Near clipping plane distance (must be > 0)
    /// * `z_far` - Far clipping plane distance (must be > z_near)
    pub fn new(fov_x: f64, aspect_ratio: f64, z_near: f64, z_far: f64) -> Self {
        Self {
            fov_x,
            aspect_ratio,
            z_near,
            z_far,
        }
    }

    /// Creates a projection for a viewport of `width` x `height` pixels with
    /// a horizontal field of view in degrees.
    pub fn for_viewport(
        fov_x_degrees: f64,
        width: f64,
        height: f64,
        config: &CameraConfig,
    ) -> Self {
        Self::new(
            fov_x_degrees.to_radians(),
            width / height,
            config.near,
            config.far,
        )
    }

    /// Returns the horizontal field of view in radians.
    pub fn fov_x(&self) -> f64 {
        self.fov_x
    }

    /// Returns the vertical field of view in radians.
    ///
    /// Computed from the horizontal FOV and aspect ratio.
    pub fn fov_y(&self) -> f64 {
        2.0 * ((self.fov_x / 2.0).tan() / self.aspect_ratio).atan()
    }

    pub fn aspect_ratio(&self) -> f64 {
        self.aspect_ratio
    }

    pub fn z_near(&self) -> f64 {
        self.z_near
    }

    pub fn z_far(&self) -> f64 {
        self.z_far
    }

    /// Generates the perspective projection matrix.
    pub fn matrix(&self) -> Mat4 {
        let tan_half_y = (self.fov_y() / 2.0).tan();
        let depth = self.z_far - self.z_near;
        Mat4::new([
            [1.0 / (self.aspect_ratio * tan_half_y), 0.0, 0.0, 0.0],
            [0.0, 1.0 / tan_half_y, 0.0, 0.0],
            [0.0, 0.0, self.z_far / depth, -self.z_near * self.z_far / depth],
            [0.0, 0.0, 1.0, 0.0],
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::vec4::Vec4;
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn fov_y_matches_fov_x_for_square_viewport() {
        let proj = Projection::new(FRAC_PI_2, 1.0, 5.0, 500.0);
        assert_relative_eq!(proj.fov_y(), proj.fov_x(), epsilon = 1e-12);
    }

    #[test]
    fn fov_y_narrower_with_wide_aspect() {
        let proj = Projection::new(FRAC_PI_2, 16.0 / 9.0, 5.0, 500.0);
        assert!(proj.fov_y() < proj.fov_x());
    }

    #[test]
    fn for_viewport_converts_degrees() {
        let proj = Projection::for_viewport(90.0, 800.0, 600.0, &CameraConfig::default());
        assert_relative_eq!(proj.fov_x(), FRAC_PI_2);
        assert_relative_eq!(proj.aspect_ratio(), 4.0 / 3.0);
        assert_eq!((proj.z_near(), proj.z_far()), (5.0, 500.0));
    }

    #[test]
    fn matrix_entries_for_90_degrees() {
        let m = Projection::for_viewport(90.0, 800.0, 600.0, &CameraConfig::default()).matrix();
        assert_relative_eq!(m[(0, 0)], 1.0, epsilon = 1e-12);
        assert_relative_eq!(m[(1, 1)], 4.0 / 3.0, epsilon = 1e-12);
        assert_relative_eq!(m[(2, 2)], 500.0 / 495.0);
        assert_relative_eq!(m[(2, 3)], -2500.0 / 495.0);
        assert_eq!(m[(3, 2)], 1.0);
        assert_eq!(m[(3, 3)], 0.0);
    }

    #[test]
    fn near_and_far_map_to_unit_depth() {
        let m = Projection::new(FRAC_PI_2, 1.0, 5.0, 500.0).matrix();
        let near = (m * Vec4::new(0.0, 0.0, 5.0, 1.0)).perspective_divide();
        let far = (m * Vec4::new(0.0, 0.0, 500.0, 1.0)).perspective_divide();
        assert_relative_eq!(near.z, 0.0, epsilon = 1e-12);
        assert_relative_eq!(far.z, 1.0, epsilon = 1e-12);
        assert_eq!(near.w, 5.0);
    }
}
