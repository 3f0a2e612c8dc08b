//! Viewport transform from normalized device coordinates to pixels.

use crate::config::CameraConfig;
use crate::math::mat4::Mat4;

/// Screen rectangle plus depth range.
///
/// The origin is the top-left pixel; y grows downward, so the y scale is
/// negated relative to clip space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub depth_near: f64,
    pub depth_far: f64,
}

impl Viewport {
    /// Viewport anchored at pixel (0, 0) using the configured depth range.
    pub fn new(width: f64, height: f64, config: &CameraConfig) -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width,
            height,
            depth_near: config.depth_near,
            depth_far: config.depth_far,
        }
    }

    pub fn matrix(&self) -> Mat4 {
        let half_w = self.width / 2.0;
        let half_h = self.height / 2.0;
        let half_depth = (self.depth_far - self.depth_near) / 2.0;
        Mat4::new([
            [half_w, 0.0, 0.0, self.x + half_w],
            [0.0, -half_h, 0.0, self.y + half_h],
            [0.0, 0.0, half_depth, self.depth_near + half_depth],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }
}
