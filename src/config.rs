//! Clip-plane and depth-range configuration.

use crate::error::{CameraError, CameraResult};

pub const DEFAULT_NEAR: f64 = 5.0;
pub const DEFAULT_FAR: f64 = 500.0;
pub const DEFAULT_DEPTH_NEAR: f64 = 0.0;
pub const DEFAULT_DEPTH_FAR: f64 = 1.0;

/// Fixed parameters shared by the projection and viewport stages.
///
/// `near`/`far` are camera-space distances of the clip planes.
/// `depth_near`/`depth_far` bound the viewport depth range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraConfig {
    pub near: f64,
    pub far: f64,
    pub depth_near: f64,
    pub depth_far: f64,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            near: DEFAULT_NEAR,
            far: DEFAULT_FAR,
            depth_near: DEFAULT_DEPTH_NEAR,
            depth_far: DEFAULT_DEPTH_FAR,
        }
    }
}

impl CameraConfig {
    pub fn with_near_far(mut self, near: f64, far: f64) -> Self {
        self.near = near;
        self.far = far;
        self
    }

    pub fn with_depth_range(mut self, depth_near: f64, depth_far: f64) -> Self {
        self.depth_near = depth_near;
        self.depth_far = depth_far;
        self
    }

    pub fn validate(&self) -> CameraResult<()> {
        let all_finite = [self.near, self.far, self.depth_near, self.depth_far]
            .iter()
            .all(|v| v.is_finite());
        if !all_finite {
            return Err(CameraError::InvalidConfig(
                "clip planes and depth range must be finite".into(),
            ));
        }
        if self.near <= 0.0 || self.far <= self.near {
            return Err(CameraError::InvalidConfig(format!(
                "expected 0 < near < far, got near={} far={}",
                self.near, self.far
            )));
        }
        if self.depth_far <= self.depth_near {
            return Err(CameraError::InvalidConfig(format!(
                "expected depth_near < depth_far, got {}..{}",
                self.depth_near, self.depth_far
            )));
        }
        Ok(())
    }
}
