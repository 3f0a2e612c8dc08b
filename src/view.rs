//! View matrix construction.
//!
//! The camera basis uses `forward = target - eye` as its z axis (the camera
//! looks down **+Z** in camera space, left-handed). The projection depth row
//! and the `w = z` perspective source are derived for this orientation, so
//! the sign must not be flipped.

use crate::math::mat4::Mat4;
use crate::math::vec3::Vec3;

/// Orthonormal camera axes in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraBasis {
    pub right: Vec3,
    pub up: Vec3,
    pub forward: Vec3,
}

impl CameraBasis {
    /// Derives the basis from an eye position and a look-at target, with
    /// world +Y as the reference up direction.
    ///
    /// `eye == target`, or a target straight above or below the eye, yields
    /// zero axes and a degenerate basis; callers reject both cases before
    /// getting here.
    pub fn from_look_at(eye: Vec3, target: Vec3) -> Self {
        let world_up = Vec3::UP.normalize();
        let forward = (target - eye).normalize();
        let right = world_up.cross(forward).normalize();
        let up = forward.cross(right);
        Self { right, up, forward }
    }
}

/// Builds the world-to-camera matrix for `eye` looking at `target`.
///
/// Rows are the basis vectors; the last column is `-basis . eye` per axis.
pub fn look_at(eye: Vec3, target: Vec3) -> Mat4 {
    let CameraBasis { right, up, forward } = CameraBasis::from_look_at(eye, target);

    Mat4::new([
        [right.x, right.y, right.z, -right.dot(eye)],
        [up.x, up.y, up.z, -up.dot(eye)],
        [forward.x, forward.y, forward.z, -forward.dot(eye)],
        [0.0, 0.0, 0.0, 1.0],
    ])
}
