//! World-to-screen transform pipeline.
//!
//! ```text
//! world --view--> camera --projection--> clip --viewport--> screen (pre-divide)
//! ```
//!
//! `mvp` (projection * view) is kept separately from the combined matrix so
//! segments can be clipped in clip space, before the viewport stage and the
//! perspective divide. Clipping after the divide makes points that cross
//! `w = 0` flip sign or diverge to infinity.

use crate::config::CameraConfig;
use crate::math::mat4::Mat4;
use crate::math::vec3::Vec3;
use crate::math::vec4::Vec4;
use crate::projection::Projection;
use crate::view;
use crate::viewport::Viewport;

/// Result of projecting a line segment.
///
/// When `visible` is false, `a` and `b` hold the raw clip-space endpoints
/// and must not be drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentProjection {
    pub a: Vec4,
    pub b: Vec4,
    pub visible: bool,
}

/// All matrices derived from one camera state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pipeline {
    view: Mat4,
    projection: Mat4,
    viewport: Mat4,
    mvp: Mat4,
    combine: Mat4,
}

impl Pipeline {
    /// Builds view, projection and viewport in that order, then the
    /// composites.
    pub fn build(
        position: Vec3,
        look_at: Vec3,
        fov_degrees: f64,
        width: f64,
        height: f64,
        config: &CameraConfig,
    ) -> Self {
        let view = view::look_at(position, look_at);
        let projection = Projection::for_viewport(fov_degrees, width, height, config).matrix();
        let viewport = Viewport::new(width, height, config).matrix();
        let mvp = Mat4::perspective_mul(&projection, &view);
        let combine = Mat4::viewport_mul(&viewport, &mvp);
        debug_assert!(combine.is_finite(), "non-finite camera transform");

        Self {
            view,
            projection,
            viewport,
            mvp,
            combine,
        }
    }

    pub fn view(&self) -> &Mat4 {
        &self.view
    }

    pub fn projection(&self) -> &Mat4 {
        &self.projection
    }

    pub fn viewport(&self) -> &Mat4 {
        &self.viewport
    }

    /// Projection * view.
    pub fn mvp(&self) -> &Mat4 {
        &self.mvp
    }

    /// Viewport * projection * view.
    pub fn combine(&self) -> &Mat4 {
        &self.combine
    }

    /// Projects a world point to screen space.
    ///
    /// x, y (pixels) and z (depth) are divided by w; w is returned raw.
    /// `w <= 0` means the point is at or behind the camera and the other
    /// components are meaningless.
    pub fn project_point(&self, p: Vec3) -> Vec4 {
        (self.combine * p.to_homogeneous()).perspective_divide()
    }

    /// Projects a world-space segment, clipping it against the near plane.
    pub fn project_segment(&self, a: Vec3, b: Vec3) -> SegmentProjection {
        let mut pa = self.mvp * a.to_homogeneous();
        let mut pb = self.mvp * b.to_homogeneous();

        let behind_a = is_behind_clip(&pa);
        let behind_b = is_behind_clip(&pb);

        if behind_a && behind_b {
            return SegmentProjection {
                a: pa,
                b: pb,
                visible: false,
            };
        }

        if behind_a || behind_b {
            // Parameter where clip z crosses zero along pa -> pb. A zero
            // denominator leaves both endpoints as they are.
            let denominator = pa.z - pb.z;
            if denominator != 0.0 {
                let t = pa.z / denominator;
                let crossing = pa.lerp(pb, t);
                if behind_a {
                    pa = crossing;
                } else {
                    pb = crossing;
                }
            }
        }

        SegmentProjection {
            a: (self.viewport * pa).perspective_divide(),
            b: (self.viewport * pb).perspective_divide(),
            visible: true,
        }
    }
}

fn is_behind_clip(p: &Vec4) -> bool {
    p.w <= 0.0 || p.z < 0.0
}
