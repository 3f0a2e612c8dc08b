//! Look-at perspective camera
//!
//! # Coordinate System
//!
//! Uses a **left-handed** coordinate system:
//! - X: positive right
//! - Y: positive up
//! - Z: positive forward (into screen)
//!
//! # Update model
//!
//! Mutators only record the change and mark the camera [`MatrixState::Dirty`].
//! Matrices are rebuilt by [`Camera3D::update`], once per frame, so several
//! mutations cost a single rebuild. Projection queries use whatever matrices
//! were built last.

use log::{debug, trace, warn};

use crate::config::CameraConfig;
use crate::error::{CameraError, CameraResult};
use crate::math::mat4::Mat4;
use crate::math::vec2::Vec2;
use crate::math::vec3::Vec3;
use crate::math::vec4::Vec4;
use crate::pipeline::{Pipeline, SegmentProjection};

/// Vertical component above which a pitch rotation is rejected.
const PITCH_LIMIT: f64 = 0.9;

/// Minimum horizontal extent of a unit look direction.
const VERTICAL_EPSILON: f64 = 1e-6;

/// Whether the cached matrices reflect the current camera parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatrixState {
    Clean,
    Dirty,
}

/// Perspective camera described by position, target and field of view.
#[derive(Debug, Clone)]
pub struct Camera3D {
    position: Vec3,
    look_at: Vec3,
    fov: f64, // Horizontal, degrees
    width: f64,
    height: f64,
    config: CameraConfig,

    state: MatrixState,
    pipeline: Pipeline,
}

impl Camera3D {
    /// Creates a camera with the default clip planes (near 5, far 500) and
    /// builds its matrices.
    pub fn new(
        position: Vec3,
        look_at: Vec3,
        fov: f64,
        width: f64,
        height: f64,
    ) -> CameraResult<Self> {
        Self::with_config(position, look_at, fov, width, height, CameraConfig::default())
    }

    pub fn with_config(
        position: Vec3,
        look_at: Vec3,
        fov: f64,
        width: f64,
        height: f64,
        config: CameraConfig,
    ) -> CameraResult<Self> {
        config.validate().inspect_err(|e| warn!("camera rejected: {e}"))?;
        check_direction(position, look_at)?;
        check_fov(fov)?;
        check_viewport(width, height)?;

        let pipeline = Pipeline::build(position, look_at, fov, width, height, &config);
        debug!("camera created at {:?} looking at {:?}", position, look_at);

        Ok(Self {
            position,
            look_at,
            fov,
            width,
            height,
            config,
            state: MatrixState::Clean,
            pipeline,
        })
    }

    // =========================================================================
    // Update
    // =========================================================================

    /// Rebuilds all matrices if any parameter changed since the last update.
    pub fn update(&mut self) {
        if self.state == MatrixState::Clean {
            return;
        }
        self.pipeline = Pipeline::build(
            self.position,
            self.look_at,
            self.fov,
            self.width,
            self.height,
            &self.config,
        );
        self.state = MatrixState::Clean;
        debug!(
            "camera matrices rebuilt: pos={:?} look_at={:?} fov={}",
            self.position, self.look_at, self.fov
        );
    }

    pub fn state(&self) -> MatrixState {
        self.state
    }

    pub fn is_dirty(&self) -> bool {
        self.state == MatrixState::Dirty
    }

    fn mark_dirty(&mut self) {
        self.state = MatrixState::Dirty;
    }

    // =========================================================================
    // Movement and rotation
    // =========================================================================

    /// Moves the camera and its target together.
    ///
    /// `direction.x` moves along the look direction and `direction.z` sideways,
    /// both projected onto the horizontal plane so pitch does not change
    /// altitude. `direction.y` is a plain vertical translation.
    pub fn move_by(&mut self, direction: Vec3) {
        if direction.length() == 0.0 {
            trace!("move_by ignored: zero direction");
            return;
        }
        let heading = Vec2::new(
            self.look_at.x - self.position.x,
            self.look_at.z - self.position.z,
        );
        let forward = heading.normalize() * direction.x;
        let sideways = heading.perp().normalize() * direction.z;
        let step = forward + sideways;
        let offset = Vec3::new(step.x, direction.y, step.y);

        self.position = self.position + offset;
        self.look_at = self.look_at + offset;
        self.mark_dirty();
    }

    /// Turns the look direction about the world vertical axis.
    ///
    /// The target is placed one unit from the camera afterwards.
    pub fn yaw(&mut self, radians: f64) {
        if radians == 0.0 {
            return;
        }
        let dir = self.forward();
        let (sin, cos) = radians.sin_cos();
        let rotated = Vec3::new(dir.x * cos - dir.z * sin, dir.y, dir.x * sin + dir.z * cos);

        self.look_at = self.position + rotated;
        self.mark_dirty();
    }

    /// Tilts the look direction about the camera's right axis.
    ///
    /// Positive values look up. A rotation whose result would point within
    /// the vertical limit (|y| > 0.9) is rejected and leaves the camera
    /// untouched. The target is placed one unit from the camera afterwards.
    pub fn pitch(&mut self, radians: f64) {
        if radians == 0.0 {
            return;
        }
        // Rodrigues' rotation of the backward vector about the right axis.
        let back = (self.position - self.look_at).normalize();
        let axis = Vec3::UP.cross(back).normalize();
        let (sin, cos) = radians.sin_cos();
        let rotated = back * cos + axis.cross(back) * sin + axis * (axis.dot(back) * (1.0 - cos));

        if rotated.dot(Vec3::UP).abs() > PITCH_LIMIT {
            trace!("pitch rejected: too close to vertical");
            return;
        }
        self.look_at = self.position - rotated;
        self.mark_dirty();
    }

    /// Adds `delta` degrees to the horizontal field of view.
    ///
    /// A result outside (0, 180) is rejected and the FOV is left unchanged.
    pub fn change_fov(&mut self, delta: f64) -> CameraResult<()> {
        self.set_fov(self.fov + delta)
    }

    // =========================================================================
    // Setters
    // =========================================================================

    pub fn set_fov(&mut self, fov: f64) -> CameraResult<()> {
        check_fov(fov)?;
        self.fov = fov;
        self.mark_dirty();
        Ok(())
    }

    /// Resizes the viewport (e.g. on window resize).
    pub fn set_viewport(&mut self, width: f64, height: f64) -> CameraResult<()> {
        check_viewport(width, height)?;
        self.width = width;
        self.height = height;
        self.mark_dirty();
        Ok(())
    }

    /// Teleports the camera, keeping the current target.
    pub fn set_position(&mut self, position: Vec3) -> CameraResult<()> {
        check_direction(position, self.look_at)?;
        self.position = position;
        self.mark_dirty();
        Ok(())
    }

    pub fn set_look_at(&mut self, look_at: Vec3) -> CameraResult<()> {
        check_direction(self.position, look_at)?;
        self.look_at = look_at;
        self.mark_dirty();
        Ok(())
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn look_at(&self) -> Vec3 {
        self.look_at
    }

    /// Returns the normalized look direction.
    pub fn forward(&self) -> Vec3 {
        (self.look_at - self.position).normalize()
    }

    /// Horizontal field of view in degrees.
    pub fn fov(&self) -> f64 {
        self.fov
    }

    pub fn viewport_size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    pub fn config(&self) -> &CameraConfig {
        &self.config
    }

    pub fn view_matrix(&self) -> &Mat4 {
        self.pipeline.view()
    }

    pub fn projection_matrix(&self) -> &Mat4 {
        self.pipeline.projection()
    }

    pub fn viewport_matrix(&self) -> &Mat4 {
        self.pipeline.viewport()
    }

    pub fn mvp(&self) -> &Mat4 {
        self.pipeline.mvp()
    }

    pub fn combine_matrix(&self) -> &Mat4 {
        self.pipeline.combine()
    }

    /// See [`Pipeline::project_point`].
    pub fn project_point(&self, p: Vec3) -> Vec4 {
        self.pipeline.project_point(p)
    }

    /// See [`Pipeline::project_segment`].
    pub fn project_segment(&self, a: Vec3, b: Vec3) -> SegmentProjection {
        self.pipeline.project_segment(a, b)
    }

    // =========================================================================
    // Diagnostics
    // =========================================================================

    pub fn dump_view_matrix(&self) -> String {
        self.view_matrix().to_string()
    }

    pub fn dump_projection_matrix(&self) -> String {
        self.projection_matrix().to_string()
    }

    pub fn dump_viewport_matrix(&self) -> String {
        self.viewport_matrix().to_string()
    }

    pub fn dump_combine_matrix(&self) -> String {
        self.combine_matrix().to_string()
    }
}

fn check_direction(position: Vec3, look_at: Vec3) -> CameraResult<()> {
    if !position.is_finite() || !look_at.is_finite() {
        warn!("camera rejected non-finite coordinate");
        return Err(CameraError::NonFinite);
    }
    // Offsets that underflow in `length` count as coincident points.
    let offset = look_at - position;
    if offset.length() == 0.0 {
        warn!("camera rejected look-at equal to position {:?}", position);
        return Err(CameraError::DegenerateDirection);
    }
    let dir = offset.normalize();
    if (dir.x * dir.x + dir.z * dir.z).sqrt() < VERTICAL_EPSILON {
        warn!("camera rejected vertical look direction {:?}", dir);
        return Err(CameraError::VerticalDirection);
    }
    Ok(())
}

fn check_fov(fov: f64) -> CameraResult<()> {
    if !(fov > 0.0 && fov < 180.0) {
        warn!("camera rejected field of view {}", fov);
        return Err(CameraError::InvalidFov(fov));
    }
    Ok(())
}

fn check_viewport(width: f64, height: f64) -> CameraResult<()> {
    let valid = |v: f64| v.is_finite() && v > 0.0;
    if !valid(width) || !valid(height) {
        warn!("camera rejected viewport {}x{}", width, height);
        return Err(CameraError::InvalidViewport { width, height });
    }
    Ok(())
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_PI_2;

    fn camera() -> Camera3D {
        Camera3D::new(Vec3::new(0.0, 0.0, -10.0), Vec3::ZERO, 90.0, 800.0, 600.0).unwrap()
    }

    #[test]
    fn starts_clean() {
        let cam = camera();
        assert_eq!(cam.state(), MatrixState::Clean);
        assert_eq!(cam.config(), &CameraConfig::default());
    }

    #[test]
    fn rejects_degenerate_construction() {
        let p = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(
            Camera3D::new(p, p, 90.0, 800.0, 600.0).unwrap_err(),
            CameraError::DegenerateDirection
        );
        assert!(matches!(
            Camera3D::new(p, Vec3::ZERO, 180.0, 800.0, 600.0),
            Err(CameraError::InvalidFov(_))
        ));
        assert!(matches!(
            Camera3D::new(p, Vec3::ZERO, 60.0, 800.0, 0.0),
            Err(CameraError::InvalidViewport { .. })
        ));
        assert_eq!(
            Camera3D::new(Vec3::new(f64::NAN, 0.0, 0.0), Vec3::ZERO, 60.0, 8.0, 6.0).unwrap_err(),
            CameraError::NonFinite
        );
    }

    #[test]
    fn mutators_defer_rebuild() {
        let mut cam = camera();
        let before = *cam.view_matrix();
        cam.move_by(Vec3::new(1.0, 0.0, 0.0));
        assert!(cam.is_dirty());
        assert_eq!(*cam.view_matrix(), before);

        cam.update();
        assert!(!cam.is_dirty());
        assert_ne!(*cam.view_matrix(), before);
    }

    #[test]
    fn zero_mutations_keep_camera_clean() {
        let mut cam = camera();
        let combine = *cam.combine_matrix();
        cam.move_by(Vec3::ZERO);
        cam.yaw(0.0);
        cam.pitch(0.0);
        assert_eq!(cam.state(), MatrixState::Clean);
        assert_eq!(*cam.combine_matrix(), combine);
        cam.update();
        assert_eq!(*cam.combine_matrix(), combine);
    }

    #[test]
    fn move_forward_follows_heading() {
        let mut cam = camera();
        cam.move_by(Vec3::new(2.0, 0.0, 0.0));
        assert_relative_eq!(cam.position(), Vec3::new(0.0, 0.0, -8.0));
        assert_relative_eq!(cam.look_at(), Vec3::new(0.0, 0.0, 2.0));
    }

    #[test]
    fn move_sideways_and_up() {
        let mut cam = camera();
        cam.move_by(Vec3::new(0.0, 3.0, 1.0));
        // Perpendicular of heading (0, 1) on the X/Z plane is (-1, 0).
        assert_relative_eq!(cam.position(), Vec3::new(-1.0, 3.0, -10.0));
        assert_relative_eq!(cam.look_at(), Vec3::new(-1.0, 3.0, 0.0));
    }

    #[test]
    fn move_stays_level_when_pitched() {
        let mut cam = camera();
        cam.pitch(0.5);
        let y = cam.position().y;
        cam.move_by(Vec3::new(4.0, 0.0, 0.0));
        assert_relative_eq!(cam.position().y, y);
        assert_relative_eq!(cam.position().distance_squared(Vec3::new(0.0, 0.0, -10.0)), 16.0);
    }

    #[test]
    fn yaw_quarter_turn() {
        let mut cam = camera();
        cam.yaw(FRAC_PI_2);
        // Forward (0, 0, 1) rotated: x = -sin, z = cos.
        assert_relative_eq!(cam.forward(), Vec3::new(-1.0, 0.0, 0.0), epsilon = 1e-12);
        assert_relative_eq!(cam.look_at(), Vec3::new(-1.0, 0.0, -10.0), epsilon = 1e-12);
        assert!(cam.is_dirty());
    }

    #[test]
    fn pitch_up_tilts_target() {
        let mut cam = camera();
        cam.pitch(0.3);
        let f = cam.forward();
        assert_relative_eq!(f.y, 0.3f64.sin(), epsilon = 1e-12);
        assert_relative_eq!(f.z, 0.3f64.cos(), epsilon = 1e-12);
        assert_relative_eq!(f.x, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn pitch_stops_near_vertical() {
        let mut cam = camera();
        for _ in 0..3 {
            cam.pitch(0.3);
        }
        cam.update();
        let last = cam.look_at();
        assert!(cam.forward().y < PITCH_LIMIT);

        // 1.2 rad would give sin(1.2) > 0.9.
        cam.pitch(0.3);
        assert_eq!(cam.look_at(), last);
        assert_eq!(cam.state(), MatrixState::Clean);
    }

    #[test]
    fn pitch_stops_near_vertical_downward() {
        let mut cam = camera();
        for _ in 0..3 {
            cam.pitch(-0.3);
        }
        cam.update();
        let last = cam.look_at();
        assert_relative_eq!(cam.forward().y, (-0.9f64).sin(), epsilon = 1e-12);

        // sin(-1.2) < -0.9.
        cam.pitch(-0.3);
        assert_eq!(cam.look_at(), last);
        assert_eq!(cam.state(), MatrixState::Clean);
    }

    #[test]
    fn rejects_vertical_look_direction() {
        assert_eq!(
            Camera3D::new(Vec3::ZERO, Vec3::new(0.0, 5.0, 0.0), 90.0, 800.0, 600.0).unwrap_err(),
            CameraError::VerticalDirection
        );
        assert_eq!(
            Camera3D::new(Vec3::ZERO, Vec3::new(0.0, -2.0, 0.0), 90.0, 800.0, 600.0).unwrap_err(),
            CameraError::VerticalDirection
        );
    }

    #[test]
    fn rejects_underflowing_offset() {
        let target = Vec3::new(f64::MIN_POSITIVE * 1e-10, 0.0, 0.0);
        assert_eq!(
            Camera3D::new(Vec3::ZERO, target, 90.0, 800.0, 600.0).unwrap_err(),
            CameraError::DegenerateDirection
        );
    }

    #[test]
    fn setters_reject_vertical_direction() {
        let mut cam = camera();
        assert_eq!(
            cam.set_look_at(Vec3::new(0.0, 40.0, -10.0)),
            Err(CameraError::VerticalDirection)
        );
        assert_eq!(
            cam.set_position(Vec3::new(0.0, -25.0, 0.0)),
            Err(CameraError::VerticalDirection)
        );
        assert_eq!(cam.position(), Vec3::new(0.0, 0.0, -10.0));
        assert_eq!(cam.look_at(), Vec3::ZERO);
        assert!(!cam.is_dirty());
    }

    #[test]
    fn steep_look_direction_keeps_orthonormal_basis() {
        let cam = Camera3D::new(Vec3::ZERO, Vec3::new(0.1, 5.0, 0.0), 90.0, 800.0, 600.0).unwrap();
        let view = cam.view_matrix();
        for r in 0..3 {
            assert_relative_eq!(Vec3::from(view.row(r)).length(), 1.0, epsilon = 1e-9);
        }
        let a = cam.project_point(Vec3::new(10.0, 50.0, 0.0));
        let b = cam.project_point(Vec3::new(-30.0, 50.0, 20.0));
        assert!((a.x - b.x).abs() > 1.0 || (a.y - b.y).abs() > 1.0);
    }

    #[test]
    fn change_fov_validates_result() {
        let mut cam = camera();
        cam.change_fov(-30.0).unwrap();
        assert_eq!(cam.fov(), 60.0);
        assert!(cam.is_dirty());

        cam.update();
        assert_eq!(cam.change_fov(-60.0), Err(CameraError::InvalidFov(0.0)));
        assert_eq!(cam.fov(), 60.0);
        assert!(!cam.is_dirty());
    }

    #[test]
    fn set_look_at_rejects_position() {
        let mut cam = camera();
        let err = cam.set_look_at(cam.position()).unwrap_err();
        assert_eq!(err, CameraError::DegenerateDirection);
        assert_eq!(cam.look_at(), Vec3::ZERO);
        assert!(!cam.is_dirty());
    }

    #[test]
    fn set_viewport_recenters() {
        let mut cam = camera();
        cam.set_viewport(1920.0, 1080.0).unwrap();
        cam.update();
        let s = cam.project_point(Vec3::ZERO);
        assert_relative_eq!(s.x, 960.0, epsilon = 1e-9);
        assert_relative_eq!(s.y, 540.0, epsilon = 1e-9);
    }

    #[test]
    fn dumps_have_four_rows() {
        let cam = camera();
        for dump in [
            cam.dump_view_matrix(),
            cam.dump_projection_matrix(),
            cam.dump_viewport_matrix(),
            cam.dump_combine_matrix(),
        ] {
            assert_eq!(dump.lines().count(), 4);
            assert!(dump.lines().all(|l| l.split(", ").count() == 4));
        }
        assert!(cam
            .dump_viewport_matrix()
            .starts_with("400.0000, 0.0000, 0.0000, 400.0000\n"));
    }
}
