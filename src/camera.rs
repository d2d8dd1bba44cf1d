//! Viewpoints and billboard orientation.
//!
//! The engine reads the camera once per tick to turn every sprite toward the
//! viewer. It never moves the camera; hosts animate it however they like
//! (scroll timelines, orbit controls) and share it through any of the
//! [`Viewpoint`] impls below.

use glam::{Mat3, Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::rc::Rc;

/// Read-only view of a camera's world placement.
pub trait Viewpoint {
    /// World-space eye position.
    fn eye(&self) -> Vec3;

    /// World-space orientation. The camera looks down its local -Z with +Y up.
    fn orientation(&self) -> Quat;
}

impl<T: Viewpoint + ?Sized> Viewpoint for &T {
    fn eye(&self) -> Vec3 {
        (**self).eye()
    }

    fn orientation(&self) -> Quat {
        (**self).orientation()
    }
}

impl<T: Viewpoint + ?Sized> Viewpoint for Rc<T> {
    fn eye(&self) -> Vec3 {
        (**self).eye()
    }

    fn orientation(&self) -> Quat {
        (**self).orientation()
    }
}

impl<T: Viewpoint + ?Sized> Viewpoint for RefCell<T> {
    fn eye(&self) -> Vec3 {
        self.borrow().eye()
    }

    fn orientation(&self) -> Quat {
        self.borrow().orientation()
    }
}

/// Orbit camera circling a target point.
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitCamera {
    /// Horizontal rotation angle in radians.
    pub yaw: f32,
    /// Vertical rotation angle in radians.
    pitch: f32,
    /// Distance from the target point.
    pub distance: f32,
    /// Point the camera orbits around.
    pub target: Vec3,
}

impl OrbitCamera {
    /// Pitch is kept this far from straight up/down so the view basis stays valid.
    const PITCH_LIMIT: f32 = std::f32::consts::FRAC_PI_2 - 0.01;

    /// Create a new camera with default positioning.
    pub fn new() -> Self {
        Self {
            yaw: 0.0,
            pitch: 0.3,
            distance: 3.0,
            target: Vec3::ZERO,
        }
    }

    /// Vertical rotation angle in radians.
    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    /// Set the vertical angle, clamped short of the poles.
    pub fn set_pitch(&mut self, pitch: f32) {
        self.pitch = pitch.clamp(-Self::PITCH_LIMIT, Self::PITCH_LIMIT);
    }

    /// Calculate the camera's world position.
    pub fn position(&self) -> Vec3 {
        let x = self.distance * self.pitch.cos() * self.yaw.sin();
        let y = self.distance * self.pitch.sin();
        let z = self.distance * self.pitch.cos() * self.yaw.cos();
        self.target + Vec3::new(x, y, z)
    }

    /// Calculate the view matrix for rendering.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position(), self.target, Vec3::Y)
    }
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self::new()
    }
}

impl Viewpoint for OrbitCamera {
    fn eye(&self) -> Vec3 {
        self.position()
    }

    fn orientation(&self) -> Quat {
        look_rotation(self.target - self.position(), Vec3::Y)
    }
}

/// Camera at an explicit eye point looking at a target.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FixedCamera {
    /// Eye position.
    pub eye: Vec3,
    /// Point being looked at.
    pub target: Vec3,
}

impl FixedCamera {
    /// Create a camera at `eye` looking at `target`.
    pub fn new(eye: Vec3, target: Vec3) -> Self {
        Self { eye, target }
    }
}

impl Default for FixedCamera {
    fn default() -> Self {
        Self::new(Vec3::new(0.0, 2.0, 10.0), Vec3::ZERO)
    }
}

impl Viewpoint for FixedCamera {
    fn eye(&self) -> Vec3 {
        self.eye
    }

    fn orientation(&self) -> Quat {
        look_rotation(self.target - self.eye, Vec3::Y)
    }
}

/// Camera placement captured once per tick. Every sprite oriented in that
/// tick faces the same pose.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    /// Eye position.
    pub eye: Vec3,
    /// Orientation.
    pub orientation: Quat,
}

impl CameraPose {
    /// Snapshot any viewpoint.
    pub fn of<V: Viewpoint + ?Sized>(viewpoint: &V) -> Self {
        Self {
            eye: viewpoint.eye(),
            orientation: viewpoint.orientation(),
        }
    }
}

impl Viewpoint for CameraPose {
    fn eye(&self) -> Vec3 {
        self.eye
    }

    fn orientation(&self) -> Quat {
        self.orientation
    }
}

/// How sprites are turned toward the camera.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BillboardMode {
    /// Sprites share the camera's orientation, so all quads lie parallel to
    /// the image plane.
    #[default]
    ViewPlane,
    /// Each sprite turns toward the eye point individually.
    Spherical,
}

/// Rotation that makes a sprite at `position` face `viewpoint`.
///
/// The returned rotation maps the sprite's local +Z onto the direction
/// toward the viewer. When the sprite sits on the eye point the camera
/// orientation is used as is.
pub fn face_camera<V: Viewpoint + ?Sized>(
    mode: BillboardMode,
    position: Vec3,
    viewpoint: &V,
) -> Quat {
    let camera = viewpoint.orientation();
    match mode {
        BillboardMode::ViewPlane => camera,
        BillboardMode::Spherical => {
            let to_eye = viewpoint.eye() - position;
            if to_eye.length_squared() <= f32::EPSILON {
                return camera;
            }
            // Camera up keeps sprites from rolling as the eye orbits.
            look_rotation(-to_eye, camera * Vec3::Y)
        }
    }
}

/// Rotation whose local -Z points along `forward` with `up` as the roll hint.
fn look_rotation(forward: Vec3, up: Vec3) -> Quat {
    let back = -forward.normalize_or_zero();
    if back == Vec3::ZERO {
        return Quat::IDENTITY;
    }
    let mut right = up.cross(back);
    if right.length_squared() <= f32::EPSILON {
        // Looking straight along the up hint; any perpendicular works.
        right = back.any_orthonormal_vector();
    }
    let right = right.normalize();
    let up = back.cross(right);
    Quat::from_mat3(&Mat3::from_cols(right, up, back)).normalize()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_vec_close(a: Vec3, b: Vec3) {
        assert!((a - b).length() < 1e-4, "{a:?} != {b:?}");
    }

    #[test]
    fn test_orbit_orientation_looks_at_target() {
        let mut cam = OrbitCamera::new();
        cam.yaw = 0.7;
        cam.set_pitch(0.4);
        cam.target = Vec3::new(1.0, 0.0, -2.0);
        let forward = cam.orientation() * Vec3::NEG_Z;
        assert_vec_close(forward, (cam.target - cam.position()).normalize());
    }

    #[test]
    fn test_orientation_matches_view_matrix() {
        let cam = OrbitCamera::new();
        let from_view = Quat::from_mat4(&cam.view_matrix().inverse());
        assert!(cam.orientation().dot(from_view).abs() > 0.9999);
    }

    #[test]
    fn test_pitch_clamped() {
        let mut cam = OrbitCamera::new();
        cam.set_pitch(10.0);
        assert!(cam.pitch() < std::f32::consts::FRAC_PI_2);
        cam.set_pitch(-10.0);
        assert!(cam.pitch() > -std::f32::consts::FRAC_PI_2);
    }

    #[test]
    fn test_spherical_billboard_faces_eye() {
        let cam = FixedCamera::new(Vec3::new(0.0, 5.0, 10.0), Vec3::ZERO);
        let position = Vec3::new(3.0, 0.0, -4.0);
        let rotation = face_camera(BillboardMode::Spherical, position, &cam);
        assert_vec_close(rotation * Vec3::Z, (cam.eye - position).normalize());
    }

    #[test]
    fn test_view_plane_billboard_copies_camera() {
        let cam = FixedCamera::new(Vec3::new(4.0, 1.0, 4.0), Vec3::ZERO);
        let rotation = face_camera(
            BillboardMode::ViewPlane,
            Vec3::new(9.0, 9.0, 9.0),
            &cam,
        );
        assert_eq!(rotation, cam.orientation());
    }

    #[test]
    fn test_spherical_on_eye_falls_back() {
        let cam = FixedCamera::default();
        let rotation = face_camera(BillboardMode::Spherical, cam.eye, &cam);
        assert_eq!(rotation, cam.orientation());
    }

    #[test]
    fn test_straight_down_is_finite() {
        let cam = FixedCamera::new(Vec3::new(0.0, 10.0, 0.0), Vec3::ZERO);
        let q = cam.orientation();
        assert!(q.is_finite());
        assert_vec_close(q * Vec3::NEG_Z, Vec3::NEG_Y);
    }

    #[test]
    fn test_shared_camera_tracks_moves() {
        let cam = Rc::new(RefCell::new(FixedCamera::default()));
        let shared = Rc::clone(&cam);
        cam.borrow_mut().eye = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(shared.eye(), Vec3::new(1.0, 2.0, 3.0));
    }
}
