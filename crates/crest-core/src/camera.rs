//! Camera description and the deterministic framing computed from a
//! normalized model's bounding size.

use glam::{Mat4, Vec3};

use crate::constants::{
    camera_eye_dir, CAMERA_FAR, CAMERA_FOV_DEG, CAMERA_NEAR, FIT_HEADROOM, MODEL_LIFT_FACTOR,
    TARGET_DROP_FACTOR,
};

/// Simple right-handed camera with perspective projection.
#[derive(Clone, Debug)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub aspect: f32,
    pub fovy_radians: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl Camera {
    /// Camera as configured before any model is loaded.
    pub fn initial(aspect: f32) -> Self {
        Self {
            eye: Vec3::new(0.8, 0.6, 2.2),
            target: Vec3::ZERO,
            up: Vec3::Y,
            aspect,
            fovy_radians: CAMERA_FOV_DEG.to_radians(),
            znear: CAMERA_NEAR,
            zfar: CAMERA_FAR,
        }
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fovy_radians, self.aspect, self.znear, self.zfar)
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    pub fn view_proj(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}

/// Output of the framing computation: where the camera goes, where it looks,
/// and how far the model is lifted above the baseline.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Framing {
    pub distance: f32,
    pub model_lift: f32,
    pub eye: Vec3,
    pub target: Vec3,
}

/// Compute camera placement for a model of the given bounding size.
///
/// Pure function of its inputs: calling it twice with the same bounds yields
/// the same framing, regardless of any prior camera state.
pub fn frame_model(max_dim: f32, fovy_radians: f32, aspect: f32) -> Framing {
    let fit_height = max_dim / (2.0 * (fovy_radians * 0.5).tan());
    let fit_width = fit_height / aspect;
    let distance = FIT_HEADROOM * fit_height.max(fit_width);

    let model_lift = max_dim * MODEL_LIFT_FACTOR;
    let target_y = model_lift - max_dim * TARGET_DROP_FACTOR;

    Framing {
        distance,
        model_lift,
        eye: camera_eye_dir() * distance,
        target: Vec3::new(0.0, target_y, 0.0),
    }
}
