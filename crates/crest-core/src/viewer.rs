//! Per-frame viewer state machine: owns the model, camera and orbit controls
//! and advances one logical frame per `tick` call. Free of scheduling policy
//! so it can be driven by requestAnimationFrame in production and by a plain
//! loop in tests.

use glam::Vec2;

use crate::camera::{frame_model, Camera, Framing};
use crate::constants::{
    IDLE_YAW_PER_FRAME, INITIAL_YAW, MAX_PIXEL_RATIO, PITCH_BLEND, PITCH_CURSOR_GAIN,
    ROLL_CURSOR_GAIN,
};
use crate::mesh::Model;
use crate::normalize::normalize_model;
use crate::orbit::OrbitControls;

pub struct ViewerState {
    pub model: Option<Model>,
    pub camera: Camera,
    pub orbit: OrbitControls,
    /// Normalized pointer position over the canvas, [-1, 1] per axis.
    pub cursor: Vec2,
    reduced_motion: bool,
}

impl ViewerState {
    pub fn new(aspect: f32) -> Self {
        let camera = Camera::initial(aspect);
        let orbit = OrbitControls::from_camera(camera.eye, camera.target);
        Self {
            model: None,
            camera,
            orbit,
            cursor: Vec2::ZERO,
            reduced_motion: false,
        }
    }

    /// Attach a freshly loaded model: normalize it, frame the camera around
    /// its final bounds, lift it above the baseline and give it the canonical
    /// initial yaw. Returns the framing for logging/inspection.
    pub fn install_model(&mut self, mut model: Model) -> Framing {
        let aabb = normalize_model(&mut model);
        let framing = frame_model(aabb.max_dim(), self.camera.fovy_radians, self.camera.aspect);

        model.position.y += framing.model_lift;
        model.yaw = INITIAL_YAW;

        self.camera.eye = framing.eye;
        self.camera.target = framing.target;
        self.orbit.retarget(framing.eye, framing.target);

        self.model = Some(model);
        framing
    }

    /// Advance one frame. The orbit damping step always runs, even without a
    /// model and even mid-drag; the idle animation only runs when a model is
    /// present, no drag is active, and reduced motion is not requested.
    pub fn tick(&mut self) {
        self.orbit.update();
        self.camera.eye = self.orbit.eye();
        self.camera.target = self.orbit.target;

        if self.orbit.is_dragging() || self.reduced_motion {
            return;
        }
        let cursor = self.cursor;
        if let Some(model) = self.model.as_mut() {
            model.yaw += IDLE_YAW_PER_FRAME;
            model.pitch += (cursor.y * PITCH_CURSOR_GAIN - model.pitch) * PITCH_BLEND;
            model.roll = cursor.x * ROLL_CURSOR_GAIN;
        }
    }

    pub fn set_cursor(&mut self, cursor: Vec2) {
        self.cursor = cursor;
    }

    pub fn reduced_motion(&self) -> bool {
        self.reduced_motion
    }

    /// Mirror the platform's reduced-motion preference. Activation snaps any
    /// in-flight idle pose back to the canonical framing so no partial tilt
    /// stays visible.
    pub fn set_reduced_motion(&mut self, enabled: bool) {
        self.reduced_motion = enabled;
        if enabled {
            if let Some(model) = self.model.as_mut() {
                model.pitch = 0.0;
                model.roll = 0.0;
                model.yaw = INITIAL_YAW;
            }
        }
    }

    pub fn set_aspect(&mut self, width: f32, height: f32) {
        if width > 0.0 && height > 0.0 {
            self.camera.aspect = width / height;
        }
    }
}

/// Backing-store size for a canvas displayed at the given CSS size, with the
/// device pixel ratio capped so high-density screens don't quadruple the
/// fill cost.
pub fn backing_size(css_width: f64, css_height: f64, device_pixel_ratio: f64) -> (u32, u32) {
    let dpr = device_pixel_ratio.min(MAX_PIXEL_RATIO);
    let w = (css_width * dpr) as u32;
    let h = (css_height * dpr) as u32;
    (w.max(1), h.max(1))
}
