//! Damped orbit controls: pointer drag rotates the camera around a fixed
//! target at a clamped distance. Panning is intentionally absent.

use glam::Vec3;

use crate::constants::{
    ORBIT_DAMPING, ORBIT_MAX_DISTANCE, ORBIT_MIN_DISTANCE, ORBIT_ROTATE_SPEED,
};

const POLAR_EPSILON: f32 = 0.01; // keeps the camera off the poles

#[derive(Clone, Debug)]
pub struct OrbitControls {
    pub target: Vec3,
    azimuth: f32,
    polar: f32,
    distance: f32,
    goal_azimuth: f32,
    goal_polar: f32,
    goal_distance: f32,
    dragging: bool,
}

impl OrbitControls {
    /// Build controls matching an existing camera pose.
    pub fn from_camera(eye: Vec3, target: Vec3) -> Self {
        let offset = eye - target;
        let distance = offset
            .length()
            .clamp(ORBIT_MIN_DISTANCE, ORBIT_MAX_DISTANCE);
        let azimuth = offset.x.atan2(offset.z);
        let polar = (offset.y / offset.length().max(1e-6)).clamp(-1.0, 1.0).acos();
        Self {
            target,
            azimuth,
            polar,
            distance,
            goal_azimuth: azimuth,
            goal_polar: polar,
            goal_distance: distance,
            dragging: false,
        }
    }

    /// Re-aim at a new target without disturbing the orbit angles. An active
    /// drag gesture survives; the model can finish loading mid-drag.
    pub fn retarget(&mut self, eye: Vec3, target: Vec3) {
        let dragging = self.dragging;
        *self = Self::from_camera(eye, target);
        self.dragging = dragging;
    }

    /// Begin a drag gesture. Returns true only on the idle -> dragging
    /// transition so callers observe exactly one start per gesture.
    pub fn begin_drag(&mut self) -> bool {
        !std::mem::replace(&mut self.dragging, true)
    }

    /// End a drag gesture. Returns true only on the dragging -> idle
    /// transition.
    pub fn end_drag(&mut self) -> bool {
        std::mem::replace(&mut self.dragging, false)
    }

    /// The interaction flag the render loop samples. This is the committed
    /// gesture state, not the raw pointer button, so a drag ending mid-frame
    /// cannot jitter the idle animation.
    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Apply a pointer-move delta (in pixels) while dragging. Matches the
    /// orbit convention of scaling by viewport height on both axes.
    pub fn rotate_delta(&mut self, dx: f32, dy: f32, viewport_height: f32) {
        if viewport_height <= 0.0 {
            return;
        }
        let k = std::f32::consts::TAU * ORBIT_ROTATE_SPEED / viewport_height;
        self.goal_azimuth -= dx * k;
        self.goal_polar = (self.goal_polar - dy * k)
            .clamp(POLAR_EPSILON, std::f32::consts::PI - POLAR_EPSILON);
    }

    /// Scale the orbit distance, clamped to the configured range.
    pub fn dolly(&mut self, factor: f32) {
        self.goal_distance =
            (self.goal_distance * factor).clamp(ORBIT_MIN_DISTANCE, ORBIT_MAX_DISTANCE);
    }

    /// One damping step: exponential smoothing of the current pose toward the
    /// goal pose. Runs every frame, dragging or not, so residual momentum
    /// decays smoothly after the pointer is released.
    pub fn update(&mut self) {
        self.azimuth += (self.goal_azimuth - self.azimuth) * ORBIT_DAMPING;
        self.polar += (self.goal_polar - self.polar) * ORBIT_DAMPING;
        self.distance += (self.goal_distance - self.distance) * ORBIT_DAMPING;
    }

    /// Camera eye position for the current (damped) orbit pose.
    pub fn eye(&self) -> Vec3 {
        let sp = self.polar.sin();
        let offset = Vec3::new(
            sp * self.azimuth.sin(),
            self.polar.cos(),
            sp * self.azimuth.cos(),
        ) * self.distance;
        self.target + offset
    }

    pub fn distance(&self) -> f32 {
        self.distance
    }

    pub fn azimuth(&self) -> f32 {
        self.azimuth
    }
}
