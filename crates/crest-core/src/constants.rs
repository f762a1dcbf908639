use glam::Vec3;

// Shared viewer/storefront tuning constants used by the web frontend.

// Scene normalization
pub const TARGET_SIZE: f32 = 1.9; // world-space size the model is scaled to fill
pub const MODEL_LIFT_FACTOR: f32 = 0.85; // raises the model above the visual baseline
pub const TARGET_DROP_FACTOR: f32 = 0.15; // look-at sits slightly below the model center

// Camera framing
pub const CAMERA_FOV_DEG: f32 = 40.0;
pub const CAMERA_NEAR: f32 = 0.1;
pub const CAMERA_FAR: f32 = 100.0;
pub const FIT_HEADROOM: f32 = 1.45; // keeps the model off the frame edges
pub const CAMERA_EYE_DIR: [f32; 3] = [0.32, 0.18, 1.08]; // three-quarter framing, scaled by distance
pub const INITIAL_YAW: f32 = std::f32::consts::PI * 0.2; // most recognizable face toward camera

// Orbit controls
pub const ORBIT_DAMPING: f32 = 0.08; // exponential smoothing per update
pub const ORBIT_ROTATE_SPEED: f32 = 0.35;
pub const ORBIT_MIN_DISTANCE: f32 = 1.2;
pub const ORBIT_MAX_DISTANCE: f32 = 6.0;

// Idle animation
pub const IDLE_YAW_PER_FRAME: f32 = 0.0045; // ~one revolution per 23 s at 60 fps
pub const PITCH_CURSOR_GAIN: f32 = 0.18;
pub const PITCH_BLEND: f32 = 0.07; // first-order low-pass toward the cursor target
pub const ROLL_CURSOR_GAIN: f32 = 0.025; // small enough that snapping is imperceptible

// Render surface
pub const MAX_PIXEL_RATIO: f64 = 1.8;

// Material stylization
pub const ROUGHNESS_RANGE: (f32, f32) = (0.5, 0.78);
pub const ROUGHNESS_DEFAULT: f32 = 0.6;
pub const METALNESS_RANGE: (f32, f32) = (0.2, 0.45);
pub const METALNESS_DEFAULT: f32 = 0.35;
pub const BASE_COLOR: [f32; 3] = [1.0, 0.176, 0.176]; // 0xff2d2d
pub const EMISSIVE_COLOR: [f32; 3] = [0.447, 0.0, 0.0]; // 0x720000
pub const EMISSIVE_INTENSITY: f32 = 0.1;

// Storefront
pub const FREE_SHIPPING_THRESHOLD: i64 = 750;
pub const CAROUSEL_INTERVAL_MS: i32 = 6_000;
pub const TOAST_VISIBLE_MS: i32 = 2_600;
pub const TOAST_FADE_MS: i32 = 200;

#[inline]
pub fn camera_eye_dir() -> Vec3 {
    Vec3::from(CAMERA_EYE_DIR)
}
