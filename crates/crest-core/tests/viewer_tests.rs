// Host-side tests for the viewer pipeline: normalization, camera framing,
// orbit damping and the idle animation gates.

use crest_core::constants::{
    CAMERA_FOV_DEG, FIT_HEADROOM, IDLE_YAW_PER_FRAME, INITIAL_YAW, MODEL_LIFT_FACTOR,
    ORBIT_MAX_DISTANCE, ORBIT_MIN_DISTANCE, TARGET_DROP_FACTOR, TARGET_SIZE,
};
use crest_core::load::{
    progress_percent, LoadLifecycle, LoadPhase, DEFAULT_ERROR_TEXT, FALLBACK_TEXT, LOAD_ERROR_TEXT,
};
use crest_core::{
    backing_size, frame_model, normalize_model, MaterialParams, MeshPart, Model, OrbitControls,
    Vertex, ViewerState,
};
use glam::{Vec2, Vec3};

fn box_model(size: Vec3, offset: Vec3) -> Model {
    let half = size * 0.5;
    let mut vertices = Vec::new();
    for x in [-half.x, half.x] {
        for y in [-half.y, half.y] {
            for z in [-half.z, half.z] {
                vertices.push(Vertex {
                    pos: [x + offset.x, y + offset.y, z + offset.z],
                    nrm: [0.0, 1.0, 0.0],
                });
            }
        }
    }
    Model::new(vec![MeshPart {
        vertices,
        indices: (0..8).collect(),
        material: MaterialParams::stylized(None, None),
    }])
}

#[test]
fn normalize_centers_model_and_scales_to_target_size() {
    let mut model = box_model(Vec3::new(2.0, 4.0, 1.0), Vec3::new(10.0, -3.0, 7.0));
    let aabb = normalize_model(&mut model);

    assert!(aabb.center().length() < 1e-4, "model not centered: {:?}", aabb.center());
    assert!(
        (aabb.max_dim() - TARGET_SIZE).abs() < 1e-4,
        "max dimension {} != target {}",
        aabb.max_dim(),
        TARGET_SIZE
    );
}

#[test]
fn normalize_is_keyed_to_largest_axis_only() {
    let mut model = box_model(Vec3::new(0.5, 8.0, 1.0), Vec3::ZERO);
    let aabb = normalize_model(&mut model);
    let size = aabb.size();
    assert!((size.y - TARGET_SIZE).abs() < 1e-4);
    assert!(size.x < size.y && size.z < size.y);
}

#[test]
fn degenerate_model_stays_at_unit_scale() {
    // All vertices coincide, so the bounding box has zero extent. Scaling is
    // skipped entirely rather than dividing by zero.
    let mut model = box_model(Vec3::ZERO, Vec3::new(4.0, 4.0, 4.0));
    let aabb = normalize_model(&mut model);

    assert_eq!(model.scale, 1.0);
    assert_eq!(aabb.max_dim(), 0.0);
    assert!(model.position.is_finite());
    // Centering still applies.
    assert!(aabb.center().length() < 1e-4);
}

#[test]
fn framing_matches_fit_formula_at_square_aspect() {
    let fovy = CAMERA_FOV_DEG.to_radians();
    let framing = frame_model(2.0, fovy, 1.0);

    let fit_height = 2.0 / (2.0 * (fovy * 0.5).tan());
    assert!((framing.distance - FIT_HEADROOM * fit_height).abs() < 1e-5);
    assert!((framing.model_lift - 2.0 * MODEL_LIFT_FACTOR).abs() < 1e-5);

    let target_y = framing.model_lift - 2.0 * TARGET_DROP_FACTOR;
    assert!((framing.target.y - target_y).abs() < 1e-5);
    assert_eq!(framing.target.x, 0.0);
    assert_eq!(framing.target.z, 0.0);

    // Eye sits along the fixed view direction, scaled by the fit distance.
    assert!((framing.eye.x - 0.32 * framing.distance).abs() < 1e-4);
    assert!((framing.eye.y - 0.18 * framing.distance).abs() < 1e-4);
    assert!((framing.eye.z - 1.08 * framing.distance).abs() < 1e-4);
}

#[test]
fn framing_uses_width_fit_for_narrow_viewports() {
    let fovy = CAMERA_FOV_DEG.to_radians();
    let square = frame_model(2.0, fovy, 1.0);
    let narrow = frame_model(2.0, fovy, 0.5);
    assert!(
        (narrow.distance - square.distance * 2.0).abs() < 1e-4,
        "width fit should dominate at aspect 0.5"
    );
}

#[test]
fn framing_is_pure() {
    let fovy = CAMERA_FOV_DEG.to_radians();
    let a = frame_model(1.9, fovy, 1.6);
    let b = frame_model(1.9, fovy, 1.6);
    assert_eq!(a, b);
}

#[test]
fn install_model_applies_lift_and_initial_yaw() {
    let mut viewer = ViewerState::new(1.6);
    let framing = viewer.install_model(box_model(Vec3::splat(4.0), Vec3::new(1.0, 2.0, 3.0)));

    let model = viewer.model.as_ref().expect("model installed");
    assert!((model.yaw - INITIAL_YAW).abs() < 1e-6);
    assert!(framing.model_lift > 0.0);
    assert_eq!(viewer.camera.eye, framing.eye);
    assert_eq!(viewer.camera.target, framing.target);
}

#[test]
fn idle_yaw_advances_only_while_undisturbed() {
    let mut viewer = ViewerState::new(1.0);
    viewer.install_model(box_model(Vec3::splat(2.0), Vec3::ZERO));
    let yaw0 = viewer.model.as_ref().unwrap().yaw;

    for _ in 0..10 {
        viewer.tick();
    }
    let yaw_idle = viewer.model.as_ref().unwrap().yaw;
    assert!(
        (yaw_idle - yaw0 - 10.0 * IDLE_YAW_PER_FRAME).abs() < 1e-5,
        "idle rotation should advance a fixed amount per frame"
    );

    viewer.orbit.begin_drag();
    for _ in 0..10 {
        viewer.tick();
    }
    let yaw_drag = viewer.model.as_ref().unwrap().yaw;
    assert_eq!(yaw_drag, yaw_idle, "idle rotation must pause while dragging");

    viewer.orbit.end_drag();
    viewer.tick();
    assert!(viewer.model.as_ref().unwrap().yaw > yaw_drag);
}

#[test]
fn cursor_tilt_eases_toward_gain_scaled_pose() {
    let mut viewer = ViewerState::new(1.0);
    viewer.install_model(box_model(Vec3::splat(2.0), Vec3::ZERO));
    viewer.set_cursor(Vec2::new(1.0, 1.0));

    for _ in 0..400 {
        viewer.tick();
    }
    let model = viewer.model.as_ref().unwrap();
    // Pitch converges on cursor.y * gain; roll snaps each frame.
    assert!((model.pitch - 0.18).abs() < 1e-3);
    assert!((model.roll - 0.025).abs() < 1e-6);
}

#[test]
fn reduced_motion_freezes_and_resets_the_pose() {
    let mut viewer = ViewerState::new(1.0);
    viewer.install_model(box_model(Vec3::splat(2.0), Vec3::ZERO));
    viewer.set_cursor(Vec2::new(0.8, -0.6));
    for _ in 0..50 {
        viewer.tick();
    }
    assert!(viewer.model.as_ref().unwrap().pitch.abs() > 0.0);

    viewer.set_reduced_motion(true);
    {
        let model = viewer.model.as_ref().unwrap();
        assert_eq!(model.pitch, 0.0);
        assert_eq!(model.roll, 0.0);
        assert!((model.yaw - INITIAL_YAW).abs() < 1e-6);
    }

    let yaw_before = viewer.model.as_ref().unwrap().yaw;
    for _ in 0..10 {
        viewer.tick();
    }
    assert_eq!(viewer.model.as_ref().unwrap().yaw, yaw_before);

    // Deactivation resumes without another reset.
    viewer.set_reduced_motion(false);
    viewer.tick();
    assert!(viewer.model.as_ref().unwrap().yaw > yaw_before);
}

#[test]
fn orbit_damping_converges_and_clamps_distance() {
    let mut orbit = OrbitControls::from_camera(Vec3::new(0.0, 0.0, 3.0), Vec3::ZERO);
    let start = orbit.azimuth();
    orbit.rotate_delta(120.0, 0.0, 600.0);

    orbit.update();
    let after_one = orbit.azimuth();
    assert!(after_one != start, "damping should move the pose");

    for _ in 0..500 {
        orbit.update();
    }
    let settled = orbit.azimuth();
    orbit.update();
    assert!((orbit.azimuth() - settled).abs() < 1e-4, "pose should settle");

    for _ in 0..50 {
        orbit.dolly(0.5);
    }
    for _ in 0..500 {
        orbit.update();
    }
    assert!((orbit.distance() - ORBIT_MIN_DISTANCE).abs() < 1e-3);

    for _ in 0..50 {
        orbit.dolly(2.0);
    }
    for _ in 0..500 {
        orbit.update();
    }
    assert!((orbit.distance() - ORBIT_MAX_DISTANCE).abs() < 1e-3);
}

#[test]
fn retarget_preserves_an_active_drag() {
    let mut viewer = ViewerState::new(1.0);
    viewer.orbit.begin_drag();

    // Load completes mid-drag; install_model retargets the orbit around the
    // new framing, and the gesture must survive it.
    viewer.install_model(box_model(Vec3::splat(2.0), Vec3::ZERO));
    assert!(viewer.orbit.is_dragging());

    let yaw = viewer.model.as_ref().unwrap().yaw;
    for _ in 0..5 {
        viewer.tick();
    }
    assert_eq!(
        viewer.model.as_ref().unwrap().yaw,
        yaw,
        "idle rotation must stay paused through the framing reset"
    );
    assert!(viewer.orbit.end_drag(), "the gesture still ends normally");
}

#[test]
fn drag_transitions_report_once() {
    let mut orbit = OrbitControls::from_camera(Vec3::new(0.0, 0.0, 3.0), Vec3::ZERO);
    assert!(orbit.begin_drag());
    assert!(!orbit.begin_drag(), "second begin is not a transition");
    assert!(orbit.end_drag());
    assert!(!orbit.end_drag(), "second end is not a transition");
}

#[test]
fn rotate_delta_ignores_zero_height_viewports() {
    let mut orbit = OrbitControls::from_camera(Vec3::new(0.0, 0.0, 3.0), Vec3::ZERO);
    let before = orbit.azimuth();
    orbit.rotate_delta(50.0, 50.0, 0.0);
    for _ in 0..100 {
        orbit.update();
    }
    assert_eq!(orbit.azimuth(), before);
}

#[test]
fn backing_size_caps_pixel_ratio() {
    assert_eq!(backing_size(100.0, 50.0, 1.0), (100, 50));
    // DPR 3.0 is capped at 1.8.
    assert_eq!(backing_size(100.0, 50.0, 3.0), (180, 90));
    // Zero CSS size still yields a valid surface.
    assert_eq!(backing_size(0.0, 0.0, 2.0), (1, 1));
}

#[test]
fn progress_percent_handles_unknown_totals() {
    assert_eq!(progress_percent(5, 0), None);
    assert_eq!(progress_percent(0, 10), Some(0));
    assert_eq!(progress_percent(5, 10), Some(50));
    assert_eq!(progress_percent(10, 10), Some(100));
    // Overshoot clamps rather than exceeding 100.
    assert_eq!(progress_percent(20, 10), Some(100));
}

#[test]
fn load_failure_reports_fallback_exactly_once() {
    let mut lifecycle = LoadLifecycle::new();
    assert_eq!(lifecycle.on_progress(1, 2), Some(50));
    assert!(lifecycle.fail(), "first failure performs the substitution");
    assert!(!lifecycle.fail(), "repeat failures are silent");
    assert_eq!(lifecycle.phase(), LoadPhase::Failed);
    assert_eq!(lifecycle.on_progress(2, 2), None);
    assert!(!lifecycle.succeed(), "a failed load cannot become ready");
}

#[test]
fn failure_copy_distinguishes_load_from_loader_errors() {
    assert_eq!(FALLBACK_TEXT, "3D preview unavailable in this browser.");
    assert_eq!(LOAD_ERROR_TEXT, "3D preview unavailable.");
    // Non-model loader errors get their own line.
    assert_eq!(DEFAULT_ERROR_TEXT, "Unable to load crest.");
    assert_ne!(LOAD_ERROR_TEXT, DEFAULT_ERROR_TEXT);
}

#[test]
fn load_success_is_terminal() {
    let mut lifecycle = LoadLifecycle::new();
    assert!(lifecycle.succeed());
    assert!(!lifecycle.succeed());
    assert!(!lifecycle.fail(), "late errors cannot fail a ready load");
    assert_eq!(lifecycle.phase(), LoadPhase::Ready);
}
