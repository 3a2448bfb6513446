/// Tests for ObjectCulling

use super::*;
use crate::provider::DataId;

// ============================================================================
// TEST HELPERS
// ============================================================================

/// Camera at the origin looking down -Z; x, y in [-10, 10] map to [0, 1]
fn test_camera() -> CameraInfo {
    CameraInfo {
        object: DataId(100),
        matrix_world: Mat4::IDENTITY,
        world_to_ndc: Mat4::from_cols(
            Vec4::new(0.05, 0.0, 0.0, 0.0),
            Vec4::new(0.0, 0.05, 0.0, 0.0),
            Vec4::new(0.0, 0.0, -1.0, 0.0),
            Vec4::new(0.5, 0.5, 0.0, 1.0),
        ),
        use_motion_blur: false,
        motion_steps: 1,
    }
}

fn culling(use_camera_cull: bool, use_distance_cull: bool) -> ObjectCulling {
    let config = CullingConfig {
        use_camera_cull,
        use_distance_cull,
        ..Default::default()
    };
    let mut culling = ObjectCulling::new(&config, Some(test_camera()));
    culling.init_object(&ObjectSettings {
        use_camera_cull: true,
        use_distance_cull: true,
        ..Default::default()
    });
    culling
}

fn at(x: f32, y: f32, z: f32) -> Mat4 {
    Mat4::from_translation(Vec3::new(x, y, z))
}

// ============================================================================
// Tests: Camera culling
// ============================================================================

#[test]
fn test_object_in_frame_is_kept() {
    assert!(!culling(true, false).test(&AABB::unit(), &at(0.0, 0.0, -5.0)));
}

#[test]
fn test_object_outside_frame_is_culled() {
    assert!(culling(true, false).test(&AABB::unit(), &at(100.0, 0.0, -5.0)));
    assert!(culling(true, false).test(&AABB::unit(), &at(0.0, -100.0, -5.0)));
}

#[test]
fn test_object_within_margin_is_kept() {
    // Right edge of the frame is x = 10; the box reaches x = 10.5
    assert!(!culling(true, false).test(&AABB::unit(), &at(11.0, 0.0, -5.0)));
}

#[test]
fn test_object_behind_camera_is_culled() {
    assert!(culling(true, false).test(&AABB::unit(), &at(0.0, 0.0, 5.0)));
}

// ============================================================================
// Tests: Distance culling
// ============================================================================

#[test]
fn test_far_object_is_culled_by_distance() {
    assert!(culling(false, true).test(&AABB::unit(), &at(0.0, 0.0, -100.0)));
    assert!(!culling(false, true).test(&AABB::unit(), &at(0.0, 0.0, -20.0)));
}

#[test]
fn test_both_tests_must_cull() {
    // In frame but far: camera keeps it, distance culls it
    assert!(!culling(true, true).test(&AABB::unit(), &at(0.0, 0.0, -100.0)));
    // Out of frame and far
    assert!(culling(true, true).test(&AABB::unit(), &at(0.0, 5000.0, -100.0)));
}

// ============================================================================
// Tests: Opt-in
// ============================================================================

#[test]
fn test_object_opt_out_disables_culling() {
    let config = CullingConfig { use_camera_cull: true, ..Default::default() };
    let mut culling = ObjectCulling::new(&config, Some(test_camera()));
    culling.init_object(&ObjectSettings::default());

    assert!(!culling.test(&AABB::unit(), &at(100.0, 0.0, -5.0)));
}

#[test]
fn test_no_camera_disables_culling() {
    let config = CullingConfig { use_camera_cull: true, use_distance_cull: true, ..Default::default() };
    let mut culling = ObjectCulling::new(&config, None);
    culling.init_object(&ObjectSettings {
        use_camera_cull: true,
        use_distance_cull: true,
        ..Default::default()
    });

    assert!(!culling.test(&AABB::unit(), &at(100.0, 0.0, 5.0)));
}
