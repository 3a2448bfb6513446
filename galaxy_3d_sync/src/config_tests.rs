/// Tests for SyncConfig

use super::*;

// ============================================================================
// Tests: Motion type
// ============================================================================

#[test]
fn test_default_needs_no_motion() {
    let config = SyncConfig::default();
    assert_eq!(config.need_motion(), MotionType::None);
    assert_eq!(config.frame_center_delta(), 0.0);
}

#[test]
fn test_motion_blur_wins_over_pass() {
    let config = SyncConfig { motion_blur: true, motion_pass: true, ..Default::default() };
    assert_eq!(config.need_motion(), MotionType::Blur);
}

#[test]
fn test_motion_pass_uses_fixed_shutter() {
    let config = SyncConfig { motion_pass: true, shutter_time: 0.25, ..Default::default() };
    assert_eq!(config.need_motion(), MotionType::Pass);
    assert_eq!(config.motion_shutter_time(), 2.0);
}

#[test]
fn test_blur_uses_configured_shutter() {
    let config = SyncConfig { motion_blur: true, shutter_time: 0.25, ..Default::default() };
    assert_eq!(config.motion_shutter_time(), 0.25);
}

// ============================================================================
// Tests: Motion position
// ============================================================================

#[test]
fn test_frame_center_delta_end_and_start() {
    let end = SyncConfig {
        motion_blur: true,
        shutter_time: 1.0,
        motion_position: MotionPosition::End,
        ..Default::default()
    };
    assert_eq!(end.frame_center_delta(), -0.5);

    let start = SyncConfig { motion_position: MotionPosition::Start, ..end.clone() };
    assert_eq!(start.frame_center_delta(), 0.5);
}

#[test]
fn test_frame_center_delta_ignored_for_motion_pass() {
    let config = SyncConfig {
        motion_pass: true,
        motion_position: MotionPosition::End,
        ..Default::default()
    };
    assert_eq!(config.frame_center_delta(), 0.0);
}

// ============================================================================
// Tests: Lights
// ============================================================================

#[test]
fn test_show_lights() {
    assert!(SyncConfig::default().show_lights());

    let hidden = SyncConfig {
        viewport: Some(ViewportConfig { use_scene_lights: false }),
        ..Default::default()
    };
    assert!(!hidden.show_lights());
}
