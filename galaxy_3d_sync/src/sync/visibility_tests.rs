/// Tests for InstanceFilter

use super::*;
use glam::Mat4;
use crate::config::ViewportConfig;
use crate::mock::MockSceneProvider;
use crate::provider::{CurveShape, DataId, ObjectKind};

fn mesh(id: u64) -> ObjectInfo {
    ObjectInfo::mesh(DataId(id), &format!("mesh{}", id), DataId(id + 1000))
}

fn light(id: u64) -> ObjectInfo {
    ObjectInfo { kind: ObjectKind::Light, ..mesh(id) }
}

fn decide(filter: &InstanceFilter, object: &ObjectInfo, motion: bool) -> FilterDecision {
    let record = InstanceRecord::object(object.id, Mat4::IDENTITY);
    filter.evaluate(&record, object, None, motion)
}

// ============================================================================
// Tests: Object type
// ============================================================================

#[test]
fn test_mesh_passes_with_full_visibility() {
    let filter = InstanceFilter::new(&SyncConfig::default(), None);
    assert_eq!(
        decide(&filter, &mesh(1), false),
        FilterDecision::Geometry(InstanceVisibility {
            visibility: RayVisibility::all(),
            use_holdout: false,
        })
    );
}

#[test]
fn test_light_routed_or_hidden() {
    let filter = InstanceFilter::new(&SyncConfig::default(), None);
    assert_eq!(decide(&filter, &light(1), false), FilterDecision::Light);

    let viewport = SyncConfig {
        viewport: Some(ViewportConfig { use_scene_lights: false }),
        ..Default::default()
    };
    let filter = InstanceFilter::new(&viewport, None);
    assert_eq!(decide(&filter, &light(1), false), FilterDecision::Skip(SkipReason::LightsHidden));
}

#[test]
fn test_light_in_motion_pass_is_not_geometry() {
    let filter = InstanceFilter::new(&SyncConfig::default(), None);
    assert_eq!(decide(&filter, &light(1), true), FilterDecision::Skip(SkipReason::NotGeometry));
}

#[test]
fn test_flat_curve_is_not_geometry() {
    let filter = InstanceFilter::new(&SyncConfig::default(), None);
    let path = ObjectInfo { kind: ObjectKind::Curve(CurveShape::default()), ..mesh(1) };
    assert_eq!(decide(&filter, &path, false), FilterDecision::Skip(SkipReason::NotGeometry));

    let beveled = ObjectInfo {
        kind: ObjectKind::Curve(CurveShape { bevel_depth: 0.1, ..Default::default() }),
        ..mesh(2)
    };
    assert!(matches!(decide(&filter, &beveled, false), FilterDecision::Geometry(_)));
}

// ============================================================================
// Tests: Ray visibility
// ============================================================================

#[test]
fn test_parent_visibility_intersects() {
    let filter = InstanceFilter::new(&SyncConfig::default(), None);
    let mut child = mesh(1);
    child.settings.visibility = RayVisibility::CAMERA | RayVisibility::SHADOW;
    let mut parent = mesh(2);
    parent.settings.visibility = RayVisibility::SHADOW | RayVisibility::DIFFUSE;

    let record = InstanceRecord::duplicate(child.id, parent.id, &[0], Mat4::IDENTITY);
    match filter.evaluate(&record, &child, Some(&parent), false) {
        FilterDecision::Geometry(resolved) => assert_eq!(resolved.visibility, RayVisibility::SHADOW),
        other => panic!("unexpected decision {:?}", other),
    }
}

#[test]
fn test_indirect_only_clears_camera() {
    let filter = InstanceFilter::new(&SyncConfig::default(), None);
    let object = mesh(1);
    let record = InstanceRecord { indirect_only: true, ..InstanceRecord::object(object.id, Mat4::IDENTITY) };

    match filter.evaluate(&record, &object, None, false) {
        FilterDecision::Geometry(resolved) => {
            assert!(!resolved.visibility.contains(RayVisibility::CAMERA));
            assert!(resolved.visibility.contains(RayVisibility::DIFFUSE));
        }
        other => panic!("unexpected decision {:?}", other),
    }
}

#[test]
fn test_holdout_keeps_camera_for_indirect_only() {
    let filter = InstanceFilter::new(&SyncConfig::default(), None);
    let object = mesh(1);
    let record = InstanceRecord {
        indirect_only: true,
        holdout: true,
        ..InstanceRecord::object(object.id, Mat4::IDENTITY)
    };

    match filter.evaluate(&record, &object, None, false) {
        FilterDecision::Geometry(resolved) => {
            assert!(resolved.use_holdout);
            assert!(resolved.visibility.contains(RayVisibility::CAMERA));
        }
        other => panic!("unexpected decision {:?}", other),
    }
}

#[test]
fn test_camera_only_indirect_object_is_invisible() {
    let filter = InstanceFilter::new(&SyncConfig::default(), None);
    let mut object = mesh(1);
    object.settings.visibility = RayVisibility::CAMERA;
    let record = InstanceRecord { indirect_only: true, ..InstanceRecord::object(object.id, Mat4::IDENTITY) };

    assert_eq!(
        filter.evaluate(&record, &object, None, false),
        FilterDecision::Skip(SkipReason::Invisible)
    );
}

// ============================================================================
// Tests: should_skip
// ============================================================================

#[test]
fn test_should_skip_hidden_in_viewport() {
    let mut provider = MockSceneProvider::new();
    let id = provider.add_object(mesh(1), Mat4::IDENTITY);
    provider.hidden_in_viewport.insert(id);
    let record = provider.instances[0].clone();

    let mut final_render = InstanceFilter::new(&SyncConfig::default(), None);
    assert!(!final_render.should_skip(&provider, &record, false));

    let config = SyncConfig { viewport: Some(ViewportConfig::default()), ..Default::default() };
    let mut viewport = InstanceFilter::new(&config, None);
    assert!(viewport.should_skip(&provider, &record, false));
}

#[test]
fn test_should_skip_unknown_object() {
    let provider = MockSceneProvider::new();
    let record = InstanceRecord::object(DataId(77), Mat4::IDENTITY);
    let mut filter = InstanceFilter::new(&SyncConfig::default(), None);

    assert!(filter.should_skip(&provider, &record, false));
}

// ============================================================================
// Tests: admit
// ============================================================================

#[test]
fn test_admit_resolves_distinct_parent() {
    let mut provider = MockSceneProvider::new();
    provider.add_object_info(mesh(1));
    provider.add_object_info(mesh(2));
    let mut filter = InstanceFilter::new(&SyncConfig::default(), None);

    let dupli = InstanceRecord::duplicate(DataId(1), DataId(2), &[0], Mat4::IDENTITY);
    let instance = filter.admit(&provider, &dupli).unwrap();
    assert_eq!(instance.object.id, DataId(1));
    assert_eq!(instance.parent.map(|parent| parent.id), Some(DataId(2)));

    let own_parent = InstanceRecord::duplicate(DataId(1), DataId(1), &[0], Mat4::IDENTITY);
    assert!(filter.admit(&provider, &own_parent).unwrap().parent.is_none());
}

#[test]
fn test_admit_reports_skip_reason() {
    let mut provider = MockSceneProvider::new();
    let id = provider.add_object(mesh(1), Mat4::IDENTITY);
    provider.hidden_in_viewport.insert(id);
    let config = SyncConfig { viewport: Some(ViewportConfig::default()), ..Default::default() };
    let mut filter = InstanceFilter::new(&config, None);

    let hidden = provider.instances[0].clone();
    assert_eq!(filter.admit(&provider, &hidden).unwrap_err(), SkipReason::HiddenInViewport);

    let unknown = InstanceRecord::object(DataId(77), Mat4::IDENTITY);
    assert_eq!(filter.admit(&provider, &unknown).unwrap_err(), SkipReason::UnknownObject);
}
