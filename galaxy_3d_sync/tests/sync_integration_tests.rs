//! Integration tests for scene synchronization
//!
//! These tests drive complete sync passes through the public API with the
//! mock scene provider and geometry converter. No host application required.
//!
//! Run with: cargo test --test sync_integration_tests

use std::sync::Arc;
use std::time::Duration;
use galaxy_3d_sync::galaxy3d::provider::{
    DataId, FrameTime, InstanceRecord, LightInfo, LightKind, ModifierInfo, ModifierKind,
    ObjectInfo, ObjectKind, WorldInfo, WorldSampling,
};
use galaxy_3d_sync::galaxy3d::scene::ObjectManagerUpdate;
use galaxy_3d_sync::galaxy3d::{SceneSync, SyncConfig};
use galaxy_3d_sync::glam::{Mat4, Vec3};
use galaxy_3d_sync::mock::{MockGeometryConverter, MockSceneProvider};
use galaxy_3d_sync::sync::{GeometryKey, ObjectKey};

// ============================================================================
// HELPERS
// ============================================================================

fn create_sync(config: SyncConfig) -> (SceneSync, Arc<MockGeometryConverter>) {
    let converter = Arc::new(MockGeometryConverter::new());
    let config = SyncConfig { worker_threads: 4, ..config };
    let sync = SceneSync::new(config, converter.clone()).unwrap();
    (sync, converter)
}

fn mesh(id: u64) -> ObjectInfo {
    ObjectInfo::mesh(DataId(id), &format!("mesh{}", id), DataId(id + 100))
}

fn translation(x: f32) -> Mat4 {
    Mat4::from_translation(Vec3::new(x, 0.0, 0.0))
}

// ============================================================================
// INCREMENTAL SYNC
// ============================================================================

#[test]
fn test_integration_single_mesh_lifecycle() {
    let (mut sync, converter) = create_sync(SyncConfig::default());
    let mut provider = MockSceneProvider::new();
    let id = provider.add_object(mesh(1), Mat4::IDENTITY);

    // First sync creates everything
    let report = sync.run_full_pass(&provider, 0.0);
    assert_eq!(report.objects_changed, 1);
    let updates = sync.take_updates();
    assert_eq!(updates.objects.len(), 1);
    assert_eq!(updates.geometries.len(), 1);

    // Unchanged scene produces no work
    let report = sync.run_full_pass(&provider, 0.0);
    assert_eq!(report.objects_changed, 0);
    assert!(sync.take_updates().is_empty());
    assert_eq!(converter.conversion_count(), 1);

    // Moving the object rewrites it without re-converting
    provider.instances[0].matrix_world = translation(4.0);
    sync.run_full_pass(&provider, 0.0);
    let updates = sync.take_updates();
    assert_eq!(updates.objects.len(), 1);
    assert!(updates.geometries.is_empty());
    assert_eq!(converter.conversion_count(), 1);

    let handle = sync.scene().find_object(&ObjectKey::standalone(id)).unwrap();
    assert_eq!(sync.scene().object(handle).unwrap().tfm(), translation(4.0));
}

#[test]
fn test_integration_duplicates_share_geometry() {
    let (mut sync, converter) = create_sync(SyncConfig::default());
    let mut provider = MockSceneProvider::new();
    provider.add_object_info(mesh(1));
    provider.add_object(mesh(50), Mat4::IDENTITY);
    for index in 0..3 {
        provider.add_instance(InstanceRecord::duplicate(DataId(1), DataId(50), &[index], translation(index as f32)));
    }

    sync.run_full_pass(&provider, 0.0);

    // Emitter plus three duplicates, two geometries
    assert_eq!(sync.scene().object_count(), 4);
    assert_eq!(sync.scene().geometry_count(), 2);
    assert_eq!(converter.records_for(DataId(1), false).len(), 1);

    let geometry = sync.scene().find_geometry(&GeometryKey::new(DataId(101), false)).unwrap();
    let sharing = sync
        .scene()
        .objects()
        .filter(|(_, object)| object.geometry() == Some(geometry))
        .count();
    assert_eq!(sharing, 3);
}

#[test]
fn test_integration_pruning_keeps_survivors() {
    let (mut sync, _) = create_sync(SyncConfig::default());
    let mut provider = MockSceneProvider::new();
    for id in 1..=4 {
        provider.add_object(mesh(id), Mat4::IDENTITY);
    }
    sync.run_full_pass(&provider, 0.0);
    sync.take_updates();
    let survivor = sync.scene().find_object(&ObjectKey::standalone(DataId(1))).unwrap();

    provider.remove_instances_of(DataId(3));
    provider.remove_instances_of(DataId(4));
    let report = sync.run_full_pass(&provider, 0.0);

    assert_eq!(report.entities_pruned, 4);
    assert_eq!(sync.scene().object_count(), 2);
    assert_eq!(sync.scene().find_object(&ObjectKey::standalone(DataId(1))), Some(survivor));
    let updates = sync.take_updates();
    assert!(updates.object_manager.contains(ObjectManagerUpdate::OBJECT_MODIFIED));
    assert!(updates.objects.is_empty());
}

// ============================================================================
// MOTION BLUR
// ============================================================================

#[test]
fn test_integration_motion_blur_end_to_end() {
    let (mut sync, converter) = create_sync(SyncConfig { motion_blur: true, ..Default::default() });
    let mut provider = MockSceneProvider::new();
    let id = provider.add_object(mesh(1), Mat4::IDENTITY);
    provider.animate(id, translation);

    let reports = sync.run_motion_passes(&mut provider);

    assert_eq!(reports.len(), 3);
    assert_eq!(sync.motion_times().as_slice(), &[-1.0, 0.0, 1.0]);
    assert_eq!(
        provider.frame_history(),
        &[FrameTime::new(0, 0.75), FrameTime::new(1, 0.25), FrameTime::new(1, 0.0)]
    );

    let handle = sync.scene().find_object(&ObjectKey::standalone(id)).unwrap();
    let object = sync.scene().object(handle).unwrap();
    assert_eq!(object.motion(), &[translation(0.75), translation(1.0), translation(1.25)]);

    let motion_steps: Vec<Option<usize>> = converter
        .records_for(id, false)
        .iter()
        .map(|record| record.motion_step)
        .collect();
    assert_eq!(motion_steps, vec![None, Some(0), Some(1)]);
}

#[test]
fn test_integration_single_motion_pass() {
    let (mut sync, converter) = create_sync(SyncConfig { motion_blur: true, ..Default::default() });
    let mut provider = MockSceneProvider::new();
    let id = provider.add_object(mesh(1), translation(1.0));
    sync.run_full_pass(&provider, 0.0);

    provider.instances[0].matrix_world = translation(2.0);
    let report = sync.run_full_pass(&provider, 1.0);

    assert!(report.is_motion_pass());
    let handle = sync.scene().find_object(&ObjectKey::standalone(id)).unwrap();
    let object = sync.scene().object(handle).unwrap();
    assert_eq!(object.motion(), &[Mat4::IDENTITY, translation(1.0), translation(2.0)]);

    let records = converter.records_for(id, false);
    assert_eq!(records.last().map(|record| record.motion_step), Some(Some(1)));
}

#[test]
fn test_integration_motion_times_merge_objects() {
    let (mut sync, _) = create_sync(SyncConfig { motion_blur: true, ..Default::default() });
    let mut provider = MockSceneProvider::new();
    provider.add_object(mesh(1), Mat4::IDENTITY);
    let mut fine = mesh(2);
    fine.settings.motion_steps = 2;
    provider.add_object(fine, Mat4::IDENTITY);

    let reports = sync.run_motion_passes(&mut provider);

    assert_eq!(sync.motion_times().as_slice(), &[-1.0, -0.5, 0.0, 0.5, 1.0]);
    let times: Vec<f32> = reports.iter().map(|report| report.time).collect();
    assert_eq!(times, vec![0.0, -1.0, -0.5, 0.5, 1.0]);
}

// ============================================================================
// GEOMETRY JOBS
// ============================================================================

#[test]
fn test_integration_hair_after_base_mesh() {
    let (mut sync, converter) = create_sync(SyncConfig::default());
    let mut provider = MockSceneProvider::new();
    for id in 1..=3 {
        let mut info = mesh(id);
        info.has_particle_hair = true;
        provider.add_object(info, Mat4::IDENTITY);
        converter.sleep_for(DataId(id), false, Duration::from_millis(20));
    }

    sync.run_full_pass(&provider, 0.0);

    for id in 1..=3 {
        let base = converter.records_for(DataId(id), false);
        let hair = converter.records_for(DataId(id), true);
        assert_eq!(base.len(), 1);
        assert_eq!(hair.len(), 1);
        assert!(hair[0].start >= base[0].end, "hair of #{} started before its base mesh", id);
    }
}

#[test]
fn test_integration_failed_conversion_recovers() {
    let (mut sync, converter) = create_sync(SyncConfig::default());
    let mut provider = MockSceneProvider::new();
    provider.add_object(mesh(1), Mat4::IDENTITY);
    provider.add_object(mesh(2), Mat4::IDENTITY);
    converter.fail_for(DataId(1));

    let report = sync.run_full_pass(&provider, 0.0);
    assert_eq!(report.geometry_jobs_failed, 1);
    let failed = sync.scene().find_geometry(&GeometryKey::new(DataId(101), false)).unwrap();
    let updates = sync.take_updates();
    assert_eq!(updates.geometries.len(), 1);
    assert!(!updates.geometries.contains(&failed));

    converter.stop_failing(DataId(1));
    provider.tag_updated(DataId(101));
    let report = sync.run_full_pass(&provider, 0.0);
    assert_eq!(report.geometry_jobs_failed, 0);
    assert!(sync.take_updates().geometries.contains(&failed));
}

// ============================================================================
// CANCELLATION
// ============================================================================

#[test]
fn test_integration_cancellation_keeps_scene() {
    let (mut sync, _) = create_sync(SyncConfig { motion_blur: true, ..Default::default() });
    let mut provider = MockSceneProvider::new();
    for id in 1..=5 {
        provider.add_object(mesh(id), Mat4::IDENTITY);
    }
    sync.run_motion_passes(&mut provider);
    let frames_before = provider.frame_history().len();

    for id in 2..=5 {
        provider.remove_instances_of(DataId(id));
    }
    let progress = sync.progress();
    progress.cancel();
    let reports = sync.run_motion_passes(&mut provider);

    assert_eq!(reports.len(), 1);
    assert!(reports[0].cancelled);
    assert_eq!(sync.scene().object_count(), 5);
    assert_eq!(provider.frame_history().len(), frames_before);

    progress.reset();
    sync.run_motion_passes(&mut provider);
    assert_eq!(sync.scene().object_count(), 1);
}

// ============================================================================
// MIXED SCENE
// ============================================================================

#[test]
fn test_integration_mixed_scene() {
    let (mut sync, _) = create_sync(SyncConfig::default());
    let mut provider = MockSceneProvider::new();

    provider.add_object(mesh(1), Mat4::IDENTITY);

    let mut lamp = ObjectInfo::mesh(DataId(2), "lamp", DataId(102));
    lamp.kind = ObjectKind::Light;
    provider.lights.insert(DataId(2), LightInfo {
        kind: LightKind::Point,
        color: Vec3::ONE,
        energy: 10.0,
        size: 0.1,
        is_portal: false,
        cast_shadow: true,
        use_mis: true,
        max_bounces: 64,
    });
    provider.add_object(lamp, Mat4::IDENTITY);

    let mut cached = mesh(3);
    cached.modifiers.push(ModifierInfo {
        kind: ModifierKind::MeshSequenceCache {
            cache_file: DataId(300),
            filepath: "/cache/shot.abc".to_string(),
            object_path: "/root/rock".to_string(),
        },
        enabled: true,
    });
    provider.add_object(cached, Mat4::IDENTITY);

    let mut empty = mesh(4);
    empty.kind = ObjectKind::Empty;
    empty.data = None;
    provider.add_object(empty, Mat4::IDENTITY);

    provider.world = Some(WorldInfo {
        id: DataId(900),
        sampling: WorldSampling::Automatic,
        map_resolution: 1024,
        max_bounces: 16,
    });

    let report = sync.run_full_pass(&provider, 0.0);

    assert_eq!(report.instances_visited, 4);
    assert_eq!(report.total_skipped(), 1);
    assert_eq!(sync.scene().object_count(), 1);
    assert_eq!(sync.scene().light_count(), 2);
    assert_eq!(sync.scene().procedurals().count(), 1);

    let updates = sync.take_updates();
    assert_eq!(updates.lights.len(), 2);
    assert_eq!(updates.procedurals.len(), 1);
}
