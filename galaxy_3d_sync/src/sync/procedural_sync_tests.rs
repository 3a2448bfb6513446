/// Tests for procedural sync

use super::*;
use std::sync::Arc;
use glam::Mat4;
use crate::config::SyncConfig;
use crate::mock::{MockGeometryConverter, MockSceneProvider};
use crate::provider::{FrameTime, ModifierInfo, ModifierKind, ShaderRef};

// ============================================================================
// Helper Functions
// ============================================================================

const CACHE: DataId = DataId(300);

fn create_sync(config: SyncConfig) -> (SceneSync, Arc<MockGeometryConverter>) {
    let converter = Arc::new(MockGeometryConverter::new());
    let sync = SceneSync::new(SyncConfig { worker_threads: 1, ..config }, converter.clone()).unwrap();
    (sync, converter)
}

fn cached_object(id: u64, object_path: &str) -> ObjectInfo {
    let mut info = ObjectInfo::mesh(DataId(id), &format!("cached{}", id), DataId(id + 100));
    info.modifiers.push(ModifierInfo {
        kind: ModifierKind::MeshSequenceCache {
            cache_file: CACHE,
            filepath: "/cache/shot.abc".to_string(),
            object_path: object_path.to_string(),
        },
        enabled: true,
    });
    info
}

// ============================================================================
// Tests
// ============================================================================

#[test]
fn test_cached_object_becomes_procedural() {
    let (mut sync, converter) = create_sync(SyncConfig::default());
    let mut provider = MockSceneProvider::new();
    provider.add_object(cached_object(1, "/root/rock"), Mat4::IDENTITY);

    sync.run_full_pass(&provider, 0.0);

    assert_eq!(sync.scene().object_count(), 0);
    assert_eq!(sync.scene().geometry_count(), 0);
    assert_eq!(converter.conversion_count(), 0);

    let (_, procedural) = sync.scene().procedurals().next().unwrap();
    assert_eq!(procedural.frame(), 1.0);
    assert_eq!(procedural.filepath(), "/cache/shot.abc");
    assert_eq!(procedural.objects.len(), 1);
    assert_eq!(procedural.objects[0].path, "/root/rock");
    assert_eq!(procedural.objects[0].used_shaders, vec![ShaderRef::DefaultSurface]);

    let updates = sync.take_updates();
    assert_eq!(updates.procedurals.len(), 1);
    assert!(updates.procedural_manager);
}

#[test]
fn test_objects_of_one_cache_share_procedural() {
    let (mut sync, _) = create_sync(SyncConfig::default());
    let mut provider = MockSceneProvider::new();
    provider.add_object(cached_object(1, "/root/rock"), Mat4::IDENTITY);
    provider.add_object(cached_object(2, "/root/tree"), Mat4::IDENTITY);

    sync.run_full_pass(&provider, 0.0);

    assert_eq!(sync.scene().procedurals().count(), 1);
    let (_, procedural) = sync.scene().procedurals().next().unwrap();
    let paths: Vec<&str> = procedural.objects.iter().map(|object| object.path.as_str()).collect();
    assert_eq!(paths, vec!["/root/rock", "/root/tree"]);
}

#[test]
fn test_unchanged_procedural_is_not_tagged() {
    let (mut sync, _) = create_sync(SyncConfig::default());
    let mut provider = MockSceneProvider::new();
    provider.add_object(cached_object(1, "/root/rock"), Mat4::IDENTITY);
    sync.run_full_pass(&provider, 0.0);
    sync.take_updates();

    sync.run_full_pass(&provider, 0.0);

    let updates = sync.take_updates();
    assert!(updates.procedurals.is_empty());
    assert!(!updates.procedural_manager);
    assert_eq!(sync.scene().procedurals().next().unwrap().1.objects.len(), 1);
}

#[test]
fn test_frame_change_tags_procedural_manager() {
    let (mut sync, _) = create_sync(SyncConfig::default());
    let mut provider = MockSceneProvider::new();
    provider.add_object(cached_object(1, "/root/rock"), Mat4::IDENTITY);
    sync.run_full_pass(&provider, 0.0);
    sync.take_updates();

    provider.set_frame(FrameTime::new(5, 0.0));
    sync.run_full_pass(&provider, 0.0);

    assert_eq!(sync.scene().procedurals().next().unwrap().1.frame(), 5.0);
    let updates = sync.take_updates();
    assert_eq!(updates.procedurals.len(), 1);
    assert!(updates.procedural_manager);
}

#[test]
fn test_procedural_untouched_by_motion_pass() {
    let (mut sync, _) = create_sync(SyncConfig { motion_blur: true, ..Default::default() });
    let mut provider = MockSceneProvider::new();
    provider.add_object(cached_object(1, "/root/rock"), Mat4::IDENTITY);
    sync.run_full_pass(&provider, 0.0);
    sync.take_updates();

    provider.set_frame(FrameTime::new(5, 0.0));
    sync.run_full_pass(&provider, 1.0);

    assert_eq!(sync.scene().procedurals().next().unwrap().1.frame(), 1.0);
    assert!(sync.take_updates().procedurals.is_empty());
}

#[test]
fn test_removed_cache_is_pruned() {
    let (mut sync, _) = create_sync(SyncConfig::default());
    let mut provider = MockSceneProvider::new();
    provider.add_object(cached_object(1, "/root/rock"), Mat4::IDENTITY);
    sync.run_full_pass(&provider, 0.0);

    provider.remove_instances_of(DataId(1));
    sync.run_full_pass(&provider, 0.0);

    assert_eq!(sync.scene().procedurals().count(), 0);
}

#[test]
fn test_cache_before_other_modifiers_is_regular_object() {
    let (mut sync, converter) = create_sync(SyncConfig::default());
    let mut provider = MockSceneProvider::new();
    let mut info = cached_object(1, "/root/rock");
    info.modifiers.push(ModifierInfo { kind: ModifierKind::Deform("Smooth".to_string()), enabled: true });
    provider.add_object(info, Mat4::IDENTITY);

    sync.run_full_pass(&provider, 0.0);

    assert_eq!(sync.scene().procedurals().count(), 0);
    assert_eq!(sync.scene().object_count(), 1);
    assert_eq!(converter.conversion_count(), 1);
}
