/// Tests for identity keys

use super::*;
use glam::Mat4;
use rustc_hash::FxHashSet;

// ============================================================================
// Tests: ObjectKey
// ============================================================================

#[test]
fn test_plain_object_keyed_by_itself() {
    let record = InstanceRecord::object(DataId(4), Mat4::IDENTITY);
    let key = ObjectKey::from_instance(&record, false);

    assert_eq!(key.parent, DataId(4));
    assert_eq!(key.object, DataId(4));
    assert_eq!(key.persistent_id, None);
}

#[test]
fn test_key_independent_of_transform() {
    let a = InstanceRecord::object(DataId(4), Mat4::IDENTITY);
    let b = InstanceRecord::object(DataId(4), Mat4::from_scale(glam::Vec3::splat(3.0)));

    assert_eq!(ObjectKey::from_instance(&a, false), ObjectKey::from_instance(&b, false));
}

#[test]
fn test_duplicates_differ_by_path() {
    let keys: FxHashSet<ObjectKey> = (0..3)
        .map(|i| InstanceRecord::duplicate(DataId(4), DataId(1), &[i], Mat4::IDENTITY))
        .map(|record| ObjectKey::from_instance(&record, false))
        .collect();

    assert_eq!(keys.len(), 3);
}

#[test]
fn test_duplicate_differs_from_original() {
    let original = InstanceRecord::object(DataId(4), Mat4::IDENTITY);
    let duplicate = InstanceRecord::duplicate(DataId(4), DataId(1), &[0], Mat4::IDENTITY);

    assert_ne!(
        ObjectKey::from_instance(&original, false),
        ObjectKey::from_instance(&duplicate, false)
    );
}

#[test]
fn test_hair_variant_differs() {
    let record = InstanceRecord::object(DataId(4), Mat4::IDENTITY);
    assert_ne!(
        ObjectKey::from_instance(&record, false),
        ObjectKey::from_instance(&record, true)
    );
}

// ============================================================================
// Tests: ParticleSystemKey
// ============================================================================

#[test]
fn test_particle_system_key_drops_particle_index() {
    let a = ParticleSystemKey::new(DataId(1), &PersistentId::new(&[0, 7]));
    let b = ParticleSystemKey::new(DataId(1), &PersistentId::new(&[5, 7]));
    let c = ParticleSystemKey::new(DataId(1), &PersistentId::new(&[5, 8]));

    assert_eq!(a, b);
    assert_ne!(a, c);
    assert_eq!(a.persistent_id.as_slice(), &[7]);
}
