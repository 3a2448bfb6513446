/// Stable identity keys derived from ephemeral instance records.

use crate::provider::{DataId, InstanceRecord, PersistentId};

/// Identity of one conceptual object instance.
///
/// A non-duplicated object is keyed by itself as both parent and instance,
/// with no persistent-id path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectKey {
    pub parent: DataId,
    pub persistent_id: Option<PersistentId>,
    pub object: DataId,
    /// Distinguishes the particle-hair export of an object from the object itself
    pub use_particle_hair: bool,
}

impl ObjectKey {
    pub fn new(
        parent: DataId,
        persistent_id: Option<PersistentId>,
        object: DataId,
        use_particle_hair: bool,
    ) -> Self {
        Self { parent, persistent_id, object, use_particle_hair }
    }

    /// Key for an instance record
    pub fn from_instance(record: &InstanceRecord, use_particle_hair: bool) -> Self {
        match record.parent {
            Some(parent) => Self::new(parent, record.persistent_id, record.object, use_particle_hair),
            None => Self::new(record.object, None, record.object, use_particle_hair),
        }
    }

    /// Key of a data-block synced on its own (world, cache file)
    pub fn standalone(id: DataId) -> Self {
        Self::new(id, None, id, false)
    }
}

/// Identity of a shared geometry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GeometryKey {
    /// Data-block, or the object itself when its evaluated geometry is unique
    pub id: DataId,
    pub use_particle_hair: bool,
}

impl GeometryKey {
    pub fn new(id: DataId, use_particle_hair: bool) -> Self {
        Self { id, use_particle_hair }
    }
}

/// Identity of a particle system: the duplicator and the instance path
/// without its particle index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ParticleSystemKey {
    pub object: DataId,
    pub persistent_id: PersistentId,
}

impl ParticleSystemKey {
    pub fn new(object: DataId, persistent_id: &PersistentId) -> Self {
        Self { object, persistent_id: persistent_id.tail() }
    }
}

#[cfg(test)]
#[path = "object_key_tests.rs"]
mod tests;
