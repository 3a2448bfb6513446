/// Particle sync: particles that generated duplis, gathered per system.

use crate::provider::{InstanceRecord, SceneProvider};
use crate::scene::{ObjectHandle, ObjectManagerUpdate, Particle, StandardAttribute};
use super::object_key::ParticleSystemKey;
use super::scene_sync::SceneSync;

impl SceneSync {
    /// Record the particle behind a dupli on its particle system.
    ///
    /// Only for instances generated by a particle system whose geometry
    /// asks for particle data. The system is cleared the first time it is
    /// used in a pass; each dupli appends its particle and remembers the
    /// index.
    pub(super) fn sync_dupli_particle<P: SceneProvider + ?Sized>(
        &mut self,
        provider: &P,
        record: &InstanceRecord,
        handle: ObjectHandle,
    ) -> bool {
        let Some(psys) = record.particle_system else {
            return false;
        };
        let (Some(parent), Some(persistent_id)) = (record.parent, record.persistent_id) else {
            return false;
        };

        let Some(object) = self.scene.objects.get_mut(handle) else {
            return false;
        };
        object.set_hide_on_missing_motion(true);

        let Some(geometry) = object.geometry().and_then(|geometry| self.scene.geometries.get(geometry)) else {
            return false;
        };
        if !geometry.need_attribute(StandardAttribute::Particle) {
            return false;
        }
        let geometry_modified = geometry.is_modified();

        let Some(index) = persistent_id.first().and_then(|index| usize::try_from(index).ok()) else {
            return false;
        };
        if index >= provider.particle_count(psys.system) {
            return false;
        }
        let Some(info) = provider.particle(psys.system, index) else {
            return false;
        };

        let key = ParticleSystemKey::new(parent, &persistent_id);
        let first_use = !self.scene.particle_systems.is_used(&key);
        let (system_handle, need_update) = self.scene.particle_systems.add_or_update(&key, parent, Some(record.object));

        if !need_update && !geometry_modified && !self.scene.object_manager_needs_update() {
            return true;
        }

        let Some(system) = self.scene.particle_systems.get_mut(system_handle) else {
            return false;
        };
        if first_use {
            system.particles.clear();
            system.tag_update();
        }

        system.particles.push(Particle {
            index,
            age: provider.frame().time() - info.birth_time,
            lifetime: info.lifetime,
            location: info.location,
            rotation: info.rotation,
            size: info.size,
            velocity: info.velocity,
            angular_velocity: info.angular_velocity,
        });
        let particle_index = system.particles.len() - 1;

        let Some(object) = self.scene.objects.get_mut(handle) else {
            return false;
        };
        object.set_particle_system(Some(system_handle));
        let index_changed = object.particle_index() != particle_index;
        object.set_particle_index(particle_index);

        if index_changed {
            self.scene.tag_object_manager(ObjectManagerUpdate::PARTICLE_MODIFIED);
        }
        true
    }
}

#[cfg(test)]
#[path = "particle_sync_tests.rs"]
mod tests;
