/// RenderScene: the internally-owned scene produced by synchronization.
///
/// Every entity kind lives in its own identity cache. Entities are tagged
/// while a pass writes them; `take_updates` hands the tagged handles to the
/// renderer and clears the tags.

use bitflags::bitflags;
use crate::engine_err;
use crate::error::Result;
use crate::provider::DataId;
use crate::sync::{GeometryKey, IdentityCache, ObjectKey, ParticleSystemKey};
use super::camera::SyncCamera;
use super::geometry::{Geometry, GeometryHandle};
use super::light::{Light, LightHandle};
use super::object::{Object, ObjectHandle};
use super::particles::{ParticleSystem, ParticleSystemHandle};
use super::procedural::{Procedural, ProceduralHandle};

bitflags! {
    /// Scene-wide object manager updates
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct ObjectManagerUpdate: u32 {
        /// An object's holdout state changed
        const HOLDOUT_MODIFIED  = 1 << 0;
        /// An object's particle index changed
        const PARTICLE_MODIFIED = 1 << 1;
        /// Objects were added, modified or removed
        const OBJECT_MODIFIED   = 1 << 2;
    }
}

/// Everything tagged since the previous `take_updates`
#[derive(Debug, Clone, Default)]
pub struct SceneUpdates {
    pub objects: Vec<ObjectHandle>,
    pub geometries: Vec<GeometryHandle>,
    pub lights: Vec<LightHandle>,
    pub particle_systems: Vec<ParticleSystemHandle>,
    pub procedurals: Vec<ProceduralHandle>,
    pub camera: bool,
    pub object_manager: ObjectManagerUpdate,
    pub procedural_manager: bool,
}

impl SceneUpdates {
    /// True when nothing needs re-deriving
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
            && self.geometries.is_empty()
            && self.lights.is_empty()
            && self.particle_systems.is_empty()
            && self.procedurals.is_empty()
            && !self.camera
            && self.object_manager.is_empty()
            && !self.procedural_manager
    }
}

/// The render scene owned by a `SceneSync`
pub struct RenderScene {
    pub(crate) objects: IdentityCache<ObjectKey, ObjectHandle, Object>,
    pub(crate) geometries: IdentityCache<GeometryKey, GeometryHandle, Geometry>,
    pub(crate) lights: IdentityCache<ObjectKey, LightHandle, Light>,
    pub(crate) particle_systems: IdentityCache<ParticleSystemKey, ParticleSystemHandle, ParticleSystem>,
    pub(crate) procedurals: IdentityCache<DataId, ProceduralHandle, Procedural>,
    pub(crate) camera: SyncCamera,
    object_manager: ObjectManagerUpdate,
    procedural_manager: bool,
}

impl Default for RenderScene {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderScene {
    pub fn new() -> Self {
        Self {
            objects: IdentityCache::new(),
            geometries: IdentityCache::new(),
            lights: IdentityCache::new(),
            particle_systems: IdentityCache::new(),
            procedurals: IdentityCache::new(),
            camera: SyncCamera::default(),
            object_manager: ObjectManagerUpdate::empty(),
            procedural_manager: false,
        }
    }

    // ===== OBJECTS =====

    pub fn object(&self, handle: ObjectHandle) -> Option<&Object> {
        self.objects.get(handle)
    }

    /// Object behind a handle that must still be live
    pub fn object_mut(&mut self, handle: ObjectHandle) -> Result<&mut Object> {
        self.objects
            .get_mut(handle)
            .ok_or_else(|| engine_err!("galaxy3d::RenderScene", "Object {:?} not found", handle))
    }

    pub fn find_object(&self, key: &ObjectKey) -> Option<ObjectHandle> {
        self.objects.find(key)
    }

    pub fn objects(&self) -> impl Iterator<Item = (ObjectHandle, &Object)> {
        self.objects.iter()
    }

    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    // ===== GEOMETRIES =====

    pub fn geometry(&self, handle: GeometryHandle) -> Option<&Geometry> {
        self.geometries.get(handle)
    }

    pub fn find_geometry(&self, key: &GeometryKey) -> Option<GeometryHandle> {
        self.geometries.find(key)
    }

    pub fn geometries(&self) -> impl Iterator<Item = (GeometryHandle, &Geometry)> {
        self.geometries.iter()
    }

    pub fn geometry_count(&self) -> usize {
        self.geometries.len()
    }

    // ===== LIGHTS =====

    pub fn light(&self, handle: LightHandle) -> Option<&Light> {
        self.lights.get(handle)
    }

    pub fn find_light(&self, key: &ObjectKey) -> Option<LightHandle> {
        self.lights.find(key)
    }

    pub fn lights(&self) -> impl Iterator<Item = (LightHandle, &Light)> {
        self.lights.iter()
    }

    pub fn light_count(&self) -> usize {
        self.lights.len()
    }

    // ===== PARTICLES / PROCEDURALS / CAMERA =====

    pub fn particle_system(&self, handle: ParticleSystemHandle) -> Option<&ParticleSystem> {
        self.particle_systems.get(handle)
    }

    pub fn particle_systems(&self) -> impl Iterator<Item = (ParticleSystemHandle, &ParticleSystem)> {
        self.particle_systems.iter()
    }

    pub fn procedural(&self, handle: ProceduralHandle) -> Option<&Procedural> {
        self.procedurals.get(handle)
    }

    pub fn procedurals(&self) -> impl Iterator<Item = (ProceduralHandle, &Procedural)> {
        self.procedurals.iter()
    }

    pub fn camera(&self) -> &SyncCamera {
        &self.camera
    }

    // ===== UPDATE TRACKING =====

    pub fn tag_object_manager(&mut self, update: ObjectManagerUpdate) {
        self.object_manager |= update;
    }

    pub fn tag_procedural_manager(&mut self) {
        self.procedural_manager = true;
    }

    /// Whether the object manager has pending work
    pub fn object_manager_needs_update(&self) -> bool {
        !self.object_manager.is_empty()
    }

    /// Reset change bits at the start of a sync
    pub(crate) fn begin_sync(&mut self) {
        for (_, object) in self.objects.iter_mut() {
            object.clear_modified();
        }
        for (_, geometry) in self.geometries.iter() {
            geometry.clear_modified();
        }
        for (_, procedural) in self.procedurals.iter_mut() {
            procedural.clear_modified();
        }
    }

    /// Take and clear everything tagged since the previous call
    pub fn take_updates(&mut self) -> SceneUpdates {
        let mut updates = SceneUpdates {
            camera: self.camera.is_tagged(),
            object_manager: std::mem::take(&mut self.object_manager),
            procedural_manager: std::mem::take(&mut self.procedural_manager),
            ..Default::default()
        };
        self.camera.clear_tag();

        for (handle, object) in self.objects.iter_mut() {
            if object.is_tagged() {
                object.clear_tag();
                updates.objects.push(handle);
            }
        }
        for (handle, geometry) in self.geometries.iter_mut() {
            if geometry.is_tagged() {
                geometry.clear_tag();
                updates.geometries.push(handle);
            }
        }
        for (handle, light) in self.lights.iter_mut() {
            if light.is_tagged() {
                light.clear_tag();
                updates.lights.push(handle);
            }
        }
        for (handle, system) in self.particle_systems.iter_mut() {
            if system.is_tagged() {
                system.clear_tag();
                updates.particle_systems.push(handle);
            }
        }
        for (handle, procedural) in self.procedurals.iter_mut() {
            if procedural.is_tagged() {
                procedural.clear_tag();
                updates.procedurals.push(handle);
            }
        }
        updates
    }
}

#[cfg(test)]
#[path = "render_scene_tests.rs"]
mod tests;
