/// Geometry sync: one conversion per geometry key and generation.

use std::sync::Arc;
use crate::provider::{
    GeometrySource, InstanceRecord, ObjectInfo, ObjectKind, SceneProvider, ShaderRef,
};
use crate::scene::{AttributeRequestSet, Geometry, GeometryHandle, GeometryKind};
use super::dispatcher::{GeometryJob, JobId};
use super::object_key::GeometryKey;
use super::scene_sync::{PassContext, SceneSync};

/// Shaders of an object's material slots.
///
/// Empty slots use the default surface; an object without slots uses the
/// default volume shader for volumes and the default surface otherwise.
pub fn find_used_shaders(info: &ObjectInfo) -> Vec<ShaderRef> {
    if info.material_slots.is_empty() {
        let fallback = if info.kind == ObjectKind::Volume {
            ShaderRef::DefaultVolume
        } else {
            ShaderRef::DefaultSurface
        };
        return vec![fallback];
    }
    info.material_slots
        .iter()
        .map(|slot| slot.material.map_or(ShaderRef::DefaultSurface, ShaderRef::Material))
        .collect()
}

/// Attribute requests of every material among `shaders`
pub fn gather_needed_attributes<P: SceneProvider + ?Sized>(
    provider: &P,
    shaders: &[ShaderRef],
) -> AttributeRequestSet {
    let mut requests = AttributeRequestSet::new();
    for shader in shaders {
        if let ShaderRef::Material(material) = shader {
            requests.add_all(provider.material_attributes(*material));
        }
    }
    requests
}

/// Geometry key of an object: the object itself when its evaluated
/// geometry is unique to it, its data-block otherwise
pub fn geometry_key(info: &ObjectInfo, use_particle_hair: bool) -> Option<GeometryKey> {
    let data = info.data?;
    let id = if info.is_modified() { info.id } else { data };
    Some(GeometryKey::new(id, use_particle_hair))
}

fn geometry_kind(info: &ObjectInfo, use_particle_hair: bool) -> GeometryKind {
    if use_particle_hair || info.kind == ObjectKind::Hair {
        GeometryKind::Hair
    } else if info.kind == ObjectKind::Volume {
        GeometryKind::Volume
    } else {
        GeometryKind::Mesh
    }
}

fn job_label(info: &ObjectInfo, use_particle_hair: bool) -> String {
    if use_particle_hair {
        format!("{} (particle hair)", info.name)
    } else {
        info.name.clone()
    }
}

impl SceneSync {
    /// Find or create the geometry of an instance and queue its conversion.
    ///
    /// A geometry already converted during this sync is returned as is.
    /// Existing geometry is only re-converted when tagged for recalc, when
    /// its previous conversion never completed, when the object changed
    /// and its transform is baked in, or when its shaders or requested
    /// attributes changed.
    pub(super) fn sync_geometry<P: SceneProvider + ?Sized>(
        &mut self,
        provider: &P,
        pass: &mut PassContext,
        record: &InstanceRecord,
        info: &ObjectInfo,
        object_updated: bool,
        use_particle_hair: bool,
    ) -> Option<GeometryHandle> {
        let key = geometry_key(info, use_particle_hair)?;
        let data = info.data?;
        let used_shaders = find_used_shaders(info);
        let needed_attributes = gather_needed_attributes(provider, &used_shaders);

        let found = self.scene.geometries.find(&key);
        if let Some(handle) = found {
            if self.geometry_synced.contains(&handle) {
                return Some(handle);
            }
        }

        let handle = match found {
            None => self
                .scene
                .geometries
                .add(&key, Geometry::new(geometry_kind(info, use_particle_hair))),
            Some(handle) => {
                let recalc = self.scene.geometries.update(handle, key.id);
                let geometry = self.scene.geometries.get(handle)?;
                // Incomplete conversions are retried by the next generation
                let needs_sync = recalc
                    || geometry.shared().conversion_pending()
                    || (object_updated && geometry.transform_applied())
                    || geometry.used_shaders() != used_shaders.as_slice()
                    || geometry.needed_attributes() != &needed_attributes;
                if !needs_sync {
                    return Some(handle);
                }
                handle
            }
        };

        self.geometry_synced.insert(handle);
        let geometry = self.scene.geometries.get_mut(handle)?;
        geometry.name = info.data_name.clone();
        // Stored here so object attributes can read them before the job runs
        geometry.set_used_shaders(used_shaders.clone());
        geometry.set_needed_attributes(needed_attributes.clone());
        let target = Arc::clone(geometry.shared());
        target.begin_conversion();

        let source = GeometrySource {
            object: info.id,
            data,
            name: info.name.clone(),
            kind: geometry.kind(),
            use_particle_hair,
            used_shaders,
            needed_attributes,
            motion_time: 0.0,
        };
        let converter = Arc::clone(&self.converter);
        let progress = self.progress.clone();
        let job = GeometryJob::new(job_label(info, use_particle_hair), target, move |shared| {
            if progress.is_cancelled() {
                return Ok(());
            }
            progress.set_status(format!("Synchronizing object | {}", source.name));
            let data = converter.convert(&source)?;
            shared.replace(data);
            Ok(())
        })
        .after(self.base_job(key));

        self.dispatch(key, record.is_instance(), job);
        pass.report.geometries_queued += 1;
        Some(handle)
    }

    /// Sync deformation of a geometry at the pass's motion time.
    ///
    /// Runs at most once per geometry and motion pass, and only for
    /// geometry converted during this sync that uses deformation blur and
    /// samples this time.
    pub(super) fn sync_geometry_motion(
        &mut self,
        record: &InstanceRecord,
        info: &ObjectInfo,
        handle: GeometryHandle,
        use_particle_hair: bool,
        motion_time: f32,
    ) {
        if !self.geometry_motion_synced.insert(handle) {
            return;
        }
        if !self.geometry_synced.contains(&handle) {
            return;
        }
        let Some(key) = geometry_key(info, use_particle_hair) else {
            return;
        };
        let Some(data) = info.data else {
            return;
        };
        let Some(geometry) = self.scene.geometries.get(handle) else {
            return;
        };
        // No volume motion blur
        if geometry.kind() == GeometryKind::Volume || !geometry.use_motion_blur() {
            return;
        }
        let Some(step) = geometry.motion_step(motion_time) else {
            return;
        };

        let source = GeometrySource {
            object: info.id,
            data,
            name: info.name.clone(),
            kind: geometry.kind(),
            use_particle_hair,
            used_shaders: geometry.used_shaders().to_vec(),
            needed_attributes: geometry.needed_attributes().clone(),
            motion_time,
        };
        let target = Arc::clone(geometry.shared());
        let converter = Arc::clone(&self.converter);
        let progress = self.progress.clone();
        let job = GeometryJob::new(job_label(info, use_particle_hair), target, move |shared| {
            if progress.is_cancelled() {
                return Ok(());
            }
            let positions = converter.convert_motion(&source, step)?;
            shared.set_motion_positions(step, positions);
            Ok(())
        })
        .after(self.base_job(key));

        self.dispatch(key, record.is_instance(), job);
    }

    /// Job of the base mesh a particle-hair conversion must wait for
    fn base_job(&self, key: GeometryKey) -> Option<JobId> {
        if !key.use_particle_hair {
            return None;
        }
        self.geometry_jobs
            .get(&GeometryKey::new(key.id, false))
            .copied()
    }
}

#[cfg(test)]
#[path = "geometry_sync_tests.rs"]
mod tests;
