/// Object sync: identity, geometry binding, attributes and finalize.

use std::hash::{Hash, Hasher};
use glam::{Mat4, Vec2, Vec3};
use rustc_hash::FxHasher;
use crate::config::MotionType;
use crate::error::Result;
use crate::provider::{InstanceRecord, MotionSettings, ObjectInfo, SceneProvider};
use crate::scene::{GeometryHandle, ObjectHandle, ObjectManagerUpdate};
use super::attributes::reconcile_attributes;
use super::motion::{object_motion_steps, object_use_deform_motion};
use super::object_key::ObjectKey;
use super::scene_sync::{PassContext, SceneSync};
use super::visibility::{AdmittedInstance, FilterDecision, InstanceVisibility};

/// Random id of an object that is not an instance
pub fn name_random_id(name: &str) -> u32 {
    let mut hasher = FxHasher::default();
    name.hash(&mut hasher);
    hasher.finish() as u32
}

/// Name of the top-most scene parent, or the object's own name
pub fn asset_name<P: SceneProvider + ?Sized>(provider: &P, info: &ObjectInfo) -> String {
    let mut name = info.name.clone();
    let mut parent = info.parent;
    // Bounded walk; a cyclic hierarchy stops at the last distinct parent
    let mut remaining = 64;
    while let Some(id) = parent {
        if remaining == 0 || id == info.id {
            break;
        }
        let Some(parent_info) = provider.object(id) else {
            break;
        };
        name = parent_info.name;
        parent = parent_info.parent;
        remaining -= 1;
    }
    name
}

impl SceneSync {
    /// Sync one instance as an object, its particle-hair variant when
    /// `use_particle_hair` is set.
    pub(super) fn sync_object<P: SceneProvider + ?Sized>(
        &mut self,
        provider: &P,
        pass: &mut PassContext,
        record: &InstanceRecord,
        instance: &AdmittedInstance,
        use_particle_hair: bool,
    ) {
        let info = &instance.object;
        let parent = instance.parent.as_ref();
        let resolved = match pass.filter.evaluate(record, info, parent, pass.is_motion()) {
            FilterDecision::Skip(reason) => {
                pass.skip(record, reason);
                return;
            }
            FilterDecision::Light => {
                self.sync_light(provider, pass, record, info);
                return;
            }
            FilterDecision::Geometry(resolved) => resolved,
        };

        let key = ObjectKey::from_instance(record, use_particle_hair);
        if pass.is_motion() {
            self.sync_object_motion(pass, record, info, &key, use_particle_hair);
            return;
        }

        let (handle, object_updated) = self.scene.objects.add_or_update(&key, info.id, record.parent);
        pass.report.objects_synced += 1;

        let geometry = self.sync_geometry(provider, pass, record, info, object_updated, use_particle_hair);
        let parent_motion = parent.map(|parent| parent.settings.motion());
        if let Ok(true) = self.update_object(provider, handle, record, info, geometry, parent_motion, resolved, object_updated) {
            pass.report.objects_changed += 1;
        }

        if record.is_instance() {
            self.sync_dupli_particle(provider, record, handle);
        }
    }

    /// Write an object's render data; true when it was rewritten.
    ///
    /// Fails only when `handle` went stale.
    #[allow(clippy::too_many_arguments)]
    fn update_object<P: SceneProvider + ?Sized>(
        &mut self,
        provider: &P,
        handle: ObjectHandle,
        record: &InstanceRecord,
        info: &ObjectInfo,
        geometry: Option<GeometryHandle>,
        parent_motion: Option<MotionSettings>,
        resolved: InstanceVisibility,
        object_updated: bool,
    ) -> Result<bool> {
        let tfm = record.matrix_world;
        let need_motion = self.config.need_motion();
        let asset_name = asset_name(provider, info);
        let (requests, geometry_modified) = geometry
            .and_then(|geometry| self.scene.geometries.get(geometry))
            .map(|geometry| (geometry.needed_attributes().clone(), geometry.is_modified()))
            .unwrap_or_default();

        let object = self.scene.object_mut(handle)?;
        object.set_geometry(geometry);

        let attributes_changed = reconcile_attributes(provider, record, info, &requests, object);

        let holdout_changed = object.use_holdout() != resolved.use_holdout;
        object.set_use_holdout(resolved.use_holdout);
        object.set_visibility(resolved.visibility);
        object.set_is_shadow_catcher(info.settings.is_shadow_catcher);
        object.set_shadow_terminator_offset(info.settings.shadow_terminator_offset);
        object.set_asset_name(asset_name);

        // Duplis do not always signal transform changes
        let changed = object_updated
            || attributes_changed
            || object.is_modified()
            || geometry_modified
            || tfm != object.tfm();

        if changed {
            object.name = info.name.clone();
            object.set_pass_id(info.pass_index);
            object.set_color(info.color);
            object.set_tfm(tfm);

            let object_motion = info.settings.motion();
            let motion_steps = match (need_motion, geometry) {
                (MotionType::None, _) | (_, None) => 0,
                (MotionType::Blur, Some(_)) => object_motion_steps(object_motion, parent_motion),
                (MotionType::Pass, Some(_)) => 3,
            };

            let mut motion = vec![Mat4::IDENTITY; motion_steps as usize];
            if let Some(centre) = motion.get_mut(motion_steps as usize / 2) {
                *centre = tfm;
            }
            object.set_motion(motion);
            for step in 0..motion_steps as usize {
                self.motion_times.insert(object.motion_time(step));
            }

            if record.is_instance() {
                object.set_dupli_generated(0.5 * record.orco - Vec3::splat(0.5));
                object.set_dupli_uv(record.uv);
                object.set_random_id(record.random_id);
            } else {
                object.set_dupli_generated(Vec3::ZERO);
                object.set_dupli_uv(Vec2::ZERO);
                object.set_random_id(name_random_id(&object.name));
            }
            object.tag_update();

            let geometry = geometry.and_then(|geometry| self.scene.geometries.get_mut(geometry));
            if let (Some(geometry), true) = (geometry, need_motion != MotionType::None) {
                let deform = need_motion == MotionType::Blur
                    && motion_steps > 0
                    && object_use_deform_motion(object_motion, parent_motion);
                geometry.set_motion_steps(motion_steps);
                geometry.set_use_motion_blur(deform);
            }
        }

        if holdout_changed {
            self.scene.tag_object_manager(ObjectManagerUpdate::HOLDOUT_MODIFIED);
        }
        Ok(changed)
    }

    /// Motion-only pass: write the transform slot matching the pass time
    /// and re-sync deformation. Creates nothing.
    fn sync_object_motion(
        &mut self,
        pass: &mut PassContext,
        record: &InstanceRecord,
        info: &ObjectInfo,
        key: &ObjectKey,
        use_particle_hair: bool,
    ) {
        let Some(handle) = self.scene.objects.find(key) else {
            return;
        };
        let Ok(object) = self.scene.object_mut(handle) else {
            return;
        };
        if !object.use_motion() {
            return;
        }

        if let Some(step) = object.motion_step(pass.motion_time) {
            object.set_motion_step(step, record.matrix_world);
            pass.report.objects_synced += 1;
        }

        if let Some(geometry) = object.geometry() {
            self.sync_geometry_motion(record, info, geometry, use_particle_hair, pass.motion_time);
        }
    }
}

#[cfg(test)]
#[path = "object_sync_tests.rs"]
mod tests;
