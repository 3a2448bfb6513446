/// Light sync: scene lights and the world background light.

use crate::provider::{InstanceRecord, LightKind, ObjectInfo, SceneProvider, WorldSampling};
use super::object_key::ObjectKey;
use super::object_sync::name_random_id;
use super::scene_sync::{PassContext, SceneSync};

impl SceneSync {
    /// Sync a light instance, rewriting it when new, recalc-tagged or moved
    pub(super) fn sync_light<P: SceneProvider + ?Sized>(
        &mut self,
        provider: &P,
        pass: &mut PassContext,
        record: &InstanceRecord,
        info: &ObjectInfo,
    ) {
        let Some(light_info) = provider.light(info.id) else {
            return;
        };
        let key = ObjectKey::from_instance(record, false);
        let tfm = record.matrix_world;

        let (handle, updated) = self.scene.lights.add_or_update(&key, info.id, record.parent);
        let Some(light) = self.scene.lights.get_mut(handle) else {
            return;
        };

        if !updated && light.tfm == tfm {
            pass.use_portal |= light.is_portal;
            return;
        }

        light.name = info.name.clone();
        light.kind = light_info.kind;
        light.tfm = tfm;
        light.color = light_info.color;
        light.strength = light_info.energy;
        light.size = light_info.size;
        light.random_id = if record.is_instance() {
            record.random_id
        } else {
            name_random_id(&info.name)
        };
        light.is_portal = light_info.is_portal;
        light.cast_shadow = light_info.cast_shadow;
        light.use_mis = light_info.use_mis;
        light.max_bounces = light_info.max_bounces;
        light.is_enabled = true;
        light.tag_update();

        pass.use_portal |= light.is_portal;
        pass.report.lights_synced += 1;
    }

    /// Sync the world as a background light when it is sampled as a light
    /// or a portal was seen during the pass
    pub(super) fn sync_background_light<P: SceneProvider + ?Sized>(&mut self, provider: &P, use_portal: bool) {
        let world = provider.world();
        let world_changed = self.world_needs_sync(world.map(|world| world.id));

        let Some(world) = world else {
            return;
        };
        let sample_as_light = world.sampling != WorldSampling::None;
        if !sample_as_light && !use_portal {
            return;
        }

        let key = ObjectKey::standalone(world.id);
        let (handle, updated) = self.scene.lights.add_or_update(&key, world.id, None);
        if !updated && !world_changed {
            return;
        }
        let Some(light) = self.scene.lights.get_mut(handle) else {
            return;
        };

        light.name = "background".to_string();
        light.kind = LightKind::Background;
        light.map_resolution = if world.sampling == WorldSampling::Manual {
            world.map_resolution
        } else {
            0
        };
        light.use_mis = sample_as_light;
        light.max_bounces = world.max_bounces;
        // A resynced world re-enables its light
        light.is_enabled = true;
        light.tag_update();
    }
}

#[cfg(test)]
#[path = "light_sync_tests.rs"]
mod tests;
