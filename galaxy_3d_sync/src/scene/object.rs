/// Render-side object: one long-lived entity per distinct identity key.
///
/// Setters record which fields actually changed during the current sync
/// (`changes`), and `tag_update` marks the object for the renderer until
/// the next `RenderScene::take_updates`.

use bitflags::bitflags;
use glam::{Mat4, Vec2, Vec3};
use slotmap::new_key_type;
use crate::provider::RayVisibility;
use super::attribute::ParamValue;
use super::geometry::GeometryHandle;
use super::particles::ParticleSystemHandle;

// ===== SLOT MAP KEY =====

new_key_type! {
    /// Stable handle of an Object within a RenderScene.
    ///
    /// Remains valid until the object is pruned at the end of a pass
    /// that did not visit it.
    pub struct ObjectHandle;
}

/// Largest supported number of motion steps
pub const MAX_MOTION_STEPS: u32 = 129;

bitflags! {
    /// Fields of an Object modified since the start of the current sync
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct ObjectChanges: u32 {
        const NAME            = 1 << 0;
        const GEOMETRY        = 1 << 1;
        const TRANSFORM       = 1 << 2;
        const MOTION          = 1 << 3;
        const VISIBILITY      = 1 << 4;
        const HOLDOUT         = 1 << 5;
        const SHADOW_CATCHER  = 1 << 6;
        const SHADING         = 1 << 7;
        const DUPLI           = 1 << 8;
        const PARTICLE_SYSTEM = 1 << 9;
        const PARTICLE_INDEX  = 1 << 10;
        const ATTRIBUTES      = 1 << 11;
    }
}

/// Render entity for one object instance
#[derive(Debug, Clone)]
pub struct Object {
    pub name: String,
    geometry: Option<GeometryHandle>,
    tfm: Mat4,
    motion: Vec<Mat4>,
    visibility: RayVisibility,
    use_holdout: bool,
    is_shadow_catcher: bool,
    shadow_terminator_offset: f32,
    asset_name: String,
    pass_id: i32,
    color: Vec3,
    dupli_generated: Vec3,
    dupli_uv: Vec2,
    random_id: u32,
    hide_on_missing_motion: bool,
    particle_system: Option<ParticleSystemHandle>,
    particle_index: usize,
    /// Per-object shader attributes, kept in sync with the geometry's requests
    pub attributes: Vec<ParamValue>,
    changes: ObjectChanges,
    tagged: bool,
}

impl Default for Object {
    fn default() -> Self {
        Self {
            name: String::new(),
            geometry: None,
            tfm: Mat4::IDENTITY,
            motion: Vec::new(),
            visibility: RayVisibility::all(),
            use_holdout: false,
            is_shadow_catcher: false,
            shadow_terminator_offset: 0.0,
            asset_name: String::new(),
            pass_id: 0,
            color: Vec3::ZERO,
            dupli_generated: Vec3::ZERO,
            dupli_uv: Vec2::ZERO,
            random_id: 0,
            hide_on_missing_motion: false,
            particle_system: None,
            particle_index: 0,
            attributes: Vec::new(),
            changes: ObjectChanges::empty(),
            tagged: false,
        }
    }
}

macro_rules! tracked_setter {
    ($setter:ident, $field:ident, $ty:ty, $flag:ident) => {
        pub fn $setter(&mut self, value: $ty) {
            if self.$field != value {
                self.$field = value;
                self.changes |= ObjectChanges::$flag;
            }
        }
    };
}

impl Object {
    tracked_setter!(set_geometry, geometry, Option<GeometryHandle>, GEOMETRY);
    tracked_setter!(set_tfm, tfm, Mat4, TRANSFORM);
    tracked_setter!(set_motion, motion, Vec<Mat4>, MOTION);
    tracked_setter!(set_visibility, visibility, RayVisibility, VISIBILITY);
    tracked_setter!(set_use_holdout, use_holdout, bool, HOLDOUT);
    tracked_setter!(set_is_shadow_catcher, is_shadow_catcher, bool, SHADOW_CATCHER);
    tracked_setter!(set_shadow_terminator_offset, shadow_terminator_offset, f32, SHADING);
    tracked_setter!(set_asset_name, asset_name, String, NAME);
    tracked_setter!(set_pass_id, pass_id, i32, SHADING);
    tracked_setter!(set_color, color, Vec3, SHADING);
    tracked_setter!(set_dupli_generated, dupli_generated, Vec3, DUPLI);
    tracked_setter!(set_dupli_uv, dupli_uv, Vec2, DUPLI);
    tracked_setter!(set_random_id, random_id, u32, DUPLI);
    tracked_setter!(set_hide_on_missing_motion, hide_on_missing_motion, bool, MOTION);
    tracked_setter!(set_particle_system, particle_system, Option<ParticleSystemHandle>, PARTICLE_SYSTEM);
    tracked_setter!(set_particle_index, particle_index, usize, PARTICLE_INDEX);

    pub fn geometry(&self) -> Option<GeometryHandle> {
        self.geometry
    }

    pub fn tfm(&self) -> Mat4 {
        self.tfm
    }

    /// Transforms per motion step, the current one at the middle index
    pub fn motion(&self) -> &[Mat4] {
        &self.motion
    }

    /// Overwrite one motion step in place
    pub fn set_motion_step(&mut self, step: usize, tfm: Mat4) {
        if let Some(slot) = self.motion.get_mut(step) {
            if *slot != tfm {
                *slot = tfm;
                self.changes |= ObjectChanges::MOTION;
            }
        }
    }

    pub fn visibility(&self) -> RayVisibility {
        self.visibility
    }

    pub fn use_holdout(&self) -> bool {
        self.use_holdout
    }

    pub fn is_shadow_catcher(&self) -> bool {
        self.is_shadow_catcher
    }

    pub fn shadow_terminator_offset(&self) -> f32 {
        self.shadow_terminator_offset
    }

    pub fn asset_name(&self) -> &str {
        &self.asset_name
    }

    pub fn pass_id(&self) -> i32 {
        self.pass_id
    }

    pub fn color(&self) -> Vec3 {
        self.color
    }

    pub fn dupli_generated(&self) -> Vec3 {
        self.dupli_generated
    }

    pub fn dupli_uv(&self) -> Vec2 {
        self.dupli_uv
    }

    pub fn random_id(&self) -> u32 {
        self.random_id
    }

    pub fn hide_on_missing_motion(&self) -> bool {
        self.hide_on_missing_motion
    }

    pub fn particle_system(&self) -> Option<ParticleSystemHandle> {
        self.particle_system
    }

    pub fn particle_index(&self) -> usize {
        self.particle_index
    }

    // ===== MOTION =====

    /// True when the object carries more than one motion step
    pub fn use_motion(&self) -> bool {
        self.motion.len() > 1
    }

    /// Relative time of a motion step, in [-1, 1]
    pub fn motion_time(&self, step: usize) -> f32 {
        motion_time(step, self.motion.len())
    }

    /// Motion step sampled at `time`, if any
    pub fn motion_step(&self, time: f32) -> Option<usize> {
        if !self.use_motion() {
            return None;
        }
        (0..self.motion.len()).find(|&step| self.motion_time(step) == time)
    }

    // ===== CHANGE TRACKING =====

    /// Fields modified during the current sync
    pub fn changes(&self) -> ObjectChanges {
        self.changes
    }

    pub fn is_modified(&self) -> bool {
        !self.changes.is_empty()
    }

    pub fn holdout_is_modified(&self) -> bool {
        self.changes.contains(ObjectChanges::HOLDOUT)
    }

    pub fn particle_index_is_modified(&self) -> bool {
        self.changes.contains(ObjectChanges::PARTICLE_INDEX)
    }

    pub(crate) fn mark_attributes_changed(&mut self) {
        self.changes |= ObjectChanges::ATTRIBUTES;
    }

    pub(crate) fn clear_modified(&mut self) {
        self.changes = ObjectChanges::empty();
    }

    /// Mark the object for the renderer
    pub fn tag_update(&mut self) {
        self.tagged = true;
    }

    pub fn is_tagged(&self) -> bool {
        self.tagged
    }

    pub(crate) fn clear_tag(&mut self) {
        self.tagged = false;
    }
}

/// Relative time of `step` within `steps` evenly spaced samples over [-1, 1]
pub(crate) fn motion_time(step: usize, steps: usize) -> f32 {
    if steps > 1 {
        2.0 * step as f32 / (steps - 1) as f32 - 1.0
    } else {
        0.0
    }
}

#[cfg(test)]
#[path = "object_tests.rs"]
mod tests;
