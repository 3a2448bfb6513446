/// Render-side lights, including the world background light.

use glam::{Mat4, Vec3};
use slotmap::new_key_type;
use crate::provider::LightKind;

new_key_type! {
    /// Stable handle of a Light within a RenderScene.
    pub struct LightHandle;
}

/// Render entity for one light instance
#[derive(Debug, Clone)]
pub struct Light {
    pub name: String,
    pub kind: LightKind,
    pub tfm: Mat4,
    pub color: Vec3,
    pub strength: f32,
    pub size: f32,
    pub random_id: u32,
    pub is_portal: bool,
    pub is_enabled: bool,
    pub cast_shadow: bool,
    pub use_mis: bool,
    pub max_bounces: i32,
    /// Importance map resolution of a background light, 0 = automatic
    pub map_resolution: i32,
    tagged: bool,
}

impl Default for Light {
    fn default() -> Self {
        Self {
            name: String::new(),
            kind: LightKind::Point,
            tfm: Mat4::IDENTITY,
            color: Vec3::ONE,
            strength: 1.0,
            size: 0.0,
            random_id: 0,
            is_portal: false,
            is_enabled: true,
            cast_shadow: true,
            use_mis: false,
            max_bounces: 1024,
            map_resolution: 0,
            tagged: false,
        }
    }
}

impl Light {
    /// World-space position
    pub fn position(&self) -> Vec3 {
        self.tfm.w_axis.truncate()
    }

    /// World-space emission direction (-Z of the transform)
    pub fn direction(&self) -> Vec3 {
        -self.tfm.z_axis.truncate()
    }

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
