/// Particle systems backing particle-instanced objects.

use glam::{Quat, Vec3};
use slotmap::new_key_type;

new_key_type! {
    /// Stable handle of a ParticleSystem within a RenderScene.
    pub struct ParticleSystemHandle;
}

/// One particle referenced by an instanced object
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    /// Index within the source particle system
    pub index: usize,
    /// Current frame minus birth time
    pub age: f32,
    pub lifetime: f32,
    pub location: Vec3,
    pub rotation: Quat,
    pub size: f32,
    pub velocity: Vec3,
    pub angular_velocity: Vec3,
}

/// Particles collected during one pass, in visit order
#[derive(Debug, Clone, Default)]
pub struct ParticleSystem {
    pub particles: Vec<Particle>,
    tagged: bool,
}

impl ParticleSystem {
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
