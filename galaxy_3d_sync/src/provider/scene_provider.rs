/// The external scene graph, as seen by the sync engine.

use crate::scene::AttributeRequest;
use super::ids::DataId;
use super::property::PropertyResolver;
use super::records::{CameraInfo, InstanceRecord, LightInfo, ObjectInfo, ParticleInfo, WorldInfo};

/// Integer frame plus fractional subframe
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameTime {
    pub frame: i32,
    pub subframe: f32,
}

impl FrameTime {
    pub fn new(frame: i32, subframe: f32) -> Self {
        Self { frame, subframe }
    }

    /// Split an absolute time into floor frame and remainder
    pub fn from_time(time: f32) -> Self {
        let frame = time.floor();
        Self { frame: frame as i32, subframe: time - frame }
    }

    /// Absolute time
    pub fn time(&self) -> f32 {
        self.frame as f32 + self.subframe
    }
}

/// Read access to the evaluated scene, plus the ability to move it in time.
///
/// Everything returned is copied out; records are only valid for the
/// traversal that produced them.
pub trait SceneProvider: PropertyResolver {
    /// Every object instance of the evaluated scene, in traversal order
    fn instances(&self) -> Box<dyn Iterator<Item = InstanceRecord> + '_>;

    fn object(&self, id: DataId) -> Option<ObjectInfo>;

    /// Light data of a light object
    fn light(&self, object: DataId) -> Option<LightInfo>;

    /// Active scene camera
    fn camera(&self) -> Option<CameraInfo>;

    fn world(&self) -> Option<WorldInfo>;

    /// Attributes requested by a material's shading graph
    fn material_attributes(&self, material: DataId) -> Vec<AttributeRequest>;

    fn particle_count(&self, system: DataId) -> usize;

    fn particle(&self, system: DataId, index: usize) -> Option<ParticleInfo>;

    /// Object visibility in the active viewport; only asked when a viewport is configured
    fn visible_in_viewport(&self, _object: DataId) -> bool {
        true
    }

    /// Data-blocks changed since the previous sync
    fn updated_ids(&self) -> Vec<DataId>;

    /// Current evaluation time
    fn frame(&self) -> FrameTime;

    /// Re-evaluate the scene at another time
    fn set_frame(&mut self, time: FrameTime);
}

#[cfg(test)]
#[path = "scene_provider_tests.rs"]
mod tests;
