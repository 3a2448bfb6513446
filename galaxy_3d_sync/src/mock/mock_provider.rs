/// Mock scene provider for tests (no host application required)
///
/// Holds a small in-memory scene graph. Transforms can be animated per
/// object so motion passes see different matrices at different times.

use glam::Mat4;
use rustc_hash::{FxHashMap, FxHashSet};
use crate::provider::{
    CameraInfo, DataId, FrameTime, InstanceRecord, LightInfo, ObjectInfo, ParticleInfo,
    PropertyResolver, PropertyValue, SceneProvider, WorldInfo,
};
use crate::scene::AttributeRequest;

type Animation = Box<dyn Fn(f32) -> Mat4 + Send + Sync>;

// ============================================================================
// Mock Scene Provider
// ============================================================================

/// In-memory scene graph implementing `SceneProvider`
#[derive(Default)]
pub struct MockSceneProvider {
    pub instances: Vec<InstanceRecord>,
    pub objects: FxHashMap<DataId, ObjectInfo>,
    pub lights: FxHashMap<DataId, LightInfo>,
    pub camera: Option<CameraInfo>,
    pub world: Option<WorldInfo>,
    pub materials: FxHashMap<DataId, Vec<AttributeRequest>>,
    pub particles: FxHashMap<DataId, Vec<ParticleInfo>>,
    pub properties: FxHashMap<(DataId, String), PropertyValue>,
    pub hidden_in_viewport: FxHashSet<DataId>,
    pub updated: Vec<DataId>,
    animations: FxHashMap<DataId, Animation>,
    camera_animation: Option<Animation>,
    frame: Option<FrameTime>,
    frame_history: Vec<FrameTime>,
}

impl MockSceneProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an object and one plain instance of it
    pub fn add_object(&mut self, info: ObjectInfo, matrix_world: Mat4) -> DataId {
        let id = info.id;
        self.instances.push(InstanceRecord::object(id, matrix_world));
        self.objects.insert(id, info);
        id
    }

    /// Register an object without instancing it
    pub fn add_object_info(&mut self, info: ObjectInfo) -> DataId {
        let id = info.id;
        self.objects.insert(id, info);
        id
    }

    pub fn add_instance(&mut self, record: InstanceRecord) {
        self.instances.push(record);
    }

    /// Remove every instance of `object`
    pub fn remove_instances_of(&mut self, object: DataId) {
        self.instances.retain(|record| record.object != object);
    }

    pub fn set_property(&mut self, id: DataId, path: &str, value: PropertyValue) {
        self.properties.insert((id, path.to_string()), value);
    }

    pub fn set_material(&mut self, material: DataId, requests: Vec<AttributeRequest>) {
        self.materials.insert(material, requests);
    }

    /// Make `object`'s world matrix a function of the absolute time
    pub fn animate(&mut self, object: DataId, animation: impl Fn(f32) -> Mat4 + Send + Sync + 'static) {
        self.animations.insert(object, Box::new(animation));
    }

    pub fn animate_camera(&mut self, animation: impl Fn(f32) -> Mat4 + Send + Sync + 'static) {
        self.camera_animation = Some(Box::new(animation));
    }

    /// Tag a data-block as changed for the next sync
    pub fn tag_updated(&mut self, id: DataId) {
        self.updated.push(id);
    }

    /// Every time passed to `set_frame`, in call order
    pub fn frame_history(&self) -> &[FrameTime] {
        &self.frame_history
    }

    fn time(&self) -> f32 {
        self.frame().time()
    }
}

impl PropertyResolver for MockSceneProvider {
    fn resolve(&self, id: DataId, path: &str) -> Option<PropertyValue> {
        self.properties.get(&(id, path.to_string())).cloned()
    }
}

impl SceneProvider for MockSceneProvider {
    fn instances(&self) -> Box<dyn Iterator<Item = InstanceRecord> + '_> {
        let time = self.time();
        Box::new(self.instances.iter().map(move |record| {
            let mut record = record.clone();
            if let Some(animation) = self.animations.get(&record.object) {
                record.matrix_world = animation(time);
            }
            record
        }))
    }

    fn object(&self, id: DataId) -> Option<ObjectInfo> {
        self.objects.get(&id).cloned()
    }

    fn light(&self, object: DataId) -> Option<LightInfo> {
        self.lights.get(&object).copied()
    }

    fn camera(&self) -> Option<CameraInfo> {
        let mut camera = self.camera?;
        if let Some(animation) = &self.camera_animation {
            camera.matrix_world = animation(self.time());
        }
        Some(camera)
    }

    fn world(&self) -> Option<WorldInfo> {
        self.world
    }

    fn material_attributes(&self, material: DataId) -> Vec<AttributeRequest> {
        self.materials.get(&material).cloned().unwrap_or_default()
    }

    fn particle_count(&self, system: DataId) -> usize {
        self.particles.get(&system).map_or(0, Vec::len)
    }

    fn particle(&self, system: DataId, index: usize) -> Option<ParticleInfo> {
        self.particles.get(&system)?.get(index).copied()
    }

    fn visible_in_viewport(&self, object: DataId) -> bool {
        !self.hidden_in_viewport.contains(&object)
    }

    fn updated_ids(&self) -> Vec<DataId> {
        self.updated.clone()
    }

    fn frame(&self) -> FrameTime {
        self.frame.unwrap_or(FrameTime::new(1, 0.0))
    }

    fn set_frame(&mut self, time: FrameTime) {
        self.frame = Some(time);
        self.frame_history.push(time);
    }
}
