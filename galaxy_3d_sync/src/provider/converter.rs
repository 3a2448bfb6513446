/// Geometry conversion interface, implemented by the host.
///
/// Conversions run on dispatcher worker threads, so a converter must be
/// `Send + Sync`. A converter is never asked to convert the same object's
/// base mesh and particle hair at the same time.

use glam::Vec3;
use crate::error::Result;
use crate::scene::{AttributeRequestSet, GeometryKind};
use super::ids::DataId;

/// Shader assigned to a geometry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderRef {
    Material(DataId),
    /// Renderer default surface shader (empty slot, no slots)
    DefaultSurface,
    /// Renderer default volume shader
    DefaultVolume,
}

/// Everything a converter needs to produce one geometry
#[derive(Debug, Clone)]
pub struct GeometrySource {
    /// Evaluated object to read
    pub object: DataId,
    /// Its data-block
    pub data: DataId,
    pub name: String,
    pub kind: GeometryKind,
    pub use_particle_hair: bool,
    pub used_shaders: Vec<ShaderRef>,
    pub needed_attributes: AttributeRequestSet,
    /// Relative time being sampled (0 for the base conversion)
    pub motion_time: f32,
}

/// Converted renderer geometry
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeometryData {
    pub positions: Vec<Vec3>,
    pub indices: Vec<u32>,
    /// Deformed positions per motion attribute step
    pub motion_positions: Vec<Vec<Vec3>>,
    /// The object transform is baked into `positions`
    pub transform_applied: bool,
}

/// Turns provider geometry into renderer geometry
pub trait GeometryConverter: Send + Sync {
    /// Full conversion at the current provider time
    fn convert(&self, source: &GeometrySource) -> Result<GeometryData>;

    /// Deformed positions at `source.motion_time`, stored as attribute step `step`
    fn convert_motion(&self, source: &GeometrySource, step: usize) -> Result<Vec<Vec3>>;
}
