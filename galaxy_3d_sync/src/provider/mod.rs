//! External collaborators
//!
//! The scene graph provider, the property resolver and the geometry
//! converter are implemented by the host. This module only defines their
//! interfaces and the plain records they exchange.

mod converter;
mod ids;
mod property;
mod records;
mod scene_provider;

pub use converter::{GeometryConverter, GeometryData, GeometrySource, ShaderRef};
pub use ids::{DataId, PersistentId, PERSISTENT_ID_SIZE};
pub use property::{lookup_property, PropertyResolver, PropertyValue};
pub use records::{
    CameraInfo, CurveShape, InstanceRecord, LightInfo, LightKind, MaterialSlot, ModifierInfo,
    ModifierKind, MotionSettings, ObjectInfo, ObjectKind, ObjectSettings, ParticleInfo,
    ParticleSystemRef, RayVisibility, SlotLink, WorldInfo, WorldSampling,
};
pub use scene_provider::{FrameTime, SceneProvider};
