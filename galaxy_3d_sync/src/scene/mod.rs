//! Render scene module
//!
//! Long-lived render entities (objects, geometries, lights, particle
//! systems, procedurals, camera motion) and the scene that owns them.

mod attribute;
mod bounds;
mod camera;
mod geometry;
mod light;
mod object;
mod particles;
mod procedural;
mod render_scene;

pub use attribute::{AttributeRequest, AttributeRequestSet, ParamValue, StandardAttribute};
pub use bounds::AABB;
pub use camera::SyncCamera;
pub use geometry::{Geometry, GeometryHandle, GeometryKind, GeometryShared};
pub use light::{Light, LightHandle};
pub use object::{Object, ObjectChanges, ObjectHandle, MAX_MOTION_STEPS};
pub use particles::{Particle, ParticleSystem, ParticleSystemHandle};
pub use procedural::{Procedural, ProceduralHandle, ProceduralObject};
pub use render_scene::{ObjectManagerUpdate, RenderScene, SceneUpdates};
