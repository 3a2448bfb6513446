//! Synchronization module
//!
//! Identity caches, instance filtering, motion time collection, the
//! attribute diff engine, the geometry dispatcher and the `SceneSync`
//! driver that ties them together.

mod attributes;
mod culling;
mod dispatcher;
mod geometry_sync;
mod id_map;
mod light_sync;
mod motion;
mod object_key;
mod object_sync;
mod particle_sync;
mod procedural_sync;
mod progress;
mod report;
mod scene_sync;
mod visibility;

pub use attributes::{lookup_instance_property, reconcile_attributes, split_attribute_name, AttributeScope};
pub use culling::ObjectCulling;
pub use dispatcher::{DispatchSummary, GeometryDispatcher, GeometryJob, JobId};
pub use geometry_sync::{find_used_shaders, gather_needed_attributes, geometry_key};
pub use id_map::IdentityCache;
pub use motion::{object_motion_steps, object_use_deform_motion, MotionTimes};
pub use object_key::{GeometryKey, ObjectKey, ParticleSystemKey};
pub use object_sync::{asset_name, name_random_id};
pub use progress::SyncProgress;
pub use report::SyncReport;
pub use scene_sync::SceneSync;
pub use visibility::{distinct_parent, AdmittedInstance, FilterDecision, InstanceFilter, InstanceVisibility, SkipReason};
