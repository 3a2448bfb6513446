/// Plain records copied out of the external scene graph.
///
/// Every record is owned data: the sync engine never holds a reference
/// into provider memory across calls.

use bitflags::bitflags;
use glam::{Mat4, Quat, Vec2, Vec3};
use crate::scene::AABB;
use super::ids::{DataId, PersistentId};

// ===== RAY VISIBILITY =====

bitflags! {
    /// Ray types an object is visible to
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct RayVisibility: u32 {
        const CAMERA         = 1 << 0;
        const DIFFUSE        = 1 << 1;
        const GLOSSY         = 1 << 2;
        const TRANSMISSION   = 1 << 3;
        const SHADOW         = 1 << 4;
        const VOLUME_SCATTER = 1 << 5;
    }
}

impl Default for RayVisibility {
    fn default() -> Self {
        RayVisibility::all()
    }
}

// ===== INSTANCE =====

/// Particle system that generated an instance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParticleSystemRef {
    /// The particle system itself (owns the particle array)
    pub system: DataId,
    /// Its settings data-block (custom properties live here)
    pub settings: DataId,
}

/// One occurrence of an object in the evaluated scene.
///
/// Re-created on every traversal; carries no identity of its own.
#[derive(Debug, Clone)]
pub struct InstanceRecord {
    /// The instanced object
    pub object: DataId,
    /// Duplicator object, `Some` only for duplicated instances
    pub parent: Option<DataId>,
    /// Position within nested duplication, `Some` only for duplicated instances
    pub persistent_id: Option<PersistentId>,
    /// World transform of this occurrence
    pub matrix_world: Mat4,
    /// The object itself is rendered
    pub show_self: bool,
    /// Particle hair of the object is rendered
    pub show_particles: bool,
    /// Top-level parent is a holdout in the active view layer
    pub holdout: bool,
    /// Top-level parent is indirect-only in the active view layer
    pub indirect_only: bool,
    /// Generating particle system, if any
    pub particle_system: Option<ParticleSystemRef>,
    /// Generated texture coordinate of the duplicate (0..1)
    pub orco: Vec3,
    /// UV of the duplicate on its emitter
    pub uv: Vec2,
    /// Random id assigned by the provider to the duplicate
    pub random_id: u32,
}

impl InstanceRecord {
    /// Record for a non-duplicated object
    pub fn object(object: DataId, matrix_world: Mat4) -> Self {
        Self {
            object,
            parent: None,
            persistent_id: None,
            matrix_world,
            show_self: true,
            show_particles: true,
            holdout: false,
            indirect_only: false,
            particle_system: None,
            orco: Vec3::ZERO,
            uv: Vec2::ZERO,
            random_id: 0,
        }
    }

    /// Record for a duplicate of `object` generated by `parent`
    pub fn duplicate(object: DataId, parent: DataId, path: &[i32], matrix_world: Mat4) -> Self {
        Self {
            parent: Some(parent),
            persistent_id: Some(PersistentId::new(path)),
            ..Self::object(object, matrix_world)
        }
    }

    /// True when this occurrence was produced by duplication
    pub fn is_instance(&self) -> bool {
        self.parent.is_some()
    }

    /// Duplicator for instances, the object itself otherwise
    pub fn parent_or_self(&self) -> DataId {
        self.parent.unwrap_or(self.object)
    }
}

// ===== OBJECT =====

/// Curve shape parameters that decide whether a curve has surface
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CurveShape {
    pub has_bevel_object: bool,
    pub extrude: f32,
    pub bevel_depth: f32,
    pub is_2d: bool,
}

/// Type discriminator of a scene object
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ObjectKind {
    Mesh,
    Curve(CurveShape),
    MetaBall,
    Volume,
    Hair,
    Light,
    Camera,
    Empty,
}

/// Modifier type
#[derive(Debug, Clone, PartialEq)]
pub enum ModifierKind {
    /// Any modifier that changes the evaluated geometry
    Deform(String),
    /// Streams geometry from an external cache file
    MeshSequenceCache {
        cache_file: DataId,
        filepath: String,
        object_path: String,
    },
}

/// One entry of an object's modifier stack
#[derive(Debug, Clone, PartialEq)]
pub struct ModifierInfo {
    pub kind: ModifierKind,
    /// Enabled for the current evaluation mode (viewport or render)
    pub enabled: bool,
}

/// Where a material slot stores its material
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotLink {
    /// Material linked to the object data (shared between users)
    Data,
    /// Material linked to the object (forces a unique geometry)
    Object,
}

/// Material slot of an object
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaterialSlot {
    pub material: Option<DataId>,
    pub link: SlotLink,
}

/// Motion blur opt-in of an object or camera
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MotionSettings {
    pub use_motion_blur: bool,
    pub use_deform_motion: bool,
    /// Requested step exponent (1 = 3 samples, 2 = 5, 3 = 9, ...)
    pub steps: i32,
}

/// Render settings stored on an object
#[derive(Debug, Clone, Copy)]
pub struct ObjectSettings {
    pub visibility: RayVisibility,
    pub is_holdout: bool,
    pub is_shadow_catcher: bool,
    pub shadow_terminator_offset: f32,
    pub use_motion_blur: bool,
    pub use_deform_motion: bool,
    pub motion_steps: i32,
    pub use_camera_cull: bool,
    pub use_distance_cull: bool,
}

impl Default for ObjectSettings {
    fn default() -> Self {
        Self {
            visibility: RayVisibility::all(),
            is_holdout: false,
            is_shadow_catcher: false,
            shadow_terminator_offset: 0.0,
            use_motion_blur: true,
            use_deform_motion: true,
            motion_steps: 1,
            use_camera_cull: false,
            use_distance_cull: false,
        }
    }
}

impl ObjectSettings {
    pub fn motion(&self) -> MotionSettings {
        MotionSettings {
            use_motion_blur: self.use_motion_blur,
            use_deform_motion: self.use_deform_motion,
            steps: self.motion_steps,
        }
    }
}

/// Object-level data queried by id
#[derive(Debug, Clone)]
pub struct ObjectInfo {
    pub id: DataId,
    pub name: String,
    pub kind: ObjectKind,
    /// Object data (mesh, curve, light, ...), `None` for empties
    pub data: Option<DataId>,
    pub data_name: String,
    /// Parent in the scene hierarchy (not the duplicator)
    pub parent: Option<DataId>,
    pub pass_index: i32,
    pub color: Vec3,
    pub modifiers: Vec<ModifierInfo>,
    pub material_slots: Vec<MaterialSlot>,
    pub settings: ObjectSettings,
    /// Local-space bounds
    pub bounds: AABB,
    /// Has at least one particle system rendered as hair
    pub has_particle_hair: bool,
}

impl ObjectInfo {
    /// Mesh object with default settings and unit bounds
    pub fn mesh(id: DataId, name: &str, data: DataId) -> Self {
        Self {
            id,
            name: name.to_string(),
            kind: ObjectKind::Mesh,
            data: Some(data),
            data_name: format!("{}_data", name),
            parent: None,
            pass_index: 0,
            color: Vec3::ONE,
            modifiers: Vec::new(),
            material_slots: Vec::new(),
            settings: ObjectSettings::default(),
            bounds: AABB::unit(),
            has_particle_hair: false,
        }
    }

    /// Whether an object of this type produces renderable geometry
    pub fn is_geometry(&self) -> bool {
        if self.data.is_none() {
            return false;
        }
        match self.kind {
            ObjectKind::Mesh | ObjectKind::MetaBall | ObjectKind::Volume | ObjectKind::Hair => true,
            // Curves without faces are skipped, they can be numerous for path animation
            ObjectKind::Curve(shape) => {
                shape.has_bevel_object
                    || shape.extrude != 0.0
                    || shape.bevel_depth != 0.0
                    || shape.is_2d
                    || !self.modifiers.is_empty()
            }
            ObjectKind::Light | ObjectKind::Camera | ObjectKind::Empty => false,
        }
    }

    /// Whether the object is a light
    pub fn is_light(&self) -> bool {
        self.data.is_some() && self.kind == ObjectKind::Light
    }

    /// Whether the evaluated geometry is unique to this object and cannot be shared
    pub fn is_modified(&self) -> bool {
        if self.kind == ObjectKind::MetaBall {
            // Metaballs are fused across users
            return true;
        }
        if self.modifiers.iter().any(|m| m.enabled) {
            return true;
        }
        self.material_slots.iter().any(|slot| slot.link == SlotLink::Object)
    }

    /// Mesh-sequence cache, when it is the last modifier of the stack
    pub fn mesh_sequence_cache(&self) -> Option<(DataId, &str, &str)> {
        match self.modifiers.last().map(|m| &m.kind) {
            Some(ModifierKind::MeshSequenceCache { cache_file, filepath, object_path }) => {
                Some((*cache_file, filepath.as_str(), object_path.as_str()))
            }
            _ => None,
        }
    }
}

// ===== LIGHT / WORLD / CAMERA =====

/// Light type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightKind {
    Point,
    Spot,
    Sun,
    Area,
    Background,
}

/// Light data of a light object
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightInfo {
    pub kind: LightKind,
    pub color: Vec3,
    pub energy: f32,
    pub size: f32,
    pub is_portal: bool,
    pub cast_shadow: bool,
    pub use_mis: bool,
    pub max_bounces: i32,
}

/// How the world is sampled as a light
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorldSampling {
    None,
    Automatic,
    Manual,
}

/// World settings relevant to the background light
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldInfo {
    pub id: DataId,
    pub sampling: WorldSampling,
    pub map_resolution: i32,
    pub max_bounces: i32,
}

/// Active scene camera
#[derive(Debug, Clone, Copy)]
pub struct CameraInfo {
    pub object: DataId,
    pub matrix_world: Mat4,
    /// Maps world space to normalized device coordinates: after the
    /// perspective divide x, y are in [0, 1] inside the frame; the
    /// undivided z is negative behind the camera
    pub world_to_ndc: Mat4,
    pub use_motion_blur: bool,
    pub motion_steps: i32,
}

impl CameraInfo {
    /// World-space camera position
    pub fn position(&self) -> Vec3 {
        self.matrix_world.w_axis.truncate()
    }

    pub fn motion(&self) -> MotionSettings {
        MotionSettings {
            use_motion_blur: self.use_motion_blur,
            use_deform_motion: false,
            steps: self.motion_steps,
        }
    }
}

// ===== PARTICLES =====

/// One particle of a particle system
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleInfo {
    pub birth_time: f32,
    pub lifetime: f32,
    pub location: Vec3,
    pub rotation: Quat,
    pub size: f32,
    pub velocity: Vec3,
    pub angular_velocity: Vec3,
}
