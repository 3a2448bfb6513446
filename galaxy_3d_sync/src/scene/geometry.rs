/// Render-side geometry shared by every object that instances it.
///
/// Bookkeeping fields (shaders, requests, motion settings) are owned by the
/// coordinating thread. Converted data lives behind `GeometryShared` so a
/// worker job can write it without borrowing the scene.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use glam::Vec3;
use slotmap::new_key_type;
use crate::provider::{GeometryData, ShaderRef};
use super::attribute::{AttributeRequestSet, StandardAttribute};
use super::object::motion_time;

new_key_type! {
    /// Stable handle of a Geometry within a RenderScene.
    pub struct GeometryHandle;
}

/// Kind of renderer geometry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeometryKind {
    Mesh,
    Hair,
    Volume,
}

/// Converted data plus its modified flag, shared with dispatcher jobs
#[derive(Debug, Default)]
pub struct GeometryShared {
    data: Mutex<GeometryData>,
    modified: AtomicBool,
    /// A conversion was queued and has not stored its data yet
    pending: AtomicBool,
}

impl GeometryShared {
    /// Lock the converted data
    pub fn data(&self) -> MutexGuard<'_, GeometryData> {
        self.data.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Replace the converted data and flag the geometry modified
    pub fn replace(&self, data: GeometryData) {
        *self.data() = data;
        self.modified.store(true, Ordering::Release);
        self.pending.store(false, Ordering::Release);
    }

    /// Mark a conversion as queued; cleared by `replace`
    pub fn begin_conversion(&self) {
        self.pending.store(true, Ordering::Release);
    }

    /// A queued conversion has not stored its data
    pub fn conversion_pending(&self) -> bool {
        self.pending.load(Ordering::Acquire)
    }

    /// Store deformed positions for one motion attribute step
    pub fn set_motion_positions(&self, step: usize, positions: Vec<Vec3>) {
        let mut data = self.data();
        if data.motion_positions.len() <= step {
            data.motion_positions.resize(step + 1, Vec::new());
        }
        data.motion_positions[step] = positions;
        self.modified.store(true, Ordering::Release);
    }

    pub fn is_modified(&self) -> bool {
        self.modified.load(Ordering::Acquire)
    }

    pub fn set_modified(&self, modified: bool) {
        self.modified.store(modified, Ordering::Release);
    }
}

/// Render entity for one mesh, hair or volume
#[derive(Debug)]
pub struct Geometry {
    pub name: String,
    kind: GeometryKind,
    used_shaders: Vec<ShaderRef>,
    needed_attributes: AttributeRequestSet,
    motion_steps: u32,
    use_motion_blur: bool,
    shared: Arc<GeometryShared>,
    tagged: bool,
}

impl Default for Geometry {
    fn default() -> Self {
        Self::new(GeometryKind::Mesh)
    }
}

impl Geometry {
    pub fn new(kind: GeometryKind) -> Self {
        Self {
            name: String::new(),
            kind,
            used_shaders: Vec::new(),
            needed_attributes: AttributeRequestSet::new(),
            motion_steps: 0,
            use_motion_blur: false,
            shared: Arc::new(GeometryShared::default()),
            tagged: false,
        }
    }

    pub fn kind(&self) -> GeometryKind {
        self.kind
    }

    pub fn used_shaders(&self) -> &[ShaderRef] {
        &self.used_shaders
    }

    pub fn set_used_shaders(&mut self, shaders: Vec<ShaderRef>) {
        if self.used_shaders != shaders {
            self.used_shaders = shaders;
            self.shared.set_modified(true);
        }
    }

    /// Attributes requested by the used shaders
    pub fn needed_attributes(&self) -> &AttributeRequestSet {
        &self.needed_attributes
    }

    pub fn set_needed_attributes(&mut self, requests: AttributeRequestSet) {
        self.needed_attributes = requests;
    }

    pub fn need_attribute(&self, std: StandardAttribute) -> bool {
        self.needed_attributes.find_standard(std)
    }

    pub fn motion_steps(&self) -> u32 {
        self.motion_steps
    }

    pub fn set_motion_steps(&mut self, steps: u32) {
        if self.motion_steps != steps {
            self.motion_steps = steps;
            self.shared.set_modified(true);
        }
    }

    pub fn use_motion_blur(&self) -> bool {
        self.use_motion_blur
    }

    pub fn set_use_motion_blur(&mut self, use_motion_blur: bool) {
        if self.use_motion_blur != use_motion_blur {
            self.use_motion_blur = use_motion_blur;
            self.shared.set_modified(true);
        }
    }

    /// Whether the last conversion baked the object transform into the data
    pub fn transform_applied(&self) -> bool {
        self.shared.data().transform_applied
    }

    /// Relative time of a motion step, in [-1, 1]
    pub fn motion_time(&self, step: usize) -> f32 {
        motion_time(step, self.motion_steps as usize)
    }

    /// Motion attribute step sampled at `time`.
    ///
    /// The centre step lives in the regular positions, so attribute steps
    /// skip it.
    pub fn motion_step(&self, time: f32) -> Option<usize> {
        let steps = self.motion_steps as usize;
        if steps <= 1 {
            return None;
        }
        let mut attr_step = 0;
        for step in 0..steps {
            if self.motion_time(step) == time {
                return Some(attr_step);
            }
            if step != steps / 2 {
                attr_step += 1;
            }
        }
        None
    }

    /// Converted data, shared with dispatcher jobs
    pub fn shared(&self) -> &Arc<GeometryShared> {
        &self.shared
    }

    pub fn is_modified(&self) -> bool {
        self.shared.is_modified()
    }

    pub(crate) fn clear_modified(&self) {
        self.shared.set_modified(false);
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

#[cfg(test)]
#[path = "geometry_tests.rs"]
mod tests;
