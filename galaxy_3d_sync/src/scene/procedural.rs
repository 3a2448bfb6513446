/// Cache-file procedurals: geometry streamed by the renderer itself.

use slotmap::new_key_type;
use crate::provider::ShaderRef;

new_key_type! {
    /// Stable handle of a Procedural within a RenderScene.
    pub struct ProceduralHandle;
}

/// One object read from the cache file
#[derive(Debug, Clone, PartialEq)]
pub struct ProceduralObject {
    /// Path of the object inside the cache file
    pub path: String,
    pub used_shaders: Vec<ShaderRef>,
}

/// Render entity for one cache file
#[derive(Debug, Clone, Default)]
pub struct Procedural {
    frame: f32,
    filepath: String,
    pub objects: Vec<ProceduralObject>,
    frame_modified: bool,
    filepath_modified: bool,
    tagged: bool,
}

impl Procedural {
    pub fn frame(&self) -> f32 {
        self.frame
    }

    pub fn set_frame(&mut self, frame: f32) {
        if self.frame != frame {
            self.frame = frame;
            self.frame_modified = true;
        }
    }

    pub fn filepath(&self) -> &str {
        &self.filepath
    }

    pub fn set_filepath(&mut self, filepath: &str) {
        if self.filepath != filepath {
            self.filepath = filepath.to_string();
            self.filepath_modified = true;
        }
    }

    pub fn frame_is_modified(&self) -> bool {
        self.frame_modified
    }

    pub fn filepath_is_modified(&self) -> bool {
        self.filepath_modified
    }

    pub(crate) fn clear_modified(&mut self) {
        self.frame_modified = false;
        self.filepath_modified = false;
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
