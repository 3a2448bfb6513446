/// Procedural sync for objects streamed from a mesh-sequence cache.

use crate::provider::{DataId, ObjectInfo, SceneProvider};
use crate::scene::{Procedural, ProceduralObject};
use super::geometry_sync::find_used_shaders;
use super::scene_sync::SceneSync;

impl SceneSync {
    /// Register an object on the procedural of its cache file.
    ///
    /// The procedural follows the provider's current frame; objects are
    /// looked up by their path inside the cache.
    pub(super) fn sync_procedural<P: SceneProvider + ?Sized>(
        &mut self,
        provider: &P,
        info: &ObjectInfo,
        cache_file: DataId,
        filepath: &str,
        object_path: &str,
    ) {
        let frame = provider.frame().frame as f32;
        let (handle, created) = self.scene.procedurals.resolve_or_create(&cache_file, Procedural::default);
        let Some(procedural) = self.scene.procedurals.get_mut(handle) else {
            return;
        };

        procedural.set_frame(frame);
        procedural.set_filepath(filepath);

        let used_shaders = find_used_shaders(info);
        let objects_changed = match procedural.objects.iter_mut().find(|object| object.path == object_path) {
            Some(object) if object.used_shaders != used_shaders => {
                object.used_shaders = used_shaders;
                true
            }
            Some(_) => false,
            None => {
                procedural.objects.push(ProceduralObject {
                    path: object_path.to_string(),
                    used_shaders,
                });
                true
            }
        };

        let frame_changed = procedural.frame_is_modified();
        if created || frame_changed || procedural.filepath_is_modified() || objects_changed {
            procedural.tag_update();
        }
        if frame_changed {
            self.scene.tag_procedural_manager();
        }
    }
}

#[cfg(test)]
#[path = "procedural_sync_tests.rs"]
mod tests;
