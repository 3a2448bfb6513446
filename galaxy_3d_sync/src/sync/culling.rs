/// Camera frustum and distance culling of objects.

use glam::{Mat4, Vec3, Vec4};
use crate::config::CullingConfig;
use crate::provider::{CameraInfo, ObjectSettings};
use crate::scene::AABB;

/// Culling state rebuilt at the start of every pass.
///
/// Scene switches come from `CullingConfig`; `init_object` narrows them to
/// the object's own opt-in flags before `test` is called.
#[derive(Debug, Clone)]
pub struct ObjectCulling {
    camera: Option<CameraInfo>,
    use_scene_camera_cull: bool,
    use_scene_distance_cull: bool,
    use_camera_cull: bool,
    use_distance_cull: bool,
    camera_cull_margin: f32,
    distance_cull_margin: f32,
}

impl ObjectCulling {
    /// Culling needs a camera; without one nothing is culled
    pub fn new(config: &CullingConfig, camera: Option<CameraInfo>) -> Self {
        let has_camera = camera.is_some();
        Self {
            camera,
            use_scene_camera_cull: has_camera && config.use_camera_cull,
            use_scene_distance_cull: has_camera && config.use_distance_cull,
            use_camera_cull: false,
            use_distance_cull: false,
            camera_cull_margin: config.camera_cull_margin,
            distance_cull_margin: config.distance_cull_margin,
        }
    }

    /// Load the per-object opt-in flags
    pub fn init_object(&mut self, settings: &ObjectSettings) {
        self.use_camera_cull = self.use_scene_camera_cull && settings.use_camera_cull;
        self.use_distance_cull = self.use_scene_distance_cull && settings.use_distance_cull;
    }

    /// True when the object with local `bounds` at `matrix` is culled.
    ///
    /// With both tests active an object must fail both to be culled.
    pub fn test(&self, bounds: &AABB, matrix: &Mat4) -> bool {
        if !self.use_camera_cull && !self.use_distance_cull {
            return false;
        }
        let Some(camera) = self.camera.as_ref() else {
            return false;
        };

        let corners = bounds.transformed_corners(matrix);
        let camera_culled = self.use_camera_cull && self.test_camera(camera, &corners);
        let distance_culled = self.use_distance_cull && self.test_distance(camera, &corners);

        (camera_culled && distance_culled)
            || (camera_culled && !self.use_distance_cull)
            || (distance_culled && !self.use_camera_cull)
    }

    /// Project the corners to NDC and test them against the frame plus margin
    fn test_camera(&self, camera: &CameraInfo, corners: &[Vec3; 8]) -> bool {
        let margin = self.camera_cull_margin;
        let mut ndc_min = Vec3::splat(f32::MAX);
        let mut ndc_max = Vec3::splat(f32::MIN);
        let mut all_behind = true;

        for corner in corners {
            let clip = camera.world_to_ndc * Vec4::new(corner.x, corner.y, corner.z, 1.0);
            let mut p = clip.truncate() / clip.w;
            if clip.z < 0.0 {
                p.x = 1.0 - p.x;
                p.y = 1.0 - p.y;
            }
            if clip.z >= -margin {
                all_behind = false;
            }
            ndc_min = ndc_min.min(p);
            ndc_max = ndc_max.max(p);
        }

        if all_behind {
            return true;
        }

        ndc_min.x >= 1.0 + margin
            || ndc_min.y >= 1.0 + margin
            || ndc_max.x <= -margin
            || ndc_max.y <= -margin
    }

    /// Cull when the closest point of the world bounds is beyond the margin
    fn test_distance(&self, camera: &CameraInfo, corners: &[Vec3; 8]) -> bool {
        let camera_position = camera.position();
        let mut world = AABB::new(Vec3::splat(f32::MAX), Vec3::splat(f32::MIN));
        for corner in corners {
            world.min = world.min.min(*corner);
            world.max = world.max.max(*corner);
        }
        let closest = world.closest_point(camera_position);
        camera_position.distance_squared(closest) > self.distance_cull_margin * self.distance_cull_margin
    }
}

#[cfg(test)]
#[path = "culling_tests.rs"]
mod tests;
