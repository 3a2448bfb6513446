/// Sync configuration injected by the host.
///
/// Plain data with sensible defaults, mirroring how the renderer receives
/// its configuration. Nothing here is read from the environment.

/// Which kind of motion data the render scene needs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionType {
    /// No motion data
    None,
    /// Motion vector pass only: fixed 3-step transforms, no deformation blur
    Pass,
    /// Full motion blur: per-object step counts and optional deformation
    Blur,
}

/// Where the shutter interval sits relative to the current frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionPosition {
    /// Shutter opens on the current frame
    Start,
    /// Shutter is centered on the current frame
    Center,
    /// Shutter closes on the current frame
    End,
}

/// Scene-wide culling switches (simplify settings)
#[derive(Debug, Clone, Copy)]
pub struct CullingConfig {
    /// Enable camera frustum culling for objects that opt in
    pub use_camera_cull: bool,
    /// Extra NDC margin around the frame before an object counts as outside
    pub camera_cull_margin: f32,
    /// Enable distance culling for objects that opt in
    pub use_distance_cull: bool,
    /// Objects farther than this from the camera are culled
    pub distance_cull_margin: f32,
}

impl Default for CullingConfig {
    fn default() -> Self {
        Self {
            use_camera_cull: false,
            camera_cull_margin: 0.1,
            use_distance_cull: false,
            distance_cull_margin: 50.0,
        }
    }
}

/// Interactive viewport context
#[derive(Debug, Clone, Copy)]
pub struct ViewportConfig {
    /// Show scene lights (false = viewport uses its own lighting)
    pub use_scene_lights: bool,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self { use_scene_lights: true }
    }
}

/// Configuration for a `SceneSync`
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Render motion blur
    pub motion_blur: bool,
    /// Render a motion vector pass (ignored when `motion_blur` is set)
    pub motion_pass: bool,
    /// Shutter time in frames
    pub shutter_time: f32,
    /// Shutter placement relative to the current frame
    pub motion_position: MotionPosition,
    /// Culling switches
    pub culling: CullingConfig,
    /// Viewport context; `None` for a final render
    pub viewport: Option<ViewportConfig>,
    /// Geometry worker threads (0 = one per logical core)
    pub worker_threads: usize,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            motion_blur: false,
            motion_pass: false,
            shutter_time: 0.5,
            motion_position: MotionPosition::Center,
            culling: CullingConfig::default(),
            viewport: None,
            worker_threads: 0,
        }
    }
}

impl SyncConfig {
    /// Motion data required by the current settings
    pub fn need_motion(&self) -> MotionType {
        if self.motion_blur {
            MotionType::Blur
        } else if self.motion_pass {
            MotionType::Pass
        } else {
            MotionType::None
        }
    }

    /// Shutter time used to turn relative motion times into frames.
    ///
    /// A motion pass always samples the previous and next frame.
    pub fn motion_shutter_time(&self) -> f32 {
        if self.need_motion() == MotionType::Pass {
            2.0
        } else {
            self.shutter_time
        }
    }

    /// Offset of the zero-time pass from the current frame
    pub fn frame_center_delta(&self) -> f32 {
        if self.need_motion() != MotionType::Blur {
            return 0.0;
        }
        match self.motion_position {
            MotionPosition::Center => 0.0,
            MotionPosition::End => -self.shutter_time * 0.5,
            MotionPosition::Start => self.shutter_time * 0.5,
        }
    }

    /// Whether scene lights are synchronized
    pub fn show_lights(&self) -> bool {
        self.viewport.map_or(true, |viewport| viewport.use_scene_lights)
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
