/// Early per-instance filtering, before any identity or geometry work.

use std::fmt;
use crate::config::SyncConfig;
use crate::provider::{CameraInfo, InstanceRecord, ObjectInfo, RayVisibility, SceneProvider};
use super::culling::ObjectCulling;

/// Why an instance was left out of the render scene
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SkipReason {
    /// Hidden in the active viewport
    HiddenInViewport,
    /// Light while the viewport hides scene lights
    LightsHidden,
    /// Object type without renderable geometry
    NotGeometry,
    /// Outside the camera frustum or beyond the cull distance
    Culled,
    /// No ray type left after combining visibility flags
    Invisible,
    /// The provider does not know the instanced object
    UnknownObject,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            SkipReason::HiddenInViewport => "hidden in viewport",
            SkipReason::LightsHidden => "lights hidden",
            SkipReason::NotGeometry => "not geometry",
            SkipReason::Culled => "culled",
            SkipReason::Invisible => "invisible",
            SkipReason::UnknownObject => "unknown object",
        };
        f.write_str(text)
    }
}

/// Visibility resolved for an instance that passed the filter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InstanceVisibility {
    pub visibility: RayVisibility,
    pub use_holdout: bool,
}

/// Outcome of filtering one instance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterDecision {
    Skip(SkipReason),
    /// Route to light sync
    Light,
    /// Sync as an object with this visibility
    Geometry(InstanceVisibility),
}

/// Instance that passed the viewport test, with its provider info loaded
#[derive(Debug, Clone)]
pub struct AdmittedInstance {
    pub object: ObjectInfo,
    /// Duplicator info when the duplicator is a different object
    pub parent: Option<ObjectInfo>,
}

/// Per-pass instance filter: viewport, object type, culling and ray visibility
#[derive(Debug, Clone)]
pub struct InstanceFilter {
    culling: ObjectCulling,
    use_viewport: bool,
    show_lights: bool,
}

impl InstanceFilter {
    pub fn new(config: &SyncConfig, camera: Option<CameraInfo>) -> Self {
        Self {
            culling: ObjectCulling::new(&config.culling, camera),
            use_viewport: config.viewport.is_some(),
            show_lights: config.show_lights(),
        }
    }

    /// Viewport visibility, checked once per instance record
    pub fn visible_in_viewport<P: SceneProvider + ?Sized>(&self, provider: &P, record: &InstanceRecord) -> bool {
        !self.use_viewport || provider.visible_in_viewport(record.object)
    }

    /// Load per-object culling flags
    pub fn init_object(&mut self, object: &ObjectInfo) {
        self.culling.init_object(&object.settings);
    }

    /// Decide what to do with an instance.
    ///
    /// `parent` is the duplicator's info for instances whose duplicator is
    /// a different object. Lights are only routed in the zero-time pass.
    pub fn evaluate(
        &self,
        record: &InstanceRecord,
        object: &ObjectInfo,
        parent: Option<&ObjectInfo>,
        motion: bool,
    ) -> FilterDecision {
        if !motion && object.is_light() {
            return if self.show_lights {
                FilterDecision::Light
            } else {
                FilterDecision::Skip(SkipReason::LightsHidden)
            };
        }

        if !object.is_geometry() {
            return FilterDecision::Skip(SkipReason::NotGeometry);
        }

        if self.culling.test(&object.bounds, &record.matrix_world) {
            return FilterDecision::Skip(SkipReason::Culled);
        }

        let use_holdout = object.settings.is_holdout || record.holdout;
        let mut visibility = object.settings.visibility;
        if let Some(parent) = parent {
            visibility &= parent.settings.visibility;
        }

        // Holdout objects on excluded layers are left as they are
        if !use_holdout && record.indirect_only {
            visibility.remove(RayVisibility::CAMERA);
        }

        if visibility.is_empty() {
            return FilterDecision::Skip(SkipReason::Invisible);
        }

        FilterDecision::Geometry(InstanceVisibility { visibility, use_holdout })
    }

    /// Viewport test and object lookup for one instance record.
    ///
    /// Loads the object's culling flags on success, so `evaluate` can run
    /// for each variant of the instance afterwards.
    pub fn admit<P: SceneProvider + ?Sized>(
        &mut self,
        provider: &P,
        record: &InstanceRecord,
    ) -> Result<AdmittedInstance, SkipReason> {
        if !self.visible_in_viewport(provider, record) {
            return Err(SkipReason::HiddenInViewport);
        }
        let object = provider.object(record.object).ok_or(SkipReason::UnknownObject)?;
        self.init_object(&object);
        let parent = distinct_parent(provider, record);
        Ok(AdmittedInstance { object, parent })
    }

    /// Full skip test for an instance, viewport included
    pub fn should_skip<P: SceneProvider + ?Sized>(
        &mut self,
        provider: &P,
        record: &InstanceRecord,
        motion: bool,
    ) -> bool {
        match self.admit(provider, record) {
            Err(_) => true,
            Ok(instance) => matches!(
                self.evaluate(record, &instance.object, instance.parent.as_ref(), motion),
                FilterDecision::Skip(_)
            ),
        }
    }
}

/// Duplicator info, when the duplicator is not the instanced object itself
pub fn distinct_parent<P: SceneProvider + ?Sized>(provider: &P, record: &InstanceRecord) -> Option<ObjectInfo> {
    record
        .parent
        .filter(|&parent| parent != record.object)
        .and_then(|parent| provider.object(parent))
}

#[cfg(test)]
#[path = "visibility_tests.rs"]
mod tests;
