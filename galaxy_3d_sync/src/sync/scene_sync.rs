/// SceneSync: drives synchronization passes from a scene provider into a
/// RenderScene.
///
/// A full pass (relative time 0) walks every instance, resolves identities,
/// queues geometry conversions and rewrites changed objects, then prunes
/// what was not visited. Motion passes re-point the provider at each
/// collected motion time and only overwrite motion slots and deformation.
///
/// # Example
///
/// ```ignore
/// let mut sync = SceneSync::new(SyncConfig::default(), converter)?;
/// let reports = sync.run_motion_passes(&mut provider);
/// let updates = sync.take_updates();
/// ```

use std::ops::{Deref, DerefMut};
use std::sync::Arc;
use glam::Mat4;
use rustc_hash::{FxHashMap, FxHashSet};
use crate::config::{MotionType, SyncConfig};
use crate::error::Result;
use crate::provider::{DataId, FrameTime, GeometryConverter, InstanceRecord, SceneProvider};
use crate::scene::{GeometryHandle, ObjectManagerUpdate, RenderScene, SceneUpdates};
use crate::{engine_debug, engine_info, engine_trace};
use super::dispatcher::{GeometryDispatcher, GeometryJob, JobId};
use super::motion::{object_motion_steps, MotionTimes};
use super::object_key::GeometryKey;
use super::progress::SyncProgress;
use super::report::SyncReport;
use super::visibility::{InstanceFilter, SkipReason};

pub(super) const SOURCE: &str = "galaxy3d::SceneSync";

// ============================================================================
// Pass Context
// ============================================================================

/// State that lives for one pass only
pub(super) struct PassContext {
    pub filter: InstanceFilter,
    pub report: SyncReport,
    pub motion_time: f32,
    /// An area light portal was seen
    pub use_portal: bool,
}

impl PassContext {
    pub fn is_motion(&self) -> bool {
        self.motion_time != 0.0
    }

    pub fn skip(&mut self, record: &InstanceRecord, reason: SkipReason) {
        engine_trace!(SOURCE, "Skipping instance of {}: {}", record.object, reason);
        self.report.record_skip(reason);
    }
}

// ============================================================================
// Frame Guard
// ============================================================================

/// Mutable access to the provider that restores its frame when dropped
struct FrameGuard<'a, P: SceneProvider + ?Sized> {
    provider: &'a mut P,
    original: FrameTime,
}

impl<'a, P: SceneProvider + ?Sized> FrameGuard<'a, P> {
    fn new(provider: &'a mut P) -> Self {
        let original = provider.frame();
        Self { provider, original }
    }
}

impl<P: SceneProvider + ?Sized> Deref for FrameGuard<'_, P> {
    type Target = P;

    fn deref(&self) -> &P {
        &*self.provider
    }
}

impl<P: SceneProvider + ?Sized> DerefMut for FrameGuard<'_, P> {
    fn deref_mut(&mut self) -> &mut P {
        &mut *self.provider
    }
}

impl<P: SceneProvider + ?Sized> Drop for FrameGuard<'_, P> {
    fn drop(&mut self) {
        self.provider.set_frame(self.original);
    }
}

// ============================================================================
// Scene Sync
// ============================================================================

pub struct SceneSync {
    pub(super) config: SyncConfig,
    pub(super) scene: RenderScene,
    pub(super) motion_times: MotionTimes,
    pub(super) dispatcher: GeometryDispatcher,
    pub(super) converter: Arc<dyn GeometryConverter>,
    /// Geometries converted during the current sync
    pub(super) geometry_synced: FxHashSet<GeometryHandle>,
    /// Geometries motion-synced during the current motion pass
    pub(super) geometry_motion_synced: FxHashSet<GeometryHandle>,
    /// Last job queued per geometry key during the current pass
    pub(super) geometry_jobs: FxHashMap<GeometryKey, JobId>,
    world_id: Option<DataId>,
    world_recalc: bool,
    pub(super) progress: SyncProgress,
}

impl SceneSync {
    /// Create a sync with its own geometry worker pool
    pub fn new(config: SyncConfig, converter: Arc<dyn GeometryConverter>) -> Result<Self> {
        let dispatcher = GeometryDispatcher::new(config.worker_threads)?;
        Ok(Self {
            config,
            scene: RenderScene::new(),
            motion_times: MotionTimes::new(),
            dispatcher,
            converter,
            geometry_synced: FxHashSet::default(),
            geometry_motion_synced: FxHashSet::default(),
            geometry_jobs: FxHashMap::default(),
            world_id: None,
            world_recalc: false,
            progress: SyncProgress::new(),
        })
    }

    // ===== ACCESSORS =====

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// Replace the configuration; takes effect on the next pass
    pub fn set_config(&mut self, config: SyncConfig) {
        self.config = config;
    }

    pub fn scene(&self) -> &RenderScene {
        &self.scene
    }

    /// Motion times collected by the last full pass
    pub fn motion_times(&self) -> &MotionTimes {
        &self.motion_times
    }

    /// Handle for cancelling a running pass from another thread
    pub fn progress(&self) -> SyncProgress {
        self.progress.clone()
    }

    /// Hand the renderer everything tagged since the previous call
    pub fn take_updates(&mut self) -> SceneUpdates {
        self.scene.take_updates()
    }

    // ===== OUTER DRIVERS =====

    /// Run one pass at `motion_time`.
    ///
    /// Time 0 is a full generation: every identity cache is re-used or
    /// pruned. Any other time is a motion-only pass that writes the camera
    /// and object motion slots for that time and re-syncs deformation.
    pub fn run_full_pass<P: SceneProvider + ?Sized>(&mut self, provider: &P, motion_time: f32) -> SyncReport {
        if motion_time == 0.0 {
            self.begin_sync();
        }
        self.run_pass(provider, motion_time)
    }

    /// Run the zero-time pass, then one motion pass per collected time.
    ///
    /// The provider is moved to each motion time in ascending order and is
    /// back at its original frame when this returns, cancelled or not.
    pub fn run_motion_passes<P: SceneProvider + ?Sized>(&mut self, provider: &mut P) -> Vec<SyncReport> {
        let mut reports = vec![self.run_full_pass(&*provider, 0.0)];
        if reports[0].cancelled || self.config.need_motion() == MotionType::None {
            return reports;
        }

        let mut provider = FrameGuard::new(provider);
        let centre = provider.original.time();
        let delta = self.config.frame_center_delta();

        if delta != 0.0 {
            // Shutter opens or closes on the current frame
            // Same sync: change bits and converted geometries carry over
            provider.set_frame(FrameTime::from_time(centre + delta));
            let report = self.run_pass(&*provider, 0.0);
            let cancelled = report.cancelled;
            reports.push(report);
            if cancelled {
                return reports;
            }
        }

        let camera = &self.scene.camera;
        for step in 0..camera.motion_steps() {
            self.motion_times.insert(camera.motion_time(step));
        }

        let shutter_time = self.config.motion_shutter_time();
        for relative_time in self.motion_times.motion_pass_times() {
            if self.progress.is_cancelled() {
                engine_info!(SOURCE, "Motion synchronization cancelled");
                break;
            }
            engine_info!(SOURCE, "Synchronizing motion for the relative time {}", relative_time);

            let time = centre + delta + relative_time * shutter_time * 0.5;
            provider.set_frame(FrameTime::from_time(time));
            reports.push(self.run_pass(&*provider, relative_time));
        }
        reports
    }

    /// One pass within the current sync
    fn run_pass<P: SceneProvider + ?Sized>(&mut self, provider: &P, motion_time: f32) -> SyncReport {
        if motion_time == 0.0 {
            self.begin_generation(provider);
        } else if let Some(camera) = provider.camera() {
            self.scene.camera.set_motion_at(motion_time, camera.matrix_world);
        }
        self.sync_objects(provider, motion_time)
    }

    // ===== GENERATION =====

    /// Reset what stays valid for one whole sync, shifted centre pass included
    fn begin_sync(&mut self) {
        self.scene.begin_sync();
        self.geometry_synced.clear();
    }

    fn begin_generation<P: SceneProvider + ?Sized>(&mut self, provider: &P) {
        let world = provider.world();
        for id in provider.updated_ids() {
            self.scene.objects.set_recalc(id);
            self.scene.geometries.set_recalc(id);
            self.scene.lights.set_recalc(id);
            self.scene.particle_systems.set_recalc(id);
            self.scene.procedurals.set_recalc(id);
            if world.is_some_and(|world| world.id == id) {
                self.world_recalc = true;
            }
        }

        self.scene.objects.begin_generation();
        self.scene.geometries.begin_generation();
        self.scene.lights.begin_generation();
        self.scene.particle_systems.begin_generation();
        self.scene.procedurals.begin_generation();
        self.motion_times.clear();

        let camera = provider.camera();
        let steps = match self.config.need_motion() {
            MotionType::None => 0,
            MotionType::Pass => 3,
            MotionType::Blur => camera.map_or(0, |camera| object_motion_steps(camera.motion(), None)),
        };
        let tfm = camera.map_or(Mat4::IDENTITY, |camera| camera.matrix_world);
        self.scene.camera.begin(tfm, steps as usize);
    }

    /// Prune everything not used this generation
    fn end_generation(&mut self) -> usize {
        let objects = self.scene.objects.end_generation(true);
        let geometries = self.scene.geometries.end_generation(true);
        let lights = self.scene.lights.end_generation(true);
        let particle_systems = self.scene.particle_systems.end_generation(true);
        let procedurals = self.scene.procedurals.end_generation(true);

        if objects > 0 || geometries > 0 {
            self.scene.tag_object_manager(ObjectManagerUpdate::OBJECT_MODIFIED);
        }

        let pruned = objects + geometries + lights + particle_systems + procedurals;
        if pruned > 0 {
            engine_debug!(
                SOURCE,
                "Pruned {} objects, {} geometries, {} lights, {} particle systems, {} procedurals",
                objects, geometries, lights, particle_systems, procedurals
            );
        }
        pruned
    }

    // ===== PASS =====

    fn sync_objects<P: SceneProvider + ?Sized>(&mut self, provider: &P, motion_time: f32) -> SyncReport {
        let mut pass = PassContext {
            filter: InstanceFilter::new(&self.config, provider.camera()),
            report: SyncReport::new(motion_time),
            motion_time,
            use_portal: false,
        };
        let motion = pass.is_motion();

        if motion {
            self.geometry_motion_synced.clear();
        }
        self.geometry_jobs.clear();

        for record in provider.instances() {
            pass.report.instances_visited += 1;

            match pass.filter.admit(provider, &record) {
                Err(reason) => pass.skip(&record, reason),
                Ok(instance) => {
                    let sync_hair = record.show_particles && instance.object.has_particle_hair;

                    if record.show_self {
                        match instance.object.mesh_sequence_cache() {
                            // Procedurals generate their own motion data
                            Some((cache_file, filepath, object_path)) => {
                                if !motion {
                                    self.sync_procedural(provider, &instance.object, cache_file, filepath, object_path);
                                }
                            }
                            None => self.sync_object(provider, &mut pass, &record, &instance, false),
                        }
                    }
                    if sync_hair {
                        self.sync_object(provider, &mut pass, &record, &instance, true);
                    }
                }
            }

            if self.progress.is_cancelled() {
                engine_info!(SOURCE, "Synchronization cancelled after {} instances", pass.report.instances_visited);
                pass.report.cancelled = true;
                break;
            }
        }

        let summary = self.dispatcher.wait_all();
        pass.report.geometry_jobs_failed = summary.failed.len();
        self.tag_converted_geometries(motion);

        if !pass.report.cancelled && !motion {
            self.sync_background_light(provider, pass.use_portal);
            pass.report.entities_pruned = self.end_generation();
        }

        engine_debug!(
            SOURCE,
            "Pass at {} done: {} instances, {} objects ({} changed), {} geometries queued, {} failed",
            motion_time,
            pass.report.instances_visited,
            pass.report.objects_synced,
            pass.report.objects_changed,
            pass.report.geometries_queued,
            pass.report.geometry_jobs_failed
        );
        pass.report
    }

    /// Tag every geometry whose job of this pass produced new data
    fn tag_converted_geometries(&mut self, motion: bool) {
        let synced = if motion { &self.geometry_motion_synced } else { &self.geometry_synced };
        for &handle in synced {
            if let Some(geometry) = self.scene.geometries.get_mut(handle) {
                if geometry.is_modified() {
                    geometry.tag_update();
                }
            }
        }
    }

    /// Queue a job on the pool, or run it here for instances.
    ///
    /// Only one version of an instanced source object exists at a time, so
    /// its conversion cannot be deferred past the current record.
    pub(super) fn dispatch(&mut self, key: GeometryKey, inline: bool, job: GeometryJob) {
        let id = if inline {
            self.dispatcher.run_inline(job)
        } else {
            self.dispatcher.enqueue(job)
        };
        self.geometry_jobs.insert(key, id);
    }

    // ===== BACKGROUND =====

    pub(super) fn world_needs_sync(&mut self, world: Option<DataId>) -> bool {
        let changed = self.world_recalc || self.world_id != world;
        self.world_id = world;
        self.world_recalc = false;
        changed
    }
}

#[cfg(test)]
#[path = "scene_sync_tests.rs"]
mod tests;
