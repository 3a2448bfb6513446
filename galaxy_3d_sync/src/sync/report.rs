/// Per-pass statistics returned to the host.

use rustc_hash::FxHashMap;
use super::visibility::SkipReason;

/// What one synchronization pass did
#[derive(Debug, Clone, Default)]
pub struct SyncReport {
    /// Relative motion time of the pass (0 for a full pass)
    pub time: f32,
    pub instances_visited: usize,
    pub skipped: FxHashMap<SkipReason, usize>,
    /// Objects resolved in a full pass, or motion slots written in a motion pass
    pub objects_synced: usize,
    /// Objects whose render data was rewritten
    pub objects_changed: usize,
    pub lights_synced: usize,
    pub geometries_queued: usize,
    pub geometry_jobs_failed: usize,
    pub entities_pruned: usize,
    pub cancelled: bool,
}

impl SyncReport {
    pub fn new(time: f32) -> Self {
        Self { time, ..Default::default() }
    }

    pub fn is_motion_pass(&self) -> bool {
        self.time != 0.0
    }

    pub(crate) fn record_skip(&mut self, reason: SkipReason) {
        *self.skipped.entry(reason).or_insert(0) += 1;
    }

    /// Instances skipped for `reason`
    pub fn skipped_for(&self, reason: SkipReason) -> usize {
        self.skipped.get(&reason).copied().unwrap_or(0)
    }

    pub fn total_skipped(&self) -> usize {
        self.skipped.values().sum()
    }
}
