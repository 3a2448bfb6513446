/// Mock geometry converter for tests
///
/// Produces a single triangle per conversion and records when each
/// conversion ran, so tests can check ordering between jobs.

use std::sync::{Mutex, PoisonError};
use std::thread::{self, ThreadId};
use std::time::{Duration, Instant};
use glam::Vec3;
use rustc_hash::{FxHashMap, FxHashSet};
use crate::error::{Error, Result};
use crate::provider::{DataId, GeometryConverter, GeometryData, GeometrySource};

// ============================================================================
// Conversion Record
// ============================================================================

/// One call into the converter
#[derive(Debug, Clone)]
pub struct ConversionRecord {
    pub object: DataId,
    pub use_particle_hair: bool,
    /// `None` for a full conversion, the attribute step for a motion one
    pub motion_step: Option<usize>,
    pub motion_time: f32,
    pub thread: ThreadId,
    pub start: Instant,
    pub end: Instant,
}

// ============================================================================
// Mock Geometry Converter
// ============================================================================

#[derive(Debug, Default)]
pub struct MockGeometryConverter {
    records: Mutex<Vec<ConversionRecord>>,
    failing: Mutex<FxHashSet<DataId>>,
    panicking: Mutex<FxHashSet<DataId>>,
    delays: Mutex<FxHashMap<(DataId, bool), Duration>>,
}

impl MockGeometryConverter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every conversion of `object` fail
    pub fn fail_for(&self, object: DataId) {
        self.failing.lock().unwrap_or_else(PoisonError::into_inner).insert(object);
    }

    pub fn stop_failing(&self, object: DataId) {
        self.failing.lock().unwrap_or_else(PoisonError::into_inner).remove(&object);
    }

    /// Make every conversion of `object` panic
    pub fn panic_for(&self, object: DataId) {
        self.panicking.lock().unwrap_or_else(PoisonError::into_inner).insert(object);
    }

    /// Sleep before converting `object` (base or hair variant)
    pub fn sleep_for(&self, object: DataId, use_particle_hair: bool, delay: Duration) {
        self.delays
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert((object, use_particle_hair), delay);
    }

    /// Every finished conversion, in completion order
    pub fn records(&self) -> Vec<ConversionRecord> {
        self.records.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Finished conversions of one object variant
    pub fn records_for(&self, object: DataId, use_particle_hair: bool) -> Vec<ConversionRecord> {
        self.records()
            .into_iter()
            .filter(|record| record.object == object && record.use_particle_hair == use_particle_hair)
            .collect()
    }

    pub fn conversion_count(&self) -> usize {
        self.records.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn clear_records(&self) {
        self.records.lock().unwrap_or_else(PoisonError::into_inner).clear();
    }

    fn run(&self, source: &GeometrySource, motion_step: Option<usize>) -> Result<()> {
        let start = Instant::now();

        let delay = self
            .delays
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&(source.object, source.use_particle_hair))
            .copied();
        if let Some(delay) = delay {
            thread::sleep(delay);
        }

        let panics = self.panicking.lock().unwrap_or_else(PoisonError::into_inner).contains(&source.object);
        if panics {
            panic!("mock conversion panic for {}", source.object);
        }

        let fails = self.failing.lock().unwrap_or_else(PoisonError::into_inner).contains(&source.object);

        self.records.lock().unwrap_or_else(PoisonError::into_inner).push(ConversionRecord {
            object: source.object,
            use_particle_hair: source.use_particle_hair,
            motion_step,
            motion_time: source.motion_time,
            thread: thread::current().id(),
            start,
            end: Instant::now(),
        });

        if fails {
            return Err(Error::ConversionFailed(format!("mock failure for {}", source.name)));
        }
        Ok(())
    }
}

impl GeometryConverter for MockGeometryConverter {
    fn convert(&self, source: &GeometrySource) -> Result<GeometryData> {
        self.run(source, None)?;
        Ok(GeometryData {
            positions: vec![Vec3::ZERO, Vec3::X, Vec3::Y],
            indices: vec![0, 1, 2],
            motion_positions: Vec::new(),
            transform_applied: false,
        })
    }

    fn convert_motion(&self, source: &GeometrySource, step: usize) -> Result<Vec<Vec3>> {
        self.run(source, Some(step))?;
        let offset = Vec3::splat(source.motion_time);
        Ok(vec![offset, Vec3::X + offset, Vec3::Y + offset])
    }
}
