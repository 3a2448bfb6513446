/// Motion time collection and per-object motion step counts.

use crate::provider::MotionSettings;
use crate::scene::MAX_MOTION_STEPS;

/// Ordered, deduplicated set of relative motion times for one generation.
///
/// Filled by every object with motion during the zero-time pass and by the
/// camera; each non-zero entry drives one motion-only pass.
#[derive(Debug, Clone, Default)]
pub struct MotionTimes {
    times: Vec<f32>,
}

impl MotionTimes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.times.clear();
    }

    /// Insert a time; inserting an existing value is a no-op.
    ///
    /// NaN is rejected and -0.0 is stored as 0.0.
    pub fn insert(&mut self, time: f32) {
        if time.is_nan() {
            return;
        }
        let time = if time == 0.0 { 0.0 } else { time };
        if let Err(index) = self.times.binary_search_by(|existing| existing.total_cmp(&time)) {
            self.times.insert(index, time);
        }
    }

    pub fn contains(&self, time: f32) -> bool {
        self.times.iter().any(|&t| t == time)
    }

    /// All times, ascending, centre included
    pub fn as_slice(&self) -> &[f32] {
        &self.times
    }

    /// Non-zero times, ascending
    pub fn motion_pass_times(&self) -> Vec<f32> {
        self.times.iter().copied().filter(|&t| t != 0.0).collect()
    }

    /// Visit every time in ascending order, skipping the centre time
    pub fn for_each_in_order(&self, mut f: impl FnMut(f32)) {
        for &time in &self.times {
            if time != 0.0 {
                f(time);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }
}

/// Number of motion steps of an object, 0 when it has no motion blur.
///
/// A distinct `parent` (the duplicator) must also opt in and can raise the
/// step count. The count is odd so the current frame is one of the samples,
/// and a power of two plus one so objects with different settings share
/// sample times.
pub fn object_motion_steps(object: MotionSettings, parent: Option<MotionSettings>) -> u32 {
    if !object.use_motion_blur {
        return 0;
    }
    let mut steps = object.steps.max(1);
    if let Some(parent) = parent {
        if !parent.use_motion_blur {
            return 0;
        }
        steps = steps.max(parent.steps);
    }
    // 2 << 7 + 1 already exceeds the cap
    let steps = steps.min(8) as u32;
    ((2u32 << (steps - 1)) + 1).min(MAX_MOTION_STEPS)
}

/// Whether deformation blur is enabled for an object and its distinct parent
pub fn object_use_deform_motion(object: MotionSettings, parent: Option<MotionSettings>) -> bool {
    object.use_deform_motion && parent.map_or(true, |parent| parent.use_deform_motion)
}

#[cfg(test)]
#[path = "motion_tests.rs"]
mod tests;
