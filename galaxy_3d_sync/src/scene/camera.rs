/// Render-side camera motion samples.

use glam::Mat4;
use super::object::motion_time;

/// Camera transforms per motion step
#[derive(Debug, Clone, Default)]
pub struct SyncCamera {
    tfm: Mat4,
    motion: Vec<Mat4>,
    tagged: bool,
}

impl SyncCamera {
    /// Reset for a new sync: `steps` samples, `tfm` at the middle one
    pub fn begin(&mut self, tfm: Mat4, steps: usize) {
        let mut motion = vec![Mat4::IDENTITY; steps];
        if let Some(centre) = motion.get_mut(steps / 2) {
            *centre = tfm;
        }
        if self.tfm != tfm || self.motion != motion {
            self.tagged = true;
        }
        self.tfm = tfm;
        self.motion = motion;
    }

    pub fn tfm(&self) -> Mat4 {
        self.tfm
    }

    pub fn motion(&self) -> &[Mat4] {
        &self.motion
    }

    pub fn motion_steps(&self) -> usize {
        self.motion.len()
    }

    pub fn motion_time(&self, step: usize) -> f32 {
        motion_time(step, self.motion.len())
    }

    pub fn motion_step(&self, time: f32) -> Option<usize> {
        if self.motion.len() <= 1 {
            return None;
        }
        (0..self.motion.len()).find(|&step| self.motion_time(step) == time)
    }

    /// Write the transform sampled at `time` when it matches a camera step
    pub fn set_motion_at(&mut self, time: f32, tfm: Mat4) -> bool {
        match self.motion_step(time) {
            Some(step) => {
                if self.motion[step] != tfm {
                    self.motion[step] = tfm;
                    self.tagged = true;
                }
                true
            }
            None => false,
        }
    }

    pub fn is_tagged(&self) -> bool {
        self.tagged
    }

    pub(crate) fn clear_tag(&mut self) {
        self.tagged = false;
    }
}
