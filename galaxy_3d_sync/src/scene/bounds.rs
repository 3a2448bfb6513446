/// Axis-aligned bounds used by object culling.

use glam::{Mat4, Vec3};

/// Axis-Aligned Bounding Box
///
/// Object bounds are stored in local space and transformed by the
/// instance world matrix at culling time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AABB {
    /// Minimum corner (x, y, z)
    pub min: Vec3,
    /// Maximum corner (x, y, z)
    pub max: Vec3,
}

impl AABB {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Bounds of the default cube, [-1, 1] on every axis
    pub fn unit() -> Self {
        Self { min: Vec3::splat(-1.0), max: Vec3::ONE }
    }

    /// The 8 corners, in the order x varies fastest
    pub fn corners(&self) -> [Vec3; 8] {
        let (lo, hi) = (self.min, self.max);
        [
            Vec3::new(lo.x, lo.y, lo.z),
            Vec3::new(hi.x, lo.y, lo.z),
            Vec3::new(lo.x, hi.y, lo.z),
            Vec3::new(hi.x, hi.y, lo.z),
            Vec3::new(lo.x, lo.y, hi.z),
            Vec3::new(hi.x, lo.y, hi.z),
            Vec3::new(lo.x, hi.y, hi.z),
            Vec3::new(hi.x, hi.y, hi.z),
        ]
    }

    /// The 8 corners transformed by `matrix`
    pub fn transformed_corners(&self, matrix: &Mat4) -> [Vec3; 8] {
        self.corners().map(|corner| matrix.transform_point3(corner))
    }

    /// Transform this local-space AABB by a matrix, returning a new AABB.
    ///
    /// Uses the Arvo method: projects each matrix axis onto the AABB extents
    /// for an exact (tight) result without transforming all 8 corners.
    pub fn transformed(&self, matrix: &Mat4) -> AABB {
        let translation = matrix.col(3).truncate();
        let mut new_min = translation;
        let mut new_max = translation;

        for i in 0..3 {
            let axis = matrix.col(i).truncate();
            let a = axis * self.min[i];
            let b = axis * self.max[i];
            new_min += a.min(b);
            new_max += a.max(b);
        }

        AABB { min: new_min, max: new_max }
    }

    /// Closest point of the box to `point` (the point itself when inside)
    pub fn closest_point(&self, point: Vec3) -> Vec3 {
        point.min(self.max).max(self.min)
    }
}

#[cfg(test)]
#[path = "bounds_tests.rs"]
mod tests;
