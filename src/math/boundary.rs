//! Extremal-points-on-sphere (EPOS) bounding-sphere approximation.
//!
//! Projects every position onto a fixed set of axes, keeping the two
//! extremal points per axis. The centroid of those extrema becomes the
//! sphere center; a second pass over the positions grows the radius. The
//! extrema travel with the sphere so later consumers can re-bound
//! transformed instances without touching the full position set.

use glam::Vec3;

use super::sphere::BoundingSphere;

/// Coarse axis set: 14 extrema.
const COARSE_AXES: [[f32; 3]; 7] = [
    [1.0, 0.0, 0.0],
    [0.0, 1.0, 0.0],
    [0.0, 0.0, 1.0],
    [1.0, 1.0, 1.0],
    [1.0, 1.0, -1.0],
    [1.0, -1.0, 1.0],
    [1.0, -1.0, -1.0],
];

/// Fine axis set: 49 axes, 98 extrema.
const FINE_AXES: [[f32; 3]; 49] = [
    // {0 0 1}
    [1.0, 0.0, 0.0],
    [0.0, 1.0, 0.0],
    [0.0, 0.0, 1.0],
    // {1 1 1}
    [1.0, 1.0, 1.0],
    [1.0, 1.0, -1.0],
    [1.0, -1.0, 1.0],
    [1.0, -1.0, -1.0],
    // {0 1 1}
    [0.0, 1.0, 1.0],
    [0.0, 1.0, -1.0],
    [1.0, 0.0, 1.0],
    [1.0, 0.0, -1.0],
    [1.0, 1.0, 0.0],
    [1.0, -1.0, 0.0],
    // {0 1 2}
    [0.0, 1.0, 2.0],
    [0.0, 2.0, 1.0],
    [0.0, 1.0, -2.0],
    [0.0, 2.0, -1.0],
    [1.0, 0.0, 2.0],
    [2.0, 0.0, 1.0],
    [1.0, 0.0, -2.0],
    [2.0, 0.0, -1.0],
    [1.0, 2.0, 0.0],
    [2.0, 1.0, 0.0],
    [1.0, -2.0, 0.0],
    [2.0, -1.0, 0.0],
    // {1 1 2}
    [1.0, 1.0, 2.0],
    [1.0, 1.0, -2.0],
    [1.0, -1.0, 2.0],
    [1.0, -1.0, -2.0],
    [1.0, 2.0, 1.0],
    [1.0, 2.0, -1.0],
    [1.0, -2.0, 1.0],
    [1.0, -2.0, -1.0],
    [2.0, 1.0, 1.0],
    [2.0, 1.0, -1.0],
    [2.0, -1.0, 1.0],
    [2.0, -1.0, -1.0],
    // {1 2 2}
    [2.0, 2.0, 1.0],
    [2.0, 2.0, -1.0],
    [2.0, -2.0, 1.0],
    [2.0, -2.0, -1.0],
    [2.0, 1.0, 2.0],
    [2.0, 1.0, -2.0],
    [2.0, -1.0, 2.0],
    [2.0, -1.0, -2.0],
    [1.0, 2.0, 2.0],
    [1.0, 2.0, -2.0],
    [1.0, -2.0, 2.0],
    [1.0, -2.0, -2.0],
];

/// Precision of the extremal axis set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundaryPrecision {
    /// 7 axes / 14 extrema. Cheap; used above ~100k positions.
    Coarse,
    /// 49 axes / 98 extrema.
    Fine,
}

/// Incremental bounding-sphere builder over extremal points.
#[derive(Debug)]
pub struct BoundaryHelper {
    dirs: Vec<Vec3>,
    min_dist: Vec<f32>,
    max_dist: Vec<f32>,
    // interleaved [min_0, max_0, min_1, max_1, ...]
    extrema: Vec<Vec3>,
    center: Vec3,
    radius_sq: f32,
}

impl BoundaryHelper {
    /// Create a helper with the given axis precision.
    #[must_use]
    pub fn new(precision: BoundaryPrecision) -> Self {
        let axes: &[[f32; 3]] = match precision {
            BoundaryPrecision::Coarse => &COARSE_AXES,
            BoundaryPrecision::Fine => &FINE_AXES,
        };
        let dirs: Vec<Vec3> =
            axes.iter().map(|a| Vec3::from_array(*a).normalize()).collect();
        let n = dirs.len();
        Self {
            dirs,
            min_dist: vec![f32::INFINITY; n],
            max_dist: vec![f32::NEG_INFINITY; n],
            extrema: vec![Vec3::ZERO; n * 2],
            center: Vec3::ZERO,
            radius_sq: 0.0,
        }
    }

    /// Clear all accumulated state for a fresh run.
    pub fn reset(&mut self) {
        self.min_dist.fill(f32::INFINITY);
        self.max_dist.fill(f32::NEG_INFINITY);
        self.extrema.fill(Vec3::ZERO);
        self.center = Vec3::ZERO;
        self.radius_sq = 0.0;
    }

    /// Include a point in the extremal pass.
    pub fn include_position(&mut self, p: Vec3) {
        self.include(p, 0.0);
    }

    /// Include a sphere (center + radius) in the extremal pass.
    pub fn include_position_radius(&mut self, p: Vec3, radius: f32) {
        self.include(p, radius);
    }

    fn include(&mut self, p: Vec3, radius: f32) {
        for (i, dir) in self.dirs.iter().enumerate() {
            let d = dir.dot(p);
            if d - radius < self.min_dist[i] {
                self.min_dist[i] = d - radius;
                self.extrema[i * 2] = p - *dir * radius;
            }
            if d + radius > self.max_dist[i] {
                self.max_dist[i] = d + radius;
                self.extrema[i * 2 + 1] = p + *dir * radius;
            }
        }
    }

    /// Finish the include pass: the center becomes the extrema centroid.
    pub fn finished_include_step(&mut self) {
        let mut sum = Vec3::ZERO;
        let mut count = 0usize;
        for (i, _) in self.dirs.iter().enumerate() {
            if self.min_dist[i].is_finite() {
                sum += self.extrema[i * 2];
                sum += self.extrema[i * 2 + 1];
                count += 2;
            }
        }
        if count > 0 {
            self.center = sum / count as f32;
        }
    }

    /// Grow the radius to cover a point.
    pub fn radius_position(&mut self, p: Vec3) {
        self.radius_sq = self.radius_sq.max(self.center.distance_squared(p));
    }

    /// Grow the radius to cover a sphere (center + radius).
    pub fn radius_position_radius(&mut self, p: Vec3, radius: f32) {
        let d = self.center.distance(p) + radius;
        self.radius_sq = self.radius_sq.max(d * d);
    }

    /// Extract the sphere, carrying the extremal points.
    #[must_use]
    pub fn sphere(&self) -> BoundingSphere {
        if self.min_dist.iter().all(|d| !d.is_finite()) {
            return BoundingSphere::default();
        }
        BoundingSphere::with_extrema(
            self.center,
            self.radius_sq.sqrt(),
            self.extrema.clone(),
        )
    }
}
