//! Axis-aligned bounding box.

use glam::{Mat4, Vec3};

use super::sphere::BoundingSphere;

/// Number of extrema at which sphere extrema fully describe the bounds.
/// Spheres from the coarse boundary helper carry 14.
const FULL_EXTREMA: usize = 14;

/// Axis-aligned box given by min/max corners.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Box3 {
    /// Minimum corner.
    pub min: Vec3,
    /// Maximum corner.
    pub max: Vec3,
}

impl Default for Box3 {
    fn default() -> Self {
        Self::empty()
    }
}

impl Box3 {
    /// Create a box from min/max corners.
    #[must_use]
    pub const fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// The empty box: min at `+MAX`, max at `-MAX`, absorbing any point.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            min: Vec3::MAX,
            max: Vec3::MIN,
        }
    }

    /// Tight box around a point set.
    #[must_use]
    pub fn from_points(points: &[Vec3]) -> Self {
        let mut b = Self::empty();
        for p in points {
            b.add_point(*p);
        }
        b
    }

    /// Box around a sphere, using its extrema when enough are present.
    #[must_use]
    pub fn from_sphere(sphere: &BoundingSphere) -> Self {
        let mut b = Self::empty();
        b.add_sphere(sphere);
        b
    }

    /// Grow to include a point.
    pub fn add_point(&mut self, p: Vec3) {
        self.min = self.min.min(p);
        self.max = self.max.max(p);
    }

    /// Grow to include a sphere, using its extrema when enough are present.
    pub fn add_sphere(&mut self, sphere: &BoundingSphere) {
        match sphere.extrema() {
            Some(es) if es.len() >= FULL_EXTREMA => {
                for e in es {
                    self.add_point(*e);
                }
            }
            _ => {
                self.add_point(sphere.center - Vec3::splat(sphere.radius));
                self.add_point(sphere.center + Vec3::splat(sphere.radius));
            }
        }
    }

    /// Expand each face outward by `delta` per axis.
    #[must_use]
    pub fn expanded(&self, delta: Vec3) -> Self {
        Self {
            min: self.min - delta,
            max: self.max + delta,
        }
    }

    /// Scale both corners by a factor.
    #[must_use]
    pub fn scaled(&self, s: f32) -> Self {
        Self {
            min: self.min * s,
            max: self.max * s,
        }
    }

    /// Extent of the box along each axis.
    #[must_use]
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Volume of the box.
    #[must_use]
    pub fn volume(&self) -> f32 {
        let s = self.size();
        s.x * s.y * s.z
    }

    /// The 8 corner points.
    #[must_use]
    pub fn corners(&self) -> [Vec3; 8] {
        let (lo, hi) = (self.min, self.max);
        [
            Vec3::new(lo.x, lo.y, lo.z),
            Vec3::new(hi.x, hi.y, hi.z),
            Vec3::new(hi.x, lo.y, lo.z),
            Vec3::new(lo.x, hi.y, hi.z),
            Vec3::new(lo.x, lo.y, hi.z),
            Vec3::new(hi.x, lo.y, hi.z),
            Vec3::new(hi.x, hi.y, lo.z),
            Vec3::new(lo.x, hi.y, lo.z),
        ]
    }

    /// Check if the point lies inside (inclusive).
    #[must_use]
    pub fn contains_point(&self, p: Vec3) -> bool {
        p.cmpge(self.min).all() && p.cmple(self.max).all()
    }

    /// Check if the sphere lies fully inside.
    #[must_use]
    pub fn contains_sphere(&self, sphere: &BoundingSphere) -> bool {
        let r = Vec3::splat(sphere.radius);
        (sphere.center - r).cmpge(self.min).all()
            && (sphere.center + r).cmple(self.max).all()
    }

    /// Check if the two boxes overlap.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.max.cmpge(other.min).all() && self.min.cmple(other.max).all()
    }

    /// Check if the box and sphere intersect.
    ///
    /// Clamps the center onto the box; intersecting iff that closest point
    /// lies within the sphere.
    #[must_use]
    pub fn intersects_sphere(&self, sphere: &BoundingSphere) -> bool {
        let closest = sphere.center.clamp(self.min, self.max);
        closest.distance_squared(sphere.center)
            <= sphere.radius * sphere.radius
    }

    /// Axis-aligned box around the transformed corners.
    #[must_use]
    pub fn transformed(&self, m: &Mat4) -> Self {
        let mut b = Self::empty();
        for c in self.corners() {
            b.add_point(m.transform_point3(c));
        }
        b
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_points() {
        let b = Box3::from_points(&[
            Vec3::new(-1.0, 2.0, 0.0),
            Vec3::new(3.0, -4.0, 5.0),
        ]);
        assert_eq!(b.min, Vec3::new(-1.0, -4.0, 0.0));
        assert_eq!(b.max, Vec3::new(3.0, 2.0, 5.0));
    }

    #[test]
    fn test_size_and_volume() {
        let b = Box3::new(Vec3::ZERO, Vec3::new(2.0, 3.0, 4.0));
        assert_eq!(b.size(), Vec3::new(2.0, 3.0, 4.0));
        assert!((b.volume() - 24.0).abs() < 1e-6);
    }

    #[test]
    fn test_contains_and_overlaps() {
        let b = Box3::new(Vec3::ZERO, Vec3::splat(2.0));
        assert!(b.contains_point(Vec3::ONE));
        assert!(!b.contains_point(Vec3::splat(3.0)));
        let other = Box3::new(Vec3::splat(1.5), Vec3::splat(4.0));
        assert!(b.overlaps(&other));
        let far = Box3::new(Vec3::splat(5.0), Vec3::splat(6.0));
        assert!(!b.overlaps(&far));
    }

    #[test]
    fn test_intersects_sphere() {
        let b = Box3::new(Vec3::ZERO, Vec3::splat(1.0));
        let near = BoundingSphere::new(Vec3::new(1.5, 0.5, 0.5), 0.6);
        let far = BoundingSphere::new(Vec3::new(3.0, 0.5, 0.5), 0.6);
        assert!(b.intersects_sphere(&near));
        assert!(!b.intersects_sphere(&far));
    }

    #[test]
    fn test_transformed_translation() {
        let b = Box3::new(Vec3::ZERO, Vec3::ONE)
            .transformed(&Mat4::from_translation(Vec3::splat(2.0)));
        assert!(b.min.abs_diff_eq(Vec3::splat(2.0), 1e-6));
        assert!(b.max.abs_diff_eq(Vec3::splat(3.0), 1e-6));
    }
}
