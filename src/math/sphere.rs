//! Bounding sphere with optional extremal points.
//!
//! The extrema are a small set of surface-adjacent points (produced by the
//! boundary helper or box corners) that let downstream consumers build far
//! tighter transformed bounds than center + radius alone.

use glam::{Mat4, Vec3};

use super::box3::Box3;

/// Absolute/relative tolerance used by [`BoundingSphere::approx_eq`].
const EPSILON: f32 = 1e-6;

/// A sphere given by center and radius, optionally carrying extremal points.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BoundingSphere {
    /// Sphere center.
    pub center: Vec3,
    /// Sphere radius.
    pub radius: f32,
    extrema: Option<Vec<Vec3>>,
}

impl BoundingSphere {
    /// Create a sphere from center and radius, without extrema.
    #[must_use]
    pub const fn new(center: Vec3, radius: f32) -> Self {
        Self {
            center,
            radius,
            extrema: None,
        }
    }

    /// Create a sphere carrying extremal points.
    #[must_use]
    pub const fn with_extrema(
        center: Vec3,
        radius: f32,
        extrema: Vec<Vec3>,
    ) -> Self {
        Self {
            center,
            radius,
            extrema: Some(extrema),
        }
    }

    /// The extremal points, if any.
    #[must_use]
    pub fn extrema(&self) -> Option<&[Vec3]> {
        self.extrema.as_deref()
    }

    /// Whether this sphere carries extremal points.
    #[must_use]
    pub const fn has_extrema(&self) -> bool {
        self.extrema.is_some()
    }

    /// Replace the extremal points.
    pub fn set_extrema(&mut self, extrema: Vec<Vec3>) {
        self.extrema = Some(extrema);
    }

    /// Drop the extremal points.
    pub fn clear_extrema(&mut self) {
        self.extrema = None;
    }

    /// Bounding sphere of a point set: centroid center, max-distance radius.
    #[must_use]
    pub fn from_points(points: &[Vec3]) -> Self {
        if points.is_empty() {
            return Self::default();
        }
        let mut center = Vec3::ZERO;
        for p in points {
            center += *p;
        }
        center /= points.len() as f32;
        let mut radius_sq = 0.0f32;
        for p in points {
            radius_sq = radius_sq.max(center.distance_squared(*p));
        }
        Self::new(center, radius_sq.sqrt())
    }

    /// Sphere around a box, carrying the 8 corners as extrema.
    #[must_use]
    pub fn from_box(box3: &Box3) -> Self {
        let center = (box3.min + box3.max) * 0.5;
        let radius = center.distance(box3.max);
        Self::with_extrema(center, radius, box3.corners().to_vec())
    }

    /// Transform the sphere (and its extrema) by a matrix.
    ///
    /// The radius is scaled by the matrix's maximum axis scale.
    #[must_use]
    pub fn transformed(&self, m: &Mat4) -> Self {
        let center = m.transform_point3(self.center);
        let radius = self.radius * max_scale_on_axis(m);
        let extrema = self
            .extrema
            .as_ref()
            .map(|es| es.iter().map(|e| m.transform_point3(*e)).collect());
        Self {
            center,
            radius,
            extrema,
        }
    }

    /// Translate the sphere (and its extrema).
    #[must_use]
    pub fn translated(&self, v: Vec3) -> Self {
        let extrema = self
            .extrema
            .as_ref()
            .map(|es| es.iter().map(|e| *e + v).collect());
        Self {
            center: self.center + v,
            radius: self.radius,
            extrema,
        }
    }

    /// Expand the radius by `delta`, pushing extrema radially outward.
    ///
    /// Degenerate spheres (tiny radius or fewer than two extrema) lose
    /// their extrema since there is no meaningful direction to push along.
    #[must_use]
    pub fn expanded(&self, delta: f32) -> Self {
        let radius = self.radius + delta;
        if self.radius < 1e-12
            || self.extrema.as_ref().is_none_or(|es| es.len() <= 1)
        {
            return Self::new(self.center, radius);
        }
        let center = self.center;
        let extrema = self.extrema.as_ref().map(|es| {
            es.iter()
                .map(|e| {
                    let dir = (*e - center).normalize_or_zero();
                    *e + dir * delta
                })
                .collect()
        });
        Self {
            center,
            radius,
            extrema,
        }
    }

    /// Grow the radius so that `other` is fully contained.
    ///
    /// Extrema are merged when both spheres carry them.
    #[must_use]
    pub fn expanded_by_sphere(&self, other: &Self) -> Self {
        let radius = self
            .radius
            .max(self.center.distance(other.center) + other.radius);
        let extrema = match (&self.extrema, &other.extrema) {
            (Some(a), Some(b)) => {
                Some(a.iter().chain(b.iter()).copied().collect())
            }
            _ => None,
        };
        Self {
            center: self.center,
            radius,
            extrema,
        }
    }

    /// Check if this sphere fully includes `other`, using `other`'s extrema
    /// when available.
    #[must_use]
    pub fn includes(&self, other: &Self) -> bool {
        other.extrema.as_ref().map_or_else(
            || {
                self.center.distance(other.center) + other.radius
                    <= self.radius
            },
            |es| es.iter().all(|e| self.center.distance(*e) <= self.radius),
        )
    }

    /// Check if the two spheres overlap.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.center.distance(other.center) <= self.radius + other.radius
    }

    /// Signed distance of a point from the surface; negative inside.
    #[must_use]
    pub fn distance_to_point(&self, v: Vec3) -> f32 {
        self.center.distance(v) - self.radius
    }

    /// Approximate equality of center and radius.
    #[must_use]
    pub fn approx_eq(&self, other: &Self) -> bool {
        let ar = self.radius;
        let br = other.radius;
        (ar - br).abs() <= EPSILON * 1.0f32.max(ar.abs()).max(br.abs())
            && self.center.abs_diff_eq(other.center, EPSILON)
    }
}

/// Maximum scale the matrix applies along any of its axes.
fn max_scale_on_axis(m: &Mat4) -> f32 {
    let sx = m.x_axis.truncate().length_squared();
    let sy = m.y_axis.truncate().length_squared();
    let sz = m.z_axis.truncate().length_squared();
    sx.max(sy).max(sz).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_points_centroid() {
        let s = BoundingSphere::from_points(&[
            Vec3::new(-1.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
        ]);
        assert!(s.center.abs_diff_eq(Vec3::ZERO, 1e-6));
        assert!((s.radius - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_from_box_carries_corners() {
        let b = Box3::new(Vec3::splat(-1.0), Vec3::splat(1.0));
        let s = BoundingSphere::from_box(&b);
        assert_eq!(s.extrema().unwrap().len(), 8);
        assert!((s.radius - 3.0f32.sqrt()).abs() < 1e-5);
    }

    #[test]
    fn test_transformed_scales_radius() {
        let s = BoundingSphere::new(Vec3::ZERO, 1.0);
        let m = Mat4::from_scale(Vec3::new(2.0, 1.0, 1.0));
        let t = s.transformed(&m);
        assert!((t.radius - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_includes_and_overlaps() {
        let a = BoundingSphere::new(Vec3::ZERO, 2.0);
        let b = BoundingSphere::new(Vec3::new(0.5, 0.0, 0.0), 1.0);
        let c = BoundingSphere::new(Vec3::new(4.0, 0.0, 0.0), 1.0);
        assert!(a.includes(&b));
        assert!(!a.includes(&c));
        assert!(a.overlaps(&b));
        assert!(!a.overlaps(&c));
    }

    #[test]
    fn test_expanded_pushes_extrema() {
        let b = Box3::new(Vec3::splat(-1.0), Vec3::splat(1.0));
        let s = BoundingSphere::from_box(&b).expanded(1.0);
        assert!((s.radius - (3.0f32.sqrt() + 1.0)).abs() < 1e-5);
        for e in s.extrema().unwrap() {
            assert!(e.length() > 3.0f32.sqrt() - 1e-5);
        }
    }

    #[test]
    fn test_expanded_degenerate_drops_extrema() {
        let s = BoundingSphere::with_extrema(Vec3::ZERO, 0.0, vec![Vec3::ZERO])
            .expanded(0.5);
        assert!(!s.has_extrema());
        assert!((s.radius - 0.5).abs() < 1e-6);
    }
}
