//! Invariant and instanced bounding-sphere computation over packed
//! position buffers.
//!
//! The invariant sphere bounds the raw geometry; the instanced sphere
//! bounds all transformed copies. Rebounding instances uses the invariant
//! sphere's extrema when the instance count is small, which is much
//! tighter than transforming center + radius.

use glam::{Mat4, Vec3};

use super::boundary::{BoundaryHelper, BoundaryPrecision};
use super::sphere::BoundingSphere;

/// Above this many positions the coarse axis set is used.
const COARSE_THRESHOLD: usize = 100_000;

/// Up to this many positions/instances, exact points are kept as extrema.
const EXTREMA_LIMIT: usize = 14;

/// Invariant + instanced bounding spheres of one geometry.
#[derive(Debug, Clone)]
pub struct BoundingSpheres {
    /// Sphere around all transformed instances.
    pub world: BoundingSphere,
    /// Sphere around the untransformed geometry.
    pub invariant: BoundingSphere,
}

fn helper_for(count: usize) -> BoundaryHelper {
    if count > COARSE_THRESHOLD {
        BoundaryHelper::new(BoundaryPrecision::Coarse)
    } else {
        BoundaryHelper::new(BoundaryPrecision::Fine)
    }
}

/// Bounding sphere of a packed `[x, y, z, ...]` position buffer.
///
/// Only every `step_factor`-th position is visited; callers whose buffers
/// duplicate each position n times (impostor vertex duplication) pass n.
/// For very small inputs the sampled positions themselves become the
/// extrema, which is exact.
#[must_use]
pub fn invariant_bounding_sphere(
    positions: &[f32],
    position_count: usize,
    step_factor: usize,
) -> BoundingSphere {
    let step = step_factor.max(1) * 3;
    // only complete xyz triples are sampled
    let end = (position_count * 3).min(positions.len() - positions.len() % 3);
    let mut helper = helper_for(position_count);
    for i in (0..end).step_by(step) {
        helper.include_position(vec3_at(positions, i));
    }
    helper.finished_include_step();
    for i in (0..end).step_by(step) {
        helper.radius_position(vec3_at(positions, i));
    }
    let mut sphere = helper.sphere();
    if position_count <= EXTREMA_LIMIT {
        let extrema: Vec<Vec3> =
            (0..end).step_by(step).map(|i| vec3_at(positions, i)).collect();
        sphere.set_extrema(extrema);
    }
    sphere
}

/// Bounding sphere of all instances of an invariant sphere.
///
/// A single identity transform short-circuits to a clone. With few
/// instances and available extrema, the extrema of every instance are
/// re-bounded; otherwise each instance contributes its transformed
/// center + radius.
#[must_use]
pub fn transform_bounding_sphere(
    invariant: &BoundingSphere,
    transforms: &[Mat4],
) -> BoundingSphere {
    if transforms.len() == 1 {
        let m = &transforms[0];
        return if *m == Mat4::IDENTITY {
            invariant.clone()
        } else {
            invariant.transformed(m)
        };
    }
    let mut helper = helper_for(transforms.len());
    match invariant.extrema() {
        Some(extrema) if transforms.len() <= EXTREMA_LIMIT => {
            for m in transforms {
                for e in extrema {
                    helper.include_position(m.transform_point3(*e));
                }
            }
            helper.finished_include_step();
            for m in transforms {
                for e in extrema {
                    helper.radius_position(m.transform_point3(*e));
                }
            }
        }
        _ => {
            for m in transforms {
                let c = m.transform_point3(invariant.center);
                helper.include_position_radius(c, invariant.radius);
            }
            helper.finished_include_step();
            for m in transforms {
                let c = m.transform_point3(invariant.center);
                helper.radius_position_radius(c, invariant.radius);
            }
        }
    }
    helper.sphere()
}

/// Invariant + instanced bounding spheres with padding applied to both.
#[must_use]
pub fn bounding_spheres(
    positions: &[f32],
    position_count: usize,
    transforms: &[Mat4],
    padding: f32,
    step_factor: usize,
) -> BoundingSpheres {
    let invariant =
        invariant_bounding_sphere(positions, position_count, step_factor);
    let world = transform_bounding_sphere(&invariant, transforms);
    BoundingSpheres {
        world: world.expanded(padding),
        invariant: invariant.expanded(padding),
    }
}

#[inline]
const fn vec3_at(buf: &[f32], i: usize) -> Vec3 {
    Vec3::new(buf[i], buf[i + 1], buf[i + 2])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invariant_covers_positions() {
        let positions: Vec<f32> = vec![
            0.0, 0.0, 0.0, //
            4.0, 0.0, 0.0, //
            0.0, 4.0, 0.0, //
            0.0, 0.0, 4.0, //
        ];
        let s = invariant_bounding_sphere(&positions, 4, 1);
        for chunk in positions.chunks(3) {
            let p = Vec3::new(chunk[0], chunk[1], chunk[2]);
            assert!(s.center.distance(p) <= s.radius + 1e-5);
        }
        // small input: exact positions kept as extrema
        assert_eq!(s.extrema().unwrap().len(), 4);
    }

    #[test]
    fn test_invariant_step_factor_skips_duplicates() {
        // each position duplicated 4 times, as in impostor buffers
        let mut positions = Vec::new();
        for p in [[0.0f32, 0.0, 0.0], [2.0, 0.0, 0.0]] {
            for _ in 0..4 {
                positions.extend_from_slice(&p);
            }
        }
        let s = invariant_bounding_sphere(&positions, 8, 4);
        // the extremal centroid is a heuristic, so only coverage and
        // reasonable tightness are guaranteed
        for p in [Vec3::ZERO, Vec3::new(2.0, 0.0, 0.0)] {
            assert!(s.center.distance(p) <= s.radius + 1e-5);
        }
        assert!(s.radius < 1.5);
        assert_eq!(s.extrema().unwrap().len(), 2);
    }

    #[test]
    fn test_truncated_buffer_ignores_partial_position() {
        // 2 full positions plus 2 stray floats
        let positions: Vec<f32> = vec![0.0, 0.0, 0.0, 2.0, 0.0, 0.0, 9.0, 9.0];
        let s = invariant_bounding_sphere(&positions, 3, 1);
        for p in [Vec3::ZERO, Vec3::new(2.0, 0.0, 0.0)] {
            assert!(s.center.distance(p) <= s.radius + 1e-5);
        }
        assert_eq!(s.extrema().unwrap().len(), 2);
    }

    #[test]
    fn test_transform_identity_single() {
        let s = BoundingSphere::new(Vec3::ONE, 2.0);
        let t = transform_bounding_sphere(&s, &[Mat4::IDENTITY]);
        assert!(t.approx_eq(&s));
    }

    #[test]
    fn test_transform_two_translations() {
        let inv = BoundingSphere::new(Vec3::ZERO, 1.0);
        let transforms = [
            Mat4::from_translation(Vec3::new(-3.0, 0.0, 0.0)),
            Mat4::from_translation(Vec3::new(3.0, 0.0, 0.0)),
        ];
        let t = transform_bounding_sphere(&inv, &transforms);
        // both instance spheres must fit
        assert!(t.center.distance(Vec3::new(-3.0, 0.0, 0.0)) + 1.0 <= t.radius + 1e-4);
        assert!(t.center.distance(Vec3::new(3.0, 0.0, 0.0)) + 1.0 <= t.radius + 1e-4);
    }

    #[test]
    fn test_transform_uses_extrema_when_available() {
        let positions: Vec<f32> = vec![
            -1.0, 0.0, 0.0, //
            1.0, 0.0, 0.0, //
        ];
        let inv = invariant_bounding_sphere(&positions, 2, 1);
        let transforms = [
            Mat4::IDENTITY,
            Mat4::from_translation(Vec3::new(0.0, 2.0, 0.0)),
        ];
        let t = transform_bounding_sphere(&inv, &transforms);
        for p in [
            Vec3::new(-1.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(-1.0, 2.0, 0.0),
            Vec3::new(1.0, 2.0, 0.0),
        ] {
            assert!(t.center.distance(p) <= t.radius + 1e-4);
        }
    }

    #[test]
    fn test_padding_applied() {
        let positions: Vec<f32> = vec![0.0, 0.0, 0.0, 2.0, 0.0, 0.0];
        let unpadded = invariant_bounding_sphere(&positions, 2, 1);
        let b = bounding_spheres(&positions, 2, &[Mat4::IDENTITY], 0.5, 1);
        assert!((b.invariant.radius - (unpadded.radius + 0.5)).abs() < 1e-4);
        assert!((b.world.radius - (unpadded.radius + 0.5)).abs() < 1e-4);
    }
}
