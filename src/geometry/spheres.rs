//! Billboard sphere impostors.
//!
//! Each sphere is a camera-facing quad; the fragment shader ray-casts the
//! analytic sphere. Four vertices carry the center and a 2D mapping
//! corner.

use glam::Vec3;

use crate::math::{invariant_bounding_sphere, BoundingSphere};

/// Quad corners per sphere vertex.
const MAPPINGS: [[f32; 2]; 4] = [[-1.0, 1.0], [-1.0, -1.0], [1.0, 1.0], [1.0, -1.0]];

/// Packed sphere impostor buffers, 4 vertices and 6 indices per sphere.
#[derive(Debug, Clone, Default)]
pub struct Spheres {
    /// 2D quad corner per vertex.
    pub mappings: Vec<f32>,
    /// Sphere center, duplicated per vertex.
    pub centers: Vec<f32>,
    /// Group id per vertex.
    pub groups: Vec<f32>,
    /// Quad triangle indices.
    pub indices: Vec<u32>,
    bounding_sphere: BoundingSphere,
}

impl Spheres {
    /// Number of spheres.
    #[must_use]
    pub fn sphere_count(&self) -> usize {
        self.indices.len() / 6
    }

    /// Bounding sphere over the center buffer.
    #[must_use]
    pub const fn bounding_sphere(&self) -> &BoundingSphere {
        &self.bounding_sphere
    }

    /// Override the bounding sphere, e.g. padded by the maximum radius.
    pub fn set_bounding_sphere(&mut self, sphere: BoundingSphere) {
        self.bounding_sphere = sphere;
    }
}

/// Accumulates sphere impostors into [`Spheres`].
#[derive(Debug, Default)]
pub struct SpheresBuilder {
    mappings: Vec<f32>,
    centers: Vec<f32>,
    groups: Vec<f32>,
    indices: Vec<u32>,
}

impl SpheresBuilder {
    /// Create an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder with capacity for an estimated sphere count.
    #[must_use]
    pub fn with_capacity(sphere_count: usize) -> Self {
        Self {
            mappings: Vec::with_capacity(sphere_count * 8),
            centers: Vec::with_capacity(sphere_count * 12),
            groups: Vec::with_capacity(sphere_count * 4),
            indices: Vec::with_capacity(sphere_count * 6),
        }
    }

    /// Add one sphere at `center`.
    pub fn add(&mut self, center: Vec3, group: u32) {
        let o = self.groups.len() as u32;
        for m in MAPPINGS {
            self.mappings.extend_from_slice(&m);
            self.centers.extend_from_slice(&[center.x, center.y, center.z]);
            self.groups.push(group as f32);
        }
        self.indices.extend_from_slice(&[o, o + 1, o + 2, o + 1, o + 3, o + 2]);
    }

    /// Finish into [`Spheres`], bounding the center buffer.
    #[must_use]
    pub fn finish(self) -> Spheres {
        let count = self.groups.len();
        let bounding_sphere = invariant_bounding_sphere(&self.centers, count, 4);
        Spheres {
            mappings: self.mappings,
            centers: self.centers,
            groups: self.groups,
            indices: self.indices,
            bounding_sphere,
        }
    }
}
