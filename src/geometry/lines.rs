//! Screen-space line impostors.
//!
//! Each line expands to a camera-facing quad in the vertex shader: four
//! vertices carry identical start/end positions plus a 2D mapping corner
//! that selects the quad corner.

use glam::Vec3;

use crate::math::{invariant_bounding_sphere, BoundingSphere};

/// Quad corners per line vertex.
const MAPPINGS: [[f32; 2]; 4] = [[-1.0, 1.0], [-1.0, -1.0], [1.0, 1.0], [1.0, -1.0]];

/// Packed line impostor buffers, 4 vertices and 6 indices per line.
#[derive(Debug, Clone, Default)]
pub struct Lines {
    /// 2D quad corner per vertex.
    pub mappings: Vec<f32>,
    /// Line start position, duplicated per vertex.
    pub starts: Vec<f32>,
    /// Line end position, duplicated per vertex.
    pub ends: Vec<f32>,
    /// Group id per vertex.
    pub groups: Vec<f32>,
    /// Quad triangle indices.
    pub indices: Vec<u32>,
    bounding_sphere: BoundingSphere,
}

impl Lines {
    /// Number of lines.
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.indices.len() / 6
    }

    /// Bounding sphere over the start and end buffers.
    #[must_use]
    pub const fn bounding_sphere(&self) -> &BoundingSphere {
        &self.bounding_sphere
    }

    /// Override the bounding sphere, e.g. with a reused previous sphere.
    pub fn set_bounding_sphere(&mut self, sphere: BoundingSphere) {
        self.bounding_sphere = sphere;
    }
}

/// Accumulates line segments into [`Lines`].
#[derive(Debug, Default)]
pub struct LinesBuilder {
    mappings: Vec<f32>,
    starts: Vec<f32>,
    ends: Vec<f32>,
    groups: Vec<f32>,
    indices: Vec<u32>,
}

impl LinesBuilder {
    /// Create an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder with capacity for an estimated line count.
    #[must_use]
    pub fn with_capacity(line_count: usize) -> Self {
        Self {
            mappings: Vec::with_capacity(line_count * 8),
            starts: Vec::with_capacity(line_count * 12),
            ends: Vec::with_capacity(line_count * 12),
            groups: Vec::with_capacity(line_count * 4),
            indices: Vec::with_capacity(line_count * 6),
        }
    }

    /// Add one line segment.
    pub fn add(&mut self, start: Vec3, end: Vec3, group: u32) {
        let o = self.groups.len() as u32;
        for m in MAPPINGS {
            self.mappings.extend_from_slice(&m);
            self.starts.extend_from_slice(&[start.x, start.y, start.z]);
            self.ends.extend_from_slice(&[end.x, end.y, end.z]);
            self.groups.push(group as f32);
        }
        self.indices.extend_from_slice(&[o, o + 1, o + 2, o + 1, o + 3, o + 2]);
    }

    /// Add `segment_count` evenly spaced dashes between `start` and `end`.
    ///
    /// An odd count places the final dash flush against the endpoint.
    pub fn add_fixed_count_dashes(
        &mut self,
        start: Vec3,
        end: Vec3,
        segment_count: f32,
        group: u32,
    ) {
        let d = start.distance(end);
        let is_odd = segment_count % 2.0 != 0.0;
        let s = ((segment_count + 1.0) / 2.0).floor() as u32;
        let step = d / (segment_count + 0.5);

        let step_dir = match (end - start).try_normalize() {
            Some(dir) => dir * step,
            None => return,
        };
        let mut a = start;
        for j in 0..s {
            a += step_dir;
            let b = if is_odd && j == s - 1 { end } else { a + step_dir };
            self.add(a, b, group);
            a += step_dir;
        }
    }

    /// Add `(distance / segment_length)` dashes between `start` and `end`.
    pub fn add_fixed_length_dashes(
        &mut self,
        start: Vec3,
        end: Vec3,
        segment_length: f32,
        group: u32,
    ) {
        let d = start.distance(end);
        self.add_fixed_count_dashes(start, end, d / segment_length, group);
    }

    /// Finish into [`Lines`], bounding both endpoint buffers.
    #[must_use]
    pub fn finish(self) -> Lines {
        let count = self.groups.len();
        let s = invariant_bounding_sphere(&self.starts, count, 4);
        let e = invariant_bounding_sphere(&self.ends, count, 4);
        let bounding_sphere = s.expanded_by_sphere(&e);
        Lines {
            mappings: self.mappings,
            starts: self.starts,
            ends: self.ends,
            groups: self.groups,
            indices: self.indices,
            bounding_sphere,
        }
    }
}
