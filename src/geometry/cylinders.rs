//! Ray-cast cylinder impostors.
//!
//! Each cylinder is six vertices forming a camera-independent bounding
//! prism; the fragment shader ray-casts the analytic cylinder. All
//! per-cylinder attributes are duplicated onto the six vertices.

use glam::Vec3;

use crate::math::{invariant_bounding_sphere, BoundingSphere};

/// Color by the group at the cylinder midpoint.
pub const COLOR_MODE_DEFAULT: f32 = 2.0;
/// Interpolate color between the two bond ends.
pub const COLOR_MODE_INTERPOLATE: f32 = 3.0;

/// Prism corner per cylinder vertex.
const MAPPINGS: [[f32; 3]; 6] = [
    [-1.0, 1.0, -1.0],
    [-1.0, -1.0, -1.0],
    [1.0, 1.0, -1.0],
    [1.0, 1.0, 1.0],
    [1.0, -1.0, -1.0],
    [1.0, -1.0, 1.0],
];

/// Prism triangulation relative to the first of the six vertices.
const INDICES: [u32; 12] = [0, 1, 2, 1, 4, 2, 2, 4, 3, 4, 5, 3];

/// Per-cylinder attributes applied by [`CylindersBuilder::add`].
#[derive(Debug, Clone, Copy)]
pub struct CylinderSegment {
    /// Radius multiplier applied in the shader.
    pub radius_scale: f32,
    /// Cap the end toward the second position.
    pub top_cap: bool,
    /// Cap the end toward the first position.
    pub bottom_cap: bool,
    /// Color mode flag or interpolation fraction.
    pub color_mode: f32,
    /// Group id.
    pub group: u32,
}

/// Dash parameters for [`CylindersBuilder::add_fixed_count_dashes`].
#[derive(Debug, Clone, Copy)]
#[allow(clippy::struct_excessive_bools)]
pub struct SegmentDashes {
    /// Radius multiplier applied in the shader.
    pub radius_scale: f32,
    /// Cap the leading end of each dash.
    pub top_cap: bool,
    /// Cap the trailing end of each dash.
    pub bottom_cap: bool,
    /// Keep the cap on a final dash that is flush with the endpoint.
    pub stub_cap: bool,
    /// Color each dash by its fraction along the full segment.
    pub interpolate: bool,
    /// Group id.
    pub group: u32,
}

/// Packed cylinder impostor buffers, 6 vertices and 12 indices each.
#[derive(Debug, Clone, Default)]
pub struct Cylinders {
    /// 3D prism corner per vertex.
    pub mappings: Vec<f32>,
    /// Cylinder start position, duplicated per vertex.
    pub starts: Vec<f32>,
    /// Cylinder end position, duplicated per vertex.
    pub ends: Vec<f32>,
    /// Radius multiplier per vertex.
    pub scales: Vec<f32>,
    /// Cap flags per vertex: bit 0 top, bit 1 bottom.
    pub caps: Vec<f32>,
    /// Color mode flag or fraction per vertex.
    pub color_modes: Vec<f32>,
    /// Group id per vertex.
    pub groups: Vec<f32>,
    /// Prism triangle indices.
    pub indices: Vec<u32>,
    bounding_sphere: BoundingSphere,
}

impl Cylinders {
    /// Number of cylinders.
    #[must_use]
    pub fn cylinder_count(&self) -> usize {
        self.indices.len() / 12
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

/// Accumulates cylinder impostors into [`Cylinders`].
#[derive(Debug, Default)]
pub struct CylindersBuilder {
    mappings: Vec<f32>,
    starts: Vec<f32>,
    ends: Vec<f32>,
    scales: Vec<f32>,
    caps: Vec<f32>,
    color_modes: Vec<f32>,
    groups: Vec<f32>,
    indices: Vec<u32>,
}

impl CylindersBuilder {
    /// Create an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder with capacity for an estimated cylinder count.
    #[must_use]
    pub fn with_capacity(cylinder_count: usize) -> Self {
        Self {
            mappings: Vec::with_capacity(cylinder_count * 18),
            starts: Vec::with_capacity(cylinder_count * 18),
            ends: Vec::with_capacity(cylinder_count * 18),
            scales: Vec::with_capacity(cylinder_count * 6),
            caps: Vec::with_capacity(cylinder_count * 6),
            color_modes: Vec::with_capacity(cylinder_count * 6),
            groups: Vec::with_capacity(cylinder_count * 6),
            indices: Vec::with_capacity(cylinder_count * 12),
        }
    }

    /// Add one cylinder between `start` and `end`.
    pub fn add(&mut self, start: Vec3, end: Vec3, segment: &CylinderSegment) {
        let o = self.groups.len() as u32;
        let cap = f32::from(u8::from(segment.top_cap)
            | (u8::from(segment.bottom_cap) << 1));
        for m in MAPPINGS {
            self.mappings.extend_from_slice(&m);
            self.starts.extend_from_slice(&[start.x, start.y, start.z]);
            self.ends.extend_from_slice(&[end.x, end.y, end.z]);
            self.scales.push(segment.radius_scale);
            self.caps.push(cap);
            self.color_modes.push(segment.color_mode);
            self.groups.push(segment.group as f32);
        }
        self.indices.extend(INDICES.iter().map(|i| i + o));
    }

    /// Add `segment_count` evenly spaced dashes between `start` and `end`.
    ///
    /// An odd count places the final dash flush against the endpoint; its
    /// trailing cap is dropped unless `stub_cap` is set. With
    /// `interpolate`, each dash carries its fraction along the doubled
    /// segment so split bonds color consistently across the midpoint.
    pub fn add_fixed_count_dashes(
        &mut self,
        start: Vec3,
        end: Vec3,
        segment_count: f32,
        dashes: &SegmentDashes,
    ) {
        let d = start.distance(end);
        let is_odd = segment_count % 2.0 != 0.0;
        let s = ((segment_count + 1.0) / 2.0).floor() as u32;
        let step = d / (segment_count + 0.5);

        let step_dir = match (end - start).try_normalize() {
            Some(dir) => dir * step,
            None => return,
        };
        let mut bottom_cap = dashes.bottom_cap;
        let mut color_mode = COLOR_MODE_DEFAULT;
        let mut a = start;
        for j in 0..s {
            a += step_dir;
            let b = if is_odd && j == s - 1 {
                if !dashes.stub_cap {
                    bottom_cap = false;
                }
                end
            } else {
                a + step_dir
            };
            if dashes.interpolate {
                color_mode = start.distance(b) / (d * 2.0);
            }
            self.add(
                a,
                b,
                &CylinderSegment {
                    radius_scale: dashes.radius_scale,
                    top_cap: dashes.top_cap,
                    bottom_cap,
                    color_mode,
                    group: dashes.group,
                },
            );
            a += step_dir;
        }
    }

    /// Add `(distance / segment_length)` dashes between `start` and `end`.
    pub fn add_fixed_length_dashes(
        &mut self,
        start: Vec3,
        end: Vec3,
        segment_length: f32,
        dashes: &SegmentDashes,
    ) {
        let d = start.distance(end);
        self.add_fixed_count_dashes(start, end, d / segment_length, dashes);
    }

    /// Finish into [`Cylinders`], bounding both endpoint buffers.
    #[must_use]
    pub fn finish(self) -> Cylinders {
        let count = self.groups.len();
        let s = invariant_bounding_sphere(&self.starts, count, 6);
        let e = invariant_bounding_sphere(&self.ends, count, 6);
        let bounding_sphere = s.expanded_by_sphere(&e);
        Cylinders {
            mappings: self.mappings,
            starts: self.starts,
            ends: self.ends,
            scales: self.scales,
            caps: self.caps,
            color_modes: self.color_modes,
            groups: self.groups,
            indices: self.indices,
            bounding_sphere,
        }
    }
}
