//! Gaussian density fields over atom positions.
//!
//! Each atom contributes `exp(-smoothness * (d / r)^2)` to every grid
//! voxel within twice its radius. Alongside the summed density, an id
//! field records which atom contributed the most to each voxel so
//! extracted surfaces can be colored and picked per atom.

use glam::{Mat4, Vec3};

use crate::error::MolGeoError;
use crate::math::Box3;

/// Parameters of the density evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GaussianDensityParams {
    /// Grid spacing in world units.
    pub resolution: f32,
    /// Added to every atom radius.
    pub radius_offset: f32,
    /// Gaussian falloff exponent; higher values give sharper surfaces.
    pub smoothness: f32,
}

impl Default for GaussianDensityParams {
    fn default() -> Self {
        Self {
            resolution: 1.0,
            radius_offset: 0.0,
            smoothness: 1.5,
        }
    }
}

/// A density field on a regular grid, x-major with z fastest.
#[derive(Debug, Clone)]
pub struct GaussianDensity {
    /// Summed density per voxel.
    pub field: Vec<f32>,
    /// Index of the dominant atom per voxel, `-1` where empty.
    pub id_field: Vec<i32>,
    /// Grid dimensions.
    pub dim: [usize; 3],
    /// Grid-to-world transform: scale by resolution, translate to the
    /// padded box origin.
    pub transform: Mat4,
    /// Largest offset-adjusted atom radius.
    pub max_radius: f32,
    /// Grid spacing in world units.
    pub resolution: f32,
}

impl GaussianDensity {
    const fn index(&self, xi: usize, yi: usize, zi: usize) -> usize {
        zi + yi * self.dim[2] + xi * self.dim[2] * self.dim[1]
    }

    /// Density at a voxel.
    #[must_use]
    pub fn value_at(&self, xi: usize, yi: usize, zi: usize) -> f32 {
        self.field[self.index(xi, yi, zi)]
    }

    /// Dominant atom id at a voxel, `-1` where no atom contributed.
    #[must_use]
    pub fn id_at(&self, xi: usize, yi: usize, zi: usize) -> i32 {
        self.id_field[self.index(xi, yi, zi)]
    }

    /// Voxel containing a world-space point.
    #[must_use]
    pub fn voxel_of(&self, p: Vec3) -> [usize; 3] {
        let min = self.transform.w_axis.truncate();
        let v = ((p - min) / self.resolution).floor();
        [
            (v.x.max(0.0) as usize).min(self.dim[0] - 1),
            (v.y.max(0.0) as usize).min(self.dim[1] - 1),
            (v.z.max(0.0) as usize).min(self.dim[2] - 1),
        ]
    }
}

/// Evaluate the Gaussian density of `positions` with per-atom `radii`.
///
/// The grid covers the bounding box of the positions padded by twice the
/// maximum radius plus one voxel, so no atom's support is clipped.
pub fn gaussian_density(
    positions: &[Vec3],
    radii: &[f32],
    params: &GaussianDensityParams,
) -> Result<GaussianDensity, MolGeoError> {
    if params.resolution <= 0.0 {
        return Err(MolGeoError::Density(format!(
            "resolution must be positive, got {}",
            params.resolution
        )));
    }
    if positions.is_empty() {
        return Err(MolGeoError::Density(
            "no positions to evaluate".to_string(),
        ));
    }
    if radii.len() != positions.len() {
        return Err(MolGeoError::Density(format!(
            "radius count {} does not match position count {}",
            radii.len(),
            positions.len()
        )));
    }

    let resolution = params.resolution;
    let scale_factor = 1.0 / resolution;
    let alpha = params.smoothness;

    let mut adjusted = Vec::with_capacity(radii.len());
    let mut max_radius = 0.0f32;
    for r in radii {
        let r = r + params.radius_offset;
        max_radius = max_radius.max(r);
        adjusted.push(r);
    }

    let pad = max_radius * 2.0 + resolution;
    let expanded = Box3::from_points(positions).expanded(Vec3::splat(pad));
    let min = expanded.min;
    let dim_v = (expanded.scaled(scale_factor).size()).ceil();
    let dim = [dim_v.x as usize, dim_v.y as usize, dim_v.z as usize];
    let (dim_x, dim_y, dim_z) = (dim[0], dim[1], dim[2]);
    log::debug!(
        "gaussian density grid {dim_x}x{dim_y}x{dim_z} at resolution {resolution}"
    );

    let voxel_count = dim_x * dim_y * dim_z;
    let mut field = vec![0.0f32; voxel_count];
    let mut id_field = vec![-1i32; voxel_count];
    let mut max_density = vec![0.0f32; voxel_count];

    let grid_x = grid_dim(dim_x, min.x, resolution);
    let grid_y = grid_dim(dim_y, min.y, resolution);
    let grid_z = grid_dim(dim_z, min.z, resolution);
    let (iu, iuv) = (dim_z, dim_z * dim_y);

    for (i, (p, rad)) in positions.iter().zip(&adjusted).enumerate() {
        let r_sq_inv = 1.0 / (rad * rad);
        let r2 = rad * 2.0;
        let r2_sq = r2 * r2;
        let ng = (r2 * scale_factor).ceil() as i64;

        // the atom's voxel, floored, so the +2 end bound keeps coverage
        let ia = ((*p - min) * scale_factor).floor();
        let (iax, iay, iaz) = (ia.x as i64, ia.y as i64, ia.z as i64);
        let beg_x = (iax - ng).max(0) as usize;
        let beg_y = (iay - ng).max(0) as usize;
        let beg_z = (iaz - ng).max(0) as usize;
        let end_x = ((iax + ng + 2).max(0) as usize).min(dim_x);
        let end_y = ((iay + ng + 2).max(0) as usize).min(dim_y);
        let end_z = ((iaz + ng + 2).max(0) as usize).min(dim_z);

        for xi in beg_x..end_x {
            let dx = grid_x[xi] - p.x;
            let x_idx = xi * iuv;
            for yi in beg_y..end_y {
                let dy = grid_y[yi] - p.y;
                let dxy_sq = dx * dx + dy * dy;
                let xy_idx = yi * iu + x_idx;
                for zi in beg_z..end_z {
                    let dz = grid_z[zi] - p.z;
                    let d_sq = dxy_sq + dz * dz;
                    if d_sq <= r2_sq {
                        let dens = faster_exp(-alpha * (d_sq * r_sq_inv));
                        let idx = zi + xy_idx;
                        field[idx] += dens;
                        if dens > max_density[idx] {
                            max_density[idx] = dens;
                            id_field[idx] = i as i32;
                        }
                    }
                }
            }
        }
    }

    let mut transform = Mat4::from_scale(Vec3::splat(resolution));
    transform.w_axis = min.extend(1.0);
    Ok(GaussianDensity {
        field,
        id_field,
        dim,
        transform,
        max_radius,
        resolution,
    })
}

fn grid_dim(length: usize, start: f32, step: f32) -> Vec<f32> {
    (0..length).map(|i| start + i as f32 * step).collect()
}

/// Fast `2^v` via a linear mantissa approximation, within a few percent.
fn faster_pow2(v: f32) -> f32 {
    let clipped = v.max(-126.0);
    // 2^23 shifts the approximated exponent+mantissa into float bit layout
    f32::from_bits((8_388_608.0 * (clipped + 126.942_695)) as u32)
}

/// Fast `e^v`; the inaccuracy is negligible against the Gaussian falloff.
fn faster_exp(v: f32) -> f32 {
    faster_pow2(std::f32::consts::LOG2_E * v)
}
