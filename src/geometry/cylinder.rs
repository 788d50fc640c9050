//! Tessellated cylinder primitives for mesh building.
//!
//! Primitives are unit-height, Y-aligned and cached per tessellation
//! parameter set, so repeated bonds with identical radii reuse one
//! tessellation and only pay for the transform.

use glam::{Mat4, Quat, Vec3};

use super::mesh::{MeshBuilder, Primitive};

/// Tessellation parameters of a cylinder primitive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CylinderProps {
    /// Radius at the top (`+Y`) end.
    pub radius_top: f32,
    /// Radius at the bottom (`-Y`) end.
    pub radius_bottom: f32,
    /// Number of segments around the axis.
    pub radial_segments: u32,
    /// Close the top end with a cap.
    pub top_cap: bool,
    /// Close the bottom end with a cap.
    pub bottom_cap: bool,
}

impl Default for CylinderProps {
    fn default() -> Self {
        Self {
            radius_top: 1.0,
            radius_bottom: 1.0,
            radial_segments: 8,
            top_cap: false,
            bottom_cap: false,
        }
    }
}

/// Cache key quantizing [`CylinderProps`] by float bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct CylinderKey {
    radius_top: u32,
    radius_bottom: u32,
    radial_segments: u32,
    caps: u8,
}

impl From<&CylinderProps> for CylinderKey {
    fn from(props: &CylinderProps) -> Self {
        Self {
            radius_top: props.radius_top.to_bits(),
            radius_bottom: props.radius_bottom.to_bits(),
            radial_segments: props.radial_segments,
            caps: u8::from(props.top_cap) | (u8::from(props.bottom_cap) << 1),
        }
    }
}

/// Tessellate a unit-height cylinder centered at the origin along Y.
fn cylinder_primitive(props: &CylinderProps) -> Primitive {
    let seg = props.radial_segments.max(3) as usize;
    let (rt, rb) = (props.radius_top, props.radius_bottom);
    let mut vertices = Vec::new();
    let mut normals = Vec::new();
    let mut indices = Vec::new();

    // torso rings with a duplicated seam vertex
    let slope = rb - rt;
    for i in 0..=seg {
        let theta = i as f32 / seg as f32 * std::f32::consts::TAU;
        let (sin, cos) = theta.sin_cos();
        let n = Vec3::new(sin, slope, cos).normalize();
        vertices.extend_from_slice(&[rt * sin, 0.5, rt * cos]);
        normals.extend_from_slice(&[n.x, n.y, n.z]);
        vertices.extend_from_slice(&[rb * sin, -0.5, rb * cos]);
        normals.extend_from_slice(&[n.x, n.y, n.z]);
    }
    for i in 0..seg as u32 {
        let (t0, b0) = (i * 2, i * 2 + 1);
        let (t1, b1) = (t0 + 2, b0 + 2);
        indices.extend_from_slice(&[t0, b0, t1, b0, b1, t1]);
    }

    // caps as fans around a center vertex
    for (cap, y, radius, ny) in [
        (props.top_cap, 0.5f32, rt, 1.0f32),
        (props.bottom_cap, -0.5, rb, -1.0),
    ] {
        if !cap || radius <= 0.0 {
            continue;
        }
        let center = vertices.len() as u32 / 3;
        vertices.extend_from_slice(&[0.0, y, 0.0]);
        normals.extend_from_slice(&[0.0, ny, 0.0]);
        for i in 0..=seg {
            let theta = i as f32 / seg as f32 * std::f32::consts::TAU;
            let (sin, cos) = theta.sin_cos();
            vertices.extend_from_slice(&[radius * sin, y, radius * cos]);
            normals.extend_from_slice(&[0.0, ny, 0.0]);
        }
        for i in 0..seg as u32 {
            let (a, b) = (center + 1 + i, center + 2 + i);
            if ny > 0.0 {
                indices.extend_from_slice(&[center, b, a]);
            } else {
                indices.extend_from_slice(&[center, a, b]);
            }
        }
    }

    Primitive {
        vertices,
        normals,
        indices,
    }
}

fn cylinder_mat(center: Vec3, dir: Vec3, length: f32) -> Mat4 {
    let axis = dir.try_normalize().unwrap_or(Vec3::Y);
    let rotation = Quat::from_rotation_arc(Vec3::Y, axis);
    Mat4::from_scale_rotation_translation(
        Vec3::new(1.0, length, 1.0),
        rotation,
        center,
    )
}

fn add_cached(
    mb: &mut MeshBuilder,
    props: &CylinderProps,
    center: Vec3,
    dir: Vec3,
    length: f32,
) {
    let key = CylinderKey::from(props);
    let primitive = mb
        .cylinder_cache
        .remove(&key)
        .unwrap_or_else(|| cylinder_primitive(props));
    mb.add_primitive(&primitive, &cylinder_mat(center, dir, length));
    let _ = mb.cylinder_cache.insert(key, primitive);
}

/// Add a cylinder from `start` toward `end`, covering `length_scale` of
/// the distance.
pub fn add_cylinder(
    mb: &mut MeshBuilder,
    start: Vec3,
    end: Vec3,
    length_scale: f32,
    props: &CylinderProps,
) {
    let dir = end - start;
    let d = start.distance(end) * length_scale;
    let center = start + dir * (length_scale * 0.5);
    add_cached(mb, props, center, dir, d);
}

/// Add two parallel cylinders shifted by `±shift`.
pub fn add_double_cylinder(
    mb: &mut MeshBuilder,
    start: Vec3,
    end: Vec3,
    length_scale: f32,
    shift: Vec3,
    props: &CylinderProps,
) {
    let dir = end - start;
    let d = start.distance(end) * length_scale;
    let center = start + dir * (length_scale * 0.5);
    add_cached(mb, props, center + shift, dir, d);
    add_cached(mb, props, center - shift, dir, d);
}

/// Add `segment_count` evenly spaced dashes from `start` toward `end`.
///
/// An odd count places the final dash flush against the endpoint; its
/// outward cap is dropped unless `stub_cap` is set. Fractional counts are
/// allowed so fixed-length dashing can reuse the same stepping.
pub fn add_fixed_count_dashed_cylinder(
    mb: &mut MeshBuilder,
    start: Vec3,
    end: Vec3,
    length_scale: f32,
    segment_count: f32,
    stub_cap: bool,
    props: &CylinderProps,
) {
    let d = start.distance(end) * length_scale;
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
        let (b, props) = if is_odd && j == s - 1 {
            let mut p = *props;
            if !stub_cap {
                p.top_cap = false;
            }
            (start + (end - start) * length_scale, p)
        } else {
            (a + step_dir, *props)
        };
        add_cached(mb, &props, (a + b) * 0.5, b - a, a.distance(b));
        a += step_dir;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::mesh::MeshBuilder;

    fn vertex(mesh: &crate::geometry::Mesh, i: usize) -> Vec3 {
        Vec3::new(
            mesh.vertices[i * 3],
            mesh.vertices[i * 3 + 1],
            mesh.vertices[i * 3 + 2],
        )
    }

    #[test]
    fn test_primitive_torso_counts() {
        let p = cylinder_primitive(&CylinderProps::default());
        // (seg + 1) ring pairs, 2 triangles per segment
        assert_eq!(p.vertices.len() / 3, 9 * 2);
        assert_eq!(p.indices.len() / 3, 8 * 2);
    }

    #[test]
    fn test_caps_add_fans() {
        let props = CylinderProps {
            top_cap: true,
            bottom_cap: true,
            ..CylinderProps::default()
        };
        let p = cylinder_primitive(&props);
        // torso + 2 * (center + seg + 1 ring verts)
        assert_eq!(p.vertices.len() / 3, 18 + 2 * 10);
        assert_eq!(p.indices.len() / 3, 16 + 2 * 8);
    }

    #[test]
    fn test_add_cylinder_spans_endpoints() {
        let mut mb = MeshBuilder::new();
        let start = Vec3::new(0.0, 0.0, 0.0);
        let end = Vec3::new(0.0, 0.0, 4.0);
        add_cylinder(&mut mb, start, end, 1.0, &CylinderProps::default());
        let mesh = mb.finish();
        let (mut min_z, mut max_z) = (f32::INFINITY, f32::NEG_INFINITY);
        for i in 0..mesh.vertex_count() {
            let p = vertex(&mesh, i);
            min_z = min_z.min(p.z);
            max_z = max_z.max(p.z);
        }
        assert!((min_z - 0.0).abs() < 1e-5);
        assert!((max_z - 4.0).abs() < 1e-5);
    }

    #[test]
    fn test_add_cylinder_half_length() {
        let mut mb = MeshBuilder::new();
        add_cylinder(
            &mut mb,
            Vec3::ZERO,
            Vec3::new(0.0, 0.0, 4.0),
            0.5,
            &CylinderProps::default(),
        );
        let mesh = mb.finish();
        let max_z = (0..mesh.vertex_count())
            .map(|i| vertex(&mesh, i).z)
            .fold(f32::NEG_INFINITY, f32::max);
        assert!((max_z - 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_double_cylinder_shifted() {
        let mut mb = MeshBuilder::new();
        let shift = Vec3::new(0.5, 0.0, 0.0);
        add_double_cylinder(
            &mut mb,
            Vec3::ZERO,
            Vec3::new(0.0, 4.0, 0.0),
            1.0,
            shift,
            &CylinderProps {
                radius_top: 0.1,
                radius_bottom: 0.1,
                ..CylinderProps::default()
            },
        );
        let mesh = mb.finish();
        let half = mesh.vertex_count() / 2;
        let x_first = vertex(&mesh, 0).x;
        let x_second = vertex(&mesh, half).x;
        assert!(x_first > 0.0 && x_second < 0.0);
    }

    #[test]
    fn test_dashed_cylinder_covers_half_dashes() {
        let mut mb = MeshBuilder::new();
        add_fixed_count_dashed_cylinder(
            &mut mb,
            Vec3::ZERO,
            Vec3::new(0.0, 0.0, 9.0),
            1.0,
            4.0,
            false,
            &CylinderProps::default(),
        );
        let mesh = mb.finish();
        // 2 dashes, each a full torso
        let per_torso = 9 * 2;
        assert_eq!(mesh.vertex_count(), 2 * per_torso);
    }

    #[test]
    fn test_dashed_cylinder_odd_reaches_end() {
        let mut mb = MeshBuilder::new();
        let end = Vec3::new(0.0, 0.0, 7.0);
        add_fixed_count_dashed_cylinder(
            &mut mb,
            Vec3::ZERO,
            end,
            1.0,
            3.0,
            true,
            &CylinderProps::default(),
        );
        let mesh = mb.finish();
        let max_z = (0..mesh.vertex_count())
            .map(|i| vertex(&mesh, i).z)
            .fold(f32::NEG_INFINITY, f32::max);
        assert!((max_z - 7.0).abs() < 1e-5);
    }
}
