//! Triangle mesh container and incremental builder.

use glam::{Mat3, Mat4, Vec3};

use crate::math::{invariant_bounding_sphere, BoundingSphere};

/// A triangle mesh with packed position, normal, group and index buffers.
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    /// Packed `[x, y, z]` vertex positions.
    pub vertices: Vec<f32>,
    /// Packed `[x, y, z]` vertex normals.
    pub normals: Vec<f32>,
    /// Per-vertex group id.
    pub groups: Vec<f32>,
    /// Triangle indices.
    pub indices: Vec<u32>,
    bounding_sphere: BoundingSphere,
}

impl Mesh {
    /// Number of vertices.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / 3
    }

    /// Number of triangles.
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Bounding sphere of the vertex buffer.
    #[must_use]
    pub const fn bounding_sphere(&self) -> &BoundingSphere {
        &self.bounding_sphere
    }

    /// Override the bounding sphere, e.g. with a reused previous sphere.
    pub fn set_bounding_sphere(&mut self, sphere: BoundingSphere) {
        self.bounding_sphere = sphere;
    }

    /// Vertex buffer as raw bytes for upload.
    #[must_use]
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Index buffer as raw bytes for upload.
    #[must_use]
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }
}

/// A reusable tessellated primitive in local space.
#[derive(Debug, Clone)]
pub struct Primitive {
    /// Packed `[x, y, z]` vertex positions.
    pub vertices: Vec<f32>,
    /// Packed `[x, y, z]` vertex normals.
    pub normals: Vec<f32>,
    /// Triangle indices.
    pub indices: Vec<u32>,
}

/// Accumulates triangles and transformed primitives into a [`Mesh`].
#[derive(Debug, Default)]
pub struct MeshBuilder {
    vertices: Vec<f32>,
    normals: Vec<f32>,
    groups: Vec<f32>,
    indices: Vec<u32>,
    current_group: f32,
    pub(crate) cylinder_cache:
        rustc_hash::FxHashMap<super::cylinder::CylinderKey, Primitive>,
}

impl MeshBuilder {
    /// Create an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder with buffer capacity for an estimated vertex and
    /// triangle count.
    #[must_use]
    pub fn with_capacity(vertex_count: usize, triangle_count: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertex_count * 3),
            normals: Vec::with_capacity(vertex_count * 3),
            groups: Vec::with_capacity(vertex_count),
            indices: Vec::with_capacity(triangle_count * 3),
            ..Self::default()
        }
    }

    /// Set the group id stamped onto subsequently added vertices.
    pub fn set_group(&mut self, group: u32) {
        self.current_group = group as f32;
    }

    /// Number of vertices added so far.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / 3
    }

    /// Add one triangle with a flat face normal.
    pub fn add_triangle(&mut self, a: Vec3, b: Vec3, c: Vec3) {
        let n = (b - a).cross(c - a).normalize_or_zero();
        let offset = self.vertex_count() as u32;
        for p in [a, b, c] {
            self.push_vertex(p, n);
        }
        self.indices.extend_from_slice(&[offset, offset + 1, offset + 2]);
    }

    /// Add a triangle fan around `center`: one triangle per consecutive
    /// border pair, closing the loop.
    pub fn add_triangle_fan(&mut self, center: Vec3, border: &[Vec3]) {
        for i in 0..border.len() {
            let j = (i + 1) % border.len();
            self.add_triangle(center, border[i], border[j]);
        }
    }

    /// Add a primitive transformed by `m`. Normals are transformed by the
    /// inverse transpose so non-uniform scaling keeps them valid.
    pub fn add_primitive(&mut self, primitive: &Primitive, m: &Mat4) {
        let nm = Mat3::from_mat4(*m).inverse().transpose();
        let offset = self.vertex_count() as u32;
        for i in (0..primitive.vertices.len()).step_by(3) {
            let p = m.transform_point3(Vec3::new(
                primitive.vertices[i],
                primitive.vertices[i + 1],
                primitive.vertices[i + 2],
            ));
            let n = (nm
                * Vec3::new(
                    primitive.normals[i],
                    primitive.normals[i + 1],
                    primitive.normals[i + 2],
                ))
            .normalize_or_zero();
            self.push_vertex(p, n);
        }
        self.indices.extend(primitive.indices.iter().map(|i| i + offset));
    }

    fn push_vertex(&mut self, p: Vec3, n: Vec3) {
        self.vertices.extend_from_slice(&[p.x, p.y, p.z]);
        self.normals.extend_from_slice(&[n.x, n.y, n.z]);
        self.groups.push(self.current_group);
    }

    /// Finish into a [`Mesh`], computing its bounding sphere.
    #[must_use]
    pub fn finish(self) -> Mesh {
        let count = self.vertices.len() / 3;
        let bounding_sphere =
            invariant_bounding_sphere(&self.vertices, count, 1);
        Mesh {
            vertices: self.vertices,
            normals: self.normals,
            groups: self.groups,
            indices: self.indices,
            bounding_sphere,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_triangle_face_normal() {
        let mut mb = MeshBuilder::new();
        mb.add_triangle(
            Vec3::ZERO,
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
        );
        let mesh = mb.finish();
        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.triangle_count(), 1);
        // counter-clockwise in xy looks along +z
        assert!((mesh.normals[2] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_groups_stamped() {
        let mut mb = MeshBuilder::new();
        mb.set_group(3);
        mb.add_triangle(
            Vec3::ZERO,
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
        );
        mb.set_group(7);
        mb.add_triangle(
            Vec3::ZERO,
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(0.0, 0.0, 1.0),
        );
        let mesh = mb.finish();
        assert_eq!(mesh.groups[..3], [3.0, 3.0, 3.0]);
        assert_eq!(mesh.groups[3..], [7.0, 7.0, 7.0]);
    }

    #[test]
    fn test_add_primitive_transforms_positions() {
        let primitive = Primitive {
            vertices: vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0],
            normals: vec![0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0],
            indices: vec![0, 1, 2],
        };
        let mut mb = MeshBuilder::new();
        mb.add_primitive(
            &primitive,
            &Mat4::from_translation(Vec3::new(0.0, 0.0, 5.0)),
        );
        let mesh = mb.finish();
        assert!((mesh.vertices[2] - 5.0).abs() < 1e-6);
        // rigid transform leaves the normal intact
        assert!((mesh.normals[2] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_indices_offset_across_primitives() {
        let primitive = Primitive {
            vertices: vec![0.0; 9],
            normals: vec![0.0; 9],
            indices: vec![0, 1, 2],
        };
        let mut mb = MeshBuilder::new();
        mb.add_primitive(&primitive, &Mat4::IDENTITY);
        mb.add_primitive(&primitive, &Mat4::IDENTITY);
        let mesh = mb.finish();
        assert_eq!(mesh.indices, vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_finish_bounding_sphere_covers_vertices() {
        let mut mb = MeshBuilder::new();
        mb.add_triangle(
            Vec3::new(-2.0, 0.0, 0.0),
            Vec3::new(2.0, 0.0, 0.0),
            Vec3::new(0.0, 3.0, 0.0),
        );
        let mesh = mb.finish();
        let s = mesh.bounding_sphere();
        for chunk in mesh.vertices.chunks(3) {
            let p = Vec3::new(chunk[0], chunk[1], chunk[2]);
            assert!(s.center.distance(p) <= s.radius + 1e-5);
        }
    }
}
