//! Bounding-volume math: spheres, boxes, and the extremal-points
//! bounding-sphere helper.

/// Extremal-points-on-sphere bounding-sphere approximation.
pub mod boundary;
/// Invariant and instanced bounding-sphere computation over packed buffers.
pub mod bounds;
/// Axis-aligned bounding box.
pub mod box3;
/// Bounding sphere with optional extremal points.
pub mod sphere;

pub use boundary::{BoundaryHelper, BoundaryPrecision};
pub use bounds::{
    bounding_spheres, invariant_bounding_sphere, transform_bounding_sphere,
    BoundingSpheres,
};
pub use box3::Box3;
pub use sphere::BoundingSphere;
