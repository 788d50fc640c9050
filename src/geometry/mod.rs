//! Primitive geometry containers and builders.
//!
//! Each container holds packed, GPU-ready buffers for one primitive kind:
//! triangle meshes, ray-cast cylinder impostors, billboard sphere
//! impostors, and screen-space line impostors. Builders accumulate into
//! plain `Vec`s and finish into a container carrying a bounding sphere.

/// Cylinder mesh primitives (solid, double, dashed).
pub mod cylinder;
/// Ray-cast cylinder impostors.
pub mod cylinders;
/// Screen-space line impostors.
pub mod lines;
/// Triangle mesh container and builder.
pub mod mesh;
/// Billboard sphere impostors.
pub mod spheres;

pub use cylinder::{
    add_cylinder, add_double_cylinder, add_fixed_count_dashed_cylinder,
    CylinderProps,
};
pub use cylinders::{
    Cylinders, CylindersBuilder, CylinderSegment, SegmentDashes,
    COLOR_MODE_DEFAULT, COLOR_MODE_INTERPOLATE,
};
pub use lines::{Lines, LinesBuilder};
pub use mesh::{Mesh, MeshBuilder, Primitive};
pub use spheres::{Spheres, SpheresBuilder};
