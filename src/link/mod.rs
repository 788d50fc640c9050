//! Link (bond) geometry builders.
//!
//! A link source yields directed half-edges: each bond appears twice so
//! the half closer to its first atom can be colored and picked
//! independently. Builders draw from each start position to the bond
//! midpoint, as a tessellated mesh, cylinder impostors or line impostors.
//!
//! All three builders keep a running centroid over the visited endpoints
//! and reuse the previous geometry's bounding sphere when the centroid
//! moved less than a tenth of the old radius, so small conformational
//! changes do not invalidate culling state.

use glam::Vec3;

use crate::geometry::{
    add_cylinder, add_double_cylinder, add_fixed_count_dashed_cylinder,
    CylinderProps, CylinderSegment, Cylinders, CylindersBuilder, Lines,
    LinesBuilder, Mesh, MeshBuilder, SegmentDashes, COLOR_MODE_DEFAULT,
    COLOR_MODE_INTERPOLATE,
};
use crate::math::BoundingSphere;

/// Centroid shift, relative to the old radius, below which the previous
/// bounding sphere is reused.
const REUSE_RATIO: f32 = 0.1;

/// How a link is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LinkStyle {
    /// Single solid cylinder.
    #[default]
    Solid,
    /// Dashes along the link axis.
    Dashed,
    /// Two parallel cylinders, symmetric about the axis.
    Double,
    /// A full cylinder plus one offset cylinder.
    OffsetDouble,
    /// Three parallel cylinders, symmetric about the axis.
    Triple,
    /// A full cylinder plus two offset cylinders.
    OffsetTriple,
    /// A thin disk at the link midpoint.
    Disk,
    /// A solid cylinder plus one dashed aromatic indicator.
    Aromatic,
    /// A solid cylinder plus aromatic indicators on both sides.
    MirroredAromatic,
}

/// How impostor cylinders resolve their color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LinkColorMode {
    /// Flat color from the half-bond group.
    #[default]
    Default,
    /// Interpolate between the colors of the two bond ends.
    Interpolate,
}

/// Parameters for mesh and impostor link cylinders.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinkCylinderParams {
    /// Radius scale of multiple-bond cylinders relative to the link.
    pub link_scale: f32,
    /// Spacing between multiple-bond cylinders.
    pub link_spacing: f32,
    /// Cap the outer ends of each half-link.
    pub link_cap: bool,
    /// Radius scale of aromatic indicator cylinders.
    pub aromatic_scale: f32,
    /// Spacing of the aromatic indicator from the main cylinder.
    pub aromatic_spacing: f32,
    /// Dash count of the aromatic indicator per half-link.
    pub aromatic_dash_count: u32,
    /// Dash count of dashed links per half-link.
    pub dash_count: u32,
    /// Radius scale of dashes relative to the link.
    pub dash_scale: f32,
    /// Cap both ends of every dash.
    pub dash_cap: bool,
    /// Cap half-links that end in a stub (no partner half).
    pub stub_cap: bool,
    /// Radial tessellation of mesh cylinders.
    pub radial_segments: u32,
    /// Impostor color resolution.
    pub color_mode: LinkColorMode,
}

impl Default for LinkCylinderParams {
    fn default() -> Self {
        Self {
            link_scale: 0.45,
            link_spacing: 1.0,
            link_cap: false,
            aromatic_scale: 0.3,
            aromatic_spacing: 1.5,
            aromatic_dash_count: 2,
            dash_count: 4,
            dash_scale: 0.8,
            dash_cap: true,
            stub_cap: true,
            radial_segments: 16,
            color_mode: LinkColorMode::Default,
        }
    }
}

/// Parameters for line links.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinkLineParams {
    /// Offset scale of multiple-bond lines.
    pub link_scale: f32,
    /// Spacing between multiple-bond lines.
    pub link_spacing: f32,
    /// Dash count of the aromatic indicator per half-link.
    pub aromatic_dash_count: u32,
    /// Dash count of dashed links per half-link.
    pub dash_count: u32,
}

impl Default for LinkLineParams {
    fn default() -> Self {
        Self {
            link_scale: 0.5,
            link_spacing: 0.1,
            aromatic_dash_count: 2,
            dash_count: 4,
        }
    }
}

/// Supplies directed half-edges to the link builders.
///
/// Each undirected bond must be yielded twice, once per direction, so
/// half-bond coloring and picking work.
pub trait LinkSource {
    /// Number of directed half-edges.
    fn link_count(&self) -> usize;

    /// Start and end position of a half-edge.
    fn position(&self, edge: usize) -> (Vec3, Vec3);

    /// Radius of the link cylinder.
    fn radius(&self, edge: usize) -> f32;

    /// Drawing style.
    fn style(&self, _edge: usize) -> LinkStyle {
        LinkStyle::Solid
    }

    /// Skip this half-edge entirely.
    fn ignore(&self, _edge: usize) -> bool {
        false
    }

    /// Whether this half-edge has no partner half and ends in a stub.
    fn stub(&self, _edge: usize) -> bool {
        false
    }

    /// A neighboring position fixing the shift plane for multiple bonds.
    fn reference_position(&self, _edge: usize) -> Option<Vec3> {
        None
    }
}

/// Direction perpendicular to `v1 - v2`, within the plane through `v3`.
///
/// Falls back to the x then y axis when the reference is colinear with
/// the link.
#[must_use]
pub fn shift_direction(v1: Vec3, v2: Vec3, v3: Option<Vec3>) -> Vec3 {
    let v12 = (v1 - v2).normalize_or_zero();
    let mut v13 = v3.map_or(v1, |v| v1 - v).normalize_or_zero();
    let mut dp = v12.dot(v13);
    if 1.0 - dp.abs() < 1e-5 {
        v13 = Vec3::X;
        dp = v12.dot(v13);
        if 1.0 - dp.abs() < 1e-5 {
            v13 = Vec3::Y;
            dp = v12.dot(v13);
        }
    }
    (v13 - v12 * dp).normalize_or_zero()
}

fn set_magnitude(v: Vec3, magnitude: f32) -> Vec3 {
    v.normalize_or_zero() * magnitude
}

const fn multiple_bond_order(style: LinkStyle) -> f32 {
    match style {
        LinkStyle::Double | LinkStyle::OffsetDouble => 2.0,
        LinkStyle::Triple | LinkStyle::OffsetTriple => 3.0,
        _ => 1.5,
    }
}

fn reused_sphere(
    previous: Option<&BoundingSphere>,
    center_sum: Vec3,
    count: usize,
) -> Option<BoundingSphere> {
    let prev = previous?;
    if count == 0 || prev.radius <= 0.0 {
        return None;
    }
    let centroid = center_sum / count as f32;
    (centroid.distance(prev.center) / prev.radius < REUSE_RATIO)
        .then(|| prev.clone())
}

/// Build a tessellated cylinder mesh for all half-edges of `source`.
///
/// `previous` enables bounding-sphere reuse across incremental updates.
#[must_use]
pub fn build_link_cylinder_mesh<S: LinkSource>(
    source: &S,
    params: &LinkCylinderParams,
    previous: Option<&Mesh>,
) -> Mesh {
    let link_count = source.link_count();
    if link_count == 0 {
        return Mesh::default();
    }
    let vertex_estimate = params.radial_segments as usize * 4 * link_count;
    let mut mb = MeshBuilder::with_capacity(vertex_estimate, vertex_estimate / 4);
    let mut center_sum = Vec3::ZERO;
    let mut count = 0usize;

    for edge in 0..link_count {
        if source.ignore(edge) {
            continue;
        }
        let (mut va, mut vb) = source.position(edge);
        center_sum += va + vb;
        count += 2;

        let v12 = vb - va;
        let dir_flag = v12.dot(Vec3::Y) > 0.0;
        let link_radius = source.radius(edge);
        let style = source.style(edge);
        let link_stub = params.stub_cap && source.stub(edge);
        let (top_cap, bottom_cap) = if dir_flag {
            (link_stub, params.link_cap)
        } else {
            (params.link_cap, link_stub)
        };
        mb.set_group(edge as u32);

        let mut props = CylinderProps {
            radius_top: link_radius,
            radius_bottom: link_radius,
            radial_segments: params.radial_segments,
            top_cap,
            bottom_cap,
        };
        match style {
            LinkStyle::Solid => {
                add_cylinder(&mut mb, va, vb, 0.5, &props);
            }
            LinkStyle::Dashed => {
                props.radius_top = link_radius * params.dash_scale;
                props.radius_bottom = props.radius_top;
                props.top_cap = params.dash_cap;
                props.bottom_cap = params.dash_cap;
                add_fixed_count_dashed_cylinder(
                    &mut mb,
                    va,
                    vb,
                    0.5,
                    params.dash_count as f32,
                    link_stub,
                    &props,
                );
            }
            LinkStyle::Aromatic | LinkStyle::MirroredAromatic => {
                let shift_dir =
                    shift_direction(va, vb, source.reference_position(edge));
                add_cylinder(&mut mb, va, vb, 0.5, &props);
                let aromatic_offset = link_radius
                    + params.aromatic_scale * link_radius
                    + params.aromatic_scale * link_radius * params.aromatic_spacing;
                let inset = set_magnitude(vb - va, link_radius * 0.5);
                va += inset;
                vb -= inset;
                props.radius_top = link_radius * params.aromatic_scale;
                props.radius_bottom = props.radius_top;
                props.top_cap = params.dash_cap;
                props.bottom_cap = params.dash_cap;
                let shift = set_magnitude(shift_dir, aromatic_offset);
                va -= shift;
                vb -= shift;
                add_fixed_count_dashed_cylinder(
                    &mut mb,
                    va,
                    vb,
                    0.5,
                    params.aromatic_dash_count as f32,
                    link_stub,
                    &props,
                );
                if style == LinkStyle::MirroredAromatic {
                    add_fixed_count_dashed_cylinder(
                        &mut mb,
                        va + shift * 2.0,
                        vb + shift * 2.0,
                        0.5,
                        params.aromatic_dash_count as f32,
                        link_stub,
                        &props,
                    );
                }
            }
            LinkStyle::OffsetDouble | LinkStyle::OffsetTriple => {
                let order = multiple_bond_order(style);
                let multi_radius =
                    link_radius * (params.link_scale / (0.5 * order));
                let multiple_offset = link_radius
                    + multi_radius
                    + params.link_scale * link_radius * params.link_spacing;
                let shift_dir =
                    shift_direction(va, vb, source.reference_position(edge));
                add_cylinder(&mut mb, va, vb, 0.5, &props);
                let inset = v12 * (params.link_spacing * params.link_scale * 0.2);
                va += inset;
                vb -= inset;
                props.radius_top = multi_radius;
                props.radius_bottom = multi_radius;
                props.top_cap = if dir_flag { link_stub } else { params.dash_cap };
                props.bottom_cap =
                    if dir_flag { params.dash_cap } else { link_stub };
                let shift = set_magnitude(shift_dir, multiple_offset);
                va -= shift;
                vb -= shift;
                add_cylinder(&mut mb, va, vb, 0.5, &props);
                if style == LinkStyle::OffsetTriple {
                    add_cylinder(
                        &mut mb,
                        va + shift * 2.0,
                        vb + shift * 2.0,
                        0.5,
                        &props,
                    );
                }
            }
            LinkStyle::Double | LinkStyle::Triple => {
                let order = multiple_bond_order(style);
                let multi_radius =
                    link_radius * (params.link_scale / (0.5 * order));
                let abs_offset = (link_radius - multi_radius) * params.link_spacing;
                let shift = set_magnitude(
                    shift_direction(va, vb, source.reference_position(edge)),
                    abs_offset,
                );
                props.radius_top = multi_radius;
                props.radius_bottom = multi_radius;
                if style == LinkStyle::Triple {
                    add_cylinder(&mut mb, va, vb, 0.5, &props);
                }
                add_double_cylinder(&mut mb, va, vb, 0.5, shift, &props);
            }
            LinkStyle::Disk => {
                let inset = v12 * 0.475;
                va += inset;
                vb -= inset;
                add_cylinder(&mut mb, va, vb, 0.5, &props);
            }
        }
    }

    let mut mesh = mb.finish();
    if let Some(sphere) =
        reused_sphere(previous.map(Mesh::bounding_sphere), center_sum, count)
    {
        mesh.set_bounding_sphere(sphere);
    }
    mesh
}

/// Build ray-cast cylinder impostors for all half-edges of `source`.
///
/// Each half-edge becomes impostors from its start to the bond midpoint.
/// `previous` enables bounding-sphere reuse across incremental updates.
#[must_use]
pub fn build_link_cylinder_impostors<S: LinkSource>(
    source: &S,
    params: &LinkCylinderParams,
    previous: Option<&Cylinders>,
) -> Cylinders {
    let link_count = source.link_count();
    if link_count == 0 {
        return Cylinders::default();
    }
    let interpolate = params.color_mode == LinkColorMode::Interpolate;
    let color_mode_flag = if interpolate {
        COLOR_MODE_INTERPOLATE
    } else {
        COLOR_MODE_DEFAULT
    };
    let mut cb = CylindersBuilder::with_capacity(link_count * 2);
    let mut center_sum = Vec3::ZERO;
    let mut count = 0usize;

    for edge in 0..link_count {
        if source.ignore(edge) {
            continue;
        }
        let (mut va, vb) = source.position(edge);
        center_sum += va + vb;
        count += 2;

        let link_radius = source.radius(edge);
        let style = source.style(edge);
        let link_stub = params.stub_cap && source.stub(edge);
        let group = edge as u32;
        let solid = CylinderSegment {
            radius_scale: 1.0,
            top_cap: params.link_cap,
            bottom_cap: link_stub,
            color_mode: color_mode_flag,
            group,
        };
        let mut vm = (va + vb) * 0.5;

        match style {
            LinkStyle::Solid => {
                cb.add(va, vm, &solid);
            }
            LinkStyle::Dashed => {
                cb.add_fixed_count_dashes(
                    va,
                    vm,
                    params.dash_count as f32,
                    &SegmentDashes {
                        radius_scale: params.dash_scale,
                        top_cap: params.dash_cap,
                        bottom_cap: params.dash_cap,
                        stub_cap: link_stub,
                        interpolate,
                        group,
                    },
                );
            }
            LinkStyle::Aromatic | LinkStyle::MirroredAromatic => {
                let shift_dir =
                    shift_direction(va, vb, source.reference_position(edge));
                cb.add(va, vm, &solid);
                let aromatic_offset = link_radius
                    + params.aromatic_scale * link_radius
                    + params.aromatic_scale * link_radius * params.aromatic_spacing;
                va += set_magnitude(vb - va, link_radius * 0.5);
                let shift = set_magnitude(shift_dir, aromatic_offset);
                va -= shift;
                vm -= shift;
                let dashes = SegmentDashes {
                    radius_scale: params.aromatic_scale,
                    top_cap: params.dash_cap,
                    bottom_cap: params.dash_cap,
                    stub_cap: link_stub,
                    interpolate,
                    group,
                };
                cb.add_fixed_count_dashes(
                    va,
                    vm,
                    params.aromatic_dash_count as f32,
                    &dashes,
                );
                if style == LinkStyle::MirroredAromatic {
                    cb.add_fixed_count_dashes(
                        va + shift * 2.0,
                        vm + shift * 2.0,
                        params.aromatic_dash_count as f32,
                        &dashes,
                    );
                }
            }
            LinkStyle::OffsetDouble | LinkStyle::OffsetTriple => {
                let order = multiple_bond_order(style);
                let multi_scale = params.link_scale / (0.5 * order);
                let multiple_offset = link_radius
                    + multi_scale * link_radius
                    + params.link_scale * link_radius * params.link_spacing;
                cb.add(va, vm, &solid);
                let shift = set_magnitude(
                    shift_direction(va, vb, source.reference_position(edge)),
                    multiple_offset,
                );
                va -= set_magnitude(va - vm, link_radius / 1.5);
                if style == LinkStyle::OffsetTriple {
                    cb.add(
                        va + shift,
                        vm + shift,
                        &CylinderSegment {
                            radius_scale: multi_scale,
                            ..solid
                        },
                    );
                }
                cb.add(
                    va - shift,
                    vm - shift,
                    &CylinderSegment {
                        radius_scale: multi_scale,
                        top_cap: params.dash_cap,
                        ..solid
                    },
                );
            }
            LinkStyle::Double | LinkStyle::Triple => {
                let order = multiple_bond_order(style);
                let multi_scale = params.link_scale / (0.5 * order);
                let abs_offset =
                    (link_radius - multi_scale * link_radius) * params.link_spacing;
                let shift = set_magnitude(
                    shift_direction(va, vb, source.reference_position(edge)),
                    abs_offset,
                );
                let offset_segment = CylinderSegment {
                    radius_scale: multi_scale,
                    ..solid
                };
                if style == LinkStyle::Triple {
                    cb.add(va, vm, &offset_segment);
                }
                cb.add(va + shift, vm + shift, &offset_segment);
                cb.add(va - shift, vm - shift, &offset_segment);
            }
            LinkStyle::Disk => {
                let inset = (vm - va) * 0.475;
                cb.add(va + inset, vm - inset, &solid);
            }
        }
    }

    let mut cylinders = cb.finish();
    if let Some(sphere) = reused_sphere(
        previous.map(Cylinders::bounding_sphere),
        center_sum,
        count,
    ) {
        cylinders.set_bounding_sphere(sphere);
    }
    cylinders
}

/// Build line impostors for all half-edges of `source`.
///
/// `previous` enables bounding-sphere reuse across incremental updates.
#[must_use]
pub fn build_link_lines<S: LinkSource>(
    source: &S,
    params: &LinkLineParams,
    previous: Option<&Lines>,
) -> Lines {
    let link_count = source.link_count();
    if link_count == 0 {
        return Lines::default();
    }
    let mut lb = LinesBuilder::with_capacity(link_count * 2);
    let mut center_sum = Vec3::ZERO;
    let mut count = 0usize;

    // lines have no radius, so multiple-bond offsets are fixed factors
    let aromatic_offset_factor = 4.5;
    let multiple_offset_factor = 3.0;

    for edge in 0..link_count {
        if source.ignore(edge) {
            continue;
        }
        let (mut va, vb) = source.position(edge);
        center_sum += va + vb;
        count += 2;

        let style = source.style(edge);
        let group = edge as u32;
        let mut vm = (va + vb) * 0.5;

        match style {
            LinkStyle::Solid => {
                lb.add(va, vm, group);
            }
            LinkStyle::Dashed => {
                lb.add_fixed_count_dashes(va, vm, params.dash_count as f32, group);
            }
            LinkStyle::Aromatic | LinkStyle::MirroredAromatic => {
                let order = multiple_bond_order(style);
                let multi_radius = params.link_scale / (0.5 * order);
                let abs_offset = (1.0 - multi_radius) * params.link_spacing;
                let shift_dir =
                    shift_direction(va, vb, source.reference_position(edge));
                lb.add(va, vm, group);
                let aromatic_offset = abs_offset * aromatic_offset_factor;
                va += set_magnitude(vb - va, aromatic_offset * 0.5);
                let shift = set_magnitude(shift_dir, aromatic_offset);
                va -= shift;
                vm -= shift;
                lb.add_fixed_count_dashes(
                    va,
                    vm,
                    params.aromatic_dash_count as f32,
                    group,
                );
                if style == LinkStyle::MirroredAromatic {
                    lb.add_fixed_count_dashes(
                        va + shift * 2.0,
                        vm + shift * 2.0,
                        params.aromatic_dash_count as f32,
                        group,
                    );
                }
            }
            LinkStyle::OffsetDouble | LinkStyle::OffsetTriple => {
                let order = multiple_bond_order(style);
                let multi_radius = params.link_scale / (0.5 * order);
                let abs_offset = (1.0 - multi_radius) * params.link_spacing;
                let shift = set_magnitude(
                    shift_direction(va, vb, source.reference_position(edge)),
                    abs_offset * multiple_offset_factor,
                );
                lb.add(va, vm, group);
                va -= (va - vm) * (params.link_spacing * params.link_scale);
                if style == LinkStyle::OffsetTriple {
                    lb.add(va + shift, vm + shift, group);
                }
                lb.add(va - shift, vm - shift, group);
            }
            LinkStyle::Double | LinkStyle::Triple => {
                let order = multiple_bond_order(style);
                let multi_radius = params.link_scale / (0.5 * order);
                let abs_offset = (1.0 - multi_radius) * params.link_spacing;
                let shift = set_magnitude(
                    shift_direction(va, vb, source.reference_position(edge)),
                    abs_offset * 1.5,
                );
                if style == LinkStyle::Triple {
                    lb.add(va, vm, group);
                }
                lb.add(va + shift, vm + shift, group);
                lb.add(va - shift, vm - shift, group);
            }
            LinkStyle::Disk => {
                let inset = (vm - va) * 0.475;
                lb.add(va + inset, vm - inset, group);
            }
        }
    }

    let mut lines = lb.finish();
    if let Some(sphere) =
        reused_sphere(previous.map(Lines::bounding_sphere), center_sum, count)
    {
        lines.set_bounding_sphere(sphere);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    struct PairSource {
        positions: Vec<(Vec3, Vec3)>,
        styles: Vec<LinkStyle>,
        ignored: Vec<bool>,
        stubbed: Vec<bool>,
    }

    impl PairSource {
        fn new(positions: Vec<(Vec3, Vec3)>, styles: Vec<LinkStyle>) -> Self {
            let ignored = vec![false; positions.len()];
            let stubbed = vec![false; positions.len()];
            Self {
                positions,
                styles,
                ignored,
                stubbed,
            }
        }
    }

    impl LinkSource for PairSource {
        fn link_count(&self) -> usize {
            self.positions.len()
        }

        fn position(&self, edge: usize) -> (Vec3, Vec3) {
            self.positions[edge]
        }

        fn radius(&self, _edge: usize) -> f32 {
            0.2
        }

        fn style(&self, edge: usize) -> LinkStyle {
            self.styles[edge]
        }

        fn ignore(&self, edge: usize) -> bool {
            self.ignored[edge]
        }

        fn stub(&self, edge: usize) -> bool {
            self.stubbed[edge]
        }
    }

    fn symmetric_pair(a: Vec3, b: Vec3, style: LinkStyle) -> PairSource {
        PairSource::new(vec![(a, b), (b, a)], vec![style, style])
    }

    fn half_edge(a: Vec3, b: Vec3, style: LinkStyle) -> PairSource {
        PairSource::new(vec![(a, b)], vec![style])
    }

    fn mesh_vertex(mesh: &Mesh, i: usize) -> Vec3 {
        Vec3::new(
            mesh.vertices[i * 3],
            mesh.vertices[i * 3 + 1],
            mesh.vertices[i * 3 + 2],
        )
    }

    fn has_vertex(mesh: &Mesh, p: Vec3) -> bool {
        (0..mesh.vertex_count()).any(|i| mesh_vertex(mesh, i).distance(p) < 1e-4)
    }

    fn vertex_range_x(mesh: &Mesh) -> (f32, f32) {
        let mut range = (f32::INFINITY, f32::NEG_INFINITY);
        for i in 0..mesh.vertex_count() {
            let x = mesh_vertex(mesh, i).x;
            range = (range.0.min(x), range.1.max(x));
        }
        range
    }

    #[test]
    fn test_shift_direction_perpendicular() {
        let dir = shift_direction(
            Vec3::ZERO,
            Vec3::new(2.0, 0.0, 0.0),
            Some(Vec3::new(1.0, 1.0, 0.0)),
        );
        assert!(dir.dot(Vec3::X).abs() < 1e-5);
        assert!((dir.length() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_shift_direction_colinear_fallback() {
        // reference on the link axis falls back to a fixed axis
        let dir = shift_direction(
            Vec3::ZERO,
            Vec3::new(2.0, 0.0, 0.0),
            Some(Vec3::new(4.0, 0.0, 0.0)),
        );
        assert!(dir.dot(Vec3::X).abs() < 1e-5);
        assert!((dir.length() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_solid_mesh_covers_half_links() {
        let source = symmetric_pair(
            Vec3::ZERO,
            Vec3::new(0.0, 0.0, 2.0),
            LinkStyle::Solid,
        );
        let mesh = build_link_cylinder_mesh(
            &source,
            &LinkCylinderParams::default(),
            None,
        );
        assert!(mesh.vertex_count() > 0);
        let s = mesh.bounding_sphere();
        assert!(s.center.distance(Vec3::ZERO) <= s.radius + 1e-4);
        assert!(s.center.distance(Vec3::new(0.0, 0.0, 2.0)) <= s.radius + 1e-4);
    }

    #[test]
    fn test_ignored_edges_skipped() {
        let mut source = symmetric_pair(
            Vec3::ZERO,
            Vec3::new(0.0, 0.0, 2.0),
            LinkStyle::Solid,
        );
        source.ignored = vec![true, true];
        let mesh = build_link_cylinder_mesh(
            &source,
            &LinkCylinderParams::default(),
            None,
        );
        assert_eq!(mesh.vertex_count(), 0);
    }

    #[test]
    fn test_impostor_solid_to_midpoint() {
        let source = symmetric_pair(
            Vec3::ZERO,
            Vec3::new(4.0, 0.0, 0.0),
            LinkStyle::Solid,
        );
        let c = build_link_cylinder_impostors(
            &source,
            &LinkCylinderParams::default(),
            None,
        );
        assert_eq!(c.cylinder_count(), 2);
        // first half-edge runs from its start to the shared midpoint
        assert_eq!(c.starts[..3], [0.0, 0.0, 0.0]);
        assert_eq!(c.ends[..3], [2.0, 0.0, 0.0]);
        assert_eq!(c.color_modes[0], COLOR_MODE_DEFAULT);
    }

    #[test]
    fn test_impostor_interpolate_flag() {
        let source = symmetric_pair(
            Vec3::ZERO,
            Vec3::new(4.0, 0.0, 0.0),
            LinkStyle::Solid,
        );
        let params = LinkCylinderParams {
            color_mode: LinkColorMode::Interpolate,
            ..LinkCylinderParams::default()
        };
        let c = build_link_cylinder_impostors(&source, &params, None);
        assert_eq!(c.color_modes[0], COLOR_MODE_INTERPOLATE);
    }

    #[test]
    fn test_double_style_counts() {
        let source = symmetric_pair(
            Vec3::ZERO,
            Vec3::new(0.0, 0.0, 2.0),
            LinkStyle::Double,
        );
        let c = build_link_cylinder_impostors(
            &source,
            &LinkCylinderParams::default(),
            None,
        );
        // two parallel cylinders per half-edge
        assert_eq!(c.cylinder_count(), 4);
        let t = build_link_cylinder_impostors(
            &symmetric_pair(Vec3::ZERO, Vec3::new(0.0, 0.0, 2.0), LinkStyle::Triple),
            &LinkCylinderParams::default(),
            None,
        );
        assert_eq!(t.cylinder_count(), 6);
    }

    #[test]
    fn test_dashed_impostor_count() {
        let source = symmetric_pair(
            Vec3::ZERO,
            Vec3::new(0.0, 0.0, 2.0),
            LinkStyle::Dashed,
        );
        let c = build_link_cylinder_impostors(
            &source,
            &LinkCylinderParams::default(),
            None,
        );
        // dash count 4 yields 2 drawn dashes per half-edge
        assert_eq!(c.cylinder_count(), 4);
    }

    #[test]
    fn test_disk_impostor_brackets_quarter_point() {
        let source = half_edge(
            Vec3::ZERO,
            Vec3::new(4.0, 0.0, 0.0),
            LinkStyle::Disk,
        );
        let c = build_link_cylinder_impostors(
            &source,
            &LinkCylinderParams::default(),
            None,
        );
        assert_eq!(c.cylinder_count(), 1);
        // the 0.475 shrink leaves a thin span about the half-edge midpoint
        assert!((c.starts[0] - 0.95).abs() < 1e-5);
        assert!((c.ends[0] - 1.05).abs() < 1e-5);
    }

    #[test]
    fn test_disk_mesh_hugs_midpoint() {
        let source = half_edge(
            Vec3::ZERO,
            Vec3::new(4.0, 0.0, 0.0),
            LinkStyle::Disk,
        );
        let mesh = build_link_cylinder_mesh(
            &source,
            &LinkCylinderParams::default(),
            None,
        );
        // insetting by 0.475 of the full edge and drawing half the rest
        // leaves the disk just inside the bond midpoint
        let (min_x, max_x) = vertex_range_x(&mesh);
        assert!((min_x - 1.9).abs() < 1e-4);
        assert!((max_x - 2.0).abs() < 1e-4);
    }

    #[test]
    fn test_offset_double_mesh_placement() {
        let source = half_edge(
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 2.0),
            LinkStyle::OffsetDouble,
        );
        let mesh = build_link_cylinder_mesh(
            &source,
            &LinkCylinderParams::default(),
            None,
        );
        // full cylinder at x = 1 (radius 0.2) plus a thinner copy shifted
        // by radius + multi_radius + scale * radius * spacing = 0.38
        let (min_x, max_x) = vertex_range_x(&mesh);
        assert!((max_x - 1.2).abs() < 1e-4);
        assert!((min_x - 0.53).abs() < 1e-4);
        // the offset copy is inset along the axis by 0.2 * spacing * scale
        // of the edge and capped toward the midpoint
        for i in 0..mesh.vertex_count() {
            let p = mesh_vertex(&mesh, i);
            if p.x < 0.75 {
                assert!(p.z > 0.18 - 1e-4 && p.z < 1.0 + 1e-4);
            }
        }
        assert!(has_vertex(&mesh, Vec3::new(0.62, 0.0, 1.0)));
    }

    #[test]
    fn test_offset_triple_mesh_adds_mirror_copy() {
        let source = half_edge(
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 2.0),
            LinkStyle::OffsetTriple,
        );
        let mesh = build_link_cylinder_mesh(
            &source,
            &LinkCylinderParams::default(),
            None,
        );
        // offset copies sit at 1 ± 0.35, cap centers on their axes
        assert!(has_vertex(&mesh, Vec3::new(0.65, 0.0, 1.0)));
        assert!(has_vertex(&mesh, Vec3::new(1.35, 0.0, 1.0)));
    }

    #[test]
    fn test_mirrored_aromatic_impostor_positions() {
        let a = Vec3::new(1.0, 0.0, 0.0);
        let b = Vec3::new(1.0, 0.0, 2.0);
        let params = LinkCylinderParams::default();
        let aromatic = build_link_cylinder_impostors(
            &half_edge(a, b, LinkStyle::Aromatic),
            &params,
            None,
        );
        let mirrored = build_link_cylinder_impostors(
            &half_edge(a, b, LinkStyle::MirroredAromatic),
            &params,
            None,
        );
        // solid + one drawn dash; mirroring adds the opposite-side dash
        assert_eq!(aromatic.cylinder_count(), 2);
        assert_eq!(mirrored.cylinder_count(), 3);
        // dashes sit symmetrically about the solid cylinder at x = 1,
        // offset by radius + ar_scale * radius * (1 + spacing) = 0.35
        assert!((mirrored.starts[0] - 1.0).abs() < 1e-5);
        assert!((mirrored.starts[18] - 0.65).abs() < 1e-4);
        assert!((mirrored.starts[36] - 1.35).abs() < 1e-4);
    }

    #[test]
    fn test_stubbed_half_edge_gains_cap() {
        let mut source = half_edge(
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 2.0),
            LinkStyle::Solid,
        );
        let params = LinkCylinderParams::default();
        let plain = build_link_cylinder_impostors(&source, &params, None);
        assert_eq!(plain.caps[0], 0.0);

        source.stubbed = vec![true];
        let stubbed = build_link_cylinder_impostors(&source, &params, None);
        assert_eq!(stubbed.caps[0], 2.0);
    }

    #[test]
    fn test_mesh_stub_cap_follows_link_direction() {
        let params = LinkCylinderParams::default();
        let mut up = half_edge(
            Vec3::ZERO,
            Vec3::new(0.0, 4.0, 0.0),
            LinkStyle::Solid,
        );
        up.stubbed = vec![true];
        let mesh = build_link_cylinder_mesh(&up, &params, None);
        // upward half-edge: the stub cap closes the midpoint end
        assert!(has_vertex(&mesh, Vec3::new(0.0, 2.0, 0.0)));

        let mut down = half_edge(
            Vec3::new(0.0, 4.0, 0.0),
            Vec3::ZERO,
            LinkStyle::Solid,
        );
        down.stubbed = vec![true];
        let mesh = build_link_cylinder_mesh(&down, &params, None);
        // downward half-edge: the cap assignment flips to the start end
        assert!(has_vertex(&mesh, Vec3::new(0.0, 4.0, 0.0)));
        assert!(!has_vertex(&mesh, Vec3::new(0.0, 2.0, 0.0)));
    }

    #[test]
    fn test_lines_aromatic_counts() {
        let source = symmetric_pair(
            Vec3::ZERO,
            Vec3::new(0.0, 0.0, 2.0),
            LinkStyle::Aromatic,
        );
        let lines =
            build_link_lines(&source, &LinkLineParams::default(), None);
        // per half-edge: one solid line + one drawn aromatic dash
        assert_eq!(lines.line_count(), 4);
    }

    #[test]
    fn test_bounding_sphere_reused_when_stable() {
        let a = Vec3::ZERO;
        let b = Vec3::new(0.0, 0.0, 2.0);
        let source = symmetric_pair(a, b, LinkStyle::Solid);
        let params = LinkCylinderParams::default();
        let first = build_link_cylinder_mesh(&source, &params, None);

        // shift well within a tenth of the radius
        let eps = Vec3::new(0.0, 0.0, 1e-3);
        let moved = symmetric_pair(a + eps, b + eps, LinkStyle::Solid);
        let second = build_link_cylinder_mesh(&moved, &params, Some(&first));
        assert!(second.bounding_sphere().approx_eq(first.bounding_sphere()));
    }

    #[test]
    fn test_bounding_sphere_recomputed_on_large_move() {
        let a = Vec3::ZERO;
        let b = Vec3::new(0.0, 0.0, 2.0);
        let source = symmetric_pair(a, b, LinkStyle::Solid);
        let params = LinkCylinderParams::default();
        let first = build_link_cylinder_mesh(&source, &params, None);

        let offset = Vec3::new(10.0, 0.0, 0.0);
        let moved = symmetric_pair(a + offset, b + offset, LinkStyle::Solid);
        let second = build_link_cylinder_mesh(&moved, &params, Some(&first));
        assert!(!second.bounding_sphere().approx_eq(first.bounding_sphere()));
    }
}
