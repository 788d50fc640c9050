//! Bond lists and their adaptation to the link builders.
//!
//! A [`BondList`] is an undirected bond graph over atom positions. Its
//! [`LinkSource`] view yields every bond as two directed half-edges and
//! derives the drawing style from bond order and type flags.

use glam::Vec3;

use crate::link::{LinkSource, LinkStyle};

/// Bond type flag bits.
pub mod flags {
    /// Covalent bond.
    pub const COVALENT: u8 = 0x1;
    /// Metallic coordination, drawn dashed.
    pub const METALLIC_COORDINATION: u8 = 0x2;
    /// Hydrogen bond, drawn dashed.
    pub const HYDROGEN_BOND: u8 = 0x4;
    /// Disulfide bridge.
    pub const DISULFIDE: u8 = 0x8;
    /// Aromatic bond.
    pub const AROMATIC: u8 = 0x10;
    /// Computed (not taken from input).
    pub const COMPUTED: u8 = 0x20;
}

/// How bonds of order two and three are drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MultipleBondStyle {
    /// Draw all bonds as single solid cylinders.
    Off,
    /// Parallel cylinders symmetric about the bond axis.
    Symmetric,
    /// A full cylinder plus thinner offset cylinders.
    #[default]
    Offset,
}

/// One undirected bond between two atom indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bond {
    /// First atom index.
    pub a: u32,
    /// Second atom index.
    pub b: u32,
    /// Bond order, 1 to 3.
    pub order: u8,
    /// Bond type flag bits, see [`flags`].
    pub flags: u8,
    /// Number of aromatic rings shared by both atoms.
    pub aromatic_ring_count: u8,
}

impl Bond {
    /// A single covalent bond between two atoms.
    #[must_use]
    pub const fn covalent(a: u32, b: u32) -> Self {
        Self {
            a,
            b,
            order: 1,
            flags: flags::COVALENT,
            aromatic_ring_count: 0,
        }
    }
}

/// Undirected bond graph over atom positions, with CSR adjacency.
#[derive(Debug, Clone)]
pub struct BondList {
    positions: Vec<Vec3>,
    bonds: Vec<Bond>,
    is_hydrogen: Vec<bool>,
    // CSR over atoms: neighbor atom index + owning bond index
    offsets: Vec<u32>,
    neighbors: Vec<u32>,
}

impl BondList {
    /// Build a bond list with its adjacency from positions and bonds.
    #[must_use]
    pub fn new(positions: Vec<Vec3>, bonds: Vec<Bond>) -> Self {
        let atom_count = positions.len();
        let mut degree = vec![0u32; atom_count];
        for bond in &bonds {
            degree[bond.a as usize] += 1;
            degree[bond.b as usize] += 1;
        }
        let mut offsets = Vec::with_capacity(atom_count + 1);
        let mut total = 0u32;
        offsets.push(0);
        for d in &degree {
            total += d;
            offsets.push(total);
        }
        let mut cursor: Vec<u32> = offsets[..atom_count].to_vec();
        let mut neighbors = vec![0u32; total as usize];
        for bond in &bonds {
            neighbors[cursor[bond.a as usize] as usize] = bond.b;
            cursor[bond.a as usize] += 1;
            neighbors[cursor[bond.b as usize] as usize] = bond.a;
            cursor[bond.b as usize] += 1;
        }
        Self {
            is_hydrogen: vec![false; atom_count],
            positions,
            bonds,
            offsets,
            neighbors,
        }
    }

    /// Mark atoms as hydrogens so they can be ignored during building.
    pub fn set_hydrogens<I: IntoIterator<Item = usize>>(&mut self, atoms: I) {
        for atom in atoms {
            self.is_hydrogen[atom] = true;
        }
    }

    /// Number of atoms.
    #[must_use]
    pub fn atom_count(&self) -> usize {
        self.positions.len()
    }

    /// Number of undirected bonds.
    #[must_use]
    pub fn bond_count(&self) -> usize {
        self.bonds.len()
    }

    /// The bonds.
    #[must_use]
    pub fn bonds(&self) -> &[Bond] {
        &self.bonds
    }

    /// Atom positions.
    #[must_use]
    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    fn neighbors_of(&self, atom: u32) -> &[u32] {
        let lo = self.offsets[atom as usize] as usize;
        let hi = self.offsets[atom as usize + 1] as usize;
        &self.neighbors[lo..hi]
    }

    fn degree(&self, atom: u32) -> usize {
        self.neighbors_of(atom).len()
    }

    /// View as a [`LinkSource`] of directed half-edges.
    #[must_use]
    pub const fn link_source<'a>(
        &'a self,
        params: &'a BondSourceParams,
    ) -> BondLinkSource<'a> {
        BondLinkSource { list: self, params }
    }
}

/// Parameters controlling the half-edge view of a [`BondList`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BondSourceParams {
    /// Cylinder radius per bond.
    pub radius: f32,
    /// Multiple-bond rendering style.
    pub multiple_bonds: MultipleBondStyle,
    /// Draw aromatic bonds with indicator dashes.
    pub aromatic_bonds: bool,
    /// Skip bonds touching a hydrogen atom.
    pub ignore_hydrogens: bool,
    /// Skip bonds matching any of these flag bits.
    pub exclude_flags: u8,
}

impl Default for BondSourceParams {
    fn default() -> Self {
        Self {
            radius: 0.2,
            multiple_bonds: MultipleBondStyle::default(),
            aromatic_bonds: true,
            ignore_hydrogens: false,
            exclude_flags: 0,
        }
    }
}

/// Directed half-edge view of a [`BondList`].
///
/// Half-edge `2 * i` runs from atom `a` of bond `i` toward atom `b`,
/// half-edge `2 * i + 1` the other way.
#[derive(Debug, Clone, Copy)]
pub struct BondLinkSource<'a> {
    list: &'a BondList,
    params: &'a BondSourceParams,
}

impl BondLinkSource<'_> {
    fn endpoints(&self, edge: usize) -> (u32, u32) {
        let bond = &self.list.bonds[edge / 2];
        if edge % 2 == 0 {
            (bond.a, bond.b)
        } else {
            (bond.b, bond.a)
        }
    }
}

impl LinkSource for BondLinkSource<'_> {
    fn link_count(&self) -> usize {
        self.list.bonds.len() * 2
    }

    fn position(&self, edge: usize) -> (Vec3, Vec3) {
        let (a, b) = self.endpoints(edge);
        (
            self.list.positions[a as usize],
            self.list.positions[b as usize],
        )
    }

    fn radius(&self, _edge: usize) -> f32 {
        self.params.radius
    }

    fn style(&self, edge: usize) -> LinkStyle {
        let bond = &self.list.bonds[edge / 2];
        let multi_off = self.params.multiple_bonds == MultipleBondStyle::Off;
        let symmetric =
            self.params.multiple_bonds == MultipleBondStyle::Symmetric;
        if bond.flags & (flags::METALLIC_COORDINATION | flags::HYDROGEN_BOND)
            != 0
        {
            LinkStyle::Dashed
        } else if bond.order == 3 {
            if multi_off {
                LinkStyle::Solid
            } else if symmetric {
                LinkStyle::Triple
            } else {
                LinkStyle::OffsetTriple
            }
        } else if self.params.aromatic_bonds
            && bond.flags & flags::AROMATIC != 0
        {
            if bond.aromatic_ring_count == 2 {
                LinkStyle::MirroredAromatic
            } else {
                LinkStyle::Aromatic
            }
        } else if bond.order != 2 || multi_off {
            LinkStyle::Solid
        } else if symmetric {
            LinkStyle::Double
        } else {
            LinkStyle::OffsetDouble
        }
    }

    fn ignore(&self, edge: usize) -> bool {
        let bond = &self.list.bonds[edge / 2];
        if bond.flags & self.params.exclude_flags != 0 {
            return true;
        }
        self.params.ignore_hydrogens
            && (self.list.is_hydrogen[bond.a as usize]
                || self.list.is_hydrogen[bond.b as usize])
    }

    fn reference_position(&self, edge: usize) -> Option<Vec3> {
        let (mut a, mut b) = self.endpoints(edge);
        // anchor on the lower-index atom, unless it is a leaf
        if a > b {
            std::mem::swap(&mut a, &mut b);
        }
        if self.list.degree(a) == 1 {
            std::mem::swap(&mut a, &mut b);
        }
        self.list
            .neighbors_of(a)
            .iter()
            .find(|&&n| n != a && n != b)
            .map(|&n| self.list.positions[n as usize])
    }
}
