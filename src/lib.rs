// -- Lint policy ---------------------------------------------------------
// This is the single source of truth for crate-wide lints.

// Broad lint groups
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
// Documentation
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]
#![deny(rustdoc::bare_urls)]
// No panicking in library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
// No debug/print artifacts
#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]
// Import hygiene
#![deny(clippy::wildcard_imports)]
// Clone / pass-by-value hygiene
#![deny(clippy::needless_pass_by_value)]
#![deny(clippy::implicit_clone)]
// Unused / redundant code
#![deny(unused_results)]
#![deny(unused_qualifications)]
// Cast hygiene
#![deny(trivial_casts)]
#![deny(trivial_numeric_casts)]
// Graphics math allowances — casts between index/float spaces are intentional
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::float_cmp)]
#![allow(clippy::suboptimal_flops)]
#![allow(clippy::many_single_char_names)]
#![allow(clippy::similar_names)]
#![allow(clippy::module_name_repetitions)]

//! CPU-side geometry builders and bounding volumes for molecular rendering.
//!
//! Molgeo turns molecular bond/atom data into packed, GPU-ready primitive
//! buffers: triangle meshes, ray-cast cylinder impostors, billboard sphere
//! impostors, and screen-space line impostors. Every finished geometry
//! carries a bounding sphere, and rebuild paths can reuse the previous
//! sphere when the data has barely moved.
//!
//! # Key entry points
//!
//! - [`link`] - bond/link builders ([`link::build_link_cylinder_mesh`],
//!   [`link::build_link_cylinder_impostors`], [`link::build_link_lines`])
//! - [`bond::BondList`] - a concrete link source over a flat bond list
//! - [`math`] - bounding spheres, boxes, and the extremal-points
//!   bounding-sphere helper
//! - [`density`] - Gaussian density fields for surface extraction
//! - [`options::Options`] - detail/quality configuration
//!
//! # Architecture
//!
//! Builders are plain accumulators over `Vec` buffers; they know nothing
//! about the renderer consuming them. The [`link`] module drives the
//! primitive builders from a [`link::LinkSource`], mapping bond styles
//! (solid, dashed, double, triple, aromatic, ...) to primitive placement.
//! Bounding volumes live in [`math`] and are computed with a sampled
//! extremal-points pass so large structures stay cheap.

pub mod bond;
pub mod density;
pub mod error;
pub mod geometry;
pub mod link;
pub mod math;
pub mod options;
