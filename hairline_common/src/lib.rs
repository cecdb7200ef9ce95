// Copyright 2026 the Hairline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! CPU-side tessellation for antialiased hairline strokes.
//!
//! A hairline is a stroke rendered exactly one device pixel wide, whatever the scale of the
//! transform. This crate turns an arbitrary path of lines, quadratic and cubic curves into a
//! triangle mesh whose vertices carry implicit distance data, so that a GPU can compute
//! per-fragment coverage with a tiny fragment program.
//!
//! # Contents
//!
//! - [`classify`]: decides whether a quadratic is degenerate and how often to subdivide it.
//! - [`flatten`]: walks a path, transforms and clip-rejects segments, and sorts them into
//!   line segments and (subdivided) quadratics.
//! - [`bloat`]: expands lines into 4-vertex quads and leaf quadratics into 5-vertex polygons.
//! - [`index`]: reusable index patterns for batched triangle-list draws.
//! - [`coverage`]: reference CPU evaluation of the fragment coverage functions.
//! - [`math`]: projective transforms, the canonical quad-uv mapping and line helpers.
//!
//! This crate does not talk to a GPU; see the `hairline` crate for the renderer built on top.

// LINEBENDER LINT SET - lib.rs - v3
// See https://linebender.org/wiki/canonical-lints/
// These lints shouldn't apply to examples or tests.
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
// These lints shouldn't apply to examples.
#![warn(clippy::print_stdout, clippy::print_stderr)]
// Targeting e.g. 32-bit means structs containing usize can give false positives for 64-bit.
#![cfg_attr(target_pointer_width = "64", warn(clippy::trivially_copy_pass_by_ref))]
// END LINEBENDER LINT SET
#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![forbid(unsafe_code)]
#![allow(
    clippy::cast_possible_truncation,
    reason = "Vertex data is f32 while the geometry is computed in f64."
)]

pub mod bloat;
pub mod classify;
pub mod clip;
pub mod coverage;
pub mod flatten;
pub mod index;
pub mod math;

pub use peniko;
pub use peniko::kurbo;

pub use bloat::{Vertex, VertexLayout};
pub use classify::{Subdivision, Tolerances};
pub use clip::IntRect;
pub use flatten::{CoordinateSpace, Flattener, QuadSegment, Segments};
pub use index::IndexTemplate;
pub use math::Transform;
