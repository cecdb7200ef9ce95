// Copyright 2026 the Hairline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hairline is an antialiased hairline path renderer.
//!
//! A hairline is a stroke exactly one device pixel wide, whatever the transform. Hairline
//! turns a path of lines, quadratic and cubic curves into a triangle mesh whose vertices
//! carry implicit distance data, and draws it in a few batched indexed draws. The GPU
//! evaluates per-fragment coverage from that data (see [`shaders`]).
//!
//! Hairline plugs into a host renderer: the host implements [`RenderBackend`], which owns
//! buffers, clip state and draw submission, and asks the [`HairlinePathRenderer`] whether
//! it can draw a path before handing it over.
//!
//! ```ignore
//! let mut backend: MyBackend = ...;
//! let mut renderer = HairlinePathRenderer::new(&mut backend, RendererOptions::default())?;
//!
//! let mut path = BezPath::new();
//! path.move_to((10.0, 10.0));
//! path.quad_to((50.0, 90.0), (90.0, 10.0));
//!
//! let stroke = Stroke::new(0.0); // zero width is the hairline style
//! if renderer.can_draw_path(&path, &stroke, true, backend.caps()) {
//!     renderer.draw_path(&mut backend, &path, &Transform::IDENTITY)?;
//! }
//! ```
//!
//! [`Recording`] is a backend which records every command instead of talking to a GPU.

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

mod backend;
mod batch;
mod recording;
mod renderer;

pub mod shaders;

/// Styling and composition primitives.
pub use peniko;
/// 2D geometry, with a focus on curves.
pub use peniko::kurbo;

pub use hairline_common::{
    CoordinateSpace, IndexTemplate, IntRect, Subdivision, Tolerances, Transform, Vertex,
    VertexLayout,
};

pub use backend::{
    BackendError, EdgeMode, IndexBufferId, IndexedDraw, PrimitiveKind, RenderBackend,
    SharedIndexBuffer, TargetCaps, VertexBufferId,
};
pub use batch::{Batches, DrawBatch};
pub use recording::{Command, Recording, DEFAULT_LINES_PER_INDEX_BUFFER};
pub use renderer::{DrawStats, HairlinePathRenderer, RendererOptions, Unsupported};

use thiserror::Error;

/// Errors that can occur in Hairline.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// The path can't be drawn as an antialiased hairline; fall back to another renderer.
    #[error("Path can't be drawn by the hairline renderer: {0}")]
    Unsupported(#[from] Unsupported),
    /// The host has no shared index buffer for lines.
    #[error("Host has no shared line index buffer")]
    MissingLineIndexBuffer,
    /// [`RendererOptions::quads_per_index_buffer`] is zero or too large for 16-bit indices.
    #[error("Can't build a quad index buffer for {0} quads")]
    InvalidQuadCapacity(usize),
    /// The quad index buffer couldn't be created.
    #[error("Couldn't create the quad index buffer")]
    IndexBufferUnavailable {
        #[source]
        source: BackendError,
    },
    /// The vertex buffer for a path couldn't be acquired. Nothing was drawn.
    #[error("Couldn't acquire a vertex buffer for {vertex_count} vertices")]
    VertexBufferUnavailable {
        vertex_count: usize,
        #[source]
        source: BackendError,
    },
    /// Any other failure reported by the host.
    #[error("Backend error")]
    Backend(#[from] BackendError),
}

pub(crate) type Result<T, E = Error> = std::result::Result<T, E>;
