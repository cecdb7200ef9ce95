// Copyright 2026 the Hairline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::num::NonZeroUsize;

use hairline_common::flatten::CoordinateSpace;
use hairline_common::{IndexTemplate, IntRect, Vertex, VertexLayout};
use thiserror::Error;

/// Handle to a vertex buffer acquired from a [`RenderBackend`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct VertexBufferId(pub u64);

/// Handle to an index buffer owned by a [`RenderBackend`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct IndexBufferId(pub u64);

/// What the render target can do.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TargetCaps {
    /// Whether fragment shaders can use screen-space derivatives (`dpdx`/`dpdy`).
    ///
    /// Quad edges need them; line edges don't.
    pub fragment_derivatives: bool,
}

/// A host-owned index buffer holding an [`IndexTemplate`] for lines.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SharedIndexBuffer {
    pub id: IndexBufferId,
    /// The number of lines one draw can cover.
    pub capacity: NonZeroUsize,
}

/// The primitive topology of a draw.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    /// Independent triangles, three indices each.
    Triangles,
}

/// The coverage function a draw is shaded with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EdgeMode {
    /// Vertex edge data is a device-space line equation.
    Line,
    /// Vertex edge data is a canonical `(u, v)` quad coordinate.
    Quad,
}

/// One indexed draw call.
///
/// Each draw is only an offset into the shared vertex buffer plus a prefix of a shared
/// index template; no index data is generated per draw.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IndexedDraw {
    pub primitive: PrimitiveKind,
    pub edge: EdgeMode,
    /// Whether positions are in device space or need the path transform applied.
    pub space: CoordinateSpace,
    pub vertex_buffer: VertexBufferId,
    pub index_buffer: IndexBufferId,
    /// Added to every index.
    pub start_vertex: usize,
    pub start_index: usize,
    pub vertex_count: usize,
    pub index_count: usize,
}

/// Errors reported by a [`RenderBackend`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum BackendError {
    /// The host couldn't provide a buffer of the requested size.
    #[error("Out of memory allocating {requested} elements")]
    OutOfMemory { requested: usize },
    /// A buffer handle doesn't refer to a live buffer.
    #[error("Unknown buffer {0}")]
    UnknownBuffer(u64),
    /// More data was written than the buffer was acquired for.
    #[error("Wrote {written} elements into a buffer of {capacity}")]
    BufferOverflow { capacity: usize, written: usize },
    /// Any other host failure.
    #[error("{0}")]
    Message(String),
}

/// The services a host rendering backend provides to the hairline renderer.
///
/// Vertex buffers are transient: the renderer acquires one per path, writes it once,
/// draws from it, and releases it on every exit path. Index buffers are long-lived.
pub trait RenderBackend {
    /// Capabilities of the current render target.
    fn caps(&self) -> TargetCaps;

    /// A conservative bound of the current clip, in device pixels.
    fn conservative_clip_bounds(&self) -> IntRect;

    /// Creates a long-lived index buffer holding `template`.
    fn create_index_buffer(
        &mut self,
        template: &IndexTemplate,
    ) -> Result<IndexBufferId, BackendError>;

    /// The host's shared index buffer for lines, if it has one.
    fn line_index_buffer(&self) -> Option<SharedIndexBuffer>;

    /// Acquires a vertex buffer for `vertex_count` vertices of the given layout.
    fn acquire_vertex_buffer(
        &mut self,
        layout: &VertexLayout,
        vertex_count: usize,
    ) -> Result<VertexBufferId, BackendError>;

    /// Fills an acquired vertex buffer.
    fn write_vertices(
        &mut self,
        buffer: VertexBufferId,
        vertices: &[Vertex],
    ) -> Result<(), BackendError>;

    /// Issues one indexed draw.
    fn draw_indexed(&mut self, draw: &IndexedDraw);

    /// Releases a vertex buffer acquired with [`RenderBackend::acquire_vertex_buffer`].
    fn release_vertex_buffer(&mut self, buffer: VertexBufferId);
}
