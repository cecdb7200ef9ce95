// Copyright 2026 the Hairline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::num::NonZeroUsize;

use hairline_common::bloat::write_segments;
use hairline_common::index::QUADS_PER_INDEX_BUFFER;
use hairline_common::{Flattener, IndexTemplate, Tolerances, Transform, Vertex};
use log::{debug, trace};
use peniko::kurbo::{PathEl, Stroke};

use crate::{
    Batches, EdgeMode, Error, IndexBufferId, IndexedDraw, PrimitiveKind, RenderBackend, Result,
    TargetCaps, VertexBufferId,
};

/// Options which are set at renderer creation time.
#[derive(Clone, Copy, Debug)]
pub struct RendererOptions {
    /// Tolerances for the quadratic classifier.
    pub tolerances: Tolerances,
    /// The number of leaf quads in the quad index buffer, which is the most one draw covers.
    ///
    /// Must be at least one, and `5 · quads_per_index_buffer` vertices must be addressable
    /// with 16-bit indices.
    pub quads_per_index_buffer: usize,
}

impl Default for RendererOptions {
    fn default() -> Self {
        Self {
            tolerances: Tolerances::default(),
            quads_per_index_buffer: QUADS_PER_INDEX_BUFFER,
        }
    }
}

/// Why a path can't be drawn as an antialiased hairline.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum Unsupported {
    /// The stroke is not the zero-width hairline style.
    #[error("Stroke is not a hairline")]
    NotHairline,
    /// Antialiasing wasn't requested.
    #[error("Antialiasing is off")]
    NotAntialiased,
    /// The path has curves, and the target can't compute fragment derivatives.
    #[error("Curved hairlines need fragment derivatives")]
    MissingDerivatives,
}

/// Totals for one drawn path.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DrawStats {
    pub lines: usize,
    pub leaf_quads: usize,
    pub vertices: usize,
    pub draws: usize,
}

/// Draws antialiased hairline paths through a [`RenderBackend`].
///
/// The renderer owns the quad index buffer it creates in [`HairlinePathRenderer::new`], so
/// it must be used with the backend it was created with.
#[derive(Debug)]
pub struct HairlinePathRenderer {
    options: RendererOptions,
    quad_template: IndexTemplate,
    quad_indices: IndexBufferId,
    flattener: Flattener,
    vertices: Vec<Vertex>,
}

static_assertions::assert_impl_all!(HairlinePathRenderer: Send, Sync);

impl HairlinePathRenderer {
    /// Creates a renderer, building its quad index buffer on `backend`.
    pub fn new<B: RenderBackend>(backend: &mut B, options: RendererOptions) -> Result<Self> {
        let quad_template = IndexTemplate::quads(options.quads_per_index_buffer)
            .ok_or(Error::InvalidQuadCapacity(options.quads_per_index_buffer))?;
        let quad_indices = backend
            .create_index_buffer(&quad_template)
            .map_err(|source| Error::IndexBufferUnavailable { source })?;
        Ok(Self {
            options,
            quad_template,
            quad_indices,
            flattener: Flattener::new(options.tolerances),
            vertices: Vec::new(),
        })
    }

    /// The options the renderer was created with.
    pub fn options(&self) -> &RendererOptions {
        &self.options
    }

    /// The quad index template and the buffer holding it.
    pub fn quad_index_buffer(&self) -> (IndexBufferId, &IndexTemplate) {
        (self.quad_indices, &self.quad_template)
    }

    /// Checks whether `path` can be drawn with `stroke` on a target with `caps`.
    pub fn check_path(
        &self,
        path: impl IntoIterator<Item = PathEl>,
        stroke: &Stroke,
        antialias: bool,
        caps: TargetCaps,
    ) -> Result<(), Unsupported> {
        if stroke.width != 0.0 {
            return Err(Unsupported::NotHairline);
        }
        if !antialias {
            return Err(Unsupported::NotAntialiased);
        }
        if !caps.fragment_derivatives && has_curves(path) {
            return Err(Unsupported::MissingDerivatives);
        }
        Ok(())
    }

    /// Whether `path` can be drawn with `stroke` on a target with `caps`.
    ///
    /// When this returns `false` the host should use another path renderer.
    pub fn can_draw_path(
        &self,
        path: impl IntoIterator<Item = PathEl>,
        stroke: &Stroke,
        antialias: bool,
        caps: TargetCaps,
    ) -> bool {
        self.check_path(path, stroke, antialias, caps).is_ok()
    }

    /// Tessellates `path` under `transform` and draws it.
    ///
    /// A path that is entirely clipped out, contains non-finite coordinates, or has a
    /// non-invertible perspective transform draws nothing and succeeds. If the vertex buffer
    /// can't be acquired or written, nothing is drawn.
    pub fn draw_path<B: RenderBackend>(
        &mut self,
        backend: &mut B,
        path: impl IntoIterator<Item = PathEl>,
        transform: &Transform,
    ) -> Result<DrawStats> {
        let clip = backend.conservative_clip_bounds();
        let segments = self.flattener.flatten(path, transform, clip);
        if segments.is_empty() {
            return Ok(DrawStats::default());
        }

        let line_count = segments.line_count();
        let quad_count = segments.leaf_quad_count;
        if quad_count > 0 && !backend.caps().fragment_derivatives {
            return Err(Unsupported::MissingDerivatives.into());
        }
        let line_buffer = backend.line_index_buffer();
        let line_indices = match line_buffer {
            Some(shared) => shared.id,
            None if line_count > 0 => return Err(Error::MissingLineIndexBuffer),
            // Not used.
            None => self.quad_indices,
        };
        let line_capacity = line_buffer.map_or(NonZeroUsize::MIN, |shared| shared.capacity);

        self.vertices.clear();
        write_segments(segments, &mut self.vertices);
        debug_assert_eq!(self.vertices.len(), segments.vertex_count());

        let vertex_count = self.vertices.len();
        let mut guard = VertexBufferGuard::acquire(backend, vertex_count)?;
        guard
            .backend
            .write_vertices(guard.id, &self.vertices)
            .map_err(Error::Backend)?;

        let mut stats = DrawStats {
            lines: line_count,
            leaf_quads: quad_count,
            vertices: vertex_count,
            draws: 0,
        };
        let batches = Batches::new(
            line_count,
            quad_count,
            line_capacity,
            self.quad_template.capacity(),
        );
        for batch in batches {
            let draw = IndexedDraw {
                primitive: PrimitiveKind::Triangles,
                edge: batch.edge,
                space: segments.space,
                vertex_buffer: guard.id,
                index_buffer: match batch.edge {
                    EdgeMode::Line => line_indices,
                    EdgeMode::Quad => self.quad_indices,
                },
                start_vertex: batch.start_vertex,
                start_index: 0,
                vertex_count: batch.vertex_count,
                index_count: batch.index_count,
            };
            trace!(
                "hairline draw: {:?} x{} at vertex {}",
                draw.edge,
                batch.primitive_count,
                draw.start_vertex
            );
            guard.backend.draw_indexed(&draw);
            stats.draws += 1;
        }

        debug!(
            "hairline path: {} lines, {} leaf quads, {} vertices, {} draws",
            stats.lines, stats.leaf_quads, stats.vertices, stats.draws
        );
        Ok(stats)
    }
}

fn has_curves(path: impl IntoIterator<Item = PathEl>) -> bool {
    path.into_iter()
        .any(|el| matches!(el, PathEl::QuadTo(..) | PathEl::CurveTo(..)))
}

/// A vertex buffer which is released when dropped.
struct VertexBufferGuard<'a, B: RenderBackend> {
    backend: &'a mut B,
    id: VertexBufferId,
}

impl<'a, B: RenderBackend> VertexBufferGuard<'a, B> {
    fn acquire(backend: &'a mut B, vertex_count: usize) -> Result<Self> {
        let id = backend
            .acquire_vertex_buffer(&Vertex::LAYOUT, vertex_count)
            .map_err(|source| Error::VertexBufferUnavailable {
                vertex_count,
                source,
            })?;
        Ok(Self { backend, id })
    }
}

impl<B: RenderBackend> Drop for VertexBufferGuard<'_, B> {
    fn drop(&mut self) {
        self.backend.release_vertex_buffer(self.id);
    }
}
