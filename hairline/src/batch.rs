// Copyright 2026 the Hairline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Splitting a path's bloated geometry into draws that fit the index templates.

use std::num::NonZeroUsize;

use hairline_common::bloat::{VERTS_PER_LINE, VERTS_PER_QUAD};
use hairline_common::index::{INDICES_PER_LINE, INDICES_PER_QUAD};

use crate::EdgeMode;

/// One draw over a contiguous run of lines or leaf quads.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DrawBatch {
    pub edge: EdgeMode,
    /// Index of the first line or leaf quad, counted within its own kind.
    pub first_primitive: usize,
    pub primitive_count: usize,
    /// Offset of the first vertex in the path's vertex buffer.
    pub start_vertex: usize,
    pub vertex_count: usize,
    /// Indices used from the start of the template.
    pub index_count: usize,
}

/// Iterator over the [`DrawBatch`]es of one path.
///
/// The vertex buffer holds all lines first, then all leaf quads, so the line batches come
/// first and quad batches start at `4 · line_count`.
#[derive(Clone, Debug)]
pub struct Batches {
    line_count: usize,
    quad_count: usize,
    line_capacity: NonZeroUsize,
    quad_capacity: NonZeroUsize,
    lines_done: usize,
    quads_done: usize,
}

impl Batches {
    /// Batches `line_count` lines and `quad_count` leaf quads, at most `line_capacity` and
    /// `quad_capacity` per draw.
    pub fn new(
        line_count: usize,
        quad_count: usize,
        line_capacity: NonZeroUsize,
        quad_capacity: NonZeroUsize,
    ) -> Self {
        Self {
            line_count,
            quad_count,
            line_capacity,
            quad_capacity,
            lines_done: 0,
            quads_done: 0,
        }
    }
}

impl Iterator for Batches {
    type Item = DrawBatch;

    fn next(&mut self) -> Option<DrawBatch> {
        if self.lines_done < self.line_count {
            let n = (self.line_count - self.lines_done).min(self.line_capacity.get());
            let batch = DrawBatch {
                edge: EdgeMode::Line,
                first_primitive: self.lines_done,
                primitive_count: n,
                start_vertex: VERTS_PER_LINE * self.lines_done,
                vertex_count: VERTS_PER_LINE * n,
                index_count: INDICES_PER_LINE * n,
            };
            self.lines_done += n;
            return Some(batch);
        }
        if self.quads_done < self.quad_count {
            let n = (self.quad_count - self.quads_done).min(self.quad_capacity.get());
            let batch = DrawBatch {
                edge: EdgeMode::Quad,
                first_primitive: self.quads_done,
                primitive_count: n,
                start_vertex: VERTS_PER_LINE * self.line_count + VERTS_PER_QUAD * self.quads_done,
                vertex_count: VERTS_PER_QUAD * n,
                index_count: INDICES_PER_QUAD * n,
            };
            self.quads_done += n;
            return Some(batch);
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let lines = (self.line_count - self.lines_done).div_ceil(self.line_capacity.get());
        let quads = (self.quad_count - self.quads_done).div_ceil(self.quad_capacity.get());
        (lines + quads, Some(lines + quads))
    }
}

impl ExactSizeIterator for Batches {}
