// Copyright 2026 the Hairline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Fixed index patterns for batched triangle-list draws of bloated lines and quads.
//!
//! Every bloated primitive has the same triangulation, so a single index buffer holding
//! the pattern for `capacity` consecutive primitives serves every draw of up to that many
//! primitives. Nothing is regenerated per draw.

use std::num::NonZeroUsize;
use std::sync::Arc;

use crate::bloat::{VERTS_PER_LINE, VERTS_PER_QUAD};

/// Indices per bloated line: two triangles.
pub const INDICES_PER_LINE: usize = 6;
/// Indices per bloated leaf quad: three triangles.
pub const INDICES_PER_QUAD: usize = 9;

/// The default number of quads in the quad index template.
pub const QUADS_PER_INDEX_BUFFER: usize = 256;

/// Each quad is a five sided polygon `a0, a1, b0, c0, c1` (see
/// [`bloat_quad`](crate::bloat::bloat_quad)), drawn as the triangles
/// `(a0, a1, b0)`, `(b0, c1, c0)` and `(a1, c1, b0)`.
const QUAD_PATTERN: [u16; INDICES_PER_QUAD] = [0, 1, 2, 2, 4, 3, 1, 4, 2];

/// Each line is the quad `a - n, a + n, b + n, b - n`.
const LINE_PATTERN: [u16; INDICES_PER_LINE] = [0, 1, 2, 0, 2, 3];

/// The primitive an [`IndexTemplate`] triangulates.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TemplateKind {
    Lines,
    Quads,
}

impl TemplateKind {
    /// Vertices per primitive.
    pub const fn vertices_per_primitive(self) -> usize {
        match self {
            Self::Lines => VERTS_PER_LINE,
            Self::Quads => VERTS_PER_QUAD,
        }
    }

    /// Indices per primitive.
    pub const fn indices_per_primitive(self) -> usize {
        match self {
            Self::Lines => INDICES_PER_LINE,
            Self::Quads => INDICES_PER_QUAD,
        }
    }

    fn pattern(self) -> &'static [u16] {
        match self {
            Self::Lines => &LINE_PATTERN,
            Self::Quads => &QUAD_PATTERN,
        }
    }
}

/// A read-only index pattern replicated for `capacity` primitives.
///
/// Cloning shares the underlying storage.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IndexTemplate {
    kind: TemplateKind,
    capacity: NonZeroUsize,
    indices: Arc<[u16]>,
}

impl IndexTemplate {
    /// The index pattern for `capacity` bloated quads.
    ///
    /// Returns `None` if `capacity` is zero or the vertex indices would not fit in `u16`.
    pub fn quads(capacity: usize) -> Option<Self> {
        Self::build(TemplateKind::Quads, capacity)
    }

    /// The index pattern for `capacity` bloated lines.
    ///
    /// Returns `None` if `capacity` is zero or the vertex indices would not fit in `u16`.
    pub fn lines(capacity: usize) -> Option<Self> {
        Self::build(TemplateKind::Lines, capacity)
    }

    fn build(kind: TemplateKind, capacity: usize) -> Option<Self> {
        let verts = kind.vertices_per_primitive();
        let nonzero = NonZeroUsize::new(capacity)?;
        if capacity * verts > usize::from(u16::MAX) + 1 {
            return None;
        }
        let pattern = kind.pattern();
        let mut indices = Vec::with_capacity(capacity * pattern.len());
        for i in 0..capacity {
            // Fits by the check above.
            let base = (i * verts) as u16;
            indices.extend(pattern.iter().map(|&idx| base + idx));
        }
        Some(Self {
            kind,
            capacity: nonzero,
            indices: indices.into(),
        })
    }

    /// The primitive this template triangulates.
    pub fn kind(&self) -> TemplateKind {
        self.kind
    }

    /// The number of primitives one draw can cover.
    pub fn capacity(&self) -> NonZeroUsize {
        self.capacity
    }

    /// The indices, `capacity · indices_per_primitive` of them.
    pub fn indices(&self) -> &[u16] {
        &self.indices
    }

    /// The indices as bytes, for uploading.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }
}
