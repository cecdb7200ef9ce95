// Copyright 2026 the Hairline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Expanding zero-width lines and quads into thin polygons wide enough to hold the
//! antialiased coverage falloff.
//!
//! Every vertex carries implicit distance data next to its position: a line equation for
//! bloated lines, or the canonical `(u, v)` coordinate for bloated quads. The fragment stage
//! interpolates it and turns it into coverage, see [`crate::coverage`].

use bytemuck::{Pod, Zeroable};
use static_assertions::const_assert_eq;

use crate::flatten::{CoordinateSpace, Segments};
use crate::kurbo::{Line, ParamCurve, Point, QuadBez, Vec2};
use crate::math::{intersect_lines, left_normal, QuadUvMatrix};

/// Vertices emitted per line segment.
pub const VERTS_PER_LINE: usize = 4;
/// Vertices emitted per leaf quad.
pub const VERTS_PER_QUAD: usize = 5;

/// A hairline vertex: a position and four floats of edge data.
///
/// For lines, `edge` is `[a, b, c, 0]` with `a·x + b·y + c = 0` on the centerline and
/// `(a, b)` a unit normal, so that `|a·x + b·y + c|` is the distance to the line.
/// For quads, `edge` is `[u, v, 0, 0]`, the canonical coordinate in which the curve is
/// `u² = v`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct Vertex {
    pub pos: [f32; 2],
    pub edge: [f32; 4],
}

const_assert_eq!(size_of::<Vertex>(), 24);

impl Vertex {
    /// Where zero-length lines are put: far off-screen, so they never produce fragments.
    pub const OFFSCREEN: Self = Self {
        pos: [f32::MAX, f32::MAX],
        edge: [0.0; 4],
    };

    /// The attribute layout hosts should bind vertex buffers with.
    pub const LAYOUT: VertexLayout = VertexLayout {
        stride: size_of::<Self>() as u32,
        attributes: &[
            VertexAttribute {
                format: VertexFormat::Float32x2,
                offset: 0,
                location: 0,
            },
            VertexAttribute {
                format: VertexFormat::Float32x4,
                offset: 8,
                location: 1,
            },
        ],
    };

    fn new(pos: Point, edge: [f64; 4]) -> Self {
        Self {
            pos: [pos.x as f32, pos.y as f32],
            edge: edge.map(|e| e as f32),
        }
    }

    /// The position as a point.
    pub fn position(&self) -> Point {
        Point::new(f64::from(self.pos[0]), f64::from(self.pos[1]))
    }

    /// The `[a, b, c]` line equation of a line vertex.
    pub fn line_equation(&self) -> [f32; 3] {
        [self.edge[0], self.edge[1], self.edge[2]]
    }

    /// The `(u, v)` coordinate of a quad vertex.
    pub fn quad_coord(&self) -> [f32; 2] {
        [self.edge[0], self.edge[1]]
    }
}

/// The data type of one vertex attribute.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum VertexFormat {
    Float32x2,
    Float32x4,
}

/// One vertex attribute within a [`VertexLayout`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct VertexAttribute {
    pub format: VertexFormat,
    /// Byte offset within the vertex.
    pub offset: u32,
    /// Shader location.
    pub location: u32,
}

/// How a vertex buffer of [`Vertex`] is laid out.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct VertexLayout {
    /// Bytes between consecutive vertices.
    pub stride: u32,
    pub attributes: &'static [VertexAttribute],
}

/// The normal of a line segment, or the fact that it has none.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum LineNormal {
    /// The endpoints coincide.
    Degenerate,
    /// The left-hand unit normal of `p0 → p1`.
    Valid(Vec2),
}

impl LineNormal {
    /// Computes the normal of the segment `p0 → p1`.
    pub fn new(p0: Point, p1: Point) -> Self {
        let d = p1 - p0;
        let len = d.hypot();
        if len > 0.0 && len.is_finite() {
            Self::Valid(left_normal(d / len))
        } else {
            Self::Degenerate
        }
    }
}

/// Appends the four vertices of a bloated line.
///
/// `line` is in device space. Under [`CoordinateSpace::Source`] the positions are mapped
/// back to source space while the line equation stays in device space.
pub fn add_line(line: &Line, space: &CoordinateSpace, out: &mut Vec<Vertex>) {
    let (a, b) = (line.p0, line.p1);
    let n = match LineNormal::new(a, b) {
        LineNormal::Valid(n) => n,
        LineNormal::Degenerate => {
            // Keep the vertex count so batch indexing stays valid.
            out.extend([Vertex::OFFSCREEN; VERTS_PER_LINE]);
            return;
        }
    };

    let c = -a.to_vec2().dot(n);
    let edge = [n.x, n.y, c, 0.0];
    let mut positions = [a - n, a + n, b + n, b - n];
    if let CoordinateSpace::Source { to_source, .. } = space {
        positions = to_source.map_points(positions);
    }
    out.extend(positions.map(|p| Vertex::new(p, edge)));
}

/// Appends the five vertices of a bloated leaf quad.
///
/// The control points `pts` are in device space, or in source space under
/// [`CoordinateSpace::Source`]. The polygon is built in device space:
///
/// ```text
///   before       |        after
///                |              b0
///         b      |
///                |
///                |     a0            c0
/// a         c    |        a1       c1
/// ```
///
/// Edges `a0 → b0` and `b0 → c0` are parallel to `a → b` and `c → b`, one pixel out.
/// Vertices are written in the order `a0, a1, b0, c0, c1`.
pub fn bloat_quad(pts: &[Point; 3], space: &CoordinateSpace, out: &mut Vec<Vertex>) {
    // The uv mapping is taken in the space of the control points, which is source space
    // under perspective.
    let uv = QuadUvMatrix::new(pts[0], pts[1], pts[2]);

    let [a, b, c] = match space {
        CoordinateSpace::Device => *pts,
        CoordinateSpace::Source { to_device, .. } => to_device.map_points(*pts),
    };

    let ac = c - a;

    let ab = (b - a).normalize();
    let mut ab_n = left_normal(ab);
    if ab_n.dot(ac) > 0.0 {
        ab_n = -ab_n;
    }

    let cb = (b - c).normalize();
    let mut cb_n = left_normal(cb);
    if cb_n.dot(ac) < 0.0 {
        cb_n = -cb_n;
    }

    let a0 = a + ab_n;
    let a1 = a - ab_n;
    let c0 = c + cb_n;
    let c1 = c - cb_n;
    // Parallel edges were filtered out by the classifier.
    let b0 = intersect_lines(a0, ab_n, c0, cb_n).unwrap_or(b);

    let mut positions = [a0, a1, b0, c0, c1];
    if let CoordinateSpace::Source { to_source, .. } = space {
        positions = to_source.map_points(positions);
    }
    out.extend(positions.map(|p| {
        let q = uv.map(p);
        Vertex::new(p, [q.x, q.y, 0.0, 0.0])
    }));
}

/// Halves `pts` `level` times and bloats every leaf, appending `5 · 2^level` vertices.
pub fn add_quads(pts: &[Point; 3], level: u32, space: &CoordinateSpace, out: &mut Vec<Vertex>) {
    for_each_leaf(QuadBez::new(pts[0], pts[1], pts[2]), level, &mut |leaf| {
        bloat_quad(&[leaf.p0, leaf.p1, leaf.p2], space, out);
    });
}

/// Calls `f` on the leaves of a binary chop of depth `level`, in curve order.
pub(crate) fn for_each_leaf(quad: QuadBez, level: u32, f: &mut impl FnMut(QuadBez)) {
    if level == 0 {
        f(quad);
    } else {
        let (left, right) = quad.subdivide();
        for_each_leaf(left, level - 1, f);
        for_each_leaf(right, level - 1, f);
    }
}

/// Appends the bloated geometry of all `segments`: lines first, then leaf quads.
///
/// Appends exactly [`Segments::vertex_count`] vertices.
pub fn write_segments(segments: &Segments, out: &mut Vec<Vertex>) {
    out.reserve(segments.vertex_count());
    for line in &segments.lines {
        add_line(line, &segments.space, out);
    }
    for quad in &segments.quads {
        add_quads(&quad.points, quad.level, &segments.space, out);
    }
}
