// Copyright 2026 the Hairline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Sorting a path into line segments and quadratics ready to be bloated.
//!
//! Lines are always recorded in device space, where the bloat accounts for the one pixel
//! thickness. Quads are recorded in device space unless the transform has perspective,
//! in which case they stay in source space: large quads get subdivided to reduce
//! overfill, and that subdivision has to happen before the perspective divide.

use log::warn;
use smallvec::SmallVec;

use crate::classify::{classify_quad, Subdivision, Tolerances};
use crate::clip::IntRect;
use crate::kurbo::{CubicBez, Line, ParamCurve, PathEl, Point, QuadBez, Rect};
use crate::math::Transform;

/// How far a hairline reaches past its centerline, in device pixels.
pub const BLOAT_OUTSET: f64 = 1.0;

/// The accuracy, in device pixels, of the cubic to quadratic conversion.
pub const CUBIC_TOLERANCE: f64 = 1.0;

/// The most quads one cubic is converted to.
///
/// Normal curves need far fewer. Huge control points, or a perspective transform that
/// shrinks the source-space tolerance to almost nothing, would otherwise ask for billions.
pub const MAX_QUADS_PER_CUBIC: usize = 16;

/// Quads produced by converting one cubic.
type QuadBuf = SmallVec<[QuadBez; MAX_QUADS_PER_CUBIC]>;

/// The space the bloated vertex positions are expressed in.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub enum CoordinateSpace {
    /// Positions are in device pixels; the host draws them without a view matrix.
    #[default]
    Device,
    /// The transform has perspective: quads were kept in source space, and every bloated
    /// position is mapped back to source space so the host can apply the full projective
    /// transform at raster time.
    Source {
        /// The path's transform.
        to_device: Transform,
        /// Its inverse.
        to_source: Transform,
    },
}

impl CoordinateSpace {
    /// Whether vertex positions need the view transform applied by the host.
    pub fn is_source(&self) -> bool {
        matches!(self, Self::Source { .. })
    }
}

/// A quadratic kept for bloating, together with its subdivision level.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct QuadSegment {
    /// Control points, in the space given by [`Segments::space`].
    pub points: [Point; 3],
    /// How many times to halve the curve, `0..=MAX_SUBDIVISIONS`.
    ///
    /// [`MAX_SUBDIVISIONS`]: crate::classify::MAX_SUBDIVISIONS
    pub level: u32,
}

impl QuadSegment {
    /// The number of leaf quads this segment expands to.
    pub fn leaf_count(&self) -> usize {
        1 << self.level
    }
}

/// The line and quad lists of one path.
#[derive(Clone, Debug, Default)]
pub struct Segments {
    /// Device-space line segments.
    pub lines: Vec<Line>,
    /// Quads with their subdivision levels.
    pub quads: Vec<QuadSegment>,
    /// `Σ 2^level` over `quads`.
    pub leaf_quad_count: usize,
    /// The space quads and bloated positions are expressed in.
    pub space: CoordinateSpace,
}

impl Segments {
    /// Removes all segments and resets the coordinate space.
    pub fn clear(&mut self) {
        self.lines.clear();
        self.quads.clear();
        self.leaf_quad_count = 0;
        self.space = CoordinateSpace::Device;
    }

    /// Whether there is nothing to draw.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty() && self.quads.is_empty()
    }

    /// The number of line segments.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// The number of vertices the bloated geometry needs.
    pub fn vertex_count(&self) -> usize {
        crate::bloat::VERTS_PER_LINE * self.lines.len()
            + crate::bloat::VERTS_PER_QUAD * self.leaf_quad_count
    }

    /// The number of indices used to draw the bloated geometry.
    pub fn index_count(&self) -> usize {
        crate::index::INDICES_PER_LINE * self.lines.len()
            + crate::index::INDICES_PER_QUAD * self.leaf_quad_count
    }
}

/// Walks paths and produces their [`Segments`].
///
/// The flattener keeps its buffers between paths to avoid reallocating, but every call to
/// [`Flattener::flatten`] starts from scratch.
#[derive(Clone, Debug, Default)]
pub struct Flattener {
    tolerances: Tolerances,
    segments: Segments,
}

impl Flattener {
    /// Creates a flattener with the given classifier tolerances.
    pub fn new(tolerances: Tolerances) -> Self {
        Self {
            tolerances,
            segments: Segments::default(),
        }
    }

    /// The classifier tolerances.
    pub fn tolerances(&self) -> &Tolerances {
        &self.tolerances
    }

    /// The segments produced by the last call to [`Flattener::flatten`].
    pub fn segments(&self) -> &Segments {
        &self.segments
    }

    /// Flattens `path` under `transform`, rejecting segments whose bloated bounds miss `clip`.
    ///
    /// A path containing non-finite coordinates, or a perspective transform that cannot be
    /// inverted, produces no segments.
    pub fn flatten(
        &mut self,
        path: impl IntoIterator<Item = PathEl>,
        transform: &Transform,
        clip: IntRect,
    ) -> &Segments {
        self.segments.clear();

        if transform.has_perspective() {
            let Some(to_source) = transform.invert() else {
                warn!("A hairline path has a non-invertible perspective transform, ignoring it.");
                return &self.segments;
            };
            self.segments.space = CoordinateSpace::Source {
                to_device: *transform,
                to_source,
            };
        }

        let mut walker = Walker {
            segments: &mut self.segments,
            tolerances: &self.tolerances,
            transform,
            persp: transform.has_perspective(),
            clip,
        };

        let mut start = Point::ZERO;
        let mut last = Point::ZERO;
        let mut is_nan = false;

        for el in path {
            match el {
                PathEl::MoveTo(p) => {
                    is_nan |= !is_finite(p);
                    start = p;
                    last = p;
                }
                PathEl::LineTo(p) => {
                    is_nan |= !is_finite(p);
                    walker.line(last, p);
                    last = p;
                }
                PathEl::QuadTo(p1, p2) => {
                    is_nan |= !is_finite(p1) || !is_finite(p2);
                    walker.quad([last, p1, p2]);
                    last = p2;
                }
                PathEl::CurveTo(p1, p2, p3) => {
                    is_nan |= !is_finite(p1) || !is_finite(p2) || !is_finite(p3);
                    walker.cubic([last, p1, p2, p3]);
                    last = p3;
                }
                PathEl::ClosePath => {
                    // The closing edge is an implicit line back to the subpath start.
                    if last != start {
                        walker.line(last, start);
                    }
                    last = start;
                }
            }
        }

        // A path that contains NaN is ill-defined, so ignore it.
        if is_nan {
            warn!("A hairline path contains NaN, ignoring it.");
            self.segments.clear();
        }

        &self.segments
    }
}

fn is_finite(p: Point) -> bool {
    p.x.is_finite() && p.y.is_finite()
}

struct Walker<'a> {
    segments: &'a mut Segments,
    tolerances: &'a Tolerances,
    transform: &'a Transform,
    persp: bool,
    clip: IntRect,
}

impl Walker<'_> {
    fn visible(&self, device_pts: &[Point]) -> bool {
        IntRect::bloated_bounds(device_pts, BLOAT_OUTSET)
            .is_some_and(|bounds| bounds.intersects(&self.clip))
    }

    fn line(&mut self, p0: Point, p1: Point) {
        let dev = self.transform.map_points([p0, p1]);
        if self.visible(&dev) {
            self.segments.lines.push(Line::new(dev[0], dev[1]));
        }
    }

    fn quad(&mut self, src: [Point; 3]) {
        let dev = self.transform.map_points(src);
        self.push_quad(&src, &dev);
    }

    /// Bounds-checks and classifies one quad. `src` is only kept under perspective.
    fn push_quad(&mut self, src: &[Point; 3], dev: &[Point; 3]) {
        if !self.visible(dev) {
            return;
        }
        match classify_quad(dev, self.tolerances) {
            Subdivision::Degenerate => {
                self.segments.lines.push(Line::new(dev[0], dev[1]));
                self.segments.lines.push(Line::new(dev[1], dev[2]));
            }
            Subdivision::Level(level) => {
                let points = if self.persp { *src } else { *dev };
                let quad = QuadSegment { points, level };
                self.segments.leaf_quad_count += quad.leaf_count();
                self.segments.quads.push(quad);
            }
        }
    }

    fn cubic(&mut self, src: [Point; 4]) {
        let dev = self.transform.map_points(src);
        if !self.visible(&dev) {
            return;
        }

        // Under perspective the conversion has to happen in source space, with the
        // tolerance scaled to match.
        let (cubic, tolerance) = if self.persp {
            let bounds = src[1..]
                .iter()
                .fold(Rect::from_points(src[0], src[0]), |r, p| r.union_pt(*p));
            (
                CubicBez::new(src[0], src[1], src[2], src[3]),
                self.transform.tolerance_to_source(CUBIC_TOLERANCE, bounds),
            )
        } else {
            (
                CubicBez::new(dev[0], dev[1], dev[2], dev[3]),
                CUBIC_TOLERANCE,
            )
        };

        for q in cubic_to_quads(&cubic, tolerance) {
            let pts = [q.p0, q.p1, q.p2];
            if self.persp {
                let dev = self.transform.map_points(pts);
                self.push_quad(&pts, &dev);
            } else {
                self.push_quad(&pts, &pts);
            }
        }
    }
}

/// Splits `cubic` evenly into quads approximating it within `accuracy`, using at most
/// [`MAX_QUADS_PER_CUBIC`] of them.
///
/// The approximation error of each piece scales with the third derivative, which is
/// constant along the cubic, and falls with the cube of the number of pieces.
fn cubic_to_quads(cubic: &CubicBez, accuracy: f64) -> QuadBuf {
    // 432 is (36 / sqrt(3))², the bound on the error of the midpoint quad.
    let max_hypot2 = 432.0 * accuracy * accuracy;
    let p1x2 = 3.0 * cubic.p1.to_vec2() - cubic.p0.to_vec2();
    let p2x2 = 3.0 * cubic.p2.to_vec2() - cubic.p3.to_vec2();
    let err = (p2x2 - p1x2).hypot2();
    // `as` saturates and maps NaN to zero.
    let n = (err / max_hypot2).powf(1.0 / 6.0).ceil() as usize;
    let n = n.clamp(1, MAX_QUADS_PER_CUBIC);

    (0..n)
        .map(|i| {
            let seg = cubic.subsegment(i as f64 / n as f64..(i + 1) as f64 / n as f64);
            let p1x2 = 3.0 * seg.p1.to_vec2() - seg.p0.to_vec2();
            let p2x2 = 3.0 * seg.p2.to_vec2() - seg.p3.to_vec2();
            QuadBez::new(seg.p0, ((p1x2 + p2x2) / 4.0).to_point(), seg.p3)
        })
        .collect()
}
