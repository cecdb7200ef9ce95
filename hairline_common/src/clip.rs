// Copyright 2026 the Hairline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Conservative device-space clip rectangles.

use crate::kurbo::{Point, Rect};

/// An axis-aligned integer rectangle in device space, `[x0, x1) × [y0, y1)`.
///
/// Used for the conservative clip bounds of a render target. A conservative bound may
/// be larger than the real clip, never smaller.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct IntRect {
    pub x0: i32,
    pub y0: i32,
    pub x1: i32,
    pub y1: i32,
}

impl IntRect {
    /// Creates a rectangle from its edges.
    pub const fn new(x0: i32, y0: i32, x1: i32, y1: i32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// The rectangle covering a `width × height` render target.
    pub const fn from_size(width: u32, height: u32) -> Self {
        Self::new(0, 0, saturate(width), saturate(height))
    }

    /// Whether the rectangle contains no pixels.
    pub fn is_empty(&self) -> bool {
        self.x0 >= self.x1 || self.y0 >= self.y1
    }

    /// Whether the two rectangles share at least one pixel.
    pub fn intersects(&self, other: &Self) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && self.x0 < other.x1
            && other.x0 < self.x1
            && self.y0 < other.y1
            && other.y0 < self.y1
    }

    /// Rounds a float rectangle outwards to the smallest enclosing integer rectangle.
    pub fn round_out(rect: Rect) -> Self {
        let r = rect.abs().expand();
        Self::new(
            clamp_to_i32(r.x0),
            clamp_to_i32(r.y0),
            clamp_to_i32(r.x1),
            clamp_to_i32(r.y1),
        )
    }

    /// The bounds of `points`, outset by `outset` on every side and rounded out.
    ///
    /// This is the footprint of a bloated hairline segment with control points `points`.
    pub fn bloated_bounds(points: &[Point], outset: f64) -> Option<Self> {
        let (first, rest) = points.split_first()?;
        let bounds = rest
            .iter()
            .fold(Rect::from_points(*first, *first), |r, p| r.union_pt(*p));
        Some(Self::round_out(bounds.inflate(outset, outset)))
    }
}

const fn saturate(v: u32) -> i32 {
    if v > i32::MAX as u32 {
        i32::MAX
    } else {
        v as i32
    }
}

fn clamp_to_i32(v: f64) -> i32 {
    // `as` saturates and maps NaN to zero.
    v as i32
}
