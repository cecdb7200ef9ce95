// Copyright 2026 the Hairline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Projective transforms and the small amount of line geometry the bloater needs.

use core::ops::Mul;

use crate::kurbo::{Affine, Point, Rect, Vec2};

/// The determinant below which a control triangle is treated as degenerate.
const NEARLY_ZERO_DET: f64 = 1.0 / (4096.0 * 4096.0);

/// A 2D projective transform stored as a row-major 3x3 matrix.
///
/// Unlike [`Affine`], this can carry perspective in its last row. Points are mapped as
/// `(x, y, 1)` column vectors and divided by the resulting homogeneous `w`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Transform {
    /// `[scale_x, skew_x, trans_x, skew_y, scale_y, trans_y, persp_0, persp_1, persp_2]`.
    pub coeffs: [f64; 9],
}

impl Transform {
    /// Identity transform.
    pub const IDENTITY: Self = Self {
        coeffs: [1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0],
    };

    /// Creates a transform from its row-major coefficients.
    pub const fn new(coeffs: [f64; 9]) -> Self {
        Self { coeffs }
    }

    /// Creates a transform from a kurbo affine matrix.
    pub fn from_affine(affine: Affine) -> Self {
        let [a, b, c, d, e, f] = affine.as_coeffs();
        Self::new([a, c, e, b, d, f, 0.0, 0.0, 1.0])
    }

    /// Converts the transform to a kurbo affine matrix, if it has no perspective.
    pub fn to_affine(&self) -> Option<Affine> {
        if self.has_perspective() {
            return None;
        }
        let m = &self.coeffs;
        Some(Affine::new([m[0], m[3], m[1], m[4], m[2], m[5]]))
    }

    /// Whether the last row differs from `[0, 0, 1]`.
    pub fn has_perspective(&self) -> bool {
        let m = &self.coeffs;
        m[6] != 0.0 || m[7] != 0.0 || m[8] != 1.0
    }

    /// Maps a point, dividing by the homogeneous coordinate when there is perspective.
    #[inline]
    pub fn map_point(&self, p: Point) -> Point {
        let m = &self.coeffs;
        let x = m[0] * p.x + m[1] * p.y + m[2];
        let y = m[3] * p.x + m[4] * p.y + m[5];
        if !self.has_perspective() {
            return Point::new(x, y);
        }
        let w = m[6] * p.x + m[7] * p.y + m[8];
        if w == 0.0 {
            Point::new(x, y)
        } else {
            Point::new(x / w, y / w)
        }
    }

    /// Maps a fixed-size array of points.
    pub fn map_points<const N: usize>(&self, pts: [Point; N]) -> [Point; N] {
        pts.map(|p| self.map_point(p))
    }

    /// Computes the inverse transform, or `None` when the matrix is singular.
    pub fn invert(&self) -> Option<Self> {
        let m = &self.coeffs;
        // Cofactors of the first column, reused for the determinant.
        let c00 = m[4] * m[8] - m[5] * m[7];
        let c10 = m[5] * m[6] - m[3] * m[8];
        let c20 = m[3] * m[7] - m[4] * m[6];
        let det = m[0] * c00 + m[1] * c10 + m[2] * c20;
        if !det.is_finite() || det.abs() <= f64::EPSILON * f64::EPSILON {
            return None;
        }
        let inv_det = det.recip();
        let inv = [
            c00,
            m[2] * m[7] - m[1] * m[8],
            m[1] * m[5] - m[2] * m[4],
            c10,
            m[0] * m[8] - m[2] * m[6],
            m[2] * m[3] - m[0] * m[5],
            c20,
            m[1] * m[6] - m[0] * m[7],
            m[0] * m[4] - m[1] * m[3],
        ]
        .map(|c| c * inv_det);
        let mut result = Self::new(inv);
        // Keep affine inverses exactly affine.
        if !self.has_perspective() {
            result.coeffs[6] = 0.0;
            result.coeffs[7] = 0.0;
            result.coeffs[8] = 1.0;
        }
        Some(result)
    }

    /// The largest factor by which this transform can stretch a unit vector.
    ///
    /// Returns `None` under perspective, where the stretch depends on the position.
    pub fn max_scale(&self) -> Option<f64> {
        if self.has_perspective() {
            return None;
        }
        let m = &self.coeffs;
        let (a, b, c, d) = (m[0], m[3], m[1], m[4]);
        let sum = a * a + b * b + c * c + d * d;
        let det = a * d - b * c;
        let disc = (sum * sum - 4.0 * det * det).max(0.0).sqrt();
        Some(((sum + disc) * 0.5).sqrt())
    }

    /// The geometric mean of the lengths of the axis vectors of length `radius` mapped at `at`.
    pub fn map_radius(&self, at: Point, radius: f64) -> f64 {
        let origin = self.map_point(at);
        let dx = self.map_point(at + Vec2::new(radius, 0.0)) - origin;
        let dy = self.map_point(at + Vec2::new(0.0, radius)) - origin;
        (dx.hypot() * dy.hypot()).sqrt()
    }

    /// Converts a tolerance in device pixels to the equivalent tolerance in source space
    /// for geometry inside `source_bounds`.
    ///
    /// Under perspective this takes the worst stretch among the four corners of the bounds.
    pub fn tolerance_to_source(&self, device_tolerance: f64, source_bounds: Rect) -> f64 {
        let stretch = self.max_scale().unwrap_or_else(|| {
            [
                Point::new(source_bounds.x0, source_bounds.y0),
                Point::new(source_bounds.x1, source_bounds.y0),
                Point::new(source_bounds.x0, source_bounds.y1),
                Point::new(source_bounds.x1, source_bounds.y1),
            ]
            .into_iter()
            .map(|corner| self.map_radius(corner, 1.0))
            .fold(0.0, f64::max)
        });
        if stretch.is_finite() && stretch > 0.0 {
            device_tolerance / stretch
        } else {
            device_tolerance
        }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl From<Affine> for Transform {
    fn from(affine: Affine) -> Self {
        Self::from_affine(affine)
    }
}

impl Mul for Transform {
    type Output = Self;

    /// `(self * other)` maps by `other` first, then by `self`.
    #[inline]
    fn mul(self, other: Self) -> Self {
        let a = &self.coeffs;
        let b = &other.coeffs;
        let mut out = [0.0; 9];
        for row in 0..3 {
            for col in 0..3 {
                out[row * 3 + col] = a[row * 3] * b[col]
                    + a[row * 3 + 1] * b[3 + col]
                    + a[row * 3 + 2] * b[6 + col];
            }
        }
        Self::new(out)
    }
}

impl Mul<Point> for Transform {
    type Output = Point;

    #[inline]
    fn mul(self, p: Point) -> Point {
        self.map_point(p)
    }
}

/// The left-hand orthogonal of `v`, `(y, -x)`.
#[inline]
pub fn left_normal(v: Vec2) -> Vec2 {
    Vec2::new(v.y, -v.x)
}

/// Squared distance from `p` to the infinite line through `a` and `b`.
///
/// When `a` and `b` coincide this is the squared distance to that point.
pub fn distance_to_line_squared(p: Point, a: Point, b: Point) -> f64 {
    let u = b - a;
    let v = p - a;
    let len_sq = u.hypot2();
    if len_sq == 0.0 {
        return v.hypot2();
    }
    let det = u.cross(v);
    det * det / len_sq
}

/// Intersects the line through `pt_a` with normal `norm_a` and the line through `pt_b`
/// with normal `norm_b`.
///
/// Returns `None` if the lines are parallel.
pub fn intersect_lines(pt_a: Point, norm_a: Vec2, pt_b: Point, norm_b: Vec2) -> Option<Point> {
    let w_a = -norm_a.dot(pt_a.to_vec2());
    let w_b = -norm_b.dot(pt_b.to_vec2());
    let det = norm_a.x * norm_b.y - norm_a.y * norm_b.x;
    if det == 0.0 || !det.is_finite() {
        return None;
    }
    let inv = det.recip();
    Some(Point::new(
        (norm_a.y * w_b - w_a * norm_b.y) * inv,
        (w_a * norm_b.x - norm_a.x * w_b) * inv,
    ))
}

/// The affine map from a quadratic's plane into canonical `(u, v)` coordinates,
/// in which the curve satisfies `u² = v`.
///
/// The control points map to `(0, 0)`, `(1/2, 0)` and `(1, 1)`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct QuadUvMatrix {
    /// Rows `[u_x, u_y, u_0]` and `[v_x, v_y, v_0]`.
    m: [f64; 6],
}

impl QuadUvMatrix {
    /// Builds the mapping for the control triangle `p0, p1, p2`.
    pub fn new(p0: Point, p1: Point, p2: Point) -> Self {
        let (x0, y0) = (p0.x, p0.y);
        let (x1, y1) = (p1.x, p1.y);
        let (x2, y2) = (p2.x, p2.y);
        let det = x0 * y1 - y0 * x1 + x2 * y0 - y2 * x0 + x1 * y2 - x2 * y1;

        if !det.is_finite() || det.abs() <= NEARLY_ZERO_DET {
            return Self::degenerate([p0, p1, p2]);
        }

        // uv = [0 1/2 1; 0 0 1] * adjugate(control points), scaled by 1/det last.
        let scale = det.recip();
        let a3 = y2 - y0;
        let a4 = x0 - x2;
        let a5 = x2 * y0 - x0 * y2;
        let a6 = y0 - y1;
        let a7 = x1 - x0;
        let a8 = x0 * y1 - x1 * y0;

        Self {
            m: [
                (0.5 * a3 + a6) * scale,
                (0.5 * a4 + a7) * scale,
                (0.5 * a5 + a8) * scale,
                a6 * scale,
                a7 * scale,
                a8 * scale,
            ],
        }
    }

    /// Collinear control points: `u = 0` and `v` is the signed distance to the line
    /// through the two points that are farthest apart.
    fn degenerate(pts: [Point; 3]) -> Self {
        let mut max_edge = 0;
        let mut max_d = pts[0].distance_squared(pts[1]);
        for edge in 1..3 {
            let d = pts[edge].distance_squared(pts[(edge + 1) % 3]);
            if d > max_d {
                max_d = d;
                max_edge = edge;
            }
        }
        if max_d > 0.0 {
            let line = (pts[(max_edge + 1) % 3] - pts[max_edge]).normalize();
            let n = left_normal(line);
            Self {
                m: [0.0, 0.0, 0.0, n.x, n.y, -n.dot(pts[max_edge].to_vec2())],
            }
        } else {
            // A point covers no area; keep (u, v) far away from the curve.
            Self {
                m: [0.0, 0.0, 100.0, 0.0, 0.0, 100.0],
            }
        }
    }

    /// The screen-space derivatives `(d(u, v)/dx, d(u, v)/dy)`, constant since the map is affine.
    pub fn derivatives(&self) -> (Vec2, Vec2) {
        let m = &self.m;
        (Vec2::new(m[0], m[3]), Vec2::new(m[1], m[4]))
    }

    /// Maps `p` to `(u, v)`, returned as a point.
    #[inline]
    pub fn map(&self, p: Point) -> Point {
        let m = &self.m;
        Point::new(
            m[0] * p.x + m[1] * p.y + m[2],
            m[3] * p.x + m[4] * p.y + m[5],
        )
    }
}
