// Copyright 2026 the Hairline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Reference CPU evaluation of the hairline coverage functions.
//!
//! These mirror what the fragment stage computes from the interpolated vertex edge data.
//! They are used to check the bloated geometry, and can stand in for the shaders when
//! debugging a host.

use crate::kurbo::{Point, Vec2};
use crate::math::QuadUvMatrix;

/// Coverage of a device pixel at `frag` by a bloated line with equation `[a, b, c]`:
/// `max(0, 1 - |a·x + b·y + c|)`.
pub fn line_coverage(equation: [f32; 3], frag: Point) -> f64 {
    let [a, b, c] = equation.map(f64::from);
    (1.0 - (a * frag.x + b * frag.y + c).abs()).max(0.0)
}

/// Coverage from an interpolated quad coordinate and its screen-space derivatives.
///
/// The implicit function `f = u² - v` is divided by the length of its gradient
/// `(2u·du/dx - dv/dx, 2u·du/dy - dv/dy)` to approximate the distance to the curve, and
/// the result is `max(0, 1 - distance)`.
pub fn quad_coverage(uv: Point, duv_dx: Vec2, duv_dy: Vec2) -> f64 {
    let gradient = Vec2::new(
        2.0 * uv.x * duv_dx.x - duv_dx.y,
        2.0 * uv.x * duv_dy.x - duv_dy.y,
    );
    let f = uv.x * uv.x - uv.y;
    let len_sq = gradient.hypot2();
    if len_sq == 0.0 {
        return if f == 0.0 { 1.0 } else { 0.0 };
    }
    let distance = (f * f / len_sq).sqrt();
    (1.0 - distance).max(0.0)
}

/// Coverage of the device pixel at `frag` by the quad whose uv mapping is `uv`.
pub fn quad_coverage_at(uv: &QuadUvMatrix, frag: Point) -> f64 {
    let (dx, dy) = uv.derivatives();
    quad_coverage(uv.map(frag), dx, dy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kurbo::{ParamCurve, ParamCurveDeriv, QuadBez};

    #[test]
    fn line_falloff() {
        // y = 0 with unit normal (0, -1).
        let eq = [0.0, -1.0, 0.0];
        assert_eq!(line_coverage(eq, Point::new(3.0, 0.0)), 1.0);
        assert!((line_coverage(eq, Point::new(3.0, 0.5)) - 0.5).abs() < 1e-9);
        assert!((line_coverage(eq, Point::new(3.0, -0.25)) - 0.75).abs() < 1e-9);
        assert_eq!(line_coverage(eq, Point::new(3.0, 1.0)), 0.0);
        assert_eq!(line_coverage(eq, Point::new(3.0, -7.0)), 0.0);
    }

    #[test]
    fn quad_is_fully_covered_on_the_curve() {
        let quad = QuadBez::new((10.0, 10.0), (60.0, 110.0), (110.0, 10.0));
        let uv = QuadUvMatrix::new(quad.p0, quad.p1, quad.p2);
        for i in 0..=8 {
            let t = f64::from(i) / 8.0;
            assert!((quad_coverage_at(&uv, quad.eval(t)) - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn quad_falls_off_with_distance() {
        let quad = QuadBez::new((10.0, 10.0), (60.0, 110.0), (110.0, 10.0));
        let uv = QuadUvMatrix::new(quad.p0, quad.p1, quad.p2);
        let deriv = quad.deriv();
        for t in [0.2, 0.5, 0.8] {
            let tangent = deriv.eval(t).to_vec2().normalize();
            let normal = Vec2::new(-tangent.y, tangent.x);
            let half = quad_coverage_at(&uv, quad.eval(t) + normal * 0.5);
            assert!((half - 0.5).abs() < 0.05, "coverage {half} at t = {t}");
            let outside = quad_coverage_at(&uv, quad.eval(t) + normal * 1.5);
            assert_eq!(outside, 0.0);
        }
    }
}
