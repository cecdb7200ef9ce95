// Copyright 2026 the Hairline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Deciding how a quadratic is drawn: as two straight segments, or as a number of
//! subdivided leaf quads.
//!
//! Large quads are subdivided to bound the overdraw of their bloated control polygon.
//! The thresholds trade fill cost against the CPU cost of producing more vertices.

use crate::kurbo::Point;
use crate::math::distance_to_line_squared;

/// The maximum number of times a single quadratic is halved, giving at most 16 leaf quads.
pub const MAX_SUBDIVISIONS: u32 = 4;

/// Tolerances, in device pixels, steering the curve classifier.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Tolerances {
    /// Control points closer than this (to each other, or to the chord) make a quad
    /// degenerate, so that it is drawn as two line segments.
    pub degenerate: f64,
    /// The triangle height of a quad above which it gets subdivided.
    pub subdivision: f64,
}

impl Tolerances {
    /// Creates a set of tolerances, or `None` if either is not a positive finite number.
    pub fn new(degenerate: f64, subdivision: f64) -> Option<Self> {
        let valid = |v: f64| v.is_finite() && v > 0.0;
        (valid(degenerate) && valid(subdivision)).then_some(Self {
            degenerate,
            subdivision,
        })
    }
}

impl Default for Tolerances {
    /// One pixel for degeneracy and 175 pixels for subdivision.
    ///
    /// The subdivision tolerance was tuned empirically for fill against vertex cost; the
    /// best value depends on the GPU and the workload.
    fn default() -> Self {
        Self {
            degenerate: 1.0,
            subdivision: 175.0,
        }
    }
}

/// How a quadratic should be rendered.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Subdivision {
    /// Too flat or too short; draw as the segments `p0–p1` and `p1–p2`.
    Degenerate,
    /// Halve the curve this many times (`0..=MAX_SUBDIVISIONS`) before bloating.
    Level(u32),
}

impl Subdivision {
    /// The integer encoding used in the hairline literature: `-1` for degenerate,
    /// otherwise the level.
    pub fn as_sentinel(self) -> i32 {
        match self {
            Self::Degenerate => -1,
            Self::Level(level) => level as i32,
        }
    }

    /// The number of leaf quads produced, `2^level`, or zero when degenerate.
    pub fn leaf_count(self) -> u32 {
        match self {
            Self::Degenerate => 0,
            Self::Level(level) => 1 << level,
        }
    }
}

/// Classifies the quadratic with control points `p`.
///
/// The points are in the space the subdivision thresholds are measured in, normally
/// device space.
pub fn classify_quad(p: &[Point; 3], tolerances: &Tolerances) -> Subdivision {
    let degenerate_sq = tolerances.degenerate * tolerances.degenerate;

    if p[0].distance_squared(p[1]) < degenerate_sq || p[1].distance_squared(p[2]) < degenerate_sq
    {
        return Subdivision::Degenerate;
    }

    let dsqd = distance_to_line_squared(p[1], p[0], p[2]);
    if dsqd < degenerate_sq {
        return Subdivision::Degenerate;
    }

    if distance_to_line_squared(p[2], p[1], p[0]) < degenerate_sq {
        return Subdivision::Degenerate;
    }

    let subdiv_sq = tolerances.subdivision * tolerances.subdivision;
    if dsqd <= subdiv_sq {
        return Subdivision::Level(0);
    }

    // Each halving divides the squared deviation from the chord by four, so the level
    // is log4(d² / tol²), read off the binary exponent of the ratio.
    let log2 = float_exponent(dsqd / subdiv_sq);
    Subdivision::Level((log2.max(0) as u32 / 2).min(MAX_SUBDIVISIONS))
}

/// The unbiased binary exponent of a positive finite `x`, i.e. `floor(log2(x))`.
fn float_exponent(x: f64) -> i32 {
    if !x.is_finite() {
        // Overflowed ratios subdivide as much as allowed.
        return i32::MAX;
    }
    if x < f64::MIN_POSITIVE {
        return f64::MIN_EXP - 1;
    }
    ((x.to_bits() >> 52) & 0x7ff) as i32 - 1023
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad(p: [(f64, f64); 3]) -> [Point; 3] {
        p.map(|(x, y)| Point::new(x, y))
    }

    #[test]
    fn float_exponent_matches_floor_log2() {
        for (x, e) in [
            (0.25, -2),
            (0.3, -2),
            (0.5, -1),
            (1.0, 0),
            (2.0, 1),
            (2.5, 1),
            (8.0, 3),
            (100.0, 6),
            (1000.0, 9),
            (1024.0, 10),
            (3_000_000.0, 21),
        ] {
            assert_eq!(float_exponent(x), e, "exponent of {x}");
        }
    }

    #[test]
    fn coincident_control_points_are_degenerate() {
        let tol = Tolerances::default();
        let cases = [
            quad([(0.0, 0.0), (0.0, 0.0), (10.0, 10.0)]),
            quad([(0.0, 0.0), (10.0, 10.0), (10.0, 10.5)]),
            quad([(0.0, 0.0), (5.0, 0.5), (10.0, 0.0)]),
            quad([(0.0, 0.0), (5.0, 5.0), (0.0, 0.0)]),
            quad([(3.0, 3.0), (3.0, 3.0), (3.0, 3.0)]),
        ];
        for q in cases {
            assert_eq!(classify_quad(&q, &tol), Subdivision::Degenerate, "{q:?}");
            assert_eq!(classify_quad(&q, &tol).as_sentinel(), -1);
        }
    }

    #[test]
    fn collinear_with_overshoot_is_degenerate() {
        // p2 lies on the line through p1 and p0.
        let q = quad([(0.0, 0.0), (20.0, 0.0), (10.0, 0.2)]);
        assert_eq!(classify_quad(&q, &Tolerances::default()), Subdivision::Degenerate);
    }

    #[test]
    fn small_curve_needs_no_subdivision() {
        let q = quad([(0.0, 0.0), (5.0, 10.0), (10.0, 0.0)]);
        assert_eq!(classify_quad(&q, &Tolerances::default()), Subdivision::Level(0));
    }

    #[test]
    fn quadrupling_deviation_adds_one_level() {
        let tol = Tolerances::default();
        let t_sq = tol.subdivision * tol.subdivision;
        // Middle control point at height `d` over a long chord, so d² = ratio * T².
        let level_at = |ratio: f64| {
            let d = (ratio * t_sq).sqrt();
            classify_quad(&quad([(0.0, 0.0), (1000.0, d), (2000.0, 0.0)]), &tol)
        };
        let mut expected = 1;
        let mut ratio = 4.5;
        while expected <= MAX_SUBDIVISIONS {
            assert_eq!(level_at(ratio), Subdivision::Level(expected), "ratio {ratio}");
            ratio *= 4.0;
            expected += 1;
        }
        // Clamped from here on.
        assert_eq!(level_at(ratio), Subdivision::Level(MAX_SUBDIVISIONS));
        assert_eq!(level_at(ratio * 1e6), Subdivision::Level(MAX_SUBDIVISIONS));
    }

    #[test]
    fn levels_stay_in_range() {
        let tol = Tolerances::default();
        for i in 0..40 {
            let h = 1.5 * 2.0_f64.powi(i / 2);
            match classify_quad(&quad([(0.0, 0.0), (50.0, h), (100.0, 0.0)]), &tol) {
                Subdivision::Degenerate => panic!("height {h} should not be degenerate"),
                Subdivision::Level(level) => assert!(level <= MAX_SUBDIVISIONS),
            }
        }
    }

    #[test]
    fn configurable_tolerances() {
        let q = quad([(0.0, 0.0), (5.0, 10.0), (10.0, 0.0)]);
        let tight = Tolerances::new(1.0, 2.0).unwrap();
        // d² = 100, T² = 4, ratio 25 → floor(log2 25) / 2 = 2.
        assert_eq!(classify_quad(&q, &tight), Subdivision::Level(2));
        let coarse = Tolerances::new(11.0, 175.0).unwrap();
        assert_eq!(classify_quad(&q, &coarse), Subdivision::Degenerate);
        assert!(Tolerances::new(0.0, 1.0).is_none());
        assert!(Tolerances::new(1.0, f64::NAN).is_none());
    }

    #[test]
    fn leaf_counts() {
        assert_eq!(Subdivision::Degenerate.leaf_count(), 0);
        assert_eq!(Subdivision::Level(0).leaf_count(), 1);
        assert_eq!(Subdivision::Level(4).leaf_count(), 16);
    }
}
