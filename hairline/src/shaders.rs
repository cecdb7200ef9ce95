// Copyright 2026 the Hairline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! WGSL sources for the hairline coverage functions.
//!
//! Each source defines one function a host can splice into its fragment shader:
//!
//! - `hairline_line_coverage(frag_pos: vec2<f32>, edge: vec4<f32>) -> f32`
//! - `hairline_quad_coverage(edge: vec4<f32>) -> f32`, which needs `dpdx`/`dpdy`.
//!
//! `edge` is the interpolated [`Vertex::edge`](crate::Vertex::edge) attribute and
//! `frag_pos` the fragment's device-space position. Compiling and binding the shaders is
//! up to the host. [`hairline_common::coverage`] evaluates the same functions on the CPU.

use crate::EdgeMode;

/// The coverage function for [`EdgeMode::Line`] draws.
pub const LINE_EDGE_WGSL: &str = include_str!("../shaders/line_edge.wgsl");

/// The coverage function for [`EdgeMode::Quad`] draws.
pub const QUAD_EDGE_WGSL: &str = include_str!("../shaders/quad_edge.wgsl");

impl EdgeMode {
    /// The WGSL source of the coverage function for this edge mode.
    pub fn shader_source(self) -> &'static str {
        match self {
            Self::Line => LINE_EDGE_WGSL,
            Self::Quad => QUAD_EDGE_WGSL,
        }
    }

    /// The name of the coverage function defined by [`EdgeMode::shader_source`].
    pub fn entry_point(self) -> &'static str {
        match self {
            Self::Line => "hairline_line_coverage",
            Self::Quad => "hairline_quad_coverage",
        }
    }

    /// Whether the coverage function needs fragment derivatives.
    pub fn needs_derivatives(self) -> bool {
        matches!(self, Self::Quad)
    }
}
