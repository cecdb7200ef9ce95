// Copyright 2026 the Hairline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drawing paths through the recording backend.

use hairline::kurbo::{Affine, BezPath, Point};
use hairline::{
    Command, DrawStats, EdgeMode, Error, HairlinePathRenderer, IndexedDraw, IntRect, Recording,
    RenderBackend, RendererOptions, TargetCaps, Transform, Unsupported, Vertex,
};
use hairline_common::coverage::line_coverage;

fn renderer(backend: &mut Recording) -> HairlinePathRenderer {
    HairlinePathRenderer::new(backend, RendererOptions::default()).unwrap()
}

fn draws(backend: &Recording) -> Vec<IndexedDraw> {
    backend.draws().copied().collect()
}

fn vertices(backend: &Recording, draw: &IndexedDraw) -> Vec<Vertex> {
    let all = backend.vertices(draw.vertex_buffer).unwrap();
    all[draw.start_vertex..draw.start_vertex + draw.vertex_count].to_vec()
}

fn zigzag(segments: usize) -> BezPath {
    let mut path = BezPath::new();
    path.move_to((10.0, 10.0));
    for i in 1..=segments {
        let y = if i % 2 == 0 { 10.0 } else { 90.0 };
        path.line_to((10.0 + (i % 80) as f64, y));
    }
    path
}

fn wave(quads: usize) -> BezPath {
    let mut path = BezPath::new();
    path.move_to((10.0, 50.0));
    for i in 0..quads {
        let x = 10.0 + 8.0 * i as f64;
        let y = if i % 2 == 0 { 20.0 } else { 80.0 };
        path.quad_to((x + 4.0, y), (x + 8.0, 50.0));
    }
    path
}

#[test]
fn single_line() {
    let mut backend = Recording::new(100, 100);
    let mut renderer = renderer(&mut backend);

    let mut path = BezPath::new();
    path.move_to((0.0, 0.0));
    path.line_to((10.0, 0.0));
    let stats = renderer
        .draw_path(&mut backend, &path, &Transform::IDENTITY)
        .unwrap();
    assert_eq!(
        stats,
        DrawStats {
            lines: 1,
            leaf_quads: 0,
            vertices: 4,
            draws: 1,
        }
    );

    let draws = draws(&backend);
    assert_eq!(draws.len(), 1);
    let draw = draws[0];
    assert_eq!(draw.edge, EdgeMode::Line);
    assert_eq!((draw.vertex_count, draw.index_count), (4, 6));
    assert_eq!(
        Some(draw.index_buffer),
        backend.line_index_buffer().map(|shared| shared.id)
    );
    for v in vertices(&backend, &draw) {
        let [a, b, c] = v.line_equation();
        assert_eq!(a, 0.0);
        assert_eq!(b.abs(), 1.0);
        assert_eq!(c, 0.0);
    }
}

#[test]
fn small_quad_is_not_subdivided() {
    let mut backend = Recording::new(100, 100);
    let mut renderer = renderer(&mut backend);

    let mut path = BezPath::new();
    path.move_to((0.0, 0.0));
    path.quad_to((5.0, 10.0), (10.0, 0.0));
    let stats = renderer
        .draw_path(&mut backend, &path, &Transform::IDENTITY)
        .unwrap();
    assert_eq!((stats.lines, stats.leaf_quads, stats.vertices), (0, 1, 5));

    let draws = draws(&backend);
    assert_eq!(draws.len(), 1);
    assert_eq!(draws[0].edge, EdgeMode::Quad);
    assert_eq!((draws[0].vertex_count, draws[0].index_count), (5, 9));
    assert_eq!(draws[0].index_buffer, renderer.quad_index_buffer().0);
}

#[test]
fn large_quad_is_subdivided_once() {
    let mut backend = Recording::new(400, 400);
    let mut renderer = renderer(&mut backend);

    let mut path = BezPath::new();
    path.move_to((0.0, 0.0));
    path.quad_to((5.0, 10.0), (10.0, 0.0));
    let stats = renderer
        .draw_path(&mut backend, &path, &Affine::scale(36.0).into())
        .unwrap();
    assert_eq!((stats.leaf_quads, stats.vertices, stats.draws), (2, 10, 1));

    let draws = draws(&backend);
    assert_eq!((draws[0].vertex_count, draws[0].index_count), (10, 18));
}

#[test]
fn offscreen_path_draws_nothing() {
    let mut backend = Recording::new(100, 100);
    let mut renderer = renderer(&mut backend);
    let commands_before = backend.commands.len();

    let mut path = BezPath::new();
    path.move_to((500.0, 500.0));
    path.line_to((600.0, 520.0));
    path.quad_to((650.0, 700.0), (700.0, 500.0));
    let stats = renderer
        .draw_path(&mut backend, &path, &Transform::IDENTITY)
        .unwrap();
    assert_eq!(stats, DrawStats::default());
    assert_eq!(backend.commands.len(), commands_before);
}

#[test]
fn lines_are_batched_by_the_line_template() {
    let mut backend = Recording::new(100, 100).with_line_capacity(100);
    let mut renderer = renderer(&mut backend);

    let stats = renderer
        .draw_path(&mut backend, &zigzag(250), &Transform::IDENTITY)
        .unwrap();
    assert_eq!((stats.lines, stats.draws), (250, 3));

    let draws = draws(&backend);
    assert_eq!(
        draws.iter().map(|d| d.start_vertex).collect::<Vec<_>>(),
        [0, 400, 800]
    );
    assert_eq!(
        draws.iter().map(|d| d.index_count).collect::<Vec<_>>(),
        [600, 600, 300]
    );
    assert!(draws.iter().all(|d| d.start_index == 0));
    assert!(draws.iter().all(|d| d.vertex_buffer == draws[0].vertex_buffer));
}

#[test]
fn quads_are_batched_after_lines() {
    let mut backend = Recording::new(100, 100);
    let options = RendererOptions {
        quads_per_index_buffer: 4,
        ..RendererOptions::default()
    };
    let mut renderer = HairlinePathRenderer::new(&mut backend, options).unwrap();

    let mut path = wave(10);
    path.line_to((10.0, 50.0));
    let stats = renderer
        .draw_path(&mut backend, &path, &Transform::IDENTITY)
        .unwrap();
    assert_eq!((stats.lines, stats.leaf_quads), (1, 10));

    let draws = draws(&backend);
    assert_eq!(
        draws.iter().map(|d| d.edge).collect::<Vec<_>>(),
        [EdgeMode::Line, EdgeMode::Quad, EdgeMode::Quad, EdgeMode::Quad]
    );
    assert_eq!(
        draws.iter().map(|d| d.start_vertex).collect::<Vec<_>>(),
        [0, 4, 24, 44]
    );
    assert_eq!(draws[3].vertex_count, 10);

    let template = backend.index_buffer(draws[1].index_buffer).unwrap();
    assert_eq!(template.indices().len(), 9 * 4);
}

#[test]
fn vertex_buffer_is_released() {
    let mut backend = Recording::new(100, 100);
    let mut renderer = renderer(&mut backend);

    renderer
        .draw_path(&mut backend, &wave(3), &Transform::IDENTITY)
        .unwrap();
    assert_eq!(backend.live_vertex_buffers(), 0);

    let tail: Vec<_> = backend.commands.iter().skip(1).collect();
    assert!(matches!(tail[0], Command::AcquireVertexBuffer { vertex_count: 15, .. }));
    assert!(matches!(tail[1], Command::WriteVertices { count: 15, .. }));
    assert!(matches!(tail[2], Command::DrawIndexed(_)));
    assert!(matches!(tail[3], Command::ReleaseVertexBuffer(_)));
    assert_eq!(tail.len(), 4);
}

#[test]
fn exhausted_vertex_buffer_aborts_the_path() {
    let mut backend = Recording::new(100, 100).with_max_vertex_count(16);
    let mut renderer = renderer(&mut backend);

    let result = renderer.draw_path(&mut backend, &zigzag(5), &Transform::IDENTITY);
    assert!(matches!(
        result,
        Err(Error::VertexBufferUnavailable {
            vertex_count: 20,
            ..
        })
    ));
    assert_eq!(backend.draws().count(), 0);
    assert_eq!(backend.live_vertex_buffers(), 0);

    // Smaller paths still draw.
    let stats = renderer
        .draw_path(&mut backend, &zigzag(4), &Transform::IDENTITY)
        .unwrap();
    assert_eq!(stats.vertices, 16);
}

#[test]
fn curves_need_derivatives() {
    let mut backend = Recording::new(100, 100).with_caps(TargetCaps {
        fragment_derivatives: false,
    });
    let mut renderer = renderer(&mut backend);

    let result = renderer.draw_path(&mut backend, &wave(2), &Transform::IDENTITY);
    assert!(matches!(
        result,
        Err(Error::Unsupported(Unsupported::MissingDerivatives))
    ));
    assert_eq!(backend.commands.len(), 1);

    assert!(renderer
        .draw_path(&mut backend, &zigzag(3), &Transform::IDENTITY)
        .is_ok());
}

#[test]
fn lines_need_a_line_index_buffer() {
    let mut backend = Recording::new(100, 100).without_line_index_buffer();
    let mut renderer = renderer(&mut backend);

    let result = renderer.draw_path(&mut backend, &zigzag(3), &Transform::IDENTITY);
    assert!(matches!(result, Err(Error::MissingLineIndexBuffer)));
    assert_eq!(backend.live_vertex_buffers(), 0);

    let stats = renderer
        .draw_path(&mut backend, &wave(2), &Transform::IDENTITY)
        .unwrap();
    assert_eq!(stats.draws, 1);
}

#[test]
fn clip_bounds_come_from_the_backend() {
    let mut backend = Recording::new(100, 100).with_clip(IntRect::new(50, 0, 100, 100));
    let mut renderer = renderer(&mut backend);

    let mut path = BezPath::new();
    path.move_to((10.0, 10.0));
    path.line_to((10.0, 90.0));
    path.move_to((60.0, 10.0));
    path.line_to((60.0, 90.0));
    let stats = renderer
        .draw_path(&mut backend, &path, &Transform::IDENTITY)
        .unwrap();
    assert_eq!(stats.lines, 1);
}

#[test]
fn cubics_are_drawn_as_quads() {
    let mut backend = Recording::new(200, 200);
    let mut renderer = renderer(&mut backend);

    let mut path = BezPath::new();
    path.move_to((20.0, 180.0));
    path.curve_to((20.0, 20.0), (180.0, 20.0), (180.0, 180.0));
    let stats = renderer
        .draw_path(&mut backend, &path, &Transform::IDENTITY)
        .unwrap();
    assert_eq!(stats.lines, 0);
    assert!(stats.leaf_quads > 1);

    let draw = draws(&backend)[0];
    for v in vertices(&backend, &draw) {
        assert!(v.pos.iter().chain(&v.edge).all(|x| x.is_finite()));
    }
}

#[test]
fn line_coverage_is_full_on_the_centerline() {
    let mut backend = Recording::new(100, 100);
    let mut renderer = renderer(&mut backend);

    let (a, b) = (Point::new(12.0, 17.0), Point::new(83.0, 64.0));
    let mut path = BezPath::new();
    path.move_to(a);
    path.line_to(b);
    renderer
        .draw_path(&mut backend, &path, &Transform::IDENTITY)
        .unwrap();

    let draw = draws(&backend)[0];
    let v = vertices(&backend, &draw)[0];
    let eq = v.line_equation();
    assert!((line_coverage(eq, a.midpoint(b)) - 1.0).abs() < 1e-4);
    assert!(line_coverage(eq, v.position()) < 1e-4);
}

#[test]
fn perspective_draws_in_source_space() {
    let mut backend = Recording::new(200, 200);
    let mut renderer = renderer(&mut backend);
    let transform = Transform::new([1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.002, 0.001, 1.0]);

    let mut path = wave(2);
    path.line_to((10.0, 50.0));
    let stats = renderer.draw_path(&mut backend, &path, &transform).unwrap();
    assert_eq!(stats.lines, 1);

    let draws = draws(&backend);
    assert!(draws.iter().all(|d| d.space.is_source()));

    // Line coefficients are in device space: mapping a bloated corner forward puts it one
    // pixel from the centerline.
    let line = draws.iter().find(|d| d.edge == EdgeMode::Line).unwrap();
    for v in vertices(&backend, line) {
        let [a, b, c] = v.line_equation().map(f64::from);
        let device = transform.map_point(v.position());
        let distance = a * device.x + b * device.y + c;
        assert!((distance.abs() - 1.0).abs() < 1e-3);
    }
}

#[test]
fn singular_perspective_draws_nothing() {
    let mut backend = Recording::new(100, 100);
    let mut renderer = renderer(&mut backend);
    let singular = Transform::new([1.0, 2.0, 0.0, 2.0, 4.0, 0.0, 0.001, 0.002, 1.0]);

    let stats = renderer
        .draw_path(&mut backend, &zigzag(3), &singular)
        .unwrap();
    assert_eq!(stats, DrawStats::default());
    assert_eq!(backend.draws().count(), 0);
}

#[test]
fn non_finite_paths_draw_nothing() {
    let mut backend = Recording::new(100, 100);
    let mut renderer = renderer(&mut backend);

    let mut path = zigzag(3);
    path.line_to((f64::INFINITY, 5.0));
    let stats = renderer
        .draw_path(&mut backend, &path, &Transform::IDENTITY)
        .unwrap();
    assert_eq!(stats, DrawStats::default());
}

#[test]
fn recorded_vertices_upload_as_bytes() {
    let mut backend = Recording::new(100, 100);
    let mut renderer = renderer(&mut backend);

    let stats = renderer
        .draw_path(&mut backend, &wave(2), &Transform::IDENTITY)
        .unwrap();
    let draw = draws(&backend)[0];
    let vertices = backend.vertices(draw.vertex_buffer).unwrap();
    let bytes: &[u8] = bytemuck::cast_slice(vertices);
    assert_eq!(bytes.len(), stats.vertices * Vertex::LAYOUT.stride as usize);
}
