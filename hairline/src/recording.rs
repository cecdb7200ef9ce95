// Copyright 2026 the Hairline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::collections::{HashMap, HashSet};

use hairline_common::{IndexTemplate, IntRect, Vertex, VertexLayout};

use crate::{
    BackendError, IndexBufferId, IndexedDraw, RenderBackend, SharedIndexBuffer, TargetCaps,
    VertexBufferId,
};

/// The number of lines in the shared line index buffer a [`Recording`] provides.
pub const DEFAULT_LINES_PER_INDEX_BUFFER: usize = 2048;

/// Single command inside a [`Recording`], in the order the renderer issued it.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// An index buffer was created from a template.
    CreateIndexBuffer(IndexBufferId, IndexTemplate),
    /// A vertex buffer was acquired.
    AcquireVertexBuffer {
        id: VertexBufferId,
        vertex_count: usize,
    },
    /// Vertices were written into an acquired buffer.
    WriteVertices { id: VertexBufferId, count: usize },
    DrawIndexed(IndexedDraw),
    ReleaseVertexBuffer(VertexBufferId),
}

/// A [`RenderBackend`] which records every command instead of submitting it.
///
/// Written vertices stay inspectable after their buffer is released.
#[derive(Clone, Debug)]
pub struct Recording {
    pub commands: Vec<Command>,
    caps: TargetCaps,
    clip: IntRect,
    max_vertex_count: Option<usize>,
    line_buffer: Option<SharedIndexBuffer>,
    index_buffers: HashMap<IndexBufferId, IndexTemplate>,
    vertex_capacity: HashMap<VertexBufferId, usize>,
    vertices: HashMap<VertexBufferId, Vec<Vertex>>,
    live: HashSet<VertexBufferId>,
    next_id: u64,
}

impl Recording {
    /// A recording for a `width` by `height` target with fragment derivatives and a
    /// shared line index buffer of [`DEFAULT_LINES_PER_INDEX_BUFFER`] lines.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            commands: Vec::new(),
            caps: TargetCaps {
                fragment_derivatives: true,
            },
            clip: IntRect::from_size(width, height),
            max_vertex_count: None,
            line_buffer: None,
            index_buffers: HashMap::new(),
            vertex_capacity: HashMap::new(),
            vertices: HashMap::new(),
            live: HashSet::new(),
            next_id: 1,
        }
        .with_line_capacity(DEFAULT_LINES_PER_INDEX_BUFFER)
    }

    /// Replaces the target capabilities.
    pub fn with_caps(mut self, caps: TargetCaps) -> Self {
        self.caps = caps;
        self
    }

    /// Replaces the conservative clip bounds.
    pub fn with_clip(mut self, clip: IntRect) -> Self {
        self.clip = clip;
        self
    }

    /// Makes vertex buffer acquisition fail above `max` vertices.
    pub fn with_max_vertex_count(mut self, max: usize) -> Self {
        self.max_vertex_count = Some(max);
        self
    }

    /// Replaces the shared line index buffer with one for `lines` lines.
    ///
    /// If no template can hold that many lines, the recording has no line index buffer.
    pub fn with_line_capacity(mut self, lines: usize) -> Self {
        if let Some(old) = self.line_buffer.take() {
            self.index_buffers.remove(&old.id);
        }
        if let Some(template) = IndexTemplate::lines(lines) {
            let id = IndexBufferId(self.next_id());
            self.line_buffer = Some(SharedIndexBuffer {
                id,
                capacity: template.capacity(),
            });
            self.index_buffers.insert(id, template);
        }
        self
    }

    /// Removes the shared line index buffer.
    pub fn without_line_index_buffer(self) -> Self {
        self.with_line_capacity(0)
    }

    fn next_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// The draws recorded so far.
    pub fn draws(&self) -> impl Iterator<Item = &IndexedDraw> + '_ {
        self.commands.iter().filter_map(|cmd| match cmd {
            Command::DrawIndexed(draw) => Some(draw),
            _ => None,
        })
    }

    /// The vertices written into `id`, also after it was released.
    pub fn vertices(&self, id: VertexBufferId) -> Option<&[Vertex]> {
        self.vertices.get(&id).map(Vec::as_slice)
    }

    /// The number of vertex buffers acquired and not yet released.
    pub fn live_vertex_buffers(&self) -> usize {
        self.live.len()
    }

    /// The template held by an index buffer.
    pub fn index_buffer(&self, id: IndexBufferId) -> Option<&IndexTemplate> {
        self.index_buffers.get(&id)
    }

    /// Clears the commands and written vertices, keeping index buffers.
    pub fn reset(&mut self) {
        self.commands.clear();
        self.vertices.retain(|id, _| self.live.contains(id));
        self.vertex_capacity.retain(|id, _| self.live.contains(id));
    }
}

impl RenderBackend for Recording {
    fn caps(&self) -> TargetCaps {
        self.caps
    }

    fn conservative_clip_bounds(&self) -> IntRect {
        self.clip
    }

    fn create_index_buffer(
        &mut self,
        template: &IndexTemplate,
    ) -> Result<IndexBufferId, BackendError> {
        let id = IndexBufferId(self.next_id());
        self.index_buffers.insert(id, template.clone());
        self.commands
            .push(Command::CreateIndexBuffer(id, template.clone()));
        Ok(id)
    }

    fn line_index_buffer(&self) -> Option<SharedIndexBuffer> {
        self.line_buffer
    }

    fn acquire_vertex_buffer(
        &mut self,
        layout: &VertexLayout,
        vertex_count: usize,
    ) -> Result<VertexBufferId, BackendError> {
        if *layout != Vertex::LAYOUT {
            return Err(BackendError::Message(format!(
                "Unsupported vertex layout with stride {}",
                layout.stride
            )));
        }
        if self.max_vertex_count.is_some_and(|max| vertex_count > max) {
            return Err(BackendError::OutOfMemory {
                requested: vertex_count,
            });
        }
        let id = VertexBufferId(self.next_id());
        self.vertex_capacity.insert(id, vertex_count);
        self.live.insert(id);
        self.commands
            .push(Command::AcquireVertexBuffer { id, vertex_count });
        Ok(id)
    }

    fn write_vertices(
        &mut self,
        buffer: VertexBufferId,
        vertices: &[Vertex],
    ) -> Result<(), BackendError> {
        if !self.live.contains(&buffer) {
            return Err(BackendError::UnknownBuffer(buffer.0));
        }
        let capacity = self.vertex_capacity.get(&buffer).copied().unwrap_or(0);
        if vertices.len() > capacity {
            return Err(BackendError::BufferOverflow {
                capacity,
                written: vertices.len(),
            });
        }
        self.vertices.insert(buffer, vertices.to_vec());
        self.commands.push(Command::WriteVertices {
            id: buffer,
            count: vertices.len(),
        });
        Ok(())
    }

    fn draw_indexed(&mut self, draw: &IndexedDraw) {
        self.commands.push(Command::DrawIndexed(*draw));
    }

    fn release_vertex_buffer(&mut self, buffer: VertexBufferId) {
        if self.live.remove(&buffer) {
            self.commands.push(Command::ReleaseVertexBuffer(buffer));
        }
    }
}
