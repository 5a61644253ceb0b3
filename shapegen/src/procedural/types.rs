//! Procedural mesh types
//!
//! Shared types for procedural mesh generation.

use std::ops::Add;

use serde::Serialize;

use crate::vertex::Vertex;

/// Trait for mesh construction - enables generic geometry generation
///
/// This trait allows the generators to write into both:
/// - `Mesh`: owned vectors sized from the parameters
/// - `SliceBuilder`: caller-owned buffers sized by a prior count query
pub trait MeshBuilder {
    /// Add a vertex, returning its index relative to this mesh
    fn add_vertex(&mut self, vertex: Vertex) -> u32;

    /// Add a triangle using three vertex indices
    fn add_triangle(&mut self, i0: u32, i1: u32, i2: u32);

    /// Number of vertices added so far
    fn vertex_count(&self) -> u32;

    /// Hint the final sizes before generation starts
    fn reserve(&mut self, _counts: MeshCounts) {}
}

/// Vertex and index totals for one mesh (or a set of meshes)
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct MeshCounts {
    pub vertices: usize,
    pub indices: usize,
}

impl MeshCounts {
    pub const fn new(vertices: usize, indices: usize) -> Self {
        Self { vertices, indices }
    }

    pub const fn triangles(&self) -> usize {
        self.indices / 3
    }
}

impl Add for MeshCounts {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            vertices: self.vertices + rhs.vertices,
            indices: self.indices + rhs.indices,
        }
    }
}

impl std::iter::Sum for MeshCounts {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

/// Generated mesh: a vertex list and an implicit triangle list
///
/// Indices `[3k, 3k + 1, 3k + 2]` form triangle `k`; every index refers to
/// this mesh's own vertices, starting at 0.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl Mesh {
    /// Create empty mesh data
    pub fn new() -> Self {
        Self::default()
    }

    pub fn counts(&self) -> MeshCounts {
        MeshCounts::new(self.vertices.len(), self.indices.len())
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Iterate triangles as index triples
    pub fn triangles(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        self.indices.chunks_exact(3).map(|t| [t[0], t[1], t[2]])
    }

    /// True if every index refers to an existing vertex
    pub fn indices_in_bounds(&self) -> bool {
        let len = self.vertices.len();
        self.indices.iter().all(|&i| (i as usize) < len)
    }
}

impl MeshBuilder for Mesh {
    fn add_vertex(&mut self, vertex: Vertex) -> u32 {
        let index = self.vertices.len() as u32;
        self.vertices.push(vertex);
        index
    }

    fn add_triangle(&mut self, i0: u32, i1: u32, i2: u32) {
        self.indices.extend_from_slice(&[i0, i1, i2]);
    }

    fn vertex_count(&self) -> u32 {
        self.vertices.len() as u32
    }

    fn reserve(&mut self, counts: MeshCounts) {
        self.vertices.reserve_exact(counts.vertices);
        self.indices.reserve_exact(counts.indices);
    }
}

/// Builder writing into caller-owned buffers
///
/// Capacity is checked against [`MeshCounts`] before a generator runs, so the
/// writes below never run past the end of either slice.
pub struct SliceBuilder<'a> {
    vertices: &'a mut [Vertex],
    indices: &'a mut [u32],
    vertex_len: usize,
    index_len: usize,
}

impl<'a> SliceBuilder<'a> {
    pub(crate) fn new(vertices: &'a mut [Vertex], indices: &'a mut [u32]) -> Self {
        Self {
            vertices,
            indices,
            vertex_len: 0,
            index_len: 0,
        }
    }

    /// Totals written so far
    pub fn written(&self) -> MeshCounts {
        MeshCounts::new(self.vertex_len, self.index_len)
    }
}

impl MeshBuilder for SliceBuilder<'_> {
    fn add_vertex(&mut self, vertex: Vertex) -> u32 {
        let index = self.vertex_len;
        self.vertices[index] = vertex;
        self.vertex_len += 1;
        index as u32
    }

    fn add_triangle(&mut self, i0: u32, i1: u32, i2: u32) {
        self.indices[self.index_len..self.index_len + 3].copy_from_slice(&[i0, i1, i2]);
        self.index_len += 3;
    }

    fn vertex_count(&self) -> u32 {
        self.vertex_len as u32
    }
}
