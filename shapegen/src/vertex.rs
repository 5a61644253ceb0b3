//! Vertex layout shared by every generator
//!
//! Vertices are stored unpacked (f32 everywhere) so the merged buffer can be
//! uploaded as-is: 44 bytes per vertex, attributes tightly packed in the
//! order position, normal, tangent, texcoord.

use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec3};
use serde::Serialize;

/// Size of one [`Vertex`] in bytes
pub const VERTEX_STRIDE: u32 = std::mem::size_of::<Vertex>() as u32;

/// Position, normal, tangent and texture coordinate of one vertex
///
/// `normal` and `tangent` are unit length. `tangent` follows the direction of
/// increasing U. `texcoord` lies in `[0, 1]` for every built-in generator.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub tangent: [f32; 3],
    pub texcoord: [f32; 2],
}

impl Vertex {
    /// Create a vertex from glam vectors
    pub fn new(position: Vec3, normal: Vec3, tangent: Vec3, texcoord: Vec2) -> Self {
        Self {
            position: position.to_array(),
            normal: normal.to_array(),
            tangent: tangent.to_array(),
            texcoord: texcoord.to_array(),
        }
    }

    pub fn position(&self) -> Vec3 {
        Vec3::from_array(self.position)
    }

    pub fn normal(&self) -> Vec3 {
        Vec3::from_array(self.normal)
    }

    pub fn tangent(&self) -> Vec3 {
        Vec3::from_array(self.tangent)
    }

    pub fn texcoord(&self) -> Vec2 {
        Vec2::from_array(self.texcoord)
    }
}

/// What a vertex attribute carries
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VertexSemantic {
    Position,
    Normal,
    Tangent,
    Texcoord,
}

/// One f32 attribute inside [`Vertex`], for input-layout creation
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct VertexAttribute {
    pub semantic: VertexSemantic,
    /// Byte offset from the start of the vertex
    pub offset: u32,
    /// Number of f32 components
    pub components: u32,
}

/// Attribute table matching the `#[repr(C)]` field order of [`Vertex`]
pub const VERTEX_ATTRIBUTES: [VertexAttribute; 4] = [
    VertexAttribute {
        semantic: VertexSemantic::Position,
        offset: 0,
        components: 3,
    },
    VertexAttribute {
        semantic: VertexSemantic::Normal,
        offset: 12,
        components: 3,
    },
    VertexAttribute {
        semantic: VertexSemantic::Tangent,
        offset: 24,
        components: 3,
    },
    VertexAttribute {
        semantic: VertexSemantic::Texcoord,
        offset: 36,
        components: 2,
    },
];

/// View a vertex slice as raw bytes for buffer upload
pub fn as_bytes(vertices: &[Vertex]) -> &[u8] {
    bytemuck::cast_slice(vertices)
}

/// View an index slice as raw little-endian bytes for buffer upload
pub fn indices_as_bytes(indices: &[u32]) -> &[u8] {
    bytemuck::cast_slice(indices)
}
