//! shapegen - parametric primitive meshes packed into shared buffers
//!
//! Generates box, grid, sphere and cylinder meshes with normals, tangents
//! and texture coordinates, then concatenates several of them into a single
//! vertex buffer and index buffer with one [`SubmeshRegion`] per submesh.
//!
//! Everything here is CPU-side and deterministic. Uploading the buffers and
//! issuing the draw calls is left to the renderer.
//!
//! # Example
//! ```
//! use shapegen::procedural::{BoxParams, Shape, SphereParams};
//! use shapegen::packer::MeshPacker;
//!
//! let sphere = Shape::from(SphereParams::with_radius(0.5));
//! let counts = sphere.counts()?;
//! assert_eq!((counts.vertices, counts.indices), (401, 2280));
//!
//! let mut packer = MeshPacker::new();
//! packer.push("box", &Shape::from(BoxParams::new(1.5, 0.5, 1.5)).generate()?)?;
//! packer.push("sphere", &sphere.generate()?)?;
//! let merged = packer.finish();
//!
//! for (name, draw) in merged.draw_calls() {
//!     println!("{name}: {} indices from {}, base vertex {}", draw.index_count, draw.first_index, draw.base_vertex);
//! }
//! # Ok::<(), shapegen::ShapeError>(())
//! ```

pub mod error;
pub mod export;
pub mod packer;
pub mod procedural;
pub mod scene;
pub mod vertex;

pub use error::{Result, ShapeError};
pub use packer::{DrawIndexed, MergedMesh, MeshPacker, SubmeshRegion, pack, pack_into};
pub use procedural::{Mesh, MeshCounts, Shape};
pub use scene::{SceneDescription, SubmeshDescription, build_scene};
pub use vertex::{VERTEX_STRIDE, Vertex};
