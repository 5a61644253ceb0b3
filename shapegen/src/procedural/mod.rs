//! Procedural mesh generation
//!
//! Closed-form generators for box, grid, sphere and cylinder meshes with
//! normals, tangents and texture coordinates.
//!
//! Generation is split in two steps so callers can allocate up front:
//! - [`Shape::counts`] (or the per-shape `counts()`) returns exact sizes
//! - [`Shape::generate`] / [`Shape::generate_into`] produce the data

mod params;
mod primitives;
mod shape;
mod types;


pub use params::{
    BoxParams, CylinderParams, DEFAULT_SLICES, DEFAULT_STACKS, GridParams, MIN_GRID_DIVISIONS,
    MIN_ROUND_DIVISIONS, SphereParams,
};
pub use primitives::{generate_box, generate_cylinder, generate_grid, generate_sphere};
pub use shape::{Shape, required_index_count, required_vertex_count};
pub use types::{Mesh, MeshBuilder, MeshCounts, SliceBuilder};

pub(crate) use shape::check_capacity;
