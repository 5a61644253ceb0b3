//! Procedural mesh primitives
//!
//! Generators for the four built-in shapes. Each one validates its parameters,
//! then writes vertices and submesh-local indices through a [`MeshBuilder`].
//!
//! [`MeshBuilder`]: crate::procedural::MeshBuilder

mod box_grid;
mod cylinder;
mod sphere;

pub use box_grid::{generate_box, generate_grid};
pub use cylinder::generate_cylinder;
pub use sphere::generate_sphere;

pub(crate) use box_grid::{build_box, build_grid};
pub(crate) use cylinder::build_cylinder;
pub(crate) use sphere::build_sphere;
