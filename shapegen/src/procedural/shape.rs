//! Shape selection and the count-then-generate protocol

use serde::{Deserialize, Serialize};

use super::params::{BoxParams, CylinderParams, GridParams, SphereParams};
use super::primitives::{
    build_box, build_cylinder, build_grid, build_sphere, generate_box, generate_cylinder,
    generate_grid, generate_sphere,
};
use super::types::{Mesh, MeshBuilder, MeshCounts, SliceBuilder};
use crate::error::{Result, ShapeError};
use crate::vertex::Vertex;

/// Any of the built-in primitives together with its parameters
///
/// Deserializes from a table tagged with `shape = "box" | "grid" | "sphere" | "cylinder"`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "lowercase")]
pub enum Shape {
    Box(BoxParams),
    Grid(GridParams),
    Sphere(SphereParams),
    Cylinder(CylinderParams),
}

impl Shape {
    pub fn kind(&self) -> &'static str {
        match self {
            Shape::Box(_) => "box",
            Shape::Grid(_) => "grid",
            Shape::Sphere(_) => "sphere",
            Shape::Cylinder(_) => "cylinder",
        }
    }

    pub fn validate(&self) -> Result<()> {
        match self {
            Shape::Box(p) => p.validate(),
            Shape::Grid(p) => p.validate(),
            Shape::Sphere(p) => p.validate(),
            Shape::Cylinder(p) => p.validate(),
        }
    }

    /// Exact vertex and index counts the generator will emit
    pub fn counts(&self) -> Result<MeshCounts> {
        match self {
            Shape::Box(p) => p.counts(),
            Shape::Grid(p) => p.counts(),
            Shape::Sphere(p) => p.counts(),
            Shape::Cylinder(p) => p.counts(),
        }
    }

    /// Generate into freshly allocated, exactly sized buffers
    pub fn generate(&self) -> Result<Mesh> {
        self.generate_with::<Mesh>()
    }

    /// Generate with any default-constructible builder
    pub fn generate_with<M: MeshBuilder + Default>(&self) -> Result<M> {
        match self {
            Shape::Box(p) => generate_box(p),
            Shape::Grid(p) => generate_grid(p),
            Shape::Sphere(p) => generate_sphere(p),
            Shape::Cylinder(p) => generate_cylinder(p),
        }
    }

    /// Generate into caller-owned buffers
    ///
    /// Both slices are checked against [`Shape::counts`] before anything is
    /// written. Longer slices are fine; only the leading region is filled.
    /// Returns the number of vertices and indices written.
    pub fn generate_into(&self, vertices: &mut [Vertex], indices: &mut [u32]) -> Result<MeshCounts> {
        let counts = self.counts()?;
        check_capacity("vertex", counts.vertices, vertices.len())?;
        check_capacity("index", counts.indices, indices.len())?;

        let mut builder = SliceBuilder::new(vertices, indices);
        self.build(&mut builder);
        debug_assert_eq!(builder.written(), counts);

        tracing::debug!(
            shape = self.kind(),
            vertices = counts.vertices,
            indices = counts.indices,
            "generated shape into caller buffers"
        );
        Ok(builder.written())
    }

    fn build<M: MeshBuilder>(&self, mesh: &mut M) {
        match self {
            Shape::Box(p) => build_box(p, mesh),
            Shape::Grid(p) => build_grid(p, mesh),
            Shape::Sphere(p) => build_sphere(p, mesh),
            Shape::Cylinder(p) => build_cylinder(p, mesh),
        }
    }
}

impl From<BoxParams> for Shape {
    fn from(p: BoxParams) -> Self {
        Shape::Box(p)
    }
}

impl From<GridParams> for Shape {
    fn from(p: GridParams) -> Self {
        Shape::Grid(p)
    }
}

impl From<SphereParams> for Shape {
    fn from(p: SphereParams) -> Self {
        Shape::Sphere(p)
    }
}

impl From<CylinderParams> for Shape {
    fn from(p: CylinderParams) -> Self {
        Shape::Cylinder(p)
    }
}

pub(crate) fn check_capacity(buffer: &'static str, required: usize, provided: usize) -> Result<()> {
    if provided < required {
        return Err(ShapeError::CapacityMismatch {
            buffer,
            required,
            provided,
        });
    }
    Ok(())
}

/// Vertices the generator for `shape` will emit
pub fn required_vertex_count(shape: &Shape) -> Result<usize> {
    shape.counts().map(|c| c.vertices)
}

/// Indices the generator for `shape` will emit
pub fn required_index_count(shape: &Shape) -> Result<usize> {
    shape.counts().map(|c| c.indices)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_into_matches_generate() {
        let shape = Shape::from(SphereParams::new(0.5, 6, 8));
        let owned = shape.generate().unwrap();

        let counts = shape.counts().unwrap();
        let mut vertices = vec![Vertex::default(); counts.vertices];
        let mut indices = vec![0u32; counts.indices];
        let written = shape.generate_into(&mut vertices, &mut indices).unwrap();

        assert_eq!(written, counts);
        assert_eq!(vertices, owned.vertices);
        assert_eq!(indices, owned.indices);
    }

    #[test]
    fn test_generate_into_accepts_larger_buffers() {
        let shape = Shape::from(BoxParams::default());
        let mut vertices = vec![Vertex::default(); 30];
        let mut indices = vec![u32::MAX; 40];

        let written = shape.generate_into(&mut vertices, &mut indices).unwrap();
        assert_eq!(written, MeshCounts::new(24, 36));
        assert_eq!(&indices[36..], &[u32::MAX; 4]);
    }

    #[test]
    fn test_generate_into_rejects_small_buffers_before_writing() {
        let shape = Shape::from(GridParams::new(1.0, 1.0, 3, 3));
        let mut vertices = vec![Vertex::default(); 9];
        let mut indices = vec![7u32; 23];

        let err = shape.generate_into(&mut vertices, &mut indices).unwrap_err();
        assert!(matches!(
            err,
            ShapeError::CapacityMismatch {
                buffer: "index",
                required: 24,
                provided: 23
            }
        ));
        // Nothing was written
        assert!(vertices.iter().all(|v| *v == Vertex::default()));
        assert!(indices.iter().all(|&i| i == 7));

        let mut vertices = vec![Vertex::default(); 8];
        let mut indices = vec![0u32; 24];
        let err = shape.generate_into(&mut vertices, &mut indices).unwrap_err();
        assert!(matches!(err, ShapeError::CapacityMismatch { buffer: "vertex", .. }));
    }

    #[test]
    fn test_generate_with_matches_direct_generators() {
        let boxed = BoxParams::new(1.5, 0.5, 1.5);
        let sphere = SphereParams::new(0.5, 5, 7);
        let cylinder = CylinderParams::new(0.5, 0.3, 3.0, 4, 6);
        let grid = GridParams::new(2.0, 3.0, 4, 5);

        assert_eq!(Shape::from(boxed).generate().unwrap(), generate_box::<Mesh>(&boxed).unwrap());
        assert_eq!(Shape::from(grid).generate().unwrap(), generate_grid::<Mesh>(&grid).unwrap());
        assert_eq!(
            Shape::from(sphere).generate().unwrap(),
            generate_sphere::<Mesh>(&sphere).unwrap()
        );
        assert_eq!(
            Shape::from(cylinder).generate().unwrap(),
            generate_cylinder::<Mesh>(&cylinder).unwrap()
        );
    }

    #[test]
    fn test_required_counts() {
        let shape = Shape::from(CylinderParams::new(0.5, 0.3, 3.0, 20, 20));
        assert_eq!(required_vertex_count(&shape).unwrap(), 485);
        assert_eq!(required_index_count(&shape).unwrap(), 2520);

        let bad = Shape::from(SphereParams::new(1.0, 2, 5));
        assert!(required_vertex_count(&bad).is_err());
    }

    #[test]
    fn test_invalid_params_fail_before_generation() {
        let shape = Shape::from(GridParams::new(4.0, 4.0, 1, 5));
        assert!(matches!(
            shape.generate().unwrap_err(),
            ShapeError::InvalidParameter { shape: "grid", .. }
        ));
    }
}
