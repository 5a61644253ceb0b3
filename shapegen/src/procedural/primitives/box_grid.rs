//! Flat-faced primitives (box, grid)

use glam::{Vec2, Vec3};
use tracing::debug;

use crate::error::Result;
use crate::procedural::params::{BoxParams, GridParams};
use crate::procedural::types::MeshBuilder;
use crate::vertex::Vertex;

/// Generate a box with flat per-face normals
///
/// # Arguments
/// * `params` - Full extents along X (width), Y (height) and Z (depth)
///
/// # Returns
/// Mesh with 24 vertices (4 per face, no sharing across faces) and 36 indices
///
/// Faces are emitted front (-Z), back (+Z), top, bottom, left (-X), right (+X).
/// Each face uses local triangles `{0, 1, 2}` and `{0, 2, 3}`.
pub fn generate_box<M: MeshBuilder + Default>(params: &BoxParams) -> Result<M> {
    let counts = params.counts()?;
    let mut mesh = M::default();
    mesh.reserve(counts);
    build_box(params, &mut mesh);

    debug!(
        width = params.width,
        height = params.height,
        depth = params.depth,
        vertices = counts.vertices,
        indices = counts.indices,
        "generated box"
    );
    Ok(mesh)
}

/// Write box geometry into `mesh`; parameters must already be validated
pub(crate) fn build_box<M: MeshBuilder>(params: &BoxParams, mesh: &mut M) {
    let w = 0.5 * params.width;
    let h = 0.5 * params.height;
    let d = 0.5 * params.depth;

    // (normal, tangent, 4 corners, 4 UVs); tangent follows increasing U
    let faces: [(Vec3, Vec3, [Vec3; 4], [Vec2; 4]); 6] = [
        // Front (-Z)
        (
            Vec3::NEG_Z,
            Vec3::X,
            [
                Vec3::new(-w, -h, -d),
                Vec3::new(-w, h, -d),
                Vec3::new(w, h, -d),
                Vec3::new(w, -h, -d),
            ],
            [Vec2::new(0.0, 1.0), Vec2::ZERO, Vec2::X, Vec2::ONE],
        ),
        // Back (+Z)
        (
            Vec3::Z,
            Vec3::NEG_X,
            [
                Vec3::new(-w, -h, d),
                Vec3::new(w, -h, d),
                Vec3::new(w, h, d),
                Vec3::new(-w, h, d),
            ],
            [Vec2::ONE, Vec2::new(0.0, 1.0), Vec2::ZERO, Vec2::X],
        ),
        // Top (+Y)
        (
            Vec3::Y,
            Vec3::X,
            [
                Vec3::new(-w, h, -d),
                Vec3::new(-w, h, d),
                Vec3::new(w, h, d),
                Vec3::new(w, h, -d),
            ],
            [Vec2::new(0.0, 1.0), Vec2::ZERO, Vec2::X, Vec2::ONE],
        ),
        // Bottom (-Y)
        (
            Vec3::NEG_Y,
            Vec3::NEG_X,
            [
                Vec3::new(-w, -h, -d),
                Vec3::new(w, -h, -d),
                Vec3::new(w, -h, d),
                Vec3::new(-w, -h, d),
            ],
            [Vec2::ONE, Vec2::new(0.0, 1.0), Vec2::ZERO, Vec2::X],
        ),
        // Left (-X)
        (
            Vec3::NEG_X,
            Vec3::NEG_Z,
            [
                Vec3::new(-w, -h, d),
                Vec3::new(-w, h, d),
                Vec3::new(-w, h, -d),
                Vec3::new(-w, -h, -d),
            ],
            [Vec2::new(0.0, 1.0), Vec2::ZERO, Vec2::X, Vec2::ONE],
        ),
        // Right (+X)
        (
            Vec3::X,
            Vec3::Z,
            [
                Vec3::new(w, -h, -d),
                Vec3::new(w, h, -d),
                Vec3::new(w, h, d),
                Vec3::new(w, -h, d),
            ],
            [Vec2::new(0.0, 1.0), Vec2::ZERO, Vec2::X, Vec2::ONE],
        ),
    ];

    for (normal, tangent, corners, uvs) in faces {
        let base = mesh.vertex_count();
        for (corner, uv) in corners.into_iter().zip(uvs) {
            mesh.add_vertex(Vertex::new(corner, normal, tangent, uv));
        }

        mesh.add_triangle(base, base + 1, base + 2);
        mesh.add_triangle(base, base + 2, base + 3);
    }
}

/// Generate a flat grid on the XZ plane (Y = 0)
///
/// # Arguments
/// * `params` - Extents plus vertex rows (`m`, along Z) and columns (`n`, along X)
///
/// # Returns
/// Mesh with `m × n` vertices and `(m - 1)(n - 1) × 6` indices
///
/// # Layout
/// Row `i` sits at `z = depth/2 - i·depth/(m-1)`, column `j` at
/// `x = -width/2 + j·width/(n-1)`. The texture is stretched once over the
/// whole grid: `u = j/(n-1)`, `v = i/(m-1)`.
pub fn generate_grid<M: MeshBuilder + Default>(params: &GridParams) -> Result<M> {
    let counts = params.counts()?;
    let mut mesh = M::default();
    mesh.reserve(counts);
    build_grid(params, &mut mesh);

    debug!(
        width = params.width,
        depth = params.depth,
        rows = params.rows,
        columns = params.columns,
        vertices = counts.vertices,
        indices = counts.indices,
        "generated grid"
    );
    Ok(mesh)
}

/// Write grid geometry into `mesh`; parameters must already be validated
pub(crate) fn build_grid<M: MeshBuilder>(params: &GridParams, mesh: &mut M) {
    let m = params.rows;
    let n = params.columns;

    let half_width = 0.5 * params.width;
    let half_depth = 0.5 * params.depth;
    let dx = params.width / (n - 1) as f32;
    let dz = params.depth / (m - 1) as f32;

    for i in 0..m {
        let z = half_depth - i as f32 * dz;
        let v = i as f32 / (m - 1) as f32;

        for j in 0..n {
            let x = -half_width + j as f32 * dx;
            let u = j as f32 / (n - 1) as f32;

            mesh.add_vertex(Vertex::new(
                Vec3::new(x, 0.0, z),
                Vec3::Y,
                Vec3::X,
                Vec2::new(u, v),
            ));
        }
    }

    // Fixed diagonal split for every quad
    for i in 0..m - 1 {
        for j in 0..n - 1 {
            let i0 = i * n + j;
            let i1 = i0 + 1;
            let i2 = (i + 1) * n + j;
            let i3 = i2 + 1;

            mesh.add_triangle(i0, i1, i2);
            mesh.add_triangle(i2, i1, i3);
        }
    }
}
