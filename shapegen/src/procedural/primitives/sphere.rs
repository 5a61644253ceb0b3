//! UV sphere with single-vertex poles

use glam::{Vec2, Vec3};
use std::f32::consts::PI;
use tracing::debug;

use crate::error::Result;
use crate::procedural::params::SphereParams;
use crate::procedural::types::MeshBuilder;
use crate::vertex::Vertex;

/// Generate a UV sphere with smooth normals and equirectangular UV mapping
///
/// # Arguments
/// * `params` - Radius, stacks `p` (pole to pole) and slices `q` (around Y)
///
/// # Returns
/// Mesh with `2 + (p - 1)(q + 1)` vertices and `6q(p - 1)` indices
///
/// # Layout
/// Vertex 0 is the north pole, the last vertex is the south pole, and the
/// `p - 1` rings in between each carry `q + 1` vertices (the first and last
/// share a position at the texture seam).
///
/// # Tangent Calculation
/// Ring tangents are the derivative of position with respect to theta,
/// computed directly in unit form. The poles have no such derivative and get
/// a fixed +X tangent.
pub fn generate_sphere<M: MeshBuilder + Default>(params: &SphereParams) -> Result<M> {
    let counts = params.counts()?;
    let mut mesh = M::default();
    mesh.reserve(counts);
    build_sphere(params, &mut mesh);

    debug!(
        radius = params.radius,
        stacks = params.stacks,
        slices = params.slices,
        vertices = counts.vertices,
        indices = counts.indices,
        "generated sphere"
    );
    Ok(mesh)
}

/// Write sphere geometry into `mesh`; parameters must already be validated
pub(crate) fn build_sphere<M: MeshBuilder>(params: &SphereParams, mesh: &mut M) {
    let radius = params.radius;
    let stacks = params.stacks;
    let slices = params.slices;

    let phi_step = PI / stacks as f32;
    let theta_step = 2.0 * PI / slices as f32;

    let north = mesh.add_vertex(Vertex::new(
        Vec3::new(0.0, radius, 0.0),
        Vec3::Y,
        Vec3::X,
        Vec2::ZERO,
    ));

    // Rings from the north pole downwards, poles excluded
    for i in 1..stacks {
        let phi = i as f32 * phi_step;
        let v = i as f32 / stacks as f32;
        let (sin_phi, cos_phi) = phi.sin_cos();

        for j in 0..=slices {
            let theta = j as f32 * theta_step;
            let u = j as f32 / slices as f32;
            let (sin_theta, cos_theta) = theta.sin_cos();

            // Unit direction, independent of the radius
            let normal = Vec3::new(sin_phi * cos_theta, cos_phi, sin_phi * sin_theta);
            // d(position)/d(theta) divided by radius * sin(phi)
            let tangent = Vec3::new(-sin_theta, 0.0, cos_theta);

            mesh.add_vertex(Vertex::new(radius * normal, normal, tangent, Vec2::new(u, v)));
        }
    }

    let south = mesh.add_vertex(Vertex::new(
        Vec3::new(0.0, -radius, 0.0),
        Vec3::NEG_Y,
        Vec3::X,
        Vec2::new(0.0, 1.0),
    ));

    let ring_len = slices + 1;

    // Top cap: fan from the north pole into the first ring
    for j in 1..=slices {
        mesh.add_triangle(north, north + j + 1, north + j);
    }

    // Inner bands, same quad split as the grid, offset past the north pole
    let base = north + 1;
    for i in 0..stacks - 2 {
        for j in 0..slices {
            let i0 = base + i * ring_len + j;
            let i1 = i0 + 1;
            let i2 = base + (i + 1) * ring_len + j;
            let i3 = i2 + 1;

            mesh.add_triangle(i0, i1, i2);
            mesh.add_triangle(i2, i1, i3);
        }
    }

    // Bottom cap: fan from the last ring into the south pole, mirrored winding
    let base = south - ring_len;
    for j in 0..slices {
        mesh.add_triangle(south, base + j, base + j + 1);
    }
}
