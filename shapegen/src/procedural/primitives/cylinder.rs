//! Capped cylinder / truncated cone

use glam::{Vec2, Vec3};
use std::f32::consts::PI;
use tracing::debug;

use crate::error::Result;
use crate::procedural::params::CylinderParams;
use crate::procedural::types::MeshBuilder;
use crate::vertex::Vertex;

/// Generate a cylinder with cylindrical UV mapping and two flat caps
///
/// # Arguments
/// * `params` - Bottom/top radius, height, stacks `p` and slices `q`
///
/// # Returns
/// Mesh with `(p + 1)(q + 1) + 2(q + 2)` vertices and `6pq + 6q` indices
///
/// # Layout
/// - Side: `p + 1` rings from `y = -height/2` up to `y = +height/2`, radius
///   interpolated linearly from bottom to top, `q + 1` vertices per ring
/// - Top cap, then bottom cap: `q + 1` ring vertices followed by the centre
///
/// # UV Mapping
/// - Side: U wraps 0→1 around the circumference, V maps 1→0 bottom to top
/// - Caps: planar projection of (x, z) scaled by `max(height, 2·max_radius)`,
///   centred on 0.5
pub fn generate_cylinder<M: MeshBuilder + Default>(params: &CylinderParams) -> Result<M> {
    let counts = params.counts()?;
    let mut mesh = M::default();
    mesh.reserve(counts);
    build_cylinder(params, &mut mesh);

    debug!(
        bottom_radius = params.bottom_radius,
        top_radius = params.top_radius,
        height = params.height,
        stacks = params.stacks,
        slices = params.slices,
        vertices = counts.vertices,
        indices = counts.indices,
        "generated cylinder"
    );
    Ok(mesh)
}

/// Write cylinder geometry into `mesh`; parameters must already be validated
pub(crate) fn build_cylinder<M: MeshBuilder>(params: &CylinderParams, mesh: &mut M) {
    let stacks = params.stacks;
    let slices = params.slices;
    let height = params.height;

    let stack_height = height / stacks as f32;
    let radius_step = (params.top_radius - params.bottom_radius) / stacks as f32;
    let theta_step = 2.0 * PI / slices as f32;
    // Slant direction scaled so its largest component is 1; the cross product
    // below then has length >= 1 however thin or tall the cylinder is
    let dr = params.bottom_radius - params.top_radius;
    let slant_scale = height.max(dr.abs());
    let (slant_r, slant_y) = (dr / slant_scale, height / slant_scale);

    let base = mesh.vertex_count();

    for i in 0..=stacks {
        let y = -0.5 * height + i as f32 * stack_height;
        let r = params.bottom_radius + i as f32 * radius_step;
        let v = 1.0 - i as f32 / stacks as f32;

        for j in 0..=slices {
            let (s, c) = (j as f32 * theta_step).sin_cos();

            // Unit length by construction
            let tangent = Vec3::new(-s, 0.0, c);
            // Runs down the slant; crossing with the tangent tilts the
            // normal upwards when the bottom is wider
            let bitangent = Vec3::new(slant_r * c, -slant_y, slant_r * s);
            let normal = tangent.cross(bitangent).normalize();

            mesh.add_vertex(Vertex::new(
                Vec3::new(r * c, y, r * s),
                normal,
                tangent,
                Vec2::new(j as f32 / slices as f32, v),
            ));
        }
    }

    let ring_len = slices + 1;
    for i in 0..stacks {
        for j in 0..slices {
            let i0 = base + i * ring_len + j;
            let i1 = base + (i + 1) * ring_len + j;

            mesh.add_triangle(i0, i1, i1 + 1);
            mesh.add_triangle(i0, i1 + 1, i0 + 1);
        }
    }

    // Keep cap texcoords inside [0, 1] when the caps are wider than the height
    let max_radius = params.bottom_radius.max(params.top_radius);
    let uv_scale = height.max(2.0 * max_radius);

    build_cap(mesh, params.top_radius, 0.5 * height, Cap::Top, slices, uv_scale);
    build_cap(mesh, params.bottom_radius, -0.5 * height, Cap::Bottom, slices, uv_scale);
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Cap {
    Top,
    Bottom,
}

fn build_cap<M: MeshBuilder>(
    mesh: &mut M,
    radius: f32,
    y: f32,
    cap: Cap,
    slices: u32,
    uv_scale: f32,
) {
    let normal = match cap {
        Cap::Top => Vec3::Y,
        Cap::Bottom => Vec3::NEG_Y,
    };
    let theta_step = 2.0 * PI / slices as f32;

    // Ring is duplicated from the side: normals and texcoords differ
    let base = mesh.vertex_count();
    for i in 0..=slices {
        let (s, c) = (i as f32 * theta_step).sin_cos();
        let x = radius * c;
        let z = radius * s;
        let uv = Vec2::new(x / uv_scale + 0.5, z / uv_scale + 0.5);

        mesh.add_vertex(Vertex::new(Vec3::new(x, y, z), normal, Vec3::X, uv));
    }

    let center = mesh.add_vertex(Vertex::new(
        Vec3::new(0.0, y, 0.0),
        normal,
        Vec3::X,
        Vec2::splat(0.5),
    ));

    for i in 0..slices {
        match cap {
            Cap::Top => mesh.add_triangle(center, base + i + 1, base + i),
            Cap::Bottom => mesh.add_triangle(center, base + i, base + i + 1),
        }
    }
}
