//! Wavefront OBJ export and region manifests
//!
//! OBJ output is for inspection in DCC tools; the manifest is the JSON
//! description of the merged buffers consumed by a renderer.

use std::io::Write;

use serde::Serialize;

use crate::error::Result;
use crate::packer::{MergedMesh, SubmeshRegion};
use crate::procedural::Mesh;
use crate::vertex::{VERTEX_ATTRIBUTES, VERTEX_STRIDE, Vertex, VertexAttribute};

/// Write a single mesh as an OBJ object named `name`
pub fn write_obj<W: Write>(mesh: &Mesh, writer: &mut W, name: &str) -> Result<()> {
    writeln!(
        writer,
        "# shapegen: {} vertices, {} triangles",
        mesh.vertices.len(),
        mesh.triangle_count()
    )?;
    writeln!(writer, "o {name}")?;
    write_vertices(writer, &mesh.vertices)?;
    write_faces(writer, &mesh.indices, 0)?;
    Ok(())
}

/// Write a merged mesh as one OBJ object with a group per submesh
///
/// Face indices are made absolute by applying each region's base vertex.
pub fn write_merged_obj<W: Write>(merged: &MergedMesh, writer: &mut W) -> Result<()> {
    let counts = merged.counts();
    writeln!(
        writer,
        "# shapegen: {} submeshes, {} vertices, {} triangles",
        merged.regions().len(),
        counts.vertices,
        counts.triangles()
    )?;
    writeln!(writer, "o merged")?;
    write_vertices(writer, merged.vertices())?;

    for (name, region) in merged.regions() {
        writeln!(writer, "g {name}")?;
        let start = region.index_offset as usize;
        let indices = &merged.indices()[start..start + region.index_count as usize];
        write_faces(writer, indices, region.vertex_offset)?;
    }
    Ok(())
}

fn write_vertices<W: Write>(writer: &mut W, vertices: &[Vertex]) -> Result<()> {
    for v in vertices {
        let [x, y, z] = v.position;
        writeln!(writer, "v {x} {y} {z}")?;
    }
    // OBJ texture space has V pointing up
    for v in vertices {
        let [u, t] = v.texcoord;
        writeln!(writer, "vt {u} {}", 1.0 - t)?;
    }
    for v in vertices {
        let [x, y, z] = v.normal;
        writeln!(writer, "vn {x} {y} {z}")?;
    }
    Ok(())
}

fn write_faces<W: Write>(writer: &mut W, indices: &[u32], base_vertex: u32) -> Result<()> {
    for tri in indices.chunks_exact(3) {
        // OBJ indices are 1-based
        let [a, b, c] =
            [tri[0], tri[1], tri[2]].map(|i| u64::from(i) + u64::from(base_vertex) + 1);
        writeln!(writer, "f {a}/{a}/{a} {b}/{b}/{b} {c}/{c}/{c}")?;
    }
    Ok(())
}

/// One region as listed in a [`RegionManifest`]
#[derive(Clone, Debug, Serialize)]
pub struct ManifestEntry<'a> {
    pub name: &'a str,
    #[serde(flatten)]
    pub region: SubmeshRegion,
}

/// JSON description of a merged mesh's buffers and regions
#[derive(Clone, Debug, Serialize)]
pub struct RegionManifest<'a> {
    pub vertex_stride: u32,
    pub attributes: &'static [VertexAttribute],
    pub index_format: &'static str,
    /// Indices are submesh-local; draw with `vertex_offset` as base vertex
    pub base_vertex_indices: bool,
    pub vertex_count: usize,
    pub index_count: usize,
    pub submeshes: Vec<ManifestEntry<'a>>,
}

impl<'a> RegionManifest<'a> {
    pub fn new(merged: &'a MergedMesh) -> Self {
        let counts = merged.counts();
        Self {
            vertex_stride: VERTEX_STRIDE,
            attributes: &VERTEX_ATTRIBUTES,
            index_format: "u32",
            base_vertex_indices: true,
            vertex_count: counts.vertices,
            index_count: counts.indices,
            submeshes: merged
                .regions()
                .map(|(name, region)| ManifestEntry { name, region })
                .collect(),
        }
    }
}

/// Write the region manifest of `merged` as pretty-printed JSON
pub fn write_manifest<W: Write>(merged: &MergedMesh, writer: &mut W) -> Result<()> {
    serde_json::to_writer_pretty(&mut *writer, &RegionManifest::new(merged))
        .map_err(std::io::Error::from)?;
    writeln!(writer)?;
    Ok(())
}
