//! Packing several meshes into one shared vertex buffer and index buffer
//!
//! Indices stay local to their submesh (each starts at 0). The renderer adds
//! [`SubmeshRegion::vertex_offset`] as the base vertex of the draw call, so
//! packing never rewrites index values. [`MergedMesh::rebased_indices`]
//! produces the baked variant for renderers without base-vertex draws.

use hashbrown::HashMap;
use serde::Serialize;
use tracing::debug;

use crate::error::{Result, ShapeError};
use crate::procedural::{Mesh, MeshCounts, check_capacity};
use crate::vertex::Vertex;

/// Location of one submesh inside a [`MergedMesh`]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SubmeshRegion {
    /// First vertex of the submesh; the base vertex for its draw call
    pub vertex_offset: u32,
    pub vertex_count: u32,
    /// First index of the submesh in the shared index buffer
    pub index_offset: u32,
    pub index_count: u32,
}

impl SubmeshRegion {
    /// Arguments for one indexed draw of this region
    pub fn draw_call(&self) -> DrawIndexed {
        DrawIndexed {
            index_count: self.index_count,
            first_index: self.index_offset,
            base_vertex: self.vertex_offset,
        }
    }

    fn vertex_range(&self) -> std::ops::Range<usize> {
        let start = self.vertex_offset as usize;
        start..start + self.vertex_count as usize
    }

    fn index_range(&self) -> std::ops::Range<usize> {
        let start = self.index_offset as usize;
        start..start + self.index_count as usize
    }
}

/// Indexed draw with base-vertex adjustment
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DrawIndexed {
    pub index_count: u32,
    pub first_index: u32,
    pub base_vertex: u32,
}

/// Named regions in packing order, with name lookup
#[derive(Clone, Debug, Default)]
struct RegionTable {
    regions: Vec<(String, SubmeshRegion)>,
    lookup: HashMap<String, usize>,
    totals: MeshCounts,
}

impl RegionTable {
    /// Reserve the next region for `mesh`, advancing both running totals
    fn append(&mut self, name: &str, mesh: &Mesh) -> Result<SubmeshRegion> {
        if self.lookup.contains_key(name) {
            return Err(ShapeError::DuplicateSubmesh(name.to_string()));
        }
        if mesh.indices.len() % 3 != 0 {
            return Err(ShapeError::invalid(
                "mesh",
                format!(
                    "submesh '{name}' has {} indices, not a whole triangle list",
                    mesh.indices.len()
                ),
            ));
        }
        if !mesh.indices_in_bounds() {
            return Err(ShapeError::invalid(
                "mesh",
                format!("submesh '{name}' has indices past its {} vertices", mesh.vertices.len()),
            ));
        }

        let vertex_end = self.totals.vertices + mesh.vertices.len();
        let index_end = self.totals.indices + mesh.indices.len();
        if vertex_end > u32::MAX as usize {
            return Err(ShapeError::IndexOverflow {
                buffer: "vertex",
                required: vertex_end,
            });
        }
        if index_end > u32::MAX as usize {
            return Err(ShapeError::IndexOverflow {
                buffer: "index",
                required: index_end,
            });
        }

        let region = SubmeshRegion {
            vertex_offset: self.totals.vertices as u32,
            vertex_count: mesh.vertices.len() as u32,
            index_offset: self.totals.indices as u32,
            index_count: mesh.indices.len() as u32,
        };
        self.totals = MeshCounts::new(vertex_end, index_end);
        self.lookup.insert(name.to_string(), self.regions.len());
        self.regions.push((name.to_string(), region));

        debug!(
            submesh = name,
            vertex_offset = region.vertex_offset,
            vertex_count = region.vertex_count,
            index_offset = region.index_offset,
            index_count = region.index_count,
            "packed submesh"
        );
        Ok(region)
    }
}

/// Incremental builder for a [`MergedMesh`]
///
/// # Example
/// ```
/// use shapegen::packer::MeshPacker;
/// use shapegen::procedural::{BoxParams, Shape, SphereParams};
///
/// let mut packer = MeshPacker::new();
/// packer.push("box", &Shape::from(BoxParams::default()).generate()?)?;
/// let sphere = packer.push("sphere", &Shape::from(SphereParams::with_radius(0.5)).generate()?)?;
/// assert_eq!(sphere.vertex_offset, 24);
///
/// let merged = packer.finish();
/// assert_eq!(merged.vertices().len(), 24 + 401);
/// # Ok::<(), shapegen::ShapeError>(())
/// ```
#[derive(Debug, Default)]
pub struct MeshPacker {
    vertices: Vec<Vertex>,
    indices: Vec<u32>,
    table: RegionTable,
}

impl MeshPacker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-allocate for the expected totals
    pub fn with_capacity(counts: MeshCounts) -> Self {
        Self {
            vertices: Vec::with_capacity(counts.vertices),
            indices: Vec::with_capacity(counts.indices),
            table: RegionTable::default(),
        }
    }

    /// Append a mesh under `name` and return where it landed
    ///
    /// Nothing is appended if the name is taken or the buffers would outgrow
    /// 32-bit offsets.
    pub fn push(&mut self, name: impl AsRef<str>, mesh: &Mesh) -> Result<SubmeshRegion> {
        let region = self.table.append(name.as_ref(), mesh)?;
        self.vertices.extend_from_slice(&mesh.vertices);
        self.indices.extend_from_slice(&mesh.indices);
        Ok(region)
    }

    /// Totals packed so far
    pub fn counts(&self) -> MeshCounts {
        self.table.totals
    }

    pub fn finish(self) -> MergedMesh {
        debug!(
            submeshes = self.table.regions.len(),
            vertices = self.vertices.len(),
            indices = self.indices.len(),
            "finished merged mesh"
        );
        MergedMesh {
            vertices: self.vertices,
            indices: self.indices,
            table: self.table,
        }
    }
}

/// Pack `meshes` in order into one merged mesh
pub fn pack<N: AsRef<str>>(meshes: &[(N, Mesh)]) -> Result<MergedMesh> {
    let total: MeshCounts = meshes.iter().map(|(_, m)| m.counts()).sum();
    let mut packer = MeshPacker::with_capacity(total);
    for (name, mesh) in meshes {
        packer.push(name, mesh)?;
    }
    Ok(packer.finish())
}

/// Pack `meshes` in order into caller-owned buffers
///
/// All regions are planned and both buffers checked before anything is
/// copied, so a failed call leaves the buffers untouched.
pub fn pack_into<N: AsRef<str>>(
    meshes: &[(N, Mesh)],
    vertices: &mut [Vertex],
    indices: &mut [u32],
) -> Result<Vec<(String, SubmeshRegion)>> {
    let mut table = RegionTable::default();
    for (name, mesh) in meshes {
        table.append(name.as_ref(), mesh)?;
    }
    check_capacity("vertex", table.totals.vertices, vertices.len())?;
    check_capacity("index", table.totals.indices, indices.len())?;

    for ((_, region), (_, mesh)) in table.regions.iter().zip(meshes) {
        vertices[region.vertex_range()].copy_from_slice(&mesh.vertices);
        indices[region.index_range()].copy_from_slice(&mesh.indices);
    }
    Ok(table.regions)
}

/// Shared vertex and index buffers for several submeshes
///
/// Immutable once built: hand it to the renderer, upload once, then draw each
/// region with [`SubmeshRegion::draw_call`].
#[derive(Clone, Debug)]
pub struct MergedMesh {
    vertices: Vec<Vertex>,
    indices: Vec<u32>,
    table: RegionTable,
}

impl MergedMesh {
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// Submesh-local indices, concatenated in packing order
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn counts(&self) -> MeshCounts {
        self.table.totals
    }

    pub fn region(&self, name: &str) -> Option<SubmeshRegion> {
        self.table.lookup.get(name).map(|&i| self.table.regions[i].1)
    }

    /// Regions in packing order
    pub fn regions(&self) -> impl ExactSizeIterator<Item = (&str, SubmeshRegion)> + '_ {
        self.table.regions.iter().map(|(name, r)| (name.as_str(), *r))
    }

    /// One draw call per region, in packing order
    pub fn draw_calls(&self) -> impl Iterator<Item = (&str, DrawIndexed)> + '_ {
        self.regions().map(|(name, r)| (name, r.draw_call()))
    }

    /// Vertices of one submesh
    pub fn submesh_vertices(&self, name: &str) -> Option<&[Vertex]> {
        self.region(name).map(|r| &self.vertices[r.vertex_range()])
    }

    /// Local indices of one submesh
    pub fn submesh_indices(&self, name: &str) -> Option<&[u32]> {
        self.region(name).map(|r| &self.indices[r.index_range()])
    }

    /// Copy of the index buffer with each region's base vertex baked in
    pub fn rebased_indices(&self) -> Vec<u32> {
        let mut rebased = Vec::with_capacity(self.indices.len());
        for (_, region) in &self.table.regions {
            rebased.extend(
                self.indices[region.index_range()]
                    .iter()
                    .map(|&i| i + region.vertex_offset),
            );
        }
        rebased
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::procedural::{BoxParams, CylinderParams, GridParams, Shape, SphereParams};

    fn scene() -> Vec<(&'static str, Mesh)> {
        vec![
            ("box", Shape::from(BoxParams::new(1.5, 0.5, 1.5)).generate().unwrap()),
            ("grid", Shape::from(GridParams::new(20.0, 30.0, 60, 40)).generate().unwrap()),
            ("sphere", Shape::from(SphereParams::with_radius(0.5)).generate().unwrap()),
            (
                "cylinder",
                Shape::from(CylinderParams::with_dimensions(0.5, 0.3, 3.0))
                    .generate()
                    .unwrap(),
            ),
        ]
    }

    #[test]
    fn test_pack_empty() {
        let merged = pack::<&str>(&[]).unwrap();
        assert!(merged.vertices().is_empty());
        assert!(merged.indices().is_empty());
        assert_eq!(merged.regions().len(), 0);
    }

    #[test]
    fn test_regions_follow_running_totals() {
        let meshes = scene();
        let merged = pack(&meshes).unwrap();

        let mut vertex_offset = 0;
        let mut index_offset = 0;
        for ((name, region), (expected_name, mesh)) in merged.regions().zip(&meshes) {
            assert_eq!(name, *expected_name);
            assert_eq!(region.vertex_offset, vertex_offset);
            assert_eq!(region.index_offset, index_offset);
            assert_eq!(region.vertex_count as usize, mesh.vertices.len());
            assert_eq!(region.index_count as usize, mesh.indices.len());
            vertex_offset += region.vertex_count;
            index_offset += region.index_count;
        }

        assert_eq!(merged.vertices().len(), vertex_offset as usize);
        assert_eq!(merged.indices().len(), index_offset as usize);
        assert_eq!(
            merged.counts(),
            MeshCounts::new(24 + 2400 + 401 + 485, 36 + 13806 + 2280 + 2520)
        );
    }

    #[test]
    fn test_indices_stay_local() {
        let meshes = scene();
        let merged = pack(&meshes).unwrap();

        for (name, mesh) in &meshes {
            assert_eq!(merged.submesh_indices(name).unwrap(), mesh.indices.as_slice());
            assert_eq!(merged.submesh_vertices(name).unwrap(), mesh.vertices.as_slice());
        }

        let sphere = merged.region("sphere").unwrap();
        assert_eq!(sphere.vertex_offset, 24 + 2400);
        assert_eq!(merged.submesh_indices("sphere").unwrap()[0], 0);
    }

    #[test]
    fn test_rebased_indices_resolve_to_same_vertices() {
        let meshes = scene();
        let merged = pack(&meshes).unwrap();
        let rebased = merged.rebased_indices();
        assert_eq!(rebased.len(), merged.indices().len());

        for (name, draw) in merged.draw_calls() {
            let mesh = &meshes.iter().find(|(n, _)| *n == name).unwrap().1;
            let start = draw.first_index as usize;
            for (k, &local) in mesh.indices.iter().enumerate() {
                let global = rebased[start + k];
                assert_eq!(global, local + draw.base_vertex);
                assert_eq!(merged.vertices()[global as usize], mesh.vertices[local as usize]);
            }
        }
    }

    #[test]
    fn test_duplicate_name_rejected_without_side_effects() {
        let mesh = Shape::from(BoxParams::default()).generate().unwrap();
        let mut packer = MeshPacker::new();
        packer.push("box", &mesh).unwrap();

        let err = packer.push("box", &mesh).unwrap_err();
        assert!(matches!(err, ShapeError::DuplicateSubmesh(ref n) if n == "box"));
        assert_eq!(packer.counts(), MeshCounts::new(24, 36));
        assert_eq!(packer.finish().vertices().len(), 24);
    }

    #[test]
    fn test_out_of_bounds_mesh_rejected() {
        let mut mesh = Shape::from(BoxParams::default()).generate().unwrap();
        mesh.indices[5] = 24;
        let err = pack(&[("broken", mesh)]).unwrap_err();
        assert!(matches!(err, ShapeError::InvalidParameter { shape: "mesh", .. }));
    }

    #[test]
    fn test_partial_triangle_rejected() {
        let mut mesh = Shape::from(BoxParams::default()).generate().unwrap();
        mesh.indices.truncate(35);

        let mut packer = MeshPacker::new();
        let err = packer.push("broken", &mesh).unwrap_err();
        assert!(matches!(err, ShapeError::InvalidParameter { shape: "mesh", .. }));
        assert!(err.to_string().contains("35 indices"));
        assert_eq!(packer.counts(), MeshCounts::default());

        let mut vertices = vec![Vertex::default(); 24];
        let mut indices = vec![0u32; 36];
        assert!(pack_into(&[("broken", mesh)], &mut vertices, &mut indices).is_err());
    }

    #[test]
    fn test_pack_into_matches_pack() {
        let meshes = scene();
        let merged = pack(&meshes).unwrap();
        let counts = merged.counts();

        let mut vertices = vec![Vertex::default(); counts.vertices];
        let mut indices = vec![0u32; counts.indices];
        let regions = pack_into(&meshes, &mut vertices, &mut indices).unwrap();

        assert_eq!(vertices, merged.vertices());
        assert_eq!(indices, merged.indices());
        for (name, region) in &regions {
            assert_eq!(Some(*region), merged.region(name));
        }
    }

    #[test]
    fn test_pack_into_capacity_mismatch() {
        let meshes = scene();
        let mut vertices = vec![Vertex::default(); 24 + 2400 + 401 + 485];
        let mut indices = vec![9u32; 100];

        let err = pack_into(&meshes, &mut vertices, &mut indices).unwrap_err();
        assert!(matches!(
            err,
            ShapeError::CapacityMismatch {
                buffer: "index",
                provided: 100,
                ..
            }
        ));
        assert!(indices.iter().all(|&i| i == 9));
        assert!(vertices.iter().all(|v| *v == Vertex::default()));
    }

    #[test]
    fn test_draw_calls() {
        let merged = pack(&scene()).unwrap();
        let calls: Vec<_> = merged.draw_calls().collect();
        assert_eq!(calls.len(), 4);
        assert_eq!(
            calls[1],
            (
                "grid",
                DrawIndexed {
                    index_count: 13806,
                    first_index: 36,
                    base_vertex: 24
                }
            )
        );
    }
}
