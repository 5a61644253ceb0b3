//! Scene descriptions: which submeshes to generate and in what order
//!
//! A scene is a TOML file with one `[[submesh]]` table per shape. Packing
//! order is declaration order, so region names and offsets are stable.
//!
//! ```toml
//! [[submesh]]
//! name = "sphere"
//! shape = "sphere"
//! radius = 0.5
//! stacks = 20   # optional, default 20
//! slices = 20   # optional, default 20
//! ```

use std::path::Path;

use hashbrown::HashSet;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{Result, ShapeError};
use crate::packer::{MergedMesh, MeshPacker};
use crate::procedural::{
    BoxParams, CylinderParams, GridParams, Mesh, MeshCounts, Shape, SphereParams,
};

/// One named shape in a scene
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SubmeshDescription {
    pub name: String,
    #[serde(flatten)]
    pub shape: Shape,
}

impl SubmeshDescription {
    pub fn new(name: impl Into<String>, shape: impl Into<Shape>) -> Self {
        Self {
            name: name.into(),
            shape: shape.into(),
        }
    }
}

/// Ordered list of submeshes to generate and pack
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneDescription {
    #[serde(rename = "submesh", default)]
    pub submeshes: Vec<SubmeshDescription>,
}

impl SceneDescription {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| ShapeError::Config(e.to_string()))
    }

    /// Load a scene description from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| ShapeError::Config(e.to_string()))
    }

    /// The classic shapes scene: a box, a ground grid, a sphere and a cylinder
    pub fn shapes_demo() -> Self {
        Self {
            submeshes: vec![
                SubmeshDescription::new("box", BoxParams::new(1.5, 0.5, 1.5)),
                SubmeshDescription::new("grid", GridParams::new(20.0, 30.0, 60, 40)),
                SubmeshDescription::new("sphere", SphereParams::with_radius(0.5)),
                SubmeshDescription::new("cylinder", CylinderParams::with_dimensions(0.5, 0.3, 3.0)),
            ],
        }
    }

    /// Check names are unique and every shape is valid
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for submesh in &self.submeshes {
            if !seen.insert(submesh.name.as_str()) {
                return Err(ShapeError::DuplicateSubmesh(submesh.name.clone()));
            }
            submesh.shape.validate()?;
        }
        Ok(())
    }

    /// Per-submesh counts, in declaration order
    pub fn counts(&self) -> Result<Vec<(&str, MeshCounts)>> {
        self.submeshes
            .iter()
            .map(|s| Ok((s.name.as_str(), s.shape.counts()?)))
            .collect()
    }

    /// Totals for the merged buffers
    pub fn total_counts(&self) -> Result<MeshCounts> {
        Ok(self.counts()?.into_iter().map(|(_, c)| c).sum())
    }
}

/// Generate every submesh and pack them in declaration order
///
/// Generation runs in parallel; packing is sequential so the result does not
/// depend on scheduling.
pub fn build_scene(scene: &SceneDescription) -> Result<MergedMesh> {
    scene.validate()?;
    let total = scene.total_counts()?;

    let meshes = scene
        .submeshes
        .par_iter()
        .map(|s| s.shape.generate())
        .collect::<Result<Vec<Mesh>>>()?;

    let mut packer = MeshPacker::with_capacity(total);
    for (submesh, mesh) in scene.submeshes.iter().zip(&meshes) {
        packer.push(&submesh.name, mesh)?;
    }
    let merged = packer.finish();

    info!(
        submeshes = scene.submeshes.len(),
        vertices = merged.vertices().len(),
        indices = merged.indices().len(),
        "built scene"
    );
    Ok(merged)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCENE: &str = r#"
[[submesh]]
name = "crate"
shape = "box"
width = 1.5
height = 0.5
depth = 1.5

[[submesh]]
name = "ground"
shape = "grid"
width = 20.0
depth = 30.0
rows = 60
columns = 40

[[submesh]]
name = "ball"
shape = "sphere"
radius = 0.5

[[submesh]]
name = "pillar"
shape = "cylinder"
bottom_radius = 0.5
top_radius = 0.3
height = 3.0
stacks = 10
slices = 12
"#;

    #[test]
    fn test_parse_scene() {
        let scene = SceneDescription::from_toml_str(SCENE).unwrap();
        assert_eq!(scene.submeshes.len(), 4);
        assert_eq!(scene.submeshes[0].name, "crate");
        assert_eq!(scene.submeshes[0].shape, Shape::Box(BoxParams::new(1.5, 0.5, 1.5)));
        // Omitted stacks/slices fall back to 20
        assert_eq!(scene.submeshes[2].shape, Shape::Sphere(SphereParams::new(0.5, 20, 20)));
        assert_eq!(
            scene.submeshes[3].shape,
            Shape::Cylinder(CylinderParams::new(0.5, 0.3, 3.0, 10, 12))
        );
    }

    #[test]
    fn test_unknown_shape_is_config_error() {
        let err = SceneDescription::from_toml_str(
            "[[submesh]]\nname = \"t\"\nshape = \"torus\"\nradius = 1.0\n",
        )
        .unwrap_err();
        assert!(matches!(err, ShapeError::Config(_)));
    }

    #[test]
    fn test_empty_scene() {
        let scene = SceneDescription::from_toml_str("").unwrap();
        assert!(scene.submeshes.is_empty());
        let merged = build_scene(&scene).unwrap();
        assert_eq!(merged.regions().len(), 0);
    }

    #[test]
    fn test_build_scene_in_declaration_order() {
        let scene = SceneDescription::from_toml_str(SCENE).unwrap();
        let merged = build_scene(&scene).unwrap();

        let names: Vec<&str> = merged.regions().map(|(n, _)| n).collect();
        assert_eq!(names, ["crate", "ground", "ball", "pillar"]);
        assert_eq!(merged.counts(), scene.total_counts().unwrap());
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let scene = SceneDescription {
            submeshes: vec![
                SubmeshDescription::new("a", BoxParams::default()),
                SubmeshDescription::new("a", SphereParams::default()),
            ],
        };
        assert!(matches!(build_scene(&scene), Err(ShapeError::DuplicateSubmesh(_))));
    }

    #[test]
    fn test_invalid_shape_rejected() {
        let scene = SceneDescription {
            submeshes: vec![SubmeshDescription::new("g", GridParams::new(1.0, 1.0, 1, 5))],
        };
        assert!(matches!(
            build_scene(&scene),
            Err(ShapeError::InvalidParameter { shape: "grid", .. })
        ));
    }

    #[test]
    fn test_demo_scene_roundtrips_through_toml() {
        let demo = SceneDescription::shapes_demo();
        let text = demo.to_toml_string().unwrap();
        assert_eq!(SceneDescription::from_toml_str(&text).unwrap(), demo);
        assert_eq!(
            demo.total_counts().unwrap(),
            MeshCounts::new(24 + 2400 + 401 + 485, 36 + 13806 + 2280 + 2520)
        );
    }
}
