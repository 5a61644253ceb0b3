//! Shape parameters, validation and size queries
//!
//! Every generator validates its parameters before touching any buffer, and
//! the size formulas live here only: [`MeshCounts`] returned by `counts()` is
//! exactly what the matching generator emits.

use serde::{Deserialize, Serialize};

use super::types::MeshCounts;
use crate::error::{Result, ShapeError};

/// Stack count used when none is given
pub const DEFAULT_STACKS: u32 = 20;
/// Slice count used when none is given
pub const DEFAULT_SLICES: u32 = 20;

/// Minimum grid rows/columns (one quad)
pub const MIN_GRID_DIVISIONS: u32 = 2;
/// Minimum sphere/cylinder stacks and slices
pub const MIN_ROUND_DIVISIONS: u32 = 3;

fn default_stacks() -> u32 {
    DEFAULT_STACKS
}

fn default_slices() -> u32 {
    DEFAULT_SLICES
}

fn check_dimension(shape: &'static str, name: &str, value: f32) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ShapeError::invalid(
            shape,
            format!("{name} must be a finite value > 0.0 (got {value})"),
        ))
    }
}

fn check_divisions(shape: &'static str, name: &str, value: u32, min: u32) -> Result<()> {
    if value >= min {
        Ok(())
    } else {
        Err(ShapeError::invalid(
            shape,
            format!("{name} must be >= {min} (got {value})"),
        ))
    }
}

/// Build counts from u64 arithmetic, rejecting meshes whose vertices cannot
/// all be addressed by a u32 index
fn checked_counts(shape: &'static str, vertices: u64, indices: u64) -> Result<MeshCounts> {
    if vertices > u64::from(u32::MAX) {
        return Err(ShapeError::invalid(
            shape,
            format!("{vertices} vertices exceed the u32 index space"),
        ));
    }
    let indices = usize::try_from(indices)
        .map_err(|_| ShapeError::invalid(shape, format!("{indices} indices do not fit in memory")))?;
    Ok(MeshCounts::new(vertices as usize, indices))
}

/// Axis-aligned box centred on the origin
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoxParams {
    pub width: f32,
    pub height: f32,
    pub depth: f32,
}

impl BoxParams {
    pub const VERTEX_COUNT: usize = 24;
    pub const INDEX_COUNT: usize = 36;

    pub fn new(width: f32, height: f32, depth: f32) -> Self {
        Self {
            width,
            height,
            depth,
        }
    }

    pub fn validate(&self) -> Result<()> {
        check_dimension("box", "width", self.width)?;
        check_dimension("box", "height", self.height)?;
        check_dimension("box", "depth", self.depth)
    }

    pub fn counts(&self) -> Result<MeshCounts> {
        self.validate()?;
        Ok(MeshCounts::new(Self::VERTEX_COUNT, Self::INDEX_COUNT))
    }
}

impl Default for BoxParams {
    fn default() -> Self {
        Self::new(1.0, 1.0, 1.0)
    }
}

/// Flat grid on the XZ plane, `rows` x `columns` vertices
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GridParams {
    pub width: f32,
    pub depth: f32,
    /// Vertex rows along Z (`m`)
    pub rows: u32,
    /// Vertex columns along X (`n`)
    pub columns: u32,
}

impl GridParams {
    pub fn new(width: f32, depth: f32, rows: u32, columns: u32) -> Self {
        Self {
            width,
            depth,
            rows,
            columns,
        }
    }

    pub fn validate(&self) -> Result<()> {
        check_dimension("grid", "width", self.width)?;
        check_dimension("grid", "depth", self.depth)?;
        check_divisions("grid", "rows", self.rows, MIN_GRID_DIVISIONS)?;
        check_divisions("grid", "columns", self.columns, MIN_GRID_DIVISIONS)
    }

    pub fn counts(&self) -> Result<MeshCounts> {
        self.validate()?;
        let m = u64::from(self.rows);
        let n = u64::from(self.columns);
        checked_counts("grid", m * n, (m - 1) * (n - 1) * 6)
    }
}

impl Default for GridParams {
    fn default() -> Self {
        Self::new(1.0, 1.0, MIN_GRID_DIVISIONS, MIN_GRID_DIVISIONS)
    }
}

/// UV sphere with single pole vertices
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SphereParams {
    pub radius: f32,
    /// Latitude bands from pole to pole (`p`)
    #[serde(default = "default_stacks")]
    pub stacks: u32,
    /// Longitude subdivisions (`q`)
    #[serde(default = "default_slices")]
    pub slices: u32,
}

impl SphereParams {
    pub fn new(radius: f32, stacks: u32, slices: u32) -> Self {
        Self {
            radius,
            stacks,
            slices,
        }
    }

    /// Sphere with the default 20 stacks and 20 slices
    pub fn with_radius(radius: f32) -> Self {
        Self::new(radius, DEFAULT_STACKS, DEFAULT_SLICES)
    }

    pub fn validate(&self) -> Result<()> {
        check_dimension("sphere", "radius", self.radius)?;
        check_divisions("sphere", "stacks", self.stacks, MIN_ROUND_DIVISIONS)?;
        check_divisions("sphere", "slices", self.slices, MIN_ROUND_DIVISIONS)
    }

    pub fn counts(&self) -> Result<MeshCounts> {
        self.validate()?;
        let p = u64::from(self.stacks);
        let q = u64::from(self.slices);
        checked_counts("sphere", 2 + (p - 1) * (q + 1), 6 * q * (p - 1))
    }
}

impl Default for SphereParams {
    fn default() -> Self {
        Self::with_radius(1.0)
    }
}

/// Capped cylinder or truncated cone standing on the Y axis
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CylinderParams {
    pub bottom_radius: f32,
    pub top_radius: f32,
    pub height: f32,
    /// Rings are `stacks + 1`, bottom to top (`p`)
    #[serde(default = "default_stacks")]
    pub stacks: u32,
    /// Circumference subdivisions (`q`)
    #[serde(default = "default_slices")]
    pub slices: u32,
}

impl CylinderParams {
    pub fn new(bottom_radius: f32, top_radius: f32, height: f32, stacks: u32, slices: u32) -> Self {
        Self {
            bottom_radius,
            top_radius,
            height,
            stacks,
            slices,
        }
    }

    /// Cylinder with the default 20 stacks and 20 slices
    pub fn with_dimensions(bottom_radius: f32, top_radius: f32, height: f32) -> Self {
        Self::new(bottom_radius, top_radius, height, DEFAULT_STACKS, DEFAULT_SLICES)
    }

    pub fn validate(&self) -> Result<()> {
        check_dimension("cylinder", "bottom_radius", self.bottom_radius)?;
        check_dimension("cylinder", "top_radius", self.top_radius)?;
        check_dimension("cylinder", "height", self.height)?;
        check_divisions("cylinder", "stacks", self.stacks, MIN_ROUND_DIVISIONS)?;
        check_divisions("cylinder", "slices", self.slices, MIN_ROUND_DIVISIONS)
    }

    pub fn counts(&self) -> Result<MeshCounts> {
        self.validate()?;
        let p = u64::from(self.stacks);
        let q = u64::from(self.slices);
        checked_counts(
            "cylinder",
            (p + 1) * (q + 1) + 2 * (q + 2),
            6 * p * q + 6 * q,
        )
    }
}

impl Default for CylinderParams {
    fn default() -> Self {
        Self::with_dimensions(0.5, 0.5, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_match_formulas() {
        assert_eq!(BoxParams::default().counts().unwrap(), MeshCounts::new(24, 36));
        assert_eq!(
            GridParams::new(20.0, 30.0, 40, 60).counts().unwrap(),
            MeshCounts::new(2400, 13806)
        );
        assert_eq!(
            SphereParams::new(0.5, 20, 20).counts().unwrap(),
            MeshCounts::new(401, 2280)
        );
        assert_eq!(
            CylinderParams::new(0.5, 0.3, 3.0, 20, 20).counts().unwrap(),
            MeshCounts::new(485, 2520)
        );
    }

    #[test]
    fn test_rejects_non_positive_dimensions() {
        assert!(BoxParams::new(0.0, 1.0, 1.0).validate().is_err());
        assert!(BoxParams::new(1.0, -1.0, 1.0).validate().is_err());
        assert!(GridParams::new(1.0, f32::NAN, 4, 4).validate().is_err());
        assert!(SphereParams::new(f32::INFINITY, 8, 8).validate().is_err());
        assert!(CylinderParams::new(0.5, 0.0, 1.0, 8, 8).validate().is_err());
    }

    #[test]
    fn test_rejects_degenerate_divisions() {
        let err = GridParams::new(1.0, 1.0, 1, 5).counts().unwrap_err();
        assert!(matches!(err, ShapeError::InvalidParameter { shape: "grid", .. }));
        assert!(GridParams::new(1.0, 1.0, 5, 1).validate().is_err());

        let err = SphereParams::new(1.0, 2, 5).counts().unwrap_err();
        assert!(matches!(err, ShapeError::InvalidParameter { shape: "sphere", .. }));
        assert!(SphereParams::new(1.0, 5, 2).validate().is_err());

        assert!(CylinderParams::new(1.0, 1.0, 1.0, 2, 8).validate().is_err());
        assert!(CylinderParams::new(1.0, 1.0, 1.0, 8, 2).validate().is_err());
    }

    #[test]
    fn test_rejects_index_space_overflow() {
        let err = GridParams::new(1.0, 1.0, 100_000, 100_000).counts().unwrap_err();
        assert!(err.to_string().contains("u32 index space"));
    }

    #[test]
    fn test_minimum_divisions_accepted() {
        assert_eq!(
            GridParams::new(1.0, 1.0, 2, 2).counts().unwrap(),
            MeshCounts::new(4, 6)
        );
        assert_eq!(
            SphereParams::new(1.0, 3, 3).counts().unwrap(),
            MeshCounts::new(10, 36)
        );
    }
}
