//! Cell type metadata for mesh cells.
//!
//! A [`CellType`] is the tag selected once when a mesh is built. The
//! type-specific formulas live behind [`CellType::kernel`], which hands out a
//! `'static` capability handle implementing [`CellKernel`].

use serde::{Deserialize, Serialize};

use crate::geometry::cells::{
    CellKernel, HexahedronCell, IntervalCell, PointCell, QuadrilateralCell, TetrahedronCell,
    TriangleCell,
};
use crate::mesh_error::MeshError;

/// Supported cell types.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub enum CellType {
    /// 0D vertex cell (boundary of an interval mesh).
    Point,
    /// 1D segment.
    Interval,
    /// 2D simplex.
    Triangle,
    /// 3D simplex.
    Tetrahedron,
    /// 2D tensor-product cell.
    Quadrilateral,
    /// 3D tensor-product cell.
    Hexahedron,
}

impl Default for CellType {
    fn default() -> Self {
        CellType::Triangle
    }
}

impl CellType {
    /// Returns the topological dimension of the cell.
    pub fn dim(self) -> usize {
        match self {
            CellType::Point => 0,
            CellType::Interval => 1,
            CellType::Triangle | CellType::Quadrilateral => 2,
            CellType::Tetrahedron | CellType::Hexahedron => 3,
        }
    }

    /// Simplex type of the given topological dimension.
    pub fn simplex(dim: usize) -> Result<CellType, MeshError> {
        match dim {
            0 => Ok(CellType::Point),
            1 => Ok(CellType::Interval),
            2 => Ok(CellType::Triangle),
            3 => Ok(CellType::Tetrahedron),
            _ => Err(MeshError::InvalidDimension { dim, max: 3 }),
        }
    }

    pub fn is_simplex(self) -> bool {
        !matches!(self, CellType::Quadrilateral | CellType::Hexahedron)
    }

    /// Type of the codimension-1 entities of this cell.
    pub fn facet_type(self) -> Result<CellType, MeshError> {
        match self {
            CellType::Point => Err(MeshError::UnsupportedOperation {
                op: "facet type",
                cell_type: self,
            }),
            CellType::Interval => Ok(CellType::Point),
            CellType::Triangle | CellType::Quadrilateral => Ok(CellType::Interval),
            CellType::Tetrahedron => Ok(CellType::Triangle),
            CellType::Hexahedron => Ok(CellType::Quadrilateral),
        }
    }

    /// Type of the sub-entities of dimension `d`.
    pub fn entity_type(self, d: usize) -> Result<CellType, MeshError> {
        let tdim = self.dim();
        if d > tdim {
            return Err(MeshError::InvalidDimension { dim: d, max: tdim });
        }
        if d == tdim {
            return Ok(self);
        }
        match (self, d) {
            (CellType::Hexahedron, 2) => Ok(CellType::Quadrilateral),
            _ => CellType::simplex(d),
        }
    }

    /// Number of sub-entities of dimension `d` in one cell.
    pub fn num_entities(self, d: usize) -> Result<usize, MeshError> {
        self.kernel().num_entities(d)
    }

    /// Number of vertices of a sub-entity of dimension `d`.
    pub fn num_vertices(self, d: usize) -> Result<usize, MeshError> {
        self.kernel().num_vertices(d)
    }

    /// Number of vertices of the cell itself.
    pub fn cell_vertices(self) -> usize {
        match self {
            CellType::Point => 1,
            CellType::Interval => 2,
            CellType::Triangle => 3,
            CellType::Tetrahedron | CellType::Quadrilateral => 4,
            CellType::Hexahedron => 8,
        }
    }

    /// Capability handle with the type-specific formulas.
    pub fn kernel(self) -> &'static dyn CellKernel {
        match self {
            CellType::Point => &PointCell,
            CellType::Interval => &IntervalCell,
            CellType::Triangle => &TriangleCell,
            CellType::Tetrahedron => &TetrahedronCell,
            CellType::Quadrilateral => &QuadrilateralCell,
            CellType::Hexahedron => &HexahedronCell,
        }
    }

    /// Human-readable name.
    pub fn description(self, plural: bool) -> &'static str {
        match (self, plural) {
            (CellType::Point, false) => "point",
            (CellType::Point, true) => "points",
            (CellType::Interval, false) => "interval",
            (CellType::Interval, true) => "intervals",
            (CellType::Triangle, false) => "triangle",
            (CellType::Triangle, true) => "triangles",
            (CellType::Tetrahedron, false) => "tetrahedron",
            (CellType::Tetrahedron, true) => "tetrahedra",
            (CellType::Quadrilateral, false) => "quadrilateral",
            (CellType::Quadrilateral, true) => "quadrilaterals",
            (CellType::Hexahedron, false) => "hexahedron",
            (CellType::Hexahedron, true) => "hexahedra",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dimensions_and_facets() {
        assert_eq!(CellType::Tetrahedron.dim(), 3);
        assert_eq!(CellType::Tetrahedron.facet_type().unwrap(), CellType::Triangle);
        assert_eq!(CellType::Triangle.facet_type().unwrap(), CellType::Interval);
        assert_eq!(CellType::Interval.facet_type().unwrap(), CellType::Point);
        assert!(CellType::Point.facet_type().is_err());
        assert_eq!(
            CellType::Hexahedron.entity_type(2).unwrap(),
            CellType::Quadrilateral
        );
    }

    #[test]
    fn entity_counts_per_type() {
        assert_eq!(CellType::Triangle.num_entities(1).unwrap(), 3);
        assert_eq!(CellType::Tetrahedron.num_entities(1).unwrap(), 6);
        assert_eq!(CellType::Tetrahedron.num_entities(2).unwrap(), 4);
        assert_eq!(CellType::Hexahedron.num_entities(1).unwrap(), 12);
        assert_eq!(CellType::Hexahedron.num_vertices(2).unwrap(), 4);
        assert!(matches!(
            CellType::Triangle.num_entities(3),
            Err(MeshError::InvalidDimension { dim: 3, max: 2 })
        ));
    }

    #[test]
    fn json_roundtrip() {
        let s = serde_json::to_string(&CellType::Tetrahedron).unwrap();
        let back: CellType = serde_json::from_str(&s).unwrap();
        assert_eq!(back, CellType::Tetrahedron);
    }
}
