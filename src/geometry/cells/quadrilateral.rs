use crate::geometry::cells::{CellKernel, unsupported, vertex_points};
use crate::geometry::point::Point;
use crate::mesh_error::MeshError;
use crate::topology::cell_type::CellType;
use crate::topology::entity::MeshEntity;
use crate::topology::mesh_topology::MeshTopology;

const VERTICES: &[&[usize]] = &[&[0], &[1], &[2], &[3]];
// counter-clockwise boundary walk
const EDGES: &[&[usize]] = &[&[0, 1], &[1, 2], &[2, 3], &[3, 0]];
const CELL: &[&[usize]] = &[&[0, 1, 2, 3]];

/// Quadrilateral `[v0, v1, v2, v3]`, vertices counter-clockwise.
///
/// Supports topology, volume, diameter and facet areas only.
#[derive(Clone, Copy, Debug, Default)]
pub struct QuadrilateralCell;

/// Largest distance between any two of `points`.
pub(super) fn max_vertex_distance(points: &[Point]) -> f64 {
    let mut d2: f64 = 0.0;
    for (i, p) in points.iter().enumerate() {
        for q in &points[i + 1..] {
            d2 = d2.max(p.squared_distance(q));
        }
    }
    d2.sqrt()
}

impl CellKernel for QuadrilateralCell {
    fn cell_type(&self) -> CellType {
        CellType::Quadrilateral
    }

    fn entity_pattern(&self, d: usize) -> Result<&'static [&'static [usize]], MeshError> {
        match d {
            0 => Ok(VERTICES),
            1 => Ok(EDGES),
            2 => Ok(CELL),
            _ => Err(MeshError::InvalidDimension { dim: d, max: 2 }),
        }
    }

    /// Sum of the triangles `(v0, v1, v2)` and `(v0, v2, v3)`.
    fn volume(&self, entity: &MeshEntity<'_>) -> Result<f64, MeshError> {
        let [p0, p1, p2, p3] = vertex_points::<4>(entity, 2)?;
        Ok(0.5 * (p1 - p0).cross(&(p2 - p0)).norm() + 0.5 * (p2 - p0).cross(&(p3 - p0)).norm())
    }

    fn diameter(&self, entity: &MeshEntity<'_>) -> Result<f64, MeshError> {
        Ok(max_vertex_distance(&vertex_points::<4>(entity, 2)?))
    }

    fn closest_point(&self, _entity: &MeshEntity<'_>, _point: &Point) -> Result<Point, MeshError> {
        unsupported("closest point", CellType::Quadrilateral)
    }

    fn contains(&self, _entity: &MeshEntity<'_>, _point: &Point) -> Result<bool, MeshError> {
        unsupported("contains", CellType::Quadrilateral)
    }

    fn normal(&self, _cell: &MeshEntity<'_>, _facet: usize) -> Result<Point, MeshError> {
        unsupported("normal", CellType::Quadrilateral)
    }

    fn cell_normal(&self, _cell: &MeshEntity<'_>) -> Result<Point, MeshError> {
        unsupported("cell normal", CellType::Quadrilateral)
    }

    fn radius_ratio(&self, _cell: &MeshEntity<'_>) -> Result<f64, MeshError> {
        unsupported("radius ratio", CellType::Quadrilateral)
    }

    fn order(&self, _topology: &mut MeshTopology, _cell: usize) -> Result<(), MeshError> {
        unsupported("order", CellType::Quadrilateral)
    }
}
