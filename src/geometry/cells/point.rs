use crate::geometry::cells::{CellKernel, unsupported, vertex_points};
use crate::geometry::point::Point;
use crate::mesh_error::MeshError;
use crate::topology::cell_type::CellType;
use crate::topology::entity::MeshEntity;
use crate::topology::mesh_topology::MeshTopology;

const VERTICES: &[&[usize]] = &[&[0]];

/// A single vertex, the cell of a boundary mesh of an interval mesh.
#[derive(Clone, Copy, Debug, Default)]
pub struct PointCell;

impl CellKernel for PointCell {
    fn cell_type(&self) -> CellType {
        CellType::Point
    }

    fn entity_pattern(&self, d: usize) -> Result<&'static [&'static [usize]], MeshError> {
        match d {
            0 => Ok(VERTICES),
            _ => Err(MeshError::InvalidDimension { dim: d, max: 0 }),
        }
    }

    /// Counting measure: every point has volume 1.
    fn volume(&self, entity: &MeshEntity<'_>) -> Result<f64, MeshError> {
        vertex_points::<1>(entity, 0)?;
        Ok(1.0)
    }

    fn diameter(&self, entity: &MeshEntity<'_>) -> Result<f64, MeshError> {
        vertex_points::<1>(entity, 0)?;
        Ok(0.0)
    }

    fn closest_point(&self, entity: &MeshEntity<'_>, _point: &Point) -> Result<Point, MeshError> {
        let [p] = vertex_points::<1>(entity, 0)?;
        Ok(p)
    }

    fn contains(&self, entity: &MeshEntity<'_>, point: &Point) -> Result<bool, MeshError> {
        let [p] = vertex_points::<1>(entity, 0)?;
        let tol = entity.mesh().options().tolerance;
        Ok(p.squared_distance(point) <= tol * tol)
    }

    fn normal(&self, _cell: &MeshEntity<'_>, _facet: usize) -> Result<Point, MeshError> {
        unsupported("normal", CellType::Point)
    }

    fn cell_normal(&self, _cell: &MeshEntity<'_>) -> Result<Point, MeshError> {
        unsupported("cell normal", CellType::Point)
    }

    fn facet_area(&self, _cell: &MeshEntity<'_>, _facet: usize) -> Result<f64, MeshError> {
        unsupported("facet area", CellType::Point)
    }

    fn radius_ratio(&self, _cell: &MeshEntity<'_>) -> Result<f64, MeshError> {
        unsupported("radius ratio", CellType::Point)
    }

    fn inradius(&self, _cell: &MeshEntity<'_>) -> Result<f64, MeshError> {
        unsupported("inradius", CellType::Point)
    }

    fn order(&self, _topology: &mut MeshTopology, _cell: usize) -> Result<(), MeshError> {
        Ok(())
    }
}
