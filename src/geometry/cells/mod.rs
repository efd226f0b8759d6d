//! Per-cell-type topology patterns and geometric formulas.
//!
//! Every [`CellType`] hands out a `'static` [`CellKernel`]. The kernel knows
//! how a cell splits into sub-entities and how to measure an entity of its own
//! type: volume, diameter, distance, containment, normals and quality. Entities
//! of lower dimension (a triangle facet of a tetrahedral mesh, say) are
//! measured with the kernel of their own type, see
//! [`MeshEntity::kernel`](crate::topology::entity::MeshEntity::kernel).

use std::fmt;

use crate::geometry::point::Point;
use crate::mesh_error::MeshError;
use crate::topology::cell_type::CellType;
use crate::topology::entity::MeshEntity;
use crate::topology::mesh_topology::MeshTopology;

mod hexahedron;
mod interval;
mod point;
mod quadrilateral;
mod tetrahedron;
mod triangle;

pub use hexahedron::HexahedronCell;
pub use interval::IntervalCell;
pub use point::PointCell;
pub use quadrilateral::QuadrilateralCell;
pub use tetrahedron::TetrahedronCell;
pub use triangle::TriangleCell;

pub(crate) use interval::segment_squared_distance;
pub(crate) use tetrahedron::tetrahedron_closest_point;
pub(crate) use triangle::{triangle_closest_point, triangle_contains};

/// Type-specific formulas for one cell type.
///
/// Geometric methods take the entity they measure; its dimension must equal
/// [`CellKernel::dim`]. Methods a type cannot support return
/// [`MeshError::UnsupportedOperation`].
pub trait CellKernel: Send + Sync + fmt::Debug {
    fn cell_type(&self) -> CellType;

    fn dim(&self) -> usize {
        self.cell_type().dim()
    }

    /// Local vertex lists of the sub-entities of dimension `d`.
    fn entity_pattern(&self, d: usize) -> Result<&'static [&'static [usize]], MeshError>;

    /// Number of sub-entities of dimension `d`.
    fn num_entities(&self, d: usize) -> Result<usize, MeshError> {
        Ok(self.entity_pattern(d)?.len())
    }

    /// Number of vertices of each sub-entity of dimension `d`.
    fn num_vertices(&self, d: usize) -> Result<usize, MeshError> {
        Ok(self.entity_pattern(d)?.first().map_or(0, |e| e.len()))
    }

    /// Appends the global vertices of each sub-entity of dimension `d` of a
    /// cell with vertices `cell`, entity after entity.
    fn create_entities(
        &self,
        cell: &[usize],
        d: usize,
        out: &mut Vec<usize>,
    ) -> Result<(), MeshError> {
        let expected = self.cell_type().cell_vertices();
        if cell.len() != expected {
            return Err(MeshError::CellArity {
                cell: 0,
                expected,
                found: cell.len(),
            });
        }
        for local in self.entity_pattern(d)? {
            out.extend(local.iter().map(|&v| cell[v]));
        }
        Ok(())
    }

    /// Length, area or volume of the entity.
    fn volume(&self, entity: &MeshEntity<'_>) -> Result<f64, MeshError>;

    /// Diameter of the circumscribed sphere (simplices) or largest vertex
    /// distance. Degenerate cells report 0.
    fn diameter(&self, entity: &MeshEntity<'_>) -> Result<f64, MeshError>;

    /// Closest point of the entity to `point`; `point` itself when inside.
    fn closest_point(&self, entity: &MeshEntity<'_>, point: &Point) -> Result<Point, MeshError>;

    /// Squared distance from `point` to the entity, exactly 0 inside.
    fn squared_distance(&self, entity: &MeshEntity<'_>, point: &Point) -> Result<f64, MeshError> {
        Ok(self.closest_point(entity, point)?.squared_distance(point))
    }

    /// Whether `point` lies in the entity, up to the mesh tolerance.
    fn contains(&self, entity: &MeshEntity<'_>, point: &Point) -> Result<bool, MeshError>;

    /// Outward unit normal of local facet `facet`.
    fn normal(&self, cell: &MeshEntity<'_>, facet: usize) -> Result<Point, MeshError>;

    /// Unit normal of a manifold cell (codimension 1 in its embedding).
    fn cell_normal(&self, cell: &MeshEntity<'_>) -> Result<Point, MeshError>;

    /// Measure of local facet `facet`.
    fn facet_area(&self, cell: &MeshEntity<'_>, facet: usize) -> Result<f64, MeshError> {
        let f = facet_entity(cell, facet)?;
        f.kernel()?.volume(&f)
    }

    /// Normalized shape quality in `[0, 1]`; 0 for degenerate cells.
    fn radius_ratio(&self, cell: &MeshEntity<'_>) -> Result<f64, MeshError>;

    /// Radius of the inscribed sphere, `dim * V / sum(facet areas)`.
    fn inradius(&self, cell: &MeshEntity<'_>) -> Result<f64, MeshError> {
        if !self.cell_type().is_simplex() {
            return Err(MeshError::UnsupportedOperation {
                op: "inradius",
                cell_type: self.cell_type(),
            });
        }
        let v = self.volume(cell)?;
        if v == 0.0 {
            return Ok(0.0);
        }
        let mut area = 0.0;
        for facet in 0..self.num_entities(self.dim() - 1)? {
            area += self.facet_area(cell, facet)?;
        }
        Ok(self.dim() as f64 * v / area)
    }

    /// 1 when the cell normal points against `up`, 0 otherwise.
    fn orientation(&self, cell: &MeshEntity<'_>, up: &Point) -> Result<usize, MeshError> {
        let n = self.cell_normal(cell)?;
        Ok(usize::from(n.dot(up) < 0.0))
    }

    /// Reorders the local entities of `cell` in every existing table so
    /// that vertex lists ascend and sub-entity `i` is the one opposite
    /// vertex `i`.
    fn order(&self, topology: &mut MeshTopology, cell: usize) -> Result<(), MeshError>;
}

pub(crate) fn expect_dim(entity: &MeshEntity<'_>, dim: usize) -> Result<(), MeshError> {
    if entity.dim() != dim {
        return Err(MeshError::EntityDimension {
            expected: dim,
            found: entity.dim(),
        });
    }
    Ok(())
}

/// Coordinates of the `N` vertices of an entity of dimension `dim`.
pub(crate) fn vertex_points<const N: usize>(
    entity: &MeshEntity<'_>,
    dim: usize,
) -> Result<[Point; N], MeshError> {
    expect_dim(entity, dim)?;
    let vertices = entity.vertices()?;
    if vertices.len() != N {
        return Err(MeshError::CellArity {
            cell: entity.index(),
            expected: N,
            found: vertices.len(),
        });
    }
    let geometry = entity.mesh().geometry();
    let mut points = [Point::default(); N];
    for (p, &v) in points.iter_mut().zip(vertices) {
        *p = geometry.point(v);
    }
    Ok(points)
}

/// Facet `facet` (local index) of `cell` as an entity handle.
pub(crate) fn facet_entity<'a>(
    cell: &MeshEntity<'a>,
    facet: usize,
) -> Result<MeshEntity<'a>, MeshError> {
    let fdim = cell.dim().checked_sub(1).ok_or(MeshError::UnsupportedOperation {
        op: "facet",
        cell_type: CellType::Point,
    })?;
    let facets = cell.entities(fdim)?;
    let index = *facets.get(facet).ok_or(MeshError::EntityOutOfRange {
        dim: fdim,
        index: facet,
        size: facets.len(),
    })?;
    MeshEntity::new(cell.mesh(), fdim, index)
}

/// Squared distance below which `p` lies on a primitive with vertices
/// `vertices`: a few ulps of the largest coordinate involved. Points this
/// close are snapped so that distances on the primitive are exactly 0.
pub(crate) fn on_primitive_tolerance2(p: &Point, vertices: &[&Point]) -> f64 {
    let scale2 = vertices
        .iter()
        .map(|v| v.squared_norm())
        .fold(p.squared_norm(), f64::max);
    let ulps = 16.0 * f64::EPSILON;
    ulps * ulps * scale2
}

/// Vertex of `cell` that is not a vertex of `facet`.
pub(crate) fn opposite_vertex(cell: &[usize], facet: &[usize]) -> Option<usize> {
    cell.iter().copied().find(|v| !facet.contains(v))
}

/// Sorts one row of a table in place if the table exists.
pub(crate) fn sort_row(topology: &mut MeshTopology, d0: usize, d1: usize, row: usize) {
    if let Some(table) = topology.connectivity_mut(d0, d1) {
        table.entities_mut(row).sort_unstable();
    }
}

pub(crate) fn unsupported<T>(op: &'static str, cell_type: CellType) -> Result<T, MeshError> {
    Err(MeshError::UnsupportedOperation { op, cell_type })
}

pub(crate) fn unsupported_gdim<T>(
    op: &'static str,
    cell_type: CellType,
    gdim: usize,
) -> Result<T, MeshError> {
    Err(MeshError::UnsupportedGeometricDimension { op, cell_type, gdim })
}
