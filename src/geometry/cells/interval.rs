use crate::geometry::cells::{
    CellKernel, expect_dim, facet_entity, on_primitive_tolerance2, sort_row, unsupported_gdim,
    vertex_points,
};
use crate::geometry::point::Point;
use crate::mesh_error::MeshError;
use crate::topology::cell_type::CellType;
use crate::topology::entity::MeshEntity;
use crate::topology::mesh_topology::MeshTopology;

const VERTICES: &[&[usize]] = &[&[0], &[1]];
const CELL: &[&[usize]] = &[&[0, 1]];

/// Line segment `[v0, v1]`.
#[derive(Clone, Copy, Debug, Default)]
pub struct IntervalCell;

/// Squared distance from `p` to the segment `[a, b]`; exactly 0 on it.
pub(crate) fn segment_squared_distance(p: &Point, a: &Point, b: &Point) -> f64 {
    segment_closest_point(p, a, b).squared_distance(p)
}

fn segment_closest_point(p: &Point, a: &Point, b: &Point) -> Point {
    let v0 = *p - *a;
    let v1 = *b - *a;
    let v01 = v0.dot(&v1);
    if v01 <= 0.0 {
        return *a;
    }
    let v11 = v1.squared_norm();
    if v01 >= v11 {
        return *b;
    }
    let q = *a + (v01 / v11) * v1;
    if q.squared_distance(p) <= on_primitive_tolerance2(p, &[a, b]) {
        return *p;
    }
    q
}

impl CellKernel for IntervalCell {
    fn cell_type(&self) -> CellType {
        CellType::Interval
    }

    fn entity_pattern(&self, d: usize) -> Result<&'static [&'static [usize]], MeshError> {
        match d {
            0 => Ok(VERTICES),
            1 => Ok(CELL),
            _ => Err(MeshError::InvalidDimension { dim: d, max: 1 }),
        }
    }

    fn volume(&self, entity: &MeshEntity<'_>) -> Result<f64, MeshError> {
        let [p0, p1] = vertex_points::<2>(entity, 1)?;
        Ok(p0.distance(&p1))
    }

    fn diameter(&self, entity: &MeshEntity<'_>) -> Result<f64, MeshError> {
        self.volume(entity)
    }

    fn closest_point(&self, entity: &MeshEntity<'_>, point: &Point) -> Result<Point, MeshError> {
        let [a, b] = vertex_points::<2>(entity, 1)?;
        Ok(segment_closest_point(point, &a, &b))
    }

    fn squared_distance(&self, entity: &MeshEntity<'_>, point: &Point) -> Result<f64, MeshError> {
        let [a, b] = vertex_points::<2>(entity, 1)?;
        Ok(segment_squared_distance(point, &a, &b))
    }

    fn contains(&self, entity: &MeshEntity<'_>, point: &Point) -> Result<bool, MeshError> {
        let [a, b] = vertex_points::<2>(entity, 1)?;
        let tol = entity.mesh().options().tolerance * a.distance(&b).max(1.0);
        Ok(segment_squared_distance(point, &a, &b) <= tol * tol)
    }

    /// Unit vector pointing away from the cell at vertex `facet`.
    fn normal(&self, cell: &MeshEntity<'_>, facet: usize) -> Result<Point, MeshError> {
        expect_dim(cell, 1)?;
        let f = facet_entity(cell, facet)?;
        let vertices = cell.vertices()?;
        let geometry = cell.mesh().geometry();
        let tip = geometry.point(f.index());
        let other = vertices
            .iter()
            .copied()
            .find(|&v| v != f.index())
            .map(|v| geometry.point(v))
            .unwrap_or(tip);
        Ok((tip - other).normalized().unwrap_or_default())
    }

    /// Tangent rotated a quarter turn counter-clockwise; only in the plane.
    fn cell_normal(&self, cell: &MeshEntity<'_>) -> Result<Point, MeshError> {
        let gdim = cell.mesh().gdim();
        if gdim != 2 {
            return unsupported_gdim("cell normal", CellType::Interval, gdim);
        }
        let [p0, p1] = vertex_points::<2>(cell, 1)?;
        let t = p1 - p0;
        Ok(Point::new(-t.y(), t.x(), 0.0)
            .normalized()
            .unwrap_or_default())
    }

    fn facet_area(&self, cell: &MeshEntity<'_>, _facet: usize) -> Result<f64, MeshError> {
        expect_dim(cell, 1)?;
        Ok(1.0)
    }

    fn radius_ratio(&self, cell: &MeshEntity<'_>) -> Result<f64, MeshError> {
        Ok(if self.volume(cell)? == 0.0 { 0.0 } else { 1.0 })
    }

    fn order(&self, topology: &mut MeshTopology, cell: usize) -> Result<(), MeshError> {
        sort_row(topology, 1, 0, cell);
        Ok(())
    }
}
