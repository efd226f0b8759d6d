use crate::geometry::cells::{
    CellKernel, expect_dim, facet_entity, on_primitive_tolerance2, opposite_vertex, sort_row,
    unsupported_gdim, vertex_points,
};
use crate::geometry::point::Point;
use crate::mesh_error::MeshError;
use crate::topology::cell_type::CellType;
use crate::topology::entity::MeshEntity;
use crate::topology::mesh_topology::MeshTopology;

const VERTICES: &[&[usize]] = &[&[0], &[1], &[2]];
// edge i is opposite vertex i
const EDGES: &[&[usize]] = &[&[1, 2], &[0, 2], &[0, 1]];
const CELL: &[&[usize]] = &[&[0, 1, 2]];

/// Triangle `[v0, v1, v2]`, embedded in the plane or in space.
#[derive(Clone, Copy, Debug, Default)]
pub struct TriangleCell;

/// Closest point of triangle `abc` to `p`, by Voronoi region
/// (Ericson, Real-Time Collision Detection, 5.1.5).
pub(crate) fn triangle_closest_point(p: &Point, a: &Point, b: &Point, c: &Point) -> Point {
    let ab = *b - *a;
    let ac = *c - *a;

    let ap = *p - *a;
    let d1 = ab.dot(&ap);
    let d2 = ac.dot(&ap);
    if d1 <= 0.0 && d2 <= 0.0 {
        return *a;
    }

    let bp = *p - *b;
    let d3 = ab.dot(&bp);
    let d4 = ac.dot(&bp);
    if d3 >= 0.0 && d4 <= d3 {
        return *b;
    }

    let vc = d1 * d4 - d3 * d2;
    if vc <= 0.0 && d1 >= 0.0 && d3 <= 0.0 {
        let v = d1 / (d1 - d3);
        return *a + v * ab;
    }

    let cp = *p - *c;
    let d5 = ab.dot(&cp);
    let d6 = ac.dot(&cp);
    if d6 >= 0.0 && d5 <= d6 {
        return *c;
    }

    let vb = d5 * d2 - d1 * d6;
    if vb <= 0.0 && d2 >= 0.0 && d6 <= 0.0 {
        let w = d2 / (d2 - d6);
        return *a + w * ac;
    }

    let va = d3 * d6 - d5 * d4;
    if va <= 0.0 && (d4 - d3) >= 0.0 && (d5 - d6) >= 0.0 {
        let w = (d4 - d3) / ((d4 - d3) + (d5 - d6));
        return *b + w * (*c - *b);
    }

    // inside the face region: project onto the plane of the triangle
    let n = ab.cross(&ac);
    let nn = n.squared_norm();
    if nn == 0.0 {
        return *p;
    }
    let h = ap.dot(&n);
    if h * h <= on_primitive_tolerance2(p, &[a, b, c]) * nn {
        return *p;
    }
    *p - (h / nn) * n
}

/// Barycentric test `x1 > -eps, x2 > -eps, x1 + x2 < 1 + eps` from the
/// normal equations of `p - p0 = x1 (p1 - p0) + x2 (p2 - p0)`.
pub(crate) fn triangle_contains(p: &Point, p0: &Point, p1: &Point, p2: &Point, eps: f64) -> bool {
    let v1 = *p1 - *p0;
    let v2 = *p2 - *p0;
    let v = *p - *p0;
    let a11 = v1.dot(&v1);
    let a12 = v1.dot(&v2);
    let a22 = v2.dot(&v2);
    let b1 = v.dot(&v1);
    let b2 = v.dot(&v2);
    let det = a11 * a22 - a12 * a12;
    if det == 0.0 {
        return false;
    }
    let x1 = (a22 * b1 - a12 * b2) / det;
    let x2 = (-a12 * b1 + a11 * b2) / det;
    x1 > -eps && x2 > -eps && x1 + x2 < 1.0 + eps
}

impl TriangleCell {
    fn check_gdim(op: &'static str, entity: &MeshEntity<'_>) -> Result<(), MeshError> {
        let gdim = entity.mesh().gdim();
        if gdim != 2 && gdim != 3 {
            return unsupported_gdim(op, CellType::Triangle, gdim);
        }
        Ok(())
    }

    fn area(p0: &Point, p1: &Point, p2: &Point) -> f64 {
        0.5 * (*p1 - *p0).cross(&(*p2 - *p0)).norm()
    }
}

impl CellKernel for TriangleCell {
    fn cell_type(&self) -> CellType {
        CellType::Triangle
    }

    fn entity_pattern(&self, d: usize) -> Result<&'static [&'static [usize]], MeshError> {
        match d {
            0 => Ok(VERTICES),
            1 => Ok(EDGES),
            2 => Ok(CELL),
            _ => Err(MeshError::InvalidDimension { dim: d, max: 2 }),
        }
    }

    fn volume(&self, entity: &MeshEntity<'_>) -> Result<f64, MeshError> {
        let [p0, p1, p2] = vertex_points::<3>(entity, 2)?;
        match entity.mesh().gdim() {
            2 => {
                let v = (p0.x() * p1.y() + p0.y() * p2.x() + p1.x() * p2.y())
                    - (p2.x() * p1.y() + p2.y() * p0.x() + p1.x() * p0.y());
                Ok(0.5 * v.abs())
            }
            3 => Ok(Self::area(&p0, &p1, &p2)),
            gdim => unsupported_gdim("volume", CellType::Triangle, gdim),
        }
    }

    /// Circumdiameter `a b c / (2 S)`.
    fn diameter(&self, entity: &MeshEntity<'_>) -> Result<f64, MeshError> {
        Self::check_gdim("diameter", entity)?;
        let [p0, p1, p2] = vertex_points::<3>(entity, 2)?;
        let s = self.volume(entity)?;
        if s == 0.0 {
            return Ok(0.0);
        }
        let a = p1.distance(&p2);
        let b = p0.distance(&p2);
        let c = p0.distance(&p1);
        Ok(0.5 * a * b * c / s)
    }

    fn closest_point(&self, entity: &MeshEntity<'_>, point: &Point) -> Result<Point, MeshError> {
        let [a, b, c] = vertex_points::<3>(entity, 2)?;
        Ok(triangle_closest_point(point, &a, &b, &c))
    }

    fn contains(&self, entity: &MeshEntity<'_>, point: &Point) -> Result<bool, MeshError> {
        let [p0, p1, p2] = vertex_points::<3>(entity, 2)?;
        let eps = entity.mesh().options().tolerance;
        Ok(triangle_contains(point, &p0, &p1, &p2, eps))
    }

    /// Component of `p2 - p0` orthogonal to the facet, where `p0` is the
    /// vertex opposite the facet.
    fn normal(&self, cell: &MeshEntity<'_>, facet: usize) -> Result<Point, MeshError> {
        expect_dim(cell, 2)?;
        Self::check_gdim("normal", cell)?;
        let f = facet_entity(cell, facet)?;
        let fv = f.vertices()?;
        let cv = cell.vertices()?;
        let geometry = cell.mesh().geometry();
        let v0 = opposite_vertex(cv, fv).ok_or(MeshError::CellArity {
            cell: cell.index(),
            expected: 3,
            found: cv.len(),
        })?;
        let p0 = geometry.point(v0);
        let p1 = geometry.point(fv[0]);
        let p2 = geometry.point(fv[1]);

        let t = (p2 - p1).normalized().unwrap_or_default();
        let mut n = p2 - p0;
        n -= n.dot(&t) * t;
        Ok(n.normalized().unwrap_or_default())
    }

    fn cell_normal(&self, cell: &MeshEntity<'_>) -> Result<Point, MeshError> {
        let [p0, p1, p2] = vertex_points::<3>(cell, 2)?;
        Ok((p1 - p0).cross(&(p2 - p0)).normalized().unwrap_or_default())
    }

    /// `16 S^2 / (a b c (a + b + c))`, 1 for the equilateral triangle.
    fn radius_ratio(&self, cell: &MeshEntity<'_>) -> Result<f64, MeshError> {
        let s = self.volume(cell)?;
        if s == 0.0 {
            return Ok(0.0);
        }
        let [p0, p1, p2] = vertex_points::<3>(cell, 2)?;
        let a = p1.distance(&p2);
        let b = p0.distance(&p2);
        let c = p0.distance(&p1);
        Ok(16.0 * s * s / (a * b * c * (a + b + c)))
    }

    fn order(&self, topology: &mut MeshTopology, cell: usize) -> Result<(), MeshError> {
        let cell_edges: Option<Vec<usize>> = topology
            .connectivity(2, 1)?
            .map(|c| c.entities(cell).to_vec());

        if topology.connectivity(1, 0)?.is_some() {
            for &e in cell_edges.iter().flatten() {
                sort_row(topology, 1, 0, e);
            }
        }

        sort_row(topology, 2, 0, cell);

        if let Some(mut edges) = cell_edges {
            let vertices = topology.cell_vertices()?.entities(cell).to_vec();
            let edge_vertices = topology
                .connectivity(1, 0)?
                .ok_or(MeshError::InvalidDimensionPair { d0: 1, d1: 0 })?;
            for i in 0..3 {
                if let Some(j) =
                    (i..3).find(|&j| !edge_vertices.entities(edges[j]).contains(&vertices[i]))
                {
                    edges.swap(i, j);
                }
            }
            if let Some(table) = topology.connectivity_mut(2, 1) {
                table.entities_mut(cell).copy_from_slice(&edges);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit() -> [Point; 3] {
        [
            Point::new(0.0, 0.0, 0.0),
            Point::new(1.0, 0.0, 0.0),
            Point::new(0.0, 1.0, 0.0),
        ]
    }

    #[test]
    fn closest_point_regions() {
        let [a, b, c] = unit();
        let cases = [
            (Point::new(-1.0, -1.0, 0.0), a),
            (Point::new(2.0, -0.5, 0.0), b),
            (Point::new(0.5, -1.0, 0.0), Point::new(0.5, 0.0, 0.0)),
            (Point::new(-0.5, 2.0, 0.0), c),
            (Point::new(-1.0, 0.5, 0.0), Point::new(0.0, 0.5, 0.0)),
            (Point::new(1.0, 1.0, 0.0), Point::new(0.5, 0.5, 0.0)),
            (Point::new(0.25, 0.25, 0.0), Point::new(0.25, 0.25, 0.0)),
            (Point::new(0.25, 0.25, 2.0), Point::new(0.25, 0.25, 0.0)),
        ];
        for (p, expected) in cases {
            let q = triangle_closest_point(&p, &a, &b, &c);
            assert!(q.distance(&expected) < 1e-14, "{p:?} -> {q:?}");
        }
    }

    #[test]
    fn barycentric_containment() {
        let [a, b, c] = unit();
        assert!(triangle_contains(&Point::new(0.2, 0.2, 0.0), &a, &b, &c, 1e-14));
        assert!(triangle_contains(&Point::new(0.5, 0.5, 0.0), &a, &b, &c, 1e-14));
        assert!(!triangle_contains(&Point::new(0.6, 0.6, 0.0), &a, &b, &c, 1e-14));
        assert!(!triangle_contains(&Point::new(-0.1, 0.2, 0.0), &a, &b, &c, 1e-14));
        // degenerate triangles contain nothing
        assert!(!triangle_contains(&a, &a, &b, &b, 1e-14));
    }
}
