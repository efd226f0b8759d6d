use crate::geometry::cells::triangle::triangle_closest_point;
use crate::geometry::cells::{
    CellKernel, expect_dim, facet_entity, opposite_vertex, sort_row, unsupported,
    unsupported_gdim, vertex_points,
};
use crate::geometry::point::Point;
use crate::mesh_error::MeshError;
use crate::topology::cell_type::CellType;
use crate::topology::entity::MeshEntity;
use crate::topology::mesh_topology::MeshTopology;

const VERTICES: &[&[usize]] = &[&[0], &[1], &[2], &[3]];
// edge m contains neither vertex of the m-th lexicographic pair
// (0,1), (0,2), (0,3), (1,2), (1,3), (2,3)
const EDGES: &[&[usize]] = &[&[2, 3], &[1, 3], &[1, 2], &[0, 3], &[0, 2], &[0, 1]];
// face i is opposite vertex i
const FACES: &[&[usize]] = &[&[1, 2, 3], &[0, 2, 3], &[0, 1, 3], &[0, 1, 2]];
const CELL: &[&[usize]] = &[&[0, 1, 2, 3]];
const VERTEX_PAIRS: [(usize, usize); 6] = [(0, 1), (0, 2), (0, 3), (1, 2), (1, 3), (2, 3)];

/// Tetrahedron `[v0, v1, v2, v3]` in three dimensions.
#[derive(Clone, Copy, Debug, Default)]
pub struct TetrahedronCell;

fn det(v1: &Point, v2: &Point, v3: &Point) -> f64 {
    v1.dot(&v2.cross(v3))
}

/// Whether `p` and `d` lie on opposite sides of the plane through `abc`.
fn outside_of_plane(p: &Point, a: &Point, b: &Point, c: &Point, d: &Point) -> bool {
    let n = (*b - *a).cross(&(*c - *a));
    let sign_p = (*p - *a).dot(&n);
    let sign_d = (*d - *a).dot(&n);
    sign_p * sign_d < 0.0
}

/// Barycentric containment test with slack `eps`; degenerate tetrahedra
/// contain nothing.
pub(crate) fn tetrahedron_contains(p: &Point, vertices: &[Point; 4], eps: f64) -> bool {
    let [p0, p1, p2, p3] = vertices;
    let v1 = *p1 - *p0;
    let v2 = *p2 - *p0;
    let v3 = *p3 - *p0;
    let v = *p - *p0;
    let d = det(&v1, &v2, &v3);
    if d == 0.0 {
        return false;
    }
    let x1 = det(&v, &v2, &v3) / d;
    let x2 = det(&v1, &v, &v3) / d;
    let x3 = det(&v1, &v2, &v) / d;
    x1 >= -eps && x2 >= -eps && x3 >= -eps && x1 + x2 + x3 <= 1.0 + eps
}

/// Closest point by testing the faces whose plane separates `p` from the
/// opposite vertex; `p` itself when no face does.
pub(crate) fn tetrahedron_closest_point(p: &Point, [a, b, c, d]: &[Point; 4]) -> Point {
    let faces = [(a, b, c, d), (a, c, d, b), (a, d, b, c), (b, d, c, a)];
    let mut closest = *p;
    let mut r2 = f64::INFINITY;
    for (x, y, z, opposite) in faces {
        if outside_of_plane(p, x, y, z, opposite) {
            let q = triangle_closest_point(p, x, y, z);
            let d2 = q.squared_distance(p);
            if d2 < r2 {
                r2 = d2;
                closest = q;
            }
        }
    }
    closest
}

impl TetrahedronCell {
    fn points(entity: &MeshEntity<'_>, op: &'static str) -> Result<[Point; 4], MeshError> {
        let gdim = entity.mesh().gdim();
        if gdim != 3 {
            return unsupported_gdim(op, CellType::Tetrahedron, gdim);
        }
        vertex_points::<4>(entity, 3)
    }

    fn signed_volume([p0, p1, p2, p3]: &[Point; 4]) -> f64 {
        det(&(*p1 - *p0), &(*p2 - *p0), &(*p3 - *p0)) / 6.0
    }

    /// Area of the triangle with side lengths `a * aa`, `b * bb`, `c * cc`
    /// (products of opposite edge lengths), Heron's formula.
    fn opposite_edge_area([p0, p1, p2, p3]: &[Point; 4]) -> f64 {
        let a = p1.distance(p2);
        let b = p0.distance(p2);
        let c = p0.distance(p1);
        let aa = p0.distance(p3);
        let bb = p1.distance(p3);
        let cc = p2.distance(p3);
        let la = a * aa;
        let lb = b * bb;
        let lc = c * cc;
        let s = 0.5 * (la + lb + lc);
        (s * (s - la) * (s - lb) * (s - lc)).max(0.0).sqrt()
    }

    fn surface_area([p0, p1, p2, p3]: &[Point; 4]) -> f64 {
        let face = |a: &Point, b: &Point, c: &Point| 0.5 * (*b - *a).cross(&(*c - *a)).norm();
        face(p1, p2, p3) + face(p0, p2, p3) + face(p0, p1, p3) + face(p0, p1, p2)
    }
}

impl CellKernel for TetrahedronCell {
    fn cell_type(&self) -> CellType {
        CellType::Tetrahedron
    }

    fn entity_pattern(&self, d: usize) -> Result<&'static [&'static [usize]], MeshError> {
        match d {
            0 => Ok(VERTICES),
            1 => Ok(EDGES),
            2 => Ok(FACES),
            3 => Ok(CELL),
            _ => Err(MeshError::InvalidDimension { dim: d, max: 3 }),
        }
    }

    fn volume(&self, entity: &MeshEntity<'_>) -> Result<f64, MeshError> {
        let p = Self::points(entity, "volume")?;
        Ok(Self::signed_volume(&p).abs())
    }

    /// Circumdiameter `K / (3 V)`.
    fn diameter(&self, entity: &MeshEntity<'_>) -> Result<f64, MeshError> {
        let p = Self::points(entity, "diameter")?;
        let v = Self::signed_volume(&p).abs();
        if v == 0.0 {
            return Ok(0.0);
        }
        Ok(Self::opposite_edge_area(&p) / (3.0 * v))
    }

    fn closest_point(&self, entity: &MeshEntity<'_>, point: &Point) -> Result<Point, MeshError> {
        let p = Self::points(entity, "closest point")?;
        Ok(tetrahedron_closest_point(point, &p))
    }

    fn contains(&self, entity: &MeshEntity<'_>, point: &Point) -> Result<bool, MeshError> {
        let p = Self::points(entity, "contains")?;
        Ok(tetrahedron_contains(point, &p, entity.mesh().options().tolerance))
    }

    fn normal(&self, cell: &MeshEntity<'_>, facet: usize) -> Result<Point, MeshError> {
        expect_dim(cell, 3)?;
        let f = facet_entity(cell, facet)?;
        let fv = f.vertices()?;
        let cv = cell.vertices()?;
        let v = opposite_vertex(cv, fv).ok_or(MeshError::CellArity {
            cell: cell.index(),
            expected: 4,
            found: cv.len(),
        })?;
        let geometry = cell.mesh().geometry();
        let p = geometry.point(v);
        let a = geometry.point(fv[0]);
        let b = geometry.point(fv[1]);
        let c = geometry.point(fv[2]);
        let mut n = (b - a).cross(&(c - a));
        if n.dot(&(p - a)) > 0.0 {
            n = -n;
        }
        Ok(n.normalized().unwrap_or_default())
    }

    fn cell_normal(&self, _cell: &MeshEntity<'_>) -> Result<Point, MeshError> {
        unsupported("cell normal", CellType::Tetrahedron)
    }

    /// `54 V^2 / (S K)`, 1 for the regular tetrahedron.
    fn radius_ratio(&self, cell: &MeshEntity<'_>) -> Result<f64, MeshError> {
        let p = Self::points(cell, "radius ratio")?;
        let v = Self::signed_volume(&p).abs();
        if v == 0.0 {
            return Ok(0.0);
        }
        let s = Self::surface_area(&p);
        let k = Self::opposite_edge_area(&p);
        Ok(54.0 * v * v / (s * k))
    }

    fn order(&self, topology: &mut MeshTopology, cell: usize) -> Result<(), MeshError> {
        let cell_edges = cell_row(topology, 3, 1, cell)?;
        let cell_faces = cell_row(topology, 3, 2, cell)?;

        for &e in cell_edges.iter().flatten() {
            sort_row(topology, 1, 0, e);
        }
        for &f in cell_faces.iter().flatten() {
            sort_row(topology, 2, 0, f);
        }

        // edges of each face: edge i misses face vertex i
        if let Some(faces) = &cell_faces {
            let mut updates = Vec::with_capacity(faces.len());
            for &f in faces {
                let Some(face_vertices) = cell_row(topology, 2, 0, f)? else {
                    break;
                };
                if let Some(edges) = sorted_by_missing_vertex(topology, 2, 1, f, &face_vertices)? {
                    updates.push((f, edges));
                }
            }
            if let Some(table) = topology.connectivity_mut(2, 1) {
                for (f, edges) in updates {
                    table.entities_mut(f).copy_from_slice(&edges);
                }
            }
        }

        sort_row(topology, 3, 0, cell);
        let vertices = topology.cell_vertices()?.entities(cell).to_vec();

        if let Some(mut edges) = cell_edges {
            if let Some(edge_vertices) = topology.connectivity(1, 0)? {
                for (m, &(i, j)) in VERTEX_PAIRS.iter().enumerate() {
                    let (vi, vj) = (vertices[i], vertices[j]);
                    if let Some(k) = (m..edges.len()).find(|&k| {
                        let ev = edge_vertices.entities(edges[k]);
                        !ev.contains(&vi) && !ev.contains(&vj)
                    }) {
                        edges.swap(m, k);
                    }
                }
            }
            if let Some(table) = topology.connectivity_mut(3, 1) {
                table.entities_mut(cell).copy_from_slice(&edges);
            }
        }

        if let Some(faces) = sorted_by_missing_vertex(topology, 3, 2, cell, &vertices)? {
            if let Some(table) = topology.connectivity_mut(3, 2) {
                table.entities_mut(cell).copy_from_slice(&faces);
            }
        }
        Ok(())
    }
}

fn cell_row(
    topology: &MeshTopology,
    d0: usize,
    d1: usize,
    index: usize,
) -> Result<Option<Vec<usize>>, MeshError> {
    Ok(topology
        .connectivity(d0, d1)?
        .map(|c| c.entities(index).to_vec()))
}

/// Row `index` of `(d0, d1)` permuted so that entity `i` does not contain
/// `vertices[i]`.
fn sorted_by_missing_vertex(
    topology: &MeshTopology,
    d0: usize,
    d1: usize,
    index: usize,
    vertices: &[usize],
) -> Result<Option<Vec<usize>>, MeshError> {
    let (Some(table), Some(entity_vertices)) =
        (topology.connectivity(d0, d1)?, topology.connectivity(d1, 0)?)
    else {
        return Ok(None);
    };
    let mut row = table.entities(index).to_vec();
    for i in 0..row.len() {
        if let Some(j) =
            (i..row.len()).find(|&j| !entity_vertices.entities(row[j]).contains(&vertices[i]))
        {
            row.swap(i, j);
        }
    }
    Ok(Some(row))
}
