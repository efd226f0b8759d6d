//! Coordinate updates: user transforms, rigid motions and smoothing.
//!
//! Topology is never touched. Every entry point goes through
//! `Mesh::geometry_mut`, which drops the coordinate-derived caches.

use crate::algs::boundary::{BoundaryMesh, BoundaryType};
use crate::geometry::point::Point;
use crate::mesh::Mesh;
use crate::mesh_error::MeshError;

/// Coordinate update strategies for [`transform_mesh`].
pub enum CoordinateTransform<'a> {
    /// Update coordinates using a user-supplied function.
    ///
    /// The function receives the vertex index and a mutable slice of its
    /// `gdim` coordinates.
    Function(&'a mut dyn FnMut(usize, &mut [f64]) -> Result<(), MeshError>),
    /// Add a displacement, `gdim` values per vertex in vertex order.
    Displacement(&'a [f64]),
}

/// Applies `transform` to every vertex of `mesh`.
pub fn transform_mesh(mesh: &mut Mesh, transform: CoordinateTransform<'_>) -> Result<(), MeshError> {
    let gdim = mesh.gdim();
    let num_vertices = mesh.num_vertices();
    match transform {
        CoordinateTransform::Function(update) => {
            let geometry = mesh.geometry_mut();
            for v in 0..num_vertices {
                update(v, geometry.x_mut(v))?;
            }
        }
        CoordinateTransform::Displacement(displacement) => {
            if displacement.len() != gdim * num_vertices {
                return Err(MeshError::CoordinateLength {
                    expected: gdim * num_vertices,
                    found: displacement.len(),
                });
            }
            for (x, dx) in mesh.geometry_mut().coordinates_mut().iter_mut().zip(displacement) {
                *x += dx;
            }
        }
    }
    Ok(())
}

/// Moves every vertex by `offset`; components beyond `gdim` are ignored.
pub fn translate(mesh: &mut Mesh, offset: &Point) {
    let gdim = mesh.gdim();
    for x in mesh.geometry_mut().coordinates_mut().chunks_exact_mut(gdim) {
        for (xi, oi) in x.iter_mut().zip(offset.coordinates()) {
            *xi += oi;
        }
    }
}

/// Average of all vertex coordinates.
pub fn centroid(mesh: &Mesh) -> Result<Point, MeshError> {
    let n = mesh.num_vertices();
    if n == 0 {
        return Err(MeshError::EmptyMesh("vertices"));
    }
    let mut sum = Point::default();
    for p in mesh.geometry().points() {
        sum += p;
    }
    Ok(sum / n as f64)
}

/// Rotates every vertex by `angle` degrees about coordinate `axis` through
/// `center`. Planar meshes can only turn about the z axis.
pub fn rotate(mesh: &mut Mesh, angle: f64, axis: usize, center: &Point) -> Result<(), MeshError> {
    let gdim = mesh.gdim();
    let allowed = match gdim {
        2 => axis == 2,
        3 => axis < 3,
        _ => false,
    };
    if !allowed {
        return Err(MeshError::InvalidConfiguration(format!(
            "cannot rotate a mesh in R^{gdim} about axis {axis}"
        )));
    }
    let radians = angle.to_radians();
    let geometry = mesh.geometry_mut();
    for v in 0..geometry.len() {
        let p = geometry.point(v).rotated(radians, axis, center);
        geometry.set_point(v, &p);
    }
    Ok(())
}

/// Laplacian smoothing of the vertices not on the exterior boundary.
///
/// In every iteration each interior vertex moves toward the average of its
/// edge neighbours, by at most half the smallest height of the cells around
/// it measured from the vertex. All vertices of one iteration move together.
pub fn smooth(mesh: &mut Mesh, iterations: usize) -> Result<(), MeshError> {
    if mesh.tdim() != mesh.gdim() {
        return Err(MeshError::UnsupportedGeometricDimension {
            op: "smoothing",
            cell_type: mesh.cell_type(),
            gdim: mesh.gdim(),
        });
    }
    let on_boundary = {
        let boundary = BoundaryMesh::new(mesh, BoundaryType::Exterior)?;
        let mut mask = vec![false; mesh.num_vertices()];
        for &v in boundary.vertex_map.values() {
            mask[v] = true;
        }
        mask
    };
    for _ in 0..iterations {
        let moves = smoothing_step(mesh, &on_boundary)?;
        let geometry = mesh.geometry_mut();
        for (v, p) in moves {
            geometry.set_point(v, &p);
        }
    }
    Ok(())
}

fn smoothing_step(mesh: &Mesh, on_boundary: &[bool]) -> Result<Vec<(usize, Point)>, MeshError> {
    let tdim = mesh.tdim();
    let geometry = mesh.geometry();
    let vertex_edges = mesh.connectivity(0, 1)?;
    let edge_vertices = mesh.connectivity(1, 0)?;
    let vertex_cells = mesh.connectivity(0, tdim)?;
    let cell_facets = mesh.connectivity(tdim, tdim - 1)?;
    let facet_vertices = mesh.connectivity(tdim - 1, 0)?;

    let mut moves = Vec::new();
    for v in (0..on_boundary.len()).filter(|&v| !on_boundary[v]) {
        let x = geometry.point(v);
        let edges = vertex_edges.entities(v);
        if edges.is_empty() {
            log::warn!("Vertex {v} has no neighbours; skipping it during smoothing");
            continue;
        }
        let mut target = Point::default();
        for &e in edges {
            let ev = edge_vertices.entities(e);
            let w = if ev[0] == v { ev[1] } else { ev[0] };
            target += geometry.point(w);
        }
        target = target / edges.len() as f64;

        // smallest distance from v to the facet across from it
        let mut height = f64::INFINITY;
        for &c in vertex_cells.entities(v) {
            let cell = mesh.cell(c)?;
            for (local, &f) in cell_facets.entities(c).iter().enumerate() {
                let fv = facet_vertices.entities(f);
                if fv.contains(&v) {
                    continue;
                }
                let n = cell.normal(local)?;
                height = height.min(n.dot(&(x - geometry.point(fv[0]))).abs());
            }
        }

        let step = target - x;
        let r = step.norm();
        if r < f64::EPSILON || !height.is_finite() {
            continue;
        }
        let length = r.min(0.5 * height);
        moves.push((v, x + (length / r) * step));
    }
    Ok(moves)
}
