#![allow(dead_code)]
use mesh_topology::prelude::*;

/// Entities of dimension `d` sharing at least one vertex with `entity`.
pub fn sharing_a_vertex(mesh: &Mesh, entity: &MeshEntity<'_>, d: usize) -> Vec<usize> {
    let mine = entity.vertices().unwrap();
    let table = mesh.connectivity(d, 0).unwrap();
    (0..table.len())
        .filter(|&e| table.entities(e).iter().any(|v| mine.contains(v)))
        .collect()
}

/// Probe points around the unit square / cube with the expected closest
/// cell for `unit_square(2, 2)` and `unit_cube(2, 2, 1)` (probes at
/// `z = 0.1`). Every probe lies 0.5 away from the mesh.
pub fn closest_cell_fixtures() -> Vec<([f64; 2], usize, usize)> {
    vec![
        ([0.25, -0.5], 0, 1),
        ([0.75, -0.5], 2, 7),
        ([1.5, 0.25], 2, 6),
        ([1.5, 0.75], 6, 18),
        ([0.75, 1.5], 7, 21),
        ([0.25, 1.5], 5, 15),
        ([-0.5, 0.75], 5, 17),
        ([-0.5, 0.25], 1, 5),
    ]
}

pub fn assert_close(a: f64, b: f64, tol: f64) {
    assert!((a - b).abs() <= tol, "{a} != {b} (tol {tol})");
}

/// Surface of `unit_cube(2, 2, 2)` after two rotations, so that no face
/// is axis aligned: 48 triangles in R^3.
pub fn tilted_cube_surface() -> Mesh {
    let mut cube = unit_cube(2, 2, 2).unwrap();
    cube.rotate(30.0, 0).unwrap();
    cube.rotate(20.0, 2).unwrap();
    cube.boundary(BoundaryType::Exterior).unwrap().mesh
}

/// `n` segments along a quarter of the unit circle, in R^2.
pub fn quarter_circle(n: usize) -> Mesh {
    let mut editor = MeshEditor::new();
    editor.open(CellType::Interval, 1, 2).unwrap();
    editor.init_vertices(n + 1).unwrap();
    for i in 0..=n {
        let t = std::f64::consts::FRAC_PI_2 * i as f64 / n as f64;
        editor.add_vertex(i, &[t.cos(), t.sin()]).unwrap();
    }
    editor.init_cells(n).unwrap();
    for i in 0..n {
        editor.add_cell(i, &[i, i + 1]).unwrap();
    }
    editor.close().unwrap()
}
