use mesh_topology::prelude::*;

fn sorted_rows(mesh: &Mesh, d0: usize, d1: usize) -> Vec<Vec<usize>> {
    mesh.connectivity(d0, d1)
        .unwrap()
        .iter()
        .map(|row| {
            let mut row = row.to_vec();
            row.sort_unstable();
            row
        })
        .collect()
}

fn all_tables(mesh: &Mesh) -> Vec<Vec<Vec<usize>>> {
    let tdim = mesh.tdim();
    let mut out = Vec::new();
    for d0 in 0..=tdim {
        for d1 in 0..=tdim {
            out.push(sorted_rows(mesh, d0, d1));
        }
    }
    out
}

#[test]
fn init_is_idempotent() {
    let mesh = unit_cube(2, 2, 2).unwrap();
    let edges = mesh.init(1).unwrap();
    assert_eq!(mesh.init(1).unwrap(), edges);
    mesh.init_connectivity(3, 1).unwrap();
    let before = mesh.connectivity(3, 1).unwrap().clone();
    mesh.init_connectivity(3, 1).unwrap();
    mesh.init_all().unwrap();
    assert_eq!(mesh.connectivity(3, 1).unwrap(), &before);
}

#[test]
fn euler_characteristic_of_generated_meshes() {
    let square = unit_square(5, 4).unwrap();
    let (v, e, f) = (
        square.num_vertices() as i64,
        square.num_edges().unwrap() as i64,
        square.num_cells() as i64,
    );
    assert_eq!(v - e + f, 1);

    let cube = unit_cube(3, 2, 2).unwrap();
    let chi = cube.num_vertices() as i64 - cube.num_edges().unwrap() as i64
        + cube.num_faces().unwrap() as i64
        - cube.num_cells() as i64;
    assert_eq!(chi, 1);
}

#[test]
fn transposed_tables_agree() {
    let mesh = unit_cube(2, 1, 1).unwrap();
    for (d0, d1) in [(0, 3), (1, 2), (0, 1), (2, 3)] {
        let down = mesh.connectivity(d1, d0).unwrap();
        let up = mesh.connectivity(d0, d1).unwrap();
        for (e1, row) in down.iter().enumerate() {
            for &e0 in row {
                assert!(up.entities(e0).contains(&e1), "({d0}, {d1}): {e0} -> {e1}");
            }
        }
        assert_eq!(down.size_total(), up.size_total());
    }
}

#[test]
fn reordering_keeps_incidence_sets() {
    let mut editor = MeshEditor::new();
    editor.open(CellType::Tetrahedron, 3, 3).unwrap();
    editor.init_vertices(5).unwrap();
    for (i, x) in [
        [0.0, 0.0, 0.0],
        [1.0, 0.0, 0.0],
        [0.0, 1.0, 0.0],
        [0.0, 0.0, 1.0],
        [1.0, 1.0, 1.0],
    ]
    .iter()
    .enumerate()
    {
        editor.add_vertex(i, x).unwrap();
    }
    editor.init_cells(2).unwrap();
    editor.add_cell(0, &[3, 1, 0, 2]).unwrap();
    editor.add_cell(1, &[4, 2, 3, 1]).unwrap();
    let mut mesh = editor.close_unordered().unwrap();
    assert!(!mesh.is_ordered().unwrap());

    let tables = all_tables(&mesh);
    mesh.order().unwrap();
    assert!(mesh.is_ordered().unwrap());
    assert_eq!(all_tables(&mesh), tables);
    assert_eq!(mesh.cell_vertices().unwrap().entities(1), &[1, 2, 3, 4]);

    // ordering twice changes nothing
    let once = mesh.cell_vertices().unwrap().clone();
    mesh.order().unwrap();
    assert_eq!(mesh.cell_vertices().unwrap(), &once);
}

#[test]
fn ordered_cells_put_opposite_facets_first() {
    let mesh = unit_cube(1, 1, 1).unwrap();
    mesh.init_connectivity(3, 2).unwrap();
    let facets = mesh.connectivity(3, 2).unwrap();
    let facet_vertices = mesh.connectivity(2, 0).unwrap();
    for cell in mesh.cells().unwrap() {
        let vertices = cell.vertices().unwrap();
        assert!(vertices.windows(2).all(|w| w[0] < w[1]));
        for (i, &f) in facets.entities(cell.index()).iter().enumerate() {
            assert!(!facet_vertices.entities(f).contains(&vertices[i]));
        }
    }
}

#[test]
fn clear_and_clean() {
    let mut mesh = unit_square(2, 2).unwrap();
    mesh.init_all().unwrap();
    mesh.clean();
    assert_eq!(mesh.num_cells(), 8);
    assert!(mesh.topology().connectivity(1, 2).unwrap().is_none());
    assert_eq!(mesh.num_edges().unwrap(), 16);

    mesh.clear();
    assert_eq!(mesh.num_vertices(), 0);
    assert_eq!(mesh.num_cells(), 0);
}

#[test]
fn entity_iteration() {
    let mesh = unit_square(1, 1).unwrap();
    let edges = mesh.edges().unwrap();
    assert_eq!(edges.len(), 5);
    let cell = mesh.cell(1).unwrap();
    assert_eq!(cell.num_entities(1).unwrap(), 3);
    let neighbours: Vec<usize> = cell.incident(0).unwrap().map(|v| v.index()).collect();
    assert_eq!(neighbours, cell.vertices().unwrap());
    assert!(mesh.cell(2).is_err());
    assert!(mesh.entity(4, 0).is_err());
}
