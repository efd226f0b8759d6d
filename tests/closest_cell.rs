mod util;

use mesh_topology::prelude::*;
use util::{assert_close, closest_cell_fixtures, quarter_circle, tilted_cube_surface};

#[test]
fn square_probes_outside_the_domain() {
    let mesh = unit_square(2, 2).unwrap();
    for ([x, y], cell, _) in closest_cell_fixtures() {
        let p = Point::new(x, y, 0.0);
        assert_eq!(mesh.closest_cell(&p).unwrap(), cell, "probe ({x}, {y})");
        assert_close(mesh.distance(&p).unwrap(), 0.5, 1e-14);
    }
}

#[test]
fn cube_probes_outside_the_domain() {
    let mesh = unit_cube(2, 2, 1).unwrap();
    for ([x, y], _, cell) in closest_cell_fixtures() {
        let p = Point::new(x, y, 0.1);
        assert_eq!(mesh.closest_cell(&p).unwrap(), cell, "probe ({x}, {y}, 0.1)");
        assert_close(mesh.distance(&p).unwrap(), 0.5, 1e-14);
    }
}

#[test]
fn every_midpoint_is_closest_to_its_own_cell() {
    for mesh in [
        unit_interval(7).unwrap(),
        unit_square(5, 3).unwrap(),
        unit_cube(2, 3, 2).unwrap(),
        tilted_cube_surface(),
        quarter_circle(50),
    ] {
        for cell in mesh.cells().unwrap() {
            let p = cell.midpoint().unwrap();
            assert_eq!(mesh.closest_cell(&p).unwrap(), cell.index(), "{mesh}");
            assert!(mesh.distance(&p).unwrap() < 1e-14);
            let (q, closest) = mesh.closest_point_and_cell(&p).unwrap();
            assert_eq!(closest, cell.index());
            assert!(q.distance(&p) < 1e-14);
        }
    }
}

#[test]
fn closest_point_lies_on_the_boundary() {
    let mesh = unit_square(3, 3).unwrap();
    let p = Point::new(2.0, 0.5, 0.0);
    let (q, cell) = mesh.closest_point_and_cell(&p).unwrap();
    assert!(q.distance(&Point::new(1.0, 0.5, 0.0)) < 1e-14);
    assert!(mesh.cell(cell).unwrap().distance(&q).unwrap() < 1e-14);
    assert_close(mesh.distance(&p).unwrap(), 1.0, 1e-14);
    assert_eq!(mesh.closest_point(&p).unwrap(), q);
}

#[test]
fn first_hit_and_misses() {
    let mesh = unit_square(2, 2).unwrap();
    let inside = Point::new(0.6, 0.1, 0.0);
    let cell = mesh.intersected_cell(&inside).unwrap().unwrap();
    assert!(mesh.cell(cell).unwrap().contains(&inside).unwrap());
    assert_eq!(mesh.intersected_cell(&Point::new(3.0, 3.0, 0.0)).unwrap(), None);
    assert!(mesh.intersected_cells(&Point::new(-1.0, 0.5, 0.0)).unwrap().is_empty());
}

#[test]
fn empty_mesh_has_no_closest_cell() {
    let mut editor = MeshEditor::new();
    editor.open(CellType::Triangle, 2, 2).unwrap();
    editor.init_vertices(0).unwrap();
    editor.init_cells(0).unwrap();
    let mesh = editor.close().unwrap();
    assert!(matches!(
        mesh.closest_cell(&Point::new(0.0, 0.0, 0.0)),
        Err(MeshError::EmptyMesh(_))
    ));
}

#[test]
fn moving_the_mesh_rebuilds_the_search_tree() {
    let mut mesh = unit_square(2, 2).unwrap();
    let p = Point::new(0.25, -0.5, 0.0);
    assert_eq!(mesh.closest_cell(&p).unwrap(), 0);
    mesh.translate(&Point::new(0.0, -1.0, 0.0));
    // now inside the top row
    assert!(mesh.distance(&p).unwrap() < 1e-14);
    assert!(mesh.intersected_cells(&p).unwrap().contains(&4));
}

#[cfg(feature = "rayon")]
#[test]
fn parallel_batch_matches_serial() {
    let mesh = unit_cube(2, 2, 1).unwrap();
    let probes: Vec<Point> = closest_cell_fixtures()
        .into_iter()
        .map(|([x, y], _, _)| Point::new(x, y, 0.1))
        .collect();
    let serial: Vec<usize> = probes.iter().map(|p| mesh.closest_cell(p).unwrap()).collect();
    assert_eq!(mesh.closest_cells_par(&probes).unwrap(), serial);
    for d in mesh.distances_par(&probes).unwrap() {
        assert_close(d, 0.5, 1e-14);
    }
}

#[test]
fn closest_cell_survives_rounding_in_the_seed_cell() {
    // midpoints of tilted or curved cells sit a few ulps off their cell
    let surface = tilted_cube_surface();
    let mut midpoints: Vec<Point> = surface.cells().unwrap().map(|c| c.midpoint().unwrap()).collect();
    midpoints.push(Point::new(2.0, 2.0, 2.0));
    for (i, p) in midpoints.iter().enumerate() {
        let cell = surface.closest_cell(p).unwrap();
        let d = surface.distance(p).unwrap();
        assert_eq!(d, surface.cell(cell).unwrap().distance(p).unwrap());
        if i < surface.num_cells() {
            assert_eq!(cell, i);
            assert_eq!(d, 0.0);
        }
    }

    let arc = quarter_circle(50);
    for cell in arc.cells().unwrap() {
        let p = cell.midpoint().unwrap();
        assert_eq!(arc.closest_cell(&p).unwrap(), cell.index());
        assert_eq!(arc.distance(&p).unwrap(), 0.0);
    }
}
