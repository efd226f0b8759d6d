//! Structured simplex meshes of intervals, rectangles and boxes.
//!
//! Vertices are numbered lexicographically with `x` fastest. Every square of
//! a rectangle mesh is split into triangles according to a [`Diagonal`];
//! every cube of a box mesh into six tetrahedra sharing the main diagonal
//! `v0 -> v7`.

use std::fmt;
use std::str::FromStr;

use itertools::iproduct;

use crate::geometry::point::Point;
use crate::mesh::Mesh;
use crate::mesh_editor::MeshEditor;
use crate::mesh_error::MeshError;
use crate::topology::cell_type::CellType;

/// How the squares of a rectangle mesh are split.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Diagonal {
    /// Two triangles sharing the diagonal from lower left to upper right.
    #[default]
    Right,
    /// Two triangles sharing the diagonal from lower right to upper left.
    Left,
    /// Four triangles around an extra vertex at the square's center.
    Crossed,
}

impl Diagonal {
    pub fn as_str(self) -> &'static str {
        match self {
            Diagonal::Right => "right",
            Diagonal::Left => "left",
            Diagonal::Crossed => "crossed",
        }
    }
}

impl fmt::Display for Diagonal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Diagonal {
    type Err = MeshError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "right" => Ok(Diagonal::Right),
            "left" => Ok(Diagonal::Left),
            "crossed" => Ok(Diagonal::Crossed),
            other => Err(MeshError::InvalidConfiguration(format!(
                "unknown diagonal '{other}' (expected right, left or crossed)"
            ))),
        }
    }
}

fn invalid(message: impl Into<String>) -> MeshError {
    MeshError::InvalidConfiguration(message.into())
}

fn check_divisions(counts: &[usize]) -> Result<(), MeshError> {
    if counts.iter().any(|&n| n == 0) {
        return Err(invalid(format!(
            "number of divisions must be positive (got {counts:?})"
        )));
    }
    Ok(())
}

fn check_extent(a: f64, b: f64, axis: usize) -> Result<(), MeshError> {
    if !(a < b) {
        return Err(invalid(format!(
            "lower corner must be below upper corner along axis {axis} ({a} >= {b})"
        )));
    }
    Ok(())
}

/// `n` equal intervals on `[0, 1]`.
pub fn unit_interval(n: usize) -> Result<Mesh, MeshError> {
    interval(n, 0.0, 1.0)
}

/// `n` equal intervals on `[a, b]`.
pub fn interval(n: usize, a: f64, b: f64) -> Result<Mesh, MeshError> {
    check_divisions(&[n])?;
    check_extent(a, b, 0)?;
    let h = (b - a) / n as f64;

    let mut editor = MeshEditor::new();
    editor.open(CellType::Interval, 1, 1)?;
    editor.init_vertices(n + 1)?;
    for i in 0..=n {
        // pin the last vertex to the exact endpoint
        let x = if i == n { b } else { a + i as f64 * h };
        editor.add_vertex(i, &[x])?;
    }
    editor.init_cells(n)?;
    for i in 0..n {
        editor.add_cell(i, &[i, i + 1])?;
    }
    editor.close()
}

/// `nx` by `ny` squares on `[0, 1]^2`, right diagonal.
pub fn unit_square(nx: usize, ny: usize) -> Result<Mesh, MeshError> {
    rectangle(
        &Point::new(0.0, 0.0, 0.0),
        &Point::new(1.0, 1.0, 0.0),
        nx,
        ny,
        Diagonal::Right,
    )
}

/// `nx` by `ny` squares on the rectangle spanned by `p0` and `p1`.
pub fn rectangle(
    p0: &Point,
    p1: &Point,
    nx: usize,
    ny: usize,
    diagonal: Diagonal,
) -> Result<Mesh, MeshError> {
    check_divisions(&[nx, ny])?;
    check_extent(p0.x(), p1.x(), 0)?;
    check_extent(p0.y(), p1.y(), 1)?;
    let coordinate = |i: usize, n: usize, a: f64, b: f64| {
        if i == n { b } else { a + i as f64 * (b - a) / n as f64 }
    };

    let num_grid = (nx + 1) * (ny + 1);
    let (num_vertices, num_cells) = match diagonal {
        Diagonal::Crossed => (num_grid + nx * ny, 4 * nx * ny),
        Diagonal::Right | Diagonal::Left => (num_grid, 2 * nx * ny),
    };

    let mut editor = MeshEditor::new();
    editor.open(CellType::Triangle, 2, 2)?;
    editor.init_vertices(num_vertices)?;
    for (iy, ix) in iproduct!(0..=ny, 0..=nx) {
        let x = coordinate(ix, nx, p0.x(), p1.x());
        let y = coordinate(iy, ny, p0.y(), p1.y());
        editor.add_vertex(iy * (nx + 1) + ix, &[x, y])?;
    }
    if diagonal == Diagonal::Crossed {
        for (iy, ix) in iproduct!(0..ny, 0..nx) {
            let x = 0.5 * (coordinate(ix, nx, p0.x(), p1.x()) + coordinate(ix + 1, nx, p0.x(), p1.x()));
            let y = 0.5 * (coordinate(iy, ny, p0.y(), p1.y()) + coordinate(iy + 1, ny, p0.y(), p1.y()));
            editor.add_vertex(num_grid + iy * nx + ix, &[x, y])?;
        }
    }

    editor.init_cells(num_cells)?;
    let mut cell = 0;
    for (iy, ix) in iproduct!(0..ny, 0..nx) {
        let v0 = iy * (nx + 1) + ix;
        let v1 = v0 + 1;
        let v2 = v0 + (nx + 1);
        let v3 = v1 + (nx + 1);
        let triangles = match diagonal {
            Diagonal::Right => vec![[v0, v1, v3], [v0, v2, v3]],
            Diagonal::Left => vec![[v0, v1, v2], [v1, v2, v3]],
            Diagonal::Crossed => {
                let vm = num_grid + iy * nx + ix;
                vec![[v0, v1, vm], [v0, v2, vm], [v1, v3, vm], [v2, v3, vm]]
            }
        };
        for t in &triangles {
            editor.add_cell(cell, t)?;
            cell += 1;
        }
    }
    editor.close()
}

/// `nx` by `ny` by `nz` cubes on `[0, 1]^3`, six tetrahedra each.
pub fn unit_cube(nx: usize, ny: usize, nz: usize) -> Result<Mesh, MeshError> {
    box_mesh(
        &Point::new(0.0, 0.0, 0.0),
        &Point::new(1.0, 1.0, 1.0),
        nx,
        ny,
        nz,
    )
}

/// `nx` by `ny` by `nz` cubes on the box spanned by `p0` and `p1`.
pub fn box_mesh(p0: &Point, p1: &Point, nx: usize, ny: usize, nz: usize) -> Result<Mesh, MeshError> {
    check_divisions(&[nx, ny, nz])?;
    for axis in 0..3 {
        check_extent(p0[axis], p1[axis], axis)?;
    }
    let n = [nx, ny, nz];
    let coordinate = |i: usize, axis: usize| {
        if i == n[axis] {
            p1[axis]
        } else {
            p0[axis] + i as f64 * (p1[axis] - p0[axis]) / n[axis] as f64
        }
    };

    let layer = (nx + 1) * (ny + 1);
    let mut editor = MeshEditor::new();
    editor.open(CellType::Tetrahedron, 3, 3)?;
    editor.init_vertices(layer * (nz + 1))?;
    for (iz, iy, ix) in iproduct!(0..=nz, 0..=ny, 0..=nx) {
        let x = [coordinate(ix, 0), coordinate(iy, 1), coordinate(iz, 2)];
        editor.add_vertex(iz * layer + iy * (nx + 1) + ix, &x)?;
    }

    editor.init_cells(6 * nx * ny * nz)?;
    let mut cell = 0;
    for (iz, iy, ix) in iproduct!(0..nz, 0..ny, 0..nx) {
        let v0 = iz * layer + iy * (nx + 1) + ix;
        let v1 = v0 + 1;
        let v2 = v0 + (nx + 1);
        let v3 = v1 + (nx + 1);
        let v4 = v0 + layer;
        let v5 = v1 + layer;
        let v6 = v2 + layer;
        let v7 = v3 + layer;
        for t in [
            [v0, v1, v3, v7],
            [v0, v1, v7, v5],
            [v0, v5, v7, v4],
            [v0, v3, v2, v7],
            [v0, v6, v4, v7],
            [v0, v2, v6, v7],
        ] {
            editor.add_cell(cell, &t)?;
            cell += 1;
        }
    }
    editor.close()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interval_endpoints_are_exact() {
        let mesh = interval(3, -1.0, 2.0).unwrap();
        assert_eq!(mesh.num_cells(), 3);
        assert_eq!(mesh.geometry().x(3), &[2.0]);
        assert_eq!(mesh.geometry().x(1), &[0.0]);
    }

    #[test]
    fn diagonals_change_cell_counts() {
        let p0 = Point::new(0.0, 0.0, 0.0);
        let p1 = Point::new(2.0, 1.0, 0.0);
        let right = rectangle(&p0, &p1, 2, 2, Diagonal::Right).unwrap();
        let left = rectangle(&p0, &p1, 2, 2, Diagonal::Left).unwrap();
        let crossed = rectangle(&p0, &p1, 2, 2, Diagonal::Crossed).unwrap();
        assert_eq!(right.num_cells(), 8);
        assert_eq!(left.num_cells(), 8);
        assert_eq!(crossed.num_cells(), 16);
        assert_eq!(crossed.num_vertices(), 13);
        assert_eq!(crossed.geometry().x(9), &[0.5, 0.25]);
        assert_eq!(right.cell_vertices().unwrap().entities(1), &[0, 3, 4]);
        assert_eq!(left.cell_vertices().unwrap().entities(1), &[1, 3, 4]);
    }

    #[test]
    fn cube_cells_follow_the_main_diagonal() {
        let mesh = unit_cube(1, 1, 1).unwrap();
        let cells = mesh.cell_vertices().unwrap();
        assert_eq!(cells.entities(0), &[0, 1, 3, 7]);
        assert_eq!(cells.entities(2), &[0, 4, 5, 7]);
        for c in mesh.cells().unwrap() {
            assert!((c.volume().unwrap() - 1.0 / 6.0).abs() < 1e-15);
        }
    }

    #[test]
    fn bad_arguments() {
        assert!(matches!(unit_interval(0), Err(MeshError::InvalidConfiguration(_))));
        assert!(interval(2, 1.0, 1.0).is_err());
        assert!(matches!(
            "diagonal".parse::<Diagonal>(),
            Err(MeshError::InvalidConfiguration(_))
        ));
        assert_eq!("crossed".parse::<Diagonal>().unwrap(), Diagonal::Crossed);
    }
}
