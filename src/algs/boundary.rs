//! Boundary extraction.
//!
//! A facet is on the boundary when exactly one cell is attached to it. The
//! boundary facets become the cells of a new mesh of dimension `tdim - 1`
//! whose vertices are numbered in order of first appearance while scanning
//! facets by index. Each boundary cell is oriented so that its normal points
//! away from the parent cell.

use std::fmt;
use std::str::FromStr;

use crate::data::mesh_function::MeshFunction;
use crate::geometry::point::Point;
use crate::mesh::Mesh;
use crate::mesh_editor::MeshEditor;
use crate::mesh_error::MeshError;
use crate::topology::cell_type::CellType;

/// Which boundary facets to extract.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum BoundaryType {
    /// Facets on the boundary of the global domain.
    #[default]
    Exterior,
    /// Facets on the boundary between partitions. A mesh that is not
    /// partitioned has none.
    Interior,
    /// Both of the above.
    Local,
}

impl BoundaryType {
    pub fn as_str(self) -> &'static str {
        match self {
            BoundaryType::Exterior => "exterior",
            BoundaryType::Interior => "interior",
            BoundaryType::Local => "local",
        }
    }

    // Every single-cell facet of an unpartitioned mesh is globally exterior.
    fn selects_exterior(self) -> bool {
        matches!(self, BoundaryType::Exterior | BoundaryType::Local)
    }
}

impl fmt::Display for BoundaryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BoundaryType {
    type Err = MeshError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "exterior" => Ok(BoundaryType::Exterior),
            "interior" => Ok(BoundaryType::Interior),
            "local" => Ok(BoundaryType::Local),
            other => Err(MeshError::InvalidConfiguration(format!(
                "unknown boundary type '{other}' (expected exterior, interior or local)"
            ))),
        }
    }
}

/// Boundary of a mesh together with maps back to its parent.
#[derive(Clone, Debug)]
pub struct BoundaryMesh {
    /// The boundary itself: cells are the parent's boundary facets.
    pub mesh: Mesh,
    /// Boundary vertex -> parent vertex.
    pub vertex_map: MeshFunction<usize>,
    /// Boundary cell -> parent facet.
    pub cell_map: MeshFunction<usize>,
}

impl BoundaryMesh {
    /// Extracts the boundary of `parent`.
    pub fn new(parent: &Mesh, kind: BoundaryType) -> Result<Self, MeshError> {
        log::trace!("Computing {kind} boundary mesh");
        let cell_type = parent.cell_type();
        if !cell_type.is_simplex() {
            return Err(MeshError::UnsupportedOperation {
                op: "boundary extraction",
                cell_type,
            });
        }
        let tdim = parent.tdim();
        let fdim = tdim.checked_sub(1).ok_or(MeshError::UnsupportedOperation {
            op: "boundary extraction",
            cell_type,
        })?;

        let facet_cells = parent.connectivity(fdim, tdim)?;
        let facet_vertices = parent.connectivity(fdim, 0)?;

        let num_parent_vertices = parent.num_vertices();
        let mut boundary_index = vec![usize::MAX; num_parent_vertices];
        let mut vertex_map = Vec::new();
        let mut facets = Vec::new();

        for (facet, cells) in facet_cells.iter().enumerate() {
            match cells.len() {
                1 => {}
                2 => continue,
                n => {
                    return Err(MeshError::NonManifoldFacet {
                        facet,
                        incident_cells: n,
                    });
                }
            }
            if !kind.selects_exterior() {
                continue;
            }
            for &v in facet_vertices.entities(facet) {
                if boundary_index[v] == usize::MAX {
                    boundary_index[v] = vertex_map.len();
                    vertex_map.push(v);
                }
            }
            facets.push(facet);
        }
        log::trace!(
            "Found {} boundary facets and {} boundary vertices",
            facets.len(),
            vertex_map.len()
        );

        let gdim = parent.gdim();
        let geometry = parent.geometry();
        let mut editor = MeshEditor::new();
        editor.open(cell_type.facet_type()?, fdim, gdim)?;
        editor.init_vertices(vertex_map.len())?;
        for (b, &v) in vertex_map.iter().enumerate() {
            editor.add_vertex(b, geometry.x(v))?;
        }
        editor.init_cells(facets.len())?;
        let mut cell = Vec::with_capacity(tdim);
        for (b, &facet) in facets.iter().enumerate() {
            let vertices = facet_vertices.entities(facet);
            cell.clear();
            cell.extend(vertices.iter().map(|&v| boundary_index[v]));
            if points_inward(parent, facet_cells.entities(facet)[0], vertices)? {
                cell.swap(0, 1);
            }
            editor.add_cell(b, &cell)?;
        }
        // ordering would undo the orientation fix above
        let mesh = editor.close_unordered()?;

        let vertex_map = MeshFunction::from_values(&mesh, 0, vertex_map)?;
        let cell_map = MeshFunction::from_values(&mesh, fdim, facets)?;
        Ok(Self {
            mesh,
            vertex_map,
            cell_map,
        })
    }

    pub fn num_vertices(&self) -> usize {
        self.mesh.num_vertices()
    }

    pub fn num_cells(&self) -> usize {
        self.mesh.num_cells()
    }
}

/// Whether the facet normal implied by the vertex order of `facet` points
/// toward the vertex of `cell` that is not on the facet.
fn points_inward(parent: &Mesh, cell: usize, facet: &[usize]) -> Result<bool, MeshError> {
    let geometry = parent.geometry();
    let cell_vertices = parent.cell_vertices()?.entities(cell);
    let Some(opposite) = cell_vertices.iter().find(|v| !facet.contains(v)) else {
        return Ok(false);
    };
    let p = geometry.point(*opposite);
    let n = match parent.cell_type() {
        CellType::Triangle => {
            let p0 = geometry.point(facet[0]);
            let v = geometry.point(facet[1]) - p0;
            Point::new(v.y(), -v.x(), 0.0)
        }
        CellType::Tetrahedron => {
            let p0 = geometry.point(facet[0]);
            let v1 = geometry.point(facet[1]) - p0;
            let v2 = geometry.point(facet[2]) - p0;
            v1.cross(&v2)
        }
        // a point facet has no orientation
        _ => return Ok(false),
    };
    Ok(n.dot(&(geometry.point(facet[0]) - p)) < 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algs::generation::{unit_cube, unit_interval, unit_square};

    #[test]
    fn parse_boundary_types() {
        assert_eq!("local".parse::<BoundaryType>().unwrap(), BoundaryType::Local);
        assert_eq!(BoundaryType::Interior.to_string(), "interior");
        assert!(matches!(
            "outer".parse::<BoundaryType>(),
            Err(MeshError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn interval_boundary_is_two_points() {
        let mesh = unit_interval(5).unwrap();
        let b = mesh.boundary(BoundaryType::Exterior).unwrap();
        assert_eq!(b.mesh.cell_type(), CellType::Point);
        assert_eq!(b.num_vertices(), 2);
        assert_eq!(b.num_cells(), 2);
        let mut parents: Vec<usize> = b.vertex_map.values().to_vec();
        parents.sort_unstable();
        assert_eq!(parents, vec![0, 5]);
    }

    #[test]
    fn square_and_cube_boundary_sizes() {
        let square = unit_square(3, 2).unwrap();
        let b = BoundaryMesh::new(&square, BoundaryType::Exterior).unwrap();
        assert_eq!(b.num_cells(), 10);
        assert_eq!(b.num_vertices(), 10);
        assert_eq!(b.mesh.gdim(), 2);

        let cube = unit_cube(2, 2, 2).unwrap();
        let b = BoundaryMesh::new(&cube, BoundaryType::Local).unwrap();
        // 6 faces of 2x2 squares, 2 triangles each
        assert_eq!(b.num_cells(), 48);
        assert_eq!(b.num_vertices(), 26);
    }

    #[test]
    fn interior_boundary_of_serial_mesh_is_empty() {
        let mesh = unit_square(2, 2).unwrap();
        let b = mesh.boundary(BoundaryType::Interior).unwrap();
        assert_eq!(b.num_cells(), 0);
        assert_eq!(b.num_vertices(), 0);
    }
}
