//! Incremental construction of a [`Mesh`].
//!
//! The editor enforces the call order `open` → `init_vertices` →
//! `add_vertex`* → `init_cells` → `add_cell`* → `close`. Every slot declared
//! by `init_vertices` / `init_cells` must be filled before closing.
//!
//! ```
//! use mesh_topology::mesh_editor::MeshEditor;
//! use mesh_topology::topology::cell_type::CellType;
//!
//! let mut editor = MeshEditor::new();
//! editor.open(CellType::Triangle, 2, 2)?;
//! editor.init_vertices(3)?;
//! editor.add_vertex(0, &[0.0, 0.0])?;
//! editor.add_vertex(1, &[1.0, 0.0])?;
//! editor.add_vertex(2, &[0.0, 1.0])?;
//! editor.init_cells(1)?;
//! editor.add_cell(0, &[0, 1, 2])?;
//! let mesh = editor.close()?;
//! assert_eq!(mesh.num_cells(), 1);
//! # Ok::<(), mesh_topology::mesh_error::MeshError>(())
//! ```

use crate::data::geometry::MeshGeometry;
use crate::geometry::point::Point;
use crate::mesh::Mesh;
use crate::mesh_error::MeshError;
use crate::topology::cell_type::CellType;
use crate::topology::connectivity::Connectivity;

#[derive(Debug)]
struct Draft {
    cell_type: CellType,
    gdim: usize,
    geometry: Option<MeshGeometry>,
    vertex_set: Vec<bool>,
    cells: Option<Vec<usize>>,
    cell_set: Vec<bool>,
}

/// Builder for [`Mesh`]; see the module docs for the call order.
#[derive(Debug, Default)]
pub struct MeshEditor {
    draft: Option<Draft>,
}

fn state_error<T>(msg: impl Into<String>) -> Result<T, MeshError> {
    Err(MeshError::EditorState(msg.into()))
}

impl MeshEditor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a mesh is being edited.
    pub fn is_open(&self) -> bool {
        self.draft.is_some()
    }

    /// Starts a mesh of cells of `cell_type` embedded in `R^gdim`.
    pub fn open(&mut self, cell_type: CellType, tdim: usize, gdim: usize) -> Result<(), MeshError> {
        if self.draft.is_some() {
            return state_error("editor is already open");
        }
        if cell_type.dim() != tdim {
            return Err(MeshError::InvalidDimension {
                dim: tdim,
                max: cell_type.dim(),
            });
        }
        if !(1..=3).contains(&gdim) || gdim < tdim {
            return Err(MeshError::InvalidConfiguration(format!(
                "geometric dimension {gdim} cannot embed a mesh of topological dimension {tdim}"
            )));
        }
        self.draft = Some(Draft {
            cell_type,
            gdim,
            geometry: None,
            vertex_set: Vec::new(),
            cells: None,
            cell_set: Vec::new(),
        });
        Ok(())
    }

    fn draft_mut(&mut self) -> Result<&mut Draft, MeshError> {
        self.draft
            .as_mut()
            .ok_or_else(|| MeshError::EditorState("editor is not open".into()))
    }

    /// Declares the number of vertices.
    pub fn init_vertices(&mut self, num_vertices: usize) -> Result<(), MeshError> {
        let draft = self.draft_mut()?;
        if draft.geometry.is_some() {
            return state_error("vertices are already initialized");
        }
        draft.geometry = Some(MeshGeometry::new(draft.gdim, num_vertices)?);
        draft.vertex_set = vec![false; num_vertices];
        Ok(())
    }

    /// Sets the coordinates of vertex `index`.
    pub fn add_vertex(&mut self, index: usize, x: &[f64]) -> Result<(), MeshError> {
        let draft = self.draft_mut()?;
        if draft.cells.is_some() {
            return state_error("cannot add vertices after init_cells");
        }
        let Some(geometry) = draft.geometry.as_mut() else {
            return state_error("add_vertex called before init_vertices");
        };
        geometry.set(index, x)?;
        draft.vertex_set[index] = true;
        Ok(())
    }

    /// Sets vertex `index` from the first `gdim` components of `p`.
    pub fn add_vertex_point(&mut self, index: usize, p: &Point) -> Result<(), MeshError> {
        let gdim = self.draft_mut()?.gdim;
        self.add_vertex(index, &p.coordinates()[..gdim])
    }

    /// Declares the number of cells.
    pub fn init_cells(&mut self, num_cells: usize) -> Result<(), MeshError> {
        let draft = self.draft_mut()?;
        if draft.geometry.is_none() {
            return state_error("init_cells called before init_vertices");
        }
        if draft.cells.is_some() {
            return state_error("cells are already initialized");
        }
        let width = draft.cell_type.cell_vertices();
        draft.cells = Some(vec![0; num_cells * width]);
        draft.cell_set = vec![false; num_cells];
        Ok(())
    }

    /// Sets the vertices of cell `index`.
    pub fn add_cell(&mut self, index: usize, vertices: &[usize]) -> Result<(), MeshError> {
        let draft = self.draft_mut()?;
        let num_vertices = draft.vertex_set.len();
        let width = draft.cell_type.cell_vertices();
        let num_cells = draft.cell_set.len();
        let tdim = draft.cell_type.dim();
        let Some(cells) = draft.cells.as_mut() else {
            return state_error("add_cell called before init_cells");
        };
        if index >= num_cells {
            return Err(MeshError::EntityOutOfRange {
                dim: tdim,
                index,
                size: num_cells,
            });
        }
        if vertices.len() != width {
            return Err(MeshError::CellArity {
                cell: index,
                expected: width,
                found: vertices.len(),
            });
        }
        for (k, &v) in vertices.iter().enumerate() {
            if v >= num_vertices {
                return Err(MeshError::VertexOutOfRange {
                    cell: index,
                    vertex: v,
                    num_vertices,
                });
            }
            if vertices[..k].contains(&v) {
                return state_error(format!("cell {index} repeats vertex {v}"));
            }
        }
        cells[index * width..(index + 1) * width].copy_from_slice(vertices);
        draft.cell_set[index] = true;
        Ok(())
    }

    /// Finishes the mesh and orders it (simplex meshes only).
    pub fn close(&mut self) -> Result<Mesh, MeshError> {
        let mut mesh = self.finish()?;
        if mesh.cell_type().is_simplex() {
            mesh.order()?;
        }
        Ok(mesh)
    }

    /// Finishes the mesh keeping the vertex order of every cell as given.
    pub fn close_unordered(&mut self) -> Result<Mesh, MeshError> {
        self.finish()
    }

    fn finish(&mut self) -> Result<Mesh, MeshError> {
        let draft = self.draft_mut()?;
        if let Some(v) = draft.vertex_set.iter().position(|set| !set) {
            return state_error(format!("vertex {v} was never added"));
        }
        if let Some(c) = draft.cell_set.iter().position(|set| !set) {
            return state_error(format!("cell {c} was never added"));
        }
        if draft.geometry.is_none() {
            return state_error("close called before init_vertices");
        }
        if draft.cells.is_none() {
            return state_error("close called before init_cells");
        }
        let Some(Draft {
            cell_type,
            geometry: Some(geometry),
            cells: Some(cells),
            ..
        }) = self.draft.take()
        else {
            return state_error("editor is not open");
        };
        let cells = Connectivity::from_fixed_width(cell_type.cell_vertices(), cells);
        Ok(Mesh::from_parts(cell_type, geometry, cells))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_interval(editor: &mut MeshEditor) {
        editor.open(CellType::Interval, 1, 1).unwrap();
        editor.init_vertices(2).unwrap();
        editor.add_vertex(0, &[0.0]).unwrap();
        editor.add_vertex(1, &[1.0]).unwrap();
    }

    #[test]
    fn call_order_is_enforced() {
        let mut editor = MeshEditor::new();
        assert!(matches!(editor.init_vertices(2), Err(MeshError::EditorState(_))));
        open_interval(&mut editor);
        assert!(matches!(editor.add_cell(0, &[0, 1]), Err(MeshError::EditorState(_))));
        editor.init_cells(1).unwrap();
        assert!(matches!(editor.add_vertex(0, &[0.5]), Err(MeshError::EditorState(_))));
        assert!(matches!(editor.close(), Err(MeshError::EditorState(_))));
        editor.add_cell(0, &[1, 0]).unwrap();
        let mesh = editor.close().unwrap();
        assert!(!editor.is_open());
        assert_eq!(mesh.cell_vertices().unwrap().entities(0), &[0, 1]);
    }

    #[test]
    fn bad_cells_are_rejected() {
        let mut editor = MeshEditor::new();
        open_interval(&mut editor);
        editor.init_cells(1).unwrap();
        assert!(matches!(
            editor.add_cell(0, &[0, 1, 1]),
            Err(MeshError::CellArity { cell: 0, expected: 2, found: 3 })
        ));
        assert!(matches!(
            editor.add_cell(0, &[0, 7]),
            Err(MeshError::VertexOutOfRange { vertex: 7, .. })
        ));
        assert!(matches!(editor.add_cell(3, &[0, 1]), Err(MeshError::EntityOutOfRange { .. })));
        assert!(matches!(editor.add_cell(0, &[1, 1]), Err(MeshError::EditorState(_))));
    }

    #[test]
    fn close_unordered_keeps_vertex_order() {
        let mut editor = MeshEditor::new();
        open_interval(&mut editor);
        editor.init_cells(1).unwrap();
        editor.add_cell(0, &[1, 0]).unwrap();
        let mesh = editor.close_unordered().unwrap();
        assert_eq!(mesh.cell_vertices().unwrap().entities(0), &[1, 0]);
        assert!(!mesh.is_ordered().unwrap());
    }

    #[test]
    fn open_checks_dimensions() {
        let mut editor = MeshEditor::new();
        assert!(editor.open(CellType::Tetrahedron, 2, 3).is_err());
        assert!(editor.open(CellType::Tetrahedron, 3, 2).is_err());
        editor.open(CellType::Triangle, 2, 3).unwrap();
        assert!(matches!(
            editor.open(CellType::Triangle, 2, 3),
            Err(MeshError::EditorState(_))
        ));
    }
}
