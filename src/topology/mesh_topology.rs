//! Dimension-indexed entity counts and incidence tables.
//!
//! [`MeshTopology`] is the leaf store of the crate. Every count and every
//! `(d0, d1)` table sits in a [`OnceCell`]: it is absent until requested,
//! computed once by [`crate::topology::compute`], and then immutable until the
//! whole topology is cleared. The cell-vertex table `(tdim, 0)` is the only one
//! present from construction.

use once_cell::sync::OnceCell;
use parking_lot::{Mutex, MutexGuard};

use crate::mesh_error::MeshError;
use crate::topology::connectivity::Connectivity;

/// Entity counts and connectivity tables of a mesh.
#[derive(Debug)]
pub struct MeshTopology {
    dim: usize,
    sizes: Vec<OnceCell<usize>>,
    connectivity: Vec<OnceCell<Connectivity>>,
    // serializes lazy computation so concurrent first readers do not race
    compute_lock: Mutex<()>,
}

impl Clone for MeshTopology {
    fn clone(&self) -> Self {
        Self {
            dim: self.dim,
            sizes: self.sizes.clone(),
            connectivity: self.connectivity.clone(),
            compute_lock: Mutex::new(()),
        }
    }
}

impl MeshTopology {
    /// Creates an empty topology of dimension `dim`.
    pub fn new(dim: usize) -> Self {
        let n = dim + 1;
        Self {
            dim,
            sizes: (0..n).map(|_| OnceCell::new()).collect(),
            connectivity: (0..n * n).map(|_| OnceCell::new()).collect(),
            compute_lock: Mutex::new(()),
        }
    }

    /// Topological dimension.
    #[inline]
    pub fn dim(&self) -> usize {
        self.dim
    }

    #[inline]
    fn check_dim(&self, d: usize) -> Result<(), MeshError> {
        if d > self.dim {
            return Err(MeshError::InvalidDimension {
                dim: d,
                max: self.dim,
            });
        }
        Ok(())
    }

    #[inline]
    fn slot(&self, d0: usize, d1: usize) -> usize {
        d0 * (self.dim + 1) + d1
    }

    /// Number of entities of dimension `d`, or 0 if they have not been computed.
    pub fn size(&self, d: usize) -> Result<usize, MeshError> {
        self.check_dim(d)?;
        Ok(self.sizes[d].get().copied().unwrap_or(0))
    }

    /// Whether the entities of dimension `d` exist.
    pub fn has_entities(&self, d: usize) -> bool {
        d <= self.dim && self.sizes[d].get().is_some()
    }

    /// The `(d0, d1)` table if it has been computed.
    pub fn connectivity(&self, d0: usize, d1: usize) -> Result<Option<&Connectivity>, MeshError> {
        self.check_dim(d0)?;
        self.check_dim(d1)?;
        Ok(self.connectivity[self.slot(d0, d1)].get())
    }

    /// Cell-vertex table; present from construction.
    pub fn cell_vertices(&self) -> Result<&Connectivity, MeshError> {
        self.connectivity[self.slot(self.dim, 0)]
            .get()
            .ok_or(MeshError::EmptyMesh("cell-vertex connectivity"))
    }

    pub(crate) fn set_size(&self, d: usize, n: usize) -> Result<(), MeshError> {
        self.check_dim(d)?;
        // first value wins; a second computation produces the same count
        let _ = self.sizes[d].set(n);
        Ok(())
    }

    pub(crate) fn set_connectivity(
        &self,
        d0: usize,
        d1: usize,
        table: Connectivity,
    ) -> Result<(), MeshError> {
        self.check_dim(d0)?;
        self.check_dim(d1)?;
        let _ = self.connectivity[self.slot(d0, d1)].set(table);
        Ok(())
    }

    /// Mutable access used by local reordering.
    pub(crate) fn connectivity_mut(&mut self, d0: usize, d1: usize) -> Option<&mut Connectivity> {
        if d0 > self.dim || d1 > self.dim {
            return None;
        }
        let slot = self.slot(d0, d1);
        self.connectivity[slot].get_mut()
    }

    pub(crate) fn compute_guard(&self) -> MutexGuard<'_, ()> {
        self.compute_lock.lock()
    }

    /// Initializes vertex and cell data. Called once by the mesh editor.
    pub(crate) fn init_mesh(&mut self, num_vertices: usize, cells: Connectivity) {
        self.clear();
        let dim = self.dim;
        let _ = self.sizes[0].set(num_vertices);
        let _ = self.sizes[dim].set(cells.len());
        let slot = self.slot(dim, 0);
        let _ = self.connectivity[slot].set(cells);
    }

    /// Drops every count and table.
    pub fn clear(&mut self) {
        for s in &mut self.sizes {
            s.take();
        }
        for c in &mut self.connectivity {
            c.take();
        }
    }

    /// Drops every derived table, keeping vertices, cells and `(tdim, 0)`.
    pub fn clean(&mut self) {
        let dim = self.dim;
        let keep = self.slot(dim, 0);
        for (i, c) in self.connectivity.iter_mut().enumerate() {
            if i != keep {
                c.take();
            }
        }
        for (d, s) in self.sizes.iter_mut().enumerate() {
            if d != 0 && d != dim {
                s.take();
            }
        }
    }

    /// Short summary of which tables exist, e.g. for logging.
    pub fn summary(&self) -> String {
        let n = self.dim + 1;
        let mut out = String::new();
        for d0 in 0..n {
            for d1 in 0..n {
                out.push(if self.connectivity[self.slot(d0, d1)].get().is_some() {
                    'x'
                } else {
                    '-'
                });
            }
            if d0 + 1 < n {
                out.push(' ');
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_triangles() -> MeshTopology {
        let mut t = MeshTopology::new(2);
        t.init_mesh(4, Connectivity::from_fixed_width(3, vec![0, 1, 2, 1, 2, 3]));
        t
    }

    #[test]
    fn construction_sets_cells_only() {
        let t = two_triangles();
        assert_eq!(t.size(0).unwrap(), 4);
        assert_eq!(t.size(2).unwrap(), 2);
        assert_eq!(t.size(1).unwrap(), 0);
        assert!(t.connectivity(2, 0).unwrap().is_some());
        assert!(t.connectivity(1, 0).unwrap().is_none());
        assert!(matches!(
            t.size(3),
            Err(MeshError::InvalidDimension { dim: 3, max: 2 })
        ));
        assert_eq!(t.summary(), "--- --- x--");
    }

    #[test]
    fn clean_keeps_cell_vertex_table() {
        let mut t = two_triangles();
        t.set_size(1, 5).unwrap();
        t.set_connectivity(0, 0, Connectivity::identity(4)).unwrap();
        t.clean();
        assert_eq!(t.size(1).unwrap(), 0);
        assert!(t.connectivity(0, 0).unwrap().is_none());
        assert!(t.connectivity(2, 0).unwrap().is_some());
        t.clear();
        assert_eq!(t.size(0).unwrap(), 0);
        assert!(t.cell_vertices().is_err());
    }

    #[test]
    fn tables_are_set_once() {
        let t = two_triangles();
        t.set_connectivity(0, 0, Connectivity::identity(4)).unwrap();
        t.set_connectivity(0, 0, Connectivity::identity(2)).unwrap();
        assert_eq!(t.connectivity(0, 0).unwrap().unwrap().len(), 4);
    }
}
