//! Local ordering of simplicial mesh entities.
//!
//! A simplicial mesh is *ordered* when every vertex list is ascending and,
//! for every entity `e0` and every sub-dimension `d1` with a table,
//! sub-entity `k` of `e0` has the vertices of pattern `k` of `e0`'s simplex
//! type. For triangles that means edge `i` is opposite vertex `i`; for
//! tetrahedra face `i` is opposite vertex `i` and edge `m` misses both
//! vertices of the `m`-th lexicographic vertex pair.

use crate::mesh_error::MeshError;
use crate::topology::cell_type::CellType;
use crate::topology::mesh_topology::MeshTopology;

/// Orders every cell in place. Only tables that already exist are touched;
/// calling it twice is the same as calling it once.
pub fn order(topology: &mut MeshTopology, cell_type: CellType) -> Result<(), MeshError> {
    if !cell_type.is_simplex() {
        return Err(MeshError::UnsupportedOperation {
            op: "order",
            cell_type,
        });
    }
    let kernel = cell_type.kernel();
    let num_cells = topology.cell_vertices()?.len();
    for cell in 0..num_cells {
        kernel.order(topology, cell)?;
    }
    log::debug!("Ordered {num_cells} {}", cell_type.description(num_cells != 1));
    Ok(())
}

/// Checks the ordering convention on every existing table.
pub fn is_ordered(topology: &MeshTopology, cell_type: CellType) -> Result<bool, MeshError> {
    if !cell_type.is_simplex() {
        return Err(MeshError::UnsupportedOperation {
            op: "is ordered",
            cell_type,
        });
    }
    let tdim = topology.dim();
    for d0 in 1..=tdim {
        let Some(vertices) = topology.connectivity(d0, 0)? else {
            continue;
        };
        if !vertices.iter().all(|row| row.windows(2).all(|w| w[0] < w[1])) {
            return Ok(false);
        }
        let pattern_kernel = CellType::simplex(d0)?.kernel();
        for d1 in 1..d0 {
            let (Some(table), Some(sub_vertices)) =
                (topology.connectivity(d0, d1)?, topology.connectivity(d1, 0)?)
            else {
                continue;
            };
            let pattern = pattern_kernel.entity_pattern(d1)?;
            for (e0, subs) in table.iter().enumerate() {
                let owner = vertices.entities(e0);
                for (&sub, local) in subs.iter().zip(pattern) {
                    let actual = sub_vertices.entities(sub);
                    if actual.len() != local.len()
                        || !local.iter().all(|&k| actual.contains(&owner[k]))
                    {
                        return Ok(false);
                    }
                }
            }
        }
    }
    Ok(true)
}
