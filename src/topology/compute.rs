//! Lazy computation of mesh entities and connectivity.
//!
//! The functions here assume the caller holds [`MeshTopology::compute_guard`];
//! they never take the lock themselves since `parking_lot::Mutex` is not
//! reentrant and [`compute_connectivity`] recurses.

use hashbrown::HashMap;
use hashbrown::hash_map::Entry;

use crate::mesh_error::MeshError;
use crate::topology::cell_type::CellType;
use crate::topology::connectivity::Connectivity;
use crate::topology::mesh_topology::MeshTopology;

/// Maximum number of vertices of a sub-entity that is ever numbered
/// (a hexahedron face).
const MAX_ENTITY_VERTICES: usize = 4;

type EntityKey = [usize; MAX_ENTITY_VERTICES];

fn entity_key(vertices: &[usize]) -> EntityKey {
    let mut key = [usize::MAX; MAX_ENTITY_VERTICES];
    key[..vertices.len()].copy_from_slice(vertices);
    key[..vertices.len()].sort_unstable();
    key
}

/// Computes the entities of dimension `d` and returns how many there are.
///
/// Sub-entities of every cell are generated from the cell type's local
/// pattern and identified by their sorted vertex tuple; new indices are handed
/// out in first-encounter order. The same pass records `(d, 0)` and
/// `(tdim, d)`.
pub fn compute_entities(
    topology: &MeshTopology,
    cell_type: CellType,
    d: usize,
) -> Result<usize, MeshError> {
    let tdim = topology.dim();
    if d > tdim {
        return Err(MeshError::InvalidDimension { dim: d, max: tdim });
    }
    if topology.has_entities(d) {
        return topology.size(d);
    }
    let cells = topology.cell_vertices()?;

    let kernel = cell_type.kernel();
    let per_cell = kernel.num_entities(d)?;
    let width = kernel.num_vertices(d)?;

    let mut numbering: HashMap<EntityKey, usize> = HashMap::with_capacity(cells.len() * per_cell);
    let mut entity_vertices: Vec<usize> = Vec::new();
    let mut cell_entities: Vec<usize> = Vec::with_capacity(cells.len() * per_cell);
    let mut local = Vec::with_capacity(per_cell * width);

    for cell in cells.iter() {
        local.clear();
        kernel.create_entities(cell, d, &mut local)?;
        for sub in local.chunks_exact(width) {
            let next = numbering.len();
            let index = match numbering.entry(entity_key(sub)) {
                Entry::Occupied(e) => *e.get(),
                Entry::Vacant(e) => {
                    e.insert(next);
                    entity_vertices.extend_from_slice(sub);
                    next
                }
            };
            cell_entities.push(index);
        }
    }

    let num_entities = numbering.len();
    topology.set_connectivity(d, 0, Connectivity::from_fixed_width(width, entity_vertices))?;
    topology.set_connectivity(tdim, d, Connectivity::from_fixed_width(per_cell, cell_entities))?;
    topology.set_size(d, num_entities)?;
    log::debug!(
        "Computed {} {} of dimension {d}",
        num_entities,
        cell_type.entity_type(d)?.description(num_entities != 1)
    );
    Ok(num_entities)
}

/// Computes connectivity `(d0, d1)`, creating entities and intermediate
/// tables as needed. A no-op when the table already exists.
pub fn compute_connectivity(
    topology: &MeshTopology,
    cell_type: CellType,
    d0: usize,
    d1: usize,
) -> Result<(), MeshError> {
    let tdim = topology.dim();
    if d0 > tdim || d1 > tdim {
        return Err(MeshError::InvalidDimensionPair { d0, d1 });
    }
    if topology.connectivity(d0, d1)?.is_some() {
        return Ok(());
    }

    compute_entities(topology, cell_type, d0)?;
    compute_entities(topology, cell_type, d1)?;
    // entity creation may have produced the table as a side effect
    if topology.connectivity(d0, d1)?.is_some() {
        return Ok(());
    }

    if d0 == d1 {
        topology.set_connectivity(d0, d1, Connectivity::identity(topology.size(d0)?))?;
    } else if d0 < d1 {
        compute_connectivity(topology, cell_type, d1, d0)?;
        let reverse = topology
            .connectivity(d1, d0)?
            .ok_or(MeshError::InvalidDimensionPair { d0: d1, d1: d0 })?;
        let table = reverse.transpose(topology.size(d0)?);
        topology.set_connectivity(d0, d1, table)?;
    } else {
        compute_from_intersection(topology, cell_type, d0, d1)?;
    }

    log::debug!("Computed connectivity {d0} -> {d1}");
    Ok(())
}

/// `(d0, d1)` for `d0 > d1`: `e1` is incident to `e0` when every vertex of
/// `e1` is a vertex of `e0`. Candidates are visited through the vertices of
/// `e0`, so each row lists its entities in order of discovery.
fn compute_from_intersection(
    topology: &MeshTopology,
    cell_type: CellType,
    d0: usize,
    d1: usize,
) -> Result<(), MeshError> {
    compute_connectivity(topology, cell_type, 0, d1)?;
    let missing = MeshError::InvalidDimensionPair { d0, d1 };
    let v_of_e0 = topology.connectivity(d0, 0)?.ok_or(missing.clone())?;
    let e1_of_v = topology.connectivity(0, d1)?.ok_or(missing.clone())?;
    let v_of_e1 = topology.connectivity(d1, 0)?.ok_or(missing)?;

    let mut rows: Vec<Vec<usize>> = Vec::with_capacity(v_of_e0.len());
    for vertices in v_of_e0.iter() {
        let mut row: Vec<usize> = Vec::new();
        for &v in vertices {
            for &e1 in e1_of_v.entities(v) {
                if row.contains(&e1) {
                    continue;
                }
                if v_of_e1.entities(e1).iter().all(|w| vertices.contains(w)) {
                    row.push(e1);
                }
            }
        }
        rows.push(row);
    }
    topology.set_connectivity(d0, d1, Connectivity::from_lists(rows))
}
