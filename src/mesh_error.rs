//! MeshError: Unified error type for mesh-topology public APIs
//!
//! Structural errors (bad dimensions, malformed cells, unsupported embedding
//! dimensions, non-manifold facets) abort the requesting operation and leave
//! every table that was already computed intact. Numerical degeneracies are
//! not errors: they are reported through sentinel values by the geometric
//! routines themselves.

use thiserror::Error;

use crate::topology::cell_type::CellType;

/// Unified error type for mesh-topology operations.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MeshError {
    /// A topological dimension larger than the mesh dimension was requested.
    #[error("Invalid topological dimension {dim} (mesh dimension is {max})")]
    InvalidDimension { dim: usize, max: usize },
    /// Connectivity between the two dimensions cannot be computed.
    #[error("Cannot compute connectivity {d0} -> {d1}")]
    InvalidDimensionPair { d0: usize, d1: usize },
    /// Entity index outside `0..size`.
    #[error("Entity index {index} out of range for dimension {dim} (size {size})")]
    EntityOutOfRange { dim: usize, index: usize, size: usize },
    /// A geometric routine received an entity of the wrong dimension.
    #[error("Expected an entity of dimension {expected}, got dimension {found}")]
    EntityDimension { expected: usize, found: usize },
    /// Cell was given the wrong number of vertices.
    #[error("Cell {cell} has {found} vertices, expected {expected}")]
    CellArity {
        cell: usize,
        expected: usize,
        found: usize,
    },
    /// Cell references a vertex that does not exist.
    #[error("Cell {cell} references vertex {vertex}, but the mesh has {num_vertices} vertices")]
    VertexOutOfRange {
        cell: usize,
        vertex: usize,
        num_vertices: usize,
    },
    /// A geometric formula is not available for this embedding dimension.
    #[error("{op} of {cell_type:?} is not defined for geometric dimension {gdim}")]
    UnsupportedGeometricDimension {
        op: &'static str,
        cell_type: CellType,
        gdim: usize,
    },
    /// The cell type does not implement the requested operation.
    #[error("{op} is not supported for {cell_type:?} cells")]
    UnsupportedOperation {
        op: &'static str,
        cell_type: CellType,
    },
    /// A facet is attached to zero or more than two cells.
    #[error("Facet {facet} is attached to {incident_cells} cells (expected 1 or 2)")]
    NonManifoldFacet { facet: usize, incident_cells: usize },
    /// Coordinate slice with the wrong number of components.
    #[error("Coordinate length mismatch: expected {expected}, found {found}")]
    CoordinateLength { expected: usize, found: usize },
    /// Mesh editor used out of order (add before init, close with holes, ...).
    #[error("Mesh editor: {0}")]
    EditorState(String),
    /// Operation requires at least one entity.
    #[error("Mesh has no {0}")]
    EmptyMesh(&'static str),
    /// Unknown or invalid configuration value supplied at an entry point.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}
