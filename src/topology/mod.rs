//! Mesh combinatorics: cell types, incidence tables and entity handles.
//!
//! - [`MeshTopology`] stores per-dimension entity counts and the `(d0, d1)`
//!   incidence tables, each computed at most once.
//! - [`compute`] holds the entity-numbering and connectivity algorithms.
//! - [`ordering`] applies and checks the local simplex ordering convention.
//! - [`MeshEntity`] and [`EntityIter`] are the borrowed handles used to walk a
//!   mesh.

pub mod cache;
pub mod cell_type;
pub mod compute;
pub mod connectivity;
pub mod entity;
pub mod mesh_topology;
pub mod ordering;

pub use cache::InvalidateCache;
pub use cell_type::CellType;
pub use connectivity::Connectivity;
pub use entity::{EntityIter, MeshEntity};
pub use mesh_topology::MeshTopology;
