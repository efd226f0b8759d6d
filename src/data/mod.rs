//! Data attached to a mesh: vertex coordinates, per-entity values and the
//! numeric settings used by geometric queries.

pub mod geometry;
pub mod mesh_function;
pub mod options;

pub use geometry::MeshGeometry;
pub use mesh_function::MeshFunction;
pub use options::{DEFAULT_TOLERANCE, MeshOptions};
