//! Algorithms built on top of [`Mesh`](crate::mesh::Mesh).

pub mod boundary;
pub mod generation;
pub mod intersection;
pub mod quality;
pub mod transform;

pub use boundary::{BoundaryMesh, BoundaryType};
pub use generation::{Diagonal, box_mesh, interval, rectangle, unit_cube, unit_interval, unit_square};
pub use intersection::IntersectionOperator;
pub use quality::QualitySummary;
pub use transform::CoordinateTransform;
