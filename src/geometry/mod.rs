//! Geometry: points, per-cell-type formulas, spatial indexing and
//! intersection predicates.

pub mod bbox_tree;
pub mod cells;
pub mod kernel;
pub mod point;
pub mod predicates;

pub use bbox_tree::{BoundingBox, BoundingBoxTree};
pub use cells::CellKernel;
pub use kernel::{IntersectionKernel, KernelKind};
pub use point::Point;
