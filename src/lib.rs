#![cfg_attr(docsrs, feature(doc_cfg))]
//! # mesh-topology
//!
//! mesh-topology is the topology and geometry kernel of an unstructured
//! simplicial mesh for finite-element codes. It stores vertex coordinates and
//! cell-to-vertex incidence, derives every other entity and incidence
//! relation on demand, and answers geometric queries over cells.
//!
//! ## Features
//! - Lazily computed connectivity `(d0, d1)` between entities of any two
//!   topological dimensions, each table built at most once
//! - Per-cell-type kernels for intervals, triangles and tetrahedra: volume,
//!   diameter, inradius, normals, facet areas and point containment
//! - UFC-style local ordering of simplex meshes
//! - Exterior boundary extraction with outward-oriented facets and maps back
//!   to the parent mesh
//! - Bounding-box trees for point/entity/mesh intersection and closest-cell
//!   queries, with an interchangeable intersection kernel
//! - Structured generators for intervals, rectangles and boxes
//! - Optional Rayon-parallel batch queries behind the `rayon` feature
//!
//! ## Laziness and threads
//!
//! A [`Mesh`](mesh::Mesh) is `Send + Sync`. Derived tables and the spatial
//! index are filled in through shared references; concurrent readers that
//! race on the same table block until the single computation finishes. Any
//! mutation goes through `&mut Mesh` and invalidates the coordinate-derived
//! caches.
//!
//! ## Usage
//!
//! ```
//! use mesh_topology::prelude::*;
//!
//! let mesh = unit_square(2, 2)?;
//! assert_eq!(mesh.num_edges()?, 16);
//! let p = Point::new(0.25, -0.5, 0.0);
//! assert_eq!(mesh.closest_cell(&p)?, 0);
//! assert!((mesh.distance(&p)? - 0.5).abs() < 1e-14);
//! # Ok::<(), MeshError>(())
//! ```

pub mod algs;
pub mod data;
pub mod geometry;
pub mod mesh;
pub mod mesh_editor;
pub mod mesh_error;
pub mod topology;

/// A convenient prelude to import the most-used traits & types:
pub mod prelude {
    pub use crate::algs::boundary::{BoundaryMesh, BoundaryType};
    pub use crate::algs::generation::{
        Diagonal, box_mesh, interval, rectangle, unit_cube, unit_interval, unit_square,
    };
    pub use crate::algs::intersection::IntersectionOperator;
    pub use crate::algs::quality::QualitySummary;
    pub use crate::data::geometry::MeshGeometry;
    pub use crate::data::mesh_function::MeshFunction;
    pub use crate::data::options::MeshOptions;
    pub use crate::geometry::bbox_tree::BoundingBoxTree;
    pub use crate::geometry::kernel::KernelKind;
    pub use crate::geometry::point::Point;
    pub use crate::mesh::Mesh;
    pub use crate::mesh_editor::MeshEditor;
    pub use crate::mesh_error::MeshError;
    pub use crate::topology::cache::InvalidateCache;
    pub use crate::topology::cell_type::CellType;
    pub use crate::topology::entity::{EntityIter, MeshEntity};
}
