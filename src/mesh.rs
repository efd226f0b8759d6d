//! The [`Mesh`] aggregate: topology, vertex coordinates, cell type and the
//! caches derived from them.
//!
//! Counts and incidence tables are computed on first request through `&self`
//! methods, so handles borrowed from a mesh stay valid while new tables are
//! added. Anything derived from coordinates (the cell search tree and cell
//! orientations) is dropped by every `&mut self` method that moves vertices.

use std::fmt;
use std::hash::{DefaultHasher, Hash, Hasher};

use once_cell::sync::OnceCell;

use crate::algs::boundary::{BoundaryMesh, BoundaryType};
use crate::algs::intersection;
use crate::algs::quality::{self, QualitySummary};
use crate::algs::transform::{self, CoordinateTransform};
use crate::data::geometry::MeshGeometry;
use crate::data::options::MeshOptions;
use crate::geometry::bbox_tree::BoundingBoxTree;
use crate::geometry::cells::CellKernel;
use crate::geometry::point::Point;
use crate::mesh_error::MeshError;
use crate::topology::cache::InvalidateCache;
use crate::topology::cell_type::CellType;
use crate::topology::compute::{compute_connectivity, compute_entities};
use crate::topology::connectivity::Connectivity;
use crate::topology::entity::{EntityIter, MeshEntity};
use crate::topology::mesh_topology::MeshTopology;
use crate::topology::ordering;

/// Unstructured mesh of a single cell type.
#[derive(Clone, Debug)]
pub struct Mesh {
    topology: MeshTopology,
    geometry: MeshGeometry,
    cell_type: CellType,
    options: MeshOptions,
    cell_tree: OnceCell<BoundingBoxTree>,
    cell_orientations: Vec<usize>,
}

impl Mesh {
    /// Assembles a mesh from checked parts. Used by the mesh editor.
    pub(crate) fn from_parts(cell_type: CellType, geometry: MeshGeometry, cells: Connectivity) -> Self {
        let mut topology = MeshTopology::new(cell_type.dim());
        topology.init_mesh(geometry.len(), cells);
        Self {
            topology,
            geometry,
            cell_type,
            options: MeshOptions::default(),
            cell_tree: OnceCell::new(),
            cell_orientations: Vec::new(),
        }
    }

    // --- accessors ---

    #[inline]
    pub fn topology(&self) -> &MeshTopology {
        &self.topology
    }

    #[inline]
    pub fn geometry(&self) -> &MeshGeometry {
        &self.geometry
    }

    #[inline]
    pub fn cell_type(&self) -> CellType {
        self.cell_type
    }

    /// Formulas for the cells of this mesh.
    #[inline]
    pub fn kernel(&self) -> &'static dyn CellKernel {
        self.cell_type.kernel()
    }

    #[inline]
    pub fn options(&self) -> &MeshOptions {
        &self.options
    }

    /// Replaces the options after validating them.
    pub fn set_options(&mut self, options: MeshOptions) -> Result<(), MeshError> {
        options.validate()?;
        self.options = options;
        Ok(())
    }

    /// Topological dimension.
    #[inline]
    pub fn tdim(&self) -> usize {
        self.topology.dim()
    }

    /// Geometric (embedding) dimension.
    #[inline]
    pub fn gdim(&self) -> usize {
        self.geometry.dim()
    }

    /// Flat vertex coordinates, `gdim` per vertex.
    #[inline]
    pub fn coordinates(&self) -> &[f64] {
        self.geometry.coordinates()
    }

    /// Mutable coordinates; drops every coordinate-derived cache.
    pub fn coordinates_mut(&mut self) -> &mut [f64] {
        self.invalidate_cache();
        self.geometry.coordinates_mut()
    }

    pub(crate) fn geometry_mut(&mut self) -> &mut MeshGeometry {
        self.invalidate_cache();
        &mut self.geometry
    }

    /// Raw cell-vertex table.
    pub fn cell_vertices(&self) -> Result<&Connectivity, MeshError> {
        self.topology.cell_vertices()
    }

    // --- counts ---

    pub fn num_vertices(&self) -> usize {
        self.topology.size(0).unwrap_or_default()
    }

    pub fn num_cells(&self) -> usize {
        self.topology.size(self.tdim()).unwrap_or_default()
    }

    pub fn num_edges(&self) -> Result<usize, MeshError> {
        self.size(1)
    }

    pub fn num_faces(&self) -> Result<usize, MeshError> {
        self.size(2)
    }

    pub fn num_facets(&self) -> Result<usize, MeshError> {
        self.size(self.facet_dim()?)
    }

    pub fn num_entities(&self, d: usize) -> Result<usize, MeshError> {
        self.size(d)
    }

    /// Number of entities of dimension `d`, computing them if needed.
    pub fn size(&self, d: usize) -> Result<usize, MeshError> {
        if self.topology.has_entities(d) {
            return self.topology.size(d);
        }
        self.init(d)
    }

    fn facet_dim(&self) -> Result<usize, MeshError> {
        self.tdim().checked_sub(1).ok_or(MeshError::UnsupportedOperation {
            op: "facets",
            cell_type: self.cell_type,
        })
    }

    // --- lazy initialization ---

    /// Computes the entities of dimension `d`; returns their number.
    pub fn init(&self, d: usize) -> Result<usize, MeshError> {
        let n = self.topology.size(d)?;
        if self.topology.has_entities(d) {
            return Ok(n);
        }
        let _guard = self.topology.compute_guard();
        compute_entities(&self.topology, self.cell_type, d)
    }

    /// Computes the `(d0, d1)` table.
    pub fn init_connectivity(&self, d0: usize, d1: usize) -> Result<(), MeshError> {
        let tdim = self.tdim();
        if d0 > tdim || d1 > tdim {
            return Err(MeshError::InvalidDimensionPair { d0, d1 });
        }
        if self.topology.connectivity(d0, d1)?.is_some() {
            return Ok(());
        }
        let _guard = self.topology.compute_guard();
        compute_connectivity(&self.topology, self.cell_type, d0, d1)
    }

    /// Computes every entity and every table.
    pub fn init_all(&self) -> Result<(), MeshError> {
        let tdim = self.tdim();
        for d in 0..=tdim {
            self.init(d)?;
        }
        for d0 in 0..=tdim {
            for d1 in 0..=tdim {
                self.init_connectivity(d0, d1)?;
            }
        }
        Ok(())
    }

    /// The `(d0, d1)` table, computing it if needed.
    pub fn connectivity(&self, d0: usize, d1: usize) -> Result<&Connectivity, MeshError> {
        self.init_connectivity(d0, d1)?;
        self.topology
            .connectivity(d0, d1)?
            .ok_or(MeshError::InvalidDimensionPair { d0, d1 })
    }

    /// Drops all topology and geometry, leaving an empty mesh of the same
    /// type and dimensions.
    pub fn clear(&mut self) {
        self.topology.clear();
        self.geometry = MeshGeometry::new(self.gdim(), 0).unwrap_or_default();
        self.invalidate_cache();
    }

    /// Drops derived tables, keeping vertices and cells.
    pub fn clean(&mut self) {
        self.topology.clean();
    }

    /// Applies the local ordering convention to every cell.
    pub fn order(&mut self) -> Result<(), MeshError> {
        ordering::order(&mut self.topology, self.cell_type)?;
        // vertex order decides the sign of cell normals
        self.cell_orientations.clear();
        Ok(())
    }

    pub fn is_ordered(&self) -> Result<bool, MeshError> {
        ordering::is_ordered(&self.topology, self.cell_type)
    }

    // --- iteration ---

    /// All entities of dimension `d` in index order.
    pub fn entities(&self, d: usize) -> Result<EntityIter<'_>, MeshError> {
        let n = self.size(d)?;
        Ok(EntityIter::all(self, d, n))
    }

    pub fn cells(&self) -> Result<EntityIter<'_>, MeshError> {
        self.entities(self.tdim())
    }

    pub fn facets(&self) -> Result<EntityIter<'_>, MeshError> {
        self.entities(self.facet_dim()?)
    }

    pub fn edges(&self) -> Result<EntityIter<'_>, MeshError> {
        self.entities(1)
    }

    pub fn vertices(&self) -> Result<EntityIter<'_>, MeshError> {
        self.entities(0)
    }

    pub fn entity(&self, d: usize, index: usize) -> Result<MeshEntity<'_>, MeshError> {
        MeshEntity::new(self, d, index)
    }

    pub fn cell(&self, index: usize) -> Result<MeshEntity<'_>, MeshError> {
        MeshEntity::new(self, self.tdim(), index)
    }

    // --- quality ---

    /// Diameter, inradius and radius-ratio extremes over all cells.
    pub fn quality(&self) -> Result<QualitySummary, MeshError> {
        quality::quality_summary(self)
    }

    /// Smallest cell diameter.
    pub fn hmin(&self) -> Result<f64, MeshError> {
        quality::cell_extrema(self, |c| c.diameter()).map(|(lo, _)| lo)
    }

    /// Largest cell diameter.
    pub fn hmax(&self) -> Result<f64, MeshError> {
        quality::cell_extrema(self, |c| c.diameter()).map(|(_, hi)| hi)
    }

    /// Smallest cell inradius.
    pub fn rmin(&self) -> Result<f64, MeshError> {
        quality::cell_extrema(self, |c| c.inradius()).map(|(lo, _)| lo)
    }

    /// Largest cell inradius.
    pub fn rmax(&self) -> Result<f64, MeshError> {
        quality::cell_extrema(self, |c| c.inradius()).map(|(_, hi)| hi)
    }

    pub fn radius_ratio_min(&self) -> Result<f64, MeshError> {
        quality::cell_extrema(self, |c| c.radius_ratio()).map(|(lo, _)| lo)
    }

    pub fn radius_ratio_max(&self) -> Result<f64, MeshError> {
        quality::cell_extrema(self, |c| c.radius_ratio()).map(|(_, hi)| hi)
    }

    // --- deformation ---

    /// Moves every vertex by `offset`.
    pub fn translate(&mut self, offset: &Point) {
        transform::translate(self, offset);
    }

    /// Rotates the mesh by `angle` degrees about coordinate `axis` through
    /// the vertex centroid.
    pub fn rotate(&mut self, angle: f64, axis: usize) -> Result<(), MeshError> {
        let center = transform::centroid(self)?;
        self.rotate_about(angle, axis, &center)
    }

    /// Rotates the mesh by `angle` degrees about coordinate `axis` through
    /// `center`.
    pub fn rotate_about(&mut self, angle: f64, axis: usize, center: &Point) -> Result<(), MeshError> {
        transform::rotate(self, angle, axis, center)
    }

    /// Adds `displacement` (flat, `gdim` values per vertex) to the
    /// coordinates.
    pub fn move_vertices(&mut self, displacement: &[f64]) -> Result<(), MeshError> {
        transform::transform_mesh(self, CoordinateTransform::Displacement(displacement))
    }

    /// Laplacian smoothing of interior vertices.
    pub fn smooth(&mut self, iterations: usize) -> Result<(), MeshError> {
        transform::smooth(self, iterations)
    }

    // --- orientation ---

    /// Per-cell orientation flags, empty until
    /// [`init_cell_orientations`](Self::init_cell_orientations) is called.
    pub fn cell_orientations(&self) -> &[usize] {
        &self.cell_orientations
    }

    /// Records for every cell whether its normal points against
    /// `global_normal` (1) or not (0). Only for manifolds of codimension 1.
    pub fn init_cell_orientations(&mut self, global_normal: &Point) -> Result<(), MeshError> {
        if self.tdim() + 1 != self.gdim() {
            return Err(MeshError::UnsupportedGeometricDimension {
                op: "cell orientation",
                cell_type: self.cell_type,
                gdim: self.gdim(),
            });
        }
        let mut orientations = Vec::with_capacity(self.num_cells());
        for cell in self.cells()? {
            let n = cell.cell_normal()?;
            if n.dot(global_normal) == 0.0 {
                log::warn!(
                    "Cell {} is orthogonal to the reference normal; marking it aligned",
                    cell.index()
                );
            }
            orientations.push(cell.orientation(global_normal)?);
        }
        self.cell_orientations = orientations;
        Ok(())
    }

    /// Hash of the cell type, cell-vertex table and coordinates.
    pub fn hash(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.cell_type.hash(&mut hasher);
        self.gdim().hash(&mut hasher);
        if let Ok(cells) = self.cell_vertices() {
            cells.indices().hash(&mut hasher);
        }
        for x in self.coordinates() {
            x.to_bits().hash(&mut hasher);
        }
        hasher.finish()
    }

    // --- spatial queries ---

    /// Search tree over the cells, built on first use.
    pub fn cell_tree(&self) -> Result<&BoundingBoxTree, MeshError> {
        self.cell_tree
            .get_or_try_init(|| BoundingBoxTree::build(self, self.tdim()))
    }

    /// Cells containing `point`, sorted.
    pub fn intersected_cells(&self, point: &Point) -> Result<Vec<usize>, MeshError> {
        intersection::intersected_cells(self, point)
    }

    /// Cells containing any of `points`, sorted and unique.
    pub fn intersected_cells_of_points(&self, points: &[Point]) -> Result<Vec<usize>, MeshError> {
        intersection::intersected_cells_of_points(self, points)
    }

    /// Cells intersecting an entity of this or another mesh.
    pub fn intersected_cells_of_entity(&self, entity: &MeshEntity<'_>) -> Result<Vec<usize>, MeshError> {
        intersection::intersected_cells_of_entity(self, entity)
    }

    pub fn intersected_cells_of_entities(
        &self,
        entities: &[MeshEntity<'_>],
    ) -> Result<Vec<usize>, MeshError> {
        intersection::intersected_cells_of_entities(self, entities)
    }

    /// Cells intersecting any cell of `other`.
    pub fn intersected_cells_of_mesh(&self, other: &Mesh) -> Result<Vec<usize>, MeshError> {
        intersection::intersected_cells_of_mesh(self, other)
    }

    /// Some cell containing `point`.
    pub fn intersected_cell(&self, point: &Point) -> Result<Option<usize>, MeshError> {
        intersection::intersected_cell(self, point)
    }

    /// Cell closest to `point`, lowest index on ties.
    pub fn closest_cell(&self, point: &Point) -> Result<usize, MeshError> {
        intersection::closest_cell(self, point)
    }

    /// Point of the mesh closest to `point`.
    pub fn closest_point(&self, point: &Point) -> Result<Point, MeshError> {
        intersection::closest_point(self, point)
    }

    pub fn closest_point_and_cell(&self, point: &Point) -> Result<(Point, usize), MeshError> {
        intersection::closest_point_and_cell(self, point)
    }

    /// Distance from `point` to the mesh, 0 inside.
    pub fn distance(&self, point: &Point) -> Result<f64, MeshError> {
        intersection::distance(self, point)
    }

    /// [`closest_cell`](Self::closest_cell) for a batch of points, in
    /// parallel.
    #[cfg(feature = "rayon")]
    pub fn closest_cells_par(&self, points: &[Point]) -> Result<Vec<usize>, MeshError> {
        use rayon::prelude::*;
        // build once before fanning out
        self.cell_tree()?;
        points.par_iter().map(|p| self.closest_cell(p)).collect()
    }

    /// [`distance`](Self::distance) for a batch of points, in parallel.
    #[cfg(feature = "rayon")]
    pub fn distances_par(&self, points: &[Point]) -> Result<Vec<f64>, MeshError> {
        use rayon::prelude::*;
        self.cell_tree()?;
        points.par_iter().map(|p| self.distance(p)).collect()
    }

    // --- boundary ---

    /// Boundary of the mesh as a mesh of dimension `tdim - 1`.
    pub fn boundary(&self, kind: BoundaryType) -> Result<BoundaryMesh, MeshError> {
        BoundaryMesh::new(self, kind)
    }
}

impl InvalidateCache for Mesh {
    fn invalidate_cache(&mut self) {
        self.cell_tree.take();
        self.cell_orientations.clear();
    }
}

impl fmt::Display for Mesh {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ordered = matches!(self.is_ordered(), Ok(true));
        write!(
            f,
            "<Mesh of topological dimension {} ({}) with {} vertices and {} cells, {}>",
            self.tdim(),
            self.cell_type.description(true),
            self.num_vertices(),
            self.num_cells(),
            if ordered { "ordered" } else { "unordered" }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algs::generation::{unit_cube, unit_interval, unit_square};

    #[test]
    fn counts_are_lazy() {
        let mesh = unit_square(2, 2).unwrap();
        assert_eq!(mesh.num_vertices(), 9);
        assert_eq!(mesh.num_cells(), 8);
        assert_eq!(mesh.topology().size(1).unwrap(), 0);
        assert_eq!(mesh.num_edges().unwrap(), 16);
        assert_eq!(mesh.topology().size(1).unwrap(), 16);
        assert_eq!(mesh.num_facets().unwrap(), 16);
    }

    #[test]
    fn cube_entity_counts() {
        let mesh = unit_cube(1, 1, 1).unwrap();
        assert!(mesh.is_ordered().unwrap());
        mesh.init_all().unwrap();
        assert_eq!(mesh.num_vertices(), 8);
        assert_eq!(mesh.num_edges().unwrap(), 19);
        assert_eq!(mesh.num_faces().unwrap(), 18);
        assert_eq!(mesh.num_cells(), 6);
    }

    #[test]
    fn bad_dimensions_are_rejected() {
        let mesh = unit_interval(4).unwrap();
        assert!(matches!(mesh.init(2), Err(MeshError::InvalidDimension { dim: 2, max: 1 })));
        assert!(matches!(
            mesh.connectivity(0, 3),
            Err(MeshError::InvalidDimensionPair { d0: 0, d1: 3 })
        ));
        assert!(mesh.cell(4).is_err());
    }

    #[test]
    fn clean_keeps_cells() {
        let mut mesh = unit_square(1, 1).unwrap();
        mesh.init_all().unwrap();
        mesh.clean();
        assert_eq!(mesh.topology().size(1).unwrap(), 0);
        assert_eq!(mesh.num_cells(), 2);
        assert_eq!(mesh.num_edges().unwrap(), 5);
        mesh.clear();
        assert_eq!(mesh.num_vertices(), 0);
        assert!(mesh.cell_vertices().is_err());
    }

    #[test]
    fn mutation_drops_spatial_index() {
        let mut mesh = unit_square(2, 2).unwrap();
        assert_eq!(mesh.closest_cell(&Point::new(0.1, 0.05, 0.0)).unwrap(), 0);
        mesh.translate(&Point::new(10.0, 0.0, 0.0));
        assert!(mesh.cell_tree.get().is_none());
        assert!(mesh.intersected_cells(&Point::new(0.1, 0.05, 0.0)).unwrap().is_empty());
        assert_eq!(mesh.intersected_cell(&Point::new(10.1, 0.05, 0.0)).unwrap(), Some(0));
    }

    #[test]
    fn hash_tracks_coordinates() {
        let mut mesh = unit_square(1, 1).unwrap();
        let h0 = mesh.hash();
        assert_eq!(h0, unit_square(1, 1).unwrap().hash());
        mesh.translate(&Point::new(0.0, 1e-12, 0.0));
        assert_ne!(h0, mesh.hash());
    }

    #[test]
    fn display_summary() {
        let mesh = unit_square(1, 1).unwrap();
        assert_eq!(
            mesh.to_string(),
            "<Mesh of topological dimension 2 (triangles) with 4 vertices and 2 cells, ordered>"
        );
    }
}
