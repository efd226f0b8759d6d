//! Point and entity search against the cells of a mesh.
//!
//! Mesh-level queries use the mesh's own cell tree. [`IntersectionOperator`]
//! searches the entities of any one dimension, optionally restricted to the
//! cells carrying a given label, and builds its own tree on first use.
//! Set-valued results are always sorted and free of duplicates.

use once_cell::sync::OnceCell;

use crate::data::mesh_function::MeshFunction;
use crate::geometry::bbox_tree::{BoundingBox, BoundingBoxTree};
use crate::geometry::kernel::KernelKind;
use crate::geometry::point::Point;
use crate::geometry::predicates::point_simplex_squared_distance;
use crate::mesh::Mesh;
use crate::mesh_error::MeshError;
use crate::topology::entity::MeshEntity;

fn sorted_unique(mut v: Vec<usize>) -> Vec<usize> {
    v.sort_unstable();
    v.dedup();
    v
}

fn entity_bbox(entity: &MeshEntity<'_>) -> Result<BoundingBox, MeshError> {
    let geometry = entity.mesh().geometry();
    BoundingBox::of_points(entity.vertices()?.iter().map(|&v| geometry.point(v)))
        .ok_or(MeshError::EmptyMesh("vertices"))
}

/// Whether `point` lies in the entity. Cells use their own containment
/// test; lower-dimensional entities the point-simplex distance.
fn entity_contains(entity: &MeshEntity<'_>, point: &Point) -> Result<bool, MeshError> {
    let mesh = entity.mesh();
    if entity.dim() == mesh.tdim() {
        return entity.contains(point);
    }
    let geometry = mesh.geometry();
    let vertices: Vec<Point> = entity.vertices()?.iter().map(|&v| geometry.point(v)).collect();
    let tol = mesh.options().tolerance;
    Ok(point_simplex_squared_distance(point, &vertices) <= tol * tol)
}

/// Cells containing `point`.
pub fn intersected_cells(mesh: &Mesh, point: &Point) -> Result<Vec<usize>, MeshError> {
    let cells = mesh.cell_tree()?.compute_entity_collisions(point, mesh)?;
    Ok(sorted_unique(cells))
}

/// Cells containing at least one of `points`.
pub fn intersected_cells_of_points(mesh: &Mesh, points: &[Point]) -> Result<Vec<usize>, MeshError> {
    let tree = mesh.cell_tree()?;
    let mut cells = Vec::new();
    for p in points {
        cells.extend(tree.compute_entity_collisions(p, mesh)?);
    }
    Ok(sorted_unique(cells))
}

fn cells_meeting_entity(
    mesh: &Mesh,
    tree: &BoundingBoxTree,
    entity: &MeshEntity<'_>,
    out: &mut Vec<usize>,
) -> Result<(), MeshError> {
    let kernel = mesh.options().kernel.kernel();
    let tdim = mesh.tdim();
    for c in tree.compute_bbox_collisions(&entity_bbox(entity)?) {
        if kernel.do_intersect(&MeshEntity::new_unchecked(mesh, tdim, c), entity)? {
            out.push(c);
        }
    }
    Ok(())
}

/// Cells intersecting `entity`, which may belong to another mesh.
pub fn intersected_cells_of_entity(mesh: &Mesh, entity: &MeshEntity<'_>) -> Result<Vec<usize>, MeshError> {
    let mut cells = Vec::new();
    cells_meeting_entity(mesh, mesh.cell_tree()?, entity, &mut cells)?;
    Ok(sorted_unique(cells))
}

pub fn intersected_cells_of_entities(
    mesh: &Mesh,
    entities: &[MeshEntity<'_>],
) -> Result<Vec<usize>, MeshError> {
    let tree = mesh.cell_tree()?;
    let mut cells = Vec::new();
    for e in entities {
        cells_meeting_entity(mesh, tree, e, &mut cells)?;
    }
    Ok(sorted_unique(cells))
}

/// Cells of `mesh` intersecting some cell of `other`.
pub fn intersected_cells_of_mesh(mesh: &Mesh, other: &Mesh) -> Result<Vec<usize>, MeshError> {
    let kernel = mesh.options().kernel.kernel();
    let (tdim, odim) = (mesh.tdim(), other.tdim());
    let pairs = mesh.cell_tree()?.compute_tree_collisions(other.cell_tree()?);
    let mut cells = Vec::new();
    for (mine, theirs) in pairs {
        let a = MeshEntity::new_unchecked(mesh, tdim, mine);
        let b = MeshEntity::new_unchecked(other, odim, theirs);
        if kernel.do_intersect(&a, &b)? {
            cells.push(mine);
        }
    }
    Ok(sorted_unique(cells))
}

/// Some cell containing `point`, if any.
pub fn intersected_cell(mesh: &Mesh, point: &Point) -> Result<Option<usize>, MeshError> {
    mesh.cell_tree()?.compute_first_entity_collision(point, mesh)
}

/// Closest cell; the lowest index wins ties.
pub fn closest_cell(mesh: &Mesh, point: &Point) -> Result<usize, MeshError> {
    mesh.cell_tree()?
        .compute_closest_entity(point, mesh)
        .map(|(cell, _)| cell)
}

/// Closest point on the closest cell.
pub fn closest_point(mesh: &Mesh, point: &Point) -> Result<Point, MeshError> {
    closest_point_and_cell(mesh, point).map(|(p, _)| p)
}

pub fn closest_point_and_cell(mesh: &Mesh, point: &Point) -> Result<(Point, usize), MeshError> {
    let cell = closest_cell(mesh, point)?;
    let p = mesh.cell(cell)?.closest_point(point)?;
    Ok((p, cell))
}

/// Distance from `point` to the mesh; 0 for points inside a cell.
pub fn distance(mesh: &Mesh, point: &Point) -> Result<f64, MeshError> {
    mesh.cell_tree()?
        .compute_closest_entity(point, mesh)
        .map(|(_, d)| d)
}

/// Search structure over the entities of one dimension of a mesh.
///
/// ```
/// use mesh_topology::algs::generation::unit_square;
/// use mesh_topology::algs::intersection::IntersectionOperator;
/// use mesh_topology::geometry::point::Point;
///
/// let mesh = unit_square(4, 4)?;
/// let op = IntersectionOperator::new(&mesh, 1)?;
/// // the corner lies on two sides and one diagonal
/// assert_eq!(op.all_intersected_entities_of_point(&Point::new(0.0, 0.0, 0.0))?.len(), 3);
/// # Ok::<(), mesh_topology::mesh_error::MeshError>(())
/// ```
#[derive(Debug)]
pub struct IntersectionOperator<'a> {
    mesh: &'a Mesh,
    dim: usize,
    labels: Option<(&'a MeshFunction<usize>, usize)>,
    kernel: KernelKind,
    tree: OnceCell<BoundingBoxTree>,
}

impl<'a> IntersectionOperator<'a> {
    /// Operator over all entities of dimension `dim`, using the mesh's
    /// configured kernel.
    pub fn new(mesh: &'a Mesh, dim: usize) -> Result<Self, MeshError> {
        mesh.size(dim)?;
        Ok(Self {
            mesh,
            dim,
            labels: None,
            kernel: mesh.options().kernel,
            tree: OnceCell::new(),
        })
    }

    /// Operator over the entities whose `labels` value equals `label`.
    pub fn with_labels(
        mesh: &'a Mesh,
        labels: &'a MeshFunction<usize>,
        label: usize,
    ) -> Result<Self, MeshError> {
        let dim = labels.dim();
        let size = mesh.size(dim)?;
        if labels.len() != size {
            return Err(MeshError::EntityOutOfRange {
                dim,
                index: labels.len(),
                size,
            });
        }
        let mut op = Self::new(mesh, dim)?;
        op.labels = Some((labels, label));
        Ok(op)
    }

    /// Switches the intersection kernel; the tree is kept.
    pub fn set_kernel(&mut self, kernel: KernelKind) {
        self.kernel = kernel;
    }

    pub fn kernel(&self) -> KernelKind {
        self.kernel
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn mesh(&self) -> &'a Mesh {
        self.mesh
    }

    /// Drops the search tree; the next query rebuilds it.
    pub fn clear(&mut self) {
        self.tree.take();
    }

    fn tree(&self) -> Result<&BoundingBoxTree, MeshError> {
        self.tree.get_or_try_init(|| match self.labels {
            None => BoundingBoxTree::build(self.mesh, self.dim),
            Some((labels, label)) => BoundingBoxTree::build_filtered(self.mesh, self.dim, |e| {
                labels.get(e) == Some(&label)
            }),
        })
    }

    #[inline]
    fn entity(&self, index: usize) -> MeshEntity<'a> {
        MeshEntity::new_unchecked(self.mesh, self.dim, index)
    }

    /// Entities containing `point`.
    pub fn all_intersected_entities_of_point(&self, point: &Point) -> Result<Vec<usize>, MeshError> {
        let mut out = Vec::new();
        for e in self.tree()?.compute_collisions(point) {
            if entity_contains(&self.entity(e), point)? {
                out.push(e);
            }
        }
        Ok(sorted_unique(out))
    }

    /// Entities containing at least one of `points`.
    pub fn all_intersected_entities_of_points(&self, points: &[Point]) -> Result<Vec<usize>, MeshError> {
        let mut out = Vec::new();
        for p in points {
            out.extend(self.all_intersected_entities_of_point(p)?);
        }
        Ok(sorted_unique(out))
    }

    /// Entities intersecting `entity` (of this or another mesh).
    pub fn all_intersected_entities(&self, entity: &MeshEntity<'_>) -> Result<Vec<usize>, MeshError> {
        let kernel = self.kernel.kernel();
        let mut out = Vec::new();
        for e in self.tree()?.compute_bbox_collisions(&entity_bbox(entity)?) {
            if kernel.do_intersect(&self.entity(e), entity)? {
                out.push(e);
            }
        }
        Ok(sorted_unique(out))
    }

    /// Entities intersecting any of `entities`.
    pub fn all_intersected_entities_of_entities(
        &self,
        entities: &[MeshEntity<'_>],
    ) -> Result<Vec<usize>, MeshError> {
        let mut out = Vec::new();
        for e in entities {
            out.extend(self.all_intersected_entities(e)?);
        }
        Ok(sorted_unique(out))
    }

    /// Entities intersecting some cell of `other`.
    pub fn all_intersected_entities_of_mesh(&self, other: &Mesh) -> Result<Vec<usize>, MeshError> {
        let kernel = self.kernel.kernel();
        let odim = other.tdim();
        let mut out = Vec::new();
        for (mine, theirs) in self.tree()?.compute_tree_collisions(other.cell_tree()?) {
            let b = MeshEntity::new_unchecked(other, odim, theirs);
            if kernel.do_intersect(&self.entity(mine), &b)? {
                out.push(mine);
            }
        }
        Ok(sorted_unique(out))
    }

    /// Some entity containing `point`.
    pub fn first_intersected_entity(&self, point: &Point) -> Result<Option<usize>, MeshError> {
        if self.dim == self.mesh.tdim() {
            return self.tree()?.compute_first_entity_collision(point, self.mesh);
        }
        Ok(self.all_intersected_entities_of_point(point)?.first().copied())
    }

    /// Closest cell to `point`. Only for operators over cells.
    pub fn closest_entity(&self, point: &Point) -> Result<usize, MeshError> {
        self.closest_entity_and_distance(point).map(|(e, _)| e)
    }

    pub fn closest_entity_and_distance(&self, point: &Point) -> Result<(usize, f64), MeshError> {
        if self.dim != self.mesh.tdim() {
            return Err(MeshError::UnsupportedOperation {
                op: "closest entity of non-cell dimension",
                cell_type: self.mesh.cell_type(),
            });
        }
        self.tree()?.compute_closest_entity(point, self.mesh)
    }

    /// Closest point on the closest cell.
    pub fn closest_point(&self, point: &Point) -> Result<Point, MeshError> {
        let cell = self.closest_entity(point)?;
        self.entity(cell).closest_point(point)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algs::generation::{unit_interval, unit_square};

    #[test]
    fn interval_point_queries() {
        let mesh = unit_interval(4).unwrap();
        assert_eq!(mesh.intersected_cells(&Point::new(0.5, 0.0, 0.0)).unwrap(), vec![1, 2]);
        assert_eq!(mesh.intersected_cells(&Point::new(0.6, 0.0, 0.0)).unwrap(), vec![2]);
        assert!(mesh.intersected_cells(&Point::new(1.5, 0.0, 0.0)).unwrap().is_empty());
        assert_eq!(mesh.closest_cell(&Point::new(1.5, 0.0, 0.0)).unwrap(), 3);
        assert!((mesh.distance(&Point::new(-0.25, 0.0, 0.0)).unwrap() - 0.25).abs() < 1e-15);
        assert_eq!(
            mesh.closest_point(&Point::new(2.0, 0.0, 0.0)).unwrap(),
            Point::new(1.0, 0.0, 0.0)
        );
    }

    #[test]
    fn labelled_operator_skips_other_cells() {
        let mesh = unit_square(2, 2).unwrap();
        let mut labels = MeshFunction::new(&mesh, 2, 0usize).unwrap();
        for c in 4..8 {
            labels.set(c, 1).unwrap();
        }
        let op = IntersectionOperator::with_labels(&mesh, &labels, 1).unwrap();
        // lower half is unlabelled
        assert!(op.all_intersected_entities_of_point(&Point::new(0.2, 0.1, 0.0)).unwrap().is_empty());
        assert_eq!(op.closest_entity(&Point::new(0.2, 0.1, 0.0)).unwrap(), 4);
        let all = IntersectionOperator::new(&mesh, 2).unwrap();
        assert_eq!(all.first_intersected_entity(&Point::new(0.2, 0.1, 0.0)).unwrap(), Some(0));
    }

    #[test]
    fn mesh_against_mesh() {
        let coarse = unit_square(1, 1).unwrap();
        let mut fine = unit_square(4, 4).unwrap();
        fine.translate(&Point::new(0.9, 0.9, 0.0));
        // only the lower-left cells of the shifted mesh reach the unit square
        let hits = IntersectionOperator::new(&fine, 2)
            .unwrap()
            .all_intersected_entities_of_mesh(&coarse)
            .unwrap();
        assert_eq!(hits, vec![0, 1]);
        assert_eq!(coarse.intersected_cells_of_mesh(&fine).unwrap(), vec![0, 1]);
    }
}
