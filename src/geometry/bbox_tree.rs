//! Axis-aligned bounding box trees over mesh entities or point clouds.
//!
//! The tree is a balanced binary hierarchy built by recursive median splits
//! along the longest axis of each node's box. Nodes are stored in a flat
//! array with the root last; a leaf is marked by `child_0 == own index` and
//! stores the entity (or point) index in `child_1`. Queries walk the tree with
//! an explicit stack.

use once_cell::sync::OnceCell;

use crate::geometry::point::Point;
use crate::mesh::Mesh;
use crate::mesh_error::MeshError;
use crate::topology::entity::MeshEntity;

/// Relative slack used when testing a point against a box.
const BBOX_EPS: f64 = 1e-14;

/// Closed axis-aligned box in R^3.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox {
    pub min: Point,
    pub max: Point,
}

impl BoundingBox {
    /// Box of a single point.
    pub fn of_point(p: &Point) -> Self {
        Self { min: *p, max: *p }
    }

    /// Smallest box containing every point; `None` for an empty iterator.
    pub fn of_points<I: IntoIterator<Item = Point>>(points: I) -> Option<Self> {
        let mut it = points.into_iter();
        let first = Self::of_point(&it.next()?);
        Some(it.fold(first, |b, p| b.union(&Self::of_point(&p))))
    }

    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        let mut out = *self;
        for i in 0..3 {
            out.min.0[i] = out.min.0[i].min(other.min.0[i]);
            out.max.0[i] = out.max.0[i].max(other.max.0[i]);
        }
        out
    }

    /// Point-in-box test with a slack relative to the box extent.
    pub fn contains(&self, p: &Point) -> bool {
        (0..3).all(|i| {
            let eps = BBOX_EPS * (self.max[i] - self.min[i]);
            self.min[i] - eps <= p[i] && p[i] <= self.max[i] + eps
        })
    }

    pub fn overlaps(&self, other: &BoundingBox) -> bool {
        (0..3).all(|i| {
            let eps = BBOX_EPS * (self.max[i] - self.min[i]);
            self.min[i] - eps <= other.max[i] && other.min[i] <= self.max[i] + eps
        })
    }

    /// Squared distance from `p` to the box, 0 inside.
    pub fn squared_distance(&self, p: &Point) -> f64 {
        (0..3)
            .map(|i| {
                let d = (self.min[i] - p[i]).max(p[i] - self.max[i]).max(0.0);
                d * d
            })
            .sum()
    }

    /// Axis of largest extent.
    pub fn longest_axis(&self) -> usize {
        let extent = self.max - self.min;
        let mut axis = 0;
        for i in 1..3 {
            if extent[i] > extent[axis] {
                axis = i;
            }
        }
        axis
    }

    pub fn center(&self) -> Point {
        (self.min + self.max) * 0.5
    }
}

#[derive(Clone, Copy, Debug)]
struct Node {
    child_0: usize,
    child_1: usize,
}

/// What the leaves of a tree are.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LeafKind {
    /// Entities of the given topological dimension.
    Entities(usize),
    /// A point cloud.
    Points,
}

/// Bounding box tree; see the module docs for the layout.
#[derive(Clone, Debug)]
pub struct BoundingBoxTree {
    leaves: LeafKind,
    nodes: Vec<Node>,
    bboxes: Vec<BoundingBox>,
    // points of a point tree, indexed by point number
    points: Vec<Point>,
    // cell midpoints, used to seed closest-entity searches
    point_search_tree: OnceCell<Box<MidpointTree>>,
}

/// Point tree over entity midpoints; `entities[i]` owns point `i`.
#[derive(Clone, Debug)]
struct MidpointTree {
    tree: BoundingBoxTree,
    entities: Vec<usize>,
}

impl BoundingBoxTree {
    /// Builds a tree over all entities of dimension `dim`.
    pub fn build(mesh: &Mesh, dim: usize) -> Result<Self, MeshError> {
        Self::build_filtered(mesh, dim, |_| true)
    }

    /// Builds a tree over the entities of dimension `dim` accepted by `keep`.
    pub fn build_filtered<F>(mesh: &Mesh, dim: usize, keep: F) -> Result<Self, MeshError>
    where
        F: Fn(usize) -> bool,
    {
        let tdim = mesh.tdim();
        if dim > tdim {
            return Err(MeshError::InvalidDimension { dim, max: tdim });
        }
        let num_entities = mesh.size(dim)?;
        let geometry = mesh.geometry();
        let vertices = mesh.connectivity(dim, 0)?;

        let mut leaf_bboxes = Vec::with_capacity(num_entities);
        let mut partition = Vec::with_capacity(num_entities);
        for e in (0..num_entities).filter(|&e| keep(e)) {
            let points = vertices.entities(e).iter().map(|&v| geometry.point(v));
            if let Some(b) = BoundingBox::of_points(points) {
                partition.push(e);
                leaf_bboxes.push((e, b));
            }
        }
        // leaf boxes addressed by entity index
        let mut by_entity = vec![BoundingBox::of_point(&Point::default()); num_entities];
        for (e, b) in leaf_bboxes {
            by_entity[e] = b;
        }

        let mut tree = Self::empty(LeafKind::Entities(dim));
        if !partition.is_empty() {
            tree.build_bboxes(&by_entity, &mut partition);
        }
        log::info!(
            "Computed bounding box tree with {} nodes for {} entities",
            tree.nodes.len(),
            tree.num_leaves()
        );
        Ok(tree)
    }

    /// Builds a tree over a point cloud; leaf indices are positions in
    /// `points`.
    pub fn build_points(points: Vec<Point>) -> Self {
        let mut tree = Self::empty(LeafKind::Points);
        let mut partition: Vec<usize> = (0..points.len()).collect();
        if !partition.is_empty() {
            let boxes: Vec<BoundingBox> = points.iter().map(BoundingBox::of_point).collect();
            tree.build_bboxes(&boxes, &mut partition);
        }
        tree.points = points;
        log::info!(
            "Computed bounding box tree with {} nodes for {} points",
            tree.nodes.len(),
            tree.points.len()
        );
        tree
    }

    fn empty(leaves: LeafKind) -> Self {
        Self {
            leaves,
            nodes: Vec::new(),
            bboxes: Vec::new(),
            points: Vec::new(),
            point_search_tree: OnceCell::new(),
        }
    }

    /// Median split of `partition` along the longest axis, children first.
    /// Returns the index of the node covering `partition`.
    fn build_bboxes(&mut self, leaf_bboxes: &[BoundingBox], partition: &mut [usize]) -> usize {
        if let [entity] = partition {
            let node = self.nodes.len();
            self.nodes.push(Node {
                child_0: node,
                child_1: *entity,
            });
            self.bboxes.push(leaf_bboxes[*entity]);
            return node;
        }

        let mut bbox = leaf_bboxes[partition[0]];
        for &e in &partition[1..] {
            bbox = bbox.union(&leaf_bboxes[e]);
        }
        let axis = bbox.longest_axis();
        let middle = partition.len() / 2;
        partition.select_nth_unstable_by(middle, |&a, &b| {
            let ca = leaf_bboxes[a].min[axis] + leaf_bboxes[a].max[axis];
            let cb = leaf_bboxes[b].min[axis] + leaf_bboxes[b].max[axis];
            ca.total_cmp(&cb)
        });

        let (left, right) = partition.split_at_mut(middle);
        let child_0 = self.build_bboxes(leaf_bboxes, left);
        let child_1 = self.build_bboxes(leaf_bboxes, right);
        self.nodes.push(Node { child_0, child_1 });
        self.bboxes.push(bbox);
        self.nodes.len() - 1
    }

    /// Dimension of the leaf entities, or `None` for point trees.
    pub fn entity_dim(&self) -> Option<usize> {
        match self.leaves {
            LeafKind::Entities(d) => Some(d),
            LeafKind::Points => None,
        }
    }

    pub fn leaf_kind(&self) -> LeafKind {
        self.leaves
    }

    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    pub fn num_leaves(&self) -> usize {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(i, n)| n.child_0 == *i)
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Bounding box of everything in the tree.
    pub fn root_bbox(&self) -> Option<&BoundingBox> {
        self.bboxes.last()
    }

    #[inline]
    fn is_leaf(&self, node: usize) -> bool {
        self.nodes[node].child_0 == node
    }

    fn root(&self) -> Option<usize> {
        self.nodes.len().checked_sub(1)
    }

    /// Visits the leaves whose boxes pass `accept_node`; `visit` returns
    /// `true` to stop the walk.
    fn walk<A, V>(&self, accept_node: A, mut visit: V) -> Result<(), MeshError>
    where
        A: Fn(&BoundingBox) -> bool,
        V: FnMut(usize) -> Result<bool, MeshError>,
    {
        let Some(root) = self.root() else {
            return Ok(());
        };
        let mut stack = vec![root];
        while let Some(node) = stack.pop() {
            if !accept_node(&self.bboxes[node]) {
                continue;
            }
            let n = self.nodes[node];
            if self.is_leaf(node) {
                if visit(n.child_1)? {
                    break;
                }
            } else {
                // child_0 is visited first
                stack.push(n.child_1);
                stack.push(n.child_0);
            }
        }
        Ok(())
    }

    fn check_cells(&self, mesh: &Mesh, op: &str) -> Result<(), MeshError> {
        if self.entity_dim() != Some(mesh.tdim()) {
            return Err(MeshError::InvalidConfiguration(format!(
                "{op} requires a tree built over the cells of the mesh"
            )));
        }
        Ok(())
    }

    /// Leaves whose bounding box contains `point`.
    pub fn compute_collisions(&self, point: &Point) -> Vec<usize> {
        let mut out = Vec::new();
        let _ = self.walk(
            |b| b.contains(point),
            |leaf| {
                out.push(leaf);
                Ok(false)
            },
        );
        out
    }

    /// Leaves whose bounding box overlaps `bbox`.
    pub fn compute_bbox_collisions(&self, bbox: &BoundingBox) -> Vec<usize> {
        let mut out = Vec::new();
        let _ = self.walk(
            |b| b.overlaps(bbox),
            |leaf| {
                out.push(leaf);
                Ok(false)
            },
        );
        out
    }

    /// Pairs `(mine, theirs)` of leaves with overlapping boxes.
    pub fn compute_tree_collisions(&self, other: &BoundingBoxTree) -> Vec<(usize, usize)> {
        let mut out = Vec::new();
        let (Some(a), Some(b)) = (self.root(), other.root()) else {
            return out;
        };
        let mut stack = vec![(a, b)];
        while let Some((na, nb)) = stack.pop() {
            if !self.bboxes[na].overlaps(&other.bboxes[nb]) {
                continue;
            }
            match (self.is_leaf(na), other.is_leaf(nb)) {
                (true, true) => out.push((self.nodes[na].child_1, other.nodes[nb].child_1)),
                (true, false) => {
                    stack.push((na, other.nodes[nb].child_1));
                    stack.push((na, other.nodes[nb].child_0));
                }
                (false, true) => {
                    stack.push((self.nodes[na].child_1, nb));
                    stack.push((self.nodes[na].child_0, nb));
                }
                (false, false) => {
                    for ca in [self.nodes[na].child_0, self.nodes[na].child_1] {
                        for cb in [other.nodes[nb].child_0, other.nodes[nb].child_1] {
                            stack.push((ca, cb));
                        }
                    }
                }
            }
        }
        out
    }

    /// First leaf whose bounding box contains `point`.
    pub fn compute_first_collision(&self, point: &Point) -> Option<usize> {
        let mut found = None;
        let _ = self.walk(
            |b| b.contains(point),
            |leaf| {
                found = Some(leaf);
                Ok(true)
            },
        );
        found
    }

    /// Cells that contain `point`, in tree order.
    pub fn compute_entity_collisions(&self, point: &Point, mesh: &Mesh) -> Result<Vec<usize>, MeshError> {
        self.check_cells(mesh, "point-in-entity")?;
        let tdim = mesh.tdim();
        let mut out = Vec::new();
        self.walk(
            |b| b.contains(point),
            |leaf| {
                if MeshEntity::new_unchecked(mesh, tdim, leaf).contains(point)? {
                    out.push(leaf);
                }
                Ok(false)
            },
        )?;
        Ok(out)
    }

    /// First cell found that contains `point`.
    pub fn compute_first_entity_collision(
        &self,
        point: &Point,
        mesh: &Mesh,
    ) -> Result<Option<usize>, MeshError> {
        self.check_cells(mesh, "point-in-entity")?;
        let tdim = mesh.tdim();
        let mut found = None;
        self.walk(
            |b| b.contains(point),
            |leaf| {
                if MeshEntity::new_unchecked(mesh, tdim, leaf).contains(point)? {
                    found = Some(leaf);
                    return Ok(true);
                }
                Ok(false)
            },
        )?;
        Ok(found)
    }

    fn point_search_tree(&self, mesh: &Mesh) -> Result<&MidpointTree, MeshError> {
        self.point_search_tree
            .get_or_try_init(|| {
                log::info!("Building point search tree to accelerate distance queries");
                let dim = self.entity_dim().unwrap_or(0);
                let mut midpoints = Vec::new();
                let mut entities = Vec::new();
                self.walk(
                    |_| true,
                    |leaf| {
                        midpoints.push(MeshEntity::new_unchecked(mesh, dim, leaf).midpoint()?);
                        entities.push(leaf);
                        Ok(false)
                    },
                )?;
                Ok(Box::new(MidpointTree {
                    tree: BoundingBoxTree::build_points(midpoints),
                    entities,
                }))
            })
            .map(|t| &**t)
    }

    /// Closest cell to `point` and its distance. Ties go to the lowest
    /// cell index.
    pub fn compute_closest_entity(&self, point: &Point, mesh: &Mesh) -> Result<(usize, f64), MeshError> {
        self.check_cells(mesh, "closest entity")?;
        if self.is_empty() {
            return Err(MeshError::EmptyMesh("cells"));
        }
        let tdim = mesh.tdim();
        // the cell owning the nearest midpoint is a candidate; its own
        // distance bounds the search radius
        let seeds = self.point_search_tree(mesh)?;
        let (seed, _) = seeds.tree.compute_closest_point(point)?;
        let mut closest = seeds.entities[seed];
        let mut r2 = MeshEntity::new_unchecked(mesh, tdim, closest).squared_distance(point)?;

        let Some(root) = self.root() else {
            return Err(MeshError::EmptyMesh("cells"));
        };
        let mut stack = vec![root];
        while let Some(node) = stack.pop() {
            if self.bboxes[node].squared_distance(point) > r2 {
                continue;
            }
            let n = self.nodes[node];
            if self.is_leaf(node) {
                let d2 = MeshEntity::new_unchecked(mesh, tdim, n.child_1).squared_distance(point)?;
                if d2 < r2 || (d2 == r2 && n.child_1 < closest) {
                    r2 = d2;
                    closest = n.child_1;
                }
            } else {
                stack.push(n.child_1);
                stack.push(n.child_0);
            }
        }
        Ok((closest, r2.sqrt()))
    }

    /// Closest point of a point tree and its distance. Ties go to the lowest
    /// point index.
    pub fn compute_closest_point(&self, point: &Point) -> Result<(usize, f64), MeshError> {
        if self.leaves != LeafKind::Points {
            return Err(MeshError::InvalidConfiguration(
                "closest point requires a tree built over a point cloud".into(),
            ));
        }
        let first = self.points.first().ok_or(MeshError::EmptyMesh("points"))?;
        let mut closest = 0;
        let mut r2 = first.squared_distance(point);
        let Some(root) = self.root() else {
            return Err(MeshError::EmptyMesh("points"));
        };
        let mut stack = vec![root];
        while let Some(node) = stack.pop() {
            if self.bboxes[node].squared_distance(point) > r2 {
                continue;
            }
            let n = self.nodes[node];
            if self.is_leaf(node) {
                let d2 = self.points[n.child_1].squared_distance(point);
                if d2 < r2 || (d2 == r2 && n.child_1 < closest) {
                    r2 = d2;
                    closest = n.child_1;
                }
            } else {
                stack.push(n.child_1);
                stack.push(n.child_0);
            }
        }
        Ok((closest, r2.sqrt()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid_points(n: usize) -> Vec<Point> {
        let mut pts = Vec::new();
        for j in 0..n {
            for i in 0..n {
                pts.push(Point::new(i as f64, j as f64, 0.0));
            }
        }
        pts
    }

    #[test]
    fn point_tree_closest_and_collisions() {
        let tree = BoundingBoxTree::build_points(grid_points(5));
        assert_eq!(tree.num_leaves(), 25);
        assert_eq!(tree.num_nodes(), 49);
        let (i, d) = tree.compute_closest_point(&Point::new(2.2, 3.1, 0.0)).unwrap();
        assert_eq!(i, 3 * 5 + 2);
        assert!((d - (0.04f64 + 0.01).sqrt()).abs() < 1e-14);
        assert_eq!(tree.compute_collisions(&Point::new(4.0, 4.0, 0.0)), vec![24]);
        assert!(tree.compute_collisions(&Point::new(0.5, 0.5, 0.0)).is_empty());
        assert_eq!(tree.compute_first_collision(&Point::new(1.0, 0.0, 0.0)), Some(1));
    }

    #[test]
    fn equidistant_points_prefer_lowest_index() {
        let tree = BoundingBoxTree::build_points(grid_points(2));
        let (i, _) = tree.compute_closest_point(&Point::new(0.5, 0.5, 0.0)).unwrap();
        assert_eq!(i, 0);
    }

    #[test]
    fn tree_tree_pairs() {
        let a = BoundingBoxTree::build_points(grid_points(3));
        let b = BoundingBoxTree::build_points(vec![Point::new(1.0, 1.0, 0.0), Point::new(9.0, 9.0, 0.0)]);
        assert_eq!(a.compute_tree_collisions(&b), vec![(4, 0)]);
        let empty = BoundingBoxTree::build_points(Vec::new());
        assert!(empty.compute_closest_point(&Point::default()).is_err());
        assert!(a.compute_tree_collisions(&empty).is_empty());
    }

    #[test]
    fn box_distances() {
        let b = BoundingBox::of_points([Point::new(0.0, 0.0, 0.0), Point::new(1.0, 2.0, 0.0)]).unwrap();
        assert_eq!(b.longest_axis(), 1);
        assert_eq!(b.squared_distance(&Point::new(2.0, 1.0, 0.0)), 1.0);
        assert_eq!(b.squared_distance(&Point::new(0.5, 1.0, 0.0)), 0.0);
        assert!(b.contains(&Point::new(1.0, 2.0, 0.0)));
        assert_eq!(b.center(), Point::new(0.5, 1.0, 0.0));
    }
}
