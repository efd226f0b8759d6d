//! Lightweight entity handles and iterators.
//!
//! A [`MeshEntity`] is a `(mesh, dim, index)` triple. Incidence queries go
//! through the mesh, which computes missing connectivity on first use, so a
//! handle only ever borrows the mesh immutably.

use std::fmt;
use std::ops::Range;
use std::slice;

use crate::geometry::cells::CellKernel;
use crate::geometry::point::Point;
use crate::mesh::Mesh;
use crate::mesh_error::MeshError;

/// Handle to entity `index` of dimension `dim` in a mesh.
#[derive(Clone, Copy)]
pub struct MeshEntity<'a> {
    mesh: &'a Mesh,
    dim: usize,
    index: usize,
}

impl<'a> MeshEntity<'a> {
    /// Checked constructor; computes the entities of dimension `dim` if
    /// needed.
    pub fn new(mesh: &'a Mesh, dim: usize, index: usize) -> Result<Self, MeshError> {
        let size = mesh.size(dim)?;
        if index >= size {
            return Err(MeshError::EntityOutOfRange { dim, index, size });
        }
        Ok(Self { mesh, dim, index })
    }

    #[inline]
    pub(crate) fn new_unchecked(mesh: &'a Mesh, dim: usize, index: usize) -> Self {
        Self { mesh, dim, index }
    }

    #[inline]
    pub fn mesh(&self) -> &'a Mesh {
        self.mesh
    }

    #[inline]
    pub fn dim(&self) -> usize {
        self.dim
    }

    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Indices of the incident entities of dimension `d`.
    pub fn entities(&self, d: usize) -> Result<&'a [usize], MeshError> {
        let table = self.mesh.connectivity(self.dim, d)?;
        table.get(self.index).ok_or(MeshError::EntityOutOfRange {
            dim: self.dim,
            index: self.index,
            size: table.len(),
        })
    }

    pub fn num_entities(&self, d: usize) -> Result<usize, MeshError> {
        Ok(self.entities(d)?.len())
    }

    /// Vertex indices of this entity, in local order. A vertex is its own
    /// single vertex.
    pub fn vertices(&self) -> Result<&'a [usize], MeshError> {
        self.entities(0)
    }

    /// Iterator over incident entities of dimension `d`.
    pub fn incident(&self, d: usize) -> Result<EntityIter<'a>, MeshError> {
        Ok(EntityIter::from_list(self.mesh, d, self.entities(d)?))
    }

    /// Coordinates of a vertex.
    pub fn point(&self) -> Result<Point, MeshError> {
        if self.dim != 0 {
            return Err(MeshError::EntityDimension {
                expected: 0,
                found: self.dim,
            });
        }
        Ok(self.mesh.geometry().point(self.index))
    }

    /// Average of the vertex coordinates.
    pub fn midpoint(&self) -> Result<Point, MeshError> {
        let vertices = self.vertices()?;
        let geometry = self.mesh.geometry();
        let mut sum = Point::default();
        for &v in vertices {
            sum += geometry.point(v);
        }
        Ok(sum / vertices.len().max(1) as f64)
    }

    /// Whether the two entities share at least one vertex.
    pub fn incident_to(&self, other: &MeshEntity<'_>) -> Result<bool, MeshError> {
        let mine = self.vertices()?;
        let theirs = other.vertices()?;
        Ok(mine.iter().any(|v| theirs.contains(v)))
    }

    /// Kernel of the entity's own type: the cell kernel for cells, the
    /// sub-entity type's kernel otherwise.
    pub fn kernel(&self) -> Result<&'static dyn CellKernel, MeshError> {
        Ok(self.mesh.cell_type().entity_type(self.dim)?.kernel())
    }

    pub fn volume(&self) -> Result<f64, MeshError> {
        self.kernel()?.volume(self)
    }

    pub fn diameter(&self) -> Result<f64, MeshError> {
        self.kernel()?.diameter(self)
    }

    pub fn inradius(&self) -> Result<f64, MeshError> {
        self.kernel()?.inradius(self)
    }

    pub fn radius_ratio(&self) -> Result<f64, MeshError> {
        self.kernel()?.radius_ratio(self)
    }

    pub fn contains(&self, point: &Point) -> Result<bool, MeshError> {
        self.kernel()?.contains(self, point)
    }

    pub fn closest_point(&self, point: &Point) -> Result<Point, MeshError> {
        self.kernel()?.closest_point(self, point)
    }

    pub fn squared_distance(&self, point: &Point) -> Result<f64, MeshError> {
        self.kernel()?.squared_distance(self, point)
    }

    pub fn distance(&self, point: &Point) -> Result<f64, MeshError> {
        Ok(self.squared_distance(point)?.sqrt())
    }

    /// Outward unit normal of local facet `facet`.
    pub fn normal(&self, facet: usize) -> Result<Point, MeshError> {
        self.kernel()?.normal(self, facet)
    }

    pub fn cell_normal(&self) -> Result<Point, MeshError> {
        self.kernel()?.cell_normal(self)
    }

    pub fn facet_area(&self, facet: usize) -> Result<f64, MeshError> {
        self.kernel()?.facet_area(self, facet)
    }

    /// 1 when the cell normal points against `up`, 0 otherwise.
    pub fn orientation(&self, up: &Point) -> Result<usize, MeshError> {
        self.kernel()?.orientation(self, up)
    }
}

impl PartialEq for MeshEntity<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.mesh, other.mesh) && self.dim == other.dim && self.index == other.index
    }
}

impl Eq for MeshEntity<'_> {}

impl fmt::Debug for MeshEntity<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MeshEntity")
            .field("dim", &self.dim)
            .field("index", &self.index)
            .finish()
    }
}

#[derive(Clone, Debug)]
enum Source<'a> {
    Range(Range<usize>),
    List(slice::Iter<'a, usize>),
}

/// Iterator over entities of one dimension, either all of them in index
/// order or an explicit incidence list.
#[derive(Clone, Debug)]
pub struct EntityIter<'a> {
    mesh: &'a Mesh,
    dim: usize,
    source: Source<'a>,
}

impl<'a> EntityIter<'a> {
    pub(crate) fn all(mesh: &'a Mesh, dim: usize, size: usize) -> Self {
        Self {
            mesh,
            dim,
            source: Source::Range(0..size),
        }
    }

    pub(crate) fn from_list(mesh: &'a Mesh, dim: usize, list: &'a [usize]) -> Self {
        Self {
            mesh,
            dim,
            source: Source::List(list.iter()),
        }
    }

    /// Dimension of the entities yielded.
    pub fn dim(&self) -> usize {
        self.dim
    }
}

impl<'a> Iterator for EntityIter<'a> {
    type Item = MeshEntity<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let index = match &mut self.source {
            Source::Range(r) => r.next()?,
            Source::List(it) => *it.next()?,
        };
        Some(MeshEntity::new_unchecked(self.mesh, self.dim, index))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match &self.source {
            Source::Range(r) => r.size_hint(),
            Source::List(it) => it.size_hint(),
        }
    }
}

impl ExactSizeIterator for EntityIter<'_> {}

impl DoubleEndedIterator for EntityIter<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        let index = match &mut self.source {
            Source::Range(r) => r.next_back()?,
            Source::List(it) => *it.next_back()?,
        };
        Some(MeshEntity::new_unchecked(self.mesh, self.dim, index))
    }
}
