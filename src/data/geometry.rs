//! Vertex coordinate storage.
//!
//! Coordinates are stored flat, `gdim` values per vertex, in vertex order.

use serde::{Deserialize, Serialize};

use crate::geometry::point::Point;
use crate::mesh_error::MeshError;

/// Coordinates of the vertices of a mesh in `R^gdim`, `1 <= gdim <= 3`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MeshGeometry {
    dim: usize,
    coordinates: Vec<f64>,
}

impl MeshGeometry {
    /// Zero-initialized storage for `num_vertices` points.
    pub fn new(dim: usize, num_vertices: usize) -> Result<Self, MeshError> {
        if !(1..=3).contains(&dim) {
            return Err(MeshError::InvalidConfiguration(format!(
                "geometric dimension must be 1, 2 or 3 (got {dim})"
            )));
        }
        Ok(Self {
            dim,
            coordinates: vec![0.0; dim * num_vertices],
        })
    }

    /// Geometric (embedding) dimension.
    #[inline]
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Number of stored points.
    #[inline]
    pub fn len(&self) -> usize {
        self.coordinates.len() / self.dim.max(1)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.coordinates.is_empty()
    }

    /// Coordinate slice of vertex `i`, or `None` past the last vertex.
    #[inline]
    pub fn get(&self, i: usize) -> Option<&[f64]> {
        (i < self.len()).then(|| self.x(i))
    }

    /// Coordinate slice of vertex `i`.
    ///
    /// # Panics
    ///
    /// Panics if `i >= self.len()`; see [`get`](Self::get).
    #[inline]
    pub fn x(&self, i: usize) -> &[f64] {
        &self.coordinates[i * self.dim..(i + 1) * self.dim]
    }

    /// Mutable coordinate slice of vertex `i`.
    ///
    /// # Panics
    ///
    /// Panics if `i >= self.len()`.
    #[inline]
    pub fn x_mut(&mut self, i: usize) -> &mut [f64] {
        &mut self.coordinates[i * self.dim..(i + 1) * self.dim]
    }

    /// Vertex `i` as a zero-padded point.
    ///
    /// # Panics
    ///
    /// Panics if `i >= self.len()`.
    #[inline]
    pub fn point(&self, i: usize) -> Point {
        Point::from_slice(self.x(i))
    }

    /// Overwrites vertex `i`.
    pub fn set(&mut self, i: usize, x: &[f64]) -> Result<(), MeshError> {
        if x.len() != self.dim {
            return Err(MeshError::CoordinateLength {
                expected: self.dim,
                found: x.len(),
            });
        }
        let size = self.len();
        if i >= size {
            return Err(MeshError::EntityOutOfRange { dim: 0, index: i, size });
        }
        self.x_mut(i).copy_from_slice(x);
        Ok(())
    }

    /// Overwrites vertex `i` with the first `gdim` components of `p`.
    pub(crate) fn set_point(&mut self, i: usize, p: &Point) {
        let dim = self.dim;
        self.x_mut(i).copy_from_slice(&p.coordinates()[..dim]);
    }

    /// All coordinates, `gdim` per vertex.
    #[inline]
    pub fn coordinates(&self) -> &[f64] {
        &self.coordinates
    }

    #[inline]
    pub fn coordinates_mut(&mut self) -> &mut [f64] {
        &mut self.coordinates
    }

    /// Iterator over all vertices as points.
    pub fn points(&self) -> impl ExactSizeIterator<Item = Point> + '_ {
        self.coordinates.chunks_exact(self.dim.max(1)).map(Point::from_slice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_and_read_back() {
        let mut g = MeshGeometry::new(2, 3).unwrap();
        g.set(1, &[0.5, 1.5]).unwrap();
        assert_eq!(g.x(1), &[0.5, 1.5]);
        assert_eq!(g.point(1), Point::new(0.5, 1.5, 0.0));
        assert_eq!(g.len(), 3);
        assert!(matches!(
            g.set(0, &[1.0]),
            Err(MeshError::CoordinateLength { expected: 2, found: 1 })
        ));
        assert!(matches!(
            g.set(3, &[1.0, 1.0]),
            Err(MeshError::EntityOutOfRange { index: 3, .. })
        ));
        assert!(MeshGeometry::new(4, 1).is_err());
    }

    #[test]
    fn checked_access_past_the_end() {
        let g = MeshGeometry::new(3, 2).unwrap();
        assert_eq!(g.get(1), Some(&[0.0, 0.0, 0.0][..]));
        assert_eq!(g.get(2), None);
        assert_eq!(g.get(usize::MAX), None);
        let empty = MeshGeometry::default();
        assert_eq!(empty.get(0), None);
        assert_eq!(empty.points().len(), 0);
    }
}
