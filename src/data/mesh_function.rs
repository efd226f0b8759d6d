//! Per-entity values over one topological dimension.
//!
//! A [`MeshFunction`] holds one value per entity of a fixed dimension, e.g.
//! integer markers selecting the cells an intersection query may report.

use serde::{Deserialize, Serialize};

use crate::mesh::Mesh;
use crate::mesh_error::MeshError;

/// One value of type `T` per entity of dimension `dim`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MeshFunction<T> {
    dim: usize,
    values: Vec<T>,
}

impl<T: Clone> MeshFunction<T> {
    /// Creates a function on the entities of dimension `dim`, computing them
    /// if needed, with every value set to `value`.
    pub fn new(mesh: &Mesh, dim: usize, value: T) -> Result<Self, MeshError> {
        let n = mesh.size(dim)?;
        Ok(Self {
            dim,
            values: vec![value; n],
        })
    }

    /// Sets every value to `value`.
    pub fn fill(&mut self, value: T) {
        self.values.iter_mut().for_each(|v| *v = value.clone());
    }
}

impl<T> MeshFunction<T> {
    /// Wraps existing values, one per entity of dimension `dim`.
    pub fn from_values(mesh: &Mesh, dim: usize, values: Vec<T>) -> Result<Self, MeshError> {
        let n = mesh.size(dim)?;
        if values.len() != n {
            return Err(MeshError::EntityOutOfRange {
                dim,
                index: values.len(),
                size: n,
            });
        }
        Ok(Self { dim, values })
    }

    #[inline]
    pub fn dim(&self) -> usize {
        self.dim
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&T> {
        self.values.get(index)
    }

    /// Sets the value of entity `index`, returning the previous one.
    pub fn set(&mut self, index: usize, value: T) -> Result<T, MeshError> {
        let size = self.values.len();
        let slot = self.values.get_mut(index).ok_or(MeshError::EntityOutOfRange {
            dim: self.dim,
            index,
            size,
        })?;
        Ok(std::mem::replace(slot, value))
    }

    #[inline]
    pub fn values(&self) -> &[T] {
        &self.values
    }

    #[inline]
    pub fn values_mut(&mut self) -> &mut [T] {
        &mut self.values
    }
}

impl<T: PartialEq> MeshFunction<T> {
    /// Indices of the entities whose value equals `value`, ascending.
    pub fn indices_with<'a>(&'a self, value: &'a T) -> impl Iterator<Item = usize> + 'a {
        self.values
            .iter()
            .enumerate()
            .filter_map(move |(i, v)| (v == value).then_some(i))
    }
}
