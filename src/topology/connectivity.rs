//! Incidence tables between entities of two dimensions.
//!
//! A [`Connectivity`] stores, for every entity of dimension `d0`, the ordered
//! list of incident entities of dimension `d1` in compressed-row form.

/// Compressed incidence table `(d0, d1)`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Connectivity {
    offsets: Vec<usize>,
    indices: Vec<usize>,
}

impl Connectivity {
    /// Builds a table from one list per source entity.
    pub fn from_lists<I, L>(lists: I) -> Self
    where
        I: IntoIterator<Item = L>,
        L: AsRef<[usize]>,
    {
        let mut offsets = vec![0];
        let mut indices = Vec::new();
        for list in lists {
            indices.extend_from_slice(list.as_ref());
            offsets.push(indices.len());
        }
        Self { offsets, indices }
    }

    /// Builds a table where every source entity has exactly `width` targets.
    pub fn from_fixed_width(width: usize, indices: Vec<usize>) -> Self {
        debug_assert!(width > 0 && indices.len() % width == 0);
        let n = indices.len() / width.max(1);
        let offsets = (0..=n).map(|i| i * width).collect();
        Self { offsets, indices }
    }

    /// Identity table: every entity is incident to itself.
    pub fn identity(n: usize) -> Self {
        Self::from_fixed_width(1, (0..n).collect())
    }

    /// Number of source entities.
    #[inline]
    pub fn len(&self) -> usize {
        self.offsets.len().saturating_sub(1)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Total number of stored incidences.
    #[inline]
    pub fn size_total(&self) -> usize {
        self.indices.len()
    }

    /// Incident entities of source entity `i`.
    #[inline]
    pub fn get(&self, i: usize) -> Option<&[usize]> {
        let start = *self.offsets.get(i)?;
        let end = *self.offsets.get(i + 1)?;
        Some(&self.indices[start..end])
    }

    /// Incident entities of source entity `i`; panics when out of range.
    #[inline]
    pub fn entities(&self, i: usize) -> &[usize] {
        &self.indices[self.offsets[i]..self.offsets[i + 1]]
    }

    /// Mutable view of one row. Only the local order may be changed.
    #[inline]
    pub(crate) fn entities_mut(&mut self, i: usize) -> &mut [usize] {
        let (start, end) = (self.offsets[i], self.offsets[i + 1]);
        &mut self.indices[start..end]
    }

    /// Flat array of all incidences (row-major).
    #[inline]
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = &[usize]> + '_ {
        self.offsets
            .windows(2)
            .map(move |w| &self.indices[w[0]..w[1]])
    }

    /// Reverse table `(d1, d0)`, with rows in increasing source order.
    pub fn transpose(&self, num_targets: usize) -> Connectivity {
        let mut counts = vec![0usize; num_targets + 1];
        for &j in &self.indices {
            counts[j + 1] += 1;
        }
        for k in 0..num_targets {
            counts[k + 1] += counts[k];
        }
        let offsets = counts.clone();
        let mut fill = counts;
        let mut indices = vec![0usize; self.indices.len()];
        for (i, row) in self.iter().enumerate() {
            for &j in row {
                indices[fill[j]] = i;
                fill[j] += 1;
            }
        }
        Connectivity { offsets, indices }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_and_rows() {
        let c = Connectivity::from_lists([vec![0, 1, 2], vec![1, 3], vec![]]);
        assert_eq!(c.len(), 3);
        assert_eq!(c.entities(0), &[0, 1, 2]);
        assert_eq!(c.get(1), Some(&[1usize, 3][..]));
        assert_eq!(c.get(2), Some(&[][..]));
        assert_eq!(c.get(3), None);
        assert_eq!(c.size_total(), 5);
    }

    #[test]
    fn transpose_is_sorted_by_source() {
        let c = Connectivity::from_fixed_width(2, vec![0, 1, 1, 2, 2, 0]);
        let t = c.transpose(3);
        assert_eq!(t.entities(0), &[0, 2]);
        assert_eq!(t.entities(1), &[0, 1]);
        assert_eq!(t.entities(2), &[1, 2]);
        // rows come back sorted, so [2, 0] returns as [0, 2]
        let back = t.transpose(3);
        assert_eq!(back.entities(0), &[0, 1]);
        assert_eq!(back.entities(2), &[0, 2]);
    }

    #[test]
    fn identity_table() {
        let c = Connectivity::identity(3);
        assert_eq!(c.iter().collect::<Vec<_>>(), vec![&[0][..], &[1][..], &[2][..]]);
    }
}
