//! Cache invalidation for data derived from mesh coordinates.

/// Anything that caches data derived from vertex coordinates (spatial
/// indices, cell orientations) implements this so that coordinate updates
/// can drop it.
pub trait InvalidateCache {
    /// Drops every coordinate-derived cache; the next query recomputes.
    fn invalidate_cache(&mut self);
}
