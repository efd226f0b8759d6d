//! Cell size and shape statistics.

use itertools::{Itertools, MinMaxResult};
use serde::{Deserialize, Serialize};

use crate::mesh::Mesh;
use crate::mesh_error::MeshError;
use crate::topology::entity::MeshEntity;

/// Extremes of the basic per-cell measures over a mesh.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct QualitySummary {
    /// Smallest cell diameter.
    pub hmin: f64,
    /// Largest cell diameter.
    pub hmax: f64,
    /// Smallest inradius.
    pub rmin: f64,
    /// Largest inradius.
    pub rmax: f64,
    pub radius_ratio_min: f64,
    pub radius_ratio_max: f64,
}

/// `(min, max)` of `f` over all cells.
pub fn cell_extrema<F>(mesh: &Mesh, f: F) -> Result<(f64, f64), MeshError>
where
    F: Fn(&MeshEntity<'_>) -> Result<f64, MeshError>,
{
    let values: Vec<f64> = mesh.cells()?.map(|c| f(&c)).collect::<Result<_, _>>()?;
    match values.into_iter().minmax_by(f64::total_cmp) {
        MinMaxResult::NoElements => Err(MeshError::EmptyMesh("cells")),
        MinMaxResult::OneElement(x) => Ok((x, x)),
        MinMaxResult::MinMax(lo, hi) => Ok((lo, hi)),
    }
}

/// All extremes of [`QualitySummary`] in one call.
pub fn quality_summary(mesh: &Mesh) -> Result<QualitySummary, MeshError> {
    let (hmin, hmax) = cell_extrema(mesh, |c| c.diameter())?;
    let (rmin, rmax) = cell_extrema(mesh, |c| c.inradius())?;
    let (radius_ratio_min, radius_ratio_max) = cell_extrema(mesh, |c| c.radius_ratio())?;
    Ok(QualitySummary {
        hmin,
        hmax,
        rmin,
        rmax,
        radius_ratio_min,
        radius_ratio_max,
    })
}

/// Histogram of cell radius ratios over `num_bins` equal bins of `[0, 1]`.
/// Returns the bin centers and the number of cells per bin.
pub fn radius_ratio_histogram(mesh: &Mesh, num_bins: usize) -> Result<(Vec<f64>, Vec<usize>), MeshError> {
    if num_bins == 0 {
        return Err(MeshError::InvalidConfiguration(
            "histogram needs at least one bin".into(),
        ));
    }
    let width = 1.0 / num_bins as f64;
    let centers = (0..num_bins).map(|i| (i as f64 + 0.5) * width).collect();
    let mut counts = vec![0; num_bins];
    for cell in mesh.cells()? {
        let q = cell.radius_ratio()?;
        let bin = ((q * num_bins as f64) as usize).min(num_bins - 1);
        counts[bin] += 1;
    }
    Ok((centers, counts))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algs::generation::{unit_interval, unit_square};

    #[test]
    fn right_triangles_of_the_unit_square() {
        let mesh = unit_square(4, 4).unwrap();
        let q = mesh.quality().unwrap();
        // hypotenuse of a right triangle is the circumdiameter
        let h = (2.0f64).sqrt() / 4.0;
        assert!((q.hmin - h).abs() < 1e-14 && (q.hmax - h).abs() < 1e-14);
        assert!((q.radius_ratio_min - q.radius_ratio_max).abs() < 1e-12);
        assert!(q.radius_ratio_min > 0.8 && q.radius_ratio_min < 0.9);
        let (centers, counts) = radius_ratio_histogram(&mesh, 10).unwrap();
        assert_eq!(centers.len(), 10);
        assert_eq!(counts[8], 32);
    }

    #[test]
    fn interval_quality_is_one() {
        let mesh = unit_interval(5).unwrap();
        assert_eq!(mesh.radius_ratio_min().unwrap(), 1.0);
        assert!((mesh.hmax().unwrap() - 0.2).abs() < 1e-15);
    }
}
