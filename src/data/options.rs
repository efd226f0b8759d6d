//! Per-mesh numeric and algorithmic settings.

use serde::{Deserialize, Serialize};

use crate::geometry::kernel::KernelKind;
use crate::mesh_error::MeshError;

/// Default containment slack, on the order of machine epsilon.
pub const DEFAULT_TOLERANCE: f64 = 3.0e-16;

/// Settings consulted by geometric predicates and intersection queries.
///
/// ```
/// use mesh_topology::data::options::MeshOptions;
/// use mesh_topology::geometry::kernel::KernelKind;
///
/// let opts = MeshOptions::default()
///     .with_tolerance(1e-12)
///     .with_kernel(KernelKind::SimpleCartesian);
/// assert!(opts.validate().is_ok());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeshOptions {
    /// Slack used by `contains` and the geometric intersection tests.
    pub tolerance: f64,
    /// Intersection kernel used by entity-entity queries.
    pub kernel: KernelKind,
}

impl Default for MeshOptions {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            kernel: KernelKind::default(),
        }
    }
}

impl MeshOptions {
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn with_kernel(mut self, kernel: KernelKind) -> Self {
        self.kernel = kernel;
        self
    }

    /// Rejects negative or non-finite tolerances.
    pub fn validate(&self) -> Result<(), MeshError> {
        if !self.tolerance.is_finite() || self.tolerance < 0.0 {
            return Err(MeshError::InvalidConfiguration(format!(
                "tolerance must be finite and non-negative (got {})",
                self.tolerance
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_and_validation() {
        let opts = MeshOptions::default();
        assert_eq!(opts.tolerance, DEFAULT_TOLERANCE);
        assert_eq!(opts.kernel, KernelKind::ExactPredicates);
        assert!(opts.with_tolerance(-1.0).validate().is_err());
        assert!(opts.with_tolerance(f64::NAN).validate().is_err());
    }

    #[test]
    fn missing_fields_use_defaults() {
        let opts: MeshOptions = serde_json::from_str(r#"{"tolerance":1e-10}"#).unwrap();
        assert_eq!(opts.tolerance, 1e-10);
        assert_eq!(opts.kernel, KernelKind::ExactPredicates);
    }
}
