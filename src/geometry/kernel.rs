//! Intersection kernels for entity-entity queries.
//!
//! The kernel decides whether two mesh entities intersect. Two flavours are
//! provided, selected per mesh through [`KernelKind`]:
//!
//! - [`ExactPredicates`] answers combinatorially whenever it can: entities
//!   of the same mesh that share a vertex intersect, and entities of the same
//!   conforming mesh that share none are disjoint. Only entities of different
//!   meshes reach the geometric test.
//! - [`SimpleCartesian`] always runs the floating-point feature-pair test of
//!   [`simplices_intersect`] with the mesh tolerance.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::geometry::point::Point;
use crate::geometry::predicates::simplices_intersect;
use crate::mesh_error::MeshError;
use crate::topology::entity::MeshEntity;

/// Intersection test between mesh entities.
pub trait IntersectionKernel: Send + Sync + fmt::Debug {
    /// Kind tag of this kernel.
    fn kind(&self) -> KernelKind;

    /// Whether the closed entities `a` and `b` intersect.
    fn do_intersect(&self, a: &MeshEntity<'_>, b: &MeshEntity<'_>) -> Result<bool, MeshError>;
}

/// Combinatorial shortcut for entities of one mesh, geometric test otherwise.
#[derive(Clone, Copy, Debug, Default)]
pub struct ExactPredicates;

/// Tolerance-based geometric test only.
#[derive(Clone, Copy, Debug, Default)]
pub struct SimpleCartesian;

/// Selects an [`IntersectionKernel`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KernelKind {
    #[default]
    ExactPredicates,
    SimpleCartesian,
}

impl KernelKind {
    pub fn kernel(self) -> &'static dyn IntersectionKernel {
        match self {
            KernelKind::ExactPredicates => &ExactPredicates,
            KernelKind::SimpleCartesian => &SimpleCartesian,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            KernelKind::ExactPredicates => "ExactPredicates",
            KernelKind::SimpleCartesian => "SimpleCartesian",
        }
    }
}

impl fmt::Display for KernelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for KernelKind {
    type Err = MeshError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ExactPredicates" => Ok(KernelKind::ExactPredicates),
            "SimpleCartesian" => Ok(KernelKind::SimpleCartesian),
            other => Err(MeshError::InvalidConfiguration(format!(
                "unknown intersection kernel '{other}' (expected ExactPredicates or SimpleCartesian)"
            ))),
        }
    }
}

/// Vertex coordinates of a simplex entity.
fn simplex_points(entity: &MeshEntity<'_>) -> Result<Vec<Point>, MeshError> {
    let kernel = entity.kernel()?;
    if !kernel.cell_type().is_simplex() {
        return Err(MeshError::UnsupportedOperation {
            op: "entity intersection",
            cell_type: kernel.cell_type(),
        });
    }
    let geometry = entity.mesh().geometry();
    Ok(entity.vertices()?.iter().map(|&v| geometry.point(v)).collect())
}

fn geometric_test(a: &MeshEntity<'_>, b: &MeshEntity<'_>) -> Result<bool, MeshError> {
    let pa = simplex_points(a)?;
    let pb = simplex_points(b)?;
    let tol = a.mesh().options().tolerance.max(b.mesh().options().tolerance);
    Ok(simplices_intersect(&pa, &pb, tol))
}

impl IntersectionKernel for ExactPredicates {
    fn kind(&self) -> KernelKind {
        KernelKind::ExactPredicates
    }

    fn do_intersect(&self, a: &MeshEntity<'_>, b: &MeshEntity<'_>) -> Result<bool, MeshError> {
        if std::ptr::eq(a.mesh(), b.mesh()) {
            return a.incident_to(b);
        }
        geometric_test(a, b)
    }
}

impl IntersectionKernel for SimpleCartesian {
    fn kind(&self) -> KernelKind {
        KernelKind::SimpleCartesian
    }

    fn do_intersect(&self, a: &MeshEntity<'_>, b: &MeshEntity<'_>) -> Result<bool, MeshError> {
        geometric_test(a, b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_kernel_names() {
        assert_eq!(
            "SimpleCartesian".parse::<KernelKind>().unwrap(),
            KernelKind::SimpleCartesian
        );
        assert_eq!(
            KernelKind::ExactPredicates.to_string().parse::<KernelKind>().unwrap(),
            KernelKind::ExactPredicates
        );
        assert!(matches!(
            "Epick".parse::<KernelKind>(),
            Err(MeshError::InvalidConfiguration(_))
        ));
        assert_eq!(KernelKind::SimpleCartesian.kernel().kind(), KernelKind::SimpleCartesian);
    }
}
