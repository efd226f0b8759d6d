use crate::geometry::cells::quadrilateral::max_vertex_distance;
use crate::geometry::cells::{CellKernel, unsupported, vertex_points};
use crate::geometry::point::Point;
use crate::mesh_error::MeshError;
use crate::topology::cell_type::CellType;
use crate::topology::entity::MeshEntity;
use crate::topology::mesh_topology::MeshTopology;

const VERTICES: &[&[usize]] = &[&[0], &[1], &[2], &[3], &[4], &[5], &[6], &[7]];
const EDGES: &[&[usize]] = &[
    &[0, 1],
    &[1, 2],
    &[2, 3],
    &[3, 0],
    &[4, 5],
    &[5, 6],
    &[6, 7],
    &[7, 4],
    &[0, 4],
    &[1, 5],
    &[2, 6],
    &[3, 7],
];
const FACES: &[&[usize]] = &[
    &[0, 1, 2, 3],
    &[4, 5, 6, 7],
    &[0, 1, 5, 4],
    &[1, 2, 6, 5],
    &[2, 3, 7, 6],
    &[3, 0, 4, 7],
];
const CELL: &[&[usize]] = &[&[0, 1, 2, 3, 4, 5, 6, 7]];

/// Hexahedron with bottom face `[v0, v1, v2, v3]` and top face
/// `[v4, v5, v6, v7]`, both counter-clockwise seen from above.
///
/// Supports topology, volume, diameter and facet areas only.
#[derive(Clone, Copy, Debug, Default)]
pub struct HexahedronCell;

fn signed_tet_volume(a: &Point, b: &Point, c: &Point, d: &Point) -> f64 {
    (*b - *a).dot(&(*c - *a).cross(&(*d - *a))) / 6.0
}

impl CellKernel for HexahedronCell {
    fn cell_type(&self) -> CellType {
        CellType::Hexahedron
    }

    fn entity_pattern(&self, d: usize) -> Result<&'static [&'static [usize]], MeshError> {
        match d {
            0 => Ok(VERTICES),
            1 => Ok(EDGES),
            2 => Ok(FACES),
            3 => Ok(CELL),
            _ => Err(MeshError::InvalidDimension { dim: d, max: 3 }),
        }
    }

    /// Five-tetrahedron split.
    fn volume(&self, entity: &MeshEntity<'_>) -> Result<f64, MeshError> {
        let v = vertex_points::<8>(entity, 3)?;
        let signed = signed_tet_volume(&v[0], &v[1], &v[3], &v[4])
            + signed_tet_volume(&v[1], &v[2], &v[3], &v[6])
            + signed_tet_volume(&v[1], &v[3], &v[4], &v[6])
            + signed_tet_volume(&v[1], &v[4], &v[5], &v[6])
            + signed_tet_volume(&v[3], &v[4], &v[6], &v[7]);
        Ok(signed.abs())
    }

    fn diameter(&self, entity: &MeshEntity<'_>) -> Result<f64, MeshError> {
        Ok(max_vertex_distance(&vertex_points::<8>(entity, 3)?))
    }

    fn closest_point(&self, _entity: &MeshEntity<'_>, _point: &Point) -> Result<Point, MeshError> {
        unsupported("closest point", CellType::Hexahedron)
    }

    fn contains(&self, _entity: &MeshEntity<'_>, _point: &Point) -> Result<bool, MeshError> {
        unsupported("contains", CellType::Hexahedron)
    }

    fn normal(&self, _cell: &MeshEntity<'_>, _facet: usize) -> Result<Point, MeshError> {
        unsupported("normal", CellType::Hexahedron)
    }

    fn cell_normal(&self, _cell: &MeshEntity<'_>) -> Result<Point, MeshError> {
        unsupported("cell normal", CellType::Hexahedron)
    }

    fn radius_ratio(&self, _cell: &MeshEntity<'_>) -> Result<f64, MeshError> {
        unsupported("radius ratio", CellType::Hexahedron)
    }

    fn order(&self, _topology: &mut MeshTopology, _cell: usize) -> Result<(), MeshError> {
        unsupported("order", CellType::Hexahedron)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_cube_split_volume() {
        let v = [
            Point::new(0.0, 0.0, 0.0),
            Point::new(1.0, 0.0, 0.0),
            Point::new(1.0, 1.0, 0.0),
            Point::new(0.0, 1.0, 0.0),
            Point::new(0.0, 0.0, 1.0),
            Point::new(1.0, 0.0, 1.0),
            Point::new(1.0, 1.0, 1.0),
            Point::new(0.0, 1.0, 1.0),
        ];
        let vol = signed_tet_volume(&v[0], &v[1], &v[3], &v[4])
            + signed_tet_volume(&v[1], &v[2], &v[3], &v[6])
            + signed_tet_volume(&v[1], &v[3], &v[4], &v[6])
            + signed_tet_volume(&v[1], &v[4], &v[5], &v[6])
            + signed_tet_volume(&v[3], &v[4], &v[6], &v[7]);
        assert!((vol.abs() - 1.0).abs() < 1e-14);
        assert_eq!(HexahedronCell.num_vertices(2).unwrap(), 4);
        assert_eq!(HexahedronCell.num_entities(2).unwrap(), 6);
    }
}
