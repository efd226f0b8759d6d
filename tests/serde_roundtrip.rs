use mesh_topology::prelude::*;

#[test]
fn geometry_through_json_and_bincode() {
    let mesh = unit_square(2, 1).unwrap();
    let geometry = mesh.geometry().clone();

    let json = serde_json::to_string(&geometry).unwrap();
    let back: MeshGeometry = serde_json::from_str(&json).unwrap();
    assert_eq!(back, geometry);

    let bytes = bincode::serialize(&geometry).unwrap();
    let back: MeshGeometry = bincode::deserialize(&bytes).unwrap();
    assert_eq!(back.dim(), 2);
    assert_eq!(back.coordinates(), mesh.coordinates());
}

#[test]
fn options_fill_missing_fields_with_defaults() {
    let opts: MeshOptions = serde_json::from_str(r#"{"tolerance": 1e-10}"#).unwrap();
    assert_eq!(opts.tolerance, 1e-10);
    assert_eq!(opts.kernel, KernelKind::ExactPredicates);

    let opts = MeshOptions::default().with_kernel(KernelKind::SimpleCartesian);
    let json = serde_json::to_string(&opts).unwrap();
    assert!(json.contains("SimpleCartesian"));
    assert_eq!(serde_json::from_str::<MeshOptions>(&json).unwrap(), opts);
}

#[test]
fn mesh_function_and_quality_summary() {
    let mesh = unit_cube(1, 1, 1).unwrap();
    let mut markers = MeshFunction::new(&mesh, 3, 0usize).unwrap();
    markers.set(2, 7).unwrap();
    let bytes = bincode::serialize(&markers).unwrap();
    let back: MeshFunction<usize> = bincode::deserialize(&bytes).unwrap();
    assert_eq!(back, markers);
    assert_eq!(back.indices_with(&7).collect::<Vec<_>>(), vec![2]);

    let summary = mesh.quality().unwrap();
    let json = serde_json::to_string_pretty(&summary).unwrap();
    let back: QualitySummary = serde_json::from_str(&json).unwrap();
    assert_eq!(back, summary);
}

#[test]
fn labelled_operator_uses_a_mesh_function() {
    let mesh = unit_square(2, 2).unwrap();
    let mut labels = MeshFunction::new(&mesh, 2, 0usize).unwrap();
    for c in [4, 5, 6, 7] {
        labels.set(c, 1).unwrap();
    }
    let op = IntersectionOperator::with_labels(&mesh, &labels, 1).unwrap();
    // below the mesh: closest among the top row only
    assert_eq!(op.closest_entity(&Point::new(0.25, -0.5, 0.0)).unwrap(), 4);
    assert!(op.all_intersected_entities_of_point(&Point::new(0.25, 0.1, 0.0)).unwrap().is_empty());
}
