//! End-to-end import scenarios on small hand-built trees

use approx::assert_relative_eq;

use crate::bsp::fixtures::TreeBuilder;
use crate::bsp::{BspTree, NodeRef};
use crate::config::ImportSettings;
use crate::error::{MeshError, Result};
use crate::foundation::logging;
use crate::foundation::math::constants::PI;
use crate::foundation::math::{Quat, Vec3};
use crate::mesh::IndexFormat;
use crate::pipeline::{
    BuildReport, LevelMesher, MaterialHandle, ModelRequest, SceneCollector,
};

fn resolve(name: &str) -> Option<MaterialHandle> {
    match name {
        "brick" => Some(MaterialHandle(1)),
        "stone" => Some(MaterialHandle(2)),
        _ => None,
    }
}

fn run(
    tree: &BspTree,
    settings: ImportSettings,
    models: &[ModelRequest],
) -> Result<(BuildReport, SceneCollector)> {
    logging::init_for_tests();
    let materials = resolve;
    let mesher = LevelMesher::new(settings, &materials)?;
    let mut scene = SceneCollector::new();
    let report = mesher.import(tree, models, &mut scene)?;
    Ok((report, scene))
}

/// Interior node over two leaves, one 2-area triangle each, different materials
fn two_material_tree() -> BspTree {
    TreeBuilder::new()
        .leaf_with_triangle("brick", 0.0, 2.0)
        .leaf_with_triangle("stone", 10.0, 2.0)
        .split_leaves(0, 1)
        .build()
}

#[test]
fn test_small_node_becomes_single_chunk_with_two_submeshes() {
    let settings = ImportSettings::default().with_max_mesh_surface_area(100.0);
    let (report, scene) = run(&two_material_tree(), settings, &[]).unwrap();

    assert_eq!(report.chunk_roots, 1);
    assert_eq!(report.meshes_built, 1);
    assert_eq!(scene.entities.len(), 1);

    let entity = &scene.entities[0];
    assert_eq!(entity.name, "worldspawn_1");
    assert_eq!(entity.mesh.name, "worldspawn_1_mesh");
    assert_eq!(entity.mesh.submeshes.len(), 2);
    assert_eq!(entity.mesh.vertex_count(), 6);
    assert_eq!(entity.mesh.index_format, IndexFormat::U16);
    assert_eq!(entity.materials, vec![Some(MaterialHandle(1)), Some(MaterialHandle(2))]);
    assert_eq!(scene.dependencies, vec![MaterialHandle(1), MaterialHandle(2)]);
}

#[test]
fn test_large_node_splits_into_leaf_chunks() {
    let settings = ImportSettings::default().with_max_mesh_surface_area(1.0);
    let (report, scene) = run(&two_material_tree(), settings, &[]).unwrap();

    assert_eq!(report.chunk_roots, 2);
    let names: Vec<&str> = scene.entities.iter().map(|e| e.mesh.name.as_str()).collect();
    assert_eq!(names, vec!["worldspawn_1_mesh", "worldspawn_2_mesh"]);
    for entity in &scene.entities {
        assert_eq!(entity.mesh.submeshes.len(), 1);
        assert_eq!(entity.mesh.vertex_count(), 3);
    }
}

#[test]
fn test_chunk_origin_is_center_of_swizzled_bounds() {
    let tree = TreeBuilder::new().leaf_with_triangle("brick", 0.0, 2.0).build();
    let (_, scene) = run(&tree, ImportSettings::default(), &[]).unwrap();

    let entity = &scene.entities[0];
    assert_relative_eq!(entity.origin, Vec3::new(1.0, 0.0, 1.0));
    assert_relative_eq!(entity.mesh.positions[0], Vec3::new(-1.0, 0.0, -1.0));
    assert_relative_eq!(entity.mesh.positions[1], Vec3::new(1.0, 0.0, -1.0));
}

#[test]
fn test_import_scale_moves_chunk_origin() {
    let tree = TreeBuilder::new().leaf_with_triangle("brick", 0.0, 2.0).build();
    let settings = ImportSettings {
        import_scale: 2.0,
        ..ImportSettings::default()
    };
    let (_, scene) = run(&tree, settings, &[]).unwrap();
    assert_relative_eq!(scene.entities[0].origin, Vec3::new(2.0, 0.0, 2.0));
}

#[test]
fn test_shared_edge_quad_welds_to_four_vertices() {
    let tree = TreeBuilder::new().face_quad("brick", 0.0, 1.0).leaf(0, 1).build();
    let (_, scene) = run(&tree, ImportSettings::default(), &[]).unwrap();

    let mesh = &scene.entities[0].mesh;
    assert_eq!(mesh.vertex_count(), 4);
    assert_eq!(mesh.triangle_count(), 2);
    assert_eq!(mesh.submeshes[0].indices.to_u32(), vec![0, 1, 2, 0, 2, 3]);
    assert!(mesh.vertex_count() <= tree.faces[0].mesh_vertex_count);
}

#[test]
fn test_skip_marker_drops_submesh() {
    let tree = TreeBuilder::new()
        .leaf_with_triangle("brick", 0.0, 2.0)
        .leaf_with_triangle("tools/clip_skip", 10.0, 2.0)
        .split_leaves(0, 1)
        .build();
    let settings = ImportSettings::default().with_max_mesh_surface_area(100.0);
    let (report, scene) = run(&tree, settings, &[]).unwrap();

    assert_eq!(report.skipped_submeshes, 1);
    let mesh = &scene.entities[0].mesh;
    assert_eq!(mesh.submeshes.len(), 1);
    for submesh in &mesh.submeshes {
        assert!(!tree.tex_infos[submesh.material_id].name.contains("skip"));
    }
    assert_eq!(scene.entities[0].materials, vec![Some(MaterialHandle(1))]);
}

#[test]
fn test_skip_marker_is_case_sensitive() {
    let tree = TreeBuilder::new().leaf_with_triangle("SKIP_panel", 0.0, 2.0).build();
    let (report, scene) = run(&tree, ImportSettings::default(), &[]).unwrap();

    assert_eq!(report.skipped_submeshes, 0);
    assert_eq!(scene.entities.len(), 1);
    assert_eq!(scene.entities[0].materials, vec![None]);
    assert!(scene.dependencies.is_empty());
}

#[test]
fn test_fully_skipped_chunk_builds_nothing_and_keeps_counter() {
    let tree = TreeBuilder::new()
        .leaf_with_triangle("skip", 0.0, 2.0)
        .face_triangle("stone", 10.0, 2.0)
        .model(1, 1)
        .build();
    let models = [ModelRequest::new(0, "door", Vec3::new(10.0, 0.0, 0.0))];
    let (report, scene) = run(&tree, ImportSettings::default(), &models).unwrap();

    assert_eq!(report.empty_chunks, 1);
    assert_eq!(report.meshes_built, 0);
    assert_eq!(report.model_meshes_built, 1);
    assert_eq!(scene.entities.len(), 1);
    assert_eq!(scene.entities[0].mesh.name, "door_1_mesh");
}

#[test]
fn test_empty_leaf_is_counted_not_fatal() {
    let tree = TreeBuilder::new()
        .leaf_with_triangle("brick", 0.0, 2.0)
        .leaf(0, 0)
        .split_leaves(0, 1)
        .build();
    let settings = ImportSettings::default().with_subdivide_all_leaves(true);
    let (report, scene) = run(&tree, settings, &[]).unwrap();

    assert_eq!(report.chunk_roots, 2);
    assert_eq!(report.empty_chunks, 1);
    assert_eq!(scene.entities.len(), 1);
}

#[test]
fn test_tiny_mesh_gets_no_collider_or_lightmap() {
    let tree = TreeBuilder::new().leaf_with_triangle("brick", 0.0, 0.1).build();
    let (report, scene) = run(&tree, ImportSettings::default(), &[]).unwrap();

    let entity = &scene.entities[0];
    assert!(entity.collision.is_none());
    assert!(entity.lightmap.is_none());
    assert_eq!(report.tiny_meshes, 1);
}

#[test]
fn test_collider_and_lightmap_for_regular_mesh() {
    let (_, scene) = run(&two_material_tree(), ImportSettings::default(), &[]).unwrap();

    let entity = &scene.entities[0];
    let collision = entity.collision.as_ref().unwrap();
    assert_eq!(collision.name, "worldspawn_1_collision");
    assert_eq!(collision.triangles.len(), 2);
    assert_eq!(collision.vertices.len(), 6);
    let lightmap = entity.lightmap.unwrap();
    assert_relative_eq!(lightmap.padding, 2.0);
}

#[test]
fn test_collision_merge_drops_collapsed_triangles() {
    let tree = TreeBuilder::new().face_quad("brick", 0.0, 1.0).leaf(0, 1).build();
    let settings = ImportSettings::default().with_collision_simplification(true, 1.5);
    let (report, scene) = run(&tree, settings, &[]).unwrap();

    let collision = scene.entities[0].collision.as_ref().unwrap();
    assert!(collision.is_empty());
    assert_eq!(collision.dropped_triangles, 2);
    assert_eq!(report.degenerate_triangles, 2);
    assert_eq!(report.merged_collision_vertices, 3);
}

#[test]
fn test_collision_triangles_have_distinct_indices() {
    let tree = TreeBuilder::new()
        .face_quad("brick", 0.0, 1.0)
        .face_quad("brick", 0.005, 1.0)
        .face_triangle("stone", 3.0, 1.0)
        .leaf(0, 3)
        .build();
    let (_, scene) = run(&tree, ImportSettings::default(), &[]).unwrap();

    let collision = scene.entities[0].collision.as_ref().unwrap();
    assert!(!collision.is_empty());
    for [a, b, c] in &collision.triangles {
        assert!(a != b && b != c && a != c);
    }
}

#[test]
fn test_disabled_simplification_copies_render_mesh() {
    let tree = TreeBuilder::new()
        .face_quad("brick", 0.0, 1.0)
        .face_quad("brick", 0.005, 1.0)
        .leaf(0, 2)
        .build();
    let settings = ImportSettings::default().with_collision_simplification(false, 0.01);
    let (report, scene) = run(&tree, settings, &[]).unwrap();

    let entity = &scene.entities[0];
    let collision = entity.collision.as_ref().unwrap();
    assert_eq!(collision.vertices, entity.mesh.positions);
    assert_eq!(collision.triangles.len(), entity.mesh.triangle_count());
    assert_eq!(report.merged_collision_vertices, 0);
}

#[test]
fn test_smoothing_averages_seam_normals() {
    let mut tree = TreeBuilder::new()
        .face_triangle("brick", 0.0, 2.0)
        .face_triangle("brick", 0.0, 2.0)
        .leaf(0, 2)
        .build();
    let tilt = 10.0 * PI / 180.0;
    for vertex in &mut tree.vertices[3..] {
        vertex.normal = Vec3::new(0.0, tilt.cos(), tilt.sin());
    }

    let smoothed = ImportSettings::default().with_smoothing_angle(45.0);
    let (_, scene) = run(&tree, smoothed, &[]).unwrap();
    let mesh = &scene.entities[0].mesh;
    assert_eq!(mesh.vertex_count(), 6);
    assert_relative_eq!(
        mesh.normals[0],
        Vec3::new(0.0, (1.0 + tilt.cos()) / 2.0, tilt.sin() / 2.0),
        epsilon = 1e-5
    );

    let (_, scene) = run(&tree, ImportSettings::default(), &[]).unwrap();
    assert_relative_eq!(scene.entities[0].mesh.normals[0], Vec3::new(0.0, 1.0, 0.0));
}

#[test]
fn test_entity_model_is_rotated_and_named() {
    let tree = TreeBuilder::new()
        .leaf_with_triangle("brick", 0.0, 2.0)
        .face_triangle("stone", 10.0, 2.0)
        .model(1, 1)
        .build();
    let rotation = Quat::from_axis_angle(&Vec3::y_axis(), PI / 2.0);
    let models = [ModelRequest::new(0, "door", Vec3::new(10.0, 0.0, 0.0)).with_rotation(rotation)];
    let (report, scene) = run(&tree, ImportSettings::default(), &models).unwrap();

    assert_eq!(report.meshes_built, 1);
    assert_eq!(report.model_meshes_built, 1);

    let door = scene.entity("door").unwrap();
    assert_eq!(door.mesh.name, "door_2_mesh");
    assert_eq!(door.rotation, Some(rotation));
    assert_relative_eq!(door.mesh.positions[0], Vec3::zeros(), epsilon = 1e-5);
    assert_relative_eq!(door.mesh.positions[1], Vec3::new(0.0, 0.0, -2.0), epsilon = 1e-5);
    assert_relative_eq!(door.mesh.normals[0], Vec3::new(0.0, 1.0, 0.0), epsilon = 1e-5);
    assert!(door.lightmap.is_some());
}

#[test]
fn test_dynamic_model_gets_no_lightmap() {
    let tree = TreeBuilder::new().face_triangle("stone", 0.0, 2.0).model(0, 1).build();
    let models = [ModelRequest::new(0, "platform", Vec3::zeros()).dynamic()];
    let (_, scene) = run(&tree, ImportSettings::default(), &models).unwrap();

    let platform = &scene.entities[0];
    assert!(!platform.is_static);
    assert!(platform.lightmap.is_none());
    assert!(platform.collision.is_some());
}

#[test]
fn test_cyclic_tree_aborts_before_output() {
    let mut tree = two_material_tree();
    tree.nodes.push(tree.nodes[0].clone());
    tree.nodes[0].children = [NodeRef::Node(1), NodeRef::Leaf(0)];
    tree.nodes[1].children = [NodeRef::Node(0), NodeRef::Leaf(1)];

    let materials = resolve;
    let mesher = LevelMesher::new(ImportSettings::default(), &materials).unwrap();
    let mut scene = SceneCollector::new();
    let result = mesher.import(&tree, &[], &mut scene);

    assert!(matches!(result, Err(MeshError::CyclicTree { .. })));
    assert!(scene.entities.is_empty());
}

#[test]
fn test_bad_face_range_is_fatal() {
    let tree = TreeBuilder::new()
        .leaf_with_triangle("brick", 0.0, 2.0)
        .leaf(5, 1)
        .split_leaves(0, 1)
        .build();
    let result = run(&tree, ImportSettings::default(), &[]);
    assert!(matches!(result, Err(MeshError::FaceOutOfRange { .. })));
}

#[test]
fn test_unknown_model_is_fatal() {
    let tree = two_material_tree();
    let models = [ModelRequest::new(3, "ghost", Vec3::zeros())];
    let result = run(&tree, ImportSettings::default(), &models);
    assert!(matches!(result, Err(MeshError::ModelOutOfRange { index: 3, .. })));
}

#[test]
fn test_invalid_settings_rejected() {
    let settings = ImportSettings::default().with_skip_texture_marker("");
    let result = run(&two_material_tree(), settings, &[]);
    assert!(matches!(result, Err(MeshError::Config(_))));
}

#[test]
fn test_empty_tree_builds_nothing() {
    let (report, scene) = run(&BspTree::default(), ImportSettings::default(), &[]).unwrap();
    assert_eq!(report, BuildReport::default());
    assert!(scene.entities.is_empty());
}
