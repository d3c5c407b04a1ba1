use super::*;
use crate::lod::{PatchKey, UpdatePending};
use crate::test_utils::{nested_tree, path};

// =========================================================================
// Manual assembly
// =========================================================================

#[test]
fn test_with_root_holds_single_quad() {
  let tree = QuadTree::with_root(TerrainConfig::SMALL, 9);
  assert_eq!(tree.len(), 1);
  assert!(!tree.is_empty());
  assert_eq!(tree.total_size(), 9);
  assert!(tree.root().is_root());
  assert!(!tree.root().is_patch());
  assert_eq!(tree.root().child_count(), 0);
  assert_eq!(tree.patch_count(), 0);
}

#[test]
fn test_attach_indexes_paths() {
  let mut tree = QuadTree::with_root(TerrainConfig::SMALL, 9);
  let quad = tree.attach_quad(QuadTree::ROOT, 2, 5).unwrap();
  let leaf = tree.attach_patch(quad, 3, Patch::flat(3)).unwrap();

  assert_eq!(tree.find_by_path(path("2")).unwrap().id(), quad);
  assert_eq!(tree.patch_by_path(path("23")).unwrap().id(), leaf);
  assert!(tree.patch_by_path(path("2")).is_none());
  assert!(tree.find_by_path(path("1")).is_none());

  let node = tree.node(leaf).unwrap();
  assert_eq!(node.parent().unwrap().id(), quad);
  assert_eq!(node.quadrant(), 3);
}

#[test]
fn test_attach_rejects_duplicate_quadrant() {
  let mut tree = QuadTree::with_root(TerrainConfig::SMALL, 5);
  tree.attach_patch(QuadTree::ROOT, 1, Patch::flat(3)).unwrap();
  let err = tree
    .attach_patch(QuadTree::ROOT, 1, Patch::flat(3))
    .unwrap_err();
  assert!(matches!(err, TerrainError::InvalidArgument(_)));
  assert_eq!(tree.root().child_count(), 1);
}

#[test]
fn test_attach_rejects_invalid_quadrant() {
  let mut tree = QuadTree::with_root(TerrainConfig::SMALL, 5);
  for quadrant in [0, 5, 7] {
    let err = tree.attach_quad(QuadTree::ROOT, quadrant, 3).unwrap_err();
    assert!(matches!(err, TerrainError::InvalidArgument(_)));
  }
  assert_eq!(tree.len(), 1);
}

#[test]
fn test_attach_rejects_patch_parent() {
  let mut tree = QuadTree::with_root(TerrainConfig::SMALL, 5);
  let leaf = tree.attach_patch(QuadTree::ROOT, 4, Patch::flat(3)).unwrap();
  let err = tree.attach_quad(leaf, 1, 3).unwrap_err();
  assert!(matches!(err, TerrainError::InvalidArgument(_)));
}

#[test]
fn test_attach_rejects_oversized_child() {
  let mut tree = QuadTree::with_root(TerrainConfig::SMALL, 3);
  let err = tree.attach_quad(QuadTree::ROOT, 3, 100).unwrap_err();
  assert!(matches!(err, TerrainError::InvalidArgument(_)));
  assert!(tree.attach_quad(QuadTree::ROOT, 1, 0).is_err());

  let quad = tree.attach_quad(QuadTree::ROOT, 3, 2).unwrap();
  assert!(tree.attach_quad(quad, 3, 50).is_err());
  assert!(tree.attach_patch(quad, 1, Patch::flat(3)).is_err());
  assert_eq!(tree.len(), 2);
  assert_eq!(tree.heightmap(), vec![0.0; 9]);
}

#[test]
fn test_attach_accepts_half_size_child_of_odd_parent() {
  let mut tree = QuadTree::with_root(TerrainConfig::SMALL, 9);
  assert!(tree.attach_quad(QuadTree::ROOT, 4, 5).is_ok());
  assert!(tree.attach_quad(QuadTree::ROOT, 1, 6).is_err());
}

#[test]
fn test_attach_rejects_unknown_parent() {
  let mut tree = QuadTree::with_root(TerrainConfig::SMALL, 5);
  let err = tree.attach_quad(NodeId(42), 1, 3).unwrap_err();
  assert!(matches!(err, TerrainError::InvalidArgument(_)));
}

#[test]
fn test_node_lookup_checks_arena() {
  let tree = nested_tree(1);
  assert!(tree.node(NodeId(4)).is_ok());
  assert!(matches!(
    tree.node(NodeId(5)).unwrap_err(),
    TerrainError::InvalidArgument(_)
  ));
}

#[test]
fn test_patches_iterates_leaves_only() {
  let tree = nested_tree(2);
  let paths: Vec<String> = tree.patches().map(|p| p.path().to_string()).collect();
  assert_eq!(paths.len(), 16);
  assert!(paths.iter().all(|p| p.len() == 2));
}

// =========================================================================
// apply_updates
// =========================================================================

#[test]
fn test_apply_updates_sets_lod_and_edges() {
  let mut tree = nested_tree(1);
  let mut updates = crate::lod::UpdateMap::new();
  {
    let patch = tree.patch_by_path(path("1")).unwrap();
    let mut update = UpdatePending::new(patch, 1);
    update.set_edge_lod(Direction::Right, 1);
    updates.insert(patch.key(), update);
  }

  assert_eq!(tree.apply_updates(&updates), 1);

  let patch = tree.patch_by_path(path("1")).unwrap().patch();
  assert_eq!(patch.lod(), 1);
  assert_eq!(patch.edge_lod(Direction::Right), 1);
  assert_eq!(patch.edge_lod(Direction::Left), 0);
}

#[test]
fn test_apply_updates_keeps_unconstrained_edges() {
  let mut tree = nested_tree(1);
  let mut first = crate::lod::UpdateMap::new();
  {
    let patch = tree.patch_by_path(path("3")).unwrap();
    let mut update = UpdatePending::unchanged(patch);
    update.set_edge_lod(Direction::Left, 2);
    first.insert(patch.key(), update);
  }
  tree.apply_updates(&first);

  let mut second = crate::lod::UpdateMap::new();
  {
    let patch = tree.patch_by_path(path("3")).unwrap();
    second.insert(patch.key(), UpdatePending::new(patch, 1));
  }
  tree.apply_updates(&second);

  let patch = tree.patch_by_path(path("3")).unwrap().patch();
  assert_eq!(patch.lod(), 1);
  assert_eq!(patch.edge_lod(Direction::Left), 2);
}

#[test]
fn test_apply_updates_skips_other_tiles_and_unknown_paths() {
  let mut tree = nested_tree(1);
  let template = {
    let patch = tree.patch_by_path(path("2")).unwrap();
    UpdatePending::new(patch, 1)
  };

  let mut updates = crate::lod::UpdateMap::new();
  for key in [
    PatchKey::new(glam::IVec2::new(1, 0), path("2")),
    PatchKey::new(glam::IVec2::ZERO, path("44")),
  ] {
    let mut update = template.clone();
    update.key = key;
    updates.insert(key, update);
  }

  assert_eq!(tree.apply_updates(&updates), 0);
  assert!(tree.patches().all(|p| p.lod() == 0));
}
