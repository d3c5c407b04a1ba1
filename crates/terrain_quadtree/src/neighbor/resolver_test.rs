use std::sync::atomic::{AtomicUsize, Ordering};

use glam::IVec2;

use super::*;
use crate::test_utils::{nested_tree, nested_tree_at, path};

/// Finder that places a single other tree to the right of every root.
struct EastOnly<'a> {
  east: &'a QuadTree,
  calls: AtomicUsize,
}

impl<'a> EastOnly<'a> {
  fn new(east: &'a QuadTree) -> Self {
    Self {
      east,
      calls: AtomicUsize::new(0),
    }
  }
}

impl NeighborFinder for EastOnly<'_> {
  fn right_of<'t>(&'t self, _root: NodeRef<'_>) -> Option<NodeRef<'t>> {
    self.calls.fetch_add(1, Ordering::Relaxed);
    Some(self.east.root())
  }

  fn left_of<'t>(&'t self, _root: NodeRef<'_>) -> Option<NodeRef<'t>> {
    self.calls.fetch_add(1, Ordering::Relaxed);
    None
  }

  fn above<'t>(&'t self, _root: NodeRef<'_>) -> Option<NodeRef<'t>> {
    self.calls.fetch_add(1, Ordering::Relaxed);
    None
  }

  fn below<'t>(&'t self, _root: NodeRef<'_>) -> Option<NodeRef<'t>> {
    self.calls.fetch_add(1, Ordering::Relaxed);
    None
  }
}

// =========================================================================
// Quads
// =========================================================================

#[test]
fn test_sibling_quads_to_the_right() {
  let tree = nested_tree(2);
  let resolver = NeighborResolver::local();
  let root = tree.root();
  let child = |q| root.get_quad(q).unwrap();

  assert_eq!(resolver.find_quad(child(1), Direction::Right), Some(child(3)));
  assert_eq!(resolver.find_quad(child(2), Direction::Right), Some(child(4)));
  assert_eq!(resolver.find_quad(child(3), Direction::Right), None);
  assert_eq!(resolver.find_quad(child(4), Direction::Right), None);
}

#[test]
fn test_sibling_quads_in_every_direction() {
  let tree = nested_tree(2);
  let resolver = NeighborResolver::local();
  let root = tree.root();
  let child = |q| root.get_quad(q).unwrap();

  assert_eq!(resolver.find_quad(child(1), Direction::Down), Some(child(2)));
  assert_eq!(resolver.find_quad(child(4), Direction::Left), Some(child(2)));
  assert_eq!(resolver.find_quad(child(4), Direction::Top), Some(child(3)));
  assert_eq!(resolver.find_quad(child(1), Direction::Top), None);
  assert_eq!(resolver.find_quad(child(1), Direction::Left), None);
}

#[test]
fn test_quads_across_parent_boundary() {
  let tree = nested_tree(3);
  let resolver = NeighborResolver::local();
  let quad = |digits| tree.find_by_path(path(digits)).unwrap();

  assert_eq!(resolver.find_quad(quad("13"), Direction::Right), Some(quad("31")));
  assert_eq!(resolver.find_quad(quad("14"), Direction::Down), Some(quad("23")));
  assert_eq!(resolver.find_quad(quad("41"), Direction::Left), Some(quad("23")));
  assert_eq!(resolver.find_quad(quad("42"), Direction::Top), Some(quad("41")));
  assert_eq!(resolver.find_quad(quad("21"), Direction::Top), Some(quad("12")));
}

#[test]
fn test_root_has_no_local_neighbor() {
  let tree = nested_tree(1);
  let resolver = NeighborResolver::local();
  for direction in Direction::ALL {
    assert_eq!(resolver.find_quad(tree.root(), direction), None);
  }
}

#[test]
fn test_find_quad_is_involutive() {
  let tree = nested_tree(3);
  let resolver = NeighborResolver::local();
  let mut pairs = 0;

  for index in 0..tree.len() {
    let node = tree.node(NodeId(index as u32)).unwrap();
    if node.is_patch() {
      continue;
    }
    for direction in Direction::ALL {
      if let Some(neighbor) = resolver.find_quad(node, direction) {
        assert_eq!(
          resolver.find_quad(neighbor, direction.opposite()),
          Some(node),
          "{:?} {:?}",
          node.path(),
          direction
        );
        pairs += 1;
      }
    }
  }
  // 2x2 grid: 4 shared edges, 4x4 grid: 24, each counted from both sides
  assert_eq!(pairs, 2 * (4 + 24));
}

// =========================================================================
// Patches
// =========================================================================

#[test]
fn test_patch_neighbors_within_and_across_quads() {
  let tree = nested_tree(2);
  let resolver = NeighborResolver::local();
  let patch = |digits| tree.patch_by_path(path(digits)).unwrap();

  assert_eq!(resolver.find_patch(patch("11"), Direction::Right), Some(patch("13")));
  assert_eq!(resolver.find_patch(patch("13"), Direction::Right), Some(patch("31")));
  assert_eq!(resolver.find_patch(patch("14"), Direction::Right), Some(patch("32")));
  assert_eq!(resolver.find_patch(patch("12"), Direction::Down), Some(patch("21")));
  assert_eq!(resolver.find_patch(patch("22"), Direction::Top), Some(patch("21")));
  assert_eq!(resolver.find_patch(patch("21"), Direction::Top), Some(patch("12")));
  assert_eq!(resolver.find_patch(patch("11"), Direction::Left), None);
  assert_eq!(resolver.find_patch(patch("44"), Direction::Down), None);
}

#[test]
fn test_find_patch_is_involutive() {
  let tree = nested_tree(3);
  let resolver = NeighborResolver::local();
  let mut pairs = 0;

  for patch in tree.patches() {
    for direction in Direction::ALL {
      if let Some(neighbor) = resolver.find_patch(patch, direction) {
        assert_eq!(resolver.find_patch(neighbor, direction.opposite()), Some(patch));
        pairs += 1;
      }
    }
  }
  // 8x8 patch grid: 2 * 8 * 7 shared edges, counted from both sides
  assert_eq!(pairs, 2 * 2 * 8 * 7);
}

#[test]
fn test_patch_neighbors_array() {
  let tree = nested_tree(1);
  let resolver = NeighborResolver::local();
  let neighbors = resolver.patch_neighbors(tree.patch_by_path(path("1")).unwrap());

  assert_eq!(neighbors[Direction::Right.index()].map(|p| p.quadrant()), Some(3));
  assert_eq!(neighbors[Direction::Down.index()].map(|p| p.quadrant()), Some(2));
  assert!(neighbors[Direction::Left.index()].is_none());
  assert!(neighbors[Direction::Top.index()].is_none());
}

// =========================================================================
// Raw ids and direction codes
// =========================================================================

#[test]
fn test_unknown_direction_codes_have_no_neighbor() {
  let tree = nested_tree(2);
  let resolver = NeighborResolver::local();
  let quad = tree.find_by_path(path("1")).unwrap().id();
  let patch = tree.find_by_path(path("11")).unwrap().id();

  for code in [-1, 4, 7, i32::MAX] {
    assert_eq!(resolver.find_quad_by_id(&tree, QuadTree::ROOT, code), Ok(None));
    assert_eq!(resolver.find_quad_by_id(&tree, quad, code), Ok(None));
    assert_eq!(resolver.find_patch_by_id(&tree, patch, code), Ok(None));
  }
  assert!(resolver.find_quad_by_id(&tree, quad, 0).unwrap().is_some());
}

#[test]
fn test_missing_or_mismatched_nodes_are_invalid() {
  let tree = nested_tree(1);
  let resolver = NeighborResolver::local();
  let patch = tree.find_by_path(path("1")).unwrap().id();

  assert!(matches!(
    resolver.find_quad_by_id(&tree, NodeId(99), 0),
    Err(TerrainError::InvalidArgument(_))
  ));
  assert!(matches!(
    resolver.find_patch_by_id(&tree, NodeId(99), 0),
    Err(TerrainError::InvalidArgument(_))
  ));
  assert!(matches!(
    resolver.find_patch_by_id(&tree, QuadTree::ROOT, 0),
    Err(TerrainError::InvalidArgument(_))
  ));
  assert!(matches!(
    resolver.find_quad_by_id(&tree, patch, 0),
    Err(TerrainError::InvalidArgument(_))
  ));
}

// =========================================================================
// Finder at the root
// =========================================================================

#[test]
fn test_finder_is_consulted_only_at_roots() {
  let west = nested_tree_at(1, IVec2::ZERO);
  let east = nested_tree_at(1, IVec2::new(1, 0));
  let finder = EastOnly::new(&east);
  let resolver = NeighborResolver::new(&finder);
  assert!(resolver.has_finder());

  let patch = |digits| west.patch_by_path(path(digits)).unwrap();
  assert_eq!(resolver.find_patch(patch("1"), Direction::Right), Some(patch("3")));
  assert_eq!(finder.calls.load(Ordering::Relaxed), 0);

  let across = resolver.find_patch(patch("4"), Direction::Right).unwrap();
  assert_eq!(across, east.patch_by_path(path("2")).unwrap());
  assert_eq!(finder.calls.load(Ordering::Relaxed), 1);

  assert_eq!(resolver.find_patch(patch("3"), Direction::Top), None);
  assert_eq!(finder.calls.load(Ordering::Relaxed), 2);
}

#[test]
fn test_finder_neighbor_of_dispatches_by_direction() {
  let west = nested_tree(1);
  let east = nested_tree_at(1, IVec2::new(1, 0));
  let finder = EastOnly::new(&east);

  assert_eq!(finder.neighbor_of(west.root(), Direction::Right), Some(east.root()));
  for direction in [Direction::Down, Direction::Left, Direction::Top] {
    assert_eq!(finder.neighbor_of(west.root(), direction), None);
  }
}
