use super::*;
use crate::lod::UpdatePending;
use crate::test_utils::{nested_tree_at, path};

/// 2x2 tiles, each one quad level deep.
fn square_grid() -> TileGrid {
  let mut grid = TileGrid::new();
  for z in 0..2 {
    for x in 0..2 {
      grid.insert(nested_tree_at(1, IVec2::new(x, z)));
    }
  }
  grid
}

#[test]
fn test_insert_keys_trees_by_tile() {
  let mut grid = square_grid();
  assert_eq!(grid.len(), 4);
  assert!(!grid.is_empty());
  assert_eq!(grid.get(IVec2::new(1, 1)).unwrap().tile(), IVec2::new(1, 1));
  assert!(grid.get(IVec2::new(2, 0)).is_none());

  assert!(grid.insert(nested_tree_at(1, IVec2::ZERO)).is_some());
  assert_eq!(grid.len(), 4);
  assert!(grid.remove(IVec2::ZERO).is_some());
  assert_eq!(grid.trees().count(), 3);
}

#[test]
fn test_finder_returns_adjacent_roots() {
  let grid = square_grid();
  let origin = grid.get(IVec2::ZERO).unwrap().root();

  assert_eq!(grid.right_of(origin).map(|n| n.tree().tile()), Some(IVec2::new(1, 0)));
  assert_eq!(grid.below(origin).map(|n| n.tree().tile()), Some(IVec2::new(0, 1)));
  assert_eq!(grid.left_of(origin), None);
  assert_eq!(grid.above(origin), None);

  let corner = grid.get(IVec2::new(1, 1)).unwrap().root();
  assert_eq!(grid.above(corner).map(|n| n.tree().tile()), Some(IVec2::new(1, 0)));
  assert_eq!(grid.left_of(corner).map(|n| n.tree().tile()), Some(IVec2::new(0, 1)));
}

#[test]
fn test_patch_search_crosses_tiles() {
  let grid = square_grid();
  let resolver = grid.resolver();
  let key = |x, z, digits| PatchKey::new(IVec2::new(x, z), path(digits));

  let p = grid.patch(key(0, 0, "3")).unwrap();
  let east = resolver.find_patch(p, Direction::Right).unwrap();
  assert_eq!(east.key(), key(1, 0, "1"));

  let p = grid.patch(key(0, 0, "4")).unwrap();
  let south = resolver.find_patch(p, Direction::Down).unwrap();
  assert_eq!(south.key(), key(0, 1, "3"));

  let p = grid.patch(key(1, 1, "1")).unwrap();
  assert_eq!(
    resolver.find_patch(p, Direction::Top).unwrap().key(),
    key(1, 0, "2")
  );
  assert_eq!(
    resolver.find_patch(p, Direction::Left).unwrap().key(),
    key(0, 1, "3")
  );

  // outer border of the grid
  let p = grid.patch(key(1, 0, "3")).unwrap();
  assert_eq!(resolver.find_patch(p, Direction::Right), None);
}

#[test]
fn test_cross_tile_search_is_involutive() {
  let grid = square_grid();
  let resolver = grid.resolver();
  let mut pairs = 0;

  for tree in grid.trees() {
    for patch in tree.patches() {
      for direction in Direction::ALL {
        if let Some(neighbor) = resolver.find_patch(patch, direction) {
          assert_eq!(resolver.find_patch(neighbor, direction.opposite()), Some(patch));
          pairs += 1;
        }
      }
    }
  }
  // 4x4 patches over the whole grid
  assert_eq!(pairs, 2 * 2 * 4 * 3);
}

#[test]
fn test_apply_updates_dispatches_by_tile() {
  let mut grid = square_grid();
  let mut updates = UpdateMap::new();
  for tile in [IVec2::ZERO, IVec2::new(1, 1)] {
    let patch = grid
      .patch(PatchKey::new(tile, path("2")))
      .unwrap();
    updates.insert(patch.key(), UpdatePending::new(patch, 1));
  }

  assert_eq!(grid.apply_updates(&updates), 2);
  for tile in [IVec2::ZERO, IVec2::new(1, 1)] {
    assert_eq!(grid.patch(PatchKey::new(tile, path("2"))).unwrap().lod(), 1);
  }
  assert_eq!(
    grid.patch(PatchKey::new(IVec2::new(1, 0), path("2"))).unwrap().lod(),
    0
  );
}
