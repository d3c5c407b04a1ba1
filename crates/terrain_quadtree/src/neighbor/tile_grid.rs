//! TileGrid - several terrain trees laid out on an integer tile grid.
//!
//! Tile `(x, z)` borders `(x + 1, z)` on its right and `(x, z + 1)` below.
//! Every tree is keyed by its configured tile, so neighbor searches that run
//! off one tree continue into the adjacent one.

use std::collections::HashMap;

use glam::IVec2;

use super::resolver::{NeighborFinder, NeighborResolver};
use crate::direction::Direction;
use crate::lod::{PatchKey, UpdateMap};
use crate::quadtree::{NodeRef, PatchRef, QuadTree};

#[derive(Clone, Debug, Default)]
pub struct TileGrid {
  tiles: HashMap<IVec2, QuadTree>,
}

impl TileGrid {
  pub fn new() -> Self {
    Self::default()
  }

  /// Insert a tree at its configured tile, returning the tree it replaces.
  pub fn insert(&mut self, tree: QuadTree) -> Option<QuadTree> {
    let tile = tree.tile();
    let replaced = self.tiles.insert(tile, tree);
    tracing::debug!(?tile, replaced = replaced.is_some(), "inserted terrain tile");
    replaced
  }

  pub fn remove(&mut self, tile: IVec2) -> Option<QuadTree> {
    self.tiles.remove(&tile)
  }

  #[inline]
  pub fn get(&self, tile: IVec2) -> Option<&QuadTree> {
    self.tiles.get(&tile)
  }

  #[inline]
  pub fn get_mut(&mut self, tile: IVec2) -> Option<&mut QuadTree> {
    self.tiles.get_mut(&tile)
  }

  #[inline]
  pub fn len(&self) -> usize {
    self.tiles.len()
  }

  #[inline]
  pub fn is_empty(&self) -> bool {
    self.tiles.is_empty()
  }

  pub fn trees(&self) -> impl Iterator<Item = &QuadTree> + '_ {
    self.tiles.values()
  }

  #[inline]
  pub(crate) fn tiles(&self) -> &HashMap<IVec2, QuadTree> {
    &self.tiles
  }

  /// Patch named by `key`, in whichever tile it lives.
  pub fn patch(&self, key: PatchKey) -> Option<PatchRef<'_>> {
    self.get(key.tile)?.patch_by_path(key.path)
  }

  /// Resolver that crosses tile borders through this grid.
  pub fn resolver(&self) -> NeighborResolver<'_> {
    NeighborResolver::new(self)
  }

  /// Apply a pass's updates to every tile they address.
  pub fn apply_updates(&mut self, updates: &UpdateMap) -> usize {
    self
      .tiles
      .values_mut()
      .map(|tree| tree.apply_updates(updates))
      .sum()
  }

  fn adjacent_root(&self, root: NodeRef<'_>, direction: Direction) -> Option<NodeRef<'_>> {
    let tile = root.tree().tile() + direction.tile_offset();
    self.tiles.get(&tile).map(QuadTree::root)
  }
}

impl NeighborFinder for TileGrid {
  fn right_of<'t>(&'t self, root: NodeRef<'_>) -> Option<NodeRef<'t>> {
    self.adjacent_root(root, Direction::Right)
  }

  fn left_of<'t>(&'t self, root: NodeRef<'_>) -> Option<NodeRef<'t>> {
    self.adjacent_root(root, Direction::Left)
  }

  fn above<'t>(&'t self, root: NodeRef<'_>) -> Option<NodeRef<'t>> {
    self.adjacent_root(root, Direction::Top)
  }

  fn below<'t>(&'t self, root: NodeRef<'_>) -> Option<NodeRef<'t>> {
    self.adjacent_root(root, Direction::Down)
  }
}

#[cfg(test)]
#[path = "tile_grid_test.rs"]
mod tile_grid_test;
