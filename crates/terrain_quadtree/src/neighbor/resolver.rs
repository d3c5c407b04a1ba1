//! NeighborResolver - finds the node across one edge of another node.
//!
//! Stepping out of a quadrant either lands on a sibling, or crosses the
//! parent's edge. A crossing step first resolves the parent's neighbor in the
//! same direction, then descends into the mirrored quadrant on the far side:
//!
//! ```text
//!   parent A        parent B = find_quad(A, Right)
//!   ┌───┬───┐       ┌───┬───┐
//!   │ 1 │ 3 │ ───►  │ 1 │ 3 │      3 in A, Right  =>  1 in B
//!   ├───┼───┤       ├───┼───┤      4 in A, Right  =>  2 in B
//!   │ 2 │ 4 │ ───►  │ 2 │ 4 │
//!   └───┴───┘       └───┴───┘
//! ```
//!
//! At a root the search is handed to an optional [`NeighborFinder`], which
//! knows how tiles are laid out. Without one, root edges have no neighbor.

use crate::direction::{step, Direction, Step};
use crate::error::{Result, TerrainError};
use crate::quadtree::{NodeId, NodeRef, PatchRef, QuadTree};

/// Cross-tile lookup, consulted only when a search leaves a tree's root.
pub trait NeighborFinder: Sync {
  /// Root of the tree to the right (+x) of `root`'s tree.
  fn right_of<'t>(&'t self, root: NodeRef<'_>) -> Option<NodeRef<'t>>;

  /// Root of the tree to the left (-x).
  fn left_of<'t>(&'t self, root: NodeRef<'_>) -> Option<NodeRef<'t>>;

  /// Root of the tree above (-z).
  fn above<'t>(&'t self, root: NodeRef<'_>) -> Option<NodeRef<'t>>;

  /// Root of the tree below (+z).
  fn below<'t>(&'t self, root: NodeRef<'_>) -> Option<NodeRef<'t>>;

  fn neighbor_of<'t>(&'t self, root: NodeRef<'_>, direction: Direction) -> Option<NodeRef<'t>> {
    match direction {
      Direction::Right => self.right_of(root),
      Direction::Down => self.below(root),
      Direction::Left => self.left_of(root),
      Direction::Top => self.above(root),
    }
  }
}

/// Pure read-only neighbor search over one tree, or several stitched trees.
#[derive(Clone, Copy, Default)]
pub struct NeighborResolver<'t> {
  finder: Option<&'t dyn NeighborFinder>,
}

impl<'t> NeighborResolver<'t> {
  /// Resolver that consults `finder` at tree roots.
  pub fn new(finder: &'t dyn NeighborFinder) -> Self {
    Self {
      finder: Some(finder),
    }
  }

  /// Resolver confined to a single tree.
  pub fn local() -> Self {
    Self { finder: None }
  }

  #[inline]
  pub fn has_finder(&self) -> bool {
    self.finder.is_some()
  }

  /// Quad adjacent to `node` across its `direction` edge.
  pub fn find_quad(&self, node: NodeRef<'t>, direction: Direction) -> Option<NodeRef<'t>> {
    if node.is_patch() {
      return None;
    }
    self
      .find_node(node, direction)
      .filter(|neighbor| !neighbor.is_patch())
  }

  /// Patch adjacent to `patch` across its `direction` edge.
  ///
  /// Inside the parent quad this is a sibling lookup; crossing the parent's
  /// edge resolves the parent's neighbor quad and takes the mirrored patch.
  pub fn find_patch(&self, patch: PatchRef<'t>, direction: Direction) -> Option<PatchRef<'t>> {
    self
      .find_node(patch.node(), direction)
      .and_then(NodeRef::as_patch)
  }

  /// `find_quad` over a raw node id and direction code.
  ///
  /// Unknown ids and patches are `InvalidArgument`; a direction outside
  /// `0..=3` is simply no neighbor.
  pub fn find_quad_by_id(
    &self,
    tree: &'t QuadTree,
    id: NodeId,
    direction: i32,
  ) -> Result<Option<NodeRef<'t>>> {
    let node = tree.node(id)?;
    if node.is_patch() {
      return Err(TerrainError::InvalidArgument(format!(
        "node {:?} is a patch, not a quad",
        node.path()
      )));
    }
    Ok(Direction::from_index(direction).and_then(|direction| self.find_quad(node, direction)))
  }

  /// `find_patch` over a raw node id and direction code.
  pub fn find_patch_by_id(
    &self,
    tree: &'t QuadTree,
    id: NodeId,
    direction: i32,
  ) -> Result<Option<PatchRef<'t>>> {
    let node = tree.node(id)?;
    let patch = node.as_patch().ok_or_else(|| {
      TerrainError::InvalidArgument(format!("node {:?} is a quad, not a patch", node.path()))
    })?;
    Ok(Direction::from_index(direction).and_then(|direction| self.find_patch(patch, direction)))
  }

  /// All four neighbors of a patch, indexed by `Direction`.
  pub fn patch_neighbors(&self, patch: PatchRef<'t>) -> [Option<PatchRef<'t>>; 4] {
    Direction::ALL.map(|direction| self.find_patch(patch, direction))
  }

  fn find_node(&self, node: NodeRef<'t>, direction: Direction) -> Option<NodeRef<'t>> {
    let Some(parent) = node.parent() else {
      return self
        .finder
        .and_then(|finder| finder.neighbor_of(node, direction));
    };
    match step(node.quadrant(), direction)? {
      Step::Sibling(quadrant) => parent.child(quadrant),
      Step::Cross(mirrored) => self.find_node(parent, direction)?.child(mirrored),
    }
  }
}

impl std::fmt::Debug for NeighborResolver<'_> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("NeighborResolver")
      .field("has_finder", &self.finder.is_some())
      .finish()
  }
}

#[cfg(test)]
#[path = "resolver_test.rs"]
mod resolver_test;
