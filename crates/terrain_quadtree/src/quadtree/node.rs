//! SpatialNode - arena-stored quadtree node, plus borrowed views into a tree.
//!
//! A node is either a quad (up to four children, exactly four once fully
//! built) or a patch holding a height sub-grid. Ownership flows strictly from
//! the tree arena; children name their parent by `NodeId` for upward search.

use std::fmt;
use std::str::FromStr;

use glam::{UVec2, Vec2, Vec3};
use smallvec::SmallVec;

use super::patch::Patch;
use super::tree::QuadTree;
use crate::error::TerrainError;
use crate::lod::PatchKey;

/// Index of a node in its tree's arena.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
  #[inline]
  pub fn index(self) -> usize {
    self.0 as usize
  }
}

// =============================================================================
// NodePath - quadrant digits from the root
// =============================================================================

/// Quadrant digits from the root to a node, packed 3 bits per level.
///
/// The root has the empty path. Displays as the digit string, so the patch
/// in quadrant 1 of the root's quadrant 2 is `"21"`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct NodePath {
  code: u64,
  depth: u8,
}

impl NodePath {
  pub const ROOT: Self = Self { code: 0, depth: 0 };

  /// Deepest path that fits the packed representation.
  pub const MAX_DEPTH: u8 = 21;

  /// Path of the child in `quadrant` (1..=4).
  pub fn child(self, quadrant: u8) -> Option<Self> {
    if !(1..=4).contains(&quadrant) || self.depth >= Self::MAX_DEPTH {
      return None;
    }
    Some(Self {
      code: (self.code << 3) | quadrant as u64,
      depth: self.depth + 1,
    })
  }

  /// Path of the parent; `None` at the root.
  pub fn parent(self) -> Option<Self> {
    if self.depth == 0 {
      return None;
    }
    Some(Self {
      code: self.code >> 3,
      depth: self.depth - 1,
    })
  }

  #[inline]
  pub fn depth(self) -> u8 {
    self.depth
  }

  /// Last quadrant digit, 0 for the root.
  #[inline]
  pub fn quadrant(self) -> u8 {
    (self.code & 0b111) as u8
  }

  #[inline]
  pub fn is_root(self) -> bool {
    self.depth == 0
  }

  /// Digits from the root down.
  pub fn digits(self) -> impl Iterator<Item = u8> {
    (0..self.depth).rev().map(move |level| ((self.code >> (level * 3)) & 0b111) as u8)
  }
}

impl fmt::Display for NodePath {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for digit in self.digits() {
      write!(f, "{}", digit)?;
    }
    Ok(())
  }
}

impl fmt::Debug for NodePath {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "NodePath(\"{}\")", self)
  }
}

impl FromStr for NodePath {
  type Err = TerrainError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    s.bytes().try_fold(NodePath::ROOT, |path, byte| {
      byte
        .checked_sub(b'0')
        .and_then(|quadrant| path.child(quadrant))
        .ok_or_else(|| TerrainError::InvalidArgument(format!("invalid node path {:?}", s)))
    })
  }
}

// =============================================================================
// SpatialNode
// =============================================================================

/// Payload of a node: internal quad or terminal patch.
#[derive(Clone, Debug)]
pub enum NodeKind {
  /// Internal node. Exactly four children once built; fewer only in
  /// hand-assembled partial trees.
  Quad { children: SmallVec<[NodeId; 4]> },
  /// Terminal node.
  Patch(Patch),
}

/// One node of the quadtree arena.
#[derive(Clone, Debug)]
pub struct SpatialNode {
  /// 0 for the root, else 1..=4 within the parent.
  pub(crate) quadrant: u8,
  /// Samples along one edge.
  pub(crate) size: u32,
  pub(crate) parent: Option<NodeId>,
  pub(crate) path: NodePath,
  /// Sample coordinate of this node's first sample in the root raster.
  pub(crate) grid_origin: UVec2,
  /// Translation relative to the parent's center.
  pub(crate) local_translation: Vec3,
  /// Accumulated quadrant offset, in scaled grid units.
  pub(crate) offset: Vec2,
  pub(crate) offset_amount: f32,
  pub(crate) kind: NodeKind,
}

impl SpatialNode {
  #[inline]
  pub fn quadrant(&self) -> u8 {
    self.quadrant
  }

  #[inline]
  pub fn size(&self) -> u32 {
    self.size
  }

  #[inline]
  pub fn parent(&self) -> Option<NodeId> {
    self.parent
  }

  #[inline]
  pub fn path(&self) -> NodePath {
    self.path
  }

  #[inline]
  pub fn grid_origin(&self) -> UVec2 {
    self.grid_origin
  }

  #[inline]
  pub fn local_translation(&self) -> Vec3 {
    self.local_translation
  }

  #[inline]
  pub fn offset(&self) -> Vec2 {
    self.offset
  }

  #[inline]
  pub fn offset_amount(&self) -> f32 {
    self.offset_amount
  }

  #[inline]
  pub fn kind(&self) -> &NodeKind {
    &self.kind
  }

  /// Children of a quad; empty for patches.
  #[inline]
  pub fn children(&self) -> &[NodeId] {
    match &self.kind {
      NodeKind::Quad { children } => children,
      NodeKind::Patch(_) => &[],
    }
  }

  #[inline]
  pub fn as_patch(&self) -> Option<&Patch> {
    match &self.kind {
      NodeKind::Patch(patch) => Some(patch),
      NodeKind::Quad { .. } => None,
    }
  }

  #[inline]
  pub(crate) fn as_patch_mut(&mut self) -> Option<&mut Patch> {
    match &mut self.kind {
      NodeKind::Patch(patch) => Some(patch),
      NodeKind::Quad { .. } => None,
    }
  }

  #[inline]
  pub fn is_patch(&self) -> bool {
    matches!(self.kind, NodeKind::Patch(_))
  }
}

// =============================================================================
// NodeRef / PatchRef - borrowed views
// =============================================================================

/// A node together with the tree that owns it.
///
/// Two refs are equal when they name the same node of the same tree
/// instance, which makes cross-tile results comparable.
#[derive(Clone, Copy)]
pub struct NodeRef<'t> {
  tree: &'t QuadTree,
  id: NodeId,
}

impl<'t> NodeRef<'t> {
  /// Caller guarantees `id` is in the arena.
  #[inline]
  pub(crate) fn new(tree: &'t QuadTree, id: NodeId) -> Self {
    debug_assert!(id.index() < tree.len());
    Self { tree, id }
  }

  #[inline]
  pub fn id(self) -> NodeId {
    self.id
  }

  #[inline]
  pub fn tree(self) -> &'t QuadTree {
    self.tree
  }

  #[inline]
  pub fn node(self) -> &'t SpatialNode {
    self.tree.node_unchecked(self.id)
  }

  #[inline]
  pub fn quadrant(self) -> u8 {
    self.node().quadrant
  }

  #[inline]
  pub fn size(self) -> u32 {
    self.node().size
  }

  #[inline]
  pub fn path(self) -> NodePath {
    self.node().path
  }

  #[inline]
  pub fn is_root(self) -> bool {
    self.node().parent.is_none()
  }

  #[inline]
  pub fn parent(self) -> Option<NodeRef<'t>> {
    self.node().parent.map(|id| NodeRef::new(self.tree, id))
  }

  pub fn children(self) -> impl Iterator<Item = NodeRef<'t>> + 't {
    let tree = self.tree;
    self
      .node()
      .children()
      .iter()
      .map(move |id| NodeRef::new(tree, *id))
  }

  #[inline]
  pub fn child_count(self) -> usize {
    self.node().children().len()
  }

  #[inline]
  pub fn is_patch(self) -> bool {
    self.node().is_patch()
  }

  #[inline]
  pub fn as_patch(self) -> Option<PatchRef<'t>> {
    self.node().as_patch().map(|patch| PatchRef { node: self, patch })
  }

  /// Child in `quadrant`, whatever its kind.
  pub fn child(self, quadrant: u8) -> Option<NodeRef<'t>> {
    self.children().find(|child| child.quadrant() == quadrant)
  }

  /// `0` is the node itself (when it is a quad); `1..=4` the child quad in
  /// that quadrant. Patches and missing children give `None`.
  pub fn get_quad(self, quadrant: i32) -> Option<NodeRef<'t>> {
    if self.is_patch() {
      return None;
    }
    match quadrant {
      0 => Some(self),
      1..=4 => self.child(quadrant as u8).filter(|child| !child.is_patch()),
      _ => None,
    }
  }

  /// Child patch in `quadrant` (1..=4); `None` for anything else, including
  /// a child quad in that position.
  pub fn get_patch(self, quadrant: i32) -> Option<PatchRef<'t>> {
    match quadrant {
      1..=4 => self.child(quadrant as u8).and_then(NodeRef::as_patch),
      _ => None,
    }
  }

  /// World-space translation of this node's local origin.
  pub fn world_translation(self) -> Vec3 {
    let mut translation = self.tree.config().origin;
    let mut cursor = Some(self);
    while let Some(node) = cursor {
      translation += node.node().local_translation;
      cursor = node.parent();
    }
    translation
  }
}

impl PartialEq for NodeRef<'_> {
  fn eq(&self, other: &Self) -> bool {
    std::ptr::eq(self.tree, other.tree) && self.id == other.id
  }
}

impl Eq for NodeRef<'_> {}

impl fmt::Debug for NodeRef<'_> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("NodeRef")
      .field("tile", &self.tree.config().tile)
      .field("path", &self.path())
      .field("id", &self.id)
      .finish()
  }
}

/// A patch node together with its tree.
#[derive(Clone, Copy)]
pub struct PatchRef<'t> {
  node: NodeRef<'t>,
  patch: &'t Patch,
}

impl<'t> PatchRef<'t> {
  #[inline]
  pub fn node(self) -> NodeRef<'t> {
    self.node
  }

  #[inline]
  pub fn patch(self) -> &'t Patch {
    self.patch
  }

  #[inline]
  pub fn id(self) -> NodeId {
    self.node.id
  }

  #[inline]
  pub fn path(self) -> NodePath {
    self.node.path()
  }

  #[inline]
  pub fn quadrant(self) -> u8 {
    self.node.quadrant()
  }

  #[inline]
  pub fn lod(self) -> u32 {
    self.patch.lod
  }

  /// Identifier used as the pending-update key.
  #[inline]
  pub fn key(self) -> PatchKey {
    PatchKey::new(self.node.tree.config().tile, self.node.path())
  }

  /// World-space center of the patch bounding volume.
  pub fn world_center(self) -> Vec3 {
    self.node.world_translation() + self.patch.bounds.center()
  }
}

impl PartialEq for PatchRef<'_> {
  fn eq(&self, other: &Self) -> bool {
    self.node == other.node
  }
}

impl Eq for PatchRef<'_> {}

impl fmt::Debug for PatchRef<'_> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("PatchRef")
      .field("tile", &self.node.tree.config().tile)
      .field("path", &self.path())
      .field("lod", &self.patch.lod)
      .finish()
  }
}

#[cfg(test)]
#[path = "node_test.rs"]
mod node_test;
