//! QuadTree - arena owning every node of one terrain tile.
//!
//! Nodes are attached exactly once, top-down; after that only per-patch LOD
//! state and height samples change. A path index is maintained at attach
//! time so a patch can be re-located by name without traversal.

use std::collections::HashMap;

use glam::{IVec2, UVec2, Vec2, Vec3};
use smallvec::SmallVec;

use super::node::{NodeId, NodeKind, NodePath, NodeRef, PatchRef, SpatialNode};
use super::patch::Patch;
use super::TerrainConfig;
use crate::direction::Direction;
use crate::error::{Result, TerrainError};
use crate::lod::UpdateMap;

/// Quadtree over one square heightmap tile.
#[derive(Clone, Debug)]
pub struct QuadTree {
  nodes: Vec<SpatialNode>,
  index: HashMap<NodePath, NodeId>,
  config: TerrainConfig,
}

impl QuadTree {
  /// Id of the root node in every tree.
  pub const ROOT: NodeId = NodeId(0);

  /// Create a tree holding only an empty root quad of `size` samples.
  pub fn with_root(config: TerrainConfig, size: u32) -> Self {
    let root = SpatialNode {
      quadrant: 0,
      size,
      parent: None,
      path: NodePath::ROOT,
      grid_origin: UVec2::ZERO,
      local_translation: Vec3::ZERO,
      offset: Vec2::ZERO,
      offset_amount: 0.0,
      kind: NodeKind::Quad {
        children: SmallVec::new(),
      },
    };
    let mut index = HashMap::new();
    index.insert(NodePath::ROOT, Self::ROOT);
    Self {
      nodes: vec![root],
      index,
      config,
    }
  }

  #[inline]
  pub fn config(&self) -> &TerrainConfig {
    &self.config
  }

  #[inline]
  pub fn tile(&self) -> IVec2 {
    self.config.tile
  }

  /// Samples along the root edge.
  #[inline]
  pub fn total_size(&self) -> u32 {
    self.nodes[Self::ROOT.index()].size
  }

  /// Number of nodes (quads and patches).
  #[inline]
  pub fn len(&self) -> usize {
    self.nodes.len()
  }

  /// Always `false`: the root exists from construction. Pairs with `len`.
  #[inline]
  pub fn is_empty(&self) -> bool {
    self.nodes.is_empty()
  }

  #[inline]
  pub fn root(&self) -> NodeRef<'_> {
    NodeRef::new(self, Self::ROOT)
  }

  /// Checked node lookup.
  pub fn node(&self, id: NodeId) -> Result<NodeRef<'_>> {
    if id.index() >= self.nodes.len() {
      return Err(TerrainError::InvalidArgument(format!(
        "node {:?} is not part of this tree",
        id
      )));
    }
    Ok(NodeRef::new(self, id))
  }

  #[inline]
  pub(crate) fn node_unchecked(&self, id: NodeId) -> &SpatialNode {
    &self.nodes[id.index()]
  }

  pub fn find_by_path(&self, path: NodePath) -> Option<NodeRef<'_>> {
    self.index.get(&path).map(|id| NodeRef::new(self, *id))
  }

  pub fn patch_by_path(&self, path: NodePath) -> Option<PatchRef<'_>> {
    self.find_by_path(path).and_then(NodeRef::as_patch)
  }

  /// All patches in attach order.
  pub fn patches(&self) -> impl Iterator<Item = PatchRef<'_>> + '_ {
    (0..self.nodes.len()).filter_map(move |i| NodeRef::new(self, NodeId(i as u32)).as_patch())
  }

  pub fn patch_count(&self) -> usize {
    self.nodes.iter().filter(|node| node.is_patch()).count()
  }

  /// Attach an empty child quad of `size` samples under `parent`.
  pub fn attach_quad(&mut self, parent: NodeId, quadrant: u8, size: u32) -> Result<NodeId> {
    self.attach(
      parent,
      quadrant,
      size,
      NodeKind::Quad {
        children: SmallVec::new(),
      },
    )
  }

  /// Attach a patch under `parent`.
  pub fn attach_patch(&mut self, parent: NodeId, quadrant: u8, patch: Patch) -> Result<NodeId> {
    let size = patch.side() as u32;
    self.attach(parent, quadrant, size, NodeKind::Patch(patch))
  }

  fn attach(&mut self, parent: NodeId, quadrant: u8, size: u32, kind: NodeKind) -> Result<NodeId> {
    let parent_node = self
      .nodes
      .get(parent.index())
      .ok_or_else(|| TerrainError::InvalidArgument(format!("unknown parent {:?}", parent)))?;

    let NodeKind::Quad { children } = &parent_node.kind else {
      return Err(TerrainError::InvalidArgument(format!(
        "parent {} is a patch",
        parent_node.path
      )));
    };
    if children
      .iter()
      .any(|child| self.nodes[child.index()].quadrant == quadrant)
    {
      return Err(TerrainError::InvalidArgument(format!(
        "quadrant {} of {:?} is already attached",
        quadrant,
        parent_node.path.to_string()
      )));
    }
    let path = parent_node.path.child(quadrant).ok_or_else(|| {
      TerrainError::InvalidArgument(format!(
        "quadrant {} under {:?} is not attachable",
        quadrant,
        parent_node.path.to_string()
      ))
    })?;

    let max_size = (parent_node.size + 1) / 2;
    if size == 0 || size > max_size {
      return Err(TerrainError::InvalidArgument(format!(
        "child of {} samples does not fit quadrant {} of {:?} (at most {})",
        size,
        quadrant,
        parent_node.path.to_string(),
        max_size
      )));
    }

    let placement = Placement::for_child(parent_node, quadrant, kind_is_patch(&kind), self.config.scale);
    let id = NodeId(self.nodes.len() as u32);
    self.nodes.push(SpatialNode {
      quadrant,
      size,
      parent: Some(parent),
      path,
      grid_origin: placement.grid_origin,
      local_translation: placement.local_translation,
      offset: placement.offset,
      offset_amount: placement.offset_amount,
      kind,
    });
    if let NodeKind::Quad { children } = &mut self.nodes[parent.index()].kind {
      children.push(id);
    }
    self.index.insert(path, id);
    Ok(id)
  }

  pub(crate) fn patch_mut(&mut self, id: NodeId) -> Option<&mut Patch> {
    self.nodes.get_mut(id.index()).and_then(SpatialNode::as_patch_mut)
  }

  /// Apply the LOD transitions and edge constraints addressed to this tile.
  ///
  /// Every record sets its patch's LOD to `new_lod`; explicit directional
  /// constraints overwrite the stored edge LODs. Returns the number of
  /// patches touched.
  pub fn apply_updates(&mut self, updates: &UpdateMap) -> usize {
    let tile = self.tile();
    let mut applied = 0;
    for (key, update) in updates.iter().filter(|(key, _)| key.tile == tile) {
      let Some(id) = self.index.get(&key.path).copied() else {
        tracing::warn!(path = %key.path, "pending update for unknown patch");
        continue;
      };
      let Some(patch) = self.patch_mut(id) else {
        tracing::warn!(path = %key.path, "pending update addressed to a quad");
        continue;
      };
      patch.lod = update.new_lod;
      for direction in Direction::ALL {
        if let Some(lod) = update.edge_lod(direction) {
          patch.edge_lods[direction.index()] = lod;
        }
      }
      applied += 1;
    }
    tracing::trace!(?tile, applied, "applied pending updates");
    applied
  }
}

#[inline]
fn kind_is_patch(kind: &NodeKind) -> bool {
  matches!(kind, NodeKind::Patch(_))
}

/// Where a child sits relative to its parent.
struct Placement {
  grid_origin: UVec2,
  local_translation: Vec3,
  offset: Vec2,
  offset_amount: f32,
}

impl Placement {
  /// Quadrants 3/4 sit on the +x side, 2/4 on the +z side. Children share
  /// the parent's middle row/column of samples.
  fn for_child(parent: &SpatialNode, quadrant: u8, is_patch: bool, scale: Vec3) -> Self {
    let size = parent.size;
    let quarter = (size >> 2) as f32;
    let half = (size >> 1) as f32;
    let split = (size + 1) >> 1;

    let right = matches!(quadrant, 3 | 4);
    let bottom = matches!(quadrant, 2 | 4);
    let sign = |positive: bool| if positive { 1.0 } else { -1.0 };

    let quarter_step = Vec2::new(sign(right) * quarter * scale.x, sign(bottom) * quarter * scale.z);
    let local_translation = if is_patch {
      // patches span [0, cells] from their origin
      Vec3::new(
        if right { 0.0 } else { -half * scale.x },
        0.0,
        if bottom { 0.0 } else { -half * scale.z },
      )
    } else {
      Vec3::new(quarter_step.x, 0.0, quarter_step.y)
    };

    let shared = split.saturating_sub(1);
    Self {
      grid_origin: parent.grid_origin
        + UVec2::new(if right { shared } else { 0 }, if bottom { shared } else { 0 }),
      local_translation,
      offset: parent.offset + quarter_step,
      offset_amount: parent.offset_amount + quarter,
    }
  }
}

#[cfg(test)]
#[path = "tree_test.rs"]
mod tree_test;
