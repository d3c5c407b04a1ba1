//! Cardinal directions and the fixed quadrant step table.
//!
//! Quadrants are numbered inside their parent's footprint (x grows right,
//! z grows down):
//!
//! ```text
//!        x →
//!   z  ┌───┬───┐
//!   ↓  │ 1 │ 3 │
//!      ├───┼───┤
//!      │ 2 │ 4 │
//!      └───┴───┘
//! ```
//!
//! Stepping from a quadrant in a direction either lands on a sibling inside
//! the same parent, or leaves the parent. In the latter case the step also
//! names the mirrored quadrant to descend into on the far side of the shared
//! boundary.

use glam::IVec2;

/// Cardinal search direction. The discriminants are the wire encoding.
#[repr(u8)]
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Direction {
  Right = 0,
  Down = 1,
  Left = 2,
  Top = 3,
}

impl Direction {
  /// All directions in encoding order.
  pub const ALL: [Direction; 4] = [
    Direction::Right,
    Direction::Down,
    Direction::Left,
    Direction::Top,
  ];

  /// Decode a raw direction. Anything outside `0..=3` is `None`.
  pub fn from_index(index: i32) -> Option<Self> {
    match index {
      0 => Some(Direction::Right),
      1 => Some(Direction::Down),
      2 => Some(Direction::Left),
      3 => Some(Direction::Top),
      _ => None,
    }
  }

  #[inline]
  pub fn index(self) -> usize {
    self as usize
  }

  /// The direction pointing back across the same boundary.
  #[inline]
  pub fn opposite(self) -> Self {
    match self {
      Direction::Right => Direction::Left,
      Direction::Down => Direction::Top,
      Direction::Left => Direction::Right,
      Direction::Top => Direction::Down,
    }
  }

  /// Offset of the adjacent tile in a tile grid.
  #[inline]
  pub fn tile_offset(self) -> IVec2 {
    match self {
      Direction::Right => IVec2::new(1, 0),
      Direction::Down => IVec2::new(0, 1),
      Direction::Left => IVec2::new(-1, 0),
      Direction::Top => IVec2::new(0, -1),
    }
  }
}

/// Result of stepping out of a quadrant.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Step {
  /// The neighbor is the sibling in this quadrant of the same parent.
  Sibling(u8),
  /// The neighbor lies beyond the parent; descend into this quadrant of the
  /// parent's neighbor.
  Cross(u8),
}

/// Apply the step table. Returns `None` for quadrants outside `1..=4`.
pub fn step(quadrant: u8, direction: Direction) -> Option<Step> {
  use Direction::*;
  use Step::*;

  let step = match (direction, quadrant) {
    (Right, 1) => Sibling(3),
    (Right, 2) => Sibling(4),
    (Right, 3) => Cross(1),
    (Right, 4) => Cross(2),

    (Down, 1) => Sibling(2),
    (Down, 3) => Sibling(4),
    (Down, 2) => Cross(1),
    (Down, 4) => Cross(3),

    (Left, 3) => Sibling(1),
    (Left, 4) => Sibling(2),
    (Left, 1) => Cross(3),
    (Left, 2) => Cross(4),

    (Top, 2) => Sibling(1),
    (Top, 4) => Sibling(3),
    (Top, 1) => Cross(2),
    (Top, 3) => Cross(4),

    _ => return None,
  };
  Some(step)
}

#[cfg(test)]
#[path = "direction_test.rs"]
mod direction_test;
