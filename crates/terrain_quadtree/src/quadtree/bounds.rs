//! Axis-aligned bounding box for patch volumes.

use glam::Vec3;

/// Axis-aligned bounding box in patch-local space.
///
/// Encloses a patch footprint and the elevation range of its sub-grid,
/// including the shared border samples.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb3 {
	/// Minimum corner (inclusive).
	pub min: Vec3,
	/// Maximum corner (inclusive).
	pub max: Vec3,
}

impl Aabb3 {
	/// Create a new AABB from center and half-extents.
	pub fn from_center_half_extents(center: Vec3, half_extents: Vec3) -> Self {
		Self {
			min: center - half_extents,
			max: center + half_extents,
		}
	}

	/// Get the size of the AABB (max - min).
	#[inline]
	pub fn size(&self) -> Vec3 {
		self.max - self.min
	}

	/// Get the center of the AABB.
	#[inline]
	pub fn center(&self) -> Vec3 {
		(self.min + self.max) * 0.5
	}

	/// Half of the size on every axis.
	#[inline]
	pub fn half_extents(&self) -> Vec3 {
		self.size() * 0.5
	}
}
