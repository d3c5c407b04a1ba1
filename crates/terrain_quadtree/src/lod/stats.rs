//! Counters reported by every LOD update pass.

/// Statistics from one update pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LodStats {
	/// Patches handed to the policy.
	pub patches_evaluated: usize,
	/// Patches whose own LOD changed.
	pub lod_changes: usize,
	/// Directional constraints written while fixing edges.
	pub edge_constraints: usize,
	/// Records created only to carry an edge constraint.
	pub neighbor_records: usize,
	/// Wall time of the pass in microseconds.
	pub elapsed_us: u64,
}

impl LodStats {
	/// Total records the mesh regenerator has to process.
	#[inline]
	pub fn total_updates(&self) -> usize {
		self.lod_changes + self.neighbor_records
	}

	/// Fold another pass's counters into this one.
	pub fn merge(&mut self, other: &LodStats) {
		self.patches_evaluated += other.patches_evaluated;
		self.lod_changes += other.lod_changes;
		self.edge_constraints += other.edge_constraints;
		self.neighbor_records += other.neighbor_records;
		self.elapsed_us += other.elapsed_us;
	}
}

/// Constraints written by one `fix_edges` run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EdgeStats {
	pub edge_constraints: usize,
	pub neighbor_records: usize,
}
