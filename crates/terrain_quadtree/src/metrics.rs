//! Rolling statistics for terrain LOD passes.
//!
//! Feature-gated and runtime-toggled: without the `metrics` feature every
//! `record_*` call is a no-op.
//!
//! # Usage
//!
//! ```ignore
//! use terrain_quadtree::metrics::{LodMetrics, COLLECT_METRICS};
//!
//! // Compile with --features metrics
//! // Runtime toggle:
//! COLLECT_METRICS.store(false, Ordering::Relaxed);
//!
//! let output = engine.update(&tree, &viewpoints);
//! metrics.record_pass(&output.stats);
//! metrics.update_from_tree(&tree);
//! ```

use std::collections::VecDeque;
#[cfg(feature = "metrics")]
use std::sync::atomic::Ordering;
use std::sync::atomic::AtomicBool;

use crate::lod::LodStats;
use crate::quadtree::QuadTree;

/// Runtime toggle for metrics collection.
pub static COLLECT_METRICS: AtomicBool = AtomicBool::new(true);

/// LOD levels tracked individually; coarser levels share the last slot.
pub const TRACKED_LODS: usize = 16;

/// Check if metrics collection is enabled (both compile-time and runtime).
#[inline]
pub fn is_enabled() -> bool {
    #[cfg(feature = "metrics")]
    {
        COLLECT_METRICS.load(Ordering::Relaxed)
    }
    #[cfg(not(feature = "metrics"))]
    {
        false
    }
}

/// Fixed-capacity window over the most recent values.
#[derive(Debug, Clone)]
pub struct RollingWindow<T> {
    buffer: VecDeque<T>,
    capacity: usize,
}

impl<T> RollingWindow<T> {
    pub fn new(capacity: usize) -> Self {
        Self {
            buffer: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Push a new value, evicting the oldest if at capacity.
    pub fn push(&mut self, value: T) {
        if self.capacity == 0 {
            return;
        }
        if self.buffer.len() >= self.capacity {
            self.buffer.pop_front();
        }
        self.buffer.push_back(value);
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    /// Oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.buffer.iter()
    }

    pub fn last(&self) -> Option<&T> {
        self.buffer.back()
    }
}

impl RollingWindow<u64> {
    pub fn sum(&self) -> u64 {
        self.buffer.iter().sum()
    }

    pub fn average(&self) -> f64 {
        if self.buffer.is_empty() {
            0.0
        } else {
            self.sum() as f64 / self.buffer.len() as f64
        }
    }

    pub fn min_max(&self) -> Option<(u64, u64)> {
        let min = *self.buffer.iter().min()?;
        let max = *self.buffer.iter().max()?;
        Some((min, max))
    }
}

impl Default for RollingWindow<u64> {
    fn default() -> Self {
        Self::new(128)
    }
}

/// Terrain statistics accumulated across LOD passes.
#[derive(Debug, Clone, Default)]
pub struct LodMetrics {
    /// Patches currently at each LOD (index = LOD).
    pub patches_per_lod: [u32; TRACKED_LODS],

    /// Pass durations in microseconds.
    pub pass_timings: RollingWindow<u64>,
    pub last_pass_us: u64,

    // Cumulative over the session
    pub total_passes: u64,
    pub total_lod_changes: u64,
    pub total_edge_constraints: u64,
}

impl LodMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset everything except the cumulative totals.
    pub fn reset(&mut self) {
        self.patches_per_lod.fill(0);
        self.pass_timings.clear();
        self.last_pass_us = 0;
    }

    /// Fold one pass's counters in.
    pub fn record_pass(&mut self, stats: &LodStats) {
        if !is_enabled() {
            return;
        }
        self.pass_timings.push(stats.elapsed_us);
        self.last_pass_us = stats.elapsed_us;
        self.total_passes += 1;
        self.total_lod_changes += stats.lod_changes as u64;
        self.total_edge_constraints += stats.edge_constraints as u64;
    }

    /// Recount the LOD distribution of a tree's patches.
    pub fn update_from_tree(&mut self, tree: &QuadTree) {
        if !is_enabled() {
            return;
        }
        self.patches_per_lod.fill(0);
        for patch in tree.patches() {
            let slot = (patch.lod() as usize).min(TRACKED_LODS - 1);
            self.patches_per_lod[slot] += 1;
        }
    }

    pub fn total_patches(&self) -> u32 {
        self.patches_per_lod.iter().sum()
    }

    pub fn avg_pass_timing_us(&self) -> f64 {
        self.pass_timings.average()
    }
}
