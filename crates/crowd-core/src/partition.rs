//! Partition table: prefix sums of per-block instance counts.
//!
//! Global instance `i` belongs to the first block whose cumulative end is
//! greater than `i`. The table is built once at setup and never changes, so
//! the mapping from global index to seat is stable across frames.

use crate::config::BlockConfig;
use std::ops::Range;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SeatPartition {
    /// Cumulative instance count up to and including each block.
    ends: Vec<usize>,
}

impl SeatPartition {
    pub fn from_counts<I: IntoIterator<Item = usize>>(counts: I) -> Self {
        let mut total = 0usize;
        let ends = counts
            .into_iter()
            .map(|count| {
                total += count;
                total
            })
            .collect();
        Self { ends }
    }

    pub fn from_configs(configs: &[BlockConfig]) -> Self {
        Self::from_counts(configs.iter().map(BlockConfig::total_seat_count))
    }

    /// Number of blocks.
    pub fn len(&self) -> usize {
        self.ends.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ends.is_empty()
    }

    /// Instances across all blocks.
    pub fn total(&self) -> usize {
        self.ends.last().copied().unwrap_or(0)
    }

    pub fn ends(&self) -> &[usize] {
        &self.ends
    }

    /// First global index owned by `block`.
    pub fn start(&self, block: usize) -> usize {
        if block == 0 {
            0
        } else {
            self.ends[block - 1]
        }
    }

    pub fn range(&self, block: usize) -> Range<usize> {
        self.start(block)..self.ends[block]
    }

    /// Map a global index to `(block, local_index)`, or `None` past the end.
    pub fn resolve(&self, global: usize) -> Option<(usize, usize)> {
        if global >= self.total() {
            return None;
        }
        Some(self.locate(global))
    }

    /// [`resolve`](Self::resolve) without the bounds check, for the hot loop.
    /// Indices past the end land in the last block.
    #[inline]
    pub fn locate(&self, global: usize) -> (usize, usize) {
        // Empty blocks have end == start and are skipped by the predicate.
        let block = self
            .ends
            .partition_point(|&end| end <= global)
            .min(self.ends.len().saturating_sub(1));
        (block, global - self.start(block))
    }

    /// Inverse of [`resolve`](Self::resolve).
    pub fn global_index(&self, block: usize, local: usize) -> usize {
        self.start(block) + local
    }
}
