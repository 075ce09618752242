//! The shared float value pool and the offset views into it.
//!
//! Resources never hold references into the pool; they hold [`PoolRange`]
//! values (offset + length) resolved against the pool at access time. That
//! is what lets a destroy compact the storage and then rewrite every
//! surviving view with [`PoolRange::fill_gap`] without invalidating any
//! handle.

use serde::{Deserialize, Serialize};

/// An offset/length view into one of the manager's packed pools.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct PoolRange {
    pub offset: usize,
    pub len: usize,
}

impl PoolRange {
    pub const EMPTY: PoolRange = PoolRange { offset: 0, len: 0 };

    #[inline]
    pub fn new(offset: usize, len: usize) -> Self {
        Self { offset, len }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// One past the last element covered by this view.
    #[inline]
    pub fn end(&self) -> usize {
        self.offset + self.len
    }

    /// A sub-view at `offset` elements into this view.
    #[inline]
    pub fn make_range(&self, offset: usize, len: usize) -> PoolRange {
        debug_assert!(offset + len <= self.len);
        PoolRange::new(self.offset + offset, len)
    }

    /// Rewrite this view after `gap_len` elements at `gap_offset` were
    /// erased from the underlying pool. Views entirely past the gap shift
    /// down; views ending at or before it are untouched. A view that
    /// coincides with the gap belongs to the resource being erased and is
    /// deliberately left as-is (its owner is unassigned by the caller).
    #[inline]
    pub fn fill_gap(&mut self, gap_offset: usize, gap_len: usize) {
        if self.len != 0 && self.offset >= gap_offset + gap_len {
            self.offset -= gap_len;
        }
    }

    /// The `std` range form, for slicing.
    #[inline]
    pub fn as_range(&self) -> std::ops::Range<usize> {
        self.offset..self.end()
    }
}

/// The single float allocation backing keys and per-frame samples.
///
/// Layout: `[0, key_capacity)` is the persistent key region,
/// `[key_capacity, key_capacity + sample_capacity)` the per-frame sample
/// region. Ranges handed to the accessors are region-relative.
#[derive(Debug)]
pub struct ValuePool {
    values: Vec<f32>,
    key_capacity: usize,
    sample_capacity: usize,
}

impl ValuePool {
    pub fn new(key_capacity: usize, sample_capacity: usize) -> Self {
        Self {
            values: vec![0.0; key_capacity + sample_capacity],
            key_capacity,
            sample_capacity,
        }
    }

    #[inline]
    pub fn key_capacity(&self) -> usize {
        self.key_capacity
    }

    #[inline]
    pub fn sample_capacity(&self) -> usize {
        self.sample_capacity
    }

    #[inline]
    pub fn keys(&self, range: PoolRange) -> &[f32] {
        debug_assert!(range.end() <= self.key_capacity);
        &self.values[range.as_range()]
    }

    #[inline]
    pub fn keys_mut(&mut self, range: PoolRange) -> &mut [f32] {
        debug_assert!(range.end() <= self.key_capacity);
        &mut self.values[range.as_range()]
    }

    #[inline]
    pub fn samples(&self, range: PoolRange) -> &[f32] {
        debug_assert!(range.end() <= self.sample_capacity);
        let offset = self.key_capacity + range.offset;
        &self.values[offset..offset + range.len]
    }

    #[inline]
    pub fn samples_mut(&mut self, range: PoolRange) -> &mut [f32] {
        debug_assert!(range.end() <= self.sample_capacity);
        let offset = self.key_capacity + range.offset;
        &mut self.values[offset..offset + range.len]
    }

    /// Both regions at once, for evaluation passes that read keys while
    /// writing samples.
    #[inline]
    pub fn split_keys_samples(&mut self) -> (&[f32], &mut [f32]) {
        let (keys, samples) = self.values.split_at_mut(self.key_capacity);
        (keys, samples)
    }

    /// Close a gap in the key region: move `[range.end, num_keys)` down to
    /// `range.offset`. The caller owns the live-key count.
    pub fn erase_keys(&mut self, range: PoolRange, num_keys: usize) {
        debug_assert!(range.end() <= num_keys && num_keys <= self.key_capacity);
        if range.end() < num_keys {
            self.values.copy_within(range.end()..num_keys, range.offset);
        }
    }
}
