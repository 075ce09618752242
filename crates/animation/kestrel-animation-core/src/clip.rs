//! Clip records: one keyframed timeline per animation.

use crate::slice::PoolRange;

/// A timeline of `length` keyframe rows over its library's curve layout.
///
/// `curves` points into the manager's curve pool, `keys` into the key
/// region of the value pool; both are rewritten by the compaction fixup
/// when other resources are destroyed.
#[derive(Clone, Debug)]
pub struct Clip {
    pub name: String,
    /// Number of keyframe rows.
    pub length: usize,
    /// Seconds per keyframe row.
    pub key_duration: f32,
    /// Floats per keyframe row, summed over the non-static curves.
    pub key_stride: usize,
    /// This clip's curves, one per curve-layout position.
    pub curves: PoolRange,
    /// This clip's packed keyframe rows; empty when every curve is static.
    pub keys: PoolRange,
}

impl Clip {
    /// Playback length in seconds.
    #[inline]
    pub fn duration(&self) -> f32 {
        self.key_duration * self.length as f32
    }
}
