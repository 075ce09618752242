//! Playback jobs and their identifiers.

use serde::{Deserialize, Serialize};

/// Identifier of one job on one instance's sequencer. Ids are handed out
/// monotonically per manager and never reuse the invalid zero value.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub struct AnimJobId(pub u32);

impl AnimJobId {
    pub const INVALID: AnimJobId = AnimJobId(0);

    #[inline]
    pub fn is_valid(self) -> bool {
        self.0 != 0
    }
}

/// A request to play one clip on one mixing track.
///
/// Tracks layer in ascending index order; later tracks blend over earlier
/// ones by the job's current weight. Fades are in seconds from the play /
/// stop call.
#[derive(Copy, Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct AnimJob {
    /// Clip index within the instance's library.
    pub clip_index: usize,
    /// Mixing track; higher tracks blend over lower ones.
    pub track_index: usize,
    /// Weight of the job once fully faded in.
    pub mix_weight: f32,
    /// Seconds to ramp the weight 0 -> `mix_weight` from the play call.
    pub fade_in: f32,
    /// Seconds to ramp the weight -> 0 once stopped with fade-out allowed.
    pub fade_out: f32,
}

impl Default for AnimJob {
    fn default() -> Self {
        Self {
            clip_index: 0,
            track_index: 0,
            mix_weight: 1.0,
            fade_in: 0.0,
            fade_out: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// it should treat the zero id as invalid
    #[test]
    fn invalid_id() {
        assert!(!AnimJobId::INVALID.is_valid());
        assert!(AnimJobId(1).is_valid());
    }
}
