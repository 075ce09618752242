//! Curve formats and per-channel curve records.

use serde::{Deserialize, Serialize};

/// Sentinel for the key index of static curves.
pub const INVALID_INDEX: usize = usize::MAX;

/// Vector format of one animation channel; determines how many floats a
/// keyframe row and a sample contribute.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum CurveFormat {
    Float,
    Float2,
    Float3,
    Float4,
}

impl CurveFormat {
    #[inline]
    pub fn stride(self) -> usize {
        match self {
            CurveFormat::Float => 1,
            CurveFormat::Float2 => 2,
            CurveFormat::Float3 => 3,
            CurveFormat::Float4 => 4,
        }
    }
}

/// One channel of one clip. A static curve stores its constant in
/// `static_value` and consumes no key-pool storage; an animated curve knows
/// where inside its clip's keyframe row its components start.
#[derive(Clone, Debug)]
pub struct Curve {
    pub format: CurveFormat,
    pub is_static: bool,
    /// Default / constant value; only the first `num_values` components are
    /// meaningful.
    pub static_value: [f32; 4],
    /// Floats this curve contributes to a sample row.
    pub num_values: usize,
    /// Offset of this curve's first component within a keyframe row of the
    /// owning clip; `INVALID_INDEX` for static curves.
    pub key_index: usize,
    /// Floats per keyframe row; 0 for static curves.
    pub key_stride: usize,
}
