//! Animation libraries and their setup descriptions.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use kestrel_resource_core::Locator;

use crate::curve::CurveFormat;
use crate::slice::PoolRange;

/// Per-curve setup inside a clip. The value doubles as the constant for
/// static curves and the default fill for animated ones.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct CurveSetup {
    pub is_static: bool,
    pub static_value: [f32; 4],
}

impl CurveSetup {
    pub fn animated(static_value: [f32; 4]) -> Self {
        Self {
            is_static: false,
            static_value,
        }
    }

    pub fn fixed(static_value: [f32; 4]) -> Self {
        Self {
            is_static: true,
            static_value,
        }
    }
}

/// Setup description of one clip; `curves` must match the library's curve
/// layout position for position.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ClipSetup {
    pub name: String,
    pub length: usize,
    pub key_duration: f32,
    pub curves: Vec<CurveSetup>,
}

/// Setup description of a library: a locator, a curve layout shared by all
/// clips, and the clips themselves.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct LibrarySetup {
    pub locator: Locator,
    pub curve_layout: Vec<CurveFormat>,
    pub clips: Vec<ClipSetup>,
}

/// A named, immutable bundle of clips sharing one curve layout.
///
/// All storage views are offsets into the manager's pools and get rewritten
/// on compaction; the clip index map is library-relative so it survives
/// compaction untouched.
#[derive(Clone, Debug)]
pub struct Library {
    pub locator: Locator,
    pub curve_layout: Vec<CurveFormat>,
    /// Floats one evaluation produces for an instance of this library.
    pub sample_stride: usize,
    /// This library's clips in the clip pool.
    pub clips: PoolRange,
    /// This library's curves in the curve pool; `|clips| * |curve_layout|`.
    pub curves: PoolRange,
    /// This library's packed keys in the key region.
    pub keys: PoolRange,
    clip_index_map: HashMap<String, usize>,
}

impl Library {
    pub(crate) fn new(
        locator: Locator,
        curve_layout: Vec<CurveFormat>,
        sample_stride: usize,
        clips: PoolRange,
        curves: PoolRange,
        keys: PoolRange,
        clip_index_map: HashMap<String, usize>,
    ) -> Self {
        Self {
            locator,
            curve_layout,
            sample_stride,
            clips,
            curves,
            keys,
            clip_index_map,
        }
    }

    /// Index of a clip within this library (0-based into `clips`).
    pub fn clip_index(&self, name: &str) -> Option<usize> {
        self.clip_index_map.get(name).copied()
    }

    #[inline]
    pub fn num_clips(&self) -> usize {
        self.clips.len
    }
}
