//! Playback instances: a library binding plus per-frame sequencer state.

use serde::{Deserialize, Serialize};

use kestrel_resource_core::Handle;

use crate::sequencer::Sequencer;
use crate::slice::PoolRange;

/// Setup description of an instance: the library it samples and, for
/// skinned characters, the skeleton it targets.
#[derive(Copy, Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct InstanceSetup {
    pub library: Handle,
    pub skeleton: Option<Handle>,
}

impl InstanceSetup {
    pub fn from_library(library: Handle) -> Self {
        Self {
            library,
            skeleton: None,
        }
    }

    pub fn with_skeleton(library: Handle, skeleton: Handle) -> Self {
        Self {
            library,
            skeleton: Some(skeleton),
        }
    }
}

/// Playback state bound to a library and optional skeleton.
///
/// `samples` and `skin_matrices` are frame-scoped: they are claimed while
/// the instance is active in the current frame and cleared by the next
/// `new_frame`.
#[derive(Debug)]
pub struct Instance {
    pub library: Handle,
    pub skeleton: Option<Handle>,
    pub sequencer: Sequencer,
    /// This frame's slice of the sample region; empty when not active.
    pub samples: PoolRange,
    /// Reserved skinning-matrix slice for this frame; empty when unused.
    pub skin_matrices: PoolRange,
}

impl Instance {
    pub(crate) fn new(library: Handle, skeleton: Option<Handle>, max_jobs: usize) -> Self {
        Self {
            library,
            skeleton,
            sequencer: Sequencer::new(max_jobs),
            samples: PoolRange::EMPTY,
            skin_matrices: PoolRange::EMPTY,
        }
    }

    /// Drop all frame-scoped state; called on destroy.
    pub(crate) fn clear(&mut self) {
        self.samples = PoolRange::EMPTY;
        self.skin_matrices = PoolRange::EMPTY;
    }
}
