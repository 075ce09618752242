//! Opaque resource handles: (type, slot, generation) triples.

use serde::{Deserialize, Serialize};

/// Identifies one resource inside one pool. The generation is bumped every
/// time a slot is reallocated, so a handle held across a destroy never
/// resolves to the slot's new occupant.
///
/// Generation 0 is never allocated; the all-zero handle is the invalid one.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Handle {
    type_tag: u16,
    slot: u32,
    generation: u32,
}

impl Handle {
    pub const INVALID: Handle = Handle {
        type_tag: 0,
        slot: 0,
        generation: 0,
    };

    #[inline]
    pub fn new(type_tag: u16, slot: u32, generation: u32) -> Self {
        Self {
            type_tag,
            slot,
            generation,
        }
    }

    #[inline]
    pub fn is_valid(&self) -> bool {
        self.generation != 0
    }

    #[inline]
    pub fn type_tag(&self) -> u16 {
        self.type_tag
    }

    #[inline]
    pub fn slot(&self) -> u32 {
        self.slot
    }

    #[inline]
    pub fn generation(&self) -> u32 {
        self.generation
    }
}

impl Default for Handle {
    fn default() -> Self {
        Self::INVALID
    }
}
