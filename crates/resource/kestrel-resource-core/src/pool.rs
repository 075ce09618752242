//! Fixed-slot resource pools with generation-checked lookup.

use crate::handle::Handle;

/// Lifecycle of a pool slot's occupant.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ResourceState {
    /// Slot is free or was never used.
    Initial,
    /// Slot claimed by `alloc`, no value assigned yet.
    Alloc,
    /// Value assigned but still under construction.
    Setup,
    /// Fully usable; the only state `lookup` resolves.
    Valid,
}

#[derive(Debug)]
struct Slot<T> {
    value: Option<T>,
    state: ResourceState,
    generation: u32,
}

/// Counts reported by [`ResourcePool::query_pool_info`].
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct PoolInfo {
    pub capacity: usize,
    pub num_used_slots: usize,
    pub num_free_slots: usize,
}

/// Allocator of stable identities over a fixed number of slots.
///
/// The pool stores one `T` per occupied slot; the value's storage never
/// moves, but consumers typically keep only offsets inside `T` and relocate
/// the bulk data elsewhere. `lookup` fails for stale generations, wrong
/// states, and wrong type tags, which is what makes handles safe to hold
/// across destroys.
#[derive(Debug)]
pub struct ResourcePool<T> {
    type_tag: u16,
    slots: Vec<Slot<T>>,
    free: Vec<u32>,
    last_alloc_slot: usize,
    num_used: usize,
}

impl<T> ResourcePool<T> {
    pub fn new(type_tag: u16, capacity: usize) -> Self {
        assert!(capacity > 0, "resource pool capacity must be non-zero");
        let mut slots = Vec::with_capacity(capacity);
        for _ in 0..capacity {
            slots.push(Slot {
                value: None,
                state: ResourceState::Initial,
                generation: 0,
            });
        }
        // free list as a stack, lowest slot on top
        let free = (0..capacity as u32).rev().collect();
        Self {
            type_tag,
            slots,
            free,
            last_alloc_slot: 0,
            num_used: 0,
        }
    }

    #[inline]
    pub fn type_tag(&self) -> u16 {
        self.type_tag
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Highest slot index ever handed out. Compaction fixup passes iterate
    /// `0..=last_alloc_slot()` and skip unoccupied slots.
    #[inline]
    pub fn last_alloc_slot(&self) -> usize {
        self.last_alloc_slot
    }

    /// Claim a free slot. Exhausting the pool is a contract violation; the
    /// consumer sizes the pool via its setup config.
    pub fn alloc(&mut self) -> Handle {
        let slot_index = self.free.pop().expect("resource pool exhausted");
        let slot = &mut self.slots[slot_index as usize];
        debug_assert!(slot.value.is_none() && slot.state == ResourceState::Initial);
        slot.generation = slot.generation.wrapping_add(1);
        if slot.generation == 0 {
            slot.generation = 1;
        }
        slot.state = ResourceState::Alloc;
        self.num_used += 1;
        if slot_index as usize > self.last_alloc_slot {
            self.last_alloc_slot = slot_index as usize;
        }
        Handle::new(self.type_tag, slot_index, slot.generation)
    }

    /// Store a value in a slot claimed by `alloc`.
    pub fn assign(&mut self, handle: Handle, value: T, state: ResourceState) {
        debug_assert!(state == ResourceState::Setup || state == ResourceState::Valid);
        let slot = self.checked_slot_mut(handle);
        debug_assert!(slot.state == ResourceState::Alloc);
        slot.value = Some(value);
        slot.state = state;
    }

    pub fn update_state(&mut self, handle: Handle, state: ResourceState) {
        let slot = self.checked_slot_mut(handle);
        debug_assert!(slot.value.is_some());
        slot.state = state;
    }

    /// Resolve a handle to its value; `None` for stale generations, slots
    /// not in the `Valid` state, and the invalid handle.
    pub fn lookup(&self, handle: Handle) -> Option<&T> {
        debug_assert!(!handle.is_valid() || handle.type_tag() == self.type_tag);
        if !handle.is_valid() {
            return None;
        }
        let slot = self.slots.get(handle.slot() as usize)?;
        if slot.generation == handle.generation() && slot.state == ResourceState::Valid {
            slot.value.as_ref()
        } else {
            None
        }
    }

    pub fn lookup_mut(&mut self, handle: Handle) -> Option<&mut T> {
        debug_assert!(!handle.is_valid() || handle.type_tag() == self.type_tag);
        if !handle.is_valid() {
            return None;
        }
        let slot = self.slots.get_mut(handle.slot() as usize)?;
        if slot.generation == handle.generation() && slot.state == ResourceState::Valid {
            slot.value.as_mut()
        } else {
            None
        }
    }

    /// Free the slot behind a handle. A stale handle is a no-op, so destroy
    /// paths can unassign unconditionally after their lookups.
    pub fn unassign(&mut self, handle: Handle) {
        debug_assert!(!handle.is_valid() || handle.type_tag() == self.type_tag);
        if !handle.is_valid() {
            return;
        }
        let Some(slot) = self.slots.get_mut(handle.slot() as usize) else {
            return;
        };
        if slot.generation != handle.generation() || slot.state == ResourceState::Initial {
            return;
        }
        slot.value = None;
        slot.state = ResourceState::Initial;
        self.num_used -= 1;
        self.free.push(handle.slot());
    }

    /// Direct slot access for fixup iteration; `None` when unoccupied.
    pub fn slot(&self, index: usize) -> Option<&T> {
        self.slots.get(index).and_then(|s| s.value.as_ref())
    }

    pub fn slot_mut(&mut self, index: usize) -> Option<&mut T> {
        self.slots.get_mut(index).and_then(|s| s.value.as_mut())
    }

    pub fn query_pool_info(&self) -> PoolInfo {
        PoolInfo {
            capacity: self.slots.len(),
            num_used_slots: self.num_used,
            num_free_slots: self.free.len(),
        }
    }

    fn checked_slot_mut(&mut self, handle: Handle) -> &mut Slot<T> {
        debug_assert!(handle.type_tag() == self.type_tag);
        let slot = &mut self.slots[handle.slot() as usize];
        debug_assert!(slot.generation == handle.generation());
        slot
    }
}
