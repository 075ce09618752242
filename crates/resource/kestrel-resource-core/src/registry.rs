//! Locator registry: maps shared names to handles and tracks label ownership.

use crate::handle::Handle;
use crate::label::ResourceLabel;
use crate::locator::Locator;

#[derive(Debug)]
struct Entry {
    locator: Locator,
    handle: Handle,
    label: ResourceLabel,
}

/// Insertion-ordered registry of live resources.
///
/// `lookup` only ever finds shared locators; non-shared entries exist solely
/// so `remove(label)` can return them for destruction. Removal preserves
/// registration order, which the consumer relies on when destroying
/// resources that reference each other.
#[derive(Debug)]
pub struct Registry {
    entries: Vec<Entry>,
    capacity: usize,
}

impl Registry {
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "registry capacity must be non-zero");
        Self {
            entries: Vec::with_capacity(capacity),
            capacity,
        }
    }

    pub fn add(&mut self, locator: Locator, handle: Handle, label: ResourceLabel) {
        assert!(self.entries.len() < self.capacity, "resource registry full");
        debug_assert!(handle.is_valid());
        debug_assert!(
            !locator.is_shared() || self.lookup(&locator).is_none(),
            "shared locator registered twice"
        );
        self.entries.push(Entry {
            locator,
            handle,
            label,
        });
    }

    pub fn lookup(&self, locator: &Locator) -> Option<Handle> {
        if !locator.is_shared() {
            return None;
        }
        self.entries
            .iter()
            .find(|e| e.locator == *locator)
            .map(|e| e.handle)
    }

    /// Drain every entry carrying `label` (or everything for
    /// [`ResourceLabel::ALL`]), in registration order.
    pub fn remove(&mut self, label: ResourceLabel) -> Vec<Handle> {
        let mut removed = Vec::new();
        self.entries.retain(|e| {
            if label == ResourceLabel::ALL || e.label == label {
                removed.push(e.handle);
                false
            } else {
                true
            }
        });
        removed
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
