//! Label stack + registry bundle shared by resource containers.

use crate::handle::Handle;
use crate::label::{LabelStack, ResourceLabel};
use crate::locator::Locator;
use crate::registry::Registry;

/// The per-container resource bookkeeping: a label stack for scoping and a
/// registry recording every live resource under its creation label.
#[derive(Debug)]
pub struct ResourceContainer {
    pub labels: LabelStack,
    pub registry: Registry,
}

impl ResourceContainer {
    pub fn new(label_stack_capacity: usize, registry_capacity: usize) -> Self {
        Self {
            labels: LabelStack::new(label_stack_capacity),
            registry: Registry::new(registry_capacity),
        }
    }

    #[inline]
    pub fn push_label(&mut self) -> ResourceLabel {
        self.labels.push()
    }

    #[inline]
    pub fn pop_label(&mut self) -> ResourceLabel {
        self.labels.pop()
    }

    #[inline]
    pub fn peek_label(&self) -> ResourceLabel {
        self.labels.peek()
    }

    /// Register a resource under the label currently on top of the stack.
    pub fn register(&mut self, locator: Locator, handle: Handle) {
        let label = self.peek_label();
        self.registry.add(locator, handle, label);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// it should register under the top label and release those resources together
    #[test]
    fn register_under_current_label() {
        let mut container = ResourceContainer::new(4, 8);
        let outer = container.push_label();
        container.register(Locator::shared("a"), Handle::new(1, 0, 1));
        let inner = container.push_label();
        container.register(Locator::shared("b"), Handle::new(1, 1, 1));
        container.pop_label();
        container.pop_label();

        assert_eq!(container.registry.remove(inner).len(), 1);
        assert_eq!(container.registry.remove(outer).len(), 1);
        assert!(container.registry.is_empty());
    }
}
