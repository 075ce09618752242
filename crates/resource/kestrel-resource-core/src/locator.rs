//! Resource locators: shared names and anonymous one-offs.

use std::sync::atomic::{AtomicU32, Ordering};

use serde::{Deserialize, Serialize};

const SHARED_SIGNATURE: u32 = 0;

static NEXT_NON_SHARED: AtomicU32 = AtomicU32::new(1);

/// A resource name. Shared locators compare by their location string and
/// participate in registry deduplication; non-shared locators are unique per
/// call and are never found by a registry lookup.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Locator {
    location: String,
    signature: u32,
}

impl Locator {
    pub fn shared(location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            signature: SHARED_SIGNATURE,
        }
    }

    /// A locator that never matches another locator, for resources that are
    /// registered only so a label can destroy them (e.g. instances).
    pub fn non_shared() -> Self {
        Self {
            location: String::new(),
            signature: NEXT_NON_SHARED.fetch_add(1, Ordering::Relaxed),
        }
    }

    #[inline]
    pub fn is_shared(&self) -> bool {
        self.signature == SHARED_SIGNATURE
    }

    #[inline]
    pub fn location(&self) -> &str {
        &self.location
    }
}

impl From<&str> for Locator {
    fn from(location: &str) -> Self {
        Locator::shared(location)
    }
}
