//! Kestrel resource-layer primitives (engine-agnostic).
//!
//! This crate provides the building blocks every kestrel resource container
//! is made of: opaque generation-checked handles, fixed-slot resource pools,
//! a locator registry, and a label stack for bulk destruction. Consumers
//! (e.g. kestrel-animation-core) own the storage behind the handles; this
//! layer only tracks identity and lifetime.

pub mod container;
pub mod handle;
pub mod label;
pub mod locator;
pub mod pool;
pub mod registry;

// Re-exports for consumers (containers)
pub use container::ResourceContainer;
pub use handle::Handle;
pub use label::{LabelStack, ResourceLabel};
pub use locator::Locator;
pub use pool::{PoolInfo, ResourcePool, ResourceState};
pub use registry::Registry;
