//! Kestrel Animation Core (engine-agnostic).
//!
//! This crate is the animation resource container: it owns packed pools of
//! keyframes, curves, clips and skinning matrices, hands out stable handles
//! to libraries, skeletons and playback instances, and drives per-frame
//! sampling through each instance's job sequencer. Storage is contiguous
//! and compacts on destroy; every surviving offset view is rewritten so the
//! handles external code holds stay valid.

pub mod clip;
pub mod config;
pub mod curve;
pub mod error;
pub mod instance;
pub mod job;
pub mod library;
pub mod manager;
pub mod pool;
pub mod sequencer;
pub mod skeleton;
pub mod slice;

// Re-exports for consumers (adapters)
pub use clip::Clip;
pub use config::Config;
pub use curve::{Curve, CurveFormat, INVALID_INDEX};
pub use error::{AnimError, PoolKind};
pub use instance::{Instance, InstanceSetup};
pub use job::{AnimJob, AnimJobId};
pub use library::{ClipSetup, CurveSetup, Library, LibrarySetup};
pub use manager::{AnimManager, INSTANCE_TYPE, LIBRARY_TYPE, SKELETON_TYPE};
pub use sequencer::Sequencer;
pub use skeleton::{BoneSetup, Skeleton, SkeletonSetup};
pub use slice::{PoolRange, ValuePool};

pub use kestrel_resource_core::{Handle, Locator, ResourceLabel};
