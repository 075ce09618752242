//! Skeletons: bind-pose matrices and parent topology.

use glam::Mat4;
use serde::{Deserialize, Serialize};

use kestrel_resource_core::Locator;

use crate::slice::PoolRange;

/// Parent index of a root bone.
pub const NO_PARENT: i32 = -1;

/// Setup description of one bone.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct BoneSetup {
    pub name: String,
    /// Index of the parent bone, or [`NO_PARENT`] for roots.
    pub parent_index: i32,
    pub bind_pose: Mat4,
    pub inv_bind_pose: Mat4,
}

/// Setup description of a skeleton.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SkeletonSetup {
    pub locator: Locator,
    pub bones: Vec<BoneSetup>,
}

/// A named bone hierarchy with its matrices packed into the manager's
/// matrix pool: `matrices` covers both halves, `bind_pose` the first
/// `num_bones` entries, `inv_bind_pose` the second.
#[derive(Clone, Debug)]
pub struct Skeleton {
    pub locator: Locator,
    pub num_bones: usize,
    pub matrices: PoolRange,
    pub bind_pose: PoolRange,
    pub inv_bind_pose: PoolRange,
    pub parent_indices: Vec<i32>,
}
