//! Sizing configuration for the animation manager.

use serde::{Deserialize, Serialize};

/// Hard caps for every pool the manager owns. All pools are allocated once
/// at construction and never grow; a zero capacity is a contract violation.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    /// Handle-pool slots for libraries.
    pub max_num_libraries: usize,
    /// Handle-pool slots for skeletons.
    pub max_num_skeletons: usize,
    /// Handle-pool slots for instances.
    pub max_num_instances: usize,

    /// Clip records across all libraries.
    pub clip_pool_capacity: usize,
    /// Curve records across all libraries.
    pub curve_pool_capacity: usize,
    /// Bind + inverse-bind matrices across all skeletons.
    pub matrix_pool_capacity: usize,

    /// Floats in the key region of the value pool.
    pub key_pool_capacity: usize,
    /// Floats in the per-frame sample region of the value pool.
    pub sample_pool_capacity: usize,

    /// Instances that may register into a single frame.
    pub max_num_active_instances: usize,
    /// Jobs a single instance's sequencer holds at once.
    pub max_num_jobs_per_instance: usize,

    /// Forwarded to the resource container.
    pub label_stack_capacity: usize,
    pub registry_capacity: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_num_libraries: 16,
            max_num_skeletons: 16,
            max_num_instances: 128,
            clip_pool_capacity: 64,
            curve_pool_capacity: 512,
            matrix_pool_capacity: 512,
            key_pool_capacity: 64 * 1024,
            sample_pool_capacity: 4 * 1024,
            max_num_active_instances: 128,
            max_num_jobs_per_instance: 16,
            label_stack_capacity: 16,
            registry_capacity: 256,
        }
    }
}
