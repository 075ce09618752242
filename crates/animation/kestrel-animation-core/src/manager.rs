//! The animation resource manager.
//!
//! Owns every pool (clips, curves, keys, matrices, samples) plus the handle
//! pools and registry, and drives the create / destroy / frame lifecycle.
//! The storage model is dense-and-mobile: creation appends into packed
//! arrays, destruction compacts them, and a fixup pass rewrites the offset
//! views of every surviving resource so outstanding handles stay valid.

use std::collections::HashMap;

use glam::Mat4;

use kestrel_resource_core::{
    Handle, Locator, PoolInfo, ResourceContainer, ResourceLabel, ResourcePool, ResourceState,
};

use crate::clip::Clip;
use crate::config::Config;
use crate::curve::{Curve, INVALID_INDEX};
use crate::error::{AnimError, PoolKind};
use crate::instance::{Instance, InstanceSetup};
use crate::job::{AnimJob, AnimJobId};
use crate::library::{Library, LibrarySetup};
use crate::pool::DensePool;
use crate::skeleton::{Skeleton, SkeletonSetup};
use crate::slice::{PoolRange, ValuePool};

pub const LIBRARY_TYPE: u16 = 1;
pub const INSTANCE_TYPE: u16 = 2;
pub const SKELETON_TYPE: u16 = 3;

/// The animation resource container.
///
/// All entry points assume exclusive access (the manager is not internally
/// synchronized) and a live manager; `discard` consumes it. Frame-loop
/// ordering (`new_frame` before `add_active_instance` before `evaluate`)
/// is asserted.
#[derive(Debug)]
pub struct AnimManager {
    config: Config,
    container: ResourceContainer,

    lib_pool: ResourcePool<Library>,
    skel_pool: ResourcePool<Skeleton>,
    inst_pool: ResourcePool<Instance>,

    clip_pool: DensePool<Clip>,
    curve_pool: DensePool<Curve>,
    matrix_pool: DensePool<Mat4>,
    values: ValuePool,
    /// Live prefix of the key region.
    num_keys: usize,

    active_instances: Vec<Handle>,
    num_samples: usize,
    in_frame: bool,
    cur_time: f64,
    cur_job_id: u32,
}

impl AnimManager {
    pub fn new(config: Config) -> Self {
        assert!(config.max_num_libraries > 0);
        assert!(config.max_num_skeletons > 0);
        assert!(config.max_num_instances > 0);
        assert!(config.key_pool_capacity > 0);
        assert!(config.sample_pool_capacity > 0);
        assert!(config.max_num_active_instances > 0);
        assert!(config.max_num_jobs_per_instance > 0);
        Self {
            container: ResourceContainer::new(
                config.label_stack_capacity,
                config.registry_capacity,
            ),
            lib_pool: ResourcePool::new(LIBRARY_TYPE, config.max_num_libraries),
            skel_pool: ResourcePool::new(SKELETON_TYPE, config.max_num_skeletons),
            inst_pool: ResourcePool::new(INSTANCE_TYPE, config.max_num_instances),
            clip_pool: DensePool::new(config.clip_pool_capacity),
            curve_pool: DensePool::new(config.curve_pool_capacity),
            matrix_pool: DensePool::new(config.matrix_pool_capacity),
            values: ValuePool::new(config.key_pool_capacity, config.sample_pool_capacity),
            num_keys: 0,
            active_instances: Vec::with_capacity(config.max_num_active_instances),
            num_samples: 0,
            in_frame: false,
            cur_time: 0.0,
            cur_job_id: 0,
            config,
        }
    }

    /// Tear down: destroys every resource regardless of label.
    pub fn discard(mut self) {
        self.destroy(ResourceLabel::ALL);
        debug_assert!(self.clip_pool.is_empty());
        debug_assert!(self.curve_pool.is_empty());
        debug_assert!(self.matrix_pool.is_empty());
        debug_assert_eq!(self.num_keys, 0);
    }

    // label scoping -----------------------------------------------------

    pub fn push_label(&mut self) -> ResourceLabel {
        self.container.push_label()
    }

    pub fn pop_label(&mut self) -> ResourceLabel {
        self.container.pop_label()
    }

    pub fn peek_label(&self) -> ResourceLabel {
        self.container.peek_label()
    }

    // creation ----------------------------------------------------------

    /// Create (or find) a library. Capacity prechecks run before any pool
    /// is touched, so a failed create leaves the manager unchanged.
    pub fn create_library(&mut self, setup: &LibrarySetup) -> Result<Handle, AnimError> {
        assert!(setup.locator.is_shared(), "library locator must be shared");
        assert!(!setup.curve_layout.is_empty(), "empty curve layout");
        assert!(!setup.clips.is_empty(), "empty clip list");

        // deduplication: an already-registered locator wins
        if let Some(handle) = self.container.registry.lookup(&setup.locator) {
            debug_assert_eq!(handle.type_tag(), LIBRARY_TYPE);
            return Ok(handle);
        }

        // capacity prechecks
        if self.clip_pool.len() + setup.clips.len() > self.clip_pool.capacity() {
            log::warn!("anim: clip pool exhausted");
            return Err(AnimError::PoolExhausted {
                kind: PoolKind::Clip,
            });
        }
        let added_curves = setup.clips.len() * setup.curve_layout.len();
        if self.curve_pool.len() + added_curves > self.curve_pool.capacity() {
            log::warn!("anim: curve pool exhausted");
            return Err(AnimError::PoolExhausted {
                kind: PoolKind::Curve,
            });
        }
        let mut lib_num_keys = 0;
        for clip_setup in &setup.clips {
            if clip_setup.curves.len() != setup.curve_layout.len() {
                log::warn!("anim: curve count mismatch in clip '{}'", clip_setup.name);
                return Err(AnimError::CurveCountMismatch {
                    clip: clip_setup.name.clone(),
                });
            }
            for (i, curve_setup) in clip_setup.curves.iter().enumerate() {
                if !curve_setup.is_static {
                    lib_num_keys += clip_setup.length * setup.curve_layout[i].stride();
                }
            }
        }
        if self.num_keys + lib_num_keys > self.values.key_capacity() {
            log::warn!("anim: key pool exhausted");
            return Err(AnimError::PoolExhausted { kind: PoolKind::Key });
        }

        // lay out clips, curves and keys
        let handle = self.lib_pool.alloc();
        let sample_stride = setup.curve_layout.iter().map(|f| f.stride()).sum();
        let clip_pool_base = self.clip_pool.len();
        let curve_pool_base = self.curve_pool.len();
        let lib_key_base = self.num_keys;
        let mut clip_key_cursor = lib_key_base;
        let mut clip_index_map = HashMap::with_capacity(setup.clips.len());
        for (clip_index, clip_setup) in setup.clips.iter().enumerate() {
            clip_index_map.insert(clip_setup.name.clone(), clip_index);
            let curve_base = self.curve_pool.len();
            let mut key_stride = 0;
            for (i, curve_setup) in clip_setup.curves.iter().enumerate() {
                let format = setup.curve_layout[i];
                let mut curve = Curve {
                    format,
                    is_static: curve_setup.is_static,
                    static_value: curve_setup.static_value,
                    num_values: format.stride(),
                    key_index: INVALID_INDEX,
                    key_stride: 0,
                };
                if !curve.is_static {
                    curve.key_index = key_stride;
                    curve.key_stride = format.stride();
                    key_stride += curve.key_stride;
                }
                self.curve_pool.push(curve);
            }
            let clip_num_keys = key_stride * clip_setup.length;
            let keys = if clip_num_keys > 0 {
                let range = PoolRange::new(clip_key_cursor, clip_num_keys);
                clip_key_cursor += clip_num_keys;
                range
            } else {
                PoolRange::EMPTY
            };
            self.clip_pool.push(Clip {
                name: clip_setup.name.clone(),
                length: clip_setup.length,
                key_duration: clip_setup.key_duration,
                key_stride,
                curves: PoolRange::new(curve_base, clip_setup.curves.len()),
                keys,
            });
        }
        debug_assert_eq!(clip_key_cursor, lib_key_base + lib_num_keys);
        let lib = Library::new(
            setup.locator.clone(),
            setup.curve_layout.clone(),
            sample_stride,
            PoolRange::new(clip_pool_base, setup.clips.len()),
            PoolRange::new(curve_pool_base, added_curves),
            PoolRange::new(lib_key_base, lib_num_keys),
            clip_index_map,
        );
        self.num_keys += lib_num_keys;

        // pre-fill every keyframe row with the curve defaults
        let lib_clips = lib.clips;
        {
            let Self {
                clip_pool,
                curve_pool,
                values,
                ..
            } = self;
            for clip in clip_pool.slice(lib_clips) {
                if clip.key_stride == 0 {
                    continue;
                }
                let curves = &curve_pool.as_slice()[clip.curves.as_range()];
                let keys = values.keys_mut(clip.keys);
                for row in 0..clip.length {
                    let mut offset = row * clip.key_stride;
                    for curve in curves {
                        for c in 0..curve.key_stride {
                            keys[offset] = curve.static_value[c];
                            offset += 1;
                        }
                    }
                }
            }
        }

        self.container.register(setup.locator.clone(), handle);
        self.lib_pool.assign(handle, lib, ResourceState::Valid);
        Ok(handle)
    }

    /// Create (or find) a skeleton.
    pub fn create_skeleton(&mut self, setup: &SkeletonSetup) -> Result<Handle, AnimError> {
        assert!(setup.locator.is_shared(), "skeleton locator must be shared");
        assert!(!setup.bones.is_empty(), "empty bone list");

        if let Some(handle) = self.container.registry.lookup(&setup.locator) {
            debug_assert_eq!(handle.type_tag(), SKELETON_TYPE);
            return Ok(handle);
        }

        let num_bones = setup.bones.len();
        if self.matrix_pool.len() + num_bones * 2 > self.matrix_pool.capacity() {
            log::warn!("anim: matrix pool exhausted");
            return Err(AnimError::PoolExhausted {
                kind: PoolKind::Matrix,
            });
        }

        let handle = self.skel_pool.alloc();
        let matrix_base = self.matrix_pool.len();
        for bone in &setup.bones {
            self.matrix_pool.push(bone.bind_pose);
        }
        for bone in &setup.bones {
            self.matrix_pool.push(bone.inv_bind_pose);
        }
        let matrices = PoolRange::new(matrix_base, num_bones * 2);
        let skel = Skeleton {
            locator: setup.locator.clone(),
            num_bones,
            matrices,
            bind_pose: matrices.make_range(0, num_bones),
            inv_bind_pose: matrices.make_range(num_bones, num_bones),
            parent_indices: setup.bones.iter().map(|b| b.parent_index).collect(),
        };

        self.container.register(setup.locator.clone(), handle);
        self.skel_pool.assign(handle, skel, ResourceState::Valid);
        Ok(handle)
    }

    /// Create an instance bound to a library and optional skeleton.
    /// Instances are registered anonymously; they are never looked up by
    /// name, only destroyed by label.
    pub fn create_instance(&mut self, setup: &InstanceSetup) -> Result<Handle, AnimError> {
        if self.lib_pool.lookup(setup.library).is_none() {
            return Err(AnimError::UnknownLibrary);
        }
        if let Some(skeleton) = setup.skeleton {
            if self.skel_pool.lookup(skeleton).is_none() {
                return Err(AnimError::UnknownSkeleton);
            }
        }
        let handle = self.inst_pool.alloc();
        let inst = Instance::new(
            setup.library,
            setup.skeleton,
            self.config.max_num_jobs_per_instance,
        );
        self.container.register(Locator::non_shared(), handle);
        self.inst_pool.assign(handle, inst, ResourceState::Valid);
        Ok(handle)
    }

    // lookup ------------------------------------------------------------

    pub fn lookup_library(&self, handle: Handle) -> Option<&Library> {
        debug_assert!(!handle.is_valid() || handle.type_tag() == LIBRARY_TYPE);
        self.lib_pool.lookup(handle)
    }

    pub fn lookup_skeleton(&self, handle: Handle) -> Option<&Skeleton> {
        debug_assert!(!handle.is_valid() || handle.type_tag() == SKELETON_TYPE);
        self.skel_pool.lookup(handle)
    }

    pub fn lookup_instance(&self, handle: Handle) -> Option<&Instance> {
        debug_assert!(!handle.is_valid() || handle.type_tag() == INSTANCE_TYPE);
        self.inst_pool.lookup(handle)
    }

    /// Find a registered resource handle by its shared locator.
    pub fn lookup_locator(&self, locator: &Locator) -> Option<Handle> {
        self.container.registry.lookup(locator)
    }

    // key upload --------------------------------------------------------

    /// Overwrite a library's packed key region byte-for-byte. The buffer
    /// must be exactly `|keys| * size_of::<f32>()` bytes.
    pub fn write_keys(&mut self, handle: Handle, data: &[u8]) -> Result<(), AnimError> {
        let Self {
            lib_pool, values, ..
        } = self;
        let lib = lib_pool.lookup(handle).ok_or(AnimError::UnknownLibrary)?;
        let keys = values.keys_mut(lib.keys);
        assert_eq!(
            data.len(),
            keys.len() * std::mem::size_of::<f32>(),
            "key data size mismatch"
        );
        bytemuck::cast_slice_mut::<f32, u8>(keys).copy_from_slice(data);
        Ok(())
    }

    // destruction -------------------------------------------------------

    /// Destroy every resource registered under `label`
    /// ([`ResourceLabel::ALL`] destroys everything), in registration order.
    pub fn destroy(&mut self, label: ResourceLabel) {
        let handles = self.container.registry.remove(label);
        for handle in handles {
            match handle.type_tag() {
                LIBRARY_TYPE => self.destroy_library(handle),
                SKELETON_TYPE => self.destroy_skeleton(handle),
                INSTANCE_TYPE => self.destroy_instance(handle),
                _ => debug_assert!(false, "destroy: unknown resource type"),
            }
        }
    }

    fn destroy_library(&mut self, handle: Handle) {
        if let Some(lib) = self.lib_pool.lookup(handle) {
            // capture the views before compaction rewrites them; clips must
            // go before curves, and both before keys, so surviving clips
            // still get their curve and key views fixed up
            let clips = lib.clips;
            let curves = lib.curves;
            let keys = lib.keys;
            self.remove_clips(clips);
            self.remove_curves(curves);
            self.remove_keys(keys);
        }
        self.lib_pool.unassign(handle);
    }

    fn destroy_skeleton(&mut self, handle: Handle) {
        if let Some(skel) = self.skel_pool.lookup(handle) {
            let matrices = skel.matrices;
            self.remove_matrices(matrices);
        }
        self.skel_pool.unassign(handle);
    }

    fn destroy_instance(&mut self, handle: Handle) {
        if let Some(inst) = self.inst_pool.lookup_mut(handle) {
            inst.clear();
        }
        self.inst_pool.unassign(handle);
    }

    // compaction --------------------------------------------------------

    /// Erase a range of keys and shift every surviving key view down.
    fn remove_keys(&mut self, range: PoolRange) {
        if range.is_empty() {
            return;
        }
        debug_assert!(range.end() <= self.num_keys);
        self.values.erase_keys(range, self.num_keys);
        self.num_keys -= range.len;
        for slot in 0..=self.lib_pool.last_alloc_slot() {
            if let Some(lib) = self.lib_pool.slot_mut(slot) {
                lib.keys.fill_gap(range.offset, range.len);
            }
        }
        for clip in self.clip_pool.iter_mut() {
            clip.keys.fill_gap(range.offset, range.len);
        }
    }

    /// Erase a range of curves and fix the curve views in libraries and
    /// clips.
    fn remove_curves(&mut self, range: PoolRange) {
        if range.is_empty() {
            return;
        }
        self.curve_pool.erase_range(range.offset, range.len);
        for slot in 0..=self.lib_pool.last_alloc_slot() {
            if let Some(lib) = self.lib_pool.slot_mut(slot) {
                lib.curves.fill_gap(range.offset, range.len);
            }
        }
        for clip in self.clip_pool.iter_mut() {
            clip.curves.fill_gap(range.offset, range.len);
        }
    }

    /// Erase a range of clips and fix the clip views in libraries.
    fn remove_clips(&mut self, range: PoolRange) {
        if range.is_empty() {
            return;
        }
        self.clip_pool.erase_range(range.offset, range.len);
        for slot in 0..=self.lib_pool.last_alloc_slot() {
            if let Some(lib) = self.lib_pool.slot_mut(slot) {
                lib.clips.fill_gap(range.offset, range.len);
            }
        }
    }

    /// Erase a range of matrices and fix the skeleton matrix views.
    fn remove_matrices(&mut self, range: PoolRange) {
        if range.is_empty() {
            return;
        }
        self.matrix_pool.erase_range(range.offset, range.len);
        for slot in 0..=self.skel_pool.last_alloc_slot() {
            if let Some(skel) = self.skel_pool.slot_mut(slot) {
                skel.matrices.fill_gap(range.offset, range.len);
                skel.bind_pose.fill_gap(range.offset, range.len);
                skel.inv_bind_pose.fill_gap(range.offset, range.len);
            }
        }
    }

    // frame loop --------------------------------------------------------

    /// Open a frame: release last frame's sample claims and reset the
    /// active set.
    pub fn new_frame(&mut self) {
        assert!(!self.in_frame, "new_frame inside a frame");
        let Self {
            inst_pool,
            active_instances,
            ..
        } = self;
        for handle in active_instances.drain(..) {
            if let Some(inst) = inst_pool.lookup_mut(handle) {
                inst.samples = PoolRange::EMPTY;
                inst.skin_matrices = PoolRange::EMPTY;
            }
        }
        self.num_samples = 0;
        self.in_frame = true;
    }

    /// Register an instance for this frame and claim its sample slice.
    /// False (and no state change) when the active set or the sample pool
    /// is full.
    pub fn add_active_instance(&mut self, handle: Handle) -> bool {
        assert!(self.in_frame, "add_active_instance outside a frame");
        let Self {
            inst_pool,
            lib_pool,
            active_instances,
            num_samples,
            values,
            config,
            ..
        } = self;
        let Some(inst) = inst_pool.lookup_mut(handle) else {
            debug_assert!(false, "add_active_instance: invalid instance");
            return false;
        };
        let Some(lib) = lib_pool.lookup(inst.library) else {
            debug_assert!(false, "add_active_instance: instance library gone");
            return false;
        };
        if active_instances.len() >= config.max_num_active_instances {
            return false;
        }
        if *num_samples + lib.sample_stride > values.sample_capacity() {
            return false;
        }
        active_instances.push(handle);
        inst.samples = PoolRange::new(*num_samples, lib.sample_stride);
        *num_samples += lib.sample_stride;
        true
    }

    /// Evaluate every active instance at the current time, then advance the
    /// global clock and close the frame.
    pub fn evaluate(&mut self, frame_duration: f64) {
        assert!(self.in_frame, "evaluate outside a frame");
        let Self {
            inst_pool,
            lib_pool,
            clip_pool,
            curve_pool,
            values,
            active_instances,
            cur_time,
            in_frame,
            ..
        } = self;
        let (keys, samples) = values.split_keys_samples();
        for handle in active_instances.iter() {
            let Some(inst) = inst_pool.lookup_mut(*handle) else {
                continue;
            };
            inst.sequencer.garbage_collect(*cur_time);
            let Some(lib) = lib_pool.lookup(inst.library) else {
                continue;
            };
            let clips = clip_pool.slice(lib.clips);
            let out = &mut samples[inst.samples.as_range()];
            inst.sequencer
                .eval(clips, curve_pool.as_slice(), keys, *cur_time, out);
        }
        *cur_time += frame_duration;
        *in_frame = false;
    }

    /// This frame's samples for an active instance.
    pub fn samples(&self, handle: Handle) -> Option<&[f32]> {
        let inst = self.inst_pool.lookup(handle)?;
        if inst.samples.is_empty() {
            return None;
        }
        Some(self.values.samples(inst.samples))
    }

    // job control -------------------------------------------------------

    /// Start a job on an instance's sequencer. Returns the new job id, or
    /// [`AnimJobId::INVALID`] when the sequencer rejects the insert.
    pub fn play(&mut self, handle: Handle, job: &AnimJob) -> AnimJobId {
        let Self {
            inst_pool,
            lib_pool,
            clip_pool,
            cur_time,
            cur_job_id,
            ..
        } = self;
        let Some(inst) = inst_pool.lookup_mut(handle) else {
            debug_assert!(false, "play: invalid instance");
            return AnimJobId::INVALID;
        };
        inst.sequencer.garbage_collect(*cur_time);
        let Some(lib) = lib_pool.lookup(inst.library) else {
            debug_assert!(false, "play: instance library gone");
            return AnimJobId::INVALID;
        };
        debug_assert!(job.clip_index < lib.num_clips());
        let clip = &clip_pool.slice(lib.clips)[job.clip_index];
        // monotonic, wrap-safe, never the invalid zero id
        *cur_job_id = cur_job_id.wrapping_add(1);
        if *cur_job_id == 0 {
            *cur_job_id = 1;
        }
        let id = AnimJobId(*cur_job_id);
        if inst.sequencer.add(*cur_time, id, job, clip.duration()) {
            id
        } else {
            AnimJobId::INVALID
        }
    }

    pub fn stop(&mut self, handle: Handle, id: AnimJobId, allow_fade_out: bool) {
        let cur_time = self.cur_time;
        if let Some(inst) = self.inst_pool.lookup_mut(handle) {
            inst.sequencer.stop(cur_time, id, allow_fade_out);
            inst.sequencer.garbage_collect(cur_time);
        }
    }

    pub fn stop_track(&mut self, handle: Handle, track_index: usize, allow_fade_out: bool) {
        let cur_time = self.cur_time;
        if let Some(inst) = self.inst_pool.lookup_mut(handle) {
            inst.sequencer.stop_track(cur_time, track_index, allow_fade_out);
            inst.sequencer.garbage_collect(cur_time);
        }
    }

    pub fn stop_all(&mut self, handle: Handle, allow_fade_out: bool) {
        let cur_time = self.cur_time;
        if let Some(inst) = self.inst_pool.lookup_mut(handle) {
            inst.sequencer.stop_all(cur_time, allow_fade_out);
            inst.sequencer.garbage_collect(cur_time);
        }
    }

    // inspection --------------------------------------------------------

    #[inline]
    pub fn config(&self) -> &Config {
        &self.config
    }

    #[inline]
    pub fn num_keys(&self) -> usize {
        self.num_keys
    }

    #[inline]
    pub fn num_clips(&self) -> usize {
        self.clip_pool.len()
    }

    #[inline]
    pub fn num_curves(&self) -> usize {
        self.curve_pool.len()
    }

    #[inline]
    pub fn num_matrices(&self) -> usize {
        self.matrix_pool.len()
    }

    #[inline]
    pub fn num_samples(&self) -> usize {
        self.num_samples
    }

    #[inline]
    pub fn num_active_instances(&self) -> usize {
        self.active_instances.len()
    }

    #[inline]
    pub fn cur_time(&self) -> f64 {
        self.cur_time
    }

    pub fn library_pool_info(&self) -> PoolInfo {
        self.lib_pool.query_pool_info()
    }

    pub fn skeleton_pool_info(&self) -> PoolInfo {
        self.skel_pool.query_pool_info()
    }

    pub fn instance_pool_info(&self) -> PoolInfo {
        self.inst_pool.query_pool_info()
    }

    /// Borrow a clip of a library by library-relative index.
    pub fn clip(&self, lib: &Library, clip_index: usize) -> &Clip {
        &self.clip_pool.slice(lib.clips)[clip_index]
    }

    /// Borrow the curves of a clip.
    pub fn curves(&self, clip: &Clip) -> &[Curve] {
        self.curve_pool.slice(clip.curves)
    }

    /// Borrow the packed keys of a clip.
    pub fn keys(&self, clip: &Clip) -> &[f32] {
        self.values.keys(clip.keys)
    }

    /// Borrow a skeleton's matrices: `(bind_pose, inv_bind_pose)`.
    pub fn skeleton_matrices(&self, skel: &Skeleton) -> (&[Mat4], &[Mat4]) {
        (
            self.matrix_pool.slice(skel.bind_pose),
            self.matrix_pool.slice(skel.inv_bind_pose),
        )
    }
}
