//! Per-instance job sequencer: active jobs, fade envelopes, track mixing.
//!
//! The sequencer owns playback state only; clip and key storage stays in
//! the manager's pools and is borrowed for the duration of an `eval`. All
//! operations are deterministic given identical call order and times.

use crate::clip::Clip;
use crate::curve::Curve;
use crate::job::{AnimJob, AnimJobId};

#[derive(Clone, Debug)]
struct JobItem {
    id: AnimJobId,
    clip_index: usize,
    track_index: usize,
    mix_weight: f32,
    fade_in: f32,
    fade_out: f32,
    /// Absolute time the job started playing.
    started: f64,
    /// Absolute time a stop began the fade-out; `None` while running.
    stopped: Option<f64>,
    /// Seconds per loop of the job's clip.
    clip_duration: f32,
}

impl JobItem {
    /// Current contribution weight: ramps up over `fade_in` from `started`,
    /// holds at `mix_weight`, ramps down over `fade_out` from `stopped`.
    fn weight_at(&self, time: f64) -> f32 {
        let local = (time - self.started) as f32;
        if local < 0.0 {
            return 0.0;
        }
        let mut weight = self.mix_weight;
        if self.fade_in > 0.0 && local < self.fade_in {
            weight *= local / self.fade_in;
        }
        if let Some(stopped) = self.stopped {
            let out = (time - stopped) as f32;
            if out >= self.fade_out {
                return 0.0;
            }
            if out >= 0.0 && self.fade_out > 0.0 {
                weight *= 1.0 - out / self.fade_out;
            }
        }
        weight
    }

    /// True once the weight can never become non-zero again.
    fn expired(&self, time: f64) -> bool {
        match self.stopped {
            Some(stopped) => (time - stopped) as f32 >= self.fade_out,
            None => false,
        }
    }
}

/// The job list embedded in every instance.
///
/// Items stay sorted by track index (insertion order within a track), and
/// mixing is a painter's pass: evaluation starts from silence and each item
/// lerps the accumulated samples toward its own by its current weight.
#[derive(Debug)]
pub struct Sequencer {
    items: Vec<JobItem>,
    capacity: usize,
}

impl Sequencer {
    pub(crate) fn new(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
            capacity,
        }
    }

    #[inline]
    pub fn num_jobs(&self) -> usize {
        self.items.len()
    }

    /// Insert a job; false when the job list is full.
    pub fn add(&mut self, time: f64, id: AnimJobId, job: &AnimJob, clip_duration: f32) -> bool {
        if self.items.len() >= self.capacity {
            return false;
        }
        let item = JobItem {
            id,
            clip_index: job.clip_index,
            track_index: job.track_index,
            mix_weight: job.mix_weight,
            fade_in: job.fade_in,
            fade_out: job.fade_out,
            started: time,
            stopped: None,
            clip_duration,
        };
        let at = self
            .items
            .partition_point(|i| i.track_index <= item.track_index);
        self.items.insert(at, item);
        true
    }

    /// Drop every job whose contribution has decayed to zero for good.
    pub fn garbage_collect(&mut self, time: f64) {
        self.items.retain(|item| !item.expired(time));
    }

    pub fn stop(&mut self, time: f64, id: AnimJobId, allow_fade_out: bool) {
        if allow_fade_out {
            if let Some(item) = self.items.iter_mut().find(|i| i.id == id) {
                if item.stopped.is_none() {
                    item.stopped = Some(time);
                }
            }
        } else {
            self.items.retain(|i| i.id != id);
        }
    }

    pub fn stop_track(&mut self, time: f64, track_index: usize, allow_fade_out: bool) {
        if allow_fade_out {
            for item in self.items.iter_mut().filter(|i| i.track_index == track_index) {
                if item.stopped.is_none() {
                    item.stopped = Some(time);
                }
            }
        } else {
            self.items.retain(|i| i.track_index != track_index);
        }
    }

    pub fn stop_all(&mut self, time: f64, allow_fade_out: bool) {
        if allow_fade_out {
            for item in self.items.iter_mut() {
                if item.stopped.is_none() {
                    item.stopped = Some(time);
                }
            }
        } else {
            self.items.clear();
        }
    }

    /// Sample and mix every active job into `out`.
    ///
    /// `clips` is the owning library's clip slice (job clip indices are
    /// library-relative); `curves` and `keys` are the whole pools, since
    /// clip views carry absolute offsets. `out` must be `sample_stride`
    /// floats and is zero-filled before mixing.
    pub fn eval(&self, clips: &[Clip], curves: &[Curve], keys: &[f32], time: f64, out: &mut [f32]) {
        out.fill(0.0);
        for item in &self.items {
            let weight = item.weight_at(time);
            if weight <= 0.0 {
                continue;
            }
            let clip = &clips[item.clip_index];
            let local = clip_local_time((time - item.started) as f32, item.clip_duration);
            mix_clip(clip, curves, keys, local, weight, out);
        }
    }
}

/// Wrap an elapsed time into `[0, duration)`; jobs loop their clip.
fn clip_local_time(elapsed: f32, duration: f32) -> f32 {
    if duration <= 0.0 {
        return 0.0;
    }
    let wrapped = elapsed % duration;
    if wrapped < 0.0 {
        wrapped + duration
    } else {
        wrapped
    }
}

/// Sample one clip at `local` seconds and lerp `out` toward the result by
/// `weight`. Static curves yield their constant; animated curves
/// interpolate linearly between adjacent keyframe rows, wrapping the last
/// row back to the first.
fn mix_clip(clip: &Clip, curves: &[Curve], keys: &[f32], local: f32, weight: f32, out: &mut [f32]) {
    let (row0, row1, frac) = key_rows(clip, local);
    let mut out_offset = 0;
    for curve in &curves[clip.curves.as_range()] {
        let num = curve.num_values;
        let mut value = [0.0f32; 4];
        if curve.key_stride == 0 {
            value[..num].copy_from_slice(&curve.static_value[..num]);
        } else {
            let base0 = clip.keys.offset + row0 * clip.key_stride + curve.key_index;
            let base1 = clip.keys.offset + row1 * clip.key_stride + curve.key_index;
            for c in 0..num {
                let a = keys[base0 + c];
                let b = keys[base1 + c];
                value[c] = a + (b - a) * frac;
            }
        }
        for c in 0..num {
            let cur = out[out_offset + c];
            out[out_offset + c] = cur + (value[c] - cur) * weight;
        }
        out_offset += num;
    }
}

/// The two keyframe rows bracketing `local`, plus the blend factor.
fn key_rows(clip: &Clip, local: f32) -> (usize, usize, f32) {
    if clip.length <= 1 || clip.key_duration <= 0.0 {
        return (0, 0, 0.0);
    }
    let pos = local / clip.key_duration;
    let row0 = (pos as usize).min(clip.length - 1);
    let row1 = (row0 + 1) % clip.length;
    (row0, row1, pos - row0 as f32)
}
